use anyhow::Result;
use secrecy::SecretString;

use crate::credentials::SecurityInfo;
use crate::session::{Session, Tracker};

use super::LoginOutput;

/// Log in (registering on first use) and return the open session.
pub async fn login(
    tracker: &Tracker,
    username: &str,
    password: &SecretString,
    security: Option<&SecurityInfo>,
) -> Result<(Session, LoginOutput)> {
    let outcome = tracker.login(username, password, security).await?;
    let output = LoginOutput {
        username: outcome.session.username().to_string(),
        new_user: outcome.new_user,
        transaction_count: outcome.session.ledger().len(),
    };
    Ok((outcome.session, output))
}

pub async fn reset_password(
    tracker: &Tracker,
    username: &str,
    answer: &SecretString,
    new_password: &SecretString,
) -> Result<serde_json::Value> {
    tracker
        .reset_password(username, answer, new_password)
        .await?;
    Ok(serde_json::json!({
        "success": true,
        "username": username.trim(),
        "message": "Password reset"
    }))
}

pub async fn security_question(tracker: &Tracker, username: &str) -> Result<serde_json::Value> {
    let question = tracker.credentials().security_question(username).await?;
    Ok(serde_json::json!({
        "username": username.trim(),
        "question": question
    }))
}
