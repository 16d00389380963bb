//! Local username/password authentication.
//!
//! Each user has one [`CredentialRecord`] stored under `user_{username}`:
//!
//! ```json
//! {"hash": "<sha256(password)>", "question": "First pet?", "answer": "<sha256(answer)>"}
//! ```
//!
//! The first successful login for a username registers it; later logins
//! verify the password digest. A forgotten password can be replaced by
//! answering the security question.
//!
//! This is a convenience gate for a single device, not a security boundary:
//! there is no salting, rate limiting, lockout, or session expiry.

mod digest;

pub use digest::digest;

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use crate::models::{CredentialRecord, Username};
use crate::storage::{credential_key, Storage};
use crate::{Error, Result};

/// Result of a successful [`CredentialStore::register_or_verify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated {
    pub username: Username,
    /// True when this call created the credential record.
    pub new_user: bool,
}

/// Security question and answer supplied when registering a new user.
#[derive(Debug, Clone)]
pub struct SecurityInfo {
    pub question: String,
    pub answer: SecretString,
}

impl SecurityInfo {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: SecretString::from(answer.into()),
        }
    }
}

pub struct CredentialStore {
    storage: Arc<dyn Storage>,
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Verify `password` for an existing user, or register a new one.
    ///
    /// Registration requires `security` with a non-empty question and answer.
    /// Inputs are trimmed before use.
    pub async fn register_or_verify(
        &self,
        username: &str,
        password: &SecretString,
        security: Option<&SecurityInfo>,
    ) -> Result<Authenticated> {
        let password = password.expose_secret().trim();
        let username = match Username::parse(username) {
            Some(name) if !password.is_empty() => name,
            _ => return Err(Error::invalid("username and password are required")),
        };

        let password_digest = digest(password);

        if let Some(record) = self.load_record(&username).await? {
            if record.password_digest != password_digest {
                tracing::info!(user = %username, "Password mismatch");
                return Err(Error::AuthenticationFailed);
            }
            tracing::debug!(user = %username, "Verified existing user");
            return Ok(Authenticated {
                username,
                new_user: false,
            });
        }

        let (question, answer) = match security {
            Some(info) => (info.question.trim(), info.answer.expose_secret().trim()),
            None => ("", ""),
        };
        if question.is_empty() || answer.is_empty() {
            return Err(Error::MissingSecurityInfo);
        }

        let record = CredentialRecord {
            password_digest,
            question: question.to_string(),
            answer_digest: digest(answer),
        };
        self.save_record(&username, &record).await?;
        tracing::info!(user = %username, "Registered new user");

        Ok(Authenticated {
            username,
            new_user: true,
        })
    }

    /// Replace the password after checking the security answer.
    ///
    /// Only the password digest changes; the question and answer digest are
    /// kept as they were set at registration.
    pub async fn reset_password(
        &self,
        username: &str,
        answer: &SecretString,
        new_password: &SecretString,
    ) -> Result<()> {
        let answer = answer.expose_secret().trim();
        let new_password = new_password.expose_secret().trim();
        let username = match Username::parse(username) {
            Some(name) if !answer.is_empty() && !new_password.is_empty() => name,
            _ => {
                return Err(Error::invalid(
                    "username, security answer and new password are required",
                ))
            }
        };

        let record = self
            .load_record(&username)
            .await?
            .ok_or(Error::UserNotFound)?;

        if digest(answer) != record.answer_digest {
            tracing::info!(user = %username, "Wrong security answer");
            return Err(Error::WrongAnswer);
        }

        let updated = record.with_password_digest(digest(new_password));
        self.save_record(&username, &updated).await?;
        tracing::info!(user = %username, "Password reset");
        Ok(())
    }

    /// The plaintext security question chosen at registration.
    pub async fn security_question(&self, username: &str) -> Result<String> {
        let username =
            Username::parse(username).ok_or_else(|| Error::invalid("username is required"))?;
        let record = self
            .load_record(&username)
            .await?
            .ok_or(Error::UserNotFound)?;
        Ok(record.question)
    }

    /// Whether a credential record exists for `username`.
    pub async fn exists(&self, username: &str) -> Result<bool> {
        match Username::parse(username) {
            Some(name) => Ok(self.load_record(&name).await?.is_some()),
            None => Ok(false),
        }
    }

    async fn load_record(&self, username: &Username) -> Result<Option<CredentialRecord>> {
        let key = credential_key(username);
        let Some(raw) = self.storage.get(&key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| Error::Corrupt { key, source })
    }

    async fn save_record(&self, username: &Username, record: &CredentialRecord) -> Result<()> {
        let key = credential_key(username);
        let raw = serde_json::to_string(record).map_err(|e| Error::Storage(e.into()))?;
        self.storage.set(&key, &raw).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    fn store() -> (CredentialStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (CredentialStore::new(storage.clone()), storage)
    }

    fn pet() -> SecurityInfo {
        SecurityInfo::new("First pet?", "rex")
    }

    #[tokio::test]
    async fn registers_then_verifies() -> anyhow::Result<()> {
        let (creds, _) = store();

        let first = creds
            .register_or_verify("alice", &secret("pw"), Some(&pet()))
            .await?;
        let second = creds
            .register_or_verify("alice", &secret("pw"), None)
            .await?;

        assert!(first.new_user);
        assert!(!second.new_user);
        assert_eq!(second.username.as_str(), "alice");
        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_fails() -> anyhow::Result<()> {
        let (creds, _) = store();
        creds
            .register_or_verify("alice", &secret("pw"), Some(&pet()))
            .await?;

        let err = creds
            .register_or_verify("alice", &secret("other"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AuthenticationFailed));
        Ok(())
    }

    #[tokio::test]
    async fn empty_fields_are_invalid_input() {
        let (creds, storage) = store();

        let err = creds
            .register_or_verify("  ", &secret("pw"), Some(&pet()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = creds
            .register_or_verify("alice", &secret("   "), Some(&pet()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn new_user_without_security_info_is_rejected() {
        let (creds, storage) = store();

        let err = creds
            .register_or_verify("alice", &secret("pw"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingSecurityInfo));

        let blank_answer = SecurityInfo::new("First pet?", "  ");
        let err = creds
            .register_or_verify("alice", &secret("pw"), Some(&blank_answer))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingSecurityInfo));
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn stores_digests_not_plaintext() -> anyhow::Result<()> {
        let (creds, storage) = store();
        creds
            .register_or_verify("alice", &secret("pw"), Some(&pet()))
            .await?;

        let raw = storage.get("user_alice").await?.expect("record stored");
        let record: CredentialRecord = serde_json::from_str(&raw)?;
        assert_eq!(record.password_digest, digest("pw"));
        assert_eq!(record.answer_digest, digest("rex"));
        assert_eq!(record.question, "First pet?");
        assert!(!raw.contains("\"pw\""));
        Ok(())
    }

    #[tokio::test]
    async fn inputs_are_trimmed() -> anyhow::Result<()> {
        let (creds, _) = store();
        creds
            .register_or_verify(" alice ", &secret(" pw "), Some(&pet()))
            .await?;

        let again = creds
            .register_or_verify("alice", &secret("pw"), None)
            .await?;
        assert!(!again.new_user);
        Ok(())
    }

    #[tokio::test]
    async fn reset_replaces_only_the_password() -> anyhow::Result<()> {
        let (creds, storage) = store();
        creds
            .register_or_verify("alice", &secret("old"), Some(&pet()))
            .await?;

        creds
            .reset_password("alice", &secret("rex"), &secret("new"))
            .await?;

        let record: CredentialRecord =
            serde_json::from_str(&storage.get("user_alice").await?.unwrap())?;
        assert_eq!(record.password_digest, digest("new"));
        assert_eq!(record.question, "First pet?");
        assert_eq!(record.answer_digest, digest("rex"));

        assert!(creds
            .register_or_verify("alice", &secret("new"), None)
            .await
            .is_ok());
        let err = creds
            .register_or_verify("alice", &secret("old"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AuthenticationFailed));
        Ok(())
    }

    #[tokio::test]
    async fn reset_with_wrong_answer_keeps_old_password() -> anyhow::Result<()> {
        let (creds, _) = store();
        creds
            .register_or_verify("alice", &secret("old"), Some(&pet()))
            .await?;

        let err = creds
            .reset_password("alice", &secret("wrong-answer"), &secret("newpass"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::WrongAnswer));

        let login = creds
            .register_or_verify("alice", &secret("old"), None)
            .await?;
        assert!(!login.new_user);
        Ok(())
    }

    #[tokio::test]
    async fn reset_unknown_user_and_blank_fields() {
        let (creds, _) = store();

        let err = creds
            .reset_password("ghost", &secret("rex"), &secret("new"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UserNotFound));

        let err = creds
            .reset_password("ghost", &secret(""), &secret("new"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn security_question_lookup() -> anyhow::Result<()> {
        let (creds, _) = store();
        creds
            .register_or_verify("alice", &secret("pw"), Some(&pet()))
            .await?;

        assert_eq!(creds.security_question("alice").await?, "First pet?");
        assert!(creds.exists("alice").await?);
        assert!(!creds.exists("bob").await?);
        assert!(matches!(
            creds.security_question("bob").await.unwrap_err(),
            Error::UserNotFound
        ));
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_record_is_reported() -> anyhow::Result<()> {
        let (creds, storage) = store();
        storage.set("user_alice", "{not json").await?;

        let err = creds
            .register_or_verify("alice", &secret("pw"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Corrupt { .. }));
        Ok(())
    }
}
