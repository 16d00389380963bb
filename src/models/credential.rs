use std::fmt;

use serde::{Deserialize, Serialize};

/// A trimmed, non-empty username. The storage keys for a user's credential
/// record and ledger are both derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Returns `None` when the input is empty after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Stored credentials for one user.
///
/// Field names are part of the persisted layout: `hash` holds the password
/// digest and `answer` holds the security-answer digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    #[serde(rename = "hash")]
    pub password_digest: String,
    pub question: String,
    #[serde(rename = "answer")]
    pub answer_digest: String,
}

impl CredentialRecord {
    /// Same question and answer digest, new password digest.
    pub fn with_password_digest(&self, password_digest: String) -> Self {
        Self {
            password_digest,
            question: self.question.clone(),
            answer_digest: self.answer_digest.clone(),
        }
    }
}
