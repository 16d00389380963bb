//! Errors surfaced by credential and ledger operations.
//!
//! Every variant is terminal for the action that produced it. Validation runs
//! before any write, so an error never leaves partially committed state.

use crate::models::Id;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required field was missing or could not be parsed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The password does not match the stored digest.
    #[error("incorrect password")]
    AuthenticationFailed,

    /// A new user must choose a security question and answer.
    #[error("set a security question and answer for a new user")]
    MissingSecurityInfo,

    #[error("user not found")]
    UserNotFound,

    /// The security answer does not match the stored digest.
    #[error("wrong security answer")]
    WrongAnswer,

    #[error("no transaction at index {index} (ledger has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no transaction with id {0}")]
    TransactionNotFound(Id),

    #[error("no transactions to export")]
    NothingToExport,

    /// A stored value exists but could not be parsed.
    #[error("stored value under {key:?} is unreadable: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The storage backend failed to read or write.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }
}
