pub mod app;
pub mod clock;
pub mod config;
pub mod credentials;
mod error;
pub mod export;
pub mod format;
pub mod ledger;
pub mod models;
pub mod session;
pub mod storage;

pub use error::{Error, Result};
pub use session::{LoginOutcome, Session, Tracker};
