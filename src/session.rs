//! Login and the per-user session context.
//!
//! A [`Tracker`] owns the shared collaborators (storage, clock, id source).
//! Logging in yields a [`Session`] scoped to one username; ledger operations
//! go through the session, so no state is shared between users.

use std::sync::Arc;

use secrecy::SecretString;

use crate::clock::{Clock, SystemClock};
use crate::credentials::{CredentialStore, SecurityInfo};
use crate::ledger::{AggregateView, Granularity, Ledger};
use crate::models::{IdGenerator, Username, UuidIdGenerator};
use crate::storage::Storage;
use crate::Result;

pub struct Tracker {
    storage: Arc<dyn Storage>,
    credentials: CredentialStore,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

/// A successful login.
pub struct LoginOutcome {
    pub session: Session,
    /// True when the login registered the username.
    pub new_user: bool,
}

impl Tracker {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            credentials: CredentialStore::new(storage.clone()),
            storage,
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidIdGenerator),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Register or verify, then load the user's ledger.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
        security: Option<&SecurityInfo>,
    ) -> Result<LoginOutcome> {
        let auth = self
            .credentials
            .register_or_verify(username, password, security)
            .await?;

        let ledger = Ledger::load_with(
            self.storage.clone(),
            auth.username,
            self.clock.clone(),
            self.ids.clone(),
        )
        .await?;

        Ok(LoginOutcome {
            session: Session { ledger },
            new_user: auth.new_user,
        })
    }

    pub async fn reset_password(
        &self,
        username: &str,
        answer: &SecretString,
        new_password: &SecretString,
    ) -> Result<()> {
        self.credentials
            .reset_password(username, answer, new_password)
            .await
    }
}

/// The authenticated user and their ledger.
pub struct Session {
    ledger: Ledger,
}

impl Session {
    pub fn username(&self) -> &Username {
        self.ledger.username()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    pub fn summary(&self, granularity: Granularity) -> AggregateView {
        self.ledger.aggregate(granularity)
    }

    /// End the session. The ledger was persisted by each mutation, so there
    /// is nothing left to flush.
    pub fn logout(self) -> Username {
        let username = self.ledger.username().clone();
        tracing::debug!(user = %username, "Logged out");
        username
    }
}
