mod credential;
mod id;
mod id_generator;
mod transaction;

pub use credential::{CredentialRecord, Username};
pub use id::Id;
pub use id_generator::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use transaction::{
    max_amount, storable_amount, NewTransaction, Transaction, TransactionType,
    TransactionTypeError,
};
