//! This module defines the domain models and the operations on them.

mod transaction;
mod user;

pub use transaction::{
    Transaction, TransactionDraft, TransactionId, TransactionPatch, TransactionType,
};
pub use user::UserId;
