//! This file defines the type `Transaction`, the core type of the
//! application, along with the payload types used to create and update
//! transactions.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

/// The opaque unique identifier of a [Transaction].
///
/// Assigned exactly once at creation time, by the provider in guest mode and
/// by the backing store in remote mode, and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(String);

impl TransactionId {
    /// Create a transaction ID from an existing identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh, random transaction ID.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a transaction records money earned or money spent.
///
/// This is a closed set: the sign of a transaction is conveyed solely by its
/// type, never by the sign of its amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// The `date` field is kept as the ISO-like string the caller recorded, either
/// a bare `YYYY-MM-DD` or a fuller local timestamp without timezone offset.
/// It is stored as provided, without normalization; interpreting it as a local
/// calendar date is the job of [parse_local_date](crate::timezone::parse_local_date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned, a non-negative magnitude.
    ///
    /// The persistence layer never derives or flips the sign of this number,
    /// that is solely the role of `transaction_type`.
    pub amount: f64,
    /// Whether the transaction is an income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// A free-text label grouping related transactions.
    pub category: String,
    /// When the transaction happened, as recorded by the caller.
    pub date: String,
}

/// The payload for creating a new [Transaction]: every field except the ID,
/// which is assigned by the provider or its backing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// Whether the transaction is an income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// A free-text label grouping related transactions.
    pub category: String,
    /// When the transaction happened.
    pub date: String,
}

impl TransactionDraft {
    /// Finalize the draft into a [Transaction] with the assigned `id`.
    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            description: self.description,
            amount: self.amount,
            transaction_type: self.transaction_type,
            category: self.category,
            date: self.date,
        }
    }
}

/// A partial update to an existing [Transaction].
///
/// Fields that are present overwrite the stored value, fields that are absent
/// are preserved. The ID of a transaction can never be changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionPatch {
    /// Replacement description, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Replacement amount, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Replacement transaction type, if any.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    /// Replacement category, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Replacement date, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl TransactionPatch {
    /// Whether the patch changes no fields at all.
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.transaction_type.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }

    /// Shallow-merge the patch into `transaction`.
    pub fn apply_to(&self, transaction: &mut Transaction) {
        if let Some(description) = &self.description {
            transaction.description = description.clone();
        }

        if let Some(amount) = self.amount {
            transaction.amount = amount;
        }

        if let Some(transaction_type) = self.transaction_type {
            transaction.transaction_type = transaction_type;
        }

        if let Some(category) = &self.category {
            transaction.category = category.clone();
        }

        if let Some(date) = &self.date {
            transaction.date = date.clone();
        }
    }
}
