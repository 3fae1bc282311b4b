//! Defines the endpoint paths of the JSON API.

/// The transaction collection: list and create.
pub const TRANSACTIONS: &str = "/api/transactions";

/// A single transaction: update and delete.
pub const TRANSACTION: &str = "/api/transactions/{id}";

/// The aggregate summary that drives the summary cards and report charts.
pub const SUMMARY: &str = "/api/summary";
