//! Implements the SQLite backed transaction table: the hosted single
//! relational table behind the remote provider.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Row, params_from_iter, types::Value};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Transaction, TransactionDraft, TransactionId, TransactionPatch, UserId},
    providers::TransactionTable,
};

/// Stores transaction rows in a SQLite database, one row per transaction,
/// each tagged with its owner identity reference.
///
/// The table assigns IDs on insert and reports affected-row counts, so the
/// remote provider can surface not-found outcomes on update and delete.
#[derive(Debug, Clone)]
pub struct SqliteTransactionTable {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteTransactionTable {
    /// Create a new table store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|_| Error::DatabaseLockError)
    }
}

impl TransactionTable for SqliteTransactionTable {
    /// Retrieve all transaction rows ordered by date descending.
    ///
    /// An empty vector is returned if the table has no rows.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL
    /// error.
    async fn select_all(&self) -> Result<Vec<Transaction>, Error> {
        self.connection()?
            .prepare(
                "SELECT id, description, amount, type, category, date FROM transactions
                 ORDER BY date DESC",
            )?
            .query_map((), Transaction::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    /// Insert a new transaction row owned by `owner`, assigning a fresh ID.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL
    /// error.
    async fn insert(&self, owner: &UserId, draft: &TransactionDraft) -> Result<(), Error> {
        let id = TransactionId::random();

        self.connection()?.execute(
            "INSERT INTO transactions (id, description, amount, type, category, date, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                id.as_str(),
                &draft.description,
                draft.amount,
                draft.transaction_type.to_string(),
                &draft.category,
                &draft.date,
                owner.as_str(),
            ),
        )?;

        Ok(())
    }

    /// Merge-update the row matching `id` with the present fields of `patch`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::UpdateMissingTransaction] if `id` does not match a row,
    /// - or [Error::SqlError] if there is an SQL error.
    async fn update(&self, id: &TransactionId, patch: &TransactionPatch) -> Result<(), Error> {
        let connection = self.connection()?;

        if patch.is_empty() {
            // Nothing to write, but the not-found contract still holds.
            let exists: bool = connection
                .prepare("SELECT EXISTS(SELECT 1 FROM transactions WHERE id = ?1)")?
                .query_row([id.as_str()], |row| row.get(0))?;

            return if exists {
                Ok(())
            } else {
                Err(Error::UpdateMissingTransaction)
            };
        }

        let mut set_parts = Vec::new();
        let mut parameters: Vec<Value> = Vec::new();

        if let Some(description) = &patch.description {
            parameters.push(Value::Text(description.clone()));
            set_parts.push(format!("description = ?{}", parameters.len()));
        }

        if let Some(amount) = patch.amount {
            parameters.push(Value::Real(amount));
            set_parts.push(format!("amount = ?{}", parameters.len()));
        }

        if let Some(transaction_type) = patch.transaction_type {
            parameters.push(Value::Text(transaction_type.to_string()));
            set_parts.push(format!("type = ?{}", parameters.len()));
        }

        if let Some(category) = &patch.category {
            parameters.push(Value::Text(category.clone()));
            set_parts.push(format!("category = ?{}", parameters.len()));
        }

        if let Some(date) = &patch.date {
            parameters.push(Value::Text(date.clone()));
            set_parts.push(format!("date = ?{}", parameters.len()));
        }

        parameters.push(Value::Text(id.to_string()));
        let statement = format!(
            "UPDATE transactions SET {} WHERE id = ?{}",
            set_parts.join(", "),
            parameters.len()
        );

        let affected = connection.execute(&statement, params_from_iter(parameters.iter()))?;

        if affected == 0 {
            return Err(Error::UpdateMissingTransaction);
        }

        Ok(())
    }

    /// Remove the row matching `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DeleteMissingTransaction] if `id` does not match a row,
    /// - or [Error::SqlError] if there is an SQL error.
    async fn delete(&self, id: &TransactionId) -> Result<(), Error> {
        let affected = self
            .connection()?
            .execute("DELETE FROM transactions WHERE id = ?1", [id.as_str()])?;

        if affected == 0 {
            return Err(Error::DeleteMissingTransaction);
        }

        Ok(())
    }
}

impl CreateTable for Transaction {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS transactions (
                    id TEXT PRIMARY KEY,
                    description TEXT NOT NULL,
                    amount REAL NOT NULL,
                    type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                    category TEXT NOT NULL,
                    date TEXT NOT NULL,
                    user_id TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for Transaction {
    type ReturnType = Self;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
        let type_text: String = row.get(offset + 3)?;
        let transaction_type = type_text.parse().map_err(|error: Error| {
            rusqlite::Error::FromSqlConversionFailure(
                offset + 3,
                rusqlite::types::Type::Text,
                Box::new(error),
            )
        })?;

        Ok(Self {
            id: TransactionId::new(row.get::<_, String>(offset)?),
            description: row.get(offset + 1)?,
            amount: row.get(offset + 2)?,
            transaction_type,
            category: row.get(offset + 4)?,
            date: row.get(offset + 5)?,
        })
    }
}
