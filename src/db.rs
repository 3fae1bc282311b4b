//! This module defines and implements traits for interacting with the
//! application's database.

use rusqlite::{Connection, Error, Row};

use crate::models::Transaction;

/// Create the tables for the domain models in the application database.
///
/// # Errors
/// Returns an error if there is an SQL error.
///
/// # Examples
/// ```
/// use rusqlite::Connection;
///
/// let connection = Connection::open_in_memory().unwrap();
/// finflow::db::initialize(&connection).unwrap();
/// ```
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    Transaction::create_table(connection)
}

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create a table for the model.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), Error>;
}

/// A trait for mapping from a `rusqlite::Row` from a SQLite database to a
/// concrete rust type.
pub trait MapRow {
    /// The type that the implementation maps a row to.
    type ReturnType;

    /// Convert a row into a concrete type, assuming the row's columns start
    /// at the first column.
    ///
    /// # Errors
    /// Returns an error if a row value could not be read.
    fn map_row(row: &Row) -> Result<Self::ReturnType, Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into a concrete type, with the row's columns starting at
    /// `offset`.
    ///
    /// # Errors
    /// Returns an error if a row value could not be read.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, Error>;
}
