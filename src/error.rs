//! Defines the app level error type and its conversion to JSON API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A write was attempted in remote mode without an authenticated
    /// identity. No write is performed.
    #[error("user is not authenticated")]
    AuthenticationRequired,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the store")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the store")]
    DeleteMissingTransaction,

    /// A string did not match one of the transaction type variants.
    #[error("\"{0}\" is not a valid transaction type, expected \"income\" or \"expense\"")]
    InvalidTransactionType(String),

    /// A string did not match one of the period filter forms.
    #[error(
        "\"{0}\" is not a valid period filter, expected \"all\", \"30days\", \"thisMonth\" or \"YYYY-MM\""
    )]
    InvalidPeriodFilter(String),

    /// There was an error parsing a date string.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not parse date string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// An error occurred while reading from or writing to a storage slot.
    #[error("storage error: {0}")]
    StorageError(String),

    /// An error occurred while serializing or deserializing JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::StorageError(value.to_string())
    }
}

/// The JSON body sent for failed requests.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, message) = match self {
            Error::AuthenticationRequired => (StatusCode::UNAUTHORIZED, self.to_string()),
            Error::NotFound | Error::UpdateMissingTransaction | Error::DeleteMissingTransaction => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            Error::InvalidTransactionType(_)
            | Error::InvalidPeriodFilter(_)
            | Error::InvalidDateFormat(_, _) => (StatusCode::BAD_REQUEST, self.to_string()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                )
            }
        };

        (status_code, Json(ErrorBody { error: message })).into_response()
    }
}
