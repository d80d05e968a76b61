//! Error types for the data generator.

use thiserror::Error;

/// Errors that can occur while bootstrapping or generating data.
#[derive(Error, Debug)]
pub enum DatagenError {
    /// PostgreSQL connection or query error.
    #[error("PostgreSQL error: {0}")]
    PostgreSQL(#[from] tokio_postgres::Error),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
