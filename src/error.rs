//! Error types for the EMI service.

use crate::record::RecordId;
use crate::request::FieldViolation;
use std::fmt;
use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, EmiError>;

/// Errors that can occur while handling an EMI request.
#[derive(Error, Debug)]
pub enum EmiError {
    /// One or more request fields violate their constraint
    #[error("Validation failed: {}", join_violations(.0))]
    Validation(Vec<FieldViolation>),

    /// Request body or path could not be decoded
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Lookup by id or email found nothing
    #[error("EMI not found for {0}")]
    NotFound(NotFoundKey),

    /// The amortization formula has no defined result for the inputs
    #[error("Calculation failed: {0}")]
    Calculation(#[from] CalculationError),

    /// Failure from the persistence layer
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Failed to bind or serve the listener
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad environment configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A blocking task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(String),
}

/// The key a failed lookup was made with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundKey {
    Id(RecordId),
    Email(String),
}

impl fmt::Display for NotFoundKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundKey::Id(id) => write!(f, "ID: {}", id),
            NotFoundKey::Email(email) => write!(f, "email: {}", email),
        }
    }
}

/// Inputs for which the monthly installment is undefined.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculationError {
    #[error("loan value must be a positive finite number")]
    NonPositivePrincipal,

    #[error("interest rate must be a non-negative finite number")]
    NegativeRate,

    #[error("loan term must be at least one year")]
    NonPositiveTerm,

    #[error("installment is not representable as a monetary amount")]
    NonFinite,
}

/// Errors raised by an [`EmiRecordStore`](crate::store::EmiRecordStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite driver error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A writer panicked while holding the store lock
    #[error("store lock poisoned")]
    Poisoned,

    /// A persisted row could not be decoded
    #[error("corrupt record {id}: {message}")]
    Corrupt { id: RecordId, message: String },
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
