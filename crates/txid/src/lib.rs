//! Transaction identifiers.
//!
//! Every ledger invocation runs under a transaction id. Ids are time-prefixed so that records
//! keyed by transaction id (audit log entries, like and consent count entries) sort in the
//! order the transactions ran.
//!
//! ## Format
//! `YYYYMMDDTHHMMSS.mmmZ-<32 lowercase hex>`
//!
//! Example:
//! `20260111T143522.045Z-550e8400e29b41d4a716446655440000`
//!
//! The random suffix keeps ids unique when two transactions share a millisecond. Callers that
//! persist the previous id can pass it to [`TxId::generate_at`] to get a strictly increasing
//! timestamp component across restarts.

mod service;

pub use service::TxId;

/// Error type for transaction id operations.
#[derive(Debug, thiserror::Error)]
pub enum TxIdError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for transaction id operations.
pub type TxIdResult<T> = Result<T, TxIdError>;
