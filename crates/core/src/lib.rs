//! # Data-call core
//!
//! Business logic for the data-call ledger: the data call lifecycle and the reports, likes,
//! consents, extraction patterns and insurance records that hang off it.
//!
//! The crate is organised leaf-first:
//! - [`ledger`]: ordered key-value world state per channel (in memory or file backed)
//! - [`keys`] and [`codec`]: composite keys and JSON records
//! - [`context`]: the per-invocation transaction context
//! - [`repositories`]: one module per record family
//! - [`dispatch`] and [`network`]: the contract entry point and the hosted channels
//!
//! **No transport concerns**: the REST server and the CLI live in `api-rest` and `cli`.

pub mod codec;
pub mod config;
pub mod constants;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod keys;
pub mod ledger;
pub mod model;
pub mod network;
pub mod outcome;
pub mod partition;
pub mod repositories;

#[cfg(test)]
mod testing;

pub use config::CoreConfig;
pub use context::Identity;
pub use dispatch::{DataCallContract, Invocation, Operation, Response};
pub use error::{DataCallError, DataCallResult, KeyError, LedgerError, LedgerResult};
pub use network::Network;
pub use outcome::{DeclineReason, Outcome};
