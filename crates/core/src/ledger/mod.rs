//! Ledger backends.
//!
//! A [`Ledger`] is the world state of one channel: a flat, ordered key-value namespace plus
//! named private data collections. The contract never writes to a backend directly. It
//! accumulates a [`WriteBatch`] during an invocation and the batch is applied in one step
//! when the invocation succeeds.

mod file;
mod memory;

pub use file::FileLedger;
pub use memory::MemoryLedger;

use crate::error::LedgerResult;
use std::collections::BTreeMap;

/// Ordered key-value storage for one channel.
pub trait Ledger: Send {
    /// Read the committed value under `key`.
    fn get(&self, key: &str) -> LedgerResult<Option<Vec<u8>>>;

    /// Read every committed entry whose key starts with `prefix`, in key order.
    fn scan_prefix(&self, prefix: &str) -> LedgerResult<Vec<(String, Vec<u8>)>>;

    /// Read the committed value under `key` in the private collection `collection`.
    fn get_private(&self, collection: &str, key: &str) -> LedgerResult<Option<Vec<u8>>>;

    /// Apply a batch of writes atomically.
    fn apply(&mut self, batch: WriteBatch) -> LedgerResult<()>;
}

/// Buffered writes produced by one invocation.
///
/// A `None` public value is a delete.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    pub public: BTreeMap<String, Option<Vec<u8>>>,
    pub private: BTreeMap<String, BTreeMap<String, Vec<u8>>>,
}

impl WriteBatch {
    pub fn is_empty(&self) -> bool {
        self.public.is_empty() && self.private.is_empty()
    }

    pub fn len(&self) -> usize {
        self.public.len() + self.private.values().map(BTreeMap::len).sum::<usize>()
    }
}
