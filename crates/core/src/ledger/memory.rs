use super::{Ledger, WriteBatch};
use crate::error::LedgerResult;
use std::collections::BTreeMap;

/// In-memory world state.
///
/// Used directly by tests and the REST server when no state directory is configured, and as
/// the working copy behind [`super::FileLedger`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryLedger {
    pub(super) state: BTreeMap<String, Vec<u8>>,
    pub(super) private: BTreeMap<String, BTreeMap<String, Vec<u8>>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}

impl Ledger for MemoryLedger {
    fn get(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        Ok(self.state.get(key).cloned())
    }

    fn scan_prefix(&self, prefix: &str) -> LedgerResult<Vec<(String, Vec<u8>)>> {
        Ok(self
            .state
            .range(prefix.to_owned()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn get_private(&self, collection: &str, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        Ok(self
            .private
            .get(collection)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    fn apply(&mut self, batch: WriteBatch) -> LedgerResult<()> {
        for (key, value) in batch.public {
            match value {
                Some(bytes) => {
                    self.state.insert(key, bytes);
                }
                None => {
                    self.state.remove(&key);
                }
            }
        }
        for (collection, entries) in batch.private {
            self.private.entry(collection).or_default().extend(entries);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_prefix_returns_sorted_matches_only() {
        let mut ledger = MemoryLedger::new();
        let mut batch = WriteBatch::default();
        batch.public.insert("ab2".into(), Some(b"2".to_vec()));
        batch.public.insert("ab1".into(), Some(b"1".to_vec()));
        batch.public.insert("ac".into(), Some(b"x".to_vec()));
        ledger.apply(batch).unwrap();

        let found = ledger.scan_prefix("ab").unwrap();
        let keys: Vec<_> = found.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["ab1", "ab2"]);
    }

    #[test]
    fn test_apply_deletes_and_private_writes() {
        let mut ledger = MemoryLedger::new();
        let mut batch = WriteBatch::default();
        batch.public.insert("k".into(), Some(b"v".to_vec()));
        batch
            .private
            .entry("ch_pdc".into())
            .or_default()
            .insert("p".into(), b"secret".to_vec());
        ledger.apply(batch).unwrap();

        let mut delete = WriteBatch::default();
        delete.public.insert("k".into(), None);
        ledger.apply(delete).unwrap();

        assert_eq!(ledger.get("k").unwrap(), None);
        assert_eq!(
            ledger.get_private("ch_pdc", "p").unwrap(),
            Some(b"secret".to_vec())
        );
        assert_eq!(ledger.get_private("other", "p").unwrap(), None);
    }
}
