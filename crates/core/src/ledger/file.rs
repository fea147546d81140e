use super::memory::MemoryLedger;
use super::{Ledger, WriteBatch};
use crate::error::{LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// World state persisted as a JSON snapshot file.
///
/// Every applied batch rewrites the snapshot through a temporary file and a rename, so a crash
/// leaves either the old or the new state on disk. Values are JSON documents and are stored as
/// text.
#[derive(Debug)]
pub struct FileLedger {
    path: PathBuf,
    inner: MemoryLedger,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    format_version: u32,
    state: BTreeMap<String, String>,
    #[serde(default)]
    private: BTreeMap<String, BTreeMap<String, String>>,
}

impl FileLedger {
    /// Open the snapshot at `path`, starting empty if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> LedgerResult<Self> {
        let path = path.into();
        let inner = if path.exists() {
            load_snapshot(&path)?
        } else {
            MemoryLedger::new()
        };
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, ledger: &MemoryLedger) -> LedgerResult<()> {
        let snapshot = Snapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            state: to_text_map(&ledger.state)?,
            private: ledger
                .private
                .iter()
                .map(|(name, entries)| Ok((name.clone(), to_text_map(entries)?)))
                .collect::<LedgerResult<_>>()?,
        };
        let bytes =
            serde_json::to_vec_pretty(&snapshot).map_err(LedgerError::SnapshotSerialize)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| LedgerError::SnapshotWrite {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(|source| LedgerError::SnapshotWrite {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| LedgerError::SnapshotWrite {
            path: self.path.clone(),
            source,
        })
    }
}

fn load_snapshot(path: &Path) -> LedgerResult<MemoryLedger> {
    let bytes = fs::read(path).map_err(|source| LedgerError::SnapshotRead {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot: Snapshot =
        serde_json::from_slice(&bytes).map_err(|source| LedgerError::SnapshotCorrupt {
            path: path.to_path_buf(),
            source,
        })?;
    if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
        return Err(LedgerError::UnsupportedSnapshotVersion(
            snapshot.format_version,
        ));
    }

    Ok(MemoryLedger {
        state: from_text_map(snapshot.state),
        private: snapshot
            .private
            .into_iter()
            .map(|(name, entries)| (name, from_text_map(entries)))
            .collect(),
    })
}

fn to_text_map(entries: &BTreeMap<String, Vec<u8>>) -> LedgerResult<BTreeMap<String, String>> {
    entries
        .iter()
        .map(|(key, value)| {
            let text = String::from_utf8(value.clone())
                .map_err(|_| LedgerError::NonUtf8Value { key: key.clone() })?;
            Ok((key.clone(), text))
        })
        .collect()
}

fn from_text_map(entries: BTreeMap<String, String>) -> BTreeMap<String, Vec<u8>> {
    entries
        .into_iter()
        .map(|(key, value)| (key, value.into_bytes()))
        .collect()
}

impl Ledger for FileLedger {
    fn get(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn scan_prefix(&self, prefix: &str) -> LedgerResult<Vec<(String, Vec<u8>)>> {
        self.inner.scan_prefix(prefix)
    }

    fn get_private(&self, collection: &str, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        self.inner.get_private(collection, key)
    }

    fn apply(&mut self, batch: WriteBatch) -> LedgerResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut next = self.inner.clone();
        next.apply(batch)?;
        self.persist(&next)?;
        self.inner = next;
        Ok(())
    }
}
