use std::path::PathBuf;

/// Errors raised by a ledger backend.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("failed to read ledger snapshot {path}: {source}", path = path.display())]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write ledger snapshot {path}: {source}", path = path.display())]
    SnapshotWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("ledger snapshot {path} is corrupt: {source}", path = path.display())]
    SnapshotCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize ledger snapshot: {0}")]
    SnapshotSerialize(serde_json::Error),
    #[error("unsupported ledger snapshot format version {0}")]
    UnsupportedSnapshotVersion(u32),
    #[error("ledger value under key {key:?} is not valid UTF-8")]
    NonUtf8Value { key: String },
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Errors raised while decoding a composite key.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("composite key is missing the version marker")]
    MissingVersion,
    #[error("unsupported composite key encoding version '{0}'")]
    UnsupportedVersion(String),
    #[error("unknown key space '{0}'")]
    UnknownSpace(String),
    #[error("malformed composite key: {0}")]
    Malformed(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum DataCallError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("locked: {0}")]
    Locked(String),
    #[error("invalid status: {0}")]
    InvalidStatus(String),
    #[error("{function} is not permitted for organisation type '{org_type}'")]
    AccessDenied { function: String, org_type: String },
    #[error("caller identity is missing the '{0}' attribute")]
    MissingIdentityAttribute(&'static str),
    #[error("Invalid Function: {0}")]
    UnknownOperation(String),
    #[error("{function}: incorrect number of arguments, expected {expected}")]
    ArgumentCount {
        function: &'static str,
        expected: usize,
    },
    #[error("{what} schema mismatch at {path}: {source}")]
    Decode {
        what: &'static str,
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize {what}: {source}")]
    Serialization {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid search expression: {0}")]
    Regex(#[from] regex::Error),
    #[error("unknown channel: {0}")]
    UnknownChannel(String),
    #[error("partition query failed: {0}")]
    Partition(#[from] crate::partition::PartitionError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
    #[error("key error: {0}")]
    Key(#[from] KeyError),
    #[error("transaction id error: {0}")]
    TxId(#[from] datacall_txid::TxIdError),
}

pub type DataCallResult<T> = std::result::Result<T, DataCallError>;
