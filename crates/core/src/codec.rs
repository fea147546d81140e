//! JSON codec for ledger records and invocation arguments.
//!
//! Decoding goes through `serde_path_to_error` so a failure names the field that did not match
//! (for example `deadline` or `channelList[1].channelName`).

use crate::model::{
    Consent, ConsentCountEntry, DataCall, DataCallCount, DataCallLog, ExtractionPattern,
    InsuranceData, InsuranceDataHash, InsuranceRecordAudit, Like, LikeCountEntry, Report,
};
use crate::{DataCallError, DataCallResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A document stored on the ledger.
pub trait Record: Serialize + DeserializeOwned {
    /// Human-readable record kind used in error messages.
    const KIND: &'static str;
}

macro_rules! impl_record {
    ($($ty:ty => $kind:literal),* $(,)?) => {
        $(impl Record for $ty {
            const KIND: &'static str = $kind;
        })*
    };
}

impl_record! {
    DataCall => "data call",
    DataCallCount => "data call count",
    DataCallLog => "data call log",
    Report => "report",
    Like => "like",
    LikeCountEntry => "like count entry",
    Consent => "consent",
    ConsentCountEntry => "consent count entry",
    ExtractionPattern => "extraction pattern",
    InsuranceDataHash => "insurance data hash",
    InsuranceData => "insurance data",
    InsuranceRecordAudit => "insurance record audit",
}

/// Decode a JSON document, reporting the failing path on mismatch.
///
/// # Errors
///
/// Returns [`DataCallError::Decode`] if `bytes` is not valid JSON for `T`, or has trailing
/// content after the document.
pub fn decode<T: DeserializeOwned>(what: &'static str, bytes: &[u8]) -> DataCallResult<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let value = match serde_path_to_error::deserialize::<_, T>(&mut deserializer) {
        Ok(parsed) => parsed,
        Err(err) => {
            let path = err.path().to_string();
            let source = err.into_inner();
            let path = if path.is_empty() || path == "." {
                "<root>".to_owned()
            } else {
                path
            };
            return Err(DataCallError::Decode { what, path, source });
        }
    };
    deserializer
        .end()
        .map_err(|source| DataCallError::Decode {
            what,
            path: "<root>".into(),
            source,
        })?;
    Ok(value)
}

pub fn encode<T: Serialize + ?Sized>(what: &'static str, value: &T) -> DataCallResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|source| DataCallError::Serialization { what, source })
}
