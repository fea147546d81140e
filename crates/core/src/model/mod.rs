//! Ledger record types and request/response documents.
//!
//! All types serialise to the camelCase JSON documents stored on the ledger and exchanged with
//! callers. Field spellings that look odd (`datacallID`, `jurisdication`, `NoOfLikes`) are part
//! of the stored format and are kept as-is.

mod audit;
mod data_call;
mod engagement;
mod extraction;
mod insurance;
mod report;
mod requests;

pub use audit::{DataCallLog, LogAction};
pub use data_call::{DataCall, DataCallCount, DataCallStatus};
pub use engagement::{Consent, ConsentCountEntry, ConsentListing, Like, LikeCountEntry, LikeListing};
pub use extraction::{ExtractionPattern, ViewDefinition};
pub use insurance::{InsuranceData, InsuranceDataHash, InsuranceRecordAudit};
pub use report::{Report, ReportStatus};
pub use requests::*;

/// Optional RFC3339 timestamps.
///
/// Absent, `null` and empty-string values all read as `None`. Values are written with
/// millisecond precision and a `Z` suffix, for example `2018-11-13T18:30:00.000Z`.
pub(crate) mod opt_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => DateTime::parse_from_rfc3339(text)
                .map(|ts| Some(ts.with_timezone(&Utc)))
                .map_err(de::Error::custom),
        }
    }
}
