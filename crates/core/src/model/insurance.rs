use super::opt_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hash evidence for one chunk of a carrier's data batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsuranceDataHash {
    pub batch_id: String,
    pub carrier_id: String,
    pub chunk_id: String,
    pub hash: String,
    #[serde(with = "opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub created_ts: Option<DateTime<Utc>>,
}

/// One page of extracted carrier records, held in the channel's private collection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsuranceData {
    pub page_number: u32,
    pub carrier_id: String,
    pub data_call_id: String,
    pub data_call_version: String,
    pub records: Vec<serde_json::Value>,
    #[serde(with = "opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub created_ts: Option<DateTime<Utc>>,
}

/// Public marker that a carrier has submitted data for a data call version.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsuranceRecordAudit {
    pub data_call_id: String,
    pub data_call_version: String,
    pub carrier_id: String,
}
