use super::opt_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An organisation's like of a data call version.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Like {
    #[serde(rename = "datacallID")]
    pub data_call_id: String,
    pub data_call_version: String,
    pub organization_type: String,
    #[serde(rename = "organizationID")]
    pub organization_id: String,
    #[serde(with = "opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_ts: Option<DateTime<Utc>>,
    pub updated_by: String,
    pub liked: bool,
}

/// Append-only delta applied to a data call's like count.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LikeCountEntry {
    #[serde(rename = "datacallID")]
    pub data_call_id: String,
    pub data_call_version: String,
    #[serde(with = "opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_ts: Option<DateTime<Utc>>,
    pub liked: bool,
    pub delta: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LikeListing {
    pub like: Like,
    pub organization_name: String,
}

/// A carrier's consent to take part in a data call version.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Consent {
    #[serde(rename = "datacallID")]
    pub data_call_id: String,
    pub data_call_version: String,
    #[serde(rename = "carrierID")]
    pub carrier_id: String,
    #[serde(with = "opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub created_ts: Option<DateTime<Utc>>,
    pub created_by: String,
    pub status: String,
}

/// Append-only delta applied to a data call's consent count.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsentCountEntry {
    #[serde(rename = "datacallID")]
    pub data_call_id: String,
    pub data_call_version: String,
    #[serde(with = "opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_ts: Option<DateTime<Utc>>,
    pub delta: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsentListing {
    pub consent: Consent,
    pub carrier_name: String,
}
