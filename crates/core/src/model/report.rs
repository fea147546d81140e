use super::opt_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportStatus {
    #[default]
    Candidate,
    Accepted,
    Published,
    Withheld,
}

impl ReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Candidate => "CANDIDATE",
            ReportStatus::Accepted => "ACCEPTED",
            ReportStatus::Published => "PUBLISHED",
            ReportStatus::Withheld => "WITHHELD",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A report delivered against one data call version, identified by its content hash.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Report {
    #[serde(rename = "dataCallID")]
    pub data_call_id: String,
    pub data_call_version: String,
    pub report_version: String,
    pub hash: String,
    pub status: ReportStatus,
    pub is_locked: bool,
    pub url: String,
    pub created_by: String,
    #[serde(with = "opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub created_ts: Option<DateTime<Utc>>,
    #[serde(with = "opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_ts: Option<DateTime<Utc>>,
}
