use super::opt_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a data call version.
///
/// `ABANDONED` is accepted on input but the lifecycle never moves a data call into it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataCallStatus {
    #[default]
    Draft,
    Issued,
    Cancelled,
    Abandoned,
}

impl DataCallStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DataCallStatus::Draft => "DRAFT",
            DataCallStatus::Issued => "ISSUED",
            DataCallStatus::Cancelled => "CANCELLED",
            DataCallStatus::Abandoned => "ABANDONED",
        }
    }

    /// Issued and cancelled data calls are locked against edits.
    pub fn locks_on_create(self) -> bool {
        matches!(self, DataCallStatus::Issued | DataCallStatus::Cancelled)
    }
}

impl fmt::Display for DataCallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataCallStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "DRAFT" => Ok(DataCallStatus::Draft),
            "ISSUED" => Ok(DataCallStatus::Issued),
            "CANCELLED" => Ok(DataCallStatus::Cancelled),
            "ABANDONED" => Ok(DataCallStatus::Abandoned),
            other => Err(other.to_owned()),
        }
    }
}

/// One version of a data call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataCall {
    pub id: String,
    pub version: String,
    pub name: String,
    pub intent_to_publish: bool,
    pub is_locked: bool,
    pub is_latest: bool,
    pub is_show_participants: bool,
    pub description: String,
    pub purpose: String,
    pub line_of_business: String,
    #[serde(with = "opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(with = "opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub premium_from_date: Option<DateTime<Utc>>,
    #[serde(with = "opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub premium_to_date: Option<DateTime<Utc>>,
    #[serde(with = "opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub loss_from_date: Option<DateTime<Utc>>,
    #[serde(with = "opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub loss_to_date: Option<DateTime<Utc>>,
    pub jurisdiction: String,
    #[serde(with = "opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub proposed_delivery_date: Option<DateTime<Utc>>,
    pub updated_by: String,
    #[serde(with = "opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_ts: Option<DateTime<Utc>>,
    pub detailed_criteria: String,
    pub eligibility_requirement: String,
    pub status: DataCallStatus,
    #[serde(rename = "type")]
    pub call_type: String,
    pub comments: String,
    #[serde(rename = "forumURL")]
    pub forum_url: String,
    pub like_count: i64,
    pub consent_count: i64,
    pub extraction_pattern_name: String,
    #[serde(rename = "extractionPatternID")]
    pub extraction_pattern_id: String,
    #[serde(with = "opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub extraction_pattern_ts: Option<DateTime<Utc>>,
}

/// Singleton aggregate of data calls per status.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataCallCount {
    pub id: String,
    pub version: String,
    pub issued: i64,
    pub draft: i64,
    pub cancelled: i64,
}

impl DataCallCount {
    /// The counter field for `status`, if that status is counted.
    pub fn field_mut(&mut self, status: DataCallStatus) -> Option<&mut i64> {
        match status {
            DataCallStatus::Draft => Some(&mut self.draft),
            DataCallStatus::Issued => Some(&mut self.issued),
            DataCallStatus::Cancelled => Some(&mut self.cancelled),
            DataCallStatus::Abandoned => None,
        }
    }

    pub fn get(&self, status: DataCallStatus) -> i64 {
        match status {
            DataCallStatus::Draft => self.draft,
            DataCallStatus::Issued => self.issued,
            DataCallStatus::Cancelled => self.cancelled,
            DataCallStatus::Abandoned => 0,
        }
    }
}
