use super::opt_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewDefinition {
    pub map: String,
    pub reduce: String,
}

/// A versioned extraction pattern, keyed by id and target database type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractionPattern {
    #[serde(rename = "extractionPatternID")]
    pub extraction_pattern_id: String,
    pub extraction_pattern_name: String,
    pub description: String,
    pub view_definition: ViewDefinition,
    #[serde(rename = "premiumFromdate")]
    pub premium_from_date: String,
    #[serde(rename = "lossFromdate")]
    pub loss_from_date: String,
    #[serde(rename = "jurisdication")]
    pub jurisdiction: String,
    pub insurance: String,
    pub db_type: String,
    pub version: String,
    pub is_active: bool,
    #[serde(with = "opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub effective_start_ts: Option<DateTime<Utc>>,
    #[serde(with = "opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub effective_end_ts: Option<DateTime<Utc>>,
    #[serde(with = "opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_ts: Option<DateTime<Utc>>,
    pub updated_by: String,
}
