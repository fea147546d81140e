use super::opt_timestamp;
use super::{DataCall, ExtractionPattern, Report};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// DATA CALL QUERIES
// ============================================================================

/// `{id, version}` lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdAndVersion {
    pub id: String,
    pub version: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VersionsCriteria {
    pub id: String,
    pub start_index: usize,
    pub page_size: usize,
    pub status: String,
}

/// Criteria for `ListDataCallsByCriteria` and `SearchDataCalls`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListCriteria {
    pub start_index: usize,
    pub page_size: usize,
    pub version: String,
    pub status: String,
    pub search_key: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToggleCountRequest {
    pub original_status: String,
    pub new_status: String,
}

/// A data call listed with its engagement and latest report.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataCallExtended {
    #[serde(rename = "dataCalls")]
    pub data_call: DataCall,
    #[serde(rename = "reportsList")]
    pub reports: Vec<Report>,
    #[serde(rename = "NoOfConsents")]
    pub no_of_consents: i64,
    #[serde(rename = "NoOfLikes")]
    pub no_of_likes: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataCallList {
    #[serde(rename = "dataCallsList")]
    pub data_calls: Vec<DataCallExtended>,
    #[serde(rename = "totalNoOfRecords")]
    pub total_no_of_records: i64,
}

// ============================================================================
// LIKES, CONSENTS AND PARTITIONS
// ============================================================================

/// `{dataCallID, dataCallVersion}` reference.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataCallRef {
    #[serde(rename = "dataCallID")]
    pub data_call_id: String,
    pub data_call_version: String,
}

/// A remote channel/chaincode pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartitionRef {
    pub channel_name: String,
    pub chaincode_name: String,
}

/// Fan-out listing request: the local partition plus every listed channel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FanOutRequest {
    #[serde(rename = "dataCallID")]
    pub data_call_id: String,
    pub data_call_version: String,
    pub channel_list: Vec<PartitionRef>,
}

impl FanOutRequest {
    pub fn data_call(&self) -> DataCallRef {
        DataCallRef {
            data_call_id: self.data_call_id.clone(),
            data_call_version: self.data_call_version.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LikeLookup {
    pub like: super::Like,
    /// Accepted on the wire; lookups read the current channel only.
    #[serde(rename = "channelIDs")]
    pub channel_ids: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsentLookup {
    pub consent: super::Consent,
    #[serde(rename = "channelIDs")]
    pub channel_ids: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsentStatusUpdate {
    #[serde(rename = "dataCallID")]
    pub data_call_id: String,
    pub data_call_version: String,
    #[serde(rename = "carrierID")]
    pub carrier_id: String,
    pub status: String,
}

// ============================================================================
// REPORTS
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportKey {
    #[serde(rename = "dataCallID")]
    pub data_call_id: String,
    pub data_call_version: String,
    pub hash: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportCriteria {
    #[serde(rename = "dataCallID")]
    pub data_call_id: String,
    pub data_call_version: String,
    pub status: String,
    pub start_index: usize,
    pub page_size: usize,
}

// ============================================================================
// EXTRACTION PATTERNS
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractionPatternKey {
    #[serde(rename = "extractionPatternID")]
    pub extraction_pattern_id: String,
    pub db_type: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionPatternIds {
    pub id: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataCallPatternRequest {
    #[serde(rename = "dataCallID")]
    pub data_call_id: String,
    pub data_call_version: String,
    pub db_type: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCallPatternResponse {
    pub jurisdiction: String,
    pub is_set: bool,
    pub extraction_pattern: ExtractionPattern,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternIsSetResponse {
    pub is_set: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_pattern: Option<ExtractionPattern>,
}

// ============================================================================
// INSURANCE DATA
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsuranceDataRequest {
    pub channel_name: String,
    pub data_call_id: String,
    pub data_call_version: String,
    pub carrier_id: String,
    pub start_index: usize,
    pub page_size: usize,
    pub page_number: u32,
}

// ============================================================================
// EVENT PAYLOADS
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionPatternSpecified {
    pub data_call_id: String,
    pub data_call_version: String,
    #[serde(rename = "extractionPatternID")]
    pub extraction_pattern_id: String,
    #[serde(with = "opt_timestamp", skip_serializing_if = "Option::is_none", default)]
    pub ext_pattern_ts: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionalDataAvailable {
    pub channel_name: String,
    pub data_call_id: String,
    pub data_call_version: String,
    pub carrier_id: String,
    pub page_number: u32,
}
