use super::opt_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle actions recorded in the data-call transaction log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogAction {
    Issued,
    DeliveryDateUpdated,
    CandidateReportDelivered,
    ReportAccepted,
    ReportPublished,
    ReportWithheld,
}

impl LogAction {
    pub fn action_id(self) -> &'static str {
        match self {
            LogAction::Issued => "DATA_CALL_ISSUED",
            LogAction::DeliveryDateUpdated => "DATA_CALL_DELIVERY_DATE_UPDATED",
            LogAction::CandidateReportDelivered => "DATA_CALL_CANDIDATE_REPORT_DELIVERED",
            LogAction::ReportAccepted => "DATA_CALL_ACCEPTED",
            LogAction::ReportPublished => "DATA_CALL_PUBLISHED",
            LogAction::ReportWithheld => "DATA_CALL_WITHHELD",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            LogAction::Issued => "Data Call Issued.",
            LogAction::DeliveryDateUpdated => "Report Delivery Date Updated.",
            LogAction::CandidateReportDelivered => "Candidate Report Delivered.",
            LogAction::ReportAccepted => "Report Accepted.",
            LogAction::ReportPublished => "Report Published.",
            LogAction::ReportWithheld => "Report Withheld.",
        }
    }
}

/// Append-only audit entry for a data call version.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataCallLog {
    #[serde(rename = "dataCallID")]
    pub data_call_id: String,
    pub data_call_version: String,
    #[serde(rename = "actionID")]
    pub action_id: String,
    pub action: String,
    #[serde(with = "opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub action_ts: Option<DateTime<Utc>>,
    pub updated_by: String,
}

impl DataCallLog {
    pub fn new(
        data_call_id: &str,
        data_call_version: &str,
        action: LogAction,
        action_ts: Option<DateTime<Utc>>,
        updated_by: &str,
    ) -> Self {
        Self {
            data_call_id: data_call_id.to_owned(),
            data_call_version: data_call_version.to_owned(),
            action_id: action.action_id().to_owned(),
            action: action.description().to_owned(),
            action_ts,
            updated_by: updated_by.to_owned(),
        }
    }
}
