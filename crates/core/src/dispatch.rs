//! Contract entry point.
//!
//! An [`Invocation`] names an operation and carries its arguments. [`DataCallContract::invoke`]
//! checks the caller's access, runs the operation inside a [`TxContext`] and hands back an
//! [`Endorsement`]: the response plus the writes to commit. Nothing is written when the
//! operation fails.

use crate::codec;
use crate::config::CoreConfig;
use crate::constants::{ADVISORY_ORG_TYPE, CARRIER_ORG_TYPE, PING_RESPONSE};
use crate::context::{ChaincodeEvent, Identity, TxContext};
use crate::ledger::{Ledger, WriteBatch};
use crate::model::{
    Consent, ConsentCountEntry, ConsentLookup, ConsentStatusUpdate, DataCall, DataCallCount,
    DataCallLog, DataCallPatternRequest, DataCallRef, ExtractionPattern, ExtractionPatternIds,
    ExtractionPatternKey, FanOutRequest, IdAndVersion, InsuranceDataHash, InsuranceDataRequest,
    InsuranceRecordAudit, Like, LikeCountEntry, LikeLookup, ListCriteria, Report, ReportCriteria,
    ReportKey, ToggleCountRequest, VersionsCriteria,
};
use crate::outcome::{DeclineReason, Outcome};
use crate::partition::PartitionClient;
use crate::repositories::{
    audit_log, consents, counts, data_calls, extraction, insurance, likes, query, reports, reset,
};
use crate::{DataCallError, DataCallResult};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub const STATUS_OK: u16 = 200;
pub const STATUS_ERROR: u16 = 500;

// ============================================================================
// OPERATIONS
// ============================================================================

macro_rules! operations {
    ($($variant:ident),* $(,)?) => {
        /// Every operation the contract answers to, named as callers invoke it.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Operation {
            $($variant,)*
        }

        impl Operation {
            pub const ALL: &'static [Operation] = &[$(Operation::$variant,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(Operation::$variant => stringify!($variant),)*
                }
            }
        }
    };
}

operations! {
    Ping,
    CreateDataCall,
    SaveNewDraft,
    UpdateDataCall,
    IssueDataCall,
    SaveAndIssueDataCall,
    GetDataCallVersionsById,
    GetDataCallByIdAndVersion,
    ListDataCallsByCriteria,
    SearchDataCalls,
    ListMatureDataCalls,
    ToggleDataCallCount,
    GetDataCallCount,
    UpdateDataCallCount,
    ToggleLike,
    GetLikesByDataCall,
    ListLikesByDataCall,
    GetLikeByDataCallAndOrganization,
    CreateLikeCountEntry,
    CountLikes,
    UpdateLikeCountForDataCall,
    CreateConsent,
    UpdateConsentStatus,
    GetConsentsByDataCall,
    ListConsentsByDataCall,
    GetConsentByDataCallAndOrganization,
    CreateConsentCountEntry,
    CountConsents,
    UpdateConsentCountForDataCall,
    CreateReport,
    UpdateReport,
    ListReportsByCriteria,
    GetReportById,
    GetHighestOrderReportByDataCall,
    LogDataCallTransaction,
    GetDataCallTransactionHistory,
    ListDataCallTransactionHistory,
    CreateExtractionPattern,
    UpdateExtractionPattern,
    GetExtractionPatternById,
    GetExtractionPatternByIds,
    ListExtractionPatterns,
    GetDataCallAndExtractionPattern,
    CheckExtractionPatternIsSet,
    SaveInsuranceDataHash,
    GetHashById,
    SaveInsuranceData,
    CheckInsuranceDataExists,
    GetInsuranceData,
    ResetWorldState,
}

impl Operation {
    /// Organisation types allowed to call this operation, or `None` if any caller may.
    pub fn allowed_org_types(self) -> Option<&'static [&'static str]> {
        use Operation::*;
        match self {
            CreateExtractionPattern | UpdateExtractionPattern | CreateDataCall | SaveNewDraft
            | UpdateDataCall | IssueDataCall | CreateReport | UpdateReport => {
                Some(&[ADVISORY_ORG_TYPE])
            }
            ToggleLike | CreateConsent => Some(&[ADVISORY_ORG_TYPE, CARRIER_ORG_TYPE]),
            _ => None,
        }
    }

    pub fn permits(self, org_type: &str) -> bool {
        self.allowed_org_types()
            .map_or(true, |allowed| allowed.contains(&org_type))
    }

    /// Number of positional arguments the operation reads.
    pub fn arity(self) -> usize {
        use Operation::*;
        match self {
            Ping | ListMatureDataCalls | ListExtractionPatterns | SaveInsuranceData
            | ResetWorldState => 0,
            _ => 1,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = DataCallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.name() == s)
            .ok_or_else(|| DataCallError::UnknownOperation(s.to_owned()))
    }
}

// ============================================================================
// INVOCATIONS AND RESPONSES
// ============================================================================

/// One call into the contract.
#[derive(Clone, Debug, Default)]
pub struct Invocation {
    pub function: String,
    pub args: Vec<String>,
    pub identity: Identity,
    pub transient: BTreeMap<String, Vec<u8>>,
    /// Transaction time; the wall clock when `None`.
    pub timestamp: Option<DateTime<Utc>>,
}

impl Invocation {
    pub fn new(function: impl Into<String>, identity: Identity) -> Self {
        Self {
            function: function.into(),
            identity,
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Serialize `value` as the next JSON argument.
    pub fn json_arg<T: Serialize>(self, value: &T) -> DataCallResult<Self> {
        let bytes = codec::encode("argument", value)?;
        Ok(self.arg(String::from_utf8_lossy(&bytes).into_owned()))
    }

    pub fn transient(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.transient.insert(key.into(), value.into());
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Response envelope returned to callers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub message: String,
    pub payload: Vec<u8>,
    /// Set when the operation succeeded but refused the request.
    pub declined: Option<DeclineReason>,
    pub events: Vec<ChaincodeEvent>,
    pub tx_id: Option<String>,
}

impl Response {
    pub fn error(err: &DataCallError) -> Self {
        Self {
            status: STATUS_ERROR,
            message: err.to_string(),
            payload: Vec::new(),
            declined: None,
            events: Vec::new(),
            tx_id: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    pub fn payload_str(&self) -> &str {
        std::str::from_utf8(&self.payload).unwrap_or_default()
    }
}

/// A successful invocation: its response and the writes to commit.
#[derive(Debug)]
pub struct Endorsement {
    pub response: Response,
    pub writes: WriteBatch,
}

enum Reply {
    Payload(Vec<u8>),
    Declined(DeclineReason),
}

fn empty() -> DataCallResult<Reply> {
    Ok(Reply::Payload(Vec::new()))
}

fn json<T: Serialize>(value: &T) -> DataCallResult<Reply> {
    Ok(Reply::Payload(codec::encode("response", value)?))
}

/// An absent record answers with an empty payload.
fn json_opt<T: Serialize>(value: Option<T>) -> DataCallResult<Reply> {
    match value {
        Some(v) => json(&v),
        None => empty(),
    }
}

fn outcome<T>(result: Outcome<T>) -> DataCallResult<Reply> {
    match result {
        Outcome::Completed(_) => empty(),
        Outcome::Declined(reason) => Ok(Reply::Declined(reason)),
    }
}

fn decode_arg<T: DeserializeOwned>(op: Operation, args: &[String]) -> DataCallResult<T> {
    let raw = args.first().ok_or(DataCallError::ArgumentCount {
        function: op.name(),
        expected: 1,
    })?;
    codec::decode(op.name(), raw.as_bytes())
}

// ============================================================================
// CONTRACT
// ============================================================================

/// The data-call contract.
#[derive(Clone, Debug)]
pub struct DataCallContract {
    cfg: Arc<CoreConfig>,
}

impl DataCallContract {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    /// Run `invocation` against `ledger`, the committed state of `channel`.
    ///
    /// # Arguments
    ///
    /// * `channel` - Channel the invocation runs on.
    /// * `ledger` - Committed state of that channel.
    /// * `peers` - Client for queries against other channels.
    /// * `invocation` - Operation name, arguments and caller.
    ///
    /// # Returns
    ///
    /// The response and the writes to apply to `ledger`.
    ///
    /// # Errors
    ///
    /// Returns a [`DataCallError`] if the caller is not allowed to run the operation, the
    /// operation is unknown or its arguments are invalid, or the operation itself fails.
    pub fn invoke(
        &self,
        channel: &str,
        ledger: &dyn Ledger,
        peers: &dyn PartitionClient,
        invocation: Invocation,
    ) -> DataCallResult<Endorsement> {
        let org_type = invocation.identity.org_type()?.to_owned();
        let operation: Operation = invocation.function.parse()?;
        if !operation.permits(&org_type) {
            return Err(DataCallError::AccessDenied {
                function: operation.name().to_owned(),
                org_type,
            });
        }
        if invocation.args.len() < operation.arity() {
            return Err(DataCallError::ArgumentCount {
                function: operation.name(),
                expected: operation.arity(),
            });
        }

        let now = invocation.timestamp.unwrap_or_else(Utc::now);
        let mut ctx = TxContext::begin(
            ledger,
            channel,
            invocation.identity,
            invocation.transient,
            now,
        )?;
        let tx_id = ctx.tx_id().to_string();
        tracing::info!(%operation, %channel, %tx_id, "invoke");

        let reply = match self.dispatch(&mut ctx, peers, operation, &invocation.args) {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(%operation, %tx_id, error = %err, "invocation failed");
                return Err(err);
            }
        };
        let (writes, events) = ctx.finish()?;

        let (message, payload, declined) = match reply {
            Reply::Payload(payload) => (String::new(), payload, None),
            Reply::Declined(reason) => {
                tracing::info!(%operation, %tx_id, %reason, "request declined");
                (reason.message().to_owned(), reason.payload(), Some(reason))
            }
        };
        Ok(Endorsement {
            response: Response {
                status: STATUS_OK,
                message,
                payload,
                declined,
                events,
                tx_id: Some(tx_id),
            },
            writes,
        })
    }

    fn dispatch(
        &self,
        ctx: &mut TxContext<'_>,
        peers: &dyn PartitionClient,
        operation: Operation,
        args: &[String],
    ) -> DataCallResult<Reply> {
        let cfg = self.cfg.as_ref();
        match operation {
            Operation::Ping => Ok(Reply::Payload(PING_RESPONSE.as_bytes().to_vec())),

            // Lifecycle
            Operation::CreateDataCall => {
                data_calls::create_data_call(ctx, decode_arg::<DataCall>(operation, args)?)?;
                empty()
            }
            Operation::SaveNewDraft => {
                data_calls::save_new_draft(ctx, decode_arg::<DataCall>(operation, args)?)?;
                empty()
            }
            Operation::UpdateDataCall => {
                data_calls::update_data_call(ctx, decode_arg::<DataCall>(operation, args)?)?;
                empty()
            }
            Operation::IssueDataCall => {
                data_calls::issue_data_call(ctx, decode_arg::<DataCall>(operation, args)?)?;
                empty()
            }
            Operation::SaveAndIssueDataCall => {
                data_calls::save_and_issue(ctx, decode_arg::<DataCall>(operation, args)?)?;
                empty()
            }
            Operation::GetDataCallVersionsById => {
                let criteria: VersionsCriteria = decode_arg(operation, args)?;
                json(&data_calls::versions_by_id(&*ctx, &criteria)?)
            }
            Operation::GetDataCallByIdAndVersion => {
                let request: IdAndVersion = decode_arg(operation, args)?;
                json_opt(data_calls::get_by_id_and_version(&*ctx, &request)?)
            }

            // Listing
            Operation::ListDataCallsByCriteria => {
                let criteria: ListCriteria = decode_arg(operation, args)?;
                json(&query::list_by_criteria(&*ctx, &criteria)?)
            }
            Operation::SearchDataCalls => {
                let criteria: ListCriteria = decode_arg(operation, args)?;
                json(&query::search(&*ctx, &criteria)?)
            }
            Operation::ListMatureDataCalls => {
                let now = ctx.timestamp();
                json(&query::list_mature(&*ctx, now)?)
            }

            // Counters
            Operation::ToggleDataCallCount => {
                counts::toggle_request(ctx, decode_arg::<ToggleCountRequest>(operation, args)?)?;
                empty()
            }
            Operation::GetDataCallCount => {
                let request: IdAndVersion = decode_arg(operation, args)?;
                json_opt(counts::get(&*ctx, &request)?)
            }
            Operation::UpdateDataCallCount => {
                counts::overwrite(ctx, decode_arg::<DataCallCount>(operation, args)?)?;
                empty()
            }

            // Likes
            Operation::ToggleLike => {
                likes::toggle(ctx, cfg, peers, decode_arg::<Like>(operation, args)?)?;
                empty()
            }
            Operation::GetLikesByDataCall => {
                let request: DataCallRef = decode_arg(operation, args)?;
                json(&likes::by_data_call(&*ctx, &request)?)
            }
            Operation::ListLikesByDataCall => {
                let request: FanOutRequest = decode_arg(operation, args)?;
                json(&likes::list_by_data_call(ctx, peers, &request)?)
            }
            Operation::GetLikeByDataCallAndOrganization => {
                let request: LikeLookup = decode_arg(operation, args)?;
                json(&likes::by_organization(&*ctx, &request)?)
            }
            Operation::CreateLikeCountEntry => {
                likes::create_count_entry(ctx, decode_arg::<LikeCountEntry>(operation, args)?)?;
                empty()
            }
            Operation::CountLikes => {
                let request: LikeCountEntry = decode_arg(operation, args)?;
                json(&likes::count(&*ctx, request)?)
            }
            Operation::UpdateLikeCountForDataCall => {
                let request: DataCallRef = decode_arg(operation, args)?;
                likes::update_count_for_data_call(ctx, &request)?;
                empty()
            }

            // Consents
            Operation::CreateConsent => {
                let consent: Consent = decode_arg(operation, args)?;
                outcome(consents::create(ctx, cfg, peers, consent)?)
            }
            Operation::UpdateConsentStatus => {
                let request: ConsentStatusUpdate = decode_arg(operation, args)?;
                consents::update_status(ctx, &request)?;
                empty()
            }
            Operation::GetConsentsByDataCall => {
                let request: DataCallRef = decode_arg(operation, args)?;
                json(&consents::by_data_call(&*ctx, &request)?)
            }
            Operation::ListConsentsByDataCall => {
                let request: FanOutRequest = decode_arg(operation, args)?;
                json(&consents::list_by_data_call(ctx, peers, &request)?)
            }
            Operation::GetConsentByDataCallAndOrganization => {
                let request: ConsentLookup = decode_arg(operation, args)?;
                json(&consents::by_carrier(&*ctx, &request)?)
            }
            Operation::CreateConsentCountEntry => {
                let entry: ConsentCountEntry = decode_arg(operation, args)?;
                consents::create_count_entry(ctx, entry)?;
                empty()
            }
            Operation::CountConsents => {
                let request: ConsentCountEntry = decode_arg(operation, args)?;
                json(&consents::count(&*ctx, request)?)
            }
            Operation::UpdateConsentCountForDataCall => {
                let request: DataCallRef = decode_arg(operation, args)?;
                consents::update_count_for_data_call(ctx, &request)?;
                empty()
            }

            // Reports
            Operation::CreateReport => {
                outcome(reports::create(ctx, decode_arg::<Report>(operation, args)?)?)
            }
            Operation::UpdateReport => {
                outcome(reports::update(ctx, decode_arg::<Report>(operation, args)?)?)
            }
            Operation::ListReportsByCriteria => {
                let criteria: ReportCriteria = decode_arg(operation, args)?;
                json(&reports::list(&*ctx, &criteria)?)
            }
            Operation::GetReportById => {
                let request: ReportKey = decode_arg(operation, args)?;
                json_opt(reports::get(&*ctx, &request)?)
            }
            Operation::GetHighestOrderReportByDataCall => {
                let request: DataCallRef = decode_arg(operation, args)?;
                json(&reports::highest_order(&*ctx, &request)?)
            }

            // Transaction log
            Operation::LogDataCallTransaction => {
                let entry: DataCallLog = decode_arg(operation, args)?;
                audit_log::append(ctx, &entry)?;
                empty()
            }
            Operation::GetDataCallTransactionHistory => {
                let request: DataCallRef = decode_arg(operation, args)?;
                json(&audit_log::history(&*ctx, &request)?)
            }
            Operation::ListDataCallTransactionHistory => {
                let request: DataCallRef = decode_arg(operation, args)?;
                json(&audit_log::history_by_action_time(&*ctx, &request)?)
            }

            // Extraction patterns
            Operation::CreateExtractionPattern => {
                extraction::create(ctx, decode_arg::<ExtractionPattern>(operation, args)?)?;
                empty()
            }
            Operation::UpdateExtractionPattern => {
                extraction::update(ctx, decode_arg::<ExtractionPattern>(operation, args)?)?;
                empty()
            }
            Operation::GetExtractionPatternById => {
                let request: ExtractionPatternKey = decode_arg(operation, args)?;
                json_opt(extraction::get(&*ctx, &request)?)
            }
            Operation::GetExtractionPatternByIds => {
                let request: ExtractionPatternIds = decode_arg(operation, args)?;
                json(&extraction::get_by_ids(&*ctx, &request)?)
            }
            Operation::ListExtractionPatterns => json(&extraction::list_active(&*ctx)?),
            Operation::GetDataCallAndExtractionPattern => {
                let request: DataCallPatternRequest = decode_arg(operation, args)?;
                json(&extraction::data_call_and_pattern(&*ctx, &request)?)
            }
            Operation::CheckExtractionPatternIsSet => {
                let request: IdAndVersion = decode_arg(operation, args)?;
                json(&extraction::check_is_set(ctx, cfg, peers, &request)?)
            }

            // Insurance data
            Operation::SaveInsuranceDataHash => {
                insurance::save_hash(ctx, decode_arg::<InsuranceDataHash>(operation, args)?)?;
                empty()
            }
            Operation::GetHashById => {
                let request: InsuranceDataHash = decode_arg(operation, args)?;
                json_opt(insurance::get_hash(&*ctx, &request)?)
            }
            Operation::SaveInsuranceData => {
                insurance::save_data(ctx)?;
                empty()
            }
            Operation::CheckInsuranceDataExists => {
                let request: InsuranceRecordAudit = decode_arg(operation, args)?;
                let exists = insurance::data_exists(&*ctx, &request)?;
                Ok(Reply::Payload(exists.to_string().into_bytes()))
            }
            Operation::GetInsuranceData => {
                let request: InsuranceDataRequest = decode_arg(operation, args)?;
                json_opt(insurance::get_data(ctx, &request)?)
            }

            Operation::ResetWorldState => {
                let deleted = reset::reset_world_state(ctx)?;
                Ok(Reply::Payload(deleted.to_string().into_bytes()))
            }
        }
    }
}
