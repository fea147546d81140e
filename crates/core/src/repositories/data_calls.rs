//! Data call lifecycle.
//!
//! A data call is stored once per version under `DataCall / <id> / <version>`. Versions move
//! through a small state machine:
//!
//! - `DRAFT -> ISSUED` via [`issue_data_call`]
//! - `DRAFT -> CANCELLED` via [`update_data_call`]
//! - `ISSUED -> ISSUED` for delivery-date, forum and extraction-pattern edits
//!
//! Issuing or cancelling locks every version of the id. At most one version carries
//! `isLatest = true`. Every stored status change moves the data call between the per-status
//! counters in [`super::counts`] within the same transaction.

use super::{audit_log, counts, parse_version, required};
use crate::config::CoreConfig;
use crate::constants::EVENT_EXTRACTION_PATTERN_SPECIFIED;
use crate::context::{get_record, scan_records, StateRead, TxContext};
use crate::keys;
use crate::model::{
    DataCall, DataCallLog, DataCallStatus, ExtractionPatternSpecified, IdAndVersion, LogAction,
    PartitionRef, VersionsCriteria,
};
use crate::partition::PartitionClient;
use crate::{DataCallError, DataCallResult};
use datacall_types::RecordVersion;

const LOCKED_MESSAGE: &str = "DataCall is Locked, as it has already been Issued or Cancelled";

// ============================================================================
// READS
// ============================================================================

/// Every stored version of `id`, in key order.
pub fn all_versions<R: StateRead + ?Sized>(state: &R, id: &str) -> DataCallResult<Vec<DataCall>> {
    scan_records(state, &keys::data_call_versions(id))
}

pub fn find<R: StateRead + ?Sized>(
    state: &R,
    id: &str,
    version: &str,
) -> DataCallResult<Option<DataCall>> {
    get_record(state, &keys::data_call(id, version))
}

/// `GetDataCallByIdAndVersion`.
pub fn get_by_id_and_version<R: StateRead + ?Sized>(
    state: &R,
    request: &IdAndVersion,
) -> DataCallResult<Option<DataCall>> {
    if request.id.trim().is_empty() || request.version.trim().is_empty() {
        return Err(DataCallError::InvalidInput(
            "ID and Version can not be Empty".into(),
        ));
    }
    find(state, &request.id, &request.version)
}

/// `GetDataCallVersionsById`: versions newest first, optionally filtered by status.
pub fn versions_by_id<R: StateRead + ?Sized>(
    state: &R,
    criteria: &VersionsCriteria,
) -> DataCallResult<Vec<DataCall>> {
    required(&criteria.id, "GetDataCallVersionsById: ID is Empty")?;
    let status = parse_status_filter(&criteria.status)?;

    let mut versions: Vec<(RecordVersion, DataCall)> = all_versions(state, &criteria.id)?
        .into_iter()
        .filter(|dc| status.map_or(true, |s| dc.status == s))
        .map(|dc| Ok((parse_version(&dc.version)?, dc)))
        .collect::<DataCallResult<_>>()?;
    versions.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(versions.into_iter().map(|(_, dc)| dc).collect())
}

/// Look up a data call version on the default channel.
///
/// Reads the transaction's own state when it runs on the default channel, and asks `peers`
/// otherwise.
pub fn find_on_default_channel(
    ctx: &TxContext<'_>,
    cfg: &CoreConfig,
    peers: &dyn PartitionClient,
    id: &str,
    version: &str,
) -> DataCallResult<Option<DataCall>> {
    if ctx.channel() == cfg.default_channel() {
        return find(ctx, id, version);
    }
    let partition = PartitionRef {
        channel_name: cfg.default_channel().to_owned(),
        chaincode_name: cfg.default_chaincode_name().to_owned(),
    };
    Ok(peers.get_data_call(&partition, id, version)?)
}

/// Blank means "no filter".
pub(crate) fn parse_status_filter(raw: &str) -> DataCallResult<Option<DataCallStatus>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    raw.parse::<DataCallStatus>()
        .map(Some)
        .map_err(|bad| DataCallError::InvalidStatus(format!("unknown data call status '{bad}'")))
}

// ============================================================================
// LIFECYCLE
// ============================================================================

/// `CreateDataCall`: store version 1 of a new data call.
pub fn create_data_call(ctx: &mut TxContext<'_>, mut data_call: DataCall) -> DataCallResult<DataCall> {
    required(&data_call.id, "Id cant not be empty!!")?;

    data_call.version = RecordVersion::FIRST.to_string();
    data_call.is_latest = true;
    data_call.is_locked = data_call.status.locks_on_create();

    let key = keys::data_call(&data_call.id, &data_call.version);
    if ctx.read(&key)?.is_some() {
        return Err(DataCallError::AlreadyExists(format!(
            "Data Call already exist for the data call with ID: {}",
            data_call.id
        )));
    }
    ctx.put(&key, &data_call)?;

    if data_call.status == DataCallStatus::Issued {
        audit_log::append(
            ctx,
            &DataCallLog::new(
                &data_call.id,
                &data_call.version,
                LogAction::Issued,
                data_call.updated_ts,
                &data_call.updated_by,
            ),
        )?;
    }
    counts::toggle(ctx, None, Some(data_call.status))?;

    tracing::info!(id = %data_call.id, status = %data_call.status, "created data call");
    Ok(data_call)
}

/// `SaveNewDraft`: store the incoming data call as the next version of its id.
pub fn save_new_draft(ctx: &mut TxContext<'_>, mut data_call: DataCall) -> DataCallResult<DataCall> {
    required(&data_call.id, "Id can not be empty")?;

    let versions = all_versions(&*ctx, &data_call.id)?;
    let previous = versions
        .iter()
        .find(|dc| dc.is_latest)
        .cloned()
        .ok_or_else(|| {
            DataCallError::NotFound(format!("No latest data call found for ID: {}", data_call.id))
        })?;

    let mut highest = RecordVersion::FIRST;
    for dc in &versions {
        highest = highest.max(parse_version(&dc.version)?);
    }

    for mut dc in versions.into_iter().filter(|dc| dc.is_latest) {
        dc.is_latest = false;
        ctx.put(&keys::data_call(&dc.id, &dc.version), &dc)?;
    }

    data_call.version = highest.next().to_string();
    data_call.is_latest = true;
    data_call.is_locked = false;
    ctx.put(&keys::data_call(&data_call.id, &data_call.version), &data_call)?;

    if data_call.status != previous.status {
        counts::toggle(ctx, Some(previous.status), Some(data_call.status))?;
    }

    tracing::info!(
        id = %data_call.id,
        version = %data_call.version,
        "saved new data call draft"
    );
    Ok(data_call)
}

/// `UpdateDataCall`: apply the edits allowed by the stored version's status.
pub fn update_data_call(ctx: &mut TxContext<'_>, data_call: DataCall) -> DataCallResult<DataCall> {
    required(&data_call.id, "ID should not be Empty")?;
    required(&data_call.version, "Version should not be Empty")?;

    let mut stored = find(&*ctx, &data_call.id, &data_call.version)?.ok_or_else(|| {
        DataCallError::NotFound(format!(
            "No data call found for ID: {} and version: {}",
            data_call.id, data_call.version
        ))
    })?;
    let original_status = stored.status;
    let mut cancelled = false;

    match stored.status {
        DataCallStatus::Draft => {
            if data_call.status == DataCallStatus::Cancelled {
                cancelled = true;
                stored.status = DataCallStatus::Cancelled;
                stored.is_locked = true;
            }
            stored.forum_url = data_call.forum_url.clone();
        }
        DataCallStatus::Issued => {
            if stored.proposed_delivery_date != data_call.proposed_delivery_date {
                audit_log::append(
                    ctx,
                    &DataCallLog::new(
                        &data_call.id,
                        &data_call.version,
                        LogAction::DeliveryDateUpdated,
                        data_call.updated_ts,
                        &data_call.updated_by,
                    ),
                )?;
            }
            stored.proposed_delivery_date = data_call.proposed_delivery_date;
            stored.forum_url = data_call.forum_url.clone();
            stored.extraction_pattern_id = data_call.extraction_pattern_id.clone();
            stored.extraction_pattern_ts = data_call.extraction_pattern_ts;
            stored.is_locked = true;
        }
        DataCallStatus::Cancelled | DataCallStatus::Abandoned => {
            return Err(DataCallError::Locked(LOCKED_MESSAGE.into()));
        }
    }

    if cancelled {
        for mut other in all_versions(&*ctx, &data_call.id)?
            .into_iter()
            .filter(|dc| dc.version != data_call.version)
        {
            other.is_locked = true;
            ctx.put(&keys::data_call(&other.id, &other.version), &other)?;
        }
    }

    ctx.put(&keys::data_call(&stored.id, &stored.version), &stored)?;

    ctx.emit(
        EVENT_EXTRACTION_PATTERN_SPECIFIED,
        &ExtractionPatternSpecified {
            data_call_id: data_call.id.clone(),
            data_call_version: data_call.version.clone(),
            extraction_pattern_id: data_call.extraction_pattern_id.clone(),
            ext_pattern_ts: data_call.extraction_pattern_ts,
        },
    )?;

    if stored.status != original_status {
        counts::toggle(ctx, Some(original_status), Some(stored.status))?;
    }

    tracing::info!(
        id = %stored.id,
        version = %stored.version,
        status = %stored.status,
        "updated data call"
    );
    Ok(stored)
}

/// `IssueDataCall`: issue the targeted version and lock every version of the id.
///
/// Fails without writing anything if any version is already locked or the targeted version
/// does not exist.
pub fn issue_data_call(ctx: &mut TxContext<'_>, data_call: DataCall) -> DataCallResult<DataCall> {
    required(&data_call.id, "ID should not be Empty")?;
    required(&data_call.version, "Version should not be Empty")?;

    let versions = all_versions(&*ctx, &data_call.id)?;
    if versions.iter().any(|dc| dc.is_locked) {
        return Err(DataCallError::Locked(LOCKED_MESSAGE.into()));
    }

    let target = versions
        .iter()
        .find(|dc| dc.version == data_call.version)
        .ok_or_else(|| {
            DataCallError::NotFound(format!(
                "No data call found for ID: {} and version: {}",
                data_call.id, data_call.version
            ))
        })?;
    let original_status = target.status;
    if original_status == DataCallStatus::Draft && data_call.status != DataCallStatus::Issued {
        return Err(DataCallError::InvalidStatus(format!(
            "Invalid Status {}",
            data_call.status
        )));
    }

    let mut issued = None;
    for mut dc in versions {
        if dc.version == data_call.version && dc.status == DataCallStatus::Draft {
            dc.status = DataCallStatus::Issued;
        }
        dc.is_locked = true;
        ctx.put(&keys::data_call(&dc.id, &dc.version), &dc)?;
        if dc.version == data_call.version {
            issued = Some(dc);
        }
    }
    let issued = issued.ok_or_else(|| {
        DataCallError::NotFound(format!("No data call found for ID: {}", data_call.id))
    })?;

    audit_log::append(
        ctx,
        &DataCallLog::new(
            &data_call.id,
            &data_call.version,
            LogAction::Issued,
            data_call.updated_ts,
            &data_call.updated_by,
        ),
    )?;

    if issued.status != original_status {
        counts::toggle(ctx, Some(original_status), Some(issued.status))?;
    }

    tracing::info!(id = %issued.id, version = %issued.version, "issued data call");
    Ok(issued)
}

/// `SaveAndIssueDataCall`: save a new draft version and issue it in one transaction.
pub fn save_and_issue(ctx: &mut TxContext<'_>, mut data_call: DataCall) -> DataCallResult<DataCall> {
    let mut issue_request = data_call.clone();
    data_call.status = DataCallStatus::Draft;
    let saved = save_new_draft(ctx, data_call)?;

    issue_request.version = saved.version;
    issue_request.status = DataCallStatus::Issued;
    issue_data_call(ctx, issue_request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DataCallCount;
    use crate::testing::{ts, TestLedger};

    fn draft(id: &str) -> DataCall {
        DataCall {
            id: id.into(),
            name: "Auto coverage".into(),
            status: DataCallStatus::Draft,
            ..DataCall::default()
        }
    }

    fn versions(ledger: &TestLedger, id: &str) -> Vec<DataCall> {
        ledger.read(|s| all_versions(s, id)).unwrap()
    }

    fn counter(ledger: &TestLedger) -> DataCallCount {
        ledger.read(|s| counts::current(s)).unwrap()
    }

    #[test]
    fn test_create_sets_version_latest_and_lock() {
        let mut ledger = TestLedger::new();
        let created = ledger.run(|ctx| create_data_call(ctx, draft("DC1"))).unwrap();

        assert_eq!(created.version, "1");
        assert!(created.is_latest);
        assert!(!created.is_locked);

        let issued = DataCall {
            status: DataCallStatus::Issued,
            ..draft("DC2")
        };
        let created = ledger.run(|ctx| create_data_call(ctx, issued)).unwrap();
        assert!(created.is_locked);
        assert_eq!(counter(&ledger).issued, 1);
        assert_eq!(counter(&ledger).draft, 1);
    }

    #[test]
    fn test_create_rejects_empty_id_and_duplicates() {
        let mut ledger = TestLedger::new();
        let err = ledger.run(|ctx| create_data_call(ctx, draft(" "))).unwrap_err();
        assert!(matches!(err, DataCallError::InvalidInput(m) if m == "Id cant not be empty!!"));

        ledger.run(|ctx| create_data_call(ctx, draft("DC1"))).unwrap();
        let err = ledger.run(|ctx| create_data_call(ctx, draft("DC1"))).unwrap_err();
        assert!(matches!(err, DataCallError::AlreadyExists(_)));
        assert_eq!(counter(&ledger).draft, 1);
    }

    #[test]
    fn test_stored_data_call_equals_original() {
        let mut ledger = TestLedger::new();
        let original = DataCall {
            id: "DC1".into(),
            version: "1".into(),
            name: "Homeowners 2019".into(),
            intent_to_publish: true,
            is_latest: true,
            is_show_participants: true,
            description: "desc".into(),
            purpose: "purpose".into(),
            line_of_business: "Homeowners".into(),
            deadline: Some(ts("2019-05-01T00:00:00.000Z")),
            premium_from_date: Some(ts("2018-01-01T00:00:00.000Z")),
            premium_to_date: Some(ts("2018-12-31T00:00:00.000Z")),
            loss_from_date: Some(ts("2018-01-01T00:00:00.000Z")),
            loss_to_date: Some(ts("2018-12-31T00:00:00.000Z")),
            jurisdiction: "NY".into(),
            proposed_delivery_date: Some(ts("2019-06-01T00:00:00.000Z")),
            updated_by: "analyst@aais".into(),
            updated_ts: Some(ts("2019-01-02T10:11:12.345Z")),
            detailed_criteria: "criteria".into(),
            eligibility_requirement: "all".into(),
            status: DataCallStatus::Draft,
            call_type: "adhoc".into(),
            comments: "none".into(),
            forum_url: "https://forum/1".into(),
            like_count: 3,
            consent_count: 2,
            extraction_pattern_name: "pattern".into(),
            extraction_pattern_id: "EP1".into(),
            extraction_pattern_ts: Some(ts("2019-01-03T00:00:00.000Z")),
            ..DataCall::default()
        };

        ledger
            .run(|ctx| create_data_call(ctx, original.clone()))
            .unwrap();
        let stored = ledger
            .read(|s| find(s, "DC1", "1"))
            .unwrap()
            .unwrap();
        assert_eq!(stored, original);
    }

    #[test]
    fn test_save_new_draft_keeps_single_latest() {
        let mut ledger = TestLedger::new();
        ledger.run(|ctx| create_data_call(ctx, draft("DC1"))).unwrap();
        for _ in 0..4 {
            ledger.run(|ctx| save_new_draft(ctx, draft("DC1"))).unwrap();
        }

        let all = versions(&ledger, "DC1");
        assert_eq!(all.len(), 5);
        let latest: Vec<_> = all.iter().filter(|dc| dc.is_latest).collect();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].version, "5");
        assert_eq!(counter(&ledger).draft, 1);
    }

    #[test]
    fn test_save_new_draft_requires_existing_data_call() {
        let mut ledger = TestLedger::new();
        let err = ledger.run(|ctx| save_new_draft(ctx, draft("NOPE"))).unwrap_err();
        assert!(matches!(err, DataCallError::NotFound(_)));
    }

    #[test]
    fn test_issue_fails_without_mutation_when_locked() {
        let mut ledger = TestLedger::new();
        ledger.run(|ctx| create_data_call(ctx, draft("DC1"))).unwrap();
        let issue = DataCall {
            version: "1".into(),
            status: DataCallStatus::Issued,
            ..draft("DC1")
        };
        ledger
            .run(|ctx| issue_data_call(ctx, issue.clone()))
            .unwrap();

        let before = ledger.snapshot_state();
        let err = ledger.run(|ctx| issue_data_call(ctx, issue)).unwrap_err();
        assert!(matches!(err, DataCallError::Locked(_)));
        assert_eq!(ledger.snapshot_state(), before);
    }

    #[test]
    fn test_issue_draft_requires_issued_status() {
        let mut ledger = TestLedger::new();
        ledger.run(|ctx| create_data_call(ctx, draft("DC1"))).unwrap();
        let request = DataCall {
            version: "1".into(),
            ..draft("DC1")
        };

        let err = ledger.run(|ctx| issue_data_call(ctx, request)).unwrap_err();
        assert!(matches!(err, DataCallError::InvalidStatus(_)));
        assert!(!versions(&ledger, "DC1")[0].is_locked);
    }

    #[test]
    fn test_issue_moves_counter_and_logs_once() {
        let mut ledger = TestLedger::new();
        ledger.run(|ctx| create_data_call(ctx, draft("DC1"))).unwrap();
        ledger.run(|ctx| save_new_draft(ctx, draft("DC1"))).unwrap();

        let request = DataCall {
            version: "2".into(),
            status: DataCallStatus::Issued,
            updated_by: "analyst".into(),
            ..draft("DC1")
        };
        ledger.run(|ctx| issue_data_call(ctx, request)).unwrap();

        let counts = counter(&ledger);
        assert_eq!((counts.draft, counts.issued), (0, 1));
        assert!(versions(&ledger, "DC1").iter().all(|dc| dc.is_locked));

        let history = ledger
            .read(|s| {
                audit_log::history(
                    s,
                    &crate::model::DataCallRef {
                        data_call_id: "DC1".into(),
                        data_call_version: "2".into(),
                    },
                )
            })
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action_id, "DATA_CALL_ISSUED");
    }

    #[test]
    fn test_cancel_draft_locks_all_versions_and_counts() {
        let mut ledger = TestLedger::new();
        ledger.run(|ctx| create_data_call(ctx, draft("DC1"))).unwrap();
        ledger.run(|ctx| save_new_draft(ctx, draft("DC1"))).unwrap();

        let cancel = DataCall {
            version: "2".into(),
            status: DataCallStatus::Cancelled,
            forum_url: "https://forum".into(),
            ..draft("DC1")
        };
        let (updated, events) = ledger
            .run_with_events(|ctx| update_data_call(ctx, cancel.clone()))
            .unwrap();

        assert_eq!(updated.status, DataCallStatus::Cancelled);
        assert_eq!(updated.forum_url, "https://forum");
        assert!(versions(&ledger, "DC1").iter().all(|dc| dc.is_locked));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, EVENT_EXTRACTION_PATTERN_SPECIFIED);

        let counts = counter(&ledger);
        assert_eq!((counts.draft, counts.cancelled), (0, 1));

        // Replaying the cancellation must not count twice.
        let err = ledger.run(|ctx| update_data_call(ctx, cancel)).unwrap_err();
        assert!(matches!(err, DataCallError::Locked(_)));
        assert_eq!(counter(&ledger).cancelled, 1);
    }

    #[test]
    fn test_update_issued_logs_delivery_date_change() {
        let mut ledger = TestLedger::new();
        let issued = DataCall {
            status: DataCallStatus::Issued,
            ..draft("DC1")
        };
        ledger.run(|ctx| create_data_call(ctx, issued)).unwrap();

        let update = DataCall {
            version: "1".into(),
            status: DataCallStatus::Issued,
            proposed_delivery_date: Some(ts("2020-02-01T00:00:00.000Z")),
            extraction_pattern_id: "EP1".into(),
            ..draft("DC1")
        };
        let stored = ledger.run(|ctx| update_data_call(ctx, update)).unwrap();

        assert_eq!(stored.status, DataCallStatus::Issued);
        assert_eq!(stored.extraction_pattern_id, "EP1");
        assert_eq!(
            stored.proposed_delivery_date,
            Some(ts("2020-02-01T00:00:00.000Z"))
        );

        let history = ledger
            .read(|s| {
                audit_log::history(
                    s,
                    &crate::model::DataCallRef {
                        data_call_id: "DC1".into(),
                        data_call_version: "1".into(),
                    },
                )
            })
            .unwrap();
        let actions: Vec<_> = history.iter().map(|l| l.action_id.as_str()).collect();
        assert_eq!(
            actions,
            vec!["DATA_CALL_ISSUED", "DATA_CALL_DELIVERY_DATE_UPDATED"]
        );
        assert_eq!(counter(&ledger).issued, 1);
    }

    #[test]
    fn test_update_missing_data_call_is_not_found() {
        let mut ledger = TestLedger::new();
        let request = DataCall {
            version: "1".into(),
            ..draft("DC9")
        };
        let err = ledger.run(|ctx| update_data_call(ctx, request)).unwrap_err();
        assert!(matches!(err, DataCallError::NotFound(_)));
    }

    #[test]
    fn test_save_and_issue_issues_new_version() {
        let mut ledger = TestLedger::new();
        ledger.run(|ctx| create_data_call(ctx, draft("DC1"))).unwrap();
        let request = DataCall {
            version: "1".into(),
            ..draft("DC1")
        };

        let issued = ledger.run(|ctx| save_and_issue(ctx, request)).unwrap();

        assert_eq!(issued.version, "2");
        assert_eq!(issued.status, DataCallStatus::Issued);
        let counts = counter(&ledger);
        assert_eq!((counts.draft, counts.issued), (0, 1));
    }

    #[test]
    fn test_versions_by_id_sorted_desc_with_filter() {
        let mut ledger = TestLedger::new();
        ledger.run(|ctx| create_data_call(ctx, draft("DC1"))).unwrap();
        for _ in 0..10 {
            ledger.run(|ctx| save_new_draft(ctx, draft("DC1"))).unwrap();
        }
        let criteria = VersionsCriteria {
            id: "DC1".into(),
            ..VersionsCriteria::default()
        };
        let listed = ledger.read(|s| versions_by_id(s, &criteria)).unwrap();
        let order: Vec<_> = listed.iter().take(3).map(|dc| dc.version.as_str()).collect();
        assert_eq!(order, vec!["11", "10", "9"]);

        let criteria = VersionsCriteria {
            id: "DC1".into(),
            status: "ISSUED".into(),
            ..VersionsCriteria::default()
        };
        assert!(ledger.read(|s| versions_by_id(s, &criteria)).unwrap().is_empty());
    }

    #[test]
    fn test_lifecycle_scenario() {
        let mut ledger = TestLedger::new();

        // 1. Create a draft.
        ledger.run(|ctx| create_data_call(ctx, draft("DC1"))).unwrap();
        let counts = counter(&ledger);
        assert_eq!((counts.draft, counts.issued), (1, 0));

        // 2. Save a new version with status ISSUED.
        let v2 = DataCall {
            status: DataCallStatus::Issued,
            ..draft("DC1")
        };
        let saved = ledger.run(|ctx| save_new_draft(ctx, v2)).unwrap();
        assert_eq!(saved.version, "2");
        let v1 = ledger.read(|s| find(s, "DC1", "1")).unwrap().unwrap();
        assert!(!v1.is_latest);
        let counts = counter(&ledger);
        assert_eq!((counts.draft, counts.issued), (0, 1));

        // 3. Issue version 2; version 2 is already ISSUED so the counters hold.
        let issue_v2 = IdAndVersion {
            id: "DC1".into(),
            version: "2".into(),
        };
        let request = DataCall {
            id: issue_v2.id.clone(),
            version: issue_v2.version.clone(),
            ..DataCall::default()
        };
        ledger.run(|ctx| issue_data_call(ctx, request)).unwrap();
        assert!(versions(&ledger, "DC1").iter().all(|dc| dc.is_locked));
        let counts = counter(&ledger);
        assert_eq!((counts.draft, counts.issued), (0, 1));

        // 4. Every version is locked now, so issuing version 1 is refused.
        let request = DataCall {
            id: "DC1".into(),
            version: "1".into(),
            status: DataCallStatus::Issued,
            ..DataCall::default()
        };
        let err = ledger.run(|ctx| issue_data_call(ctx, request)).unwrap_err();
        assert!(matches!(err, DataCallError::Locked(_)));
    }
}
