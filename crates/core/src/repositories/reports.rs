//! Reports delivered against a data call version.
//!
//! Reports are keyed by content hash. The first report that is accepted, published or
//! withheld locks every report of its data call version, after which no new candidate can be
//! created for it.

use super::{audit_log, page, required};
use crate::context::{get_record, scan_records, StateRead, TxContext};
use crate::keys;
use crate::model::{DataCallLog, DataCallRef, LogAction, Report, ReportCriteria, ReportKey, ReportStatus};
use crate::outcome::{DeclineReason, Outcome};
use crate::{DataCallError, DataCallResult};

/// Every report of a data call version, most recently updated first.
pub fn by_data_call<R: StateRead + ?Sized>(
    state: &R,
    data_call_id: &str,
    data_call_version: &str,
) -> DataCallResult<Vec<Report>> {
    let mut reports: Vec<Report> =
        scan_records(state, &keys::reports(data_call_id, data_call_version))?;
    reports.sort_by(|a, b| b.updated_ts.cmp(&a.updated_ts));
    Ok(reports)
}

/// The most recently updated report of a data call version, if any.
pub fn latest<R: StateRead + ?Sized>(
    state: &R,
    data_call_id: &str,
    data_call_version: &str,
) -> DataCallResult<Option<Report>> {
    Ok(by_data_call(state, data_call_id, data_call_version)?
        .into_iter()
        .next())
}

/// `CreateReport`: store a new candidate report.
///
/// # Returns
///
/// The stored report, or [`DeclineReason::ReportLocked`] if a report of the same data call
/// version is already locked.
///
/// # Errors
///
/// Returns [`DataCallError::InvalidInput`] for a missing identifier and
/// [`DataCallError::AlreadyExists`] if a report with the same hash exists.
pub fn create(ctx: &mut TxContext<'_>, mut report: Report) -> DataCallResult<Outcome<Report>> {
    required(&report.data_call_id, "DataCallID is empty!!")?;
    required(&report.data_call_version, "DataCallVersion is empty!!")?;
    required(&report.hash, "Hash is empty!!")?;
    report.status = ReportStatus::Candidate;

    let existing: Vec<Report> = scan_records(
        &*ctx,
        &keys::reports(&report.data_call_id, &report.data_call_version),
    )?;
    if existing.iter().any(|r| r.is_locked) {
        tracing::info!(
            data_call_id = %report.data_call_id,
            data_call_version = %report.data_call_version,
            "declined report creation, reports are locked"
        );
        return Ok(Outcome::Declined(DeclineReason::ReportLocked));
    }
    report.report_version = (existing.len() + 1).to_string();

    let key = keys::report(&report.data_call_id, &report.data_call_version, &report.hash);
    if ctx.read(&key)?.is_some() {
        return Err(DataCallError::AlreadyExists(format!(
            "Report already exist for : {}/{}/{}",
            report.data_call_id, report.data_call_version, report.hash
        )));
    }
    ctx.put(&key, &report)?;
    Ok(Outcome::Completed(report))
}

/// `UpdateReport`: store the incoming report locked and lock its siblings.
pub fn update(ctx: &mut TxContext<'_>, mut report: Report) -> DataCallResult<Outcome<Report>> {
    required(&report.data_call_id, "DataCallID is empty!!")?;
    required(&report.data_call_version, "DataCallVersion is empty!!")?;
    required(&report.hash, "Hash is empty!!")?;
    required(&report.report_version, "ReportVersion is empty!!")?;

    let key = keys::report(&report.data_call_id, &report.data_call_version, &report.hash);
    let previous: Report = get_record(&*ctx, &key)?.ok_or_else(|| {
        DataCallError::NotFound(format!(
            "Report doesn't exist for : {}/{}/{}",
            report.data_call_id, report.data_call_version, report.hash
        ))
    })?;

    let siblings: Vec<Report> = scan_records(
        &*ctx,
        &keys::reports(&report.data_call_id, &report.data_call_version),
    )?;
    let declined = if report.status == ReportStatus::Candidate {
        previous.is_locked
    } else {
        siblings.iter().any(|r| r.status == report.status)
    };
    if declined {
        tracing::info!(hash = %report.hash, status = %report.status, "declined report update");
        return Ok(Outcome::Declined(DeclineReason::ReportUpdateLocked));
    }

    report.is_locked = true;
    for mut sibling in siblings.into_iter().filter(|r| r.hash != report.hash) {
        sibling.is_locked = true;
        ctx.put(
            &keys::report(&sibling.data_call_id, &sibling.data_call_version, &sibling.hash),
            &sibling,
        )?;
    }
    ctx.put(&key, &report)?;

    let action = match report.status {
        ReportStatus::Accepted => Some(LogAction::ReportAccepted),
        ReportStatus::Published => Some(LogAction::ReportPublished),
        ReportStatus::Withheld => Some(LogAction::ReportWithheld),
        ReportStatus::Candidate => None,
    };
    if let Some(action) = action {
        audit_log::append(
            ctx,
            &DataCallLog::new(
                &report.data_call_id,
                &report.data_call_version,
                action,
                report.updated_ts,
                &report.created_by,
            ),
        )?;
    }
    Ok(Outcome::Completed(report))
}

/// `ListReportsByCriteria`.
pub fn list<R: StateRead + ?Sized>(state: &R, criteria: &ReportCriteria) -> DataCallResult<Vec<Report>> {
    required(&criteria.data_call_id, "DataCallID is empty!!")?;
    required(&criteria.data_call_version, "DataCallVersion is empty!!")?;
    let reports = by_data_call(state, &criteria.data_call_id, &criteria.data_call_version)?;
    Ok(page(reports, criteria.start_index, criteria.page_size))
}

/// `GetReportById`.
pub fn get<R: StateRead + ?Sized>(state: &R, request: &ReportKey) -> DataCallResult<Option<Report>> {
    if request.data_call_id.trim().is_empty()
        || request.data_call_version.trim().is_empty()
        || request.hash.trim().is_empty()
    {
        return Err(DataCallError::InvalidInput(
            "DataCall ID, DataCall Version and hash can not be Empty".into(),
        ));
    }
    get_record(
        state,
        &keys::report(&request.data_call_id, &request.data_call_version, &request.hash),
    )
}

/// `GetHighestOrderReportByDataCall`.
pub fn highest_order<R: StateRead + ?Sized>(state: &R, request: &DataCallRef) -> DataCallResult<Report> {
    required(&request.data_call_id, "GetHighestOrderReportByDataCall: ID is Empty")?;
    latest(state, &request.data_call_id, &request.data_call_version)?
        .ok_or_else(|| DataCallError::NotFound("No Reports Found".into()))
}
