//! Data call listing and search.

use super::{counts, page, reports, skip_limit};
use crate::constants::LATEST_VERSION;
use crate::context::{scan_records, StateRead};
use crate::keys::{CompositeKey, KeySpace};
use crate::model::{DataCall, DataCallExtended, DataCallList, DataCallStatus, ListCriteria};
use crate::{DataCallError, DataCallResult};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use regex::Regex;

/// Every stored data call version, in key order.
fn all_data_calls<R: StateRead + ?Sized>(state: &R) -> DataCallResult<Vec<DataCall>> {
    scan_records(state, &CompositeKey::space(KeySpace::DataCall))
}

fn required_status(criteria: &ListCriteria, operation: &str) -> DataCallResult<DataCallStatus> {
    if criteria.status.trim().is_empty() {
        return Err(DataCallError::InvalidInput(format!(
            "{operation}: Status not present, You must pass Status in agument"
        )));
    }
    criteria
        .status
        .parse()
        .map_err(|bad| DataCallError::InvalidStatus(format!("unknown data call status '{bad}'")))
}

/// Data calls in `status`, filtered and ordered the way listings present them.
///
/// Drafts are restricted to unlocked versions whose `isLatest` flag matches whether the
/// criteria asked for the `latest` version, and are ordered by `updatedTs`. Other statuses
/// are ordered by `deadline`. Both orders are newest first.
fn filtered<R: StateRead + ?Sized>(
    state: &R,
    status: DataCallStatus,
    version: &str,
) -> DataCallResult<Vec<DataCall>> {
    let want_latest = version == LATEST_VERSION;
    let mut data_calls: Vec<DataCall> = all_data_calls(state)?
        .into_iter()
        .filter(|dc| dc.status == status)
        .filter(|dc| {
            status != DataCallStatus::Draft || (dc.is_latest == want_latest && !dc.is_locked)
        })
        .collect();

    if status == DataCallStatus::Draft {
        data_calls.sort_by(|a, b| b.updated_ts.cmp(&a.updated_ts));
    } else {
        data_calls.sort_by(|a, b| b.deadline.cmp(&a.deadline));
    }
    Ok(data_calls)
}

fn extend<R: StateRead + ?Sized>(
    state: &R,
    data_calls: Vec<DataCall>,
) -> DataCallResult<Vec<DataCallExtended>> {
    data_calls
        .into_iter()
        .map(|dc| {
            let latest = reports::latest(state, &dc.id, &dc.version)?;
            Ok(DataCallExtended {
                reports: latest.into_iter().collect(),
                no_of_consents: dc.consent_count,
                no_of_likes: dc.like_count,
                data_call: dc,
            })
        })
        .collect()
}

/// `ListDataCallsByCriteria`.
///
/// `startIndex` is a skip count here. The total is the status counter, not the length of the
/// filtered list.
pub fn list_by_criteria<R: StateRead + ?Sized>(
    state: &R,
    criteria: &ListCriteria,
) -> DataCallResult<DataCallList> {
    let status = required_status(criteria, "ListDataCallsByCriteria")?;
    let data_calls = filtered(state, status, &criteria.version)?;
    let window = skip_limit(data_calls, criteria.start_index, criteria.page_size);

    Ok(DataCallList {
        data_calls: extend(state, window)?,
        total_no_of_records: counts::current(state)?.get(status),
    })
}

/// `SearchDataCalls`: [`list_by_criteria`] plus a regular expression over the descriptive
/// fields, paged with a 1-based `startIndex`.
pub fn search<R: StateRead + ?Sized>(state: &R, criteria: &ListCriteria) -> DataCallResult<DataCallList> {
    let status = required_status(criteria, "SearchDataCalls")?;
    let pattern = Regex::new(&criteria.search_key)?;

    let matches: Vec<DataCall> = filtered(state, status, &criteria.version)?
        .into_iter()
        .filter(|dc| {
            [&dc.name, &dc.description, &dc.line_of_business, &dc.jurisdiction]
                .iter()
                .any(|field| pattern.is_match(field))
        })
        .collect();
    let total = matches.len() as i64;
    let window = page(matches, criteria.start_index, criteria.page_size);

    Ok(DataCallList {
        data_calls: extend(state, window)?,
        total_no_of_records: total,
    })
}

/// `ListMatureDataCalls`: issued data calls whose deadline fell during the previous UTC day.
///
/// A deadline exactly equal to `now` also counts.
pub fn list_mature<R: StateRead + ?Sized>(state: &R, now: DateTime<Utc>) -> DataCallResult<DataCallList> {
    let today = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let yesterday = today - Duration::days(1);

    let mature: Vec<DataCall> = filtered(state, DataCallStatus::Issued, "")?
        .into_iter()
        .filter(|dc| match dc.deadline {
            Some(deadline) => (deadline > yesterday && deadline < today) || deadline == now,
            None => false,
        })
        .collect();

    Ok(DataCallList {
        data_calls: extend(state, mature)?,
        total_no_of_records: counts::current(state)?.issued,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Report;
    use crate::repositories::data_calls;
    use crate::testing::{ts, TestLedger};

    fn data_call(id: &str, status: DataCallStatus, deadline: &str, name: &str) -> DataCall {
        DataCall {
            id: id.into(),
            name: name.into(),
            status,
            deadline: Some(ts(deadline)),
            updated_ts: Some(ts(deadline)),
            ..DataCall::default()
        }
    }

    fn setup_test_env() -> TestLedger {
        let mut ledger = TestLedger::new();
        let seeds = [
            data_call("I1", DataCallStatus::Issued, "2026-02-28T10:00:00.000Z", "Auto liability"),
            data_call("I2", DataCallStatus::Issued, "2026-03-05T00:00:00.000Z", "Homeowners"),
            data_call("I3", DataCallStatus::Issued, "2026-01-01T00:00:00.000Z", "Auto physical"),
            data_call("D1", DataCallStatus::Draft, "2026-04-01T00:00:00.000Z", "Draft auto"),
            data_call("D2", DataCallStatus::Draft, "2026-04-02T00:00:00.000Z", "Draft home"),
        ];
        for dc in seeds {
            ledger
                .run(|ctx| data_calls::create_data_call(ctx, dc))
                .unwrap();
        }
        ledger
    }

    fn ids(list: &DataCallList) -> Vec<&str> {
        list.data_calls.iter().map(|e| e.data_call.id.as_str()).collect()
    }

    #[test]
    fn test_list_issued_by_deadline_with_counter_total() {
        let ledger = setup_test_env();
        let criteria = ListCriteria {
            status: "ISSUED".into(),
            start_index: 1,
            page_size: 1,
            ..ListCriteria::default()
        };
        let list = ledger.read(|s| list_by_criteria(s, &criteria)).unwrap();
        assert_eq!(ids(&list), vec!["I1"]);
        assert_eq!(list.total_no_of_records, 3);
    }

    #[test]
    fn test_list_latest_drafts_by_updated_ts() {
        let ledger = setup_test_env();
        let criteria = ListCriteria {
            status: "DRAFT".into(),
            version: "latest".into(),
            ..ListCriteria::default()
        };
        let list = ledger.read(|s| list_by_criteria(s, &criteria)).unwrap();
        assert_eq!(ids(&list), vec!["D2", "D1"]);

        let criteria = ListCriteria {
            status: "DRAFT".into(),
            version: "all".into(),
            ..ListCriteria::default()
        };
        let list = ledger.read(|s| list_by_criteria(s, &criteria)).unwrap();
        assert!(list.data_calls.is_empty());
        assert_eq!(list.total_no_of_records, 2);
    }

    #[test]
    fn test_list_requires_status() {
        let ledger = setup_test_env();
        let err = ledger
            .read(|s| list_by_criteria(s, &ListCriteria::default()))
            .unwrap_err();
        assert!(matches!(err, DataCallError::InvalidInput(_)));
    }

    #[test]
    fn test_list_attaches_latest_report() {
        let mut ledger = setup_test_env();
        for (hash, updated) in [("a", "2026-01-01T00:00:00.000Z"), ("b", "2026-01-02T00:00:00.000Z")] {
            let report = Report {
                data_call_id: "I2".into(),
                data_call_version: "1".into(),
                hash: hash.into(),
                updated_ts: Some(ts(updated)),
                ..Report::default()
            };
            ledger.run(|ctx| reports::create(ctx, report)).unwrap();
        }
        let criteria = ListCriteria {
            status: "ISSUED".into(),
            ..ListCriteria::default()
        };
        let list = ledger.read(|s| list_by_criteria(s, &criteria)).unwrap();
        let i2 = &list.data_calls[0];
        assert_eq!(i2.data_call.id, "I2");
        assert_eq!(i2.reports.len(), 1);
        assert_eq!(i2.reports[0].hash, "b");
        assert!(list.data_calls[1].reports.is_empty());
    }

    #[test]
    fn test_search_matches_regex_and_pages_one_based() {
        let ledger = setup_test_env();
        let criteria = ListCriteria {
            status: "ISSUED".into(),
            search_key: "^Auto".into(),
            start_index: 2,
            page_size: 1,
            ..ListCriteria::default()
        };
        let list = ledger.read(|s| search(s, &criteria)).unwrap();
        assert_eq!(ids(&list), vec!["I3"]);
        assert_eq!(list.total_no_of_records, 2);
    }

    #[test]
    fn test_search_invalid_regex_is_error() {
        let ledger = setup_test_env();
        let criteria = ListCriteria {
            status: "ISSUED".into(),
            search_key: "(".into(),
            ..ListCriteria::default()
        };
        let err = ledger.read(|s| search(s, &criteria)).unwrap_err();
        assert!(matches!(err, DataCallError::Regex(_)));
    }

    #[test]
    fn test_mature_data_calls_from_previous_day() {
        let ledger = setup_test_env();
        let now = ts("2026-03-01T09:00:00.000Z");
        let list = ledger.read(|s| list_mature(s, now)).unwrap();
        assert_eq!(ids(&list), vec!["I1"]);
        assert_eq!(list.total_no_of_records, 3);
    }

    #[test]
    fn test_empty_list_serializes_as_array() {
        let ledger = TestLedger::new();
        let criteria = ListCriteria {
            status: "CANCELLED".into(),
            ..ListCriteria::default()
        };
        let list = ledger.read(|s| list_by_criteria(s, &criteria)).unwrap();
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["dataCallsList"], serde_json::json!([]));
        assert_eq!(json["totalNoOfRecords"], 0);
    }
}
