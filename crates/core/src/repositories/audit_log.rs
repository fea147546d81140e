//! Append-only data-call transaction log.

use super::required;
use crate::context::{scan_records, StateRead, TxContext};
use crate::keys;
use crate::model::{DataCallLog, DataCallRef};
use crate::DataCallResult;

/// `LogDataCallTransaction`: append `entry` under the current transaction id.
///
/// Repeated appends for the same data call version within one transaction each get their own
/// entry.
pub fn append(ctx: &mut TxContext<'_>, entry: &DataCallLog) -> DataCallResult<()> {
    const MESSAGE: &str = "LogDataCallTransaction: DataCallID and DataCallVersion cant not be empty!!";
    required(&entry.data_call_id, MESSAGE)?;
    required(&entry.data_call_version, MESSAGE)?;

    let tx_id = ctx.tx_id().to_string();
    let seq = ctx
        .scan(&keys::data_call_tx_logs(
            &entry.data_call_id,
            &entry.data_call_version,
            &tx_id,
        ))?
        .len();
    let key = keys::data_call_log(&entry.data_call_id, &entry.data_call_version, &tx_id, seq);
    ctx.put(&key, entry)?;
    tracing::info!(
        data_call_id = %entry.data_call_id,
        data_call_version = %entry.data_call_version,
        action = %entry.action_id,
        "logged data call action"
    );
    Ok(())
}

/// `GetDataCallTransactionHistory`: entries in the order their transactions ran.
pub fn history<R: StateRead + ?Sized>(
    state: &R,
    request: &DataCallRef,
) -> DataCallResult<Vec<DataCallLog>> {
    scan_records(
        state,
        &keys::data_call_logs(&request.data_call_id, &request.data_call_version),
    )
}

/// `ListDataCallTransactionHistory`: entries newest action first.
pub fn history_by_action_time<R: StateRead + ?Sized>(
    state: &R,
    request: &DataCallRef,
) -> DataCallResult<Vec<DataCallLog>> {
    let mut entries = history(state, request)?;
    entries.sort_by(|a, b| b.action_ts.cmp(&a.action_ts));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LogAction;
    use crate::testing::{ts, TestLedger};

    fn request() -> DataCallRef {
        DataCallRef {
            data_call_id: "DC1".into(),
            data_call_version: "1".into(),
        }
    }

    #[test]
    fn test_appends_in_one_transaction_are_all_kept() {
        let mut ledger = TestLedger::new();
        let issued = DataCallLog::new("DC1", "1", LogAction::Issued, None, "advisory");
        let delivered = DataCallLog::new(
            "DC1",
            "1",
            LogAction::DeliveryDateUpdated,
            Some(ts("2026-03-02T09:00:00.000Z")),
            "advisory",
        );
        ledger
            .run(|ctx| {
                append(ctx, &issued)?;
                append(ctx, &delivered)
            })
            .unwrap();

        let logged = ledger.read(|s| history(s, &request())).unwrap();
        assert_eq!(logged, vec![issued.clone(), delivered.clone()]);

        let newest_first = ledger.read(|s| history_by_action_time(s, &request())).unwrap();
        assert_eq!(newest_first[0], delivered);
    }

    #[test]
    fn test_later_transactions_append_after_earlier_ones() {
        let mut ledger = TestLedger::new();
        let first = DataCallLog::new("DC1", "1", LogAction::Issued, None, "a");
        let second = DataCallLog::new("DC1", "1", LogAction::ReportAccepted, None, "b");
        ledger.run(|ctx| append(ctx, &first)).unwrap();
        ledger.run(|ctx| append(ctx, &second)).unwrap();

        let logged = ledger.read(|s| history(s, &request())).unwrap();
        assert_eq!(logged, vec![first, second]);
    }

    #[test]
    fn test_append_requires_ids() {
        let mut ledger = TestLedger::new();
        let entry = DataCallLog::new("", "1", LogAction::Issued, None, "a");
        let err = ledger.run(|ctx| append(ctx, &entry)).unwrap_err();
        assert!(matches!(err, crate::DataCallError::InvalidInput(_)));
    }
}
