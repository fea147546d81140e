//! Per-status data call counter.
//!
//! The counter is a single ledger record, so every toggle is part of the same transaction as
//! the status change that caused it.

use crate::constants::{DATA_CALL_COUNT_ID, DATA_CALL_COUNT_VERSION};
use crate::context::{get_record, StateRead, TxContext};
use crate::keys;
use crate::model::{DataCallCount, DataCallStatus, IdAndVersion, ToggleCountRequest};
use crate::DataCallResult;

fn singleton_key() -> keys::CompositeKey {
    keys::data_call_count(DATA_CALL_COUNT_ID, DATA_CALL_COUNT_VERSION)
}

/// The stored counter, or all-zero counts if none has been written yet.
pub fn current<R: StateRead + ?Sized>(state: &R) -> DataCallResult<DataCallCount> {
    Ok(get_record(state, &singleton_key())?.unwrap_or_else(|| DataCallCount {
        id: DATA_CALL_COUNT_ID.into(),
        version: DATA_CALL_COUNT_VERSION.into(),
        ..DataCallCount::default()
    }))
}

/// Move one data call from `original` to `new` in the counter.
///
/// `None` on either side contributes nothing, which is how newly created data calls are
/// counted.
pub fn toggle(
    ctx: &mut TxContext<'_>,
    original: Option<DataCallStatus>,
    new: Option<DataCallStatus>,
) -> DataCallResult<DataCallCount> {
    let mut counts = current(&*ctx)?;
    if let Some(field) = original.and_then(|s| counts.field_mut(s)) {
        *field -= 1;
    }
    if let Some(field) = new.and_then(|s| counts.field_mut(s)) {
        *field += 1;
    }
    ctx.put(&singleton_key(), &counts)?;
    tracing::debug!(?original, ?new, "toggled data call count");
    Ok(counts)
}

/// `ToggleDataCallCount`: statuses arrive as free text; blank or unknown ones are ignored.
pub fn toggle_request(
    ctx: &mut TxContext<'_>,
    request: ToggleCountRequest,
) -> DataCallResult<DataCallCount> {
    let parse = |raw: &str| {
        let status = raw.parse::<DataCallStatus>().ok();
        if status.is_none() && !raw.trim().is_empty() {
            tracing::warn!(status = raw, "ignoring unknown status in count toggle");
        }
        status
    };
    let original = parse(&request.original_status);
    let new = parse(&request.new_status);
    toggle(ctx, original, new)
}

/// `GetDataCallCount`: the counter stored under `{id, version}`.
pub fn get<R: StateRead + ?Sized>(
    state: &R,
    request: &IdAndVersion,
) -> DataCallResult<Option<DataCallCount>> {
    get_record(state, &keys::data_call_count(&request.id, &request.version))
}

/// `UpdateDataCallCount`: overwrite the singleton counter.
pub fn overwrite(ctx: &mut TxContext<'_>, mut counts: DataCallCount) -> DataCallResult<DataCallCount> {
    counts.id = DATA_CALL_COUNT_ID.into();
    counts.version = DATA_CALL_COUNT_VERSION.into();
    ctx.put(&singleton_key(), &counts)?;
    Ok(counts)
}
