//! Carrier consents and consent counts.

use super::{data_calls, required};
use crate::config::CoreConfig;
use crate::constants::EVENT_CONSENTED;
use crate::context::{get_record, scan_records, StateRead, TxContext};
use crate::keys;
use crate::model::{
    Consent, ConsentCountEntry, ConsentListing, ConsentLookup, ConsentStatusUpdate, DataCallRef,
    FanOutRequest,
};
use crate::outcome::{DeclineReason, Outcome};
use crate::partition::{scatter_gather, FanOutResponse, PartitionClient};
use crate::{DataCallError, DataCallResult};

/// `CreateConsent`: record a carrier's consent to a data call version.
///
/// # Returns
///
/// The stored consent, or [`DeclineReason::ConsentExists`] if the carrier already consented.
/// A decline writes nothing and raises no event.
///
/// # Errors
///
/// Returns [`DataCallError::NotFound`] if the data call does not exist on the default channel.
pub fn create(
    ctx: &mut TxContext<'_>,
    cfg: &CoreConfig,
    peers: &dyn PartitionClient,
    consent: Consent,
) -> DataCallResult<Outcome<Consent>> {
    let exists = data_calls::find_on_default_channel(
        ctx,
        cfg,
        peers,
        &consent.data_call_id,
        &consent.data_call_version,
    )?
    .is_some();
    if !exists {
        return Err(DataCallError::NotFound(
            "CreateConsent: No Matching datacallId and datacallVersion specified in Consent message"
                .into(),
        ));
    }

    let key = keys::consent(
        &consent.data_call_id,
        &consent.data_call_version,
        &consent.carrier_id,
    );
    if ctx.read(&key)?.is_some() {
        tracing::warn!(
            data_call_id = %consent.data_call_id,
            carrier_id = %consent.carrier_id,
            "consent already exists"
        );
        return Ok(Outcome::Declined(DeclineReason::ConsentExists));
    }

    ctx.put(&key, &consent)?;
    ctx.emit(EVENT_CONSENTED, &consent)?;
    tracing::info!(
        data_call_id = %consent.data_call_id,
        carrier_id = %consent.carrier_id,
        "created consent"
    );
    Ok(Outcome::Completed(consent))
}

/// `UpdateConsentStatus`.
pub fn update_status(ctx: &mut TxContext<'_>, request: &ConsentStatusUpdate) -> DataCallResult<Consent> {
    if request.data_call_id.trim().is_empty()
        || request.data_call_version.trim().is_empty()
        || request.carrier_id.trim().is_empty()
    {
        return Err(DataCallError::InvalidInput(
            "DataCallID or DataCallVersion or CarrierID can't be empty".into(),
        ));
    }

    let key = keys::consent(
        &request.data_call_id,
        &request.data_call_version,
        &request.carrier_id,
    );
    let mut consent: Consent = get_record(&*ctx, &key)?.ok_or_else(|| {
        DataCallError::NotFound(format!(
            "No consent found for carrier {} on data call {}/{}",
            request.carrier_id, request.data_call_id, request.data_call_version
        ))
    })?;
    consent.status = request.status.clone();
    ctx.put(&key, &consent)?;
    Ok(consent)
}

/// `GetConsentsByDataCall`: consents stored on this channel.
pub fn by_data_call<R: StateRead + ?Sized>(
    state: &R,
    request: &DataCallRef,
) -> DataCallResult<Vec<ConsentListing>> {
    if request.data_call_id.trim().is_empty() || request.data_call_version.trim().is_empty() {
        return Err(DataCallError::InvalidInput(
            "DataCallID or DataCallVersion can't be empty".into(),
        ));
    }
    let consents: Vec<Consent> = scan_records(
        state,
        &keys::consents(&request.data_call_id, &request.data_call_version),
    )?;
    Ok(consents.into_iter().map(listing).collect())
}

fn listing(consent: Consent) -> ConsentListing {
    ConsentListing {
        consent,
        carrier_name: String::new(),
    }
}

/// `ListConsentsByDataCall`: consents on this channel plus every listed partition.
pub fn list_by_data_call(
    ctx: &TxContext<'_>,
    peers: &dyn PartitionClient,
    request: &FanOutRequest,
) -> DataCallResult<FanOutResponse<ConsentListing>> {
    let data_call = request.data_call();
    let local = by_data_call(ctx, &data_call)?;
    let remote: Vec<_> = request
        .channel_list
        .iter()
        .filter(|p| p.channel_name != ctx.channel())
        .cloned()
        .collect();
    Ok(scatter_gather(local, &remote, |partition| {
        peers.get_consents(partition, &data_call)
    }))
}

/// `GetConsentByDataCallAndOrganization`.
pub fn by_carrier<R: StateRead + ?Sized>(
    state: &R,
    request: &ConsentLookup,
) -> DataCallResult<Vec<ConsentListing>> {
    let consent = &request.consent;
    let found: Option<Consent> = get_record(
        state,
        &keys::consent(
            &consent.data_call_id,
            &consent.data_call_version,
            &consent.carrier_id,
        ),
    )?;
    Ok(found.into_iter().map(listing).collect())
}

pub fn create_count_entry(ctx: &mut TxContext<'_>, entry: ConsentCountEntry) -> DataCallResult<()> {
    let tx_id = ctx.tx_id().to_string();
    ctx.put(
        &keys::consent_count_entry(&entry.data_call_id, &entry.data_call_version, &tx_id),
        &entry,
    )
}

/// `CountConsents`: the request echoed back with `delta` set to the sum of stored deltas.
pub fn count<R: StateRead + ?Sized>(
    state: &R,
    mut request: ConsentCountEntry,
) -> DataCallResult<ConsentCountEntry> {
    let entries: Vec<ConsentCountEntry> = scan_records(
        state,
        &keys::consent_count_entries(&request.data_call_id, &request.data_call_version),
    )?;
    request.delta = entries.iter().map(|e| e.delta).sum();
    Ok(request)
}

/// `UpdateConsentCountForDataCall`.
pub fn update_count_for_data_call(ctx: &mut TxContext<'_>, request: &DataCallRef) -> DataCallResult<i64> {
    required(&request.data_call_id, "DataCallID should not be Empty")?;
    required(&request.data_call_version, "DataCallVersion should not be Empty")?;

    let mut data_call = data_calls::find(&*ctx, &request.data_call_id, &request.data_call_version)?
        .ok_or_else(|| {
            DataCallError::NotFound(format!(
                "No data call found for ID: {} and version: {}",
                request.data_call_id, request.data_call_version
            ))
        })?;
    let total = count(
        &*ctx,
        ConsentCountEntry {
            data_call_id: request.data_call_id.clone(),
            data_call_version: request.data_call_version.clone(),
            ..ConsentCountEntry::default()
        },
    )?
    .delta;

    data_call.consent_count = total;
    ctx.put(&keys::data_call(&data_call.id, &data_call.version), &data_call)?;
    Ok(total)
}
