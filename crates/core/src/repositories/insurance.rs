//! Carrier insurance data: batch hashes, private data pages and their audit markers.

use super::required;
use crate::codec;
use crate::config::private_collection;
use crate::constants::{EVENT_TRANSACTIONAL_DATA_AVAILABLE, TRANSACTIONAL_DATA_TRANSIENT_KEY};
use crate::context::{get_record, StateRead, TxContext};
use crate::keys;
use crate::model::{
    InsuranceData, InsuranceDataHash, InsuranceDataRequest, InsuranceRecordAudit,
    TransactionalDataAvailable,
};
use crate::{DataCallError, DataCallResult};

/// `SaveInsuranceDataHash`.
pub fn save_hash(ctx: &mut TxContext<'_>, hash: InsuranceDataHash) -> DataCallResult<()> {
    required(&hash.batch_id, "BatchId should not be Empty")?;
    required(&hash.hash, "Hash should not be Empty")?;
    required(&hash.carrier_id, "CarrierId should not be Empty")?;
    required(&hash.chunk_id, "ChunkId should not be Empty")?;

    ctx.put(
        &keys::insurance_hash(&hash.carrier_id, &hash.batch_id, &hash.chunk_id),
        &hash,
    )
}

/// `GetHashById`: the hash stored for the request's carrier, batch and chunk.
pub fn get_hash<R: StateRead + ?Sized>(
    state: &R,
    request: &InsuranceDataHash,
) -> DataCallResult<Option<InsuranceDataHash>> {
    required(&request.batch_id, "GetHashById:BatchId should not be empty")?;
    get_record(
        state,
        &keys::insurance_hash(&request.carrier_id, &request.batch_id, &request.chunk_id),
    )
}

/// `SaveInsuranceData`: store one page of carrier records in the channel's private collection.
///
/// The page travels in the transient map so it never reaches public state. A public
/// [`InsuranceRecordAudit`] marker is written alongside it and a
/// `TransactionalDataAvailable` event names the page.
pub fn save_data(ctx: &mut TxContext<'_>) -> DataCallResult<()> {
    let bytes = ctx.transient(TRANSACTIONAL_DATA_TRANSIENT_KEY).ok_or_else(|| {
        DataCallError::InvalidInput("SaveInsuranceData: Invalid key in the transient map".into())
    })?;
    let data: InsuranceData = codec::decode("insurance data", bytes)?;

    required(&data.carrier_id, "CarrierId should not be Empty")?;
    required(&data.data_call_id, "DataCallId should not be Empty")?;
    required(&data.data_call_version, "DataCallVersion should not be Empty")?;
    if data.page_number == 0 {
        return Err(DataCallError::InvalidInput(
            "PageNumber should not be Empty".into(),
        ));
    }

    let channel = ctx.channel().to_owned();
    ctx.put_private(
        &private_collection(&channel),
        &keys::insurance_data(
            &data.data_call_id,
            &data.data_call_version,
            &data.carrier_id,
            data.page_number,
        ),
        &data,
    )?;

    let audit = InsuranceRecordAudit {
        data_call_id: data.data_call_id.clone(),
        data_call_version: data.data_call_version.clone(),
        carrier_id: data.carrier_id.clone(),
    };
    ctx.put(
        &keys::insurance_audit(&audit.data_call_id, &audit.data_call_version, &audit.carrier_id),
        &audit,
    )?;

    ctx.emit(
        EVENT_TRANSACTIONAL_DATA_AVAILABLE,
        &TransactionalDataAvailable {
            channel_name: channel,
            data_call_id: data.data_call_id.clone(),
            data_call_version: data.data_call_version.clone(),
            carrier_id: data.carrier_id.clone(),
            page_number: data.page_number,
        },
    )?;
    tracing::info!(
        data_call_id = %data.data_call_id,
        carrier_id = %data.carrier_id,
        page = data.page_number,
        "stored insurance data page"
    );
    Ok(())
}

/// `CheckInsuranceDataExists`: whether the carrier has submitted any page for the data call.
pub fn data_exists<R: StateRead + ?Sized>(
    state: &R,
    request: &InsuranceRecordAudit,
) -> DataCallResult<bool> {
    required(&request.carrier_id, "CarrierId can not be Empty")?;
    required(&request.data_call_id, "DataCallId can not be Empty")?;
    required(&request.data_call_version, "DataCallVersion can not be Empty")?;

    let key = keys::insurance_audit(
        &request.data_call_id,
        &request.data_call_version,
        &request.carrier_id,
    );
    Ok(state.read(&key)?.is_some_and(|bytes| !bytes.is_empty()))
}

/// `GetInsuranceData`: one stored page from this channel's private collection.
pub fn get_data(
    ctx: &TxContext<'_>,
    request: &InsuranceDataRequest,
) -> DataCallResult<Option<InsuranceData>> {
    required(&request.carrier_id, "CarrierId can not be Empty")?;
    required(&request.data_call_id, "DataCallId can not be Empty")?;
    required(&request.data_call_version, "DataCallVersion can not be Empty")?;
    required(&request.channel_name, "ChannelName can not be Empty")?;

    ctx.get_private(
        &private_collection(ctx.channel()),
        &keys::insurance_data(
            &request.data_call_id,
            &request.data_call_version,
            &request.carrier_id,
            request.page_number,
        ),
    )
}
