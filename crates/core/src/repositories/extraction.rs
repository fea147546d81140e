//! Extraction patterns.
//!
//! Patterns are keyed by `(extractionPatternID, dbType)` and versioned in place: every update
//! bumps the stored version.

use super::{data_calls, parse_version, required};
use crate::config::CoreConfig;
use crate::context::{get_record, scan_records, StateRead, TxContext};
use crate::keys::{self, CompositeKey, KeySpace};
use crate::model::{
    DataCallPatternRequest, DataCallPatternResponse, ExtractionPattern, ExtractionPatternIds,
    ExtractionPatternKey, IdAndVersion, PatternIsSetResponse,
};
use crate::partition::PartitionClient;
use crate::{DataCallError, DataCallResult};
use datacall_types::RecordVersion;

fn all_patterns<R: StateRead + ?Sized>(state: &R) -> DataCallResult<Vec<ExtractionPattern>> {
    scan_records(state, &CompositeKey::space(KeySpace::ExtractionPattern))
}

/// Fields every stored pattern must carry.
fn validate_terms(pattern: &ExtractionPattern) -> DataCallResult<()> {
    required(&pattern.premium_from_date, "PremiumFromDate cannot not be Empty")?;
    required(&pattern.loss_from_date, "LossFromDate cannot not be Empty")?;
    required(&pattern.jurisdiction, "Jurisdiction cannot not be Empty")?;
    required(&pattern.insurance, "Insurance cannot not be Empty")?;
    Ok(())
}

/// `CreateExtractionPattern`.
pub fn create(ctx: &mut TxContext<'_>, mut pattern: ExtractionPattern) -> DataCallResult<ExtractionPattern> {
    required(&pattern.extraction_pattern_id, "ExtractionPatternID cant not be empty!!")?;
    required(&pattern.db_type, "DbType cant not be empty!!")?;
    if pattern.view_definition.map.trim().is_empty()
        || pattern.view_definition.reduce.trim().is_empty()
    {
        return Err(DataCallError::InvalidInput(
            "ViewDefinition cant be empty!!".into(),
        ));
    }
    validate_terms(&pattern)?;

    pattern.version = RecordVersion::FIRST.to_string();
    let key = keys::extraction_pattern(&pattern.extraction_pattern_id, &pattern.db_type);
    if ctx.read(&key)?.is_some() {
        return Err(DataCallError::AlreadyExists(format!(
            "Extraction Pattern already exist with ID: {} and dbType: {}",
            pattern.extraction_pattern_id, pattern.db_type
        )));
    }
    ctx.put(&key, &pattern)?;
    tracing::info!(id = %pattern.extraction_pattern_id, db_type = %pattern.db_type, "created extraction pattern");
    Ok(pattern)
}

/// `UpdateExtractionPattern`: copy the mutable fields onto the stored pattern and bump its
/// version.
pub fn update(ctx: &mut TxContext<'_>, pattern: ExtractionPattern) -> DataCallResult<ExtractionPattern> {
    required(&pattern.extraction_pattern_id, "ExtractionPatternID should not be Empty")?;
    required(&pattern.db_type, "DbType should not be Empty")?;
    validate_terms(&pattern)?;

    let key = keys::extraction_pattern(&pattern.extraction_pattern_id, &pattern.db_type);
    let mut stored: ExtractionPattern = get_record(&*ctx, &key)?.ok_or_else(|| {
        DataCallError::NotFound(format!(
            "No extraction pattern found for ID: {} and dbType: {}",
            pattern.extraction_pattern_id, pattern.db_type
        ))
    })?;

    let version = parse_version(&stored.version)?;
    stored.premium_from_date = pattern.premium_from_date;
    stored.loss_from_date = pattern.loss_from_date;
    stored.jurisdiction = pattern.jurisdiction;
    stored.insurance = pattern.insurance;
    stored.view_definition = pattern.view_definition;
    stored.updated_ts = pattern.updated_ts;
    stored.updated_by = pattern.updated_by;
    stored.is_active = pattern.is_active;
    stored.extraction_pattern_name = pattern.extraction_pattern_name;
    stored.effective_start_ts = pattern.effective_start_ts;
    stored.effective_end_ts = pattern.effective_end_ts;
    stored.description = pattern.description;
    stored.version = version.next().to_string();

    ctx.put(&key, &stored)?;
    Ok(stored)
}

/// `GetExtractionPatternById`.
pub fn get<R: StateRead + ?Sized>(
    state: &R,
    request: &ExtractionPatternKey,
) -> DataCallResult<Option<ExtractionPattern>> {
    if request.extraction_pattern_id.trim().is_empty() || request.db_type.trim().is_empty() {
        return Err(DataCallError::InvalidInput(
            "GetExtractionPatternById: ExtractionPatternID and DbType can not be Empty".into(),
        ));
    }
    get_record(
        state,
        &keys::extraction_pattern(&request.extraction_pattern_id, &request.db_type),
    )
}

/// `GetExtractionPatternByIds`: stored patterns whose id is listed, in key order.
pub fn get_by_ids<R: StateRead + ?Sized>(
    state: &R,
    request: &ExtractionPatternIds,
) -> DataCallResult<Vec<ExtractionPattern>> {
    Ok(all_patterns(state)?
        .into_iter()
        .filter(|p| request.id.contains(&p.extraction_pattern_id))
        .collect())
}

/// `ListExtractionPatterns`: active patterns only.
pub fn list_active<R: StateRead + ?Sized>(state: &R) -> DataCallResult<Vec<ExtractionPattern>> {
    Ok(all_patterns(state)?
        .into_iter()
        .filter(|p| p.is_active)
        .collect())
}

/// `GetDataCallAndExtractionPattern`.
pub fn data_call_and_pattern<R: StateRead + ?Sized>(
    state: &R,
    request: &DataCallPatternRequest,
) -> DataCallResult<DataCallPatternResponse> {
    required(
        &request.data_call_id,
        "GetDataCallAndExtractionPattern: DataCallID can not be Empty",
    )?;
    required(
        &request.data_call_version,
        "GetDataCallAndExtractionPattern: DataCallVersion can not be Empty",
    )?;
    required(&request.db_type, "GetDataCallAndExtractionPattern: DbType can not be Empty")?;

    let data_call = data_calls::find(state, &request.data_call_id, &request.data_call_version)?
        .ok_or_else(|| {
            DataCallError::NotFound(
                "GetDataCallAndExtractionPattern: Unable to GetDataCallByIdAndVersion".into(),
            )
        })?;

    let mut response = DataCallPatternResponse {
        jurisdiction: data_call.jurisdiction.clone(),
        is_set: !data_call.extraction_pattern_id.is_empty(),
        extraction_pattern: ExtractionPattern::default(),
    };
    if response.is_set {
        response.extraction_pattern = get_record(
            state,
            &keys::extraction_pattern(&data_call.extraction_pattern_id, &request.db_type),
        )?
        .ok_or_else(|| {
            DataCallError::NotFound(
                "GetDataCallAndExtractionPattern: Unable to GetExtractionPatternById".into(),
            )
        })?;
    }
    Ok(response)
}

/// `CheckExtractionPatternIsSet`: whether the data call on the default channel names a
/// pattern, and that pattern if it is stored here.
pub fn check_is_set(
    ctx: &TxContext<'_>,
    cfg: &CoreConfig,
    peers: &dyn PartitionClient,
    request: &IdAndVersion,
) -> DataCallResult<PatternIsSetResponse> {
    if request.id.trim().is_empty() || request.version.trim().is_empty() {
        return Err(DataCallError::InvalidInput(
            "ID and Version can not be Empty".into(),
        ));
    }
    let data_call =
        data_calls::find_on_default_channel(ctx, cfg, peers, &request.id, &request.version)?
            .ok_or_else(|| {
                DataCallError::NotFound("CheckExtractionPatternIsSet: DataCall Doesnt exist".into())
            })?;

    if data_call.extraction_pattern_id.is_empty() {
        return Ok(PatternIsSetResponse {
            is_set: false,
            extraction_pattern: None,
        });
    }
    let pattern = all_patterns(ctx)?
        .into_iter()
        .find(|p| p.extraction_pattern_id == data_call.extraction_pattern_id);
    Ok(PatternIsSetResponse {
        is_set: true,
        extraction_pattern: pattern,
    })
}
