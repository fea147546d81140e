//! World state reset.

use crate::context::{StateRead, TxContext};
use crate::keys::{CompositeKey, KeySpace};
use crate::DataCallResult;

/// Key spaces cleared by a reset. Extraction patterns, insurance records and the meta space
/// survive.
const RESET_SPACES: [KeySpace; 8] = [
    KeySpace::DataCall,
    KeySpace::Report,
    KeySpace::Like,
    KeySpace::LikeCount,
    KeySpace::Consent,
    KeySpace::ConsentCount,
    KeySpace::DataCallLog,
    KeySpace::DataCallCount,
];

/// `ResetWorldState`: delete every data call related record, returning how many were deleted.
pub fn reset_world_state(ctx: &mut TxContext<'_>) -> DataCallResult<usize> {
    let mut deleted = 0;
    for space in RESET_SPACES {
        let entries = ctx.scan(&CompositeKey::space(space))?;
        tracing::debug!(space = space.as_str(), count = entries.len(), "deleting records");
        for (key, _) in &entries {
            ctx.delete(key);
        }
        deleted += entries.len();
    }
    tracing::info!(deleted, "reset world state");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DataCall, ExtractionPattern, ViewDefinition};
    use crate::repositories::{data_calls, extraction, query};
    use crate::testing::TestLedger;

    #[test]
    fn test_reset_clears_data_calls_and_counters() {
        let mut ledger = TestLedger::new();
        for id in ["DC1", "DC2"] {
            let dc = DataCall {
                id: id.into(),
                ..DataCall::default()
            };
            ledger
                .run(|ctx| data_calls::create_data_call(ctx, dc))
                .unwrap();
        }
        let pattern = ExtractionPattern {
            extraction_pattern_id: "EP1".into(),
            db_type: "mongo".into(),
            view_definition: ViewDefinition {
                map: "m".into(),
                reduce: "r".into(),
            },
            premium_from_date: "2019-01-01".into(),
            loss_from_date: "2019-01-01".into(),
            jurisdiction: "NY".into(),
            insurance: "HO".into(),
            is_active: true,
            ..ExtractionPattern::default()
        };
        ledger.run(|ctx| extraction::create(ctx, pattern)).unwrap();

        let deleted = ledger.run(reset_world_state).unwrap();
        assert!(deleted >= 2);

        assert!(ledger.read(|s| data_calls::find(s, "DC1", "1")).unwrap().is_none());
        let counters = ledger
            .read(|s| s.scan(&CompositeKey::space(KeySpace::DataCallCount)))
            .unwrap();
        assert!(counters.is_empty());
        assert_eq!(ledger.read(|s| extraction::list_active(s)).unwrap().len(), 1);

        let criteria = crate::model::ListCriteria {
            status: "DRAFT".into(),
            version: "latest".into(),
            ..Default::default()
        };
        let list = ledger.read(|s| query::list_by_criteria(s, &criteria)).unwrap();
        assert!(list.data_calls.is_empty());
        assert_eq!(list.total_no_of_records, 0);

        assert_eq!(ledger.run(reset_world_state).unwrap(), 0);
    }
}
