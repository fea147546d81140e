//! Likes and like counts.

use super::{data_calls, required};
use crate::config::CoreConfig;
use crate::constants::EVENT_TOGGLE_LIKE;
use crate::context::{get_record, scan_records, StateRead, TxContext};
use crate::keys;
use crate::model::{DataCallRef, FanOutRequest, Like, LikeCountEntry, LikeListing, LikeLookup};
use crate::partition::{scatter_gather, FanOutResponse, PartitionClient};
use crate::{DataCallError, DataCallResult};

/// `ToggleLike`: record an organisation's like or unlike of a data call version.
///
/// The data call must exist on the default channel. A like is only written, and the toggle
/// event only raised, when the liked flag actually changes.
pub fn toggle(
    ctx: &mut TxContext<'_>,
    cfg: &CoreConfig,
    peers: &dyn PartitionClient,
    like: Like,
) -> DataCallResult<Like> {
    let exists = data_calls::find_on_default_channel(
        ctx,
        cfg,
        peers,
        &like.data_call_id,
        &like.data_call_version,
    )?
    .is_some();
    if !exists {
        return Err(DataCallError::NotFound(
            "No Matching datacallId and datacallVersion specified in Like message".into(),
        ));
    }

    let key = keys::like(&like.data_call_id, &like.data_call_version, &like.organization_id);
    let previous: Option<Like> = get_record(&*ctx, &key)?;
    let changed = match &previous {
        None if !like.liked => {
            return Err(DataCallError::InvalidInput(
                "Can't Unlike DataCall, as it is not Liked".into(),
            ));
        }
        None => true,
        Some(prev) => prev.liked != like.liked,
    };

    if changed {
        ctx.put(&key, &like)?;
        ctx.emit(EVENT_TOGGLE_LIKE, &like)?;
        tracing::info!(
            data_call_id = %like.data_call_id,
            organization_id = %like.organization_id,
            liked = like.liked,
            "toggled like"
        );
    }
    Ok(like)
}

/// `GetLikesByDataCall`: likes stored on this channel.
pub fn by_data_call<R: StateRead + ?Sized>(
    state: &R,
    request: &DataCallRef,
) -> DataCallResult<Vec<LikeListing>> {
    if request.data_call_id.trim().is_empty() || request.data_call_version.trim().is_empty() {
        return Err(DataCallError::InvalidInput(
            "DataCallID or DataCallVersion can't be empty".into(),
        ));
    }
    let likes: Vec<Like> = scan_records(
        state,
        &keys::likes(&request.data_call_id, &request.data_call_version),
    )?;
    Ok(likes
        .into_iter()
        .map(|like| LikeListing {
            like,
            organization_name: String::new(),
        })
        .collect())
}

/// `ListLikesByDataCall`: likes on this channel plus every listed partition.
///
/// A listed partition naming the current channel is skipped; its likes are already part of
/// the local results.
pub fn list_by_data_call(
    ctx: &TxContext<'_>,
    peers: &dyn PartitionClient,
    request: &FanOutRequest,
) -> DataCallResult<FanOutResponse<LikeListing>> {
    let data_call = request.data_call();
    let local = by_data_call(ctx, &data_call)?;
    let remote: Vec<_> = request
        .channel_list
        .iter()
        .filter(|p| p.channel_name != ctx.channel())
        .cloned()
        .collect();
    Ok(scatter_gather(local, &remote, |partition| {
        peers.get_likes(partition, &data_call)
    }))
}

/// `GetLikeByDataCallAndOrganization`: the like stored on this channel only.
///
/// `channelIDs` in the request is accepted but never queried.
pub fn by_organization<R: StateRead + ?Sized>(
    state: &R,
    request: &LikeLookup,
) -> DataCallResult<Vec<LikeListing>> {
    let like = &request.like;
    let found: Option<Like> = get_record(
        state,
        &keys::like(&like.data_call_id, &like.data_call_version, &like.organization_id),
    )?;
    Ok(found
        .into_iter()
        .map(|like| LikeListing {
            like,
            organization_name: String::new(),
        })
        .collect())
}

/// `CreateLikeCountEntry`: append a delta under the current transaction id.
pub fn create_count_entry(ctx: &mut TxContext<'_>, entry: LikeCountEntry) -> DataCallResult<()> {
    let tx_id = ctx.tx_id().to_string();
    ctx.put(
        &keys::like_count_entry(&entry.data_call_id, &entry.data_call_version, &tx_id),
        &entry,
    )
}

/// `CountLikes`: the request echoed back with `delta` set to the sum of stored deltas.
pub fn count<R: StateRead + ?Sized>(state: &R, mut request: LikeCountEntry) -> DataCallResult<LikeCountEntry> {
    let entries: Vec<LikeCountEntry> = scan_records(
        state,
        &keys::like_count_entries(&request.data_call_id, &request.data_call_version),
    )?;
    request.delta = entries.iter().map(|e| e.delta).sum();
    Ok(request)
}

/// `UpdateLikeCountForDataCall`: store the summed like count on the data call.
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
        LikeCountEntry {
            data_call_id: request.data_call_id.clone(),
            data_call_version: request.data_call_version.clone(),
            ..LikeCountEntry::default()
        },
    )?
    .delta;

    data_call.like_count = total;
    ctx.put(&keys::data_call(&data_call.id, &data_call.version), &data_call)?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DataCall, PartitionRef};
    use crate::partition::{NoPeers, PartitionError, PartitionResult};
    use crate::testing::TestLedger;

    fn setup_test_env() -> (TestLedger, CoreConfig) {
        let mut ledger = TestLedger::new();
        let dc = DataCall {
            id: "DC1".into(),
            ..DataCall::default()
        };
        ledger
            .run(|ctx| data_calls::create_data_call(ctx, dc))
            .unwrap();
        (ledger, CoreConfig::default())
    }

    fn like(org: &str, liked: bool) -> Like {
        Like {
            data_call_id: "DC1".into(),
            data_call_version: "1".into(),
            organization_id: org.into(),
            organization_type: "carrier".into(),
            liked,
            ..Like::default()
        }
    }

    fn data_call_ref() -> DataCallRef {
        DataCallRef {
            data_call_id: "DC1".into(),
            data_call_version: "1".into(),
        }
    }

    #[test]
    fn test_toggle_emits_only_on_change() {
        let (mut ledger, cfg) = setup_test_env();
        let (_, events) = ledger
            .run_with_events(|ctx| toggle(ctx, &cfg, &NoPeers, like("org1", true)))
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, EVENT_TOGGLE_LIKE);

        let (_, events) = ledger
            .run_with_events(|ctx| toggle(ctx, &cfg, &NoPeers, like("org1", true)))
            .unwrap();
        assert!(events.is_empty());

        let (_, events) = ledger
            .run_with_events(|ctx| toggle(ctx, &cfg, &NoPeers, like("org1", false)))
            .unwrap();
        assert_eq!(events.len(), 1);
        let listed = ledger.read(|s| by_data_call(s, &data_call_ref())).unwrap();
        assert!(!listed[0].like.liked);
    }

    #[test]
    fn test_cannot_unlike_without_like() {
        let (mut ledger, cfg) = setup_test_env();
        let err = ledger
            .run(|ctx| toggle(ctx, &cfg, &NoPeers, like("org1", false)))
            .unwrap_err();
        assert!(matches!(err, DataCallError::InvalidInput(m) if m.contains("not Liked")));
    }

    #[test]
    fn test_toggle_requires_data_call() {
        let (mut ledger, cfg) = setup_test_env();
        let mut missing = like("org1", true);
        missing.data_call_version = "7".into();
        let err = ledger
            .run(|ctx| toggle(ctx, &cfg, &NoPeers, missing))
            .unwrap_err();
        assert!(matches!(err, DataCallError::NotFound(_)));
    }

    #[test]
    fn test_toggle_off_default_channel_asks_peers() {
        let cfg = CoreConfig::default();
        let mut ledger = TestLedger::new().on_channel("carrier-channel");
        let err = ledger
            .run(|ctx| toggle(ctx, &cfg, &NoPeers, like("org1", true)))
            .unwrap_err();
        assert!(matches!(
            err,
            DataCallError::Partition(PartitionError::UnknownChannel(c)) if c == "defaultchannel"
        ));
    }

    struct OnePeer;

    impl PartitionClient for OnePeer {
        fn get_data_call(&self, _: &PartitionRef, _: &str, _: &str) -> PartitionResult<Option<DataCall>> {
            Ok(None)
        }

        fn get_likes(&self, partition: &PartitionRef, _: &DataCallRef) -> PartitionResult<Vec<LikeListing>> {
            match partition.channel_name.as_str() {
                "peer" => Ok(vec![LikeListing {
                    like: like("remote-org", true),
                    organization_name: String::new(),
                }]),
                other => Err(PartitionError::UnknownChannel(other.into())),
            }
        }

        fn get_consents(
            &self,
            _: &PartitionRef,
            _: &DataCallRef,
        ) -> PartitionResult<Vec<crate::model::ConsentListing>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_list_merges_partitions_and_reports_failures() {
        let (mut ledger, cfg) = setup_test_env();
        ledger
            .run(|ctx| toggle(ctx, &cfg, &NoPeers, like("org1", true)))
            .unwrap();

        let partition = |name: &str| PartitionRef {
            channel_name: name.into(),
            chaincode_name: "openidl-cc-default".into(),
        };
        let request = FanOutRequest {
            data_call_id: "DC1".into(),
            data_call_version: "1".into(),
            channel_list: vec![partition("defaultchannel"), partition("peer"), partition("gone")],
        };
        let response = ledger
            .run(|ctx| list_by_data_call(ctx, &OnePeer, &request))
            .unwrap();

        let orgs: Vec<_> = response
            .results
            .iter()
            .map(|l| l.like.organization_id.as_str())
            .collect();
        assert_eq!(orgs, vec!["org1", "remote-org"]);
        assert_eq!(response.failed_partitions.len(), 1);
        assert_eq!(response.failed_partitions[0].channel_name, "gone");
    }

    #[test]
    fn test_count_entries_sum_into_data_call() {
        let (mut ledger, _) = setup_test_env();
        for delta in [1, 1, -1, 1] {
            let entry = LikeCountEntry {
                data_call_id: "DC1".into(),
                data_call_version: "1".into(),
                delta,
                ..LikeCountEntry::default()
            };
            ledger.run(|ctx| create_count_entry(ctx, entry)).unwrap();
        }

        let total = ledger
            .run(|ctx| update_count_for_data_call(ctx, &data_call_ref()))
            .unwrap();
        assert_eq!(total, 2);
        let stored = ledger
            .read(|s| data_calls::find(s, "DC1", "1"))
            .unwrap()
            .unwrap();
        assert_eq!(stored.like_count, 2);
    }

    #[test]
    fn test_get_by_organization() {
        let (mut ledger, cfg) = setup_test_env();
        ledger
            .run(|ctx| toggle(ctx, &cfg, &NoPeers, like("org1", true)))
            .unwrap();
        let lookup = LikeLookup {
            like: like("org1", true),
            channel_ids: vec!["carrier-channel".into()],
        };
        assert_eq!(ledger.read(|s| by_organization(s, &lookup)).unwrap().len(), 1);

        let lookup = LikeLookup {
            like: like("org2", true),
            channel_ids: vec![],
        };
        assert!(ledger.read(|s| by_organization(s, &lookup)).unwrap().is_empty());
    }
}
