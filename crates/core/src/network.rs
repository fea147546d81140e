//! The set of channels hosted by one process.
//!
//! A [`Network`] owns one [`Ledger`] per hosted channel and runs invocations against them. While
//! an invocation runs, the other hosted channels answer its cross-partition queries from their
//! committed state.

use crate::config::CoreConfig;
use crate::context::Snapshot;
use crate::dispatch::{DataCallContract, Invocation, Response};
use crate::ledger::{FileLedger, Ledger, MemoryLedger};
use crate::model::{ConsentListing, DataCall, DataCallRef, LikeListing, PartitionRef};
use crate::partition::{PartitionClient, PartitionError, PartitionResult};
use crate::repositories::{consents, data_calls, likes};
use crate::{DataCallError, DataCallResult};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

pub struct Network {
    contract: DataCallContract,
    channels: BTreeMap<String, Box<dyn Ledger>>,
}

impl Network {
    /// Host every configured channel in memory.
    pub fn in_memory(cfg: Arc<CoreConfig>) -> Self {
        let channels = cfg
            .channels()
            .iter()
            .map(|name| (name.clone(), Box::new(MemoryLedger::new()) as Box<dyn Ledger>))
            .collect();
        Self {
            contract: DataCallContract::new(cfg),
            channels,
        }
    }

    /// Host every configured channel from `<state_dir>/<channel>.json`.
    ///
    /// # Errors
    ///
    /// Returns [`DataCallError::Ledger`] if an existing snapshot cannot be read.
    pub fn open(cfg: Arc<CoreConfig>, state_dir: &Path) -> DataCallResult<Self> {
        let mut channels: BTreeMap<String, Box<dyn Ledger>> = BTreeMap::new();
        for name in cfg.channels() {
            let ledger = FileLedger::open(state_dir.join(format!("{name}.json")))?;
            tracing::debug!(channel = %name, path = %ledger.path().display(), "opened channel ledger");
            channels.insert(name.clone(), Box::new(ledger));
        }
        Ok(Self {
            contract: DataCallContract::new(cfg),
            channels,
        })
    }

    pub fn config(&self) -> &CoreConfig {
        self.contract.config()
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    /// Run `invocation` on `channel` and commit its writes.
    ///
    /// # Errors
    ///
    /// Returns [`DataCallError::UnknownChannel`] if `channel` is not hosted here, or the error
    /// the invocation failed with. A failed invocation commits nothing.
    pub fn invoke(&mut self, channel: &str, invocation: Invocation) -> DataCallResult<Response> {
        let endorsement = {
            let ledger = self
                .channels
                .get(channel)
                .ok_or_else(|| DataCallError::UnknownChannel(channel.to_owned()))?;
            let view = NetworkView {
                chaincode_name: self.contract.config().chaincode_name(),
                channels: &self.channels,
            };
            self.contract
                .invoke(channel, ledger.as_ref(), &view, invocation)?
        };

        let ledger = self
            .channels
            .get_mut(channel)
            .ok_or_else(|| DataCallError::UnknownChannel(channel.to_owned()))?;
        let written = endorsement.writes.len();
        ledger.apply(endorsement.writes)?;
        tracing::debug!(%channel, written, "committed");
        Ok(endorsement.response)
    }
}

/// Cross-partition queries answered from the other channels' committed state.
struct NetworkView<'a> {
    chaincode_name: &'a str,
    channels: &'a BTreeMap<String, Box<dyn Ledger>>,
}

impl<'a> NetworkView<'a> {
    fn snapshot(&self, partition: &PartitionRef) -> PartitionResult<Snapshot<'a>> {
        let ledger = self
            .channels
            .get(&partition.channel_name)
            .ok_or_else(|| PartitionError::UnknownChannel(partition.channel_name.clone()))?;
        if partition.chaincode_name != self.chaincode_name {
            return Err(PartitionError::UnknownChaincode {
                channel: partition.channel_name.clone(),
                chaincode: partition.chaincode_name.clone(),
            });
        }
        Ok(Snapshot::new(ledger.as_ref()))
    }
}

fn remote(err: DataCallError) -> PartitionError {
    PartitionError::Remote(err.to_string())
}

impl PartitionClient for NetworkView<'_> {
    fn get_data_call(
        &self,
        partition: &PartitionRef,
        id: &str,
        version: &str,
    ) -> PartitionResult<Option<DataCall>> {
        data_calls::find(&self.snapshot(partition)?, id, version).map_err(remote)
    }

    fn get_likes(
        &self,
        partition: &PartitionRef,
        data_call: &DataCallRef,
    ) -> PartitionResult<Vec<LikeListing>> {
        likes::by_data_call(&self.snapshot(partition)?, data_call).map_err(remote)
    }

    fn get_consents(
        &self,
        partition: &PartitionRef,
        data_call: &DataCallRef,
    ) -> PartitionResult<Vec<ConsentListing>> {
        consents::by_data_call(&self.snapshot(partition)?, data_call).map_err(remote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ADVISORY_ORG_TYPE, CARRIER_ORG_TYPE, DEFAULT_CHAINCODE_NAME};
    use crate::context::Identity;
    use crate::partition::FanOutResponse;
    use crate::testing::ts;

    const CARRIER_CHANNEL: &str = "carrier-channel";

    fn setup_test_env() -> Network {
        let cfg = CoreConfig::new(
            DEFAULT_CHAINCODE_NAME.into(),
            "defaultchannel".into(),
            DEFAULT_CHAINCODE_NAME.into(),
            vec!["defaultchannel".into(), CARRIER_CHANNEL.into()],
        )
        .unwrap();
        let mut network = Network::in_memory(Arc::new(cfg));
        network
            .invoke(
                "defaultchannel",
                as_org(ADVISORY_ORG_TYPE, "CreateDataCall")
                    .arg(r#"{"id":"DC1","name":"Auto","status":"ISSUED"}"#),
            )
            .unwrap();
        network
    }

    fn as_org(org_type: &str, function: &str) -> Invocation {
        Invocation::new(function, Identity::new().with_org_type(org_type))
            .at(ts("2026-03-01T09:00:00.000Z"))
    }

    fn like(org: &str) -> String {
        format!(
            r#"{{"datacallID":"DC1","dataCallVersion":"1","organizationID":"{org}","organizationType":"carrier","liked":true}}"#
        )
    }

    #[test]
    fn test_like_on_carrier_channel_checks_default_channel() {
        let mut network = setup_test_env();
        let response = network
            .invoke(CARRIER_CHANNEL, as_org(CARRIER_ORG_TYPE, "ToggleLike").arg(like("C1")))
            .unwrap();
        assert_eq!(response.events[0].name, "ToggleLikeEvent");

        let missing = like("C1").replace("DC1", "DC2");
        let err = network
            .invoke(CARRIER_CHANNEL, as_org(CARRIER_ORG_TYPE, "ToggleLike").arg(missing))
            .unwrap_err();
        assert!(matches!(err, DataCallError::NotFound(_)));
    }

    #[test]
    fn test_list_likes_across_channels() {
        let mut network = setup_test_env();
        network
            .invoke("defaultchannel", as_org(CARRIER_ORG_TYPE, "ToggleLike").arg(like("C0")))
            .unwrap();
        network
            .invoke(CARRIER_CHANNEL, as_org(CARRIER_ORG_TYPE, "ToggleLike").arg(like("C1")))
            .unwrap();

        let request = format!(
            r#"{{"dataCallID":"DC1","dataCallVersion":"1","channelList":[
                {{"channelName":"{CARRIER_CHANNEL}","chaincodeName":"{DEFAULT_CHAINCODE_NAME}"}},
                {{"channelName":"missing-channel","chaincodeName":"{DEFAULT_CHAINCODE_NAME}"}},
                {{"channelName":"{CARRIER_CHANNEL}","chaincodeName":"other-cc"}}
            ]}}"#
        );
        let response = network
            .invoke(
                "defaultchannel",
                as_org(ADVISORY_ORG_TYPE, "ListLikesByDataCall").arg(request),
            )
            .unwrap();
        let listed: FanOutResponse<LikeListing> =
            serde_json::from_slice(&response.payload).unwrap();

        let orgs: Vec<_> = listed
            .results
            .iter()
            .map(|l| l.like.organization_id.as_str())
            .collect();
        assert_eq!(orgs, vec!["C0", "C1"]);
        let failed: Vec<_> = listed
            .failed_partitions
            .iter()
            .map(|p| (p.channel_name.as_str(), p.chaincode_name.as_str()))
            .collect();
        assert_eq!(
            failed,
            vec![("missing-channel", DEFAULT_CHAINCODE_NAME), (CARRIER_CHANNEL, "other-cc")]
        );
    }

    #[test]
    fn test_private_data_stays_on_its_channel() {
        let mut network = setup_test_env();
        let page = r#"{"pageNumber":1,"carrierId":"C1","dataCallId":"DC1","dataCallVersion":"1","records":[{"policy":"P-1"}]}"#;
        network
            .invoke(
                CARRIER_CHANNEL,
                as_org(CARRIER_ORG_TYPE, "SaveInsuranceData")
                    .transient("transactional-data-", page.as_bytes()),
            )
            .unwrap();

        let request = format!(
            r#"{{"channelName":"{CARRIER_CHANNEL}","dataCallId":"DC1","dataCallVersion":"1","carrierId":"C1","pageNumber":1}}"#
        );
        let here = network
            .invoke(
                CARRIER_CHANNEL,
                as_org(CARRIER_ORG_TYPE, "GetInsuranceData").arg(request.clone()),
            )
            .unwrap();
        assert!(!here.payload.is_empty());

        let elsewhere = network
            .invoke(
                "defaultchannel",
                as_org(ADVISORY_ORG_TYPE, "GetInsuranceData").arg(request),
            )
            .unwrap();
        assert!(elsewhere.payload.is_empty());
    }

    #[test]
    fn test_unknown_channel() {
        let mut network = setup_test_env();
        let err = network
            .invoke("nowhere", as_org(ADVISORY_ORG_TYPE, "Ping"))
            .unwrap_err();
        assert!(matches!(err, DataCallError::UnknownChannel(c) if c == "nowhere"));
    }

    #[test]
    fn test_file_backed_network_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Arc::new(CoreConfig::default());
        {
            let mut network = Network::open(cfg.clone(), dir.path()).unwrap();
            network
                .invoke(
                    "defaultchannel",
                    as_org(ADVISORY_ORG_TYPE, "CreateDataCall").arg(r#"{"id":"DC1"}"#),
                )
                .unwrap();
        }

        let mut network = Network::open(cfg, dir.path()).unwrap();
        let response = network
            .invoke(
                "defaultchannel",
                as_org(ADVISORY_ORG_TYPE, "GetDataCallByIdAndVersion")
                    .arg(r#"{"id":"DC1","version":"1"}"#),
            )
            .unwrap();
        let stored: DataCall = serde_json::from_slice(&response.payload).unwrap();
        assert!(stored.is_latest);
        assert_eq!(
            network.channel_names().collect::<Vec<_>>(),
            vec!["defaultchannel"]
        );
    }

    #[test]
    fn test_queries_leave_snapshot_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("defaultchannel.json");
        let mut network = Network::open(Arc::new(CoreConfig::default()), dir.path()).unwrap();
        network
            .invoke(
                "defaultchannel",
                as_org(ADVISORY_ORG_TYPE, "CreateDataCall").arg(r#"{"id":"DC1"}"#),
            )
            .unwrap();
        let before = std::fs::read(&snapshot).unwrap();

        network
            .invoke("defaultchannel", as_org(ADVISORY_ORG_TYPE, "Ping"))
            .unwrap();
        network
            .invoke(
                "defaultchannel",
                as_org(CARRIER_ORG_TYPE, "GetDataCallByIdAndVersion")
                    .arg(r#"{"id":"DC1","version":"1"}"#),
            )
            .unwrap();
        assert_eq!(std::fs::read(&snapshot).unwrap(), before);

        network
            .invoke(
                "defaultchannel",
                as_org(CARRIER_ORG_TYPE, "ToggleLike").arg(like("C1")),
            )
            .unwrap();
        assert_ne!(std::fs::read(&snapshot).unwrap(), before);
    }
}
