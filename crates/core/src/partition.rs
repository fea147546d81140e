//! Cross-partition queries.
//!
//! A partition is another channel, addressed by channel and chaincode name. Operations that
//! need data from other partitions go through a [`PartitionClient`], which exposes one typed
//! method per remote query. [`scatter_gather`] runs a query over a list of partitions and
//! reports the partitions that failed next to the merged results.

use crate::model::{ConsentListing, DataCall, DataCallRef, LikeListing, PartitionRef};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum PartitionError {
    #[error("channel '{0}' is not reachable from this peer")]
    UnknownChannel(String),
    #[error("chaincode '{chaincode}' is not installed on channel '{channel}'")]
    UnknownChaincode { channel: String, chaincode: String },
    #[error("remote query failed: {0}")]
    Remote(String),
}

pub type PartitionResult<T> = std::result::Result<T, PartitionError>;

/// Read-only queries against other partitions.
pub trait PartitionClient {
    /// `GetDataCallByIdAndVersion` on `partition`.
    fn get_data_call(
        &self,
        partition: &PartitionRef,
        id: &str,
        version: &str,
    ) -> PartitionResult<Option<DataCall>>;

    /// `GetLikesByDataCall` on `partition`.
    fn get_likes(
        &self,
        partition: &PartitionRef,
        data_call: &DataCallRef,
    ) -> PartitionResult<Vec<LikeListing>>;

    /// `GetConsentsByDataCall` on `partition`.
    fn get_consents(
        &self,
        partition: &PartitionRef,
        data_call: &DataCallRef,
    ) -> PartitionResult<Vec<ConsentListing>>;
}

/// A client for a peer that hosts no other partitions.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPeers;

impl PartitionClient for NoPeers {
    fn get_data_call(
        &self,
        partition: &PartitionRef,
        _id: &str,
        _version: &str,
    ) -> PartitionResult<Option<DataCall>> {
        Err(PartitionError::UnknownChannel(partition.channel_name.clone()))
    }

    fn get_likes(
        &self,
        partition: &PartitionRef,
        _data_call: &DataCallRef,
    ) -> PartitionResult<Vec<LikeListing>> {
        Err(PartitionError::UnknownChannel(partition.channel_name.clone()))
    }

    fn get_consents(
        &self,
        partition: &PartitionRef,
        _data_call: &DataCallRef,
    ) -> PartitionResult<Vec<ConsentListing>> {
        Err(PartitionError::UnknownChannel(partition.channel_name.clone()))
    }
}

/// A partition that could not be queried.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedPartition {
    pub channel_name: String,
    pub chaincode_name: String,
    pub reason: String,
}

/// Merged results of a fan-out query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanOutResponse<T> {
    pub results: Vec<T>,
    pub failed_partitions: Vec<FailedPartition>,
}

/// Append the results of `query` on every partition to `local`.
///
/// A failing partition is recorded in `failed_partitions` and does not stop the remaining
/// partitions from being queried.
pub fn scatter_gather<T, F>(local: Vec<T>, partitions: &[PartitionRef], mut query: F) -> FanOutResponse<T>
where
    F: FnMut(&PartitionRef) -> PartitionResult<Vec<T>>,
{
    let mut response = FanOutResponse {
        results: local,
        failed_partitions: Vec::new(),
    };

    for partition in partitions {
        match query(partition) {
            Ok(mut found) => {
                tracing::debug!(
                    channel = %partition.channel_name,
                    count = found.len(),
                    "partition query returned"
                );
                response.results.append(&mut found);
            }
            Err(err) => {
                tracing::warn!(
                    channel = %partition.channel_name,
                    chaincode = %partition.chaincode_name,
                    error = %err,
                    "partition query failed"
                );
                response.failed_partitions.push(FailedPartition {
                    channel_name: partition.channel_name.clone(),
                    chaincode_name: partition.chaincode_name.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }
    response
}
