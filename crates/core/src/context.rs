//! Transaction context.
//!
//! A [`TxContext`] wraps one channel's committed ledger for the duration of an invocation. Reads
//! observe the invocation's own pending writes. Writes and events are buffered and handed back
//! by [`TxContext::finish`]; the caller applies them only when the invocation succeeded, so a
//! failed invocation leaves world state untouched.

use crate::codec::{self, Record};
use crate::constants::{LAST_TX_ID_META_KEY, ORG_TYPE_ATTRIBUTE};
use crate::error::{DataCallError, DataCallResult};
use crate::keys::{self, CompositeKey};
use crate::ledger::{Ledger, WriteBatch};
use chrono::{DateTime, Utc};
use datacall_txid::TxId;
use serde::Serialize;
use std::collections::BTreeMap;

// ============================================================================
// CALLER IDENTITY
// ============================================================================

/// Attributes of the invoking identity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Identity {
    attributes: BTreeMap<String, String>,
}

impl Identity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_org_type(self, org_type: impl Into<String>) -> Self {
        self.with_attribute(ORG_TYPE_ATTRIBUTE, org_type)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The caller's organisation type.
    ///
    /// # Errors
    ///
    /// Returns [`DataCallError::MissingIdentityAttribute`] if the attribute is absent or blank.
    pub fn org_type(&self) -> DataCallResult<&str> {
        self.attribute(ORG_TYPE_ATTRIBUTE)
            .filter(|v| !v.trim().is_empty())
            .ok_or(DataCallError::MissingIdentityAttribute(ORG_TYPE_ATTRIBUTE))
    }
}

/// An event raised by a successful invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChaincodeEvent {
    pub name: String,
    pub payload: Vec<u8>,
}

// ============================================================================
// STATE READS
// ============================================================================

/// Read access to world state.
pub trait StateRead {
    fn read(&self, key: &CompositeKey) -> DataCallResult<Option<Vec<u8>>>;

    /// Every entry under the partial key `prefix`, in key order.
    fn scan(&self, prefix: &CompositeKey) -> DataCallResult<Vec<(CompositeKey, Vec<u8>)>>;
}

/// Read and decode the record stored under `key`.
pub fn get_record<T, R>(state: &R, key: &CompositeKey) -> DataCallResult<Option<T>>
where
    T: Record,
    R: StateRead + ?Sized,
{
    state
        .read(key)?
        .map(|bytes| codec::decode::<T>(T::KIND, &bytes))
        .transpose()
}

/// Read and decode every record under the partial key `prefix`, in key order.
pub fn scan_records<T, R>(state: &R, prefix: &CompositeKey) -> DataCallResult<Vec<T>>
where
    T: Record,
    R: StateRead + ?Sized,
{
    state
        .scan(prefix)?
        .into_iter()
        .map(|(_, bytes)| codec::decode::<T>(T::KIND, &bytes))
        .collect()
}

/// Committed state of a ledger, without any pending writes.
pub struct Snapshot<'a> {
    ledger: &'a dyn Ledger,
}

impl<'a> Snapshot<'a> {
    pub fn new(ledger: &'a dyn Ledger) -> Self {
        Self { ledger }
    }
}

impl StateRead for Snapshot<'_> {
    fn read(&self, key: &CompositeKey) -> DataCallResult<Option<Vec<u8>>> {
        Ok(self.ledger.get(&key.encode())?)
    }

    fn scan(&self, prefix: &CompositeKey) -> DataCallResult<Vec<(CompositeKey, Vec<u8>)>> {
        self.ledger
            .scan_prefix(&prefix.encode())?
            .into_iter()
            .map(|(k, v)| Ok((CompositeKey::decode(&k)?, v)))
            .collect()
    }
}

// ============================================================================
// TRANSACTION CONTEXT
// ============================================================================

/// State and metadata for one invocation.
pub struct TxContext<'a> {
    ledger: &'a dyn Ledger,
    tx_id: TxId,
    channel: String,
    identity: Identity,
    transient: BTreeMap<String, Vec<u8>>,
    writes: WriteBatch,
    events: Vec<ChaincodeEvent>,
}

impl<'a> TxContext<'a> {
    /// Start a transaction on `ledger`.
    ///
    /// The transaction id continues from the last id recorded in the ledger's meta key space.
    pub fn begin(
        ledger: &'a dyn Ledger,
        channel: impl Into<String>,
        identity: Identity,
        transient: BTreeMap<String, Vec<u8>>,
        now: DateTime<Utc>,
    ) -> DataCallResult<Self> {
        let meta_key = keys::meta(LAST_TX_ID_META_KEY);
        let last: Option<String> = ledger
            .get(&meta_key.encode())?
            .map(|bytes| codec::decode("last transaction id", &bytes))
            .transpose()?;
        let tx_id = TxId::generate_from_str(last.as_deref(), now)?;

        Ok(Self {
            ledger,
            tx_id,
            channel: channel.into(),
            identity,
            transient,
            writes: WriteBatch::default(),
            events: Vec::new(),
        })
    }

    pub fn tx_id(&self) -> &TxId {
        &self.tx_id
    }

    /// Transaction timestamp; identical for every read of the same invocation.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.tx_id.timestamp()
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn transient(&self, key: &str) -> Option<&[u8]> {
        self.transient.get(key).map(Vec::as_slice)
    }

    pub fn put<T: Record>(&mut self, key: &CompositeKey, record: &T) -> DataCallResult<()> {
        let bytes = codec::encode(T::KIND, record)?;
        self.writes.public.insert(key.encode(), Some(bytes));
        Ok(())
    }

    pub fn delete(&mut self, key: &CompositeKey) {
        self.writes.public.insert(key.encode(), None);
    }

    pub fn put_private<T: Record>(
        &mut self,
        collection: &str,
        key: &CompositeKey,
        record: &T,
    ) -> DataCallResult<()> {
        let bytes = codec::encode(T::KIND, record)?;
        self.writes
            .private
            .entry(collection.to_owned())
            .or_default()
            .insert(key.encode(), bytes);
        Ok(())
    }

    pub fn get_private<T: Record>(
        &self,
        collection: &str,
        key: &CompositeKey,
    ) -> DataCallResult<Option<T>> {
        let encoded = key.encode();
        let pending = self
            .writes
            .private
            .get(collection)
            .and_then(|entries| entries.get(&encoded))
            .cloned();
        let bytes = match pending {
            Some(bytes) => Some(bytes),
            None => self.ledger.get_private(collection, &encoded)?,
        };
        bytes
            .map(|b| codec::decode::<T>(T::KIND, &b))
            .transpose()
    }

    pub fn emit<T: Serialize>(&mut self, name: &str, payload: &T) -> DataCallResult<()> {
        let payload = codec::encode("event payload", payload)?;
        self.events.push(ChaincodeEvent {
            name: name.to_owned(),
            payload,
        });
        Ok(())
    }

    /// End the transaction, returning its buffered writes and events.
    ///
    /// A transaction that wrote or emitted something also records its id in the meta key
    /// space. A read-only transaction returns an empty batch.
    pub fn finish(mut self) -> DataCallResult<(WriteBatch, Vec<ChaincodeEvent>)> {
        if !self.writes.is_empty() || !self.events.is_empty() {
            let encoded = codec::encode("last transaction id", &self.tx_id.to_string())?;
            self.writes
                .public
                .insert(keys::meta(LAST_TX_ID_META_KEY).encode(), Some(encoded));
        }
        Ok((self.writes, self.events))
    }
}

impl StateRead for TxContext<'_> {
    fn read(&self, key: &CompositeKey) -> DataCallResult<Option<Vec<u8>>> {
        let encoded = key.encode();
        match self.writes.public.get(&encoded) {
            Some(pending) => Ok(pending.clone()),
            None => Ok(self.ledger.get(&encoded)?),
        }
    }

    fn scan(&self, prefix: &CompositeKey) -> DataCallResult<Vec<(CompositeKey, Vec<u8>)>> {
        let encoded = prefix.encode();
        let mut merged: BTreeMap<String, Vec<u8>> =
            self.ledger.scan_prefix(&encoded)?.into_iter().collect();

        for (key, pending) in self
            .writes
            .public
            .range(encoded.clone()..)
            .take_while(|(k, _)| k.starts_with(&encoded))
        {
            match pending {
                Some(bytes) => {
                    merged.insert(key.clone(), bytes.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        merged
            .into_iter()
            .map(|(k, v)| Ok((CompositeKey::decode(&k)?, v)))
            .collect()
    }
}
