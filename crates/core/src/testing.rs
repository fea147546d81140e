//! Helpers shared by the crate's unit tests.

use crate::context::{ChaincodeEvent, Identity, Snapshot, TxContext};
use crate::ledger::{Ledger, MemoryLedger};
use crate::DataCallResult;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

pub fn ts(text: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text)
        .unwrap()
        .with_timezone(&Utc)
}

/// A single-channel ledger that commits each closure as one transaction.
pub struct TestLedger {
    pub ledger: MemoryLedger,
    pub channel: String,
    pub identity: Identity,
    pub transient: BTreeMap<String, Vec<u8>>,
    pub now: DateTime<Utc>,
}

impl TestLedger {
    pub fn new() -> Self {
        Self {
            ledger: MemoryLedger::new(),
            channel: "defaultchannel".into(),
            identity: Identity::new().with_org_type("advisory"),
            transient: BTreeMap::new(),
            now: ts("2026-03-01T09:00:00.000Z"),
        }
    }

    pub fn on_channel(mut self, channel: &str) -> Self {
        self.channel = channel.into();
        self
    }

    /// Run `f` in a transaction, committing its writes only if it succeeds.
    pub fn run<T>(
        &mut self,
        f: impl FnOnce(&mut TxContext<'_>) -> DataCallResult<T>,
    ) -> DataCallResult<T> {
        self.run_with_events(f).map(|(value, _)| value)
    }

    pub fn run_with_events<T>(
        &mut self,
        f: impl FnOnce(&mut TxContext<'_>) -> DataCallResult<T>,
    ) -> DataCallResult<(T, Vec<ChaincodeEvent>)> {
        let (result, finished) = {
            let mut ctx = TxContext::begin(
                &self.ledger,
                self.channel.clone(),
                self.identity.clone(),
                self.transient.clone(),
                self.now,
            )?;
            let result = f(&mut ctx);
            (result, ctx.finish())
        };
        let value = result?;
        let (batch, events) = finished?;
        self.ledger.apply(batch)?;
        Ok((value, events))
    }

    pub fn read<T>(&self, f: impl FnOnce(&Snapshot<'_>) -> DataCallResult<T>) -> DataCallResult<T> {
        f(&Snapshot::new(&self.ledger))
    }

    /// A copy of the committed state, for asserting that a failure wrote nothing.
    pub fn snapshot_state(&self) -> MemoryLedger {
        self.ledger.clone()
    }
}
