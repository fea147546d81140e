use crate::{TxIdError, TxIdResult};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use std::{fmt, str::FromStr};
use uuid::Uuid;

const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%.3f";

/// A time-prefixed transaction identifier.
///
/// # Monotonicity Guarantee
///
/// When generated with the previous transaction id, the timestamp is strictly greater than the
/// previous one (incremented by 1ms if the clock has not moved on). The timestamp doubles as
/// the transaction timestamp seen by the contract.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TxId {
    timestamp: DateTime<Utc>,
    nonce: Uuid,
}

impl TxId {
    /// Generate a new transaction id stamped with the current time.
    pub fn generate(last: Option<&TxId>) -> Self {
        Self::generate_at(last, Utc::now())
    }

    /// Generate a new transaction id stamped with `now`.
    ///
    /// If `last` is provided, the timestamp is guaranteed to be strictly greater than the
    /// last one (by at least 1 ms).
    pub fn generate_at(last: Option<&TxId>, now: DateTime<Utc>) -> Self {
        // Millisecond precision is all the text form keeps.
        let now = truncate_to_millis(now);
        let timestamp = match last {
            Some(prev) if now <= prev.timestamp => prev.timestamp + Duration::milliseconds(1),
            _ => now,
        };

        Self {
            timestamp,
            nonce: Uuid::new_v4(),
        }
    }

    /// Parse `last` (if any) and generate the next id from it.
    ///
    /// # Errors
    ///
    /// Returns [`TxIdError::InvalidInput`] if `last` is not a valid transaction id.
    pub fn generate_from_str(last: Option<&str>, now: DateTime<Utc>) -> TxIdResult<Self> {
        let parsed = last.map(TxId::from_str).transpose()?;
        Ok(Self::generate_at(parsed.as_ref(), now))
    }

    /// Returns the timestamp component.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

fn truncate_to_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    let millis = ts.timestamp_millis();
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or(ts)
}

impl FromStr for TxId {
    type Err = TxIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ts_str, nonce_str) = s.split_once('-').ok_or_else(|| {
            TxIdError::InvalidInput(format!("Invalid transaction id format: '{}'", s))
        })?;

        let ts_no_z = ts_str.strip_suffix('Z').ok_or_else(|| {
            TxIdError::InvalidInput(format!("Timestamp must end with 'Z': '{}'", ts_str))
        })?;

        let naive = NaiveDateTime::parse_from_str(ts_no_z, TIMESTAMP_FORMAT).map_err(|e| {
            TxIdError::InvalidInput(format!("Invalid timestamp format '{}': {}", ts_str, e))
        })?;

        let canonical = nonce_str.len() == 32
            && nonce_str
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if !canonical {
            return Err(TxIdError::InvalidInput(format!(
                "Nonce must be 32 lowercase hex characters, got: '{}'",
                nonce_str
            )));
        }
        let nonce = Uuid::parse_str(nonce_str)
            .map_err(|e| TxIdError::InvalidInput(format!("Invalid nonce '{}': {}", nonce_str, e)))?;

        Ok(Self {
            timestamp: DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc),
            nonce,
        })
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}Z-{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.nonce.simple()
        )
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TxId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for TxId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        TxId::from_str(&s).map_err(serde::de::Error::custom)
    }
}
