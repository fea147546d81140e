//! Composite ledger keys.
//!
//! Every record is stored under a [`CompositeKey`]: a key space plus an ordered list of string
//! components (for example `DataCall / <id> / <version>`). Keys are encoded into a single
//! string for the ledger backend.
//!
//! ## Encoding (v1)
//!
//! `\0 v1 \0 <space> \0 <part> \0 <part> \0 ...`
//!
//! Inside a component, `\u{1}` is written as `\u{1}\u{1}` and `\0` as `\u{1}\u{2}`, so the
//! terminator never occurs inside an encoded component. Two consequences follow:
//! - any component text (including the delimiter itself) round-trips without ambiguity;
//! - a key with fewer components is a byte prefix of exactly the keys that extend it, so
//!   `DataCall / DC1` matches `DC1` but never `DC10`.
//!
//! The leading version marker leaves room for a different layout without breaking existing
//! snapshots.

use crate::error::KeyError;
use std::fmt;
use std::str::FromStr;

const DELIMITER: char = '\0';
const ESCAPE: char = '\u{1}';
const ESCAPED_ESCAPE: char = '\u{1}';
const ESCAPED_DELIMITER: char = '\u{2}';
const ENCODING_VERSION: &str = "v1";

/// Record families stored on the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeySpace {
    DataCall,
    DataCallCount,
    DataCallLog,
    Report,
    Like,
    LikeCount,
    Consent,
    ConsentCount,
    ExtractionPattern,
    InsuranceHash,
    InsuranceData,
    InsuranceAudit,
    Meta,
}

impl KeySpace {
    pub fn as_str(self) -> &'static str {
        match self {
            KeySpace::DataCall => "DataCall",
            KeySpace::DataCallCount => "DataCallCount",
            KeySpace::DataCallLog => "DataCallLog",
            KeySpace::Report => "Report",
            KeySpace::Like => "Like",
            KeySpace::LikeCount => "LikeCount",
            KeySpace::Consent => "Consent",
            KeySpace::ConsentCount => "ConsentCount",
            KeySpace::ExtractionPattern => "ExtractionPattern",
            KeySpace::InsuranceHash => "InsuranceHash",
            KeySpace::InsuranceData => "InsuranceData",
            KeySpace::InsuranceAudit => "InsuranceAudit",
            KeySpace::Meta => "Meta",
        }
    }
}

impl fmt::Display for KeySpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeySpace {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "DataCall" => KeySpace::DataCall,
            "DataCallCount" => KeySpace::DataCallCount,
            "DataCallLog" => KeySpace::DataCallLog,
            "Report" => KeySpace::Report,
            "Like" => KeySpace::Like,
            "LikeCount" => KeySpace::LikeCount,
            "Consent" => KeySpace::Consent,
            "ConsentCount" => KeySpace::ConsentCount,
            "ExtractionPattern" => KeySpace::ExtractionPattern,
            "InsuranceHash" => KeySpace::InsuranceHash,
            "InsuranceData" => KeySpace::InsuranceData,
            "InsuranceAudit" => KeySpace::InsuranceAudit,
            "Meta" => KeySpace::Meta,
            other => return Err(KeyError::UnknownSpace(other.to_owned())),
        })
    }
}

/// A structured ledger key.
///
/// A `CompositeKey` with fewer components than a record key acts as a partial key for prefix
/// scans (see [`CompositeKey::encode`]).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompositeKey {
    space: KeySpace,
    parts: Vec<String>,
}

impl CompositeKey {
    pub fn new<I, S>(space: KeySpace, parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            space,
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    /// A partial key covering the whole key space.
    pub fn space(space: KeySpace) -> Self {
        Self {
            space,
            parts: Vec::new(),
        }
    }

    pub fn key_space(&self) -> KeySpace {
        self.space
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Encode the key for storage.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        out.push(DELIMITER);
        out.push_str(ENCODING_VERSION);
        out.push(DELIMITER);
        out.push_str(self.space.as_str());
        out.push(DELIMITER);
        for part in &self.parts {
            for ch in part.chars() {
                match ch {
                    ESCAPE => {
                        out.push(ESCAPE);
                        out.push(ESCAPED_ESCAPE);
                    }
                    DELIMITER => {
                        out.push(ESCAPE);
                        out.push(ESCAPED_DELIMITER);
                    }
                    other => out.push(other),
                }
            }
            out.push(DELIMITER);
        }
        out
    }

    /// Decode a stored key.
    ///
    /// # Errors
    ///
    /// Returns a [`KeyError`] if the key was not produced by [`CompositeKey::encode`].
    pub fn decode(encoded: &str) -> Result<Self, KeyError> {
        let rest = encoded
            .strip_prefix(DELIMITER)
            .ok_or(KeyError::MissingVersion)?;
        let (version, rest) = rest.split_once(DELIMITER).ok_or(KeyError::MissingVersion)?;
        if version != ENCODING_VERSION {
            return Err(KeyError::UnsupportedVersion(version.to_owned()));
        }
        let (space, rest) = rest
            .split_once(DELIMITER)
            .ok_or(KeyError::Malformed("missing key space terminator"))?;
        let space = space.parse::<KeySpace>()?;

        let mut parts = Vec::new();
        let mut current = String::new();
        let mut chars = rest.chars();
        while let Some(ch) = chars.next() {
            match ch {
                ESCAPE => match chars.next() {
                    Some(ESCAPED_ESCAPE) => current.push(ESCAPE),
                    Some(ESCAPED_DELIMITER) => current.push(DELIMITER),
                    _ => return Err(KeyError::Malformed("dangling escape")),
                },
                DELIMITER => parts.push(std::mem::take(&mut current)),
                other => current.push(other),
            }
        }
        if !current.is_empty() {
            return Err(KeyError::Malformed("unterminated component"));
        }

        Ok(Self { space, parts })
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.space)?;
        for part in &self.parts {
            write!(f, "/{}", part.escape_debug())?;
        }
        Ok(())
    }
}

// ============================================================================
// KEY BUILDERS
// ============================================================================

pub fn data_call(id: &str, version: &str) -> CompositeKey {
    CompositeKey::new(KeySpace::DataCall, [id, version])
}

pub fn data_call_versions(id: &str) -> CompositeKey {
    CompositeKey::new(KeySpace::DataCall, [id])
}

pub fn data_call_count(id: &str, version: &str) -> CompositeKey {
    CompositeKey::new(KeySpace::DataCallCount, [id, version])
}

/// One log entry: the transaction id orders entries across transactions and the zero-padded
/// sequence orders entries within one.
pub fn data_call_log(id: &str, version: &str, tx_id: &str, seq: usize) -> CompositeKey {
    let seq = format!("{seq:04}");
    CompositeKey::new(KeySpace::DataCallLog, [id, version, tx_id, seq.as_str()])
}

pub fn data_call_tx_logs(id: &str, version: &str, tx_id: &str) -> CompositeKey {
    CompositeKey::new(KeySpace::DataCallLog, [id, version, tx_id])
}

pub fn data_call_logs(id: &str, version: &str) -> CompositeKey {
    CompositeKey::new(KeySpace::DataCallLog, [id, version])
}

pub fn report(data_call_id: &str, data_call_version: &str, hash: &str) -> CompositeKey {
    CompositeKey::new(KeySpace::Report, [data_call_id, data_call_version, hash])
}

pub fn reports(data_call_id: &str, data_call_version: &str) -> CompositeKey {
    CompositeKey::new(KeySpace::Report, [data_call_id, data_call_version])
}

pub fn like(data_call_id: &str, data_call_version: &str, organization_id: &str) -> CompositeKey {
    CompositeKey::new(
        KeySpace::Like,
        [data_call_id, data_call_version, organization_id],
    )
}

pub fn likes(data_call_id: &str, data_call_version: &str) -> CompositeKey {
    CompositeKey::new(KeySpace::Like, [data_call_id, data_call_version])
}

pub fn like_count_entry(data_call_id: &str, data_call_version: &str, tx_id: &str) -> CompositeKey {
    CompositeKey::new(KeySpace::LikeCount, [data_call_id, data_call_version, tx_id])
}

pub fn like_count_entries(data_call_id: &str, data_call_version: &str) -> CompositeKey {
    CompositeKey::new(KeySpace::LikeCount, [data_call_id, data_call_version])
}

pub fn consent(data_call_id: &str, data_call_version: &str, carrier_id: &str) -> CompositeKey {
    CompositeKey::new(
        KeySpace::Consent,
        [data_call_id, data_call_version, carrier_id],
    )
}

pub fn consents(data_call_id: &str, data_call_version: &str) -> CompositeKey {
    CompositeKey::new(KeySpace::Consent, [data_call_id, data_call_version])
}

pub fn consent_count_entry(
    data_call_id: &str,
    data_call_version: &str,
    tx_id: &str,
) -> CompositeKey {
    CompositeKey::new(
        KeySpace::ConsentCount,
        [data_call_id, data_call_version, tx_id],
    )
}

pub fn consent_count_entries(data_call_id: &str, data_call_version: &str) -> CompositeKey {
    CompositeKey::new(KeySpace::ConsentCount, [data_call_id, data_call_version])
}

pub fn extraction_pattern(id: &str, db_type: &str) -> CompositeKey {
    CompositeKey::new(KeySpace::ExtractionPattern, [id, db_type])
}

pub fn insurance_hash(carrier_id: &str, batch_id: &str, chunk_id: &str) -> CompositeKey {
    CompositeKey::new(KeySpace::InsuranceHash, [carrier_id, batch_id, chunk_id])
}

pub fn insurance_data(
    data_call_id: &str,
    data_call_version: &str,
    carrier_id: &str,
    page_number: u32,
) -> CompositeKey {
    CompositeKey::new(
        KeySpace::InsuranceData,
        [
            data_call_id.to_owned(),
            data_call_version.to_owned(),
            carrier_id.to_owned(),
            page_number.to_string(),
        ],
    )
}

pub fn insurance_audit(
    data_call_id: &str,
    data_call_version: &str,
    carrier_id: &str,
) -> CompositeKey {
    CompositeKey::new(
        KeySpace::InsuranceAudit,
        [data_call_id, data_call_version, carrier_id],
    )
}

pub fn meta(name: &str) -> CompositeKey {
    CompositeKey::new(KeySpace::Meta, [name])
}
