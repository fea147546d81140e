//! Constants used throughout the data-call core crate.
//!
//! This module contains the channel defaults, reserved record identifiers and transient keys
//! shared between the contract and its surfaces.

/// Channel hosting the authoritative data calls when no other channel is configured.
pub const DEFAULT_CHANNEL: &str = "defaultchannel";

/// Chaincode name the contract is installed under by default.
pub const DEFAULT_CHAINCODE_NAME: &str = "openidl-cc-default";

/// Version selector meaning "the latest version of each data call".
pub const LATEST_VERSION: &str = "latest";

/// Identifier of the singleton data-call counter record.
pub const DATA_CALL_COUNT_ID: &str = "123456";

/// Version of the singleton data-call counter record.
pub const DATA_CALL_COUNT_VERSION: &str = "1";

/// Transient map key carrying a page of insurance records.
pub const TRANSACTIONAL_DATA_TRANSIENT_KEY: &str = "transactional-data-";

/// Suffix appended to the channel name to form its private data collection.
pub const PRIVATE_COLLECTION_SUFFIX: &str = "_pdc";

/// Caller attribute holding the organisation type.
pub const ORG_TYPE_ATTRIBUTE: &str = "orgType";

/// Reserved meta key holding the last issued transaction id.
pub const LAST_TX_ID_META_KEY: &str = "last_tx_id";

/// Payload returned by `Ping`.
pub const PING_RESPONSE: &str = "Ping OK";

/// Default REST listen address.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

// Event names emitted by the contract.
pub const EVENT_TOGGLE_LIKE: &str = "ToggleLikeEvent";
pub const EVENT_CONSENTED: &str = "ConsentedEvent";
pub const EVENT_EXTRACTION_PATTERN_SPECIFIED: &str = "ExtractionPatternSpecified";
pub const EVENT_TRANSACTIONAL_DATA_AVAILABLE: &str = "TransactionalDataAvailable";

/// Organisation type of the advisory organisation that runs data calls.
pub const ADVISORY_ORG_TYPE: &str = "advisory";

/// Organisation type of a participating carrier.
pub const CARRIER_ORG_TYPE: &str = "carrier";
