//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the contract. The intent is to avoid reading process-wide environment variables
//! while an invocation is running, which can lead to inconsistent behaviour in multi-threaded
//! runtimes and test harnesses.

use crate::constants::{DEFAULT_CHAINCODE_NAME, DEFAULT_CHANNEL, PRIVATE_COLLECTION_SUFFIX};
use crate::{DataCallError, DataCallResult};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    chaincode_name: String,
    default_channel: String,
    default_chaincode_name: String,
    channels: Vec<String>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `channels` lists the channels hosted by this process. The default channel does not have
    /// to be hosted locally; existence checks against it then fail as an unreachable partition.
    pub fn new(
        chaincode_name: String,
        default_channel: String,
        default_chaincode_name: String,
        channels: Vec<String>,
    ) -> DataCallResult<Self> {
        if chaincode_name.trim().is_empty() {
            return Err(DataCallError::InvalidInput(
                "chaincode_name cannot be empty".into(),
            ));
        }
        if default_channel.trim().is_empty() || default_chaincode_name.trim().is_empty() {
            return Err(DataCallError::InvalidInput(
                "default channel and chaincode cannot be empty".into(),
            ));
        }
        if channels.is_empty() {
            return Err(DataCallError::InvalidInput(
                "at least one channel must be hosted".into(),
            ));
        }
        if let Some(bad) = channels.iter().find(|c| c.trim().is_empty()) {
            return Err(DataCallError::InvalidInput(format!(
                "channel names cannot be empty (got {bad:?})"
            )));
        }

        Ok(Self {
            chaincode_name,
            default_channel,
            default_chaincode_name,
            channels,
        })
    }

    pub fn chaincode_name(&self) -> &str {
        &self.chaincode_name
    }

    pub fn default_channel(&self) -> &str {
        &self.default_channel
    }

    pub fn default_chaincode_name(&self) -> &str {
        &self.default_chaincode_name
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    pub fn hosts(&self, channel: &str) -> bool {
        self.channels.iter().any(|c| c == channel)
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            chaincode_name: DEFAULT_CHAINCODE_NAME.into(),
            default_channel: DEFAULT_CHANNEL.into(),
            default_chaincode_name: DEFAULT_CHAINCODE_NAME.into(),
            channels: vec![DEFAULT_CHANNEL.into()],
        }
    }
}

/// Optional values read from the environment, one per configuration setting.
#[derive(Clone, Debug, Default)]
pub struct ConfigValues {
    pub chaincode_name: Option<String>,
    pub default_channel: Option<String>,
    pub default_chaincode_name: Option<String>,
    pub channels: Option<String>,
}

impl ConfigValues {
    /// Read `DATACALL_CHAINCODE`, `DATACALL_DEFAULT_CHANNEL`, `DATACALL_DEFAULT_CHAINCODE` and
    /// `DATACALL_CHANNELS`.
    pub fn from_env() -> Self {
        Self {
            chaincode_name: std::env::var("DATACALL_CHAINCODE").ok(),
            default_channel: std::env::var("DATACALL_DEFAULT_CHANNEL").ok(),
            default_chaincode_name: std::env::var("DATACALL_DEFAULT_CHAINCODE").ok(),
            channels: std::env::var("DATACALL_CHANNELS").ok(),
        }
    }

    /// Resolve into a validated [`CoreConfig`], filling unset or blank values with defaults.
    ///
    /// The default chaincode name falls back to the chaincode name.
    pub fn resolve(self) -> DataCallResult<CoreConfig> {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        let chaincode_name =
            non_blank(self.chaincode_name).unwrap_or_else(|| DEFAULT_CHAINCODE_NAME.into());
        let default_chaincode_name =
            non_blank(self.default_chaincode_name).unwrap_or_else(|| chaincode_name.clone());
        CoreConfig::new(
            chaincode_name,
            non_blank(self.default_channel).unwrap_or_else(|| DEFAULT_CHANNEL.into()),
            default_chaincode_name,
            channels_from_env_value(self.channels),
        )
    }
}

/// Name of the private data collection belonging to `channel`.
pub fn private_collection(channel: &str) -> String {
    format!("{}{}", channel.replace('-', "_"), PRIVATE_COLLECTION_SUFFIX)
}

/// Parse a comma-separated channel list from an optional string value.
///
/// If `value` is `None` or blank, returns the default channel alone. Duplicates are dropped
/// while keeping first-seen order.
pub fn channels_from_env_value(value: Option<String>) -> Vec<String> {
    let mut channels: Vec<String> = Vec::new();
    for name in value
        .iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        if !channels.iter().any(|c| c == name) {
            channels.push(name.to_owned());
        }
    }

    if channels.is_empty() {
        channels.push(DEFAULT_CHANNEL.into());
    }
    channels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_collection_replaces_hyphens() {
        assert_eq!(private_collection("carrier-channel-1"), "carrier_channel_1_pdc");
        assert_eq!(private_collection("defaultchannel"), "defaultchannel_pdc");
    }

    #[test]
    fn test_channels_from_env_value_defaults() {
        assert_eq!(channels_from_env_value(None), vec![DEFAULT_CHANNEL.to_string()]);
        assert_eq!(
            channels_from_env_value(Some("  ".into())),
            vec![DEFAULT_CHANNEL.to_string()]
        );
    }

    #[test]
    fn test_channels_from_env_value_dedupes() {
        let channels = channels_from_env_value(Some("a, b,a ,,c".into()));
        assert_eq!(channels, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_new_rejects_empty_channel_list() {
        let result = CoreConfig::new("cc".into(), "ch".into(), "cc".into(), vec![]);
        assert!(matches!(result, Err(DataCallError::InvalidInput(_))));
    }

    #[test]
    fn test_resolve_fills_defaults() {
        let cfg = ConfigValues {
            chaincode_name: Some("openidl-cc-carrier".into()),
            channels: Some("carrier-channel,defaultchannel".into()),
            ..ConfigValues::default()
        }
        .resolve()
        .unwrap();
        assert_eq!(cfg.default_channel(), DEFAULT_CHANNEL);
        assert_eq!(cfg.default_chaincode_name(), "openidl-cc-carrier");
        assert_eq!(cfg.channels(), ["carrier-channel", "defaultchannel"]);

        let cfg = ConfigValues::default().resolve().unwrap();
        assert_eq!(cfg.chaincode_name(), DEFAULT_CHAINCODE_NAME);
    }

    #[test]
    fn test_hosts() {
        let cfg = CoreConfig::default();
        assert!(cfg.hosts(DEFAULT_CHANNEL));
        assert!(!cfg.hosts("other"));
    }
}
