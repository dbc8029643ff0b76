//! Adapter configuration.

use lfgate_protocol::ItemReward;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// AdapterConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`ProtocolAdapter`](crate::ProtocolAdapter).
///
/// Every field has a default, so a config file only needs to name what
/// it changes:
///
/// ```rust
/// use lfgate::AdapterConfig;
///
/// let config: AdapterConfig = serde_json::from_str(r#"{ "search": { "enabled": false } }"#).unwrap();
/// assert!(!config.search.enabled);
/// assert_eq!(config.special_heroic_reward.item_id, 47241);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Item offered instead of the regular reward when a player repeats
    /// a Wrath heroic they already completed today.
    pub special_heroic_reward: ItemReward,

    /// Raid/dungeon browser behaviour.
    pub search: SearchConfig,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            special_heroic_reward: ItemReward {
                item_id: 47241,
                amount: 2,
            },
            search: SearchConfig::default(),
        }
    }
}

/// Settings for `CMSG_SEARCH_LFG_JOIN` handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Answer browser requests with `SMSG_LFG_SEARCH_RESULTS`.
    pub enabled: bool,

    /// List the single placeholder group ahead of the player roster.
    pub placeholder_group: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            placeholder_group: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = AdapterConfig::default();
        assert_eq!(
            config.special_heroic_reward,
            ItemReward {
                item_id: 47241,
                amount: 2
            }
        );
        assert!(config.search.enabled);
        assert!(config.search.placeholder_group);
    }

    #[test]
    fn test_config_empty_json_uses_defaults() {
        let config: AdapterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AdapterConfig::default());
    }

    #[test]
    fn test_config_overrides_special_reward() {
        let json = r#"{ "special_heroic_reward": { "item_id": 40753, "amount": 1 } }"#;
        let config: AdapterConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.special_heroic_reward.item_id, 40753);
        assert_eq!(config.special_heroic_reward.amount, 1);
        assert!(config.search.enabled);
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = AdapterConfig::default();
        config.search.placeholder_group = false;
        let json = serde_json::to_string(&config).unwrap();
        let decoded: AdapterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, decoded);
    }
}
