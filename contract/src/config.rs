//! System contract configuration
//!
//! Loaded from TOML. Every section is optional and falls back to the
//! network defaults:
//!
//! ```toml
//! [staking]
//! refund_delay_sec = 1209600
//!
//! [voting]
//! max_producers_per_vote = 1
//!
//! [ram]
//! new_ram_per_block = 0
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use economics::RamConfig;
use governance::VotingConfig;
use name_auction::AuctionConfig;
use sys_core::constants::REFUND_DELAY_SEC;
use treasury::RewardConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },
}

/// `[staking]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StakingConfig {
    /// Seconds an unstaked amount waits before it can be refunded
    pub refund_delay_sec: i64,
}

impl Default for StakingConfig {
    fn default() -> Self {
        Self {
            refund_delay_sec: REFUND_DELAY_SEC,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub staking: StakingConfig,
    pub voting: VotingConfig,
    pub rewards: RewardConfig,
    pub auction: AuctionConfig,
    pub ram: RamConfig,
}

impl SystemConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SystemConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, message: &str) -> ConfigError {
            ConfigError::InvalidValue {
                field,
                message: message.to_string(),
            }
        }

        if self.staking.refund_delay_sec < 0 {
            return Err(invalid("staking.refund_delay_sec", "must not be negative"));
        }
        if self.voting.max_producers_per_vote == 0 {
            return Err(invalid("voting.max_producers_per_vote", "must be at least 1"));
        }
        if self.voting.min_activated_stake <= 0 {
            return Err(invalid("voting.min_activated_stake", "must be positive"));
        }
        if self.voting.votepay_threshold_sec < 0 {
            return Err(invalid("voting.votepay_threshold_sec", "must not be negative"));
        }
        if !(0.0..1.0).contains(&self.rewards.continuous_rate) {
            return Err(invalid("rewards.continuous_rate", "must be in [0, 1)"));
        }
        if self.rewards.min_pervote_daily_pay < 0 || self.rewards.min_claim_interval_sec < 0 {
            return Err(invalid("rewards", "amounts and intervals must not be negative"));
        }
        if self.auction.auction_name_length == 0 || self.auction.auction_name_length > 12 {
            return Err(invalid("auction.auction_name_length", "must be between 1 and 12"));
        }
        if self.auction.min_bid_increase_percent < 0 {
            return Err(invalid("auction.min_bid_increase_percent", "must not be negative"));
        }
        if self.ram.ram_gift_bytes < 0 {
            return Err(invalid("ram.ram_gift_bytes", "must not be negative"));
        }
        if self.ram.max_ram_size == 0 {
            return Err(invalid("ram.max_ram_size", "must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SystemConfig::from_toml_str("").unwrap();
        assert_eq!(config, SystemConfig::default());
        assert_eq!(config.staking.refund_delay_sec, 14 * 24 * 3600);
    }

    #[test]
    fn test_partial_sections() {
        let config = SystemConfig::from_toml_str(
            r#"
            [voting]
            max_producers_per_vote = 30

            [auction]
            min_bid_increase_percent = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.voting.max_producers_per_vote, 30);
        assert_eq!(config.voting.vote_weight_epoch_sec, 946_684_800);
        assert_eq!(config.auction.min_bid_increase_percent, 10);
        assert_eq!(config.auction.auction_name_length, 12);
    }

    #[test]
    fn test_rejects_zero_producers_per_vote() {
        let err = SystemConfig::from_toml_str("[voting]\nmax_producers_per_vote = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = SystemConfig::from_toml_str("[voting\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("system.toml");
        let mut config = SystemConfig::default();
        config.ram.new_ram_per_block = 1024;
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();

        let loaded = SystemConfig::load(&path).unwrap();
        assert_eq!(loaded.ram.new_ram_per_block, 1024);
    }
}
