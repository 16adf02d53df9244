//! Versioned global state
//!
//! Four append-only sub-records grouped into one aggregate. Each record
//! carries `#[serde(default)]` so a snapshot written before a field existed
//! loads with that field's documented default.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_RAM_SIZE, SECONDS_PER_DAY, SECONDS_PER_YEAR};
use crate::time::{BlockTimestamp, TimePoint};

/// Chain-wide parameters forwarded to the host by `set_parameters`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockchainParameters {
    pub max_block_net_usage: u64,
    pub target_block_net_usage_pct: u32,
    pub max_transaction_net_usage: u32,
    pub base_per_transaction_net_usage: u32,
    pub net_usage_leeway: u32,
    pub context_free_discount_net_usage_num: u32,
    pub context_free_discount_net_usage_den: u32,
    pub max_block_cpu_usage: u32,
    pub target_block_cpu_usage_pct: u32,
    pub max_transaction_cpu_usage: u32,
    pub min_transaction_cpu_usage: u32,
    pub max_transaction_lifetime: u32,
    pub deferred_trx_expiration_window: u32,
    pub max_transaction_delay: u32,
    pub max_inline_action_size: u32,
    pub max_inline_action_depth: u16,
    pub max_authority_depth: u16,
}

impl Default for BlockchainParameters {
    fn default() -> Self {
        Self {
            max_block_net_usage: 1024 * 1024,
            target_block_net_usage_pct: 1000,
            max_transaction_net_usage: 512 * 1024,
            base_per_transaction_net_usage: 12,
            net_usage_leeway: 500,
            context_free_discount_net_usage_num: 20,
            context_free_discount_net_usage_den: 100,
            max_block_cpu_usage: 200_000,
            target_block_cpu_usage_pct: 1000,
            max_transaction_cpu_usage: 150_000,
            min_transaction_cpu_usage: 100,
            max_transaction_lifetime: 3600,
            deferred_trx_expiration_window: 600,
            max_transaction_delay: 45 * 24 * 3600,
            max_inline_action_size: 4096,
            max_inline_action_depth: 4,
            max_authority_depth: 6,
        }
    }
}

/// Original record: RAM totals, reward buckets, activation, schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalV1 {
    pub parameters: BlockchainParameters,
    pub max_ram_size: u64,
    pub total_ram_bytes_reserved: u64,
    pub total_ram_stake: i64,
    pub last_producer_schedule_update: BlockTimestamp,
    pub last_pervote_bucket_fill: TimePoint,
    pub pervote_bucket: i64,
    pub perblock_bucket: i64,
    pub total_unpaid_blocks: u32,
    pub total_activated_stake: i64,
    /// Stake of every voter currently holding a vote
    pub active_stake: i64,
    pub thresh_activated_stake_time: TimePoint,
    pub target_producer_schedule_size: u16,
    pub last_producer_schedule_size: u16,
    pub total_producer_vote_weight: f64,
    pub last_name_close: BlockTimestamp,
    pub schedule_size_step: u16,
}

impl Default for GlobalV1 {
    fn default() -> Self {
        Self {
            parameters: BlockchainParameters::default(),
            max_ram_size: DEFAULT_MAX_RAM_SIZE,
            total_ram_bytes_reserved: 0,
            total_ram_stake: 0,
            last_producer_schedule_update: BlockTimestamp::default(),
            last_pervote_bucket_fill: TimePoint::default(),
            pervote_bucket: 0,
            perblock_bucket: 0,
            total_unpaid_blocks: 0,
            total_activated_stake: 0,
            active_stake: 0,
            thresh_activated_stake_time: TimePoint::default(),
            target_producer_schedule_size: 21,
            last_producer_schedule_size: 0,
            total_producer_vote_weight: 0.0,
            last_name_close: BlockTimestamp::default(),
            schedule_size_step: 3,
        }
    }
}

/// RAM growth, vote-pay share totals, schema revision
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalV2 {
    pub new_ram_per_block: u16,
    pub last_ram_increase: BlockTimestamp,
    pub last_block_num: BlockTimestamp,
    pub total_producer_votepay_share: f64,
    pub revision: u8,
}

/// Vote-pay share accrual rate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalV3 {
    pub last_vpay_state_update: TimePoint,
    pub total_vpay_share_change_rate: f64,
}

/// Schedule size cooldowns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalV4 {
    pub last_schedule_size_decrease: BlockTimestamp,
    pub last_schedule_size_increase: BlockTimestamp,
    pub schedule_decrease_delay_sec: u32,
    pub schedule_increase_delay_sec: u32,
}

impl Default for GlobalV4 {
    fn default() -> Self {
        Self {
            last_schedule_size_decrease: BlockTimestamp::default(),
            last_schedule_size_increase: BlockTimestamp::default(),
            schedule_decrease_delay_sec: SECONDS_PER_DAY as u32,
            schedule_increase_delay_sec: SECONDS_PER_YEAR as u32,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalState {
    #[serde(default)]
    pub v1: GlobalV1,
    #[serde(default)]
    pub v2: GlobalV2,
    #[serde(default)]
    pub v3: GlobalV3,
    #[serde(default)]
    pub v4: GlobalV4,
}

impl GlobalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes still available to the RAM market
    pub fn free_ram(&self) -> u64 {
        self.v1
            .max_ram_size
            .saturating_sub(self.v1.total_ram_bytes_reserved)
    }

    pub fn is_activated(&self) -> bool {
        self.v1.thresh_activated_stake_time.is_set()
    }
}
