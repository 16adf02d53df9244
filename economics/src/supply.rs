//! RAM supply management
//!
//! The supply grows by `new_ram_per_block` bytes for every block slot
//! elapsed since the last increase. New bytes land in both the global
//! maximum and the market's RAM reserve.

use log::debug;
use serde::{Deserialize, Serialize};

use sys_core::constants::{DEFAULT_MAX_RAM_SIZE, MAX_RAM_SIZE_CEILING, RAM_GIFT_BYTES};
use sys_core::{BlockTimestamp, GlobalState};

use crate::error::{MarketError, Result};
use crate::exchange::ExchangeState;

/// `[ram]` configuration section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RamConfig {
    /// RAM supply when the market is created
    pub max_ram_size: u64,
    /// Initial growth rate in bytes per block slot
    pub new_ram_per_block: u16,
    /// Bytes granted on top of purchased RAM
    pub ram_gift_bytes: i64,
}

impl Default for RamConfig {
    fn default() -> Self {
        Self {
            max_ram_size: DEFAULT_MAX_RAM_SIZE,
            new_ram_per_block: 0,
            ram_gift_bytes: RAM_GIFT_BYTES,
        }
    }
}

/// Summary of the RAM supply for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplyStats {
    pub max_ram_size: u64,
    pub reserved: u64,
    pub free: u64,
    pub new_ram_per_block: u16,
    pub ram_reserve: i64,
    pub core_reserve: i64,
}

pub struct RamSupply;

impl RamSupply {
    /// Apply growth since the last increase. Returns the bytes added.
    pub fn update(
        global: &mut GlobalState,
        market: &mut ExchangeState,
        now: BlockTimestamp,
    ) -> Result<u64> {
        if now <= global.v2.last_ram_increase {
            return Ok(0);
        }
        let slots = now.slots_since(global.v2.last_ram_increase) as u64;
        let new_ram = slots * global.v2.new_ram_per_block as u64;

        market.adjust_ram_reserve(new_ram as i64)?;
        global.v1.max_ram_size += new_ram;
        global.v2.last_ram_increase = now;

        if new_ram > 0 {
            debug!("RAM supply grew by {} bytes to {}", new_ram, global.v1.max_ram_size);
        }
        Ok(new_ram)
    }

    /// Raise the RAM supply to `max_ram_size`
    pub fn set_max(
        global: &mut GlobalState,
        market: &mut ExchangeState,
        max_ram_size: u64,
    ) -> Result<()> {
        if max_ram_size <= global.v1.max_ram_size {
            return Err(MarketError::RamNotIncreased {
                current: global.v1.max_ram_size,
                requested: max_ram_size,
            });
        }
        if max_ram_size >= MAX_RAM_SIZE_CEILING {
            return Err(MarketError::RamSizeUnrealistic(max_ram_size));
        }
        if max_ram_size <= global.v1.total_ram_bytes_reserved {
            return Err(MarketError::RamBelowReserved {
                requested: max_ram_size,
                reserved: global.v1.total_ram_bytes_reserved,
            });
        }

        let delta = (max_ram_size - global.v1.max_ram_size) as i64;
        market.adjust_ram_reserve(delta)?;
        global.v1.max_ram_size = max_ram_size;
        Ok(())
    }

    /// Change the growth rate, settling growth at the old rate first
    pub fn set_rate(
        global: &mut GlobalState,
        market: &mut ExchangeState,
        now: BlockTimestamp,
        bytes_per_block: u16,
    ) -> Result<()> {
        Self::update(global, market, now)?;
        global.v2.new_ram_per_block = bytes_per_block;
        Ok(())
    }

    pub fn stats(global: &GlobalState, market: &ExchangeState) -> SupplyStats {
        SupplyStats {
            max_ram_size: global.v1.max_ram_size,
            reserved: global.v1.total_ram_bytes_reserved,
            free: global.free_ram(),
            new_ram_per_block: global.v2.new_ram_per_block,
            ram_reserve: market.ram_reserve(),
            core_reserve: market.core_reserve(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sys_core::{Asset, Symbol};

    fn setup() -> (GlobalState, ExchangeState) {
        let mut global = GlobalState::new();
        global.v1.max_ram_size = 1_000_000;
        let core = Asset::new(10_000_000_000, Symbol::new("CUR", 4).unwrap());
        let market = ExchangeState::new_ram_market(global.free_ram(), &core);
        (global, market)
    }

    #[test]
    fn test_growth_per_slot() {
        let (mut global, mut market) = setup();
        global.v2.new_ram_per_block = 10;
        global.v2.last_ram_increase = BlockTimestamp::from_slot(100);

        let added = RamSupply::update(&mut global, &mut market, BlockTimestamp::from_slot(150)).unwrap();
        assert_eq!(added, 500);
        assert_eq!(global.v1.max_ram_size, 1_000_500);
        assert_eq!(market.ram_reserve(), 1_000_500);

        // same slot again adds nothing
        let added = RamSupply::update(&mut global, &mut market, BlockTimestamp::from_slot(150)).unwrap();
        assert_eq!(added, 0);
    }

    #[test]
    fn test_rate_change_settles_old_rate() {
        let (mut global, mut market) = setup();
        global.v2.new_ram_per_block = 10;
        global.v2.last_ram_increase = BlockTimestamp::from_slot(0);

        RamSupply::set_rate(&mut global, &mut market, BlockTimestamp::from_slot(10), 100).unwrap();
        assert_eq!(global.v1.max_ram_size, 1_000_100);

        RamSupply::update(&mut global, &mut market, BlockTimestamp::from_slot(20)).unwrap();
        assert_eq!(global.v1.max_ram_size, 1_001_100);
    }

    #[test]
    fn test_set_max_rules() {
        let (mut global, mut market) = setup();
        global.v1.total_ram_bytes_reserved = 2_000_000;

        assert!(matches!(
            RamSupply::set_max(&mut global, &mut market, 1_000_000),
            Err(MarketError::RamNotIncreased { .. })
        ));
        assert!(matches!(
            RamSupply::set_max(&mut global, &mut market, MAX_RAM_SIZE_CEILING),
            Err(MarketError::RamSizeUnrealistic(_))
        ));
        assert!(matches!(
            RamSupply::set_max(&mut global, &mut market, 1_500_000),
            Err(MarketError::RamBelowReserved { .. })
        ));

        RamSupply::set_max(&mut global, &mut market, 3_000_000).unwrap();
        assert_eq!(global.v1.max_ram_size, 3_000_000);
        assert_eq!(market.ram_reserve(), 3_000_000);
    }
}
