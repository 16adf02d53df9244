//! Continuous token inflation into the reward buckets

use log::debug;
use serde::{Deserialize, Serialize};

use sys_core::constants::{BPAY_ACCOUNT, SAVING_ACCOUNT, SYSTEM_ACCOUNT, USECONDS_PER_YEAR, VPAY_ACCOUNT};
use sys_core::{Asset, GlobalState, Name, Symbol, TimePoint, TokenLedger};

use crate::error::{Result, TreasuryError};
use crate::rewards::RewardConfig;

/// Tokens minted by one bucket fill and where they went
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InflationSplit {
    pub new_tokens: i64,
    pub to_savings: i64,
    pub to_per_block_pay: i64,
    pub to_per_vote_pay: i64,
}

impl InflationSplit {
    /// One fifth goes to producers, a quarter of which pays per block
    pub fn of(new_tokens: i64) -> Self {
        let to_producers = new_tokens / 5;
        let to_per_block_pay = to_producers / 4;
        Self {
            new_tokens,
            to_savings: new_tokens - to_producers,
            to_per_block_pay,
            to_per_vote_pay: to_producers - to_per_block_pay,
        }
    }
}

fn pay<L: TokenLedger>(ledger: &mut L, to: Name, amount: i64, symbol: Symbol, memo: &str) -> Result<()> {
    if amount > 0 {
        ledger.transfer(SYSTEM_ACCOUNT, to, Asset::new(amount, symbol), memo)?;
    }
    Ok(())
}

/// Mint the inflation accrued since the last fill and route it to the
/// savings, per-block and per-vote accounts. Nothing happens before the
/// bucket clock has been started.
pub fn fill_buckets<L: TokenLedger>(
    global: &mut GlobalState,
    config: &RewardConfig,
    ledger: &mut L,
    now: TimePoint,
    core_symbol: Symbol,
) -> Result<Option<InflationSplit>> {
    let last_fill = global.v1.last_pervote_bucket_fill;
    let usecs = now.micros_since(last_fill);
    if !last_fill.is_set() || usecs <= 0 {
        return Ok(None);
    }

    let supply = ledger
        .supply(&core_symbol)
        .ok_or(TreasuryError::SupplyUnavailable(core_symbol))?;
    let new_tokens = (config.continuous_rate * supply.amount as f64 * usecs as f64
        / USECONDS_PER_YEAR as f64) as i64;
    let split = InflationSplit::of(new_tokens);

    if new_tokens > 0 {
        ledger.issue(
            SYSTEM_ACCOUNT,
            Asset::new(new_tokens, core_symbol),
            "issue tokens for producer pay and savings",
        )?;
        pay(ledger, SAVING_ACCOUNT, split.to_savings, core_symbol, "unallocated inflation")?;
        pay(ledger, BPAY_ACCOUNT, split.to_per_block_pay, core_symbol, "fund per-block bucket")?;
        pay(ledger, VPAY_ACCOUNT, split.to_per_vote_pay, core_symbol, "fund per-vote bucket")?;
    }

    global.v1.pervote_bucket = global
        .v1
        .pervote_bucket
        .checked_add(split.to_per_vote_pay)
        .ok_or(TreasuryError::Overflow)?;
    global.v1.perblock_bucket = global
        .v1
        .perblock_bucket
        .checked_add(split.to_per_block_pay)
        .ok_or(TreasuryError::Overflow)?;
    global.v1.last_pervote_bucket_fill = now;

    debug!("minted {} over {}us", new_tokens, usecs);
    Ok(Some(split))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_ratios() {
        let split = InflationSplit::of(1_000);
        assert_eq!(split.to_savings, 800);
        assert_eq!(split.to_per_block_pay, 50);
        assert_eq!(split.to_per_vote_pay, 150);
    }

    #[test]
    fn test_split_conserves_remainders() {
        let split = InflationSplit::of(1_340_384_615);
        assert_eq!(split.to_savings, 1_072_307_692);
        assert_eq!(split.to_per_block_pay, 67_019_230);
        assert_eq!(split.to_per_vote_pay, 201_057_693);
        assert_eq!(
            split.to_savings + split.to_per_block_pay + split.to_per_vote_pay,
            split.new_tokens
        );
    }
}
