//! Producer reward claims

use log::info;
use serde::{Deserialize, Serialize};

use governance::{
    update_producer_votepay_share, update_total_votepay_share, ProducerInfo2, VotingConfig,
    VotingState,
};
use sys_core::constants::{BPAY_ACCOUNT, MIN_PERVOTE_DAILY_PAY, SECONDS_PER_DAY, VPAY_ACCOUNT};
use sys_core::{Asset, GlobalState, Name, Symbol, TimePoint, TokenLedger};

use crate::error::{Result, TreasuryError};
use crate::inflation::fill_buckets;

/// Reward settings, the `[rewards]` config section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Annual inflation rate, compounded continuously
    pub continuous_rate: f64,
    pub min_pervote_daily_pay: i64,
    pub min_claim_interval_sec: i64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            continuous_rate: 0.04879,
            min_pervote_daily_pay: MIN_PERVOTE_DAILY_PAY,
            min_claim_interval_sec: SECONDS_PER_DAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardClaim {
    pub owner: Name,
    pub per_block: Asset,
    pub per_vote: Asset,
}

impl RewardClaim {
    pub fn total(&self) -> i64 {
        self.per_block.amount + self.per_vote.amount
    }
}

pub struct RewardDistributor;

impl RewardDistributor {
    /// Credit one produced block to `producer`. Unknown producers are ignored.
    pub fn record_block(global: &mut GlobalState, voting: &mut VotingState, producer: Name) {
        if voting
            .producers
            .modify(&producer, |p| p.unpaid_blocks += 1)
            .is_some()
        {
            global.v1.total_unpaid_blocks += 1;
        }
    }

    /// Pay `owner` its share of both reward buckets
    #[allow(clippy::too_many_arguments)]
    pub fn claim_rewards<L: TokenLedger>(
        global: &mut GlobalState,
        voting: &mut VotingState,
        config: &RewardConfig,
        voting_config: &VotingConfig,
        ledger: &mut L,
        now: TimePoint,
        owner: Name,
        core_symbol: Symbol,
    ) -> Result<RewardClaim> {
        let prod = voting
            .producers
            .get(&owner)
            .cloned()
            .ok_or(TreasuryError::ProducerNotFound(owner))?;
        if !prod.is_active {
            return Err(TreasuryError::ProducerInactive(owner));
        }
        let next = prod.last_claim_time.add_secs(config.min_claim_interval_sec);
        if now <= next {
            return Err(TreasuryError::ClaimTooSoon { owner, next });
        }

        fill_buckets(global, config, ledger, now, core_symbol)?;

        let window_end = prod.last_claim_time.add_secs(voting_config.votepay_threshold_sec);
        let crossed_threshold = window_end <= now;
        let updated_after_threshold = match voting.producers2.get(&owner) {
            Some(p2) => window_end <= p2.last_votepay_share_update,
            None => {
                voting.producers2.upsert(ProducerInfo2::new(owner, now));
                true
            }
        };

        let mut per_block = 0i64;
        if global.v1.total_unpaid_blocks > 0 {
            per_block = (global.v1.perblock_bucket as i128 * prod.unpaid_blocks as i128
                / global.v1.total_unpaid_blocks as i128) as i64;
        }

        let shares_rate = if updated_after_threshold { 0.0 } else { prod.total_votes };
        let new_votepay_share = match voting.producers2.get_mut(&owner) {
            Some(p2) => update_producer_votepay_share(p2, now, shares_rate, true),
            None => 0.0,
        };

        let mut per_vote = 0i64;
        if global.is_activated() {
            if global.v2.revision > 0 {
                let total_share = update_total_votepay_share(global, now, 0.0, 0.0);
                if total_share > 0.0 && !crossed_threshold {
                    per_vote = ((new_votepay_share * global.v1.pervote_bucket as f64) / total_share) as i64;
                    per_vote = per_vote.min(global.v1.pervote_bucket);
                }
            } else if global.v1.total_producer_vote_weight > 0.0 {
                per_vote = ((global.v1.pervote_bucket as f64 * prod.total_votes)
                    / global.v1.total_producer_vote_weight) as i64;
            }
        }
        if per_vote < config.min_pervote_daily_pay {
            per_vote = 0;
        }

        global.v1.pervote_bucket -= per_vote;
        global.v1.perblock_bucket -= per_block;
        global.v1.total_unpaid_blocks = global.v1.total_unpaid_blocks.saturating_sub(prod.unpaid_blocks);

        let rate_delta = if updated_after_threshold { prod.total_votes } else { 0.0 };
        update_total_votepay_share(global, now, -new_votepay_share, rate_delta);

        voting.producers.modify(&owner, |p| {
            p.last_claim_time = now;
            p.unpaid_blocks = 0;
        });

        let claim = RewardClaim {
            owner,
            per_block: Asset::new(per_block, core_symbol),
            per_vote: Asset::new(per_vote, core_symbol),
        };
        if per_block > 0 {
            ledger.transfer(BPAY_ACCOUNT, owner, claim.per_block, "producer block pay")?;
        }
        if per_vote > 0 {
            ledger.transfer(VPAY_ACCOUNT, owner, claim.per_vote, "producer vote pay")?;
        }

        info!(
            "{} claimed {} block pay and {} vote pay",
            owner, claim.per_block, claim.per_vote
        );
        Ok(claim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sys_core::MemoryHost;

    fn cur() -> Symbol {
        Symbol::new("CUR", 4).unwrap()
    }

    #[test]
    fn test_record_block_ignores_unknown() {
        let mut gs = GlobalState::new();
        let mut vs = VotingState::new();
        RewardDistributor::record_block(&mut gs, &mut vs, Name::constant("ghost"));
        assert_eq!(gs.v1.total_unpaid_blocks, 0);

        let bp = Name::constant("bp");
        vs.register_producer(&mut gs, TimePoint::from_secs(1), bp, "KEY", "", 0).unwrap();
        RewardDistributor::record_block(&mut gs, &mut vs, bp);
        RewardDistributor::record_block(&mut gs, &mut vs, bp);
        assert_eq!(gs.v1.total_unpaid_blocks, 2);
        assert_eq!(vs.producers.get(&bp).unwrap().unpaid_blocks, 2);
    }

    #[test]
    fn test_claim_rate_limited() {
        let mut gs = GlobalState::new();
        let mut vs = VotingState::new();
        let mut host = MemoryHost::new();
        host.create_token(cur());
        let bp = Name::constant("bp");
        let start = TimePoint::from_secs(1_000_000);
        vs.register_producer(&mut gs, start, bp, "KEY", "", 0).unwrap();

        let err = RewardDistributor::claim_rewards(
            &mut gs,
            &mut vs,
            &RewardConfig::default(),
            &VotingConfig::default(),
            &mut host,
            start.add_secs(SECONDS_PER_DAY),
            bp,
            cur(),
        )
        .unwrap_err();
        assert!(matches!(err, TreasuryError::ClaimTooSoon { .. }));
    }
}
