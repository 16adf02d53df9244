//! Per-block bookkeeping and reward claims

use log::info;

use sys_core::constants::SCHEDULE_UPDATE_INTERVAL_SLOTS;
use sys_core::{BlockTimestamp, Host, Name};
use treasury::{RewardClaim, RewardDistributor};

use crate::context::Context;
use crate::error::Result;

impl<'a, H: Host> Context<'a, H> {
    /// Called once per block with the block's slot and producer.
    ///
    /// Before activation only the block number is recorded. Afterwards the
    /// producer is credited and, once per round, the schedule is re-elected
    /// and the oldest quiet name auction may close.
    pub fn on_block(&mut self, timestamp: BlockTimestamp, producer: Name) -> Result<()> {
        self.require_initialized()?;
        let now = self.now();
        let global = &mut self.state.global;
        global.v2.last_block_num = timestamp;

        if !global.is_activated() {
            return Ok(());
        }
        if !global.v1.last_pervote_bucket_fill.is_set() {
            global.v1.last_pervote_bucket_fill = now;
            info!("reward buckets started at {}", now);
        }

        RewardDistributor::record_block(global, &mut self.state.voting, producer);

        if timestamp.slots_since(global.v1.last_producer_schedule_update)
            > SCHEDULE_UPDATE_INTERVAL_SLOTS
        {
            self.state
                .voting
                .update_elected_producers(&mut self.state.global, &mut *self.host, timestamp);
            self.state.auction.close_expired(
                &mut self.state.global,
                &self.config.auction,
                now,
                timestamp,
            );
        }
        Ok(())
    }

    pub fn claim_rewards(&mut self, owner: Name) -> Result<RewardClaim> {
        let core = self.core_symbol()?;
        let now = self.now();
        let claim = RewardDistributor::claim_rewards(
            &mut self.state.global,
            &mut self.state.voting,
            &self.config.rewards,
            &self.config.voting,
            &mut *self.host,
            now,
            owner,
            core,
        )?;
        Ok(claim)
    }
}
