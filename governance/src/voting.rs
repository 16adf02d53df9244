//! Voting engine
//!
//! Voters stake tokens and back either a single proxy or a list of
//! producers. Vote weight grows with time so newer votes count for more,
//! and every stake change re-tallies the producers a voter backs.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use sys_core::constants::{MIN_ACTIVATED_STAKE, SECONDS_PER_DAY};
use sys_core::{GlobalState, Name, TimePoint};
use sys_storage::{IndexedTable, Table};

use crate::error::{GovernanceError, Result};
use crate::producer::{ProducerInfo, ProducerInfo2, MAX_URL_LENGTH};
use crate::votepay::{self, VotepayDelta};
use crate::voter::VoterInfo;

/// Voting engine settings, the `[voting]` config section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VotingConfig {
    pub max_producers_per_vote: usize,
    pub min_activated_stake: i64,
    /// Unix second from which vote weight doubling is counted
    pub vote_weight_epoch_sec: i64,
    /// Window after a claim during which vote-pay shares keep accruing
    pub votepay_threshold_sec: i64,
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            max_producers_per_vote: 1,
            min_activated_stake: MIN_ACTIVATED_STAKE,
            vote_weight_epoch_sec: 946_684_800,
            votepay_threshold_sec: 3 * SECONDS_PER_DAY,
        }
    }
}

/// Vote weight of `staked` at `now`: doubles every 52 weeks after `epoch_sec`
pub fn stake2vote(staked: i64, now: TimePoint, epoch_sec: i64) -> f64 {
    let weeks = (now.sec_since_epoch() - epoch_sec).max(0) / (SECONDS_PER_DAY * 7);
    let weight = weeks as f64 / 52.0;
    staked as f64 * 2f64.powf(weight)
}

/// Producer and voter tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VotingState {
    pub producers: IndexedTable<ProducerInfo>,
    pub producers2: Table<ProducerInfo2>,
    pub voters: Table<VoterInfo>,
}

impl VotingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_producer(
        &mut self,
        global: &mut GlobalState,
        now: TimePoint,
        producer: Name,
        producer_key: &str,
        url: &str,
        location: u16,
    ) -> Result<()> {
        if url.len() >= MAX_URL_LENGTH {
            return Err(GovernanceError::UrlTooLong {
                len: url.len(),
                limit: MAX_URL_LENGTH,
            });
        }
        if producer_key.is_empty() {
            return Err(GovernanceError::DefaultKey);
        }

        if self.producers.contains(&producer) {
            let info = self.producers.modify(&producer, |p| {
                p.producer_key = producer_key.to_string();
                p.is_active = true;
                p.url = url.to_string();
                p.location = location;
                if !p.last_claim_time.is_set() {
                    p.last_claim_time = now;
                }
            });
            let total_votes = info.map(|p| p.total_votes).unwrap_or(0.0);

            if !self.producers2.contains(&producer) {
                self.producers2.upsert(ProducerInfo2::new(producer, now));
                votepay::update_total_votepay_share(global, now, 0.0, total_votes);
            }
            debug!("producer {} re-registered", producer);
        } else {
            let info = ProducerInfo::new(
                producer,
                producer_key.to_string(),
                url.to_string(),
                location,
                now,
            );
            self.producers.upsert(info);
            self.producers2.upsert(ProducerInfo2::new(producer, now));
            info!("producer {} registered", producer);
        }

        Ok(())
    }

    /// Clear the producer's key and active flag. The row is kept.
    pub fn deactivate_producer(&mut self, producer: Name) -> Result<()> {
        self.producers
            .modify(&producer, ProducerInfo::deactivate)
            .ok_or(GovernanceError::ProducerNotFound(producer))?;
        info!("producer {} deactivated", producer);
        Ok(())
    }

    /// Apply a stake change to `voter`, creating its record on first stake
    pub fn update_voting_power(
        &mut self,
        global: &mut GlobalState,
        config: &VotingConfig,
        now: TimePoint,
        voter: Name,
        stake_delta: i64,
    ) -> Result<()> {
        let current = self.voters.get(&voter).cloned().unwrap_or_else(|| VoterInfo::new(voter));
        let staked = current
            .staked
            .checked_add(stake_delta)
            .ok_or(GovernanceError::StakeOverflow(voter))?;
        if staked < 0 {
            return Err(GovernanceError::NegativeStake(voter));
        }

        let has_vote = current.has_vote();
        let proxy = current.proxy;
        let producers = current.producers.clone();
        self.voters.upsert(VoterInfo { staked, ..current });

        if has_vote {
            global.v1.active_stake += stake_delta;
            self.update_votes(global, config, now, voter, proxy, &producers, false)?;
        }
        Ok(())
    }

    /// Replace the voter's selection with `proxy` or `producers` and move
    /// its weight accordingly. `voting` is false when re-tallying after a
    /// stake change, which relaxes the checks on the current selection.
    #[allow(clippy::too_many_arguments)]
    pub fn update_votes(
        &mut self,
        global: &mut GlobalState,
        config: &VotingConfig,
        now: TimePoint,
        voter_name: Name,
        proxy: Option<Name>,
        producers: &[Name],
        voting: bool,
    ) -> Result<()> {
        if let Some(proxy) = proxy {
            if !producers.is_empty() {
                return Err(GovernanceError::ProxyAndProducers);
            }
            if proxy == voter_name {
                return Err(GovernanceError::ProxyToSelf);
            }
        } else {
            if producers.len() > config.max_producers_per_vote {
                return Err(GovernanceError::TooManyProducers {
                    max: config.max_producers_per_vote,
                    got: producers.len(),
                });
            }
            if producers.windows(2).any(|w| w[0] >= w[1]) {
                return Err(GovernanceError::UnsortedProducers);
            }
        }

        let voter = self
            .voters
            .get(&voter_name)
            .cloned()
            .ok_or(GovernanceError::VoterNotFound(voter_name))?;
        if proxy.is_some() && voter.is_proxy {
            return Err(GovernanceError::ProxyUsingProxy(voter_name));
        }

        let new_proxy = match proxy {
            Some(p) => {
                let row = self.voters.get(&p).ok_or(GovernanceError::InvalidProxy(p))?;
                if voting && !row.is_proxy {
                    return Err(GovernanceError::ProxyNotRegistered(p));
                }
                Some(p)
            }
            None => None,
        };

        // First vote counts toward activation
        if !global.is_activated() && voter.last_vote_weight <= 0.0 {
            global.v1.total_activated_stake += voter.staked;
            if global.v1.total_activated_stake >= config.min_activated_stake {
                global.v1.thresh_activated_stake_time = now;
                info!(
                    "chain activated at {} with {} staked",
                    now, global.v1.total_activated_stake
                );
            }
        }

        let mut new_weight = stake2vote(voter.staked, now, config.vote_weight_epoch_sec);
        if voter.is_proxy {
            new_weight += voter.proxied_vote_weight;
        }

        // (delta, newly selected) per producer
        let mut deltas: BTreeMap<Name, (f64, bool)> = BTreeMap::new();
        if voter.last_vote_weight > 0.0 && voter.proxy.is_none() {
            for p in &voter.producers {
                let entry = deltas.entry(*p).or_insert((0.0, false));
                entry.0 -= voter.last_vote_weight;
            }
        }
        if new_proxy.is_none() && new_weight >= 0.0 {
            for p in producers {
                let entry = deltas.entry(*p).or_insert((0.0, false));
                entry.0 += new_weight;
                entry.1 = true;
            }
        }

        for (owner, (_, is_new)) in &deltas {
            match self.producers.get(owner) {
                Some(p) => {
                    if voting && !p.is_active && *is_new {
                        return Err(GovernanceError::ProducerInactive(*owner));
                    }
                }
                None if *is_new => return Err(GovernanceError::ProducerNotRegistered(*owner)),
                None => {}
            }
        }

        if voter.last_vote_weight > 0.0 {
            if let Some(old_proxy) = voter.proxy {
                let row = self
                    .voters
                    .get_mut(&old_proxy)
                    .ok_or(GovernanceError::InvalidProxy(old_proxy))?;
                row.proxied_vote_weight -= voter.last_vote_weight;
                self.propagate_weight_change(global, config, now, old_proxy)?;
            }
        }

        if let Some(p) = new_proxy {
            if new_weight >= 0.0 {
                if let Some(row) = self.voters.get_mut(&p) {
                    row.proxied_vote_weight += new_weight;
                }
                self.propagate_weight_change(global, config, now, p)?;
            }
        }

        let mut votepay = VotepayDelta::default();
        for (owner, (delta, _)) in deltas {
            self.apply_producer_delta(global, config, now, owner, delta, &mut votepay);
        }
        votepay.commit(global, now);

        let was_active = voter.has_vote();
        let now_active = new_proxy.is_some() || !producers.is_empty();
        if !was_active && now_active {
            global.v1.active_stake += voter.staked;
        } else if was_active && !now_active {
            global.v1.active_stake -= voter.staked;
        }

        if let Some(row) = self.voters.get_mut(&voter_name) {
            row.last_vote_weight = new_weight;
            row.producers = producers.to_vec();
            row.proxy = new_proxy;
        }

        debug!(
            "{} voted with weight {} for {:?} via {:?}",
            voter_name, new_weight, producers, new_proxy
        );
        Ok(())
    }

    /// Recompute a voter's weight and push the difference to whatever it
    /// backs. Changes of one vote or less are absorbed.
    pub fn propagate_weight_change(
        &mut self,
        global: &mut GlobalState,
        config: &VotingConfig,
        now: TimePoint,
        voter_name: Name,
    ) -> Result<()> {
        let voter = self
            .voters
            .get(&voter_name)
            .cloned()
            .ok_or(GovernanceError::VoterNotFound(voter_name))?;
        if voter.proxy.is_some() && voter.is_proxy {
            return Err(GovernanceError::ProxyUsingProxy(voter_name));
        }

        let mut new_weight = stake2vote(voter.staked, now, config.vote_weight_epoch_sec);
        if voter.is_proxy {
            new_weight += voter.proxied_vote_weight;
        }

        let delta = new_weight - voter.last_vote_weight;
        if delta.abs() <= 1.0 {
            return Ok(());
        }

        if let Some(proxy) = voter.proxy {
            let row = self
                .voters
                .get_mut(&proxy)
                .ok_or(GovernanceError::InvalidProxy(proxy))?;
            row.proxied_vote_weight += delta;
            self.propagate_weight_change(global, config, now, proxy)?;
        } else {
            let mut votepay = VotepayDelta::default();
            for owner in &voter.producers {
                if !self.producers.contains(owner) {
                    return Err(GovernanceError::ProducerNotFound(*owner));
                }
                self.apply_producer_delta(global, config, now, *owner, delta, &mut votepay);
            }
            votepay.commit(global, now);
        }

        if let Some(row) = self.voters.get_mut(&voter_name) {
            row.last_vote_weight = new_weight;
        }
        Ok(())
    }

    pub fn register_proxy(
        &mut self,
        global: &mut GlobalState,
        config: &VotingConfig,
        now: TimePoint,
        proxy: Name,
        is_proxy: bool,
    ) -> Result<()> {
        match self.voters.get_mut(&proxy) {
            Some(row) => {
                if row.is_proxy == is_proxy {
                    return Err(GovernanceError::NoEffect);
                }
                if is_proxy && row.proxy.is_some() {
                    return Err(GovernanceError::ProxiedCannotBecomeProxy(proxy));
                }
                row.is_proxy = is_proxy;
                self.propagate_weight_change(global, config, now, proxy)?;
            }
            None => {
                self.voters.upsert(VoterInfo {
                    is_proxy,
                    ..VoterInfo::new(proxy)
                });
            }
        }
        info!("{} proxy status set to {}", proxy, is_proxy);
        Ok(())
    }

    fn apply_producer_delta(
        &mut self,
        global: &mut GlobalState,
        config: &VotingConfig,
        now: TimePoint,
        owner: Name,
        delta: f64,
        votepay: &mut VotepayDelta,
    ) {
        let Some(before) = self.producers.get(&owner) else {
            return;
        };
        let init_total_votes = before.total_votes;
        let last_claim_time = before.last_claim_time;

        self.producers.modify(&owner, |p| {
            p.total_votes = (p.total_votes + delta).max(0.0);
        });
        global.v1.total_producer_vote_weight =
            (global.v1.total_producer_vote_weight + delta).max(0.0);

        if let Some(prod2) = self.producers2.get_mut(&owner) {
            votepay.track(
                prod2,
                now,
                last_claim_time,
                config.votepay_threshold_sec,
                init_total_votes,
                delta,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epoch() -> TimePoint {
        TimePoint::from_secs(946_684_800)
    }

    #[test]
    fn test_stake2vote_doubles_yearly() {
        let config = VotingConfig::default();
        assert_eq!(stake2vote(1000, epoch(), config.vote_weight_epoch_sec), 1000.0);
        let year = epoch().add_secs(52 * 7 * SECONDS_PER_DAY);
        assert_eq!(stake2vote(1000, year, config.vote_weight_epoch_sec), 2000.0);
        // Partial weeks do not count
        let almost = epoch().add_secs(7 * SECONDS_PER_DAY - 1);
        assert_eq!(stake2vote(1000, almost, config.vote_weight_epoch_sec), 1000.0);
    }

    #[test]
    fn test_register_producer_validation() {
        let mut gs = GlobalState::new();
        let mut vs = VotingState::new();
        let bp = Name::constant("bp");

        let long = "x".repeat(512);
        assert!(matches!(
            vs.register_producer(&mut gs, epoch(), bp, "KEY", &long, 0),
            Err(GovernanceError::UrlTooLong { .. })
        ));
        assert_eq!(
            vs.register_producer(&mut gs, epoch(), bp, "", "", 0),
            Err(GovernanceError::DefaultKey)
        );
        vs.register_producer(&mut gs, epoch(), bp, "KEY", "", 0).unwrap();
        assert!(vs.producers2.contains(&bp));
    }

    #[test]
    fn test_reregistration_restores_votepay_row() {
        let mut gs = GlobalState::new();
        let mut vs = VotingState::new();
        let bp = Name::constant("bp");
        vs.register_producer(&mut gs, epoch(), bp, "KEY", "", 0).unwrap();
        vs.producers.modify(&bp, |p| p.total_votes = 42.0);
        vs.producers2.remove(&bp);
        vs.deactivate_producer(bp).unwrap();

        vs.register_producer(&mut gs, epoch(), bp, "KEY2", "", 0).unwrap();
        assert!(vs.producers.get(&bp).unwrap().is_active);
        assert!(vs.producers2.contains(&bp));
        assert_eq!(gs.v3.total_vpay_share_change_rate, 42.0);
    }

    #[test]
    fn test_vote_requires_voter_record() {
        let mut gs = GlobalState::new();
        let mut vs = VotingState::new();
        let config = VotingConfig::default();
        let err = vs
            .update_votes(&mut gs, &config, epoch(), Name::constant("alice"), None, &[], true)
            .unwrap_err();
        assert_eq!(err, GovernanceError::VoterNotFound(Name::constant("alice")));
    }

    #[test]
    fn test_vote_input_checks() {
        let mut gs = GlobalState::new();
        let mut vs = VotingState::new();
        let config = VotingConfig {
            max_producers_per_vote: 2,
            ..Default::default()
        };
        let alice = Name::constant("alice");
        let a = Name::constant("a");
        let b = Name::constant("b");

        assert_eq!(
            vs.update_votes(&mut gs, &config, epoch(), alice, Some(alice), &[], true),
            Err(GovernanceError::ProxyToSelf)
        );
        assert_eq!(
            vs.update_votes(&mut gs, &config, epoch(), alice, Some(a), &[b], true),
            Err(GovernanceError::ProxyAndProducers)
        );
        assert_eq!(
            vs.update_votes(&mut gs, &config, epoch(), alice, None, &[b, a], true),
            Err(GovernanceError::UnsortedProducers)
        );
        assert!(matches!(
            vs.update_votes(&mut gs, &config, epoch(), alice, None, &[a, b, Name::constant("c")], true),
            Err(GovernanceError::TooManyProducers { max: 2, got: 3 })
        ));
    }

    #[test]
    fn test_negative_stake_rejected() {
        let mut gs = GlobalState::new();
        let mut vs = VotingState::new();
        let config = VotingConfig::default();
        let alice = Name::constant("alice");
        assert_eq!(
            vs.update_voting_power(&mut gs, &config, epoch(), alice, -1),
            Err(GovernanceError::NegativeStake(alice))
        );
        assert!(vs.voters.get(&alice).is_none());
    }

    #[test]
    fn test_register_proxy_requires_change() {
        let mut gs = GlobalState::new();
        let mut vs = VotingState::new();
        let config = VotingConfig::default();
        let px = Name::constant("px");
        vs.register_proxy(&mut gs, &config, epoch(), px, true).unwrap();
        assert!(vs.voters.get(&px).unwrap().is_proxy);
        assert_eq!(
            vs.register_proxy(&mut gs, &config, epoch(), px, true),
            Err(GovernanceError::NoEffect)
        );
        vs.register_proxy(&mut gs, &config, epoch(), px, false).unwrap();
        assert!(!vs.voters.get(&px).unwrap().is_proxy);
    }
}
