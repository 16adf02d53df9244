//! Producer schedule election

use log::{debug, info};

use sys_core::{BlockTimestamp, Chain, GlobalState, ProducerKey};

use crate::voting::VotingState;

fn secs_between(later: BlockTimestamp, earlier: BlockTimestamp) -> i64 {
    later.slots_since(earlier) as i64 / 2
}

impl VotingState {
    /// Pick the top active producers and propose them to the chain.
    ///
    /// The schedule grows by at most `schedule_size_step` once the chain
    /// is activated and the increase delay has passed since the last
    /// increase. It shrinks only after the decrease delay. Returns the new
    /// schedule size when the chain accepted a proposal.
    pub fn update_elected_producers<C: Chain>(
        &self,
        global: &mut GlobalState,
        chain: &mut C,
        block_time: BlockTimestamp,
    ) -> Option<usize> {
        global.v1.last_producer_schedule_update = block_time;

        let target = global.v1.target_producer_schedule_size as usize;
        let top: Vec<ProducerKey> = self
            .producers
            .iter_by_secondary()
            .take_while(|p| p.is_active && p.total_votes > 0.0)
            .take(target)
            .map(|p| ProducerKey {
                producer_name: p.owner,
                block_signing_key: p.producer_key.clone(),
            })
            .collect();
        if top.is_empty() {
            return None;
        }

        let eligible = top.len();
        let last = global.v1.last_producer_schedule_size as usize;
        let step = global.v1.schedule_size_step.max(1) as usize;

        let size = if last == 0 {
            eligible
        } else if eligible > last {
            let waited = secs_between(block_time, global.v4.last_schedule_size_increase);
            if global.is_activated() && waited >= global.v4.schedule_increase_delay_sec as i64 {
                (last + step).min(eligible)
            } else {
                last
            }
        } else if eligible < last {
            let waited = secs_between(block_time, global.v4.last_schedule_size_decrease);
            if waited >= global.v4.schedule_decrease_delay_sec as i64 {
                eligible
            } else {
                debug!("schedule shrink to {} deferred", eligible);
                return None;
            }
        } else {
            last
        };

        let mut chosen = top;
        chosen.truncate(size);
        chosen.sort_by_key(|p| p.producer_name);

        let version = chain.set_proposed_producers(chosen)?;
        if last != 0 && size > last {
            global.v4.last_schedule_size_increase = block_time;
        } else if size < last {
            global.v4.last_schedule_size_decrease = block_time;
        }
        global.v1.last_producer_schedule_size = size as u16;
        info!("proposed producer schedule v{} with {} producers", version, size);

        Some(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sys_core::{MemoryHost, Name, TimePoint};

    fn state_with(votes: &[(&str, f64)]) -> (VotingState, GlobalState) {
        let mut gs = GlobalState::new();
        let mut vs = VotingState::new();
        let now = TimePoint::from_secs(946_684_800);
        for (name, v) in votes {
            let owner = Name::constant(name);
            vs.register_producer(&mut gs, now, owner, "KEY", "", 0).unwrap();
            vs.producers.modify(&owner, |p| p.total_votes = *v);
        }
        (vs, gs)
    }

    #[test]
    fn test_first_election_takes_all_eligible() {
        let (vs, mut gs) = state_with(&[("b", 10.0), ("a", 20.0), ("c", 0.0)]);
        let mut host = MemoryHost::new();
        let size = vs.update_elected_producers(&mut gs, &mut host, BlockTimestamp::from_slot(500));
        assert_eq!(size, Some(2));
        let names: Vec<Name> = host.proposed_producers().iter().map(|p| p.producer_name).collect();
        assert_eq!(names, vec![Name::constant("a"), Name::constant("b")]);
        assert_eq!(gs.v1.last_producer_schedule_size, 2);
    }

    #[test]
    fn test_growth_waits_for_activation() {
        let (vs, mut gs) = state_with(&[("a", 20.0), ("b", 10.0), ("c", 5.0)]);
        gs.v1.last_producer_schedule_size = 1;
        let mut host = MemoryHost::new();
        let size = vs.update_elected_producers(&mut gs, &mut host, BlockTimestamp::from_slot(500));
        assert_eq!(size, Some(1));

        gs.v1.thresh_activated_stake_time = TimePoint::from_secs(1);
        gs.v1.schedule_size_step = 1;
        gs.v4.schedule_increase_delay_sec = 100;
        let size = vs.update_elected_producers(&mut gs, &mut host, BlockTimestamp::from_slot(600));
        assert_eq!(size, Some(2));
        assert_eq!(gs.v4.last_schedule_size_increase, BlockTimestamp::from_slot(600));
    }

    #[test]
    fn test_shrink_respects_decrease_delay() {
        let (vs, mut gs) = state_with(&[("a", 20.0)]);
        gs.v1.last_producer_schedule_size = 3;
        gs.v4.last_schedule_size_decrease = BlockTimestamp::from_slot(1000);
        let mut host = MemoryHost::new();

        let soon = BlockTimestamp::from_slot(1000 + 2 * 3600);
        assert_eq!(vs.update_elected_producers(&mut gs, &mut host, soon), None);
        assert_eq!(gs.v1.last_producer_schedule_size, 3);

        let later = BlockTimestamp::from_slot(1000 + 2 * 86_400);
        assert_eq!(vs.update_elected_producers(&mut gs, &mut host, later), Some(1));
        assert_eq!(gs.v4.last_schedule_size_decrease, later);
    }
}
