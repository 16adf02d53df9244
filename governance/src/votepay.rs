//! Vote-pay share accounting
//!
//! Each producer accrues a share equal to its vote total integrated over
//! time. The global total is tracked with a change rate so it can be
//! advanced without touching every producer.

use sys_core::{GlobalState, TimePoint};

use crate::producer::ProducerInfo2;

fn elapsed_secs(now: TimePoint, since: TimePoint) -> f64 {
    now.micros_since(since) as f64 / 1e6
}

/// Accrue `shares_rate` since the last update and return the accumulated
/// share. The stored share is zeroed instead when `reset_to_zero` is set.
pub fn update_producer_votepay_share(
    prod2: &mut ProducerInfo2,
    now: TimePoint,
    shares_rate: f64,
    reset_to_zero: bool,
) -> f64 {
    let mut delta = 0.0;
    if shares_rate > 0.0 && now > prod2.last_votepay_share_update {
        delta = shares_rate * elapsed_secs(now, prod2.last_votepay_share_update);
    }

    let new_share = prod2.votepay_share + delta;
    prod2.votepay_share = if reset_to_zero { 0.0 } else { new_share };
    prod2.last_votepay_share_update = now;

    new_share
}

/// Advance the global share total, then apply the share and rate deltas
pub fn update_total_votepay_share(
    global: &mut GlobalState,
    now: TimePoint,
    additional_shares_delta: f64,
    shares_rate_delta: f64,
) -> f64 {
    let mut delta_total = 0.0;
    if now > global.v3.last_vpay_state_update {
        delta_total = global.v3.total_vpay_share_change_rate
            * elapsed_secs(now, global.v3.last_vpay_state_update);
    }

    delta_total += additional_shares_delta;
    if delta_total < 0.0 && global.v2.total_producer_votepay_share < -delta_total {
        global.v2.total_producer_votepay_share = 0.0;
    } else {
        global.v2.total_producer_votepay_share += delta_total;
    }

    if shares_rate_delta < 0.0 && global.v3.total_vpay_share_change_rate < -shares_rate_delta {
        global.v3.total_vpay_share_change_rate = 0.0;
    } else {
        global.v3.total_vpay_share_change_rate += shares_rate_delta;
    }

    global.v3.last_vpay_state_update = now;

    global.v2.total_producer_votepay_share
}

/// Per-producer deltas collected while applying a batch of vote changes
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct VotepayDelta {
    pub change_rate: f64,
    pub inactive_share: f64,
}

impl VotepayDelta {
    /// Fold one producer's vote change into the batch. `threshold_secs`
    /// is the post-claim window during which shares keep accruing.
    pub fn track(
        &mut self,
        prod2: &mut ProducerInfo2,
        now: TimePoint,
        last_claim_time: TimePoint,
        threshold_secs: i64,
        init_total_votes: f64,
        vote_delta: f64,
    ) {
        let window_end = last_claim_time.add_secs(threshold_secs);
        let crossed = window_end <= now;
        let updated_after_threshold = window_end <= prod2.last_votepay_share_update;

        let rate = if updated_after_threshold { 0.0 } else { init_total_votes };
        let new_share =
            update_producer_votepay_share(prod2, now, rate, crossed && !updated_after_threshold);

        if !crossed {
            self.change_rate += vote_delta;
        } else if !updated_after_threshold {
            self.inactive_share += new_share;
            self.change_rate -= init_total_votes;
        }
    }

    pub fn commit(self, global: &mut GlobalState, now: TimePoint) {
        update_total_votepay_share(global, now, -self.inactive_share, self.change_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sys_core::Name;

    #[test]
    fn test_producer_share_accrues() {
        let start = TimePoint::from_secs(1_000);
        let mut p = ProducerInfo2::new(Name::constant("bp"), start);
        let share = update_producer_votepay_share(&mut p, start.add_secs(10), 2.5, false);
        assert_eq!(share, 25.0);
        assert_eq!(p.votepay_share, 25.0);

        let share = update_producer_votepay_share(&mut p, start.add_secs(20), 1.0, true);
        assert_eq!(share, 35.0);
        assert_eq!(p.votepay_share, 0.0);
    }

    #[test]
    fn test_total_share_clamps_at_zero() {
        let mut gs = GlobalState::new();
        let now = TimePoint::from_secs(100);
        update_total_votepay_share(&mut gs, now, 0.0, 4.0);
        assert_eq!(gs.v3.total_vpay_share_change_rate, 4.0);

        let total = update_total_votepay_share(&mut gs, now.add_secs(5), 0.0, 0.0);
        assert_eq!(total, 20.0);

        let total = update_total_votepay_share(&mut gs, now.add_secs(5), -50.0, -10.0);
        assert_eq!(total, 0.0);
        assert_eq!(gs.v3.total_vpay_share_change_rate, 0.0);
    }
}
