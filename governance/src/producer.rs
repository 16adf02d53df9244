//! Producer records

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use sys_core::{Name, TimePoint};
use sys_storage::{Indexed, Row};

/// Longest accepted producer URL (exclusive)
pub const MAX_URL_LENGTH: usize = 512;

/// Vote ranking key. Active producers rank by negated votes so the
/// highest tally comes first; inactive producers sort after them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoteRank(pub f64);

impl Eq for VoteRank {}

impl PartialOrd for VoteRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VoteRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProducerInfo {
    pub owner: Name,
    pub total_votes: f64,
    /// Empty when the producer is deactivated
    pub producer_key: String,
    pub is_active: bool,
    pub url: String,
    pub unpaid_blocks: u32,
    pub last_claim_time: TimePoint,
    pub location: u16,
}

impl ProducerInfo {
    pub fn new(owner: Name, producer_key: String, url: String, location: u16, now: TimePoint) -> Self {
        Self {
            owner,
            total_votes: 0.0,
            producer_key,
            is_active: true,
            url,
            unpaid_blocks: 0,
            last_claim_time: now,
            location,
        }
    }

    pub fn deactivate(&mut self) {
        self.producer_key.clear();
        self.is_active = false;
    }
}

impl Row for ProducerInfo {
    fn primary_key(&self) -> Name {
        self.owner
    }
}

impl Indexed for ProducerInfo {
    type Key = VoteRank;

    fn secondary_key(&self) -> VoteRank {
        if self.is_active {
            VoteRank(-self.total_votes)
        } else {
            VoteRank(self.total_votes)
        }
    }
}

/// Vote-pay share bookkeeping, kept beside `ProducerInfo`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProducerInfo2 {
    pub owner: Name,
    pub votepay_share: f64,
    pub last_votepay_share_update: TimePoint,
}

impl ProducerInfo2 {
    pub fn new(owner: Name, now: TimePoint) -> Self {
        Self {
            owner,
            votepay_share: 0.0,
            last_votepay_share_update: now,
        }
    }
}

impl Row for ProducerInfo2 {
    fn primary_key(&self) -> Name {
        self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_orders_active_first() {
        let now = TimePoint::from_secs(1);
        let mut a = ProducerInfo::new(Name::constant("a"), "K".into(), String::new(), 0, now);
        let mut b = a.clone();
        b.owner = Name::constant("b");
        a.total_votes = 10.0;
        b.total_votes = 20.0;
        assert!(b.secondary_key() < a.secondary_key());

        b.deactivate();
        assert!(a.secondary_key() < b.secondary_key());
        assert!(b.producer_key.is_empty());
    }
}
