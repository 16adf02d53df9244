//! Auction records

use serde::{Deserialize, Serialize};

use sys_core::{Asset, Name, TimePoint};
use sys_storage::{Indexed, Row};

/// Current state of one name's auction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameBid {
    pub newname: Name,
    pub high_bidder: Name,
    /// Negated once the auction closes
    pub high_bid: i64,
    pub last_bid_time: TimePoint,
}

impl NameBid {
    pub fn is_open(&self) -> bool {
        self.high_bid > 0
    }
}

impl Row for NameBid {
    fn primary_key(&self) -> Name {
        self.newname
    }
}

impl Indexed for NameBid {
    type Key = u64;

    /// Open bids map above `u64::MAX / 2`, highest bid first
    fn secondary_key(&self) -> u64 {
        self.high_bid.wrapping_neg() as u64
    }
}

/// Outbid amount owed back to a bidder, scoped by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidRefund {
    pub bidder: Name,
    pub amount: Asset,
}

impl Row for BidRefund {
    fn primary_key(&self) -> Name {
        self.bidder
    }
}
