//! Premium Account Name Auctions
//!
//! Names shorter than twelve characters are sold by ascending auction:
//! - Bids are escrowed with the names account
//! - Outbid bidders are refunded through deferred actions
//! - The top quiet auction closes at most once a day
//! - Winners claim their name at account creation

pub mod auction;
pub mod bid;
pub mod error;

pub use auction::{AuctionConfig, AuctionState};
pub use bid::{BidRefund, NameBid};
pub use error::{AuctionError, Result};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auction_defaults() {
        let config = AuctionConfig::default();
        assert_eq!(config.auction_name_length, 12);
        assert_eq!(config.min_bid_increase_percent, 5);
        assert_eq!(config.name_close_interval_slots, 172_800);
    }
}
