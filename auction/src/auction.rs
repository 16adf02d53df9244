//! Premium name auctions
//!
//! Short names are sold by open ascending auction. An outbid bidder is
//! refunded through a deferred action, and the leading bid on the most
//! valuable name closes once bidding has gone quiet for a day.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use sys_core::constants::{BLOCKS_PER_DAY, NAMES_ACCOUNT, SECONDS_PER_DAY, USECONDS_PER_SECOND};
use sys_core::{
    Asset, AssetError, BlockTimestamp, Chain, DeferredAction, GlobalState, Name, Scheduler, Symbol,
    TimePoint, TokenLedger,
};
use sys_storage::{IndexedTable, ScopedTable};

use crate::bid::{BidRefund, NameBid};
use crate::error::{AuctionError, Result};

/// Auction settings, the `[auction]` config section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuctionConfig {
    /// Names at least this long are created without bidding
    pub auction_name_length: usize,
    pub min_bid_increase_percent: i64,
    pub name_close_interval_slots: u32,
    /// Quiet time after the last bid before an auction may close
    pub bid_idle_sec: i64,
    /// Time since chain activation before any auction may close
    pub activation_age_sec: i64,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            auction_name_length: 12,
            min_bid_increase_percent: 5,
            name_close_interval_slots: BLOCKS_PER_DAY,
            bid_idle_sec: SECONDS_PER_DAY,
            activation_age_sec: 14 * SECONDS_PER_DAY,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuctionState {
    pub bids: IndexedTable<NameBid>,
    pub refunds: ScopedTable<BidRefund>,
}

impl AuctionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Smallest acceptable bid to outbid `high_bid`. The raise is `percent`
    /// of the bid rounded up, and at least one unit.
    pub fn minimum_raise(high_bid: i64, percent: i64) -> Result<i64> {
        let scaled = high_bid.checked_mul(percent).ok_or(AssetError::Overflow)?;
        let raise = (scaled / 100 + i64::from(scaled % 100 != 0)).max(1);
        Ok(high_bid.checked_add(raise).ok_or(AssetError::Overflow)?)
    }

    fn check_biddable<C: Chain>(config: &AuctionConfig, chain: &C, newname: Name) -> Result<()> {
        if newname.is_empty() {
            return Err(AuctionError::EmptyName);
        }
        if newname.has_thirteenth_char() {
            return Err(AuctionError::ThirteenthChar);
        }
        if newname.length() >= config.auction_name_length {
            return Err(AuctionError::NoBidRequired(config.auction_name_length));
        }
        if newname.suffix() != newname {
            return Err(AuctionError::NotTopLevel(newname));
        }
        if chain.is_account(newname) {
            return Err(AuctionError::AccountExists(newname));
        }
        Ok(())
    }

    /// Place a bid on `newname`. The bid is escrowed with the names account.
    #[allow(clippy::too_many_arguments)]
    pub fn bid<H>(
        &mut self,
        global: &mut GlobalState,
        config: &AuctionConfig,
        host: &mut H,
        now: TimePoint,
        bidder: Name,
        newname: Name,
        amount: Asset,
        core_symbol: Symbol,
    ) -> Result<()>
    where
        H: TokenLedger + Scheduler + Chain,
    {
        Self::check_biddable(config, host, newname)?;
        if amount.symbol != core_symbol {
            return Err(AuctionError::WrongSymbol {
                expected: core_symbol,
                got: amount.symbol,
            });
        }
        if !amount.is_positive() {
            return Err(AuctionError::NonPositiveBid(amount));
        }

        let current = self.bids.get(&newname).cloned();
        if let Some(current) = &current {
            if !current.is_open() {
                return Err(AuctionError::AuctionClosed(newname));
            }
            let minimum =
                Self::minimum_raise(current.high_bid, config.min_bid_increase_percent)?;
            if amount.amount < minimum {
                return Err(AuctionError::BidTooLow {
                    percent: config.min_bid_increase_percent,
                    minimum: Asset::new(minimum, core_symbol),
                });
            }
            if current.high_bidder == bidder {
                return Err(AuctionError::AlreadyHighBidder(bidder));
            }
        }

        host.transfer(bidder, NAMES_ACCOUNT, amount, &format!("bid name {}", newname))?;
        debug!("{} bid {} on {}", bidder, amount, newname);

        match current {
            None => {
                self.bids.upsert(NameBid {
                    newname,
                    high_bidder: bidder,
                    high_bid: amount.amount,
                    last_bid_time: now,
                });
                self.close_expired(global, config, now, BlockTimestamp::from(now));
            }
            Some(current) => {
                let outbid = current.high_bidder;
                let owed = Asset::new(current.high_bid, core_symbol);
                let refund = match self.refunds.get(&newname, &outbid) {
                    Some(existing) => BidRefund {
                        bidder: outbid,
                        amount: existing.amount.checked_add(&owed)?,
                    },
                    None => BidRefund {
                        bidder: outbid,
                        amount: owed,
                    },
                };
                self.refunds.upsert(newname, refund);
                host.schedule(
                    DeferredAction::RefundBid {
                        bidder: outbid,
                        newname,
                    },
                    now,
                );

                self.bids.modify(&newname, |b| {
                    b.high_bidder = bidder;
                    b.high_bid = amount.amount;
                    b.last_bid_time = now;
                });
            }
        }
        Ok(())
    }

    /// Pay back an outbid bidder and cancel any pending deferred refund
    pub fn refund_bid<H>(&mut self, host: &mut H, bidder: Name, newname: Name) -> Result<Asset>
    where
        H: TokenLedger + Scheduler,
    {
        let refund = self
            .refunds
            .get(&newname, &bidder)
            .cloned()
            .ok_or(AuctionError::RefundNotFound { bidder, newname })?;

        host.transfer(
            NAMES_ACCOUNT,
            bidder,
            refund.amount,
            &format!("refund bid on name {}", newname),
        )?;
        self.refunds.remove(&newname, &bidder);
        host.cancel(DeferredAction::RefundBid { bidder, newname }.sender_id());

        debug!("refunded {} to {} for {}", refund.amount, bidder, newname);
        Ok(refund.amount)
    }

    /// Close the highest open auction if it has gone quiet. Runs at most
    /// once per close interval. Returns the name that closed.
    pub fn close_expired(
        &mut self,
        global: &mut GlobalState,
        config: &AuctionConfig,
        now: TimePoint,
        block_time: BlockTimestamp,
    ) -> Option<Name> {
        if block_time.slots_since(global.v1.last_name_close) <= config.name_close_interval_slots {
            return None;
        }
        if !global.is_activated() {
            return None;
        }
        let activation_age = now.micros_since(global.v1.thresh_activated_stake_time);
        if activation_age <= config.activation_age_sec * USECONDS_PER_SECOND {
            return None;
        }

        let highest = self.bids.lower_bound(u64::MAX / 2)?.clone();
        if !highest.is_open() {
            return None;
        }
        let idle = now.micros_since(highest.last_bid_time);
        if idle <= config.bid_idle_sec * USECONDS_PER_SECOND {
            return None;
        }

        global.v1.last_name_close = block_time;
        self.bids.modify(&highest.newname, |b| b.high_bid = -b.high_bid);
        info!(
            "auction for {} closed, won by {} at {}",
            highest.newname, highest.high_bidder, highest.high_bid
        );
        Some(highest.newname)
    }

    /// Authorize `creator` to create `newname`. Auctioned names need a
    /// closed auction won by the creator. Dotted names need the suffix owner.
    pub fn claim_name(&mut self, creator: Name, newname: Name) -> Result<()> {
        if !newname.has_dot_in_prefix() {
            return Ok(());
        }

        let suffix = newname.suffix();
        if suffix == newname {
            let bid = self
                .bids
                .get(&newname)
                .ok_or(AuctionError::NoActiveBid(newname))?;
            if bid.high_bidder != creator {
                return Err(AuctionError::NotHighBidder {
                    name: newname,
                    winner: bid.high_bidder,
                });
            }
            if bid.high_bid >= 0 {
                return Err(AuctionError::AuctionNotClosed(newname));
            }
            self.bids.remove(&newname);
            info!("{} claimed auctioned name {}", creator, newname);
        } else if creator != suffix {
            return Err(AuctionError::SuffixOwnerOnly(suffix));
        }
        Ok(())
    }
}
