use name_auction::*;
use sys_core::constants::{NAMES_ACCOUNT, SECONDS_PER_DAY};
use sys_core::{
    Asset, BlockTimestamp, Chain, DeferredAction, GlobalState, MemoryHost, Name, Scheduler, Symbol,
    TimePoint, TokenLedger,
};

fn cur() -> Symbol {
    Symbol::new("CUR", 4).unwrap()
}

fn n(s: &str) -> Name {
    Name::constant(s)
}

struct Market {
    gs: GlobalState,
    state: AuctionState,
    config: AuctionConfig,
    host: MemoryHost,
    now: TimePoint,
}

impl Market {
    fn new() -> Self {
        let now = TimePoint::from_secs(1_600_000_000);
        let mut host = MemoryHost::at(now);
        host.create_token(cur());
        for who in ["alice", "bob", "carol"] {
            host.issue(n(who), Asset::new(1_000_0000, cur()), "fund").unwrap();
        }
        Self {
            gs: GlobalState::new(),
            state: AuctionState::new(),
            config: AuctionConfig::default(),
            host,
            now,
        }
    }

    fn bid(&mut self, bidder: &str, name: &str, amount: i64) -> Result<()> {
        self.state.bid(
            &mut self.gs,
            &self.config,
            &mut self.host,
            self.now,
            n(bidder),
            n(name),
            Asset::new(amount, cur()),
            cur(),
        )
    }

    fn balance(&self, who: Name) -> i64 {
        self.host.balance(who, cur()).amount
    }
}

#[test]
fn test_outbid_by_five_percent() {
    let mut m = Market::new();
    m.bid("alice", "short", 10_0000).unwrap();

    assert!(matches!(
        m.bid("bob", "short", 10_4999),
        Err(AuctionError::BidTooLow { .. })
    ));
    m.bid("bob", "short", 10_5000).unwrap();

    let bid = m.state.bids.get(&n("short")).unwrap();
    assert_eq!(bid.high_bidder, n("bob"));
    assert_eq!(bid.high_bid, 10_5000);

    let refund = m.state.refunds.get(&n("short"), &n("alice")).unwrap();
    assert_eq!(refund.amount.amount, 10_0000);
    assert_eq!(m.host.pending_deferred().len(), 1);

    // The deferred refund is due immediately
    let due = m.host.take_due(m.now);
    assert_eq!(
        due,
        vec![DeferredAction::RefundBid {
            bidder: n("alice"),
            newname: n("short")
        }]
    );
    m.state.refund_bid(&mut m.host, n("alice"), n("short")).unwrap();
    assert_eq!(m.balance(n("alice")), 1_000_0000);
    assert_eq!(m.balance(NAMES_ACCOUNT), 10_5000);
}

#[test]
fn test_tiny_bids_still_need_a_raise() {
    let mut m = Market::new();
    m.bid("alice", "xyz", 19).unwrap();

    for amount in [19, 18] {
        assert!(matches!(
            m.bid("bob", "xyz", amount),
            Err(AuctionError::BidTooLow { minimum, .. }) if minimum.amount == 20
        ));
    }
    let bid = m.state.bids.get(&n("xyz")).unwrap();
    assert_eq!(bid.high_bidder, n("alice"));
    assert_eq!(bid.high_bid, 19);
    assert_eq!(m.balance(n("bob")), 1_000_0000);

    m.bid("bob", "xyz", 20).unwrap();
    assert_eq!(m.state.bids.get(&n("xyz")).unwrap().high_bidder, n("bob"));
}

#[test]
fn test_oversized_bid_is_rejected_without_panicking() {
    let mut m = Market::new();
    m.bid("alice", "huge", 1_000_0000).unwrap();
    m.state.bids.modify(&n("huge"), |b| b.high_bid = i64::MAX / 2);

    assert!(matches!(
        m.bid("bob", "huge", i64::MAX),
        Err(AuctionError::Asset(_))
    ));
}

#[test]
fn test_refunds_coalesce_per_bidder() {
    let mut m = Market::new();
    m.bid("alice", "short", 10_0000).unwrap();
    m.bid("bob", "short", 11_0000).unwrap();
    m.bid("alice", "short", 12_0000).unwrap();
    m.bid("bob", "short", 13_0000).unwrap();

    // Alice was outbid once and refunded once; bob's first bid is owed too
    assert_eq!(m.state.refunds.get(&n("short"), &n("alice")).unwrap().amount.amount, 22_0000);
    assert_eq!(m.state.refunds.get(&n("short"), &n("bob")).unwrap().amount.amount, 11_0000);
    assert_eq!(m.host.pending_deferred().len(), 2);

    // Escrow holds the high bid plus everything owed back
    assert_eq!(m.balance(NAMES_ACCOUNT), 13_0000 + 22_0000 + 11_0000);

    assert!(matches!(
        m.state.refund_bid(&mut m.host, n("carol"), n("short")),
        Err(AuctionError::RefundNotFound { .. })
    ));
}

#[test]
fn test_bid_name_validation() {
    let mut m = Market::new();
    m.host.create_account(n("taken")).unwrap();

    assert_eq!(m.bid("alice", "abcdefghijkl", 1_0000), Err(AuctionError::NoBidRequired(12)));
    assert_eq!(m.bid("alice", "abcdefghijkla", 1_0000), Err(AuctionError::ThirteenthChar));
    assert_eq!(m.bid("alice", "a.b", 1_0000), Err(AuctionError::NotTopLevel(n("a.b"))));
    assert_eq!(m.bid("alice", "taken", 1_0000), Err(AuctionError::AccountExists(n("taken"))));
    assert_eq!(m.bid("alice", "", 1_0000), Err(AuctionError::EmptyName));
    assert!(matches!(m.bid("alice", "short", 0), Err(AuctionError::NonPositiveBid(_))));

    let other = Symbol::new("OTH", 4).unwrap();
    let res = m.state.bid(
        &mut m.gs,
        &m.config,
        &mut m.host,
        m.now,
        n("alice"),
        n("short"),
        Asset::new(1_0000, other),
        cur(),
    );
    assert!(matches!(res, Err(AuctionError::WrongSymbol { .. })));

    m.bid("alice", "short", 1_0000).unwrap();
    assert_eq!(m.bid("alice", "short", 2_0000), Err(AuctionError::AlreadyHighBidder(n("alice"))));
}

#[test]
fn test_close_then_claim() {
    let mut m = Market::new();
    m.gs.v1.thresh_activated_stake_time = m.now.add_secs(-15 * SECONDS_PER_DAY);
    m.bid("alice", "short", 10_0000).unwrap();
    m.bid("bob", "short", 11_0000).unwrap();

    // Too recent
    let soon = m.now.add_secs(3600);
    assert_eq!(
        m.state
            .close_expired(&mut m.gs, &m.config, soon, BlockTimestamp::from(soon)),
        None
    );

    let later = m.now.add_secs(SECONDS_PER_DAY + 1);
    let block = BlockTimestamp::from(later);
    assert_eq!(
        m.state.close_expired(&mut m.gs, &m.config, later, block),
        Some(n("short"))
    );
    assert_eq!(m.gs.v1.last_name_close, block);
    assert_eq!(m.state.bids.get(&n("short")).unwrap().high_bid, -11_0000);

    m.now = later;
    assert_eq!(m.bid("carol", "short", 20_0000), Err(AuctionError::AuctionClosed(n("short"))));

    assert!(matches!(
        m.state.claim_name(n("alice"), n("short")),
        Err(AuctionError::NotHighBidder { .. })
    ));
    m.state.claim_name(n("bob"), n("short")).unwrap();
    assert!(m.state.bids.get(&n("short")).is_none());
}

#[test]
fn test_close_rate_limited_to_one_per_day() {
    let mut m = Market::new();
    m.gs.v1.thresh_activated_stake_time = m.now.add_secs(-15 * SECONDS_PER_DAY);
    m.bid("alice", "aaa", 5_0000).unwrap();
    m.bid("bob", "bbb", 7_0000).unwrap();

    let t1 = m.now.add_secs(2 * SECONDS_PER_DAY);
    assert_eq!(
        m.state
            .close_expired(&mut m.gs, &m.config, t1, BlockTimestamp::from(t1)),
        Some(n("bbb"))
    );

    let t2 = t1.add_secs(3600);
    assert_eq!(
        m.state
            .close_expired(&mut m.gs, &m.config, t2, BlockTimestamp::from(t2)),
        None
    );

    let t3 = t1.add_secs(SECONDS_PER_DAY + 1);
    assert_eq!(
        m.state
            .close_expired(&mut m.gs, &m.config, t3, BlockTimestamp::from(t3)),
        Some(n("aaa"))
    );
}

#[test]
fn test_no_close_before_activation_age() {
    let mut m = Market::new();
    m.bid("alice", "short", 10_0000).unwrap();
    let later = m.now.add_secs(3 * SECONDS_PER_DAY);

    // Not activated at all
    assert_eq!(
        m.state
            .close_expired(&mut m.gs, &m.config, later, BlockTimestamp::from(later)),
        None
    );

    // Activated too recently
    m.gs.v1.thresh_activated_stake_time = m.now;
    assert_eq!(
        m.state
            .close_expired(&mut m.gs, &m.config, later, BlockTimestamp::from(later)),
        None
    );
    assert!(m.state.bids.get(&n("short")).unwrap().is_open());
}
