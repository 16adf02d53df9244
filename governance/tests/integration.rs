use governance::*;
use sys_core::{BlockTimestamp, GlobalState, MemoryHost, Name, TimePoint};

fn epoch() -> TimePoint {
    TimePoint::from_secs(946_684_800)
}

fn n(s: &str) -> Name {
    Name::constant(s)
}

struct Fixture {
    gs: GlobalState,
    vs: VotingState,
    config: VotingConfig,
    now: TimePoint,
}

impl Fixture {
    fn new() -> Self {
        Self {
            gs: GlobalState::new(),
            vs: VotingState::new(),
            config: VotingConfig::default(),
            now: epoch(),
        }
    }

    fn producer(&mut self, name: &str) {
        self.vs
            .register_producer(&mut self.gs, self.now, n(name), "PUB_KEY", "https://bp.example", 0)
            .unwrap();
    }

    fn stake(&mut self, voter: &str, amount: i64) {
        self.vs
            .update_voting_power(&mut self.gs, &self.config, self.now, n(voter), amount)
            .unwrap();
    }

    fn vote(&mut self, voter: &str, proxy: Option<&str>, producers: &[&str]) -> Result<()> {
        let producers: Vec<Name> = producers.iter().map(|p| n(p)).collect();
        self.vs.update_votes(
            &mut self.gs,
            &self.config,
            self.now,
            n(voter),
            proxy.map(n),
            &producers,
            true,
        )
    }

    fn votes(&self, producer: &str) -> f64 {
        self.vs.producers.get(&n(producer)).unwrap().total_votes
    }
}

#[test]
fn test_vote_weight_follows_stake() {
    let mut f = Fixture::new();
    f.producer("bp1");
    f.stake("alice", 1000_0000);
    f.vote("alice", None, &["bp1"]).unwrap();
    assert_eq!(f.votes("bp1"), 10_000_000.0);

    f.stake("alice", 500_0000);
    assert_eq!(f.votes("bp1"), 15_000_000.0);
    assert_eq!(f.gs.v1.total_producer_vote_weight, 15_000_000.0);
    assert_eq!(f.gs.v1.active_stake, 1500_0000);
}

#[test]
fn test_switching_producer_moves_weight() {
    let mut f = Fixture::new();
    f.producer("bp1");
    f.producer("bp2");
    f.stake("alice", 100_0000);
    f.vote("alice", None, &["bp1"]).unwrap();
    f.vote("alice", None, &["bp2"]).unwrap();

    assert_eq!(f.votes("bp1"), 0.0);
    assert_eq!(f.votes("bp2"), 1_000_000.0);
    assert_eq!(f.gs.v1.total_producer_vote_weight, 1_000_000.0);
}

#[test]
fn test_withdrawing_vote_clears_active_stake() {
    let mut f = Fixture::new();
    f.producer("bp1");
    f.stake("alice", 100_0000);
    f.vote("alice", None, &["bp1"]).unwrap();
    assert_eq!(f.gs.v1.active_stake, 100_0000);

    f.vote("alice", None, &[]).unwrap();
    assert_eq!(f.gs.v1.active_stake, 0);
    assert_eq!(f.votes("bp1"), 0.0);
}

#[test]
fn test_proxy_weight_reaches_producer() {
    let mut f = Fixture::new();
    f.producer("bp1");
    f.vs
        .register_proxy(&mut f.gs, &f.config, f.now, n("bob"), true)
        .unwrap();
    f.stake("bob", 100_0000);
    f.stake("alice", 200_0000);

    f.vote("alice", Some("bob"), &[]).unwrap();
    assert_eq!(f.vs.voters.get(&n("bob")).unwrap().proxied_vote_weight, 2_000_000.0);

    f.vote("bob", None, &["bp1"]).unwrap();
    assert_eq!(f.votes("bp1"), 3_000_000.0);

    // A stake change on the proxied voter flows through the proxy
    f.stake("alice", 100_0000);
    assert_eq!(f.votes("bp1"), 4_000_000.0);
    assert_eq!(f.gs.v1.total_producer_vote_weight, 4_000_000.0);
}

#[test]
fn test_proxy_rules() {
    let mut f = Fixture::new();
    f.stake("alice", 10_0000);
    f.stake("carol", 10_0000);

    // Not a registered proxy
    assert_eq!(
        f.vote("alice", Some("carol"), &[]),
        Err(GovernanceError::ProxyNotRegistered(n("carol")))
    );
    assert_eq!(
        f.vote("alice", Some("nobody"), &[]),
        Err(GovernanceError::InvalidProxy(n("nobody")))
    );

    f.vs
        .register_proxy(&mut f.gs, &f.config, f.now, n("carol"), true)
        .unwrap();
    f.vote("alice", Some("carol"), &[]).unwrap();

    // Proxied accounts cannot become proxies
    assert_eq!(
        f.vs.register_proxy(&mut f.gs, &f.config, f.now, n("alice"), true),
        Err(GovernanceError::ProxiedCannotBecomeProxy(n("alice")))
    );
    // And proxies cannot use a proxy
    f.vs
        .register_proxy(&mut f.gs, &f.config, f.now, n("dave"), true)
        .unwrap();
    assert_eq!(
        f.vote("dave", Some("carol"), &[]),
        Err(GovernanceError::ProxyUsingProxy(n("dave")))
    );
}

#[test]
fn test_inactive_producer_rejects_new_votes() {
    let mut f = Fixture::new();
    f.producer("bp1");
    f.stake("alice", 10_0000);
    f.stake("bob", 10_0000);
    f.vote("alice", None, &["bp1"]).unwrap();

    f.vs.deactivate_producer(n("bp1")).unwrap();
    assert_eq!(
        f.vote("bob", None, &["bp1"]),
        Err(GovernanceError::ProducerInactive(n("bp1")))
    );
    assert_eq!(
        f.vote("bob", None, &["ghost"]),
        Err(GovernanceError::ProducerNotRegistered(n("ghost")))
    );

    // Existing backers still re-tally on stake changes
    f.stake("alice", 10_0000);
    assert_eq!(f.votes("bp1"), 200_000.0);
}

#[test]
fn test_activation_threshold() {
    let mut f = Fixture::new();
    f.config.min_activated_stake = 150_0000;
    f.producer("bp1");
    f.stake("alice", 100_0000);
    f.stake("bob", 100_0000);

    f.vote("alice", None, &["bp1"]).unwrap();
    assert!(!f.gs.is_activated());
    assert_eq!(f.gs.v1.total_activated_stake, 100_0000);

    f.now = f.now.add_secs(60);
    f.vote("bob", None, &["bp1"]).unwrap();
    assert!(f.gs.is_activated());
    assert_eq!(f.gs.v1.thresh_activated_stake_time, f.now);
}

#[test]
fn test_election_from_votes() {
    let mut f = Fixture::new();
    for bp in ["bp1", "bp2", "bp3"] {
        f.producer(bp);
    }
    f.stake("alice", 300_0000);
    f.stake("bob", 100_0000);
    f.vote("alice", None, &["bp3"]).unwrap();
    f.vote("bob", None, &["bp1"]).unwrap();

    let mut host = MemoryHost::new();
    let size = f
        .vs
        .update_elected_producers(&mut f.gs, &mut host, BlockTimestamp::from_slot(1_000));
    assert_eq!(size, Some(2));
    let names: Vec<Name> = host.proposed_producers().iter().map(|p| p.producer_name).collect();
    assert_eq!(names, vec![n("bp1"), n("bp3")]);
}

#[test]
fn test_state_survives_serialization() {
    let mut f = Fixture::new();
    f.producer("bp1");
    f.producer("bp2");
    f.stake("alice", 50_0000);
    f.vote("alice", None, &["bp2"]).unwrap();

    let json = serde_json::to_string(&f.vs).unwrap();
    let restored: VotingState = serde_json::from_str(&json).unwrap();
    let top = restored.producers.iter_by_secondary().next().unwrap();
    assert_eq!(top.owner, n("bp2"));
    assert_eq!(restored.voters.get(&n("alice")).unwrap().staked, 50_0000);
}
