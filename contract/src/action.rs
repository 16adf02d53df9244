//! Action surface of the system contract
//!
//! Actions are tagged by name so scripts can be written as JSON:
//!
//! ```json
//! {"action": "buy_ram", "payer": "alice", "receiver": "alice", "quant": "10.0000 CUR"}
//! ```

use serde::{Deserialize, Serialize};

use sys_core::{Asset, BlockTimestamp, BlockchainParameters, DeferredAction, FeatureDigest, Host, Name, Symbol};

use crate::context::Context;
use crate::error::{ContractError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Init {
        #[serde(default)]
        version: u32,
        core: Symbol,
    },
    Delegate {
        from: Name,
        receiver: Name,
        net: Asset,
        cpu: Asset,
        vote: Asset,
        #[serde(default)]
        transfer: bool,
    },
    Undelegate {
        from: Name,
        receiver: Name,
        net: Asset,
        cpu: Asset,
        vote: Asset,
    },
    Refund {
        owner: Name,
    },
    BuyRam {
        payer: Name,
        receiver: Name,
        quant: Asset,
    },
    BuyRamBytes {
        payer: Name,
        receiver: Name,
        bytes: u32,
    },
    SellRam {
        account: Name,
        bytes: i64,
    },
    RegisterProducer {
        producer: Name,
        producer_key: String,
        #[serde(default)]
        url: String,
        #[serde(default)]
        location: u16,
    },
    UnregisterProducer {
        producer: Name,
    },
    Vote {
        voter: Name,
        #[serde(default)]
        proxy: Option<Name>,
        #[serde(default)]
        producers: Vec<Name>,
    },
    RegisterProxy {
        proxy: Name,
        is_proxy: bool,
    },
    ClaimRewards {
        owner: Name,
    },
    BidName {
        bidder: Name,
        newname: Name,
        bid: Asset,
    },
    RefundBid {
        bidder: Name,
        newname: Name,
    },
    NewAccount {
        creator: Name,
        name: Name,
    },
    SetRamSupply {
        max_ram_size: u64,
    },
    SetRamGrowthRate {
        bytes_per_block: u16,
    },
    OnBlock {
        producer: Name,
        /// Defaults to the host clock's slot
        #[serde(default)]
        timestamp: Option<BlockTimestamp>,
    },
    SetResourceLimits {
        account: Name,
        ram_bytes: i64,
        net_weight: i64,
        cpu_weight: i64,
    },
    SetParameters {
        params: BlockchainParameters,
    },
    SetPrivileged {
        account: Name,
        is_privileged: bool,
    },
    RemoveProducer {
        producer: Name,
    },
    BumpSchemaRevision {
        revision: u8,
    },
    ActivateFeature {
        digest: FeatureDigest,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Init { .. } => "init",
            Action::Delegate { .. } => "delegate",
            Action::Undelegate { .. } => "undelegate",
            Action::Refund { .. } => "refund",
            Action::BuyRam { .. } => "buy_ram",
            Action::BuyRamBytes { .. } => "buy_ram_bytes",
            Action::SellRam { .. } => "sell_ram",
            Action::RegisterProducer { .. } => "register_producer",
            Action::UnregisterProducer { .. } => "unregister_producer",
            Action::Vote { .. } => "vote",
            Action::RegisterProxy { .. } => "register_proxy",
            Action::ClaimRewards { .. } => "claim_rewards",
            Action::BidName { .. } => "bid_name",
            Action::RefundBid { .. } => "refund_bid",
            Action::NewAccount { .. } => "new_account",
            Action::SetRamSupply { .. } => "set_ram_supply",
            Action::SetRamGrowthRate { .. } => "set_ram_growth_rate",
            Action::OnBlock { .. } => "on_block",
            Action::SetResourceLimits { .. } => "set_resource_limits",
            Action::SetParameters { .. } => "set_parameters",
            Action::SetPrivileged { .. } => "set_privileged",
            Action::RemoveProducer { .. } => "remove_producer",
            Action::BumpSchemaRevision { .. } => "bump_schema_revision",
            Action::ActivateFeature { .. } => "activate_feature",
        }
    }
}

impl From<DeferredAction> for Action {
    fn from(deferred: DeferredAction) -> Self {
        match deferred {
            DeferredAction::Refund { owner } => Action::Refund { owner },
            DeferredAction::RefundBid { bidder, newname } => Action::RefundBid { bidder, newname },
        }
    }
}

impl<'a, H: Host> Context<'a, H> {
    /// Run one action against the context
    pub fn dispatch(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Init { version, core } => self.init(*version, *core),
            Action::Delegate {
                from,
                receiver,
                net,
                cpu,
                vote,
                transfer,
            } => self.delegate(*from, *receiver, *net, *cpu, *vote, *transfer),
            Action::Undelegate {
                from,
                receiver,
                net,
                cpu,
                vote,
            } => self.undelegate(*from, *receiver, *net, *cpu, *vote),
            Action::Refund { owner } => self.refund(*owner).map(drop),
            Action::BuyRam {
                payer,
                receiver,
                quant,
            } => self.buy_ram(*payer, *receiver, *quant).map(drop),
            Action::BuyRamBytes {
                payer,
                receiver,
                bytes,
            } => self.buy_ram_bytes(*payer, *receiver, *bytes).map(drop),
            Action::SellRam { account, bytes } => self.sell_ram(*account, *bytes).map(drop),
            Action::RegisterProducer {
                producer,
                producer_key,
                url,
                location,
            } => self.register_producer(*producer, producer_key, url, *location),
            Action::UnregisterProducer { producer } => self.unregister_producer(*producer),
            Action::Vote {
                voter,
                proxy,
                producers,
            } => self.vote(*voter, *proxy, producers),
            Action::RegisterProxy { proxy, is_proxy } => self.register_proxy(*proxy, *is_proxy),
            Action::ClaimRewards { owner } => self.claim_rewards(*owner).map(drop),
            Action::BidName {
                bidder,
                newname,
                bid,
            } => self.bid_name(*bidder, *newname, *bid),
            Action::RefundBid { bidder, newname } => self.refund_bid(*bidder, *newname).map(drop),
            Action::NewAccount { creator, name } => self.new_account(*creator, *name),
            Action::SetRamSupply { max_ram_size } => self.set_ram_supply(*max_ram_size),
            Action::SetRamGrowthRate { bytes_per_block } => {
                self.set_ram_growth_rate(*bytes_per_block)
            }
            Action::OnBlock {
                producer,
                timestamp,
            } => {
                let timestamp = timestamp.unwrap_or_else(|| self.block_time());
                self.on_block(timestamp, *producer)
            }
            Action::SetResourceLimits {
                account,
                ram_bytes,
                net_weight,
                cpu_weight,
            } => self.set_resource_limits(*account, *ram_bytes, *net_weight, *cpu_weight),
            Action::SetParameters { params } => self.set_parameters(params.clone()),
            Action::SetPrivileged {
                account,
                is_privileged,
            } => self.set_privileged(*account, *is_privileged),
            Action::RemoveProducer { producer } => self.remove_producer(*producer),
            Action::BumpSchemaRevision { revision } => self.bump_schema_revision(*revision),
            Action::ActivateFeature { digest } => self.activate_feature(*digest),
        }
    }

    /// Execute a deferred action handed back by the scheduler
    pub fn run_deferred_action(&mut self, deferred: &DeferredAction) -> Result<()> {
        self.dispatch(&Action::from(deferred.clone()))
            .map_err(|e| ContractError::DeferredFailed {
                action: deferred.clone(),
                source: Box::new(e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script_actions() {
        let json = r#"[
            {"action": "init", "core": "4,CUR"},
            {"action": "delegate", "from": "alice", "receiver": "bob",
             "net": "1.0000 CUR", "cpu": "1.0000 CUR", "vote": "0.0000 CUR"},
            {"action": "vote", "voter": "alice", "producers": ["bp1"]},
            {"action": "on_block", "producer": "bp1"}
        ]"#;
        let actions: Vec<Action> = serde_json::from_str(json).unwrap();
        assert_eq!(actions.len(), 4);
        assert_eq!(actions[0].name(), "init");
        assert!(matches!(
            actions[1],
            Action::Delegate { transfer: false, .. }
        ));
        match &actions[2] {
            Action::Vote { proxy, producers, .. } => {
                assert!(proxy.is_none());
                assert_eq!(producers, &vec![Name::constant("bp1")]);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(actions[3], Action::OnBlock { timestamp: None, .. }));
    }

    #[test]
    fn test_deferred_maps_to_action() {
        let owner = Name::constant("alice");
        assert_eq!(
            Action::from(DeferredAction::Refund { owner }),
            Action::Refund { owner }
        );
    }
}
