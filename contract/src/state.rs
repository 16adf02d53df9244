//! Persistent state of the system contract

use serde::{Deserialize, Serialize};

use economics::ExchangeState;
use governance::VotingState;
use name_auction::AuctionState;
use sys_core::{GlobalState, Name, Symbol};
use sys_storage::{ScopedTable, Table};

use crate::error::{ContractError, Result};
use crate::records::{DelegatedBandwidth, RefundRequest, UserResources};

/// Every table the contract owns. Cloned wholesale by `SystemContract::apply`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemState {
    pub global: GlobalState,
    /// Set by `init`
    pub core_symbol: Option<Symbol>,
    /// RAM market, created by `init`
    pub market: Option<ExchangeState>,
    pub resources: Table<UserResources>,
    /// Scoped by the staking account
    pub delegations: ScopedTable<DelegatedBandwidth>,
    pub refunds: Table<RefundRequest>,
    #[serde(default)]
    pub voting: VotingState,
    #[serde(default)]
    pub auction: AuctionState,
}

impl SystemState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.core_symbol.is_some()
    }

    pub fn core_symbol(&self) -> Result<Symbol> {
        self.core_symbol.ok_or(ContractError::NotInitialized)
    }

    pub fn market(&self) -> Result<&ExchangeState> {
        self.market.as_ref().ok_or(ContractError::NotInitialized)
    }

    pub fn delegation(&self, from: Name, to: Name) -> Option<&DelegatedBandwidth> {
        self.delegations.get(&from, &to)
    }

    /// Sum of every live delegation's stake, in core units
    pub fn total_delegated(&self) -> i64 {
        self.delegations
            .iter()
            .map(|(_, d)| d.net_weight.amount + d.cpu_weight.amount + d.vote_weight.amount)
            .sum()
    }

    /// Sum of every pending refund, in core units
    pub fn total_refunding(&self) -> i64 {
        self.refunds.iter().map(RefundRequest::total).sum()
    }
}
