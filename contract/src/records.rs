//! Resource ledger records

use serde::{Deserialize, Serialize};

use sys_core::{Asset, Name, Symbol, TimePoint};
use sys_storage::Row;

/// Stake and RAM held on behalf of an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResources {
    pub owner: Name,
    pub net_weight: Asset,
    pub cpu_weight: Asset,
    pub vote_weight: Asset,
    pub ram_bytes: i64,
}

impl UserResources {
    pub fn new(owner: Name, core: Symbol) -> Self {
        Self {
            owner,
            net_weight: Asset::zero(core),
            cpu_weight: Asset::zero(core),
            vote_weight: Asset::zero(core),
            ram_bytes: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.net_weight.is_zero()
            && self.cpu_weight.is_zero()
            && self.vote_weight.is_zero()
            && self.ram_bytes == 0
    }
}

impl Row for UserResources {
    fn primary_key(&self) -> Name {
        self.owner
    }
}

/// Stake one account placed for another. Scoped by `from`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelegatedBandwidth {
    pub from: Name,
    pub to: Name,
    pub net_weight: Asset,
    pub cpu_weight: Asset,
    pub vote_weight: Asset,
}

impl DelegatedBandwidth {
    pub fn new(from: Name, to: Name, core: Symbol) -> Self {
        Self {
            from,
            to,
            net_weight: Asset::zero(core),
            cpu_weight: Asset::zero(core),
            vote_weight: Asset::zero(core),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.net_weight.is_zero() && self.cpu_weight.is_zero() && self.vote_weight.is_zero()
    }
}

impl Row for DelegatedBandwidth {
    fn primary_key(&self) -> Name {
        self.to
    }
}

/// Unstaked tokens waiting out the refund delay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundRequest {
    pub owner: Name,
    pub request_time: TimePoint,
    pub net_amount: Asset,
    pub cpu_amount: Asset,
    pub vote_amount: Asset,
}

impl RefundRequest {
    pub fn new(owner: Name, request_time: TimePoint, core: Symbol) -> Self {
        Self {
            owner,
            request_time,
            net_amount: Asset::zero(core),
            cpu_amount: Asset::zero(core),
            vote_amount: Asset::zero(core),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.net_amount.is_zero() && self.cpu_amount.is_zero() && self.vote_amount.is_zero()
    }

    pub fn total(&self) -> i64 {
        self.net_amount.amount + self.cpu_amount.amount + self.vote_amount.amount
    }
}

impl Row for RefundRequest {
    fn primary_key(&self) -> Name {
        self.owner
    }
}
