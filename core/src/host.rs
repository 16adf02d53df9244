//! Host environment interfaces
//!
//! The contract consumes the token ledger, resource limits, deferred
//! scheduling, account registry and producer schedule only through these
//! traits. `MemoryHost` is the in-process implementation.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::asset::{Asset, Symbol};
use crate::error::HostError;
use crate::global::BlockchainParameters;
use crate::name::Name;
use crate::time::{BlockTimestamp, TimePoint};

pub type HostResult<T> = std::result::Result<T, HostError>;

/// Limits reported to the host's resource subsystem
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLimit {
    /// RAM quota in bytes, negative means unlimited
    pub ram_bytes: i64,
    pub net_weight: i64,
    pub cpu_weight: i64,
}

impl ResourceLimit {
    pub const fn new(ram_bytes: i64, net_weight: i64, cpu_weight: i64) -> Self {
        Self {
            ram_bytes,
            net_weight,
            cpu_weight,
        }
    }
}

/// Entry of a proposed producer schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerKey {
    pub producer_name: Name,
    pub block_signing_key: String,
}

/// Work the contract hands to the scheduler for later execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredAction {
    Refund { owner: Name },
    RefundBid { bidder: Name, newname: Name },
}

impl DeferredAction {
    /// Identity used for cancel-and-replace. At most one pending action
    /// exists per id.
    pub fn sender_id(&self) -> u128 {
        match self {
            DeferredAction::Refund { owner } => owner.raw() as u128,
            DeferredAction::RefundBid { bidder, newname } => {
                ((bidder.raw() as u128) << 64) | newname.raw() as u128
            }
        }
    }
}

/// 32-byte protocol feature digest, hex encoded in text form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureDigest(pub [u8; 32]);

impl FeatureDigest {
    /// Digest of a feature codename
    pub fn of(codename: &str) -> Self {
        let hash = Sha256::digest(codename.as_bytes());
        let mut out = [0u8; 32];
        out.copy_from_slice(&hash);
        FeatureDigest(out)
    }
}

impl fmt::Display for FeatureDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for FeatureDigest {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut out = [0u8; 32];
        hex::decode_to_slice(s, &mut out)?;
        Ok(FeatureDigest(out))
    }
}

impl Serialize for FeatureDigest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FeatureDigest {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Fungible token ledger
pub trait TokenLedger {
    /// Current supply of the token with the given code
    fn supply(&self, symbol: &Symbol) -> Option<Asset>;

    fn balance(&self, owner: Name, symbol: Symbol) -> Asset;

    fn transfer(&mut self, from: Name, to: Name, quantity: Asset, memo: &str) -> HostResult<()>;

    /// Create new tokens in `to`'s balance
    fn issue(&mut self, to: Name, quantity: Asset, memo: &str) -> HostResult<()>;
}

/// Per-account resource limits
pub trait ResourceLimits {
    fn resource_limits(&self, account: Name) -> ResourceLimit;

    fn set_resource_limits(&mut self, account: Name, limits: ResourceLimit) -> HostResult<()>;

    /// Bytes of RAM currently occupied by the account's data
    fn ram_usage(&self, account: Name) -> i64;
}

/// Deferred execution with cancel-and-replace per sender id
pub trait Scheduler {
    /// Schedule `action` at `due`, replacing any pending action with the
    /// same sender id.
    fn schedule(&mut self, action: DeferredAction, due: TimePoint);

    /// Cancel the pending action with this sender id; returns whether one existed
    fn cancel(&mut self, sender_id: u128) -> bool;

    /// Remove and return every action due at or before `now`, earliest first
    fn take_due(&mut self, now: TimePoint) -> Vec<DeferredAction>;
}

/// Account registry, privileges, producer schedule and chain parameters
pub trait Chain {
    fn is_account(&self, name: Name) -> bool;

    fn create_account(&mut self, name: Name) -> HostResult<()>;

    fn set_privileged(&mut self, account: Name, privileged: bool) -> HostResult<()>;

    /// Propose a new producer schedule. Returns the schedule version, or
    /// `None` when the host declines the proposal.
    fn set_proposed_producers(&mut self, producers: Vec<ProducerKey>) -> Option<u64>;

    fn set_blockchain_parameters(&mut self, params: &BlockchainParameters) -> HostResult<()>;

    fn preactivate_feature(&mut self, digest: FeatureDigest) -> HostResult<()>;
}

/// Current time as seen by the executing action
pub trait Clock {
    fn now(&self) -> TimePoint;

    fn block_time(&self) -> BlockTimestamp {
        BlockTimestamp::from(self.now())
    }
}

/// Everything the system contract needs from its host
pub trait Host: TokenLedger + ResourceLimits + Scheduler + Chain + Clock {}

impl<T: TokenLedger + ResourceLimits + Scheduler + Chain + Clock> Host for T {}
