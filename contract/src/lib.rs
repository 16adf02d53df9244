//! System Contract
//!
//! The native system contract of the chain:
//! - Resource ledger: staking for network, CPU and vote weight, refunds
//! - RAM trading against the bonding-curve market
//! - Producer voting, rewards and name auctions wired to the host
//! - Atomic action dispatch and deferred action execution

pub mod action;
pub mod admin;
pub mod block;
pub mod config;
pub mod context;
pub mod contract;
pub mod delegation;
pub mod error;
pub mod names;
pub mod producers;
pub mod ram;
pub mod records;
pub mod state;

pub use action::Action;
pub use admin::{MAX_SCHEMA_REVISION, MIN_AUTHORITY_DEPTH};
pub use config::{ConfigError, StakingConfig, SystemConfig};
pub use context::Context;
pub use contract::SystemContract;
pub use error::{ContractError, Result};
pub use records::{DelegatedBandwidth, RefundRequest, UserResources};
pub use state::SystemState;
