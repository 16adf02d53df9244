//! System Contract Core Library
//!
//! Shared primitives for the system contract workspace:
//! - Account names, symbols and fixed-point assets
//! - Time points and block timestamps
//! - Versioned global state
//! - Host environment traits and an in-memory host

pub mod asset;
pub mod constants;
pub mod error;
pub mod global;
pub mod host;
pub mod memory_host;
pub mod name;
pub mod time;

pub use asset::{Asset, Symbol};
pub use error::{AssetError, ErrorKind, HostError, NameError};
pub use global::{BlockchainParameters, GlobalState, GlobalV1, GlobalV2, GlobalV3, GlobalV4};
pub use host::{
    Chain, Clock, DeferredAction, FeatureDigest, Host, HostResult, ProducerKey, ResourceLimit,
    ResourceLimits, Scheduler, TokenLedger,
};
pub use memory_host::{MemoryHost, ScheduledAction};
pub use name::Name;
pub use time::{BlockTimestamp, TimePoint};
