//! RAM Market Economics
//!
//! Implements the storage resource market:
//! - Bonding-curve exchange between the core token and RAM bytes
//! - Trading fees and bancor quotes
//! - RAM supply growth

pub mod error;
pub mod exchange;
pub mod pricing;
pub mod supply;

pub use error::{MarketError, Result};
pub use exchange::{Connector, ExchangeState, CONNECTOR_WEIGHT, INITIAL_RAMCORE_SUPPLY};
pub use pricing::{RamPricing, RAM_AFTER_FEE_RATE};
pub use supply::{RamConfig, RamSupply, SupplyStats};
