//! Producer Reward Treasury
//!
//! Mints continuous inflation and pays block producers:
//! - 4/5 of new tokens go to the savings account
//! - 1/4 of the producer share pays per produced block
//! - The rest pays per vote received

pub mod error;
pub mod inflation;
pub mod rewards;

pub use error::{Result, TreasuryError};
pub use inflation::{fill_buckets, InflationSplit};
pub use rewards::{RewardClaim, RewardConfig, RewardDistributor};
