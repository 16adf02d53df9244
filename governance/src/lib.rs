//! Producer Voting Engine
//!
//! Implements stake-weighted producer governance:
//! - Producer and voter records
//! - Time-boosted vote weight and proxy delegation
//! - Vote-pay share accounting for producer rewards
//! - Producer schedule election

pub mod error;
pub mod producer;
pub mod schedule;
pub mod votepay;
pub mod voter;
pub mod voting;

pub use error::{GovernanceError, Result};
pub use producer::{ProducerInfo, ProducerInfo2, VoteRank, MAX_URL_LENGTH};
pub use votepay::{update_producer_votepay_share, update_total_votepay_share};
pub use voter::VoterInfo;
pub use voting::{stake2vote, VotingConfig, VotingState};
