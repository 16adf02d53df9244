//! Voter records

use serde::{Deserialize, Serialize};

use sys_core::Name;
use sys_storage::Row;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoterInfo {
    pub owner: Name,
    pub proxy: Option<Name>,
    /// Strictly ascending
    pub producers: Vec<Name>,
    pub staked: i64,
    pub last_vote_weight: f64,
    pub proxied_vote_weight: f64,
    pub is_proxy: bool,
}

impl VoterInfo {
    pub fn new(owner: Name) -> Self {
        Self {
            owner,
            ..Default::default()
        }
    }

    /// Whether the voter currently backs a proxy or any producer
    pub fn has_vote(&self) -> bool {
        self.proxy.is_some() || !self.producers.is_empty()
    }
}

impl Row for VoterInfo {
    fn primary_key(&self) -> Name {
        self.owner
    }
}
