//! Governance error types

use thiserror::Error;

use sys_core::{ErrorKind, Name};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GovernanceError {
    #[error("URL too long: {len} bytes, limit {limit}")]
    UrlTooLong { len: usize, limit: usize },

    #[error("Producer key must not be the default value")]
    DefaultKey,

    #[error("Producer not found: {0}")]
    ProducerNotFound(Name),

    #[error("Producer {0} is not registered")]
    ProducerNotRegistered(Name),

    #[error("Producer {0} is not currently active")]
    ProducerInactive(Name),

    #[error("Cannot vote for producers and proxy at the same time")]
    ProxyAndProducers,

    #[error("Cannot proxy to self")]
    ProxyToSelf,

    #[error("Attempt to vote for too many producers: {got}, limit {max}")]
    TooManyProducers { max: usize, got: usize },

    #[error("Producer votes must be unique and sorted")]
    UnsortedProducers,

    #[error("User must stake before voting: {0}")]
    VoterNotFound(Name),

    #[error("Account registered as a proxy is not allowed to use a proxy: {0}")]
    ProxyUsingProxy(Name),

    #[error("Account that uses a proxy is not allowed to become a proxy: {0}")]
    ProxiedCannotBecomeProxy(Name),

    #[error("Invalid proxy specified: {0}")]
    InvalidProxy(Name),

    #[error("Proxy not registered: {0}")]
    ProxyNotRegistered(Name),

    #[error("Action has no effect")]
    NoEffect,

    #[error("Stake for voting cannot be negative: {0}")]
    NegativeStake(Name),

    #[error("Stake overflow for {0}")]
    StakeOverflow(Name),
}

impl GovernanceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GovernanceError::UrlTooLong { .. }
            | GovernanceError::DefaultKey
            | GovernanceError::ProxyAndProducers
            | GovernanceError::ProxyToSelf
            | GovernanceError::TooManyProducers { .. }
            | GovernanceError::UnsortedProducers => ErrorKind::Validation,
            GovernanceError::ProducerNotFound(_)
            | GovernanceError::ProducerNotRegistered(_)
            | GovernanceError::VoterNotFound(_)
            | GovernanceError::InvalidProxy(_) => ErrorKind::NotFound,
            GovernanceError::StakeOverflow(_) => ErrorKind::Invariant,
            _ => ErrorKind::Precondition,
        }
    }
}

pub type Result<T> = std::result::Result<T, GovernanceError>;
