//! Treasury error types

use thiserror::Error;

use sys_core::{AssetError, ErrorKind, HostError, Name, Symbol, TimePoint};

/// Reward distribution errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreasuryError {
    #[error("Producer not found: {0}")]
    ProducerNotFound(Name),

    #[error("Producer does not have an active key: {0}")]
    ProducerInactive(Name),

    #[error("Already claimed rewards within past day, next claim after {next}")]
    ClaimTooSoon { owner: Name, next: TimePoint },

    #[error("No token supply for {0}")]
    SupplyUnavailable(Symbol),

    #[error("Reward arithmetic overflow")]
    Overflow,

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Asset(#[from] AssetError),
}

impl TreasuryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TreasuryError::ProducerNotFound(_) | TreasuryError::SupplyUnavailable(_) => {
                ErrorKind::NotFound
            }
            TreasuryError::ProducerInactive(_) | TreasuryError::ClaimTooSoon { .. } => {
                ErrorKind::Precondition
            }
            TreasuryError::Overflow => ErrorKind::Invariant,
            TreasuryError::Host(e) => e.kind(),
            TreasuryError::Asset(e) => e.kind(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TreasuryError>;
