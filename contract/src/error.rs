//! Contract error types

use thiserror::Error;

use economics::MarketError;
use governance::GovernanceError;
use name_auction::AuctionError;
use sys_core::{Asset, AssetError, DeferredAction, ErrorKind, HostError, Name, Symbol, TimePoint};
use treasury::TreasuryError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractError {
    #[error("System contract must first be initialized")]
    NotInitialized,

    #[error("System contract has already been initialized")]
    AlreadyInitialized,

    #[error("Unsupported version for init action: {0}")]
    UnsupportedVersion(u32),

    #[error("System token {0} has not been created")]
    TokenNotFound(Symbol),

    #[error("Specified core symbol {expected} does not match token precision {actual}")]
    PrecisionMismatch { expected: Symbol, actual: Symbol },

    #[error("System token supply must be greater than 0")]
    EmptySupply,

    #[error("Must use core token {expected}, got {got}")]
    WrongSymbol { expected: Symbol, got: Symbol },

    #[error("Must stake a non-negative amount: {0}")]
    NegativeQuantity(Asset),

    #[error("Must stake a positive amount")]
    ZeroStake,

    #[error("Cannot use transfer flag if delegating to self")]
    TransferToSelf,

    #[error("Cannot undelegate bandwidth until the chain is activated")]
    NotActivated,

    #[error("Insufficient staked {0}")]
    InsufficientStake(&'static str),

    #[error("Refund request not found: {0}")]
    RefundNotFound(Name),

    #[error("Refund for {owner} is not available until {available}")]
    RefundNotAvailable { owner: Name, available: TimePoint },

    #[error("Must purchase a positive amount: {0}")]
    NonPositivePurchase(Asset),

    #[error("Must reserve a positive amount")]
    NothingReserved,

    #[error("Cannot sell a non-positive number of bytes: {0}")]
    NonPositiveBytes(i64),

    #[error("No resource row: {0}")]
    NoResourceRow(Name),

    #[error("Insufficient quota: {account} has {available} bytes, selling {requested}")]
    InsufficientQuota {
        account: Name,
        available: i64,
        requested: i64,
    },

    #[error("RAM in use by {account}: usage {usage} exceeds remaining quota {quota}")]
    RamInUse { account: Name, usage: i64, quota: i64 },

    #[error("Token amount received from selling RAM is too low: {0}")]
    SaleTooSmall(Asset),

    #[error("Attempt to unstake more RAM tokens than previously staked")]
    RamStakeUnderflow,

    #[error("Only supports unlimited accounts: {0}")]
    LimitedAccount(Name),

    #[error("max_authority_depth should be at least 3, got {0}")]
    AuthorityDepthTooLow(u16),

    #[error("Revision must be {expected}, got {requested}")]
    InvalidRevision { expected: u8, requested: u8 },

    #[error("Revision {0} is not supported")]
    RevisionTooHigh(u8),

    #[error("Deferred {action:?} failed: {source}")]
    DeferredFailed {
        action: DeferredAction,
        source: Box<ContractError>,
    },

    #[error("Market error: {0}")]
    Market(#[from] MarketError),

    #[error("Governance error: {0}")]
    Governance(#[from] GovernanceError),

    #[error("Treasury error: {0}")]
    Treasury(#[from] TreasuryError),

    #[error("Auction error: {0}")]
    Auction(#[from] AuctionError),

    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),
}

impl ContractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContractError::UnsupportedVersion(_)
            | ContractError::PrecisionMismatch { .. }
            | ContractError::WrongSymbol { .. }
            | ContractError::NegativeQuantity(_)
            | ContractError::ZeroStake
            | ContractError::TransferToSelf
            | ContractError::NonPositivePurchase(_)
            | ContractError::NonPositiveBytes(_)
            | ContractError::AuthorityDepthTooLow(_)
            | ContractError::InvalidRevision { .. }
            | ContractError::RevisionTooHigh(_) => ErrorKind::Validation,
            ContractError::TokenNotFound(_)
            | ContractError::RefundNotFound(_)
            | ContractError::NoResourceRow(_) => ErrorKind::NotFound,
            ContractError::RamStakeUnderflow | ContractError::DeferredFailed { .. } => {
                ErrorKind::Invariant
            }
            ContractError::Market(e) => e.kind(),
            ContractError::Governance(e) => e.kind(),
            ContractError::Treasury(e) => e.kind(),
            ContractError::Auction(e) => e.kind(),
            ContractError::Host(e) => e.kind(),
            ContractError::Asset(e) => e.kind(),
            _ => ErrorKind::Precondition,
        }
    }
}

pub type Result<T> = std::result::Result<T, ContractError>;
