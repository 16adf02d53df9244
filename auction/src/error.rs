//! Name auction error types

use thiserror::Error;

use sys_core::{Asset, AssetError, ErrorKind, HostError, Name, Symbol};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuctionError {
    #[error("The empty name is not a valid account name to bid on")]
    EmptyName,

    #[error("13 character names are not valid account names to bid on")]
    ThirteenthChar,

    #[error("Names of {0} or more characters can be created without bidding")]
    NoBidRequired(usize),

    #[error("You can only bid on top-level suffix: {0}")]
    NotTopLevel(Name),

    #[error("Account already exists: {0}")]
    AccountExists(Name),

    #[error("Asset must be system token: expected {expected}, got {got}")]
    WrongSymbol { expected: Symbol, got: Symbol },

    #[error("Insufficient bid: {0}")]
    NonPositiveBid(Asset),

    #[error("This auction has already closed: {0}")]
    AuctionClosed(Name),

    #[error("Must increase bid by {percent}%: minimum {minimum}")]
    BidTooLow { percent: i64, minimum: Asset },

    #[error("Account is already highest bidder: {0}")]
    AlreadyHighBidder(Name),

    #[error("Refund not found for {bidder} on {newname}")]
    RefundNotFound { bidder: Name, newname: Name },

    #[error("No active bid for name: {0}")]
    NoActiveBid(Name),

    #[error("Only highest bidder {winner} can claim {name}")]
    NotHighBidder { name: Name, winner: Name },

    #[error("Auction for name is not closed yet: {0}")]
    AuctionNotClosed(Name),

    #[error("Only suffix {0} may create this account")]
    SuffixOwnerOnly(Name),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Asset(#[from] AssetError),
}

impl AuctionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuctionError::EmptyName
            | AuctionError::ThirteenthChar
            | AuctionError::NoBidRequired(_)
            | AuctionError::NotTopLevel(_)
            | AuctionError::WrongSymbol { .. }
            | AuctionError::NonPositiveBid(_) => ErrorKind::Validation,
            AuctionError::RefundNotFound { .. } | AuctionError::NoActiveBid(_) => ErrorKind::NotFound,
            AuctionError::Host(e) => e.kind(),
            AuctionError::Asset(e) => e.kind(),
            _ => ErrorKind::Precondition,
        }
    }
}

pub type Result<T> = std::result::Result<T, AuctionError>;
