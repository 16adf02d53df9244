//! Core error types

use thiserror::Error;

use crate::asset::Asset;
use crate::name::Name;

/// Coarse classification shared by every error in the workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range input
    Validation,
    /// Business rule violated
    Precondition,
    /// Record absent; handled like a precondition failure
    NotFound,
    /// State that valid input can never produce
    Invariant,
}

impl ErrorKind {
    pub fn is_precondition(&self) -> bool {
        matches!(self, ErrorKind::Precondition | ErrorKind::NotFound)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("Name too long: {0}")]
    TooLong(String),

    #[error("Invalid character in name {name} at position {position}")]
    InvalidCharacter { name: String, position: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("Symbol mismatch: {left} vs {right}")]
    SymbolMismatch { left: String, right: String },

    #[error("Asset arithmetic overflow")]
    Overflow,

    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Invalid asset: {0}")]
    InvalidAsset(String),
}

impl AssetError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

/// Failures reported by the host environment
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    #[error("Unknown token: {0}")]
    UnknownToken(String),

    #[error("Overdrawn balance: {owner} needs {needed}, has {available}")]
    Overdrawn {
        owner: Name,
        needed: Asset,
        available: Asset,
    },

    #[error("Transfer must be a positive quantity: {0}")]
    NonPositiveTransfer(Asset),

    #[error("Cannot transfer to self: {0}")]
    TransferToSelf(Name),

    #[error("Account already exists: {0}")]
    AccountExists(Name),

    #[error("Account not found: {0}")]
    AccountNotFound(Name),

    #[error("RAM usage of {account} ({usage} bytes) exceeds limit {limit}")]
    RamUsageExceeded {
        account: Name,
        usage: i64,
        limit: i64,
    },

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),
}

impl HostError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HostError::UnknownToken(_) | HostError::AccountNotFound(_) => ErrorKind::NotFound,
            HostError::NonPositiveTransfer(_) | HostError::TransferToSelf(_) => {
                ErrorKind::Validation
            }
            HostError::Asset(e) => e.kind(),
            _ => ErrorKind::Precondition,
        }
    }
}

pub type Result<T> = std::result::Result<T, AssetError>;
