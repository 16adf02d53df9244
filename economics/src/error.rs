//! RAM market error types

use thiserror::Error;

use sys_core::{AssetError, ErrorKind};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    #[error("Cannot convert to the same symbol: {0}")]
    SameSymbol(String),

    #[error("Invalid conversion from {from} to {to}")]
    InvalidConversion { from: String, to: String },

    #[error("Reserve is empty: {0}")]
    EmptyReserve(String),

    #[error("Insufficient reserve: requested {requested}, available {available}")]
    InsufficientReserve { requested: i64, available: i64 },

    #[error("RAM may only be increased: current {current}, requested {requested}")]
    RamNotIncreased { current: u64, requested: u64 },

    #[error("RAM size is unrealistic: {0}")]
    RamSizeUnrealistic(u64),

    #[error("Attempt to set max RAM {requested} below reserved {reserved}")]
    RamBelowReserved { requested: u64, reserved: u64 },

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),
}

impl MarketError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MarketError::SameSymbol(_)
            | MarketError::InvalidConversion { .. }
            | MarketError::RamSizeUnrealistic(_) => ErrorKind::Validation,
            MarketError::Asset(e) => e.kind(),
            _ => ErrorKind::Precondition,
        }
    }
}

pub type Result<T> = std::result::Result<T, MarketError>;
