//! RAM trade pricing: fees and single-step bancor quotes

use crate::error::{MarketError, Result};

/// Share of a purchase left after the 0.5% fee
pub const RAM_AFTER_FEE_RATE: f64 = 0.995;

pub struct RamPricing;

impl RamPricing {
    /// 0.5% fee, rounded up. Positive for any positive amount, and
    /// defined up to `i64::MAX`.
    pub fn fee(amount: i64) -> i64 {
        amount / 200 + i64::from(amount % 200 > 0)
    }

    /// Input needed to take `out` from `out_reserve` given `in_reserve`
    pub fn bancor_input(out_reserve: i64, in_reserve: i64, out: i64) -> Result<i64> {
        if out >= out_reserve {
            return Err(MarketError::InsufficientReserve {
                requested: out,
                available: out_reserve,
            });
        }
        let ob = out_reserve as f64;
        let ib = in_reserve as f64;
        let input = ((ib * out as f64) / (ob - out as f64)) as i64;
        Ok(input.max(0))
    }

    /// Gross amount whose post-fee remainder covers `cost`
    pub fn with_fee(cost: i64) -> i64 {
        (cost as f64 / RAM_AFTER_FEE_RATE) as i64
    }
}
