//! RAM market exchange state
//!
//! Two connectors (RAM bytes and the core token) are bridged by a
//! synthetic RAMCORE supply. A conversion first buys RAMCORE with the
//! paying connector, then sells that RAMCORE into the other connector.
//! Each half follows the weighted bonding curve
//!
//! ```text
//! to exchange:   dS = S0 * ((1 + dR / R0)^F - 1)
//! from exchange: dR = R0 * ((1 - dS / S0)^(1 / F) - 1)
//! ```
//!
//! with `F = 0.5`. The supply therefore returns to its prior value after
//! every full conversion. Results are truncated toward zero.

use serde::{Deserialize, Serialize};

use sys_core::constants::{RAMCORE_SYMBOL, RAM_SYMBOL};
use sys_core::{Asset, Symbol};

use crate::error::{MarketError, Result};

/// Initial RAMCORE supply of a fresh market
pub const INITIAL_RAMCORE_SUPPLY: i64 = 100_000_000_000_000;

/// Core reserve of a fresh market is `core_supply / QUOTE_RESERVE_DIVISOR`
pub const QUOTE_RESERVE_DIVISOR: i64 = 1000;

/// Connector weight of both reserves
pub const CONNECTOR_WEIGHT: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub balance: Asset,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeState {
    pub supply: Asset,
    /// RAM reserve (bytes)
    pub base: Connector,
    /// Core token reserve
    pub quote: Connector,
}

fn convert_to_exchange(supply: &mut Asset, reserve: &mut Connector, payment: &Asset) -> Result<Asset> {
    let s0 = supply.amount as f64;
    let r0 = reserve.balance.amount as f64;
    if r0 <= 0.0 || s0 <= 0.0 {
        return Err(MarketError::EmptyReserve(reserve.balance.symbol.to_string()));
    }
    let dr = payment.amount as f64;

    let mut ds = s0 * ((1.0 + dr / r0).powf(reserve.weight) - 1.0);
    if ds < 0.0 {
        ds = 0.0;
    }
    let issued = Asset::new(ds as i64, supply.symbol);

    reserve.balance = reserve.balance.checked_add(payment)?;
    *supply = supply.checked_add(&issued)?;
    Ok(issued)
}

fn convert_from_exchange(supply: &mut Asset, reserve: &mut Connector, tokens: &Asset) -> Result<Asset> {
    let r0 = reserve.balance.amount as f64;
    let s0 = supply.amount as f64;
    if s0 <= 0.0 {
        return Err(MarketError::EmptyReserve(supply.symbol.to_string()));
    }
    let ds = -(tokens.amount as f64);
    let fi = 1.0 / reserve.weight;

    let mut dr = r0 * ((1.0 + ds / s0).powf(fi) - 1.0);
    if dr > 0.0 {
        dr = 0.0;
    }
    let paid = Asset::new((-dr) as i64, reserve.balance.symbol);
    if paid.amount > reserve.balance.amount {
        return Err(MarketError::InsufficientReserve {
            requested: paid.amount,
            available: reserve.balance.amount,
        });
    }

    reserve.balance = reserve.balance.checked_sub(&paid)?;
    *supply = supply.checked_sub(tokens)?;
    Ok(paid)
}

impl ExchangeState {
    /// Fresh RAM market: all free RAM against a thousandth of the core supply
    pub fn new_ram_market(free_ram: u64, core_supply: &Asset) -> Self {
        Self {
            supply: Asset::new(INITIAL_RAMCORE_SUPPLY, RAMCORE_SYMBOL),
            base: Connector {
                balance: Asset::new(free_ram.min(i64::MAX as u64) as i64, RAM_SYMBOL),
                weight: CONNECTOR_WEIGHT,
            },
            quote: Connector {
                balance: Asset::new(core_supply.amount / QUOTE_RESERVE_DIVISOR, core_supply.symbol),
                weight: CONNECTOR_WEIGHT,
            },
        }
    }

    pub fn ram_reserve(&self) -> i64 {
        self.base.balance.amount
    }

    pub fn core_reserve(&self) -> i64 {
        self.quote.balance.amount
    }

    pub fn core_symbol(&self) -> Symbol {
        self.quote.balance.symbol
    }

    /// Grow (or shrink) the RAM reserve when the supply changes
    pub fn adjust_ram_reserve(&mut self, delta: i64) -> Result<()> {
        self.base.balance = self
            .base
            .balance
            .checked_add(&Asset::new(delta, RAM_SYMBOL))?;
        Ok(())
    }

    /// Convert `from` into the other connector's token
    pub fn convert(&mut self, from: &Asset, to: Symbol) -> Result<Asset> {
        let sell = from.symbol;
        if sell == to {
            return Err(MarketError::SameSymbol(to.to_string()));
        }

        if sell == self.base.balance.symbol && to == self.quote.balance.symbol {
            let tmp = convert_to_exchange(&mut self.supply, &mut self.base, from)?;
            convert_from_exchange(&mut self.supply, &mut self.quote, &tmp)
        } else if sell == self.quote.balance.symbol && to == self.base.balance.symbol {
            let tmp = convert_to_exchange(&mut self.supply, &mut self.quote, from)?;
            convert_from_exchange(&mut self.supply, &mut self.base, &tmp)
        } else {
            Err(MarketError::InvalidConversion {
                from: sell.to_string(),
                to: to.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cur() -> Symbol {
        Symbol::new("CUR", 4).unwrap()
    }

    fn market() -> ExchangeState {
        // 64 GiB of RAM against a 1,000,000,000.0000 CUR supply
        ExchangeState::new_ram_market(68_719_476_736, &Asset::new(10_000_000_000_000, cur()))
    }

    #[test]
    fn test_initial_market() {
        let m = market();
        assert_eq!(m.supply.amount, INITIAL_RAMCORE_SUPPLY);
        assert_eq!(m.ram_reserve(), 68_719_476_736);
        assert_eq!(m.core_reserve(), 10_000_000_000);
        assert_eq!(m.core_symbol(), cur());
    }

    #[test]
    fn test_buy_exact_bytes() {
        let mut m = market();
        let bytes = m.convert(&Asset::new(995_000, cur()), RAM_SYMBOL).unwrap();
        assert_eq!(bytes, Asset::new(6_836_907, RAM_SYMBOL));
        assert_eq!(m.ram_reserve(), 68_712_639_829);
        assert_eq!(m.core_reserve(), 10_000_995_000);
        assert_eq!(m.supply.amount, INITIAL_RAMCORE_SUPPLY);
    }

    #[test]
    fn test_sell_back_returns_less() {
        let mut m = market();
        let bytes = m.convert(&Asset::new(995_000, cur()), RAM_SYMBOL).unwrap();
        let tokens = m.convert(&bytes, cur()).unwrap();
        assert_eq!(tokens, Asset::new(994_999, cur()));
        assert_eq!(m.ram_reserve(), 68_719_476_736);
        assert_eq!(m.supply.amount, INITIAL_RAMCORE_SUPPLY);
    }

    #[test]
    fn test_invalid_conversions() {
        let mut m = market();
        assert!(matches!(
            m.convert(&Asset::new(10, cur()), cur()),
            Err(MarketError::SameSymbol(_))
        ));
        let other = Symbol::new("ABC", 4).unwrap();
        assert!(matches!(
            m.convert(&Asset::new(10, other), RAM_SYMBOL),
            Err(MarketError::InvalidConversion { .. })
        ));
    }

    #[test]
    fn test_empty_reserve_rejected() {
        let mut m = ExchangeState::new_ram_market(0, &Asset::new(10_000_000, cur()));
        assert!(matches!(
            m.convert(&Asset::new(100, RAM_SYMBOL), cur()),
            Err(MarketError::EmptyReserve(_))
        ));
    }
}
