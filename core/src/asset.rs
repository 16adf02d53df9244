//! Fixed-point quantities with a symbol identity
//!
//! Arithmetic between two assets requires identical symbol and precision
//! and reports overflow instead of wrapping.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{AssetError, Result};

/// Largest supported decimal precision
pub const MAX_PRECISION: u8 = 18;

/// Symbol packed as precision in the low byte followed by up to seven
/// uppercase code characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u64);

impl Symbol {
    /// Build a symbol from a literal code without validation
    pub const fn from_parts(code: &[u8], precision: u8) -> Symbol {
        let mut raw = precision as u64;
        let mut i = 0;
        while i < code.len() && i < 7 {
            raw |= (code[i] as u64) << (8 * (i + 1));
            i += 1;
        }
        Symbol(raw)
    }

    pub fn new(code: &str, precision: u8) -> Result<Self> {
        if code.is_empty() || code.len() > 7 || !code.bytes().all(|c| c.is_ascii_uppercase()) {
            return Err(AssetError::InvalidSymbol(code.to_string()));
        }
        if precision > MAX_PRECISION {
            return Err(AssetError::InvalidSymbol(format!(
                "{},{}: precision above {}",
                precision, code, MAX_PRECISION
            )));
        }
        Ok(Self::from_parts(code.as_bytes(), precision))
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }

    pub const fn precision(&self) -> u8 {
        (self.0 & 0xff) as u8
    }

    pub fn code(&self) -> String {
        let mut code = String::new();
        let mut v = self.0 >> 8;
        while v > 0 {
            code.push((v & 0xff) as u8 as char);
            v >>= 8;
        }
        code
    }

    /// True when both symbols share the same code, ignoring precision
    pub fn same_code(&self, other: &Symbol) -> bool {
        self.0 >> 8 == other.0 >> 8
    }

    /// `10^precision`
    pub fn unit(&self) -> i64 {
        10i64.pow(self.precision() as u32)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision(), self.code())
    }
}

impl FromStr for Symbol {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self> {
        let (precision, code) = s
            .split_once(',')
            .ok_or_else(|| AssetError::InvalidSymbol(s.to_string()))?;
        let precision: u8 = precision
            .trim()
            .parse()
            .map_err(|_| AssetError::InvalidSymbol(s.to_string()))?;
        Symbol::new(code.trim(), precision)
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Asset {
    pub amount: i64,
    pub symbol: Symbol,
}

impl Asset {
    pub const fn new(amount: i64, symbol: Symbol) -> Self {
        Self { amount, symbol }
    }

    pub const fn zero(symbol: Symbol) -> Self {
        Self { amount: 0, symbol }
    }

    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    pub fn is_negative(&self) -> bool {
        self.amount < 0
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    fn check_symbol(&self, other: &Asset) -> Result<()> {
        if self.symbol != other.symbol {
            return Err(AssetError::SymbolMismatch {
                left: self.symbol.to_string(),
                right: other.symbol.to_string(),
            });
        }
        Ok(())
    }

    pub fn checked_add(&self, other: &Asset) -> Result<Asset> {
        self.check_symbol(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(AssetError::Overflow)?;
        Ok(Asset::new(amount, self.symbol))
    }

    pub fn checked_sub(&self, other: &Asset) -> Result<Asset> {
        self.check_symbol(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or(AssetError::Overflow)?;
        Ok(Asset::new(amount, self.symbol))
    }

    pub fn checked_neg(&self) -> Result<Asset> {
        let amount = self.amount.checked_neg().ok_or(AssetError::Overflow)?;
        Ok(Asset::new(amount, self.symbol))
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = self.symbol.precision() as usize;
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        if precision == 0 {
            return write!(f, "{}{} {}", sign, abs, self.symbol.code());
        }
        let unit = self.symbol.unit() as u64;
        write!(
            f,
            "{}{}.{:0width$} {}",
            sign,
            abs / unit,
            abs % unit,
            self.symbol.code(),
            width = precision
        )
    }
}

impl FromStr for Asset {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AssetError::InvalidAsset(s.to_string());
        let (number, code) = s.trim().split_once(' ').ok_or_else(invalid)?;
        let (negative, digits) = match number.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, number),
        };
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
        if int_part.is_empty() || !int_part.bytes().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if !frac_part.bytes().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if digits.contains('.') && frac_part.is_empty() {
            return Err(invalid());
        }
        let precision = u8::try_from(frac_part.len()).map_err(|_| invalid())?;
        let symbol = Symbol::new(code.trim(), precision)?;

        let int: i64 = int_part.parse().map_err(|_| invalid())?;
        let frac: i64 = if frac_part.is_empty() {
            0
        } else {
            frac_part.parse().map_err(|_| invalid())?
        };
        let amount = int
            .checked_mul(symbol.unit())
            .and_then(|v| v.checked_add(frac))
            .ok_or(AssetError::Overflow)?;
        Ok(Asset::new(if negative { -amount } else { amount }, symbol))
    }
}

impl Serialize for Asset {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Asset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
