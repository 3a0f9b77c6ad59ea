//! Exact fixed-point token amounts.
//!
//! All conversion between human-decimal and base-unit representations is
//! integer arithmetic over the token's fixed decimal count; floats are never
//! involved.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::common::error::AmountError;

/// Base-unit decimals of the token, matching its on-chain precision.
pub const TOKEN_DECIMALS: u32 = 6;

const SCALE: u128 = 10u128.pow(TOKEN_DECIMALS);

/// A non-negative token quantity held as exact base units.
///
/// `"100.25".parse::<TokenAmount>()` yields 100_250_000 base units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TokenAmount {
    base_units: u128,
}

impl TokenAmount {
    pub const ZERO: Self = Self { base_units: 0 };

    pub const fn from_base_units(base_units: u128) -> Self {
        Self { base_units }
    }

    pub const fn base_units(&self) -> u128 {
        self.base_units
    }

    pub const fn is_zero(&self) -> bool {
        self.base_units == 0
    }

    /// The 256-bit unsigned word this amount encodes to on the wire.
    pub fn to_word(&self) -> U256 {
        U256::from(self.base_units)
    }

    /// Converts a wire word back, rejecting values beyond the base-unit
    /// range.
    pub fn try_from_word(word: U256) -> Result<Self, AmountError> {
        let base_units: u128 = word.try_into().map_err(|_| AmountError::OutOfRange)?;
        Ok(Self::from_base_units(base_units))
    }

    pub fn checked_add(&self, other: Self) -> Option<Self> {
        self.base_units
            .checked_add(other.base_units)
            .map(Self::from_base_units)
    }

    pub fn saturating_add(&self, other: Self) -> Self {
        Self::from_base_units(self.base_units.saturating_add(other.base_units))
    }

    pub fn checked_sub(&self, other: Self) -> Option<Self> {
        self.base_units
            .checked_sub(other.base_units)
            .map(Self::from_base_units)
    }
}

impl FromStr for TokenAmount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Unparseable(s.to_string()));
        }
        let (int_part, frac_part) = match trimmed.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (trimmed, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(AmountError::Unparseable(s.to_string()));
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(AmountError::Unparseable(s.to_string()));
        }
        if frac_part.len() > TOKEN_DECIMALS as usize {
            return Err(AmountError::TooPrecise {
                max: TOKEN_DECIMALS,
            });
        }

        let int: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| AmountError::OutOfRange)?
        };
        let mut frac: u128 = if frac_part.is_empty() {
            0
        } else {
            frac_part.parse().map_err(|_| AmountError::OutOfRange)?
        };
        frac *= 10u128.pow(TOKEN_DECIMALS - frac_part.len() as u32);

        int.checked_mul(SCALE)
            .and_then(|scaled| scaled.checked_add(frac))
            .map(Self::from_base_units)
            .ok_or(AmountError::OutOfRange)
    }
}

impl fmt::Display for TokenAmount {
    /// Canonical decimal form: trailing fractional zeros trimmed, no point
    /// for whole amounts. Round-trips exactly through [`FromStr`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int = self.base_units / SCALE;
        let frac = self.base_units % SCALE;
        if frac == 0 {
            return write!(f, "{int}");
        }
        let mut digits = format!("{frac:0width$}", width = TOKEN_DECIMALS as usize);
        while digits.ends_with('0') {
            digits.pop();
        }
        write!(f, "{int}.{digits}")
    }
}

/// A signed balance adjustment applied optimistically to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceDelta {
    Credit(TokenAmount),
    Debit(TokenAmount),
}
