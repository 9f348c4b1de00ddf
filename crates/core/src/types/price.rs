//! Type-safe price representation using decimal arithmetic.
//!
//! All amounts are in Pakistani rupees. Two renderings exist: the compact
//! form used in customer messages (`Rs.3500`, `Rs.99.5`) and the grouped
//! form used on invoices (`Rs. 3,500`).

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize, Serializer};

/// An amount of money in the store currency.
///
/// Stored as a JSON number (`3500`, `99.5`). Quoted amounts are still
/// accepted when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Currency symbol prefix.
    pub const SYMBOL: &'static str = "Rs.";

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of rupees.
    #[must_use]
    pub fn from_rupees(rupees: i64) -> Self {
        Self(Decimal::from(rupees))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiply a unit price by a quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Subtract another amount.
    #[must_use]
    pub fn minus(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }

    /// Amount without trailing zeros (`100`, `99.5`).
    #[must_use]
    pub fn plain(&self) -> String {
        self.0.normalize().to_string()
    }

    /// Invoice rendering with thousands separators (`Rs. 1,234.5`).
    #[must_use]
    pub fn grouped(&self) -> String {
        let plain = self.plain();
        let (sign, digits) = plain
            .strip_prefix('-')
            .map_or(("", plain.as_str()), |rest| ("-", rest));
        let (whole, fraction) = digits
            .split_once('.')
            .map_or((digits, None), |(w, f)| (w, Some(f)));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        match fraction {
            Some(f) => format!("{} {sign}{grouped}.{f}", Self::SYMBOL),
            None => format!("{} {sign}{grouped}", Self::SYMBOL),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::SYMBOL, self.plain())
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let amount = self.0.normalize();
        if amount.scale() == 0
            && let Some(whole) = amount.to_i64()
        {
            return serializer.serialize_i64(whole);
        }
        match amount.to_f64() {
            Some(value) => serializer.serialize_f64(value),
            None => serializer.serialize_str(&amount.to_string()),
        }
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<i64> for Price {
    fn from(rupees: i64) -> Self {
        Self::from_rupees(rupees)
    }
}
