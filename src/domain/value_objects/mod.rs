//! Value objects

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Money value object. All amounts are EGP, so only the magnitude is carried.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub fn new(amount: Decimal) -> Self { Self(amount) }
    pub fn zero() -> Self { Self(Decimal::ZERO) }
    pub fn amount(&self) -> Decimal { self.0 }
    pub fn is_zero(&self) -> bool { self.0.is_zero() }
    pub fn is_negative(&self) -> bool { self.0.is_sign_negative() && !self.0.is_zero() }

    pub fn add(&self, other: Money) -> Money { Money(self.0 + other.0) }

    /// Subtraction floored at zero. Totals never go negative.
    pub fn saturating_sub(&self, other: Money) -> Money {
        if other.0 >= self.0 { Money::zero() } else { Money(self.0 - other.0) }
    }

    pub fn multiply(&self, qty: u32) -> Money { Money(self.0 * Decimal::from(qty)) }

    /// The given fraction of this amount, e.g. `rate = 0.10` for 10%.
    pub fn percent_of(&self, rate: Decimal) -> Money { Money(self.0 * rate) }
}

impl From<i64> for Money {
    fn from(amount: i64) -> Self { Self(Decimal::from(amount)) }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:.2}", self.0) }
}
