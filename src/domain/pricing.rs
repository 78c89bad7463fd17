//! Pricing engine
//!
//! Derives order totals from a cart snapshot plus the discount conditions in
//! effect for this checkout attempt. Discounts stack additively: every rate is
//! taken against the original subtotal and the amounts are summed, never
//! compounded.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::aggregates::Cart;
use crate::domain::value_objects::Money;

/// First-order discount rate (10%).
fn first_order_rate() -> Decimal { Decimal::new(10, 2) }

/// Recognized promotional codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscountCode {
    Ink20,
    Tech15,
}

impl DiscountCode {
    pub fn code(&self) -> &'static str {
        match self {
            DiscountCode::Ink20 => "INK20",
            DiscountCode::Tech15 => "TECH15",
        }
    }

    pub fn rate(&self) -> Decimal {
        match self {
            DiscountCode::Ink20 => Decimal::new(20, 2),
            DiscountCode::Tech15 => Decimal::new(15, 2),
        }
    }

    fn label(&self) -> String {
        match self {
            DiscountCode::Ink20 => "Discount code INK20 (20%)".to_string(),
            DiscountCode::Tech15 => "Discount code TECH15 (15%)".to_string(),
        }
    }
}

/// Unrecognized discount code. Surfaced to the user, never treated as a
/// pricing invariant violation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized discount code `{0}`")]
pub struct UnknownCode(pub String);

impl std::str::FromStr for DiscountCode {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "INK20" => Ok(DiscountCode::Ink20),
            "TECH15" => Ok(DiscountCode::Tech15),
            other => Err(UnknownCode(other.to_string())),
        }
    }
}

/// The discount conditions evaluated at checkout time. Derived per attempt
/// from the bill-history length and the user's code entry; never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiscountContext {
    pub is_first_order: bool,
    pub code: Option<DiscountCode>,
}

/// One discount rule that fired, with its share of the total reduction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppliedDiscount {
    pub label: String,
    pub rate: Decimal,
    pub amount: Money,
}

/// Totals derived from a cart and a discount context. Never stored apart from
/// the bill that snapshots it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub subtotal: Money,
    #[serde(rename = "amount")]
    pub discount_amount: Money,
    #[serde(default)]
    pub applied: Vec<AppliedDiscount>,
    #[serde(rename = "finalPrice")]
    pub final_total: Money,
}

impl PricingResult {
    /// Human-readable record of every rule that fired, oldest first.
    pub fn label(&self) -> String {
        self.applied.iter().map(|d| d.label.as_str()).collect::<Vec<_>>().join(" + ")
    }

    pub fn has_discount(&self) -> bool { !self.discount_amount.is_zero() }
}

/// Pricing invariant violation. Unreachable from a well-formed cart; indicates
/// corrupt data upstream and halts the operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    #[error("cart subtotal is negative ({subtotal}); cart data is corrupt")]
    NegativeSubtotal { subtotal: Money },
}

/// Computes the payable total for `cart` under `ctx`.
pub fn compute_totals(cart: &Cart, ctx: &DiscountContext) -> Result<PricingResult, PricingError> {
    let subtotal = cart.total_price();
    if subtotal.is_negative() {
        return Err(PricingError::NegativeSubtotal { subtotal });
    }

    let mut applied = Vec::new();
    if ctx.is_first_order {
        let rate = first_order_rate();
        applied.push(AppliedDiscount {
            label: "First order discount (10%)".to_string(),
            rate,
            amount: subtotal.percent_of(rate),
        });
    }
    if let Some(code) = ctx.code {
        applied.push(AppliedDiscount {
            label: code.label(),
            rate: code.rate(),
            amount: subtotal.percent_of(code.rate()),
        });
    }

    let discount_amount = applied.iter().fold(Money::zero(), |acc, d| acc.add(d.amount));
    Ok(PricingResult {
        subtotal,
        discount_amount,
        applied,
        final_total: subtotal.saturating_sub(discount_amount),
    })
}
