//! Cart Aggregate
//!
//! Holds one user's line items plus the derived subtotal. `apply` is a pure
//! transform over the current snapshot: it returns a new `Cart` together with a
//! `CartEvent` notice, and the caller is responsible for persisting the result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::aggregates::Product;
use crate::domain::events::CartEvent;
use crate::domain::value_objects::Money;

/// One product in the cart. Created when a product is first added, destroyed on
/// remove or clear. Invariant: `1 <= quantity <= product.max_quantity`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Money { self.product.price.multiply(self.quantity) }
}

/// The mutable collection of cart lines belonging to one user, in insertion
/// order, plus its derived subtotal. `total_price` and `is_empty` are always
/// recomputed from `lines`, never adjusted incrementally.
///
/// Serializes to the record store's `cartInfo` shape:
/// `{ "cart": [...], "isEmpty": bool, "totalPrice": number }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(rename = "cart")]
    lines: Vec<CartLine>,
    is_empty: bool,
    total_price: Money,
}

impl Default for Cart {
    fn default() -> Self { Self::empty() }
}

/// A single cart mutation. Parsed from the wire form `{ operation, data }` via
/// [`CartOperation::from_request`].
#[derive(Clone, Debug, PartialEq)]
pub enum CartOperation {
    Add(Product),
    Remove(String),
    Increase(String),
    Decrease(String),
    Clear,
}

impl CartOperation {
    /// Parses the record-store request form: an operation name plus a payload
    /// that is a full product for `add`, a product id for `remove`/`increase`/
    /// `decrease`, and ignored for `clear`.
    pub fn from_request(operation: &str, data: serde_json::Value) -> Result<Self, CartError> {
        let payload = |data: serde_json::Value| -> Result<String, CartError> {
            serde_json::from_value(data).map_err(|e| CartError::InvalidPayload {
                operation: operation.to_string(),
                reason: e.to_string(),
            })
        };
        match operation {
            "add" => {
                let product = serde_json::from_value(data).map_err(|e| CartError::InvalidPayload {
                    operation: operation.to_string(),
                    reason: e.to_string(),
                })?;
                Ok(CartOperation::Add(product))
            }
            "remove" => Ok(CartOperation::Remove(payload(data)?)),
            "increase" => Ok(CartOperation::Increase(payload(data)?)),
            "decrease" => Ok(CartOperation::Decrease(payload(data)?)),
            "clear" => Ok(CartOperation::Clear),
            other => Err(CartError::UnknownOperation(other.to_string())),
        }
    }
}

/// Result of applying an operation: the (possibly unchanged) cart plus the
/// notice describing what happened.
#[derive(Clone, Debug, PartialEq)]
pub struct CartUpdate {
    pub cart: Cart,
    pub event: CartEvent,
}

impl Cart {
    pub fn empty() -> Self {
        Self { lines: vec![], is_empty: true, total_price: Money::zero() }
    }

    pub fn lines(&self) -> &[CartLine] { &self.lines }
    pub fn total_price(&self) -> Money { self.total_price }
    pub fn is_empty(&self) -> bool { self.is_empty }
    pub fn item_count(&self) -> usize { self.lines.len() }

    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product.id == product_id)
    }

    pub fn contains(&self, product_id: &str) -> bool { self.line(product_id).is_some() }

    /// Applies one operation to this snapshot and returns the new cart.
    ///
    /// Bound violations (`increase` at max, `decrease` at 1) and misses
    /// (`remove` of an absent id, duplicate `add`) return the cart unchanged
    /// with a non-applied notice.
    pub fn apply(&self, op: &CartOperation) -> CartUpdate {
        let mut next = self.clone();
        let event = match op {
            CartOperation::Add(product) => {
                if next.contains(&product.id) {
                    CartEvent::AlreadyInCart { product_id: product.id.clone() }
                } else if product.max_quantity == 0 {
                    CartEvent::OutOfStock { product_id: product.id.clone() }
                } else {
                    next.lines.push(CartLine { product: product.clone(), quantity: 1 });
                    CartEvent::ItemAdded { product_id: product.id.clone() }
                }
            }
            CartOperation::Remove(id) => {
                let before = next.lines.len();
                next.lines.retain(|l| l.product.id != *id);
                if next.lines.len() == before {
                    CartEvent::NotInCart { product_id: id.clone() }
                } else {
                    CartEvent::ItemRemoved { product_id: id.clone() }
                }
            }
            CartOperation::Increase(id) => match next.lines.iter_mut().find(|l| l.product.id == *id) {
                None => CartEvent::NotInCart { product_id: id.clone() },
                Some(line) if line.quantity >= line.product.max_quantity => {
                    CartEvent::MaxQuantityReached { product_id: id.clone(), max: line.product.max_quantity }
                }
                Some(line) => {
                    line.quantity += 1;
                    CartEvent::QuantityIncreased { product_id: id.clone(), quantity: line.quantity }
                }
            },
            CartOperation::Decrease(id) => match next.lines.iter_mut().find(|l| l.product.id == *id) {
                None => CartEvent::NotInCart { product_id: id.clone() },
                Some(line) if line.quantity <= 1 => {
                    CartEvent::MinQuantityReached { product_id: id.clone() }
                }
                Some(line) => {
                    line.quantity -= 1;
                    CartEvent::QuantityDecreased { product_id: id.clone(), quantity: line.quantity }
                }
            },
            CartOperation::Clear => {
                next.lines.clear();
                CartEvent::Cleared
            }
        };
        if event.applied() {
            next.recalculate();
            CartUpdate { cart: next, event }
        } else {
            CartUpdate { cart: self.clone(), event }
        }
    }

    /// Re-derives `total_price` and `is_empty` from the lines. Called after
    /// loading a cart from the record store, where another writer may have left
    /// the stored totals out of step with the stored lines.
    pub fn reconcile(&mut self) { self.recalculate(); }

    fn recalculate(&mut self) {
        self.total_price = self.lines.iter().fold(Money::zero(), |acc, l| acc.add(l.line_total()));
        self.is_empty = self.lines.is_empty();
    }
}

#[derive(Error, Debug)]
pub enum CartError {
    #[error("unrecognized cart operation `{0}`")]
    UnknownOperation(String),

    #[error("invalid payload for cart operation `{operation}`: {reason}")]
    InvalidPayload { operation: String, reason: String },
}
