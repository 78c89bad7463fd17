//! Bill Aggregate
//!
//! An immutable record of a completed order submission. Built once from a cart
//! snapshot at checkout time, appended to the user's order history, and never
//! mutated or deleted by the core. Terminal status transitions are an external
//! administrative action.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::domain::aggregates::Cart;
use crate::domain::pricing::PricingResult;
use crate::domain::value_objects::Money;

/// Order-dispatch channel. WhatsApp orders dispatch immediately; card orders
/// are the deferred channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "card")]
    Card,
    #[serde(rename = "WhatsApp")]
    Whatsapp,
}

/// Bill lifecycle: `Pending -> Fulfilled | Cancelled`. The core only ever
/// produces `Pending`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    #[default]
    Pending,
    Fulfilled,
    Cancelled,
}

/// A cart line copied by value at order time. The bill must not hold a live
/// reference to cart state, since the cart may be cleared right after.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BillLineItem {
    #[serde(rename = "id")]
    pub product_id: String,
    #[serde(default, rename = "img", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub title: String,
    #[serde(rename = "price")]
    pub unit_price: Money,
    pub quantity: u32,
}

impl BillLineItem {
    pub fn line_total(&self) -> Money { self.unit_price.multiply(self.quantity) }
}

/// Delivery and channel metadata supplied at order submission.
#[derive(Clone, Debug, Validate)]
pub struct OrderMeta {
    #[validate(length(min = 3, max = 100, message = "delivery location must be 3 to 100 characters"))]
    pub delivery_location: String,
    pub payment_method: PaymentMethod,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    id: String,
    #[serde(rename = "products")]
    line_items: Vec<BillLineItem>,
    total_price: Money,
    order_date: DateTime<Utc>,
    #[serde(rename = "location")]
    delivery_location: String,
    payment_method: PaymentMethod,
    status: BillStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    discount: Option<PricingResult>,
}

impl Bill {
    /// Snapshots `cart` and `pricing` into a new pending bill.
    ///
    /// Fails with [`OrderError::EmptyOrder`] on an empty cart and
    /// [`OrderError::InvalidDetails`] when the delivery location is missing or
    /// malformed. Creation has no side effects; persisting the bill (and only
    /// then clearing the cart) is the caller's responsibility.
    pub fn build(cart: &Cart, pricing: &PricingResult, meta: &OrderMeta) -> Result<Bill, OrderError> {
        if cart.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        meta.validate()?;

        let line_items = cart
            .lines()
            .iter()
            .map(|l| BillLineItem {
                product_id: l.product.id.clone(),
                image_url: l.product.image_url.clone(),
                title: l.product.name.clone(),
                unit_price: l.product.price,
                quantity: l.quantity,
            })
            .collect();

        Ok(Bill {
            id: generate_bill_id(),
            line_items,
            total_price: pricing.final_total,
            order_date: Utc::now(),
            delivery_location: meta.delivery_location.clone(),
            payment_method: meta.payment_method,
            status: BillStatus::Pending,
            discount: pricing.has_discount().then(|| pricing.clone()),
        })
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn line_items(&self) -> &[BillLineItem] { &self.line_items }
    pub fn total_price(&self) -> Money { self.total_price }
    pub fn order_date(&self) -> DateTime<Utc> { self.order_date }
    pub fn delivery_location(&self) -> &str { &self.delivery_location }
    pub fn payment_method(&self) -> PaymentMethod { self.payment_method }
    pub fn status(&self) -> BillStatus { self.status }
    pub fn discount(&self) -> Option<&PricingResult> { self.discount.as_ref() }
}

/// Time-based id with a random suffix. Collision-resistant enough for a
/// single-process client; not cryptographically secure.
fn generate_bill_id() -> String {
    format!("bill_{}_{:08x}", Utc::now().timestamp_millis(), rand::random::<u32>())
}

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("cannot place an order with an empty cart")]
    EmptyOrder,

    #[error("invalid order details: {0}")]
    InvalidDetails(#[from] validator::ValidationErrors),
}
