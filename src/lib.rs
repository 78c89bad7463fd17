//! Storefront core
//!
//! Client-side engine for an e-commerce storefront backed by a mock REST
//! record store.
//!
//! ## Features
//! - Cart state transitions with quantity and price invariants
//! - Pricing with additive discount stacking (first order, promo codes)
//! - Immutable bill assembly at order submission
//! - WhatsApp order-summary formatting
//! - Product reviews with a derived average rating
//! - REST and in-memory record store backends

use thiserror::Error;

pub mod checkout;
pub mod config;
pub mod domain;
pub mod session;
pub mod store;

pub use checkout::{CardDetails, CheckoutService, DispatchRequest};
pub use config::Config;
pub use domain::aggregates::{
    average_rating, Bill, BillLineItem, BillStatus, Cart, CartError, CartLine, CartOperation,
    CartUpdate, NewProduct, OrderError, OrderMeta, PaymentMethod, Product, Review,
};
pub use domain::events::CartEvent;
pub use domain::pricing::{
    compute_totals, AppliedDiscount, DiscountCode, DiscountContext, PricingError, PricingResult,
    UnknownCode,
};
pub use domain::value_objects::Money;
pub use session::Session;
pub use store::{
    BillStore, CartStore, InMemoryStore, ProductAdmin, ProductCatalog, ProductReviews, RestStore,
    StoreError,
};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("cart operation failed: {0}")]
    Cart(#[from] CartError),

    #[error("pricing failed: {0}")]
    Pricing(#[from] PricingError),

    #[error("order rejected: {0}")]
    Order(#[from] OrderError),

    #[error("persistence failure: {0}")]
    Store(#[from] StoreError),
}

impl StorefrontError {
    /// Whether the caller may retry the same call unchanged. Only persistence
    /// failures qualify; validation errors need different input and pricing
    /// errors indicate corrupt data.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StorefrontError::Store(err) if err.is_retryable())
    }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
