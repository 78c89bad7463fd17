//! External collaborators
//!
//! Ports onto the record store that owns users, products, and bill history.
//! The store holds no business logic; it acknowledges reads and writes, and
//! the last successful acknowledgment wins.

pub mod memory;
pub mod rest;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::aggregates::{Bill, Cart, NewProduct, Product, Review};

pub use memory::InMemoryStore;
pub use rest::RestStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("record store unreachable: {0}")]
    Unavailable(#[from] reqwest::Error),

    #[error("record store rejected the request with status {status}")]
    Rejected { status: u16 },
}

impl StoreError {
    /// Whether retrying the same request can succeed. Persistence failures are
    /// surfaced to the user as retryable; missing records are not.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, StoreError::NotFound { .. })
    }
}

/// Read access to the product catalog.
pub trait ProductCatalog {
    async fn products(&self) -> Result<Vec<Product>, StoreError>;
    async fn product(&self, id: &str) -> Result<Product, StoreError>;
    /// Category names available for browsing.
    async fn categories(&self) -> Result<Vec<String>, StoreError>;
}

/// Reviews on a product record. Writes re-derive the product's average rating
/// in the same store write; both methods return the new average.
pub trait ProductReviews {
    async fn reviews(&self, product_id: &str) -> Result<Vec<Review>, StoreError>;

    /// Prepends `review`, newest first.
    async fn add_review(&self, product_id: &str, review: &Review) -> Result<Decimal, StoreError>;

    /// Replaces the client's existing review, matched by `client_id`.
    async fn update_review(&self, product_id: &str, review: &Review)
        -> Result<Decimal, StoreError>;
}

/// Admin product management.
pub trait ProductAdmin {
    async fn create_product(&self, product: &NewProduct) -> Result<Product, StoreError>;
    async fn update_product(&self, id: &str, product: &Product) -> Result<Product, StoreError>;
    async fn delete_product(&self, id: &str) -> Result<(), StoreError>;
}

/// Persistence for one user's cart.
pub trait CartStore {
    async fn load_cart(&self, user_id: &str) -> Result<Cart, StoreError>;
    async fn save_cart(&self, user_id: &str, cart: &Cart) -> Result<(), StoreError>;
}

/// Persistence for one user's order history.
pub trait BillStore {
    async fn bill_history(&self, user_id: &str) -> Result<Vec<Bill>, StoreError>;

    /// Appends `bill` to the user's history, clearing the stored cart in the
    /// same write when `clear_cart` is set. Either both changes land or
    /// neither does; a failed write leaves the stored state untouched.
    async fn append_bill(&self, user_id: &str, bill: &Bill, clear_cart: bool)
        -> Result<(), StoreError>;
}
