//! Aggregates module
pub mod bill;
pub mod cart;
pub mod product;
pub mod review;

pub use bill::{Bill, BillLineItem, BillStatus, OrderError, OrderMeta, PaymentMethod};
pub use cart::{Cart, CartError, CartLine, CartOperation, CartUpdate};
pub use product::{NewProduct, Product};
pub use review::{average_rating, Review};
