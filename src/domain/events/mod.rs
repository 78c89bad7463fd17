//! Cart events
//!
//! Every cart operation produces a `CartEvent` describing what happened, whether
//! or not the cart actually changed. Bound violations are reported through these
//! notices rather than thrown; the caller decides what to show the user.

/// Outcome notice for a single cart operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartEvent {
    ItemAdded { product_id: String },
    ItemRemoved { product_id: String },
    QuantityIncreased { product_id: String, quantity: u32 },
    QuantityDecreased { product_id: String, quantity: u32 },
    Cleared,
    /// `add` on a product already in the cart. No-op.
    AlreadyInCart { product_id: String },
    /// `remove`/`increase`/`decrease` on a product not in the cart. No-op.
    NotInCart { product_id: String },
    /// `add` on a product with no available quantity. No-op.
    OutOfStock { product_id: String },
    /// `increase` at the per-product maximum. No-op.
    MaxQuantityReached { product_id: String, max: u32 },
    /// `decrease` at quantity 1. No-op.
    MinQuantityReached { product_id: String },
}

impl CartEvent {
    /// Whether the operation mutated the cart. Only applied outcomes are persisted.
    pub fn applied(&self) -> bool {
        matches!(
            self,
            CartEvent::ItemAdded { .. }
                | CartEvent::ItemRemoved { .. }
                | CartEvent::QuantityIncreased { .. }
                | CartEvent::QuantityDecreased { .. }
                | CartEvent::Cleared
        )
    }

    /// User-facing notification text.
    pub fn user_message(&self) -> &'static str {
        match self {
            CartEvent::ItemAdded { .. } => "Added To Cart",
            CartEvent::ItemRemoved { .. } => "Removed From Cart",
            CartEvent::QuantityIncreased { .. } | CartEvent::QuantityDecreased { .. } => {
                "Quantity updated"
            }
            CartEvent::Cleared => "Now your cart is empty",
            CartEvent::AlreadyInCart { .. } => "This product is already in your cart",
            CartEvent::NotInCart { .. } => "This product is not in your cart",
            CartEvent::OutOfStock { .. } => "This product is out of stock",
            CartEvent::MaxQuantityReached { .. } => "No more quantity available",
            CartEvent::MinQuantityReached { .. } => "The quantity cannot be less than 1",
        }
    }
}
