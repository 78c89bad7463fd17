//! Checkout coordination
//!
//! `CheckoutService` drives the cart and order flows against the record store.
//! Every mutation has an explicit commit point: the new state is returned to
//! the caller only after the store has acknowledged the write, and a failed
//! write leaves both local and stored state exactly as they were.

pub mod forms;
pub mod message;

use validator::Validate;

use crate::domain::aggregates::{Bill, Cart, CartOperation, CartUpdate, OrderError, OrderMeta};
use crate::domain::pricing::{compute_totals, DiscountCode, DiscountContext, PricingResult};
use crate::session::Session;
use crate::store::{BillStore, CartStore};
use crate::Result;

pub use forms::CardDetails;
pub use message::{dispatch_requests, order_summary, DispatchRequest};

pub struct CheckoutService<S> {
    store: S,
}

impl<S: CartStore + BillStore> CheckoutService<S> {
    pub fn new(store: S) -> Self { Self { store } }

    pub fn store(&self) -> &S { &self.store }

    /// The user's current cart, with derived fields re-checked after load.
    pub async fn cart(&self, session: &Session) -> Result<Cart> {
        let mut cart = self.store.load_cart(session.user_id()).await?;
        cart.reconcile();
        Ok(cart)
    }

    /// Applies one cart operation and persists the result.
    ///
    /// Rejected operations (bound violations, duplicate adds) are returned as
    /// notices without touching the store. Applied operations are persisted
    /// before the update is handed back; if the save fails, the stored cart is
    /// unchanged and the error is retryable.
    pub async fn execute(&self, session: &Session, op: &CartOperation) -> Result<CartUpdate> {
        let cart = self.cart(session).await?;
        let update = cart.apply(op);
        if update.event.applied() {
            if let Err(err) = self.store.save_cart(session.user_id(), &update.cart).await {
                tracing::warn!(user = %session.user_id(), %err, "cart save failed; keeping prior state");
                return Err(err.into());
            }
            tracing::info!(
                user = %session.user_id(),
                items = update.cart.item_count(),
                total = %update.cart.total_price(),
                "cart updated"
            );
        }
        Ok(update)
    }

    /// Discount conditions for this checkout attempt: first-order status comes
    /// from the length of the persisted bill history.
    pub async fn discount_context(
        &self,
        session: &Session,
        code: Option<DiscountCode>,
    ) -> Result<DiscountContext> {
        let history = self.store.bill_history(session.user_id()).await?;
        Ok(DiscountContext { is_first_order: history.is_empty(), code })
    }

    /// Prices the current cart under the discounts in effect.
    pub async fn quote(&self, session: &Session, code: Option<DiscountCode>) -> Result<PricingResult> {
        let cart = self.cart(session).await?;
        let ctx = self.discount_context(session, code).await?;
        self.price(&cart, &ctx)
    }

    /// Snapshots the cart into a pending bill and appends it to the user's
    /// history. The stored cart is cleared in the same write, so it is only
    /// ever cleared after the bill has been durably persisted.
    pub async fn place_order(
        &self,
        session: &Session,
        meta: &OrderMeta,
        code: Option<DiscountCode>,
    ) -> Result<Bill> {
        let cart = self.cart(session).await?;
        let ctx = self.discount_context(session, code).await?;
        let pricing = self.price(&cart, &ctx)?;
        let bill = Bill::build(&cart, &pricing, meta)?;

        if let Err(err) = self.store.append_bill(session.user_id(), &bill, true).await {
            tracing::warn!(user = %session.user_id(), %err, "bill append failed; cart left intact");
            return Err(err.into());
        }
        tracing::info!(
            user = %session.user_id(),
            bill = bill.id(),
            total = %bill.total_price(),
            method = ?bill.payment_method(),
            "order placed"
        );
        Ok(bill)
    }

    /// Card-channel order: validates the card form before assembling the bill.
    /// No gateway is involved; the details never leave the client.
    pub async fn place_card_order(
        &self,
        session: &Session,
        meta: &OrderMeta,
        card: &CardDetails,
        code: Option<DiscountCode>,
    ) -> Result<Bill> {
        card.validate().map_err(OrderError::InvalidDetails)?;
        self.place_order(session, meta, code).await
    }

    fn price(&self, cart: &Cart, ctx: &DiscountContext) -> Result<PricingResult> {
        compute_totals(cart, ctx).map_err(|err| {
            // The fatal class: a violated pricing invariant means the stored
            // cart data is corrupt. Halt instead of degrading.
            tracing::error!(%err, "pricing invariant violation");
            err.into()
        })
    }
}
