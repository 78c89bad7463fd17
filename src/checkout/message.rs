//! Order-summary formatting
//!
//! Builds the WhatsApp order text from a bill. Asterisks are WhatsApp bold
//! markers. The core only formats the message; transmission belongs to the
//! dispatch collaborator.

use crate::config::Config;
use crate::domain::aggregates::Bill;

/// The order text addressed to one of the shop's WhatsApp numbers. The
/// dispatch collaborator picks one request and transmits it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchRequest {
    pub phone_number: String,
    pub text: String,
}

/// Pairs the order summary with every number configured in
/// [`Config::whatsapp_numbers`].
pub fn dispatch_requests(bill: &Bill, customer_name: &str, config: &Config) -> Vec<DispatchRequest> {
    let text = order_summary(bill, customer_name);
    config
        .whatsapp_numbers
        .iter()
        .map(|number| DispatchRequest { phone_number: number.clone(), text: text.clone() })
        .collect()
}

/// Formats the dispatch text for `bill`: each line item with unit price,
/// quantity and subtotal, then the applied discounts and the grand total.
pub fn order_summary(bill: &Bill, customer_name: &str) -> String {
    let mut msg = String::new();
    msg.push_str("*New Order*\n\n");
    msg.push_str(&format!("*Customer:* {customer_name}\n"));
    msg.push_str(&format!("*Address:* {}\n\n", bill.delivery_location()));
    msg.push_str("*Order details:*\n");

    for (index, item) in bill.line_items().iter().enumerate() {
        msg.push_str(&format!("{}. *{}*\n", index + 1, item.title));
        msg.push_str(&format!("   Price: {} EGP\n", item.unit_price));
        msg.push_str(&format!("   Quantity: {}\n", item.quantity));
        msg.push_str(&format!("   Subtotal: {} EGP\n\n", item.line_total()));
    }

    if let Some(discount) = bill.discount() {
        msg.push_str(&format!("*Discount applied:* {}\n", discount.label()));
        msg.push_str(&format!("*Discount amount:* -{} EGP\n\n", discount.discount_amount));
    }

    msg.push_str(&format!("*Order total:* {} EGP\n\n", bill.total_price()));
    msg.push_str("Thank you for choosing us!");
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{Cart, CartOperation, OrderMeta, PaymentMethod, Product};
    use crate::domain::pricing::{compute_totals, DiscountContext};
    use crate::domain::value_objects::Money;

    fn bill_with_discount() -> Bill {
        let cart = Cart::empty()
            .apply(&CartOperation::Add(Product {
                id: "p1".into(),
                name: "Black Ink Cartridge".into(),
                price: Money::from(500),
                max_quantity: 4,
                product_type: "ink".into(),
                category: None,
                image_url: None,
            }))
            .cart
            .apply(&CartOperation::Increase("p1".into()))
            .cart;
        let ctx = DiscountContext { is_first_order: true, code: None };
        let pricing = compute_totals(&cart, &ctx).unwrap();
        let meta = OrderMeta {
            delivery_location: "12 Tahrir St, Cairo".into(),
            payment_method: PaymentMethod::Whatsapp,
        };
        Bill::build(&cart, &pricing, &meta).unwrap()
    }

    #[test]
    fn test_summary_lists_items_discounts_and_total() {
        let msg = order_summary(&bill_with_discount(), "Omar");
        assert!(msg.contains("*Customer:* Omar"));
        assert!(msg.contains("*Address:* 12 Tahrir St, Cairo"));
        assert!(msg.contains("1. *Black Ink Cartridge*"));
        assert!(msg.contains("   Price: 500.00 EGP"));
        assert!(msg.contains("   Quantity: 2"));
        assert!(msg.contains("   Subtotal: 1000.00 EGP"));
        assert!(msg.contains("*Discount applied:* First order discount (10%)"));
        assert!(msg.contains("*Discount amount:* -100.00 EGP"));
        assert!(msg.contains("*Order total:* 900.00 EGP"));
    }

    #[test]
    fn test_dispatch_targets_every_configured_number() {
        let config = Config {
            whatsapp_numbers: vec!["201234567890".into(), "201098765432".into()],
            ..Config::default()
        };
        let requests = dispatch_requests(&bill_with_discount(), "Omar", &config);
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].phone_number, "201234567890");
        assert_eq!(requests[1].phone_number, "201098765432");
        assert!(requests.iter().all(|r| r.text.contains("*Order total:* 900.00 EGP")));
    }

    #[test]
    fn test_summary_omits_discount_block_when_none_fired() {
        let cart = Cart::empty()
            .apply(&CartOperation::Add(Product {
                id: "p1".into(),
                name: "Mouse Pad".into(),
                price: Money::from(60),
                max_quantity: 3,
                product_type: "accessory".into(),
                category: None,
                image_url: None,
            }))
            .cart;
        let pricing = compute_totals(&cart, &DiscountContext::default()).unwrap();
        let meta = OrderMeta {
            delivery_location: "12 Tahrir St, Cairo".into(),
            payment_method: PaymentMethod::Whatsapp,
        };
        let bill = Bill::build(&cart, &pricing, &meta).unwrap();
        let msg = order_summary(&bill, "Omar");
        assert!(!msg.contains("Discount applied"));
        assert!(msg.contains("*Order total:* 60.00 EGP"));
    }
}
