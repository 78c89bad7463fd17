//! Product catalog snapshot
//!
//! Products are owned by the catalog collaborator; the core only ever reads
//! them. A `Product` embedded in a cart line is a snapshot taken at add time.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Money;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub max_quantity: u32,
    #[serde(rename = "type")]
    pub product_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, rename = "url", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Payload for creating a product through the admin interface. The record
/// store assigns the id.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price: Money,
    pub max_quantity: u32,
    #[serde(rename = "type")]
    pub product_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, rename = "url", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let json = r#"{
            "id": "p1",
            "name": "Black Ink Cartridge",
            "price": 250.5,
            "maxQuantity": 4,
            "type": "ink",
            "category": "printing"
        }"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert_eq!(p.id, "p1");
        assert_eq!(p.max_quantity, 4);
        assert_eq!(p.product_type, "ink");
        assert!(p.image_url.is_none());

        let out = serde_json::to_value(&p).unwrap();
        assert_eq!(out["maxQuantity"], 4);
        assert_eq!(out["type"], "ink");
    }
}
