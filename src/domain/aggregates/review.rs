//! Product reviews
//!
//! Reviews live on the product record in the store, newest first, together
//! with the derived average rating. Validation happens at the form boundary,
//! before a review reaches the store port.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// One client's review of a product. A client has at most one review per
/// product; resubmitting goes through the update path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub client_id: String,
    pub client_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[validate(length(min = 1, message = "comment is required"))]
    pub comment: String,
    #[validate(custom = "validate_rating")]
    pub rating: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    pub timestamp: DateTime<Utc>,
}

fn validate_rating(rating: &Decimal) -> Result<(), ValidationError> {
    if (Decimal::ONE..=Decimal::from(5)).contains(rating) {
        Ok(())
    } else {
        Err(ValidationError::new("rating_out_of_range"))
    }
}

/// Mean rating rounded to one decimal place; `None` for no reviews.
pub fn average_rating(reviews: &[Review]) -> Option<Decimal> {
    if reviews.is_empty() {
        return None;
    }
    let sum: Decimal = reviews.iter().map(|r| r.rating).sum();
    let mean = sum / Decimal::from(reviews.len() as u64);
    Some(mean.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(client_id: &str, rating: Decimal) -> Review {
        Review {
            client_id: client_id.into(),
            client_name: format!("Client {client_id}"),
            company_name: None,
            comment: "Works as advertised".into(),
            rating,
            product_type: Some("ink".into()),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_average_is_rounded_to_one_decimal() {
        let reviews = [
            review("c1", Decimal::from(5)),
            review("c2", Decimal::from(4)),
            review("c3", Decimal::from(4)),
        ];
        // 13 / 3 = 4.333...
        assert_eq!(average_rating(&reviews), Some(Decimal::new(43, 1)));

        let reviews = [review("c1", Decimal::new(45, 1)), review("c2", Decimal::from(5))];
        // 4.75 rounds away from zero
        assert_eq!(average_rating(&reviews), Some(Decimal::new(48, 1)));
    }

    #[test]
    fn test_no_reviews_no_average() {
        assert_eq!(average_rating(&[]), None);
    }

    #[test]
    fn test_rating_must_be_between_one_and_five() {
        assert!(review("c1", Decimal::from(3)).validate().is_ok());
        assert!(review("c1", Decimal::new(45, 1)).validate().is_ok());
        assert!(review("c1", Decimal::ZERO).validate().is_err());
        assert!(review("c1", Decimal::from(6)).validate().is_err());
    }

    #[test]
    fn test_comment_is_required() {
        let mut r = review("c1", Decimal::from(4));
        r.comment = String::new();
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_wire_shape() {
        let r = review("c1", Decimal::new(45, 1));
        let out = serde_json::to_value(&r).unwrap();
        assert_eq!(out["clientId"], "c1");
        assert_eq!(out["clientName"], "Client c1");
        assert_eq!(out["rating"], 4.5);
        assert_eq!(out["productType"], "ink");
        assert!(out.get("companyName").is_none());
    }
}
