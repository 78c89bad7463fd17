//! REST record store client
//!
//! Talks to the json-server style mock backend: user records at
//! `GET/PATCH /users/{id}` carrying `cartInfo` and `billsHistory`, products at
//! `/products`. Cart and bill writes are partial PATCHes of the user record,
//! mirroring how the storefront persists state.

use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::config::Config;
use crate::domain::aggregates::{average_rating, Bill, Cart, NewProduct, Product, Review};
use crate::store::{
    BillStore, CartStore, ProductAdmin, ProductCatalog, ProductReviews, StoreError,
};

pub struct RestStore {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    #[serde(default)]
    cart_info: Cart,
    #[serde(default)]
    bills_history: Vec<Bill>,
}

/// The slice of the product record the review writes operate on.
#[derive(Debug, Default, Deserialize)]
struct ReviewsRecord {
    #[serde(default)]
    reviews: Vec<Review>,
}

impl RestStore {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String { format!("{}/{path}", self.base_url) }

    async fn fetch_user(&self, user_id: &str) -> Result<UserRecord, StoreError> {
        let res = self.http.get(self.url(&format!("users/{user_id}"))).send().await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound { resource: format!("user {user_id}") });
        }
        check_status(&res)?;
        Ok(res.json().await?)
    }

    async fn patch_user(&self, user_id: &str, body: &serde_json::Value) -> Result<(), StoreError> {
        let res = self
            .http
            .patch(self.url(&format!("users/{user_id}")))
            .json(body)
            .send()
            .await?;
        check_status(&res)?;
        Ok(())
    }

    async fn fetch_reviews(&self, product_id: &str) -> Result<Vec<Review>, StoreError> {
        let res = self.http.get(self.url(&format!("products/{product_id}"))).send().await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound { resource: format!("product {product_id}") });
        }
        check_status(&res)?;
        let record: ReviewsRecord = res.json().await?;
        Ok(record.reviews)
    }

    /// PATCHes the review list and the re-derived rating in one write.
    async fn patch_reviews(
        &self,
        product_id: &str,
        reviews: &[Review],
    ) -> Result<Decimal, StoreError> {
        let rating = average_rating(reviews).unwrap_or(Decimal::ZERO);
        let res = self
            .http
            .patch(self.url(&format!("products/{product_id}")))
            .json(&serde_json::json!({ "reviews": reviews, "rating": rating }))
            .send()
            .await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound { resource: format!("product {product_id}") });
        }
        check_status(&res)?;
        Ok(rating)
    }
}

fn check_status(res: &reqwest::Response) -> Result<(), StoreError> {
    if res.status().is_success() {
        Ok(())
    } else {
        Err(StoreError::Rejected { status: res.status().as_u16() })
    }
}

impl CartStore for RestStore {
    async fn load_cart(&self, user_id: &str) -> Result<Cart, StoreError> {
        Ok(self.fetch_user(user_id).await?.cart_info)
    }

    async fn save_cart(&self, user_id: &str, cart: &Cart) -> Result<(), StoreError> {
        self.patch_user(user_id, &serde_json::json!({ "cartInfo": cart })).await
    }
}

impl BillStore for RestStore {
    async fn bill_history(&self, user_id: &str) -> Result<Vec<Bill>, StoreError> {
        Ok(self.fetch_user(user_id).await?.bills_history)
    }

    async fn append_bill(
        &self,
        user_id: &str,
        bill: &Bill,
        clear_cart: bool,
    ) -> Result<(), StoreError> {
        // Read-modify-write of the user record; history and cart land in the
        // same PATCH so a failure changes neither.
        let mut record = self.fetch_user(user_id).await?;
        record.bills_history.push(bill.clone());
        let cart_info = if clear_cart { Cart::empty() } else { record.cart_info };
        self.patch_user(
            user_id,
            &serde_json::json!({
                "billsHistory": record.bills_history,
                "cartInfo": cart_info,
            }),
        )
        .await
    }
}

impl ProductCatalog for RestStore {
    async fn products(&self) -> Result<Vec<Product>, StoreError> {
        let res = self.http.get(self.url("products")).send().await?;
        check_status(&res)?;
        Ok(res.json().await?)
    }

    async fn product(&self, id: &str) -> Result<Product, StoreError> {
        let res = self.http.get(self.url(&format!("products/{id}"))).send().await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound { resource: format!("product {id}") });
        }
        check_status(&res)?;
        Ok(res.json().await?)
    }

    async fn categories(&self) -> Result<Vec<String>, StoreError> {
        let res = self.http.get(self.url("categories")).send().await?;
        check_status(&res)?;
        Ok(res.json().await?)
    }
}

impl ProductReviews for RestStore {
    async fn reviews(&self, product_id: &str) -> Result<Vec<Review>, StoreError> {
        self.fetch_reviews(product_id).await
    }

    async fn add_review(&self, product_id: &str, review: &Review) -> Result<Decimal, StoreError> {
        let mut reviews = self.fetch_reviews(product_id).await?;
        reviews.insert(0, review.clone());
        self.patch_reviews(product_id, &reviews).await
    }

    async fn update_review(
        &self,
        product_id: &str,
        review: &Review,
    ) -> Result<Decimal, StoreError> {
        let mut reviews = self.fetch_reviews(product_id).await?;
        let slot = reviews
            .iter_mut()
            .find(|r| r.client_id == review.client_id)
            .ok_or_else(|| StoreError::NotFound {
                resource: format!("review by {} on product {product_id}", review.client_id),
            })?;
        *slot = review.clone();
        self.patch_reviews(product_id, &reviews).await
    }
}

impl ProductAdmin for RestStore {
    async fn create_product(&self, product: &NewProduct) -> Result<Product, StoreError> {
        let res = self.http.post(self.url("products")).json(product).send().await?;
        check_status(&res)?;
        Ok(res.json().await?)
    }

    async fn update_product(&self, id: &str, product: &Product) -> Result<Product, StoreError> {
        let res = self
            .http
            .put(self.url(&format!("products/{id}")))
            .json(product)
            .send()
            .await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound { resource: format!("product {id}") });
        }
        check_status(&res)?;
        Ok(res.json().await?)
    }

    async fn delete_product(&self, id: &str) -> Result<(), StoreError> {
        let res = self.http.delete(self.url(&format!("products/{id}"))).send().await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound { resource: format!("product {id}") });
        }
        check_status(&res)
    }
}
