//! In-memory record store
//!
//! Drop-in replacement for the REST store, used by the integration tests and
//! for offline development. Same acknowledgment semantics: writes either land
//! whole or not at all.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use rust_decimal::Decimal;

use crate::domain::aggregates::{average_rating, Bill, Cart, NewProduct, Product, Review};
use crate::store::{
    BillStore, CartStore, ProductAdmin, ProductCatalog, ProductReviews, StoreError,
};

#[derive(Debug, Default, Clone)]
struct UserState {
    cart: Cart,
    bills: Vec<Bill>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: Mutex<HashMap<String, UserState>>,
    products: Mutex<Vec<Product>>,
    reviews: Mutex<HashMap<String, Vec<Review>>>,
    next_product_id: Mutex<u64>,
}

impl InMemoryStore {
    pub fn new() -> Self { Self::default() }

    /// Registers a user with an empty cart and no history.
    pub fn seed_user(&self, user_id: &str) {
        self.users
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user_id.to_string(), UserState::default());
    }

    pub fn seed_product(&self, product: Product) {
        self.products.lock().unwrap_or_else(PoisonError::into_inner).push(product);
    }

    fn with_user<T>(
        &self,
        user_id: &str,
        f: impl FnOnce(&mut UserState) -> T,
    ) -> Result<T, StoreError> {
        let mut users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        users
            .get_mut(user_id)
            .map(f)
            .ok_or_else(|| StoreError::NotFound { resource: format!("user {user_id}") })
    }

    fn with_reviews<T>(
        &self,
        product_id: &str,
        f: impl FnOnce(&mut Vec<Review>) -> T,
    ) -> Result<T, StoreError> {
        let known = self
            .products
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|p| p.id == product_id);
        if !known {
            return Err(StoreError::NotFound { resource: format!("product {product_id}") });
        }
        let mut reviews = self.reviews.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(f(reviews.entry(product_id.to_string()).or_default()))
    }
}

impl CartStore for InMemoryStore {
    async fn load_cart(&self, user_id: &str) -> Result<Cart, StoreError> {
        self.with_user(user_id, |u| u.cart.clone())
    }

    async fn save_cart(&self, user_id: &str, cart: &Cart) -> Result<(), StoreError> {
        self.with_user(user_id, |u| u.cart = cart.clone())
    }
}

impl BillStore for InMemoryStore {
    async fn bill_history(&self, user_id: &str) -> Result<Vec<Bill>, StoreError> {
        self.with_user(user_id, |u| u.bills.clone())
    }

    async fn append_bill(
        &self,
        user_id: &str,
        bill: &Bill,
        clear_cart: bool,
    ) -> Result<(), StoreError> {
        self.with_user(user_id, |u| {
            u.bills.push(bill.clone());
            if clear_cart {
                u.cart = Cart::empty();
            }
        })
    }
}

impl ProductCatalog for InMemoryStore {
    async fn products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    async fn product(&self, id: &str) -> Result<Product, StoreError> {
        self.products
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { resource: format!("product {id}") })
    }

    async fn categories(&self) -> Result<Vec<String>, StoreError> {
        let products = self.products.lock().unwrap_or_else(PoisonError::into_inner);
        let mut categories: Vec<String> = Vec::new();
        for category in products.iter().filter_map(|p| p.category.clone()) {
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        Ok(categories)
    }
}

impl ProductReviews for InMemoryStore {
    async fn reviews(&self, product_id: &str) -> Result<Vec<Review>, StoreError> {
        self.with_reviews(product_id, |reviews| reviews.clone())
    }

    async fn add_review(&self, product_id: &str, review: &Review) -> Result<Decimal, StoreError> {
        self.with_reviews(product_id, |reviews| {
            reviews.insert(0, review.clone());
            average_rating(reviews).unwrap_or(Decimal::ZERO)
        })
    }

    async fn update_review(
        &self,
        product_id: &str,
        review: &Review,
    ) -> Result<Decimal, StoreError> {
        self.with_reviews(product_id, |reviews| {
            let slot = reviews.iter_mut().find(|r| r.client_id == review.client_id);
            match slot {
                Some(slot) => {
                    *slot = review.clone();
                    Ok(average_rating(reviews).unwrap_or(Decimal::ZERO))
                }
                None => Err(StoreError::NotFound {
                    resource: format!("review by {} on product {product_id}", review.client_id),
                }),
            }
        })?
    }
}

impl ProductAdmin for InMemoryStore {
    async fn create_product(&self, product: &NewProduct) -> Result<Product, StoreError> {
        let mut next_id = self.next_product_id.lock().unwrap_or_else(PoisonError::into_inner);
        *next_id += 1;
        let created = Product {
            id: format!("p{next_id}"),
            name: product.name.clone(),
            price: product.price,
            max_quantity: product.max_quantity,
            product_type: product.product_type.clone(),
            category: product.category.clone(),
            image_url: product.image_url.clone(),
        };
        self.products.lock().unwrap_or_else(PoisonError::into_inner).push(created.clone());
        Ok(created)
    }

    async fn update_product(&self, id: &str, product: &Product) -> Result<Product, StoreError> {
        let mut products = self.products.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound { resource: format!("product {id}") })?;
        *slot = Product { id: id.to_string(), ..product.clone() };
        Ok(slot.clone())
    }

    async fn delete_product(&self, id: &str) -> Result<(), StoreError> {
        let mut products = self.products.lock().unwrap_or_else(PoisonError::into_inner);
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(StoreError::NotFound { resource: format!("product {id}") });
        }
        // reviews live on the product record, so they go with it
        self.reviews.lock().unwrap_or_else(PoisonError::into_inner).remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Money;
    use chrono::Utc;

    fn seeded_product(store: &InMemoryStore, id: &str, category: Option<&str>) {
        store.seed_product(Product {
            id: id.into(),
            name: format!("Product {id}"),
            price: Money::from(100),
            max_quantity: 5,
            product_type: "ink".into(),
            category: category.map(Into::into),
            image_url: None,
        });
    }

    fn review(client_id: &str, rating: i64) -> Review {
        Review {
            client_id: client_id.into(),
            client_name: format!("Client {client_id}"),
            company_name: None,
            comment: "Good value".into(),
            rating: Decimal::from(rating),
            product_type: Some("ink".into()),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.load_cart("ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_product_admin_lifecycle() {
        let store = InMemoryStore::new();
        let created = store
            .create_product(&NewProduct {
                name: "USB Cable".into(),
                price: Money::from(80),
                max_quantity: 10,
                product_type: "accessory".into(),
                category: Some("cables".into()),
                image_url: None,
            })
            .await
            .unwrap();
        assert_eq!(store.products().await.unwrap().len(), 1);

        let mut updated = created.clone();
        updated.price = Money::from(95);
        let stored = store.update_product(&created.id, &updated).await.unwrap();
        assert_eq!(stored.price, Money::from(95));
        assert_eq!(store.product(&created.id).await.unwrap().price, Money::from(95));

        store.delete_product(&created.id).await.unwrap();
        assert!(matches!(
            store.product(&created.id).await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_added_reviews_are_newest_first_and_rerate_the_product() {
        let store = InMemoryStore::new();
        seeded_product(&store, "p1", None);

        let rating = store.add_review("p1", &review("c1", 5)).await.unwrap();
        assert_eq!(rating, Decimal::from(5));

        let rating = store.add_review("p1", &review("c2", 4)).await.unwrap();
        assert_eq!(rating, Decimal::new(45, 1));

        let reviews = store.reviews("p1").await.unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].client_id, "c2");
        assert_eq!(reviews[1].client_id, "c1");
    }

    #[tokio::test]
    async fn test_updating_a_review_replaces_it_and_rerates() {
        let store = InMemoryStore::new();
        seeded_product(&store, "p1", None);
        store.add_review("p1", &review("c1", 5)).await.unwrap();
        store.add_review("p1", &review("c2", 4)).await.unwrap();

        let mut revised = review("c1", 3);
        revised.comment = "Dried out after a month".into();
        let rating = store.update_review("p1", &revised).await.unwrap();
        assert_eq!(rating, Decimal::new(35, 1));

        let reviews = store.reviews("p1").await.unwrap();
        assert_eq!(reviews.len(), 2);
        let stored = reviews.iter().find(|r| r.client_id == "c1").unwrap();
        assert_eq!(stored.comment, "Dried out after a month");
        assert_eq!(stored.rating, Decimal::from(3));
    }

    #[tokio::test]
    async fn test_updating_an_absent_review_is_not_found() {
        let store = InMemoryStore::new();
        seeded_product(&store, "p1", None);
        store.add_review("p1", &review("c1", 5)).await.unwrap();

        let err = store.update_review("p1", &review("ghost", 2)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert_eq!(store.reviews("p1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reviewing_an_unknown_product_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.add_review("ghost", &review("c1", 4)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_categories_are_distinct_in_catalog_order() {
        let store = InMemoryStore::new();
        seeded_product(&store, "p1", Some("cables"));
        seeded_product(&store, "p2", Some("ink"));
        seeded_product(&store, "p3", Some("cables"));
        seeded_product(&store, "p4", None);

        let categories = store.categories().await.unwrap();
        assert_eq!(categories, vec!["cables".to_string(), "ink".to_string()]);
    }
}
