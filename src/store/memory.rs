use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{PaymentInsert, Store, StoreError, StoreResult};
use crate::models::{
    CartItem, DeleteResult, MenuItem, MenuItemPatch, NewCartItem, NewMenuItem, NewPayment, NewUser,
    Payment, Review, Role, UpdateResult, User,
};

/// In-process store. Each collection is a `Vec` in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    menu: Vec<MenuItem>,
    reviews: Vec<Review>,
    carts: Vec<CartItem>,
    payments: Vec<Payment>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a user with the given role, bypassing the public insert path.
    pub async fn seed_user(&self, email: &str, role: Option<Role>) -> User {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: None,
            photo_url: None,
            role,
            created_at: Utc::now(),
        };
        self.inner.write().await.users.push(user.clone());
        user
    }

    pub async fn seed_review(&self, name: &str, details: &str, rating: f64) -> Review {
        let review = Review {
            id: Uuid::new_v4(),
            name: name.to_string(),
            details: details.to_string(),
            rating,
            created_at: Utc::now(),
        };
        self.inner.write().await.reviews.push(review.clone());
        review
    }

    pub async fn payment_count(&self) -> usize {
        self.inner.read().await.payments.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn close(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.inner.read().await.users.clone())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!(
                "user {} already exists",
                user.email
            )));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            photo_url: user.photo_url,
            role: None,
            created_at: Utc::now(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<DeleteResult> {
        let mut inner = self.inner.write().await;
        let before = inner.users.len();
        inner.users.retain(|u| u.id != id);
        Ok(DeleteResult {
            deleted_count: (before - inner.users.len()) as u64,
        })
    }

    async fn set_user_role(&self, id: Uuid, role: Role) -> StoreResult<UpdateResult> {
        let mut inner = self.inner.write().await;
        let Some(user) = inner.users.iter_mut().find(|u| u.id == id) else {
            return Ok(UpdateResult::default());
        };
        let modified = user.role != Some(role);
        user.role = Some(role);
        Ok(UpdateResult {
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }

    async fn list_menu(&self) -> StoreResult<Vec<MenuItem>> {
        Ok(self.inner.read().await.menu.clone())
    }

    async fn find_menu_item(&self, id: Uuid) -> StoreResult<Option<MenuItem>> {
        let inner = self.inner.read().await;
        Ok(inner.menu.iter().find(|m| m.id == id).cloned())
    }

    async fn insert_menu_item(&self, item: NewMenuItem) -> StoreResult<MenuItem> {
        let item = MenuItem {
            id: Uuid::new_v4(),
            name: item.name,
            recipe: item.recipe,
            image: item.image,
            category: item.category,
            price: item.price,
            created_at: Utc::now(),
        };
        self.inner.write().await.menu.push(item.clone());
        Ok(item)
    }

    async fn update_menu_item(&self, id: Uuid, patch: MenuItemPatch) -> StoreResult<UpdateResult> {
        let mut inner = self.inner.write().await;
        let Some(item) = inner.menu.iter_mut().find(|m| m.id == id) else {
            return Ok(UpdateResult::default());
        };
        let modified = patch.apply(item);
        Ok(UpdateResult {
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }

    async fn delete_menu_item(&self, id: Uuid) -> StoreResult<DeleteResult> {
        let mut inner = self.inner.write().await;
        let before = inner.menu.len();
        inner.menu.retain(|m| m.id != id);
        Ok(DeleteResult {
            deleted_count: (before - inner.menu.len()) as u64,
        })
    }

    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        Ok(self.inner.read().await.reviews.clone())
    }

    async fn insert_cart_item(&self, item: NewCartItem) -> StoreResult<CartItem> {
        let item = CartItem {
            id: Uuid::new_v4(),
            email: item.email,
            menu_id: item.menu_id,
            name: item.name,
            image: item.image,
            price: item.price,
            created_at: Utc::now(),
        };
        self.inner.write().await.carts.push(item.clone());
        Ok(item)
    }

    async fn list_cart_items(&self, email: &str) -> StoreResult<Vec<CartItem>> {
        let inner = self.inner.read().await;
        Ok(inner
            .carts
            .iter()
            .filter(|c| c.email == email)
            .cloned()
            .collect())
    }

    async fn delete_cart_item(&self, id: Uuid) -> StoreResult<DeleteResult> {
        let mut inner = self.inner.write().await;
        let before = inner.carts.len();
        inner.carts.retain(|c| c.id != id);
        Ok(DeleteResult {
            deleted_count: (before - inner.carts.len()) as u64,
        })
    }

    async fn delete_cart_items(&self, email: &str, ids: &[Uuid]) -> StoreResult<DeleteResult> {
        let mut inner = self.inner.write().await;
        let before = inner.carts.len();
        inner
            .carts
            .retain(|c| !(c.email == email && ids.contains(&c.id)));
        Ok(DeleteResult {
            deleted_count: (before - inner.carts.len()) as u64,
        })
    }

    async fn insert_payment(&self, payment: NewPayment) -> StoreResult<PaymentInsert> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner
            .payments
            .iter()
            .find(|p| p.idempotency_key == payment.idempotency_key)
        {
            return Ok(PaymentInsert {
                payment: existing.clone(),
                created: false,
            });
        }
        let payment = Payment {
            id: Uuid::new_v4(),
            idempotency_key: payment.idempotency_key,
            email: payment.email,
            amount: payment.amount,
            transaction_id: payment.transaction_id,
            cart_ids: payment.cart_ids,
            menu_item_ids: payment.menu_item_ids,
            status: payment.status,
            created_at: Utc::now(),
        };
        inner.payments.push(payment.clone());
        Ok(PaymentInsert {
            payment,
            created: true,
        })
    }

    async fn list_payments(&self, email: &str) -> StoreResult<Vec<Payment>> {
        let inner = self.inner.read().await;
        Ok(inner
            .payments
            .iter()
            .rev()
            .filter(|p| p.email == email)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn cart_item(email: &str) -> NewCartItem {
        NewCartItem {
            email: email.to_string(),
            menu_id: Uuid::new_v4(),
            name: "Caesar Salad".to_string(),
            image: None,
            price: Decimal::new(1250, 2),
        }
    }

    #[tokio::test]
    async fn insert_user_rejects_duplicate_email() {
        let store = MemoryStore::new();
        let new_user = NewUser {
            email: "a@x.com".into(),
            name: Some("A".into()),
            photo_url: None,
        };
        store.insert_user(new_user.clone()).await.unwrap();
        let err = store.insert_user(new_user).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_cart_items_is_scoped_to_owner() {
        let store = MemoryStore::new();
        let mine = store.insert_cart_item(cart_item("a@x.com")).await.unwrap();
        let theirs = store.insert_cart_item(cart_item("b@x.com")).await.unwrap();

        let res = store
            .delete_cart_items("a@x.com", &[mine.id, theirs.id])
            .await
            .unwrap();
        assert_eq!(res.deleted_count, 1);
        assert_eq!(store.list_cart_items("b@x.com").await.unwrap().len(), 1);

        let again = store.delete_cart_items("a@x.com", &[mine.id]).await.unwrap();
        assert_eq!(again.deleted_count, 0);
    }

    #[tokio::test]
    async fn set_user_role_reports_match_and_modification() {
        let store = MemoryStore::new();
        let user = store.seed_user("a@x.com", None).await;

        let first = store.set_user_role(user.id, Role::Admin).await.unwrap();
        assert_eq!((first.matched_count, first.modified_count), (1, 1));
        let second = store.set_user_role(user.id, Role::Admin).await.unwrap();
        assert_eq!((second.matched_count, second.modified_count), (1, 0));
        let missing = store.set_user_role(Uuid::new_v4(), Role::Admin).await.unwrap();
        assert_eq!(missing.matched_count, 0);
    }
}
