//! Data access gateway.
//!
//! [`Store`] exposes the collection-scoped operations the handlers need over
//! users, menu items, reviews, carts and payments. [`SeaStore`] is the
//! Postgres-backed implementation used in production; [`MemoryStore`] keeps
//! everything in process and backs the test suite.

mod memory;
mod sea;

pub use memory::MemoryStore;
pub use sea::SeaStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{
        CartItem, DeleteResult, MenuItem, MenuItemPatch, NewCartItem, NewMenuItem, NewPayment,
        NewUser, Payment, Review, Role, UpdateResult, User,
    },
    retry::Transient,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("corrupt document: {0}")]
    Corrupt(String),

    #[error("ORM error: {0}")]
    Orm(#[from] sea_orm::DbErr),
}

impl StoreError {
    pub fn is_unavailable(&self) -> bool {
        match self {
            StoreError::Unavailable(_) => true,
            StoreError::Orm(err) => err.is_transient(),
            _ => false,
        }
    }
}

impl Transient for sea_orm::DbErr {
    fn is_transient(&self) -> bool {
        matches!(
            self,
            sea_orm::DbErr::Conn(_) | sea_orm::DbErr::ConnectionAcquire(_)
        )
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Payment insert outcome. `created` is false when the idempotency key was
/// already recorded and the existing payment is returned instead.
#[derive(Debug, Clone)]
pub struct PaymentInsert {
    pub payment: Payment,
    pub created: bool,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;
    async fn close(&self) -> StoreResult<()>;

    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    /// Fails with [`StoreError::Conflict`] when the email is taken.
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;
    async fn delete_user(&self, id: Uuid) -> StoreResult<DeleteResult>;
    async fn set_user_role(&self, id: Uuid, role: Role) -> StoreResult<UpdateResult>;

    async fn list_menu(&self) -> StoreResult<Vec<MenuItem>>;
    async fn find_menu_item(&self, id: Uuid) -> StoreResult<Option<MenuItem>>;
    async fn insert_menu_item(&self, item: NewMenuItem) -> StoreResult<MenuItem>;
    async fn update_menu_item(&self, id: Uuid, patch: MenuItemPatch) -> StoreResult<UpdateResult>;
    async fn delete_menu_item(&self, id: Uuid) -> StoreResult<DeleteResult>;

    async fn list_reviews(&self) -> StoreResult<Vec<Review>>;

    async fn insert_cart_item(&self, item: NewCartItem) -> StoreResult<CartItem>;
    async fn list_cart_items(&self, email: &str) -> StoreResult<Vec<CartItem>>;
    async fn delete_cart_item(&self, id: Uuid) -> StoreResult<DeleteResult>;
    /// Deletes the listed cart items owned by `email`. An empty or already
    /// cleared id list is not an error.
    async fn delete_cart_items(&self, email: &str, ids: &[Uuid]) -> StoreResult<DeleteResult>;

    async fn insert_payment(&self, payment: NewPayment) -> StoreResult<PaymentInsert>;
    /// Payments for `email`, newest first.
    async fn list_payments(&self, email: &str) -> StoreResult<Vec<Payment>>;
}
