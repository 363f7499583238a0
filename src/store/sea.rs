use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, Statement,
    sea_query::Expr,
};
use uuid::Uuid;

use super::{PaymentInsert, Store, StoreError, StoreResult};
use crate::{
    entity::{
        cart_items::{self, Column as CartCol, Entity as CartItems},
        menu_items::{self, Column as MenuCol, Entity as MenuItems},
        payments::{self, Column as PaymentCol, Entity as Payments},
        reviews::{self, Column as ReviewCol, Entity as Reviews},
        users::{self, Column as UserCol, Entity as Users},
    },
    models::{
        CartItem, DeleteResult, MenuItem, MenuItemPatch, NewCartItem, NewMenuItem, NewPayment,
        NewUser, Payment, Review, Role, UpdateResult, User,
    },
    retry::RetryPolicy,
};

/// Postgres-backed store. One table per collection, see `migrations/`.
#[derive(Clone)]
pub struct SeaStore {
    conn: DatabaseConnection,
    retry: RetryPolicy,
}

impl SeaStore {
    pub fn new(conn: DatabaseConnection, retry: RetryPolicy) -> Self {
        Self { conn, retry }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }
}

#[async_trait]
impl Store for SeaStore {
    async fn ping(&self) -> StoreResult<()> {
        self.retry
            .run("ping", || self.conn.ping())
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }

    async fn close(&self) -> StoreResult<()> {
        self.conn.clone().close().await?;
        Ok(())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let rows = self
            .retry
            .run("list_users", || {
                Users::find().order_by_asc(UserCol::CreatedAt).all(&self.conn)
            })
            .await?;
        Ok(rows.into_iter().map(user_from_entity).collect())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = self
            .retry
            .run("find_user_by_email", || {
                Users::find().filter(UserCol::Email.eq(email)).one(&self.conn)
            })
            .await?;
        Ok(row.map(user_from_entity))
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let active = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(user.email),
            name: Set(user.name),
            photo_url: Set(user.photo_url),
            role: Set(None),
            created_at: Set(Utc::now().into()),
        };
        let model = self
            .retry
            .run("insert_user", || active.clone().insert(&self.conn))
            .await
            .map_err(conflict_or_orm)?;
        Ok(user_from_entity(model))
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<DeleteResult> {
        let res = self
            .retry
            .run("delete_user", || Users::delete_by_id(id).exec(&self.conn))
            .await?;
        Ok(DeleteResult {
            deleted_count: res.rows_affected,
        })
    }

    async fn set_user_role(&self, id: Uuid, role: Role) -> StoreResult<UpdateResult> {
        let existing = self
            .retry
            .run("find_user", || Users::find_by_id(id).one(&self.conn))
            .await?;
        let Some(existing) = existing else {
            return Ok(UpdateResult::default());
        };
        if existing.role.as_deref() == Some(role.as_str()) {
            return Ok(UpdateResult {
                matched_count: 1,
                modified_count: 0,
            });
        }

        let res = self
            .retry
            .run("set_user_role", || {
                Users::update_many()
                    .col_expr(UserCol::Role, Expr::value(role.as_str()))
                    .filter(UserCol::Id.eq(id))
                    .exec(&self.conn)
            })
            .await?;
        Ok(UpdateResult {
            matched_count: res.rows_affected,
            modified_count: res.rows_affected,
        })
    }

    async fn list_menu(&self) -> StoreResult<Vec<MenuItem>> {
        let rows = self
            .retry
            .run("list_menu", || {
                MenuItems::find()
                    .order_by_asc(MenuCol::Category)
                    .order_by_asc(MenuCol::Name)
                    .all(&self.conn)
            })
            .await?;
        Ok(rows.into_iter().map(menu_item_from_entity).collect())
    }

    async fn find_menu_item(&self, id: Uuid) -> StoreResult<Option<MenuItem>> {
        let row = self
            .retry
            .run("find_menu_item", || MenuItems::find_by_id(id).one(&self.conn))
            .await?;
        Ok(row.map(menu_item_from_entity))
    }

    async fn insert_menu_item(&self, item: NewMenuItem) -> StoreResult<MenuItem> {
        let active = menu_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(item.name),
            recipe: Set(item.recipe),
            image: Set(item.image),
            category: Set(item.category),
            price: Set(item.price),
            created_at: Set(Utc::now().into()),
        };
        let model = self
            .retry
            .run("insert_menu_item", || active.clone().insert(&self.conn))
            .await?;
        Ok(menu_item_from_entity(model))
    }

    async fn update_menu_item(&self, id: Uuid, patch: MenuItemPatch) -> StoreResult<UpdateResult> {
        let existing = self
            .retry
            .run("find_menu_item", || MenuItems::find_by_id(id).one(&self.conn))
            .await?;
        let Some(existing) = existing else {
            return Ok(UpdateResult::default());
        };

        let mut item = menu_item_from_entity(existing.clone());
        if !patch.apply(&mut item) {
            return Ok(UpdateResult {
                matched_count: 1,
                modified_count: 0,
            });
        }

        let mut active: menu_items::ActiveModel = existing.into();
        active.name = Set(item.name);
        active.recipe = Set(item.recipe);
        active.image = Set(item.image);
        active.category = Set(item.category);
        active.price = Set(item.price);
        self.retry
            .run("update_menu_item", || active.clone().update(&self.conn))
            .await?;

        Ok(UpdateResult {
            matched_count: 1,
            modified_count: 1,
        })
    }

    async fn delete_menu_item(&self, id: Uuid) -> StoreResult<DeleteResult> {
        let res = self
            .retry
            .run("delete_menu_item", || {
                MenuItems::delete_by_id(id).exec(&self.conn)
            })
            .await?;
        Ok(DeleteResult {
            deleted_count: res.rows_affected,
        })
    }

    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        let rows = self
            .retry
            .run("list_reviews", || {
                Reviews::find()
                    .order_by_desc(ReviewCol::CreatedAt)
                    .all(&self.conn)
            })
            .await?;
        Ok(rows.into_iter().map(review_from_entity).collect())
    }

    async fn insert_cart_item(&self, item: NewCartItem) -> StoreResult<CartItem> {
        let active = cart_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(item.email),
            menu_id: Set(item.menu_id),
            name: Set(item.name),
            image: Set(item.image),
            price: Set(item.price),
            created_at: Set(Utc::now().into()),
        };
        let model = self
            .retry
            .run("insert_cart_item", || active.clone().insert(&self.conn))
            .await?;
        Ok(cart_item_from_entity(model))
    }

    async fn list_cart_items(&self, email: &str) -> StoreResult<Vec<CartItem>> {
        let rows = self
            .retry
            .run("list_cart_items", || {
                CartItems::find()
                    .filter(CartCol::Email.eq(email))
                    .order_by_asc(CartCol::CreatedAt)
                    .all(&self.conn)
            })
            .await?;
        Ok(rows.into_iter().map(cart_item_from_entity).collect())
    }

    async fn delete_cart_item(&self, id: Uuid) -> StoreResult<DeleteResult> {
        let res = self
            .retry
            .run("delete_cart_item", || {
                CartItems::delete_by_id(id).exec(&self.conn)
            })
            .await?;
        Ok(DeleteResult {
            deleted_count: res.rows_affected,
        })
    }

    async fn delete_cart_items(&self, email: &str, ids: &[Uuid]) -> StoreResult<DeleteResult> {
        if ids.is_empty() {
            return Ok(DeleteResult::default());
        }
        let res = self
            .retry
            .run("delete_cart_items", || {
                CartItems::delete_many()
                    .filter(CartCol::Email.eq(email))
                    .filter(CartCol::Id.is_in(ids.iter().copied()))
                    .exec(&self.conn)
            })
            .await?;
        Ok(DeleteResult {
            deleted_count: res.rows_affected,
        })
    }

    async fn insert_payment(&self, payment: NewPayment) -> StoreResult<PaymentInsert> {
        let key = payment.idempotency_key;
        if let Some(existing) = self.find_payment_by_key(key).await? {
            return Ok(PaymentInsert {
                payment: existing,
                created: false,
            });
        }

        let active = payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            idempotency_key: Set(key),
            email: Set(payment.email),
            amount: Set(payment.amount),
            transaction_id: Set(payment.transaction_id),
            cart_ids: Set(ids_to_json(&payment.cart_ids)),
            menu_item_ids: Set(ids_to_json(&payment.menu_item_ids)),
            status: Set(payment.status),
            created_at: Set(Utc::now().into()),
        };
        let inserted = self
            .retry
            .run("insert_payment", || active.clone().insert(&self.conn))
            .await;

        match inserted {
            Ok(model) => Ok(PaymentInsert {
                payment: payment_from_entity(model)?,
                created: true,
            }),
            // A concurrent or retried insert with the same key won the race.
            Err(err) if is_unique_violation(&err) => {
                let existing = self.find_payment_by_key(key).await?.ok_or_else(|| {
                    StoreError::Conflict(format!("payment {key} vanished after conflict"))
                })?;
                Ok(PaymentInsert {
                    payment: existing,
                    created: false,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn list_payments(&self, email: &str) -> StoreResult<Vec<Payment>> {
        let rows = self
            .retry
            .run("list_payments", || {
                Payments::find()
                    .filter(PaymentCol::Email.eq(email))
                    .order_by_desc(PaymentCol::CreatedAt)
                    .all(&self.conn)
            })
            .await?;
        rows.into_iter().map(payment_from_entity).collect()
    }
}

impl SeaStore {
    async fn find_payment_by_key(&self, key: Uuid) -> StoreResult<Option<Payment>> {
        let row = self
            .retry
            .run("find_payment_by_key", || {
                Payments::find()
                    .filter(PaymentCol::IdempotencyKey.eq(key))
                    .one(&self.conn)
            })
            .await?;
        row.map(payment_from_entity).transpose()
    }

    /// Removes every row from every collection. Test helper.
    pub async fn truncate_all(&self) -> StoreResult<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .execute(Statement::from_string(
                backend,
                "TRUNCATE TABLE payments, cart_items, reviews, menu_items, users",
            ))
            .await?;
        Ok(())
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn conflict_or_orm(err: DbErr) -> StoreError {
    if is_unique_violation(&err) {
        StoreError::Conflict(err.to_string())
    } else {
        StoreError::Orm(err)
    }
}

fn ids_to_json(ids: &[Uuid]) -> serde_json::Value {
    serde_json::Value::Array(
        ids.iter()
            .map(|id| serde_json::Value::String(id.to_string()))
            .collect(),
    )
}

fn ids_from_json(value: serde_json::Value) -> StoreResult<Vec<Uuid>> {
    serde_json::from_value(value).map_err(|err| StoreError::Corrupt(err.to_string()))
}

fn user_from_entity(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        name: model.name,
        photo_url: model.photo_url,
        role: model.role.as_deref().and_then(Role::parse),
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn menu_item_from_entity(model: menu_items::Model) -> MenuItem {
    MenuItem {
        id: model.id,
        name: model.name,
        recipe: model.recipe,
        image: model.image,
        category: model.category,
        price: model.price,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn review_from_entity(model: reviews::Model) -> Review {
    Review {
        id: model.id,
        name: model.name,
        details: model.details,
        rating: model.rating,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn cart_item_from_entity(model: cart_items::Model) -> CartItem {
    CartItem {
        id: model.id,
        email: model.email,
        menu_id: model.menu_id,
        name: model.name,
        image: model.image,
        price: model.price,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn payment_from_entity(model: payments::Model) -> StoreResult<Payment> {
    Ok(Payment {
        id: model.id,
        idempotency_key: model.idempotency_key,
        email: model.email,
        amount: model.amount,
        transaction_id: model.transaction_id,
        cart_ids: ids_from_json(model.cart_ids)?,
        menu_item_ids: ids_from_json(model.menu_item_ids)?,
        status: model.status,
        created_at: model.created_at.with_timezone(&Utc),
    })
}
