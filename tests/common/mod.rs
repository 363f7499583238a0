#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use bistro_api::{
    gateway::{GatewayError, PaymentGateway, PaymentIntent},
    routes::app,
    services::token_service::TokenService,
    models::{
        CartItem, DeleteResult, MenuItem, MenuItemPatch, NewCartItem, NewMenuItem, NewPayment,
        NewUser, Payment, Review, Role, UpdateResult, User,
    },
    state::AppState,
    store::{MemoryStore, PaymentInsert, Store, StoreError, StoreResult},
};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const SECRET: &str = "test-secret-for-bistro";

/// Gateway double. Hands back a fixed client secret or a declined error.
#[derive(Default)]
pub struct FakeGateway {
    pub decline: bool,
    pub calls: AtomicUsize,
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_intent(
        &self,
        amount: i64,
        _idempotency_key: &str,
    ) -> Result<PaymentIntent, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.decline {
            return Err(GatewayError::Api {
                status: 402,
                message: "Your card was declined.".into(),
            });
        }
        Ok(PaymentIntent {
            id: format!("pi_test_{amount}"),
            client_secret: format!("pi_test_{amount}_secret_abc"),
        })
    }
}

/// Memory store whose bulk cart delete is offline; everything else delegates.
pub struct CleanupOutageStore(pub Arc<MemoryStore>);

#[async_trait]
impl Store for CleanupOutageStore {
    async fn ping(&self) -> StoreResult<()> {
        self.0.ping().await
    }
    async fn close(&self) -> StoreResult<()> {
        self.0.close().await
    }
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        self.0.list_users().await
    }
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.0.find_user_by_email(email).await
    }
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        self.0.insert_user(user).await
    }
    async fn delete_user(&self, id: Uuid) -> StoreResult<DeleteResult> {
        self.0.delete_user(id).await
    }
    async fn set_user_role(&self, id: Uuid, role: Role) -> StoreResult<UpdateResult> {
        self.0.set_user_role(id, role).await
    }
    async fn list_menu(&self) -> StoreResult<Vec<MenuItem>> {
        self.0.list_menu().await
    }
    async fn find_menu_item(&self, id: Uuid) -> StoreResult<Option<MenuItem>> {
        self.0.find_menu_item(id).await
    }
    async fn insert_menu_item(&self, item: NewMenuItem) -> StoreResult<MenuItem> {
        self.0.insert_menu_item(item).await
    }
    async fn update_menu_item(&self, id: Uuid, patch: MenuItemPatch) -> StoreResult<UpdateResult> {
        self.0.update_menu_item(id, patch).await
    }
    async fn delete_menu_item(&self, id: Uuid) -> StoreResult<DeleteResult> {
        self.0.delete_menu_item(id).await
    }
    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        self.0.list_reviews().await
    }
    async fn insert_cart_item(&self, item: NewCartItem) -> StoreResult<CartItem> {
        self.0.insert_cart_item(item).await
    }
    async fn list_cart_items(&self, email: &str) -> StoreResult<Vec<CartItem>> {
        self.0.list_cart_items(email).await
    }
    async fn delete_cart_item(&self, id: Uuid) -> StoreResult<DeleteResult> {
        self.0.delete_cart_item(id).await
    }
    async fn delete_cart_items(&self, _email: &str, _ids: &[Uuid]) -> StoreResult<DeleteResult> {
        Err(StoreError::Unavailable("cart collection offline".into()))
    }
    async fn insert_payment(&self, payment: NewPayment) -> StoreResult<PaymentInsert> {
        self.0.insert_payment(payment).await
    }
    async fn list_payments(&self, email: &str) -> StoreResult<Vec<Payment>> {
        self.0.list_payments(email).await
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub gateway: Arc<FakeGateway>,
    pub tokens: TokenService,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_gateway(FakeGateway::default())
    }

    pub fn with_gateway(gateway: FakeGateway) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::build(store.clone(), store, gateway)
    }

    /// Router whose cart cleanup fails; `store` still sees every other write.
    pub fn with_cleanup_outage() -> Self {
        let store = Arc::new(MemoryStore::new());
        let outage = Arc::new(CleanupOutageStore(store.clone()));
        Self::build(store, outage, FakeGateway::default())
    }

    fn build(store: Arc<MemoryStore>, backend: Arc<dyn Store>, gateway: FakeGateway) -> Self {
        let gateway = Arc::new(gateway);
        let tokens = TokenService::new(&SecretString::from(SECRET.to_string()));
        let state = AppState::new(backend, tokens.clone(), gateway.clone());
        Self {
            router: app(state),
            store,
            gateway,
            tokens,
        }
    }

    pub fn token_for(&self, email: &str) -> String {
        self.tokens.issue(email).unwrap()
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }
}
