use std::sync::Arc;

use crate::{gateway::PaymentGateway, services::token_service::TokenService, store::Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: TokenService,
    pub gateway: Arc<dyn PaymentGateway>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        tokens: TokenService,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            store,
            tokens,
            gateway,
        }
    }
}
