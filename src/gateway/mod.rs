//! External payment gateway.

mod stripe;

pub use stripe::StripeGateway;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::retry::Transient;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure talking to the gateway.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway rejected the request.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl Transient for GatewayError {
    fn is_transient(&self) -> bool {
        match self {
            GatewayError::Http(err) => err.is_timeout() || err.is_connect(),
            GatewayError::Api { status, .. } => *status >= 500,
            GatewayError::RateLimited(_) => true,
            GatewayError::Parse(_) => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            GatewayError::RateLimited(secs) => Some(Duration::from_secs(*secs)),
            _ => None,
        }
    }
}

/// A payment intent as far as this service cares about it.
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates an intent for `amount` minor currency units with automatic
    /// payment-method selection. `idempotency_key` makes retries safe.
    async fn create_intent(
        &self,
        amount: i64,
        idempotency_key: &str,
    ) -> Result<PaymentIntent, GatewayError>;
}
