//! Stripe payment-intent client.
//!
//! - Base URL: `https://api.stripe.com` (override with `STRIPE_API_BASE`)
//! - Authentication: secret key as bearer token
//! - Requests are form-encoded, responses are JSON

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use super::{GatewayError, PaymentGateway, PaymentIntent};
use crate::{config::PaymentConfig, retry::RetryPolicy};

#[derive(Clone)]
pub struct StripeGateway {
    inner: Arc<StripeGatewayInner>,
}

struct StripeGatewayInner {
    client: reqwest::Client,
    secret_key: SecretString,
    api_base: String,
    currency: String,
    retry: RetryPolicy,
}

#[derive(Deserialize)]
struct IntentResponse {
    id: String,
    client_secret: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl StripeGateway {
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &PaymentConfig, retry: RetryPolicy) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(StripeGatewayInner {
                client,
                secret_key: config.secret_key.clone(),
                api_base: config.api_base.trim_end_matches('/').to_string(),
                currency: config.currency.clone(),
                retry,
            }),
        })
    }

    async fn post_intent(
        &self,
        amount: i64,
        idempotency_key: &str,
    ) -> Result<PaymentIntent, GatewayError> {
        let url = format!("{}/v1/payment_intents", self.inner.api_base);
        let amount = amount.to_string();
        let form = [
            ("amount", amount.as_str()),
            ("currency", self.inner.currency.as_str()),
            ("automatic_payment_methods[enabled]", "true"),
        ];

        let response = self
            .inner
            .client
            .post(&url)
            .bearer_auth(self.inner.secret_key.expose_secret())
            .header("Idempotency-Key", idempotency_key)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(parse_error(response).await);
        }

        let body: IntentResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(format!("Failed to parse response: {e}")))?;
        let client_secret = body
            .client_secret
            .ok_or_else(|| GatewayError::Parse("intent has no client_secret".into()))?;

        Ok(PaymentIntent {
            id: body.id,
            client_secret,
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    #[instrument(skip(self, idempotency_key))]
    async fn create_intent(
        &self,
        amount: i64,
        idempotency_key: &str,
    ) -> Result<PaymentIntent, GatewayError> {
        self.inner
            .retry
            .run("create_payment_intent", || {
                self.post_intent(amount, idempotency_key)
            })
            .await
    }
}

async fn parse_error(response: reqwest::Response) -> GatewayError {
    let status = response.status().as_u16();

    if status == 429 {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);
        return GatewayError::RateLimited(retry_after);
    }

    let text = response.text().await.unwrap_or_default();
    GatewayError::Api {
        status,
        message: error_message(&text),
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use crate::retry::Transient;

    use super::*;

    #[test]
    fn error_message_prefers_gateway_message() {
        let body = r#"{"error":{"type":"invalid_request_error","message":"Amount must be at least $0.50 usd"}}"#;
        assert_eq!(error_message(body), "Amount must be at least $0.50 usd");
        assert_eq!(error_message("upstream down"), "upstream down");
    }

    #[test]
    fn server_errors_and_rate_limits_are_transient() {
        let server = GatewayError::Api {
            status: 503,
            message: "unavailable".into(),
        };
        let client = GatewayError::Api {
            status: 400,
            message: "bad amount".into(),
        };
        assert!(server.is_transient());
        assert!(GatewayError::RateLimited(1).is_transient());
        assert!(!client.is_transient());
        assert!(!GatewayError::Parse("x".into()).is_transient());
    }

    #[test]
    fn rate_limit_carries_retry_after_hint() {
        assert_eq!(
            GatewayError::RateLimited(7).retry_after(),
            Some(std::time::Duration::from_secs(7))
        );
        let server = GatewayError::Api {
            status: 503,
            message: "unavailable".into(),
        };
        assert_eq!(server.retry_after(), None);
    }
}
