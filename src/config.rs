use std::{env, time::Duration};

use secrecy::SecretString;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub token_secret: SecretString,
    pub db_connect_timeout: Duration,
    pub retry_max_attempts: u32,
    pub payment: PaymentConfig,
}

#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub secret_key: SecretString,
    pub api_base: String,
    pub currency: String,
    pub timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = match env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => compose_database_url()?,
        };
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_or("PORT", 5000);
        let token_secret = env::var("ACCESS_TOKEN_SECRET")
            .map_err(|_| anyhow::anyhow!("ACCESS_TOKEN_SECRET is not set"))?;

        Ok(Self {
            database_url,
            host,
            port,
            token_secret: SecretString::from(token_secret),
            db_connect_timeout: Duration::from_secs(parse_or("DB_CONNECT_TIMEOUT_SECS", 5)),
            retry_max_attempts: parse_or("RETRY_MAX_ATTEMPTS", 3),
            payment: PaymentConfig::from_env()?,
        })
    }
}

impl PaymentConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let secret_key = env::var("STRIPE_SECRET_KEY")
            .map_err(|_| anyhow::anyhow!("STRIPE_SECRET_KEY is not set"))?;
        let api_base =
            env::var("STRIPE_API_BASE").unwrap_or_else(|_| "https://api.stripe.com".to_string());
        let currency = env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "usd".to_string());

        Ok(Self {
            secret_key: SecretString::from(secret_key),
            api_base,
            currency,
            timeout: Duration::from_secs(parse_or("PAYMENT_TIMEOUT_SECS", 10)),
        })
    }
}

// DB_USER / DB_PASS are what older deployments set instead of a full URL.
fn compose_database_url() -> anyhow::Result<String> {
    let user = env::var("DB_USER")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL or DB_USER must be set"))?;
    let pass = env::var("DB_PASS").map_err(|_| anyhow::anyhow!("DB_PASS is not set"))?;
    let host = env::var("DB_HOST").unwrap_or_else(|_| "localhost:5432".to_string());
    let name = env::var("DB_NAME").unwrap_or_else(|_| "bistro".to_string());
    Ok(format!("postgres://{user}:{pass}@{host}/{name}"))
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
