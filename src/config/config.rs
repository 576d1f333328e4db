use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub ai_service_url: String,
    pub ai_timeout: Duration,
    pub account_cache_ttl: Duration,
    pub jwt_secret: String,
}

impl core::fmt::Debug for Config {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("ai_service_url", &self.ai_service_url)
            .field("ai_timeout", &self.ai_timeout)
            .field("account_cache_ttl", &self.account_cache_ttl)
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();

        Self {
            port: parsed("PORT", 3000),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            ai_service_url: env::var("AI_SERVICE_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string()),
            ai_timeout: Duration::from_secs(parsed("AI_TIMEOUT_SECS", 30)),
            account_cache_ttl: Duration::from_secs(parsed(
                "ACCOUNT_CACHE_TTL_SECS",
                crate::constants::ACCOUNT_CACHE_TTL_SECS,
            )),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "secret".to_string()), // Use a secure secret in production
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
