use anyhow::{Context, Result};

use crate::llm_client::retry::RetryPolicy;

const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub groq_api_key: String,
    pub groq_base_url: String,
    pub ai_max_retries: u32,
    pub ai_retry_base_delay_ms: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            groq_api_key: require_env("GROQ_API_KEY")?,
            groq_base_url: std::env::var("GROQ_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GROQ_BASE_URL.to_string()),
            ai_max_retries: parse_env_or("AI_MAX_RETRIES", 3)?,
            ai_retry_base_delay_ms: parse_env_or("AI_RETRY_BASE_DELAY_MS", 2000)?,
            port: parse_env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Backoff policy for provider calls.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.ai_max_retries, self.ai_retry_base_delay_ms)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_or_falls_back_to_default() {
        let value: u32 = parse_env_or("CAREERDECK_TEST_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_parse_env_or_rejects_garbage() {
        std::env::set_var("CAREERDECK_TEST_BAD_NUMBER", "three");
        let result: Result<u32> = parse_env_or("CAREERDECK_TEST_BAD_NUMBER", 3);
        assert!(result.is_err());
    }

    #[test]
    fn test_retry_policy_reflects_config() {
        let config = Config {
            database_url: "postgres://localhost/careerdeck".to_string(),
            groq_api_key: "key".to_string(),
            groq_base_url: DEFAULT_GROQ_BASE_URL.to_string(),
            ai_max_retries: 5,
            ai_retry_base_delay_ms: 250,
            port: 8080,
            rust_log: "info".to_string(),
        };
        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(policy.delay_for(1).as_millis(), 500);
    }
}
