use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub server: ServerConfig,
    /// PostgreSQL connection URL; the in-memory store is used when absent
    #[serde(default)]
    pub postgres_url: Option<String>,
    pub auth: AuthConfig,
    pub paystack: PaystackConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    #[serde(default = "default_reset_code_ttl_minutes")]
    pub reset_code_ttl_minutes: i64,
}

fn default_token_ttl_hours() -> i64 {
    168
}

fn default_reset_code_ttl_minutes() -> i64 {
    crate::auth::reset::RESET_CODE_TTL_MINUTES
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaystackConfig {
    #[serde(default = "default_paystack_url")]
    pub base_url: String,
    pub secret_key: String,
    #[serde(default = "default_gateway_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub callback_url: Option<String>,
}

fn default_paystack_url() -> String {
    "https://api.paystack.co".to_string()
}

fn default_gateway_timeout_ms() -> u64 {
    10_000
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LimitsConfig {
    /// Largest accepted transfer or funding amount, in major units
    pub max_amount: Decimal,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_amount: Decimal::new(10_000_000, 0),
        }
    }
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;
        let mut config = Self::from_yaml(&content)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Secrets and the database URL may come from the environment instead of
    /// the checked-in yaml.
    pub fn apply_env_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(secret) = get("PAYLINK_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(key) = get("PAYSTACK_SECRET_KEY") {
            self.paystack.secret_key = key;
        }
        if let Some(url) = get("DATABASE_URL") {
            self.postgres_url = Some(url);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("auth.jwt_secret is empty".into()));
        }
        if self.auth.token_ttl_hours <= 0 {
            return Err(ConfigError::Invalid(
                "auth.token_ttl_hours must be positive".into(),
            ));
        }
        if self.auth.reset_code_ttl_minutes <= 0 {
            return Err(ConfigError::Invalid(
                "auth.reset_code_ttl_minutes must be positive".into(),
            ));
        }
        if self.paystack.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "paystack.timeout_ms must be positive".into(),
            ));
        }
        if self.limits.max_amount <= Decimal::ZERO {
            return Err(ConfigError::Invalid(
                "limits.max_amount must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
log_level: "info"
log_dir: "./logs"
log_file: "paylink.log"
use_json: false
rotation: "daily"
server:
  host: "127.0.0.1"
  port: 8080
auth:
  jwt_secret: "dev-secret"
paystack:
  secret_key: "sk_test_x"
"#;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::from_yaml(YAML).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert!(cfg.postgres_url.is_none());
        assert_eq!(cfg.auth.token_ttl_hours, 168);
        assert_eq!(cfg.auth.reset_code_ttl_minutes, 15);
        assert_eq!(cfg.paystack.base_url, "https://api.paystack.co");
        assert_eq!(cfg.paystack.timeout_ms, 10_000);
        assert_eq!(cfg.limits.max_amount, Decimal::new(10_000_000, 0));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut cfg = AppConfig::from_yaml(YAML).unwrap();
        cfg.apply_env_overrides(|key| match key {
            "PAYLINK_JWT_SECRET" => Some("from-env".into()),
            "DATABASE_URL" => Some("postgres://localhost/paylink".into()),
            _ => None,
        });
        assert_eq!(cfg.auth.jwt_secret, "from-env");
        assert_eq!(cfg.paystack.secret_key, "sk_test_x");
        assert_eq!(
            cfg.postgres_url.as_deref(),
            Some("postgres://localhost/paylink")
        );
    }

    #[test]
    fn test_validate_rejects_empty_secret() {
        let mut cfg = AppConfig::from_yaml(YAML).unwrap();
        cfg.auth.jwt_secret = " ".into();
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            AppConfig::load("does-not-exist"),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_dev_config_parses() {
        let content = std::fs::read_to_string("config/dev.yaml").unwrap();
        let cfg = AppConfig::from_yaml(&content).unwrap();
        assert!(cfg.validate().is_ok());
    }
}
