use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::CartPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Application settings: TOML file first, then `STOREFRONT_*` environment
/// variables on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Fallback `tracing` filter when `RUST_LOG` is unset
    pub log_filter: String,
    /// Mailbox size of each store actor
    pub mailbox_size: usize,
    pub cart_policy: CartPolicy,
    pub seed_file: Option<PathBuf>,
    pub auth: AuthConfig,
    pub payment: PaymentConfig,
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    pub api_base: String,
    pub secret_key: String,
    pub currency: String,
    pub shop_name: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Without a relay URL receipts are only logged
    pub smtp_url: Option<String>,
    pub from: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:4000".to_string(),
            log_filter: "info".to_string(),
            mailbox_size: 64,
            cart_policy: CartPolicy::default(),
            seed_file: None,
            auth: AuthConfig::default(),
            payment: PaymentConfig::default(),
            mail: MailConfig::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_hours: 24,
        }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.stripe.com".to_string(),
            secret_key: String::new(),
            currency: "usd".to_string(),
            shop_name: "Storefront".to_string(),
            timeout_secs: 15,
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_url: None,
            from: "Storefront <no-reply@localhost>".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads the file at `path` (a missing file means defaults), applies the
    /// process environment and validates the result.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(v) = lookup("STOREFRONT_BIND") {
            self.bind_addr = v;
        }
        if let Some(v) = lookup("STOREFRONT_LOG") {
            self.log_filter = v;
        }
        if let Some(v) = lookup("STOREFRONT_CART_POLICY") {
            self.cart_policy = v.parse().map_err(ConfigError::Invalid)?;
        }
        if let Some(v) = lookup("STOREFRONT_SEED_FILE") {
            self.seed_file = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("STOREFRONT_JWT_SECRET") {
            self.auth.jwt_secret = v;
        }
        if let Some(v) = lookup("STOREFRONT_STRIPE_SECRET") {
            self.payment.secret_key = v;
        }
        if let Some(v) = lookup("STOREFRONT_STRIPE_API_BASE") {
            self.payment.api_base = v;
        }
        if let Some(v) = lookup("STOREFRONT_CURRENCY") {
            self.payment.currency = v;
        }
        if let Some(v) = lookup("STOREFRONT_SHOP_NAME") {
            self.payment.shop_name = v;
        }
        if let Some(v) = lookup("STOREFRONT_SMTP_URL") {
            self.mail.smtp_url = Some(v);
        }
        if let Some(v) = lookup("STOREFRONT_MAIL_FROM") {
            self.mail.from = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "auth.jwt_secret must be set (or STOREFRONT_JWT_SECRET)".to_string(),
            ));
        }
        if self.mailbox_size == 0 {
            return Err(ConfigError::Invalid("mailbox_size must be greater than zero".to_string()));
        }
        if self.auth.token_ttl_hours <= 0 {
            return Err(ConfigError::Invalid("auth.token_ttl_hours must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = AppConfig::from_file(Path::new("/definitely/not/here.toml")).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:4000");
        assert_eq!(config.cart_policy, CartPolicy::Lenient);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_then_environment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            bind_addr = "127.0.0.1:8080"
            cart_policy = "strict"

            [auth]
            jwt_secret = "from-file"

            [payment]
            shop_name = "Tienda"
            "#
        )
        .unwrap();

        let mut config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.cart_policy, CartPolicy::Strict);
        assert_eq!(config.payment.shop_name, "Tienda");
        assert_eq!(config.payment.currency, "usd");

        let env: HashMap<&str, &str> = HashMap::from([
            ("STOREFRONT_JWT_SECRET", "from-env"),
            ("STOREFRONT_CART_POLICY", "lenient"),
        ]);
        config.apply_env(|key| env.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.auth.jwt_secret, "from-env");
        assert_eq!(config.cart_policy, CartPolicy::Lenient);
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        config.validate().unwrap();
    }

    #[test]
    fn test_bad_policy_in_environment() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(|key| (key == "STOREFRONT_CART_POLICY").then(|| "sometimes".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
