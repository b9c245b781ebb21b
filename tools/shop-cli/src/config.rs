//! CLI configuration.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use shop_commerce::api::{DEFAULT_ORDERS_URL, DEFAULT_PRODUCTS_URL};
use shop_commerce::cart::StockPolicy;
use shop_observability::{LogConfig, LogFormat, LogLevel};

/// Environment variable overriding `services.products_url`.
pub const PRODUCTS_URL_ENV: &str = "PRODUCTS_API_BASE_URL";
/// Environment variable overriding `services.orders_url`.
pub const ORDERS_URL_ENV: &str = "ORDER_API_BASE_URL";

/// Config file names looked up from the working directory upwards.
pub const CONFIG_NAMES: [&str; 3] = ["shop.toml", ".shop.toml", "shop.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CliConfig {
    /// Upstream service locations.
    #[serde(default)]
    pub services: ServicesConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Cart behavior.
    #[serde(default)]
    pub cart: CartConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content, is_json(path))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn parse(content: &str, json: bool) -> Result<Self> {
        let config: Self = if json {
            serde_json::from_str(content)?
        } else {
            toml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values no request could work with.
    pub fn validate(&self) -> Result<()> {
        if self.services.timeout_secs == 0 {
            bail!("services.timeout_secs must be at least 1");
        }
        Ok(())
    }

    /// Apply `PRODUCTS_API_BASE_URL` and `ORDER_API_BASE_URL`.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(PRODUCTS_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.services.products_url = url;
        }
        if let Some(url) = lookup(ORDERS_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.services.orders_url = url;
        }
    }

    pub fn stock_policy(&self) -> StockPolicy {
        if self.cart.enforce_stock {
            StockPolicy::Enforce
        } else {
            StockPolicy::Ignore
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "json")
}

/// Where the catalog and order services live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServicesConfig {
    #[serde(default = "default_products_url")]
    pub products_url: String,

    #[serde(default = "default_orders_url")]
    pub orders_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ServicesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_products_url() -> String {
    DEFAULT_PRODUCTS_URL.to_string()
}

fn default_orders_url() -> String {
    DEFAULT_ORDERS_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            products_url: default_products_url(),
            orders_url: default_orders_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Logging configuration. `RUST_LOG` wins over `level`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,

    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

fn default_log_format() -> LogFormat {
    LogFormat::Human
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Logging setup for a run, lowered to debug with `--verbose`.
    pub fn to_log_config(&self, verbose: bool) -> LogConfig {
        let level = if verbose {
            self.level.min(LogLevel::Debug)
        } else {
            self.level
        };
        LogConfig::new(level, self.format)
    }
}

/// Cart configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartConfig {
    /// Refuse to add more units than the catalog has in stock.
    #[serde(default = "default_true")]
    pub enforce_stock: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            enforce_stock: true,
        }
    }
}

/// Generate a default shop.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Shopfront client configuration

[services]
products_url = "{products}"
orders_url = "{orders}"
timeout_secs = 10

[logging]
# trace, debug, info, warn or error. RUST_LOG takes precedence.
level = "info"
format = "human"

[cart]
enforce_stock = true
"#,
        products = DEFAULT_PRODUCTS_URL,
        orders = DEFAULT_ORDERS_URL,
    )
}
