//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use shop_commerce::api::{CatalogClient, OrdersClient};
use shop_observability::TraceContext;

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Environment variable carrying a W3C `traceparent` to join.
pub const TRACEPARENT_ENV: &str = "TRACEPARENT";

/// Execution context for CLI commands.
pub struct Context {
    /// Effective configuration, environment overrides applied.
    pub config: CliConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    pub output: Output,
    pub cwd: PathBuf,
    /// Trace inherited from the caller, if any.
    pub trace_parent: Option<TraceContext>,
}

impl Context {
    /// Load the config from `--config` or the nearest config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (mut config, config_path) = match config_path {
            Some(path) => {
                let path = PathBuf::from(path);
                (CliConfig::load(&path)?, Some(path))
            }
            None => match find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            },
        };
        config.apply_env();
        let trace_parent = trace_parent(|key| std::env::var(key).ok());
        if let Some(parent) = &trace_parent {
            tracing::debug!(trace_id = %parent.trace_id, "joining caller trace");
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
            trace_parent,
        })
    }

    /// Client for the catalog service.
    pub fn catalog(&self) -> CatalogClient {
        let client = CatalogClient::new(&self.config.services.products_url)
            .with_timeout(self.config.services.timeout());
        match &self.trace_parent {
            Some(parent) => client.with_trace_parent(parent.clone()),
            None => client,
        }
    }

    /// Client for the order service.
    pub fn orders(&self) -> OrdersClient {
        let client = OrdersClient::new(&self.config.services.orders_url)
            .with_timeout(self.config.services.timeout());
        match &self.trace_parent {
            Some(parent) => client.with_trace_parent(parent.clone()),
            None => client,
        }
    }
}

/// Nearest config file from `start` upwards.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    })
}

/// Parent trace from `TRACEPARENT`. Malformed values are ignored.
fn trace_parent(lookup: impl Fn(&str) -> Option<String>) -> Option<TraceContext> {
    let raw = lookup(TRACEPARENT_ENV)?;
    let parsed = TraceContext::from_traceparent(&raw);
    if parsed.is_none() {
        tracing::warn!(value = %raw, "ignoring malformed {}", TRACEPARENT_ENV);
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_parent_from_env() {
        let header = "00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01";
        let parent = trace_parent(|key| (key == TRACEPARENT_ENV).then(|| header.to_string()))
            .unwrap();
        assert_eq!(parent.trace_id, "0af7651916cd43dd8448eb211c80319c");
        assert_eq!(parent.span_id, "b7ad6b7169203331");
    }

    #[test]
    fn test_trace_parent_ignores_missing_or_malformed() {
        assert!(trace_parent(|_| None).is_none());
        assert!(trace_parent(|_| Some("garbage".to_string())).is_none());
    }
}
