//! Server configuration loaded from environment variables.

use application::ports::DEFAULT_LINK_BASE;

/// Server configuration with defaults for local runs.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default `"0.0.0.0"`)
/// - `PORT`: listen port (default `3000`)
/// - `RUST_LOG`: tracing filter directive (default `"info"`)
/// - `WEBHOOK_SECRET`: key of the HMAC-SHA256 body signature webhook calls
///   carry in `x-signature`
/// - `PAYMENT_LINK_BASE`: base URL of card payment links
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub webhook_secret: Option<String>,
    pub payment_link_base: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            webhook_secret: lookup("WEBHOOK_SECRET").filter(|s| !s.trim().is_empty()),
            payment_link_base: lookup("PAYMENT_LINK_BASE").unwrap_or(defaults.payment_link_base),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            webhook_secret: None,
            payment_link_base: DEFAULT_LINK_BASE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert!(config.webhook_secret.is_none());
        assert_eq!(config.payment_link_base, DEFAULT_LINK_BASE);
    }

    #[test]
    fn test_reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("WEBHOOK_SECRET", "s3cret"),
            ("PAYMENT_LINK_BASE", "https://pay.test"),
        ]));
        assert_eq!(config.addr(), "0.0.0.0:8080");
        assert_eq!(config.webhook_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.payment_link_base, "https://pay.test");
    }

    #[test]
    fn test_bad_port_and_blank_secret_fall_back() {
        let config = Config::from_lookup(lookup(&[("PORT", "http"), ("WEBHOOK_SECRET", "  ")]));
        assert_eq!(config.port, 3000);
        assert!(config.webhook_secret.is_none());
    }
}
