//! Server configuration from environment variables, with built-in defaults.

use std::time::Duration;

/// Runtime settings for the web binary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Presentation delay before a bye match resolves.
    pub auto_resolve_delay: Duration,
    /// Sessions not touched for this long are dropped.
    pub inactivity_timeout: Duration,
    /// How often the idle sweep runs.
    pub cleanup_interval: Duration,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_auto_resolve_delay_ms() -> u64 {
    200
}

fn default_inactivity_timeout_secs() -> u64 {
    12 * 3600
}

fn default_cleanup_interval_secs() -> u64 {
    30 * 60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            auto_resolve_delay: Duration::from_millis(default_auto_resolve_delay_ms()),
            inactivity_timeout: Duration::from_secs(default_inactivity_timeout_secs()),
            cleanup_interval: Duration::from_secs(default_cleanup_interval_secs()),
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT`, `AUTO_RESOLVE_DELAY_MS`, `INACTIVITY_TIMEOUT_SECS`, `CLEANUP_INTERVAL_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with any key → value source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST")
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(default_host);
        Self {
            host,
            port: parse_or(&lookup, "PORT", default_port()),
            auto_resolve_delay: Duration::from_millis(parse_or(
                &lookup,
                "AUTO_RESOLVE_DELAY_MS",
                default_auto_resolve_delay_ms(),
            )),
            inactivity_timeout: Duration::from_secs(parse_or(
                &lookup,
                "INACTIVITY_TIMEOUT_SECS",
                default_inactivity_timeout_secs(),
            )),
            cleanup_interval: Duration::from_secs(parse_or(
                &lookup,
                "CLEANUP_INTERVAL_SECS",
                default_cleanup_interval_secs(),
            )),
        }
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {}={:?}, using default", key, raw);
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        assert_eq!(ServerConfig::from_lookup(|_| None), ServerConfig::default());
    }

    #[test]
    fn reads_values_and_ignores_garbage() {
        let cfg = ServerConfig::from_lookup(lookup_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "not-a-port"),
            ("AUTO_RESOLVE_DELAY_MS", "0"),
        ]));
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.auto_resolve_delay, Duration::ZERO);
    }
}
