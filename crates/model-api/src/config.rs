//! Server configuration from environment variables.

use model_store::EngineSettings;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BLOCKED_HOSTS: &str = "airbus.com";
const DEFAULT_ENGINE_STEP_MS: u64 = 500;

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// Runtime settings for the model API process.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    /// Base for `Location` headers; the request `Host` is used when unset.
    pub public_url: Option<String>,
    /// Data source hosts (and their subdomains) the service cannot reach.
    pub blocked_hosts: Vec<String>,
    /// Run the simulated engine that moves new jobs to a terminal status.
    pub simulate_engine: bool,
    pub engine: EngineSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            public_url: None,
            blocked_hosts: split_hosts(DEFAULT_BLOCKED_HOSTS),
            simulate_engine: false,
            engine: EngineSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Read `MODELS_LISTEN` (or `PORT`), `MODELS_PUBLIC_URL`, `MODELS_BLOCKED_HOSTS`,
    /// `MODELS_SIMULATE_ENGINE`, `MODELS_ENGINE_STEP_MS`, `MODELS_ENGINE_FAILURE_RATE`.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(addr) = lookup("MODELS_LISTEN") {
            cfg.listen = addr.parse().map_err(|_| ConfigLoadError::InvalidValue {
                var: "MODELS_LISTEN",
                value: addr,
            })?;
        } else if let Some(port) = lookup("PORT") {
            let port: u16 = port.parse().map_err(|_| ConfigLoadError::InvalidValue {
                var: "PORT",
                value: port,
            })?;
            cfg.listen.set_port(port);
        }

        cfg.public_url = lookup("MODELS_PUBLIC_URL")
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty());

        if let Some(hosts) = lookup("MODELS_BLOCKED_HOSTS") {
            cfg.blocked_hosts = split_hosts(&hosts);
        }

        if let Some(flag) = lookup("MODELS_SIMULATE_ENGINE") {
            cfg.simulate_engine = match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => {
                    return Err(ConfigLoadError::InvalidValue {
                        var: "MODELS_SIMULATE_ENGINE",
                        value: flag,
                    })
                }
            };
        }

        let step_ms = match lookup("MODELS_ENGINE_STEP_MS") {
            Some(v) => v.parse().map_err(|_| ConfigLoadError::InvalidValue {
                var: "MODELS_ENGINE_STEP_MS",
                value: v,
            })?,
            None => DEFAULT_ENGINE_STEP_MS,
        };
        cfg.engine.step = Duration::from_millis(step_ms);

        if let Some(rate) = lookup("MODELS_ENGINE_FAILURE_RATE") {
            cfg.engine.failure_rate = rate
                .parse::<f64>()
                .ok()
                .filter(|r| (0.0..=1.0).contains(r))
                .ok_or(ConfigLoadError::InvalidValue {
                    var: "MODELS_ENGINE_FAILURE_RATE",
                    value: rate,
                })?;
        }

        Ok(cfg)
    }
}

fn split_hosts(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|h| h.trim().to_ascii_lowercase())
        .filter(|h| !h.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigLoadError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.listen, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(cfg.blocked_hosts, vec!["airbus.com".to_string()]);
        assert!(!cfg.simulate_engine);
        assert!(cfg.public_url.is_none());
        assert_eq!(cfg.engine.step, Duration::from_millis(500));
    }

    #[test]
    fn port_and_listen() {
        let cfg = load(&[("PORT", "9000")]).unwrap();
        assert_eq!(cfg.listen.port(), 9000);
        let cfg = load(&[("PORT", "9000"), ("MODELS_LISTEN", "127.0.0.1:7000")]).unwrap();
        assert_eq!(cfg.listen, "127.0.0.1:7000".parse().unwrap());
        assert!(load(&[("PORT", "eighty")]).is_err());
    }

    #[test]
    fn engine_and_hosts() {
        let cfg = load(&[
            ("MODELS_SIMULATE_ENGINE", "true"),
            ("MODELS_ENGINE_STEP_MS", "20"),
            ("MODELS_ENGINE_FAILURE_RATE", "0.25"),
            ("MODELS_BLOCKED_HOSTS", " Example.org , ,internal.net"),
            ("MODELS_PUBLIC_URL", "https://api.example.com/"),
        ])
        .unwrap();
        assert!(cfg.simulate_engine);
        assert_eq!(cfg.engine.step, Duration::from_millis(20));
        assert_eq!(cfg.engine.failure_rate, 0.25);
        assert_eq!(
            cfg.blocked_hosts,
            vec!["example.org".to_string(), "internal.net".to_string()]
        );
        assert_eq!(cfg.public_url.as_deref(), Some("https://api.example.com"));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(load(&[("MODELS_SIMULATE_ENGINE", "maybe")]).is_err());
        assert!(load(&[("MODELS_ENGINE_FAILURE_RATE", "1.5")]).is_err());
        assert!(load(&[("MODELS_ENGINE_STEP_MS", "-1")]).is_err());
    }
}
