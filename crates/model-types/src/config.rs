//! Submitted model configuration and its validation.

use serde::{Deserialize, Serialize};
use url::{Host, Url};

/// Where the model reads its data from, and the key to read it with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub data_source: String,
    pub data_api_key: String,
}

impl ModelConfig {
    /// Check the config and return the parsed data source.
    ///
    /// Shape errors (bad URL, missing host parts, blank key) come before the
    /// accessibility check against `blocked_hosts`.
    pub fn validate(&self, blocked_hosts: &[String]) -> Result<Url, ConfigError> {
        let url = Url::parse(self.data_source.trim())
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.data_source, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
        }
        // IP literals carry no domain to check against the block list.
        let domain = match url.host() {
            Some(Host::Domain(d)) => {
                let d = d.to_ascii_lowercase();
                if !d.contains('.') || d.starts_with('.') || d.ends_with('.') {
                    return Err(ConfigError::IncompleteHost(self.data_source.clone()));
                }
                Some(d)
            }
            Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => None,
            None => return Err(ConfigError::IncompleteHost(self.data_source.clone())),
        };
        if self.data_api_key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        if let Some(domain) = domain {
            if is_blocked(&domain, blocked_hosts) {
                return Err(ConfigError::Inaccessible(domain));
            }
        }
        Ok(url)
    }
}

fn is_blocked(domain: &str, blocked_hosts: &[String]) -> bool {
    blocked_hosts.iter().any(|b| {
        let b = b.trim().trim_start_matches('.').to_ascii_lowercase();
        !b.is_empty() && (domain == b || domain.ends_with(&format!(".{}", b)))
    })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("data_source is not a valid URL: {0}")]
    InvalidUrl(String),
    #[error("data_source must use http or https, got {0:?}")]
    UnsupportedScheme(String),
    #[error("data_source host is incomplete: {0}")]
    IncompleteHost(String),
    #[error("data_api_key must not be empty")]
    EmptyApiKey,
    #[error("data source host {0:?} is not accessible")]
    Inaccessible(String),
}

impl ConfigError {
    /// Inaccessible sources are a well-formed request the server cannot serve; every other
    /// variant is a malformed request.
    pub fn is_inaccessible(&self) -> bool {
        matches!(self, ConfigError::Inaccessible(_))
    }
}
