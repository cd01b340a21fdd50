//! Client configuration parsed from environment variables.
//!
//! The base URL is read once at startup. `GALLERY_API_URL` wins; the
//! `VITE_API_URL` name used by the web build is accepted as a fallback so
//! both front ends can share one `.env` file.

use reqwest::Url;

pub const BASE_URL_VAR: &str = "GALLERY_API_URL";
pub const FALLBACK_BASE_URL_VAR: &str = "VITE_API_URL";
pub const REQUEST_TIMEOUT_VAR: &str = "GALLERY_REQUEST_TIMEOUT_SECS";
pub const CONNECT_TIMEOUT_VAR: &str = "GALLERY_CONNECT_TIMEOUT_SECS";

/// Errors produced while resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing base URL: set {BASE_URL_VAR} or pass --base-url")]
    MissingBaseUrl,

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Optional HTTP timeouts. `None` means wait indefinitely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: Option<u64>,
    pub connect_secs: Option<u64>,
}

impl HttpTimeouts {
    /// Read `GALLERY_REQUEST_TIMEOUT_SECS` and `GALLERY_CONNECT_TIMEOUT_SECS`.
    /// Unset or unparseable values mean no timeout.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            request_secs: env_parse_u64(REQUEST_TIMEOUT_VAR),
            connect_secs: env_parse_u64(CONNECT_TIMEOUT_VAR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryConfig {
    /// Server root without a trailing slash, e.g. `http://localhost:8000`.
    pub base_url: String,
    pub timeouts: HttpTimeouts,
}

impl GalleryConfig {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `GALLERY_API_URL` (or `VITE_API_URL`)
    ///
    /// Optional:
    /// - `GALLERY_REQUEST_TIMEOUT_SECS`: unset means no timeout
    /// - `GALLERY_CONNECT_TIMEOUT_SECS`: unset means no timeout
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL is configured or it is not an
    /// `http`/`https` URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(None)
    }

    /// Like [`Self::from_env`], but `base_url` (from `--base-url`) takes
    /// precedence over the URL variables. Timeouts always come from the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL is available or it is not an
    /// `http`/`https` URL.
    pub fn resolve(base_url: Option<&str>) -> Result<Self, ConfigError> {
        let raw = match base_url {
            Some(url) => url.to_owned(),
            None => std::env::var(BASE_URL_VAR)
                .or_else(|_| std::env::var(FALLBACK_BASE_URL_VAR))
                .map_err(|_| ConfigError::MissingBaseUrl)?,
        };
        let mut config = Self::with_base_url(&raw)?;
        config.timeouts = HttpTimeouts::from_env();
        Ok(config)
    }

    /// Build config from an explicit base URL with no timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is empty or not an `http`/`https` URL.
    pub fn with_base_url(raw: &str) -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(raw)?;
        Ok(Self { base_url, timeouts: HttpTimeouts::default() })
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::MissingBaseUrl);
    }
    let parsed = Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_owned(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(trimmed.to_owned())
}

fn env_parse_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<u64>().ok())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
