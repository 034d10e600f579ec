//! Run configuration: where to send, and how much fits in one request.
//!
//! ## Limits
//!
//! Webhook endpoints enforce two independent caps:
//!
//! - message length: text longer than this is rejected outright
//! - attachments per request: extra files are dropped or rejected
//!
//! The defaults match Discord webhooks (2000 characters, 10 files). Both are
//! measured in whole units, characters as Unicode scalar values, so a limit
//! of zero can never make progress and is refused.
//!
//! ## Endpoint
//!
//! The endpoint is read once at startup, normally from
//! [`ENDPOINT_ENV`], and validated before any input is touched.

use reqwest::Url;

use crate::{Error, Result};

/// Default maximum message length in Unicode scalar values.
pub const MAX_CONTENT_LENGTH: usize = 2000;

/// Default maximum number of files per request.
pub const MAX_FILES: usize = 10;

/// Environment variable holding the webhook URL.
pub const ENDPOINT_ENV: &str = "DISCORD_WEBHOOK_URL";

/// Per-request size limits.
///
/// # Examples
///
/// ```rust
/// use courier::Limits;
///
/// let limits = Limits::default();
/// assert_eq!(limits.max_content_len(), 2000);
/// assert_eq!(limits.max_files(), 10);
///
/// assert!(Limits::new(0, 10).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    max_content_len: usize,
    max_files: usize,
}

impl Limits {
    /// Create limits, rejecting zeros.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLimit`] if either value is zero.
    pub fn new(max_content_len: usize, max_files: usize) -> Result<Self> {
        if max_content_len == 0 {
            return Err(Error::InvalidLimit {
                name: "max content length",
                value: max_content_len,
            });
        }
        if max_files == 0 {
            return Err(Error::InvalidLimit {
                name: "max files",
                value: max_files,
            });
        }
        Ok(Self {
            max_content_len,
            max_files,
        })
    }

    /// Maximum chunk length in Unicode scalar values.
    #[must_use]
    pub const fn max_content_len(&self) -> usize {
        self.max_content_len
    }

    /// Maximum files per batch.
    #[must_use]
    pub const fn max_files(&self) -> usize {
        self.max_files
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_content_len: MAX_CONTENT_LENGTH,
            max_files: MAX_FILES,
        }
    }
}

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Webhook URL.
    pub endpoint: Url,
    /// Per-request limits.
    pub limits: Limits,
}

impl Config {
    /// Build a configuration from an optional endpoint string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingEndpoint`] if `endpoint` is absent or blank,
    /// and [`Error::InvalidEndpoint`] if it is not an absolute URL.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use courier::{Config, Error, Limits};
    ///
    /// let config = Config::new(Some("https://example.com/hook"), Limits::default()).unwrap();
    /// assert_eq!(config.endpoint.host_str(), Some("example.com"));
    ///
    /// assert!(matches!(
    ///     Config::new(None, Limits::default()),
    ///     Err(Error::MissingEndpoint { .. })
    /// ));
    /// ```
    pub fn new(endpoint: Option<&str>, limits: Limits) -> Result<Self> {
        let raw = endpoint
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(Error::MissingEndpoint { var: ENDPOINT_ENV })?;

        let endpoint = Url::parse(raw).map_err(|e| Error::InvalidEndpoint {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { endpoint, limits })
    }

    /// Build a configuration from [`ENDPOINT_ENV`] and default limits.
    ///
    /// # Errors
    ///
    /// See [`Config::new`].
    pub fn from_env() -> Result<Self> {
        Self::new(std::env::var(ENDPOINT_ENV).ok().as_deref(), Limits::default())
    }
}
