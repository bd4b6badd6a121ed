//! Per-fetch connection settings.
//!
//! [`FetchConfig`] is a plain value: every fetch receives one and never sees
//! later changes. Host applications that want a single, mutable,
//! process-wide setting wrap it in a [`SharedFetchConfig`] and let each fetch
//! take a snapshot.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use http::HeaderValue;

use crate::error::FetchError;

/// Default connect timeout (5 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default read timeout (10 seconds).
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(10000);

/// Maximum redirect hops followed when redirects are enabled.
pub const MAX_REDIRECTS: usize = 10;

/// Connection settings applied to one tile fetch.
///
/// Defaults: 5s connect timeout, 10s read timeout, no `User-Agent`, no
/// `Referer`, redirects not followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Upper bound for establishing the connection (including TLS)
    pub connect_timeout: Duration,

    /// Upper bound for each read on the connection
    pub read_timeout: Duration,

    /// `User-Agent` header; `None` sends no header
    pub user_agent: Option<String>,

    /// `Referer` header; `None` sends no header
    pub referer: Option<String>,

    /// Follow 3xx responses instead of failing on them
    pub follow_redirects: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            user_agent: None,
            referer: None,
            follow_redirects: false,
        }
    }
}

impl FetchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the `User-Agent`. An empty string clears it.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = non_empty(user_agent.into());
        self
    }

    /// Set the `Referer`. An empty string clears it.
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = non_empty(referer.into());
        self
    }

    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Check the settings can be applied to a connection.
    ///
    /// Zero timeouts are rejected because they would disable the bound
    /// instead of enforcing one.
    pub fn validate(&self) -> Result<(), FetchError> {
        if self.connect_timeout.is_zero() {
            return Err(FetchError::InvalidConfig(
                "connect timeout must be greater than 0".to_string(),
            ));
        }
        if self.read_timeout.is_zero() {
            return Err(FetchError::InvalidConfig(
                "read timeout must be greater than 0".to_string(),
            ));
        }
        if let Some(ref user_agent) = self.user_agent {
            check_header_value("User-Agent", user_agent)?;
        }
        if let Some(ref referer) = self.referer {
            check_header_value("Referer", referer)?;
        }
        Ok(())
    }

    /// `User-Agent` to send, skipping empty values.
    pub fn user_agent_header(&self) -> Option<&str> {
        self.user_agent.as_deref().filter(|v| !v.is_empty())
    }

    /// `Referer` to send, skipping empty values.
    pub fn referer_header(&self) -> Option<&str> {
        self.referer.as_deref().filter(|v| !v.is_empty())
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn check_header_value(name: &str, value: &str) -> Result<(), FetchError> {
    HeaderValue::from_str(value)
        .map(|_| ())
        .map_err(|e| FetchError::InvalidConfig(format!("invalid {} header value: {}", name, e)))
}

// =============================================================================
// Shared Configuration
// =============================================================================

/// Process-wide fetch settings, set by the host and read by many fetches.
///
/// Updates only affect fetches that take their snapshot afterwards; a fetch
/// already in flight keeps the settings it started with.
#[derive(Debug, Clone, Default)]
pub struct SharedFetchConfig {
    inner: Arc<RwLock<FetchConfig>>,
}

impl SharedFetchConfig {
    pub fn new(config: FetchConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Copy of the current settings.
    pub fn snapshot(&self) -> FetchConfig {
        // A writer can only panic inside `update`'s closure; the value is
        // still a complete FetchConfig, so keep serving it.
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the settings.
    pub fn set(&self, config: FetchConfig) {
        self.update(|current| *current = config);
    }

    /// Modify the settings in place.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut FetchConfig),
    {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard);
    }
}
