//! Runtime configuration.
//!
//! A [`Config`] is built once at startup and handed to
//! [`NetworkManager`](crate::NetworkManager); nothing in the crate reads
//! process-wide state after that.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Result;
use crate::constants::timeouts;
use crate::models::ConnectionError;

/// Longest wait, in seconds, that [`TimeoutConfig`] values are honoured up
/// to. Anything longer is clamped.
pub const MAX_WAIT_SECS: u64 = timeouts::MAX_WAIT_SECONDS;

/// File name of the credential store inside the home directory.
pub const STORE_FILE_NAME: &str = ".saved_networks.json";

/// How to treat a device whose type cannot be read while looking for the
/// wireless device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumerationPolicy {
    /// Log the failure and keep looking.
    #[default]
    SkipUnreadable,
    /// Fail the lookup with the read error.
    AbortOnError,
}

/// Waits and deadlines used while scanning and connecting.
///
/// # Example
///
/// ```
/// use ewc::TimeoutConfig;
/// use std::time::Duration;
///
/// let t = TimeoutConfig::new()
///     .with_scan_wait(Duration::from_secs(3))
///     .with_connection_timeout(Duration::from_secs(30));
/// assert_eq!(t.connection_timeout, Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Grace period between requesting a scan and reading results.
    pub scan_wait: Duration,
    /// Wall-clock budget for the active connection to reach "activated".
    pub connection_timeout: Duration,
    /// Pause between state reads that succeeded but were not "activated".
    pub poll_interval: Duration,
    /// Pause after a failed state read.
    pub read_error_backoff: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            scan_wait: timeouts::scan_wait(),
            connection_timeout: timeouts::connection_timeout(),
            poll_interval: timeouts::connection_poll_interval(),
            read_error_backoff: timeouts::read_error_backoff(),
        }
    }
}

impl TimeoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scan_wait(mut self, wait: Duration) -> Self {
        self.scan_wait = wait;
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_read_error_backoff(mut self, backoff: Duration) -> Self {
        self.read_error_backoff = backoff;
        self
    }
}

/// Top-level configuration for a connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Location of the JSON credential store.
    pub store_path: PathBuf,
    pub timeouts: TimeoutConfig,
    pub enumeration: EnumerationPolicy,
    /// Keep access points with an empty SSID in scan results.
    pub include_hidden: bool,
}

impl Config {
    /// Creates a configuration with default timeouts and the given store path.
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            timeouts: TimeoutConfig::default(),
            enumeration: EnumerationPolicy::default(),
            include_hidden: false,
        }
    }

    /// Creates a configuration whose store lives at `~/.saved_networks.json`.
    ///
    /// # Errors
    ///
    /// Returns `NoHomeDir` if the home directory cannot be resolved.
    pub fn from_home() -> Result<Self> {
        let home = dirs::home_dir().ok_or(ConnectionError::NoHomeDir)?;
        Ok(Self::new(store_path_in(&home)))
    }

    pub fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_enumeration(mut self, policy: EnumerationPolicy) -> Self {
        self.enumeration = policy;
        self
    }

    pub fn with_hidden_networks(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }
}

fn store_path_in(home: &Path) -> PathBuf {
    home.join(STORE_FILE_NAME)
}
