//! Scan for and join Wi-Fi networks through NetworkManager.
//!
//! This crate drives NetworkManager over the system D-Bus to run a single
//! Wi-Fi connection attempt:
//!
//! - Locating the wireless device
//! - Requesting a scan and listing access points
//! - Building connection settings for open and WPA-PSK networks
//! - Activating the connection and polling until it is up
//! - Remembering passwords in a small JSON file
//!
//! # Example
//!
//! ```no_run
//! use ewc::{Config, JsonCredentialStore, NetworkManager, Prompter};
//!
//! # async fn example(prompter: &dyn Prompter) -> ewc::Result<()> {
//! let config = Config::from_home()?;
//! let store = JsonCredentialStore::new(&config.store_path);
//! let nm = NetworkManager::new(config).await?;
//!
//! let joined = nm.connect_interactive(&store, prompter).await?;
//! println!("Connected to {}", joined.access_point.ssid);
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return `Result<T, ConnectionError>`. Bus failures carry the
//! name of the call that failed; a connection that never comes up is
//! reported as `ActivationFailed`.
//!
//! # Logging
//!
//! This crate uses the [`log`](https://docs.rs/log) facade. To see log
//! output, install a logger such as `env_logger` in the binary.

// Internal implementation modules
mod connection;
mod constants;
mod device;
mod proxies;
mod scan;
mod state_wait;
mod utils;

// Public API modules
pub mod bus;
pub mod config;
pub mod credentials;
pub mod models;
pub mod network_manager;
pub mod prompt;
pub mod radio;
pub mod saved_networks;
pub mod wifi_builders;

// Re-exported public API
pub use bus::{DbusBus, NetworkBus};
pub use config::{Config, EnumerationPolicy, MAX_WAIT_SECS, TimeoutConfig};
pub use credentials::{CredentialStore, resolve_password};
pub use models::{
    AccessPoint, ActiveConnectionState, ApFlags, ConnectionError, NmState, SavedNetwork,
    ScanReport, SkippedAccessPoint,
};
pub use network_manager::{Joined, NetworkManager};
pub use prompt::Prompter;
pub use radio::set_wifi_radio;
pub use saved_networks::JsonCredentialStore;
pub use wifi_builders::{ConnectionSettings, build_wifi_connection};

/// Re-exported so callers can name D-Bus object paths.
pub use zvariant::OwnedObjectPath;

/// A specialized `Result` type for network operations.
pub type Result<T> = std::result::Result<T, ConnectionError>;
