//! Constants for NetworkManager D-Bus interface values.
//!
//! These constants correspond to the numeric codes used by NetworkManager's
//! D-Bus API for device types, connection states and access point flags.

/// Well-known D-Bus object paths.
pub mod dbus_names {
    /// Passed as `specific_object` to let NetworkManager pick the access point.
    pub const WILDCARD_PATH: &str = "/";
}

/// NetworkManager device type constants.
pub mod device_type {
    pub const WIFI: u32 = 2;
}

/// `NMActiveConnectionState` values.
pub mod active_state {
    pub const UNKNOWN: u32 = 0;
    pub const ACTIVATING: u32 = 1;
    pub const ACTIVATED: u32 = 2;
    pub const DEACTIVATING: u32 = 3;
    pub const DEACTIVATED: u32 = 4;
}

/// Global `NMState` values.
pub mod nm_state {
    pub const UNKNOWN: u32 = 0;
    pub const ASLEEP: u32 = 10;
    pub const DISCONNECTED: u32 = 20;
    pub const DISCONNECTING: u32 = 30;
    pub const CONNECTING: u32 = 40;
    pub const CONNECTED_LOCAL: u32 = 50;
    pub const CONNECTED_SITE: u32 = 60;
    pub const CONNECTED_GLOBAL: u32 = 70;
}

/// Connection settings section names and values.
pub mod settings {
    pub const CONNECTION: &str = "connection";
    pub const WIRELESS: &str = "802-11-wireless";
    pub const WIRELESS_SECURITY: &str = "802-11-wireless-security";
    pub const IPV4: &str = "ipv4";
    pub const IPV6: &str = "ipv6";

    pub const MODE_INFRASTRUCTURE: &str = "infrastructure";
    pub const KEY_MGMT_PSK: &str = "wpa-psk";
    pub const IP_METHOD_AUTO: &str = "auto";
}

/// Timeout and delay defaults
pub mod timeouts {
    use std::time::Duration;

    pub const SCAN_WAIT_SECONDS: u64 = 10;
    pub const CONNECTION_TIMEOUT_SECONDS: u64 = 5;
    pub const CONNECTION_POLL_INTERVAL_MS: u64 = 500;
    pub const READ_ERROR_BACKOFF_MS: u64 = 1000;
    /// Upper bound on any single wait; longer values are clamped.
    pub const MAX_WAIT_SECONDS: u64 = 24 * 60 * 60;

    pub fn scan_wait() -> Duration {
        Duration::from_secs(SCAN_WAIT_SECONDS)
    }

    pub fn connection_timeout() -> Duration {
        Duration::from_secs(CONNECTION_TIMEOUT_SECONDS)
    }

    pub fn connection_poll_interval() -> Duration {
        Duration::from_millis(CONNECTION_POLL_INTERVAL_MS)
    }

    pub fn read_error_backoff() -> Duration {
        Duration::from_millis(READ_ERROR_BACKOFF_MS)
    }

    /// Clamps `wait` to [`MAX_WAIT_SECONDS`] so it can be added to an
    /// `Instant` without overflowing.
    pub fn bounded_wait(wait: Duration) -> Duration {
        wait.min(Duration::from_secs(MAX_WAIT_SECONDS))
    }
}

/// Signal strength thresholds for bar display
pub mod signal_strength {
    pub const BAR_1_MAX: u8 = 24;
    pub const BAR_2_MIN: u8 = BAR_1_MAX + 1;
    pub const BAR_2_MAX: u8 = 49;
    pub const BAR_3_MIN: u8 = BAR_2_MAX + 1;
    pub const BAR_3_MAX: u8 = 74;
}
