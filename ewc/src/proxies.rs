//! D-Bus proxy traits for NetworkManager interfaces.
//!
//! These traits define the slice of the NetworkManager D-Bus API this crate
//! talks to. The `zbus::proxy` macro generates the proxy implementations.
//!
//! # NetworkManager D-Bus Structure
//!
//! - `/org/freedesktop/NetworkManager` - Main NM object
//! - `/org/freedesktop/NetworkManager/Devices/*` - Device objects
//! - `/org/freedesktop/NetworkManager/AccessPoint/*` - Access point objects
//! - `/org/freedesktop/NetworkManager/ActiveConnection/*` - Active connection objects

use std::collections::HashMap;
use zbus::{Result, proxy};
use zvariant::OwnedObjectPath;

/// Proxy for the main NetworkManager interface.
#[proxy(
    interface = "org.freedesktop.NetworkManager",
    default_service = "org.freedesktop.NetworkManager",
    default_path = "/org/freedesktop/NetworkManager"
)]
pub trait NM {
    /// Returns paths to all network devices, including ones not yet realized.
    fn get_all_devices(&self) -> Result<Vec<OwnedObjectPath>>;

    /// Overall networking state (`NMState`).
    #[zbus(property)]
    fn state(&self) -> Result<u32>;

    /// Creates a new connection and activates it simultaneously.
    ///
    /// Returns paths to both the new connection settings and active connection.
    fn add_and_activate_connection(
        &self,
        connection: HashMap<&str, HashMap<&str, zvariant::Value<'_>>>,
        device: OwnedObjectPath,
        specific_object: OwnedObjectPath,
    ) -> Result<(OwnedObjectPath, OwnedObjectPath)>;
}

/// Proxy for NetworkManager device interface.
#[proxy(
    interface = "org.freedesktop.NetworkManager.Device",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMDevice {
    /// Device type as a numeric code (2 = Wi-Fi).
    #[zbus(property)]
    fn device_type(&self) -> Result<u32>;
}

/// Proxy for wireless device interface.
///
/// Extends the base device interface with scanning and access point
/// enumeration.
#[proxy(
    interface = "org.freedesktop.NetworkManager.Device.Wireless",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMWireless {
    /// Returns paths to all visible access points, hidden ones included.
    fn get_all_access_points(&self) -> Result<Vec<OwnedObjectPath>>;

    /// Requests a Wi-Fi scan. Options are usually empty.
    fn request_scan(&self, options: HashMap<String, zvariant::Value<'_>>) -> Result<()>;
}

/// Proxy for access point interface.
#[proxy(
    interface = "org.freedesktop.NetworkManager.AccessPoint",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMAccessPoint {
    /// SSID as raw bytes (may not be valid UTF-8).
    #[zbus(property)]
    fn ssid(&self) -> Result<Vec<u8>>;

    /// Signal strength as percentage (0-100).
    #[zbus(property)]
    fn strength(&self) -> Result<u8>;

    /// General capability flags (bit 0 = privacy).
    #[zbus(property)]
    fn flags(&self) -> Result<u32>;
}

/// Proxy for active connection interface.
#[proxy(
    interface = "org.freedesktop.NetworkManager.Connection.Active",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMActiveConnection {
    /// Current state of the active connection.
    ///
    /// Values:
    /// - 0: Unknown
    /// - 1: Activating
    /// - 2: Activated
    /// - 3: Deactivating
    /// - 4: Deactivated
    #[zbus(property)]
    fn state(&self) -> Result<u32>;
}
