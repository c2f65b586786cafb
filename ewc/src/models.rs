use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use thiserror::Error;
use zvariant::OwnedObjectPath;

use crate::constants::{active_state, nm_state};
use crate::utils::{bars_from_strength, decode_ssid_or_hidden};

bitflags! {
    /// `NM80211ApFlags` as reported by the `Flags` access point property.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ApFlags: u32 {
        /// The access point requires authentication and encryption.
        const PRIVACY = 0x1;
        const WPS = 0x2;
        const WPS_PBC = 0x4;
        const WPS_PIN = 0x8;
    }
}

/// A Wi-Fi access point seen during a scan.
///
/// Values are a snapshot taken at scan time; strength and flags may be stale
/// by the time a connection is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPoint {
    /// D-Bus object path of the access point.
    pub path: String,
    /// SSID decoded for display.
    pub ssid: String,
    /// SSID exactly as broadcast.
    pub ssid_bytes: Vec<u8>,
    /// Signal strength as percentage (0-100).
    pub strength: u8,
    pub flags: ApFlags,
    /// The access point does not broadcast its SSID.
    pub hidden: bool,
}

impl AccessPoint {
    /// Builds an access point from raw property values.
    pub fn new(path: impl Into<String>, ssid_bytes: Vec<u8>, strength: u8, flags: u32) -> Self {
        Self {
            path: path.into(),
            ssid: decode_ssid_or_hidden(&ssid_bytes).into_owned(),
            hidden: ssid_bytes.is_empty(),
            ssid_bytes,
            strength,
            flags: ApFlags::from_bits_retain(flags),
        }
    }

    /// Describes a network known only by name, used for direct connections
    /// where no scan took place.
    pub fn unscanned(ssid: &str, secured: bool) -> Self {
        let flags = if secured {
            ApFlags::PRIVACY
        } else {
            ApFlags::empty()
        };
        Self {
            path: crate::constants::dbus_names::WILDCARD_PATH.to_string(),
            ssid: ssid.to_string(),
            ssid_bytes: ssid.as_bytes().to_vec(),
            strength: 0,
            flags,
            hidden: false,
        }
    }

    /// Names a hidden access point with the SSID the user supplied.
    ///
    /// The access point stays marked hidden so the profile asks
    /// NetworkManager to probe for it.
    pub fn with_ssid(mut self, ssid: &str) -> Self {
        self.ssid = ssid.to_string();
        self.ssid_bytes = ssid.as_bytes().to_vec();
        self
    }

    /// Returns `true` if flag bit 0 (privacy) is set.
    pub fn requires_security(&self) -> bool {
        self.flags.contains(ApFlags::PRIVACY)
    }

    /// Returns `true` for networks that do not broadcast their SSID.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Label shown in the network picker.
    pub fn label(&self) -> String {
        format!(
            "{} (Strength: {}) {}",
            self.ssid,
            self.strength,
            bars_from_strength(self.strength)
        )
    }
}

/// An access point left out of a scan result, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedAccessPoint {
    pub path: String,
    pub reason: String,
}

/// Result of one scan: the usable access points in daemon order plus the
/// diagnostics collected for the ones that were skipped.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub access_points: Vec<AccessPoint>,
    pub skipped: Vec<SkippedAccessPoint>,
}

/// A stored SSID/password pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedNetwork {
    pub ssid: String,
    pub password: String,
}

/// NetworkManager active connection state.
///
/// These values represent the lifecycle states of an active connection
/// as reported by the NM D-Bus API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveConnectionState {
    /// Connection state is unknown.
    Unknown,
    /// Connection is activating (connecting).
    Activating,
    /// Connection is fully activated (connected).
    Activated,
    /// Connection is deactivating (disconnecting).
    Deactivating,
    /// Connection is fully deactivated (disconnected).
    Deactivated,
    /// Unknown state code not mapped to a specific variant.
    Other(u32),
}

impl From<u32> for ActiveConnectionState {
    fn from(code: u32) -> Self {
        match code {
            active_state::UNKNOWN => Self::Unknown,
            active_state::ACTIVATING => Self::Activating,
            active_state::ACTIVATED => Self::Activated,
            active_state::DEACTIVATING => Self::Deactivating,
            active_state::DEACTIVATED => Self::Deactivated,
            v => Self::Other(v),
        }
    }
}

impl Display for ActiveConnectionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Activating => write!(f, "activating"),
            Self::Activated => write!(f, "activated"),
            Self::Deactivating => write!(f, "deactivating"),
            Self::Deactivated => write!(f, "deactivated"),
            Self::Other(v) => write!(f, "unknown state ({v})"),
        }
    }
}

/// Global NetworkManager state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NmState {
    Unknown,
    Asleep,
    Disconnected,
    Disconnecting,
    Connecting,
    ConnectedLocal,
    ConnectedSite,
    ConnectedGlobal,
    Other(u32),
}

impl From<u32> for NmState {
    fn from(code: u32) -> Self {
        match code {
            nm_state::UNKNOWN => Self::Unknown,
            nm_state::ASLEEP => Self::Asleep,
            nm_state::DISCONNECTED => Self::Disconnected,
            nm_state::DISCONNECTING => Self::Disconnecting,
            nm_state::CONNECTING => Self::Connecting,
            nm_state::CONNECTED_LOCAL => Self::ConnectedLocal,
            nm_state::CONNECTED_SITE => Self::ConnectedSite,
            nm_state::CONNECTED_GLOBAL => Self::ConnectedGlobal,
            v => Self::Other(v),
        }
    }
}

impl Display for NmState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "status is unknown"),
            Self::Asleep => write!(f, "sleeping"),
            Self::Disconnected => write!(f, "disconnected"),
            Self::Disconnecting => write!(f, "disconnecting"),
            Self::Connecting => write!(f, "connecting"),
            Self::ConnectedLocal => write!(f, "connected to a local network"),
            Self::ConnectedSite => write!(f, "connected to a site network"),
            Self::ConnectedGlobal => write!(f, "connected globally"),
            Self::Other(v) => write!(f, "in an unknown state ({v})"),
        }
    }
}

/// Errors that can occur during network operations.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// A D-Bus communication error occurred.
    #[error("D-Bus error: {0}")]
    Dbus(#[from] zbus::Error),

    /// A D-Bus operation failed, with context about what was attempted.
    #[error("{context}: {source}")]
    DbusOperation {
        context: String,
        #[source]
        source: zbus::Error,
    },

    /// A property was missing or had an unexpected type.
    #[error("invalid D-Bus value: {0}")]
    Variant(#[from] zvariant::Error),

    /// No Wi-Fi device was found on the system.
    #[error("no Wi-Fi device found")]
    NoWifiDevice,

    /// The scan finished without any usable access point.
    #[error("no Wi-Fi networks found")]
    NoAccessPoints,

    /// The connection never reached the activated state before the deadline.
    #[error("connection to '{ssid}' was not established, wrong password maybe?")]
    ActivationFailed { ssid: String },

    /// `forget` was asked for an SSID the store does not contain.
    #[error("SSID '{0}' not found")]
    SsidNotSaved(String),

    /// The user's home directory could not be determined.
    #[error("unable to find the home directory")]
    NoHomeDir,

    /// Reading or writing the credential store failed.
    #[error("credential store {path}: {source}")]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The credential store holds malformed JSON.
    #[error("malformed credential store: {0}")]
    StoreFormat(#[from] serde_json::Error),

    /// Toggling the Wi-Fi radio failed.
    #[error("failed to {action} wifi: {output}")]
    Radio { action: &'static str, output: String },

    /// An interactive prompt failed or was aborted.
    #[error("prompt failed: {0}")]
    Prompt(String),
}

impl ConnectionError {
    /// Wraps a D-Bus error with a description of the failed operation.
    pub(crate) fn dbus(context: impl Into<String>) -> impl FnOnce(zbus::Error) -> Self {
        let context = context.into();
        move |source| Self::DbusOperation { context, source }
    }
}

/// Converts an object path string into the owned D-Bus form.
pub(crate) fn object_path(path: &str) -> crate::Result<OwnedObjectPath> {
    Ok(OwnedObjectPath::try_from(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_state_from_u32() {
        assert_eq!(ActiveConnectionState::from(1), ActiveConnectionState::Activating);
        assert_eq!(ActiveConnectionState::from(2), ActiveConnectionState::Activated);
        assert_eq!(ActiveConnectionState::from(9), ActiveConnectionState::Other(9));
    }

    #[test]
    fn nm_state_display() {
        assert_eq!(NmState::from(70).to_string(), "connected globally");
        assert_eq!(NmState::from(20), NmState::Disconnected);
        assert_eq!(NmState::from(99), NmState::Other(99));
    }

    #[test]
    fn privacy_bit_drives_security() {
        let secured = AccessPoint::new("/ap/1", b"HomeNet".to_vec(), 80, 0x1);
        let open = AccessPoint::new("/ap/2", b"OpenCafe".to_vec(), 40, 0x0);
        let wps_only = AccessPoint::new("/ap/3", b"Printer".to_vec(), 40, 0x2);

        assert!(secured.requires_security());
        assert!(!open.requires_security());
        assert!(!wps_only.requires_security());
    }

    #[test]
    fn unknown_flag_bits_are_retained() {
        let ap = AccessPoint::new("/ap/1", b"x".to_vec(), 1, 0x101);
        assert_eq!(ap.flags.bits(), 0x101);
        assert!(ap.requires_security());
    }

    #[test]
    fn unscanned_access_point_uses_wildcard_path() {
        let ap = AccessPoint::unscanned("Office", true);
        assert_eq!(ap.path, "/");
        assert_eq!(ap.ssid_bytes, b"Office");
        assert!(ap.requires_security());
    }

    #[test]
    fn naming_a_hidden_access_point_keeps_it_hidden() {
        let ap = AccessPoint::new("/ap/4", Vec::new(), 60, 0x1);
        assert!(ap.is_hidden());
        assert_eq!(ap.ssid, "<Hidden Network>");

        let named = ap.with_ssid("Attic");
        assert_eq!(named.ssid, "Attic");
        assert_eq!(named.ssid_bytes, b"Attic");
        assert_eq!(named.path, "/ap/4");
        assert!(named.is_hidden());
        assert!(named.requires_security());
    }

    #[test]
    fn label_includes_strength() {
        let ap = AccessPoint::new("/ap/1", b"HomeNet".to_vec(), 80, 0x1);
        assert_eq!(ap.label(), "HomeNet (Strength: 80) ▂▄▆█");
    }
}
