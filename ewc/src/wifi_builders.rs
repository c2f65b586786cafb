//! NetworkManager connection settings builder.
//!
//! Constructs the D-Bus settings dictionary passed to NetworkManager's
//! `AddAndActivateConnection` method.
//!
//! # NetworkManager Settings Structure
//!
//! A connection is represented as a nested dictionary:
//! - `connection`: General settings (type, id, uuid, autoconnect)
//! - `802-11-wireless`: Wi-Fi specific settings (ssid, mode, security reference)
//! - `802-11-wireless-security`: Security settings (key-mgmt, psk)
//! - `ipv4` / `ipv6`: IP configuration ("auto" for DHCP/SLAAC)

use std::collections::HashMap;
use zvariant::Value;

use crate::constants::settings;
use crate::models::AccessPoint;

/// One settings section: key to typed value.
pub type SettingsSection = HashMap<&'static str, Value<'static>>;

/// A complete settings document: section name to section.
pub type ConnectionSettings = HashMap<&'static str, SettingsSection>;

/// Builds the `802-11-wireless` section with SSID and mode.
fn base_wifi_section(ssid: &[u8], hidden: bool) -> SettingsSection {
    let mut s = HashMap::new();
    s.insert("ssid", Value::from(ssid.to_vec()));
    s.insert("mode", Value::from(settings::MODE_INFRASTRUCTURE));
    if hidden {
        s.insert("hidden", Value::from(true));
    }
    s
}

/// Builds the `connection` section with type, id, uuid, and autoconnect.
fn base_connection_section(ssid: &str) -> SettingsSection {
    let mut s = HashMap::new();
    s.insert("type", Value::from(settings::WIRELESS));
    s.insert("id", Value::from(ssid.to_string()));
    s.insert("uuid", Value::from(uuid::Uuid::new_v4().to_string()));
    s.insert("autoconnect", Value::from(true));
    s
}

fn auto_ip_section() -> SettingsSection {
    let mut s = HashMap::new();
    s.insert("method", Value::from(settings::IP_METHOD_AUTO));
    s
}

/// Builds the `802-11-wireless-security` section for WPA-PSK networks.
fn build_psk_security(psk: &str) -> SettingsSection {
    let mut sec = HashMap::new();
    sec.insert("key-mgmt", Value::from(settings::KEY_MGMT_PSK));
    sec.insert("psk", Value::from(psk.to_string()));
    sec
}

/// Builds a complete Wi-Fi connection settings dictionary.
///
/// The security section is emitted only when the access point has the
/// privacy flag set *and* `password` is non-empty. An empty password always
/// yields an open-network profile, which lets the user force an
/// unencrypted attempt.
///
/// # Sections Created
///
/// - `connection`: Always present
/// - `802-11-wireless`: Always present
/// - `ipv4` / `ipv6`: Always present
/// - `802-11-wireless-security`: Secured access point with a password
pub fn build_wifi_connection(ap: &AccessPoint, password: &str) -> ConnectionSettings {
    let mut conn: ConnectionSettings = HashMap::new();

    conn.insert(settings::CONNECTION, base_connection_section(&ap.ssid));
    conn.insert(settings::WIRELESS, base_wifi_section(&ap.ssid_bytes, ap.is_hidden()));
    conn.insert(settings::IPV4, auto_ip_section());
    conn.insert(settings::IPV6, auto_ip_section());

    if ap.requires_security() && !password.is_empty() {
        // point wireless at security section
        if let Some(w) = conn.get_mut(settings::WIRELESS) {
            w.insert("security", Value::from(settings::WIRELESS_SECURITY));
        }
        conn.insert(settings::WIRELESS_SECURITY, build_psk_security(password));
    }

    conn
}
