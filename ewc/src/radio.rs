//! Turning the Wi-Fi radio on and off with `nmcli`.

use log::debug;
use std::process::Command;

use crate::Result;
use crate::models::ConnectionError;

/// Runs `nmcli radio wifi on|off`.
///
/// # Errors
///
/// Returns `Radio` with the combined stdout/stderr when `nmcli` cannot be
/// started or exits unsuccessfully.
pub fn set_wifi_radio(enabled: bool) -> Result<()> {
    let (arg, action) = if enabled {
        ("on", "enable")
    } else {
        ("off", "disable")
    };

    debug!("Running nmcli radio wifi {arg}");
    let output = Command::new("nmcli")
        .args(["radio", "wifi", arg])
        .output()
        .map_err(|e| ConnectionError::Radio {
            action,
            output: e.to_string(),
        })?;

    if output.status.success() {
        return Ok(());
    }

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    Err(ConnectionError::Radio {
        action,
        output: format!("{}, output: {}", output.status, combined.trim()),
    })
}
