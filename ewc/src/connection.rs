//! Activating a connection and waiting for it to come up.

use log::{debug, info};
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::bus::NetworkBus;
use crate::config::TimeoutConfig;
use crate::models::{AccessPoint, ConnectionError, object_path};
use crate::state_wait::await_activated;
use crate::wifi_builders::{ConnectionSettings, build_wifi_connection};

/// Submits `settings` with `AddAndActivateConnection` and returns the path
/// of the resulting active connection.
///
/// `specific_object` is an access point path, or `/` to let NetworkManager
/// choose one. A rejection is final for this attempt; nothing is retried.
pub(crate) async fn activate<B: NetworkBus + ?Sized>(
    bus: &B,
    settings: ConnectionSettings,
    device: &OwnedObjectPath,
    specific_object: &OwnedObjectPath,
) -> Result<OwnedObjectPath> {
    let (settings_path, active) = bus
        .add_and_activate_connection(settings, device, specific_object)
        .await?;
    debug!(
        "Created connection {} with active connection {}",
        settings_path.as_str(),
        active.as_str()
    );
    Ok(active)
}

/// Builds settings for `ap`, activates them on `device` and waits for the
/// connection to be established.
///
/// # Errors
///
/// Returns the activation error as is, or `ActivationFailed` if the
/// connection is not activated within `timeouts.connection_timeout`.
pub(crate) async fn connect_access_point<B: NetworkBus + ?Sized>(
    bus: &B,
    timeouts: &TimeoutConfig,
    device: &OwnedObjectPath,
    ap: &AccessPoint,
    password: &str,
) -> Result<()> {
    debug!(
        "Connecting to '{}' | secured={} password_given={}",
        ap.ssid,
        ap.requires_security(),
        !password.is_empty()
    );

    let settings = build_wifi_connection(ap, password);
    let specific_object = object_path(&ap.path)?;
    let active = activate(bus, settings, device, &specific_object).await?;

    if await_activated(bus, &active, timeouts).await {
        info!("Successfully connected to '{}'", ap.ssid);
        Ok(())
    } else {
        Err(ConnectionError::ActivationFailed {
            ssid: ap.ssid.clone(),
        })
    }
}
