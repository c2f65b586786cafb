//! Locating the wireless device.

use log::{debug, warn};
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::bus::NetworkBus;
use crate::config::EnumerationPolicy;
use crate::constants::device_type;
use crate::models::ConnectionError;

/// Finds the first Wi-Fi device known to NetworkManager.
///
/// Walks the daemon's device list once, in order, and returns the first
/// device whose type is `WIFI`. A device whose type cannot be read is either
/// skipped or fails the lookup, depending on `policy`.
///
/// # Errors
///
/// Returns `NoWifiDevice` if no device matches, or the read error under
/// [`EnumerationPolicy::AbortOnError`].
pub(crate) async fn find_wireless_device<B: NetworkBus + ?Sized>(
    bus: &B,
    policy: EnumerationPolicy,
) -> Result<OwnedObjectPath> {
    let devices = bus.device_paths().await?;
    debug!("NetworkManager reports {} device(s)", devices.len());

    for dp in devices {
        let dtype = match bus.device_type(&dp).await {
            Ok(t) => t,
            Err(e) => match policy {
                EnumerationPolicy::AbortOnError => return Err(e),
                EnumerationPolicy::SkipUnreadable => {
                    warn!("Skipping device {}: {e}", dp.as_str());
                    continue;
                }
            },
        };

        if dtype == device_type::WIFI {
            debug!("Found WiFi device: {}", dp.as_str());
            return Ok(dp);
        }
    }

    Err(ConnectionError::NoWifiDevice)
}
