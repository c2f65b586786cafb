//! Wi-Fi scanning and access point enumeration.
//!
//! NetworkManager scans asynchronously and offers no completion reply to
//! `RequestScan`, so results are read after a fixed grace period.

use futures_timer::Delay;
use log::{debug, warn};
use std::time::Duration;
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::bus::NetworkBus;
use crate::constants::timeouts::bounded_wait;
use crate::models::{AccessPoint, ScanReport, SkippedAccessPoint};

/// Asks the device to scan. Failure is returned to the caller as is.
pub(crate) async fn request_scan<B: NetworkBus + ?Sized>(
    bus: &B,
    device: &OwnedObjectPath,
) -> Result<()> {
    bus.request_scan(device).await?;
    debug!("Scan requested on {}", device.as_str());
    Ok(())
}

/// Reads every access point the device currently reports.
///
/// An access point with an unreadable property is left out and recorded in
/// [`ScanReport::skipped`]; enumeration carries on with the rest. Hidden
/// networks are dropped unless `include_hidden` is set. Order follows the
/// daemon and repeated SSIDs are kept.
pub(crate) async fn list_access_points<B: NetworkBus + ?Sized>(
    bus: &B,
    device: &OwnedObjectPath,
    include_hidden: bool,
) -> Result<ScanReport> {
    let paths = bus.access_point_paths(device).await?;
    let mut report = ScanReport::default();

    for ap_path in paths {
        let ap = match read_access_point(bus, &ap_path).await {
            Ok(ap) => ap,
            Err(e) => {
                warn!("Skipping access point {}: {e}", ap_path.as_str());
                report.skipped.push(SkippedAccessPoint {
                    path: ap_path.to_string(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if ap.is_hidden() && !include_hidden {
            debug!("Skipping hidden access point {}", ap_path.as_str());
            report.skipped.push(SkippedAccessPoint {
                path: ap_path.to_string(),
                reason: "hidden network".into(),
            });
            continue;
        }

        report.access_points.push(ap);
    }

    debug!(
        "Scan found {} access point(s), skipped {}",
        report.access_points.len(),
        report.skipped.len()
    );
    Ok(report)
}

/// Requests a scan, waits `grace`, then lists the results.
pub(crate) async fn scan<B: NetworkBus + ?Sized>(
    bus: &B,
    device: &OwnedObjectPath,
    grace: Duration,
    include_hidden: bool,
) -> Result<ScanReport> {
    request_scan(bus, device).await?;
    Delay::new(bounded_wait(grace)).await;
    debug!("Scan wait complete");
    list_access_points(bus, device, include_hidden).await
}

async fn read_access_point<B: NetworkBus + ?Sized>(
    bus: &B,
    path: &OwnedObjectPath,
) -> Result<AccessPoint> {
    let ssid = bus.access_point_ssid(path).await?;
    let strength = bus.access_point_strength(path).await?;
    let flags = bus.access_point_flags(path).await?;
    Ok(AccessPoint::new(path.as_str(), ssid, strength, flags))
}
