mod common;

use common::{FakeAp, FakeBus, WIFI_DEVICE, fast_config, path};
use ewc::{ConnectionError, EnumerationPolicy, NetworkManager};

fn ap_path(n: u32) -> String {
    format!("/org/freedesktop/NetworkManager/AccessPoint/{n}")
}

#[tokio::test]
async fn finds_wifi_device_after_other_devices() {
    let nm = NetworkManager::with_bus(FakeBus::with_wifi(), fast_config());
    let device = nm.find_wireless_device().await.unwrap();
    assert_eq!(device.as_str(), WIFI_DEVICE);
}

#[tokio::test]
async fn no_wifi_device() {
    let bus = FakeBus {
        devices: vec![("/org/freedesktop/NetworkManager/Devices/1".into(), Some(1))],
        ..FakeBus::default()
    };
    let nm = NetworkManager::with_bus(bus, fast_config());

    let err = nm.find_wireless_device().await.unwrap_err();
    assert!(matches!(err, ConnectionError::NoWifiDevice));
}

#[tokio::test]
async fn unreadable_device_is_skipped_by_default() {
    let bus = FakeBus {
        devices: vec![
            ("/org/freedesktop/NetworkManager/Devices/1".into(), None),
            (WIFI_DEVICE.into(), Some(2)),
        ],
        ..FakeBus::default()
    };
    let nm = NetworkManager::with_bus(bus, fast_config());

    let device = nm.find_wireless_device().await.unwrap();
    assert_eq!(device.as_str(), WIFI_DEVICE);
}

#[tokio::test]
async fn unreadable_device_aborts_when_configured() {
    let bus = FakeBus {
        devices: vec![
            ("/org/freedesktop/NetworkManager/Devices/1".into(), None),
            (WIFI_DEVICE.into(), Some(2)),
        ],
        ..FakeBus::default()
    };
    let config = fast_config().with_enumeration(EnumerationPolicy::AbortOnError);
    let nm = NetworkManager::with_bus(bus, config);

    let err = nm.find_wireless_device().await.unwrap_err();
    assert!(!matches!(err, ConnectionError::NoWifiDevice));
}

#[tokio::test]
async fn unreadable_access_point_is_skipped() {
    let mut broken = FakeAp::new(&ap_path(2), "Broken", 50, 0x0);
    broken.strength = None;
    let bus = FakeBus::with_wifi()
        .access_point(FakeAp::new(&ap_path(1), "First", 70, 0x1))
        .access_point(broken)
        .access_point(FakeAp::new(&ap_path(3), "Third", 30, 0x0));
    let nm = NetworkManager::with_bus(bus, fast_config());

    let report = nm.scan(&path(WIFI_DEVICE)).await.unwrap();

    let names: Vec<&str> = report.access_points.iter().map(|ap| ap.ssid.as_str()).collect();
    assert_eq!(names, ["First", "Third"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, ap_path(2));
    assert!(report.skipped[0].reason.contains("Strength"));
}

#[tokio::test]
async fn repeated_ssids_are_kept_in_order() {
    let bus = FakeBus::with_wifi()
        .access_point(FakeAp::new(&ap_path(1), "Mesh", 40, 0x1))
        .access_point(FakeAp::new(&ap_path(2), "Other", 60, 0x1))
        .access_point(FakeAp::new(&ap_path(3), "Mesh", 90, 0x1));
    let nm = NetworkManager::with_bus(bus, fast_config());

    let report = nm.list_access_points(&path(WIFI_DEVICE)).await.unwrap();

    let seen: Vec<(&str, u8)> = report
        .access_points
        .iter()
        .map(|ap| (ap.ssid.as_str(), ap.strength))
        .collect();
    assert_eq!(seen, [("Mesh", 40), ("Other", 60), ("Mesh", 90)]);
    assert_eq!(nm.bus().scan_requests.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn hidden_networks_are_filtered_by_default() {
    let bus = FakeBus::with_wifi()
        .access_point(FakeAp::new(&ap_path(1), "", 80, 0x1))
        .access_point(FakeAp::new(&ap_path(2), "Visible", 20, 0x0));
    let nm = NetworkManager::with_bus(bus, fast_config());

    let report = nm.scan(&path(WIFI_DEVICE)).await.unwrap();

    assert_eq!(report.access_points.len(), 1);
    assert_eq!(report.access_points[0].ssid, "Visible");
    assert_eq!(report.skipped[0].reason, "hidden network");
}

#[tokio::test]
async fn hidden_networks_can_be_included() {
    let bus = FakeBus::with_wifi().access_point(FakeAp::new(&ap_path(1), "", 80, 0x1));
    let nm = NetworkManager::with_bus(bus, fast_config().with_hidden_networks(true));

    let report = nm.scan(&path(WIFI_DEVICE)).await.unwrap();

    assert_eq!(report.access_points.len(), 1);
    assert!(report.access_points[0].is_hidden());
    assert_eq!(report.access_points[0].ssid, "<Hidden Network>");
}

#[tokio::test]
async fn scan_request_failure_is_returned() {
    let bus = FakeBus {
        fail_scan: true,
        ..FakeBus::with_wifi()
    };
    let nm = NetworkManager::with_bus(bus, fast_config());

    assert!(nm.scan(&path(WIFI_DEVICE)).await.is_err());
    assert!(nm.request_scan(&path(WIFI_DEVICE)).await.is_err());
}
