//! The bus seam between the orchestration code and NetworkManager.
//!
//! Every component talks to the daemon through [`NetworkBus`]. [`DbusBus`]
//! is the production implementation over the system D-Bus; tests plug in a
//! scripted bus instead.

use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use zbus::Connection;
use zbus::proxy::CacheProperties;
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::models::ConnectionError;
use crate::proxies::{
    NMAccessPointProxy, NMActiveConnectionProxy, NMDeviceProxy, NMProxy, NMWirelessProxy,
};
use crate::wifi_builders::ConnectionSettings;

/// Method calls and property reads against NetworkManager objects.
#[async_trait]
pub trait NetworkBus: Send + Sync {
    /// Paths of every device known to the daemon.
    async fn device_paths(&self) -> Result<Vec<OwnedObjectPath>>;

    /// The `DeviceType` property of a device.
    async fn device_type(&self, device: &OwnedObjectPath) -> Result<u32>;

    /// Asks a wireless device to start scanning. Returns once the request is
    /// accepted, not when the scan is complete.
    async fn request_scan(&self, device: &OwnedObjectPath) -> Result<()>;

    /// Paths of the access points a wireless device currently sees.
    async fn access_point_paths(&self, device: &OwnedObjectPath) -> Result<Vec<OwnedObjectPath>>;

    async fn access_point_ssid(&self, ap: &OwnedObjectPath) -> Result<Vec<u8>>;

    async fn access_point_strength(&self, ap: &OwnedObjectPath) -> Result<u8>;

    async fn access_point_flags(&self, ap: &OwnedObjectPath) -> Result<u32>;

    /// Creates and activates a connection profile.
    ///
    /// Returns the new settings path and the active connection path.
    async fn add_and_activate_connection(
        &self,
        settings: ConnectionSettings,
        device: &OwnedObjectPath,
        specific_object: &OwnedObjectPath,
    ) -> Result<(OwnedObjectPath, OwnedObjectPath)>;

    /// The `State` property of an active connection.
    async fn active_connection_state(&self, active: &OwnedObjectPath) -> Result<u32>;

    /// The global `State` property of the daemon.
    async fn daemon_state(&self) -> Result<u32>;
}

/// [`NetworkBus`] over a system D-Bus connection.
#[derive(Clone)]
pub struct DbusBus {
    conn: Connection,
}

impl DbusBus {
    /// Connects to the system bus.
    pub async fn system() -> Result<Self> {
        let conn = Connection::system()
            .await
            .map_err(ConnectionError::dbus("failed to connect to the system bus"))?;
        Ok(Self { conn })
    }

    /// Wraps an existing connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    async fn wireless(&self, device: &OwnedObjectPath) -> Result<NMWirelessProxy<'_>> {
        Ok(NMWirelessProxy::builder(&self.conn)
            .path(device.clone())?
            .build()
            .await?)
    }

    async fn access_point(&self, ap: &OwnedObjectPath) -> Result<NMAccessPointProxy<'_>> {
        Ok(NMAccessPointProxy::builder(&self.conn)
            .path(ap.clone())?
            .cache_properties(CacheProperties::No)
            .build()
            .await?)
    }
}

#[async_trait]
impl NetworkBus for DbusBus {
    async fn device_paths(&self) -> Result<Vec<OwnedObjectPath>> {
        let nm = NMProxy::new(&self.conn).await?;
        nm.get_all_devices()
            .await
            .map_err(ConnectionError::dbus("GetAllDevices failed"))
    }

    async fn device_type(&self, device: &OwnedObjectPath) -> Result<u32> {
        let dev = NMDeviceProxy::builder(&self.conn)
            .path(device.clone())?
            .cache_properties(CacheProperties::No)
            .build()
            .await?;
        dev.device_type().await.map_err(ConnectionError::dbus(format!(
            "failed to read DeviceType of {}",
            device.as_str()
        )))
    }

    async fn request_scan(&self, device: &OwnedObjectPath) -> Result<()> {
        let wifi = self.wireless(device).await?;
        wifi.request_scan(HashMap::new())
            .await
            .map_err(ConnectionError::dbus("RequestScan failed"))
    }

    async fn access_point_paths(&self, device: &OwnedObjectPath) -> Result<Vec<OwnedObjectPath>> {
        let wifi = self.wireless(device).await?;
        wifi.get_all_access_points()
            .await
            .map_err(ConnectionError::dbus("GetAllAccessPoints failed"))
    }

    async fn access_point_ssid(&self, ap: &OwnedObjectPath) -> Result<Vec<u8>> {
        let proxy = self.access_point(ap).await?;
        proxy
            .ssid()
            .await
            .map_err(ConnectionError::dbus("failed to get SSID"))
    }

    async fn access_point_strength(&self, ap: &OwnedObjectPath) -> Result<u8> {
        let proxy = self.access_point(ap).await?;
        proxy
            .strength()
            .await
            .map_err(ConnectionError::dbus("failed to get Strength"))
    }

    async fn access_point_flags(&self, ap: &OwnedObjectPath) -> Result<u32> {
        let proxy = self.access_point(ap).await?;
        proxy
            .flags()
            .await
            .map_err(ConnectionError::dbus("failed to get Flags"))
    }

    async fn add_and_activate_connection(
        &self,
        settings: ConnectionSettings,
        device: &OwnedObjectPath,
        specific_object: &OwnedObjectPath,
    ) -> Result<(OwnedObjectPath, OwnedObjectPath)> {
        let nm = NMProxy::new(&self.conn).await?;
        debug!(
            "AddAndActivateConnection on {} via {}",
            device.as_str(),
            specific_object.as_str()
        );
        nm.add_and_activate_connection(settings, device.clone(), specific_object.clone())
            .await
            .map_err(ConnectionError::dbus("AddAndActivateConnection failed"))
    }

    async fn active_connection_state(&self, active: &OwnedObjectPath) -> Result<u32> {
        let proxy = NMActiveConnectionProxy::builder(&self.conn)
            .path(active.clone())?
            .cache_properties(CacheProperties::No)
            .build()
            .await?;
        proxy
            .state()
            .await
            .map_err(ConnectionError::dbus("failed to get connection state"))
    }

    async fn daemon_state(&self) -> Result<u32> {
        let nm = NMProxy::builder(&self.conn)
            .cache_properties(CacheProperties::No)
            .build()
            .await?;
        nm.state()
            .await
            .map_err(ConnectionError::dbus("failed to read NetworkManager state"))
    }
}
