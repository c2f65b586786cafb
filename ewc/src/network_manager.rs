use log::{debug, info, warn};
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::bus::{DbusBus, NetworkBus};
use crate::config::Config;
use crate::connection::{activate, connect_access_point};
use crate::credentials::{
    CredentialStore, lookup_or_prompt, persist_after_success, resolve_password,
};
use crate::device::find_wireless_device;
use crate::models::{AccessPoint, ConnectionError, NmState, ScanReport};
use crate::prompt::Prompter;
use crate::scan::{list_access_points, request_scan, scan};
use crate::state_wait::await_activated;
use crate::wifi_builders::ConnectionSettings;

/// Title of the network picker.
pub const SELECT_TITLE: &str = "Select Wi-Fi Network";

/// Asked when the chosen network hides its SSID.
pub const SSID_PROMPT: &str = "Enter SSID:";

/// What a successful connection attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joined {
    /// The network that was joined.
    pub access_point: AccessPoint,
    /// Whether the password was written to the credential store.
    pub password_saved: bool,
}

/// High-level interface to NetworkManager.
///
/// Runs one connection attempt at a time, top to bottom: locate the Wi-Fi
/// device, scan, let the user choose, resolve the password, activate and
/// wait, then save the password.
///
/// # Example
///
/// ```no_run
/// use ewc::{Config, NetworkManager};
///
/// # async fn example() -> ewc::Result<()> {
/// let nm = NetworkManager::new(Config::from_home()?).await?;
/// let device = nm.find_wireless_device().await?;
/// for ap in nm.scan(&device).await?.access_points {
///     println!("{}", ap.label());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct NetworkManager<B = DbusBus> {
    bus: B,
    config: Config,
}

impl NetworkManager<DbusBus> {
    /// Creates a `NetworkManager` connected to the system D-Bus.
    pub async fn new(config: Config) -> Result<Self> {
        Ok(Self::with_bus(DbusBus::system().await?, config))
    }
}

impl<B: NetworkBus> NetworkManager<B> {
    /// Creates a `NetworkManager` over any [`NetworkBus`].
    pub fn with_bus(bus: B, config: Config) -> Self {
        Self { bus, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The bus this manager talks to.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Reads NetworkManager's global state.
    pub async fn daemon_state(&self) -> Result<NmState> {
        Ok(NmState::from(self.bus.daemon_state().await?))
    }

    /// Returns the path of the first Wi-Fi device.
    pub async fn find_wireless_device(&self) -> Result<OwnedObjectPath> {
        find_wireless_device(&self.bus, self.config.enumeration).await
    }

    /// Requests a scan on `device` without waiting for results.
    pub async fn request_scan(&self, device: &OwnedObjectPath) -> Result<()> {
        request_scan(&self.bus, device).await
    }

    /// Lists the access points `device` currently sees, without scanning.
    pub async fn list_access_points(&self, device: &OwnedObjectPath) -> Result<ScanReport> {
        list_access_points(&self.bus, device, self.config.include_hidden).await
    }

    /// Requests a scan, waits the configured grace period and lists results.
    pub async fn scan(&self, device: &OwnedObjectPath) -> Result<ScanReport> {
        scan(
            &self.bus,
            device,
            self.config.timeouts.scan_wait,
            self.config.include_hidden,
        )
        .await
    }

    /// Creates and activates a connection, returning the active connection.
    pub async fn activate(
        &self,
        settings: ConnectionSettings,
        device: &OwnedObjectPath,
        specific_object: &OwnedObjectPath,
    ) -> Result<OwnedObjectPath> {
        activate(&self.bus, settings, device, specific_object).await
    }

    /// Polls `active` until it is activated or the configured timeout passes.
    pub async fn await_activated(&self, active: &OwnedObjectPath) -> bool {
        await_activated(&self.bus, active, &self.config.timeouts).await
    }

    /// Connects `device` to `ap` with `password` and waits for activation.
    pub async fn connect(
        &self,
        device: &OwnedObjectPath,
        ap: &AccessPoint,
        password: &str,
    ) -> Result<()> {
        connect_access_point(&self.bus, &self.config.timeouts, device, ap, password).await
    }

    /// Runs the full scan, select and connect flow.
    ///
    /// Choosing a hidden network asks for its SSID, which is then used for
    /// the profile and as the credential store key.
    ///
    /// # Errors
    ///
    /// Fails on any bus error, when no Wi-Fi device or access point is
    /// found, when a prompt fails, or with `ActivationFailed` when the
    /// connection does not come up in time. Failing to save the password
    /// afterwards is only logged.
    pub async fn connect_interactive(
        &self,
        store: &dyn CredentialStore,
        prompter: &dyn Prompter,
    ) -> Result<Joined> {
        match self.daemon_state().await {
            Ok(state) => info!("NetworkManager is {state}"),
            Err(e) => warn!("Could not read NetworkManager state: {e}"),
        }

        let device = self.find_wireless_device().await?;
        let report = self.scan(&device).await?;
        if report.access_points.is_empty() {
            return Err(ConnectionError::NoAccessPoints);
        }

        let labels: Vec<String> =
            report.access_points.iter().map(AccessPoint::label).collect();
        let choice = prompter.select_one(SELECT_TITLE, &labels)?;
        let mut ap = report
            .access_points
            .get(choice)
            .cloned()
            .ok_or_else(|| ConnectionError::Prompt(format!("no network at index {choice}")))?;
        if ap.is_hidden() {
            let ssid = prompter.prompt_text(SSID_PROMPT)?;
            if ssid.is_empty() {
                return Err(ConnectionError::Prompt(
                    "no SSID entered for hidden network".into(),
                ));
            }
            ap = ap.with_ssid(&ssid);
        }
        debug!("Selected '{}' at {}", ap.ssid, ap.path);

        let password = resolve_password(&ap, store, prompter)?;
        self.connect(&device, &ap, &password).await?;

        let password_saved = persist_after_success(store, &ap.ssid, &password);
        Ok(Joined {
            access_point: ap,
            password_saved,
        })
    }

    /// Connects to `ssid` without scanning.
    ///
    /// Uses the saved password or asks for one. An empty password makes the
    /// attempt an open-network one. NetworkManager picks the access point.
    pub async fn connect_ssid(
        &self,
        ssid: &str,
        store: &dyn CredentialStore,
        prompter: &dyn Prompter,
    ) -> Result<Joined> {
        let device = self.find_wireless_device().await?;

        let password = lookup_or_prompt(ssid, store, prompter)?;
        if password.is_empty() {
            info!("No password entered, treating '{ssid}' as unencrypted");
        }

        let ap = AccessPoint::unscanned(ssid, !password.is_empty());
        self.connect(&device, &ap, &password).await?;

        let password_saved = persist_after_success(store, ssid, &password);
        Ok(Joined {
            access_point: ap,
            password_saved,
        })
    }
}
