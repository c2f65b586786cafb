//! Scripted stand-ins for NetworkManager, the user and the credential store.

#![allow(dead_code)]

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use ewc::{
    Config, ConnectionError, ConnectionSettings, CredentialStore, NetworkBus, OwnedObjectPath,
    Prompter, Result, TimeoutConfig,
};

pub const WIFI_DEVICE: &str = "/org/freedesktop/NetworkManager/Devices/3";
pub const ACTIVE_PATH: &str = "/org/freedesktop/NetworkManager/ActiveConnection/7";
pub const SETTINGS_PATH: &str = "/org/freedesktop/NetworkManager/Settings/12";

pub fn path(p: &str) -> OwnedObjectPath {
    OwnedObjectPath::try_from(p).unwrap()
}

pub fn bus_error(msg: &str) -> ConnectionError {
    ConnectionError::Dbus(zbus::Error::Failure(msg.into()))
}

/// Config with short waits so tests run quickly.
pub fn fast_config() -> Config {
    Config::new("/nonexistent/saved_networks.json").with_timeouts(
        TimeoutConfig::new()
            .with_scan_wait(Duration::ZERO)
            .with_connection_timeout(Duration::from_secs(2))
            .with_poll_interval(Duration::from_millis(10))
            .with_read_error_backoff(Duration::from_millis(20)),
    )
}

/// One scripted answer to a state read.
#[derive(Debug, Clone, Copy)]
pub enum StateRead {
    Ok(u32),
    Fail,
    Hang,
}

pub const ACTIVATING: StateRead = StateRead::Ok(1);
pub const ACTIVATED: StateRead = StateRead::Ok(2);
pub const DEACTIVATED: StateRead = StateRead::Ok(4);

#[derive(Debug, Clone)]
pub struct FakeAp {
    pub path: String,
    pub ssid: Option<Vec<u8>>,
    pub strength: Option<u8>,
    pub flags: Option<u32>,
}

impl FakeAp {
    pub fn new(path: &str, ssid: &str, strength: u8, flags: u32) -> Self {
        Self {
            path: path.into(),
            ssid: Some(ssid.as_bytes().to_vec()),
            strength: Some(strength),
            flags: Some(flags),
        }
    }
}

/// In-memory NetworkManager.
///
/// State reads are served from `states` in order; once the script runs out
/// the last entry repeats.
#[derive(Default)]
pub struct FakeBus {
    /// `(path, device type)`; `None` makes the type read fail.
    pub devices: Vec<(String, Option<u32>)>,
    pub access_points: Vec<FakeAp>,
    pub fail_scan: bool,
    pub fail_activation: bool,
    pub daemon_state: u32,
    pub states: Mutex<VecDeque<StateRead>>,
    pub last_state: Mutex<Option<StateRead>>,
    pub scan_requests: AtomicUsize,
    pub state_reads: AtomicUsize,
    pub submitted: Mutex<Vec<(ConnectionSettings, String, String)>>,
}

impl FakeBus {
    /// A bus with one Wi-Fi device next to an ethernet one.
    pub fn with_wifi() -> Self {
        Self {
            devices: vec![
                ("/org/freedesktop/NetworkManager/Devices/1".into(), Some(1)),
                (WIFI_DEVICE.into(), Some(2)),
            ],
            daemon_state: 20,
            ..Self::default()
        }
    }

    pub fn access_point(mut self, ap: FakeAp) -> Self {
        self.access_points.push(ap);
        self
    }

    pub fn states(self, reads: impl IntoIterator<Item = StateRead>) -> Self {
        self.states.lock().unwrap().extend(reads);
        self
    }

    pub fn state_reads(&self) -> usize {
        self.state_reads.load(Ordering::SeqCst)
    }

    pub fn activations(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }

    /// Removes and returns the only activation request as
    /// `(settings, device, specific_object)`.
    pub fn take_submitted(&self) -> (ConnectionSettings, String, String) {
        let mut submitted = self.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1, "expected exactly one activation");
        submitted.remove(0)
    }

    fn find_ap(&self, p: &OwnedObjectPath) -> Result<&FakeAp> {
        self.access_points
            .iter()
            .find(|ap| ap.path == p.as_str())
            .ok_or_else(|| bus_error("unknown object"))
    }

    fn next_state(&self) -> StateRead {
        let mut last = self.last_state.lock().unwrap();
        let next = self
            .states
            .lock()
            .unwrap()
            .pop_front()
            .or(*last)
            .unwrap_or(ACTIVATING);
        *last = Some(next);
        next
    }
}

#[async_trait]
impl NetworkBus for FakeBus {
    async fn device_paths(&self) -> Result<Vec<OwnedObjectPath>> {
        Ok(self.devices.iter().map(|(p, _)| path(p)).collect())
    }

    async fn device_type(&self, device: &OwnedObjectPath) -> Result<u32> {
        self.devices
            .iter()
            .find(|(p, _)| p == device.as_str())
            .and_then(|(_, t)| *t)
            .ok_or_else(|| bus_error("DeviceType unreadable"))
    }

    async fn request_scan(&self, _device: &OwnedObjectPath) -> Result<()> {
        self.scan_requests.fetch_add(1, Ordering::SeqCst);
        if self.fail_scan {
            return Err(bus_error("scanning not allowed"));
        }
        Ok(())
    }

    async fn access_point_paths(&self, _device: &OwnedObjectPath) -> Result<Vec<OwnedObjectPath>> {
        Ok(self.access_points.iter().map(|ap| path(&ap.path)).collect())
    }

    async fn access_point_ssid(&self, ap: &OwnedObjectPath) -> Result<Vec<u8>> {
        self.find_ap(ap)?
            .ssid
            .clone()
            .ok_or_else(|| bus_error("failed to get SSID"))
    }

    async fn access_point_strength(&self, ap: &OwnedObjectPath) -> Result<u8> {
        self.find_ap(ap)?
            .strength
            .ok_or_else(|| bus_error("failed to get Strength"))
    }

    async fn access_point_flags(&self, ap: &OwnedObjectPath) -> Result<u32> {
        self.find_ap(ap)?
            .flags
            .ok_or_else(|| bus_error("failed to get Flags"))
    }

    async fn add_and_activate_connection(
        &self,
        settings: ConnectionSettings,
        device: &OwnedObjectPath,
        specific_object: &OwnedObjectPath,
    ) -> Result<(OwnedObjectPath, OwnedObjectPath)> {
        if self.fail_activation {
            return Err(bus_error("802-11-wireless-security.psk: property is invalid"));
        }
        self.submitted.lock().unwrap().push((
            settings,
            device.to_string(),
            specific_object.to_string(),
        ));
        Ok((path(SETTINGS_PATH), path(ACTIVE_PATH)))
    }

    async fn active_connection_state(&self, _active: &OwnedObjectPath) -> Result<u32> {
        self.state_reads.fetch_add(1, Ordering::SeqCst);
        match self.next_state() {
            StateRead::Ok(code) => Ok(code),
            StateRead::Fail => Err(bus_error("object does not exist")),
            StateRead::Hang => futures::future::pending().await,
        }
    }

    async fn daemon_state(&self) -> Result<u32> {
        Ok(self.daemon_state)
    }
}

/// Answers prompts from a script and records what was asked.
pub struct ScriptedPrompter {
    pub choice: usize,
    pub secret: String,
    pub text: String,
    pub selections: Cell<usize>,
    pub text_prompts: Cell<usize>,
    pub secret_prompts: Cell<usize>,
    pub offered: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(choice: usize, secret: &str) -> Self {
        Self {
            choice,
            secret: secret.into(),
            text: String::new(),
            selections: Cell::new(0),
            text_prompts: Cell::new(0),
            secret_prompts: Cell::new(0),
            offered: RefCell::new(Vec::new()),
        }
    }

    /// Answer given to plain text prompts.
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.into();
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn select_one(&self, _title: &str, options: &[String]) -> Result<usize> {
        self.selections.set(self.selections.get() + 1);
        *self.offered.borrow_mut() = options.to_vec();
        Ok(self.choice)
    }

    fn prompt_text(&self, _title: &str) -> Result<String> {
        self.text_prompts.set(self.text_prompts.get() + 1);
        Ok(self.text.clone())
    }

    fn prompt_secret(&self, _title: &str) -> Result<String> {
        self.secret_prompts.set(self.secret_prompts.get() + 1);
        Ok(self.secret.clone())
    }
}

/// Credential store in memory, with switches to make it fail.
#[derive(Default)]
pub struct MemoryStore {
    pub entries: RefCell<BTreeMap<String, String>>,
    pub fail_lookup: bool,
    pub fail_save: bool,
}

impl MemoryStore {
    pub fn with(ssid: &str, password: &str) -> Self {
        let store = Self::default();
        store
            .entries
            .borrow_mut()
            .insert(ssid.into(), password.into());
        store
    }

    pub fn get(&self, ssid: &str) -> Option<String> {
        self.entries.borrow().get(ssid).cloned()
    }
}

fn io_failure() -> ConnectionError {
    ConnectionError::Store {
        path: "/nonexistent/saved_networks.json".into(),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    }
}

impl CredentialStore for MemoryStore {
    fn lookup(&self, ssid: &str) -> Result<Option<String>> {
        if self.fail_lookup {
            return Err(io_failure());
        }
        Ok(self.get(ssid))
    }

    fn save(&self, ssid: &str, password: &str) -> Result<()> {
        if self.fail_save {
            return Err(io_failure());
        }
        self.entries
            .borrow_mut()
            .insert(ssid.into(), password.into());
        Ok(())
    }

    fn forget(&self, ssid: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .remove(ssid)
            .map(|_| ())
            .ok_or_else(|| ConnectionError::SsidNotSaved(ssid.into()))
    }
}
