//! JSON file of saved Wi-Fi passwords.
//!
//! The file holds a pretty-printed array of `{ "ssid", "password" }`
//! objects. It is read and rewritten whole on every change; a missing file
//! is an empty store.

use log::debug;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::Result;
use crate::credentials::CredentialStore;
use crate::models::{ConnectionError, SavedNetwork};

/// [`CredentialStore`] backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonCredentialStore {
    path: PathBuf,
}

impl JsonCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every saved network. A missing or empty file yields an empty list.
    pub fn load(&self) -> Result<Vec<SavedNetwork>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(ConnectionError::Store {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&data)?)
    }

    fn write(&self, networks: &[SavedNetwork]) -> Result<()> {
        let mut json = serde_json::to_vec_pretty(networks)?;
        json.push(b'\n');

        let store_err = |source| ConnectionError::Store {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(store_err)?;
        }

        let mut file = open_private(&self.path).map_err(store_err)?;
        file.write_all(&json).map_err(store_err)?;
        debug!(
            "Wrote {} saved network(s) to {}",
            networks.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> io::Result<fs::File> {
    fs::File::create(path)
}

impl CredentialStore for JsonCredentialStore {
    fn lookup(&self, ssid: &str) -> Result<Option<String>> {
        Ok(self
            .load()?
            .into_iter()
            .find(|n| n.ssid == ssid)
            .map(|n| n.password))
    }

    fn save(&self, ssid: &str, password: &str) -> Result<()> {
        let mut networks = self.load()?;

        match networks.iter_mut().find(|n| n.ssid == ssid) {
            Some(existing) => existing.password = password.to_string(),
            None => networks.push(SavedNetwork {
                ssid: ssid.to_string(),
                password: password.to_string(),
            }),
        }

        self.write(&networks)
    }

    fn forget(&self, ssid: &str) -> Result<()> {
        let mut networks = self.load()?;

        let Some(pos) = networks.iter().position(|n| n.ssid == ssid) else {
            return Err(ConnectionError::SsidNotSaved(ssid.to_string()));
        };
        networks.remove(pos);

        self.write(&networks)
    }
}
