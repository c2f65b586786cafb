//! Deciding which password to use for an access point.

use log::{debug, info, warn};

use crate::Result;
use crate::models::AccessPoint;
use crate::prompt::Prompter;

/// Title of the password prompt.
pub const PASSWORD_PROMPT: &str = "Enter Password:";

/// Keyed storage of Wi-Fi passwords, at most one per SSID.
pub trait CredentialStore {
    /// Returns the password saved for `ssid`, if any.
    fn lookup(&self, ssid: &str) -> Result<Option<String>>;

    /// Saves `password` for `ssid`, replacing any previous one.
    fn save(&self, ssid: &str, password: &str) -> Result<()>;

    /// Removes the password saved for `ssid`.
    ///
    /// # Errors
    ///
    /// Returns `SsidNotSaved` if nothing is stored under `ssid`.
    fn forget(&self, ssid: &str) -> Result<()>;
}

/// Picks the password for `ap`.
///
/// Open access points get an empty password without any prompt. For secured
/// ones the saved password is used when present, otherwise the user is asked.
/// A store that cannot be read is logged and treated as having no entry.
pub fn resolve_password(
    ap: &AccessPoint,
    store: &dyn CredentialStore,
    prompter: &dyn Prompter,
) -> Result<String> {
    if !ap.requires_security() {
        info!("No password required for '{}'", ap.ssid);
        return Ok(String::new());
    }

    lookup_or_prompt(&ap.ssid, store, prompter)
}

/// Saved password for `ssid`, or the user's answer to the password prompt.
pub(crate) fn lookup_or_prompt(
    ssid: &str,
    store: &dyn CredentialStore,
    prompter: &dyn Prompter,
) -> Result<String> {
    match store.lookup(ssid) {
        Ok(Some(saved)) => {
            info!("Using saved password for '{ssid}'");
            return Ok(saved);
        }
        Ok(None) => debug!("No saved password for '{ssid}'"),
        Err(e) => warn!("Could not read saved passwords: {e}"),
    }

    prompter.prompt_secret(PASSWORD_PROMPT)
}

/// Saves a password after a successful connection.
///
/// Empty passwords are not stored. Failures are logged and swallowed: the
/// connection already succeeded.
pub(crate) fn persist_after_success(
    store: &dyn CredentialStore,
    ssid: &str,
    password: &str,
) -> bool {
    if password.is_empty() {
        return false;
    }

    match store.save(ssid, password) {
        Ok(()) => {
            debug!("Saved password for '{ssid}'");
            true
        }
        Err(e) => {
            warn!("Failed to save password for '{ssid}': {e}");
            false
        }
    }
}
