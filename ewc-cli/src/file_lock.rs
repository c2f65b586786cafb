use anyhow::{Context, bail};
use fs2::FileExt;
use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Lock file that sits next to the credential store, e.g.
/// `~/.saved_networks.json.lock`.
pub fn lock_path_for(store: &Path) -> PathBuf {
    let mut name = store
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("saved_networks"));
    name.push(".lock");
    store.with_file_name(name)
}

/// Takes the advisory lock guarding `store`.
///
/// The lock is held until the returned file is dropped.
pub fn acquire_store_lock(store: &Path) -> anyhow::Result<File> {
    let lock_path = lock_path_for(store);
    if let Some(parent) = lock_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let file = File::create(&lock_path)
        .with_context(|| format!("Failed to create lock file {}", lock_path.display()))?;

    // Exclusive lock; fails if another instance holds it
    if file.try_lock_exclusive().is_err() {
        bail!("Another instance of ewc is already running");
    }

    Ok(file)
}
