pub mod file_lock;
pub mod prompt;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use ewc::{
    Config, CredentialStore, JsonCredentialStore, MAX_WAIT_SECS, NetworkManager, TimeoutConfig,
};

use crate::file_lock::acquire_store_lock;
use crate::prompt::TerminalPrompter;

#[derive(Parser, Debug)]
#[command(name = "ewc")]
#[command(version)]
#[command(about = "Scan for and join Wi-Fi networks through NetworkManager")]
#[command(override_usage = "ewc | ewc [OPTIONS] <COMMAND>")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Saved networks file [default: ~/.saved_networks.json]
    #[arg(long, value_name = "PATH", env = "EWC_SAVED_NETWORKS", global = true)]
    pub store: Option<PathBuf>,

    /// Seconds to wait for scan results
    #[arg(
        long,
        value_name = "SECS",
        global = true,
        value_parser = clap::value_parser!(u64).range(..=MAX_WAIT_SECS)
    )]
    pub scan_wait: Option<u64>,

    /// Seconds to wait for the connection to come up
    #[arg(
        long,
        value_name = "SECS",
        global = true,
        value_parser = clap::value_parser!(u64).range(..=MAX_WAIT_SECS)
    )]
    pub timeout: Option<u64>,

    /// List networks that hide their SSID
    #[arg(long, global = true)]
    pub hidden: bool,

    /// Log protocol steps to stderr
    #[arg(short, long, action = ArgAction::SetTrue, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Turns on the Wi-Fi radio
    On,
    /// Turns off the Wi-Fi radio
    Off,
    /// Forgets the password saved for SSID
    Forget { ssid: Option<String> },
    /// Connects to SSID without scanning
    Connect { ssid: String },
}

impl Args {
    /// Builds the library configuration from flags and environment.
    pub fn config(&self) -> anyhow::Result<Config> {
        let config = match &self.store {
            Some(path) => Config::new(path),
            None => Config::from_home()?,
        };

        let mut timeouts = TimeoutConfig::new();
        if let Some(secs) = self.scan_wait {
            timeouts = timeouts.with_scan_wait(Duration::from_secs(secs));
        }
        if let Some(secs) = self.timeout {
            timeouts = timeouts.with_connection_timeout(Duration::from_secs(secs));
        }

        Ok(config
            .with_timeouts(timeouts)
            .with_hidden_networks(self.hidden))
    }
}

fn init_logger(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = env_logger::try_init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, default),
    );
}

/// Exit status for a command line that clap did not accept. Help and
/// version output are successful runs.
pub fn parse_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
        _ => 1,
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            std::process::exit(parse_exit_code(e.kind()));
        }
    };
    init_logger(args.verbose);

    match &args.command {
        Some(Command::On) => {
            ewc::set_wifi_radio(true)?;
            println!("Wi-Fi Enabled.");
        }
        Some(Command::Off) => {
            ewc::set_wifi_radio(false)?;
            println!("Wi-Fi Disabled.");
        }
        Some(Command::Forget { ssid }) => {
            let ssid = ssid
                .as_deref()
                .context("Please provide an SSID to forget.")?;
            let config = args.config()?;
            let _lock = acquire_store_lock(&config.store_path)?;
            JsonCredentialStore::new(&config.store_path).forget(ssid)?;
            println!("Success.\nForgotten network: {ssid}");
        }
        Some(Command::Connect { ssid }) => {
            let config = args.config()?;
            let _lock = acquire_store_lock(&config.store_path)?;
            runtime()?.block_on(connect(config, Some(ssid)))?;
        }
        None => {
            let config = args.config()?;
            let _lock = acquire_store_lock(&config.store_path)?;
            runtime()?.block_on(connect(config, None))?;
        }
    }

    Ok(())
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")
}

async fn connect(config: Config, ssid: Option<&str>) -> anyhow::Result<()> {
    let store = JsonCredentialStore::new(&config.store_path);
    let prompter = TerminalPrompter::new();
    let scan_wait = config.timeouts.scan_wait;
    let nm = NetworkManager::new(config)
        .await
        .context("Failed to connect to NetworkManager")?;

    let joined = match ssid {
        Some(ssid) => {
            eprintln!("Connecting to '{ssid}' directly, nearby networks are not scanned.");
            nm.connect_ssid(ssid, &store, &prompter).await?
        }
        None => {
            eprintln!("Scanning for networks ({}s)...", scan_wait.as_secs());
            nm.connect_interactive(&store, &prompter).await?
        }
    };

    println!("Successfully connected to: {}", joined.access_point.ssid);
    Ok(())
}
