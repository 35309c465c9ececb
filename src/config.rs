//! Command line configuration.
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::reconcile::{self, Layout};

/// Periodically removes systemd scope units and their runtime state leaked by
/// deleted Kubernetes pods.
#[derive(Debug, Clone, Parser)]
#[command(name = "scope-reaper", version, about)]
pub struct Config {
    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// How often a cleanup pass runs (e.g. `30s`, `10m`, `1h`)
    #[arg(long, default_value = "10m", value_parser = parse_interval)]
    pub check_interval: Duration,

    /// Run a single pass and exit
    #[arg(long)]
    pub once: bool,

    /// systemd runtime directory holding transient unit state
    #[arg(long, default_value = reconcile::DEFAULT_SESSION_ROOT)]
    pub session_root: PathBuf,

    /// kubelet directory holding one entry per live pod
    #[arg(long, default_value = reconcile::DEFAULT_PODS_ROOT)]
    pub pods_root: PathBuf,

    /// Description file inside a scope's drop-in directory
    #[arg(long, default_value = reconcile::DEFAULT_DESCRIPTION_FILE)]
    pub description_file: String,

    /// systemctl binary used to list and stop units
    #[arg(long, default_value = "systemctl")]
    pub systemctl: PathBuf,
}

impl Config {
    pub fn layout(&self) -> Layout {
        Layout {
            session_root: self.session_root.clone(),
            pods_root: self.pods_root.clone(),
            description_file: self.description_file.clone(),
        }
    }

    /// Default log level derived from `--verbose`.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }
}

fn parse_interval(src: &str) -> Result<Duration, String> {
    let interval = humantime::parse_duration(src).map_err(|err| err.to_string())?;
    if interval.is_zero() {
        return Err("check interval must be greater than zero".to_owned());
    }
    Ok(interval)
}
