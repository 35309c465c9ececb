//! Access to the systemd process manager.
//!
//! Reconcilers talk to systemd through the [`UnitManager`] trait; [`Systemctl`]
//! is the production implementation shelling out to `systemctl`.
use std::ffi::OsString;
use std::process::{Command, Output};

mod error;

pub use error::{Error, Result};

/// Status bullets `systemctl` prints in front of failed or inactive units.
const STATUS_BULLETS: [&str; 3] = ["●", "○", "*"];

/// Queries and stops units of the process manager.
pub trait UnitManager {
    /// Returns the raw listing of all loaded units, one unit per line.
    fn list_units(&self) -> Result<String>;

    /// Stops `unit`. For transient units this drops all resident state.
    fn stop_unit(&self, unit: &str) -> Result<()>;
}

/// [`UnitManager`] backed by the `systemctl` binary.
#[derive(Debug, Clone)]
pub struct Systemctl {
    program: OsString,
}

impl Systemctl {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        let command = format!("{} {}", self.program.to_string_lossy(), args.join(" "));
        log::trace!("Running `{command}`");

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| Error::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::ExitStatus {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        Ok(output)
    }
}

impl UnitManager for Systemctl {
    fn list_units(&self) -> Result<String> {
        let args = ["list-units", "--all", "--no-legend", "--no-pager"];
        let output = self.run(&args)?;
        String::from_utf8(output.stdout).map_err(|source| Error::InvalidOutput {
            command: format!("{} {}", self.program.to_string_lossy(), args.join(" ")),
            source,
        })
    }

    fn stop_unit(&self, unit: &str) -> Result<()> {
        self.run(&["stop", unit]).map(|_| ())
    }
}

/// Extracts the unit names from a unit listing.
///
/// The unit name is the first whitespace-delimited field of each line. Blank
/// lines are skipped, as is a leading status bullet.
pub fn unit_names(listing: &str) -> impl Iterator<Item = &str> {
    listing.lines().filter_map(|line| {
        let mut fields = line.split_whitespace();
        match fields.next()? {
            bullet if STATUS_BULLETS.contains(&bullet) => fields.next(),
            name => Some(name),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_names() {
        let listing = "\
run-abc.scope    loaded active running Kubernetes transient mount
  kubelet.service loaded active running kubelet

● run-def.scope  loaded failed failed  Kubernetes transient mount
   \t
";
        let names: Vec<_> = unit_names(listing).collect();
        assert_eq!(
            names,
            vec!["run-abc.scope", "kubelet.service", "run-def.scope"]
        );
    }

    #[test]
    fn test_unit_names_empty() {
        assert_eq!(unit_names("").count(), 0);
        assert_eq!(unit_names("\n\n").count(), 0);
        assert_eq!(unit_names("●\n").count(), 0);
    }

    #[test]
    #[cfg(target_family = "unix")]
    fn test_systemctl_stop_success() {
        let systemctl = Systemctl::new("true");
        systemctl.stop_unit("run-abc.scope").unwrap();
    }

    #[test]
    #[cfg(target_family = "unix")]
    fn test_systemctl_exit_status_error() {
        let systemctl = Systemctl::new("false");
        let err = systemctl.list_units().unwrap_err();
        assert!(matches!(err, Error::ExitStatus { .. }));
        let err = systemctl.stop_unit("run-abc.scope").unwrap_err();
        assert!(matches!(err, Error::ExitStatus { .. }));
    }

    #[test]
    fn test_systemctl_spawn_error() {
        let systemctl = Systemctl::new("/definitely/does/not/exist/systemctl");
        let err = systemctl.list_units().unwrap_err();
        match err {
            Error::Spawn { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound)
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
