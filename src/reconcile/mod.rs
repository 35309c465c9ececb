//! Reconciliation of leaked scope state against the live pods.
//!
//! A pass runs in two steps. [`reconcile_directories`] removes drop-in
//! directories whose owning pod is gone, then [`reconcile_units`] stops every
//! scope unit whose drop-in directory no longer exists. A unit is therefore
//! never stopped while its directory is still present.
mod directory;
mod error;
mod unit;

use std::fmt;
use std::path::PathBuf;

pub use directory::{DirectoryStats, reconcile_directories};
pub use error::{Error, Result};
pub use unit::{UnitStats, reconcile_units};

#[cfg(test)]
pub(crate) use directory::tests::{add_scope_dir, layout as test_layout};
#[cfg(test)]
pub(crate) use unit::tests::FakeUnitManager;

/// Default systemd runtime directory holding transient unit state.
pub const DEFAULT_SESSION_ROOT: &str = "/run/systemd/system";
/// Default kubelet pod-state root.
pub const DEFAULT_PODS_ROOT: &str = "/var/lib/kubelet/pods";
/// Default name of the description file inside a scope's drop-in directory.
pub const DEFAULT_DESCRIPTION_FILE: &str = "50-Description.conf";

/// Filesystem locations a pass operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Directory holding `run-*.scope.d` drop-in directories.
    pub session_root: PathBuf,
    /// Directory holding one entry per live pod.
    pub pods_root: PathBuf,
    /// File inside a drop-in directory describing the scope.
    pub description_file: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            session_root: PathBuf::from(DEFAULT_SESSION_ROOT),
            pods_root: PathBuf::from(DEFAULT_PODS_ROOT),
            description_file: DEFAULT_DESCRIPTION_FILE.to_owned(),
        }
    }
}

/// Counters of a single pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub directories: DirectoryStats,
    pub units: UnitStats,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cleaned {} dirs out of {} ({} unresolved), {} units out of {}",
            self.directories.removed,
            self.directories.total,
            self.directories.unresolved,
            self.units.stopped,
            self.units.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_display() {
        let summary = Summary {
            directories: DirectoryStats {
                total: 3,
                removed: 1,
                unresolved: 1,
            },
            units: UnitStats {
                total: 4,
                stopped: 2,
            },
        };
        assert_eq!(
            summary.to_string(),
            "cleaned 1 dirs out of 3 (1 unresolved), 2 units out of 4"
        );
    }
}
