use crate::matcher;
use crate::systemd::{self, UnitManager};

use super::{Layout, Result};

/// Counters of the unit step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UnitStats {
    /// Scope units inspected.
    pub total: usize,
    /// Scope units successfully stopped.
    pub stopped: usize,
}

/// Stops scope units whose `<unit>.d` directory is gone from the session root.
///
/// The absence of the drop-in directory is the only trigger: a unit whose
/// directory still exists is left alone even if its pod is gone. It is stopped
/// once the directory is removed, which the directory step of the same pass
/// does right before this step runs. Stop failures are logged and skipped.
///
/// # Errors
///
/// Returns [`super::Error::UnitListing`] if the units cannot be listed.
pub fn reconcile_units(layout: &Layout, manager: &impl UnitManager) -> Result<UnitStats> {
    let listing = manager.list_units()?;
    let mut stats = UnitStats::default();

    for unit in systemd::unit_names(&listing).filter(|name| matcher::is_scope_name(name)) {
        stats.total += 1;

        let marker = layout.session_root.join(matcher::marker_dir_name(unit));
        match marker.try_exists() {
            Ok(true) => continue,
            Ok(false) => {}
            Err(err) => {
                log::warn!(
                    target: "unit reconciler",
                    "failed to check `{}`, keeping {unit}: {err}",
                    marker.display()
                );
                continue;
            }
        }

        log::debug!(target: "unit reconciler", "Stopping unit {unit}");
        match manager.stop_unit(unit) {
            Ok(()) => stats.stopped += 1,
            Err(err) => log::error!(
                target: "unit reconciler",
                "failed to stop {unit}: {err}"
            ),
        }
    }

    Ok(stats)
}
