//! One reconciliation pass over pods, scope directories and scope units.
use crate::pod;
use crate::reconcile::{self, Layout, Summary};
use crate::systemd::UnitManager;

/// Outcome of a single pass.
#[derive(Debug)]
pub struct PassReport {
    /// Counters collected up to the point the pass finished or aborted.
    pub summary: Summary,
    /// The condition that aborted the pass, if any.
    pub error: Option<reconcile::Error>,
}

/// Runs reconciliation passes against a fixed [`Layout`].
#[derive(Debug)]
pub struct Cleaner<M> {
    layout: Layout,
    manager: M,
}

impl<M: UnitManager> Cleaner<M> {
    pub fn new(layout: Layout, manager: M) -> Self {
        Self { layout, manager }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Runs one pass: reads the live pods, removes orphaned scope directories,
    /// then stops scope units whose directory is gone.
    ///
    /// Never fails. A pass-fatal condition stops the remaining steps and is
    /// returned in [`PassReport::error`] together with the partial counters.
    /// The summary is logged in both cases.
    pub fn run_pass(&self) -> PassReport {
        log::info!(target: "cleanup", "Starting cleanup...");
        let mut summary = Summary::default();
        let error = self.reconcile(&mut summary).err();

        if let Some(err) = &error {
            log::error!(target: "cleanup", "cleanup aborted: {err}");
        }
        log::info!(target: "cleanup", "{summary}");

        PassReport { summary, error }
    }

    fn reconcile(&self, summary: &mut Summary) -> reconcile::Result<()> {
        let pods = pod::read_pods(&self.layout.pods_root)?;
        log::info!(target: "cleanup", "Found {} pods", pods.len());

        summary.directories = reconcile::reconcile_directories(&self.layout, &pods)?;
        log::info!(
            target: "cleanup",
            "Found {} possible leaked dirs",
            summary.directories.total
        );

        summary.units = reconcile::reconcile_units(&self.layout, &self.manager)?;
        log::info!(
            target: "cleanup",
            "Found {} possible leaked units",
            summary.units.total
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::{DirectoryStats, FakeUnitManager, UnitStats, add_scope_dir, test_layout};

    #[test]
    fn test_pass_removes_dirs_then_units() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = test_layout(tmp.path());
        std::fs::create_dir(layout.pods_root.join("pod-1")).unwrap();
        add_scope_dir(&layout, "run-xyz.scope.d", "pod-1");
        add_scope_dir(&layout, "run-abc.scope.d", "pod-2");
        let manager = FakeUnitManager::with_listing(
            "run-xyz.scope loaded active running\nrun-abc.scope loaded active running\n",
        );
        let cleaner = Cleaner::new(layout, manager);

        let report = cleaner.run_pass();

        assert!(report.error.is_none());
        assert_eq!(
            report.summary,
            Summary {
                directories: DirectoryStats {
                    total: 2,
                    removed: 1,
                    unresolved: 0
                },
                units: UnitStats { total: 2, stopped: 1 },
            }
        );
        // The unit of the just removed directory is stopped in the same pass.
        assert_eq!(cleaner.manager.stopped(), vec!["run-abc.scope".to_string()]);
        assert!(cleaner.layout().session_root.join("run-xyz.scope.d").exists());
    }

    #[test]
    fn test_pass_keeps_unit_of_live_pod() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = test_layout(tmp.path());
        std::fs::create_dir(layout.pods_root.join("pod-1")).unwrap();
        add_scope_dir(&layout, "run-xyz.scope.d", "pod-1");
        let manager = FakeUnitManager::with_listing("run-xyz.scope loaded active running\n");
        let cleaner = Cleaner::new(layout, manager);

        let report = cleaner.run_pass();

        assert!(report.error.is_none());
        assert_eq!(report.summary.units, UnitStats { total: 1, stopped: 0 });
        assert!(cleaner.manager.stopped().is_empty());
    }

    #[test]
    fn test_pass_aborts_on_unreadable_pod_registry() {
        let tmp = tempfile::tempdir().unwrap();
        let mut layout = test_layout(tmp.path());
        layout.pods_root = tmp.path().join("missing");
        add_scope_dir(&layout, "run-abc.scope.d", "pod-2");
        let manager = FakeUnitManager::with_listing("run-def.scope loaded active running\n");
        let cleaner = Cleaner::new(layout, manager);

        let report = cleaner.run_pass();

        assert!(matches!(
            report.error,
            Some(reconcile::Error::PodRegistry(_))
        ));
        assert_eq!(report.summary, Summary::default());
        assert!(cleaner.layout().session_root.join("run-abc.scope.d").exists());
        assert!(cleaner.manager.stopped().is_empty());

        // The next pass runs normally once the registry is back.
        std::fs::create_dir_all(&cleaner.layout().pods_root).unwrap();
        let report = cleaner.run_pass();
        assert!(report.error.is_none());
        assert_eq!(report.summary.directories.removed, 1);
    }

    #[test]
    fn test_pass_reports_partial_counts_on_unit_listing_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = test_layout(tmp.path());
        add_scope_dir(&layout, "run-abc.scope.d", "pod-2");
        let cleaner = Cleaner::new(layout, FakeUnitManager::default());

        let report = cleaner.run_pass();

        assert!(matches!(
            report.error,
            Some(reconcile::Error::UnitListing(_))
        ));
        assert_eq!(report.summary.directories.removed, 1);
        assert_eq!(report.summary.units, UnitStats::default());
    }

    #[test]
    fn test_pass_skips_unresolved_scope() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = test_layout(tmp.path());
        let dir = layout.session_root.join("run-abc.scope.d");
        std::fs::create_dir(&dir).unwrap();
        let manager = FakeUnitManager::with_listing("run-abc.scope loaded active running\n");
        let cleaner = Cleaner::new(layout, manager);

        let report = cleaner.run_pass();

        assert!(report.error.is_none());
        assert_eq!(report.summary.directories.unresolved, 1);
        assert_eq!(report.summary.directories.removed, 0);
        assert!(dir.exists());
        assert!(cleaner.manager.stopped().is_empty());
    }
}
