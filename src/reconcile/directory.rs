use crate::error::ResultOkLogExt;
use crate::pod::PodSet;
use crate::{fsutil, matcher};

use super::{Layout, Result};

/// Counters of the directory step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryStats {
    /// Scope directories inspected.
    pub total: usize,
    /// Scope directories removed.
    pub removed: usize,
    /// Scope directories left alone because their pod could not be determined.
    pub unresolved: usize,
}

/// Removes scope directories below the session root whose pod is not in `pods`.
///
/// A directory is only removed when its description file names a pod and that
/// pod is absent from `pods`. Unreadable or unparsable descriptions and failed
/// removals are logged and skipped.
///
/// # Errors
///
/// Returns [`super::Error::ScopeRoot`] if the session root cannot be listed.
pub fn reconcile_directories(layout: &Layout, pods: &PodSet) -> Result<DirectoryStats> {
    let entries = fsutil::read_dir_names(&layout.session_root)?;
    let mut stats = DirectoryStats::default();

    for entry in entries {
        if matcher::scope_of_entry(&entry).is_none() {
            continue;
        }
        let dir = layout.session_root.join(&entry);
        if !dir.is_dir() {
            continue;
        }
        stats.total += 1;

        let Some(contents) =
            fsutil::read_to_string_lossy(dir.join(&layout.description_file)).ok_log()
        else {
            stats.unresolved += 1;
            continue;
        };

        let Some(pod_id) = matcher::extract_pod_id(&contents, &layout.pods_root) else {
            log::debug!(
                target: "directory reconciler",
                "{entry}: no pod found in description, skipping"
            );
            stats.unresolved += 1;
            continue;
        };

        if pods.contains(&pod_id) {
            continue;
        }

        log::debug!(
            target: "directory reconciler",
            "{entry} is not in use by pod {pod_id}. Removing."
        );
        match std::fs::remove_dir_all(&dir) {
            Ok(()) => stats.removed += 1,
            Err(err) => log::error!(
                target: "directory reconciler",
                "failed to remove `{}`: {}",
                dir.display(),
                err
            ),
        }
    }

    Ok(stats)
}
