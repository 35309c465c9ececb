//! Recognition of runtime-generated scopes and their owning pods.
//!
//! Container runtimes using the systemd cgroup driver create a transient unit
//! `run-<random>.scope` for every mount they set up. systemd persists its state
//! below the session root as a drop-in directory `run-<random>.scope.d`, whose
//! description file records the mount path, e.g.
//!
//! ```text
//! [Unit]
//! Description=Kubernetes transient mount for /var/lib/kubelet/pods/<pod-uid>/volumes/...
//! ```
use std::path::Path;

use crate::pod::PodID;

const SCOPE_PREFIX: &str = "run-";
const SCOPE_SUFFIX: &str = ".scope";
const DROP_IN_SUFFIX: &str = ".d";

/// Returns `true` if `name` is exactly `run-<anything>.scope`.
///
/// The match is case-sensitive and anchored to the whole name.
///
/// # Examples
///
/// ```
/// # use scope_reaper::matcher::is_scope_name;
/// assert!(is_scope_name("run-r3c1f0.scope"));
/// assert!(!is_scope_name("run-r3c1f0.scope.d"));
/// assert!(!is_scope_name("kubepods.slice"));
/// ```
pub fn is_scope_name(name: &str) -> bool {
    name.len() >= SCOPE_PREFIX.len() + SCOPE_SUFFIX.len()
        && name.starts_with(SCOPE_PREFIX)
        && name.ends_with(SCOPE_SUFFIX)
}

/// Returns the scope unit name a session root entry belongs to.
///
/// Accepts the unit name itself and its `<unit>.d` drop-in directory.
pub fn scope_of_entry(name: &str) -> Option<&str> {
    let unit = name.strip_suffix(DROP_IN_SUFFIX).unwrap_or(name);
    is_scope_name(unit).then_some(unit)
}

/// Name of the drop-in directory whose presence keeps `unit` from being stopped.
pub fn marker_dir_name(unit: &str) -> String {
    format!("{unit}{DROP_IN_SUFFIX}")
}

/// Extracts the owning pod from the contents of a scope description file.
///
/// Looks for the first `<pods_root>/<pod-id>/` in `contents`. Returns `None` if
/// no such path is embedded or the embedded id contains bytes that were not
/// valid UTF-8, which callers treat as unresolved rather than as a pod that no
/// longer exists.
///
/// # Examples
///
/// ```
/// # use scope_reaper::matcher::extract_pod_id;
/// let contents = "Description=mount for /var/lib/kubelet/pods/abc/volumes/x";
/// let pod = extract_pod_id(contents, "/var/lib/kubelet/pods").unwrap();
/// assert_eq!(pod.as_ref(), "abc");
/// ```
pub fn extract_pod_id(contents: &str, pods_root: impl AsRef<Path>) -> Option<PodID> {
    let root = pods_root.as_ref().to_string_lossy();
    let needle = format!("{}/", root.trim_end_matches('/'));

    let segment = contents.match_indices(needle.as_str()).find_map(|(idx, _)| {
        let rest = &contents[idx + needle.len()..];
        let (segment, _) = rest.split_once('/')?;
        (!segment.is_empty()).then_some(segment)
    })?;

    // Undecodable bytes in the id can never match a registry entry.
    if segment.contains(char::REPLACEMENT_CHARACTER) {
        return None;
    }
    PodID::new(segment).ok()
}
