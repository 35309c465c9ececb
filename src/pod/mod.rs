//! Pod registry access.
//!
//! The kubelet keeps one directory per live pod below its pod-state root
//! (`/var/lib/kubelet/pods/<pod-uid>`). A snapshot of those directory names is
//! the [`PodSet`] every reconciliation pass compares leaked scopes against.
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::ResultOkLogExt;
use crate::fsutil;

mod error;

pub use error::{Error, Result};

/// The maximum allowed length for a [`PodID`], matching the file name limit.
const POD_ID_MAX_LEN: usize = 255;

/// A validated pod identifier.
///
/// # Examples
///
/// ```
/// # use scope_reaper::pod::PodID;
/// let pod_id = PodID::new("0f1e2d3c-4b5a-6978-8796-a5b4c3d2e1f0").unwrap();
/// assert_eq!(pod_id.as_ref(), "0f1e2d3c-4b5a-6978-8796-a5b4c3d2e1f0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PodID(Arc<str>);

impl PodID {
    /// Creates a new `PodID` from the given raw id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPodID`] if the input is empty, contains a `/`, or its
    /// length exceeds [`POD_ID_MAX_LEN`].
    pub fn new(src: impl AsRef<str>) -> Result<Self> {
        let src = src.as_ref();
        if src.is_empty() || src.len() > POD_ID_MAX_LEN || src.contains('/') {
            return Err(Error::InvalidPodID(src.to_owned()));
        }

        Ok(Self(src.into()))
    }
}

impl AsRef<str> for PodID {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PodID {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PodID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of the pods that were alive when the registry was read.
#[derive(Debug, Default, Clone)]
pub struct PodSet {
    pods: HashSet<PodID>,
}

impl PodSet {
    pub fn contains(&self, pod_id: &PodID) -> bool {
        self.pods.contains(pod_id.as_ref())
    }

    pub fn len(&self) -> usize {
        self.pods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pods.is_empty()
    }
}

impl FromIterator<PodID> for PodSet {
    fn from_iter<I: IntoIterator<Item = PodID>>(iter: I) -> Self {
        Self {
            pods: iter.into_iter().collect(),
        }
    }
}

/// Reads the set of live pods from the kubelet pod-state root.
///
/// Every entry of `pods_root` is a pod identifier. Entries whose names are not
/// valid identifiers are logged and ignored.
///
/// # Errors
///
/// Returns [`Error::Registry`] if `pods_root` cannot be listed. Callers must not
/// fall back to an empty set: that would make every live scope look leaked.
pub fn read_pods(pods_root: impl AsRef<Path>) -> Result<PodSet> {
    let names = fsutil::read_dir_names(pods_root)?;
    let pods: PodSet = names
        .into_iter()
        .filter_map(|name| PodID::new(name).ok_log())
        .collect();
    log::debug!(target: "pod registry", "Read {} pods", pods.len());
    Ok(pods)
}
