use crate::{fsutil, pod, systemd};

/// Conditions that abort a reconciliation pass before any further action.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot determine live pods: {0}")]
    PodRegistry(#[from] pod::Error),
    #[error("cannot list scope root: {0}")]
    ScopeRoot(#[from] fsutil::ReadDirError),
    #[error("cannot list loaded units: {0}")]
    UnitListing(#[from] systemd::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
