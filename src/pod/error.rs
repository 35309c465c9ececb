use crate::fsutil;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid pod id: {0}")]
    InvalidPodID(String),
    #[error("failed to read pod registry: {0}")]
    Registry(#[from] fsutil::ReadDirError),
}
pub type Result<T> = std::result::Result<T, Error>;
