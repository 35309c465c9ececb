use std::process::ExitStatus;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}: {stderr}")]
    ExitStatus {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("`{command}` produced non UTF-8 output: {source}")]
    InvalidOutput {
        command: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
