use std::path::PathBuf;

/// Failures at the edges of the app: config file, log setup, terminal I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("config file {} is invalid: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to set up logging: {0}")]
    Logging(String),

    #[error("control key {0:?} is not a printable character")]
    InvalidControlKey(char),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
