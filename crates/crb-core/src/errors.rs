use std::path::PathBuf;

/// Core error type for infrastructure failures (config, storage, messaging).
///
/// Statistics API failures are not errors: they travel as
/// [`ApiOutcome`](crate::outcome::ApiOutcome) values. Adapter crates map their own
/// transport errors into `External`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("user store error: {path}: {reason}")]
    Store { path: PathBuf, reason: String },

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
