use std::path::PathBuf;
use thiserror::Error;

/// Failure to load the health standards. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("standards file not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read standards file at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse standards from {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("invalid standards configuration:\n  - {}", .0.join("\n  - "))]
    Invalid(Vec<String>),
}
