//! Crate-level error types for srclink diagnostics.

use std::path::PathBuf;

/// Fatal errors of the outer tool. Hrefs that cannot be resolved are never
/// errors; they are skipped by the injector.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The documentation directory to process does not exist or is not a directory.
    #[error("doc root not found: {}", path.display())]
    DocRootNotFound {
        /// Path that was given as the documentation root.
        path: PathBuf,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization of a run summary failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// A required configuration value was given neither in `.srclink.toml` nor as a flag.
    #[error("missing config value: `{field}`")]
    MissingConfig {
        /// Name of the configuration key.
        field: &'static str,
    },

    /// A file could not be parsed as the format it is expected to hold.
    #[error("parse failed: {}: {reason}", file.display())]
    ParseFailed {
        /// File that failed to parse.
        file: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// The filesystem watcher could not be set up.
    #[error("watch failed: {reason}")]
    Watch {
        /// Description of the watcher failure.
        reason: String,
    },
}
