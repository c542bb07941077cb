use connectors::error::NetworkError;
use thiserror::Error;

/// Errors raised while resolving runtime settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// No state directory was given and the home directory is unknown.
    #[error("Cannot determine a state directory; set BREEDSCOPE_STATE_DIR")]
    NoStateDir,

    /// The HTTP client could not be built from the settings.
    #[error("Failed to build API client: {0}")]
    Client(#[from] NetworkError),
}
