use thiserror::Error;

/// Error types shared by the registry, the dispatch engine and filter units.
#[derive(Error, Debug)]
pub enum FilterError {
    /// Explicit dispatch referenced a kind that was never registered.
    #[error("Unknown filter kind: {kind}:{subfilter}")]
    UnknownFilterKind { kind: String, subfilter: String },

    /// The unit needs a subfilter value and none was given.
    #[error("Missing argument for {kind}: {message}")]
    MissingArgument { kind: String, message: String },

    /// The unit does not accept the shape of subfilter it was given.
    #[error("Unsupported argument for {kind}: {message}")]
    UnsupportedArgument { kind: String, message: String },

    /// Two units were registered under the same kind.
    #[error("Duplicate filter kind: {0}")]
    DuplicateFilterKind(String),

    /// A regular expression failed to compile.
    #[error("Invalid pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A filter's own transform failed (bad input for the conversion).
    #[error("{kind} failed: {message}")]
    Transform { kind: String, message: String },

    /// Pipeline configuration could not be loaded or understood.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FilterError {
    pub fn missing(kind: &str, message: impl Into<String>) -> Self {
        FilterError::MissingArgument {
            kind: kind.to_string(),
            message: message.into(),
        }
    }

    pub fn unsupported(kind: &str, message: impl Into<String>) -> Self {
        FilterError::UnsupportedArgument {
            kind: kind.to_string(),
            message: message.into(),
        }
    }

    pub fn transform(kind: &str, message: impl Into<String>) -> Self {
        FilterError::Transform {
            kind: kind.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_pattern(pattern: &str, err: &regex::Error) -> Self {
        FilterError::InvalidPattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        }
    }

}
