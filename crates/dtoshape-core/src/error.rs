use thiserror::Error;

/// Error type for conversion runs and their inputs.
///
/// Recoverable conditions met while walking a type graph (an unresolved field
/// type, an unsupported construct) are not errors. They are reported as
/// diagnostics on the conversion result instead.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Fixture error in {source_name}: {message}")]
    Fixture {
        source_name: String,
        message: String,
    },

    #[error("Invalid type expression `{input}`: {message}")]
    TypeExpr { input: String, message: String },

    #[error("Root type not found: {0}")]
    RootNotFound(String),

    #[error("Conversion cancelled after expanding {expanded} type(s)")]
    Cancelled { expanded: usize },
}

impl ConvertError {
    /// Whether this error came from a cooperative cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ConvertError::Cancelled { .. })
    }
}

/// Result type alias using ConvertError.
pub type Result<T> = std::result::Result<T, ConvertError>;
