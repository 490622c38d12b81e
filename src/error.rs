//! Global error handling for reposcribe
//!
//! This module provides the crate-wide error type. Only failures that abort a
//! whole run end up here; per-file read problems are absorbed by the exporter.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Global error type for reposcribe operations
#[derive(Error, Debug)]
pub enum ScribeError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// An ignore pattern that could not be compiled
    #[error("Invalid ignore pattern \"{pattern}\": {message}")]
    Pattern { pattern: String, message: String },

    /// The export destination could not be opened or written
    #[error("Output error for '{}': {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A source file that could not be read
    #[error("{source}: '{}'", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Text that cannot be decoded or encoded under the strict policy
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// JSON report serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Directory traversal errors that cannot be skipped
    #[error("Walk error: {0}")]
    Walk(String),

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unexpected error
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ScribeError {
    /// Process exit code the CLI uses for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ScribeError::Pattern { .. }
            | ScribeError::Config(_)
            | ScribeError::PathNotFound(_)
            | ScribeError::InvalidArgument(_) => 1,
            _ => 2,
        }
    }
}

/// Specialized Result type for reposcribe operations
pub type Result<T> = std::result::Result<T, ScribeError>;

/// Creates a ScribeError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::ScribeError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for adding context to errors
pub trait ResultExt<T, E> {
    /// Add additional context to an error
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E: std::error::Error + 'static> ResultExt<T, E> for std::result::Result<T, E> {
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|e| {
            let context = f();
            ScribeError::Unexpected(format!("{}: {}", context, e))
        })
    }
}

// Used where the writer reports through `io::Result`
impl From<ScribeError> for io::Error {
    fn from(err: ScribeError) -> Self {
        io::Error::new(io::ErrorKind::Other, err.to_string())
    }
}
