//! Error types for jvxl-rs.

use thiserror::Error;

/// The main error type for surface loading, generation and encoding.
#[derive(Error, Debug)]
pub enum JvxlError {
    /// The volumetric header could not be parsed. Fatal for the current load.
    #[error("header error at line {line}: {message}")]
    Header { line: usize, message: String },

    /// The stream ended before all voxel values were read.
    #[error("unexpected end of data: read {read} of {expected} voxel values")]
    UnexpectedEof { expected: usize, read: usize },

    /// The grid cannot hold a surface (fewer than two points along an axis).
    #[error("degenerate grid {counts:?}: {message}")]
    Geometry { counts: [usize; 3], message: String },

    /// Invalid encoding parameters for the fraction codec.
    #[error("codec error: {0}")]
    Codec(String),

    /// A property name that the generator does not recognize.
    #[error("unknown property '{0}'")]
    UnknownProperty(String),

    /// A property value of the wrong kind or out of range.
    #[error("invalid value for property '{name}': {message}")]
    InvalidProperty { name: String, message: String },

    /// An operation was requested in a state that cannot serve it.
    #[error("invalid state: {0}")]
    State(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl JvxlError {
    /// Shorthand for a header error at the given 1-based line.
    pub fn header(line: usize, message: impl Into<String>) -> Self {
        Self::Header {
            line,
            message: message.into(),
        }
    }
}

/// A specialized Result type for jvxl-rs operations.
pub type Result<T> = std::result::Result<T, JvxlError>;
