use core::fmt;

use crate::community::VertexKey;

/// Result alias for `louvain-store`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by community detection, graph stores and configuration loading.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input was empty.
    EmptyInput,

    /// Two parallel sequences disagree in length (e.g. a degree batch).
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Found length.
        found: usize,
    },

    /// A degree reported for a vertex was negative or not finite.
    InvalidDegree {
        /// Offending vertex.
        key: VertexKey,
        /// Reported degree.
        degree: f64,
    },

    /// A vertex or community key was referenced but never enumerated.
    UnknownVertex {
        /// Missing key.
        key: VertexKey,
    },

    /// The graph store failed to answer a query.
    Store {
        /// Store operation that failed (`neighbors`, `degrees`, ...).
        operation: &'static str,
        /// Message reported by the store.
        message: String,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// Configuration document carries a version this crate cannot load.
    UnsupportedVersion {
        /// Version string found in the document.
        found: String,
    },

    /// Malformed configuration document.
    Config(String),
}

impl Error {
    /// Build a store error for `operation`.
    pub fn store(operation: &'static str, message: impl Into<String>) -> Self {
        Error::Store {
            operation,
            message: message.into(),
        }
    }

    /// True if the error came from the graph store rather than from the algorithm.
    pub fn is_store_error(&self) -> bool {
        matches!(self, Error::Store { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Error::InvalidDegree { key, degree } => {
                write!(f, "invalid degree {degree} for vertex {key}")
            }
            Error::UnknownVertex { key } => write!(f, "unknown vertex {key}"),
            Error::Store { operation, message } => {
                write!(f, "graph store `{operation}` failed: {message}")
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
            Error::UnsupportedVersion { found } => {
                write!(f, "configuration version '{found}' not supported")
            }
            Error::Config(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(feature = "config")]
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}
