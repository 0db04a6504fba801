use std::fmt;

/// Result type for canvas-types operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while constructing or validating canonical
/// records, independent of any storage backend.
#[derive(Debug)]
pub enum Error {
    /// A required field was missing or empty where the data model forbids it.
    InvalidRecord(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidRecord(msg) => write!(f, "invalid record: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
