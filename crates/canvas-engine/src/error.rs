use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for C3/C4/C5 (§7): a `Store` failure is fatal to the
/// run (the caller aborts before recording a `FeedRun`); `Classification`
/// failures drop only the offending entry and are logged with its
/// `anchor_id`.
#[derive(Debug)]
pub enum Error {
    Store(canvas_index::Error),
    Classification { anchor_id: String, reason: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Store(e) => write!(f, "store error: {e}"),
            Error::Classification { anchor_id, reason } => {
                write!(f, "classification error for {anchor_id}: {reason}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Store(e) => Some(e),
            Error::Classification { .. } => None,
        }
    }
}

impl From<canvas_index::Error> for Error {
    fn from(e: canvas_index::Error) -> Self {
        Error::Store(e)
    }
}
