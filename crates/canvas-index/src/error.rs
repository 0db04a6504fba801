use std::fmt;

/// Result type for canvas-index operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the store layer. `DuplicateAnnouncement` is
/// benign — callers treat it as an idempotent skip (§7); every other
/// variant is fatal to the run.
#[derive(Debug)]
pub enum Error {
    /// Underlying SQLite operation failed.
    Database(rusqlite::Error),

    /// An insert violated the store's write-time invariants (§4.1): an
    /// announcement referencing neither/both of option/setting, a ref with
    /// no FK target, or a status transition that would regress.
    InvalidWrite(String),

    /// `insert_announcement` was called for an `(content_id, anchor_id)`
    /// pair that already exists. Swallowed by callers as a no-op.
    DuplicateAnnouncement { content_id: String, anchor_id: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Database(err) => write!(f, "database error: {}", err),
            Error::InvalidWrite(msg) => write!(f, "invalid write: {}", msg),
            Error::DuplicateAnnouncement { content_id, anchor_id } => write!(
                f,
                "announcement already exists for content_id={} anchor_id={}",
                content_id, anchor_id
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Database(err) => Some(err),
            Error::InvalidWrite(_) | Error::DuplicateAnnouncement { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        // SQLite reports our UNIQUE(content_id, anchor_id) violation as a
        // generic constraint error; query.rs matches on the constraint name
        // before this conversion runs so a true duplicate never reaches
        // here as a plain Database error. See queries/announcement.rs.
        Error::Database(err)
    }
}
