use std::fmt;

/// Result type for canvas-runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// §7's error taxonomy, collected into one enum the way
/// `agtrace-runtime::Error` collects its layer's failure modes. `Store`
/// and `Serialization` are fatal to the run; everything else is logged
/// via a `RunEvent` and the affected item is skipped or left with a null
/// field.
#[derive(Debug)]
pub enum Error {
    /// A source fetcher failed after retries; the source is skipped for
    /// this run, not fatal.
    Fetch(String),

    /// A whole page could not be parsed (no H2 identifiable, etc).
    Parse(canvas_sources::Error),

    /// A single entry was missing a required field; dropped, logged with
    /// its anchor_id.
    Classification { anchor_id: String, reason: String },

    /// Benign: `(content_id, anchor_id)` already announced.
    DuplicateAnnouncement { anchor_id: String },

    /// Fatal: the run aborts, no `FeedRun` is recorded.
    Store(canvas_index::Error),

    /// Non-fatal: the affected field remains null.
    Enrichment(String),

    /// Fatal: prior store writes stand, but the feed file is not
    /// updated.
    Serialization(String),

    /// Config file missing/malformed.
    Config(String),

    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Fetch(msg) => write!(f, "fetch error: {msg}"),
            Error::Parse(e) => write!(f, "parse error: {e}"),
            Error::Classification { anchor_id, reason } => {
                write!(f, "classification error for {anchor_id}: {reason}")
            }
            Error::DuplicateAnnouncement { anchor_id } => {
                write!(f, "duplicate announcement for {anchor_id}")
            }
            Error::Store(e) => write!(f, "store error: {e}"),
            Error::Enrichment(msg) => write!(f, "enrichment error: {msg}"),
            Error::Serialization(msg) => write!(f, "serialization error: {msg}"),
            Error::Config(msg) => write!(f, "configuration error: {msg}"),
            Error::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::Store(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<canvas_index::Error> for Error {
    fn from(e: canvas_index::Error) -> Self {
        Error::Store(e)
    }
}

impl From<canvas_sources::Error> for Error {
    fn from(e: canvas_sources::Error) -> Self {
        Error::Parse(e)
    }
}

impl From<canvas_engine::Error> for Error {
    fn from(e: canvas_engine::Error) -> Self {
        match e {
            canvas_engine::Error::Store(inner) => Error::Store(inner),
            canvas_engine::Error::Classification { anchor_id, reason } => {
                Error::Classification { anchor_id, reason }
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Config(e.to_string())
    }
}
