use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// `ParseError` surfaces only when a whole page is unparseable (§4.2,
/// §7) — e.g. no H2 could be identified at all. Individual malformed
/// entries never produce this; they're logged and dropped by the caller.
#[derive(Debug)]
pub enum Error {
    ParseError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ParseError(msg) => write!(f, "parse error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
