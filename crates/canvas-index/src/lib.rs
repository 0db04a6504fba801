//! C1: the single-writer transactional canonical store (§4.1). Persists
//! the schema of `canvas-types` in SQLite and exposes the upsert/lookup
//! contract every other crate writes and reads through.

mod db;
mod error;
mod queries;
mod schema;

pub use db::{Database, StoreHandle};
pub use error::{Error, Result};
pub use queries::consistency::Violation;
pub use queries::enrichment_cache::CachedField;
