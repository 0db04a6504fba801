//! Cross-cutting pure functions shared by every other crate in the
//! workspace: slug derivation, PII redaction, content hashing, and
//! workspace-path resolution. No domain types live here — see
//! `canvas-types` for those.

pub mod error;
pub mod hash;
pub mod path;
pub mod redact;
pub mod slugify;

pub use error::{Error, Result};
pub use hash::content_hash;
pub use path::{expand_tilde, resolve_workspace_path};
pub use redact::redact_pii;
pub use slugify::slugify;
