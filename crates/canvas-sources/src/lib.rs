//! C2: parsing and normalization for every external source (§4.2, §6) —
//! release notes, deploy notes, status incidents, Reddit submissions, and
//! community blog/Q&A posts — into the canonical types `canvas-types`
//! defines. Network and browser I/O are out of scope; callers hand in
//! already-fetched HTML/JSON through the `ports` traits.

mod date_parse;
mod error;
mod html_util;

pub mod community;
pub mod deploy_notes;
pub mod ports;
pub mod reddit;
pub mod release_notes;
pub mod status;

pub use date_parse::parse_upcoming_date;
pub use error::{Error, Result};
