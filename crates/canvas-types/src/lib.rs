//! Canonical data model for the Canvas change-detection engine.
//!
//! This crate holds only schema: tagged records with explicit fields, no
//! behavior beyond the small invariant helpers the records themselves need.

pub mod domain;
pub mod error;
pub mod ids;

pub use domain::*;
pub use error::{Error, Result};
pub use ids::{ContentId, FeatureId, OptionId, SettingId, ToggleRef};
