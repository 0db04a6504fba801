//! C3 (Classifier), C4 (Discussion Tracker), C5 (First-Run Policy): the
//! decision logic that sits between a parsed page/post and the canonical
//! store. No I/O beyond the store handle `canvas-index` provides.

mod classifier;
mod discussion;
mod error;
mod events;
mod feature_match;
mod first_run;
mod lifecycle_hints;

pub use classifier::{ClassifiedEntry, Classifier};
pub use discussion::DiscussionTracker;
pub use error::{Error, Result};
pub use events::EngineEvent;
pub use feature_match::{resolve_community_ref, GENERAL_FEATURE_ID};
pub use first_run::{apply_first_run_cap, FirstRunDecision};
pub use lifecycle_hints::{infer_lifecycle, infer_status};
