mod models;
mod parser;

pub use models::{ParsedFeatureEntry, ParsedSection, ParsedUpcomingItem, ReleaseNotePage, SectionEntry, ToggleKind};
pub use parser::{parse_release_note_page, ClassificationOverride};
