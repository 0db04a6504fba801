use canvas_types::{ConfigSnapshot, SectionKind};
use chrono::NaiveDate;

pub use crate::html_util::ToggleKind;

/// A parsed release-note page (§4.2), pure function of its input HTML
/// (testable property §8.7: parsing the same page twice yields identical
/// output).
#[derive(Debug, Clone)]
pub struct ReleaseNotePage {
    pub page_date: NaiveDate,
    pub sections: Vec<ParsedSection>,
}

#[derive(Debug, Clone)]
pub struct ParsedSection {
    pub kind: SectionKind,
    pub entries: Vec<SectionEntry>,
}

#[derive(Debug, Clone)]
pub enum SectionEntry {
    Feature(ParsedFeatureEntry),
    Upcoming(ParsedUpcomingItem),
}

#[derive(Debug, Clone)]
pub struct ParsedFeatureEntry {
    pub category: String,
    pub h4_title: String,
    pub anchor_id: String,
    pub added_date: Option<NaiveDate>,
    pub raw_content: String,
    pub toggle: ToggleKind,
    pub config: ConfigSnapshot,
}

#[derive(Debug, Clone)]
pub struct ParsedUpcomingItem {
    pub change_date: Option<NaiveDate>,
    pub description: String,
}
