use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::{ContentId, FeatureId, ToggleRef};

/// H2-derived section kind. Unknown H2 text maps to `Other`; entries under
/// it are still kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    NewFeatures,
    UpdatedFeatures,
    PlatformIntegration,
    OtherUpdates,
    UpcomingCanvasChanges,
    Other(String),
}

impl SectionKind {
    /// Recognize an H2's trimmed text as one of the known section kinds.
    pub fn from_h2_text(text: &str) -> Self {
        match text.trim() {
            "New Features" => SectionKind::NewFeatures,
            "Updated Features" => SectionKind::UpdatedFeatures,
            "Platform/Integration" => SectionKind::PlatformIntegration,
            "Other Updates" => SectionKind::OtherUpdates,
            "Upcoming Canvas Changes" => SectionKind::UpcomingCanvasChanges,
            other => SectionKind::Other(other.to_string()),
        }
    }
}

/// Point-in-time configuration snapshot captured from the table under an H4.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub enable_location_account: Option<String>,
    pub enable_location_course: Option<String>,
    pub subaccount_config: Option<bool>,
    pub permissions: Option<String>,
    pub affected_areas: Vec<String>,
    pub affects_ui: Option<bool>,
}

/// Per-release row capturing the H4 entry at a point in time. Immutable
/// once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureAnnouncement {
    pub id: String,
    pub feature_id: FeatureId,
    pub toggle_ref: ToggleRef,
    pub content_id: ContentId,
    pub h4_title: String,
    pub anchor_id: String,
    pub section: SectionKind,
    pub category: String,
    pub raw_content: String,
    pub description: Option<String>,
    pub implications: Option<String>,
    pub config: ConfigSnapshot,
    pub added_date: Option<NaiveDate>,
    pub announced_at: NaiveDate,
}

/// Update-vs-new verdict for badge selection, consumed by the Feed
/// Assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeVerdict {
    New,
    Update,
}

/// Upcoming-changes list item under H2 "Upcoming Canvas Changes". Date
/// parsing is best-effort; failure degrades to `None` rather than failing
/// the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpcomingChange {
    pub content_id: ContentId,
    pub change_date: Option<NaiveDate>,
    pub description: String,
}
