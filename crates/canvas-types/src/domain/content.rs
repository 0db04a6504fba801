use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ContentId, FeatureId, OptionId, SettingId};

/// Kind of externally sourced record (`ContentItem.content_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    ReleaseNote,
    DeployNote,
    Changelog,
    Blog,
    Question,
    Reddit,
    Status,
}

impl ContentType {
    /// First-run cap for this content type. `None` means uncapped.
    pub fn first_run_cap(self) -> Option<usize> {
        match self {
            ContentType::Question => Some(5),
            ContentType::Blog => Some(5),
            ContentType::ReleaseNote => Some(3),
            ContentType::DeployNote => Some(3),
            ContentType::Changelog | ContentType::Reddit | ContentType::Status => None,
        }
    }
}

/// Any externally sourced record. `source_id` is globally unique;
/// re-ingestion upserts, never inserts a duplicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub source_id: ContentId,
    pub url: Option<String>,
    pub title: Option<String>,
    pub content_type: ContentType,
    pub summary: Option<String>,
    pub engagement_score: Option<i64>,
    pub comment_count: Option<i64>,
    pub first_posted: Option<DateTime<Utc>>,
    pub last_edited: Option<DateTime<Utc>>,
    pub last_comment_at: Option<DateTime<Utc>>,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub scraped_date: Option<NaiveDate>,
}

/// PII-redacted comment on a `ContentItem`. No author field by design —
/// comments are tracked for discussion volume, not attribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentComment {
    pub content_id: ContentId,
    pub comment_text: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub position: i64,
}

/// Why a `ContentItem` mentions a feature/option/setting
/// (`ContentFeatureRef.mention_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionType {
    Announces,
    Discusses,
    Questions,
    Feedback,
}

/// Many-to-many link from a `ContentItem` to a feature/option/setting. At
/// least one of `feature_id`/`option_id`/`setting_id` must be non-null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentFeatureRef {
    pub content_id: ContentId,
    pub feature_id: Option<FeatureId>,
    pub option_id: Option<OptionId>,
    pub setting_id: Option<SettingId>,
    pub mention_type: MentionType,
    /// Set once `assign` re-links a low-confidence ref to a real feature;
    /// the original row is kept for history rather than deleted.
    pub superseded: bool,
}

impl ContentFeatureRef {
    /// At least one FK must be present.
    pub fn has_target(&self) -> bool {
        self.feature_id.is_some() || self.option_id.is_some() || self.setting_id.is_some()
    }
}

/// Per-community-post tracking state governing NEW vs UPDATE emission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionTracking {
    pub source_id: ContentId,
    pub comment_count: i64,
    pub last_comment_at: Option<DateTime<Utc>>,
    pub last_emitted_at: Option<DateTime<Utc>>,
}

/// Verdict produced per community post observed in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscussionVerdict {
    New,
    Update,
    Skip,
}

/// Emitted per community post tracked in a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionUpdate {
    pub source_id: ContentId,
    pub verdict: DiscussionVerdict,
    /// New comments observed since `last_emitted_at`, for "where the
    /// discussion is at" summarization mode.
    pub new_comments: Vec<ContentComment>,
}
