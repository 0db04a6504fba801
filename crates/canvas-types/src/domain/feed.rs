use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One run's serialized output record (`FeedRun`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedRun {
    pub feed_date: NaiveDate,
    pub item_count: usize,
    pub payload: String,
    pub generated_at: DateTime<Utc>,
}

/// `[NEW]`/`[UPDATE]` badge plus content-type tag applied to a feed item's
/// title .
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    New,
    Update,
}

impl Badge {
    pub fn as_str(self) -> &'static str {
        match self {
            Badge::New => "[NEW]",
            Badge::Update => "[UPDATE]",
        }
    }
}

/// One ordered, deduplicated entry ready for the (external) RSS serializer
/// . `guid` is `source_id` or a URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    pub guid: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub pub_date: DateTime<Utc>,
    /// Coarse ordering bucket used by the assembler : release/deploy
    /// notes first, then status incidents, then community posts, then
    /// Reddit.
    pub group: FeedGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeedGroup {
    ReleaseOrDeployNote,
    StatusIncident,
    Community,
    Reddit,
}
