use serde::Deserialize;

/// One Reddit submission (§6 Inputs), as returned by the out-of-scope
/// Reddit client for a configured subreddit.
#[derive(Debug, Clone, Deserialize)]
pub struct RedditSubmission {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub url: Option<String>,
    pub score: i64,
    pub num_comments: i64,
    #[serde(default)]
    pub author: Option<String>,
    pub created_utc: f64,
}
