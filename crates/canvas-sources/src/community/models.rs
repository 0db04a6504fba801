use chrono::{DateTime, Utc};

/// Which community index this post was found under (§3 `ContentType`):
/// blog posts and Q&A questions share the same page shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommunityKind {
    Blog,
    Question,
}

/// A parsed community (blog/Q&A) post page. The spec leaves this format
/// unspecified beyond "rendered HTML" (§6); the parser here assumes the
/// Community's conventional `discussion-topic` / `discussion-reply`
/// markup, same as the release/deploy-note parser assumes fixed H2/H3/H4
/// structure for those pages.
#[derive(Debug, Clone)]
pub struct CommunityPost {
    pub post_id: String,
    pub kind: CommunityKind,
    pub title: String,
    pub body_html: String,
    pub url: Option<String>,
    pub first_posted: Option<DateTime<Utc>>,
    pub last_edited: Option<DateTime<Utc>>,
    pub replies: Vec<CommunityReply>,
}

#[derive(Debug, Clone)]
pub struct CommunityReply {
    pub text: String,
    pub posted_at: Option<DateTime<Utc>>,
}

impl CommunityPost {
    pub fn comment_count(&self) -> i64 {
        self.replies.len() as i64
    }

    pub fn last_comment_at(&self) -> Option<DateTime<Utc>> {
        self.replies.iter().filter_map(|r| r.posted_at).max()
    }
}
