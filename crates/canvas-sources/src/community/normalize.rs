use canvas_core::redact_pii;
use canvas_types::{ContentComment, ContentId, ContentItem, ContentType};
use chrono::Utc;

use super::models::{CommunityKind, CommunityPost};

/// Normalize a parsed post into its canonical `ContentItem` plus one
/// `ContentComment` per reply, PII-redacted (§4.6) before either is
/// persisted.
pub fn normalize_post(post: &CommunityPost) -> (ContentItem, Vec<ContentComment>) {
    let prefix = match post.kind {
        CommunityKind::Blog => "blog",
        CommunityKind::Question => "question",
    };
    let content_type = match post.kind {
        CommunityKind::Blog => ContentType::Blog,
        CommunityKind::Question => ContentType::Question,
    };

    let item = ContentItem {
        source_id: ContentId::new(format!("{prefix}_{}", post.post_id)),
        url: post.url.clone(),
        title: Some(redact_pii(&post.title)),
        content_type,
        summary: None,
        engagement_score: None,
        comment_count: Some(post.comment_count()),
        first_posted: post.first_posted,
        last_edited: post.last_edited,
        last_comment_at: post.last_comment_at(),
        last_checked_at: None,
        scraped_date: Some(Utc::now().date_naive()),
    };

    let comments = post
        .replies
        .iter()
        .enumerate()
        .map(|(position, reply)| ContentComment {
            content_id: item.source_id.clone(),
            position: position as i64,
            comment_text: redact_pii(&reply.text),
            posted_at: reply.posted_at,
        })
        .collect();

    (item, comments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::community::models::CommunityReply;

    #[test]
    fn normalizes_post_and_redacts_replies() {
        let post = CommunityPost {
            post_id: "42".to_string(),
            kind: CommunityKind::Question,
            title: "Contact me at bob@example.com".to_string(),
            body_html: "<p>body</p>".to_string(),
            url: None,
            first_posted: None,
            last_edited: None,
            replies: vec![CommunityReply { text: "call u/bob about this".to_string(), posted_at: None }],
        };

        let (item, comments) = normalize_post(&post);
        assert_eq!(item.source_id.as_str(), "question_42");
        assert_eq!(item.content_type, ContentType::Question);
        assert!(!item.title.unwrap().contains("bob@example.com"));
        assert_eq!(comments.len(), 1);
        assert!(!comments[0].comment_text.contains("u/bob"));
    }
}
