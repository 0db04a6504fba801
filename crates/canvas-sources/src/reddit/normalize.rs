use canvas_types::{ContentId, ContentItem, ContentType};
use canvas_core::redact_pii;
use chrono::{DateTime, Utc};

use super::models::RedditSubmission;

/// Whether a submission clears the engagement bar before it's worth
/// normalizing at all (§9 open question a, `sources.reddit.min_score`
/// and `keywords`, both surfaced as independent config knobs).
pub fn passes_filters(submission: &RedditSubmission, min_score: i64, keywords: &[String]) -> bool {
    if submission.score < min_score {
        return false;
    }
    if keywords.is_empty() {
        return true;
    }
    let haystack = format!("{} {}", submission.title, submission.selftext).to_lowercase();
    keywords.iter().any(|kw| haystack.contains(&kw.to_lowercase()))
}

/// Normalize one submission into a `ContentItem`. PII redaction (§4.6)
/// runs on the title here; the body text is redacted by the caller before
/// it's handed to the enrichment gateway, since the raw body isn't part
/// of the stored canonical record (only `summary` is).
pub fn normalize_submission(submission: &RedditSubmission) -> ContentItem {
    let created = DateTime::from_timestamp(submission.created_utc as i64, 0).unwrap_or_else(Utc::now);

    ContentItem {
        source_id: ContentId::new(format!("reddit_{}", submission.id)),
        url: submission.url.clone(),
        title: Some(redact_pii(&submission.title)),
        content_type: ContentType::Reddit,
        summary: None,
        engagement_score: Some(submission.score),
        comment_count: Some(submission.num_comments),
        first_posted: Some(created),
        last_edited: None,
        last_comment_at: None,
        last_checked_at: None,
        scraped_date: Some(Utc::now().date_naive()),
    }
}

/// Body text redacted and ready to hand to the enrichment gateway's
/// `summarize` prompt (§4.6).
pub fn redacted_body(submission: &RedditSubmission) -> String {
    redact_pii(&submission.selftext)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> RedditSubmission {
        RedditSubmission {
            id: "abc123".to_string(),
            title: "New Quizzes rollout feedback".to_string(),
            selftext: "Reach me at alice@example.com or u/alice".to_string(),
            url: None,
            score: 42,
            num_comments: 3,
            author: Some("alice".to_string()),
            created_utc: 1_700_000_000.0,
        }
    }

    #[test]
    fn min_score_filters_low_engagement_posts() {
        let submission = fixture();
        assert!(passes_filters(&submission, 10, &[]));
        assert!(!passes_filters(&submission, 100, &[]));
    }

    #[test]
    fn keyword_filter_requires_a_match() {
        let submission = fixture();
        assert!(passes_filters(&submission, 0, &["quizzes".to_string()]));
        assert!(!passes_filters(&submission, 0, &["gradebook".to_string()]));
    }

    #[test]
    fn normalize_redacts_title_and_builds_source_id() {
        let item = normalize_submission(&fixture());
        assert_eq!(item.source_id.as_str(), "reddit_abc123");
        assert_eq!(item.content_type, ContentType::Reddit);
    }

    #[test]
    fn redacted_body_strips_pii() {
        let body = redacted_body(&fixture());
        assert!(!body.contains("alice@example.com"));
        assert!(!body.contains("u/alice"));
    }
}
