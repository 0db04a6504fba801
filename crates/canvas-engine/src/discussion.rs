use canvas_index::Database;
use canvas_types::{ContentComment, ContentId, DiscussionTracking, DiscussionUpdate, DiscussionVerdict};
use chrono::Utc;

use crate::Result;

/// C4: compares a community post's freshly observed state against its
/// stored `DiscussionTracking` row and decides whether it needs
/// re-emission (§4.4).
pub struct DiscussionTracker<'a> {
    db: &'a Database,
}

impl<'a> DiscussionTracker<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// `current_comments` is the full comment list already upserted for
    /// `source_id`; `new_comments` on the returned update holds only the
    /// ones after `last_emitted_at` (for the "where the discussion is at"
    /// summarization mode).
    pub fn track(
        &self,
        source_id: &ContentId,
        current_comment_count: i64,
        current_last_comment_at: Option<chrono::DateTime<Utc>>,
        current_comments: &[ContentComment],
    ) -> Result<DiscussionUpdate> {
        let prev = self.db.get_discussion_tracking(source_id)?;

        let verdict = match &prev {
            None => DiscussionVerdict::New,
            Some(p) => {
                let comments_grew = p.comment_count < current_comment_count;
                let newer_comment = match (p.last_comment_at, current_last_comment_at) {
                    (Some(prev_at), Some(cur_at)) => prev_at < cur_at,
                    (None, Some(_)) => true,
                    _ => false,
                };
                if comments_grew || newer_comment {
                    DiscussionVerdict::Update
                } else {
                    DiscussionVerdict::Skip
                }
            }
        };

        let new_comments: Vec<ContentComment> = match &prev {
            Some(p) => current_comments
                .iter()
                .filter(|c| match (p.last_emitted_at, c.posted_at) {
                    (Some(emitted_at), Some(posted_at)) => posted_at > emitted_at,
                    (None, _) => true,
                    (Some(_), None) => false,
                })
                .cloned()
                .collect(),
            None => current_comments.to_vec(),
        };

        if !matches!(verdict, DiscussionVerdict::Skip) {
            self.db.upsert_discussion_tracking(&DiscussionTracking {
                source_id: source_id.clone(),
                comment_count: current_comment_count,
                last_comment_at: current_last_comment_at,
                last_emitted_at: Some(Utc::now()),
            })?;
        }

        Ok(DiscussionUpdate { source_id: source_id.clone(), verdict, new_comments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_types::ContentType;

    fn content_item(id: &str) -> canvas_types::ContentItem {
        canvas_types::ContentItem {
            source_id: ContentId::new(id),
            url: None,
            title: Some("title".to_string()),
            content_type: ContentType::Question,
            summary: None,
            engagement_score: None,
            comment_count: Some(0),
            first_posted: None,
            last_edited: None,
            last_comment_at: None,
            last_checked_at: None,
            scraped_date: None,
        }
    }

    #[test]
    fn first_observation_is_new() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_content_item(&content_item("blog_1")).unwrap();
        let tracker = DiscussionTracker::new(&db);
        let update = tracker.track(&ContentId::new("blog_1"), 3, None, &[]).unwrap();
        assert_eq!(update.verdict, DiscussionVerdict::New);
    }

    #[test]
    fn growing_comment_count_is_update_then_settles_to_skip() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_content_item(&content_item("blog_555")).unwrap();
        let tracker = DiscussionTracker::new(&db);
        let source_id = ContentId::new("blog_555");

        let first = tracker.track(&source_id, 4, Some(Utc::now()), &[]).unwrap();
        assert_eq!(first.verdict, DiscussionVerdict::New);

        let t0 = first.new_comments.first().map(|c| c.posted_at).unwrap_or(None);
        let later = Utc::now() + chrono::Duration::hours(1);
        let second = tracker.track(&source_id, 7, Some(later), &[]).unwrap();
        assert_eq!(second.verdict, DiscussionVerdict::Update);
        let _ = t0;

        let third = tracker.track(&source_id, 7, Some(later), &[]).unwrap();
        assert_eq!(third.verdict, DiscussionVerdict::Skip);
    }
}
