use std::collections::HashSet;

use canvas_types::{Badge, ChangeVerdict, ContentId, DiscussionVerdict, FeedGroup, FeedItem};
use chrono::{DateTime, NaiveDate, Utc};

use crate::feed::sanitize::sanitize_html;
use crate::Result;

fn naive_date_to_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
}

/// One candidate item plus the dedup-override flag the Discussion
/// Tracker's verdict contributes (§4.7: "dropped unless the Discussion
/// Tracker produced an UPDATE verdict").
#[derive(Debug, Clone)]
pub struct AssemblyCandidate {
    pub item: FeedItem,
    pub overrides_prior_emission: bool,
}

pub fn release_note_item(
    content_id: &ContentId,
    anchor_id: &str,
    h4_title: &str,
    category: &str,
    page_date: NaiveDate,
    verdict: ChangeVerdict,
    description_html: &str,
) -> AssemblyCandidate {
    tagged_announcement_item(
        content_id,
        anchor_id,
        h4_title,
        category,
        page_date,
        verdict,
        description_html,
        "Canvas Release Notes",
    )
}

pub fn deploy_note_item(
    content_id: &ContentId,
    anchor_id: &str,
    h4_title: &str,
    category: &str,
    page_date: NaiveDate,
    verdict: ChangeVerdict,
    description_html: &str,
) -> AssemblyCandidate {
    tagged_announcement_item(
        content_id,
        anchor_id,
        h4_title,
        category,
        page_date,
        verdict,
        description_html,
        "Canvas Deploy Notes",
    )
}

#[allow(clippy::too_many_arguments)]
fn tagged_announcement_item(
    content_id: &ContentId,
    anchor_id: &str,
    h4_title: &str,
    category: &str,
    page_date: NaiveDate,
    verdict: ChangeVerdict,
    description_html: &str,
    tag: &str,
) -> AssemblyCandidate {
    let badge = match verdict {
        ChangeVerdict::New => Badge::New,
        ChangeVerdict::Update => Badge::Update,
    };
    let title = format!("{} {tag} ({page_date}): {h4_title}", badge.as_str());
    AssemblyCandidate {
        item: FeedItem {
            guid: format!("{content_id}#{anchor_id}"),
            title,
            description: sanitize_html(description_html),
            category: category.to_string(),
            pub_date: naive_date_to_utc(page_date),
            group: FeedGroup::ReleaseOrDeployNote,
        },
        overrides_prior_emission: false,
    }
}

pub fn status_item(
    source_id: &ContentId,
    name: &str,
    created_at: DateTime<Utc>,
    description_html: &str,
) -> AssemblyCandidate {
    AssemblyCandidate {
        item: FeedItem {
            guid: source_id.as_str().to_string(),
            title: format!("{} Canvas Status: {}", Badge::New.as_str(), name),
            description: sanitize_html(description_html),
            category: "Status".to_string(),
            pub_date: created_at,
            group: FeedGroup::StatusIncident,
        },
        overrides_prior_emission: false,
    }
}

pub fn reddit_item(
    source_id: &ContentId,
    title: &str,
    created_at: DateTime<Utc>,
    description_html: &str,
) -> AssemblyCandidate {
    AssemblyCandidate {
        item: FeedItem {
            guid: source_id.as_str().to_string(),
            title: format!("{} Reddit - {}", Badge::New.as_str(), title),
            description: sanitize_html(description_html),
            category: "Reddit".to_string(),
            pub_date: created_at,
            group: FeedGroup::Reddit,
        },
        overrides_prior_emission: false,
    }
}

/// `tag` distinguishes blog posts from Q&A in the title per §4.7
/// ("Question Forum - <title>"); blogs use "Community Blog - <title>".
pub fn community_item(
    source_id: &ContentId,
    title: &str,
    tag: &str,
    posted_at: DateTime<Utc>,
    verdict: DiscussionVerdict,
    description_html: &str,
) -> Option<AssemblyCandidate> {
    let badge = match verdict {
        DiscussionVerdict::New => Badge::New,
        DiscussionVerdict::Update => Badge::Update,
        DiscussionVerdict::Skip => return None,
    };
    Some(AssemblyCandidate {
        item: FeedItem {
            guid: source_id.as_str().to_string(),
            title: format!("{} {tag} - {title}", badge.as_str()),
            description: sanitize_html(description_html),
            category: "Community".to_string(),
            pub_date: posted_at,
            group: FeedGroup::Community,
        },
        overrides_prior_emission: matches!(verdict, DiscussionVerdict::Update),
    })
}

/// C7: dedup and order a run's candidate items (§4.7). `was_emitted`
/// checks the store's prior-run emission set; an in-run duplicate GUID
/// is always dropped regardless of verdict.
pub fn assemble(
    candidates: Vec<AssemblyCandidate>,
    mut was_emitted: impl FnMut(&str) -> Result<bool>,
) -> Result<Vec<FeedItem>> {
    let mut seen_this_run = HashSet::new();
    let mut kept = Vec::new();

    for candidate in candidates {
        if !seen_this_run.insert(candidate.item.guid.clone()) {
            continue;
        }
        if was_emitted(&candidate.item.guid)? && !candidate.overrides_prior_emission {
            continue;
        }
        kept.push(candidate.item);
    }

    kept.sort_by(|a, b| a.group.cmp(&b.group).then(b.pub_date.cmp(&a.pub_date)));
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_note_title_carries_badge_and_tag() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 21).unwrap();
        let candidate = release_note_item(
            &ContentId::new("release_note_1"),
            "doc-proc",
            "Document Processing App",
            "Assignments",
            date,
            ChangeVerdict::New,
            "<p>Body</p>",
        );
        assert!(candidate.item.title.starts_with("[NEW] Canvas Release Notes (2026-02-21)"));
        assert_eq!(candidate.item.group, FeedGroup::ReleaseOrDeployNote);
    }

    #[test]
    fn in_run_duplicate_guid_is_dropped() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 21).unwrap();
        let make = || {
            release_note_item(
                &ContentId::new("release_note_1"),
                "doc-proc",
                "Document Processing App",
                "Assignments",
                date,
                ChangeVerdict::New,
                "<p>Body</p>",
            )
        };
        let items = assemble(vec![make(), make()], |_| Ok(false)).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn prior_run_emission_is_dropped_unless_update_verdict_overrides() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 21).unwrap();
        let stale = release_note_item(
            &ContentId::new("release_note_1"),
            "doc-proc",
            "Document Processing App",
            "Assignments",
            date,
            ChangeVerdict::New,
            "<p>Body</p>",
        );
        let dropped = assemble(vec![stale], |_| Ok(true)).unwrap();
        assert!(dropped.is_empty());

        let now = Utc::now();
        let update = community_item(
            &ContentId::new("blog_555"),
            "A thread",
            "Community Blog",
            now,
            DiscussionVerdict::Update,
            "<p>Update</p>",
        )
        .unwrap();
        let kept = assemble(vec![update], |_| Ok(true)).unwrap();
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn groups_sort_release_notes_before_status_before_community_before_reddit() {
        let now = Utc::now();
        let release = release_note_item(
            &ContentId::new("release_note_1"),
            "a",
            "A",
            "Cat",
            NaiveDate::from_ymd_opt(2026, 2, 21).unwrap(),
            ChangeVerdict::New,
            "<p>x</p>",
        );
        let status = status_item(&ContentId::new("status_1"), "Incident", now, "<p>x</p>");
        let reddit = reddit_item(&ContentId::new("reddit_1"), "Post", now, "<p>x</p>");
        let community = community_item(
            &ContentId::new("blog_1"),
            "Thread",
            "Community Blog",
            now,
            DiscussionVerdict::New,
            "<p>x</p>",
        )
        .unwrap();

        let items = assemble(vec![reddit, community, status, release], |_| Ok(false)).unwrap();
        let groups: Vec<FeedGroup> = items.iter().map(|i| i.group).collect();
        assert_eq!(
            groups,
            vec![FeedGroup::ReleaseOrDeployNote, FeedGroup::StatusIncident, FeedGroup::Community, FeedGroup::Reddit]
        );
    }

    #[test]
    fn skip_verdict_produces_no_candidate() {
        let now = Utc::now();
        let candidate = community_item(
            &ContentId::new("blog_2"),
            "Thread",
            "Community Blog",
            now,
            DiscussionVerdict::Skip,
            "<p>x</p>",
        );
        assert!(candidate.is_none());
    }
}
