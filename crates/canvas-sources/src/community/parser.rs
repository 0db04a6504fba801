use chrono::{DateTime, Utc};
use scraper::{Html, Selector};

use crate::error::{Error, Result};
use crate::html_util::text_of;

use super::models::{CommunityKind, CommunityPost, CommunityReply};

/// Parse one rendered community post page (§6 Inputs: "rendered HTML for
/// ... individual post pages"). Unlike release/deploy notes, the spec
/// gives no per-cell rules for this format, so this follows the
/// Community's conventional discussion markup: a `.discussion-topic`
/// article holding the title and body, with zero or more
/// `.discussion-reply` entries for replies.
pub fn parse_community_post(
    html: &str,
    kind: CommunityKind,
    post_id: &str,
    url: Option<String>,
) -> Result<CommunityPost> {
    let doc = Html::parse_document(html);

    let topic_sel = Selector::parse(".discussion-topic").unwrap();
    let title_sel = Selector::parse(".discussion-title").unwrap();
    let body_sel = Selector::parse(".message.userContent").unwrap();
    let reply_sel = Selector::parse(".discussion-reply").unwrap();

    let topic = doc
        .select(&topic_sel)
        .next()
        .ok_or_else(|| Error::ParseError("no .discussion-topic found on community page".to_string()))?;

    let title = topic
        .select(&title_sel)
        .next()
        .map(text_of)
        .ok_or_else(|| Error::ParseError("no .discussion-title found on community page".to_string()))?;

    let body_html = topic
        .select(&body_sel)
        .next()
        .map(|el| el.inner_html())
        .unwrap_or_default();

    let first_posted = topic.value().attr("data-posted-at").and_then(parse_timestamp);
    let last_edited = topic.value().attr("data-edited-at").and_then(parse_timestamp);

    let replies = doc
        .select(&reply_sel)
        .map(|el| CommunityReply {
            text: el.select(&body_sel).next().map(text_of).unwrap_or_else(|| text_of(el)),
            posted_at: el.value().attr("data-posted-at").and_then(parse_timestamp),
        })
        .collect();

    Ok(CommunityPost { post_id: post_id.to_string(), kind, title, body_html, url, first_posted, last_edited, replies })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_title_body_and_replies() {
        let html = r#"
            <article class="discussion-topic" data-posted-at="2026-01-05T00:00:00Z">
                <h1 class="discussion-title">Gradebook weirdness after the update</h1>
                <div class="message userContent"><p>Anyone else seeing this?</p></div>
            </article>
            <ul>
                <li class="discussion-reply" data-posted-at="2026-01-06T00:00:00Z">
                    <div class="message userContent">Yes, same here.</div>
                </li>
            </ul>
        "#;
        let post = parse_community_post(html, CommunityKind::Question, "123", None).unwrap();
        assert_eq!(post.title, "Gradebook weirdness after the update");
        assert_eq!(post.replies.len(), 1);
        assert_eq!(post.replies[0].text, "Yes, same here.");
        assert!(post.first_posted.is_some());
    }

    #[test]
    fn missing_topic_is_a_parse_error() {
        let err = parse_community_post("<div></div>", CommunityKind::Blog, "1", None);
        assert!(err.is_err());
    }
}
