use canvas_types::{ContentId, ContentItem, ContentType};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::Result;

/// Upsert keyed by `source_id` (globally unique, §3). Preserves the first
/// `first_posted` ever recorded; refreshes engagement, `last_checked_at`,
/// and `last_comment_at` on every call (§4.1).
pub fn upsert(conn: &Connection, item: &ContentItem) -> Result<ContentItem> {
    if let Some(existing) = get(conn, &item.source_id)? {
        let first_posted = existing.first_posted.or(item.first_posted);

        conn.execute(
            r#"
            UPDATE content_items SET
                url = COALESCE(?2, url),
                title = COALESCE(?3, title),
                summary = COALESCE(?4, summary),
                engagement_score = ?5,
                comment_count = ?6,
                last_edited = COALESCE(?7, last_edited),
                last_comment_at = COALESCE(?8, last_comment_at),
                last_checked_at = ?9,
                scraped_date = COALESCE(?10, scraped_date)
            WHERE source_id = ?1
            "#,
            params![
                item.source_id.as_str(),
                item.url,
                item.title,
                item.summary,
                item.engagement_score,
                item.comment_count,
                item.last_edited.map(|d| d.to_rfc3339()),
                item.last_comment_at.map(|d| d.to_rfc3339()),
                Utc::now().to_rfc3339(),
                item.scraped_date.map(|d| d.to_string()),
            ],
        )?;

        return Ok(ContentItem {
            first_posted,
            last_checked_at: Some(Utc::now()),
            url: item.url.clone().or(existing.url),
            title: item.title.clone().or(existing.title),
            summary: item.summary.clone().or(existing.summary),
            engagement_score: item.engagement_score,
            comment_count: item.comment_count,
            last_edited: item.last_edited.or(existing.last_edited),
            last_comment_at: item.last_comment_at.or(existing.last_comment_at),
            scraped_date: item.scraped_date.or(existing.scraped_date),
            ..existing
        });
    }

    conn.execute(
        r#"
        INSERT INTO content_items (
            source_id, url, title, content_type, summary, engagement_score, comment_count,
            first_posted, last_edited, last_comment_at, last_checked_at, scraped_date
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
        params![
            item.source_id.as_str(),
            item.url,
            item.title,
            content_type_str(item.content_type),
            item.summary,
            item.engagement_score,
            item.comment_count,
            item.first_posted.map(|d| d.to_rfc3339()),
            item.last_edited.map(|d| d.to_rfc3339()),
            item.last_comment_at.map(|d| d.to_rfc3339()),
            Utc::now().to_rfc3339(),
            item.scraped_date.map(|d| d.to_string()),
        ],
    )?;

    Ok(ContentItem { last_checked_at: Some(Utc::now()), ..item.clone() })
}

pub fn get(conn: &Connection, source_id: &ContentId) -> Result<Option<ContentItem>> {
    conn.query_row(
        r#"
        SELECT source_id, url, title, content_type, summary, engagement_score, comment_count,
               first_posted, last_edited, last_comment_at, last_checked_at, scraped_date
        FROM content_items WHERE source_id = ?1
        "#,
        [source_id.as_str()],
        row_to_item,
    )
    .optional()
    .map_err(Into::into)
}

pub fn is_first_run_for_type(conn: &Connection, content_type: ContentType) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM content_items WHERE content_type = ?1",
        [content_type_str(content_type)],
        |row| row.get(0),
    )?;
    Ok(count == 0)
}

/// All items of a type ordered most-recent-first by `first_posted`, used
/// by the First-Run Policy (§4.5) to select which items survive the cap.
pub fn list_by_type_recent_first(
    conn: &Connection,
    content_type: ContentType,
) -> Result<Vec<ContentItem>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT source_id, url, title, content_type, summary, engagement_score, comment_count,
               first_posted, last_edited, last_comment_at, last_checked_at, scraped_date
        FROM content_items WHERE content_type = ?1
        ORDER BY first_posted DESC
        "#,
    )?;
    let rows = stmt
        .query_map([content_type_str(content_type)], row_to_item)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    Ok(rows)
}

fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<ContentItem> {
    Ok(ContentItem {
        source_id: ContentId::new(row.get::<_, String>(0)?),
        url: row.get(1)?,
        title: row.get(2)?,
        content_type: parse_content_type(&row.get::<_, String>(3)?),
        summary: row.get(4)?,
        engagement_score: row.get(5)?,
        comment_count: row.get(6)?,
        first_posted: parse_dt(row.get(7)?),
        last_edited: parse_dt(row.get(8)?),
        last_comment_at: parse_dt(row.get(9)?),
        last_checked_at: parse_dt(row.get(10)?),
        scraped_date: row
            .get::<_, Option<String>>(11)?
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
    })
}

fn parse_dt(raw: Option<String>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn content_type_str(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::ReleaseNote => "release_note",
        ContentType::DeployNote => "deploy_note",
        ContentType::Changelog => "changelog",
        ContentType::Blog => "blog",
        ContentType::Question => "question",
        ContentType::Reddit => "reddit",
        ContentType::Status => "status",
    }
}

fn parse_content_type(raw: &str) -> ContentType {
    match raw {
        "deploy_note" => ContentType::DeployNote,
        "changelog" => ContentType::Changelog,
        "blog" => ContentType::Blog,
        "question" => ContentType::Question,
        "reddit" => ContentType::Reddit,
        "status" => ContentType::Status,
        _ => ContentType::ReleaseNote,
    }
}
