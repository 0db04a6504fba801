use canvas_types::{ContentComment, ContentId};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::Result;

/// Comments are additive — old positions are retained, never overwritten
/// (§3). `comment_text` is assumed already PII-redacted by the caller.
pub fn insert(conn: &Connection, comment: &ContentComment) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO content_comments (content_id, comment_text, posted_at, position)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![
            comment.content_id.as_str(),
            comment.comment_text,
            comment.posted_at.map(|d| d.to_rfc3339()),
            comment.position,
        ],
    )?;
    Ok(())
}

pub fn list_for_content(conn: &Connection, content_id: &ContentId) -> Result<Vec<ContentComment>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT content_id, comment_text, posted_at, position
        FROM content_comments WHERE content_id = ?1
        ORDER BY position ASC
        "#,
    )?;
    let rows = stmt
        .query_map([content_id.as_str()], |row| {
            Ok(ContentComment {
                content_id: ContentId::new(row.get::<_, String>(0)?),
                comment_text: row.get(1)?,
                posted_at: row
                    .get::<_, Option<String>>(2)?
                    .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                    .map(|dt| dt.with_timezone(&Utc)),
                position: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    Ok(rows)
}
