use canvas_types::{ContentId, DiscussionTracking};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::Result;

pub fn get(conn: &Connection, source_id: &ContentId) -> Result<Option<DiscussionTracking>> {
    conn.query_row(
        r#"
        SELECT source_id, comment_count, last_comment_at, last_emitted_at
        FROM discussion_tracking WHERE source_id = ?1
        "#,
        [source_id.as_str()],
        row_to_tracking,
    )
    .optional()
    .map_err(Into::into)
}

pub fn upsert(conn: &Connection, tracking: &DiscussionTracking) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO discussion_tracking (source_id, comment_count, last_comment_at, last_emitted_at)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(source_id) DO UPDATE SET
            comment_count = ?2,
            last_comment_at = ?3,
            last_emitted_at = ?4
        "#,
        params![
            tracking.source_id.as_str(),
            tracking.comment_count,
            tracking.last_comment_at.map(|d| d.to_rfc3339()),
            tracking.last_emitted_at.map(|d| d.to_rfc3339()),
        ],
    )?;
    Ok(())
}

fn row_to_tracking(row: &rusqlite::Row<'_>) -> rusqlite::Result<DiscussionTracking> {
    Ok(DiscussionTracking {
        source_id: ContentId::new(row.get::<_, String>(0)?),
        comment_count: row.get(1)?,
        last_comment_at: row
            .get::<_, Option<String>>(2)?
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc)),
        last_emitted_at: row
            .get::<_, Option<String>>(3)?
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc)),
    })
}
