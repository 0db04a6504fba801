use canvas_types::FeedRun;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use crate::Result;

/// Records the run, and marks every emitted GUID as seen so future runs'
/// dedup check (§4.7) can find it via `was_emitted`.
pub fn insert(conn: &Connection, run: &FeedRun, emitted_guids: &[String]) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO feed_runs (feed_date, item_count, payload, generated_at)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(feed_date) DO UPDATE SET
            item_count = ?2, payload = ?3, generated_at = ?4
        "#,
        params![
            run.feed_date.to_string(),
            run.item_count as i64,
            run.payload,
            run.generated_at.to_rfc3339(),
        ],
    )?;

    for guid in emitted_guids {
        conn.execute(
            r#"
            INSERT INTO emitted_items (guid, feed_date) VALUES (?1, ?2)
            ON CONFLICT(guid) DO UPDATE SET feed_date = ?2
            "#,
            params![guid, run.feed_date.to_string()],
        )?;
    }

    Ok(())
}

pub fn was_emitted(conn: &Connection, guid: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM emitted_items WHERE guid = ?1",
        [guid],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn get(conn: &Connection, feed_date: NaiveDate) -> Result<Option<FeedRun>> {
    conn.query_row(
        r#"
        SELECT feed_date, item_count, payload, generated_at
        FROM feed_runs WHERE feed_date = ?1
        "#,
        [feed_date.to_string()],
        |row| {
            Ok(FeedRun {
                feed_date: NaiveDate::parse_from_str(&row.get::<_, String>(0)?, "%Y-%m-%d")
                    .unwrap_or_default(),
                item_count: row.get::<_, i64>(1)? as usize,
                payload: row.get(2)?,
                generated_at: chrono::DateTime::parse_from_rfc3339(&row.get::<_, String>(3)?)
                    .map(|dt| dt.with_timezone(&chrono::Utc))
                    .unwrap_or_else(|_| chrono::Utc::now()),
            })
        },
    )
    .optional()
    .map_err(Into::into)
}
