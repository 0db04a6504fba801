use canvas_types::{ContentId, UpcomingChange};
use rusqlite::{params, Connection};

use crate::Result;

pub fn insert(conn: &Connection, change: &UpcomingChange) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO upcoming_changes (content_id, change_date, description)
        VALUES (?1, ?2, ?3)
        "#,
        params![
            change.content_id.as_str(),
            change.change_date.map(|d| d.to_string()),
            change.description,
        ],
    )?;
    Ok(())
}

pub fn list_for_content(conn: &Connection, content_id: &ContentId) -> Result<Vec<UpcomingChange>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT content_id, change_date, description
        FROM upcoming_changes WHERE content_id = ?1
        "#,
    )?;
    let rows = stmt
        .query_map([content_id.as_str()], |row| {
            Ok(UpcomingChange {
                content_id: ContentId::new(row.get::<_, String>(0)?),
                change_date: row
                    .get::<_, Option<String>>(1)?
                    .and_then(|s| chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
                description: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    Ok(rows)
}
