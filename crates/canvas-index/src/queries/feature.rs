use canvas_types::{Feature, FeatureId, FeatureStatus};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::Result;

/// Idempotent: creates the feature on first reference (§4.1), otherwise
/// returns the existing row unchanged. `created_at` is set only once.
pub fn upsert(conn: &Connection, feature_id: &FeatureId, name: &str) -> Result<Feature> {
    if let Some(existing) = get(conn, feature_id)? {
        return Ok(existing);
    }

    let now = Utc::now();
    conn.execute(
        r#"
        INSERT INTO features (feature_id, name, status, description, llm_generated_at, created_at)
        VALUES (?1, ?2, ?3, NULL, NULL, ?4)
        "#,
        params![feature_id.as_str(), name, status_str(FeatureStatus::Active), now.to_rfc3339()],
    )?;

    Ok(Feature {
        feature_id: feature_id.clone(),
        name: name.to_string(),
        status: FeatureStatus::Active,
        description: None,
        llm_generated_at: None,
        created_at: now,
    })
}

pub fn get(conn: &Connection, feature_id: &FeatureId) -> Result<Option<Feature>> {
    conn.query_row(
        r#"
        SELECT feature_id, name, status, description, llm_generated_at, created_at
        FROM features WHERE feature_id = ?1
        "#,
        [feature_id.as_str()],
        row_to_feature,
    )
    .optional()
    .map_err(Into::into)
}

/// Every known feature (`canvas regenerate features`).
pub fn list_all(conn: &Connection) -> Result<Vec<Feature>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT feature_id, name, status, description, llm_generated_at, created_at
        FROM features
        "#,
    )?;
    let rows = stmt.query_map([], row_to_feature)?.collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    Ok(rows)
}

/// Writes the LLM-generated description (§4.6); does not touch status or
/// lifecycle.
pub fn set_description(conn: &Connection, feature_id: &FeatureId, description: &str) -> Result<()> {
    conn.execute(
        r#"
        UPDATE features SET description = ?2, llm_generated_at = ?3 WHERE feature_id = ?1
        "#,
        params![feature_id.as_str(), description, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

fn row_to_feature(row: &rusqlite::Row<'_>) -> rusqlite::Result<Feature> {
    let status_raw: String = row.get(2)?;
    Ok(Feature {
        feature_id: FeatureId::new(row.get::<_, String>(0)?),
        name: row.get(1)?,
        status: parse_status(&status_raw),
        description: row.get(3)?,
        llm_generated_at: row
            .get::<_, Option<String>>(4)?
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc)),
        created_at: chrono::DateTime::parse_from_rfc3339(&row.get::<_, String>(5)?)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

fn status_str(status: FeatureStatus) -> &'static str {
    match status {
        FeatureStatus::Active => "active",
        FeatureStatus::Deprecated => "deprecated",
    }
}

fn parse_status(raw: &str) -> FeatureStatus {
    match raw {
        "deprecated" => FeatureStatus::Deprecated,
        _ => FeatureStatus::Active,
    }
}
