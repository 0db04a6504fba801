use canvas_types::{FeatureId, FeatureSetting, LifecycleDates, SettingId, ToggleStatus};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use canvas_core::slugify;

use super::lifecycle::{advance_date, advance_status, date_str, parse_date, parse_status, status_str};
use crate::Result;

/// Upsert by `setting_id = slugify(h4_title)`, scoped to `feature_id`
/// (§4.1). Mirrors `option::upsert`'s monotonic-lifecycle behavior.
pub fn upsert(
    conn: &Connection,
    h4_title: &str,
    feature_id: &FeatureId,
    proposed_status: ToggleStatus,
    proposed_lifecycle: &LifecycleDates,
    seen_on: NaiveDate,
) -> Result<FeatureSetting> {
    let setting_id = SettingId::new(format!("{}_{}", feature_id.as_str(), slugify(h4_title)));

    if let Some(existing) = get(conn, &setting_id)? {
        let status = advance_status(existing.status, proposed_status);
        let lifecycle = LifecycleDates {
            beta_date: advance_date(existing.lifecycle.beta_date, proposed_lifecycle.beta_date),
            production_date: advance_date(
                existing.lifecycle.production_date,
                proposed_lifecycle.production_date,
            ),
            deprecation_date: advance_date(
                existing.lifecycle.deprecation_date,
                proposed_lifecycle.deprecation_date,
            ),
        };
        let last_seen = if seen_on > existing.last_seen { seen_on } else { existing.last_seen };

        conn.execute(
            r#"
            UPDATE feature_settings SET
                status = ?2, beta_date = ?3, production_date = ?4, deprecation_date = ?5,
                last_seen = ?6
            WHERE setting_id = ?1
            "#,
            params![
                setting_id.as_str(),
                status_str(status),
                date_str(lifecycle.beta_date),
                date_str(lifecycle.production_date),
                date_str(lifecycle.deprecation_date),
                last_seen.to_string(),
            ],
        )?;

        return Ok(FeatureSetting { status, lifecycle, last_seen, ..existing });
    }

    conn.execute(
        r#"
        INSERT INTO feature_settings (
            setting_id, feature_id, title, status, beta_date, production_date,
            deprecation_date, description, meta_summary, implementation_status,
            first_seen, last_seen
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, NULL, NULL, ?8, ?8)
        "#,
        params![
            setting_id.as_str(),
            feature_id.as_str(),
            h4_title,
            status_str(proposed_status),
            date_str(proposed_lifecycle.beta_date),
            date_str(proposed_lifecycle.production_date),
            date_str(proposed_lifecycle.deprecation_date),
            seen_on.to_string(),
        ],
    )?;

    Ok(FeatureSetting {
        setting_id,
        feature_id: feature_id.clone(),
        title: h4_title.to_string(),
        status: proposed_status,
        lifecycle: proposed_lifecycle.clone(),
        description: None,
        meta_summary: None,
        implementation_status: None,
        first_seen: seen_on,
        last_seen: seen_on,
    })
}

pub fn get(conn: &Connection, setting_id: &SettingId) -> Result<Option<FeatureSetting>> {
    conn.query_row(
        r#"
        SELECT setting_id, feature_id, title, status, beta_date, production_date,
               deprecation_date, description, meta_summary, implementation_status,
               first_seen, last_seen
        FROM feature_settings WHERE setting_id = ?1
        "#,
        [setting_id.as_str()],
        row_to_setting,
    )
    .optional()
    .map_err(Into::into)
}

/// Every known setting, for the community heuristic matcher (§4.3).
pub fn list_all(conn: &Connection) -> Result<Vec<FeatureSetting>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT setting_id, feature_id, title, status, beta_date, production_date,
               deprecation_date, description, meta_summary, implementation_status,
               first_seen, last_seen
        FROM feature_settings
        "#,
    )?;
    let rows = stmt.query_map([], row_to_setting)?.collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    Ok(rows)
}

pub fn set_enrichment(
    conn: &Connection,
    setting_id: &SettingId,
    description: Option<&str>,
    meta_summary: Option<&str>,
    implementation_status: Option<&str>,
) -> Result<()> {
    conn.execute(
        r#"
        UPDATE feature_settings
        SET description = COALESCE(?2, description),
            meta_summary = COALESCE(?3, meta_summary),
            implementation_status = COALESCE(?4, implementation_status)
        WHERE setting_id = ?1
        "#,
        params![setting_id.as_str(), description, meta_summary, implementation_status],
    )?;
    Ok(())
}

fn row_to_setting(row: &rusqlite::Row<'_>) -> rusqlite::Result<FeatureSetting> {
    Ok(FeatureSetting {
        setting_id: SettingId::new(row.get::<_, String>(0)?),
        feature_id: FeatureId::new(row.get::<_, String>(1)?),
        title: row.get(2)?,
        status: parse_status(&row.get::<_, String>(3)?),
        lifecycle: LifecycleDates {
            beta_date: parse_date(row.get(4)?),
            production_date: parse_date(row.get(5)?),
            deprecation_date: parse_date(row.get(6)?),
        },
        description: row.get(7)?,
        meta_summary: row.get(8)?,
        implementation_status: row.get(9)?,
        first_seen: parse_date(row.get(10)?).unwrap_or_default(),
        last_seen: parse_date(row.get(11)?).unwrap_or_default(),
    })
}
