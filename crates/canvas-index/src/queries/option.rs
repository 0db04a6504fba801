use canvas_types::{FeatureId, FeatureOption, LifecycleDates, OptionId, ToggleStatus};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use canvas_core::slugify;

use super::lifecycle::{advance_date, advance_status, date_str, parse_date, parse_status, status_str};
use crate::Result;

/// Upsert by `option_id = slugify(canonical_name)` (§4.1 invariant: this
/// identity never re-keys). `last_seen` advances on every call; lifecycle
/// dates and status only ever move forward (§9).
#[allow(clippy::too_many_arguments)]
pub fn upsert(
    conn: &Connection,
    canonical_name: &str,
    feature_id: &FeatureId,
    proposed_status: ToggleStatus,
    proposed_lifecycle: &LifecycleDates,
    seen_on: NaiveDate,
) -> Result<FeatureOption> {
    let option_id = OptionId::new(slugify(canonical_name));

    if let Some(existing) = get(conn, &option_id)? {
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
            UPDATE feature_options SET
                status = ?2, beta_date = ?3, production_date = ?4, deprecation_date = ?5,
                last_seen = ?6
            WHERE option_id = ?1
            "#,
            params![
                option_id.as_str(),
                status_str(status),
                date_str(lifecycle.beta_date),
                date_str(lifecycle.production_date),
                date_str(lifecycle.deprecation_date),
                last_seen.to_string(),
            ],
        )?;

        return Ok(FeatureOption { status, lifecycle, last_seen, ..existing });
    }

    conn.execute(
        r#"
        INSERT INTO feature_options (
            option_id, feature_id, canonical_name, status, beta_date, production_date,
            deprecation_date, description, meta_summary, implementation_status,
            user_group_url, first_seen, last_seen
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, NULL, NULL, NULL, ?8, ?8)
        "#,
        params![
            option_id.as_str(),
            feature_id.as_str(),
            canonical_name,
            status_str(proposed_status),
            date_str(proposed_lifecycle.beta_date),
            date_str(proposed_lifecycle.production_date),
            date_str(proposed_lifecycle.deprecation_date),
            seen_on.to_string(),
        ],
    )?;

    Ok(FeatureOption {
        option_id,
        feature_id: feature_id.clone(),
        canonical_name: canonical_name.to_string(),
        status: proposed_status,
        lifecycle: proposed_lifecycle.clone(),
        description: None,
        meta_summary: None,
        implementation_status: None,
        user_group_url: None,
        first_seen: seen_on,
        last_seen: seen_on,
    })
}

pub fn get(conn: &Connection, option_id: &OptionId) -> Result<Option<FeatureOption>> {
    conn.query_row(
        r#"
        SELECT option_id, feature_id, canonical_name, status, beta_date, production_date,
               deprecation_date, description, meta_summary, implementation_status,
               user_group_url, first_seen, last_seen
        FROM feature_options WHERE option_id = ?1
        "#,
        [option_id.as_str()],
        row_to_option,
    )
    .optional()
    .map_err(Into::into)
}

/// Every known option, for the community heuristic matcher (§4.3) to
/// compare post text against canonical names.
pub fn list_all(conn: &Connection) -> Result<Vec<FeatureOption>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT option_id, feature_id, canonical_name, status, beta_date, production_date,
               deprecation_date, description, meta_summary, implementation_status,
               user_group_url, first_seen, last_seen
        FROM feature_options
        "#,
    )?;
    let rows = stmt.query_map([], row_to_option)?.collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    Ok(rows)
}

pub fn set_enrichment(
    conn: &Connection,
    option_id: &OptionId,
    description: Option<&str>,
    meta_summary: Option<&str>,
    implementation_status: Option<&str>,
) -> Result<()> {
    conn.execute(
        r#"
        UPDATE feature_options
        SET description = COALESCE(?2, description),
            meta_summary = COALESCE(?3, meta_summary),
            implementation_status = COALESCE(?4, implementation_status)
        WHERE option_id = ?1
        "#,
        params![option_id.as_str(), description, meta_summary, implementation_status],
    )?;
    Ok(())
}

fn row_to_option(row: &rusqlite::Row<'_>) -> rusqlite::Result<FeatureOption> {
    Ok(FeatureOption {
        option_id: OptionId::new(row.get::<_, String>(0)?),
        feature_id: FeatureId::new(row.get::<_, String>(1)?),
        canonical_name: row.get(2)?,
        status: parse_status(&row.get::<_, String>(3)?),
        lifecycle: LifecycleDates {
            beta_date: parse_date(row.get(4)?),
            production_date: parse_date(row.get(5)?),
            deprecation_date: parse_date(row.get(6)?),
        },
        description: row.get(7)?,
        meta_summary: row.get(8)?,
        implementation_status: row.get(9)?,
        user_group_url: row.get(10)?,
        first_seen: parse_date(row.get(11)?).unwrap_or_default(),
        last_seen: parse_date(row.get(12)?).unwrap_or_default(),
    })
}
