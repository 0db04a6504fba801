use canvas_types::{ChangeVerdict, ConfigSnapshot, FeatureAnnouncement, SectionKind, ToggleRef};
use rusqlite::{params, Connection, ErrorCode};

use crate::{Error, Result};

/// Immutable insert. Fails with `Error::DuplicateAnnouncement` if
/// `(content_id, anchor_id)` already exists (§4.1) — callers swallow that
/// as an idempotent skip (§7).
pub fn insert(conn: &Connection, announcement: &FeatureAnnouncement) -> Result<()> {
    let (option_id, setting_id) = match &announcement.toggle_ref {
        ToggleRef::Option(id) => (Some(id.as_str()), None),
        ToggleRef::Setting(id) => (None, Some(id.as_str())),
    };

    let section = section_str(&announcement.section);

    let result = conn.execute(
        r#"
        INSERT INTO feature_announcements (
            id, feature_id, option_id, setting_id, content_id, h4_title, anchor_id,
            section, category, raw_content, description, implications,
            enable_location_account, enable_location_course, subaccount_config,
            permissions, affected_areas, affects_ui, added_date, announced_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)
        "#,
        params![
            announcement.id,
            announcement.feature_id.as_str(),
            option_id,
            setting_id,
            announcement.content_id.as_str(),
            announcement.h4_title,
            announcement.anchor_id,
            section,
            announcement.category,
            announcement.raw_content,
            announcement.description,
            announcement.implications,
            announcement.config.enable_location_account,
            announcement.config.enable_location_course,
            announcement.config.subaccount_config,
            announcement.config.permissions,
            announcement.config.affected_areas.join(","),
            announcement.config.affects_ui,
            announcement.added_date.map(|d| d.to_string()),
            announcement.announced_at.to_string(),
        ],
    );

    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == ErrorCode::ConstraintViolation =>
        {
            Err(Error::DuplicateAnnouncement {
                content_id: announcement.content_id.as_str().to_string(),
                anchor_id: announcement.anchor_id.clone(),
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Count of announcements referencing this option/setting, for the
/// NEW-vs-UPDATE verdict (§4.3): exactly one means this announcement is
/// the toggle's first.
pub fn count_for_toggle(conn: &Connection, toggle_ref: &ToggleRef) -> Result<i64> {
    let count = match toggle_ref {
        ToggleRef::Option(id) => conn.query_row(
            "SELECT COUNT(*) FROM feature_announcements WHERE option_id = ?1",
            [id.as_str()],
            |row| row.get(0),
        )?,
        ToggleRef::Setting(id) => conn.query_row(
            "SELECT COUNT(*) FROM feature_announcements WHERE setting_id = ?1",
            [id.as_str()],
            |row| row.get(0),
        )?,
    };
    Ok(count)
}

pub fn verdict_for_toggle(conn: &Connection, toggle_ref: &ToggleRef) -> Result<ChangeVerdict> {
    let count = count_for_toggle(conn, toggle_ref)?;
    Ok(if count <= 1 { ChangeVerdict::New } else { ChangeVerdict::Update })
}

fn section_str(section: &SectionKind) -> String {
    match section {
        SectionKind::NewFeatures => "New Features".to_string(),
        SectionKind::UpdatedFeatures => "Updated Features".to_string(),
        SectionKind::PlatformIntegration => "Platform/Integration".to_string(),
        SectionKind::OtherUpdates => "Other Updates".to_string(),
        SectionKind::UpcomingCanvasChanges => "Upcoming Canvas Changes".to_string(),
        SectionKind::Other(text) => text.clone(),
    }
}

pub fn set_enrichment(
    conn: &Connection,
    id: &str,
    description: Option<&str>,
    implications: Option<&str>,
) -> Result<()> {
    conn.execute(
        r#"
        UPDATE feature_announcements
        SET description = COALESCE(?2, description),
            implications = COALESCE(?3, implications)
        WHERE id = ?1
        "#,
        params![id, description, implications],
    )?;
    Ok(())
}

/// Used by the Feed Assembler (§4.7) to pull this run's announcements
/// ordered for emission: release/deploy notes first, grouped by category,
/// descending by `announced_at` within a group.
pub fn recent_for_content(conn: &Connection, content_id: &str) -> Result<Vec<FeatureAnnouncement>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, feature_id, option_id, setting_id, content_id, h4_title, anchor_id,
               section, category, raw_content, description, implications,
               enable_location_account, enable_location_course, subaccount_config,
               permissions, affected_areas, affects_ui, added_date, announced_at
        FROM feature_announcements WHERE content_id = ?1
        ORDER BY announced_at DESC
        "#,
    )?;

    let rows = stmt
        .query_map([content_id], row_to_announcement)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    Ok(rows)
}

fn row_to_announcement(row: &rusqlite::Row<'_>) -> rusqlite::Result<FeatureAnnouncement> {
    use canvas_types::{ContentId, FeatureId, OptionId, SettingId};

    let option_id: Option<String> = row.get(2)?;
    let setting_id: Option<String> = row.get(3)?;
    let toggle_ref = match (option_id, setting_id) {
        (Some(o), _) => ToggleRef::Option(OptionId::new(o)),
        (None, Some(s)) => ToggleRef::Setting(SettingId::new(s)),
        (None, None) => ToggleRef::Setting(SettingId::new(String::new())),
    };

    let affected_areas_raw: String = row.get(16)?;
    let added_date: Option<String> = row.get(18)?;
    let announced_at: String = row.get(19)?;

    Ok(FeatureAnnouncement {
        id: row.get(0)?,
        feature_id: FeatureId::new(row.get::<_, String>(1)?),
        toggle_ref,
        content_id: ContentId::new(row.get::<_, String>(4)?),
        h4_title: row.get(5)?,
        anchor_id: row.get(6)?,
        section: SectionKind::from_h2_text(&row.get::<_, String>(7)?),
        category: row.get(8)?,
        raw_content: row.get(9)?,
        description: row.get(10)?,
        implications: row.get(11)?,
        config: ConfigSnapshot {
            enable_location_account: row.get(12)?,
            enable_location_course: row.get(13)?,
            subaccount_config: row.get(14)?,
            permissions: row.get(15)?,
            affected_areas: if affected_areas_raw.is_empty() {
                Vec::new()
            } else {
                affected_areas_raw.split(',').map(|s| s.to_string()).collect()
            },
            affects_ui: row.get(17)?,
        },
        added_date: added_date.and_then(|s| chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        announced_at: chrono::NaiveDate::parse_from_str(&announced_at, "%Y-%m-%d")
            .unwrap_or_default(),
    })
}
