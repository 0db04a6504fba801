use canvas_types::{ContentFeatureRef, ContentId, FeatureId, MentionType, OptionId, SettingId};
use rusqlite::{params, Connection};

use crate::{Error, Result};

/// Upsert on the coalesce-based uniqueness key (§3): at least one of
/// `feature_id`/`option_id`/`setting_id` must be set, enforced here rather
/// than trusted from the caller.
pub fn upsert(conn: &Connection, feature_ref: &ContentFeatureRef) -> Result<()> {
    if !feature_ref.has_target() {
        return Err(Error::InvalidWrite(
            "ContentFeatureRef requires at least one of feature_id/option_id/setting_id".into(),
        ));
    }

    let ref_key = ref_key(
        feature_ref.content_id.as_str(),
        feature_ref.feature_id.as_ref().map(|id| id.as_str()),
        feature_ref.option_id.as_ref().map(|id| id.as_str()),
        feature_ref.setting_id.as_ref().map(|id| id.as_str()),
    );

    conn.execute(
        r#"
        INSERT INTO content_feature_refs (
            content_id, feature_id, option_id, setting_id, mention_type, superseded, ref_key
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT(ref_key) DO UPDATE SET
            mention_type = ?5,
            superseded = ?6
        "#,
        params![
            feature_ref.content_id.as_str(),
            feature_ref.feature_id.as_ref().map(|id| id.as_str()),
            feature_ref.option_id.as_ref().map(|id| id.as_str()),
            feature_ref.setting_id.as_ref().map(|id| id.as_str()),
            mention_type_str(feature_ref.mention_type),
            feature_ref.superseded,
            ref_key,
        ],
    )?;
    Ok(())
}

pub fn list_for_content(conn: &Connection, content_id: &ContentId) -> Result<Vec<ContentFeatureRef>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT content_id, feature_id, option_id, setting_id, mention_type, superseded
        FROM content_feature_refs WHERE content_id = ?1
        "#,
    )?;
    let rows = stmt
        .query_map([content_id.as_str()], row_to_ref)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    Ok(rows)
}

/// Non-superseded refs pointing at `feature_id` (`canvas general list`,
/// SPEC_FULL supplemented feature 4) — used with the synthetic `general`
/// feature to enumerate the manual-triage backlog.
pub fn list_for_feature(conn: &Connection, feature_id: &FeatureId) -> Result<Vec<ContentFeatureRef>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT content_id, feature_id, option_id, setting_id, mention_type, superseded
        FROM content_feature_refs
        WHERE feature_id = ?1 AND superseded = 0
        "#,
    )?;
    let rows = stmt
        .query_map([feature_id.as_str()], row_to_ref)?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    Ok(rows)
}

/// Marks every non-superseded ref of `content_id` pointing at `feature_id`
/// as superseded, without deleting the row (§9 monotonic-history
/// principle) — the precursor to `assign` writing a fresh ref at the real
/// feature.
pub fn mark_superseded(conn: &Connection, content_id: &ContentId, feature_id: &FeatureId) -> Result<()> {
    conn.execute(
        r#"
        UPDATE content_feature_refs SET superseded = 1
        WHERE content_id = ?1 AND feature_id = ?2 AND superseded = 0
        "#,
        params![content_id.as_str(), feature_id.as_str()],
    )?;
    Ok(())
}

fn row_to_ref(row: &rusqlite::Row<'_>) -> rusqlite::Result<ContentFeatureRef> {
    Ok(ContentFeatureRef {
        content_id: ContentId::new(row.get::<_, String>(0)?),
        feature_id: row.get::<_, Option<String>>(1)?.map(FeatureId::new),
        option_id: row.get::<_, Option<String>>(2)?.map(OptionId::new),
        setting_id: row.get::<_, Option<String>>(3)?.map(SettingId::new),
        mention_type: parse_mention_type(&row.get::<_, String>(4)?),
        superseded: row.get(5)?,
    })
}

fn ref_key(content_id: &str, feature_id: Option<&str>, option_id: Option<&str>, setting_id: Option<&str>) -> String {
    format!(
        "{}|{}|{}|{}",
        content_id,
        feature_id.unwrap_or(""),
        option_id.unwrap_or(""),
        setting_id.unwrap_or("")
    )
}

fn mention_type_str(mention_type: MentionType) -> &'static str {
    match mention_type {
        MentionType::Announces => "announces",
        MentionType::Discusses => "discusses",
        MentionType::Questions => "questions",
        MentionType::Feedback => "feedback",
    }
}

fn parse_mention_type(raw: &str) -> MentionType {
    match raw {
        "discusses" => MentionType::Discusses,
        "questions" => MentionType::Questions,
        "feedback" => MentionType::Feedback,
        _ => MentionType::Announces,
    }
}
