use rusqlite::Connection;

use crate::Result;

pub const SCHEMA_VERSION: i32 = 1;

pub fn init_schema(conn: &Connection) -> Result<()> {
    let current_version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if current_version != 0 && current_version != SCHEMA_VERSION {
        drop_all_tables(conn)?;
    }

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS features (
            feature_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            status TEXT NOT NULL,
            description TEXT,
            llm_generated_at TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS feature_options (
            option_id TEXT PRIMARY KEY,
            feature_id TEXT NOT NULL,
            canonical_name TEXT NOT NULL,
            status TEXT NOT NULL,
            beta_date TEXT,
            production_date TEXT,
            deprecation_date TEXT,
            description TEXT,
            meta_summary TEXT,
            implementation_status TEXT,
            user_group_url TEXT,
            first_seen TEXT NOT NULL,
            last_seen TEXT NOT NULL,
            FOREIGN KEY (feature_id) REFERENCES features(feature_id)
        );

        CREATE TABLE IF NOT EXISTS feature_settings (
            setting_id TEXT PRIMARY KEY,
            feature_id TEXT NOT NULL,
            title TEXT NOT NULL,
            status TEXT NOT NULL,
            beta_date TEXT,
            production_date TEXT,
            deprecation_date TEXT,
            description TEXT,
            meta_summary TEXT,
            implementation_status TEXT,
            first_seen TEXT NOT NULL,
            last_seen TEXT NOT NULL,
            FOREIGN KEY (feature_id) REFERENCES features(feature_id)
        );

        CREATE TABLE IF NOT EXISTS feature_announcements (
            id TEXT PRIMARY KEY,
            feature_id TEXT NOT NULL,
            option_id TEXT,
            setting_id TEXT,
            content_id TEXT NOT NULL,
            h4_title TEXT NOT NULL,
            anchor_id TEXT NOT NULL,
            section TEXT NOT NULL,
            category TEXT NOT NULL,
            raw_content TEXT NOT NULL,
            description TEXT,
            implications TEXT,
            enable_location_account TEXT,
            enable_location_course TEXT,
            subaccount_config INTEGER,
            permissions TEXT,
            affected_areas TEXT NOT NULL DEFAULT '',
            affects_ui INTEGER,
            added_date TEXT,
            announced_at TEXT NOT NULL,
            UNIQUE(content_id, anchor_id),
            FOREIGN KEY (feature_id) REFERENCES features(feature_id)
        );

        CREATE TABLE IF NOT EXISTS content_items (
            source_id TEXT PRIMARY KEY,
            url TEXT,
            title TEXT,
            content_type TEXT NOT NULL,
            summary TEXT,
            engagement_score INTEGER,
            comment_count INTEGER,
            first_posted TEXT,
            last_edited TEXT,
            last_comment_at TEXT,
            last_checked_at TEXT,
            scraped_date TEXT
        );

        CREATE TABLE IF NOT EXISTS content_comments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            content_id TEXT NOT NULL,
            comment_text TEXT NOT NULL,
            posted_at TEXT,
            position INTEGER NOT NULL,
            FOREIGN KEY (content_id) REFERENCES content_items(source_id)
        );

        CREATE TABLE IF NOT EXISTS content_feature_refs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            content_id TEXT NOT NULL,
            feature_id TEXT,
            option_id TEXT,
            setting_id TEXT,
            mention_type TEXT NOT NULL,
            superseded INTEGER NOT NULL DEFAULT 0,
            -- `ref_key` is content_id || '|' || coalesce(feature_id,'') ||
            -- '|' || coalesce(option_id,'') || '|' || coalesce(setting_id,'')
            -- computed by callers, since SQLite's UNIQUE treats NULL columns
            -- as distinct and can't enforce the spec's coalesce-based key.
            ref_key TEXT NOT NULL UNIQUE,
            FOREIGN KEY (content_id) REFERENCES content_items(source_id)
        );

        CREATE TABLE IF NOT EXISTS upcoming_changes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            content_id TEXT NOT NULL,
            change_date TEXT,
            description TEXT NOT NULL,
            FOREIGN KEY (content_id) REFERENCES content_items(source_id)
        );

        CREATE TABLE IF NOT EXISTS discussion_tracking (
            source_id TEXT PRIMARY KEY,
            comment_count INTEGER NOT NULL,
            last_comment_at TEXT,
            last_emitted_at TEXT
        );

        CREATE TABLE IF NOT EXISTS feed_runs (
            feed_date TEXT PRIMARY KEY,
            item_count INTEGER NOT NULL,
            payload TEXT NOT NULL,
            generated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS emitted_items (
            guid TEXT PRIMARY KEY,
            feed_date TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS enrichment_cache (
            entity_kind TEXT NOT NULL,
            entity_id TEXT NOT NULL,
            content_hash TEXT NOT NULL,
            field TEXT NOT NULL,
            value TEXT NOT NULL,
            generated_at TEXT NOT NULL,
            PRIMARY KEY (entity_kind, entity_id, field)
        );

        CREATE INDEX IF NOT EXISTS idx_options_feature ON feature_options(feature_id);
        CREATE INDEX IF NOT EXISTS idx_settings_feature ON feature_settings(feature_id);
        CREATE INDEX IF NOT EXISTS idx_announcements_option ON feature_announcements(option_id);
        CREATE INDEX IF NOT EXISTS idx_announcements_setting ON feature_announcements(setting_id);
        CREATE INDEX IF NOT EXISTS idx_refs_content ON content_feature_refs(content_id);
        CREATE INDEX IF NOT EXISTS idx_comments_content ON content_comments(content_id);
        "#,
    )?;

    conn.execute(&format!("PRAGMA user_version = {}", SCHEMA_VERSION), [])?;

    Ok(())
}

fn drop_all_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DROP TABLE IF EXISTS enrichment_cache;
        DROP TABLE IF EXISTS emitted_items;
        DROP TABLE IF EXISTS feed_runs;
        DROP TABLE IF EXISTS discussion_tracking;
        DROP TABLE IF EXISTS upcoming_changes;
        DROP TABLE IF EXISTS content_feature_refs;
        DROP TABLE IF EXISTS content_comments;
        DROP TABLE IF EXISTS content_items;
        DROP TABLE IF EXISTS feature_announcements;
        DROP TABLE IF EXISTS feature_settings;
        DROP TABLE IF EXISTS feature_options;
        DROP TABLE IF EXISTS features;
        "#,
    )?;
    Ok(())
}
