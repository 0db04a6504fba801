use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::Result;

/// One cached LLM output, keyed on `(entity_kind, entity_id, field)` with
/// `content_hash` recording what inputs produced it (§4.6, SPEC_FULL
/// supplemented feature 3: a persisted cache, not just an in-process one).
#[derive(Debug, Clone)]
pub struct CachedField {
    pub content_hash: String,
    pub value: String,
}

/// Look up a cached value for `(entity_kind, entity_id, field)`. Callers
/// compare the returned `content_hash` against the hash of today's inputs
/// before trusting `value` — a stale hash means the underlying record
/// changed and the cache entry must be regenerated.
pub fn get(conn: &Connection, entity_kind: &str, entity_id: &str, field: &str) -> Result<Option<CachedField>> {
    conn.query_row(
        r#"
        SELECT content_hash, value FROM enrichment_cache
        WHERE entity_kind = ?1 AND entity_id = ?2 AND field = ?3
        "#,
        params![entity_kind, entity_id, field],
        |row| Ok(CachedField { content_hash: row.get(0)?, value: row.get(1)? }),
    )
    .optional()
    .map_err(Into::into)
}

pub fn put(
    conn: &Connection,
    entity_kind: &str,
    entity_id: &str,
    field: &str,
    content_hash: &str,
    value: &str,
) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO enrichment_cache (entity_kind, entity_id, content_hash, field, value, generated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT(entity_kind, entity_id, field) DO UPDATE SET
            content_hash = ?3, value = ?5, generated_at = ?6
        "#,
        params![entity_kind, entity_id, content_hash, field, value, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

/// Every cached row whose stored `content_hash` no longer matches current
/// inputs, or whose `value` was never populated — used by `regenerate
/// --missing` (SPEC_FULL supplemented feature 2) to scope a rerun.
pub fn is_stale(conn: &Connection, entity_kind: &str, entity_id: &str, field: &str, current_hash: &str) -> Result<bool> {
    match get(conn, entity_kind, entity_id, field)? {
        Some(cached) => Ok(cached.content_hash != current_hash),
        None => Ok(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    #[test]
    fn miss_then_hit_after_put() {
        let db = Database::open_in_memory().unwrap();
        assert!(get(&db.conn, "option", "doc_processor", "description").unwrap().is_none());
        put(&db.conn, "option", "doc_processor", "description", "hash1", "A new tool.").unwrap();
        let cached = get(&db.conn, "option", "doc_processor", "description").unwrap().unwrap();
        assert_eq!(cached.value, "A new tool.");
        assert_eq!(cached.content_hash, "hash1");
    }

    #[test]
    fn stale_when_hash_changes() {
        let db = Database::open_in_memory().unwrap();
        put(&db.conn, "option", "doc_processor", "description", "hash1", "A new tool.").unwrap();
        assert!(!is_stale(&db.conn, "option", "doc_processor", "description", "hash1").unwrap());
        assert!(is_stale(&db.conn, "option", "doc_processor", "description", "hash2").unwrap());
    }
}
