use canvas_core::slugify;
use rusqlite::Connection;

use crate::Result;

/// One invariant violation surfaced by `canvas general triage` (SPEC_FULL
/// supplemented feature 1, grounded on the teacher's `DoctorService` /
/// `CheckResult`). Read-only: the check only reports, it never repairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// An announcement row has both or neither of `option_id`/`setting_id`
    /// set (§3 invariant 1).
    AnnouncementToggleArity { announcement_id: String },
    /// `option_id` no longer equals `slugify(canonical_name)` (§3
    /// invariant 2 / §8 testable property 2).
    OptionIdMismatch { option_id: String, canonical_name: String },
    /// A `ContentFeatureRef` row has none of its three FKs set (§3
    /// invariant).
    DanglingFeatureRef { content_id: String },
}

/// Scan the whole store for invariant violations. Intended to run cheaply
/// enough for an operator to call on demand, not on every write.
pub fn scan(conn: &Connection) -> Result<Vec<Violation>> {
    let mut violations = Vec::new();
    violations.extend(scan_announcement_arity(conn)?);
    violations.extend(scan_option_id_mismatch(conn)?);
    violations.extend(scan_dangling_feature_refs(conn)?);
    Ok(violations)
}

fn scan_announcement_arity(conn: &Connection) -> Result<Vec<Violation>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id FROM feature_announcements
        WHERE (option_id IS NULL AND setting_id IS NULL)
           OR (option_id IS NOT NULL AND setting_id IS NOT NULL)
        "#,
    )?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    Ok(rows.into_iter().map(|announcement_id| Violation::AnnouncementToggleArity { announcement_id }).collect())
}

fn scan_option_id_mismatch(conn: &Connection) -> Result<Vec<Violation>> {
    let mut stmt = conn.prepare("SELECT option_id, canonical_name FROM feature_options")?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    Ok(rows
        .into_iter()
        .filter(|(option_id, canonical_name)| *option_id != slugify(canonical_name))
        .map(|(option_id, canonical_name)| Violation::OptionIdMismatch { option_id, canonical_name })
        .collect())
}

fn scan_dangling_feature_refs(conn: &Connection) -> Result<Vec<Violation>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT content_id FROM content_feature_refs
        WHERE feature_id IS NULL AND option_id IS NULL AND setting_id IS NULL
        "#,
    )?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    Ok(rows.into_iter().map(|content_id| Violation::DanglingFeatureRef { content_id }).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    #[test]
    fn clean_store_has_no_violations() {
        let db = Database::open_in_memory().unwrap();
        assert!(scan(&db.conn).unwrap().is_empty());
    }

    #[test]
    fn detects_option_id_mismatch() {
        let db = Database::open_in_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO feature_options (option_id, feature_id, canonical_name, status, first_seen, last_seen) \
                 VALUES ('wrong_slug', 'assignments', 'Document Processor', 'pending', '2026-01-01', '2026-01-01')",
                [],
            )
            .unwrap();
        db.conn
            .execute(
                "INSERT INTO features (feature_id, name, status, created_at) VALUES ('assignments', 'Assignments', 'active', '2026-01-01T00:00:00Z')",
                [],
            )
            .unwrap();
        let violations = scan(&db.conn).unwrap();
        assert_eq!(
            violations,
            vec![Violation::OptionIdMismatch {
                option_id: "wrong_slug".to_string(),
                canonical_name: "Document Processor".to_string(),
            }]
        );
    }
}
