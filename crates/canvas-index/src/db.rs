use std::path::Path;

use canvas_types::{
    ChangeVerdict, ContentComment, ContentFeatureRef, ContentId, ContentItem, ContentType,
    DiscussionTracking, Feature, FeatureAnnouncement, FeatureId, FeatureOption, FeatureSetting,
    FeedRun, LifecycleDates, OptionId, SettingId, ToggleRef, ToggleStatus, UpcomingChange,
};
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::queries;
use crate::schema::init_schema;
use crate::{Error, Result};

/// Single-writer transactional store over the canonical data model (§3,
/// §4.1). One `Database` owns one `rusqlite::Connection`; callers that need
/// concurrent readers (the archive API) open their own independent
/// read-only connection against the same file.
pub struct Database {
    pub(crate) conn: Connection,
}

impl Database {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        let db = Self { conn };
        init_schema(&db.conn)?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        init_schema(&db.conn)?;
        Ok(db)
    }

    /// Run `body` inside a SQLite transaction. All writes commit together
    /// or none do — the transactional boundary §4.8 requires per page.
    /// `body` gets a `StoreHandle` borrowed from the open transaction, so
    /// it can call the exact same query methods the autocommit path uses.
    /// Generic over the caller's own error type (`canvas-engine`'s
    /// classifier returns its own `Error`, not this crate's) so long as it
    /// can represent a store failure.
    pub fn transaction<T, E>(
        &mut self,
        body: impl FnOnce(StoreHandle<'_>) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E>
    where
        E: From<Error>,
    {
        let tx = self.conn.transaction().map_err(Error::from).map_err(E::from)?;
        let result = body(StoreHandle { conn: &tx })?;
        tx.commit().map_err(Error::from).map_err(E::from)?;
        Ok(result)
    }

    /// A handle onto this store's connection in autocommit mode, for
    /// callers (the classifier, discussion tracker) that run the same
    /// query methods `transaction` hands to its closure.
    pub fn handle(&self) -> StoreHandle<'_> {
        StoreHandle { conn: &self.conn }
    }

    /// True iff zero rows of `content_type` exist yet — governs the
    /// first-run flood cap (§4.5).
    pub fn is_first_run_for_type(&self, content_type: ContentType) -> Result<bool> {
        queries::content_item::is_first_run_for_type(&self.conn, content_type)
    }

    // -- §4.1 public contract -------------------------------------------

    pub fn upsert_feature(&self, feature_id: &FeatureId, name: &str) -> Result<Feature> {
        queries::feature::upsert(&self.conn, feature_id, name)
    }

    pub fn get_feature(&self, feature_id: &FeatureId) -> Result<Option<Feature>> {
        queries::feature::get(&self.conn, feature_id)
    }

    pub fn set_feature_description(&self, feature_id: &FeatureId, description: &str) -> Result<()> {
        queries::feature::set_description(&self.conn, feature_id, description)
    }

    /// Every known feature, for `canvas regenerate features`.
    pub fn list_all_features(&self) -> Result<Vec<Feature>> {
        queries::feature::list_all(&self.conn)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn upsert_option(
        &self,
        canonical_name: &str,
        feature_id: &FeatureId,
        status: ToggleStatus,
        lifecycle: &LifecycleDates,
        seen_on: NaiveDate,
    ) -> Result<FeatureOption> {
        self.handle().upsert_option(canonical_name, feature_id, status, lifecycle, seen_on)
    }

    pub fn get_option(&self, option_id: &OptionId) -> Result<Option<FeatureOption>> {
        queries::option::get(&self.conn, option_id)
    }

    /// Every known option, for the community heuristic matcher (§4.3).
    pub fn list_all_options(&self) -> Result<Vec<FeatureOption>> {
        queries::option::list_all(&self.conn)
    }

    pub fn set_option_enrichment(
        &self,
        option_id: &OptionId,
        description: Option<&str>,
        meta_summary: Option<&str>,
        implementation_status: Option<&str>,
    ) -> Result<()> {
        queries::option::set_enrichment(
            &self.conn,
            option_id,
            description,
            meta_summary,
            implementation_status,
        )
    }

    pub fn upsert_setting(
        &self,
        h4_title: &str,
        feature_id: &FeatureId,
        status: ToggleStatus,
        lifecycle: &LifecycleDates,
        seen_on: NaiveDate,
    ) -> Result<FeatureSetting> {
        self.handle().upsert_setting(h4_title, feature_id, status, lifecycle, seen_on)
    }

    pub fn get_setting(&self, setting_id: &SettingId) -> Result<Option<FeatureSetting>> {
        queries::setting::get(&self.conn, setting_id)
    }

    /// Every known setting, for the community heuristic matcher (§4.3).
    pub fn list_all_settings(&self) -> Result<Vec<FeatureSetting>> {
        queries::setting::list_all(&self.conn)
    }

    pub fn set_setting_enrichment(
        &self,
        setting_id: &SettingId,
        description: Option<&str>,
        meta_summary: Option<&str>,
        implementation_status: Option<&str>,
    ) -> Result<()> {
        queries::setting::set_enrichment(
            &self.conn,
            setting_id,
            description,
            meta_summary,
            implementation_status,
        )
    }

    pub fn insert_announcement(&self, announcement: &FeatureAnnouncement) -> Result<()> {
        self.handle().insert_announcement(announcement)
    }

    pub fn set_announcement_enrichment(
        &self,
        id: &str,
        description: Option<&str>,
        implications: Option<&str>,
    ) -> Result<()> {
        queries::announcement::set_enrichment(&self.conn, id, description, implications)
    }

    /// NEW-vs-UPDATE verdict for badge selection (§4.3): NEW iff this
    /// announcement is the toggle's first.
    pub fn verdict_for_toggle(&self, toggle_ref: &ToggleRef) -> Result<ChangeVerdict> {
        self.handle().verdict_for_toggle(toggle_ref)
    }

    pub fn announcements_for_content(&self, content_id: &ContentId) -> Result<Vec<FeatureAnnouncement>> {
        queries::announcement::recent_for_content(&self.conn, content_id.as_str())
    }

    pub fn upsert_content_item(&self, item: &ContentItem) -> Result<ContentItem> {
        queries::content_item::upsert(&self.conn, item)
    }

    pub fn get_content_item(&self, source_id: &ContentId) -> Result<Option<ContentItem>> {
        queries::content_item::get(&self.conn, source_id)
    }

    pub fn list_content_by_type_recent_first(
        &self,
        content_type: ContentType,
    ) -> Result<Vec<ContentItem>> {
        queries::content_item::list_by_type_recent_first(&self.conn, content_type)
    }

    pub fn insert_comment(&self, comment: &ContentComment) -> Result<()> {
        queries::comment::insert(&self.conn, comment)
    }

    pub fn comments_for_content(&self, content_id: &ContentId) -> Result<Vec<ContentComment>> {
        queries::comment::list_for_content(&self.conn, content_id)
    }

    pub fn upsert_content_feature_ref(&self, feature_ref: &ContentFeatureRef) -> Result<()> {
        self.handle().upsert_content_feature_ref(feature_ref)
    }

    pub fn feature_refs_for_content(&self, content_id: &ContentId) -> Result<Vec<ContentFeatureRef>> {
        queries::feature_ref::list_for_content(&self.conn, content_id)
    }

    /// Non-superseded refs pointing at `feature_id` (`canvas general
    /// list`).
    pub fn feature_refs_for_feature(&self, feature_id: &FeatureId) -> Result<Vec<ContentFeatureRef>> {
        queries::feature_ref::list_for_feature(&self.conn, feature_id)
    }

    /// Marks `content_id`'s refs at `feature_id` superseded, then writes a
    /// fresh ref at `target_feature_id` (`canvas general assign`).
    pub fn reassign_feature_ref(
        &self,
        content_id: &ContentId,
        from_feature_id: &FeatureId,
        target_feature_id: &FeatureId,
        mention_type: canvas_types::MentionType,
    ) -> Result<ContentFeatureRef> {
        queries::feature_ref::mark_superseded(&self.conn, content_id, from_feature_id)?;
        let feature_ref = ContentFeatureRef {
            content_id: content_id.clone(),
            feature_id: Some(target_feature_id.clone()),
            option_id: None,
            setting_id: None,
            mention_type,
            superseded: false,
        };
        queries::feature_ref::upsert(&self.conn, &feature_ref)?;
        Ok(feature_ref)
    }

    pub fn insert_upcoming_change(&self, change: &UpcomingChange) -> Result<()> {
        self.handle().insert_upcoming_change(change)
    }

    pub fn upcoming_changes_for_content(&self, content_id: &ContentId) -> Result<Vec<UpcomingChange>> {
        queries::upcoming_change::list_for_content(&self.conn, content_id)
    }

    pub fn get_discussion_tracking(&self, source_id: &ContentId) -> Result<Option<DiscussionTracking>> {
        queries::discussion_tracking::get(&self.conn, source_id)
    }

    pub fn upsert_discussion_tracking(&self, tracking: &DiscussionTracking) -> Result<()> {
        queries::discussion_tracking::upsert(&self.conn, tracking)
    }

    pub fn insert_feed_run(&self, run: &FeedRun, emitted_guids: &[String]) -> Result<()> {
        queries::feed_run::insert(&self.conn, run, emitted_guids)
    }

    pub fn get_feed_run(&self, feed_date: NaiveDate) -> Result<Option<FeedRun>> {
        queries::feed_run::get(&self.conn, feed_date)
    }

    /// Whether `guid` was emitted in a prior run's `FeedRun` (§4.7 dedup).
    pub fn was_emitted(&self, guid: &str) -> Result<bool> {
        queries::feed_run::was_emitted(&self.conn, guid)
    }

    // -- enrichment cache (§4.6, persisted across runs) ------------------

    pub fn get_cached_enrichment(
        &self,
        entity_kind: &str,
        entity_id: &str,
        field: &str,
    ) -> Result<Option<queries::enrichment_cache::CachedField>> {
        queries::enrichment_cache::get(&self.conn, entity_kind, entity_id, field)
    }

    pub fn put_cached_enrichment(
        &self,
        entity_kind: &str,
        entity_id: &str,
        field: &str,
        content_hash: &str,
        value: &str,
    ) -> Result<()> {
        queries::enrichment_cache::put(&self.conn, entity_kind, entity_id, field, content_hash, value)
    }

    pub fn enrichment_is_stale(
        &self,
        entity_kind: &str,
        entity_id: &str,
        field: &str,
        current_hash: &str,
    ) -> Result<bool> {
        queries::enrichment_cache::is_stale(&self.conn, entity_kind, entity_id, field, current_hash)
    }

    /// Scan the whole store for invariant violations (`canvas general
    /// triage`, SPEC_FULL supplemented feature 1).
    pub fn check_consistency(&self) -> Result<Vec<queries::consistency::Violation>> {
        queries::consistency::scan(&self.conn)
    }
}

/// The classifier's write surface (§4.3), borrowed either from a
/// `Database` in autocommit mode or from an open `Database::transaction`
/// — the same query calls run either way, which is what lets a page's
/// writes commit or roll back together without a second copy of the
/// classifier's call sequence.
#[derive(Clone, Copy)]
pub struct StoreHandle<'c> {
    conn: &'c Connection,
}

impl<'c> StoreHandle<'c> {
    pub fn upsert_feature(&self, feature_id: &FeatureId, name: &str) -> Result<Feature> {
        queries::feature::upsert(self.conn, feature_id, name)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn upsert_option(
        &self,
        canonical_name: &str,
        feature_id: &FeatureId,
        status: ToggleStatus,
        lifecycle: &LifecycleDates,
        seen_on: NaiveDate,
    ) -> Result<FeatureOption> {
        queries::option::upsert(self.conn, canonical_name, feature_id, status, lifecycle, seen_on)
    }

    pub fn upsert_setting(
        &self,
        h4_title: &str,
        feature_id: &FeatureId,
        status: ToggleStatus,
        lifecycle: &LifecycleDates,
        seen_on: NaiveDate,
    ) -> Result<FeatureSetting> {
        queries::setting::upsert(self.conn, h4_title, feature_id, status, lifecycle, seen_on)
    }

    pub fn insert_announcement(&self, announcement: &FeatureAnnouncement) -> Result<()> {
        queries::announcement::insert(self.conn, announcement)
    }

    /// NEW-vs-UPDATE verdict for badge selection (§4.3): NEW iff this
    /// announcement is the toggle's first.
    pub fn verdict_for_toggle(&self, toggle_ref: &ToggleRef) -> Result<ChangeVerdict> {
        queries::announcement::verdict_for_toggle(self.conn, toggle_ref)
    }

    pub fn upsert_content_feature_ref(&self, feature_ref: &ContentFeatureRef) -> Result<()> {
        queries::feature_ref::upsert(self.conn, feature_ref)
    }

    pub fn insert_upcoming_change(&self, change: &UpcomingChange) -> Result<()> {
        queries::upcoming_change::insert(self.conn, change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_in_memory_initializes_schema() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.is_first_run_for_type(ContentType::ReleaseNote).unwrap());
    }

    #[test]
    fn transaction_rolls_back_every_write_on_error() {
        let mut db = Database::open_in_memory().unwrap();
        let feature_id = FeatureId::new("assignments");
        let result: Result<()> = db.transaction(|store| {
            store.upsert_feature(&feature_id, "Assignments")?;
            Err(crate::Error::DuplicateAnnouncement { content_id: "x".to_string(), anchor_id: "y".to_string() })
        });
        assert!(result.is_err());
        assert!(db.get_feature(&feature_id).unwrap().is_none(), "the feature upsert must not survive the rollback");
    }

    #[test]
    fn transaction_commits_every_write_on_success() {
        let mut db = Database::open_in_memory().unwrap();
        let feature_id = FeatureId::new("assignments");
        db.transaction(|store| -> Result<()> {
            store.upsert_feature(&feature_id, "Assignments")?;
            Ok(())
        })
        .unwrap();
        assert!(db.get_feature(&feature_id).unwrap().is_some());
    }
}
