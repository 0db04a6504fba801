use canvas_core::content_hash;
use canvas_index::Database;
use canvas_types::{
    ContentItem, ContentType, Feature, FeatureAnnouncement, FeatureOption, FeatureSetting, ToggleStatus,
};

use crate::enrichment::backoff::retry_with_backoff;
use crate::enrichment::client::LlmClient;
use crate::Result;

/// C6: fans structured entities out to the LLM collaborator, caching by
/// `(entity_kind, entity_id, content_hash)` so an identical hash returns
/// the persisted output across runs (§4.6, SUPPLEMENTED FEATURES 3).
/// `llm` is `None` when LLM credentials are absent (§6 Environment) —
/// every prompt call then degrades to `Ok(None)` rather than erroring.
pub struct Gateway<'a> {
    db: &'a Database,
    llm: Option<&'a dyn LlmClient>,
    max_summary_length: usize,
}

impl<'a> Gateway<'a> {
    pub fn new(db: &'a Database, llm: Option<&'a dyn LlmClient>, max_summary_length: usize) -> Self {
        Self { db, llm, max_summary_length }
    }

    /// Shared cache-check / retry-and-persist path for one generated
    /// field. `dry_run` limits the call to the cache: no backoff loop,
    /// nothing written (SUPPLEMENTED FEATURES 2).
    fn cached_or_generate(
        &self,
        entity_kind: &str,
        entity_id: &str,
        field: &str,
        hash_input: &str,
        prompt: impl FnOnce() -> String,
        dry_run: bool,
    ) -> Result<Option<String>> {
        let hash = content_hash(hash_input);

        if let Some(cached) = self.db.get_cached_enrichment(entity_kind, entity_id, field)? {
            if cached.content_hash == hash {
                return Ok(Some(cached.value));
            }
        }

        if dry_run {
            return Ok(None);
        }

        let Some(llm) = self.llm else {
            return Ok(None);
        };

        let prompt_text = prompt();
        match retry_with_backoff(|| llm.complete(&prompt_text)) {
            Ok(value) => {
                self.db.put_cached_enrichment(entity_kind, entity_id, field, &hash, &value)?;
                Ok(Some(value))
            }
            Err(_) => Ok(None),
        }
    }

    /// 1-2 sentences for a top-level Canvas feature area (§3 `Feature.description`).
    pub fn feature_description(&self, feature: &Feature, dry_run: bool) -> Result<Option<String>> {
        let hash_input = format!("{}|{:?}", feature.name, feature.status);
        self.cached_or_generate("feature", feature.feature_id.as_str(), "description", &hash_input, || {
            format!(
                "In 1-2 sentences, describe the Canvas feature area \"{}\" for an instructional designer.",
                feature.name
            )
        }, dry_run)
    }

    pub fn option_description(&self, option: &FeatureOption, dry_run: bool) -> Result<Option<String>> {
        let hash_input = format!("{}|{:?}", option.canonical_name, option.status);
        self.cached_or_generate("option", option.option_id.as_str(), "description", &hash_input, || {
            format!(
                "In 1-2 sentences, describe the Canvas feature option \"{}\" for an instructional designer.",
                option.canonical_name
            )
        }, dry_run)
    }

    pub fn option_meta_summary(&self, option: &FeatureOption, dry_run: bool) -> Result<Option<String>> {
        let hash_input = format!("{}|{:?}|{:?}", option.canonical_name, option.status, option.lifecycle.beta_date);
        self.cached_or_generate("option", option.option_id.as_str(), "meta_summary", &hash_input, || {
            format!(
                "In 3-4 sentences, summarize deployment readiness for the Canvas feature option \"{}\" \
                 (current status: {:?}).",
                option.canonical_name, option.status
            )
        }, dry_run)
    }

    pub fn setting_description(&self, setting: &FeatureSetting, dry_run: bool) -> Result<Option<String>> {
        let hash_input = format!("{}|{:?}", setting.title, setting.status);
        self.cached_or_generate("setting", setting.setting_id.as_str(), "description", &hash_input, || {
            format!(
                "In 1-2 sentences, describe the Canvas behavior change \"{}\" for an instructional designer.",
                setting.title
            )
        }, dry_run)
    }

    pub fn setting_meta_summary(&self, setting: &FeatureSetting, dry_run: bool) -> Result<Option<String>> {
        let hash_input = format!("{}|{:?}|{:?}", setting.title, setting.status, setting.lifecycle.beta_date);
        self.cached_or_generate("setting", setting.setting_id.as_str(), "meta_summary", &hash_input, || {
            format!(
                "In 3-4 sentences, summarize deployment readiness for the Canvas behavior change \"{}\" \
                 (current status: {:?}).",
                setting.title, setting.status
            )
        }, dry_run)
    }

    pub fn announcement_description(&self, announcement: &FeatureAnnouncement, dry_run: bool) -> Result<Option<String>> {
        self.cached_or_generate(
            "announcement",
            &announcement.id,
            "description",
            &announcement.raw_content,
            || format!("In 1-2 sentences, describe this Canvas release note entry: {}", announcement.raw_content),
            dry_run,
        )
    }

    /// 2-3 sentences for educational technologists (§4.6); release/deploy
    /// entries only get this richer prompt, never the generic `summarize`
    /// call `content_item_summary` issues.
    pub fn announcement_implications(
        &self,
        announcement: &FeatureAnnouncement,
        dry_run: bool,
    ) -> Result<Option<String>> {
        self.cached_or_generate(
            "announcement",
            &announcement.id,
            "implications",
            &announcement.raw_content,
            || {
                format!(
                    "In 2-3 sentences, explain the implications of this Canvas change for educational \
                     technologists: {}",
                    announcement.raw_content
                )
            },
            dry_run,
        )
    }

    /// ContentItem summary (§4.6): release-note/deploy-note items skip
    /// this call entirely since they already get the richer
    /// description/implications prompt through their announcements.
    pub fn content_item_summary(&self, item: &ContentItem, body_text: &str, dry_run: bool) -> Result<Option<String>> {
        if matches!(item.content_type, ContentType::ReleaseNote | ContentType::DeployNote) {
            return Ok(None);
        }
        let max_len = self.max_summary_length;
        self.cached_or_generate("content_item", item.source_id.as_str(), "summary", body_text, || {
            format!("In at most {max_len} characters, summarize this Canvas community post: {body_text}")
        }, dry_run)
    }
}

/// Template-generated, no LLM call (§4.6): `implementation_status` is a
/// deterministic function of lifecycle status.
pub fn implementation_status_for(status: ToggleStatus) -> String {
    match status {
        ToggleStatus::Pending => "Not yet available; announced only.".to_string(),
        ToggleStatus::Preview => "Available in beta for opt-in testing.".to_string(),
        ToggleStatus::Optional => "Available as an admin-enabled option.".to_string(),
        ToggleStatus::DefaultOptional => "Enabled by default; admins may disable it.".to_string(),
        ToggleStatus::Released => "Fully released to production.".to_string(),
        ToggleStatus::Deprecated => "Deprecated; scheduled for removal.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::client::fixtures::{FailingLlmClient, StubLlmClient};
    use canvas_types::{LifecycleDates, OptionId, FeatureId};
    use chrono::NaiveDate;

    fn sample_option() -> FeatureOption {
        FeatureOption {
            option_id: OptionId::new("document_processor"),
            feature_id: FeatureId::new("assignments"),
            canonical_name: "Document Processor".to_string(),
            status: ToggleStatus::Pending,
            lifecycle: LifecycleDates::default(),
            description: None,
            meta_summary: None,
            implementation_status: None,
            user_group_url: None,
            first_seen: NaiveDate::from_ymd_opt(2026, 2, 21).unwrap(),
            last_seen: NaiveDate::from_ymd_opt(2026, 2, 21).unwrap(),
        }
    }

    #[test]
    fn generates_and_caches_then_reuses_without_a_second_llm_call() {
        let db = Database::open_in_memory().unwrap();
        let llm = StubLlmClient::new("A document processing tool.");
        let gateway = Gateway::new(&db, Some(&llm), 600);
        let option = sample_option();

        let first = gateway.option_description(&option, false).unwrap();
        assert_eq!(first.as_deref(), Some("A document processing tool."));
        assert_eq!(llm.calls.load(std::sync::atomic::Ordering::SeqCst), 1);

        let second = gateway.option_description(&option, false).unwrap();
        assert_eq!(second.as_deref(), Some("A document processing tool."));
        assert_eq!(llm.calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn no_llm_client_yields_null_field() {
        let db = Database::open_in_memory().unwrap();
        let gateway = Gateway::new(&db, None, 600);
        let option = sample_option();
        assert_eq!(gateway.option_description(&option, false).unwrap(), None);
    }

    #[test]
    fn dry_run_never_calls_the_llm() {
        let db = Database::open_in_memory().unwrap();
        let llm = StubLlmClient::new("unused");
        let gateway = Gateway::new(&db, Some(&llm), 600);
        let option = sample_option();
        assert_eq!(gateway.option_description(&option, true).unwrap(), None);
        assert_eq!(llm.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[test]
    fn terminal_llm_failure_leaves_field_null_not_an_error() {
        let db = Database::open_in_memory().unwrap();
        let llm = FailingLlmClient;
        let gateway = Gateway::new(&db, Some(&llm), 600);
        let option = sample_option();
        assert_eq!(gateway.option_description(&option, false).unwrap(), None);
    }

    #[test]
    fn release_note_content_items_skip_the_summary_call() {
        let db = Database::open_in_memory().unwrap();
        let llm = StubLlmClient::new("should not be used");
        let gateway = Gateway::new(&db, Some(&llm), 600);
        let item = ContentItem {
            source_id: canvas_types::ContentId::new("release_note_1"),
            url: None,
            title: None,
            content_type: ContentType::ReleaseNote,
            summary: None,
            engagement_score: None,
            comment_count: None,
            first_posted: None,
            last_edited: None,
            last_comment_at: None,
            last_checked_at: None,
            scraped_date: None,
        };
        assert_eq!(gateway.content_item_summary(&item, "body", false).unwrap(), None);
        assert_eq!(llm.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }
}
