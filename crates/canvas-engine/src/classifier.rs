use canvas_core::slugify;
use canvas_index::StoreHandle;
use canvas_sources::deploy_notes::{DeployNotePage, ParsedDeployChange};
use canvas_sources::release_notes::{ParsedFeatureEntry, ReleaseNotePage, SectionEntry, ToggleKind};
use canvas_types::{
    ChangeVerdict, ConfigSnapshot, ContentFeatureRef, ContentId, FeatureAnnouncement, FeatureId,
    MentionType, SectionKind, ToggleRef, UpcomingChange,
};
use chrono::NaiveDate;

use crate::events::EngineEvent;
use crate::lifecycle_hints::{infer_lifecycle, infer_status};
use crate::{Error, Result};

/// One entry's classification outcome, handed to the Feed Assembler (C7)
/// for badge selection and to the Enrichment Gateway (C6) as a unit of
/// work. `announcement_written` is `false` when the entry deduped against
/// an existing `(content_id, anchor_id)` row (§4.3 step 3) — the toggle
/// identity and verdict are still reported so callers can decide whether
/// to re-surface it.
#[derive(Debug, Clone)]
pub struct ClassifiedEntry {
    pub feature_id: FeatureId,
    pub toggle_ref: ToggleRef,
    pub anchor_id: String,
    pub h4_title: String,
    pub category: String,
    pub section: SectionKind,
    pub verdict: ChangeVerdict,
    pub announcement_written: bool,
}

/// C3: resolves feature identity, the option-vs-setting write, dedup,
/// `ContentFeatureRef` linkage, and lifecycle transitions for one page at
/// a time (§4.3). Takes a `StoreHandle` rather than a `Database` so a
/// caller can run an entire page through `Database::transaction` and get
/// the §4.8 all-or-nothing commit for free — the same classification
/// code runs whether `store` comes from a transaction or from
/// `Database::handle`.
pub struct Classifier<'a> {
    store: StoreHandle<'a>,
}

impl<'a> Classifier<'a> {
    pub fn new(store: StoreHandle<'a>) -> Self {
        Self { store }
    }

    pub fn classify_release_note_page<F>(
        &self,
        content_id: &ContentId,
        page: &ReleaseNotePage,
        mut on_event: F,
    ) -> Result<Vec<ClassifiedEntry>>
    where
        F: FnMut(EngineEvent),
    {
        let mut out = Vec::new();
        for section in &page.sections {
            for entry in &section.entries {
                match entry {
                    SectionEntry::Feature(feature_entry) => {
                        match self.classify_feature_entry(
                            content_id,
                            section.kind.clone(),
                            feature_entry,
                            page.page_date,
                        ) {
                            Ok(classified) => {
                                if !classified.announcement_written {
                                    on_event(EngineEvent::AnnouncementDuplicate {
                                        anchor_id: classified.anchor_id.clone(),
                                    });
                                }
                                on_event(EngineEvent::EntryClassified {
                                    anchor_id: classified.anchor_id.clone(),
                                    verdict: classified.verdict,
                                });
                                out.push(classified);
                            }
                            Err(Error::Classification { anchor_id, reason }) => {
                                on_event(EngineEvent::EntryDropped { anchor_id, reason });
                            }
                            Err(e) => return Err(e),
                        }
                    }
                    SectionEntry::Upcoming(item) => {
                        self.store.insert_upcoming_change(&UpcomingChange {
                            content_id: content_id.clone(),
                            change_date: item.change_date,
                            description: item.description.clone(),
                        })?;
                    }
                }
            }
        }
        Ok(out)
    }

    pub fn classify_deploy_note_page<F>(
        &self,
        content_id: &ContentId,
        page: &DeployNotePage,
        mut on_event: F,
    ) -> Result<Vec<ClassifiedEntry>>
    where
        F: FnMut(EngineEvent),
    {
        let mut out = Vec::new();
        for change in &page.changes {
            match self.classify_deploy_change(content_id, change, page.page_date) {
                Ok(classified) => {
                    if !classified.announcement_written {
                        on_event(EngineEvent::AnnouncementDuplicate { anchor_id: classified.anchor_id.clone() });
                    }
                    on_event(EngineEvent::EntryClassified {
                        anchor_id: classified.anchor_id.clone(),
                        verdict: classified.verdict,
                    });
                    out.push(classified);
                }
                Err(Error::Classification { anchor_id, reason }) => {
                    on_event(EngineEvent::EntryDropped { anchor_id, reason });
                }
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }

    fn classify_feature_entry(
        &self,
        content_id: &ContentId,
        section: SectionKind,
        entry: &ParsedFeatureEntry,
        page_date: NaiveDate,
    ) -> Result<ClassifiedEntry> {
        self.classify_common(
            content_id,
            section,
            &entry.category,
            &entry.h4_title,
            &entry.anchor_id,
            entry.added_date,
            &entry.raw_content,
            &entry.toggle,
            &entry.config,
            page_date,
        )
    }

    fn classify_deploy_change(
        &self,
        content_id: &ContentId,
        change: &ParsedDeployChange,
        page_date: NaiveDate,
    ) -> Result<ClassifiedEntry> {
        self.classify_common(
            content_id,
            SectionKind::Other("Deploy Notes".to_string()),
            &change.category,
            &change.h4_title,
            &change.anchor_id,
            change.added_date,
            &change.raw_content,
            &change.toggle,
            &change.config,
            page_date,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn classify_common(
        &self,
        content_id: &ContentId,
        section: SectionKind,
        category: &str,
        h4_title: &str,
        anchor_id: &str,
        added_date: Option<NaiveDate>,
        raw_content: &str,
        toggle: &ToggleKind,
        config: &ConfigSnapshot,
        page_date: NaiveDate,
    ) -> Result<ClassifiedEntry> {
        if category.trim().is_empty() {
            return Err(Error::Classification {
                anchor_id: anchor_id.to_string(),
                reason: "no H3 category resolved for this entry".to_string(),
            });
        }

        let feature_id = FeatureId::new(slugify(category));
        self.store.upsert_feature(&feature_id, category)?;

        let status = infer_status(raw_content);
        let lifecycle = infer_lifecycle(raw_content, page_date);

        let toggle_ref = match toggle {
            ToggleKind::Option { canonical_name } => {
                let option = self.store.upsert_option(canonical_name, &feature_id, status, &lifecycle, page_date)?;
                ToggleRef::Option(option.option_id)
            }
            ToggleKind::Setting => {
                let setting = self.store.upsert_setting(h4_title, &feature_id, status, &lifecycle, page_date)?;
                ToggleRef::Setting(setting.setting_id)
            }
        };

        let announcement = FeatureAnnouncement {
            id: uuid::Uuid::new_v4().to_string(),
            feature_id: feature_id.clone(),
            toggle_ref: toggle_ref.clone(),
            content_id: content_id.clone(),
            h4_title: h4_title.to_string(),
            anchor_id: anchor_id.to_string(),
            section: section.clone(),
            category: category.to_string(),
            raw_content: raw_content.to_string(),
            description: None,
            implications: None,
            config: config.clone(),
            added_date,
            announced_at: page_date,
        };

        let announcement_written = match self.store.insert_announcement(&announcement) {
            Ok(()) => true,
            Err(canvas_index::Error::DuplicateAnnouncement { .. }) => false,
            Err(e) => return Err(e.into()),
        };

        // Computed after the insert attempt so the count reflects this
        // announcement too (§4.3: NEW iff this is the toggle's first row).
        // A deduped duplicate doesn't add a row, so this still reports the
        // verdict for the toggle's true current state.
        let verdict = self.store.verdict_for_toggle(&toggle_ref)?;

        let (option_id, setting_id) = match &toggle_ref {
            ToggleRef::Option(id) => (Some(id.clone()), None),
            ToggleRef::Setting(id) => (None, Some(id.clone())),
        };

        self.store.upsert_content_feature_ref(&ContentFeatureRef {
            content_id: content_id.clone(),
            feature_id: Some(feature_id.clone()),
            option_id,
            setting_id,
            mention_type: MentionType::Announces,
            superseded: false,
        })?;

        Ok(ClassifiedEntry {
            feature_id,
            toggle_ref,
            anchor_id: anchor_id.to_string(),
            h4_title: h4_title.to_string(),
            category: category.to_string(),
            section,
            verdict,
            announcement_written,
        })
    }
}
