use std::sync::Arc;

use canvas_engine::{
    apply_first_run_cap, resolve_community_ref, ClassifiedEntry, Classifier, DiscussionTracker,
    EngineEvent,
};
use canvas_index::Database;
use canvas_sources::community::{normalize_post, parse_community_post, CommunityKind, CommunityPost};
use canvas_sources::deploy_notes::parse_deploy_note_page;
use canvas_sources::ports::{PageFetcher, RedditClient, StatusClient};
use canvas_sources::reddit::{normalize_submission, passes_filters, redacted_body};
use canvas_sources::release_notes::parse_release_note_page;
use canvas_sources::status::normalize_incident;
use canvas_types::{ChangeVerdict, ContentId, ContentItem, ContentType, DiscussionVerdict, FeedRun, MentionType};
use chrono::{NaiveDate, Utc};
use futures::stream::{self, StreamExt};

use crate::config::Config;
use crate::enrichment::{implementation_status_for, Gateway, LlmClient};
use crate::feed::{self, assemble, AssemblyCandidate, FeedChannel, FeedSerializer};
use crate::overrides::ClassificationOverrides;
use crate::{Error, Result};

const FETCH_CONCURRENCY: usize = 4;

/// Progress/diagnostic events for one run (§4.8), in the same
/// caller-supplied-callback shape `canvas-engine`'s `EngineEvent` uses —
/// this crate carries no logging dependency either.
#[derive(Debug, Clone)]
pub enum RunEvent {
    FetchFailed { url: String, reason: String },
    PageUnparseable { url: String, reason: String },
    EntryClassified { anchor_id: String, verdict: ChangeVerdict },
    EntryDropped { anchor_id: String, reason: String },
    AnnouncementDuplicate { anchor_id: String },
    CommunityRefLowConfidence { content_id: String, confidence: f32 },
    SourceUnavailable { source: &'static str },
    FirstRunCapped { content_type: ContentType, held_back: usize },
    RunCompleted { item_count: usize },
}

fn forward_engine_event(event: EngineEvent) -> RunEvent {
    match event {
        EngineEvent::EntryClassified { anchor_id, verdict } => RunEvent::EntryClassified { anchor_id, verdict },
        EngineEvent::EntryDropped { anchor_id, reason } => RunEvent::EntryDropped { anchor_id, reason },
        EngineEvent::AnnouncementDuplicate { anchor_id } => RunEvent::AnnouncementDuplicate { anchor_id },
        EngineEvent::CommunityRefLowConfidence { content_id, confidence } => {
            RunEvent::CommunityRefLowConfidence { content_id, confidence }
        }
    }
}

pub struct ReleaseNotePageInput {
    pub content_id: String,
    pub url: String,
    pub page_date: NaiveDate,
}

pub struct DeployNotePageInput {
    pub content_id: String,
    pub url: String,
    pub page_date: NaiveDate,
}

pub struct CommunityPostInput {
    pub url: String,
    pub kind: CommunityKind,
    pub post_id: String,
}

/// Everything this run's fetchers need to reach. Page/post discovery
/// (walking a Community index, paging release notes) is left to the
/// caller — this crate only fetches and processes what it's handed
/// (§9: "browser-driven rendering is deliberately out of scope").
#[derive(Default)]
pub struct RunInputs {
    pub release_note_pages: Vec<ReleaseNotePageInput>,
    pub deploy_note_pages: Vec<DeployNotePageInput>,
    pub community_posts: Vec<CommunityPostInput>,
}

pub struct RunSummary {
    pub item_count: usize,
    pub feed_payload: String,
}

/// C8: coordinates fetch, classify/track, enrich, and assemble for one
/// batch invocation (§4.8).
pub struct Orchestrator {
    page_fetcher: Arc<dyn PageFetcher>,
    status_client: Option<Arc<dyn StatusClient>>,
    reddit_client: Option<Arc<dyn RedditClient>>,
    llm: Option<Box<dyn LlmClient>>,
    feed_serializer: Arc<dyn FeedSerializer>,
    config: Config,
    overrides: ClassificationOverrides,
}

impl Orchestrator {
    pub fn new(
        page_fetcher: Arc<dyn PageFetcher>,
        status_client: Option<Arc<dyn StatusClient>>,
        reddit_client: Option<Arc<dyn RedditClient>>,
        llm: Option<Box<dyn LlmClient>>,
        feed_serializer: Arc<dyn FeedSerializer>,
        config: Config,
        overrides: ClassificationOverrides,
    ) -> Self {
        Self { page_fetcher, status_client, reddit_client, llm, feed_serializer, config, overrides }
    }

    /// Built fresh at each point of use rather than once for the whole
    /// run: `db` alternates between autocommit borrows (here) and the
    /// exclusive borrow `Database::transaction` needs per page, so a
    /// `Gateway` can't be held live across a transaction call.
    fn gateway<'a>(&'a self, db: &'a Database) -> Gateway<'a> {
        Gateway::new(db, self.llm.as_deref(), self.config.processing.summarization.max_length)
    }

    /// Fetch every url concurrently with a bounded worker pool (default
    /// 4, §5) since each fetch owns its own browser resource; classify
    /// and store writes happen afterward on the calling task, which is
    /// the single writer (§5).
    async fn fetch_all(&self, urls: Vec<String>) -> Vec<std::result::Result<String, String>> {
        let fetcher = self.page_fetcher.clone();
        stream::iter(urls)
            .map(|url| {
                let fetcher = fetcher.clone();
                async move {
                    let task_url = url.clone();
                    match tokio::task::spawn_blocking(move || fetcher.fetch_page(&task_url)).await {
                        Ok(Ok(html)) => Ok(html),
                        Ok(Err(e)) => Err(e.to_string()),
                        Err(join_err) => Err(join_err.to_string()),
                    }
                }
            })
            .buffered(FETCH_CONCURRENCY)
            .collect()
            .await
    }

    pub async fn run(
        &self,
        db: &mut Database,
        inputs: RunInputs,
        mut on_event: impl FnMut(RunEvent),
    ) -> Result<RunSummary> {
        let release_note_first_run = db.is_first_run_for_type(ContentType::ReleaseNote)?;
        let deploy_note_first_run = db.is_first_run_for_type(ContentType::DeployNote)?;
        let blog_first_run = db.is_first_run_for_type(ContentType::Blog)?;
        let question_first_run = db.is_first_run_for_type(ContentType::Question)?;

        let parser_overrides = self.overrides.as_parser_overrides();
        let mut candidates: Vec<AssemblyCandidate> = Vec::new();

        // -- release notes --
        let release_urls: Vec<String> = inputs.release_note_pages.iter().map(|p| p.url.clone()).collect();
        let release_fetches = self.fetch_all(release_urls).await;
        let mut release_entries: Vec<(ClassifiedEntry, NaiveDate, ContentId)> = Vec::new();
        for (page, fetch_result) in inputs.release_note_pages.iter().zip(release_fetches) {
            let html = match fetch_result {
                Err(reason) => {
                    on_event(RunEvent::FetchFailed { url: page.url.clone(), reason });
                    continue;
                }
                Ok(html) => html,
            };
            let parsed = match parse_release_note_page(&html, page.page_date, &parser_overrides) {
                Err(e) => {
                    on_event(RunEvent::PageUnparseable { url: page.url.clone(), reason: e.to_string() });
                    continue;
                }
                Ok(parsed) => parsed,
            };
            let content_id = ContentId::new(page.content_id.clone());
            // §4.8: every write this page produces commits or rolls back
            // together — `transaction` hands the classifier a `StoreHandle`
            // borrowed from one open SQLite transaction.
            let classified = db.transaction(|store| {
                Classifier::new(store).classify_release_note_page(&content_id, &parsed, |ev| {
                    on_event(forward_engine_event(ev))
                })
            })?;
            for entry in classified {
                release_entries.push((entry, page.page_date, content_id.clone()));
            }
        }
        let gateway = self.gateway(&*db);
        self.emit_release_or_deploy_candidates(
            &*db,
            &gateway,
            release_entries,
            release_note_first_run,
            ContentType::ReleaseNote,
            feed::release_note_item,
            &mut candidates,
            &mut on_event,
        )?;

        // -- deploy notes --
        let deploy_urls: Vec<String> = inputs.deploy_note_pages.iter().map(|p| p.url.clone()).collect();
        let deploy_fetches = self.fetch_all(deploy_urls).await;
        let mut deploy_entries: Vec<(ClassifiedEntry, NaiveDate, ContentId)> = Vec::new();
        for (page, fetch_result) in inputs.deploy_note_pages.iter().zip(deploy_fetches) {
            let html = match fetch_result {
                Err(reason) => {
                    on_event(RunEvent::FetchFailed { url: page.url.clone(), reason });
                    continue;
                }
                Ok(html) => html,
            };
            let parsed = match parse_deploy_note_page(&html, page.page_date, &parser_overrides) {
                Err(e) => {
                    on_event(RunEvent::PageUnparseable { url: page.url.clone(), reason: e.to_string() });
                    continue;
                }
                Ok(parsed) => parsed,
            };
            let content_id = ContentId::new(page.content_id.clone());
            let classified = db.transaction(|store| {
                Classifier::new(store).classify_deploy_note_page(&content_id, &parsed, |ev| {
                    on_event(forward_engine_event(ev))
                })
            })?;
            for entry in classified {
                deploy_entries.push((entry, page.page_date, content_id.clone()));
            }
        }
        let gateway = self.gateway(&*db);
        self.emit_release_or_deploy_candidates(
            &*db,
            &gateway,
            deploy_entries,
            deploy_note_first_run,
            ContentType::DeployNote,
            feed::deploy_note_item,
            &mut candidates,
            &mut on_event,
        )?;

        // -- community (blog/Q&A) --
        let community_urls: Vec<String> = inputs.community_posts.iter().map(|p| p.url.clone()).collect();
        let community_fetches = self.fetch_all(community_urls).await;
        let mut blog_candidates: Vec<(ContentItem, AssemblyCandidate)> = Vec::new();
        let mut question_candidates: Vec<(ContentItem, AssemblyCandidate)> = Vec::new();
        for (input, fetch_result) in inputs.community_posts.iter().zip(community_fetches) {
            let html = match fetch_result {
                Err(reason) => {
                    on_event(RunEvent::FetchFailed { url: input.url.clone(), reason });
                    continue;
                }
                Ok(html) => html,
            };
            let post = match parse_community_post(&html, input.kind, &input.post_id, Some(input.url.clone())) {
                Err(e) => {
                    on_event(RunEvent::PageUnparseable { url: input.url.clone(), reason: e.to_string() });
                    continue;
                }
                Ok(post) => post,
            };
            let (item, comments) = normalize_post(&post);
            let stored = db.upsert_content_item(&item)?;
            for comment in &comments {
                db.insert_comment(comment)?;
            }

            let text = format!("{} {}", post.title, post.body_html);
            resolve_community_ref(&*db, &stored.source_id, &text, MentionType::Discusses, |ev| {
                on_event(forward_engine_event(ev))
            })?;

            let tracker = DiscussionTracker::new(&*db);
            let update = tracker.track(&stored.source_id, post.comment_count(), post.last_comment_at(), &comments)?;

            if let Some(candidate) = feed::community_item(
                &stored.source_id,
                stored.title.as_deref().unwrap_or(&post.title),
                community_tag(post.kind),
                stored.first_posted.unwrap_or_else(Utc::now),
                update.verdict,
                &self.community_description(&gateway, &stored, &post, &update)?,
            ) {
                match post.kind {
                    CommunityKind::Blog => blog_candidates.push((stored, candidate)),
                    CommunityKind::Question => question_candidates.push((stored, candidate)),
                }
            }
        }
        self.cap_and_push(
            blog_candidates,
            blog_first_run,
            ContentType::Blog,
            &mut candidates,
            &mut on_event,
        );
        self.cap_and_push(
            question_candidates,
            question_first_run,
            ContentType::Question,
            &mut candidates,
            &mut on_event,
        );

        // -- status incidents (uncapped, §4.5) --
        if let Some(status_client) = self.status_client.clone() {
            match tokio::task::spawn_blocking(move || status_client.recent_incidents()).await {
                Ok(Ok(incidents)) => {
                    for incident in incidents {
                        let (item, comments) = normalize_incident(&incident);
                        let stored = db.upsert_content_item(&item)?;
                        for comment in &comments {
                            db.insert_comment(comment)?;
                        }
                        let body = comments.iter().map(|c| c.comment_text.as_str()).collect::<Vec<_>>().join(" ");
                        let summary = gateway.content_item_summary(&stored, &body, false)?;
                        let description = summary.unwrap_or(body);
                        candidates.push(feed::status_item(
                            &stored.source_id,
                            stored.title.as_deref().unwrap_or(&incident.name),
                            stored.first_posted.unwrap_or_else(Utc::now),
                            &description,
                        ));
                    }
                }
                _ => on_event(RunEvent::SourceUnavailable { source: "status_page" }),
            }
        }

        // -- reddit (uncapped, §4.5; degrades gracefully per §6 Environment) --
        if self.config.reddit_enabled() {
            if let Some(reddit_client) = self.reddit_client.clone() {
                for subreddit in self.config.sources.reddit.subreddits.clone() {
                    let client = reddit_client.clone();
                    let sub = subreddit.clone();
                    match tokio::task::spawn_blocking(move || client.recent_submissions(&sub)).await {
                        Ok(Ok(submissions)) => {
                            for submission in submissions {
                                if !passes_filters(
                                    &submission,
                                    self.config.sources.reddit.min_score,
                                    &self.config.sources.reddit.keywords,
                                ) {
                                    continue;
                                }
                                let item = normalize_submission(&submission);
                                let stored = db.upsert_content_item(&item)?;
                                let body = redacted_body(&submission);
                                let summary = gateway.content_item_summary(&stored, &body, false)?;
                                let description = summary.unwrap_or(body);
                                candidates.push(feed::reddit_item(
                                    &stored.source_id,
                                    stored.title.as_deref().unwrap_or(&submission.title),
                                    stored.first_posted.unwrap_or_else(Utc::now),
                                    &description,
                                ));
                            }
                        }
                        _ => on_event(RunEvent::SourceUnavailable { source: "reddit" }),
                    }
                }
            } else {
                on_event(RunEvent::SourceUnavailable { source: "reddit" });
            }
        }

        let items = assemble(candidates, |guid| db.was_emitted(guid).map_err(Error::from))?;
        let max_items = self.config.rss.max_items;
        let items: Vec<_> = items.into_iter().take(max_items).collect();

        let channel = FeedChannel {
            title: self.config.rss.title.clone(),
            link: self.config.rss.link.clone(),
            description: self.config.rss.description.clone(),
            items: items.clone(),
        };
        let payload = self
            .feed_serializer
            .serialize(&channel)
            .map_err(|e| Error::Serialization(e.to_string()))?;

        let run = FeedRun {
            feed_date: Utc::now().date_naive(),
            item_count: items.len(),
            payload: payload.clone(),
            generated_at: Utc::now(),
        };
        let guids: Vec<String> = items.iter().map(|i| i.guid.clone()).collect();
        db.insert_feed_run(&run, &guids)?;

        on_event(RunEvent::RunCompleted { item_count: items.len() });
        Ok(RunSummary { item_count: items.len(), feed_payload: payload })
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_release_or_deploy_candidates(
        &self,
        db: &Database,
        gateway: &Gateway<'_>,
        entries: Vec<(ClassifiedEntry, NaiveDate, ContentId)>,
        was_first_run_at_start: bool,
        content_type: ContentType,
        build: impl Fn(&ContentId, &str, &str, &str, NaiveDate, ChangeVerdict, &str) -> AssemblyCandidate,
        candidates: &mut Vec<AssemblyCandidate>,
        on_event: &mut impl FnMut(RunEvent),
    ) -> Result<()> {
        let override_cap = self.config.first_run_caps.for_content_type(content_type);
        let decision = apply_first_run_cap(was_first_run_at_start, content_type, override_cap, entries, |(_, date, _)| *date);
        if !decision.held_back.is_empty() {
            on_event(RunEvent::FirstRunCapped { content_type, held_back: decision.held_back.len() });
        }

        for (entry, page_date, content_id) in decision.emit {
            let announcements = db.announcements_for_content(&content_id)?;
            let Some(announcement) = announcements.into_iter().find(|a| a.anchor_id == entry.anchor_id) else {
                continue;
            };

            let description = gateway.announcement_description(&announcement, false)?;
            let implications = gateway.announcement_implications(&announcement, false)?;
            db.set_announcement_enrichment(&announcement.id, description.as_deref(), implications.as_deref())?;
            self.enrich_toggle(db, gateway, &entry)?;

            let body = description.unwrap_or_else(|| announcement.raw_content.clone());
            candidates.push(build(
                &content_id,
                &entry.anchor_id,
                &entry.h4_title,
                &entry.category,
                page_date,
                entry.verdict,
                &body,
            ));
        }
        Ok(())
    }

    fn enrich_toggle(&self, db: &Database, gateway: &Gateway<'_>, entry: &ClassifiedEntry) -> Result<()> {
        use canvas_types::ToggleRef;
        match &entry.toggle_ref {
            ToggleRef::Option(option_id) => {
                let Some(option) = db.get_option(option_id)? else { return Ok(()) };
                let description = gateway.option_description(&option, false)?;
                let meta_summary = gateway.option_meta_summary(&option, false)?;
                let status = implementation_status_for(option.status);
                db.set_option_enrichment(option_id, description.as_deref(), meta_summary.as_deref(), Some(&status))?;
            }
            ToggleRef::Setting(setting_id) => {
                let Some(setting) = db.get_setting(setting_id)? else { return Ok(()) };
                let description = gateway.setting_description(&setting, false)?;
                let meta_summary = gateway.setting_meta_summary(&setting, false)?;
                let status = implementation_status_for(setting.status);
                db.set_setting_enrichment(setting_id, description.as_deref(), meta_summary.as_deref(), Some(&status))?;
            }
        }
        Ok(())
    }

    fn community_description(
        &self,
        gateway: &Gateway<'_>,
        item: &ContentItem,
        post: &CommunityPost,
        update: &canvas_types::DiscussionUpdate,
    ) -> Result<String> {
        let body = match update.verdict {
            DiscussionVerdict::Update => update
                .new_comments
                .iter()
                .map(|c| c.comment_text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            _ => post.body_html.clone(),
        };
        let summary = gateway.content_item_summary(item, &body, false)?;
        Ok(summary.unwrap_or(body))
    }

    fn cap_and_push(
        &self,
        candidates: Vec<(ContentItem, AssemblyCandidate)>,
        was_first_run_at_start: bool,
        content_type: ContentType,
        out: &mut Vec<AssemblyCandidate>,
        on_event: &mut impl FnMut(RunEvent),
    ) {
        let override_cap = self.config.first_run_caps.for_content_type(content_type);
        let decision = apply_first_run_cap(was_first_run_at_start, content_type, override_cap, candidates, |(item, _)| {
            item.first_posted.unwrap_or_else(Utc::now)
        });
        if !decision.held_back.is_empty() {
            on_event(RunEvent::FirstRunCapped { content_type, held_back: decision.held_back.len() });
        }
        out.extend(decision.emit.into_iter().map(|(_, candidate)| candidate));
    }
}

fn community_tag(kind: CommunityKind) -> &'static str {
    match kind {
        CommunityKind::Blog => "Community Blog",
        CommunityKind::Question => "Question Forum",
    }
}
