//! C6 (Enrichment Gateway), C7 (Feed Assembler), C8 (Orchestrator): the
//! ambient stack — configuration, classification overrides, LLM gateway,
//! feed assembly/sanitization, and batch-run coordination — that ties
//! `canvas-sources`, `canvas-engine`, and `canvas-index` into one run.

mod config;
mod enrichment;
mod error;
mod feed;
mod orchestrator;
mod overrides;

pub use config::{
    Config, FirstRunCaps, InstructureCommunityConfig, ProcessingConfig, RedditConfig, RssConfig,
    SentimentAnalysisConfig, SourcesConfig, StatusPageConfig, SummarizationConfig, TopicClassificationConfig,
};
pub use enrichment::{implementation_status_for, Gateway, LlmClient};
pub use error::{Error, Result};
pub use feed::{
    assemble, community_item, deploy_note_item, reddit_item, release_note_item, sanitize_html, status_item,
    AssemblyCandidate, FeedChannel, FeedSerializer,
};
pub use orchestrator::{
    CommunityPostInput, DeployNotePageInput, Orchestrator, ReleaseNotePageInput, RunEvent, RunInputs, RunSummary,
};
pub use overrides::{ClassificationOverrides, ClassifyAs, OverrideEntry};
