use std::path::PathBuf;

use canvas_core::resolve_workspace_path;
use canvas_types::ContentType;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructureCommunityConfig {
    pub enabled: bool,
    pub max_pages: usize,
}

impl Default for InstructureCommunityConfig {
    fn default() -> Self {
        Self { enabled: true, max_pages: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditConfig {
    pub enabled: bool,
    pub min_score: i64,
    pub subreddits: Vec<String>,
    pub keywords: Vec<String>,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_score: 0,
            subreddits: vec!["canvas".to_string(), "instructionaldesign".to_string()],
            keywords: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusPageConfig {
    pub enabled: bool,
}

impl Default for StatusPageConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub instructure_community: InstructureCommunityConfig,
    #[serde(default)]
    pub reddit: RedditConfig,
    #[serde(default)]
    pub status_page: StatusPageConfig,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            instructure_community: InstructureCommunityConfig::default(),
            reddit: RedditConfig::default(),
            status_page: StatusPageConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizationConfig {
    pub max_length: usize,
}

impl Default for SummarizationConfig {
    fn default() -> Self {
        Self { max_length: 600 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct SentimentAnalysisConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct TopicClassificationConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    #[serde(default)]
    pub summarization: SummarizationConfig,
    #[serde(default)]
    pub sentiment_analysis: SentimentAnalysisConfig,
    #[serde(default)]
    pub topic_classification: TopicClassificationConfig,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            summarization: SummarizationConfig::default(),
            sentiment_analysis: SentimentAnalysisConfig::default(),
            topic_classification: TopicClassificationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RssConfig {
    pub title: String,
    pub link: String,
    pub description: String,
    pub max_items: usize,
}

impl Default for RssConfig {
    fn default() -> Self {
        Self {
            title: "Canvas LMS Changes".to_string(),
            link: "https://community.canvaslms.com".to_string(),
            description: "Feature and deploy changes detected across Canvas LMS sources."
                .to_string(),
            max_items: 60,
        }
    }
}

/// First-run flood caps by content type (§4.5). Mirrors
/// `ContentType::first_run_cap`'s defaults so an operator can override
/// them without recompiling — `apply_first_run_cap` takes the looked-up
/// value here as its `override_cap` argument and falls back to the
/// hardcoded table itself only when this struct has no entry for the
/// type (`Changelog`, `Reddit`, `Status` are always uncapped).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstRunCaps {
    pub question: usize,
    pub blog: usize,
    pub release_note: usize,
    pub deploy_note: usize,
}

impl Default for FirstRunCaps {
    fn default() -> Self {
        Self { question: 5, blog: 5, release_note: 3, deploy_note: 3 }
    }
}

impl FirstRunCaps {
    /// The operator-configured cap for `content_type`, or `None` for a
    /// type this struct doesn't cover (always uncapped regardless of
    /// `ContentType::first_run_cap`).
    pub fn for_content_type(&self, content_type: ContentType) -> Option<usize> {
        match content_type {
            ContentType::Question => Some(self.question),
            ContentType::Blog => Some(self.blog),
            ContentType::ReleaseNote => Some(self.release_note),
            ContentType::DeployNote => Some(self.deploy_note),
            ContentType::Changelog | ContentType::Reddit | ContentType::Status => None,
        }
    }
}

/// The full configuration surface of §6: everything an operator can set
/// in `config.toml`, loaded/saved the way `agtrace-runtime::Config` is.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
    #[serde(default)]
    pub rss: RssConfig,
    #[serde(default)]
    pub first_run_caps: FirstRunCaps,
    #[serde(default = "default_overrides_path")]
    pub classification_overrides_path: String,
}

fn default_overrides_path() -> String {
    "config/classification_overrides.yaml".to_string()
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(resolve_workspace_path(None).map_err(|e| Error::Config(e.to_string()))?.join("config.toml"))
    }

    /// Absence of Reddit credentials degrades to status + community
    /// sources (§6 Environment) — this never reads the credential
    /// value, only whether one is present.
    pub fn reddit_enabled(&self) -> bool {
        self.sources.reddit.enabled && std::env::var_os("CANVAS_REDDIT_CLIENT_ID").is_some()
    }

    /// Absence of LLM credentials degrades to structured data without
    /// generated prose (§6 Environment).
    pub fn llm_enabled(&self) -> bool {
        std::env::var_os("CANVAS_LLM_API_KEY").is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_expected_caps() {
        let config = Config::default();
        assert_eq!(config.first_run_caps.question, 5);
        assert_eq!(config.first_run_caps.release_note, 3);
        assert_eq!(config.sources.reddit.subreddits, vec!["canvas", "instructionaldesign"]);
    }

    #[test]
    fn save_and_load_round_trips() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.rss.max_items = 25;
        config.save_to(&path)?;

        let loaded = Config::load_from(&path)?;
        assert_eq!(loaded.rss.max_items, 25);
        Ok(())
    }

    #[test]
    fn load_nonexistent_returns_default() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("missing.toml");
        let config = Config::load_from(&path)?;
        assert_eq!(config.rss.max_items, 60);
        Ok(())
    }

    #[test]
    fn reddit_disabled_without_env_credential() {
        std::env::remove_var("CANVAS_REDDIT_CLIENT_ID");
        let config = Config::default();
        assert!(!config.reddit_enabled());
    }
}
