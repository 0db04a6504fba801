use anyhow::Result;

use crate::reddit::RedditSubmission;
use crate::status::StatusIncident;

/// Browser-driven rendering is deliberately out of this crate's scope
/// (§9): everything in `release_notes`/`deploy_notes`/`community` takes
/// already-rendered HTML. `PageFetcher` is the seam a binary wires up —
/// backed by any headless-browser technology in production, or a fixture
/// file system in tests.
pub trait PageFetcher: Send + Sync {
    fn fetch_page(&self, url: &str) -> Result<String>;
}

/// Status-page incident feed (§6 Inputs). One call per polling pass;
/// the client owns pagination/since-cursor handling.
pub trait StatusClient: Send + Sync {
    fn recent_incidents(&self) -> Result<Vec<StatusIncident>>;
}

/// Reddit submissions for a configured subreddit (§6 Inputs,
/// `sources.reddit.min_score` / `keywords` apply downstream in
/// `reddit::passes_filters`, not at this port).
pub trait RedditClient: Send + Sync {
    fn recent_submissions(&self, subreddit: &str) -> Result<Vec<RedditSubmission>>;
}

#[cfg(test)]
pub mod fixtures {
    use std::collections::HashMap;

    use super::*;

    /// In-memory `PageFetcher` backed by a fixed URL -> HTML map, for
    /// tests that exercise the parsers without a real browser.
    pub struct FixturePageFetcher {
        pages: HashMap<String, String>,
    }

    impl FixturePageFetcher {
        pub fn new(pages: HashMap<String, String>) -> Self {
            Self { pages }
        }
    }

    impl PageFetcher for FixturePageFetcher {
        fn fetch_page(&self, url: &str) -> Result<String> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no fixture page registered for {url}"))
        }
    }
}
