use std::path::PathBuf;

use anyhow::{Context as _, Result};
use canvas_core::resolve_workspace_path;
use canvas_index::Database;
use canvas_runtime::Config;

/// Resolved workspace paths and an open store handle, built fresh for
/// every CLI invocation the way `agtrace-cli`'s `context` module opens a
/// fresh connection per command rather than holding one across the whole
/// process.
pub struct Context {
    pub workspace: PathBuf,
    pub db: Database,
    pub config: Config,
}

impl Context {
    pub fn open(data_dir: Option<&str>) -> Result<Self> {
        let workspace = resolve_workspace_path(data_dir).context("resolving workspace directory")?;
        std::fs::create_dir_all(&workspace)
            .with_context(|| format!("creating workspace directory at {}", workspace.display()))?;

        let db_path = workspace.join("canvas.db");
        let db = Database::open(&db_path)
            .with_context(|| format!("opening canonical store at {}", db_path.display()))?;

        let config_path = workspace.join("config.toml");
        let config = Config::load_from(&config_path).context("loading config.toml")?;

        Ok(Self { workspace, db, config })
    }
}
