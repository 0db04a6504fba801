use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::{Context, Result};
use assert_cmd::Command;
use canvas_index::Database;
use tempfile::TempDir;

/// An isolated workspace directory for a single test: a fresh temp dir
/// standing in for `CANVAS_FEED_PATH`, with helpers to open the store
/// directly or to shell out to the real `canvas-cli` binary against it.
///
/// Mirrors the teacher's `TestWorldBuilder`/`TestWorld` pair, scoped down
/// to what this crate's tests actually exercise: no session/provider-log
/// concepts, just a workspace directory and a db.
pub struct TestWorld {
    _temp_dir: TempDir,
    workspace: PathBuf,
}

impl TestWorld {
    /// Creates a fresh, empty workspace. `canvas.db` does not exist yet
    /// until something opens it (the CLI creates it on first run; tests
    /// that want to seed data first should call [`TestWorld::db`]).
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("creating temp workspace dir")?;
        let workspace = temp_dir.path().to_path_buf();
        Ok(Self { _temp_dir: temp_dir, workspace })
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn db_path(&self) -> PathBuf {
        self.workspace.join("canvas.db")
    }

    /// Opens (creating if absent) the canonical store at this workspace's
    /// `canvas.db`, for tests that want to seed fixtures before invoking
    /// the CLI, or inspect state after.
    pub fn db(&self) -> Result<Database> {
        Database::open(&self.db_path()).context("opening canvas.db in test workspace")
    }

    /// Writes `contents` to `config.toml` in the workspace root.
    pub fn write_config(&self, contents: &str) -> Result<()> {
        std::fs::write(self.workspace.join("config.toml"), contents).context("writing config.toml")
    }

    /// Writes `contents` to `classification_overrides.yaml` in the
    /// workspace root, picked up by sources that honor per-page
    /// classification overrides (§3 `ClassificationOverride`).
    pub fn write_overrides(&self, contents: &str) -> Result<()> {
        std::fs::write(self.workspace.join("classification_overrides.yaml"), contents)
            .context("writing classification_overrides.yaml")
    }

    /// Runs the `canvas-cli` binary against this workspace with `args`,
    /// returning the raw process output for `assert_cmd`/`predicates`
    /// assertions in the caller.
    pub fn run(&self, args: &[&str]) -> Result<Output> {
        let mut cmd = Command::cargo_bin("canvas-cli").context("locating canvas-cli binary")?;
        cmd.arg("--data-dir").arg(&self.workspace).args(args);
        cmd.output().context("running canvas-cli")
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new().expect("creating TestWorld")
    }
}

/// Convenience wrapper around a finished `canvas-cli` invocation, mirroring
/// the teacher's `CliResult` so assertions read the same way across crates.
pub struct CliResult {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

impl From<Output> for CliResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
        }
    }
}
