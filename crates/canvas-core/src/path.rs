use std::path::PathBuf;

use crate::error::{Error, Result};

/// Resolve the workspace data directory based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. `CANVAS_FEED_PATH` environment variable (with tilde expansion)
/// 3. System data directory (`canvas-feed` under the platform data dir)
/// 4. `~/.canvas-feed` fallback for systems without a standard data directory
pub fn resolve_workspace_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var("CANVAS_FEED_PATH") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("canvas-feed"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".canvas-feed"));
    }

    Err(Error::Config(
        "could not determine workspace path: no HOME directory or system data directory found"
            .to_string(),
    ))
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins_over_everything() {
        let resolved = resolve_workspace_path(Some("/tmp/explicit")).unwrap();
        assert_eq!(resolved, PathBuf::from("/tmp/explicit"));
    }

    #[test]
    fn tilde_expands_to_home() {
        std::env::set_var("HOME", "/home/fixture");
        assert_eq!(expand_tilde("~/data"), PathBuf::from("/home/fixture/data"));
        assert_eq!(expand_tilde("/already/absolute"), PathBuf::from("/already/absolute"));
    }
}
