use std::path::Path;

use canvas_sources::release_notes::ClassificationOverride;
use serde::Deserialize;

use crate::Result;

/// One entry of `config/classification_overrides.yaml` (§6): forces a
/// specific `anchor_id` or `h4_title` to classify as an option or a
/// setting, bypassing the table-derived rule of §4.2.
#[derive(Debug, Clone, Deserialize)]
pub struct OverrideEntry {
    pub anchor_id: Option<String>,
    pub h4_title: Option<String>,
    pub classify_as: ClassifyAs,
    pub canonical_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifyAs {
    Option,
    Setting,
}

/// The parsed contents of `classification_overrides.yaml`, held ready to
/// hand `canvas-sources`' parsers a borrowed `&[ClassificationOverride]`
/// each time a page is parsed.
#[derive(Debug, Clone, Default)]
pub struct ClassificationOverrides {
    entries: Vec<OverrideEntry>,
}

impl ClassificationOverrides {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let entries: Vec<OverrideEntry> = serde_yaml::from_str(&content)?;
        Ok(Self { entries })
    }

    /// Borrow the entries as the parser-facing override slice.
    pub fn as_parser_overrides(&self) -> Vec<ClassificationOverride<'_>> {
        self.entries
            .iter()
            .map(|entry| ClassificationOverride {
                anchor_id: entry.anchor_id.as_deref(),
                h4_title: entry.h4_title.as_deref(),
                force_setting: entry.classify_as == ClassifyAs::Setting,
                canonical_name: entry.canonical_name.as_deref(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_empty_overrides() {
        let dir = TempDir::new().unwrap();
        let overrides = ClassificationOverrides::load(&dir.path().join("missing.yaml")).unwrap();
        assert!(overrides.as_parser_overrides().is_empty());
    }

    #[test]
    fn loads_yaml_entries_into_parser_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("overrides.yaml");
        std::fs::write(
            &path,
            r#"
- anchor_id: some-anchor
  classify_as: setting
- h4_title: "Some Feature"
  classify_as: option
  canonical_name: "Some Feature Canonical"
"#,
        )
        .unwrap();

        let overrides = ClassificationOverrides::load(&path).unwrap();
        let parsed = overrides.as_parser_overrides();
        assert_eq!(parsed.len(), 2);
        assert!(parsed[0].force_setting);
        assert!(!parsed[1].force_setting);
        assert_eq!(parsed[1].canonical_name, Some("Some Feature Canonical"));
    }
}
