use canvas_types::ConfigSnapshot;
use chrono::NaiveDate;

pub use crate::html_util::ToggleKind;

/// A parsed deploy-note page (§4.2): no H2 sections, a flat list of
/// changes under a single heading.
#[derive(Debug, Clone)]
pub struct DeployNotePage {
    pub page_date: NaiveDate,
    pub changes: Vec<ParsedDeployChange>,
}

#[derive(Debug, Clone)]
pub struct ParsedDeployChange {
    pub category: String,
    pub h4_title: String,
    pub anchor_id: String,
    pub added_date: Option<NaiveDate>,
    pub raw_content: String,
    pub toggle: ToggleKind,
    pub config: ConfigSnapshot,
}
