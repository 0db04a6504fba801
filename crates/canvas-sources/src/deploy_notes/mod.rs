mod models;
mod parser;

pub use models::{DeployNotePage, ParsedDeployChange, ToggleKind};
pub use parser::parse_deploy_note_page;
