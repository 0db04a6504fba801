use clap::{Parser, Subcommand};

/// Operator CLI for the Canvas change-detection engine (§6). No business
/// logic lives here — every handler calls straight into
/// `canvas-runtime`/`canvas-engine`/`canvas-index`.
#[derive(Parser, Debug)]
#[command(name = "canvas-cli", version, about, long_about = None)]
pub struct Cli {
    /// Workspace directory holding `canvas.db` and `config.toml`. Falls
    /// back to `CANVAS_FEED_PATH` / the platform data dir (§9.1 of
    /// `canvas-core::resolve_workspace_path`).
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Regenerate LLM-generated fields on demand.
    #[command(subcommand)]
    Regenerate(RegenerateCommand),

    /// Inspect and triage low-confidence community-post links.
    #[command(subcommand)]
    General(GeneralCommand),
}

#[derive(Subcommand, Debug)]
pub enum RegenerateCommand {
    /// Regenerate one Feature's description.
    Feature {
        feature_id: String,
        #[arg(long)]
        dry_run: bool,
    },
    /// Regenerate one FeatureOption's description and meta_summary.
    Option {
        option_id: String,
        #[arg(long)]
        dry_run: bool,
    },
    /// Regenerate one FeatureOption or FeatureSetting's meta_summary only.
    MetaSummary {
        id: String,
        #[arg(long)]
        dry_run: bool,
    },
    /// Regenerate every known Feature's description.
    Features {
        /// Only regenerate rows whose description is still null.
        #[arg(long)]
        missing: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// Regenerate every known FeatureOption's description and meta_summary.
    Options {
        #[arg(long)]
        missing: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// Regenerate every known option/setting's meta_summary.
    MetaSummaries {
        #[arg(long)]
        missing: bool,
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum GeneralCommand {
    /// List ContentFeatureRefs parked under the synthetic `general`
    /// feature (low-confidence community matches, §4.3).
    List,
    /// Show one such ref along with its source ContentItem.
    Show { content_id: String },
    /// Re-link a ref from `general` to a real feature, superseding the
    /// original rather than deleting it.
    Assign { content_id: String, feature_id: String },
    /// Scan the whole store for invariant violations (§8).
    Triage,
}
