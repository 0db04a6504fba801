use anyhow::{anyhow, Result};
use canvas_runtime::{implementation_status_for, Gateway};
use canvas_types::{FeatureId, OptionId, SettingId};

use crate::args::RegenerateCommand;
use crate::context::Context;

/// No concrete `LlmClient` is wired up here: the LLM collaborator is an
/// external interface (`spec.md` §1 — "language-model summarization
/// calls" are explicitly out of core scope). With no client, `Gateway`
/// degrades every call to `Ok(None)` (§6 Environment: "absence of LLM
/// credentials degrades to structured data without generated prose"), so
/// running this CLI end to end against the cache is always safe; a
/// caller that wants real generation constructs its own `Gateway` with a
/// concrete `LlmClient` through the library surface instead.
fn gateway<'a>(ctx: &'a Context) -> Gateway<'a> {
    Gateway::new(&ctx.db, None, ctx.config.processing.summarization.max_length)
}

pub fn run(ctx: &Context, cmd: RegenerateCommand) -> Result<()> {
    match cmd {
        RegenerateCommand::Feature { feature_id, dry_run } => regenerate_feature(ctx, &feature_id, dry_run),
        RegenerateCommand::Option { option_id, dry_run } => regenerate_option(ctx, &option_id, dry_run),
        RegenerateCommand::MetaSummary { id, dry_run } => regenerate_meta_summary(ctx, &id, dry_run),
        RegenerateCommand::Features { missing, dry_run } => regenerate_all_features(ctx, missing, dry_run),
        RegenerateCommand::Options { missing, dry_run } => regenerate_all_options(ctx, missing, dry_run),
        RegenerateCommand::MetaSummaries { missing, dry_run } => regenerate_all_meta_summaries(ctx, missing, dry_run),
    }
}

fn regenerate_feature(ctx: &Context, feature_id: &str, dry_run: bool) -> Result<()> {
    let id = FeatureId::new(feature_id);
    let feature = ctx.db.get_feature(&id)?.ok_or_else(|| anyhow!("unknown feature: {feature_id}"))?;
    let gw = gateway(ctx);
    match gw.feature_description(&feature, dry_run)? {
        Some(description) => {
            if !dry_run {
                ctx.db.set_feature_description(&id, &description)?;
            }
            println!("{feature_id}: {description}");
        }
        None => println!("{feature_id}: (no description generated)"),
    }
    Ok(())
}

fn regenerate_option(ctx: &Context, option_id: &str, dry_run: bool) -> Result<()> {
    let id = OptionId::new(option_id);
    let option = ctx.db.get_option(&id)?.ok_or_else(|| anyhow!("unknown option: {option_id}"))?;
    let gw = gateway(ctx);
    let description = gw.option_description(&option, dry_run)?;
    let meta_summary = gw.option_meta_summary(&option, dry_run)?;
    let status = implementation_status_for(option.status);
    if !dry_run {
        ctx.db.set_option_enrichment(&id, description.as_deref(), meta_summary.as_deref(), Some(&status))?;
    }
    println!("{option_id}: description={description:?} meta_summary={meta_summary:?}");
    Ok(())
}

/// `meta-summary <id>` (§6) regenerates just the `meta_summary` field on
/// whichever toggle kind `id` resolves to — a FeatureOption is tried
/// first, then a FeatureSetting (§3: the two share a shape, only their
/// identity namespace differs).
fn regenerate_meta_summary(ctx: &Context, id: &str, dry_run: bool) -> Result<()> {
    let gw = gateway(ctx);
    if let Some(option) = ctx.db.get_option(&OptionId::new(id))? {
        let meta_summary = gw.option_meta_summary(&option, dry_run)?;
        if !dry_run {
            ctx.db.set_option_enrichment(&option.option_id, None, meta_summary.as_deref(), None)?;
        }
        println!("{id}: meta_summary={meta_summary:?}");
        return Ok(());
    }
    if let Some(setting) = ctx.db.get_setting(&SettingId::new(id))? {
        let meta_summary = gw.setting_meta_summary(&setting, dry_run)?;
        if !dry_run {
            ctx.db.set_setting_enrichment(&setting.setting_id, None, meta_summary.as_deref(), None)?;
        }
        println!("{id}: meta_summary={meta_summary:?}");
        return Ok(());
    }
    Err(anyhow!("unknown option or setting: {id}"))
}

fn regenerate_all_features(ctx: &Context, missing: bool, dry_run: bool) -> Result<()> {
    let gw = gateway(ctx);
    for feature in ctx.db.list_all_features()? {
        if missing && feature.description.is_some() {
            continue;
        }
        let feature_id = feature.feature_id.clone();
        if let Some(description) = gw.feature_description(&feature, dry_run)? {
            if !dry_run {
                ctx.db.set_feature_description(&feature_id, &description)?;
            }
            println!("{feature_id}: {description}");
        }
    }
    Ok(())
}

fn regenerate_all_options(ctx: &Context, missing: bool, dry_run: bool) -> Result<()> {
    let gw = gateway(ctx);
    for option in ctx.db.list_all_options()? {
        if missing && option.description.is_some() && option.meta_summary.is_some() {
            continue;
        }
        let description = gw.option_description(&option, dry_run)?;
        let meta_summary = gw.option_meta_summary(&option, dry_run)?;
        let status = implementation_status_for(option.status);
        if !dry_run {
            ctx.db.set_option_enrichment(
                &option.option_id,
                description.as_deref(),
                meta_summary.as_deref(),
                Some(&status),
            )?;
        }
        println!("{}: description={description:?} meta_summary={meta_summary:?}", option.option_id);
    }
    Ok(())
}

fn regenerate_all_meta_summaries(ctx: &Context, missing: bool, dry_run: bool) -> Result<()> {
    let gw = gateway(ctx);
    for option in ctx.db.list_all_options()? {
        if missing && option.meta_summary.is_some() {
            continue;
        }
        if let Some(meta_summary) = gw.option_meta_summary(&option, dry_run)? {
            if !dry_run {
                ctx.db.set_option_enrichment(&option.option_id, None, Some(&meta_summary), None)?;
            }
            println!("{}: {meta_summary}", option.option_id);
        }
    }
    for setting in ctx.db.list_all_settings()? {
        if missing && setting.meta_summary.is_some() {
            continue;
        }
        if let Some(meta_summary) = gw.setting_meta_summary(&setting, dry_run)? {
            if !dry_run {
                ctx.db.set_setting_enrichment(&setting.setting_id, None, Some(&meta_summary), None)?;
            }
            println!("{}: {meta_summary}", setting.setting_id);
        }
    }
    Ok(())
}
