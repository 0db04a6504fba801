use anyhow::{anyhow, Result};
use canvas_engine::GENERAL_FEATURE_ID;
use canvas_index::Violation;
use canvas_types::{ContentId, FeatureId};

use crate::args::GeneralCommand;
use crate::context::Context;

pub fn run(ctx: &Context, cmd: GeneralCommand) -> Result<()> {
    match cmd {
        GeneralCommand::List => list(ctx),
        GeneralCommand::Show { content_id } => show(ctx, &content_id),
        GeneralCommand::Assign { content_id, feature_id } => assign(ctx, &content_id, &feature_id),
        GeneralCommand::Triage => triage(ctx),
    }
}

fn list(ctx: &Context) -> Result<()> {
    let general = FeatureId::new(GENERAL_FEATURE_ID);
    let refs = ctx.db.feature_refs_for_feature(&general)?;
    if refs.is_empty() {
        println!("no low-confidence links parked under the general feature");
        return Ok(());
    }
    for feature_ref in refs {
        println!("{}  mention_type={:?}", feature_ref.content_id, feature_ref.mention_type);
    }
    Ok(())
}

fn show(ctx: &Context, content_id: &str) -> Result<()> {
    let id = ContentId::new(content_id);
    let item = ctx.db.get_content_item(&id)?.ok_or_else(|| anyhow!("unknown content item: {content_id}"))?;
    println!("source_id:   {}", item.source_id);
    println!("title:       {}", item.title.as_deref().unwrap_or("(none)"));
    println!("url:         {}", item.url.as_deref().unwrap_or("(none)"));
    println!("content_type:{:?}", item.content_type);
    println!("summary:     {}", item.summary.as_deref().unwrap_or("(none)"));
    for feature_ref in ctx.db.feature_refs_for_content(&id)? {
        println!(
            "ref: feature={:?} option={:?} setting={:?} mention_type={:?} superseded={}",
            feature_ref.feature_id,
            feature_ref.option_id,
            feature_ref.setting_id,
            feature_ref.mention_type,
            feature_ref.superseded
        );
    }
    Ok(())
}

fn assign(ctx: &Context, content_id: &str, feature_id: &str) -> Result<()> {
    let id = ContentId::new(content_id);
    let general = FeatureId::new(GENERAL_FEATURE_ID);
    let target = FeatureId::new(feature_id);

    let existing = ctx
        .db
        .feature_refs_for_content(&id)?
        .into_iter()
        .find(|r| r.feature_id.as_ref() == Some(&general));
    let Some(existing) = existing else {
        return Err(anyhow!("{content_id} has no general-feature ref to reassign"));
    };
    let mention_type = existing.mention_type;

    ctx.db.upsert_feature(&target, feature_id)?;
    ctx.db.reassign_feature_ref(&id, &general, &target, mention_type)?;
    println!("{content_id}: reassigned from {GENERAL_FEATURE_ID} to {feature_id}");
    Ok(())
}

fn triage(ctx: &Context) -> Result<()> {
    let violations = ctx.db.check_consistency()?;
    if violations.is_empty() {
        println!("no invariant violations found");
        return Ok(());
    }
    for violation in violations {
        match violation {
            Violation::AnnouncementToggleArity { announcement_id } => {
                println!("announcement {announcement_id}: must reference exactly one of option_id/setting_id");
            }
            Violation::OptionIdMismatch { option_id, canonical_name } => {
                println!("option {option_id}: does not match slugify(\"{canonical_name}\")");
            }
            Violation::DanglingFeatureRef { content_id } => {
                println!("content {content_id}: ref has no feature_id/option_id/setting_id target");
            }
        }
    }
    Ok(())
}
