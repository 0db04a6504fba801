use std::collections::HashSet;

use canvas_index::Database;
use canvas_types::{ContentFeatureRef, ContentId, FeatureId, MentionType, OptionId, SettingId};

use crate::events::EngineEvent;
use crate::Result;

const AUTO_LINK_THRESHOLD: f32 = 0.8;
const SUGGEST_THRESHOLD: f32 = 0.5;

/// Synthetic feature id used when a community post can't be confidently
/// matched to any known option/setting (§4.3).
pub const GENERAL_FEATURE_ID: &str = "general";

/// Token-overlap confidence between free text and a canonical toggle name:
/// fraction of the canonical name's tokens that also appear in the text.
/// An empty canonical name never matches.
fn token_overlap_confidence(text: &str, canonical_name: &str) -> f32 {
    let name_tokens: HashSet<String> = tokenize(canonical_name);
    if name_tokens.is_empty() {
        return 0.0;
    }
    let text_tokens: HashSet<String> = tokenize(text);
    let hits = name_tokens.iter().filter(|t| text_tokens.contains(*t)).count();
    hits as f32 / name_tokens.len() as f32
}

fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2)
        .map(|w| w.to_string())
        .collect()
}

enum BestMatch {
    Option { feature_id: FeatureId, option_id: OptionId, confidence: f32 },
    Setting { feature_id: FeatureId, setting_id: SettingId, confidence: f32 },
}

impl BestMatch {
    fn confidence(&self) -> f32 {
        match self {
            BestMatch::Option { confidence, .. } => *confidence,
            BestMatch::Setting { confidence, .. } => *confidence,
        }
    }

    fn feature_id(&self) -> &FeatureId {
        match self {
            BestMatch::Option { feature_id, .. } => feature_id,
            BestMatch::Setting { feature_id, .. } => feature_id,
        }
    }
}

fn best_match(db: &Database, text: &str) -> Result<Option<BestMatch>> {
    let mut best: Option<BestMatch> = None;

    for option in db.list_all_options()? {
        let confidence = token_overlap_confidence(text, &option.canonical_name);
        let better = match &best {
            Some(b) => confidence > b.confidence(),
            None => true,
        };
        if better {
            best = Some(BestMatch::Option {
                feature_id: option.feature_id,
                option_id: option.option_id,
                confidence,
            });
        }
    }

    for setting in db.list_all_settings()? {
        let confidence = token_overlap_confidence(text, &setting.title);
        let better = match &best {
            Some(b) => confidence > b.confidence(),
            None => true,
        };
        if better {
            best = Some(BestMatch::Setting {
                feature_id: setting.feature_id,
                setting_id: setting.setting_id,
                confidence,
            });
        }
    }

    Ok(best)
}

/// Heuristically link a community post's free text to the canonical
/// graph (§4.3): `text` should combine the post's title and body.
/// `superseded=false` rows are always what `assign` later re-targets.
pub fn resolve_community_ref<F>(
    db: &Database,
    content_id: &ContentId,
    text: &str,
    mention_type: MentionType,
    mut on_event: F,
) -> Result<ContentFeatureRef>
where
    F: FnMut(EngineEvent),
{
    let candidate = best_match(db, text)?;

    let feature_ref = match candidate {
        Some(m) if m.confidence() >= AUTO_LINK_THRESHOLD => {
            let feature_id = m.feature_id().clone();
            let (option_id, setting_id) = match m {
                BestMatch::Option { option_id, .. } => (Some(option_id), None),
                BestMatch::Setting { setting_id, .. } => (None, Some(setting_id)),
            };
            ContentFeatureRef {
                content_id: content_id.clone(),
                feature_id: Some(feature_id),
                option_id,
                setting_id,
                mention_type,
                superseded: false,
            }
        }
        Some(m) if m.confidence() >= SUGGEST_THRESHOLD => {
            on_event(EngineEvent::CommunityRefLowConfidence {
                content_id: content_id.as_str().to_string(),
                confidence: m.confidence(),
            });
            ContentFeatureRef {
                content_id: content_id.clone(),
                feature_id: Some(m.feature_id().clone()),
                option_id: None,
                setting_id: None,
                mention_type,
                superseded: false,
            }
        }
        _ => {
            let general = FeatureId::new(GENERAL_FEATURE_ID);
            db.upsert_feature(&general, "General")?;
            on_event(EngineEvent::CommunityRefLowConfidence {
                content_id: content_id.as_str().to_string(),
                confidence: candidate.as_ref().map(BestMatch::confidence).unwrap_or(0.0),
            });
            ContentFeatureRef {
                content_id: content_id.clone(),
                feature_id: Some(general),
                option_id: None,
                setting_id: None,
                mention_type,
                superseded: false,
            }
        }
    };

    db.upsert_content_feature_ref(&feature_ref)?;
    Ok(feature_ref)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_name_overlap_scores_full_confidence() {
        let confidence = token_overlap_confidence("We love the new Document Processor tool", "Document Processor");
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn unrelated_text_scores_zero() {
        let confidence = token_overlap_confidence("Totally unrelated chatter", "Document Processor");
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn partial_overlap_is_between_zero_and_one() {
        let confidence = token_overlap_confidence("Something about Document handling", "Document Processor");
        assert!(confidence > 0.0 && confidence < 1.0);
    }
}
