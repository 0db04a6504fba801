use canvas_types::ChangeVerdict;

/// Progress/diagnostic events raised while classifying a page or tracking a
/// discussion, in the same caller-supplied-callback shape the teacher uses
/// for `IndexProgress` — this crate carries no logging dependency.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    EntryClassified { anchor_id: String, verdict: ChangeVerdict },
    EntryDropped { anchor_id: String, reason: String },
    AnnouncementDuplicate { anchor_id: String },
    CommunityRefLowConfidence { content_id: String, confidence: f32 },
}
