use canvas_types::{ContentComment, ContentId, ContentItem, ContentType};
use canvas_core::redact_pii;

use super::models::StatusIncident;

/// Normalize one status incident into a `ContentItem` plus its update
/// timeline as PII-redacted `ContentComment`s (§3, §4.6). Status incidents
/// are uncapped by the first-run policy (§4.5).
pub fn normalize_incident(incident: &StatusIncident) -> (ContentItem, Vec<ContentComment>) {
    let source_id = ContentId::new(format!("status_{}", incident.id));

    let last_comment_at = incident.incident_updates.iter().map(|u| u.created_at).max();

    let item = ContentItem {
        source_id: source_id.clone(),
        url: None,
        title: Some(redact_pii(&incident.name)),
        content_type: ContentType::Status,
        summary: None,
        engagement_score: None,
        comment_count: Some(incident.incident_updates.len() as i64),
        first_posted: Some(incident.created_at),
        last_edited: Some(incident.updated_at),
        last_comment_at,
        last_checked_at: None,
        scraped_date: Some(chrono::Utc::now().date_naive()),
    };

    let comments = incident
        .incident_updates
        .iter()
        .enumerate()
        .map(|(position, update)| ContentComment {
            content_id: source_id.clone(),
            comment_text: redact_pii(&update.body),
            posted_at: Some(update.created_at),
            position: position as i64,
        })
        .collect();

    (item, comments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::models::{Impact, IncidentUpdate};
    use chrono::Utc;

    #[test]
    fn normalizes_incident_to_content_item() {
        let incident = StatusIncident {
            id: "123".to_string(),
            name: "Canvas degraded performance".to_string(),
            status: "investigating".to_string(),
            impact: Impact::Minor,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            incident_updates: vec![IncidentUpdate { body: "Investigating the issue.".to_string(), created_at: Utc::now() }],
        };
        let (item, comments) = normalize_incident(&incident);
        assert_eq!(item.source_id.as_str(), "status_123");
        assert_eq!(comments.len(), 1);
    }
}
