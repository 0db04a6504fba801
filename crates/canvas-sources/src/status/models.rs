use serde::Deserialize;

/// Canvas status API incident (§6 Inputs). Deserialized straight off the
/// JSON payload the out-of-scope status-page client returns.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusIncident {
    pub id: String,
    pub name: String,
    pub status: String,
    pub impact: Impact,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub incident_updates: Vec<IncidentUpdate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    None,
    Minor,
    Major,
    Critical,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncidentUpdate {
    pub body: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
