mod models;
mod normalize;

pub use models::{Impact, IncidentUpdate, StatusIncident};
pub use normalize::normalize_incident;
