mod models;
mod normalize;

pub use models::RedditSubmission;
pub use normalize::{normalize_submission, passes_filters, redacted_body};
