mod models;
mod normalize;
mod parser;

pub use models::{CommunityKind, CommunityPost, CommunityReply};
pub use normalize::normalize_post;
pub use parser::parse_community_post;
