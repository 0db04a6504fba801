//! C7: Feed Assembler (§4.7).
mod assembler;
mod sanitize;
mod serializer;

pub use assembler::{
    assemble, community_item, deploy_note_item, reddit_item, release_note_item, status_item,
    AssemblyCandidate,
};
pub use sanitize::sanitize_html;
pub use serializer::{FeedChannel, FeedSerializer};

#[cfg(test)]
pub use serializer::fixtures;
