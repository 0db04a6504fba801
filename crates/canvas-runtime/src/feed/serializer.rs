use canvas_types::FeedItem;

/// The RSS 2.0 serializer is an out-of-scope external collaborator (§1,
/// §6 Outputs) — this crate only defines the seam it plugs into. A
/// binary backs this with whatever RSS-writing crate it prefers; tests
/// substitute a deterministic stub.
pub trait FeedSerializer: Send + Sync {
    fn serialize(&self, channel: &FeedChannel) -> anyhow::Result<String>;
}

/// Everything the serializer needs for one `<channel>` (§6 Outputs: "one
/// `<channel>` per run").
#[derive(Debug, Clone)]
pub struct FeedChannel {
    pub title: String,
    pub link: String,
    pub description: String,
    pub items: Vec<FeedItem>,
}

#[cfg(test)]
pub mod fixtures {
    use super::*;

    /// Deterministic stub serializer: one line per item, for tests that
    /// only need to assert on item count/order, not real RSS XML.
    pub struct StubFeedSerializer;

    impl FeedSerializer for StubFeedSerializer {
        fn serialize(&self, channel: &FeedChannel) -> anyhow::Result<String> {
            let mut out = format!("channel: {}\n", channel.title);
            for item in &channel.items {
                out.push_str(&format!("{} | {}\n", item.guid, item.title));
            }
            Ok(out)
        }
    }
}
