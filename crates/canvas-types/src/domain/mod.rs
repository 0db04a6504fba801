pub mod announcement;
pub mod content;
pub mod feature;
pub mod feed;

pub use announcement::{ChangeVerdict, ConfigSnapshot, FeatureAnnouncement, SectionKind, UpcomingChange};
pub use content::{
    ContentComment, ContentFeatureRef, ContentItem, ContentType, DiscussionTracking,
    DiscussionUpdate, DiscussionVerdict, MentionType,
};
pub use feature::{Feature, FeatureOption, FeatureSetting, FeatureStatus, LifecycleDates, ToggleStatus};
pub use feed::{Badge, FeedGroup, FeedItem, FeedRun};
