use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! slug_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(slug: impl Into<String>) -> Self {
                Self(slug.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

slug_id!(FeatureId, "Stable slug identifying a Feature (`feature_id`).");
slug_id!(
    OptionId,
    "slugify(canonical_name); identity of a FeatureOption."
);
slug_id!(
    SettingId,
    "slugify(h4_title), scoped to a feature; identity of a FeatureSetting."
);

/// Unique external identifier of a `ContentItem` (`source_id`), e.g.
/// `release_note_664643`, `reddit_<id>`, `status_<id>`, `blog_<id>`,
/// `question_<id>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ContentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ContentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ContentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifies either an option or a setting, never both. Enforces the
/// invariant on `FeatureAnnouncement` and `ContentFeatureRef` that exactly
/// one of `option_id`/`setting_id` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToggleRef {
    Option(OptionId),
    Setting(SettingId),
}

impl ToggleRef {
    pub fn option_id(&self) -> Option<&OptionId> {
        match self {
            ToggleRef::Option(id) => Some(id),
            ToggleRef::Setting(_) => None,
        }
    }

    pub fn setting_id(&self) -> Option<&SettingId> {
        match self {
            ToggleRef::Option(_) => None,
            ToggleRef::Setting(id) => Some(id),
        }
    }
}
