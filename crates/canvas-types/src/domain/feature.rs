use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{FeatureId, OptionId, SettingId};

/// Lifecycle status of a top-level Canvas feature area (`Feature.status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureStatus {
    Active,
    Deprecated,
}

impl Default for FeatureStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// A Canvas top-level area (~45 exist). Created lazily on first reference,
/// never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub feature_id: FeatureId,
    pub name: String,
    pub status: FeatureStatus,
    pub description: Option<String>,
    pub llm_generated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Feature {
    pub fn new_lazy(feature_id: FeatureId, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            feature_id,
            name: name.into(),
            status: FeatureStatus::Active,
            description: None,
            llm_generated_at: None,
            created_at,
        }
    }
}

/// Monotonic toggle lifecycle shared by `FeatureOption` and `FeatureSetting`:
/// `pending -> preview -> optional -> default_optional -> released`, with
/// `deprecated` reachable from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleStatus {
    Pending,
    Preview,
    Optional,
    DefaultOptional,
    Released,
    /// Terminal; reachable from any other state.
    Deprecated,
}

impl ToggleStatus {
    /// Ordinal used to detect regressions. Two `Deprecated` values compare
    /// equal; anything else follows the declared forward order.
    fn rank(self) -> u8 {
        match self {
            ToggleStatus::Pending => 0,
            ToggleStatus::Preview => 1,
            ToggleStatus::Optional => 2,
            ToggleStatus::DefaultOptional => 3,
            ToggleStatus::Released => 4,
            ToggleStatus::Deprecated => 5,
        }
    }

    /// Whether transitioning from `self` to `next` is a forward (or no-op)
    /// move. A regression (e.g. `released` -> `optional`) is never applied;
    /// callers log it instead.
    pub fn advances_to(self, next: ToggleStatus) -> bool {
        next.rank() >= self.rank()
    }
}

impl Default for ToggleStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Lifecycle dates shared by options and settings, advanced only forward.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifecycleDates {
    pub beta_date: Option<NaiveDate>,
    pub production_date: Option<NaiveDate>,
    pub deprecation_date: Option<NaiveDate>,
}

/// An admin-toggleable flag in Canvas (`FeatureOption`).
///
/// `option_id` is `slugify(canonical_name)` and never re-keyed once set;
/// updates may refine other fields but must never change `option_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureOption {
    pub option_id: OptionId,
    pub feature_id: FeatureId,
    pub canonical_name: String,
    pub status: ToggleStatus,
    pub lifecycle: LifecycleDates,
    pub description: Option<String>,
    pub meta_summary: Option<String>,
    pub implementation_status: Option<String>,
    pub user_group_url: Option<String>,
    pub first_seen: NaiveDate,
    pub last_seen: NaiveDate,
}

/// A non-toggle behavior change (`FeatureSetting`). Same shape as
/// `FeatureOption` minus toggle semantics — no admin flag is ever shown for
/// it, but the same monotonic lifecycle dates apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSetting {
    pub setting_id: SettingId,
    pub feature_id: FeatureId,
    pub title: String,
    pub status: ToggleStatus,
    pub lifecycle: LifecycleDates,
    pub description: Option<String>,
    pub meta_summary: Option<String>,
    pub implementation_status: Option<String>,
    pub first_seen: NaiveDate,
    pub last_seen: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_status_forward_transitions_allowed() {
        assert!(ToggleStatus::Pending.advances_to(ToggleStatus::Preview));
        assert!(ToggleStatus::Optional.advances_to(ToggleStatus::Optional));
        assert!(ToggleStatus::Released.advances_to(ToggleStatus::Deprecated));
    }

    #[test]
    fn toggle_status_regression_rejected() {
        assert!(!ToggleStatus::Released.advances_to(ToggleStatus::Optional));
        assert!(!ToggleStatus::Deprecated.advances_to(ToggleStatus::Pending));
    }
}
