use std::sync::LazyLock;

use canvas_types::{LifecycleDates, ToggleStatus};
use chrono::NaiveDate;
use regex::Regex;

static BETA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)available in beta|\bbeta\b").unwrap());
static PRODUCTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)available in production").unwrap());
static DEPRECATED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bdeprecated\b").unwrap());

/// Heuristic lifecycle transition from an entry's raw HTML (§4.3 step 5):
/// "available in beta"/"Beta" sets `beta_date`, "available in production"
/// sets `production_date`, an explicit "deprecated" marker sets
/// `deprecation_date`. All three are proposals — `canvas-index` only
/// applies them as forward moves (§9 monotonic lifecycle).
pub fn infer_lifecycle(raw_content: &str, page_date: NaiveDate) -> LifecycleDates {
    LifecycleDates {
        beta_date: BETA_RE.is_match(raw_content).then_some(page_date),
        production_date: PRODUCTION_RE.is_match(raw_content).then_some(page_date),
        deprecation_date: DEPRECATED_RE.is_match(raw_content).then_some(page_date),
    }
}

/// Status proposal mirroring `infer_lifecycle`'s signals: the strongest
/// signal present wins, since `canvas-index` will reject a regression
/// anyway (`ToggleStatus::advances_to`).
pub fn infer_status(raw_content: &str) -> ToggleStatus {
    if DEPRECATED_RE.is_match(raw_content) {
        ToggleStatus::Deprecated
    } else if PRODUCTION_RE.is_match(raw_content) {
        ToggleStatus::Released
    } else if BETA_RE.is_match(raw_content) {
        ToggleStatus::Preview
    } else {
        ToggleStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beta_phrase_sets_beta_date_and_preview_status() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 21).unwrap();
        let lifecycle = infer_lifecycle("Now available in beta for all instructors.", date);
        assert_eq!(lifecycle.beta_date, Some(date));
        assert_eq!(lifecycle.production_date, None);
        assert_eq!(infer_status("Now available in beta for all instructors."), ToggleStatus::Preview);
    }

    #[test]
    fn deprecated_marker_wins_over_beta_mention() {
        assert_eq!(
            infer_status("This beta feature is now deprecated and will be removed."),
            ToggleStatus::Deprecated
        );
    }

    #[test]
    fn plain_text_has_no_signal() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 21).unwrap();
        let lifecycle = infer_lifecycle("Just a regular description.", date);
        assert_eq!(lifecycle.beta_date, None);
        assert_eq!(lifecycle.production_date, None);
        assert_eq!(lifecycle.deprecation_date, None);
        assert_eq!(infer_status("Just a regular description."), ToggleStatus::Pending);
    }
}
