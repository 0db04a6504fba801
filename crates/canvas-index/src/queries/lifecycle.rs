use canvas_types::ToggleStatus;
use chrono::NaiveDate;

pub fn status_str(status: ToggleStatus) -> &'static str {
    match status {
        ToggleStatus::Pending => "pending",
        ToggleStatus::Preview => "preview",
        ToggleStatus::Optional => "optional",
        ToggleStatus::DefaultOptional => "default_optional",
        ToggleStatus::Released => "released",
        ToggleStatus::Deprecated => "deprecated",
    }
}

pub fn parse_status(raw: &str) -> ToggleStatus {
    match raw {
        "preview" => ToggleStatus::Preview,
        "optional" => ToggleStatus::Optional,
        "default_optional" => ToggleStatus::DefaultOptional,
        "released" => ToggleStatus::Released,
        "deprecated" => ToggleStatus::Deprecated,
        _ => ToggleStatus::Pending,
    }
}

/// Monotonic status transition: never regress (§3, §9). Logged by callers
/// when a would-be regression is detected; this just decides the next
/// stored value.
pub fn advance_status(current: ToggleStatus, proposed: ToggleStatus) -> ToggleStatus {
    if current.advances_to(proposed) {
        proposed
    } else {
        current
    }
}

pub fn date_str(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.to_string())
}

pub fn parse_date(raw: Option<String>) -> Option<NaiveDate> {
    raw.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
}

/// Lifecycle dates only ever advance forward: a later, non-null value wins
/// over an earlier or null one; an earlier incoming value never overwrites
/// an already-set later date (the monotonic lifecycle invariant, §9).
pub fn advance_date(current: Option<NaiveDate>, proposed: Option<NaiveDate>) -> Option<NaiveDate> {
    match (current, proposed) {
        (None, p) => p,
        (c, None) => c,
        (Some(c), Some(p)) => Some(if p > c { p } else { c }),
    }
}
