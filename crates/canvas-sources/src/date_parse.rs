use chrono::NaiveDate;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Best-effort date parser for the "Upcoming Canvas Changes" block (§4.2,
/// §9 open question b): tries ISO-8601 first, then a small set of
/// month-name formats. Failure degrades to `None` rather than failing the
/// page.
pub fn parse_upcoming_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    for fmt in ["%B %-d, %Y", "%B %d, %Y", "%b %-d, %Y", "%b %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }

    // "Month YYYY" with no day: anchor to the 1st.
    let words: Vec<&str> = raw.split_whitespace().collect();
    if words.len() == 2 {
        if let (Some(month), Ok(year)) = (
            MONTH_NAMES.iter().position(|m| m.eq_ignore_ascii_case(words[0])),
            words[1].parse::<i32>(),
        ) {
            return NaiveDate::from_ymd_opt(year, month as u32 + 1, 1);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_date() {
        assert_eq!(parse_upcoming_date("2026-03-14"), NaiveDate::from_ymd_opt(2026, 3, 14));
    }

    #[test]
    fn parses_month_day_year() {
        assert_eq!(parse_upcoming_date("March 14, 2026"), NaiveDate::from_ymd_opt(2026, 3, 14));
    }

    #[test]
    fn parses_month_year_anchored_to_first() {
        assert_eq!(parse_upcoming_date("March 2026"), NaiveDate::from_ymd_opt(2026, 3, 1));
    }

    #[test]
    fn unparseable_text_degrades_to_none() {
        assert_eq!(parse_upcoming_date("sometime soon"), None);
    }
}
