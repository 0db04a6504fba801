use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

static REDDIT_HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bu/[A-Za-z0-9_-]+\b").unwrap());

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?1[-.\s]?)?\(?\d{3}\)?[-.\s]\d{3}[-.\s]\d{4}\b").unwrap()
});

/// Rewrite direct identifiers out of `text` before it reaches the LLM
/// gateway or the comment store: email addresses become `[email]`, Reddit
/// handles (`u/<name>`) become `[user]`, and phone numbers become `[phone]`.
///
/// Order matters: phone numbers are replaced last so a run of digits inside
/// an already-redacted email local-part can't be mistaken for one.
pub fn redact_pii(text: &str) -> String {
    let redacted = EMAIL_RE.replace_all(text, "[email]");
    let redacted = REDDIT_HANDLE_RE.replace_all(&redacted, "[user]");
    let redacted = PHONE_RE.replace_all(&redacted, "[phone]");
    redacted.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_email() {
        assert_eq!(redact_pii("reach me at alice@example.com"), "reach me at [email]");
    }

    #[test]
    fn redacts_reddit_handle() {
        assert_eq!(redact_pii("as u/alice mentioned"), "as [user] mentioned");
    }

    #[test]
    fn redacts_phone_number() {
        assert_eq!(redact_pii("call 555-123-4567"), "call [phone]");
    }

    #[test]
    fn redacts_all_three_in_one_pass() {
        let input = "Reach me at alice@example.com or u/alice or 555-123-4567";
        let redacted = redact_pii(input);
        assert_eq!(redacted, "Reach me at [email] or [user] or [phone]");
    }

    #[test]
    fn leaves_plain_text_untouched() {
        assert_eq!(redact_pii("no identifiers here"), "no identifiers here");
    }

    #[test]
    fn is_idempotent() {
        let input = "alice@example.com u/alice 555-123-4567";
        let once = redact_pii(input);
        let twice = redact_pii(&once);
        assert_eq!(once, twice);
    }
}
