use canvas_types::ContentType;

/// Outcome of applying a first-run cap to one content_type's candidates
/// observed in this run (§4.5). `held_back` items are never inserted into
/// `emit` — §4.5/§9 open question (c) still requires the caller to
/// persist them via the normal upsert path so later runs treat them as
/// "seen"; this module only decides what's safe to surface in the feed.
#[derive(Debug, Clone)]
pub struct FirstRunDecision<T> {
    pub emit: Vec<T>,
    pub held_back: Vec<T>,
}

/// Cap `candidates` to `content_type`'s first-run cap (§4.5 table) iff
/// `was_first_run_at_start` is true. Callers must capture that flag from
/// `Database::is_first_run_for_type` *before* upserting this run's items
/// — upserting flips the store's "zero rows of this type" state to false,
/// and §8 testable property 6 is evaluated against the state at run
/// start, not after ingestion.
///
/// `override_cap` is the operator-configured cap for `content_type`
/// (`Config::first_run_caps`), or `None` to fall back to the §4.5
/// default table on `ContentType::first_run_cap`. Uncapped content types
/// (`reddit`, `status`, `changelog`) always return every candidate in
/// `emit` regardless of `override_cap`.
///
/// `order_key` extracts the most-recent-first sort key: a community
/// post's `first_posted`, or a release/deploy entry's `announced_at`.
pub fn apply_first_run_cap<T, K, F>(
    was_first_run_at_start: bool,
    content_type: ContentType,
    override_cap: Option<usize>,
    mut candidates: Vec<T>,
    mut order_key: F,
) -> FirstRunDecision<T>
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    let Some(cap) = content_type.first_run_cap().map(|default| override_cap.unwrap_or(default)) else {
        return FirstRunDecision { emit: candidates, held_back: Vec::new() };
    };

    if !was_first_run_at_start {
        return FirstRunDecision { emit: candidates, held_back: Vec::new() };
    }

    candidates.sort_by(|a, b| order_key(b).cmp(&order_key(a)));
    let held_back = if candidates.len() > cap { candidates.split_off(cap) } else { Vec::new() };

    FirstRunDecision { emit: candidates, held_back }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncapped_type_emits_everything_regardless_of_first_run() {
        let decision = apply_first_run_cap(true, ContentType::Reddit, None, vec![1, 2, 3, 4], |n| *n);
        assert_eq!(decision.emit, vec![1, 2, 3, 4]);
        assert!(decision.held_back.is_empty());
    }

    #[test]
    fn non_first_run_never_caps() {
        let decision = apply_first_run_cap(false, ContentType::Question, None, vec![1, 2, 3, 4, 5, 6], |n| *n);
        assert_eq!(decision.emit.len(), 6);
        assert!(decision.held_back.is_empty());
    }

    #[test]
    fn first_run_caps_question_at_five_keeping_most_recent() {
        let candidates: Vec<i32> = (1..=40).collect();
        let decision = apply_first_run_cap(true, ContentType::Question, None, candidates, |n| *n);
        assert_eq!(decision.emit, vec![40, 39, 38, 37, 36]);
        assert_eq!(decision.held_back.len(), 35);
    }

    #[test]
    fn first_run_caps_release_note_entries_at_three() {
        let candidates: Vec<i32> = vec![5, 1, 3, 2, 4];
        let decision = apply_first_run_cap(true, ContentType::ReleaseNote, None, candidates, |n| *n);
        assert_eq!(decision.emit, vec![5, 4, 3]);
    }

    #[test]
    fn override_cap_replaces_the_default_table() {
        let candidates: Vec<i32> = (1..=10).collect();
        let decision = apply_first_run_cap(true, ContentType::Question, Some(2), candidates, |n| *n);
        assert_eq!(decision.emit, vec![10, 9]);
        assert_eq!(decision.held_back.len(), 8);
    }

    #[test]
    fn override_cap_is_ignored_for_an_uncapped_type() {
        let decision = apply_first_run_cap(true, ContentType::Reddit, Some(1), vec![1, 2, 3], |n| *n);
        assert_eq!(decision.emit, vec![1, 2, 3]);
        assert!(decision.held_back.is_empty());
    }
}
