/// Deterministic identifier slug: lowercase, run any non-alphanumeric span
/// down to a single `_`, then trim leading/trailing underscores.
///
/// This is the single rule behind `feature_id` (from an H3 category title),
/// `option_id` (from a `FeatureOption.canonical_name`), and `setting_id`
/// (from a `FeatureSetting.title`) — callers never invent their own
/// slugging logic.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_sep = false;

    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        } else {
            pending_sep = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_joins_words() {
        assert_eq!(slugify("New Quizzes"), "new_quizzes");
    }

    #[test]
    fn collapses_repeated_separators() {
        assert_eq!(slugify("Speed Grader -- Rubrics!!"), "speed_grader_rubrics");
    }

    #[test]
    fn strips_leading_and_trailing_separators() {
        assert_eq!(slugify("  (Beta) New Analytics  "), "beta_new_analytics");
    }

    #[test]
    fn empty_input_yields_empty_slug() {
        assert_eq!(slugify("   ---   "), "");
    }

    #[test]
    fn is_stable_across_repeated_calls() {
        let name = "Gradebook: Individual View";
        assert_eq!(slugify(name), slugify(name));
    }
}
