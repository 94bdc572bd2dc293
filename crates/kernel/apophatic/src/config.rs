use serde::{Deserialize, Serialize};

/// Substrings of the forbidden-predicate family.
///
/// The deep scan matches these against every lower-cased key at any nesting
/// depth, independently of the exact-match list in [`GuardConfig`]. Broad by
/// design: it can false-positive on unrelated keys carrying the same text,
/// which is the accepted price of catching buried predication.
pub const FORBIDDEN_SUBSTRINGS: [&str; 4] =
    ["ground_is", "ultimate_name", "final_owner", "sovereign_claim"];

/// Key sets the guard enforces, with the canonical defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Keys whose top-level presence is an automatic hard failure,
    /// regardless of value. Exact match.
    pub forbidden_predicates: Vec<String>,
    /// Keys that may only appear as enforced negatives: the value must be
    /// literally `true` or the string `"enforced"`. Anything else present
    /// is a soft warning, never a failure.
    pub constraint_only: Vec<String>,
    /// Subjective/experiential hints. Always permitted, never checked.
    pub phenomenology_keys: Vec<String>,
    /// Allowed but flagged: presence appends a warning.
    pub warn_markers: Vec<String>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            forbidden_predicates: vec![
                // No positive predication of the Ground
                "ground_is".into(),
                // No naming of the unnameable
                "ultimate_name".into(),
                // No sovereign ownership claims
                "final_owner".into(),
                "sovereign_claim".into(),
                // No privileged access to the Ground
                "ground_truth".into(),
                // No totality/completion claims
                "completion".into(),
            ],
            constraint_only: vec![
                "no_image".into(),
                "no_totalization".into(),
                "no_equivalence".into(),
                "no_exchange".into(),
                "no_possession".into(),
            ],
            phenomenology_keys: vec![
                "felt_sense".into(),
                "phenomenal_quality".into(),
                "experiential_note".into(),
            ],
            warn_markers: vec![
                "meta_closure".into(),
                "self_grounding".into(),
                "category_violation".into(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_canonical_sets() {
        let config = GuardConfig::default();
        assert!(config.forbidden_predicates.contains(&"ground_is".to_string()));
        assert!(config.constraint_only.contains(&"no_image".to_string()));
        assert!(config.warn_markers.contains(&"self_grounding".to_string()));
        assert_eq!(FORBIDDEN_SUBSTRINGS.len(), 4);
    }

    #[test]
    fn every_substring_names_a_forbidden_predicate() {
        let config = GuardConfig::default();
        for s in FORBIDDEN_SUBSTRINGS {
            assert!(config.forbidden_predicates.iter().any(|k| k == s));
        }
    }
}
