use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::{GuardConfig, FORBIDDEN_SUBSTRINGS};

/// Outcome of an admissibility check.
///
/// `reasons` is non-empty iff `ok` is false. `warnings` is advisory and may
/// be non-empty either way; warnings never fail the gate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissibilityReport {
    pub ok: bool,
    pub reasons: Vec<String>,
    pub warnings: Vec<String>,
}

impl AdmissibilityReport {
    pub fn is_admissible(&self) -> bool {
        self.ok
    }
}

/// The admissibility guard, parameterized by its key sets.
///
/// Stateless and infallible: every call returns a full report.
#[derive(Clone, Debug, Default)]
pub struct ApophaticGuard {
    config: GuardConfig,
}

impl ApophaticGuard {
    pub fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Check an action payload (and its surrounding context) for forbidden
    /// predication.
    ///
    /// Two independent passes feed the hard-failure set: a deep scan for the
    /// four forbidden substrings anywhere in the key tree, and an exact
    /// top-level match against the configured `forbidden_predicates`. Any
    /// hit short-circuits: constraint-only keys are not evaluated and the
    /// report carries reasons only. Otherwise constraint-only keys must be
    /// enforced negatives (`true` / `"enforced"`), with misuse and warn
    /// markers accumulating as warnings.
    pub fn admissible(&self, context: &Value, params: &Value) -> AdmissibilityReport {
        let mut reasons = BTreeSet::new();

        for root in [params, context] {
            let mut path = Vec::new();
            scan_forbidden_substrings(root, &mut path, &mut reasons);
            if let Some(map) = root.as_object() {
                for key in &self.config.forbidden_predicates {
                    if map.contains_key(key) {
                        reasons.insert(format!("forbidden:{key}"));
                    }
                }
            }
        }

        if !reasons.is_empty() {
            let reasons: Vec<String> = reasons.into_iter().collect();
            warn!(reasons = ?reasons, "payload inadmissible: forbidden predication");
            return AdmissibilityReport {
                ok: false,
                reasons,
                warnings: Vec::new(),
            };
        }

        let mut warnings = BTreeSet::new();
        for root in [params, context] {
            if let Some(map) = root.as_object() {
                self.collect_warnings(map, &mut warnings);
            }
        }
        let warnings: Vec<String> = warnings.into_iter().collect();

        if warnings.is_empty() {
            debug!("payload admissible");
        } else {
            warn!(warnings = ?warnings, "payload admissible with warnings");
        }
        AdmissibilityReport {
            ok: true,
            reasons: Vec::new(),
            warnings,
        }
    }

    fn collect_warnings(&self, map: &Map<String, Value>, warnings: &mut BTreeSet<String>) {
        for key in &self.config.constraint_only {
            if let Some(value) = map.get(key) {
                if !is_enforced_negative(value) {
                    warnings.insert(format!("constraint_violation:{key}"));
                }
            }
        }
        for key in &self.config.warn_markers {
            if map.contains_key(key) {
                warnings.insert(format!("warning:{key}"));
            }
        }
        // phenomenology_keys are deliberately untouched: always admissible.
    }
}

/// Depth-first scan for forbidden substrings in lower-cased key names,
/// descending into every object-valued entry. Reasons carry the dotted path
/// to the offending key.
fn scan_forbidden_substrings(
    value: &Value,
    path: &mut Vec<String>,
    reasons: &mut BTreeSet<String>,
) {
    let Some(map) = value.as_object() else {
        return;
    };
    for (key, child) in map {
        let lower = key.to_lowercase();
        path.push(key.clone());
        if FORBIDDEN_SUBSTRINGS.iter().any(|s| lower.contains(s)) {
            reasons.insert(format!("forbidden:{}", path.join(".")));
        }
        scan_forbidden_substrings(child, path, reasons);
        path.pop();
    }
}

/// A constraint-only key is acceptable only as an enforced negative.
fn is_enforced_negative(value: &Value) -> bool {
    matches!(value, Value::Bool(true)) || value.as_str() == Some("enforced")
}

/// Check with the canonical key sets.
pub fn admissible(context: &Value, params: &Value) -> AdmissibilityReport {
    ApophaticGuard::default().admissible(context, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_payload_is_admissible() {
        let report = admissible(&json!({}), &json!({"action": "log", "detail": 3}));
        assert!(report.ok);
        assert!(report.reasons.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn ground_identity_claim_is_a_hard_failure() {
        let report = admissible(&json!({}), &json!({"ground_is": "self"}));
        assert!(!report.ok);
        assert!(report.reasons.iter().any(|r| r.contains("ground_is")));
    }

    #[test]
    fn forbidden_key_is_caught_at_any_depth() {
        let report = admissible(
            &json!({}),
            &json!({"deep": {"deeper": {"ground_is": "hidden here"}}}),
        );
        assert!(!report.ok);
        assert_eq!(report.reasons, vec!["forbidden:deep.deeper.ground_is"]);
    }

    #[test]
    fn substring_scan_matches_embedded_names() {
        // "my_ground_is_here" contains the forbidden substring: flagged,
        // even though it is not in the exact list. Accepted imprecision.
        let report = admissible(&json!({}), &json!({"my_ground_is_here": 1}));
        assert!(!report.ok);
    }

    #[test]
    fn exact_list_covers_keys_the_scan_does_not() {
        // "completion" carries none of the four substrings; only the exact
        // top-level pass catches it.
        let report = admissible(&json!({}), &json!({"completion": 0.9}));
        assert!(!report.ok);
        assert_eq!(report.reasons, vec!["forbidden:completion"]);

        // Nested, it escapes the exact pass by design.
        let report = admissible(&json!({}), &json!({"inner": {"completion": 0.9}}));
        assert!(report.ok);
    }

    #[test]
    fn overlapping_passes_deduplicate_reasons() {
        // Top-level "ground_is" is hit by both the scan and the exact list;
        // one reason comes out.
        let report = admissible(&json!({}), &json!({"ground_is": true}));
        assert_eq!(report.reasons.len(), 1);
    }

    #[test]
    fn context_is_checked_too() {
        let report = admissible(&json!({"sovereign_claim": "mine"}), &json!({}));
        assert!(!report.ok);
    }

    #[test]
    fn enforced_constraint_keys_pass_silently() {
        let report = admissible(
            &json!({}),
            &json!({"no_image": true, "no_totalization": "enforced"}),
        );
        assert!(report.ok);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn unenforced_constraint_key_warns_without_failing() {
        let report = admissible(&json!({}), &json!({"no_image": "sometimes"}));
        assert!(report.ok);
        assert_eq!(report.warnings, vec!["constraint_violation:no_image"]);
    }

    #[test]
    fn false_is_not_an_enforced_negative() {
        let report = admissible(&json!({}), &json!({"no_totalization": false}));
        assert!(report.ok);
        assert_eq!(report.warnings, vec!["constraint_violation:no_totalization"]);
    }

    #[test]
    fn hard_failure_short_circuits_constraint_evaluation() {
        let report = admissible(
            &json!({}),
            &json!({"ground_is": "x", "no_image": "sometimes"}),
        );
        assert!(!report.ok);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn warn_markers_are_flagged_but_allowed() {
        let report = admissible(&json!({}), &json!({"self_grounding": "loop"}));
        assert!(report.ok);
        assert_eq!(report.warnings, vec!["warning:self_grounding"]);
    }

    #[test]
    fn phenomenology_keys_are_never_validated() {
        let report = admissible(
            &json!({}),
            &json!({"felt_sense": "warmth", "phenomenal_quality": 7}),
        );
        assert!(report.ok);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn custom_config_overrides_the_key_sets() {
        let mut config = GuardConfig::default();
        config.forbidden_predicates.push("absolute_frame".into());
        let guard = ApophaticGuard::new(config);

        let report = guard.admissible(&json!({}), &json!({"absolute_frame": 1}));
        assert!(!report.ok);
        assert_eq!(report.reasons, vec!["forbidden:absolute_frame"]);
    }

    #[test]
    fn non_object_params_are_admissible() {
        let report = admissible(&json!({}), &json!("just a string"));
        assert!(report.ok);
    }
}
