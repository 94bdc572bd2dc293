//! # noema-kernel-rails
//!
//! Rail Composer — the single verdict over both hard rails.
//!
//! An action crosses the boundary only when the consent rail (a valid,
//! in-scope, unspent capability ticket) and the apophatic rail (no forbidden
//! predication in the payload) both pass. The composition is a plain logical
//! AND; what the composer adds is the reason tag for whichever rail failed
//! first. Consent takes priority: a requester with no standing is turned
//! away before their payload is judged.
//!
//! Both inputs are pure data, so the composer is side-effect-free and
//! trivially replayable.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use noema_kernel_apophatic::AdmissibilityReport;
use noema_kernel_consent::CheckResult;

/// Which rail blocked the action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RailReason {
    /// Consent capability absent, expired, out of scope, or spent.
    Consent,
    /// Payload inadmissible: positive predication of the Ground.
    Apophatic,
}

/// Combined verdict of the two rails.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RailVerdict {
    pub ok: bool,
    /// Set iff `ok` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RailReason>,
    /// The full admissibility report, when the apophatic rail failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<AdmissibilityReport>,
}

impl RailVerdict {
    fn pass() -> Self {
        Self {
            ok: true,
            reason: None,
            details: None,
        }
    }
}

/// Compose the consent and admissibility results into one verdict.
///
/// - No consent result, or any non-`Valid` variant → fail with
///   [`RailReason::Consent`]. Consent failure wins even when the payload
///   would also be inadmissible.
/// - Admissibility `ok == false` → fail with [`RailReason::Apophatic`],
///   carrying the report.
/// - Otherwise pass. Warnings on the report never fail the gate.
pub fn rails(
    consent: Option<&CheckResult>,
    admissibility: &AdmissibilityReport,
) -> RailVerdict {
    match consent {
        Some(result) if result.is_valid() => {}
        _ => {
            warn!("rails: blocked on consent");
            return RailVerdict {
                ok: false,
                reason: Some(RailReason::Consent),
                details: None,
            };
        }
    }

    if !admissibility.ok {
        warn!(reasons = ?admissibility.reasons, "rails: blocked on apophatic guard");
        return RailVerdict {
            ok: false,
            reason: Some(RailReason::Apophatic),
            details: Some(admissibility.clone()),
        };
    }

    debug!(warnings = admissibility.warnings.len(), "rails: pass");
    RailVerdict::pass()
}
