use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::ConsentError;
use crate::scope::{Scope, ScopeLattice};
use crate::ticket::Ticket;

/// What a requester is asking the ticket to cover.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRequest {
    /// Scope required by the attempted use.
    pub required_scope: Scope,
    /// Specific field being accessed, when the use is field-granular.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl CheckRequest {
    pub fn new(required_scope: Scope) -> Self {
        Self {
            required_scope,
            field: None,
        }
    }

    pub fn with_field(required_scope: Scope, field: impl Into<String>) -> Self {
        Self {
            required_scope,
            field: Some(field.into()),
        }
    }
}

/// Verdict of a ticket check. Exactly one variant; callers branch on the
/// discriminant before reading any payload field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckResult {
    /// Ticket covers the request. Carries the validated ticket snapshot so
    /// the caller can `consume` exactly what was checked.
    Valid {
        ticket: Ticket,
        remaining_invocations: u32,
        expires_at: i64,
    },
    /// Current time is past `issued_at + ttl`.
    Expired,
    /// Use budget is spent.
    #[serde(rename = "no_invocations")]
    NoInvocationsRemaining,
    /// Held scope does not satisfy the required scope.
    ScopeViolation { required: Scope, held: Scope },
    /// Terms carry an explicit `non_coercion: false`. Structural; coerced
    /// consent is never valid.
    #[serde(rename = "noncoercion_violation")]
    NonCoercionViolation,
    /// Requested field is outside the allowed prefixes.
    FieldViolation { field: String },
}

impl CheckResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, CheckResult::Valid { .. })
    }
}

/// Parse a TTL duration string into whole seconds.
///
/// Accepts the humantime vocabulary ("24 hours", "7 days", "90s") and the
/// ISO-8601 elapsed forms ("PT24H", "P7D", "P1DT12H"). Calendar units
/// (years, ISO months) are rejected: a TTL is an elapsed offset, not a
/// calendar date, and must carry no timezone ambiguity.
pub fn parse_ttl(ttl: &str) -> Result<u64, ConsentError> {
    let s = ttl.trim();
    if s.starts_with('P') || s.starts_with('p') {
        return iso8601_seconds(s).ok_or_else(|| ConsentError::InvalidDuration(ttl.to_string()));
    }
    humantime::parse_duration(s)
        .map(|d| d.as_secs())
        .map_err(|_| ConsentError::InvalidDuration(ttl.to_string()))
}

/// ISO-8601 duration body, elapsed-time units only (W, D, and T-prefixed
/// H, M, S). Returns None on anything else, including fractions.
fn iso8601_seconds(s: &str) -> Option<u64> {
    let mut secs: u64 = 0;
    let mut in_time = false;
    let mut digits = String::new();
    let mut date_components = 0u32;
    let mut time_components = 0u32;

    for ch in s.chars().skip(1) {
        match ch {
            'T' | 't' if !in_time && digits.is_empty() => in_time = true,
            '0'..='9' => digits.push(ch),
            _ => {
                if digits.is_empty() {
                    return None;
                }
                let value: u64 = digits.parse().ok()?;
                digits.clear();
                let factor = match (in_time, ch.to_ascii_uppercase()) {
                    (false, 'W') => 604_800,
                    (false, 'D') => 86_400,
                    (true, 'H') => 3_600,
                    (true, 'M') => 60,
                    (true, 'S') => 1,
                    // 'Y' and date-position 'M' are calendar units.
                    _ => return None,
                };
                secs = secs.checked_add(value.checked_mul(factor)?)?;
                if in_time {
                    time_components += 1;
                } else {
                    date_components += 1;
                }
            }
        }
    }

    // A 'T' must introduce at least one time component ("P1DT" is
    // malformed), and no trailing digits may be left unclaimed.
    let dangling_time = in_time && time_components == 0;
    if digits.is_empty() && !dangling_time && date_components + time_components > 0 {
        Some(secs)
    } else {
        None
    }
}

/// Absolute expiry time of a ticket: `issued_at + ttl`.
///
/// Pure function of the ticket's immutable fields.
pub fn expires_at(ticket: &Ticket) -> Result<i64, ConsentError> {
    // TTLs past i64 seconds saturate: the ticket outlives the clock's
    // representable range instead of wrapping negative and reading expired.
    let ttl_secs = i64::try_from(parse_ttl(&ticket.ttl)?).unwrap_or(i64::MAX);
    Ok(ticket.issued_at.saturating_add(ttl_secs))
}

/// Does a held scope satisfy a required scope?
///
/// True iff `held ≤ required` in the lattice ordering; equal scopes always
/// satisfy each other.
pub fn check_scope(lattice: &ScopeLattice, required: Scope, held: Scope) -> bool {
    lattice.lte(held, required)
}

/// Evaluate a ticket against a request at a given instant.
///
/// Rules run in fixed order — expiry, scope, non-coercion, invocation
/// budget, field restriction — so the same invalid ticket always reports
/// the same violation. The only `Err` is a TTL string that cannot be
/// parsed; every expected failure is a [`CheckResult`] variant.
pub fn check_at(
    lattice: &ScopeLattice,
    ticket: &Ticket,
    request: &CheckRequest,
    now: i64,
) -> Result<CheckResult, ConsentError> {
    let expiry = expires_at(ticket)?;
    if now > expiry {
        warn!(ticket = %ticket.id, expiry, now, "consent check failed: ticket expired");
        return Ok(CheckResult::Expired);
    }

    if !check_scope(lattice, request.required_scope, ticket.scope) {
        warn!(
            ticket = %ticket.id,
            required = %request.required_scope,
            held = %ticket.scope,
            "consent check failed: scope violation"
        );
        return Ok(CheckResult::ScopeViolation {
            required: request.required_scope,
            held: ticket.scope,
        });
    }

    if !ticket.terms.non_coercion {
        warn!(ticket = %ticket.id, "consent check failed: explicit non-coercion violation");
        return Ok(CheckResult::NonCoercionViolation);
    }

    let max = ticket.terms.max_invocations();
    if ticket.uses >= max {
        warn!(ticket = %ticket.id, uses = ticket.uses, max, "consent check failed: budget spent");
        return Ok(CheckResult::NoInvocationsRemaining);
    }

    if let (Some(allowed), Some(field)) = (&ticket.terms.fields, &request.field) {
        let covered = allowed.iter().any(|prefix| field.starts_with(prefix));
        if !covered {
            warn!(ticket = %ticket.id, field = %field, "consent check failed: field violation");
            return Ok(CheckResult::FieldViolation {
                field: field.clone(),
            });
        }
    }

    debug!(
        ticket = %ticket.id,
        remaining = max - ticket.uses,
        expires_at = expiry,
        "consent check passed"
    );
    Ok(CheckResult::Valid {
        ticket: ticket.clone(),
        remaining_invocations: max - ticket.uses,
        expires_at: expiry,
    })
}

/// Ticket checker bound to a lattice and a clock source.
///
/// The lattice and clock are the two external interfaces of this crate; a
/// deployment wires real ones, tests wire [`crate::clock::FixedClock`].
pub struct ConsentChecker {
    lattice: ScopeLattice,
    clock: Arc<dyn Clock>,
}

impl ConsentChecker {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            lattice: ScopeLattice,
            clock,
        }
    }

    /// Checker on the system clock.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    pub fn lattice(&self) -> &ScopeLattice {
        &self.lattice
    }

    /// Check a ticket against a request, reading the clock once.
    pub fn check(&self, ticket: &Ticket, request: &CheckRequest) -> Result<CheckResult, ConsentError> {
        check_at(&self.lattice, ticket, request, self.clock.now())
    }
}
