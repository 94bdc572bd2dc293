//! Ticket extraction from caller-supplied context payloads.
//!
//! Some callers present a pre-validated [`Ticket`]; others hand the kernel a
//! raw context object and expect it to find the consent inside. This module
//! covers the second shape: a `consent` object (honored only when marked
//! `valid: true`) and/or a `consent_tickets` array, with conservative
//! defaults for anything the caller omitted.

use serde_json::Value;
use tracing::debug;

use crate::checker::{check_at, CheckRequest, CheckResult};
use crate::scope::{Scope, ScopeLattice};
use crate::ticket::{Terms, Ticket};

/// Defaults applied to under-specified context tickets: issued one minute
/// ago, one hour of life, a single use.
const DEFAULT_ISSUED_AGO_SECS: i64 = 60;
const DEFAULT_TTL: &str = "1 hour";

fn ticket_from_value(value: &Value, index: usize, now: i64) -> Option<Ticket> {
    let obj = value.as_object()?;

    // A scope outside the closed lattice cannot be represented, let alone
    // satisfied; skip the entry.
    let scope: Scope = obj
        .get("scope")
        .and_then(Value::as_str)
        .unwrap_or("self")
        .parse()
        .ok()?;

    let issued_at = obj
        .get("issued_at")
        .and_then(Value::as_i64)
        .unwrap_or(now - DEFAULT_ISSUED_AGO_SECS);

    let ttl = match obj.get("ttl").and_then(Value::as_str) {
        Some(s) => s.to_string(),
        None => match obj.get("ttl_seconds").and_then(Value::as_u64) {
            Some(secs) => format!("{secs}s"),
            None => DEFAULT_TTL.to_string(),
        },
    };

    let mut terms = Terms::new(
        obj.get("purpose")
            .and_then(Value::as_str)
            .unwrap_or("contextual consent"),
    );
    terms.max_invocations = counter_from(obj.get("max_invocations"));

    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("ctx-{index}"));
    let holder = obj.get("holder").and_then(Value::as_str).unwrap_or("");

    let mut ticket = Ticket::new(id, holder, scope, issued_at, ttl, terms);
    ticket.uses = counter_from(obj.get("invocations")).unwrap_or(0);
    Some(ticket)
}

/// Caller-supplied counters clamp to `u32::MAX` instead of truncating.
/// Truncation would wrap a spent ticket's use count back toward zero and
/// reopen it; clamping keeps oversized counts inert.
fn counter_from(value: Option<&Value>) -> Option<u32> {
    value
        .and_then(Value::as_u64)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
}

/// Pull consent tickets out of a context payload.
///
/// Reads a `consent` object — only when it carries `valid: true` and a
/// scope — and every well-formed entry of a `consent_tickets` array.
/// Entries with unknown scopes are skipped.
pub fn extract_tickets(context: &Value, now: i64) -> Vec<Ticket> {
    let mut tickets = Vec::new();

    if let Some(consent) = context.get("consent") {
        let marked_valid = consent.get("valid").and_then(Value::as_bool) == Some(true);
        if marked_valid && consent.get("scope").is_some() {
            if let Some(ticket) = ticket_from_value(consent, 0, now) {
                tickets.push(ticket);
            }
        }
    }

    if let Some(list) = context.get("consent_tickets").and_then(Value::as_array) {
        for (i, entry) in list.iter().enumerate() {
            if let Some(ticket) = ticket_from_value(entry, i + 1, now) {
                tickets.push(ticket);
            }
        }
    }

    debug!(count = tickets.len(), "extracted consent tickets from context");
    tickets
}

/// First passing check across the tickets found in a context.
///
/// With no required scope, any currently valid ticket suffices (each is
/// checked against its own scope, which is reflexively satisfied). Returns
/// `None` when no ticket passes; TTL parse failures on individual context
/// tickets disqualify that ticket rather than aborting the sweep.
pub fn check_context(
    lattice: &ScopeLattice,
    context: &Value,
    required_scope: Option<Scope>,
    now: i64,
) -> Option<CheckResult> {
    for ticket in extract_tickets(context, now) {
        let request = CheckRequest::new(required_scope.unwrap_or(ticket.scope));
        match check_at(lattice, &ticket, &request, now) {
            Ok(result @ CheckResult::Valid { .. }) => return Some(result),
            Ok(_) | Err(_) => continue,
        }
    }
    None
}
