//! # noema-kernel-consent
//!
//! Consent Capability Tickets — the first of the two hard rails guarding the
//! action boundary.
//!
//! A `Ticket` is a linear capability: a bounded grant of authority scoped by
//! breadth (the scope lattice), by time (a TTL measured from issuance), and
//! by count (a maximum number of invocations). Tickets are values, never
//! mutated in place: `consume` produces a replacement with the use counter
//! advanced, and the original stays intact for any other holder of the same
//! snapshot. Durable storage of whichever copy wins is the ticket store's
//! problem, not ours.
//!
//! ## Invariants
//!
//! - **Linearity**: the descriptive fields of a ticket never change after
//!   creation; only `uses` advances, and only by replacement.
//! - **Non-coercion**: a ticket whose terms carry an explicit
//!   `non_coercion: false` is structurally invalid. Coerced consent is not
//!   consent, regardless of scope, TTL, or remaining budget.
//! - **Determinism**: `check` reads the clock exactly once, so every verdict
//!   is reproducible given a fixed clock reading.
//!
//! ## Check ordering
//!
//! `check` evaluates expiry, then scope, then non-coercion, then the
//! invocation budget, then the field restriction. The ordering is part of
//! the contract: the same invalid ticket always fails for the same reason.

pub mod checker;
pub mod clock;
pub mod context;
pub mod error;
pub mod scope;
pub mod ticket;

pub use checker::{
    check_at, check_scope, expires_at, parse_ttl, CheckRequest, CheckResult, ConsentChecker,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use context::{check_context, extract_tickets};
pub use error::ConsentError;
pub use scope::{Scope, ScopeLattice};
pub use ticket::{ConfidentialityTier, Terms, Ticket};
