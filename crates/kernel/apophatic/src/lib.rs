//! # noema-kernel-apophatic
//!
//! Apophatic Admissibility Guard — the content rail.
//!
//! Where the consent rail asks *may this requester act*, this crate asks
//! *may this action be said at all*. An action payload is inadmissible when
//! it positively predicates the Ground: names it, claims identity with it,
//! or asserts ownership or sovereignty over it. Such claims are hard
//! failures the kernel never endorses, whatever the requester's authority.
//!
//! A second, softer family of keys is constraint-only: fine to *enforce* as
//! negatives (`no_image: true`, `no_totalization: "enforced"`), wrong to
//! assert as arbitrary facts. Misuse surfaces as a warning so the caller
//! can be corrected without blocking benign cases. Phenomenological keys —
//! first-person, experiential hints — are never validated at all.
//!
//! The guard never fails as a function: it always returns a structured
//! [`AdmissibilityReport`], and the report is the whole answer.

pub mod config;
pub mod guard;

pub use config::GuardConfig;
pub use guard::{admissible, AdmissibilityReport, ApophaticGuard};
