use serde::{Deserialize, Serialize};

use crate::scope::Scope;

/// Confidentiality tier attached to a grant's terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidentialityTier {
    Sealed,
    Confidential,
    Internal,
    Open,
}

/// Terms of a consent grant.
///
/// `non_coercion` defaults to true and an explicit false is a structural
/// violation at check time — coerced consent is never valid. An absent
/// `max_invocations` means exactly one use.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Terms {
    /// What the grant is for.
    pub purpose: String,
    /// Allowed field-name prefixes, when access is field-restricted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    /// Whether the granted action is reversible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reversible: Option<bool>,
    /// Maximum number of invocations; absent means 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_invocations: Option<u32>,
    /// Consent was given free of coercion. Defaults to true.
    #[serde(default = "default_true")]
    pub non_coercion: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidentiality: Option<ConfidentialityTier>,
}

fn default_true() -> bool {
    true
}

impl Terms {
    pub fn new(purpose: impl Into<String>) -> Self {
        Self {
            purpose: purpose.into(),
            fields: None,
            reversible: None,
            max_invocations: None,
            non_coercion: true,
            confidentiality: None,
        }
    }

    /// Effective invocation budget (default 1 when unspecified).
    pub fn max_invocations(&self) -> u32 {
        self.max_invocations.unwrap_or(1)
    }
}

/// A consent capability ticket — an immutable grant of bounded authority.
///
/// Descriptive fields (`id`, `holder`, `scope`, `issued_at`, `ttl`, `terms`)
/// never change after creation. The use counter advances only by
/// replacement: [`Ticket::consume`] returns a new value with `uses + 1` and
/// leaves its receiver untouched. A ticket becomes permanently inert once
/// its budget is spent or its TTL elapses; staleness is detected by the
/// checker, never enforced by deletion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Opaque unique identifier, assigned by the issuer.
    pub id: String,
    /// Opaque identity of the grant holder.
    pub holder: String,
    /// Granted scope.
    pub scope: Scope,
    /// Issuance time, epoch seconds.
    pub issued_at: i64,
    /// Time-to-live as a duration string ("24 hours", "7 days", "PT24H").
    /// Durations are elapsed offsets, never calendar dates.
    pub ttl: String,
    pub terms: Terms,
    /// Detached signature. Carried for the verifier collaborator; never
    /// inspected here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Number of successful authorized uses so far.
    #[serde(default)]
    pub uses: u32,
}

impl Ticket {
    /// Create a fresh (unused) ticket.
    pub fn new(
        id: impl Into<String>,
        holder: impl Into<String>,
        scope: Scope,
        issued_at: i64,
        ttl: impl Into<String>,
        terms: Terms,
    ) -> Self {
        Self {
            id: id.into(),
            holder: holder.into(),
            scope,
            issued_at,
            ttl: ttl.into(),
            terms,
            signature: None,
            uses: 0,
        }
    }

    /// Record one authorized use by producing the successor ticket.
    ///
    /// This is a structural copy with `uses + 1`; the receiver is never
    /// mutated, so concurrent holders of the same snapshot each derive their
    /// own successor and the ticket store serializes which one persists.
    ///
    /// The contract is that `consume` follows a successful check; calling it
    /// without one is permitted but leaves the caller with a ticket that may
    /// already be inert.
    #[must_use = "consume returns the successor ticket; the original is unchanged"]
    pub fn consume(&self) -> Ticket {
        Ticket {
            uses: self.uses + 1,
            ..self.clone()
        }
    }
}
