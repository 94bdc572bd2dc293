use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Consent scope — breadth of the context a grant covers.
///
/// The five levels form a fixed total order from the narrowest context to
/// the widest: self < dyad < group < org < public. The set is closed; there
/// are no partial branches in the ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Individual only
    #[serde(rename = "self")]
    Self_,
    /// Two-party interaction
    Dyad,
    /// Closed group (e.g. a team)
    Group,
    /// Organization
    Org,
    /// Public / open access
    Public,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Self_ => "self",
            Scope::Dyad => "dyad",
            Scope::Group => "group",
            Scope::Org => "org",
            Scope::Public => "public",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "self" => Ok(Scope::Self_),
            "dyad" => Ok(Scope::Dyad),
            "group" => Ok(Scope::Group),
            "org" => Ok(Scope::Org),
            "public" => Ok(Scope::Public),
            other => Err(UnknownScope(other.to_string())),
        }
    }
}

/// A scope name outside the closed five-level set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownScope(pub String);

/// The canonical scope ordering plus its `lte` comparison.
///
/// The lattice is total and fixed; it exists as a value (rather than bare
/// functions) because it is an external interface of the kernel — the
/// checker takes whichever lattice the deployment supplies, and tests can
/// assert against the same one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScopeLattice;

impl ScopeLattice {
    /// All scopes, narrowest first. This IS the ordering.
    pub const ORDER: [Scope; 5] = [
        Scope::Self_,
        Scope::Dyad,
        Scope::Group,
        Scope::Org,
        Scope::Public,
    ];

    /// Position of a scope in the canonical ordering (0 = narrowest).
    pub fn level(&self, scope: Scope) -> usize {
        match scope {
            Scope::Self_ => 0,
            Scope::Dyad => 1,
            Scope::Group => 2,
            Scope::Org => 3,
            Scope::Public => 4,
        }
    }

    /// `a ≤ b` — true iff `a`'s position is at or before `b`'s.
    ///
    /// Equal scopes always satisfy each other.
    pub fn lte(&self, a: Scope, b: Scope) -> bool {
        self.level(a) <= self.level(b)
    }
}
