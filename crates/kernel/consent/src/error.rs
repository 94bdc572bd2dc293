use thiserror::Error;

/// Errors from the consent subsystem.
///
/// The taxonomy is closed on purpose: every *expected* check failure
/// (expired, scope violation, exhausted budget, ...) is data, carried by
/// [`crate::checker::CheckResult`]. The only fatal condition is a TTL string
/// the checker cannot read, because no verdict can be computed from it.
#[derive(Error, Debug)]
pub enum ConsentError {
    #[error("invalid duration string: {0:?}")]
    InvalidDuration(String),
}
