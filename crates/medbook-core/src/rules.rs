//! Business-rule engine.
//!
//! Rules are data, not code paths: a command handler passes an ordered slice
//! of named invariants and adding a new invariant requires no change to the
//! engine or its callers. Predicates must be pure — evaluation short-circuits
//! on the first unmet rule, so later predicates may never run.

use crate::error::DomainError;

/// A named invariant over a candidate command.
pub trait BusinessRule {
    /// Stable rule name, reported on failure.
    fn name(&self) -> &'static str;

    /// Whether the invariant holds. Must be pure.
    fn is_met(&self) -> bool;

    /// Human-readable failure message.
    fn error(&self) -> String;
}

/// Evaluates `rules` in order, returning the first failure.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] carrying the first unmet rule's name
/// and message; later rules are not evaluated.
pub fn check(rules: &[&dyn BusinessRule]) -> Result<(), DomainError> {
    for rule in rules {
        if !rule.is_met() {
            return Err(DomainError::Validation {
                rule: rule.name(),
                message: rule.error(),
            });
        }
    }
    Ok(())
}
