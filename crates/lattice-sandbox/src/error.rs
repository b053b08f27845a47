// error.rs — Error types for the sandbox.
//
// Only two conditions are ever surfaced as errors: a blocked callable
// invocation and an oversized range request. Attribute/item denial is not
// an error — the broker degrades it to an undefined sentinel so rendering
// can continue with "missing" semantics.

use lattice_value::ValueError;
use thiserror::Error;

/// Failures the sandbox surfaces to the evaluator.
#[derive(Debug, Error)]
pub enum SandboxError {
    /// A callable invocation was denied. Never degraded to a sentinel: a
    /// blocked side-effecting call must not look like it succeeded.
    #[error("{repr} is not safely callable")]
    NotSafelyCallable { repr: String },

    /// A range request would produce more elements than the configured
    /// ceiling permits.
    #[error("range too big, maximum size for range is {max} (requested {len})")]
    RangeTooLarge { len: u128, max: usize },

    /// A failure from the value model, forwarded unchanged from a
    /// delegated invocation or argument parsing.
    #[error(transparent)]
    Value(#[from] ValueError),
}

impl SandboxError {
    /// True for the security-violation variant, as opposed to resource or
    /// invocation failures.
    pub fn is_security_violation(&self) -> bool {
        matches!(self, SandboxError::NotSafelyCallable { .. })
    }
}
