// range_guard.rs — Bounded range construction.
//
// An unbounded `range(huge)` in a template is a cheap resource-exhaustion
// attack. The guard computes the element count from the (start, stop, step)
// arguments alone and refuses anything over the ceiling before a single
// element exists.

use lattice_value::{RangeSpec, RangeValue, Value};

use crate::error::SandboxError;

/// Default ceiling on the number of elements a range may produce.
pub const MAX_RANGE: usize = 100_000;

/// Produces lazy, finite ranges under a fixed element-count ceiling.
#[derive(Debug, Clone, Copy)]
pub struct BoundedRange {
    ceiling: usize,
}

impl BoundedRange {
    pub fn new() -> Self {
        BoundedRange { ceiling: MAX_RANGE }
    }

    pub fn with_ceiling(ceiling: usize) -> Self {
        BoundedRange { ceiling }
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Build a range from evaluator arguments: `range(stop)`,
    /// `range(start, stop)`, or `range(start, stop, step)`.
    pub fn range(&self, args: &[Value]) -> Result<RangeValue, SandboxError> {
        let spec = RangeSpec::from_args(args)?;
        self.check(spec)
    }

    /// Build a range from an already-parsed spec.
    pub fn check(&self, spec: RangeSpec) -> Result<RangeValue, SandboxError> {
        let len = spec.len();
        if len > self.ceiling as u128 {
            return Err(SandboxError::RangeTooLarge {
                len,
                max: self.ceiling,
            });
        }
        Ok(RangeValue::from_checked(spec, len as usize))
    }
}

impl Default for BoundedRange {
    fn default() -> Self {
        Self::new()
    }
}
