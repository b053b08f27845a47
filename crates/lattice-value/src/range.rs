// range.rs — Arithmetic-progression values.
//
// The length of a range is computed from (start, stop, step) alone; the
// elements are produced lazily by an iterator that can be restarted any
// number of times. The element-count ceiling is enforced by the sandbox
// crate's guard, not here — this module only knows how to describe and
// walk a progression.

use crate::error::ValueError;
use crate::value::Value;

/// An unvalidated (start, stop, step) request, parsed from evaluator
/// arguments the same way the classic `range` builtin takes them:
/// `range(stop)`, `range(start, stop)`, or `range(start, stop, step)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl RangeSpec {
    pub fn new(start: i64, stop: i64, step: i64) -> Result<Self, ValueError> {
        if step == 0 {
            return Err(ValueError::ZeroStep);
        }
        Ok(RangeSpec { start, stop, step })
    }

    /// Parse 1–3 positional integer arguments.
    pub fn from_args(args: &[Value]) -> Result<Self, ValueError> {
        fn as_int(value: &Value) -> Result<i64, ValueError> {
            match value {
                Value::Int(i) => Ok(*i),
                other => Err(ValueError::WrongType {
                    expected: "int",
                    got: other.type_name().to_string(),
                }),
            }
        }
        match args {
            [stop] => RangeSpec::new(0, as_int(stop)?, 1),
            [start, stop] => RangeSpec::new(as_int(start)?, as_int(stop)?, 1),
            [start, stop, step] => RangeSpec::new(as_int(start)?, as_int(stop)?, as_int(step)?),
            other => Err(ValueError::WrongArity {
                callee: "range".to_string(),
                expected: "1 to 3".to_string(),
                got: other.len(),
            }),
        }
    }

    /// Element count, computed arithmetically. Uses i128 intermediates so
    /// extreme i64 bounds cannot overflow the computation.
    pub fn len(&self) -> u128 {
        let (start, stop, step) = (self.start as i128, self.stop as i128, self.step as i128);
        if step > 0 && stop > start {
            ((stop - start - 1) / step + 1) as u128
        } else if step < 0 && stop < start {
            ((start - stop - 1) / -step + 1) as u128
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A validated, finite, restartable integer progression.
///
/// Construction goes through the sandbox's bounded-range guard, which is
/// why the constructor here is crate-visible only for tests and takes the
/// already-checked length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeValue {
    spec: RangeSpec,
    len: usize,
}

impl RangeValue {
    /// Callers must have checked that `spec.len()` fits in `usize`.
    pub fn from_checked(spec: RangeSpec, len: usize) -> Self {
        RangeValue { spec, len }
    }

    pub fn spec(&self) -> RangeSpec {
        self.spec
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Element at a non-negative position.
    pub fn get(&self, index: i64) -> Option<i64> {
        if index < 0 || index as usize >= self.len {
            return None;
        }
        // i128 intermediates: the element itself always lies between start
        // and stop and fits i64, but the step*index product may not.
        let element = self.spec.start as i128 + self.spec.step as i128 * index as i128;
        Some(element as i64)
    }

    /// A fresh iterator over the progression. Calling this again restarts
    /// from the beginning.
    pub fn iter(&self) -> RangeIter {
        RangeIter {
            next: self.spec.start,
            step: self.spec.step,
            remaining: self.len,
        }
    }
}

impl<'a> IntoIterator for &'a RangeValue {
    type Item = i64;
    type IntoIter = RangeIter;

    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

/// Iterator state for one pass over a [`RangeValue`].
#[derive(Debug, Clone)]
pub struct RangeIter {
    next: i64,
    step: i64,
    remaining: usize,
}

impl Iterator for RangeIter {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next;
        self.remaining -= 1;
        // wrapping: the final element may sit at the edge of i64; the step
        // past it is never yielded.
        self.next = self.next.wrapping_add(self.step);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for RangeIter {}
