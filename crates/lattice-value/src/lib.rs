//! # lattice-value
//!
//! Dynamic value model for the Lattice expression sandbox.
//!
//! Everything the evaluator touches is a [`Value`]: scalars, strings,
//! containers behind `Arc`, native functions and bound methods carrying
//! [`SafetyFlags`], mirrors of host introspection artifacts, lazy ranges,
//! and the [`Undefined`] sentinel that failed lookups degrade to.
//!
//! ## Key invariants
//!
//! - **Explicit lookup outcomes**: attribute and item access return
//!   [`AttrLookup`]/[`ItemLookup`] variants, never panic or raise — "not
//!   found" and "unsupported operation" are distinct, so the sandbox broker
//!   can choose its fallback deterministically.
//! - **Closed categories**: every value maps to exactly one [`ValueKind`];
//!   the sandbox classifies by kind, never by probing the value.
//! - **Immutable sharing**: containers are `Arc`-shared and never mutated
//!   in place; values are `Send + Sync` and safe to check concurrently.

pub mod error;
pub mod func;
pub mod kind;
pub mod range;
pub mod undefined;
pub mod value;

pub use error::ValueError;
pub use func::{BoundMethod, CallArgs, CallContext, DirectCall, NativeFunc, SafetyFlags};
pub use kind::ValueKind;
pub use range::{RangeIter, RangeSpec, RangeValue};
pub use undefined::{Undefined, UndefinedCause};
pub use value::{AttrLookup, ItemLookup, Object, ReflectKind, Reflected, Value};
