//! # lattice-sandbox
//!
//! Access-control policy for evaluating untrusted template expressions
//! against host-application values.
//!
//! The evaluator routes three kinds of operations through this crate:
//! attribute access and item access via [`AccessBroker::subscribe`], and
//! callable invocation via [`AccessBroker::call`]. The [`AccessPolicy`]
//! trait is the single customization point; the classifiers behind it are
//! implementation details.
//!
//! ## Key invariants
//!
//! - **Lookups are total**: attribute/item denial degrades to an undefined
//!   sentinel (optionally security-tagged) — rendering never aborts on a
//!   missing or forbidden name.
//! - **Blocked calls are loud**: a denied invocation is always a
//!   [`SandboxError::NotSafelyCallable`], never a sentinel, so a
//!   side-effecting call can't appear to have succeeded.
//! - **Strict narrowing**: the immutable policy denies a superset of what
//!   the base policy denies.
//! - **Bounded iteration**: `range` requests over the element ceiling fail
//!   before anything is materialized.

pub mod broker;
pub mod callable;
pub mod error;
pub mod internal;
pub mod mutation;
pub mod policy;
pub mod range_guard;
pub mod sandbox;

pub use broker::AccessBroker;
pub use callable::{is_safe_callable, mark_alters_data, mark_unsafe};
pub use error::SandboxError;
pub use internal::InternalAttrs;
pub use mutation::MutationMethods;
pub use policy::{AccessPolicy, DenialReason, ImmutablePolicy, PolicyVariant, SandboxPolicy};
pub use range_guard::{BoundedRange, MAX_RANGE};
pub use sandbox::Sandbox;
