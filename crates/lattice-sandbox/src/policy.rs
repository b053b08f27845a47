// policy.rs — The access policy and its two built-in variants.
//
// `AccessPolicy` is the one override point host applications customize;
// the classifiers behind it are implementation details. The immutable
// variant narrows the base variant strictly: it delegates to the base
// first and can only add denials, never re-allow one.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use lattice_value::Value;

use crate::callable;
use crate::internal::InternalAttrs;
use crate::mutation::MutationMethods;

/// Why an access was denied. Computed on demand for logging and audit
/// trails; never stored on the hot path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// The name follows the host's private convention (leading underscore).
    PrivateName,
    /// The name is an implementation-level attribute of the target.
    InternalAttribute,
    /// The name is a method that would mutate a built-in container.
    MutatingMethod,
    /// The target was explicitly marked not callable from sandboxed code.
    UnsafeCallable,
    /// The target declares side effects on host-owned data.
    AltersData,
}

/// The decision surface the broker consults.
///
/// Host applications override this (usually just `is_safe_attribute`) to
/// relax or tighten the sandbox; everything else composes around it.
pub trait AccessPolicy: Send + Sync {
    /// May sandboxed code read `attr` (resolving to `value`) on `target`?
    fn is_safe_attribute(&self, target: &Value, attr: &str, value: &Value) -> bool;

    /// May sandboxed code invoke `target`? Defaults to the flag-based gate.
    fn is_safe_callable(&self, target: &Value) -> bool {
        callable::is_safe_callable(target)
    }

    /// The reason `is_safe_attribute` would deny, or `None` when it allows.
    /// Implementations must keep this consistent with the boolean decision.
    fn explain_attribute(&self, target: &Value, attr: &str, value: &Value) -> Option<DenialReason>;

    /// The reason `is_safe_callable` would deny, or `None` when it allows.
    fn explain_callable(&self, target: &Value) -> Option<DenialReason> {
        let flags = target.safety_flags();
        if flags.unsafe_callable {
            Some(DenialReason::UnsafeCallable)
        } else if flags.alters_data {
            Some(DenialReason::AltersData)
        } else {
            None
        }
    }
}

/// The base policy: denies private names (leading underscore) and internal
/// attributes, allows everything else.
#[derive(Debug, Clone, Default)]
pub struct SandboxPolicy {
    internal: InternalAttrs,
}

impl SandboxPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_internal_attrs(internal: InternalAttrs) -> Self {
        SandboxPolicy { internal }
    }
}

impl AccessPolicy for SandboxPolicy {
    fn is_safe_attribute(&self, target: &Value, attr: &str, _value: &Value) -> bool {
        !(attr.starts_with('_') || self.internal.is_internal(target, attr))
    }

    fn explain_attribute(&self, target: &Value, attr: &str, _value: &Value) -> Option<DenialReason> {
        if attr.starts_with('_') {
            Some(DenialReason::PrivateName)
        } else if self.internal.is_internal(target, attr) {
            Some(DenialReason::InternalAttribute)
        } else {
            None
        }
    }
}

/// The stricter policy: everything the base denies, plus methods that
/// would mutate the built-in containers.
#[derive(Debug, Clone, Default)]
pub struct ImmutablePolicy {
    base: SandboxPolicy,
    mutation: MutationMethods,
}

impl ImmutablePolicy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccessPolicy for ImmutablePolicy {
    fn is_safe_attribute(&self, target: &Value, attr: &str, value: &Value) -> bool {
        if !self.base.is_safe_attribute(target, attr, value) {
            return false;
        }
        !self.mutation.mutates_container(target, attr)
    }

    fn explain_attribute(&self, target: &Value, attr: &str, value: &Value) -> Option<DenialReason> {
        self.base
            .explain_attribute(target, attr, value)
            .or_else(|| {
                self.mutation
                    .mutates_container(target, attr)
                    .then_some(DenialReason::MutatingMethod)
            })
    }
}

/// Which built-in policy an environment is constructed with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyVariant {
    /// Private names and internal attributes denied.
    #[default]
    Base,
    /// Base rules plus container-mutating methods denied.
    Immutable,
}

impl PolicyVariant {
    pub fn into_policy(self) -> Arc<dyn AccessPolicy> {
        match self {
            PolicyVariant::Base => Arc::new(SandboxPolicy::new()),
            PolicyVariant::Immutable => Arc::new(ImmutablePolicy::new()),
        }
    }
}
