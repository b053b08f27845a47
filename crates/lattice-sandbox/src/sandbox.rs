// sandbox.rs — The facade an environment wires in at construction time.
//
// Bundles a policy, the access broker, and the bounded-range guard behind
// one object. The evaluator routes every attribute/item expression through
// `subscribe`, every invocation through `call`, and binds `range` into its
// globals so template loops stay bounded.

use std::sync::Arc;

use lattice_value::{CallArgs, CallContext, RangeValue, Value};

use crate::broker::AccessBroker;
use crate::error::SandboxError;
use crate::policy::{AccessPolicy, PolicyVariant};
use crate::range_guard::BoundedRange;

/// A fully wired sandbox. Immutable after construction and `Send + Sync`;
/// one instance serves any number of parallel evaluations.
pub struct Sandbox {
    broker: AccessBroker,
    ranges: BoundedRange,
}

impl Sandbox {
    /// A sandbox using one of the built-in policy variants.
    pub fn new(variant: PolicyVariant) -> Self {
        Self::with_policy(variant.into_policy())
    }

    /// A sandbox around a host-customized policy.
    pub fn with_policy(policy: Arc<dyn AccessPolicy>) -> Self {
        Sandbox {
            broker: AccessBroker::new(policy),
            ranges: BoundedRange::new(),
        }
    }

    /// Replace the range ceiling (element count, default 100,000).
    pub fn with_range_ceiling(mut self, ceiling: usize) -> Self {
        self.ranges = BoundedRange::with_ceiling(ceiling);
        self
    }

    /// Resolve `target.key` / `target[key]`; total, never fails.
    pub fn subscribe(&self, target: &Value, key: &Value) -> Value {
        self.broker.subscribe(target, key)
    }

    /// Invoke `target` through `ctx` if the policy allows it.
    pub fn call(
        &self,
        ctx: &dyn CallContext,
        target: &Value,
        args: &CallArgs,
    ) -> Result<Value, SandboxError> {
        self.broker.call(ctx, target, args)
    }

    /// Bounded range construction for the environment's globals.
    pub fn range(&self, args: &[Value]) -> Result<RangeValue, SandboxError> {
        self.ranges.range(args)
    }

    pub fn is_safe_attribute(&self, target: &Value, attr: &str, value: &Value) -> bool {
        self.broker.policy().is_safe_attribute(target, attr, value)
    }

    pub fn is_safe_callable(&self, target: &Value) -> bool {
        self.broker.policy().is_safe_callable(target)
    }
}

impl Default for Sandbox {
    fn default() -> Self {
        Sandbox::new(PolicyVariant::Base)
    }
}
