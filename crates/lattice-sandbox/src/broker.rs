// broker.rs — The unified access broker.
//
// Every `a.b`, `a[b]`, and `f(...)` expression node resolves through here.
// Attribute/item resolution is total: it always produces a value, falling
// back to the undefined sentinel rather than raising. Invocation is the one
// partial operation — a blocked call surfaces a security violation.

use std::sync::Arc;

use lattice_value::{AttrLookup, CallArgs, CallContext, ItemLookup, Undefined, Value};

use crate::error::SandboxError;
use crate::policy::AccessPolicy;

/// Resolves attribute/item access and guards invocation on behalf of the
/// evaluator. Stateless after construction; safe to share across parallel
/// evaluations.
pub struct AccessBroker {
    policy: Arc<dyn AccessPolicy>,
}

impl AccessBroker {
    pub fn new(policy: Arc<dyn AccessPolicy>) -> Self {
        AccessBroker { policy }
    }

    pub fn policy(&self) -> &dyn AccessPolicy {
        &*self.policy
    }

    /// Resolve `target.key` / `target[key]`. Total: never fails.
    ///
    /// When `key` is a string, attribute lookup runs first; an allowed hit
    /// returns immediately. A denied hit is remembered, then item lookup
    /// gets its turn — the attribute and item namespaces are independent,
    /// so a denied attribute name may still resolve as an item. Only when
    /// both paths miss does the undefined sentinel come back, tagged as a
    /// security denial if the attribute was denied rather than absent.
    pub fn subscribe(&self, target: &Value, key: &Value) -> Value {
        let mut denied = false;
        if let Some(attr) = key.as_str() {
            if let AttrLookup::Found(value) = target.get_attr(attr) {
                if self.policy.is_safe_attribute(target, attr, &value) {
                    return value;
                }
                tracing::debug!(
                    attr,
                    type_name = target.type_name(),
                    reason = ?self.policy.explain_attribute(target, attr, &value),
                    "attribute access denied"
                );
                denied = true;
            }
        }
        match target.get_item(key) {
            ItemLookup::Found(value) => value,
            ItemLookup::NotFound | ItemLookup::Unsupported => {
                if denied {
                    let name = key.to_string();
                    Value::from(Undefined::unsafe_attribute(
                        name.clone(),
                        format!(
                            "access to attribute '{}' of {} object is unsafe",
                            name,
                            target.type_name()
                        ),
                    ))
                } else {
                    Value::undefined_for(target, key.to_string())
                }
            }
        }
    }

    /// Invoke `target` through the evaluator's call context.
    ///
    /// Partial: a target that fails the callable gate is a security
    /// violation, never silently replaced by a sentinel. An allowed call
    /// delegates to `ctx` and forwards its result or failure unchanged.
    pub fn call(
        &self,
        ctx: &dyn CallContext,
        target: &Value,
        args: &CallArgs,
    ) -> Result<Value, SandboxError> {
        if !self.policy.is_safe_callable(target) {
            tracing::warn!(
                callee = %target,
                reason = ?self.policy.explain_callable(target),
                "blocked call to unsafe callable"
            );
            return Err(SandboxError::NotSafelyCallable {
                repr: target.to_string(),
            });
        }
        Ok(ctx.call(target, args)?)
    }
}
