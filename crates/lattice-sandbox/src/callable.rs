// callable.rs — The callable-safety gate and the unsafe marker.
//
// The gate reads the safety flags a value carries; it does not care whether
// the value is actually invocable (that is the call context's problem). Any
// value can carry flags in principle; values whose representation cannot
// carry them are trivially safe.

use lattice_value::{SafetyFlags, Value};

/// True unless the value carries `unsafe_callable` or `alters_data`.
pub fn is_safe_callable(target: &Value) -> bool {
    !target.safety_flags().forbids_call()
}

/// Mark a callable as never invocable from sandboxed code.
///
/// Functions and bound methods are rebuilt with the flag set (the body is
/// shared, not copied); values that cannot carry flags are returned
/// unchanged, so this composes as an identity function elsewhere.
pub fn mark_unsafe(value: Value) -> Value {
    set_flags(value, |flags| SafetyFlags {
        unsafe_callable: true,
        ..flags
    })
}

/// Declare that invoking a callable would mutate host-owned data. Same
/// effect as [`mark_unsafe`], distinct provenance.
pub fn mark_alters_data(value: Value) -> Value {
    set_flags(value, |flags| SafetyFlags {
        alters_data: true,
        ..flags
    })
}

fn set_flags(value: Value, update: impl FnOnce(SafetyFlags) -> SafetyFlags) -> Value {
    match value {
        Value::Func(f) => Value::Func(std::sync::Arc::new(f.with_flags(update(f.flags())))),
        Value::Method(m) => Value::Method(std::sync::Arc::new(m.with_flags(update(m.flags())))),
        other => other,
    }
}
