// internal.rs — Classification of internal/implementation attributes.
//
// "Internal" attributes are implementation-level members (closure cells,
// compiled code, frame references) that template authors must never reach,
// even when a host policy override relaxes other rules. The name sets are
// immutable data owned by the classifier so tests and hosts can inject
// their own; the defaults cover the standard introspection surface.

use std::collections::BTreeSet;

use lattice_value::{Value, ValueKind};

/// Function attributes that expose implementation state: the enclosing
/// scope, the compiled code, the per-instance attribute mapping, the
/// default arguments, and the global scope.
pub const UNSAFE_FUNCTION_ATTRIBUTES: &[&str] = &["closure", "code", "dict", "defaults", "globals"];

/// Method attributes that expose the owning class, the underlying function,
/// and the bound instance. Function attributes are unsafe for methods too.
pub const UNSAFE_METHOD_ATTRIBUTES: &[&str] = &["class", "func", "self"];

/// The method-resolution-order accessor on type objects.
pub const TYPE_MRO_ATTRIBUTE: &str = "mro";

/// The internal frame reference on suspended generators.
pub const GENERATOR_FRAME_ATTRIBUTE: &str = "frame";

/// Classifier for internal attributes. Pure and total: every (value, name)
/// pair gets a deterministic answer, with no side effects.
#[derive(Debug, Clone)]
pub struct InternalAttrs {
    function: BTreeSet<String>,
    method: BTreeSet<String>,
    type_accessor: String,
    generator_frame: String,
}

impl InternalAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// A classifier with custom name sets. The method set is in addition
    /// to the function set, matching the default rules.
    pub fn with_names(
        function: impl IntoIterator<Item = String>,
        method: impl IntoIterator<Item = String>,
        type_accessor: impl Into<String>,
        generator_frame: impl Into<String>,
    ) -> Self {
        InternalAttrs {
            function: function.into_iter().collect(),
            method: method.into_iter().collect(),
            type_accessor: type_accessor.into(),
            generator_frame: generator_frame.into(),
        }
    }

    /// Test whether `attr` on `target` is an internal attribute.
    ///
    /// Dispatches on the target's closed runtime category; first matching
    /// rule wins. Uncategorized targets fall back to the double-underscore
    /// convention (the policy layer separately applies the stricter
    /// single-underscore rule).
    pub fn is_internal(&self, target: &Value, attr: &str) -> bool {
        match target.kind() {
            ValueKind::Function => self.function.contains(attr),
            ValueKind::Method => self.function.contains(attr) || self.method.contains(attr),
            ValueKind::Type => attr == self.type_accessor,
            // Every attribute on code, frame, and traceback values is
            // implementation state.
            ValueKind::Code | ValueKind::Frame | ValueKind::Traceback => true,
            ValueKind::Generator => attr == self.generator_frame,
            ValueKind::Sequence | ValueKind::Mapping | ValueKind::Set | ValueKind::Other => {
                attr.starts_with("__")
            }
        }
    }
}

impl Default for InternalAttrs {
    fn default() -> Self {
        InternalAttrs {
            function: UNSAFE_FUNCTION_ATTRIBUTES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            method: UNSAFE_METHOD_ATTRIBUTES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            type_accessor: TYPE_MRO_ATTRIBUTE.to_string(),
            generator_frame: GENERATOR_FRAME_ATTRIBUTE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use lattice_value::{NativeFunc, ReflectKind, Reflected, Value};

    fn function() -> Value {
        Value::from(NativeFunc::new("f", |_| Ok(Value::None)))
    }

    fn reflected(kind: ReflectKind) -> Value {
        Value::Reflect(Arc::new(Reflected::new(kind, "sample")))
    }

    #[test]
    fn function_internal_attributes() {
        let attrs = InternalAttrs::new();
        for name in UNSAFE_FUNCTION_ATTRIBUTES {
            assert!(attrs.is_internal(&function(), name), "{name}");
        }
        assert!(!attrs.is_internal(&function(), "name"));
    }

    #[test]
    fn method_includes_function_attributes() {
        let attrs = InternalAttrs::new();
        let map = Value::from(std::collections::BTreeMap::<String, Value>::new());
        let method = match map.get_attr("keys") {
            lattice_value::AttrLookup::Found(m) => m,
            _ => panic!("expected bound method"),
        };
        assert!(attrs.is_internal(&method, "code"));
        assert!(attrs.is_internal(&method, "self"));
        assert!(!attrs.is_internal(&method, "name"));
    }

    #[test]
    fn type_mro_is_internal() {
        let attrs = InternalAttrs::new();
        let ty = reflected(ReflectKind::Type);
        assert!(attrs.is_internal(&ty, "mro"));
        assert!(!attrs.is_internal(&ty, "name"));
    }

    #[test]
    fn code_frame_traceback_are_fully_internal() {
        let attrs = InternalAttrs::new();
        for kind in [ReflectKind::Code, ReflectKind::Frame, ReflectKind::Traceback] {
            let value = reflected(kind);
            assert!(attrs.is_internal(&value, "anything"));
            assert!(attrs.is_internal(&value, "name"));
        }
    }

    #[test]
    fn generator_frame_is_internal() {
        let attrs = InternalAttrs::new();
        let gen = reflected(ReflectKind::Generator);
        assert!(attrs.is_internal(&gen, "frame"));
        assert!(!attrs.is_internal(&gen, "send"));
    }

    #[test]
    fn fallback_is_double_underscore() {
        let attrs = InternalAttrs::new();
        let value = Value::from("text");
        assert!(attrs.is_internal(&value, "__class__"));
        // A single underscore is private by policy convention but not
        // internal; the policy layer handles it.
        assert!(!attrs.is_internal(&value, "_private"));
        assert!(!attrs.is_internal(&value, "upper"));
    }

    #[test]
    fn injected_names_override_defaults() {
        let attrs = InternalAttrs::with_names(
            vec!["secret".to_string()],
            vec![],
            "lineage",
            "suspended_frame",
        );
        assert!(attrs.is_internal(&function(), "secret"));
        assert!(!attrs.is_internal(&function(), "code"));
    }
}
