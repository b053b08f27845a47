// func.rs — Callable values: native functions, bound methods, and the
// invocation seam.
//
// Safety flags ride on the callable value itself. They are set when the
// value is constructed (or by `lattice_sandbox::mark_unsafe`, which rebuilds
// the wrapper with new flags while sharing the body) and never change
// afterwards, so the callable guard can read them without synchronization.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ValueError;
use crate::value::Value;

/// Safety metadata attached to a callable at definition time.
///
/// Either flag set means the sandbox refuses to invoke the value. The two
/// flags have the same effect but distinct provenance: `unsafe_callable` is
/// set by the sandbox's own marker, `alters_data` is declared by the host
/// for callables with side effects on their owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SafetyFlags {
    /// Never invocable from sandboxed code.
    pub unsafe_callable: bool,
    /// Invoking this would mutate host-owned data.
    pub alters_data: bool,
}

impl SafetyFlags {
    /// True if either flag forbids invocation.
    pub fn forbids_call(self) -> bool {
        self.unsafe_callable || self.alters_data
    }
}

/// Positional and named arguments for an invocation.
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    pub positional: Vec<Value>,
    pub named: BTreeMap<String, Value>,
}

impl CallArgs {
    /// Positional-only arguments, the common case.
    pub fn positional(args: impl IntoIterator<Item = Value>) -> Self {
        CallArgs {
            positional: args.into_iter().collect(),
            named: BTreeMap::new(),
        }
    }
}

type CallBody = dyn Fn(&CallArgs) -> Result<Value, ValueError> + Send + Sync;

/// A host-provided function exposed to sandboxed expressions.
pub struct NativeFunc {
    name: String,
    flags: SafetyFlags,
    body: Arc<CallBody>,
}

impl NativeFunc {
    pub fn new(
        name: impl Into<String>,
        body: impl Fn(&CallArgs) -> Result<Value, ValueError> + Send + Sync + 'static,
    ) -> Self {
        NativeFunc {
            name: name.into(),
            flags: SafetyFlags::default(),
            body: Arc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> SafetyFlags {
        self.flags
    }

    /// A copy of this function carrying different safety flags. The body is
    /// shared, so marking a function unsafe does not duplicate it.
    pub fn with_flags(&self, flags: SafetyFlags) -> Self {
        NativeFunc {
            name: self.name.clone(),
            flags,
            body: Arc::clone(&self.body),
        }
    }

    pub fn invoke(&self, args: &CallArgs) -> Result<Value, ValueError> {
        (self.body)(args)
    }
}

impl fmt::Debug for NativeFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunc")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

/// A method bound to a receiver value, produced by attribute lookup on
/// built-in containers and strings (e.g. `m.keys`, `s.upper`).
#[derive(Debug, Clone)]
pub struct BoundMethod {
    recv: Value,
    name: String,
    flags: SafetyFlags,
}

impl BoundMethod {
    pub(crate) fn new(recv: Value, name: impl Into<String>) -> Self {
        BoundMethod {
            recv,
            name: name.into(),
            flags: SafetyFlags::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn receiver(&self) -> &Value {
        &self.recv
    }

    pub fn flags(&self) -> SafetyFlags {
        self.flags
    }

    pub fn with_flags(&self, flags: SafetyFlags) -> Self {
        BoundMethod {
            recv: self.recv.clone(),
            name: self.name.clone(),
            flags,
        }
    }

    /// Dispatch the method against its receiver. Read-only container and
    /// string methods are implemented here; mutating names resolve during
    /// attribute lookup but always fail at invocation time because
    /// containers are shared immutably.
    pub fn invoke(&self, args: &CallArgs) -> Result<Value, ValueError> {
        match &self.recv {
            Value::Map(map) => self.invoke_on_map(map, args),
            Value::Seq(items) => self.invoke_on_seq(items, args),
            Value::Set(set) => self.invoke_on_set(set, args),
            Value::Str(s) => self.invoke_on_str(s, args),
            other => Err(ValueError::UnknownMethod {
                method: self.name.clone(),
                type_name: other.type_name().to_string(),
            }),
        }
    }

    fn invoke_on_map(
        &self,
        map: &BTreeMap<String, Value>,
        args: &CallArgs,
    ) -> Result<Value, ValueError> {
        match self.name.as_str() {
            "get" => {
                let key = match args.positional.first() {
                    Some(Value::Str(s)) => s.to_string(),
                    Some(other) => {
                        return Err(ValueError::WrongType {
                            expected: "str",
                            got: other.type_name().to_string(),
                        })
                    }
                    None => {
                        return Err(ValueError::WrongArity {
                            callee: "get".to_string(),
                            expected: "1 or 2".to_string(),
                            got: 0,
                        })
                    }
                };
                let default = args.positional.get(1).cloned().unwrap_or(Value::None);
                Ok(map.get(&key).cloned().unwrap_or(default))
            }
            "keys" => Ok(Value::from(
                map.keys().map(|k| Value::from(k.as_str())).collect::<Vec<_>>(),
            )),
            "values" => Ok(Value::from(map.values().cloned().collect::<Vec<_>>())),
            "items" => Ok(Value::from(
                map.iter()
                    .map(|(k, v)| Value::from(vec![Value::from(k.as_str()), v.clone()]))
                    .collect::<Vec<_>>(),
            )),
            "clear" | "pop" | "popitem" | "setdefault" | "update" => {
                Err(self.shared_mutation())
            }
            _ => Err(self.unknown_method()),
        }
    }

    fn invoke_on_seq(&self, items: &[Value], args: &CallArgs) -> Result<Value, ValueError> {
        match self.name.as_str() {
            "index" => {
                let needle = self.single_arg(args)?;
                items
                    .iter()
                    .position(|v| v == needle)
                    .map(|i| Value::from(i as i64))
                    .ok_or_else(|| ValueError::NotInSequence {
                        value: needle.to_string(),
                    })
            }
            "count" => {
                let needle = self.single_arg(args)?;
                Ok(Value::from(
                    items.iter().filter(|v| *v == needle).count() as i64
                ))
            }
            "append" | "reverse" | "insert" | "sort" | "extend" | "remove" => {
                Err(self.shared_mutation())
            }
            _ => Err(self.unknown_method()),
        }
    }

    fn invoke_on_set(
        &self,
        set: &std::collections::BTreeSet<String>,
        args: &CallArgs,
    ) -> Result<Value, ValueError> {
        match self.name.as_str() {
            "union" | "intersection" | "issubset" => {
                let other = match self.single_arg(args)? {
                    Value::Set(other) => other.clone(),
                    other => {
                        return Err(ValueError::WrongType {
                            expected: "set",
                            got: other.type_name().to_string(),
                        })
                    }
                };
                match self.name.as_str() {
                    "union" => Ok(Value::Set(Arc::new(set.union(&other).cloned().collect()))),
                    "intersection" => Ok(Value::Set(Arc::new(
                        set.intersection(&other).cloned().collect(),
                    ))),
                    _ => Ok(Value::from(set.is_subset(&other))),
                }
            }
            "add" | "clear" | "difference_update" | "discard" | "pop" | "remove"
            | "symmetric_difference_update" | "update" => Err(self.shared_mutation()),
            _ => Err(self.unknown_method()),
        }
    }

    fn invoke_on_str(&self, s: &str, args: &CallArgs) -> Result<Value, ValueError> {
        match self.name.as_str() {
            "upper" => Ok(Value::from(s.to_uppercase().as_str())),
            "lower" => Ok(Value::from(s.to_lowercase().as_str())),
            "strip" => Ok(Value::from(s.trim())),
            "split" => {
                let parts: Vec<Value> = match args.positional.first() {
                    Some(Value::Str(sep)) => {
                        s.split(sep.as_ref()).map(Value::from).collect()
                    }
                    Some(other) => {
                        return Err(ValueError::WrongType {
                            expected: "str",
                            got: other.type_name().to_string(),
                        })
                    }
                    None => s.split_whitespace().map(Value::from).collect(),
                };
                Ok(Value::from(parts))
            }
            _ => Err(self.unknown_method()),
        }
    }

    fn single_arg<'a>(&self, args: &'a CallArgs) -> Result<&'a Value, ValueError> {
        match args.positional.as_slice() {
            [arg] => Ok(arg),
            other => Err(ValueError::WrongArity {
                callee: self.name.clone(),
                expected: "1".to_string(),
                got: other.len(),
            }),
        }
    }

    fn shared_mutation(&self) -> ValueError {
        ValueError::SharedMutation {
            method: self.name.clone(),
            type_name: self.recv.type_name().to_string(),
        }
    }

    fn unknown_method(&self) -> ValueError {
        ValueError::UnknownMethod {
            method: self.name.clone(),
            type_name: self.recv.type_name().to_string(),
        }
    }
}

/// The evaluator-owned invocation mechanism. The sandbox's `call` gate does
/// not invoke values itself; after the safety check it hands the target to
/// the context, which owns argument binding and whatever evaluator state a
/// call needs.
pub trait CallContext {
    fn call(&self, target: &Value, args: &CallArgs) -> Result<Value, ValueError>;
}

/// The plain context: dispatches straight to the value with no evaluator
/// state. Suitable for tests and hosts without a surrounding interpreter.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectCall;

impl CallContext for DirectCall {
    fn call(&self, target: &Value, args: &CallArgs) -> Result<Value, ValueError> {
        match target {
            Value::Func(f) => f.invoke(args),
            Value::Method(m) => m.invoke(args),
            Value::Object(o) => o.call(args),
            other => Err(ValueError::NotCallable {
                type_name: other.type_name().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_value() -> Value {
        let mut m = BTreeMap::new();
        m.insert("a".to_string(), Value::from(1));
        m.insert("b".to_string(), Value::from(2));
        Value::Map(Arc::new(m))
    }

    #[test]
    fn flags_default_to_safe() {
        let f = NativeFunc::new("noop", |_| Ok(Value::None));
        assert!(!f.flags().forbids_call());
    }

    #[test]
    fn with_flags_shares_body() {
        let f = NativeFunc::new("answer", |_| Ok(Value::from(42)));
        let marked = f.with_flags(SafetyFlags {
            unsafe_callable: true,
            alters_data: false,
        });
        assert!(marked.flags().forbids_call());
        // Body still works through the marked copy.
        let out = marked.invoke(&CallArgs::default()).unwrap();
        assert_eq!(out, Value::from(42));
    }

    #[test]
    fn map_get_with_default() {
        let m = map_value();
        let method = BoundMethod::new(m, "get");
        let hit = method
            .invoke(&CallArgs::positional([Value::from("a")]))
            .unwrap();
        assert_eq!(hit, Value::from(1));
        let miss = method
            .invoke(&CallArgs::positional([Value::from("z"), Value::from(9)]))
            .unwrap();
        assert_eq!(miss, Value::from(9));
    }

    #[test]
    fn map_keys_sorted() {
        let method = BoundMethod::new(map_value(), "keys");
        let keys = method.invoke(&CallArgs::default()).unwrap();
        assert_eq!(keys, Value::from(vec![Value::from("a"), Value::from("b")]));
    }

    #[test]
    fn mutating_method_fails_on_shared_container() {
        let method = BoundMethod::new(map_value(), "clear");
        let err = method.invoke(&CallArgs::default()).unwrap_err();
        assert!(matches!(err, ValueError::SharedMutation { .. }));
    }

    #[test]
    fn seq_index_and_count() {
        let seq = Value::from(vec![Value::from(5), Value::from(7), Value::from(5)]);
        let index = BoundMethod::new(seq.clone(), "index");
        assert_eq!(
            index
                .invoke(&CallArgs::positional([Value::from(7)]))
                .unwrap(),
            Value::from(1)
        );
        let count = BoundMethod::new(seq, "count");
        assert_eq!(
            count
                .invoke(&CallArgs::positional([Value::from(5)]))
                .unwrap(),
            Value::from(2)
        );
    }

    #[test]
    fn str_methods() {
        let s = Value::from("  Hello World  ");
        let strip = BoundMethod::new(s.clone(), "strip");
        assert_eq!(
            strip.invoke(&CallArgs::default()).unwrap(),
            Value::from("Hello World")
        );
        let upper = BoundMethod::new(Value::from("abc"), "upper");
        assert_eq!(
            upper.invoke(&CallArgs::default()).unwrap(),
            Value::from("ABC")
        );
    }

    #[test]
    fn direct_call_rejects_non_callable() {
        let err = DirectCall
            .call(&Value::from(1), &CallArgs::default())
            .unwrap_err();
        assert!(matches!(err, ValueError::NotCallable { .. }));
    }
}
