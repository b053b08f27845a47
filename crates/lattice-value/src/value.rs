// value.rs — The dynamic value the evaluator hands around.
//
// Values are cheap to clone: containers and callables sit behind `Arc`.
// Attribute and item lookup return explicit result variants instead of
// raising — "found", "not found", and "this value does not support that
// operation" are distinct outcomes, so the access broker can decide
// deterministically whether to fall through to item access or produce the
// undefined sentinel.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::error::ValueError;
use crate::func::{BoundMethod, CallArgs, NativeFunc, SafetyFlags};
use crate::kind::ValueKind;
use crate::range::RangeValue;
use crate::undefined::Undefined;

/// Outcome of an attribute lookup.
#[derive(Debug, Clone)]
pub enum AttrLookup {
    Found(Value),
    NotFound,
}

/// Outcome of an item/subscript lookup. `Unsupported` means the value has
/// no item namespace at all (subscripting a number), as opposed to a key
/// that is simply absent.
#[derive(Debug, Clone)]
pub enum ItemLookup {
    Found(Value),
    NotFound,
    Unsupported,
}

/// A host-application object exposed to the evaluator.
///
/// Hosts implement this for their own types. Every hook has a conservative
/// default: no attributes, no items, not callable, safe flags. `kind`
/// controls how the sandbox classifies attribute names on the object.
pub trait Object: fmt::Debug + Send + Sync {
    /// Display name used in messages ("access to attribute 'x' of user
    /// object is unsafe").
    fn type_name(&self) -> &str;

    fn kind(&self) -> ValueKind {
        ValueKind::Other
    }

    fn get_attr(&self, _name: &str) -> AttrLookup {
        AttrLookup::NotFound
    }

    fn get_item(&self, _key: &Value) -> ItemLookup {
        ItemLookup::Unsupported
    }

    /// Safety flags for invocation; non-callable objects keep the default.
    fn safety_flags(&self) -> SafetyFlags {
        SafetyFlags::default()
    }

    fn call(&self, _args: &CallArgs) -> Result<Value, ValueError> {
        Err(ValueError::NotCallable {
            type_name: self.type_name().to_string(),
        })
    }
}

/// Which introspection artifact a [`Value::Reflect`] mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectKind {
    Type,
    Code,
    Frame,
    Traceback,
    Generator,
}

/// A mirror of a host introspection artifact (a type reference, compiled
/// code, an execution frame, a stack trace, a suspended generator). The
/// sandbox treats attribute access on these as internal; the mirror exists
/// so such values can flow through expressions and be classified, not so
/// their internals can be reached.
#[derive(Debug, Clone)]
pub struct Reflected {
    pub kind: ReflectKind,
    pub name: String,
}

impl Reflected {
    pub fn new(kind: ReflectKind, name: impl Into<String>) -> Self {
        Reflected {
            kind,
            name: name.into(),
        }
    }
}

/// A dynamic value.
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    Seq(Arc<Vec<Value>>),
    Map(Arc<BTreeMap<String, Value>>),
    Set(Arc<BTreeSet<String>>),
    Func(Arc<NativeFunc>),
    Method(Arc<BoundMethod>),
    Range(RangeValue),
    Reflect(Arc<Reflected>),
    Object(Arc<dyn Object>),
    Undefined(Arc<Undefined>),
}

// Method surfaces of the built-in containers and strings. Mutating names
// resolve like any other attribute; whether touching them is allowed is the
// policy's decision, not the value model's.
const MAP_METHODS: &[&str] = &[
    "get", "keys", "values", "items", "clear", "pop", "popitem", "setdefault", "update",
];
const SEQ_METHODS: &[&str] = &[
    "index", "count", "append", "reverse", "insert", "sort", "extend", "remove",
];
const SET_METHODS: &[&str] = &[
    "union",
    "intersection",
    "issubset",
    "add",
    "clear",
    "difference_update",
    "discard",
    "pop",
    "remove",
    "symmetric_difference_update",
    "update",
];
const STR_METHODS: &[&str] = &["upper", "lower", "strip", "split"];

impl Value {
    /// The runtime category the sandbox classifies this value under.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Func(_) => ValueKind::Function,
            Value::Method(_) => ValueKind::Method,
            Value::Seq(_) | Value::Range(_) => ValueKind::Sequence,
            Value::Map(_) => ValueKind::Mapping,
            Value::Set(_) => ValueKind::Set,
            Value::Reflect(r) => match r.kind {
                ReflectKind::Type => ValueKind::Type,
                ReflectKind::Code => ValueKind::Code,
                ReflectKind::Frame => ValueKind::Frame,
                ReflectKind::Traceback => ValueKind::Traceback,
                ReflectKind::Generator => ValueKind::Generator,
            },
            Value::Object(o) => o.kind(),
            Value::None
            | Value::Bool(_)
            | Value::Int(_)
            | Value::Float(_)
            | Value::Str(_)
            | Value::Undefined(_) => ValueKind::Other,
        }
    }

    /// Display name of the value's type, used in denial messages. For
    /// categorized values this is the kind name; scalars, ranges, host
    /// objects, and the undefined sentinel name themselves.
    pub fn type_name(&self) -> &str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Range(_) => "range",
            Value::Object(o) => o.type_name(),
            Value::Undefined(_) => "undefined",
            Value::Seq(_)
            | Value::Map(_)
            | Value::Set(_)
            | Value::Func(_)
            | Value::Method(_)
            | Value::Reflect(_) => self.kind().name(),
        }
    }

    /// Truthiness: undefined and none are falsy, containers are falsy when
    /// empty, everything else follows the usual conventions.
    pub fn is_true(&self) -> bool {
        match self {
            Value::None | Value::Undefined(_) => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Seq(items) => !items.is_empty(),
            Value::Map(m) => !m.is_empty(),
            Value::Set(s) => !s.is_empty(),
            Value::Range(r) => !r.is_empty(),
            Value::Func(_) | Value::Method(_) | Value::Reflect(_) | Value::Object(_) => true,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Safety flags carried by this value, if its representation can carry
    /// any. Values that cannot carry flags are trivially safe to call (the
    /// question of whether they are callable at all is separate).
    pub fn safety_flags(&self) -> SafetyFlags {
        match self {
            Value::Func(f) => f.flags(),
            Value::Method(m) => m.flags(),
            Value::Object(o) => o.safety_flags(),
            _ => SafetyFlags::default(),
        }
    }

    /// Attribute lookup. Built-in containers and strings expose their
    /// method surface as bound methods; host objects delegate to their
    /// `Object::get_attr` hook. No policy is applied here — this is the raw
    /// namespace the broker filters.
    pub fn get_attr(&self, name: &str) -> AttrLookup {
        match self {
            Value::Map(_) if MAP_METHODS.contains(&name) => self.bound_method(name),
            Value::Seq(_) if SEQ_METHODS.contains(&name) => self.bound_method(name),
            Value::Set(_) if SET_METHODS.contains(&name) => self.bound_method(name),
            Value::Str(_) if STR_METHODS.contains(&name) => self.bound_method(name),
            Value::Func(f) if name == "name" => AttrLookup::Found(Value::from(f.name())),
            Value::Method(m) if name == "name" => AttrLookup::Found(Value::from(m.name())),
            Value::Reflect(r) if r.kind == ReflectKind::Type && name == "name" => {
                AttrLookup::Found(Value::from(r.name.as_str()))
            }
            Value::Object(o) => o.get_attr(name),
            _ => AttrLookup::NotFound,
        }
    }

    fn bound_method(&self, name: &str) -> AttrLookup {
        AttrLookup::Found(Value::Method(Arc::new(BoundMethod::new(
            self.clone(),
            name,
        ))))
    }

    /// Item/subscript lookup. Sequences and ranges index by integer
    /// (negative indexes count from the end), mappings by string key.
    pub fn get_item(&self, key: &Value) -> ItemLookup {
        match self {
            Value::Seq(items) => match key.as_int() {
                Some(index) => match resolve_index(index, items.len()) {
                    Some(i) => ItemLookup::Found(items[i].clone()),
                    None => ItemLookup::NotFound,
                },
                None => ItemLookup::Unsupported,
            },
            Value::Str(s) => match key.as_int() {
                Some(index) => {
                    let chars: Vec<char> = s.chars().collect();
                    match resolve_index(index, chars.len()) {
                        Some(i) => ItemLookup::Found(Value::from(chars[i].to_string().as_str())),
                        None => ItemLookup::NotFound,
                    }
                }
                None => ItemLookup::Unsupported,
            },
            Value::Map(map) => match key.as_str() {
                Some(name) => match map.get(name) {
                    Some(value) => ItemLookup::Found(value.clone()),
                    None => ItemLookup::NotFound,
                },
                None => ItemLookup::NotFound,
            },
            Value::Range(range) => match key.as_int() {
                Some(index) => match range.get(index) {
                    Some(element) => ItemLookup::Found(Value::from(element)),
                    None => ItemLookup::NotFound,
                },
                None => ItemLookup::Unsupported,
            },
            Value::Object(o) => o.get_item(key),
            Value::Undefined(_) => ItemLookup::NotFound,
            _ => ItemLookup::Unsupported,
        }
    }

    /// A fresh undefined sentinel for an ordinary miss.
    pub fn undefined_for(object: &Value, name: impl Into<String>) -> Value {
        Value::Undefined(Arc::new(Undefined::not_found(object, name)))
    }
}

/// Python-style index resolution: negative counts from the end.
fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let resolved = if index < 0 { index + len } else { index };
    if resolved >= 0 && resolved < len {
        Some(resolved as usize)
    } else {
        None
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                *a as f64 == *b
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Range(a), Value::Range(b)) => a == b,
            // Identity comparison for callables and host objects.
            (Value::Func(a), Value::Func(b)) => Arc::ptr_eq(a, b),
            (Value::Method(a), Value::Method(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Reflect(a), Value::Reflect(b)) => Arc::ptr_eq(a, b),
            // All undefined values compare equal, like None does.
            (Value::Undefined(_), Value::Undefined(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "none"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::Seq(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Set(set) => {
                write!(f, "{{")?;
                for (i, item) in set.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "}}")
            }
            Value::Func(func) => write!(f, "<function {}>", func.name()),
            Value::Method(m) => {
                write!(f, "<method {} of {}>", m.name(), m.receiver().type_name())
            }
            Value::Range(r) => {
                let spec = r.spec();
                write!(f, "range({}, {}, {})", spec.start, spec.stop, spec.step)
            }
            Value::Reflect(r) => write!(f, "<{} {}>", self.type_name(), r.name),
            Value::Object(o) => write!(f, "<{}>", o.type_name()),
            // Undefined renders as nothing, so a missing value disappears
            // from output instead of aborting it.
            Value::Undefined(_) => Ok(()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Value {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Value {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Str(Arc::from(s.as_str()))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Value {
        Value::Seq(Arc::new(items))
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Value {
        Value::Map(Arc::new(map))
    }
}

impl From<BTreeSet<String>> for Value {
    fn from(set: BTreeSet<String>) -> Value {
        Value::Set(Arc::new(set))
    }
}

impl From<NativeFunc> for Value {
    fn from(func: NativeFunc) -> Value {
        Value::Func(Arc::new(func))
    }
}

impl From<Undefined> for Value {
    fn from(und: Undefined) -> Value {
        Value::Undefined(Arc::new(und))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> Value {
        let mut m = BTreeMap::new();
        m.insert("title".to_string(), Value::from("hello"));
        Value::from(m)
    }

    #[test]
    fn kinds_match_representation() {
        assert_eq!(sample_map().kind(), ValueKind::Mapping);
        assert_eq!(Value::from(Vec::<Value>::new()).kind(), ValueKind::Sequence);
        assert_eq!(
            Value::from(BTreeSet::<String>::new()).kind(),
            ValueKind::Set
        );
        assert_eq!(
            Value::from(NativeFunc::new("f", |_| Ok(Value::None))).kind(),
            ValueKind::Function
        );
        assert_eq!(Value::from(1).kind(), ValueKind::Other);
        let ty = Value::Reflect(Arc::new(Reflected::new(ReflectKind::Type, "User")));
        assert_eq!(ty.kind(), ValueKind::Type);
    }

    #[test]
    fn type_name_tracks_kind_for_categorized_values() {
        for (value, expected) in [
            (Value::from(vec![Value::from(1)]), "sequence"),
            (sample_map(), "mapping"),
            (Value::from(BTreeSet::<String>::new()), "set"),
            (
                Value::from(NativeFunc::new("f", |_| Ok(Value::None))),
                "function",
            ),
            (
                Value::Reflect(Arc::new(Reflected::new(ReflectKind::Frame, "top"))),
                "frame",
            ),
        ] {
            assert_eq!(value.type_name(), expected);
            assert_eq!(value.type_name(), value.kind().name());
        }
        // Ranges classify as sequences but name themselves.
        assert_eq!(
            Value::Range(RangeValue::from_checked(
                crate::range::RangeSpec::new(0, 3, 1).unwrap(),
                3
            ))
            .type_name(),
            "range"
        );
    }

    #[test]
    fn map_attr_is_bound_method_item_is_entry() {
        let m = sample_map();
        assert!(matches!(m.get_attr("keys"), AttrLookup::Found(_)));
        assert!(matches!(m.get_attr("title"), AttrLookup::NotFound));
        assert!(matches!(
            m.get_item(&Value::from("title")),
            ItemLookup::Found(Value::Str(_))
        ));
        assert!(matches!(
            m.get_item(&Value::from("missing")),
            ItemLookup::NotFound
        ));
    }

    #[test]
    fn seq_indexing_with_negative_index() {
        let seq = Value::from(vec![Value::from(1), Value::from(2), Value::from(3)]);
        assert!(matches!(
            seq.get_item(&Value::from(-1)),
            ItemLookup::Found(Value::Int(3))
        ));
        assert!(matches!(
            seq.get_item(&Value::from(3)),
            ItemLookup::NotFound
        ));
        assert!(matches!(
            seq.get_item(&Value::from("x")),
            ItemLookup::Unsupported
        ));
    }

    #[test]
    fn scalars_have_no_item_namespace() {
        assert!(matches!(
            Value::from(1).get_item(&Value::from(0)),
            ItemLookup::Unsupported
        ));
    }

    #[test]
    fn undefined_is_falsy_and_renders_empty() {
        let und = Value::undefined_for(&sample_map(), "missing");
        assert!(!und.is_true());
        assert!(und.is_undefined());
        assert_eq!(und.to_string(), "");
    }

    #[test]
    fn truthiness() {
        assert!(!Value::None.is_true());
        assert!(!Value::from("").is_true());
        assert!(Value::from("x").is_true());
        assert!(!Value::from(0).is_true());
        assert!(Value::from(vec![Value::None]).is_true());
        assert!(!Value::Seq(Arc::new(vec![])).is_true());
    }

    #[test]
    fn equality_is_structural_for_data_identity_for_objects() {
        assert_eq!(Value::from(1), Value::from(1));
        assert_eq!(Value::from(1), Value::from(1.0));
        let f = Value::from(NativeFunc::new("f", |_| Ok(Value::None)));
        let g = Value::from(NativeFunc::new("f", |_| Ok(Value::None)));
        assert_eq!(f, f.clone());
        assert_ne!(f, g);
    }
}
