// kind.rs — Closed runtime-category enum for values.
//
// The sandbox classifies every access by the target's category. Rather than
// probing values reflectively at each check, the category is a closed enum
// computed once per value from its representation. Host objects report their
// own kind through the `Object` trait.

/// The runtime category of a [`Value`](crate::Value).
///
/// Exactly one kind applies to any value; the classifiers in the sandbox
/// crate dispatch on this instead of duck-typing the value itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// A free function value.
    Function,
    /// A method bound to a receiver.
    Method,
    /// A type/class reference.
    Type,
    /// A compiled-code reference.
    Code,
    /// An execution-frame reference.
    Frame,
    /// A stack-trace reference.
    Traceback,
    /// A suspended generator/iterator that holds a frame.
    Generator,
    /// An ordered, indexable container.
    Sequence,
    /// A keyed container.
    Mapping,
    /// An unordered unique-element container.
    Set,
    /// Everything else: scalars, strings, host objects without a more
    /// specific category, undefined sentinels.
    Other,
}

impl ValueKind {
    /// Stable lowercase name, used in denial messages and logs.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Function => "function",
            ValueKind::Method => "method",
            ValueKind::Type => "type",
            ValueKind::Code => "code",
            ValueKind::Frame => "frame",
            ValueKind::Traceback => "traceback",
            ValueKind::Generator => "generator",
            ValueKind::Sequence => "sequence",
            ValueKind::Mapping => "mapping",
            ValueKind::Set => "set",
            ValueKind::Other => "other",
        }
    }
}
