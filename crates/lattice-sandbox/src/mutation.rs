// mutation.rs — Classification of in-place mutating container methods.
//
// The immutable policy uses this to keep nominally read-only built-in
// containers read-only: looking up `items` on a mapping is fine, looking up
// `clear` is not. Only the three built-in container categories are covered;
// anything else classifies as non-mutating.

use std::collections::BTreeSet;

use lattice_value::{Value, ValueKind};

/// Sequence methods that mutate the receiver in place.
pub const MODIFYING_SEQ_ATTRIBUTES: &[&str] =
    &["append", "reverse", "insert", "sort", "extend", "remove"];

/// Mapping methods that mutate the receiver in place.
pub const MODIFYING_MAP_ATTRIBUTES: &[&str] = &["clear", "pop", "popitem", "setdefault", "update"];

/// Set methods that mutate the receiver in place.
pub const MODIFYING_SET_ATTRIBUTES: &[&str] = &[
    "add",
    "clear",
    "difference_update",
    "discard",
    "pop",
    "remove",
    "symmetric_difference_update",
    "update",
];

/// Classifier for mutating container methods. Name sets are owned,
/// immutable configuration, injectable for tests.
#[derive(Debug, Clone)]
pub struct MutationMethods {
    sequence: BTreeSet<String>,
    mapping: BTreeSet<String>,
    set: BTreeSet<String>,
}

impl MutationMethods {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_names(
        sequence: impl IntoIterator<Item = String>,
        mapping: impl IntoIterator<Item = String>,
        set: impl IntoIterator<Item = String>,
    ) -> Self {
        MutationMethods {
            sequence: sequence.into_iter().collect(),
            mapping: mapping.into_iter().collect(),
            set: set.into_iter().collect(),
        }
    }

    /// Test whether calling `attr` on `target` would mutate it in place.
    ///
    /// Categories are checked sequence, then mapping, then set. The closed
    /// kind enum makes them mutually exclusive already; the fixed order is
    /// kept so a host object reporting an ambiguous duck-typed category
    /// would still classify deterministically.
    pub fn mutates_container(&self, target: &Value, attr: &str) -> bool {
        match target.kind() {
            ValueKind::Sequence => self.sequence.contains(attr),
            ValueKind::Mapping => self.mapping.contains(attr),
            ValueKind::Set => self.set.contains(attr),
            _ => false,
        }
    }
}

impl Default for MutationMethods {
    fn default() -> Self {
        MutationMethods {
            sequence: MODIFYING_SEQ_ATTRIBUTES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            mapping: MODIFYING_MAP_ATTRIBUTES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            set: MODIFYING_SET_ATTRIBUTES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
