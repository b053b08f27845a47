// error.rs — Error types for the value model.

use thiserror::Error;

/// Errors produced by value-model operations (argument parsing, method
/// dispatch, delegated invocation). These are the failures a call can hit
/// *after* it has passed the sandbox's safety gates.
#[derive(Debug, Error)]
pub enum ValueError {
    /// A callable received the wrong number of positional arguments.
    #[error("{callee}() takes {expected} arguments, got {got}")]
    WrongArity {
        callee: String,
        expected: String,
        got: usize,
    },

    /// An argument or key had an unexpected runtime type.
    #[error("expected {expected}, got {got}")]
    WrongType { expected: &'static str, got: String },

    /// range() was asked for a zero step, which would never terminate.
    #[error("range() step must not be zero")]
    ZeroStep,

    /// A mutating container method was invoked. Containers in this model
    /// are shared immutably, so in-place mutation is never available even
    /// when the access policy permits looking the method up.
    #[error("cannot call mutating method '{method}' on a shared {type_name} value")]
    SharedMutation { method: String, type_name: String },

    /// The invocation target is not callable at all.
    #[error("value of type {type_name} is not callable")]
    NotCallable { type_name: String },

    /// A bound method name that the receiver type does not implement.
    #[error("{type_name} value has no method '{method}'")]
    UnknownMethod { method: String, type_name: String },

    /// sequence.index() was called with a value not present in the sequence.
    #[error("{value} is not in sequence")]
    NotInSequence { value: String },
}
