// undefined.rs — The "missing value" sentinel.
//
// Failed attribute/item resolution never raises through the evaluator; it
// produces one of these instead. Rendering treats an undefined value as
// absent (falsy, empty when printed), so template expressions can rely on
// missing-with-default semantics rather than aborting.

use crate::value::Value;

/// Why an undefined value was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndefinedCause {
    /// The access was denied by the sandbox policy. Distinguishes a
    /// security denial from an ordinary miss without turning either into
    /// an error.
    Security,
}

/// The sentinel payload: which name was looked up, on what, and why it
/// failed. Created fresh per failed resolution and never mutated.
#[derive(Debug, Clone, Default)]
pub struct Undefined {
    /// The attempted attribute/key name, rendered as text.
    pub name: Option<String>,
    /// The value the lookup was performed on, when known.
    pub object: Option<Value>,
    /// Human-readable explanation, present for security denials.
    pub message: Option<String>,
    /// Recorded cause, when the miss was not an ordinary absence.
    pub cause: Option<UndefinedCause>,
}

impl Undefined {
    /// An ordinary miss: the name simply was not there.
    pub fn not_found(object: &Value, name: impl Into<String>) -> Self {
        Undefined {
            name: Some(name.into()),
            object: Some(object.clone()),
            message: None,
            cause: None,
        }
    }

    /// A policy denial, carrying the message and the security tag.
    pub fn unsafe_attribute(name: impl Into<String>, message: impl Into<String>) -> Self {
        Undefined {
            name: Some(name.into()),
            object: None,
            message: Some(message.into()),
            cause: Some(UndefinedCause::Security),
        }
    }

    pub fn is_security_denial(&self) -> bool {
        self.cause == Some(UndefinedCause::Security)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_object_and_name() {
        let obj = Value::from(vec![Value::from(1)]);
        let und = Undefined::not_found(&obj, "missing");
        assert_eq!(und.name.as_deref(), Some("missing"));
        assert!(und.object.is_some());
        assert!(!und.is_security_denial());
    }

    #[test]
    fn unsafe_attribute_is_security_tagged() {
        let und = Undefined::unsafe_attribute("_secret", "access denied");
        assert!(und.is_security_denial());
        assert_eq!(und.message.as_deref(), Some("access denied"));
    }
}
