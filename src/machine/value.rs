//! Runtime value representation
//!
//! The empty tuple *is* `nil`; there is no separate nil tag. `dummy` is its
//! own value, distinguishable from nil by `Isdummy`/`Null`.

use std::fmt;

use super::builtins::Builtin;
use super::control::Binder;

/// A lambda paired with the frame it was created in.
#[derive(Debug, Clone, PartialEq)]
pub struct Closure {
    /// Index of the captured frame.
    pub env: usize,
    pub binder: Binder,
    /// Index of the body delta.
    pub body: usize,
}

/// A built-in primitive together with the arguments collected so far.
/// Partially applied built-ins are ordinary values (`Isfunction` sees them).
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinApp {
    pub builtin: Builtin,
    pub args: Vec<Value>,
}

impl BuiltinApp {
    pub fn new(builtin: Builtin) -> Self {
        Self {
            builtin,
            args: Vec::new(),
        }
    }
}

/// Runtime values of the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Str(String),
    Bool(bool),
    Tuple(Vec<Value>),
    Dummy,
    Closure(Closure),
    Builtin(BuiltinApp),
    /// The Y-tied closure produced by applying the fixed-point marker.
    Eta(Closure),
    YStar,
}

impl Value {
    pub fn nil() -> Self {
        Value::Tuple(Vec::new())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Tuple(elements) if elements.is_empty())
    }

    /// Short description used in runtime error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "an integer",
            Value::Str(_) => "a string",
            Value::Bool(_) => "a truthvalue",
            Value::Tuple(elements) if elements.is_empty() => "nil",
            Value::Tuple(_) => "a tuple",
            Value::Dummy => "dummy",
            Value::Closure(_) | Value::Builtin(_) | Value::Eta(_) => "a function",
            Value::YStar => "the fixed-point marker",
        }
    }
}

// The pretty form: what Print emits.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{value}"),
            Value::Str(value) => f.write_str(value),
            Value::Bool(true) => f.write_str("true"),
            Value::Bool(false) => f.write_str("false"),
            Value::Tuple(elements) if elements.is_empty() => f.write_str("nil"),
            Value::Tuple(elements) => {
                f.write_str("(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str(")")
            }
            Value::Dummy => f.write_str("dummy"),
            Value::Closure(closure) | Value::Eta(closure) => {
                write!(f, "[lambda closure: {}: {}]", closure.binder, closure.body)
            }
            Value::Builtin(app) if app.args.is_empty() => {
                write!(f, "[builtin function: {}]", app.builtin.name())
            }
            Value::Builtin(app) => {
                write!(f, "[partial builtin function: {}]", app.builtin.name())
            }
            Value::YStar => f.write_str("<Y*>"),
        }
    }
}
