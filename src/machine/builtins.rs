//! The fixed built-in function set
//!
//! Built-ins are bound in the primordial frame as ordinary values and
//! collect their arguments one application at a time; `Conc` with a single
//! argument is a partial application the program can pass around.

use std::io::Write;

use super::value::Value;
use super::RuntimeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Print,
    Conc,
    Stem,
    Stern,
    Order,
    Null,
    Isinteger,
    Isstring,
    Istuple,
    Isdummy,
    Istruthvalue,
    Isfunction,
    ItoS,
}

impl Builtin {
    pub const ALL: [Builtin; 13] = [
        Builtin::Print,
        Builtin::Conc,
        Builtin::Stem,
        Builtin::Stern,
        Builtin::Order,
        Builtin::Null,
        Builtin::Isinteger,
        Builtin::Isstring,
        Builtin::Istuple,
        Builtin::Isdummy,
        Builtin::Istruthvalue,
        Builtin::Isfunction,
        Builtin::ItoS,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Print => "Print",
            Builtin::Conc => "Conc",
            Builtin::Stem => "Stem",
            Builtin::Stern => "Stern",
            Builtin::Order => "Order",
            Builtin::Null => "Null",
            Builtin::Isinteger => "Isinteger",
            Builtin::Isstring => "Isstring",
            Builtin::Istuple => "Istuple",
            Builtin::Isdummy => "Isdummy",
            Builtin::Istruthvalue => "Istruthvalue",
            Builtin::Isfunction => "Isfunction",
            Builtin::ItoS => "ItoS",
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Builtin::Conc => 2,
            _ => 1,
        }
    }
}

fn next_arg(args: &mut Vec<Value>) -> Result<Value, RuntimeError> {
    if args.is_empty() {
        return Err(RuntimeError::StackUnderflow);
    }
    Ok(args.remove(0))
}

/// Apply a saturated built-in. `Print` writes through `out`.
pub fn apply(
    builtin: Builtin,
    mut args: Vec<Value>,
    out: &mut dyn Write,
) -> Result<Value, RuntimeError> {
    match builtin {
        Builtin::Print => {
            let value = next_arg(&mut args)?;
            writeln!(out, "{value}")?;
            Ok(Value::Dummy)
        }
        Builtin::Conc => {
            let first = next_arg(&mut args)?;
            let second = next_arg(&mut args)?;
            match (first, second) {
                (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
                (a, b) => Err(RuntimeError::BuiltinType {
                    builtin: "Conc",
                    expected: "two strings",
                    found: format!("{} and {}", a.kind_name(), b.kind_name()),
                }),
            }
        }
        Builtin::Stem => match next_arg(&mut args)? {
            Value::Str(s) => match s.chars().next() {
                Some(first) => Ok(Value::Str(first.to_string())),
                None => Err(RuntimeError::EmptyString("Stem")),
            },
            other => Err(RuntimeError::BuiltinType {
                builtin: "Stem",
                expected: "a string",
                found: other.kind_name().to_string(),
            }),
        },
        Builtin::Stern => match next_arg(&mut args)? {
            Value::Str(s) => {
                let mut chars = s.chars();
                match chars.next() {
                    Some(_) => Ok(Value::Str(chars.as_str().to_string())),
                    None => Err(RuntimeError::EmptyString("Stern")),
                }
            }
            other => Err(RuntimeError::BuiltinType {
                builtin: "Stern",
                expected: "a string",
                found: other.kind_name().to_string(),
            }),
        },
        Builtin::Order => match next_arg(&mut args)? {
            Value::Tuple(elements) => Ok(Value::Integer(elements.len() as i64)),
            other => Err(RuntimeError::BuiltinType {
                builtin: "Order",
                expected: "a tuple",
                found: other.kind_name().to_string(),
            }),
        },
        Builtin::Null => Ok(Value::Bool(next_arg(&mut args)?.is_nil())),
        Builtin::Isinteger => Ok(Value::Bool(matches!(
            next_arg(&mut args)?,
            Value::Integer(_)
        ))),
        Builtin::Isstring => Ok(Value::Bool(matches!(next_arg(&mut args)?, Value::Str(_)))),
        Builtin::Istuple => Ok(Value::Bool(matches!(next_arg(&mut args)?, Value::Tuple(_)))),
        Builtin::Isdummy => Ok(Value::Bool(matches!(next_arg(&mut args)?, Value::Dummy))),
        Builtin::Istruthvalue => {
            Ok(Value::Bool(matches!(next_arg(&mut args)?, Value::Bool(_))))
        }
        Builtin::Isfunction => Ok(Value::Bool(matches!(
            next_arg(&mut args)?,
            Value::Closure(_) | Value::Builtin(_) | Value::Eta(_)
        ))),
        Builtin::ItoS => match next_arg(&mut args)? {
            Value::Integer(value) => Ok(Value::Str(value.to_string())),
            other => Err(RuntimeError::BuiltinType {
                builtin: "ItoS",
                expected: "an integer",
                found: other.kind_name().to_string(),
            }),
        },
    }
}
