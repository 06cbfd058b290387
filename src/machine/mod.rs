//! The Control-Stack-Environment machine
//!
//! A synchronous loop over three pieces of state: the control stack (what to
//! do next), the value stack (intermediate results) and the frame arena (the
//! environment tree, entered through the current-frame index). Applying a
//! closure allocates a fresh frame, pushes a [`ControlItem::Exit`] marker
//! that restores the caller's frame, and prepends the body delta; everything
//! else is a push, a pop or a primitive.

pub mod builtins;
pub mod control;
pub mod env;
pub mod value;

use std::io::Write;

use crate::ast::{BinOp, UnOp};

pub use builtins::Builtin;
pub use control::{flatten, Binder, CompileError, ControlItem, ControlTable};
pub use value::{BuiltinApp, Closure, Value};

use env::EnvArena;

#[derive(thiserror::Error, Debug)]
pub enum RuntimeError {
    #[error("unbound identifier '{0}'")]
    UnboundIdentifier(String),
    #[error("attempt to apply {0}, which is not a function")]
    NotAFunction(String),
    #[error("tuple parameter expects {expected} components, argument has {found}")]
    BinderArity { expected: usize, found: usize },
    #[error("tuple parameter applied to {0}")]
    BinderNotTuple(String),
    #[error("'()' parameter expects nil, found {0}")]
    EmptyBinderArgument(String),
    #[error("fixed-point operator applied to {0}")]
    FixedPointNonFunction(String),
    #[error("operator '{op}' expects {expected}, found {found}")]
    OperatorType {
        op: &'static str,
        expected: &'static str,
        found: String,
    },
    #[error("'{builtin}' expects {expected}, found {found}")]
    BuiltinType {
        builtin: &'static str,
        expected: &'static str,
        found: String,
    },
    #[error("'{0}' applied to an empty string")]
    EmptyString(&'static str),
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow in '{0}'")]
    Overflow(&'static str),
    #[error("negative exponent")]
    NegativeExponent,
    #[error("tuple index {index} out of range for a tuple of {arity} components")]
    TupleIndex { index: i64, arity: usize },
    #[error("tuple selection expects an integer index, found {0}")]
    TupleIndexType(String),
    #[error("conditional guard is {0}, not a truthvalue")]
    GuardNotTruthValue(String),
    #[error("value stack underflow")]
    StackUnderflow,
    #[error("control exhausted with {0} values on the stack")]
    UnbalancedStack(usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The evaluator. `out` receives everything `Print` emits.
pub struct Machine<'a> {
    table: ControlTable,
    control: Vec<ControlItem>,
    stack: Vec<Value>,
    envs: EnvArena,
    /// Index of the current frame.
    env: usize,
    out: &'a mut dyn Write,
}

impl<'a> Machine<'a> {
    pub fn new(table: ControlTable, out: &'a mut dyn Write) -> Self {
        let mut machine = Self {
            table,
            control: Vec::new(),
            stack: Vec::new(),
            envs: EnvArena::new(),
            env: 0,
            out,
        };
        machine.push_body(0);
        machine
    }

    /// Run to completion and return the program's value.
    pub fn run(mut self) -> Result<Value, RuntimeError> {
        while let Some(item) = self.control.pop() {
            self.step(item)?;
        }
        if self.stack.len() != 1 {
            return Err(RuntimeError::UnbalancedStack(self.stack.len()));
        }
        self.stack.pop().ok_or(RuntimeError::StackUnderflow)
    }

    /// Prepend a delta to the control stack.
    fn push_body(&mut self, index: usize) {
        let items = self.table.deltas[index].items.clone();
        self.control.extend(items.into_iter().rev());
    }

    fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.stack.pop().ok_or(RuntimeError::StackUnderflow)
    }

    fn step(&mut self, item: ControlItem) -> Result<(), RuntimeError> {
        match item {
            ControlItem::Name(name) => {
                let value = self
                    .envs
                    .lookup(self.env, &name)
                    .cloned()
                    .ok_or(RuntimeError::UnboundIdentifier(name))?;
                self.stack.push(value);
            }
            ControlItem::Integer(value) => self.stack.push(Value::Integer(value)),
            ControlItem::Str(value) => self.stack.push(Value::Str(value)),
            ControlItem::Bool(value) => self.stack.push(Value::Bool(value)),
            ControlItem::Nil => self.stack.push(Value::nil()),
            ControlItem::Dummy => self.stack.push(Value::Dummy),
            ControlItem::YStar => self.stack.push(Value::YStar),
            ControlItem::Lambda { binder, body } => {
                self.stack.push(Value::Closure(Closure {
                    env: self.env,
                    binder,
                    body,
                }));
            }
            ControlItem::Gamma => self.apply()?,
            ControlItem::Beta {
                then_body,
                else_body,
            } => match self.pop()? {
                Value::Bool(true) => self.push_body(then_body),
                Value::Bool(false) => self.push_body(else_body),
                other => {
                    return Err(RuntimeError::GuardNotTruthValue(
                        other.kind_name().to_string(),
                    ))
                }
            },
            ControlItem::Tau(arity) => {
                if self.stack.len() < arity {
                    return Err(RuntimeError::StackUnderflow);
                }
                let elements = self.stack.split_off(self.stack.len() - arity);
                self.stack.push(Value::Tuple(elements));
            }
            ControlItem::BinOp(op) => {
                let right = self.pop()?;
                let left = self.pop()?;
                self.stack.push(apply_binary(op, left, right)?);
            }
            ControlItem::UnOp(op) => {
                let operand = self.pop()?;
                self.stack.push(apply_unary(op, operand)?);
            }
            ControlItem::Exit(frame) => self.env = frame,
        }
        Ok(())
    }

    /// Execute a gamma marker: pop the operator, pop the operand, dispatch
    /// on the operator's tag.
    fn apply(&mut self) -> Result<(), RuntimeError> {
        let rator = self.pop()?;
        let rand = self.pop()?;
        match rator {
            Value::Closure(closure) => self.enter(closure, rand),
            Value::Builtin(mut app) => {
                app.args.push(rand);
                if app.args.len() == app.builtin.arity() {
                    let result = builtins::apply(app.builtin, app.args, self.out)?;
                    self.stack.push(result);
                } else {
                    self.stack.push(Value::Builtin(app));
                }
                Ok(())
            }
            Value::YStar => match rand {
                Value::Closure(closure) => {
                    self.stack.push(Value::Eta(closure));
                    Ok(())
                }
                other => Err(RuntimeError::FixedPointNonFunction(
                    other.kind_name().to_string(),
                )),
            },
            Value::Eta(closure) => {
                // One Kleene unfolding: apply the underlying lambda to the
                // eta closure itself, then apply the result to the argument.
                self.stack.push(rand);
                self.stack.push(Value::Eta(closure.clone()));
                self.stack.push(Value::Closure(closure));
                self.control.push(ControlItem::Gamma);
                self.control.push(ControlItem::Gamma);
                Ok(())
            }
            Value::Tuple(elements) => match rand {
                Value::Integer(index) => {
                    if index < 1 || index as usize > elements.len() {
                        return Err(RuntimeError::TupleIndex {
                            index,
                            arity: elements.len(),
                        });
                    }
                    self.stack.push(elements[(index - 1) as usize].clone());
                    Ok(())
                }
                other => Err(RuntimeError::TupleIndexType(other.kind_name().to_string())),
            },
            other => Err(RuntimeError::NotAFunction(other.kind_name().to_string())),
        }
    }

    /// Apply a closure: allocate a frame under the captured one, bind the
    /// parameter, and continue in the body until its `Exit` marker restores
    /// the caller's frame.
    fn enter(&mut self, closure: Closure, rand: Value) -> Result<(), RuntimeError> {
        let frame = self.envs.push(closure.env);
        match closure.binder {
            Binder::Single(name) => self.envs.bind(frame, name, rand),
            Binder::Empty => {
                if !rand.is_nil() {
                    return Err(RuntimeError::EmptyBinderArgument(
                        rand.kind_name().to_string(),
                    ));
                }
            }
            Binder::Tuple(names) => match rand {
                Value::Tuple(elements) if elements.len() == names.len() => {
                    for (name, element) in names.into_iter().zip(elements) {
                        self.envs.bind(frame, name, element);
                    }
                }
                Value::Tuple(elements) => {
                    return Err(RuntimeError::BinderArity {
                        expected: names.len(),
                        found: elements.len(),
                    })
                }
                other => {
                    return Err(RuntimeError::BinderNotTuple(other.kind_name().to_string()))
                }
            },
        }
        self.control.push(ControlItem::Exit(self.env));
        self.push_body(closure.body);
        self.env = frame;
        Ok(())
    }
}

fn integer_operands(
    op: &'static str,
    left: Value,
    right: Value,
) -> Result<(i64, i64), RuntimeError> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Ok((a, b)),
        (a, b) => Err(RuntimeError::OperatorType {
            op,
            expected: "two integers",
            found: format!("{} and {}", a.kind_name(), b.kind_name()),
        }),
    }
}

fn truthvalue_operands(
    op: &'static str,
    left: Value,
    right: Value,
) -> Result<(bool, bool), RuntimeError> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Ok((a, b)),
        (a, b) => Err(RuntimeError::OperatorType {
            op,
            expected: "two truthvalues",
            found: format!("{} and {}", a.kind_name(), b.kind_name()),
        }),
    }
}

/// Equality is defined per type and fails closed on mismatched operands.
fn values_equal(op: &'static str, left: Value, right: Value) -> Result<bool, RuntimeError> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Ok(a == b),
        (Value::Str(a), Value::Str(b)) => Ok(a == b),
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        (a, b) => Err(RuntimeError::OperatorType {
            op,
            expected: "operands of matching type",
            found: format!("{} and {}", a.kind_name(), b.kind_name()),
        }),
    }
}

fn apply_binary(op: BinOp, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match op {
        BinOp::Plus => {
            let (a, b) = integer_operands("+", left, right)?;
            a.checked_add(b)
                .map(Value::Integer)
                .ok_or(RuntimeError::Overflow("+"))
        }
        BinOp::Minus => {
            let (a, b) = integer_operands("-", left, right)?;
            a.checked_sub(b)
                .map(Value::Integer)
                .ok_or(RuntimeError::Overflow("-"))
        }
        BinOp::Times => {
            let (a, b) = integer_operands("*", left, right)?;
            a.checked_mul(b)
                .map(Value::Integer)
                .ok_or(RuntimeError::Overflow("*"))
        }
        BinOp::Divide => {
            let (a, b) = integer_operands("/", left, right)?;
            if b == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            // Truncates toward zero.
            a.checked_div(b)
                .map(Value::Integer)
                .ok_or(RuntimeError::Overflow("/"))
        }
        BinOp::Power => {
            let (a, b) = integer_operands("**", left, right)?;
            if b < 0 {
                return Err(RuntimeError::NegativeExponent);
            }
            let exponent = u32::try_from(b).map_err(|_| RuntimeError::Overflow("**"))?;
            a.checked_pow(exponent)
                .map(Value::Integer)
                .ok_or(RuntimeError::Overflow("**"))
        }
        BinOp::Gr => {
            let (a, b) = integer_operands("gr", left, right)?;
            Ok(Value::Bool(a > b))
        }
        BinOp::Ge => {
            let (a, b) = integer_operands("ge", left, right)?;
            Ok(Value::Bool(a >= b))
        }
        BinOp::Ls => {
            let (a, b) = integer_operands("ls", left, right)?;
            Ok(Value::Bool(a < b))
        }
        BinOp::Le => {
            let (a, b) = integer_operands("le", left, right)?;
            Ok(Value::Bool(a <= b))
        }
        BinOp::Eq => values_equal("eq", left, right).map(Value::Bool),
        BinOp::Ne => values_equal("ne", left, right).map(|equal| Value::Bool(!equal)),
        BinOp::Amp => {
            let (a, b) = truthvalue_operands("&", left, right)?;
            Ok(Value::Bool(a && b))
        }
        BinOp::Or => {
            let (a, b) = truthvalue_operands("or", left, right)?;
            Ok(Value::Bool(a || b))
        }
        BinOp::Aug => match left {
            Value::Tuple(mut elements) => {
                elements.push(right);
                Ok(Value::Tuple(elements))
            }
            other => Err(RuntimeError::OperatorType {
                op: "aug",
                expected: "a tuple on the left",
                found: other.kind_name().to_string(),
            }),
        },
    }
}

fn apply_unary(op: UnOp, operand: Value) -> Result<Value, RuntimeError> {
    match op {
        UnOp::Neg => match operand {
            Value::Integer(value) => value
                .checked_neg()
                .map(Value::Integer)
                .ok_or(RuntimeError::Overflow("neg")),
            other => Err(RuntimeError::OperatorType {
                op: "neg",
                expected: "an integer",
                found: other.kind_name().to_string(),
            }),
        },
        UnOp::Not => match operand {
            Value::Bool(value) => Ok(Value::Bool(!value)),
            other => Err(RuntimeError::OperatorType {
                op: "not",
                expected: "a truthvalue",
                found: other.kind_name().to_string(),
            }),
        },
    }
}
