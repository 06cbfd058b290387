//! Flattening the standardized tree into control structures
//!
//! Every lambda body and every conditional arm becomes a *delta*: a linear
//! sequence of control items, stored in execution order and addressed by a
//! dense index. Delta 0 is the program body. The machine pushes a delta onto
//! its control stack in reverse, so the first item of a sequence is the
//! first one executed.

use std::fmt;

use crate::ast::{Ast, BinOp, Node, NodeKind, UnOp};

/// The bound-variable specification of a lambda.
#[derive(Debug, Clone, PartialEq)]
pub enum Binder {
    Single(String),
    /// Tuple destructuring: `fn (x, y) . E`.
    Tuple(Vec<String>),
    /// `fn () . E`; the argument must be nil.
    Empty,
}

impl fmt::Display for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binder::Single(name) => f.write_str(name),
            Binder::Tuple(names) => f.write_str(&names.join(", ")),
            Binder::Empty => f.write_str("()"),
        }
    }
}

/// One element of a control sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlItem {
    /// Identifier lookup through the frame chain.
    Name(String),
    Integer(i64),
    Str(String),
    Bool(bool),
    Nil,
    Dummy,
    YStar,
    /// Becomes a closure over the current frame when executed.
    Lambda { binder: Binder, body: usize },
    /// Apply the value on top of the stack to the one beneath it.
    Gamma,
    /// Select one of two deltas by the truth value on top of the stack.
    Beta { then_body: usize, else_body: usize },
    /// Collect the top N stack values into a tuple.
    Tau(usize),
    BinOp(BinOp),
    UnOp(UnOp),
    /// Runtime-only: restore the given frame when a call's body finishes.
    Exit(usize),
}

/// A compiled linear sequence, one per lambda body or conditional arm.
#[derive(Debug, Clone, Default)]
pub struct Delta {
    pub items: Vec<ControlItem>,
}

/// The full flattener output; `deltas[0]` is the program body.
#[derive(Debug, Clone)]
pub struct ControlTable {
    pub deltas: Vec<Delta>,
}

/// Errors for tree shapes the flattener cannot consume. Reachable only by
/// handing it a tree that was never standardized.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("'{0}' cannot appear in a standardized tree")]
    Unstandardized(String),
    #[error("malformed '{0}' node")]
    Malformed(&'static str),
    #[error("'{0}' is not a valid lambda parameter")]
    InvalidBinder(String),
}

/// Compile a standardized tree into its control table.
pub fn flatten(ast: &Ast) -> Result<ControlTable, CompileError> {
    let mut builder = Builder { deltas: Vec::new() };
    builder.build_delta(&ast.root)?;
    Ok(ControlTable {
        deltas: builder.deltas,
    })
}

struct Builder {
    deltas: Vec<Delta>,
}

impl Builder {
    /// Reserve the next delta index and fill it from `node`.
    fn build_delta(&mut self, node: &Node) -> Result<usize, CompileError> {
        let index = self.deltas.len();
        self.deltas.push(Delta::default());
        let mut items = Vec::new();
        self.emit(node, &mut items)?;
        self.deltas[index].items = items;
        Ok(index)
    }

    fn emit(&mut self, node: &Node, out: &mut Vec<ControlItem>) -> Result<(), CompileError> {
        match &node.kind {
            NodeKind::Lambda => match node.children.as_slice() {
                [binder, body] => {
                    let binder = binder_spec(binder)?;
                    let body = self.build_delta(body)?;
                    out.push(ControlItem::Lambda { binder, body });
                    Ok(())
                }
                _ => Err(CompileError::Malformed("lambda")),
            },
            NodeKind::Gamma => match node.children.as_slice() {
                // The operand compiles first so the operator ends up on top
                // of the stack when the gamma marker executes.
                [rator, rand] => {
                    self.emit(rand, out)?;
                    self.emit(rator, out)?;
                    out.push(ControlItem::Gamma);
                    Ok(())
                }
                _ => Err(CompileError::Malformed("gamma")),
            },
            NodeKind::Conditional => match node.children.as_slice() {
                [guard, then_branch, else_branch] => {
                    self.emit(guard, out)?;
                    let then_body = self.build_delta(then_branch)?;
                    let else_body = self.build_delta(else_branch)?;
                    out.push(ControlItem::Beta {
                        then_body,
                        else_body,
                    });
                    Ok(())
                }
                _ => Err(CompileError::Malformed("->")),
            },
            NodeKind::Tau => {
                for element in &node.children {
                    self.emit(element, out)?;
                }
                out.push(ControlItem::Tau(node.children.len()));
                Ok(())
            }
            NodeKind::BinaryOp(op) => match node.children.as_slice() {
                [left, right] => {
                    self.emit(left, out)?;
                    self.emit(right, out)?;
                    out.push(ControlItem::BinOp(*op));
                    Ok(())
                }
                _ => Err(CompileError::Malformed(op.symbol())),
            },
            NodeKind::UnaryOp(op) => match node.children.as_slice() {
                [operand] => {
                    self.emit(operand, out)?;
                    out.push(ControlItem::UnOp(*op));
                    Ok(())
                }
                _ => Err(CompileError::Malformed(op.symbol())),
            },
            NodeKind::Identifier(name) => {
                out.push(ControlItem::Name(name.clone()));
                Ok(())
            }
            NodeKind::Integer(value) => {
                out.push(ControlItem::Integer(*value));
                Ok(())
            }
            NodeKind::Str(value) => {
                out.push(ControlItem::Str(value.clone()));
                Ok(())
            }
            NodeKind::True => {
                out.push(ControlItem::Bool(true));
                Ok(())
            }
            NodeKind::False => {
                out.push(ControlItem::Bool(false));
                Ok(())
            }
            NodeKind::Nil => {
                out.push(ControlItem::Nil);
                Ok(())
            }
            NodeKind::Dummy => {
                out.push(ControlItem::Dummy);
                Ok(())
            }
            NodeKind::YStar => {
                out.push(ControlItem::YStar);
                Ok(())
            }
            other => Err(CompileError::Unstandardized(other.label())),
        }
    }
}

fn binder_spec(node: &Node) -> Result<Binder, CompileError> {
    match &node.kind {
        NodeKind::Identifier(name) => Ok(Binder::Single(name.clone())),
        NodeKind::EmptyBinder => Ok(Binder::Empty),
        NodeKind::Comma => {
            let mut names = Vec::with_capacity(node.children.len());
            for child in &node.children {
                match &child.kind {
                    NodeKind::Identifier(name) => names.push(name.clone()),
                    other => return Err(CompileError::InvalidBinder(other.label())),
                }
            }
            Ok(Binder::Tuple(names))
        }
        other => Err(CompileError::InvalidBinder(other.label())),
    }
}
