//! Standardization - rewriting sugar into the lambda/gamma core
//!
//! A post-order pass over the tree: children are standardized before their
//! parent rewrites itself, so every definition a parent consumes has already
//! collapsed to a binary `=` node. The rewrites:
//!
//! ```text
//! let(=(X,E), P)             → gamma(lambda(X,P), E)
//! where(P, =(X,E))           → gamma(lambda(X,P), E)
//! function_form(F, V.., E)   → =(F, lambda(V1, .. lambda(Vn, E)))
//! lambda(V1..Vn, E)          → lambda(V1, .. lambda(Vn, E))
//! within(=(X1,E1), =(X2,E2)) → =(X2, gamma(lambda(X1,E2), E1))
//! and(=(X1,E1) .. =(Xk,Ek))  → =(,(X1..Xk), tau(E1..Ek))
//! rec(=(X,E))                → =(X, gamma(Y*, lambda(X,E)))
//! @(E1, N, E2)               → gamma(gamma(N, E1), E2)
//! ```
//!
//! Operator applications (including `aug`, `neg` and `not`) stay in the tree
//! for the machine to execute directly. The per-node flag makes the pass
//! idempotent.

use std::mem;

use crate::ast::{Ast, Node, NodeKind};

/// Errors for definition shapes the rewrites cannot consume. Unreachable
/// from a tree the parser built.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum StandardizeError {
    #[error("malformed definition under '{0}'")]
    MalformedDefinition(String),
}

/// Standardize a whole tree in place.
pub fn standardize(ast: &mut Ast) -> Result<(), StandardizeError> {
    standardize_node(&mut ast.root)
}

fn standardize_node(node: &mut Node) -> Result<(), StandardizeError> {
    if node.standardized {
        return Ok(());
    }
    for child in &mut node.children {
        standardize_node(child)?;
    }
    match node.kind {
        NodeKind::Let => rewrite_let(node)?,
        NodeKind::Where => rewrite_where(node)?,
        NodeKind::FunctionForm => rewrite_function_form(node)?,
        NodeKind::Lambda => rewrite_lambda(node)?,
        NodeKind::Within => rewrite_within(node)?,
        NodeKind::At => rewrite_at(node)?,
        NodeKind::Simultaneous => rewrite_simultaneous(node)?,
        NodeKind::Rec => rewrite_rec(node)?,
        _ => {}
    }
    node.standardized = true;
    Ok(())
}

fn malformed(construct: &str) -> StandardizeError {
    StandardizeError::MalformedDefinition(construct.to_string())
}

/// Take apart a binary `=` node into its name and value.
fn split_equal(mut node: Node, construct: &str) -> Result<(Node, Node), StandardizeError> {
    if node.kind != NodeKind::Equal || node.children.len() != 2 {
        return Err(malformed(construct));
    }
    let (Some(value), Some(name)) = (node.children.pop(), node.children.pop()) else {
        return Err(malformed(construct));
    };
    Ok((name, value))
}

/// Right-fold binders into a chain of single-binder lambdas around a body.
fn lambda_chain(binders: Vec<Node>, body: Node) -> Node {
    binders.into_iter().rev().fold(body, |acc, binder| {
        Node::internal(NodeKind::Lambda, vec![binder, acc])
    })
}

fn rewrite_let(node: &mut Node) -> Result<(), StandardizeError> {
    let mut children = mem::take(&mut node.children);
    let (Some(body), Some(definition)) = (children.pop(), children.pop()) else {
        return Err(malformed("let"));
    };
    let (name, value) = split_equal(definition, "let")?;
    node.kind = NodeKind::Gamma;
    node.children = vec![
        Node::internal(NodeKind::Lambda, vec![name, body]),
        value,
    ];
    Ok(())
}

fn rewrite_where(node: &mut Node) -> Result<(), StandardizeError> {
    let mut children = mem::take(&mut node.children);
    let (Some(definition), Some(body)) = (children.pop(), children.pop()) else {
        return Err(malformed("where"));
    };
    let (name, value) = split_equal(definition, "where")?;
    node.kind = NodeKind::Gamma;
    node.children = vec![
        Node::internal(NodeKind::Lambda, vec![name, body]),
        value,
    ];
    Ok(())
}

fn rewrite_function_form(node: &mut Node) -> Result<(), StandardizeError> {
    let mut children = mem::take(&mut node.children);
    if children.len() < 3 {
        return Err(malformed("function form"));
    }
    let Some(body) = children.pop() else {
        return Err(malformed("function form"));
    };
    let name = children.remove(0);
    node.kind = NodeKind::Equal;
    node.children = vec![name, lambda_chain(children, body)];
    Ok(())
}

/// A parsed `fn` may carry several binders; flatten to nested lambdas.
fn rewrite_lambda(node: &mut Node) -> Result<(), StandardizeError> {
    if node.children.len() <= 2 {
        return Ok(());
    }
    let mut children = mem::take(&mut node.children);
    let Some(body) = children.pop() else {
        return Err(malformed("fn"));
    };
    let first = children.remove(0);
    node.children = vec![first, lambda_chain(children, body)];
    Ok(())
}

fn rewrite_within(node: &mut Node) -> Result<(), StandardizeError> {
    let mut children = mem::take(&mut node.children);
    let (Some(second), Some(first)) = (children.pop(), children.pop()) else {
        return Err(malformed("within"));
    };
    let (outer_name, outer_value) = split_equal(first, "within")?;
    let (inner_name, inner_value) = split_equal(second, "within")?;
    node.kind = NodeKind::Equal;
    node.children = vec![
        inner_name,
        Node::internal(
            NodeKind::Gamma,
            vec![
                Node::internal(NodeKind::Lambda, vec![outer_name, inner_value]),
                outer_value,
            ],
        ),
    ];
    Ok(())
}

fn rewrite_at(node: &mut Node) -> Result<(), StandardizeError> {
    let mut children = mem::take(&mut node.children);
    let (Some(right), Some(name), Some(left)) =
        (children.pop(), children.pop(), children.pop())
    else {
        return Err(malformed("@"));
    };
    node.kind = NodeKind::Gamma;
    node.children = vec![Node::internal(NodeKind::Gamma, vec![name, left]), right];
    Ok(())
}

fn rewrite_simultaneous(node: &mut Node) -> Result<(), StandardizeError> {
    let children = mem::take(&mut node.children);
    let mut names = Vec::with_capacity(children.len());
    let mut values = Vec::with_capacity(children.len());
    for definition in children {
        let (name, value) = split_equal(definition, "and")?;
        names.push(name);
        values.push(value);
    }
    node.kind = NodeKind::Equal;
    node.children = vec![
        Node::internal(NodeKind::Comma, names),
        Node::internal(NodeKind::Tau, values),
    ];
    Ok(())
}

fn rewrite_rec(node: &mut Node) -> Result<(), StandardizeError> {
    let mut children = mem::take(&mut node.children);
    let Some(definition) = children.pop() else {
        return Err(malformed("rec"));
    };
    let (name, value) = split_equal(definition, "rec")?;
    let lambda = Node::internal(NodeKind::Lambda, vec![name.clone(), value]);
    node.kind = NodeKind::Equal;
    node.children = vec![
        name,
        Node::internal(NodeKind::Gamma, vec![Node::leaf(NodeKind::YStar), lambda]),
    ];
    Ok(())
}
