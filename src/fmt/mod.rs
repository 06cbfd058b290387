//! Tree serialization for RPAL
//!
//! The `-ast` and `-st` flags print the tree in dotted pre-order: one label
//! per line, node depth shown as leading `.` characters. [`parse_tree`] is
//! the inverse, reading that serialization back into an [`Ast`].

use crate::ast::{Ast, Node, NodeKind};

/// Serialize a tree in dotted pre-order.
pub fn format_tree(ast: &Ast) -> String {
    let mut out = String::new();
    write_node(&ast.root, 0, &mut out);
    out
}

fn write_node(node: &Node, depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push('.');
    }
    out.push_str(&node.kind.label());
    out.push('\n');
    for child in &node.children {
        write_node(child, depth + 1, out);
    }
}

/// Errors reading a dotted pre-order serialization.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TreeReadError {
    #[error("empty tree")]
    Empty,
    #[error("unknown node label '{0}'")]
    UnknownLabel(String),
    #[error("node at depth {found} cannot follow depth {previous}")]
    DepthJump { previous: usize, found: usize },
    #[error("more than one root node")]
    MultipleRoots,
}

/// Read a tree back from its dotted pre-order serialization.
pub fn parse_tree(text: &str) -> Result<Ast, TreeReadError> {
    // The stack holds the path to the node currently being built;
    // stack[i] sits at depth i.
    let mut stack: Vec<Node> = Vec::new();

    for line in text.lines() {
        if line.is_empty() {
            continue;
        }
        let depth = line.chars().take_while(|&c| c == '.').count();
        let label = &line[depth..];
        let kind = NodeKind::from_label(label)
            .ok_or_else(|| TreeReadError::UnknownLabel(label.to_string()))?;

        if depth > stack.len() {
            return Err(TreeReadError::DepthJump {
                previous: stack.len().saturating_sub(1),
                found: depth,
            });
        }
        while stack.len() > depth {
            let done = stack.pop().expect("loop condition guarantees an element");
            match stack.last_mut() {
                Some(parent) => parent.children.push(done),
                None => return Err(TreeReadError::MultipleRoots),
            }
        }
        stack.push(Node::leaf(kind));
    }

    while stack.len() > 1 {
        let done = stack.pop().expect("loop condition guarantees an element");
        stack
            .last_mut()
            .expect("stack still has the parent")
            .children
            .push(done);
    }
    stack.pop().map(Ast::new).ok_or(TreeReadError::Empty)
}
