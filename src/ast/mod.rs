//! Abstract syntax tree for RPAL programs
//!
//! A single tree type serves both the parser output and the standardized
//! form: standardization rewrites the tree in place, replacing the sugared
//! node kinds (`let`, `where`, `function_form`, ...) with the core kinds
//! (`lambda`, `gamma`, `tau`, `->`, `<Y*>`).
//!
//! Every node carries a label used by the dotted pre-order serialization
//! (see [`crate::fmt`]); terminals render as `<IDENT:x>`, `<INT:5>`,
//! `<STR:'hi'>`, `<true>`, `<false>`, `<nil>`, `<dummy>` and `<Y*>`.

use std::fmt;

/// Binary operators, kept as operator applications all the way into the
/// machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Plus,
    Minus,
    Times,
    Divide,
    Power,
    Amp,
    Or,
    Aug,
    Gr,
    Ge,
    Ls,
    Le,
    Eq,
    Ne,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Plus => "+",
            BinOp::Minus => "-",
            BinOp::Times => "*",
            BinOp::Divide => "/",
            BinOp::Power => "**",
            BinOp::Amp => "&",
            BinOp::Or => "or",
            BinOp::Aug => "aug",
            BinOp::Gr => "gr",
            BinOp::Ge => "ge",
            BinOp::Ls => "ls",
            BinOp::Le => "le",
            BinOp::Eq => "eq",
            BinOp::Ne => "ne",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

impl UnOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnOp::Neg => "neg",
            UnOp::Not => "not",
        }
    }
}

impl fmt::Display for UnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The label of a tree node.
///
/// Terminal kinds never have children; the structural kinds have the arities
/// the grammar gives them (`Let` 2, `Conditional` 3, `At` 3, `Tau` ≥ 2, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // Terminals
    Identifier(String),
    Integer(i64),
    Str(String),
    True,
    False,
    Nil,
    Dummy,
    YStar,

    // Operator applications
    BinaryOp(BinOp),
    UnaryOp(UnOp),

    // Structure
    Let,
    Lambda,
    Where,
    Tau,
    Conditional,
    At,
    Gamma,
    Equal,
    FunctionForm,
    Simultaneous,
    Within,
    Rec,
    EmptyBinder,
    Comma,
}

impl NodeKind {
    /// The serialized label, one per output line of `-ast`/`-st`.
    pub fn label(&self) -> String {
        match self {
            NodeKind::Identifier(name) => format!("<IDENT:{name}>"),
            NodeKind::Integer(value) => format!("<INT:{value}>"),
            NodeKind::Str(value) => format!("<STR:'{value}'>"),
            NodeKind::True => "<true>".to_string(),
            NodeKind::False => "<false>".to_string(),
            NodeKind::Nil => "<nil>".to_string(),
            NodeKind::Dummy => "<dummy>".to_string(),
            NodeKind::YStar => "<Y*>".to_string(),
            NodeKind::BinaryOp(op) => op.symbol().to_string(),
            NodeKind::UnaryOp(op) => op.symbol().to_string(),
            NodeKind::Let => "let".to_string(),
            NodeKind::Lambda => "lambda".to_string(),
            NodeKind::Where => "where".to_string(),
            NodeKind::Tau => "tau".to_string(),
            NodeKind::Conditional => "->".to_string(),
            NodeKind::At => "@".to_string(),
            NodeKind::Gamma => "gamma".to_string(),
            NodeKind::Equal => "=".to_string(),
            NodeKind::FunctionForm => "function_form".to_string(),
            NodeKind::Simultaneous => "and".to_string(),
            NodeKind::Within => "within".to_string(),
            NodeKind::Rec => "rec".to_string(),
            NodeKind::EmptyBinder => "()".to_string(),
            NodeKind::Comma => ",".to_string(),
        }
    }

    /// Inverse of [`NodeKind::label`]; used by the tree reader.
    pub fn from_label(label: &str) -> Option<NodeKind> {
        if let Some(name) = label.strip_prefix("<IDENT:").and_then(|s| s.strip_suffix('>')) {
            return Some(NodeKind::Identifier(name.to_string()));
        }
        if let Some(digits) = label.strip_prefix("<INT:").and_then(|s| s.strip_suffix('>')) {
            return digits.parse().ok().map(NodeKind::Integer);
        }
        if let Some(text) = label.strip_prefix("<STR:'").and_then(|s| s.strip_suffix("'>")) {
            return Some(NodeKind::Str(text.to_string()));
        }
        let kind = match label {
            "<true>" => NodeKind::True,
            "<false>" => NodeKind::False,
            "<nil>" => NodeKind::Nil,
            "<dummy>" => NodeKind::Dummy,
            "<Y*>" => NodeKind::YStar,
            "+" => NodeKind::BinaryOp(BinOp::Plus),
            "-" => NodeKind::BinaryOp(BinOp::Minus),
            "*" => NodeKind::BinaryOp(BinOp::Times),
            "/" => NodeKind::BinaryOp(BinOp::Divide),
            "**" => NodeKind::BinaryOp(BinOp::Power),
            "&" => NodeKind::BinaryOp(BinOp::Amp),
            "or" => NodeKind::BinaryOp(BinOp::Or),
            "aug" => NodeKind::BinaryOp(BinOp::Aug),
            "gr" => NodeKind::BinaryOp(BinOp::Gr),
            "ge" => NodeKind::BinaryOp(BinOp::Ge),
            "ls" => NodeKind::BinaryOp(BinOp::Ls),
            "le" => NodeKind::BinaryOp(BinOp::Le),
            "eq" => NodeKind::BinaryOp(BinOp::Eq),
            "ne" => NodeKind::BinaryOp(BinOp::Ne),
            "neg" => NodeKind::UnaryOp(UnOp::Neg),
            "not" => NodeKind::UnaryOp(UnOp::Not),
            "let" => NodeKind::Let,
            "lambda" => NodeKind::Lambda,
            "where" => NodeKind::Where,
            "tau" => NodeKind::Tau,
            "->" => NodeKind::Conditional,
            "@" => NodeKind::At,
            "gamma" => NodeKind::Gamma,
            "=" => NodeKind::Equal,
            "function_form" => NodeKind::FunctionForm,
            "and" => NodeKind::Simultaneous,
            "within" => NodeKind::Within,
            "rec" => NodeKind::Rec,
            "()" => NodeKind::EmptyBinder,
            "," => NodeKind::Comma,
            _ => return None,
        };
        Some(kind)
    }
}

/// One node of the (surface or standardized) tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
    pub(crate) standardized: bool,
}

impl Node {
    pub fn leaf(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            standardized: false,
        }
    }

    pub fn internal(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            kind,
            children,
            standardized: false,
        }
    }

    pub fn is_standardized(&self) -> bool {
        self.standardized
    }
}

// Structural equality; the standardization flag is bookkeeping, not shape.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.children == other.children
    }
}

/// A whole program tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    pub root: Node,
}

impl Ast {
    pub fn new(root: Node) -> Self {
        Self { root }
    }
}
