//! RPAL - an interpreter for the Right-reference Pedagogic Algorithmic
//! Language
//!
//! This library provides the full pipeline: [`lexer`] turns source text into
//! tokens, [`parser`] builds the abstract syntax tree, [`standardize`]
//! rewrites it into the lambda/gamma core, and [`machine`] flattens that
//! tree into control structures and evaluates them on a
//! Control-Stack-Environment machine. [`fmt`] serializes trees in the dotted
//! pre-order form the `-ast` and `-st` flags print.

pub mod ast;
pub mod fmt;
pub mod lexer;
pub mod machine;
pub mod parser;
pub mod standardize;
