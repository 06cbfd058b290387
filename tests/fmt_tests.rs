//! Tests for the dotted pre-order serialization and its inverse.

use rpal::fmt::{format_tree, parse_tree, TreeReadError};
use rpal::lexer::lex;
use rpal::parser::parse;
use rpal::standardize::standardize;

const SAMPLES: [&str; 5] = [
    "let x = 5 in x + 1",
    "fn (a, b) . a @ add b",
    "let rec f n = n eq 0 -> 1 | n * f (n - 1) in f 5",
    "Print ('hi', nil, dummy, true, false)",
    "let a = 1 and b = 2 within c = 3 in (a, b, c) aug 4",
];

#[test]
fn serialization_round_trips() {
    for source in SAMPLES {
        let tokens = lex(source).expect("lexing failed");
        let ast = parse(tokens).expect("parsing failed");
        let reread = parse_tree(&format_tree(&ast)).expect("reading the tree back failed");
        assert_eq!(ast, reread, "round trip changed the tree for: {source}");
    }
}

#[test]
fn standardized_serialization_round_trips() {
    for source in SAMPLES {
        let tokens = lex(source).expect("lexing failed");
        let mut ast = parse(tokens).expect("parsing failed");
        standardize(&mut ast).expect("standardization failed");
        let reread = parse_tree(&format_tree(&ast)).expect("reading the tree back failed");
        assert_eq!(ast, reread, "round trip changed the tree for: {source}");
    }
}

#[test]
fn read_rejects_unknown_labels() {
    assert!(matches!(
        parse_tree("mystery\n"),
        Err(TreeReadError::UnknownLabel(label)) if label == "mystery"
    ));
}

#[test]
fn read_rejects_a_second_root() {
    assert!(matches!(
        parse_tree("<INT:1>\n<INT:2>\n"),
        Err(TreeReadError::MultipleRoots)
    ));
}

#[test]
fn read_rejects_depth_jumps() {
    assert!(matches!(
        parse_tree("gamma\n..<INT:1>\n"),
        Err(TreeReadError::DepthJump { .. })
    ));
}

#[test]
fn read_rejects_empty_input() {
    assert!(matches!(parse_tree(""), Err(TreeReadError::Empty)));
}
