//! Tests for the standardization rewrites

use rpal::fmt::format_tree;
use rpal::lexer::lex;
use rpal::parser::parse;
use rpal::standardize::standardize;

fn standardized(source: &str) -> String {
    let tokens = lex(source).expect("lexing failed");
    let mut ast = parse(tokens).expect("parsing failed");
    standardize(&mut ast).expect("standardization failed");
    format_tree(&ast)
}

#[test]
fn standardize_let() {
    assert_eq!(
        standardized("let x = 5 in x"),
        "gamma\n.lambda\n..<IDENT:x>\n..<IDENT:x>\n.<INT:5>\n"
    );
}

#[test]
fn standardize_where_matches_let() {
    assert_eq!(standardized("x where x = 5"), standardized("let x = 5 in x"));
}

#[test]
fn standardize_function_form_curries() {
    assert_eq!(
        standardized("x where f a b = a"),
        "gamma\n\
         .lambda\n\
         ..<IDENT:f>\n\
         ..<IDENT:x>\n\
         .lambda\n\
         ..<IDENT:a>\n\
         ..lambda\n\
         ...<IDENT:b>\n\
         ...<IDENT:a>\n"
    );
}

#[test]
fn standardize_multi_parameter_fn() {
    assert_eq!(
        standardized("fn x y . x"),
        "lambda\n.<IDENT:x>\n.lambda\n..<IDENT:y>\n..<IDENT:x>\n"
    );
}

#[test]
fn standardize_tuple_binder_stays_structural() {
    assert_eq!(
        standardized("fn (x, y) . x"),
        "lambda\n.,\n..<IDENT:x>\n..<IDENT:y>\n.<IDENT:x>\n"
    );
}

#[test]
fn standardize_within() {
    assert_eq!(
        standardized("let x = 1 within y = x in y"),
        "gamma\n\
         .lambda\n\
         ..<IDENT:y>\n\
         ..<IDENT:y>\n\
         .gamma\n\
         ..lambda\n\
         ...<IDENT:x>\n\
         ...<IDENT:x>\n\
         ..<INT:1>\n"
    );
}

#[test]
fn standardize_simultaneous_definitions() {
    assert_eq!(
        standardized("let a = 1 and b = 2 in a"),
        "gamma\n\
         .lambda\n\
         ..,\n\
         ...<IDENT:a>\n\
         ...<IDENT:b>\n\
         ..<IDENT:a>\n\
         .tau\n\
         ..<INT:1>\n\
         ..<INT:2>\n"
    );
}

#[test]
fn standardize_rec_introduces_fixed_point() {
    assert_eq!(
        standardized("let rec f n = n in f"),
        "gamma\n\
         .lambda\n\
         ..<IDENT:f>\n\
         ..<IDENT:f>\n\
         .gamma\n\
         ..<Y*>\n\
         ..lambda\n\
         ...<IDENT:f>\n\
         ...lambda\n\
         ....<IDENT:n>\n\
         ....<IDENT:n>\n"
    );
}

#[test]
fn standardize_infix_at() {
    assert_eq!(
        standardized("a @ f b"),
        "gamma\n.gamma\n..<IDENT:f>\n..<IDENT:a>\n.<IDENT:b>\n"
    );
}

#[test]
fn standardize_leaves_operators_alone() {
    assert_eq!(standardized("1 + 2"), "+\n.<INT:1>\n.<INT:2>\n");
    assert_eq!(
        standardized("not true"),
        "not\n.<true>\n"
    );
}

#[test]
fn standardize_is_idempotent() {
    let tokens = lex("let rec f n = n eq 0 -> 1 | f (n - 1) in f 3").expect("lexing failed");
    let mut ast = parse(tokens).expect("parsing failed");
    standardize(&mut ast).expect("standardization failed");
    let once = format_tree(&ast);
    standardize(&mut ast).expect("second standardization failed");
    assert_eq!(once, format_tree(&ast));
}
