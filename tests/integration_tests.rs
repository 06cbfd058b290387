//! End-to-end tests: complete programs through the whole pipeline, asserting
//! on what Print writes.

use rpal::lexer::lex;
use rpal::machine::{flatten, Machine};
use rpal::parser::parse;
use rpal::standardize::standardize;

/// Run a program and return Print's output.
fn output_of(source: &str) -> String {
    let tokens = lex(source).expect("lexing failed");
    let mut ast = parse(tokens).expect("parsing failed");
    standardize(&mut ast).expect("standardization failed");
    let table = flatten(&ast).expect("flattening failed");
    let mut out = Vec::new();
    Machine::new(table, &mut out)
        .run()
        .expect("evaluation failed");
    String::from_utf8(out).expect("Print output is UTF-8")
}

#[test]
fn e2e_hello_world() {
    assert_eq!(output_of("Print 'Hello, World!'"), "Hello, World!\n");
}

#[test]
fn e2e_factorial() {
    let program = "let rec fact n = n eq 0 -> 1 | n * fact (n-1) in Print (fact 5)";
    assert_eq!(output_of(program), "120\n");
}

#[test]
fn e2e_max_of_pairs() {
    let program = "let max x y = x gr y -> x | y in Print (max 10 5, max 3 8)";
    assert_eq!(output_of(program), "(10, 8)\n");
}

#[test]
fn e2e_curried_conc() {
    let program = "let Conc2 x y = Conc x y in Print (Conc2 'Hello' 'World')";
    assert_eq!(output_of(program), "HelloWorld\n");
}

#[test]
fn e2e_tuple_order_and_indexing() {
    let program = "let t = (1, 'a', true) in Print (Order t, t 2)";
    assert_eq!(output_of(program), "(3, a)\n");
}

#[test]
fn e2e_fibonacci() {
    let program = "let rec fib n = n le 1 -> n | fib(n-1) + fib(n-2) in Print (fib 10)";
    assert_eq!(output_of(program), "55\n");
}

#[test]
fn e2e_where_and_within() {
    let program = "Print y where y = f 3 where (sq x = x * x within f x = sq x)";
    assert_eq!(output_of(program), "9\n");
}

#[test]
fn e2e_simultaneous_definitions() {
    let program = "let a = 1 and b = (2, 3) in Print (a, b 2, b)";
    assert_eq!(output_of(program), "(1, 3, (2, 3))\n");
}

#[test]
fn e2e_nested_tuples_print_recursively() {
    let program = "Print ((1, 2), nil, 'x')";
    assert_eq!(output_of(program), "((1, 2), nil, x)\n");
}

#[test]
fn e2e_string_builtins_compose() {
    let program = "let initial name = Conc (Stem name) '.' in Print (Conc (initial 'Ada') (Stern 'xLovelace'))";
    assert_eq!(output_of(program), "A.Lovelace\n");
}
