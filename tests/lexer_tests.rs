use rpal::lexer::{lex, LexError, Token};

#[test]
fn lex_keywords() {
    let tokens = lex("let in fn where rec").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Let,
            Token::In,
            Token::Fn,
            Token::Where,
            Token::Rec
        ]
    );
}

#[test]
fn lex_keyword_prefix_is_an_identifier() {
    let tokens = lex("let letx recurse").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Let,
            Token::Identifier("letx".to_string()),
            Token::Identifier("recurse".to_string())
        ]
    );
}

#[test]
fn lex_identifiers_and_integers() {
    let tokens = lex("foo Bar_9 42 0").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Identifier("foo".to_string()),
            Token::Identifier("Bar_9".to_string()),
            Token::Integer(42),
            Token::Integer(0)
        ]
    );
}

#[test]
fn lex_strings() {
    let tokens = lex("'hello' ''").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::StringLiteral("hello".to_string()),
            Token::StringLiteral(String::new())
        ]
    );
}

#[test]
fn lex_string_escapes() {
    let tokens = lex(r"'a\nb\t\\\''").unwrap();
    assert_eq!(tokens, vec![Token::StringLiteral("a\nb\t\\'".to_string())]);
}

#[test]
fn lex_operators_longest_match() {
    let tokens = lex("** * -> - >= > <= <").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Power,
            Token::Star,
            Token::Arrow,
            Token::Minus,
            Token::GreaterEq,
            Token::Greater,
            Token::LessEq,
            Token::Less
        ]
    );
}

#[test]
fn lex_skips_comments() {
    let tokens = lex("1 // the rest is ignored\n2").unwrap();
    assert_eq!(tokens, vec![Token::Integer(1), Token::Integer(2)]);
}

#[test]
fn lex_comment_is_not_division() {
    let tokens = lex("4 / 2 // 9").unwrap();
    assert_eq!(
        tokens,
        vec![Token::Integer(4), Token::Slash, Token::Integer(2)]
    );
}

#[test]
fn lex_unterminated_string() {
    let err = lex("'abc").unwrap_err();
    assert!(matches!(err, LexError::UnterminatedString(_)));
}

#[test]
fn lex_unrecognized_character() {
    let err = lex("x # y").unwrap_err();
    assert_eq!(err, LexError::Unrecognized("#".to_string()));
}

#[test]
fn lex_integer_out_of_range() {
    let err = lex("99999999999999999999").unwrap_err();
    assert!(matches!(err, LexError::IntegerOutOfRange(_)));
}
