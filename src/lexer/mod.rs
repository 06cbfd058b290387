//! Lexer for RPAL source text
//!
//! Tokenization is regex-driven via [`logos`]. Whitespace and `//` comments
//! are skipped; string literals are unescaped at lex time; integer literals
//! are decoded at lex time so the rest of the pipeline never re-parses digit
//! strings.

use logos::Logos;

/// Errors produced while tokenizing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Default)]
pub enum LexError {
    #[default]
    #[error("unrecognized character")]
    Invalid,
    #[error("unrecognized character '{0}'")]
    Unrecognized(String),
    #[error("unterminated string literal {0}")]
    UnterminatedString(String),
    #[error("invalid escape '\\{0}' in string literal")]
    InvalidEscape(char),
    #[error("integer literal '{0}' out of range")]
    IntegerOutOfRange(String),
}

fn lex_integer(lexer: &mut logos::Lexer<Token>) -> Result<i64, LexError> {
    lexer
        .slice()
        .parse()
        .map_err(|_| LexError::IntegerOutOfRange(lexer.slice().into()))
}

/// Strip the surrounding quotes and process escapes.
fn lex_string(lexer: &mut logos::Lexer<Token>) -> Result<String, LexError> {
    let slice = lexer.slice();
    let mut out = String::with_capacity(slice.len() - 2);
    let mut chars = slice[1..slice.len() - 1].chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some(other) => return Err(LexError::InvalidEscape(other)),
            // The closing quote guarantees at least one more character.
            None => unreachable!("escape at end of terminated string"),
        }
    }
    Ok(out)
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    #[token("let")]
    Let,
    #[token("in")]
    In,
    #[token("fn")]
    Fn,
    #[token("where")]
    Where,
    #[token("aug")]
    Aug,
    #[token("or")]
    Or,
    #[token("not")]
    Not,
    #[token("gr")]
    Gr,
    #[token("ge")]
    Ge,
    #[token("ls")]
    Ls,
    #[token("le")]
    Le,
    #[token("eq")]
    Eq,
    #[token("ne")]
    Ne,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("nil")]
    Nil,
    #[token("dummy")]
    Dummy,
    #[token("within")]
    Within,
    #[token("and")]
    And,
    #[token("rec")]
    Rec,

    #[regex(r"[A-Za-z][A-Za-z0-9_]*", |lexer| lexer.slice().to_string())]
    Identifier(String),
    #[regex(r"[0-9]+", lex_integer)]
    Integer(i64),
    // The second pattern catches a quote that never closes; a terminated
    // string always out-lengths it, so it only fires on real errors.
    #[regex(r"'(?:\\.|[^'\\])*'", lex_string)]
    #[regex(r"'(?:\\.|[^'\\])*", priority = 1, callback = |lexer| Err(LexError::UnterminatedString(lexer.slice().into())))]
    StringLiteral(String),

    #[token("->")]
    Arrow,
    #[token("|")]
    Bar,
    #[token("&")]
    Amp,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("**")]
    Power,
    #[token("@")]
    At,
    #[token("=")]
    Equals,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEq,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEq,
    #[token(".")]
    Dot,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
}

impl Token {
    /// Returns a human-readable description of the token, used by parse
    /// error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Let => "'let'".to_string(),
            Token::In => "'in'".to_string(),
            Token::Fn => "'fn'".to_string(),
            Token::Where => "'where'".to_string(),
            Token::Aug => "'aug'".to_string(),
            Token::Or => "'or'".to_string(),
            Token::Not => "'not'".to_string(),
            Token::Gr => "'gr'".to_string(),
            Token::Ge => "'ge'".to_string(),
            Token::Ls => "'ls'".to_string(),
            Token::Le => "'le'".to_string(),
            Token::Eq => "'eq'".to_string(),
            Token::Ne => "'ne'".to_string(),
            Token::True => "'true'".to_string(),
            Token::False => "'false'".to_string(),
            Token::Nil => "'nil'".to_string(),
            Token::Dummy => "'dummy'".to_string(),
            Token::Within => "'within'".to_string(),
            Token::And => "'and'".to_string(),
            Token::Rec => "'rec'".to_string(),
            Token::Identifier(name) => format!("identifier '{name}'"),
            Token::Integer(value) => format!("integer '{value}'"),
            Token::StringLiteral(value) => format!("string '{value}'"),
            Token::Arrow => "'->'".to_string(),
            Token::Bar => "'|'".to_string(),
            Token::Amp => "'&'".to_string(),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Slash => "'/'".to_string(),
            Token::Power => "'**'".to_string(),
            Token::At => "'@'".to_string(),
            Token::Equals => "'='".to_string(),
            Token::Greater => "'>'".to_string(),
            Token::GreaterEq => "'>='".to_string(),
            Token::Less => "'<'".to_string(),
            Token::LessEq => "'<='".to_string(),
            Token::Dot => "'.'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Comma => "','".to_string(),
        }
    }
}

/// Tokenize a complete source file.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);
    while let Some(item) = lexer.next() {
        match item {
            Ok(token) => tokens.push(token),
            Err(LexError::Invalid) => {
                return Err(LexError::Unrecognized(lexer.slice().into()));
            }
            Err(err) => return Err(err),
        }
    }
    Ok(tokens)
}
