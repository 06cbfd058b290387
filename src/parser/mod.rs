//! Recursive-descent parser for RPAL
//!
//! One token of lookahead everywhere except inside `basic_definition`, which
//! peeks a second token to tell `X = E`, `X, Y = E` and function forms
//! apart. No backtracking: every branch commits on its first token.
//!
//! Each method carries its production as a doc comment; precedence is
//! encoded by the call chain from `expression` down to `atom`.

use crate::ast::{Ast, BinOp, Node, NodeKind, UnOp};
use crate::lexer::Token;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn expected(what: &str, found: Option<&Token>) -> Self {
        match found {
            Some(token) => Self::new(format!("expected {what}, found {}", token.describe())),
            None => Self::new(format!("expected {what}, found end of input")),
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parse a token stream into an AST.
pub fn parse(tokens: Vec<Token>) -> ParseResult<Ast> {
    let mut parser = Parser::new(tokens);
    let root = parser.expression()?;
    match parser.peek() {
        None => Ok(Ast::new(root)),
        Some(token) => Err(ParseError::new(format!(
            "unexpected {} after end of program",
            token.describe()
        ))),
    }
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn peek_ahead(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.index + offset)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn expect(&mut self, token: Token, what: &str) -> ParseResult<()> {
        match self.peek() {
            Some(found) if *found == token => {
                self.advance();
                Ok(())
            }
            found => Err(ParseError::expected(what, found)),
        }
    }

    fn expect_identifier(&mut self) -> ParseResult<String> {
        match self.advance() {
            Some(Token::Identifier(name)) => Ok(name),
            found => Err(ParseError::expected("an identifier", found.as_ref())),
        }
    }

    /// expression := "let" definition "in" expression
    ///             | "fn" binder+ "." expression
    ///             | where_expression
    fn expression(&mut self) -> ParseResult<Node> {
        match self.peek() {
            Some(Token::Let) => {
                self.advance();
                let definition = self.definition()?;
                self.expect(Token::In, "'in'")?;
                let body = self.expression()?;
                Ok(Node::internal(NodeKind::Let, vec![definition, body]))
            }
            Some(Token::Fn) => {
                self.advance();
                let mut children = vec![self.binder()?];
                while matches!(self.peek(), Some(Token::Identifier(_) | Token::LParen)) {
                    children.push(self.binder()?);
                }
                self.expect(Token::Dot, "'.'")?;
                children.push(self.expression()?);
                Ok(Node::internal(NodeKind::Lambda, children))
            }
            _ => self.where_expression(),
        }
    }

    /// where_expression := tuple_expression ("where" rec_definition)?
    fn where_expression(&mut self) -> ParseResult<Node> {
        let body = self.tuple_expression()?;
        if matches!(self.peek(), Some(Token::Where)) {
            self.advance();
            let definition = self.rec_definition()?;
            return Ok(Node::internal(NodeKind::Where, vec![body, definition]));
        }
        Ok(body)
    }

    /// tuple_expression := aug_expression ("," aug_expression)*
    fn tuple_expression(&mut self) -> ParseResult<Node> {
        let first = self.aug_expression()?;
        if !matches!(self.peek(), Some(Token::Comma)) {
            return Ok(first);
        }
        let mut elements = vec![first];
        while matches!(self.peek(), Some(Token::Comma)) {
            self.advance();
            elements.push(self.aug_expression()?);
        }
        Ok(Node::internal(NodeKind::Tau, elements))
    }

    /// aug_expression := conditional ("aug" conditional)*
    fn aug_expression(&mut self) -> ParseResult<Node> {
        let mut node = self.conditional()?;
        while matches!(self.peek(), Some(Token::Aug)) {
            self.advance();
            let rhs = self.conditional()?;
            node = Node::internal(NodeKind::BinaryOp(BinOp::Aug), vec![node, rhs]);
        }
        Ok(node)
    }

    /// conditional := boolean ("->" conditional "|" conditional)?
    fn conditional(&mut self) -> ParseResult<Node> {
        let guard = self.boolean()?;
        if !matches!(self.peek(), Some(Token::Arrow)) {
            return Ok(guard);
        }
        self.advance();
        let then_branch = self.conditional()?;
        self.expect(Token::Bar, "'|'")?;
        let else_branch = self.conditional()?;
        Ok(Node::internal(
            NodeKind::Conditional,
            vec![guard, then_branch, else_branch],
        ))
    }

    /// boolean := boolean_term ("or" boolean_term)*
    fn boolean(&mut self) -> ParseResult<Node> {
        let mut node = self.boolean_term()?;
        while matches!(self.peek(), Some(Token::Or)) {
            self.advance();
            let rhs = self.boolean_term()?;
            node = Node::internal(NodeKind::BinaryOp(BinOp::Or), vec![node, rhs]);
        }
        Ok(node)
    }

    /// boolean_term := boolean_factor ("&" boolean_factor)*
    fn boolean_term(&mut self) -> ParseResult<Node> {
        let mut node = self.boolean_factor()?;
        while matches!(self.peek(), Some(Token::Amp)) {
            self.advance();
            let rhs = self.boolean_factor()?;
            node = Node::internal(NodeKind::BinaryOp(BinOp::Amp), vec![node, rhs]);
        }
        Ok(node)
    }

    /// boolean_factor := "not" comparison | comparison
    fn boolean_factor(&mut self) -> ParseResult<Node> {
        if matches!(self.peek(), Some(Token::Not)) {
            self.advance();
            let operand = self.comparison()?;
            return Ok(Node::internal(NodeKind::UnaryOp(UnOp::Not), vec![operand]));
        }
        self.comparison()
    }

    /// comparison := arithmetic (relop arithmetic)?
    ///
    /// The symbolic spellings `>`, `>=`, `<`, `<=` normalize to the keyword
    /// operators `gr`, `ge`, `ls`, `le`.
    fn comparison(&mut self) -> ParseResult<Node> {
        let left = self.arithmetic()?;
        let op = match self.peek() {
            Some(Token::Gr | Token::Greater) => BinOp::Gr,
            Some(Token::Ge | Token::GreaterEq) => BinOp::Ge,
            Some(Token::Ls | Token::Less) => BinOp::Ls,
            Some(Token::Le | Token::LessEq) => BinOp::Le,
            Some(Token::Eq) => BinOp::Eq,
            Some(Token::Ne) => BinOp::Ne,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.arithmetic()?;
        Ok(Node::internal(NodeKind::BinaryOp(op), vec![left, right]))
    }

    /// arithmetic := ("+" | "-")? term (("+" | "-") term)*
    ///
    /// A leading `+` is dropped; a leading `-` becomes `neg`.
    fn arithmetic(&mut self) -> ParseResult<Node> {
        let mut node = match self.peek() {
            Some(Token::Plus) => {
                self.advance();
                self.term()?
            }
            Some(Token::Minus) => {
                self.advance();
                Node::internal(NodeKind::UnaryOp(UnOp::Neg), vec![self.term()?])
            }
            _ => self.term()?,
        };
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Plus,
                Some(Token::Minus) => BinOp::Minus,
                _ => break,
            };
            self.advance();
            let rhs = self.term()?;
            node = Node::internal(NodeKind::BinaryOp(op), vec![node, rhs]);
        }
        Ok(node)
    }

    /// term := factor (("*" | "/") factor)*
    fn term(&mut self) -> ParseResult<Node> {
        let mut node = self.factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Times,
                Some(Token::Slash) => BinOp::Divide,
                _ => break,
            };
            self.advance();
            let rhs = self.factor()?;
            node = Node::internal(NodeKind::BinaryOp(op), vec![node, rhs]);
        }
        Ok(node)
    }

    /// factor := at_expression ("**" factor)?
    fn factor(&mut self) -> ParseResult<Node> {
        let base = self.at_expression()?;
        if !matches!(self.peek(), Some(Token::Power)) {
            return Ok(base);
        }
        self.advance();
        let exponent = self.factor()?;
        Ok(Node::internal(
            NodeKind::BinaryOp(BinOp::Power),
            vec![base, exponent],
        ))
    }

    /// at_expression := application ("@" IDENT application)*
    fn at_expression(&mut self) -> ParseResult<Node> {
        let mut node = self.application()?;
        while matches!(self.peek(), Some(Token::At)) {
            self.advance();
            let name = Node::leaf(NodeKind::Identifier(self.expect_identifier()?));
            let rhs = self.application()?;
            node = Node::internal(NodeKind::At, vec![node, name, rhs]);
        }
        Ok(node)
    }

    /// application := atom atom*
    ///
    /// Juxtaposition is function application, left-associative and tighter
    /// than every operator.
    fn application(&mut self) -> ParseResult<Node> {
        let mut node = self.atom()?;
        while starts_atom(self.peek()) {
            let argument = self.atom()?;
            node = Node::internal(NodeKind::Gamma, vec![node, argument]);
        }
        Ok(node)
    }

    /// atom := IDENT | INT | STRING | "true" | "false" | "nil" | "dummy"
    ///       | "(" expression ")"
    fn atom(&mut self) -> ParseResult<Node> {
        match self.advance() {
            Some(Token::Identifier(name)) => Ok(Node::leaf(NodeKind::Identifier(name))),
            Some(Token::Integer(value)) => Ok(Node::leaf(NodeKind::Integer(value))),
            Some(Token::StringLiteral(value)) => Ok(Node::leaf(NodeKind::Str(value))),
            Some(Token::True) => Ok(Node::leaf(NodeKind::True)),
            Some(Token::False) => Ok(Node::leaf(NodeKind::False)),
            Some(Token::Nil) => Ok(Node::leaf(NodeKind::Nil)),
            Some(Token::Dummy) => Ok(Node::leaf(NodeKind::Dummy)),
            Some(Token::LParen) => {
                let inner = self.expression()?;
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            found => Err(ParseError::expected("an expression", found.as_ref())),
        }
    }

    /// definition := simultaneous ("within" definition)?
    fn definition(&mut self) -> ParseResult<Node> {
        let first = self.simultaneous()?;
        if matches!(self.peek(), Some(Token::Within)) {
            self.advance();
            let second = self.definition()?;
            return Ok(Node::internal(NodeKind::Within, vec![first, second]));
        }
        Ok(first)
    }

    /// simultaneous := rec_definition ("and" rec_definition)*
    fn simultaneous(&mut self) -> ParseResult<Node> {
        let first = self.rec_definition()?;
        if !matches!(self.peek(), Some(Token::And)) {
            return Ok(first);
        }
        let mut definitions = vec![first];
        while matches!(self.peek(), Some(Token::And)) {
            self.advance();
            definitions.push(self.rec_definition()?);
        }
        Ok(Node::internal(NodeKind::Simultaneous, definitions))
    }

    /// rec_definition := "rec" basic_definition | basic_definition
    fn rec_definition(&mut self) -> ParseResult<Node> {
        if matches!(self.peek(), Some(Token::Rec)) {
            self.advance();
            let definition = self.basic_definition()?;
            return Ok(Node::internal(NodeKind::Rec, vec![definition]));
        }
        self.basic_definition()
    }

    /// basic_definition := "(" definition ")"
    ///                   | IDENT binder+ "=" expression
    ///                   | IDENT ("," IDENT)+ "=" expression
    ///                   | IDENT "=" expression
    fn basic_definition(&mut self) -> ParseResult<Node> {
        match self.peek() {
            Some(Token::LParen) => {
                self.advance();
                let definition = self.definition()?;
                self.expect(Token::RParen, "')'")?;
                Ok(definition)
            }
            Some(Token::Identifier(_)) => match self.peek_ahead(1) {
                Some(Token::Equals) => {
                    let name = Node::leaf(NodeKind::Identifier(self.expect_identifier()?));
                    self.advance();
                    let body = self.expression()?;
                    Ok(Node::internal(NodeKind::Equal, vec![name, body]))
                }
                Some(Token::Comma) => {
                    let binders = self.binder_list()?;
                    self.expect(Token::Equals, "'='")?;
                    let body = self.expression()?;
                    Ok(Node::internal(NodeKind::Equal, vec![binders, body]))
                }
                Some(Token::Identifier(_) | Token::LParen) => {
                    let name = Node::leaf(NodeKind::Identifier(self.expect_identifier()?));
                    let mut children = vec![name, self.binder()?];
                    while matches!(self.peek(), Some(Token::Identifier(_) | Token::LParen)) {
                        children.push(self.binder()?);
                    }
                    self.expect(Token::Equals, "'='")?;
                    children.push(self.expression()?);
                    Ok(Node::internal(NodeKind::FunctionForm, children))
                }
                found => Err(ParseError::expected("'=', ',' or a parameter", found)),
            },
            found => Err(ParseError::expected("a definition", found)),
        }
    }

    /// binder := IDENT | "(" ")" | "(" IDENT ("," IDENT)* ")"
    fn binder(&mut self) -> ParseResult<Node> {
        match self.peek() {
            Some(Token::Identifier(_)) => {
                let name = self.expect_identifier()?;
                Ok(Node::leaf(NodeKind::Identifier(name)))
            }
            Some(Token::LParen) => {
                self.advance();
                if matches!(self.peek(), Some(Token::RParen)) {
                    self.advance();
                    return Ok(Node::leaf(NodeKind::EmptyBinder));
                }
                let binders = self.binder_list()?;
                self.expect(Token::RParen, "')'")?;
                Ok(binders)
            }
            found => Err(ParseError::expected("a parameter name or '('", found)),
        }
    }

    /// binder_list := IDENT ("," IDENT)*
    ///
    /// A single name stays a plain identifier; several become a `,` node.
    fn binder_list(&mut self) -> ParseResult<Node> {
        let mut names = vec![Node::leaf(NodeKind::Identifier(self.expect_identifier()?))];
        while matches!(self.peek(), Some(Token::Comma)) {
            self.advance();
            names.push(Node::leaf(NodeKind::Identifier(self.expect_identifier()?)));
        }
        if names.len() == 1 {
            return Ok(names.remove(0));
        }
        Ok(Node::internal(NodeKind::Comma, names))
    }
}

fn starts_atom(token: Option<&Token>) -> bool {
    matches!(
        token,
        Some(
            Token::Identifier(_)
                | Token::Integer(_)
                | Token::StringLiteral(_)
                | Token::True
                | Token::False
                | Token::Nil
                | Token::Dummy
                | Token::LParen
        )
    )
}
