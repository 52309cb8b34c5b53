use std::collections::HashSet;

use crate::{
    ast::Program,
    error::ParseError,
    interpreter::{lexer::Token, parser::scope::{ContextKind, ScopeStack}},
};

/// Convenient result alias for all parsing routines.
pub type ParseResult<T> = Result<T, ParseError>;

/// The parser.
///
/// Holds the token stream with a cursor, plus the compile-time validation
/// state: the lexical scope stack, the set of defined function names, and
/// the loop/function context markers.
pub struct Parser {
    tokens:                Vec<(Token, usize)>,
    pos:                   usize,
    pub(crate) scopes:     ScopeStack,
    pub(crate) functions:  HashSet<String>,
    pub(crate) contexts:   Vec<ContextKind>,
}

impl Parser {
    /// Creates a parser over a token stream produced by
    /// [`tokenize`](crate::interpreter::lexer::tokenize).
    #[must_use]
    pub fn new(tokens: Vec<(Token, usize)>) -> Self {
        let tokens = if tokens.is_empty() {
            vec![(Token::Eof, 1)]
        } else {
            tokens
        };

        Self { tokens,
               pos: 0,
               scopes: ScopeStack::new(),
               functions: HashSet::new(),
               contexts: Vec::new() }
    }

    /// Seeds the global frame and the function registry with names that are
    /// already bound. Interactive hosts use this so that a line can refer to
    /// variables and functions created by earlier programs.
    pub fn predeclare<'a>(&mut self,
                          variables: impl IntoIterator<Item = &'a str>,
                          functions: impl IntoIterator<Item = &'a str>) {
        for name in variables {
            self.scopes.declare(name);
        }
        for name in functions {
            self.functions.insert(name.to_string());
        }
    }

    /// Parses the whole token stream into a [`Program`].
    ///
    /// # Errors
    /// Returns a [`ParseError`] for syntax mistakes, references to
    /// undeclared names, unknown type annotations, or misplaced control
    /// statements.
    pub fn parse(mut self) -> ParseResult<Program> {
        let mut statements = Vec::new();

        loop {
            self.eat_terminators();
            if self.check(&Token::Eof) {
                break;
            }
            statements.push(self.parse_statement()?);
        }

        Ok(Program { statements })
    }

    /// Returns the current token without consuming it.
    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    /// Returns the token `offset` positions ahead, saturating at `Eof`.
    pub(crate) fn peek_at(&self, offset: usize) -> &Token {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[index].0
    }

    /// The source line of the current token.
    pub(crate) fn line(&self) -> usize {
        self.tokens[self.pos].1
    }

    /// Consumes and returns the current token with its line.
    pub(crate) fn advance(&mut self) -> (Token, usize) {
        let current = self.tokens[self.pos].clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        current
    }

    /// Whether the current token matches `expected` by kind.
    pub(crate) fn check(&self, expected: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(expected)
    }

    /// Consumes the current token if it matches `expected` by kind.
    pub(crate) fn eat(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes a token of the expected kind or fails.
    ///
    /// Returns the source line of the consumed token.
    pub(crate) fn consume(&mut self, expected: &Token) -> ParseResult<usize> {
        if self.check(expected) {
            Ok(self.advance().1)
        } else {
            self.unexpected()
        }
    }

    /// Consumes an identifier token and returns its name and line.
    pub(crate) fn expect_identifier(&mut self) -> ParseResult<(String, usize)> {
        if let Token::Identifier(_) = self.peek() {
            let (token, line) = self.advance();
            match token {
                Token::Identifier(name) => Ok((name, line)),
                _ => unreachable!(),
            }
        } else {
            self.unexpected()
        }
    }

    /// Skips any run of `;` tokens.
    pub(crate) fn eat_terminators(&mut self) {
        while self.check(&Token::Terminator) {
            self.advance();
        }
    }

    /// Consumes an optional trailing `;`.
    pub(crate) fn eat_terminator(&mut self) {
        if self.check(&Token::Terminator) {
            self.advance();
        }
    }

    /// Builds the error for an unexpected current token.
    pub(crate) fn unexpected<T>(&self) -> ParseResult<T> {
        let line = self.line();
        Err(match self.peek() {
                Token::Eof => ParseError::UnexpectedEndOfInput { line },
                Token::Reserved(word) => ParseError::ReservedKeyword { word: word.clone(),
                                                                       line },
                token => ParseError::UnexpectedToken { token: format!("{token:?}"),
                                                       line },
            })
    }

    /// Whether a `BREAK`/`CONTINUE` is legal here: the innermost enclosing
    /// construct boundary must be a loop, not a function body.
    pub(crate) fn in_loop(&self) -> bool {
        for context in self.contexts.iter().rev() {
            match context {
                ContextKind::Loop => return true,
                ContextKind::Function => return false,
            }
        }
        false
    }

    /// Whether a `RETURN`/`YIELD` is legal here.
    pub(crate) fn in_function(&self) -> bool {
        self.contexts.contains(&ContextKind::Function)
    }
}
