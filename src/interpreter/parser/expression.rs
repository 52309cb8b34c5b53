use crate::{
    ast::{Arg, BinaryOperator, Expr, UpdateOp},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{core::{ParseResult, Parser}, scope::ContextKind},
    },
};

/// Maps a token to its binary operator and precedence tier.
///
/// `|>` is absent on purpose: the pipeline operator binds loosest of all and
/// is handled as an outer layer by [`Parser::parse_expression`].
const fn precedence(token: &Token) -> Option<(BinaryOperator, u8)> {
    use BinaryOperator as Op;

    match token {
        Token::DoublePipe => Some((Op::Or, 1)),
        Token::DoubleAmpersand => Some((Op::And, 2)),
        Token::EqualEqual => Some((Op::Equal, 3)),
        Token::BangEqual => Some((Op::NotEqual, 3)),
        Token::StrictEqual => Some((Op::StrictEqual, 3)),
        Token::StrictNotEqual => Some((Op::StrictNotEqual, 3)),
        Token::Less => Some((Op::Less, 3)),
        Token::Greater => Some((Op::Greater, 3)),
        Token::LessEqual => Some((Op::LessEqual, 3)),
        Token::GreaterEqual => Some((Op::GreaterEqual, 3)),
        Token::Pipe => Some((Op::BitOr, 4)),
        Token::Caret => Some((Op::BitXor, 5)),
        Token::Ampersand => Some((Op::BitAnd, 6)),
        Token::ShiftLeft => Some((Op::ShiftLeft, 7)),
        Token::ShiftRight => Some((Op::ShiftRight, 7)),
        Token::Plus => Some((Op::Add, 8)),
        Token::Minus => Some((Op::Sub, 8)),
        Token::Star => Some((Op::Mul, 9)),
        Token::Slash => Some((Op::Div, 9)),
        Token::DoubleSlash => Some((Op::FloorDiv, 9)),
        Token::Percent => Some((Op::Mod, 9)),
        Token::DoubleStar => Some((Op::Pow, 10)),
        _ => None,
    }
}

impl Parser {
    /// Parses a full expression, including pipeline chains.
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_precedence(1)?;

        while self.check(&Token::PipeOp) {
            let line = self.advance().1;
            let right = self.parse_primary()?;
            left = Expr::BinaryOp { op:    BinaryOperator::Pipe,
                                    left:  Box::new(left),
                                    right: Box::new(right),
                                    line };
        }

        Ok(left)
    }

    /// Precedence climbing. `**` is right-associative (recurses at the same
    /// tier); every other operator is left-associative (recurses one tier
    /// higher). Postfix `++`/`--` bind tighter than any binary operator.
    fn parse_precedence(&mut self, min: u8) -> ParseResult<Expr> {
        let mut left = self.parse_primary()?;

        loop {
            if matches!(self.peek(), Token::Increment | Token::Decrement)
               && matches!(left, Expr::Identifier { .. })
            {
                let Expr::Identifier { name, line } = left else {
                    unreachable!()
                };
                let op = if self.advance().0 == Token::Increment {
                    UpdateOp::Increment
                } else {
                    UpdateOp::Decrement
                };
                left = Expr::Update { name,
                                      op,
                                      prefix: false,
                                      line };
                continue;
            }

            let Some((op, prec)) = precedence(self.peek()) else {
                break;
            };
            if prec < min {
                break;
            }

            let line = self.advance().1;
            let next_min = if op == BinaryOperator::Pow { prec } else { prec + 1 };
            let right = self.parse_precedence(next_min)?;
            left = Expr::BinaryOp { op,
                                    left: Box::new(left),
                                    right: Box::new(right),
                                    line };
        }

        Ok(left)
    }

    /// Parses a primary expression: literals, parenthesized expressions,
    /// `POINT(x, y)`, lambdas, prefix updates, window checks, identifiers
    /// and calls.
    pub(crate) fn parse_primary(&mut self) -> ParseResult<Expr> {
        match self.peek() {
            Token::Int(_) | Token::Float(_) | Token::Str(_) | Token::Bool(_) | Token::Time(_) => {
                let (token, line) = self.advance();
                Ok(literal_expr(token, line))
            },
            Token::Minus => self.parse_negation(),
            Token::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.consume(&Token::RParen)?;
                Ok(expr)
            },
            Token::Point => self.parse_point(),
            Token::Lambda => self.parse_lambda(),
            Token::Increment | Token::Decrement => self.parse_prefix_update(),
            Token::Window => self.parse_window_exists(),
            Token::Identifier(_) => self.parse_identifier(),
            _ => self.unexpected(),
        }
    }

    /// A leading `-`. Numeric literals are negated in place; anything else
    /// becomes a subtraction from zero.
    fn parse_negation(&mut self) -> ParseResult<Expr> {
        let minus_line = self.advance().1;
        let operand = self.parse_primary()?;

        Ok(match operand {
               Expr::Integer { value, line } => Expr::Integer { value: -value, line },
               Expr::Float { value, line } => Expr::Float { value: -value, line },
               Expr::Time { seconds, line } => Expr::Time { seconds: -seconds, line },
               other => Expr::BinaryOp { op:    BinaryOperator::Sub,
                                         left:  Box::new(Expr::Integer { value: 0,
                                                                         line:  minus_line, }),
                                         right: Box::new(other),
                                         line:  minus_line, },
           })
    }

    /// `POINT(x, y)`
    fn parse_point(&mut self) -> ParseResult<Expr> {
        let line = self.advance().1;
        self.consume(&Token::LParen)?;
        let x = self.parse_expression()?;
        self.consume(&Token::Comma)?;
        let y = self.parse_expression()?;
        self.consume(&Token::RParen)?;
        Ok(Expr::Point { x: Box::new(x),
                         y: Box::new(y),
                         line })
    }

    /// `LAMBDA (params) { body }`
    fn parse_lambda(&mut self) -> ParseResult<Expr> {
        let line = self.advance().1;
        let parameters = self.parse_parameter_list()?;

        self.scopes.push_frame(&parameters);
        self.contexts.push(ContextKind::Function);
        let body = self.parse_block();
        self.contexts.pop();
        self.scopes.pop_frame();

        Ok(Expr::Lambda { parameters,
                          body: body?,
                          line })
    }

    /// `++name` or `--name`.
    fn parse_prefix_update(&mut self) -> ParseResult<Expr> {
        let (token, line) = self.advance();
        let op = if token == Token::Increment {
            UpdateOp::Increment
        } else {
            UpdateOp::Decrement
        };

        let (name, _) = self.expect_identifier()?;
        if !self.scopes.is_visible(&name) {
            return Err(ParseError::UndefinedVariable { name, line });
        }

        Ok(Expr::Update { name,
                          op,
                          prefix: true,
                          line })
    }

    /// `WINDOW w EXISTS`
    fn parse_window_exists(&mut self) -> ParseResult<Expr> {
        let line = self.advance().1;
        let window = self.parse_primary()?;
        self.consume(&Token::Exists)?;
        Ok(Expr::WindowExists { window: Box::new(window),
                                line })
    }

    /// An identifier reference or a call. Both are validated against the
    /// scope stack and the function registry; closures bound to variables
    /// count as callable names.
    fn parse_identifier(&mut self) -> ParseResult<Expr> {
        let (name, line) = self.expect_identifier()?;

        if self.check(&Token::LParen) {
            if !self.functions.contains(&name) && !self.scopes.is_visible(&name) {
                return Err(ParseError::UndefinedFunction { name, line });
            }
            let arguments = self.parse_arguments()?;
            Ok(Expr::FunctionCall { name, arguments, line })
        } else {
            if !self.scopes.is_visible(&name) && !self.functions.contains(&name) {
                return Err(ParseError::UndefinedVariable { name, line });
            }
            Ok(Expr::Identifier { name, line })
        }
    }

    /// Parses a call argument list. A `name = expr` pair is a named
    /// argument, detected with two tokens of lookahead; anything else is
    /// positional.
    fn parse_arguments(&mut self) -> ParseResult<Vec<Arg>> {
        self.consume(&Token::LParen)?;
        let mut arguments = Vec::new();

        if !self.check(&Token::RParen) {
            loop {
                let named = matches!(self.peek(), Token::Identifier(_))
                            && *self.peek_at(1) == Token::Equals;
                if named {
                    let (name, _) = self.expect_identifier()?;
                    self.advance();
                    let value = self.parse_expression()?;
                    arguments.push(Arg::Named { name, value });
                } else {
                    arguments.push(Arg::Positional(self.parse_expression()?));
                }

                if !self.eat(&Token::Comma) {
                    break;
                }
            }
        }

        self.consume(&Token::RParen)?;
        Ok(arguments)
    }
}

/// Converts a literal token into its expression node.
fn literal_expr(token: Token, line: usize) -> Expr {
    match token {
        Token::Int(value) => Expr::Integer { value, line },
        Token::Float(value) => Expr::Float { value, line },
        Token::Str(value) => Expr::Str { value, line },
        Token::Bool(value) => Expr::Bool { value, line },
        Token::Time(seconds) => Expr::Time { seconds, line },
        _ => unreachable!("caller matched a literal token"),
    }
}
