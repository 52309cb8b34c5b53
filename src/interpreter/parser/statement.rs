use crate::{
    ast::{ControlKind, ElseIf, Expr, FunctionDef, KeyAction, MouseTarget, Stmt, TypeName},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{core::{ParseResult, Parser}, scope::ContextKind},
    },
};

impl Parser {
    /// Parses one statement, dispatching on the leading token.
    pub(crate) fn parse_statement(&mut self) -> ParseResult<Stmt> {
        match self.peek() {
            Token::Set => self.parse_assignment(),
            Token::Defun => self.parse_function_definition(),
            Token::Println => self.parse_print(true),
            Token::Print => self.parse_print(false),
            Token::Wait => self.parse_wait(),
            Token::Move => self.parse_move(),
            Token::Hold => self.parse_key_operation(KeyAction::Hold),
            Token::Release => self.parse_key_operation(KeyAction::Release),
            Token::Press => self.parse_press(),
            Token::Focus => self.parse_focus_window(),
            Token::While => self.parse_while(),
            Token::Repeat => self.parse_repeat(),
            Token::If => self.parse_if(),
            Token::Return | Token::Break | Token::Continue | Token::Yield | Token::Pass => {
                self.parse_control()
            },
            _ => self.parse_expression_statement(),
        }
    }

    /// `SET name = expr;`, `SET name : TYPE = expr;` or
    /// `SET name AS TYPE = expr;`
    ///
    /// A bare `POINT(...)` initializer implies the `POINT` type even without
    /// an annotation.
    fn parse_assignment(&mut self) -> ParseResult<Stmt> {
        let line = self.advance().1;
        let (name, _) = self.expect_identifier()?;

        let declared_type = if self.eat(&Token::Colon) || self.eat(&Token::As) {
            Some(self.parse_type_name()?)
        } else {
            None
        };

        self.consume(&Token::Equals)?;
        let value = self.parse_expression()?;
        self.eat_terminator();

        let declared_type = declared_type.or(match &value {
                                                 Expr::Point { .. } => Some(TypeName::Point),
                                                 _ => None,
                                             });

        self.scopes.declare(&name);
        Ok(Stmt::Assignment { name,
                              declared_type,
                              value,
                              line })
    }

    /// Resolves a type annotation. `POINT` arrives as its own keyword token;
    /// every other type name arrives as an identifier.
    fn parse_type_name(&mut self) -> ParseResult<TypeName> {
        let line = self.line();
        match self.advance().0 {
            Token::Point => Ok(TypeName::Point),
            Token::Identifier(name) => {
                TypeName::from_keyword(&name).ok_or(ParseError::InvalidType { name, line })
            },
            token => Err(ParseError::InvalidType { name: format!("{token:?}"),
                                                   line }),
        }
    }

    /// `DEFUN name(params) { body }`
    ///
    /// The name is registered before the body is parsed so that recursive
    /// calls resolve.
    fn parse_function_definition(&mut self) -> ParseResult<Stmt> {
        let line = self.advance().1;
        let (name, _) = self.expect_identifier()?;
        self.functions.insert(name.clone());

        let parameters = self.parse_parameter_list()?;

        self.scopes.push_frame(&parameters);
        self.contexts.push(ContextKind::Function);
        let body = self.parse_block();
        self.contexts.pop();
        self.scopes.pop_frame();

        self.eat_terminator();
        Ok(Stmt::FunctionDefinition(FunctionDef { name,
                                                  parameters,
                                                  body: body?,
                                                  line }))
    }

    /// Parses `(a, b, c)` into a list of parameter names.
    pub(crate) fn parse_parameter_list(&mut self) -> ParseResult<Vec<String>> {
        self.consume(&Token::LParen)?;
        let mut parameters = Vec::new();

        if !self.check(&Token::RParen) {
            loop {
                let (parameter, _) = self.expect_identifier()?;
                parameters.push(parameter);
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
        }

        self.consume(&Token::RParen)?;
        Ok(parameters)
    }

    /// Parses a braced statement block.
    pub(crate) fn parse_block(&mut self) -> ParseResult<Vec<Stmt>> {
        self.consume(&Token::LBrace)?;
        let mut statements = Vec::new();

        loop {
            self.eat_terminators();
            if self.check(&Token::RBrace) || self.check(&Token::Eof) {
                break;
            }
            statements.push(self.parse_statement()?);
        }

        self.consume(&Token::RBrace)?;
        Ok(statements)
    }

    /// `PRINTLN expr;` or `PRINT expr;`
    fn parse_print(&mut self, newline: bool) -> ParseResult<Stmt> {
        let line = self.advance().1;
        let expr = self.parse_expression()?;
        self.eat_terminator();
        Ok(Stmt::Print { expr, newline, line })
    }

    /// `WAIT duration;`
    fn parse_wait(&mut self) -> ParseResult<Stmt> {
        let line = self.advance().1;
        let duration = self.parse_expression()?;
        self.eat_terminator();
        Ok(Stmt::Wait { duration, line })
    }

    /// `MOVE MOUSE TO ...;` or `MOVE WINDOW w TO (x, y);`
    fn parse_move(&mut self) -> ParseResult<Stmt> {
        let line = self.advance().1;

        match self.peek() {
            Token::Mouse => {
                self.advance();
                self.consume(&Token::To)?;
                let target = if self.check(&Token::LParen) {
                    self.advance();
                    let x = self.parse_expression()?;
                    self.consume(&Token::Comma)?;
                    let y = self.parse_expression()?;
                    self.consume(&Token::RParen)?;
                    MouseTarget::Coordinates { x, y }
                } else {
                    MouseTarget::Point(self.parse_expression()?)
                };
                self.eat_terminator();
                Ok(Stmt::MoveMouse { target, line })
            },
            Token::Window => {
                self.advance();
                let window = self.parse_expression()?;
                self.consume(&Token::To)?;
                self.consume(&Token::LParen)?;
                let x = self.parse_expression()?;
                self.consume(&Token::Comma)?;
                let y = self.parse_expression()?;
                self.consume(&Token::RParen)?;
                self.eat_terminator();
                Ok(Stmt::MoveWindow { window, x, y, line })
            },
            _ => self.unexpected(),
        }
    }

    /// `FOCUS WINDOW w;`
    fn parse_focus_window(&mut self) -> ParseResult<Stmt> {
        let line = self.advance().1;
        self.consume(&Token::Window)?;
        let window = self.parse_expression()?;
        self.eat_terminator();
        Ok(Stmt::FocusWindow { window, line })
    }

    /// `HOLD KEY k;` or `RELEASE KEY k;`
    fn parse_key_operation(&mut self, action: KeyAction) -> ParseResult<Stmt> {
        let line = self.advance().1;
        self.consume(&Token::Key)?;
        let key = self.expect_keyboard_key()?;
        self.eat_terminator();
        Ok(Stmt::KeyOperation { action, key, line })
    }

    /// `PRESS KEY k;` or `PRESS BUTTON b;`
    fn parse_press(&mut self) -> ParseResult<Stmt> {
        let line = self.advance().1;

        match self.peek() {
            Token::Key => {
                self.advance();
                let key = self.expect_keyboard_key()?;
                self.eat_terminator();
                Ok(Stmt::KeyOperation { action: KeyAction::Press,
                                        key,
                                        line })
            },
            Token::Button => {
                self.advance();
                let button = self.expect_mouse_button()?;
                self.eat_terminator();
                Ok(Stmt::ButtonOperation { button, line })
            },
            _ => self.unexpected(),
        }
    }

    fn expect_keyboard_key(&mut self) -> ParseResult<String> {
        if let Token::KeyboardKey(_) = self.peek() {
            match self.advance().0 {
                Token::KeyboardKey(name) => Ok(name),
                _ => unreachable!(),
            }
        } else {
            self.unexpected()
        }
    }

    fn expect_mouse_button(&mut self) -> ParseResult<String> {
        if let Token::MouseButton(_) = self.peek() {
            match self.advance().0 {
                Token::MouseButton(name) => Ok(name),
                _ => unreachable!(),
            }
        } else {
            self.unexpected()
        }
    }

    /// `WHILE (cond) { body }`
    fn parse_while(&mut self) -> ParseResult<Stmt> {
        let line = self.advance().1;
        let condition = self.parse_condition()?;

        self.contexts.push(ContextKind::Loop);
        let body = self.parse_block();
        self.contexts.pop();

        self.eat_terminator();
        Ok(Stmt::While { condition,
                         body: body?,
                         line })
    }

    /// `REPEAT count TIMES { body }`
    fn parse_repeat(&mut self) -> ParseResult<Stmt> {
        let line = self.advance().1;
        let count = self.parse_expression()?;
        self.consume(&Token::Times)?;

        self.contexts.push(ContextKind::Loop);
        let body = self.parse_block();
        self.contexts.pop();

        self.eat_terminator();
        Ok(Stmt::Repeat { count,
                          body: body?,
                          line })
    }

    /// `IF (cond) [THEN] { } ELSEIF (cond) { } ... ELSE { }`
    ///
    /// `ELSE IF` is accepted as a synonym for `ELSEIF`.
    fn parse_if(&mut self) -> ParseResult<Stmt> {
        let line = self.advance().1;
        let condition = self.parse_condition()?;
        self.eat(&Token::Then);
        let then_body = self.parse_block()?;

        let mut else_ifs = Vec::new();
        let mut else_body = Vec::new();

        loop {
            if self.check(&Token::ElseIf) {
                self.advance();
            } else if self.check(&Token::Else) && *self.peek_at(1) == Token::If {
                self.advance();
                self.advance();
            } else if self.check(&Token::Else) {
                self.advance();
                else_body = self.parse_block()?;
                break;
            } else {
                break;
            }

            let condition = self.parse_condition()?;
            self.eat(&Token::Then);
            let body = self.parse_block()?;
            else_ifs.push(ElseIf { condition, body });
        }

        self.eat_terminator();
        Ok(Stmt::If { condition,
                      then_body,
                      else_ifs,
                      else_body,
                      line })
    }

    /// Parses a parenthesized condition.
    fn parse_condition(&mut self) -> ParseResult<Expr> {
        self.consume(&Token::LParen)?;
        let condition = self.parse_expression()?;
        self.consume(&Token::RParen)?;
        Ok(condition)
    }

    /// `RETURN [expr];`, `BREAK;`, `CONTINUE;`, `YIELD expr;` or `PASS;`
    ///
    /// Placement is validated here: loop controls need an enclosing loop,
    /// function controls need an enclosing function body.
    fn parse_control(&mut self) -> ParseResult<Stmt> {
        let (token, line) = self.advance();

        let (kind, value) = match token {
            Token::Break | Token::Continue => {
                let kind = if token == Token::Break {
                    ControlKind::Break
                } else {
                    ControlKind::Continue
                };
                if !self.in_loop() {
                    return Err(ParseError::ControlOutsideLoop { keyword: kind.to_string(),
                                                                line });
                }
                (kind, None)
            },
            Token::Return => {
                if !self.in_function() {
                    return Err(ParseError::ControlOutsideFunction { keyword: ControlKind::Return.to_string(),
                                                                    line });
                }
                let value = if matches!(self.peek(), Token::Terminator | Token::RBrace | Token::Eof) {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                (ControlKind::Return, value)
            },
            Token::Yield => {
                if !self.in_function() {
                    return Err(ParseError::ControlOutsideFunction { keyword: ControlKind::Yield.to_string(),
                                                                    line });
                }
                (ControlKind::Yield, Some(self.parse_expression()?))
            },
            Token::Pass => (ControlKind::Pass, None),
            _ => unreachable!("dispatched on a control token"),
        };

        self.eat_terminator();
        Ok(Stmt::Control { kind, value, line })
    }

    /// A bare expression evaluated for its effect, e.g. `f(1);` or `i++;`.
    fn parse_expression_statement(&mut self) -> ParseResult<Stmt> {
        let line = self.line();
        let expr = self.parse_expression()?;
        self.eat_terminator();
        Ok(Stmt::Expression { expr, line })
    }
}
