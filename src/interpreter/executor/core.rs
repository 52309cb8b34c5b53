use std::{collections::HashMap, io::Write, rc::Rc};

use crate::{
    ast::{ControlKind, Expr, FunctionDef, KeyAction, MouseTarget, Program, Stmt, TypeName,
          UpdateOp},
    error::RuntimeError,
    interpreter::{
        devices::{Clock, KeyboardManager, MouseManager, WindowManager},
        value::{Binding, Scope, Value},
    },
    util::num::f64_to_i64_checked,
};

/// The deepest the call stack may grow before a call fails.
pub const MAX_CALL_DEPTH: usize = 256;

/// Convenient result alias for all execution routines.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// A control signal travelling up from a control statement to the construct
/// that absorbs it. Signals are ordinary returned values, never unwinding.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// Leave the innermost loop.
    Break,
    /// Skip to the next iteration of the innermost loop.
    Continue,
    /// Leave the enclosing function, optionally with a value.
    Return(Option<Value>),
    /// Suspend the enclosing function with a produced value.
    Yield(Value),
}

/// The outcome of executing one statement: either a (possibly absent)
/// value, or a signal that the enclosing construct must handle.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Normal completion.
    Value(Option<Value>),
    /// A control signal on its way to a loop or function boundary.
    Signal(Signal),
}

/// The interpreter.
///
/// Owns all runtime state: the global scope, the call stack of function
/// scopes, the function registry, the device stubs, and the output sink
/// every `PRINT`/`PRINTLN` writes to.
pub struct Interpreter<'out> {
    /// Top-level variable bindings.
    pub globals:               Scope,
    pub(crate) call_stack:     Vec<Scope>,
    pub(crate) functions:      HashMap<String, Rc<FunctionDef>>,
    /// The window registry scripts operate on.
    pub windows:               WindowManager,
    /// The mouse stub.
    pub mouse:                 MouseManager,
    /// The keyboard stub.
    pub keyboard:              KeyboardManager,
    /// Virtual time accumulated by `WAIT`.
    pub clock:                 Clock,
    pub(crate) out:            &'out mut dyn Write,
}

impl<'out> Interpreter<'out> {
    /// Creates an interpreter writing program output to `out`.
    pub fn new(out: &'out mut dyn Write) -> Self {
        Self { globals: Scope::new(),
               call_stack: Vec::new(),
               functions: HashMap::new(),
               windows: WindowManager::default(),
               mouse: MouseManager::default(),
               keyboard: KeyboardManager::default(),
               clock: Clock::default(),
               out }
    }

    /// Names of every defined function, for hosts that parse follow-up
    /// programs against live interpreter state.
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    /// Runs a whole program.
    ///
    /// # Errors
    /// Returns the first [`RuntimeError`] raised by any statement.
    pub fn execute(&mut self, program: &Program) -> EvalResult<()> {
        for statement in &program.statements {
            if let Flow::Signal(_) = self.exec_statement(statement)? {
                // the parser rejects control statements outside their
                // constructs, so no signal can reach the program root
                unreachable!("control signal escaped the program root");
            }
        }
        Ok(())
    }

    /// Executes a single statement.
    ///
    /// # Errors
    /// Returns a [`RuntimeError`] if evaluation fails.
    pub fn exec_statement(&mut self, statement: &Stmt) -> EvalResult<Flow> {
        match statement {
            Stmt::Assignment { name,
                               declared_type,
                               value,
                               line, } => self.exec_assignment(name, *declared_type, value, *line),
            Stmt::FunctionDefinition(def) => self.exec_function_definition(def),
            Stmt::Print { expr, newline, line } => self.exec_print(expr, *newline, *line),
            Stmt::Wait { duration, line } => self.exec_wait(duration, *line),
            Stmt::MoveMouse { target, line } => self.exec_move_mouse(target, *line),
            Stmt::MoveWindow { window, x, y, line } => {
                self.exec_move_window(window, x, y, *line)
            },
            Stmt::FocusWindow { window, line } => self.exec_focus_window(window, *line),
            Stmt::KeyOperation { action, key, .. } => {
                match action {
                    KeyAction::Hold => self.keyboard.hold(key),
                    KeyAction::Release => self.keyboard.release(key),
                    KeyAction::Press => self.keyboard.press(key),
                }
                Ok(Flow::Value(None))
            },
            Stmt::ButtonOperation { button, .. } => {
                self.mouse.press(button);
                Ok(Flow::Value(None))
            },
            Stmt::While { condition, body, .. } => self.exec_while(condition, body),
            Stmt::Repeat { count, body, line } => self.exec_repeat(count, body, *line),
            Stmt::If { condition,
                       then_body,
                       else_ifs,
                       else_body,
                       .. } => self.exec_if(condition, then_body, else_ifs, else_body),
            Stmt::Control { kind, value, line } => {
                self.exec_control(*kind, value.as_ref(), *line)
            },
            Stmt::Expression { expr, .. } => Ok(Flow::Value(self.eval_expression(expr)?)),
            Stmt::Empty { .. } => Ok(Flow::Value(None)),
        }
    }

    /// Evaluates an expression. Calls of functions without a `RETURN` value
    /// complete without one, hence the `Option`.
    ///
    /// # Errors
    /// Returns a [`RuntimeError`] if evaluation fails.
    pub fn eval_expression(&mut self, expr: &Expr) -> EvalResult<Option<Value>> {
        match expr {
            Expr::Integer { value, .. } => Ok(Some(Value::Integer(*value))),
            Expr::Float { value, .. } => Ok(Some(Value::Float(*value))),
            Expr::Str { value, .. } => Ok(Some(Value::Str(value.clone()))),
            Expr::Bool { value, .. } => Ok(Some(Value::Bool(*value))),
            Expr::Time { seconds, .. } => Ok(Some(Value::Time(*seconds))),
            Expr::Identifier { name, line } => self.eval_identifier(name, *line).map(Some),
            Expr::BinaryOp { op, left, right, line } => {
                self.eval_binary_op(*op, left, right, *line)
            },
            Expr::FunctionCall { name, arguments, line } => {
                self.call_function(name, arguments, *line)
            },
            Expr::Lambda { parameters, body, .. } => Ok(Some(self.eval_lambda(parameters, body))),
            Expr::Point { x, y, line } => {
                let x = self.eval_value(x)?.as_number(*line)?;
                let y = self.eval_value(y)?.as_number(*line)?;
                Ok(Some(Value::Point { x, y }))
            },
            Expr::Update { name, op, prefix, line } => {
                self.eval_update(name, *op, *prefix, *line).map(Some)
            },
            Expr::WindowExists { window, line } => {
                let title = self.window_title(window, *line)?;
                Ok(Some(Value::Bool(self.windows.exists(&title))))
            },
        }
    }

    /// Evaluates an expression that must produce a value.
    pub(crate) fn eval_value(&mut self, expr: &Expr) -> EvalResult<Value> {
        let line = expr.line_number();
        self.eval_expression(expr)?
            .ok_or(RuntimeError::MissingValue { line })
    }

    /// Reads a binding: innermost call frame outward, then globals.
    pub(crate) fn lookup(&self, name: &str) -> Option<&Binding> {
        for scope in self.call_stack.iter().rev() {
            if let Some(binding) = scope.get(name) {
                return Some(binding);
            }
        }
        self.globals.get(name)
    }

    /// Mutable access to an existing binding, searched like [`Self::lookup`].
    pub(crate) fn binding_mut(&mut self, name: &str) -> Option<&mut Binding> {
        if let Some(index) = self.call_stack
                                 .iter()
                                 .rposition(|scope| scope.contains_key(name))
        {
            return self.call_stack[index].get_mut(name);
        }
        self.globals.get_mut(name)
    }

    fn current_scope_mut(&mut self) -> &mut Scope {
        match self.call_stack.last_mut() {
            Some(scope) => scope,
            None => &mut self.globals,
        }
    }

    fn eval_identifier(&mut self, name: &str, line: usize) -> EvalResult<Value> {
        if let Some(binding) = self.lookup(name) {
            return Ok(binding.value.clone());
        }
        // a bare function name evaluates to a reference into the registry
        if self.functions.contains_key(name) {
            return Ok(Value::FunctionRef(name.to_string()));
        }
        Err(RuntimeError::UnknownIdentifier { name: name.to_string(),
                                              line })
    }

    /// Assignment writes through to whichever scope already holds the
    /// binding; a fresh name is defined in the current scope. The declared
    /// type, whether from this statement or remembered on the binding, is
    /// re-validated against the new value.
    fn exec_assignment(&mut self,
                       name: &str,
                       declared_type: Option<TypeName>,
                       value: &Expr,
                       line: usize)
                       -> EvalResult<Flow> {
        let value = self.eval_value(value)?;
        let target_type =
            declared_type.or_else(|| self.lookup(name).and_then(|b| b.declared_type));
        let value = match target_type {
            Some(target) => value.coerce_to(target, line)?,
            None => value,
        };

        if let Some(binding) = self.binding_mut(name) {
            binding.value = value;
            if declared_type.is_some() {
                binding.declared_type = declared_type;
            }
        } else {
            self.current_scope_mut().insert(name.to_string(),
                                            Binding { value,
                                                      declared_type: target_type });
        }

        Ok(Flow::Value(None))
    }

    /// `++`/`--`. Prefix yields the updated value, postfix the original.
    fn eval_update(&mut self,
                   name: &str,
                   op: UpdateOp,
                   prefix: bool,
                   line: usize)
                   -> EvalResult<Value> {
        let Some(binding) = self.binding_mut(name) else {
            return Err(RuntimeError::VariableNotFound { name: name.to_string(),
                                                        line });
        };

        let old = binding.value.clone();
        let new = match (&old, op) {
            (Value::Integer(v), UpdateOp::Increment) => {
                Value::Integer(v.checked_add(1).ok_or(RuntimeError::Overflow { line })?)
            },
            (Value::Integer(v), UpdateOp::Decrement) => {
                Value::Integer(v.checked_sub(1).ok_or(RuntimeError::Overflow { line })?)
            },
            (Value::Float(v), UpdateOp::Increment) => Value::Float(v + 1.0),
            (Value::Float(v), UpdateOp::Decrement) => Value::Float(v - 1.0),
            _ => return Err(RuntimeError::ExpectedNumber { line }),
        };

        binding.value = new.clone();
        Ok(if prefix { new } else { old })
    }

    fn exec_print(&mut self, expr: &Expr, newline: bool, line: usize) -> EvalResult<Flow> {
        let value = self.eval_value(expr)?;
        let written = if newline {
            writeln!(self.out, "{value}")
        } else {
            write!(self.out, "{value}")
        };
        written.map_err(|_| RuntimeError::OutputFailed { line })?;
        Ok(Flow::Value(None))
    }

    fn exec_wait(&mut self, duration: &Expr, line: usize) -> EvalResult<Flow> {
        let seconds = self.eval_value(duration)?.as_number(line)?;
        self.clock.wait(seconds);
        Ok(Flow::Value(None))
    }

    fn exec_control(&mut self,
                    kind: ControlKind,
                    value: Option<&Expr>,
                    _line: usize)
                    -> EvalResult<Flow> {
        Ok(match kind {
               ControlKind::Break => Flow::Signal(Signal::Break),
               ControlKind::Continue => Flow::Signal(Signal::Continue),
               ControlKind::Return => {
                   let payload = match value {
                       Some(expr) => Some(self.eval_value(expr)?),
                       None => None,
                   };
                   Flow::Signal(Signal::Return(payload))
               },
               ControlKind::Yield => {
                   let Some(expr) = value else {
                       unreachable!("YIELD always carries a value")
                   };
                   Flow::Signal(Signal::Yield(self.eval_value(expr)?))
               },
               ControlKind::Pass => Flow::Value(None),
           })
    }

    /// Evaluates a coordinate expression to whole pixels.
    fn coordinate(&mut self, expr: &Expr, line: usize) -> EvalResult<i64> {
        let value = self.eval_value(expr)?.as_number(line)?;
        f64_to_i64_checked(value.round(), line)
    }

    fn exec_move_mouse(&mut self, target: &MouseTarget, line: usize) -> EvalResult<Flow> {
        match target {
            MouseTarget::Coordinates { x, y } => {
                let x = self.coordinate(x, line)?;
                let y = self.coordinate(y, line)?;
                self.mouse.move_to(x, y);
            },
            MouseTarget::Point(expr) => match self.eval_value(expr)? {
                Value::Point { x, y } => {
                    let x = f64_to_i64_checked(x.round(), line)?;
                    let y = f64_to_i64_checked(y.round(), line)?;
                    self.mouse.move_to(x, y);
                },
                other => {
                    return Err(RuntimeError::TypeError { details: format!("Cannot move mouse to {} value",
                                                                          other.kind_name()),
                                                         line })
                },
            },
        }
        Ok(Flow::Value(None))
    }

    fn exec_move_window(&mut self,
                        window: &Expr,
                        x: &Expr,
                        y: &Expr,
                        line: usize)
                        -> EvalResult<Flow> {
        let title = self.window_title(window, line)?;
        let x = self.coordinate(x, line)?;
        let y = self.coordinate(y, line)?;

        if self.windows.move_to(&title, x, y) {
            Ok(Flow::Value(None))
        } else {
            Err(RuntimeError::WindowNotFound { name: title, line })
        }
    }

    fn exec_focus_window(&mut self, window: &Expr, line: usize) -> EvalResult<Flow> {
        let title = self.window_title(window, line)?;

        if self.windows.focus(&title) {
            Ok(Flow::Value(None))
        } else {
            Err(RuntimeError::WindowNotFound { name: title, line })
        }
    }

    /// Evaluates a window title expression, which must produce a string.
    pub(crate) fn window_title(&mut self, expr: &Expr, line: usize) -> EvalResult<String> {
        match self.eval_value(expr)? {
            Value::Str(title) => Ok(title),
            other => Err(RuntimeError::TypeError { details: format!("Window title must be STR, found {}",
                                                                    other.kind_name()),
                                                   line }),
        }
    }
}
