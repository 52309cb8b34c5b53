use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
    ast::{Arg, FunctionDef, Stmt},
    error::RuntimeError,
    interpreter::{
        executor::core::{EvalResult, Flow, Interpreter, MAX_CALL_DEPTH, Signal},
        value::{Binding, Closure, GeneratorState, Scope, Value},
    },
};

/// How one resumption of a generator body ended.
enum Resumption {
    /// A `YIELD` produced a value; `next` is the statement to continue at.
    Yielded {
        value: Value,
        next:  usize,
    },
    /// A `RETURN` delivered the final value.
    Returned(Option<Value>),
    /// The body ran off its end.
    Finished,
}

impl Interpreter<'_> {
    /// `DEFUN`: registers the function, rejecting duplicates.
    pub(crate) fn exec_function_definition(&mut self, def: &FunctionDef) -> EvalResult<Flow> {
        if self.functions.contains_key(&def.name) {
            return Err(RuntimeError::FunctionAlreadyDefined { name: def.name.clone(),
                                                              line: def.line });
        }
        self.functions.insert(def.name.clone(), Rc::new(def.clone()));
        Ok(Flow::Value(None))
    }

    /// Calls a name. Resolution order: a callable bound in the current
    /// scope (the innermost call frame, or globals at the top level), the
    /// global function registry, then any callable visible on the call
    /// stack or in globals.
    pub(crate) fn call_function(&mut self,
                                name: &str,
                                arguments: &[Arg],
                                line: usize)
                                -> EvalResult<Option<Value>> {
        let local = self.call_stack
                        .last()
                        .unwrap_or(&self.globals)
                        .get(name)
                        .filter(|binding| binding.value.is_callable())
                        .map(|binding| binding.value.clone());
        if let Some(callee) = local {
            return self.call_value(callee, arguments, line);
        }

        if let Some(def) = self.functions.get(name).cloned() {
            return self.call_defined(&def, arguments, line);
        }

        let visible = self.lookup(name)
                          .filter(|binding| binding.value.is_callable())
                          .map(|binding| binding.value.clone());
        if let Some(callee) = visible {
            return self.call_value(callee, arguments, line);
        }

        Err(RuntimeError::UnknownFunction { name: name.to_string(),
                                            line })
    }

    /// Applies a callable value to an argument list. Closures take their
    /// arguments positionally; named arguments bind to `DEFUN` parameters
    /// only.
    fn call_value(&mut self,
                  callee: Value,
                  arguments: &[Arg],
                  line: usize)
                  -> EvalResult<Option<Value>> {
        match callee {
            Value::Closure(closure) => {
                let values = self.eval_positional_arguments(arguments, line)?;
                let bound = bind_values(&closure.parameters, values, line)?;
                let mut scope = closure.captured.clone();
                scope.extend(bound);
                self.run_call(scope, &closure.body, line, true)
            },
            Value::FunctionRef(name) => {
                let def = self.functions
                              .get(&name)
                              .cloned()
                              .ok_or_else(|| RuntimeError::UnknownFunction { name: name.clone(),
                                                                             line })?;
                self.call_defined(&def, arguments, line)
            },
            other => Err(RuntimeError::NotCallable { found: other.kind_name().to_string(),
                                                     line }),
        }
    }

    /// Applies a callable value to already-evaluated positional values.
    /// This is the call path of the `|>` operator.
    pub(crate) fn call_with_values(&mut self,
                                   callee: Value,
                                   values: Vec<Value>,
                                   line: usize)
                                   -> EvalResult<Option<Value>> {
        match callee {
            Value::Closure(closure) => {
                let bound = bind_values(&closure.parameters, values, line)?;
                let mut scope = closure.captured.clone();
                scope.extend(bound);
                self.run_call(scope, &closure.body, line, true)
            },
            Value::FunctionRef(name) => {
                let def = self.functions
                              .get(&name)
                              .cloned()
                              .ok_or_else(|| RuntimeError::UnknownFunction { name: name.clone(),
                                                                             line })?;
                let scope = bind_values(&def.parameters, values, line)?;
                self.run_call(scope, &def.body, line, false)
            },
            other => Err(RuntimeError::NotCallable { found: other.kind_name().to_string(),
                                                     line }),
        }
    }

    fn call_defined(&mut self,
                    def: &Rc<FunctionDef>,
                    arguments: &[Arg],
                    line: usize)
                    -> EvalResult<Option<Value>> {
        let scope = self.bind_arguments(&def.parameters, arguments, line)?;
        self.run_call(scope, &def.body, line, false)
    }

    /// Evaluates a closure argument list, which admits no named arguments.
    fn eval_positional_arguments(&mut self,
                                 arguments: &[Arg],
                                 line: usize)
                                 -> EvalResult<Vec<Value>> {
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            match argument {
                Arg::Positional(expr) => values.push(self.eval_value(expr)?),
                Arg::Named { name, .. } => {
                    return Err(RuntimeError::TypeError { details: format!("Closures take positional arguments only, found named argument '{name}'"),
                                                         line })
                },
            }
        }
        Ok(values)
    }

    /// Evaluates arguments in source order, then binds named arguments to
    /// their parameter slots and fills the rest positionally. Surplus
    /// positional arguments are ignored; an unfilled parameter is an error.
    fn bind_arguments(&mut self,
                      parameters: &[String],
                      arguments: &[Arg],
                      line: usize)
                      -> EvalResult<Scope> {
        let mut named: HashMap<String, Value> = HashMap::new();
        let mut positional = Vec::new();

        for argument in arguments {
            match argument {
                Arg::Named { name, value } => {
                    let value = self.eval_value(value)?;
                    named.insert(name.clone(), value);
                },
                Arg::Positional(expr) => positional.push(self.eval_value(expr)?),
            }
        }

        let mut positional = positional.into_iter();
        let mut scope = Scope::new();
        for parameter in parameters {
            let value = named.remove(parameter)
                             .or_else(|| positional.next())
                             .ok_or_else(|| RuntimeError::MissingArgument { parameter: parameter.clone(),
                                                                            line })?;
            scope.insert(parameter.clone(), Binding::untyped(value));
        }

        Ok(scope)
    }

    /// Pushes a call frame, runs the body, and always pops the frame.
    fn run_call(&mut self,
                scope: Scope,
                body: &[Stmt],
                line: usize,
                implicit_result: bool)
                -> EvalResult<Option<Value>> {
        if self.call_stack.len() >= MAX_CALL_DEPTH {
            return Err(RuntimeError::RecursionLimit { line });
        }

        self.call_stack.push(scope);
        let result = self.run_body(body, implicit_result);
        self.call_stack.pop();
        result
    }

    /// Runs a function body from the top. A `RETURN` ends the call with its
    /// payload; a `YIELD` suspends the call into a generator value. With
    /// `implicit_result`, a body that falls off its end yields the last
    /// value a statement produced (closure semantics).
    fn run_body(&mut self, body: &[Stmt], implicit_result: bool) -> EvalResult<Option<Value>> {
        let mut last = None;
        let mut index = 0;

        while index < body.len() {
            match self.exec_statement(&body[index])? {
                Flow::Value(value) => {
                    if value.is_some() {
                        last = value;
                    }
                },
                Flow::Signal(Signal::Return(value)) => return Ok(value),
                Flow::Signal(Signal::Yield(value)) => {
                    let scope = self.call_stack.last().cloned().unwrap_or_default();
                    let state = GeneratorState { body:    Rc::new(body.to_vec()),
                                                 cursor:  index + 1,
                                                 scope,
                                                 pending: Some(value),
                                                 done:    false, };
                    return Ok(Some(Value::Generator(Rc::new(RefCell::new(state)))));
                },
                // the parser confines BREAK/CONTINUE to loops
                Flow::Signal(_) => unreachable!("loop signal escaped a function body"),
            }
            index += 1;
        }

        Ok(if implicit_result { last } else { None })
    }

    /// `LAMBDA`: captures a by-value snapshot of every binding visible at
    /// this point, inner scopes overriding outer ones.
    pub(crate) fn eval_lambda(&mut self, parameters: &[String], body: &[Stmt]) -> Value {
        let mut captured = self.globals.clone();
        for scope in &self.call_stack {
            captured.extend(scope.clone());
        }

        Value::Closure(Rc::new(Closure { parameters: parameters.to_vec(),
                                         body: Rc::new(body.to_vec()),
                                         captured }))
    }

    /// Resumes a suspended generator.
    ///
    /// Each resume runs the saved body from the saved cursor with the saved
    /// scope, until the next `YIELD` (produces a value), a `RETURN` (final
    /// value, generator done) or the end of the body (done, no value).
    /// The value yielded at suspension time is delivered by the first
    /// resume.
    ///
    /// # Errors
    /// Returns `RuntimeError::TypeError` when the value is not a generator
    /// and `RuntimeError::GeneratorBusy` when the generator is already
    /// running.
    pub fn resume_generator(&mut self,
                            generator: &Value,
                            line: usize)
                            -> EvalResult<Option<Value>> {
        let Value::Generator(cell) = generator else {
            return Err(RuntimeError::TypeError { details: format!("Expected GENERATOR, found {}",
                                                                  generator.kind_name()),
                                                 line });
        };

        let mut state = cell.try_borrow_mut()
                            .map_err(|_| RuntimeError::GeneratorBusy { line })?;
        if state.done {
            return Ok(None);
        }
        if let Some(value) = state.pending.take() {
            return Ok(Some(value));
        }

        if self.call_stack.len() >= MAX_CALL_DEPTH {
            return Err(RuntimeError::RecursionLimit { line });
        }

        let body = Rc::clone(&state.body);
        self.call_stack.push(std::mem::take(&mut state.scope));
        let outcome = self.resume_body(&body, state.cursor);
        state.scope = self.call_stack.pop().unwrap_or_default();

        match outcome? {
            Resumption::Yielded { value, next } => {
                state.cursor = next;
                Ok(Some(value))
            },
            Resumption::Returned(value) => {
                state.done = true;
                Ok(value)
            },
            Resumption::Finished => {
                state.done = true;
                Ok(None)
            },
        }
    }

    fn resume_body(&mut self, body: &[Stmt], start: usize) -> EvalResult<Resumption> {
        let mut index = start;
        while index < body.len() {
            match self.exec_statement(&body[index])? {
                Flow::Value(_) => {},
                Flow::Signal(Signal::Return(value)) => return Ok(Resumption::Returned(value)),
                Flow::Signal(Signal::Yield(value)) => {
                    return Ok(Resumption::Yielded { value,
                                                    next: index + 1 })
                },
                Flow::Signal(_) => unreachable!("loop signal escaped a generator body"),
            }
            index += 1;
        }
        Ok(Resumption::Finished)
    }
}

/// Zips positional values onto parameters.
fn bind_values(parameters: &[String], values: Vec<Value>, line: usize) -> EvalResult<Scope> {
    let mut values = values.into_iter();
    let mut scope = Scope::new();

    for parameter in parameters {
        let value = values.next()
                          .ok_or_else(|| RuntimeError::MissingArgument { parameter: parameter.clone(),
                                                                         line })?;
        scope.insert(parameter.clone(), Binding::untyped(value));
    }

    Ok(scope)
}
