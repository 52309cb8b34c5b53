use crate::{
    ast::{ElseIf, Expr, Stmt},
    interpreter::{
        executor::core::{EvalResult, Flow, Interpreter, Signal},
        value::Value,
    },
    util::num::f64_to_i64_checked,
    error::RuntimeError,
};

/// What one pass over a loop body asks the loop to do next.
enum LoopFlow {
    /// Run the next iteration (the body completed or hit `CONTINUE`).
    Normal,
    /// Leave the loop.
    Break,
    /// Forward a `RETURN`/`YIELD` signal to the enclosing function.
    Propagate(Signal),
}

impl Interpreter<'_> {
    /// Runs a statement sequence, stopping at the first control signal.
    ///
    /// The returned `Flow::Value` carries the last value any statement in
    /// the sequence produced; closure bodies use it as their implicit
    /// result.
    pub(crate) fn exec_block(&mut self, statements: &[Stmt]) -> EvalResult<Flow> {
        let mut last = None;
        for statement in statements {
            match self.exec_statement(statement)? {
                Flow::Value(value) => {
                    if value.is_some() {
                        last = value;
                    }
                },
                signal @ Flow::Signal(_) => return Ok(signal),
            }
        }
        Ok(Flow::Value(last))
    }

    /// `IF`/`ELSEIF`/`ELSE`. Conditions must be booleans; the first arm
    /// whose condition holds runs, signals from the arm propagate.
    pub(crate) fn exec_if(&mut self,
                          condition: &Expr,
                          then_body: &[Stmt],
                          else_ifs: &[ElseIf],
                          else_body: &[Stmt])
                          -> EvalResult<Flow> {
        if self.eval_condition(condition)? {
            return self.exec_block(then_body);
        }

        for arm in else_ifs {
            if self.eval_condition(&arm.condition)? {
                return self.exec_block(&arm.body);
            }
        }

        self.exec_block(else_body)
    }

    /// `WHILE (cond) { body }`. `BREAK` and `CONTINUE` are absorbed here;
    /// `RETURN` and `YIELD` pass through to the function boundary.
    pub(crate) fn exec_while(&mut self, condition: &Expr, body: &[Stmt]) -> EvalResult<Flow> {
        loop {
            if !self.eval_condition(condition)? {
                break;
            }
            match self.run_loop_body(body)? {
                LoopFlow::Normal => {},
                LoopFlow::Break => break,
                LoopFlow::Propagate(signal) => return Ok(Flow::Signal(signal)),
            }
        }
        Ok(Flow::Value(None))
    }

    /// `REPEAT n TIMES { body }`. The count is evaluated once; a fractional
    /// count truncates and a negative count runs zero iterations.
    pub(crate) fn exec_repeat(&mut self,
                              count: &Expr,
                              body: &[Stmt],
                              line: usize)
                              -> EvalResult<Flow> {
        let iterations = self.iteration_count(count, line)?;
        for _ in 0..iterations {
            match self.run_loop_body(body)? {
                LoopFlow::Normal => {},
                LoopFlow::Break => break,
                LoopFlow::Propagate(signal) => return Ok(Flow::Signal(signal)),
            }
        }
        Ok(Flow::Value(None))
    }

    fn eval_condition(&mut self, condition: &Expr) -> EvalResult<bool> {
        let line = condition.line_number();
        self.eval_value(condition)?.as_bool(line)
    }

    fn iteration_count(&mut self, count: &Expr, line: usize) -> EvalResult<i64> {
        let iterations = match self.eval_value(count)? {
            Value::Integer(v) => v,
            Value::Float(v) => f64_to_i64_checked(v.trunc(), line)?,
            _ => return Err(RuntimeError::ExpectedNumber { line }),
        };
        Ok(iterations.max(0))
    }

    fn run_loop_body(&mut self, body: &[Stmt]) -> EvalResult<LoopFlow> {
        for statement in body {
            match self.exec_statement(statement)? {
                Flow::Value(_) => {},
                Flow::Signal(Signal::Break) => return Ok(LoopFlow::Break),
                Flow::Signal(Signal::Continue) => return Ok(LoopFlow::Normal),
                Flow::Signal(signal) => return Ok(LoopFlow::Propagate(signal)),
            }
        }
        Ok(LoopFlow::Normal)
    }
}
