use crate::{
    ast::{BinaryOperator, Expr},
    error::RuntimeError,
    interpreter::{
        executor::core::{EvalResult, Interpreter},
        value::Value,
    },
    util::num::{i64_to_f64_checked, i64_to_u32_checked},
};

impl Interpreter<'_> {
    /// Evaluates a binary operation.
    ///
    /// `|>` is special-cased before operand dispatch: it applies the right
    /// operand, which must be callable, to the left value.
    pub(crate) fn eval_binary_op(&mut self,
                                 op: BinaryOperator,
                                 left: &Expr,
                                 right: &Expr,
                                 line: usize)
                                 -> EvalResult<Option<Value>> {
        if op == BinaryOperator::Pipe {
            let value = self.eval_value(left)?;
            let callee = self.eval_value(right)?;
            return self.call_with_values(callee, vec![value], line);
        }

        let left = self.eval_value(left)?;
        let right = self.eval_value(right)?;
        Self::eval_binary_values(op, &left, &right, line).map(Some)
    }

    /// Applies a binary operator to two already-evaluated values.
    ///
    /// # Errors
    /// Returns `RuntimeError::DivisionByZero` for zero divisors,
    /// `RuntimeError::Overflow` for overflowing integer arithmetic, and
    /// `RuntimeError::TypeError` for operand kinds the operator does not
    /// accept.
    ///
    /// # Example
    /// ```
    /// use mimic::{ast::BinaryOperator, interpreter::{executor::Interpreter, value::Value}};
    ///
    /// let result = Interpreter::eval_binary_values(BinaryOperator::Div,
    ///                                              &Value::Integer(10),
    ///                                              &Value::Integer(4),
    ///                                              1).unwrap();
    /// assert_eq!(result, Value::Float(2.5));
    /// ```
    pub fn eval_binary_values(op: BinaryOperator,
                              left: &Value,
                              right: &Value,
                              line: usize)
                              -> EvalResult<Value> {
        use BinaryOperator::{Add, And, BitAnd, BitOr, BitXor, Div, Equal, FloorDiv, Greater,
                             GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or, Pipe, Pow,
                             ShiftLeft, ShiftRight, StrictEqual, StrictNotEqual, Sub};

        match op {
            Add | Sub | Mul | Div | FloorDiv | Mod | Pow => {
                Self::eval_arithmetic(op, left, right, line)
            },
            Equal | NotEqual | StrictEqual | StrictNotEqual => {
                Self::eval_equality(op, left, right, line)
            },
            Less | Greater | LessEqual | GreaterEqual => {
                Self::eval_relational(op, left, right, line)
            },
            And | Or => {
                let l = left.as_bool(line)?;
                let r = right.as_bool(line)?;
                Ok(Value::Bool(match op {
                                   And => l && r,
                                   Or => l || r,
                                   _ => unreachable!(),
                               }))
            },
            BitAnd | BitOr | BitXor | ShiftLeft | ShiftRight => {
                Self::eval_bitwise(op, left, right, line)
            },
            Pipe => unreachable!("pipe is handled before operand dispatch"),
        }
    }

    /// Integer pairs stay integer with checked arithmetic; any float or
    /// time operand promotes the operation to floats. `/` always produces
    /// a float, `//` floors, `%` is the floored remainder.
    fn eval_arithmetic(op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       line: usize)
                       -> EvalResult<Value> {
        use BinaryOperator::{Add, Div, FloorDiv, Mod, Mul, Pow, Sub};
        use Value::{Float, Integer, Str};

        // string concatenation wins if either side is text
        if op == Add && (matches!(left, Str(_)) || matches!(right, Str(_))) {
            return Ok(Str(format!("{left}{right}")));
        }

        match (left, right) {
            (Integer(a), Integer(b)) => match op {
                Add => a.checked_add(*b)
                        .map(Integer)
                        .ok_or(RuntimeError::Overflow { line }),
                Sub => a.checked_sub(*b)
                        .map(Integer)
                        .ok_or(RuntimeError::Overflow { line }),
                Mul => a.checked_mul(*b)
                        .map(Integer)
                        .ok_or(RuntimeError::Overflow { line }),
                Div => {
                    if *b == 0 {
                        return Err(RuntimeError::DivisionByZero { line });
                    }
                    Ok(Float(i64_to_f64_checked(*a, line)? / i64_to_f64_checked(*b, line)?))
                },
                FloorDiv => {
                    if *b == 0 {
                        return Err(RuntimeError::DivisionByZero { line });
                    }
                    let quotient = a.checked_div(*b).ok_or(RuntimeError::Overflow { line })?;
                    let remainder = a % b;
                    // round toward negative infinity, like the float path
                    Ok(Integer(if remainder != 0 && (remainder < 0) != (*b < 0) {
                                   quotient - 1
                               } else {
                                   quotient
                               }))
                },
                Mod => {
                    if *b == 0 {
                        return Err(RuntimeError::DivisionByZero { line });
                    }
                    let remainder = a.checked_rem(*b).ok_or(RuntimeError::Overflow { line })?;
                    // floored remainder takes the sign of the divisor
                    Ok(Integer(if remainder != 0 && (remainder < 0) != (*b < 0) {
                                   remainder + b
                               } else {
                                   remainder
                               }))
                },
                Pow => {
                    if *b >= 0 {
                        let exponent = i64_to_u32_checked(*b, line)?;
                        a.checked_pow(exponent)
                         .map(Integer)
                         .ok_or(RuntimeError::Overflow { line })
                    } else {
                        let base = i64_to_f64_checked(*a, line)?;
                        let exponent = i64_to_f64_checked(*b, line)?;
                        Ok(Float(base.powf(exponent)))
                    }
                },
                _ => unreachable!(),
            },
            _ if left.is_numeric() && right.is_numeric() => {
                let l = left.as_number(line)?;
                let r = right.as_number(line)?;

                match op {
                    Add => Ok(Float(l + r)),
                    Sub => Ok(Float(l - r)),
                    Mul => Ok(Float(l * r)),
                    Div => {
                        if r == 0.0 {
                            return Err(RuntimeError::DivisionByZero { line });
                        }
                        Ok(Float(l / r))
                    },
                    FloorDiv => {
                        if r == 0.0 {
                            return Err(RuntimeError::DivisionByZero { line });
                        }
                        Ok(Float((l / r).floor()))
                    },
                    Mod => {
                        if r == 0.0 {
                            return Err(RuntimeError::DivisionByZero { line });
                        }
                        Ok(Float(l - r * (l / r).floor()))
                    },
                    Pow => Ok(Float(l.powf(r))),
                    _ => unreachable!(),
                }
            },
            _ => Err(RuntimeError::TypeError { details: format!("Invalid operands: {} {op} {}",
                                                                left.kind_name(),
                                                                right.kind_name()),
                                               line }),
        }
    }

    /// `==`/`!=` compare across numeric kinds and answer `false` (never
    /// error) for mismatched kinds. `===`/`!==` additionally require the
    /// same kind.
    #[allow(clippy::float_cmp)]
    fn eval_equality(op: BinaryOperator,
                     left: &Value,
                     right: &Value,
                     line: usize)
                     -> EvalResult<Value> {
        use BinaryOperator::{Equal, StrictEqual};

        let strict = matches!(op, StrictEqual | BinaryOperator::StrictNotEqual);
        let same_kind = std::mem::discriminant(left) == std::mem::discriminant(right);

        let equal = if strict || same_kind {
            left == right
        } else if left.is_numeric() && right.is_numeric() {
            left.as_number(line)? == right.as_number(line)?
        } else {
            false
        };

        Ok(Value::Bool(match op {
                           Equal | StrictEqual => equal,
                           _ => !equal,
                       }))
    }

    /// Relational operators accept two numbers or two strings.
    fn eval_relational(op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       line: usize)
                       -> EvalResult<Value> {
        use BinaryOperator::{Greater, GreaterEqual, Less, LessEqual};

        if let (Value::Str(a), Value::Str(b)) = (left, right) {
            return Ok(Value::Bool(match op {
                                      Less => a < b,
                                      Greater => a > b,
                                      LessEqual => a <= b,
                                      GreaterEqual => a >= b,
                                      _ => unreachable!(),
                                  }));
        }

        if left.is_numeric() && right.is_numeric() {
            let l = left.as_number(line)?;
            let r = right.as_number(line)?;
            return Ok(Value::Bool(match op {
                                      Less => l < r,
                                      Greater => l > r,
                                      LessEqual => l <= r,
                                      GreaterEqual => l >= r,
                                      _ => unreachable!(),
                                  }));
        }

        Err(RuntimeError::TypeError { details: format!("Cannot compare {} with {}",
                                                       left.kind_name(),
                                                       right.kind_name()),
                                      line })
    }

    /// Bitwise and shift operators require two integers; shifts are
    /// checked.
    fn eval_bitwise(op: BinaryOperator,
                    left: &Value,
                    right: &Value,
                    line: usize)
                    -> EvalResult<Value> {
        use BinaryOperator::{BitAnd, BitOr, BitXor, ShiftLeft, ShiftRight};
        use Value::Integer;

        match (left, right) {
            (Integer(a), Integer(b)) => match op {
                BitAnd => Ok(Integer(a & b)),
                BitOr => Ok(Integer(a | b)),
                BitXor => Ok(Integer(a ^ b)),
                ShiftLeft => {
                    let amount = i64_to_u32_checked(*b, line)?;
                    a.checked_shl(amount)
                     .map(Integer)
                     .ok_or(RuntimeError::Overflow { line })
                },
                ShiftRight => {
                    let amount = i64_to_u32_checked(*b, line)?;
                    a.checked_shr(amount)
                     .map(Integer)
                     .ok_or(RuntimeError::Overflow { line })
                },
                _ => unreachable!(),
            },
            _ => Err(RuntimeError::TypeError { details: format!("Bitwise operators require INT operands, found {} {op} {}",
                                                                left.kind_name(),
                                                                right.kind_name()),
                                               line }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_division_always_produces_a_float() {
        let result =
            Interpreter::eval_binary_values(BinaryOperator::Div, &Value::Integer(10), &Value::Integer(2), 1).unwrap();
        assert_eq!(result, Value::Float(5.0));
    }

    #[test]
    fn floor_division_of_integers_stays_integer() {
        let result =
            Interpreter::eval_binary_values(BinaryOperator::FloorDiv, &Value::Integer(10), &Value::Integer(3), 1).unwrap();
        assert_eq!(result, Value::Integer(3));
    }

    #[test]
    fn floor_division_rounds_toward_negative_infinity() {
        let ints =
            Interpreter::eval_binary_values(BinaryOperator::FloorDiv, &Value::Integer(-7), &Value::Integer(-2), 1).unwrap();
        assert_eq!(ints, Value::Integer(3));

        let floats =
            Interpreter::eval_binary_values(BinaryOperator::FloorDiv, &Value::Float(-7.0), &Value::Float(-2.0), 1).unwrap();
        assert_eq!(floats, Value::Float(3.0));
    }

    #[test]
    fn modulo_takes_the_sign_of_the_divisor() {
        let positive_divisor =
            Interpreter::eval_binary_values(BinaryOperator::Mod, &Value::Integer(-7), &Value::Integer(3), 1).unwrap();
        assert_eq!(positive_divisor, Value::Integer(2));

        let negative_divisor =
            Interpreter::eval_binary_values(BinaryOperator::Mod, &Value::Integer(7), &Value::Integer(-3), 1).unwrap();
        assert_eq!(negative_divisor, Value::Integer(-2));

        let floats =
            Interpreter::eval_binary_values(BinaryOperator::Mod, &Value::Float(7.0), &Value::Float(-3.0), 1).unwrap();
        assert_eq!(floats, Value::Float(-2.0));
    }

    #[test]
    fn division_by_zero_is_rejected() {
        let result =
            Interpreter::eval_binary_values(BinaryOperator::Div, &Value::Integer(1), &Value::Integer(0), 1);
        assert!(matches!(result, Err(RuntimeError::DivisionByZero { line: 1 })));
    }

    #[test]
    fn string_concatenation_wins_over_numeric_addition() {
        let result = Interpreter::eval_binary_values(BinaryOperator::Add,
                                                     &Value::Str("n = ".to_string()),
                                                     &Value::Integer(4),
                                                     1).unwrap();
        assert_eq!(result, Value::Str("n = 4".to_string()));
    }

    #[test]
    fn loose_equality_crosses_numeric_kinds_strict_does_not() {
        let loose = Interpreter::eval_binary_values(BinaryOperator::Equal,
                                                    &Value::Integer(1),
                                                    &Value::Float(1.0),
                                                    1).unwrap();
        assert_eq!(loose, Value::Bool(true));

        let strict = Interpreter::eval_binary_values(BinaryOperator::StrictEqual,
                                                     &Value::Integer(1),
                                                     &Value::Float(1.0),
                                                     1).unwrap();
        assert_eq!(strict, Value::Bool(false));
    }

    #[test]
    fn mismatched_kinds_are_unequal_not_an_error() {
        let result = Interpreter::eval_binary_values(BinaryOperator::Equal,
                                                     &Value::Integer(1),
                                                     &Value::Str("1".to_string()),
                                                     1).unwrap();
        assert_eq!(result, Value::Bool(false));
    }

    #[test]
    fn integer_power_is_checked() {
        let result =
            Interpreter::eval_binary_values(BinaryOperator::Pow, &Value::Integer(10), &Value::Integer(3), 1).unwrap();
        assert_eq!(result, Value::Integer(1000));

        let overflow =
            Interpreter::eval_binary_values(BinaryOperator::Pow, &Value::Integer(10), &Value::Integer(100), 1);
        assert!(matches!(overflow, Err(RuntimeError::Overflow { line: 1 })));
    }

    #[test]
    fn time_values_participate_as_seconds() {
        let result =
            Interpreter::eval_binary_values(BinaryOperator::Add, &Value::Time(0.5), &Value::Time(2.0), 1).unwrap();
        assert_eq!(result, Value::Float(2.5));
    }
}
