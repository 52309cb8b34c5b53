use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
    ast::{Stmt, TypeName},
    error::RuntimeError,
    interpreter::executor::core::EvalResult,
    util::num::{f64_to_i64_checked, i64_to_f64_checked},
};

/// A runtime scope: variable names mapped to their bindings.
pub type Scope = HashMap<String, Binding>;

/// A variable binding: the current value plus the declared type, if the
/// variable was ever assigned with a type annotation. The declared type
/// survives re-assignment and is re-validated on every write.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// The current value.
    pub value:         Value,
    /// The remembered declared type.
    pub declared_type: Option<TypeName>,
}

impl Binding {
    /// A binding with no declared type.
    #[must_use]
    pub const fn untyped(value: Value) -> Self {
        Self { value,
               declared_type: None }
    }
}

/// An anonymous function value.
///
/// The captured scope is a by-value snapshot of everything visible at the
/// point the `LAMBDA` expression was evaluated; later mutation of the
/// originals is invisible here.
#[derive(Debug, Clone, PartialEq)]
pub struct Closure {
    /// Parameter names, in declaration order.
    pub parameters: Vec<String>,
    /// The statements of the body.
    pub body:       Rc<Vec<Stmt>>,
    /// The snapshot of bindings visible at creation.
    pub captured:   Scope,
}

/// The resumable state of a suspended function.
///
/// Created when a function body executes `YIELD`; each resume continues at
/// `cursor` with the saved local scope.
#[derive(Debug, PartialEq)]
pub struct GeneratorState {
    /// The full function body.
    pub body:    Rc<Vec<Stmt>>,
    /// Index of the next statement to run.
    pub cursor:  usize,
    /// The suspended local scope.
    pub scope:   Scope,
    /// A value already produced but not yet delivered.
    pub pending: Option<Value>,
    /// Whether the generator has finished.
    pub done:    bool,
}

/// Represents a value computed during execution.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating-point number.
    Float(f64),
    /// Text string.
    Str(String),
    /// Boolean.
    Bool(bool),
    /// Duration in seconds.
    Time(f64),
    /// Screen coordinate pair.
    Point {
        /// The x coordinate.
        x: f64,
        /// The y coordinate.
        y: f64,
    },
    /// An anonymous function with its captured scope.
    Closure(Rc<Closure>),
    /// A reference to a function in the global registry.
    FunctionRef(String),
    /// A suspended, resumable function.
    Generator(Rc<RefCell<GeneratorState>>),
}

impl Value {
    /// The kind of this value, as written in error messages and type
    /// annotations.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "INT",
            Self::Float(_) => "FLOAT",
            Self::Str(_) => "STR",
            Self::Bool(_) => "BOOL",
            Self::Time(_) => "TIME",
            Self::Point { .. } => "POINT",
            Self::Closure(_) | Self::FunctionRef(_) => "FUNCTION",
            Self::Generator(_) => "GENERATOR",
        }
    }

    /// Whether this value can be applied as a function.
    #[must_use]
    pub const fn is_callable(&self) -> bool {
        matches!(self, Self::Closure(_) | Self::FunctionRef(_))
    }

    /// Whether this value participates in numeric operations.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Float(_) | Self::Time(_))
    }

    /// Reads this value as an `f64`. Integers convert losslessly or fail;
    /// time values contribute their seconds.
    ///
    /// # Errors
    /// Returns `RuntimeError::ExpectedNumber` for non-numeric values.
    pub fn as_number(&self, line: usize) -> EvalResult<f64> {
        match self {
            Self::Integer(v) => i64_to_f64_checked(*v, line),
            Self::Float(v) | Self::Time(v) => Ok(*v),
            _ => Err(RuntimeError::ExpectedNumber { line }),
        }
    }

    /// Reads this value as a boolean.
    ///
    /// # Errors
    /// Returns `RuntimeError::ExpectedBoolean` for anything else.
    pub const fn as_bool(&self, line: usize) -> EvalResult<bool> {
        match self {
            Self::Bool(v) => Ok(*v),
            _ => Err(RuntimeError::ExpectedBoolean { line }),
        }
    }

    /// Converts this value to the declared type of a typed assignment.
    ///
    /// `INT` accepts integers, integral floats, numeric strings and
    /// booleans; `FLOAT` accepts integers and floats; `STR` stringifies
    /// anything; `BOOL` accepts booleans and `"TRUE"`/`"FALSE"` strings;
    /// `TIME` and `POINT` accept only their own kind.
    ///
    /// # Errors
    /// Returns `RuntimeError::FractionalPart` when a fractional float is
    /// assigned to an `INT` variable, and `RuntimeError::InvalidCoercion`
    /// for every other impossible conversion.
    ///
    /// # Example
    /// ```
    /// use mimic::{ast::TypeName, interpreter::value::Value};
    ///
    /// let coerced = Value::Float(7.0).coerce_to(TypeName::Int, 1).unwrap();
    /// assert_eq!(coerced, Value::Integer(7));
    ///
    /// assert!(Value::Float(2.5).coerce_to(TypeName::Int, 1).is_err());
    /// ```
    pub fn coerce_to(self, target: TypeName, line: usize) -> EvalResult<Self> {
        let found = self.kind_name();
        let invalid = || RuntimeError::InvalidCoercion { found:  found.to_string(),
                                                         target: target.to_string(),
                                                         line };

        match target {
            TypeName::Int => match self {
                Self::Integer(_) => Ok(self),
                Self::Float(v) => f64_to_i64_checked(v, line).map(Self::Integer),
                Self::Str(s) => s.trim().parse().map(Self::Integer).map_err(|_| invalid()),
                Self::Bool(b) => Ok(Self::Integer(i64::from(b))),
                _ => Err(invalid()),
            },
            TypeName::Float => match self {
                Self::Integer(v) => i64_to_f64_checked(v, line).map(Self::Float),
                Self::Float(_) => Ok(self),
                _ => Err(invalid()),
            },
            TypeName::Str => Ok(Self::Str(self.to_string())),
            TypeName::Bool => match self {
                Self::Bool(_) => Ok(self),
                Self::Str(s) if s.eq_ignore_ascii_case("TRUE") => Ok(Self::Bool(true)),
                Self::Str(s) if s.eq_ignore_ascii_case("FALSE") => Ok(Self::Bool(false)),
                _ => Err(invalid()),
            },
            TypeName::Time => match self {
                Self::Time(_) => Ok(self),
                _ => Err(invalid()),
            },
            TypeName::Point => match self {
                Self::Point { .. } => Ok(self),
                _ => Err(invalid()),
            },
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) | Self::Time(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
            Self::Bool(true) => write!(f, "TRUE"),
            Self::Bool(false) => write!(f, "FALSE"),
            Self::Point { x, y } => write!(f, "POINT({x}, {y})"),
            Self::Closure(c) => write!(f, "<lambda({})>", c.parameters.join(", ")),
            Self::FunctionRef(name) => write!(f, "<function {name}>"),
            Self::Generator(_) => write!(f, "<generator>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Value;
    use crate::ast::TypeName;

    #[test]
    fn booleans_display_as_keywords() {
        assert_eq!(Value::Bool(true).to_string(), "TRUE");
        assert_eq!(Value::Bool(false).to_string(), "FALSE");
    }

    #[test]
    fn int_coercion_accepts_strings_and_bools() {
        assert_eq!(Value::Str("42".to_string()).coerce_to(TypeName::Int, 1).unwrap(),
                   Value::Integer(42));
        assert_eq!(Value::Bool(true).coerce_to(TypeName::Int, 1).unwrap(),
                   Value::Integer(1));
        assert!(Value::Str("oops".to_string()).coerce_to(TypeName::Int, 1).is_err());
    }

    #[test]
    fn time_accepts_only_time() {
        assert!(Value::Integer(5).coerce_to(TypeName::Time, 1).is_err());
        assert_eq!(Value::Time(0.5).coerce_to(TypeName::Time, 1).unwrap(),
                   Value::Time(0.5));
    }

    #[test]
    fn str_coercion_stringifies() {
        assert_eq!(Value::Integer(7).coerce_to(TypeName::Str, 1).unwrap(),
                   Value::Str("7".to_string()));
        assert_eq!(Value::Bool(false).coerce_to(TypeName::Str, 1).unwrap(),
                   Value::Str("FALSE".to_string()));
    }
}
