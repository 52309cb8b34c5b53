#[derive(Debug)]
/// Represents all errors that can occur during execution.
pub enum RuntimeError {
    /// Tried to read a name that is bound nowhere.
    UnknownIdentifier {
        /// The name of the identifier.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Called a name that resolves to no function or callable value.
    UnknownFunction {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Attempted to define a function that already exists.
    FunctionAlreadyDefined {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Incremented or decremented a variable that is bound nowhere.
    VariableNotFound {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Attempted division by zero.
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A value had an unexpected or incompatible type.
    TypeError {
        /// Details about the type mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A typed assignment could not convert the value to the declared type.
    InvalidCoercion {
        /// The kind of value that was assigned.
        found:  String,
        /// The declared type of the variable.
        target: String,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// Tried to use a fractional value where an integer was required.
    FractionalPart {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A function call left a parameter without a value.
    MissingArgument {
        /// The name of the unfilled parameter.
        parameter: String,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// A boolean value was expected, but not found.
    ExpectedBoolean {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A numeric value was expected, but not found.
    ExpectedNumber {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Applied a non-callable value as if it were a function.
    NotCallable {
        /// The kind of value that was applied.
        found: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// An expected value was missing (e.g., in an assignment or argument).
    MissingValue {
        /// The source line where the error occurred.
        line: usize,
    },
    /// The call stack grew past the allowed depth.
    RecursionLimit {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Referenced a window that does not exist.
    WindowNotFound {
        /// The title of the window.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Writing to the program output sink failed.
    OutputFailed {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Resumed a generator that is already running.
    GeneratorBusy {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Arithmetic operation overflowed.
    Overflow {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A value was too large to be converted safely.
    LiteralTooLarge {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A value was too small to be converted safely.
    LiteralTooSmall {
        /// The source line where the error occurred.
        line: usize,
    },
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownIdentifier { name, line } => {
                write!(f, "Error on line {line}: Unknown identifier '{name}'.")
            },
            Self::UnknownFunction { name, line } => {
                write!(f, "Error on line {line}: Unknown function '{name}'.")
            },
            Self::FunctionAlreadyDefined { name, line } => write!(f,
                                                                  "Error on line {line}: Function '{name}' is already defined."),
            Self::VariableNotFound { name, line } => {
                write!(f, "Error on line {line}: Variable '{name}' not found.")
            },
            Self::DivisionByZero { line } => write!(f, "Error on line {line}: Division by zero."),
            Self::TypeError { details, line } => {
                write!(f, "Error on line {line}: Type error: {details}.")
            },
            Self::InvalidCoercion { found, target, line } => write!(f,
                                                                    "Error on line {line}: Cannot assign {found} value to variable of type {target}."),
            Self::FractionalPart { line } => write!(f,
                                                    "Error on line {line}: Value is fractional and cannot be converted to an integer."),
            Self::MissingArgument { parameter, line } => write!(f,
                                                                "Error on line {line}: Missing argument for parameter '{parameter}'."),
            Self::ExpectedBoolean { line } => write!(f, "Error on line {line}: Expected boolean."),
            Self::ExpectedNumber { line } => write!(f, "Error on line {line}: Expected number."),
            Self::NotCallable { found, line } => {
                write!(f, "Error on line {line}: {found} value is not callable.")
            },
            Self::MissingValue { line } => write!(f, "Error on line {line}: Value missing."),
            Self::RecursionLimit { line } => {
                write!(f, "Error on line {line}: Maximum call depth exceeded.")
            },
            Self::WindowNotFound { name, line } => {
                write!(f, "Error on line {line}: Window '{name}' not found.")
            },
            Self::OutputFailed { line } => {
                write!(f, "Error on line {line}: Failed to write to the program output.")
            },
            Self::GeneratorBusy { line } => {
                write!(f, "Error on line {line}: Generator is already running.")
            },
            Self::Overflow { line } => write!(f,
                                              "Error on line {line}: Integer overflow while trying to compute result."),
            Self::LiteralTooLarge { line } => {
                write!(f, "Error on line {line}: Literal is too large.")
            },
            Self::LiteralTooSmall { line } => {
                write!(f, "Error on line {line}: Literal is too small.")
            },
        }
    }
}

impl std::error::Error for RuntimeError {}
