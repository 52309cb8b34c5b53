#[derive(Debug)]
/// Represents all errors that can occur during lexing or parsing.
pub enum ParseError {
    /// The lexer found a character that starts no token.
    UnexpectedCharacter {
        /// The offending source text.
        found: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A numeric literal could not be represented.
    InvalidNumber {
        /// The literal as written.
        literal: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Found an unexpected token while parsing.
    UnexpectedToken {
        /// The token encountered.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Reached the end of input unexpectedly.
    UnexpectedEndOfInput {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Referenced a variable that was never declared.
    UndefinedVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Called a function that is neither defined nor bound to a variable.
    UndefinedFunction {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A type annotation named an unknown type.
    InvalidType {
        /// The type name as written.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// `BREAK` or `CONTINUE` appeared outside of any loop.
    ControlOutsideLoop {
        /// The control keyword as written.
        keyword: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// `RETURN` or `YIELD` appeared outside of any function body.
    ControlOutsideFunction {
        /// The control keyword as written.
        keyword: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A keyword is reserved for future use and cannot be parsed yet.
    ReservedKeyword {
        /// The reserved word.
        word: String,
        /// The source line where the error occurred.
        line: usize,
    },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedCharacter { found, line } => {
                write!(f, "Error on line {line}: Unexpected character: {found}.")
            },

            Self::InvalidNumber { literal, line } => write!(f,
                                                            "Error on line {line}: Numeric literal '{literal}' cannot be represented."),

            Self::UnexpectedToken { token, line } => {
                write!(f, "Error on line {line}: Unexpected token: {token}.")
            },

            Self::UnexpectedEndOfInput { line } => {
                write!(f, "Error on line {line}: Unexpected end of input.")
            },

            Self::UndefinedVariable { name, line } => {
                write!(f, "Error on line {line}: Undefined variable '{name}'.")
            },

            Self::UndefinedFunction { name, line } => {
                write!(f, "Error on line {line}: Undefined function '{name}'.")
            },

            Self::InvalidType { name, line } => {
                write!(f, "Error on line {line}: Unknown type '{name}'.")
            },

            Self::ControlOutsideLoop { keyword, line } => write!(f,
                                                                 "Error on line {line}: '{keyword}' is only allowed inside a loop."),

            Self::ControlOutsideFunction { keyword, line } => write!(f,
                                                                     "Error on line {line}: '{keyword}' is only allowed inside a function."),

            Self::ReservedKeyword { word, line } => write!(f,
                                                           "Error on line {line}: '{word}' is reserved and not available yet."),
        }
    }
}

impl std::error::Error for ParseError {}
