/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of source
/// code. Parse errors include syntax mistakes, unexpected tokens, invalid
/// literals, misplaced control statements, and references to names that were
/// never declared.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during execution. Runtime
/// errors include things like division by zero, type mismatches, failed typed
/// assignments, missing arguments, and exhausted call depth.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
