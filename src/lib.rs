//! # mimic
//!
//! mimic is an interpreter for a small statement-oriented scripting language
//! for desktop automation. Scripts set variables, define functions and
//! generators, branch and loop, and drive simulated keyboard, mouse and
//! window devices.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::io::Write;

use crate::{
    ast::Program,
    error::ParseError,
    interpreter::{executor::Interpreter, lexer::tokenize, parser::Parser},
};

/// Defines the structure of parsed code.
///
/// This module declares the `Stmt` and `Expr` enums and related types that
/// represent the syntactic structure of source code as a tree. The AST is
/// built by the parser and traversed by the executor.
///
/// # Responsibilities
/// - Defines statement and expression types for all language constructs.
/// - Attaches source line numbers to AST nodes for error reporting.
/// - Keeps operators, type names and control keywords as closed enums.
pub mod ast;
/// Provides unified error types for parsing and execution.
///
/// This module defines all errors that can be raised during lexing, parsing,
/// or executing code. It standardizes error reporting and carries detailed
/// information about failures, including error kinds, descriptions, and
/// source locations for debugging and user feedback.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, executor).
/// - Attaches line numbers and detailed messages for context.
/// - Supports integration with standard error handling traits and reporting
///   utilities.
pub mod error;
/// Orchestrates the entire process of script execution.
///
/// This module ties together lexing, parsing, execution, value
/// representations, the simulated devices, and error handling to provide a
/// complete runtime for automation scripts. It exposes the public API for
/// interpreting and executing programs.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, executor, and values.
/// - Provides entry points for parsing and executing user scripts.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// General utilities for safe numeric conversion.
///
/// This module provides reusable conversion routines used throughout the
/// lexer, executor, and value types. These include safe conversions between
/// integer and floating-point types without silent data loss.
pub mod util;

/// Parses a source string into a [`Program`].
///
/// # Errors
/// Returns a [`ParseError`] if the source cannot be tokenized or parsed.
///
/// # Examples
/// ```
/// use mimic::parse_program;
///
/// let program = parse_program("SET x = 1; PRINTLN x;").unwrap();
/// assert_eq!(program.statements.len(), 2);
///
/// // 'y' is never declared
/// assert!(parse_program("PRINTLN y;").is_err());
/// ```
pub fn parse_program(source: &str) -> Result<Program, ParseError> {
    let tokens = tokenize(source)?;
    Parser::new(tokens).parse()
}

/// Parses and executes a whole script, writing program output to `out`.
///
/// # Errors
/// Returns the first parse or runtime error the script raises.
///
/// # Examples
/// ```
/// use mimic::run_script;
///
/// let mut out = Vec::new();
/// run_script("SET greeting = \"hello\"; PRINTLN greeting;", &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "hello\n");
///
/// let mut out = Vec::new();
/// let result = run_script("SET x = 1 / 0;", &mut out);
/// assert!(result.is_err());
/// ```
pub fn run_script(source: &str, out: &mut dyn Write) -> Result<(), Box<dyn std::error::Error>> {
    let program = parse_program(source)?;
    let mut interpreter = Interpreter::new(out);
    interpreter.execute(&program)?;
    Ok(())
}
