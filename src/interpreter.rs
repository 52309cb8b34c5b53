/// Converts raw source text into tokens.
///
/// This module is the first phase of the pipeline. Each token carries its
/// value and the line it was read from, so that later phases can report
/// precise error locations. Time literals are normalized to seconds here,
/// and keyboard-key words are reclassified as identifiers unless they follow
/// the `KEY` keyword.
pub mod lexer;

/// Builds the syntax tree from the token stream.
///
/// This module implements statement dispatch and precedence-climbing
/// expression parsing, and performs compile-time validation: undeclared
/// names, unknown types, and misplaced control statements are rejected
/// before anything runs.
pub mod parser;

/// Walks the syntax tree and runs the program.
///
/// This module owns all runtime state: the global scope, the call stack,
/// the function registry, and the device stubs. Control signals (`BREAK`,
/// `CONTINUE`, `RETURN`, `YIELD`) travel as ordinary returned values, never
/// by unwinding.
pub mod executor;

/// Runtime value representation.
///
/// Defines the `Value` enum, the `Binding` record stored in scopes, typed
/// assignment coercions, and the closure and generator state records.
pub mod value;

/// Headless device stubs.
///
/// In-memory stand-ins for the window, mouse, keyboard and clock backends.
/// They record every operation deterministically so that scripts can be
/// executed and inspected without touching a real desktop.
pub mod devices;
