/// The parser state machine and its token-cursor primitives.
pub mod core;
/// Expression parsing via precedence climbing.
pub mod expression;
/// Compile-time scope and context tracking.
///
/// The parser keeps a stack of lexical frames so that references to names
/// that were never declared are rejected before execution, and a stack of
/// loop/function markers so that misplaced control statements are rejected
/// as well.
pub mod scope;
/// Statement parsing and dispatch.
pub mod statement;

pub use self::core::{ParseResult, Parser};
