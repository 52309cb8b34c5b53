/// The interpreter state and the statement/expression dispatchers.
pub mod core;
/// Loop and conditional execution, including control-signal absorption.
pub mod control;
/// Function machinery: definitions, calls, closures and generators.
pub mod function;
/// Binary operator evaluation.
pub mod binary;

pub use self::core::{EvalResult, Flow, Interpreter, Signal};
