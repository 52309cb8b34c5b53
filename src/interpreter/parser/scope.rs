use std::collections::HashSet;

/// A marker for the construct the parser is currently inside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    /// Inside a `WHILE` or `REPEAT` body.
    Loop,
    /// Inside a `DEFUN` or `LAMBDA` body.
    Function,
}

/// The stack of lexical frames the parser sees while walking the source.
///
/// The bottom frame is the global scope. Function and lambda bodies push a
/// frame seeded with their parameters and pop it when the body ends. A name
/// is visible if any frame on the stack declares it.
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<HashSet<String>>,
}

impl ScopeStack {
    /// Creates a stack holding only the global frame.
    #[must_use]
    pub fn new() -> Self {
        Self { frames: vec![HashSet::new()] }
    }

    /// Pushes a frame seeded with the given parameter names.
    pub fn push_frame(&mut self, parameters: &[String]) {
        self.frames.push(parameters.iter().cloned().collect());
    }

    /// Pops the innermost frame. The global frame is never popped.
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Records a declaration in the innermost frame.
    pub fn declare(&mut self, name: &str) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_string());
        }
    }

    /// Whether any frame on the stack declares `name`.
    #[must_use]
    pub fn is_visible(&self, name: &str) -> bool {
        self.frames.iter().any(|frame| frame.contains(name))
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
