//! Request-time rendering of resolved template trees.

mod interpreter;

#[cfg(test)]
mod interpreter_tests;

pub use interpreter::Interpreter;
