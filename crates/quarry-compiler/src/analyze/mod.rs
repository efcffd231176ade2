//! Checks over parsed and resolved mappers.
//!
//! - `safety` finds raw substitutions that are not whitelisted
//! - `expressions` reports tests and binds that will not evaluate as written

mod expressions;
mod safety;
pub mod visitor;

#[cfg(test)]
mod safety_tests;

pub use expressions::check_expressions;
pub use safety::{UnsafeSubstitution, analyze, report_unsafe};
pub use visitor::{Visitor, walk_node};
