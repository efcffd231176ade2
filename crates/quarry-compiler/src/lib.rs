#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Quarry: dynamic SQL templates compiled from mapper XML.
//!
//! # Example
//!
//! ```
//! use quarry_compiler::{Compiler, Config};
//! use quarry_core::{Record, Value};
//!
//! let source = r#"
//!     <mapper namespace="Users">
//!       <select id="find">
//!         SELECT * FROM users
//!         <where><if test="name != null">AND name = #{name}</if></where>
//!       </select>
//!     </mapper>
//! "#;
//!
//! let compiled = Compiler::new(Config::default()).compile(source).unwrap();
//! let param = Value::from(Record::new().with("name", "bob"));
//! let rendered = compiled.render("find", &param).unwrap();
//! assert!(rendered.sql.ends_with(" WHERE name = ?"));
//! ```

pub mod analyze;
pub mod ast;
mod compiler;
mod config;
pub mod diagnostics;
pub mod emit;
pub mod expr;
pub mod parser;
pub mod render;
pub mod resolve;

#[cfg(test)]
pub mod test_utils;

/// Result type for passes that produce both output and diagnostics.
///
/// Non-fatal findings travel in the `Diagnostics`; fatal ones use the outer
/// `Result`.
pub type PassResult<T> = std::result::Result<(T, Diagnostics), Error>;

pub use analyze::UnsafeSubstitution;
pub use ast::{Fragment, Mapper, Node, Statement, StatementKind};
pub use compiler::{CompiledMapper, Compiler};
pub use config::Config;
pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use emit::{Emitter, emit_all};
pub use render::Interpreter;

/// Errors that can occur while compiling or rendering a mapper.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("template parsing failed with {} errors", .0.error_count())]
    TemplateParseError(Diagnostics),

    #[error("statement `{id}` is not defined in mapper `{namespace}`")]
    UnknownStatement { namespace: String, id: String },
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, Error>;
