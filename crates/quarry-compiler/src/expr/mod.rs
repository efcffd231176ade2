//! The test-expression language and `bind` value expressions.
//!
//! One parser, two backends:
//! - `eval` interprets an expression against a live parameter
//! - `translate` emits an equivalent Rust expression for generated code
//!
//! Both backends defer to `quarry_core::ops` for truthiness and comparison.

mod ast;
mod bind;
mod cache;
mod eval;
mod lexer;
mod parser;
mod translate;

#[cfg(test)]
mod eval_tests;

pub use ast::{Atom, Junction, Literal, Path, TestExpr, lookup_scoped};
pub use bind::{BindExpr, BindPart};
pub use cache::ExpressionCache;
pub use eval::{Environment, evaluate, evaluate_bind};
pub use lexer::{Token, TokenKind, lex};
pub use parser::{parse_bind, parse_test};
pub use translate::{Locals, translate_bind, translate_literal, translate_path, translate_test};
