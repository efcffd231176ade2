#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Runtime support for Quarry SQL templates.
//!
//! Shared by the template interpreter and by code the emitter generates:
//! - `value` - self-contained parameter values
//! - `accessor` - property access on parameter objects and the member cache
//! - `ops` - truthiness and comparison semantics of test expressions
//! - `identifier` - validated identifiers for raw substitution
//! - `placeholder` - provider placeholder conventions
//! - `runtime` - render context, bound parameters and clause trimming

pub mod accessor;
pub mod identifier;
pub mod ops;
pub mod placeholder;
pub mod runtime;
pub mod value;

#[cfg(test)]
mod ops_tests;
#[cfg(test)]
mod runtime_tests;

pub use accessor::{MemberCache, MemberTable, ParameterAccessor, is_count_alias};
pub use identifier::{Enumerant, IdentifierError, SAFE_IDENTIFIER_TYPE, SafeIdentifier};
pub use ops::{CompareOp, compare, truthy};
pub use placeholder::PlaceholderStyle;
pub use runtime::{
    BoundParameter, GuardViolation, RenderContext, RenderedSql, guard_identifier, items,
    stringify, trim_set_body, trim_where_body,
};
pub use value::{Record, Value};
