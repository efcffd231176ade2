//! Translating backend: test and bind expressions as Rust source.
//!
//! Generated expressions assume these names in scope:
//! - `param: &dyn ParameterAccessor` - the statement parameter
//! - `cx: &RenderContext` - member resolution
//! - `Value`, `CompareOp`, `compare`, `truthy`, `stringify` from `quarry_core`
//!
//! Loop items, indexes and bind results are Rust locals holding a `Value`;
//! [`Locals`] maps template names onto them.

use std::fmt::Write;

use quarry_core::is_count_alias;

use super::ast::{Atom, Junction, Literal, Path, TestExpr, lookup_scoped};
use super::bind::{BindExpr, BindPart};

/// Template names bound in the current scope, innermost last.
#[derive(Debug, Clone, Default)]
pub struct Locals {
    entries: Vec<(String, String)>,
}

impl Locals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to the Rust variable `var`, shadowing earlier bindings.
    pub fn push(&mut self, name: impl Into<String>, var: impl Into<String>) {
        self.entries.push((name.into(), var.into()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop bindings made after the scope had `len` entries.
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        lookup_scoped(&self.entries, name).map(String::as_str)
    }
}

/// Boolean Rust expression for a test.
pub fn translate_test(test: &TestExpr, locals: &Locals) -> String {
    let atoms: Vec<String> = test
        .atoms
        .iter()
        .map(|atom| translate_atom(atom, locals))
        .collect();

    if atoms.len() == 1 {
        return atoms.into_iter().next().unwrap_or_else(|| "false".into());
    }
    let joiner = match test.junction {
        Junction::All => " && ",
        Junction::Any => " || ",
    };
    format!("({})", atoms.join(joiner))
}

fn translate_atom(atom: &Atom, locals: &Locals) -> String {
    match atom {
        Atom::Truthy(path) => format!("truthy(&{})", translate_path(path, locals)),
        Atom::Compare { path, op, literal } => format!(
            "compare(&{}, CompareOp::{}, &{})",
            translate_path(path, locals),
            op.name(),
            translate_literal(literal)
        ),
        Atom::Invalid(_) => "false".to_string(),
    }
}

/// `Value` expression reading a property path.
pub fn translate_path(path: &Path, locals: &Locals) -> String {
    let mut out = String::new();
    let last = path.segments().len() - 1;

    match locals.get(path.head()) {
        Some(var) => {
            let _ = write!(out, "Some({var}.clone())");
        }
        None => {
            let _ = write!(out, "{}", member_call("param", path.head(), last == 0));
        }
    }

    for (i, segment) in path.rest().iter().enumerate() {
        let call = member_call("&v", segment, i + 1 == last);
        let _ = write!(out, ".and_then(|v| {call})");
    }

    out.push_str(".unwrap_or_default()");
    out
}

fn member_call(target: &str, segment: &str, last: bool) -> String {
    let method = if last && is_count_alias(segment) {
        "count_or_member"
    } else {
        "member"
    };
    format!("cx.{method}({target}, {segment:?})")
}

/// `Value` expression for a literal.
pub fn translate_literal(literal: &Literal) -> String {
    match literal {
        Literal::Null => "Value::Null".to_string(),
        Literal::Bool(b) => format!("Value::Bool({b})"),
        Literal::Int(i) => format!("Value::Int({i})"),
        Literal::Decimal(d) => format!("Value::decimal({}, {})", d.mantissa(), d.scale()),
        Literal::Str(s) => format!("Value::from({s:?})"),
    }
}

/// `Value` expression for a bind.
pub fn translate_bind(bind: &BindExpr, locals: &Locals) -> String {
    match bind {
        BindExpr::Single(part) => translate_part(part, locals),
        BindExpr::Concat(parts) => {
            let pieces: Vec<String> = parts
                .iter()
                .map(|part| format!("stringify(&{})", translate_part(part, locals)))
                .collect();
            format!("Value::String([{}].concat())", pieces.join(", "))
        }
        BindExpr::Invalid(_) => "Value::Null".to_string(),
    }
}

fn translate_part(part: &BindPart, locals: &Locals) -> String {
    match part {
        BindPart::Literal(literal) => translate_literal(literal),
        BindPart::Path(path) => translate_path(path, locals),
    }
}
