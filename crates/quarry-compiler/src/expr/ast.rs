use std::fmt;

use quarry_core::{CompareOp, Value};
use rust_decimal::Decimal;

/// A parsed `test` attribute: atoms joined by one kind of junction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestExpr {
    pub source: String,
    pub junction: Junction,
    pub atoms: Vec<Atom>,
    /// Both `and` and `or` appear at the top level; only `and` was split on.
    pub mixed: bool,
}

impl TestExpr {
    /// Source text of every atom that failed to parse.
    pub fn invalid_atoms(&self) -> impl Iterator<Item = &str> {
        self.atoms.iter().filter_map(|atom| match atom {
            Atom::Invalid(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Junction {
    /// Every atom must hold.
    All,
    /// Any atom must hold.
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    /// Bare path, true when the value is truthy.
    Truthy(Path),
    Compare {
        path: Path,
        op: CompareOp,
        literal: Literal,
    },
    /// Unparseable atom; always false.
    Invalid(String),
}

/// Dotted property path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Parse `a.b.c`. Every segment must be a non-empty run of letters,
    /// digits and underscores.
    pub fn parse(text: &str) -> Option<Self> {
        let segments: Vec<String> = text.split('.').map(str::to_string).collect();
        let valid = segments
            .iter()
            .all(|s| !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_'));
        valid.then_some(Self { segments })
    }

    /// Path named by a `#{}` or `${}` placeholder.
    ///
    /// Options after a comma (`#{id,jdbcType=INTEGER}`) are ignored. Never
    /// fails; odd segments simply resolve to nothing.
    pub fn from_placeholder(name: &str) -> Self {
        let path = name.split(',').next().unwrap_or_default().trim();
        Self {
            segments: path.split('.').map(|s| s.trim().to_string()).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn head(&self) -> &str {
        &self.segments[0]
    }

    pub fn rest(&self) -> &[String] {
        &self.segments[1..]
    }
}

/// Innermost scope entry named `name`.
///
/// An exact match anywhere in scope wins over a match that differs only in
/// ASCII case, the same rule parameter members follow.
pub fn lookup_scoped<'a, T>(scope: &'a [(String, T)], name: &str) -> Option<&'a T> {
    let found = scope.iter().rev().find(|(bound, _)| bound == name);
    found
        .or_else(|| {
            scope
                .iter()
                .rev()
                .find(|(bound, _)| bound.eq_ignore_ascii_case(name))
        })
        .map(|(_, value)| value)
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Right-hand side of a comparison, or a constant part of a bind expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Decimal(Decimal),
    Str(String),
}

impl Literal {
    /// Parse literal text.
    ///
    /// `null`, then a quoted string, then a boolean, an integer, a decimal;
    /// anything else is an unquoted string token.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text == "null" {
            return Literal::Null;
        }
        if let Some(inner) = unquote(text) {
            return Literal::Str(inner.to_string());
        }
        if let Some(b) = quarry_core::ops::parse_bool(text) {
            return Literal::Bool(b);
        }
        if let Ok(i) = text.parse::<i64>() {
            return Literal::Int(i);
        }
        if let Ok(d) = text.parse::<Decimal>() {
            return Literal::Decimal(d);
        }
        Literal::Str(text.to_string())
    }

    pub fn to_value(&self) -> Value {
        match self {
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(i) => Value::Int(*i),
            Literal::Decimal(d) => Value::Decimal(*d),
            Literal::Str(s) => Value::String(s.clone()),
        }
    }
}

/// Text inside matching single or double quotes.
pub(crate) fn unquote(text: &str) -> Option<&str> {
    ['\'', '"'].into_iter().find_map(|quote| {
        text.strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
    })
}
