//! Per-render state and the helpers generated code is written against.
//!
//! Everything here is shared between the interpreter and emitted functions, so
//! clause trimming, binding and raw-substitution guards behave identically on
//! both backends.

use std::sync::Arc;

use serde::Serialize;

use crate::accessor::{MemberCache, ParameterAccessor};
use crate::placeholder::PlaceholderStyle;
use crate::value::Value;

/// Read-only context for rendering: placeholder convention and member cache.
///
/// One context can serve any number of concurrent renders.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    placeholder: PlaceholderStyle,
    members: Arc<MemberCache>,
}

impl RenderContext {
    pub fn new(placeholder: PlaceholderStyle) -> Self {
        Self {
            placeholder,
            members: Arc::new(MemberCache::new()),
        }
    }

    /// Context sharing an existing member cache.
    pub fn with_members(placeholder: PlaceholderStyle, members: Arc<MemberCache>) -> Self {
        Self {
            placeholder,
            members,
        }
    }

    pub fn placeholder(&self) -> PlaceholderStyle {
        self.placeholder
    }

    pub fn members(&self) -> &MemberCache {
        &self.members
    }

    /// One path segment.
    pub fn member(&self, target: &dyn ParameterAccessor, name: &str) -> Option<Value> {
        self.members.member(target, name)
    }

    /// Trailing `size`/`length` segment.
    pub fn count_or_member(&self, target: &dyn ParameterAccessor, name: &str) -> Option<Value> {
        self.members.count_or_member(target, name)
    }

    /// Record `value` as the next bound parameter and return its SQL marker.
    pub fn bind(&self, parameters: &mut Vec<BoundParameter>, value: Value) -> String {
        let index = parameters.len();
        parameters.push(BoundParameter {
            name: PlaceholderStyle::parameter_name(index),
            value,
        });
        self.placeholder.marker(index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundParameter {
    pub name: String,
    pub value: Value,
}

/// Executable SQL plus its ordered bound parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderedSql {
    pub sql: String,
    pub parameters: Vec<BoundParameter>,
}

impl RenderedSql {
    /// Statement-level result; surrounding whitespace of the SQL is dropped.
    pub fn finish(sql: &str, parameters: Vec<BoundParameter>) -> Self {
        Self {
            sql: sql.trim().to_string(),
            parameters,
        }
    }

    pub fn values(&self) -> Vec<&Value> {
        self.parameters.iter().map(|p| &p.value).collect()
    }
}

/// A raw substitution received something other than a [`SafeIdentifier`](crate::SafeIdentifier).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "raw substitution `{parameter}` in `{statement}` requires a SafeIdentifier, found {found}"
)]
pub struct GuardViolation {
    pub statement: String,
    pub parameter: String,
    pub found: &'static str,
}

/// Text spliced into SQL for a trusted raw substitution.
pub fn stringify(value: &Value) -> String {
    value.to_string()
}

/// Text spliced into SQL for a guarded raw substitution.
pub fn guard_identifier(
    statement: &str,
    parameter: &str,
    value: &Value,
) -> Result<String, GuardViolation> {
    match value {
        Value::Identifier(id) => Ok(id.as_str().to_string()),
        other => {
            tracing::warn!(
                statement,
                parameter,
                found = other.kind_name(),
                "raw substitution guard rejected value"
            );
            Err(GuardViolation {
                statement: statement.to_string(),
                parameter: parameter.to_string(),
                found: other.kind_name(),
            })
        }
    }
}

/// Items of a `foreach` collection. `None` skips the whole loop, including
/// its `open`/`close` text.
pub fn items(value: &Value) -> Option<&[Value]> {
    value.as_list()
}

/// Body of a `where` clause: trimmed, one leading `AND`/`OR` removed.
pub fn trim_where_body(body: &str) -> &str {
    let body = body.trim();
    ["AND", "OR"]
        .iter()
        .find_map(|keyword| strip_keyword(body, keyword))
        .map_or(body, str::trim_start)
}

/// Body of a `set` clause: trimmed, one trailing comma removed.
pub fn trim_set_body(body: &str) -> &str {
    let body = body.trim();
    body.strip_suffix(',').map_or(body, str::trim_end)
}

fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let head = text.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let rest = &text[keyword.len()..];
    rest.starts_with(char::is_whitespace).then_some(rest)
}
