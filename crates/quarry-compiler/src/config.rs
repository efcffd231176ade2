//! Compiler configuration.

use indexmap::{IndexMap, IndexSet};
use quarry_core::PlaceholderStyle;

/// Settings shared by every pass of a [`Compiler`](crate::Compiler).
///
/// Built by value:
///
/// ```
/// use quarry_compiler::Config;
/// use quarry_core::PlaceholderStyle;
///
/// let config = Config::new()
///     .placeholder(PlaceholderStyle::Dollar)
///     .safe_constant("tableName")
///     .param_type("sortColumn", "quarry_core::SafeIdentifier")
///     .statement_param_type("report", "sort.column", "quarry_core::SafeIdentifier");
/// assert!(config.is_safe_constant("TABLENAME"));
/// assert_eq!(config.declared_type("find", "sort.column"), None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Config {
    placeholder: PlaceholderStyle,
    /// Lowercased; matching ignores case.
    safe_constants: IndexSet<String>,
    /// `(statement, param)` -> fully qualified type name; `None` applies
    /// to every statement.
    param_types: IndexMap<(Option<String>, String), String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placeholder convention used when rendering through the facade.
    pub fn placeholder(mut self, style: PlaceholderStyle) -> Self {
        self.placeholder = style;
        self
    }

    /// Whitelist a raw substitution name for the safety analyzer.
    pub fn safe_constant(mut self, name: impl AsRef<str>) -> Self {
        self.safe_constants.insert(name.as_ref().to_lowercase());
        self
    }

    pub fn safe_constants<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self = self.safe_constant(name);
        }
        self
    }

    /// Declare the type of a parameter path in every statement.
    ///
    /// Paths are written as in the template (`table`, `sort.column`).
    pub fn param_type(mut self, param: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.param_types
            .insert((None, param.into()), type_name.into());
        self
    }

    /// Declare the type of a parameter path in one statement. Wins over
    /// [`param_type`](Self::param_type).
    pub fn statement_param_type(
        mut self,
        statement: impl Into<String>,
        param: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        self.param_types
            .insert((Some(statement.into()), param.into()), type_name.into());
        self
    }

    pub fn placeholder_style(&self) -> PlaceholderStyle {
        self.placeholder
    }

    pub fn is_safe_constant(&self, name: &str) -> bool {
        self.safe_constants.contains(&name.to_lowercase())
    }

    pub fn safe_constant_names(&self) -> impl Iterator<Item = &str> {
        self.safe_constants.iter().map(String::as_str)
    }

    /// Declared type of `parameter` as seen from `statement`.
    pub fn declared_type(&self, statement: &str, parameter: &str) -> Option<&str> {
        let parameter = parameter.to_string();
        self.param_types
            .get(&(Some(statement.to_string()), parameter.clone()))
            .or_else(|| self.param_types.get(&(None, parameter)))
            .map(String::as_str)
    }
}
