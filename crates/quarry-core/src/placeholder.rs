//! Provider placeholder conventions.

use serde::{Deserialize, Serialize};

/// How a bound parameter is spelled in SQL text.
///
/// Parameter names are provider independent (`p0`, `p1`, ...); only the marker
/// written into the SQL changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// `?` (ODBC, SQLite, MySQL)
    #[default]
    Question,
    /// `@p0` (SQL Server)
    AtNamed,
    /// `$1` (PostgreSQL), one-based
    Dollar,
    /// `:p0` (Oracle)
    ColonNamed,
}

impl PlaceholderStyle {
    /// Name of the `index`-th bound parameter of a render.
    pub fn parameter_name(index: usize) -> String {
        format!("p{index}")
    }

    /// Marker written into the SQL for the `index`-th bound parameter.
    pub fn marker(self, index: usize) -> String {
        match self {
            PlaceholderStyle::Question => "?".to_string(),
            PlaceholderStyle::AtNamed => format!("@p{index}"),
            PlaceholderStyle::Dollar => format!("${}", index + 1),
            PlaceholderStyle::ColonNamed => format!(":p{index}"),
        }
    }
}
