//! Rust identifiers for generated modules and functions.

use std::collections::BTreeSet;

/// Reserved words that need `r#` to be used as identifiers.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const PATH_KEYWORDS: &[&str] = &["crate", "self", "super", "_"];

/// Convert an id such as `findByID` or `user-list` to snake_case.
///
/// Acronym runs stay together (`HTTPServer` -> `http_server`); any
/// character that cannot appear in an identifier becomes `_`.
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            continue;
        }
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_lower);
            if boundary && !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
        }
        result.push(c.to_ascii_lowercase());
    }

    let trimmed = result.trim_end_matches('_');
    if trimmed.is_empty() {
        return "_unnamed".to_string();
    }
    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{trimmed}");
    }
    trimmed.to_string()
}

/// Make a snake_case name usable as an identifier.
pub fn rust_ident(name: &str) -> String {
    if KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else if PATH_KEYWORDS.contains(&name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// Hands out distinct identifiers within one generated module.
#[derive(Debug, Default)]
pub struct NameTable {
    used: BTreeSet<String>,
}

impl NameTable {
    /// Table with `reserved` already taken.
    pub fn with_reserved(reserved: &[&str]) -> Self {
        Self {
            used: reserved.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Identifier for `id`, suffixed `_2`, `_3`, ... on collision.
    pub fn unique(&mut self, id: &str) -> String {
        let base = to_snake_case(id);
        if self.used.insert(base.clone()) {
            return rust_ident(&base);
        }

        let mut counter = 2;
        loop {
            let name = format!("{base}_{counter}");
            if self.used.insert(name.clone()) {
                return name;
            }
            counter += 1;
        }
    }
}
