use super::ast::{Literal, Path};

/// A parsed `bind` value expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindExpr {
    /// One part; binds its value unchanged.
    Single(BindPart),
    /// Several parts joined with `+`; binds the concatenated text.
    Concat(Vec<BindPart>),
    /// Unparseable expression; binds null.
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindPart {
    Literal(Literal),
    Path(Path),
}

impl BindExpr {
    pub fn parts(&self) -> &[BindPart] {
        match self {
            BindExpr::Single(part) => std::slice::from_ref(part),
            BindExpr::Concat(parts) => parts,
            BindExpr::Invalid(_) => &[],
        }
    }
}
