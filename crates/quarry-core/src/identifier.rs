//! Validated identifiers for raw SQL substitution.
//!
//! A [`SafeIdentifier`] can only be obtained through the validating
//! constructors below; there is no conversion from a plain string that
//! skips validation.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};

/// Fully qualified type name the emitter trusts without a runtime guard.
pub const SAFE_IDENTIFIER_TYPE: &str = "quarry_core::SafeIdentifier";

const MAX_LEN: usize = 128;

const SET_OPERATORS: &[&str] = &["UNION", "INTERSECT", "EXCEPT", "MINUS"];

static ALLOW_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_]+(\.[A-Za-z0-9_]+)*$").expect("identifier pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("identifier is empty")]
    Empty,

    #[error("identifier is longer than {max} bytes")]
    TooLong { max: usize },

    #[error("identifier contains forbidden character {ch:?}")]
    InvalidCharacter { ch: char },

    #[error("identifier `{0}` has an empty path segment")]
    MalformedPath(String),

    #[error("identifier contains set operator `{keyword}`")]
    ForbiddenKeyword { keyword: String },

    #[error("`{value}` is not one of the allowed identifiers")]
    NotAllowed { value: String },
}

/// Enum whose variants map onto identifiers by declared name.
pub trait Enumerant {
    fn declared_name(&self) -> &'static str;
}

/// Identifier-like text (table or column name) proven safe for raw substitution.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SafeIdentifier(String);

impl SafeIdentifier {
    /// Validate `text` against the identifier allow-pattern.
    pub fn from(text: &str) -> Result<Self, IdentifierError> {
        validate(text)?;
        Ok(Self(text.to_string()))
    }

    /// Validate `text` and require it to be one of `allowed`.
    ///
    /// Use this when a raw value comes from a bounded set, such as a list of
    /// sortable columns.
    pub fn from_allowed<I, S>(text: &str, allowed: I) -> Result<Self, IdentifierError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let identifier = Self::from(text)?;
        if allowed.into_iter().any(|a| a.as_ref() == text) {
            Ok(identifier)
        } else {
            Err(IdentifierError::NotAllowed {
                value: text.to_string(),
            })
        }
    }

    /// Identifier named after an enum variant.
    pub fn from_enum<E: Enumerant + ?Sized>(value: &E) -> Result<Self, IdentifierError> {
        Self::from(value.declared_name())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn validate(text: &str) -> Result<(), IdentifierError> {
    if text.is_empty() {
        return Err(IdentifierError::Empty);
    }
    if text.len() > MAX_LEN {
        return Err(IdentifierError::TooLong { max: MAX_LEN });
    }
    if let Some(ch) = text
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '.'))
    {
        return Err(IdentifierError::InvalidCharacter { ch });
    }
    if !ALLOW_PATTERN.is_match(text) {
        return Err(IdentifierError::MalformedPath(text.to_string()));
    }
    if let Some(keyword) = text
        .split('.')
        .find_map(|seg| SET_OPERATORS.iter().find(|k| seg.eq_ignore_ascii_case(k)))
    {
        return Err(IdentifierError::ForbiddenKeyword {
            keyword: keyword.to_string(),
        });
    }
    Ok(())
}

impl fmt::Display for SafeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SafeIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for SafeIdentifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from(s)
    }
}

impl TryFrom<&str> for SafeIdentifier {
    type Error = IdentifierError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from(value)
    }
}

impl Serialize for SafeIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}
