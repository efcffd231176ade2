use super::Span;

/// Diagnostic kinds, grouped by the stage that reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // The mapper cannot be read at all
    MalformedXml,

    // Directive misuse; fails the whole mapper
    MissingAttribute,
    EmptyChoose,

    // Declaration problems; first declaration wins
    DuplicateStatement,
    DuplicateFragment,

    // Include resolution; degrades to an inline marker
    UnresolvedFragment,
    CircularFragment,

    // Tolerated input
    UnknownElement,
    DuplicateOtherwise,
    InvalidNumber,
    InvalidExpression,
    MixedLogicalOperators,

    // Safety analysis
    UnsafeSubstitution,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::UnknownElement
            | Self::DuplicateOtherwise
            | Self::InvalidNumber
            | Self::InvalidExpression
            | Self::MixedLogicalOperators
            | Self::UnsafeSubstitution => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Whether this kind aborts compilation of the mapper.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MalformedXml | Self::MissingAttribute | Self::EmptyChoose
        )
    }

    /// Remedy shown with every finding of this kind.
    pub fn default_hint(&self) -> Option<&'static str> {
        match self {
            Self::MixedLogicalOperators => Some("nest `<if>` elements to combine `and` with `or`"),
            Self::UnsafeSubstitution => Some(
                "bind with `#{...}`, whitelist the name as a safe constant, or pass a SafeIdentifier",
            ),
            Self::CircularFragment => Some("the include is replaced by a marker comment"),
            Self::UnresolvedFragment => Some("the include is replaced by a marker comment"),
            _ => None,
        }
    }

    /// Wording when the reporter gives no detail.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::MalformedXml => "malformed mapper XML",
            Self::MissingAttribute => "missing required attribute",
            Self::EmptyChoose => "`<choose>` requires at least one `<when>`",
            Self::DuplicateStatement => "duplicate statement",
            Self::DuplicateFragment => "duplicate fragment",
            Self::UnresolvedFragment => "unresolved include",
            Self::CircularFragment => "circular include",
            Self::UnknownElement => "unknown element",
            Self::DuplicateOtherwise => "`<choose>` has more than one `<otherwise>`; the first is kept",
            Self::InvalidNumber => "invalid number",
            Self::InvalidExpression => "invalid expression",
            Self::MixedLogicalOperators => "test mixes `and` with `or`",
            Self::UnsafeSubstitution => "unsafe raw substitution",
        }
    }

    /// Wording around caller detail; `{}` marks where it goes.
    pub fn custom_message(&self) -> String {
        match self {
            Self::MissingAttribute => "missing required attribute {}".to_string(),
            Self::DuplicateStatement => "statement `{}` is already defined".to_string(),
            Self::DuplicateFragment => "fragment `{}` is already defined".to_string(),
            Self::UnresolvedFragment => "include `{}` does not name a fragment".to_string(),
            Self::UnknownElement => "unknown element `<{}>`, content parsed inline".to_string(),
            Self::InvalidNumber => "`{}` is not a number, attribute ignored".to_string(),
            Self::MixedLogicalOperators => {
                "test `{}` mixes `and` with `or`; only `and` splits it".to_string()
            }
            Self::UnsafeSubstitution => "raw substitution `{}` is not proven safe".to_string(),
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    /// Bytes of the mapper source the finding points at.
    pub(crate) range: Span,
    pub(crate) message: String,
    /// `namespace.id` of the statement or fragment concerned.
    pub(crate) owner: Option<String>,
    pub(crate) hint: Option<&'static str>,
}

impl DiagnosticMessage {
    pub(crate) fn new(kind: DiagnosticKind, range: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            range,
            message: message.into(),
            owner: None,
            hint: kind.default_hint(),
        }
    }

    pub(crate) fn with_default_message(kind: DiagnosticKind, range: Span) -> Self {
        Self::new(kind, range, kind.fallback_message())
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn range(&self) -> Span {
        self.range.clone()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity(),
            self.range.start,
            self.range.end,
            self.message
        )?;
        if let Some(owner) = &self.owner {
            write!(f, " (in {owner})")?;
        }
        if let Some(hint) = self.hint {
            write!(f, " (hint: {hint})")?;
        }
        Ok(())
    }
}
