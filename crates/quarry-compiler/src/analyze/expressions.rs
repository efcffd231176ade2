use super::visitor::Visitor;
use crate::ast::Mapper;
use crate::diagnostics::{DiagnosticKind, Diagnostics, Span};
use crate::expr::{BindExpr, ExpressionCache};

/// Warn about atoms and binds that cannot be parsed and about tests that
/// mix `and` with `or`.
///
/// Runs on the parsed mapper, so each fragment is checked once. Parsed
/// expressions land in `exprs` for later renders.
pub fn check_expressions(mapper: &Mapper, exprs: &ExpressionCache) -> Diagnostics {
    let mut diag = Diagnostics::new();

    let owners = mapper
        .statements
        .iter()
        .map(|s| (&s.id, &s.root, &s.span))
        .chain(mapper.fragments.iter().map(|f| (&f.id, &f.root, &f.span)));

    for (id, root, span) in owners {
        let mut checker = ExpressionChecker {
            exprs,
            diag: &mut diag,
            owner: mapper.qualify(id),
            span: span.clone(),
        };
        checker.visit_node(root);
    }

    diag
}

struct ExpressionChecker<'a> {
    exprs: &'a ExpressionCache,
    diag: &'a mut Diagnostics,
    owner: String,
    span: Span,
}

impl ExpressionChecker<'_> {
    fn warn(&mut self, kind: DiagnosticKind, detail: String) {
        self.diag
            .report(kind, self.span.clone())
            .message(detail)
            .owner(self.owner.clone())
            .emit();
    }
}

impl Visitor for ExpressionChecker<'_> {
    fn visit_test(&mut self, source: &str) {
        let test = self.exprs.test(source);
        for atom in test.invalid_atoms() {
            // The mixed-operator warning already covers pieces that still hold `or`.
            if test.mixed && holds_or(atom) {
                continue;
            }
            let detail = if atom.is_empty() {
                format!("empty condition in test `{source}`")
            } else {
                format!("`{atom}` in test `{source}`")
            };
            self.warn(DiagnosticKind::InvalidExpression, detail);
        }
        if test.mixed {
            self.warn(DiagnosticKind::MixedLogicalOperators, source.to_string());
        }
    }

    fn visit_bind(&mut self, name: &str, value: &str) {
        if let BindExpr::Invalid(text) = &*self.exprs.bind(value) {
            self.warn(
                DiagnosticKind::InvalidExpression,
                format!("`{text}` in bind `{name}`"),
            );
        }
    }
}

fn holds_or(atom: &str) -> bool {
    atom.split_whitespace().any(|word| word == "or" || word == "OR")
}
