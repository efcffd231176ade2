//! Raw substitution analysis.

use indexmap::IndexSet;
use quarry_core::SAFE_IDENTIFIER_TYPE;
use serde::Serialize;

use super::visitor::Visitor;
use crate::Config;
use crate::ast::Mapper;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::expr::Path;

/// A `${...}` that is neither a whitelisted safe constant nor declared as a
/// `SafeIdentifier`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UnsafeSubstitution {
    pub namespace: String,
    pub statement: String,
    pub parameter: String,
}

/// Every unproven raw substitution, once per statement and name.
///
/// Whitelist matching ignores case. A declared type only counts when it is
/// exactly [`SAFE_IDENTIFIER_TYPE`], the same rule the emitter uses to drop
/// its runtime guard. Run on a resolved mapper so substitutions inside
/// included fragments are attributed to each including statement.
pub fn analyze(mapper: &Mapper, config: &Config) -> Vec<UnsafeSubstitution> {
    let mut findings = IndexSet::new();
    for statement in &mapper.statements {
        let mut collector = RawCollector::default();
        collector.visit_node(&statement.root);

        for parameter in collector.names {
            let declared_safe =
                config.declared_type(&statement.id, &parameter) == Some(SAFE_IDENTIFIER_TYPE);
            if declared_safe || config.is_safe_constant(&parameter) {
                continue;
            }
            findings.insert(UnsafeSubstitution {
                namespace: mapper.namespace.clone(),
                statement: statement.id.clone(),
                parameter,
            });
        }
    }

    tracing::debug!(
        namespace = %mapper.namespace,
        findings = findings.len(),
        "analyzed raw substitutions"
    );
    findings.into_iter().collect()
}

/// One warning per finding, located at the owning statement.
pub fn report_unsafe(mapper: &Mapper, findings: &[UnsafeSubstitution], diag: &mut Diagnostics) {
    for finding in findings {
        tracing::warn!(
            namespace = %finding.namespace,
            statement = %finding.statement,
            parameter = %finding.parameter,
            "unsafe raw substitution"
        );
        let span = mapper
            .statement(&finding.statement)
            .map(|s| s.span.clone())
            .unwrap_or_default();
        diag.report(DiagnosticKind::UnsafeSubstitution, span)
            .message(finding.parameter.clone())
            .owner(mapper.qualify(&finding.statement))
            .emit();
    }
}

#[derive(Default)]
struct RawCollector {
    names: IndexSet<String>,
}

impl Visitor for RawCollector {
    fn visit_parameter(&mut self, name: &str, raw: bool) {
        if raw {
            self.names.insert(Path::from_placeholder(name).to_string());
        }
    }
}
