//! Builders shared by unit tests.

use crate::ast::{Mapper, Statement, StatementKind};
use crate::parser::parse_template;

/// Select statement parsed from bare template content.
pub fn statement(id: &str, template: &str) -> Statement {
    let (root, _) = parse_template(template).expect("test template parses");
    Statement {
        id: id.to_string(),
        kind: StatementKind::Select,
        root,
        result_mapping_ref: None,
        param_type_ref: None,
        timeout_seconds: None,
        span: 0..template.len(),
    }
}

/// Mapper with one select statement per `(id, template)` pair.
pub fn mapper_of(namespace: &str, statements: &[(&str, &str)]) -> Mapper {
    let mut mapper = Mapper::new(namespace);
    mapper.statements = statements
        .iter()
        .map(|(id, template)| statement(id, template))
        .collect();
    mapper
}
