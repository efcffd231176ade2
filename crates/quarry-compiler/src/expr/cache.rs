use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::ast::TestExpr;
use super::bind::BindExpr;
use super::parser::{parse_bind, parse_test};

/// Parsed expressions keyed by source text.
///
/// Append-only and shareable across threads; two renders racing on the same
/// expression parse it twice and keep either result.
#[derive(Debug, Default)]
pub struct ExpressionCache {
    tests: RwLock<HashMap<String, Arc<TestExpr>>>,
    binds: RwLock<HashMap<String, Arc<BindExpr>>>,
}

impl ExpressionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn test(&self, source: &str) -> Arc<TestExpr> {
        if let Some(test) = self.tests.read().get(source) {
            return Arc::clone(test);
        }
        let test = Arc::new(parse_test(source));
        tracing::trace!(source, "cached test expression");
        self.tests
            .write()
            .insert(source.to_string(), Arc::clone(&test));
        test
    }

    pub fn bind(&self, source: &str) -> Arc<BindExpr> {
        if let Some(bind) = self.binds.read().get(source) {
            return Arc::clone(bind);
        }
        let bind = Arc::new(parse_bind(source));
        tracing::trace!(source, "cached bind expression");
        self.binds
            .write()
            .insert(source.to_string(), Arc::clone(&bind));
        bind
    }

    /// Number of cached expressions of both kinds.
    pub fn len(&self) -> usize {
        self.tests.read().len() + self.binds.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
