//! Include resolution.
//!
//! Replaces every `Include` with a copy of the referenced fragment's resolved
//! tree. Cycle detection tracks the fragments on the current expansion path
//! only, so sibling includes of a shared fragment are fine. Unknown and
//! circular includes degrade to a marker comment in the SQL text and are
//! reported as diagnostics; they never fail the mapper.

mod cycles;

#[cfg(test)]
mod tests;

pub use cycles::fragment_cycles;

use indexmap::IndexSet;

use crate::ast::{ForEach, Fragment, Mapper, Node, Statement, When};
use crate::diagnostics::{DiagnosticKind, Diagnostics, Span};

/// Resolve every include in `mapper`, statements and fragments alike.
///
/// Resolving an already resolved mapper returns an identical mapper.
pub fn resolve_includes(mapper: &Mapper) -> (Mapper, Diagnostics) {
    let mut diag = Diagnostics::new();

    for chain in fragment_cycles(mapper) {
        let first = &chain[0];
        let span = mapper.fragment(first).map(|f| f.span.clone()).unwrap_or_default();
        tracing::warn!(namespace = %mapper.namespace, chain = %chain.join(" -> "), "circular include");
        diag.report(DiagnosticKind::CircularFragment, span)
            .message(chain.join(" -> "))
            .owner(mapper.qualify(first))
            .emit();
    }

    let fragments = mapper
        .fragments
        .iter()
        .map(|fragment| {
            let mut resolver = Resolver::new(mapper, Some(fragment.id.as_str()));
            let root = resolver.node(&fragment.root);
            resolver.report_unresolved(&mut diag, &fragment.id, fragment.span.clone());
            Fragment {
                root,
                ..fragment.clone()
            }
        })
        .collect();

    let statements = mapper
        .statements
        .iter()
        .map(|statement| {
            let mut resolver = Resolver::new(mapper, None);
            let root = resolver.node(&statement.root);
            resolver.report_unresolved(&mut diag, &statement.id, statement.span.clone());
            Statement {
                root,
                ..statement.clone()
            }
        })
        .collect();

    tracing::debug!(namespace = %mapper.namespace, diagnostics = diag.len(), "resolved includes");

    let resolved = Mapper {
        namespace: mapper.namespace.clone(),
        statements,
        fragments,
    };
    (resolved, diag)
}

/// Marker left where an unknown fragment was included.
pub fn unresolved_marker(id: &str) -> String {
    format!("/* unresolved include: {} */", comment_safe(id))
}

/// Marker left where an include would re-enter a fragment on the current path.
pub fn circular_marker(chain: &[&str]) -> String {
    format!("/* circular include: {} */", comment_safe(&chain.join(" -> ")))
}

fn comment_safe(text: &str) -> String {
    text.replace("*/", "* /")
}

struct Resolver<'m> {
    mapper: &'m Mapper,
    /// Fragments being expanded on the current path.
    path: Vec<&'m str>,
    unresolved: IndexSet<&'m str>,
}

impl<'m> Resolver<'m> {
    fn new(mapper: &'m Mapper, root: Option<&'m str>) -> Self {
        Self {
            mapper,
            path: root.into_iter().collect(),
            unresolved: IndexSet::new(),
        }
    }

    fn report_unresolved(&self, diag: &mut Diagnostics, owner: &str, span: Span) {
        for id in &self.unresolved {
            tracing::warn!(namespace = %self.mapper.namespace, owner, include = *id, "unresolved include");
            diag.report(DiagnosticKind::UnresolvedFragment, span.clone())
                .message(*id)
                .owner(self.mapper.qualify(owner))
                .emit();
        }
    }

    fn nodes(&mut self, nodes: &'m [Node]) -> Vec<Node> {
        nodes.iter().map(|node| self.node(node)).collect()
    }

    fn node(&mut self, node: &'m Node) -> Node {
        match node {
            Node::Include(id) => self.include(id),
            Node::Text(_) | Node::Parameter { .. } | Node::Bind { .. } => node.clone(),
            Node::If { test, children } => Node::If {
                test: test.clone(),
                children: self.nodes(children),
            },
            Node::Choose { whens, otherwise } => Node::Choose {
                whens: whens
                    .iter()
                    .map(|when| When {
                        test: when.test.clone(),
                        children: self.nodes(&when.children),
                    })
                    .collect(),
                otherwise: otherwise.as_ref().map(|nodes| self.nodes(nodes)),
            },
            Node::Where(children) => Node::Where(self.nodes(children)),
            Node::Set(children) => Node::Set(self.nodes(children)),
            Node::Mixed(children) => Node::Mixed(self.nodes(children)),
            Node::ForEach(each) => Node::ForEach(ForEach {
                children: self.nodes(&each.children),
                ..each.clone()
            }),
        }
    }

    fn include(&mut self, id: &'m str) -> Node {
        if let Some(pos) = self.path.iter().position(|entry| *entry == id) {
            let mut chain = self.path[pos..].to_vec();
            chain.push(id);
            return Node::Text(circular_marker(&chain));
        }

        let Some(fragment) = self.mapper.fragment(id) else {
            self.unresolved.insert(id);
            return Node::Text(unresolved_marker(id));
        };

        self.path.push(id);
        let resolved = self.node(&fragment.root);
        self.path.pop();
        resolved
    }
}
