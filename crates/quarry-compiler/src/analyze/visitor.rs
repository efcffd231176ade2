//! Template tree visitor.
//!
//! Override `visit_*` to add logic and call `walk_node` to keep recursing.
//! Tests are visited before the children they guard.

use crate::ast::{ForEach, Node};

pub trait Visitor: Sized {
    fn visit_node(&mut self, node: &Node) {
        walk_node(self, node);
    }

    fn visit_parameter(&mut self, _name: &str, _raw: bool) {}

    /// `test` of an `if` or `when`.
    fn visit_test(&mut self, _test: &str) {}

    fn visit_bind(&mut self, _name: &str, _value: &str) {}

    fn visit_foreach(&mut self, each: &ForEach) {
        walk_nodes(self, &each.children);
    }

    fn visit_include(&mut self, _id: &str) {}
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &Node) {
    match node {
        Node::Text(_) => {}
        Node::Parameter { name, raw } => visitor.visit_parameter(name, *raw),
        Node::If { test, children } => {
            visitor.visit_test(test);
            walk_nodes(visitor, children);
        }
        Node::Choose { whens, otherwise } => {
            for when in whens {
                visitor.visit_test(&when.test);
                walk_nodes(visitor, &when.children);
            }
            if let Some(children) = otherwise {
                walk_nodes(visitor, children);
            }
        }
        Node::Where(children) | Node::Set(children) | Node::Mixed(children) => {
            walk_nodes(visitor, children);
        }
        Node::ForEach(each) => visitor.visit_foreach(each),
        Node::Bind { name, value } => visitor.visit_bind(name, value),
        Node::Include(id) => visitor.visit_include(id),
    }
}

pub fn walk_nodes<V: Visitor>(visitor: &mut V, nodes: &[Node]) {
    for node in nodes {
        visitor.visit_node(node);
    }
}
