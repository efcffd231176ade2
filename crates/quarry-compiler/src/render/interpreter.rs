//! Request-time renderer.
//!
//! Walks a resolved tree against a live parameter and produces SQL text plus
//! the ordered bound values. All state lives in one render call; the tree,
//! the context and the expression cache are only read.

use quarry_core::{
    BoundParameter, ParameterAccessor, RenderContext, RenderedSql, Value, items, stringify,
    trim_set_body, trim_where_body,
};

use crate::ast::{ForEach, Node, Statement};
use crate::expr::{Environment, ExpressionCache, Path, evaluate, evaluate_bind, lookup_scoped};

pub struct Interpreter<'c> {
    cx: &'c RenderContext,
    exprs: &'c ExpressionCache,
}

impl<'c> Interpreter<'c> {
    pub fn new(cx: &'c RenderContext, exprs: &'c ExpressionCache) -> Self {
        Self { cx, exprs }
    }

    /// Render a whole statement. Surrounding whitespace is trimmed.
    pub fn render_statement(
        &self,
        statement: &Statement,
        param: &dyn ParameterAccessor,
    ) -> RenderedSql {
        tracing::trace!(statement = %statement.id, "rendering statement");
        let rendered = self.render(&statement.root, param);
        RenderedSql::finish(&rendered.sql, rendered.parameters)
    }

    /// Render any subtree verbatim, without trimming.
    pub fn render(&self, node: &Node, param: &dyn ParameterAccessor) -> RenderedSql {
        let mut render = Render {
            cx: self.cx,
            exprs: self.exprs,
            param,
            scope: Vec::new(),
            parameters: Vec::new(),
        };
        let mut sql = String::new();
        render.node(node, &mut sql);
        RenderedSql {
            sql,
            parameters: render.parameters,
        }
    }
}

struct Render<'r> {
    cx: &'r RenderContext,
    exprs: &'r ExpressionCache,
    param: &'r dyn ParameterAccessor,
    /// `foreach` items and indexes and `bind` results, innermost last.
    scope: Vec<(String, Value)>,
    parameters: Vec<BoundParameter>,
}

impl Environment for Render<'_> {
    fn resolve(&self, path: &Path) -> Value {
        let members = self.cx.members();
        let local = lookup_scoped(&self.scope, path.head());

        match local {
            Some(value) if path.rest().is_empty() => value.clone(),
            Some(value) => members.resolve_path(value, &segments(path.rest())),
            None => members.resolve_path(self.param, &segments(path.segments())),
        }
    }
}

fn segments(path: &[String]) -> Vec<&str> {
    path.iter().map(String::as_str).collect()
}

impl Render<'_> {
    fn test(&self, source: &str) -> bool {
        let test = self.exprs.test(source);
        let holds = evaluate(&test, self);
        tracing::trace!(test = source, holds, "evaluated test");
        holds
    }

    /// Render a child list in its own scope.
    fn scoped(&mut self, nodes: &[Node], out: &mut String) {
        let mark = self.scope.len();
        self.sequence(nodes, out);
        self.scope.truncate(mark);
    }

    fn sequence(&mut self, nodes: &[Node], out: &mut String) {
        for node in nodes {
            self.node(node, out);
        }
    }

    fn node(&mut self, node: &Node, out: &mut String) {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Parameter { name, raw: false } => {
                let value = self.resolve(&Path::from_placeholder(name));
                let marker = self.cx.bind(&mut self.parameters, value);
                out.push_str(&marker);
            }
            Node::Parameter { name, raw: true } => {
                let value = self.resolve(&Path::from_placeholder(name));
                out.push_str(&stringify(&value));
            }
            Node::If { test, children } => {
                if self.test(test) {
                    self.scoped(children, out);
                }
            }
            Node::Choose { whens, otherwise } => {
                let branch = whens
                    .iter()
                    .find(|when| self.test(&when.test))
                    .map(|when| when.children.as_slice())
                    .or(otherwise.as_deref());
                if let Some(children) = branch {
                    self.scoped(children, out);
                }
            }
            Node::Where(children) => {
                let mut body = String::new();
                self.scoped(children, &mut body);
                let body = trim_where_body(&body);
                if !body.is_empty() {
                    out.push_str(" WHERE ");
                    out.push_str(body);
                }
            }
            Node::Set(children) => {
                let mut body = String::new();
                self.scoped(children, &mut body);
                let body = trim_set_body(&body);
                if !body.is_empty() {
                    out.push_str(" SET ");
                    out.push_str(body);
                }
            }
            Node::ForEach(each) => self.for_each(each, out),
            Node::Bind { name, value } => {
                let bind = self.exprs.bind(value);
                let value = evaluate_bind(&bind, &*self);
                self.scope.push((name.clone(), value));
            }
            Node::Include(id) => {
                tracing::warn!(include = %id, "skipping include that was never resolved");
            }
            Node::Mixed(children) => self.sequence(children, out),
        }
    }

    fn for_each(&mut self, each: &ForEach, out: &mut String) {
        let collection = self.resolve(&Path::from_placeholder(&each.collection));
        let Some(elements) = items(&collection) else {
            tracing::trace!(collection = %each.collection, "foreach over a non-list, skipped");
            return;
        };

        if let Some(open) = &each.open {
            out.push_str(open);
        }
        for (i, element) in elements.iter().enumerate() {
            if i > 0 {
                out.push_str(each.separator.as_deref().unwrap_or_default());
            }
            let mark = self.scope.len();
            self.scope.push((each.item.clone(), element.clone()));
            if let Some(index) = &each.index {
                self.scope.push((index.clone(), Value::from(i)));
            }
            self.sequence(&each.children, out);
            self.scope.truncate(mark);
        }
        if let Some(close) = &each.close {
            out.push_str(close);
        }
    }
}
