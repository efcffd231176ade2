//! Indented tree dump of template ASTs, used by tests and debugging.

use std::fmt::Write;

use super::{ForEach, Mapper, Node};

enum Target<'a> {
    Node(&'a Node),
    Mapper(&'a Mapper),
}

pub struct AstPrinter<'a> {
    target: Target<'a>,
    spans: bool,
}

impl<'a> AstPrinter<'a> {
    pub fn new(node: &'a Node) -> Self {
        Self {
            target: Target::Node(node),
            spans: false,
        }
    }

    pub fn mapper(mapper: &'a Mapper) -> Self {
        Self {
            target: Target::Mapper(mapper),
            spans: false,
        }
    }

    /// Show source byte ranges of statements and fragments.
    pub fn with_spans(mut self, value: bool) -> Self {
        self.spans = value;
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out.truncate(out.trim_end().len());
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        match self.target {
            Target::Node(node) => self.format_node(node, 0, w),
            Target::Mapper(mapper) => self.format_mapper(mapper, w),
        }
    }

    fn format_mapper(&self, mapper: &Mapper, w: &mut impl Write) -> std::fmt::Result {
        writeln!(w, "Mapper {}", mapper.namespace)?;
        for fragment in &mapper.fragments {
            write!(w, "  Fragment {}", fragment.id)?;
            self.format_span(&fragment.span, w)?;
            writeln!(w)?;
            self.format_node(&fragment.root, 2, w)?;
        }
        for statement in &mapper.statements {
            let kind = statement.kind.tag();
            write!(w, "  {}{} {}", kind[..1].to_uppercase(), &kind[1..], statement.id)?;
            self.format_span(&statement.span, w)?;
            writeln!(w)?;
            self.format_node(&statement.root, 2, w)?;
        }
        Ok(())
    }

    fn format_span(&self, span: &std::ops::Range<usize>, w: &mut impl Write) -> std::fmt::Result {
        if self.spans {
            write!(w, " [{}..{}]", span.start, span.end)?;
        }
        Ok(())
    }

    fn format_children(
        &self,
        children: &[Node],
        depth: usize,
        w: &mut impl Write,
    ) -> std::fmt::Result {
        for child in children {
            self.format_node(child, depth, w)?;
        }
        Ok(())
    }

    fn format_node(&self, node: &Node, depth: usize, w: &mut impl Write) -> std::fmt::Result {
        let pad = "  ".repeat(depth);
        match node {
            Node::Text(content) => writeln!(w, "{pad}Text {content:?}"),
            Node::Parameter { name, raw: false } => writeln!(w, "{pad}Param #{{{name}}}"),
            Node::Parameter { name, raw: true } => writeln!(w, "{pad}Param ${{{name}}}"),
            Node::If { test, children } => {
                writeln!(w, "{pad}If {test:?}")?;
                self.format_children(children, depth + 1, w)
            }
            Node::Choose { whens, otherwise } => {
                writeln!(w, "{pad}Choose")?;
                for when in whens {
                    writeln!(w, "{pad}  When {:?}", when.test)?;
                    self.format_children(&when.children, depth + 2, w)?;
                }
                if let Some(otherwise) = otherwise {
                    writeln!(w, "{pad}  Otherwise")?;
                    self.format_children(otherwise, depth + 2, w)?;
                }
                Ok(())
            }
            Node::Where(children) => {
                writeln!(w, "{pad}Where")?;
                self.format_children(children, depth + 1, w)
            }
            Node::Set(children) => {
                writeln!(w, "{pad}Set")?;
                self.format_children(children, depth + 1, w)
            }
            Node::ForEach(each) => {
                writeln!(w, "{pad}ForEach {}", foreach_header(each))?;
                self.format_children(&each.children, depth + 1, w)
            }
            Node::Bind { name, value } => writeln!(w, "{pad}Bind {name} = {value:?}"),
            Node::Include(id) => writeln!(w, "{pad}Include {id}"),
            Node::Mixed(children) => {
                writeln!(w, "{pad}Mixed")?;
                self.format_children(children, depth + 1, w)
            }
        }
    }
}

fn foreach_header(each: &ForEach) -> String {
    let mut header = format!("{} as {}", each.collection, each.item);
    if let Some(index) = &each.index {
        let _ = write!(header, " index {index}");
    }
    for (label, value) in [
        ("open", &each.open),
        ("separator", &each.separator),
        ("close", &each.close),
    ] {
        if let Some(value) = value {
            let _ = write!(header, " {label} {value:?}");
        }
    }
    header
}
