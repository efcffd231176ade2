//! Mapper XML reader.
//!
//! Walks the quick-xml event stream and builds statements, fragments and
//! their template trees. XML-level errors stop the reader; directive misuse is
//! reported and parsing continues so one pass reports every problem.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::placeholder::{push_text, scan};
use crate::ast::{ForEach, Fragment, Mapper, Node, Statement, StatementKind, When};
use crate::diagnostics::{DiagnosticKind, Diagnostics, Span};
use crate::{Error, PassResult};

/// Top-level elements that belong to other layers of the library.
const FOREIGN_DECLARATIONS: &[&str] = &["resultMap", "parameterMap", "cache", "cache-ref"];

/// Parse a whole mapper file.
pub fn parse_mapper(source: &str) -> PassResult<Mapper> {
    let mut parser = MapperParser::new(source);
    let result = parser.mapper();
    if let Ok(mapper) = &result {
        tracing::debug!(
            namespace = %mapper.namespace,
            statements = mapper.statements.len(),
            fragments = mapper.fragments.len(),
            "parsed mapper"
        );
    }
    parser.finish(result)
}

/// Parse bare template content: text with placeholders and directive elements.
pub fn parse_template(text: &str) -> PassResult<Node> {
    let mut parser = MapperParser::new(text);
    let result = parser.children(None).map(Node::sequence);
    parser.finish(result)
}

/// Parse bare template content as a named fragment.
pub fn parse_fragment(id: &str, text: &str) -> PassResult<Fragment> {
    let (root, diag) = parse_template(text)?;
    let fragment = Fragment {
        id: id.to_string(),
        root,
        span: 0..text.len(),
    };
    Ok((fragment, diag))
}

/// The reader hit an XML error and cannot continue.
struct Halt;

type Step<T> = std::result::Result<T, Halt>;

struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    span: Span,
    empty: bool,
}

impl Element {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

enum Item {
    Open(Element),
    Text(String),
    Close,
    Eof,
}

struct MapperParser<'s> {
    reader: Reader<&'s [u8]>,
    diag: Diagnostics,
    namespace: String,
    /// Qualified id of the declaration being parsed.
    owner: Option<String>,
}

impl<'s> MapperParser<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            reader: Reader::from_str(source),
            diag: Diagnostics::new(),
            namespace: String::new(),
            owner: None,
        }
    }

    fn finish<T>(self, result: Step<T>) -> PassResult<T> {
        match result {
            Ok(value) if !self.diag.has_fatal() => Ok((value, self.diag)),
            _ => Err(Error::TemplateParseError(self.diag)),
        }
    }

    fn position(&self) -> usize {
        self.reader.buffer_position() as usize
    }

    fn report(&mut self, kind: DiagnosticKind, span: Span, detail: impl Into<String>) {
        let builder = self.diag.report(kind, span).message(detail);
        match &self.owner {
            Some(owner) => builder.owner(owner.clone()).emit(),
            None => builder.emit(),
        }
    }

    /// Report with the kind's own message.
    fn report_plain(&mut self, kind: DiagnosticKind, span: Span) {
        let builder = self.diag.report(kind, span);
        match &self.owner {
            Some(owner) => builder.owner(owner.clone()).emit(),
            None => builder.emit(),
        }
    }

    fn malformed<T>(&mut self, span: Span, detail: impl Into<String>) -> Step<T> {
        self.report(DiagnosticKind::MalformedXml, span, detail);
        Err(Halt)
    }

    fn next(&mut self) -> Step<Item> {
        loop {
            let start = self.position();
            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(err) => {
                    let end = self.position().max(start);
                    return self.malformed(start..end, err.to_string());
                }
            };
            let end = self.position();
            let span = start..end;

            // Tag spans are measured back from the closing `>`.
            match event {
                Event::Start(e) => {
                    let span = end.saturating_sub(e.len() + 2)..end;
                    return self.element(&e, span, false).map(Item::Open);
                }
                Event::Empty(e) => {
                    let span = end.saturating_sub(e.len() + 3)..end;
                    return self.element(&e, span, true).map(Item::Open);
                }
                Event::End(_) => return Ok(Item::Close),
                Event::Text(text) => {
                    return match text.unescape() {
                        Ok(text) => Ok(Item::Text(text.into_owned())),
                        Err(err) => self.malformed(span, err.to_string()),
                    };
                }
                Event::CData(data) => {
                    let bytes = data.into_inner();
                    return Ok(Item::Text(String::from_utf8_lossy(&bytes).into_owned()));
                }
                Event::Eof => return Ok(Item::Eof),
                // Comments, declarations, processing instructions, doctype
                _ => {}
            }
        }
    }

    fn element(&mut self, start: &BytesStart<'_>, span: Span, empty: bool) -> Step<Element> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = match attr {
                Ok(attr) => attr,
                Err(err) => return self.malformed(span, err.to_string()),
            };
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = match attr.unescape_value() {
                Ok(value) => value.into_owned(),
                Err(err) => return self.malformed(span, err.to_string()),
            };
            attributes.push((key, value));
        }
        Ok(Element {
            name,
            attributes,
            span,
            empty,
        })
    }

    fn required(&mut self, element: &Element, attr: &str) -> Option<String> {
        let value = element.attr(attr).map(str::to_string);
        if value.is_none() {
            self.report(
                DiagnosticKind::MissingAttribute,
                element.span.clone(),
                format!("`{attr}` on `<{}>`", element.name),
            );
        }
        value
    }

    fn unclosed<T>(&mut self, element: &Element) -> Step<T> {
        let span = element.span.clone();
        self.malformed(span, format!("`<{}>` is never closed", element.name))
    }

    fn mapper(&mut self) -> Step<Mapper> {
        let root = loop {
            match self.next()? {
                Item::Open(element) => break element,
                Item::Text(text) if text.trim().is_empty() => {}
                Item::Text(_) | Item::Close => {
                    let at = self.position();
                    return self.malformed(at..at, "content outside `<mapper>`");
                }
                Item::Eof => return self.malformed(0..0, "missing `<mapper>` root element"),
            }
        };

        if root.name != "mapper" {
            let detail = format!("expected `<mapper>` root element, found `<{}>`", root.name);
            return self.malformed(root.span, detail);
        }

        let namespace = self.required(&root, "namespace").unwrap_or_default();
        self.namespace = namespace.clone();
        let mut mapper = Mapper::new(namespace);
        if root.empty {
            return Ok(mapper);
        }

        loop {
            match self.next()? {
                Item::Open(element) => self.declaration(element, &mut mapper)?,
                Item::Text(_) => {}
                Item::Close => return Ok(mapper),
                Item::Eof => return self.unclosed(&root),
            }
        }
    }

    fn declaration(&mut self, element: Element, mapper: &mut Mapper) -> Step<()> {
        if element.name == "sql" {
            return self.fragment(element, mapper);
        }
        if let Some(kind) = StatementKind::from_tag(&element.name) {
            return self.statement(kind, element, mapper);
        }
        if !FOREIGN_DECLARATIONS.contains(&element.name.as_str()) {
            let name = element.name.clone();
            self.report(DiagnosticKind::UnknownElement, element.span.clone(), name);
        }
        self.skip(&element)
    }

    fn statement(&mut self, kind: StatementKind, element: Element, mapper: &mut Mapper) -> Step<()> {
        let id = element.attr("id").map(str::to_string);
        self.owner = Some(mapper.qualify(id.as_deref().unwrap_or("?")));
        if id.is_none() {
            self.required(&element, "id");
        }

        let children = self.children(Some(&element))?;
        let span = element.span.start..self.position();
        let timeout_seconds = self.number(&element, "timeout");
        self.owner = None;

        let Some(id) = id else {
            return Ok(());
        };
        if mapper.statement(&id).is_some() {
            self.diag
                .report(DiagnosticKind::DuplicateStatement, span)
                .message(id.as_str())
                .owner(mapper.qualify(&id))
                .emit();
            return Ok(());
        }

        mapper.statements.push(Statement {
            id,
            kind,
            root: Node::sequence(children),
            result_mapping_ref: element
                .attr("resultMap")
                .or_else(|| element.attr("resultType"))
                .map(str::to_string),
            param_type_ref: element.attr("parameterType").map(str::to_string),
            timeout_seconds,
            span,
        });
        Ok(())
    }

    fn fragment(&mut self, element: Element, mapper: &mut Mapper) -> Step<()> {
        let id = element.attr("id").map(str::to_string);
        self.owner = Some(mapper.qualify(id.as_deref().unwrap_or("?")));
        if id.is_none() {
            self.required(&element, "id");
        }

        let children = self.children(Some(&element))?;
        let span = element.span.start..self.position();
        self.owner = None;

        let Some(id) = id else {
            return Ok(());
        };
        if mapper.fragment(&id).is_some() {
            self.diag
                .report(DiagnosticKind::DuplicateFragment, span)
                .message(id.as_str())
                .owner(mapper.qualify(&id))
                .emit();
            return Ok(());
        }

        mapper.fragments.push(Fragment {
            id,
            root: Node::sequence(children),
            span,
        });
        Ok(())
    }

    /// Optional numeric attribute; a malformed value is dropped with a warning.
    fn number(&mut self, element: &Element, attr: &str) -> Option<u32> {
        let raw = element.attr(attr)?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                let detail = raw.to_string();
                self.report(DiagnosticKind::InvalidNumber, element.span.clone(), detail);
                None
            }
        }
    }

    /// Parse content up to the close of `parent`, or to end of input when
    /// there is no parent.
    fn children(&mut self, parent: Option<&Element>) -> Step<Vec<Node>> {
        let mut nodes = Vec::new();
        if parent.is_some_and(|p| p.empty) {
            return Ok(nodes);
        }

        loop {
            match self.next()? {
                Item::Text(text) => {
                    for node in scan(&text) {
                        push_node(&mut nodes, node);
                    }
                }
                Item::Open(element) => self.directive(element, &mut nodes)?,
                Item::Close => return Ok(nodes),
                Item::Eof => match parent {
                    Some(parent) => return self.unclosed(parent),
                    None => return Ok(nodes),
                },
            }
        }
    }

    fn directive(&mut self, element: Element, nodes: &mut Vec<Node>) -> Step<()> {
        let node = match element.name.as_str() {
            "if" => {
                let test = self.required(&element, "test").unwrap_or_default();
                let children = self.children(Some(&element))?;
                Node::If { test, children }
            }
            "choose" => self.choose(&element)?,
            "where" => Node::Where(self.children(Some(&element))?),
            "set" => Node::Set(self.children(Some(&element))?),
            "foreach" => {
                let collection = self.required(&element, "collection").unwrap_or_default();
                let item = self.required(&element, "item").unwrap_or_default();
                let children = self.children(Some(&element))?;
                Node::ForEach(ForEach {
                    collection,
                    item,
                    index: element.attr("index").map(str::to_string),
                    open: element.attr("open").map(str::to_string),
                    close: element.attr("close").map(str::to_string),
                    separator: element.attr("separator").map(str::to_string),
                    children,
                })
            }
            "bind" => {
                let name = self.required(&element, "name").unwrap_or_default();
                let value = self.required(&element, "value").unwrap_or_default();
                self.skip(&element)?;
                Node::Bind { name, value }
            }
            "include" => {
                let refid = self.required(&element, "refid").unwrap_or_default();
                self.skip(&element)?;
                Node::Include(self.local_ref(refid))
            }
            _ => {
                let name = element.name.clone();
                self.report(DiagnosticKind::UnknownElement, element.span.clone(), name);
                for node in self.children(Some(&element))? {
                    push_node(nodes, node);
                }
                return Ok(());
            }
        };
        nodes.push(node);
        Ok(())
    }

    fn choose(&mut self, element: &Element) -> Step<Node> {
        let mut whens = Vec::new();
        let mut otherwise = None;

        if !element.empty {
            loop {
                match self.next()? {
                    Item::Open(branch) if branch.name == "when" => {
                        let test = self.required(&branch, "test").unwrap_or_default();
                        let children = self.children(Some(&branch))?;
                        whens.push(When { test, children });
                    }
                    Item::Open(branch) if branch.name == "otherwise" => {
                        let children = self.children(Some(&branch))?;
                        if otherwise.is_some() {
                            self.report_plain(DiagnosticKind::DuplicateOtherwise, branch.span.clone());
                        } else {
                            otherwise = Some(children);
                        }
                    }
                    Item::Open(other) => {
                        let name = other.name.clone();
                        self.report(DiagnosticKind::UnknownElement, other.span.clone(), name);
                        self.skip(&other)?;
                    }
                    Item::Text(_) => {}
                    Item::Close => break,
                    Item::Eof => return self.unclosed(element),
                }
            }
        }

        if whens.is_empty() {
            self.report_plain(DiagnosticKind::EmptyChoose, element.span.clone());
        }

        Ok(Node::Choose { whens, otherwise })
    }

    /// Skip an element and everything inside it.
    fn skip(&mut self, element: &Element) -> Step<()> {
        if element.empty {
            return Ok(());
        }
        let mut depth = 1usize;
        loop {
            match self.next()? {
                Item::Open(inner) if !inner.empty => depth += 1,
                Item::Close => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Item::Eof => return self.unclosed(element),
                _ => {}
            }
        }
    }

    /// Strip this mapper's namespace from a qualified include reference.
    fn local_ref(&self, refid: String) -> String {
        if self.namespace.is_empty() {
            return refid;
        }
        match refid
            .strip_prefix(self.namespace.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
        {
            Some(local) => local.to_string(),
            None => refid,
        }
    }
}

fn push_node(nodes: &mut Vec<Node>, node: Node) {
    match node {
        Node::Text(text) => push_text(nodes, &text),
        other => nodes.push(other),
    }
}
