//! Template AST.
//!
//! Trees are immutable once built. Passes such as include resolution produce
//! a new tree instead of editing the old one.

mod printer;


pub use printer::AstPrinter;

use crate::diagnostics::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    /// `#{name}` when `raw` is false, `${name}` when true.
    Parameter {
        name: String,
        raw: bool,
    },
    If {
        test: String,
        children: Vec<Node>,
    },
    Choose {
        whens: Vec<When>,
        otherwise: Option<Vec<Node>>,
    },
    Where(Vec<Node>),
    Set(Vec<Node>),
    ForEach(ForEach),
    Bind {
        name: String,
        value: String,
    },
    Include(String),
    Mixed(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct When {
    pub test: String,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ForEach {
    pub collection: String,
    pub item: String,
    pub index: Option<String>,
    pub open: Option<String>,
    pub close: Option<String>,
    pub separator: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(content.into())
    }

    pub fn bound(name: impl Into<String>) -> Self {
        Node::Parameter {
            name: name.into(),
            raw: false,
        }
    }

    pub fn raw(name: impl Into<String>) -> Self {
        Node::Parameter {
            name: name.into(),
            raw: true,
        }
    }

    /// Collapse parsed children into one node.
    ///
    /// One child is returned as is, none becomes empty text, several are
    /// wrapped in `Mixed`.
    pub fn sequence(mut children: Vec<Node>) -> Self {
        match children.len() {
            0 => Node::Text(String::new()),
            1 => children.remove(0),
            _ => Node::Mixed(children),
        }
    }

    /// Direct child lists of this node, `when` branches and `otherwise` included.
    pub fn child_lists(&self) -> Vec<&[Node]> {
        match self {
            Node::Text(_) | Node::Parameter { .. } | Node::Bind { .. } | Node::Include(_) => {
                Vec::new()
            }
            Node::If { children, .. } => vec![children.as_slice()],
            Node::Choose { whens, otherwise } => {
                let mut lists: Vec<&[Node]> = whens.iter().map(|w| w.children.as_slice()).collect();
                if let Some(otherwise) = otherwise {
                    lists.push(otherwise.as_slice());
                }
                lists
            }
            Node::Where(children) | Node::Set(children) | Node::Mixed(children) => {
                vec![children.as_slice()]
            }
            Node::ForEach(each) => vec![each.children.as_slice()],
        }
    }

    /// Whether any `Include` remains in this tree.
    pub fn has_includes(&self) -> bool {
        match self {
            Node::Include(_) => true,
            other => other
                .child_lists()
                .into_iter()
                .flatten()
                .any(Node::has_includes),
        }
    }

    pub fn printer(&self) -> AstPrinter<'_> {
        AstPrinter::new(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "select" => Some(StatementKind::Select),
            "insert" => Some(StatementKind::Insert),
            "update" => Some(StatementKind::Update),
            "delete" => Some(StatementKind::Delete),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            StatementKind::Select => "select",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub id: String,
    pub kind: StatementKind,
    pub root: Node,
    /// `resultMap` or `resultType`.
    pub result_mapping_ref: Option<String>,
    /// `parameterType`.
    pub param_type_ref: Option<String>,
    pub timeout_seconds: Option<u32>,
    /// Byte range of the declaring element in the mapper source.
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub id: String,
    pub root: Node,
    pub span: Span,
}

/// All statements and fragments declared by one mapper file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mapper {
    pub namespace: String,
    pub statements: Vec<Statement>,
    pub fragments: Vec<Fragment>,
}

impl Mapper {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    pub fn statement(&self, id: &str) -> Option<&Statement> {
        self.statements.iter().find(|s| s.id == id)
    }

    pub fn fragment(&self, id: &str) -> Option<&Fragment> {
        self.fragments.iter().find(|f| f.id == id)
    }

    /// `namespace.id` of a statement or fragment.
    pub fn qualify(&self, id: &str) -> String {
        if self.namespace.is_empty() {
            id.to_string()
        } else {
            format!("{}.{}", self.namespace, id)
        }
    }

    pub fn printer(&self) -> AstPrinter<'_> {
        AstPrinter::mapper(self)
    }
}
