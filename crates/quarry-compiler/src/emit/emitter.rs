//! Rust source emitter.
//!
//! Every statement of a resolved mapper becomes one function that builds its
//! SQL with straight-line code: tests are translated, `where`/`set` bodies
//! land in side buffers and are trimmed with the runtime helpers, and loops
//! iterate the resolved collection directly.

use quarry_core::SAFE_IDENTIFIER_TYPE;

use super::naming::{NameTable, to_snake_case};
use crate::Config;
use crate::ast::{ForEach, Mapper, Node, Statement};
use crate::expr::{
    Locals, Path, parse_bind, parse_test, translate_bind, translate_path, translate_test,
};

/// Names imported into every generated module.
const IMPORTS: &[&str] = &[
    "compare",
    "truthy",
    "guard_identifier",
    "items",
    "stringify",
    "trim_set_body",
    "trim_where_body",
];

const INDENT: &str = "    ";

/// Emits one Rust module per mapper.
pub struct Emitter<'a> {
    mapper: &'a Mapper,
    config: &'a Config,
}

impl<'a> Emitter<'a> {
    pub fn new(mapper: &'a Mapper, config: &'a Config) -> Self {
        Self { mapper, config }
    }

    /// Name of the generated module.
    pub fn module_name(&self) -> String {
        to_snake_case(&self.mapper.namespace)
    }

    pub fn emit(&self) -> String {
        let mut out = Source::default();
        let mut names = NameTable::with_reserved(IMPORTS);

        out.line(&format!("/// Statements of mapper `{}`.", self.mapper.namespace));
        out.line("#[allow(unused_imports, unused_mut, unused_parens, unused_variables, clippy::all)]");
        out.open(&format!("pub mod {} {{", self.module_name()));
        out.line("use ::quarry_core::ops::{compare, truthy};");
        out.line("use ::quarry_core::runtime::{");
        out.line("    guard_identifier, items, stringify, trim_set_body, trim_where_body,");
        out.line("};");
        out.line(
            "use ::quarry_core::{CompareOp, GuardViolation, ParameterAccessor, RenderContext, RenderedSql, Value};",
        );

        for statement in &self.mapper.statements {
            let name = names.unique(&statement.id);
            tracing::trace!(statement = %statement.id, function = %name, "emitting statement");
            out.blank();
            FunctionEmitter::new(self.mapper, statement, self.config, &mut out).emit(&name);
        }

        out.close("}");
        tracing::debug!(
            namespace = %self.mapper.namespace,
            functions = self.mapper.statements.len(),
            "emitted mapper module"
        );
        out.text
    }
}

/// Indented line writer.
#[derive(Default)]
struct Source {
    text: String,
    depth: usize,
}

impl Source {
    fn line(&mut self, line: &str) {
        for _ in 0..self.depth {
            self.text.push_str(INDENT);
        }
        self.text.push_str(line);
        self.text.push('\n');
    }

    fn blank(&mut self) {
        self.text.push('\n');
    }

    fn open(&mut self, line: &str) {
        self.line(line);
        self.depth += 1;
    }

    fn close(&mut self, line: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(line);
    }

    /// Close one block and open the next on the same line, as in `} else {`.
    fn reopen(&mut self, line: &str) {
        self.close(line);
        self.depth += 1;
    }
}

struct FunctionEmitter<'a> {
    statement: &'a Statement,
    qualified: String,
    config: &'a Config,
    out: &'a mut Source,
    locals: Locals,
    next_var: usize,
}

impl<'a> FunctionEmitter<'a> {
    fn new(
        mapper: &Mapper,
        statement: &'a Statement,
        config: &'a Config,
        out: &'a mut Source,
    ) -> Self {
        Self {
            statement,
            qualified: mapper.qualify(&statement.id),
            config,
            out,
            locals: Locals::new(),
            next_var: 0,
        }
    }

    fn emit(mut self, name: &str) {
        let doc = format!("/// `{}`", self.qualified);
        self.out.line(&doc);
        self.out.open(&format!(
            "pub fn {name}(param: &dyn ParameterAccessor, cx: &RenderContext) -> Result<RenderedSql, GuardViolation> {{"
        ));
        self.out.line("let mut sql = String::new();");
        self.out.line("let mut params = Vec::new();");
        let statement = self.statement;
        self.node(&statement.root, "sql");
        self.out.line("Ok(RenderedSql::finish(&sql, params))");
        self.out.close("}");
    }

    fn var(&mut self, prefix: &str) -> String {
        let name = format!("__{prefix}{}", self.next_var);
        self.next_var += 1;
        name
    }

    /// Children in their own Rust block, with locals dropped at its end.
    fn scoped(&mut self, header: &str, nodes: &[Node], buf: &str) {
        let mark = self.locals.len();
        self.out.open(header);
        self.sequence(nodes, buf);
        self.out.close("}");
        self.locals.truncate(mark);
    }

    fn sequence(&mut self, nodes: &[Node], buf: &str) {
        for node in nodes {
            self.node(node, buf);
        }
    }

    fn test(&self, source: &str) -> String {
        translate_test(&parse_test(source), &self.locals)
    }

    fn node(&mut self, node: &Node, buf: &str) {
        match node {
            Node::Text(text) if text.is_empty() => {}
            Node::Text(text) => self.out.line(&format!("{buf}.push_str({text:?});")),
            Node::Parameter { name, raw: false } => {
                let value = translate_path(&Path::from_placeholder(name), &self.locals);
                self.out
                    .line(&format!("{buf}.push_str(&cx.bind(&mut params, {value}));"));
            }
            Node::Parameter { name, raw: true } => self.raw(name, buf),
            Node::If { test, children } => {
                let header = format!("if {} {{", self.test(test));
                self.scoped(&header, children, buf);
            }
            Node::Choose { whens, otherwise } => {
                for (i, when) in whens.iter().enumerate() {
                    let test = self.test(&when.test);
                    let mark = self.locals.len();
                    if i == 0 {
                        self.out.open(&format!("if {test} {{"));
                    } else {
                        self.out.reopen(&format!("}} else if {test} {{"));
                    }
                    self.sequence(&when.children, buf);
                    self.locals.truncate(mark);
                }
                match otherwise {
                    Some(children) if whens.is_empty() => self.scoped("{", children, buf),
                    Some(children) => {
                        let mark = self.locals.len();
                        self.out.reopen("} else {");
                        self.sequence(children, buf);
                        self.out.close("}");
                        self.locals.truncate(mark);
                    }
                    None if whens.is_empty() => {}
                    None => self.out.close("}"),
                }
            }
            Node::Where(children) => {
                self.clause(children, buf, "where", "trim_where_body", " WHERE ")
            }
            Node::Set(children) => self.clause(children, buf, "set", "trim_set_body", " SET "),
            Node::ForEach(each) => self.for_each(each, buf),
            Node::Bind { name, value } => {
                let var = self.var("bind");
                let expr = translate_bind(&parse_bind(value), &self.locals);
                self.out.line(&format!("let {var} = {expr};"));
                self.locals.push(name.clone(), var);
            }
            Node::Include(id) => {
                self.out.line(&format!("// include `{id}` was never resolved"));
            }
            Node::Mixed(children) => self.sequence(children, buf),
        }
    }

    fn raw(&mut self, name: &str, buf: &str) {
        let path = Path::from_placeholder(name);
        let value = translate_path(&path, &self.locals);
        let parameter = path.to_string();
        let trusted =
            self.config.declared_type(&self.statement.id, &parameter) == Some(SAFE_IDENTIFIER_TYPE);

        let line = if trusted {
            format!("{buf}.push_str(&stringify(&{value}));")
        } else {
            format!(
                "{buf}.push_str(&guard_identifier({:?}, {parameter:?}, &{value})?);",
                self.qualified
            )
        };
        self.out.line(&line);
    }

    fn clause(&mut self, children: &[Node], buf: &str, prefix: &str, trim: &str, keyword: &str) {
        let body = self.var(prefix);
        let mark = self.locals.len();
        self.out.open("{");
        self.out.line(&format!("let mut {body} = String::new();"));
        self.sequence(children, &body);
        self.out.line(&format!("let {body} = {trim}(&{body});"));
        self.out.open(&format!("if !{body}.is_empty() {{"));
        self.out.line(&format!("{buf}.push_str({keyword:?});"));
        self.out.line(&format!("{buf}.push_str({body});"));
        self.out.close("}");
        self.out.close("}");
        self.locals.truncate(mark);
    }

    fn for_each(&mut self, each: &ForEach, buf: &str) {
        let collection = translate_path(&Path::from_placeholder(&each.collection), &self.locals);
        let coll = self.var("coll");
        let elements = self.var("items");
        let i = self.var("i");
        let item = self.var("item");

        self.out.line(&format!("let {coll} = {collection};"));
        self.out.open(&format!("if let Some({elements}) = items(&{coll}) {{"));
        if let Some(open) = &each.open {
            self.out.line(&format!("{buf}.push_str({open:?});"));
        }
        self.out.open(&format!(
            "for ({i}, {item}) in {elements}.iter().enumerate() {{"
        ));
        if let Some(separator) = each.separator.as_deref().filter(|s| !s.is_empty()) {
            self.out.open(&format!("if {i} > 0 {{"));
            self.out.line(&format!("{buf}.push_str({separator:?});"));
            self.out.close("}");
        }

        let mark = self.locals.len();
        self.locals.push(each.item.clone(), item);
        if let Some(index) = &each.index {
            let var = self.var("index");
            self.out.line(&format!("let {var} = Value::from({i});"));
            self.locals.push(index.clone(), var);
        }
        self.sequence(&each.children, buf);
        self.locals.truncate(mark);

        self.out.close("}");
        if let Some(close) = &each.close {
            self.out.line(&format!("{buf}.push_str({close:?});"));
        }
        self.out.close("}");
    }
}

/// Emit every mapper into one source file, modules in order.
pub fn emit_all<'m>(mappers: impl IntoIterator<Item = &'m Mapper>, config: &Config) -> String {
    mappers
        .into_iter()
        .map(|mapper| Emitter::new(mapper, config).emit())
        .collect::<Vec<_>>()
        .join("\n")
}
