//! Compilation pipeline.
//!
//! parse -> expression checks -> include resolution -> safety analysis.
//! Every stage adds to one `Diagnostics`; only malformed mapper XML and
//! directive misuse stop the pipeline.

use std::sync::Arc;

use quarry_core::{MemberCache, ParameterAccessor, RenderContext, RenderedSql};

use crate::analyze::{UnsafeSubstitution, analyze, check_expressions, report_unsafe};
use crate::ast::Mapper;
use crate::diagnostics::Diagnostics;
use crate::emit::Emitter;
use crate::expr::ExpressionCache;
use crate::parser::parse_mapper;
use crate::render::Interpreter;
use crate::resolve::resolve_includes;
use crate::{Config, Error, Result};

/// Compiles mapper files and owns the caches their renders share.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: Config,
    members: Arc<MemberCache>,
    expressions: Arc<ExpressionCache>,
}

impl Compiler {
    pub fn new(config: Config) -> Self {
        Self::with_members(config, Arc::new(MemberCache::new()))
    }

    /// Compiler whose renders share an existing member cache.
    pub fn with_members(config: Config, members: Arc<MemberCache>) -> Self {
        Self {
            config,
            members,
            expressions: Arc::new(ExpressionCache::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn compile(&self, source: &str) -> Result<CompiledMapper> {
        let (parsed, mut diag) = parse_mapper(source)?;
        diag.extend(check_expressions(&parsed, &self.expressions));

        let (mapper, resolve_diag) = resolve_includes(&parsed);
        diag.extend(resolve_diag);

        let unsafe_substitutions = analyze(&mapper, &self.config);
        report_unsafe(&mapper, &unsafe_substitutions, &mut diag);

        tracing::debug!(
            namespace = %mapper.namespace,
            errors = diag.error_count(),
            warnings = diag.warning_count(),
            "compiled mapper"
        );

        Ok(CompiledMapper {
            mapper,
            diagnostics: diag,
            unsafe_substitutions,
            config: self.config.clone(),
            context: RenderContext::with_members(
                self.config.placeholder_style(),
                Arc::clone(&self.members),
            ),
            expressions: Arc::clone(&self.expressions),
        })
    }
}

/// A resolved mapper ready to render or emit.
///
/// Immutable; any number of threads may render from it at once.
#[derive(Debug)]
pub struct CompiledMapper {
    mapper: Mapper,
    diagnostics: Diagnostics,
    unsafe_substitutions: Vec<UnsafeSubstitution>,
    config: Config,
    context: RenderContext,
    expressions: Arc<ExpressionCache>,
}

impl CompiledMapper {
    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// No error-level diagnostics; warnings are allowed.
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.has_errors()
    }

    pub fn unsafe_substitutions(&self) -> &[UnsafeSubstitution] {
        &self.unsafe_substitutions
    }

    pub fn interpreter(&self) -> Interpreter<'_> {
        Interpreter::new(&self.context, &self.expressions)
    }

    /// Render statement `id` against `param`.
    pub fn render(&self, id: &str, param: &dyn ParameterAccessor) -> Result<RenderedSql> {
        let statement = self
            .mapper
            .statement(id)
            .ok_or_else(|| Error::UnknownStatement {
                namespace: self.mapper.namespace.clone(),
                id: id.to_string(),
            })?;
        Ok(self.interpreter().render_statement(statement, param))
    }

    /// Rust source of a module with one function per statement.
    pub fn emit(&self) -> String {
        Emitter::new(&self.mapper, &self.config).emit()
    }
}
