//! # Pipeline
//!
//! An ordered, validated list of passes.
//!
//! Configuration mistakes (unknown or repeated pass names, heading ids
//! computed before heading math is trimmed, code import without a reader)
//! are rejected by [`PipelineBuilder::build`]. Once built, a pipeline is
//! immutable and every [`Pipeline::run`] gets a fresh [`RenderContext`].

use std::fmt;
use std::sync::Arc;

use crate::io::SourceReader;
use crate::parsing::{ParseOptions, parse_document_with};
use crate::passes::list_variant::{DEFAULT_COUNTER_PREFIX, DEFAULT_INDENT_UNIT};
use crate::passes::{
    CodeImportPass, GithubAlertPass, HeadingIdPass, ListVariantPass, MathHeaderPass, Pass,
    PassKind, RenderContext, TypographyPass, UnknownPass,
};
use crate::tree::Node;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    UnknownPass(#[from] UnknownPass),
    #[error("pass `{0}` is listed more than once")]
    DuplicatePass(PassKind),
    #[error("pass `{later}` must run before `{earlier}`")]
    OutOfOrder { earlier: PassKind, later: PassKind },
    #[error("pass `code-import` needs a source reader")]
    MissingReader,
}

pub struct Pipeline {
    passes: Vec<Box<dyn Pass>>,
    parse: ParseOptions,
    counter_prefix: String,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// The passes in the order they run.
    pub fn kinds(&self) -> Vec<PassKind> {
        self.passes.iter().map(|p| p.kind()).collect()
    }

    /// Runs every pass over `root` with a context scoped to this call.
    pub fn run(&self, mut root: Node) -> Node {
        let mut cx = RenderContext::new(&self.counter_prefix);
        for pass in &self.passes {
            log::debug!("running pass {}", pass.kind());
            pass.run(&mut root, &mut cx);
        }
        log::debug!("rendered with {} list counters", cx.counters.issued());
        root
    }

    /// Parses `markdown` and runs the pipeline over it.
    pub fn render(&self, markdown: &str) -> Node {
        self.run(parse_document_with(markdown, &self.parse))
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("passes", &self.kinds())
            .field("parse", &self.parse)
            .field("counter_prefix", &self.counter_prefix)
            .finish()
    }
}

#[derive(Clone)]
pub struct PipelineBuilder {
    passes: Vec<String>,
    reader: Option<Arc<dyn SourceReader>>,
    indent_unit: usize,
    tab_width: usize,
    counter_prefix: String,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            passes: PassKind::DEFAULT_ORDER
                .iter()
                .map(|k| k.name().to_string())
                .collect(),
            reader: None,
            indent_unit: DEFAULT_INDENT_UNIT,
            tab_width: ParseOptions::default().tab_width,
            counter_prefix: DEFAULT_COUNTER_PREFIX.to_string(),
        }
    }
}

impl PipelineBuilder {
    /// Replaces the pass list with these names, in run order.
    pub fn passes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.passes = names.into_iter().map(Into::into).collect();
        self
    }

    /// The default pass list minus `code-import`.
    pub fn without_code_import(mut self) -> Self {
        self.passes
            .retain(|name| name.trim() != PassKind::CodeImport.name());
        self
    }

    pub fn source_reader(mut self, reader: Arc<dyn SourceReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    pub fn indent_unit(mut self, indent_unit: usize) -> Self {
        self.indent_unit = indent_unit.max(1);
        self
    }

    pub fn tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width.max(1);
        self
    }

    pub fn counter_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.counter_prefix = prefix.into();
        self
    }

    pub fn build(self) -> Result<Pipeline, PipelineError> {
        let kinds = self
            .passes
            .iter()
            .map(|name| name.parse::<PassKind>())
            .collect::<Result<Vec<_>, _>>()?;
        validate_order(&kinds)?;

        let mut passes: Vec<Box<dyn Pass>> = Vec::with_capacity(kinds.len());
        for kind in kinds {
            passes.push(match kind {
                PassKind::CodeImport => {
                    let reader = self.reader.clone().ok_or(PipelineError::MissingReader)?;
                    Box::new(CodeImportPass::new(reader))
                }
                PassKind::GithubAlert => Box::new(GithubAlertPass),
                PassKind::Typography => Box::new(TypographyPass),
                PassKind::ListVariant => Box::new(ListVariantPass {
                    indent_unit: self.indent_unit,
                }),
                PassKind::MathHeader => Box::new(MathHeaderPass),
                PassKind::HeadingIds => Box::new(HeadingIdPass),
            });
        }

        Ok(Pipeline {
            passes,
            parse: ParseOptions {
                tab_width: self.tab_width,
            },
            counter_prefix: self.counter_prefix,
        })
    }
}

fn validate_order(kinds: &[PassKind]) -> Result<(), PipelineError> {
    for (ix, kind) in kinds.iter().enumerate() {
        if kinds[..ix].contains(kind) {
            return Err(PipelineError::DuplicatePass(*kind));
        }
    }
    let position = |kind| kinds.iter().position(|k| *k == kind);
    if let (Some(ids), Some(math)) = (
        position(PassKind::HeadingIds),
        position(PassKind::MathHeader),
    ) && ids < math
    {
        return Err(PipelineError::OutOfOrder {
            earlier: PassKind::HeadingIds,
            later: PassKind::MathHeader,
        });
    }
    Ok(())
}
