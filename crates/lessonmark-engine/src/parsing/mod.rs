//! # Parsing
//!
//! Markdown source to [`Node`] tree.
//!
//! pulldown-cmark does the CommonMark work; [`builder::TreeBuilder`] folds its
//! offset event stream into the tree and records the line and column every
//! node starts at, including lazily continued list lines.
//!
//! GitHub blockquote tags are not enabled: `[!TYPE]` markers stay in the text
//! for the alert pass, which also reads the `:collapse` suffix.

pub mod builder;
pub mod lines;

use pulldown_cmark::{Options, Parser};

use crate::tree::Node;
use builder::TreeBuilder;

/// Tab stop used when no configuration says otherwise.
pub const DEFAULT_TAB_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub tab_width: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

/// Parses a Markdown document with default options.
pub fn parse_document(markdown: &str) -> Node {
    parse_document_with(markdown, &ParseOptions::default())
}

pub fn parse_document_with(markdown: &str, options: &ParseOptions) -> Node {
    let mut flags = Options::empty();
    flags.insert(Options::ENABLE_TABLES);
    flags.insert(Options::ENABLE_STRIKETHROUGH);
    flags.insert(Options::ENABLE_TASKLISTS);
    flags.insert(Options::ENABLE_MATH);
    flags.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    flags.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);

    let mut builder = TreeBuilder::new(markdown, options.tab_width);
    for (event, range) in Parser::new_ext(markdown, flags).into_offset_iter() {
        builder.push(event, range);
    }
    builder.finish()
}
