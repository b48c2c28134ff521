pub mod color_step;
pub mod io;
pub mod parsing;
pub mod passes;
pub mod pipeline;
pub mod slug;
pub mod tree;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use color_step::{get_color_step, get_step_color};
pub use io::*;
pub use parsing::{ParseOptions, parse_document, parse_document_with};
pub use passes::{Pass, PassKind, RenderContext, UnknownPass};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineError};
pub use slug::Slugger;
pub use tree::{Annotations, ListItemProps, ListProps, ListVariant, Node, NodeKind, Position, keys};
