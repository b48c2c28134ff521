use std::sync::OnceLock;

use regex::Regex;

use crate::color_step::{canonical_color, get_step_color};
use crate::tree::{Node, NodeKind, keys};

use super::{Pass, PassKind, RenderContext};

/// The `[key!]` color-step marker with its syntax knowledge.
pub struct StepMarker;

impl StepMarker {
    pub const OPEN: char = '[';
    pub const CLOSE: &'static str = "!]";

    fn pattern() -> &'static Regex {
        static MARKER: OnceLock<Regex> = OnceLock::new();
        MARKER.get_or_init(|| {
            Regex::new(r"^\[(-?[0-9]+|[A-Za-z]+)!\]").expect("Invalid step marker regex")
        })
    }

    /// Splits a leading marker off `text`, returning the resolved color and
    /// the visible remainder.
    ///
    /// Numbers wrap around the palette; names must be known colors. Anything
    /// else is not a marker.
    pub fn scan(text: &str) -> Option<(&'static str, &str)> {
        if !text.starts_with(Self::OPEN) {
            return None;
        }
        let caps = Self::pattern().captures(text)?;
        let spec = caps.get(1)?.as_str();
        let color = match spec.parse::<i64>() {
            Ok(step) => get_step_color(step),
            Err(_) if spec.chars().all(|c| c.is_ascii_alphabetic()) => canonical_color(spec)?,
            Err(_) => return None,
        };
        let consumed = caps.get(0)?.end();
        Some((color, &text[consumed..]))
    }
}

/// Annotates strong, emphasis and inline code carrying a step marker.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypographyPass;

impl Pass for TypographyPass {
    fn kind(&self) -> PassKind {
        PassKind::Typography
    }

    fn run(&self, root: &mut Node, _cx: &mut RenderContext) {
        root.visit_mut(&mut |node| {
            if let Some(color) = strip_marker(node) {
                node.annotations.insert(keys::STEP, color);
            }
        });
    }
}

fn strip_marker(node: &mut Node) -> Option<&'static str> {
    match &mut node.kind {
        NodeKind::InlineCode { value } => {
            let (color, rest) = StepMarker::scan(value)?;
            *value = rest.to_string();
            Some(color)
        }
        NodeKind::Strong | NodeKind::Emphasis => {
            let first = node.children.first_mut()?;
            let text = first.as_text_mut()?;
            let (color, rest) = StepMarker::scan(text)?;
            *text = rest.to_string();
            if text.is_empty() && node.children.len() > 1 {
                node.children.remove(0);
            }
            Some(color)
        }
        _ => None,
    }
}
