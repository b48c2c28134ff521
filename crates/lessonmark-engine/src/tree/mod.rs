//! # Document Tree
//!
//! The closed node model every pass reads and rewrites.
//!
//! A [`Node`] is a tagged [`NodeKind`] plus ordered children, an
//! [`Annotations`] side-channel (string keys, string values, rendered as
//! `data-*` attributes downstream) and an optional source [`Position`].
//!
//! ## Key Invariants
//!
//! - Children order is document order
//! - Adjacent text is merged into a single `Text` node by the parser
//! - Annotations serialise in key order, so two runs produce identical output

pub mod props;

use std::collections::BTreeMap;

use serde::Serialize;

pub use props::{ListItemProps, ListProps, ListVariant};

/// Annotation keys written by the passes and read by the renderer.
pub mod keys {
    pub const STEP: &str = "data-step";
    pub const IS_DECIMAL_LIST: &str = "data-is-decimal-list";
    pub const LIST_VARIANT: &str = "data-list-variant";
    pub const COUNTER_ID: &str = "data-counter-id";
    pub const LEVEL: &str = "data-level";
    pub const DISPLAY_NUMBER: &str = "data-display-number";
    pub const CUSTOM_NUMBER: &str = "data-custom-number";
    pub const ALERT_TYPE: &str = "data-alert-type";
    pub const COLLAPSIBLE: &str = "data-collapsible";
    pub const SOURCE_FILE: &str = "data-source-file";
}

/// Source location of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
    /// 1-based line of `start`.
    pub line: usize,
    /// 0-based visual column of `start`, tabs expanded.
    pub column: usize,
}

/// String-keyed side data attached to a node by the passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Annotations(BTreeMap<String, String>);

impl Annotations {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// The kind of a node, with the scalar data that kind carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeKind {
    Root,
    Heading {
        depth: u8,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
    Paragraph,
    List(ListProps),
    ListItem(ListItemProps),
    BlockQuote,
    Alert {
        #[serde(rename = "alertType")]
        alert_type: String,
        collapsible: bool,
    },
    Code {
        #[serde(skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        meta: Option<String>,
        value: String,
    },
    DisplayMath {
        value: String,
    },
    Html {
        value: String,
    },
    Table,
    TableRow,
    TableCell,
    ThematicBreak,
    Text {
        value: String,
    },
    Emphasis,
    Strong,
    Strikethrough,
    InlineCode {
        value: String,
    },
    InlineMath {
        value: String,
    },
    Link {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Image {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    SoftBreak,
    Break,
}

impl NodeKind {
    /// Inline-level kinds live inside paragraphs, headings and table cells.
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            NodeKind::Text { .. }
                | NodeKind::Emphasis
                | NodeKind::Strong
                | NodeKind::Strikethrough
                | NodeKind::InlineCode { .. }
                | NodeKind::InlineMath { .. }
                | NodeKind::Link { .. }
                | NodeKind::Image { .. }
                | NodeKind::SoftBreak
                | NodeKind::Break
        )
    }

    pub fn is_line_break(&self) -> bool {
        matches!(self, NodeKind::SoftBreak | NodeKind::Break)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(skip_serializing_if = "Annotations::is_empty")]
    pub annotations: Annotations,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            annotations: Annotations::default(),
            position: None,
        }
    }

    pub fn with_children(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::new(kind)
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Text {
            value: value.into(),
        })
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Returns the text value when this is a `Text` node.
    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { value } => Some(value),
            _ => None,
        }
    }

    /// Mutable access to the text value when this is a `Text` node.
    pub fn as_text_mut(&mut self) -> Option<&mut String> {
        match &mut self.kind {
            NodeKind::Text { value } => Some(value),
            _ => None,
        }
    }

    /// Concatenated visible text of this node and its descendants.
    ///
    /// Inline code and inline math contribute their source exactly once;
    /// line breaks contribute a single space.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text { value }
            | NodeKind::InlineCode { value }
            | NodeKind::InlineMath { value }
            | NodeKind::DisplayMath { value }
            | NodeKind::Code { value, .. } => out.push_str(value),
            NodeKind::SoftBreak | NodeKind::Break => out.push(' '),
            _ => {}
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Visits this node and every descendant, parents before children.
    pub fn visit_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut Node),
    {
        f(self);
        for child in &mut self.children {
            child.visit_mut(f);
        }
    }

    /// Visits this node and every descendant, parents before children.
    pub fn visit<F>(&self, f: &mut F)
    where
        F: FnMut(&Node),
    {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_content_counts_math_once() {
        let heading = Node::with_children(
            NodeKind::Heading { depth: 2, id: None },
            vec![
                Node::text("Cost "),
                Node::new(NodeKind::InlineMath {
                    value: "ElogV".into(),
                }),
            ],
        );

        assert_eq!(heading.text_content(), "Cost ElogV");
    }

    #[test]
    fn soft_breaks_read_as_spaces() {
        let para = Node::with_children(
            NodeKind::Paragraph,
            vec![
                Node::text("one"),
                Node::new(NodeKind::SoftBreak),
                Node::text("two"),
            ],
        );

        assert_eq!(para.text_content(), "one two");
    }

    #[test]
    fn annotations_serialise_in_key_order() {
        let mut node = Node::text("x");
        node.annotations.insert(keys::STEP, "red");
        node.annotations.insert(keys::COUNTER_ID, "list-1");

        let order: Vec<_> = node.annotations.iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec![keys::COUNTER_ID, keys::STEP]);
    }

    #[test]
    fn visit_mut_reaches_every_descendant() {
        let mut root = Node::with_children(
            NodeKind::Root,
            vec![Node::with_children(
                NodeKind::Paragraph,
                vec![Node::text("a"), Node::text("b")],
            )],
        );

        let mut count = 0;
        root.visit_mut(&mut |_| count += 1);
        assert_eq!(count, 4);
    }
}
