use crate::tree::{Annotations, ListProps, Node, NodeKind, Position};

use super::labels::{ItemMarker, Label};

/// Where a flat item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A CommonMark list item, at this depth of native list nesting.
    Native { depth: usize },
    /// A continuation line that starts with a label or custom bullet.
    Line,
}

/// One list item, detached from the nesting the parser gave it.
#[derive(Debug, Clone)]
pub struct FlatItem {
    pub indent: usize,
    pub level: usize,
    pub label: Option<Label>,
    pub origin: Origin,
    /// Ordered-ness of the list the item was written in.
    pub ordered: bool,
    /// Start number when the item opens a list.
    pub start: Option<u64>,
    /// Number written on the item's own marker.
    pub number: Option<u64>,
    /// The item begins a new list even though it follows a sibling item.
    pub restart: bool,
    pub checked: Option<bool>,
    pub position: Option<Position>,
    pub annotations: Annotations,
    /// Blocks rendered before any nested list.
    pub body: Vec<Node>,
    /// Blocks that followed a nested list in the source.
    pub tail: Vec<Node>,
}

impl FlatItem {
    pub fn label_text(&self) -> Option<&str> {
        self.label.as_ref().map(|l| l.text.as_str())
    }
}

pub struct Flattener {
    /// Columns per nesting level when a node carries no position.
    pub indent_unit: usize,
}

impl Flattener {
    /// Flattens a top-level list and every list nested directly in its items.
    pub fn flatten(&self, list: Node) -> Vec<FlatItem> {
        let mut out = Vec::new();
        self.flatten_list(list, 0, false, &mut out);
        out
    }

    /// `after_list` is set when the list directly follows another list in the
    /// same item, so its first item opens a list of its own.
    fn flatten_list(&self, list: Node, depth: usize, after_list: bool, out: &mut Vec<FlatItem>) {
        let props = match list.kind {
            NodeKind::List(props) => props,
            _ => return,
        };
        let mut previous: Option<u64> = None;
        for (ix, child) in list.children.into_iter().enumerate() {
            if let NodeKind::ListItem(item) = &child.kind {
                let number = item.number;
                // A written number that falls back (`4.` then `1.`) opens a
                // new sequence; repeated numbers (`1.` `1.` `1.`) do not.
                let fell_back = matches!((previous, number), (Some(p), Some(n)) if n < p);
                let (start, restart) = match ix {
                    0 => (props.start, after_list),
                    _ if fell_back => (number, true),
                    _ => (None, false),
                };
                previous = number.or(previous);
                self.flatten_item(child, &props, start, restart, depth, out);
            } else if let Some(last) = out.last_mut() {
                last.tail.push(child);
            }
        }
    }

    fn flatten_item(
        &self,
        item: Node,
        list: &ListProps,
        start: Option<u64>,
        restart: bool,
        depth: usize,
        out: &mut Vec<FlatItem>,
    ) {
        let NodeKind::ListItem(props) = item.kind else {
            return;
        };
        let indent = props
            .indent
            .or(item.position.map(|p| p.column))
            .unwrap_or(depth * self.indent_unit);
        let known_label = props.label.map(Label::new);

        let mut pending = Some(FlatItem {
            indent,
            level: props.level,
            label: known_label.clone(),
            origin: Origin::Native { depth },
            ordered: list.ordered,
            start,
            number: props.number,
            restart,
            checked: props.checked,
            position: item.position,
            annotations: item.annotations,
            body: Vec::new(),
            tail: Vec::new(),
        });
        // Index in `out` of the item that owns blocks following a nested list.
        let mut owner: Option<usize> = None;
        let mut seen_paragraph = false;
        let mut seen_list = false;

        for child in item.children {
            match child.kind {
                NodeKind::List(_) => {
                    if let Some(done) = pending.take() {
                        out.push(done);
                        owner = Some(out.len() - 1);
                    }
                    self.flatten_list(child, depth + 1, seen_list, out);
                    seen_list = true;
                }
                NodeKind::Paragraph if !seen_paragraph && pending.is_some() => {
                    seen_paragraph = true;
                    let detect_label = known_label.is_none();
                    if let Some(current) = pending.take() {
                        pending = Some(self.split_paragraph(child, current, detect_label, out));
                    }
                }
                _ => {
                    if let Some(current) = pending.as_mut() {
                        current.body.push(child);
                    } else if let Some(ix) = owner {
                        out[ix].tail.push(child);
                    }
                }
            }
        }

        if let Some(done) = pending.take() {
            out.push(done);
        }
    }

    /// Splits an item's first paragraph at lines that open a new item.
    ///
    /// Every completed item is pushed to `out`; the item still open after the
    /// last line is returned so later blocks of the source item can join it.
    fn split_paragraph(
        &self,
        paragraph: Node,
        mut current: FlatItem,
        detect_label: bool,
        out: &mut Vec<FlatItem>,
    ) -> FlatItem {
        let mut lines = split_lines(paragraph.children);
        let first = lines.remove(0);

        let mut inlines = first.nodes;
        if detect_label && let Some(label) = take_label(&mut inlines) {
            current.label = Some(label);
        }
        let mut para_position = paragraph.position;
        let mut para_annotations = paragraph.annotations;

        for line in lines {
            let marker = line
                .nodes
                .first()
                .and_then(Node::as_text)
                .and_then(ItemMarker::scan_line);
            let Some(marker) = marker else {
                inlines.extend(line.separator);
                inlines.extend(line.nodes);
                continue;
            };

            current.body.insert(
                0,
                paragraph_node(std::mem::take(&mut inlines), para_position, para_annotations),
            );
            para_annotations = Annotations::default();

            let line_position = line.nodes.first().and_then(|n| n.position);
            let indent = line_position.map(|p| p.column).unwrap_or(current.indent);
            let mut nodes = line.nodes;
            strip_prefix(&mut nodes, marker.consumed);

            let ordered = marker.label.is_some();
            let next = FlatItem {
                indent,
                level: 0,
                label: marker.label,
                origin: Origin::Line,
                ordered,
                start: None,
                number: None,
                restart: false,
                checked: None,
                position: line_position,
                annotations: Annotations::default(),
                body: Vec::new(),
                tail: Vec::new(),
            };
            out.push(std::mem::replace(&mut current, next));
            inlines = nodes;
            para_position = line_position;
        }

        current.body.insert(
            0,
            paragraph_node(inlines, para_position, para_annotations),
        );
        current
    }
}

struct Line {
    /// The break that ended the previous line; `None` for the first line.
    separator: Option<Node>,
    nodes: Vec<Node>,
}

fn split_lines(inlines: Vec<Node>) -> Vec<Line> {
    let mut lines = vec![Line {
        separator: None,
        nodes: Vec::new(),
    }];
    for node in inlines {
        if node.kind.is_line_break() {
            lines.push(Line {
                separator: Some(node),
                nodes: Vec::new(),
            });
        } else if let Some(line) = lines.last_mut() {
            line.nodes.push(node);
        }
    }
    lines
}

fn paragraph_node(
    inlines: Vec<Node>,
    position: Option<Position>,
    annotations: Annotations,
) -> Node {
    let mut para = Node::with_children(NodeKind::Paragraph, inlines);
    para.position = position;
    para.annotations = annotations;
    para
}

/// Removes a leading label from the first text node.
fn take_label(inlines: &mut Vec<Node>) -> Option<Label> {
    let (label, consumed) = inlines
        .first()
        .and_then(Node::as_text)
        .and_then(ItemMarker::scan_label)?;
    strip_prefix(inlines, consumed);
    Some(label)
}

/// Drops `consumed` bytes from the first text node, removing the node if it
/// empties so that an emphasis right after a marker stays the first inline.
fn strip_prefix(inlines: &mut Vec<Node>, consumed: usize) {
    let Some(first) = inlines.first_mut() else {
        return;
    };
    let Some(text) = first.as_text_mut() else {
        return;
    };
    let rest = text.get(consumed..).unwrap_or_default().to_string();
    if rest.is_empty() {
        inlines.remove(0);
        return;
    }
    *text = rest;
    if let Some(pos) = first.position.as_mut() {
        let (start, column) = (pos.start + consumed, pos.column + consumed);
        pos.start = start;
        pos.column = column;
    }
}
