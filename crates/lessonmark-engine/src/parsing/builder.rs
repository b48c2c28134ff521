use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Tag, TagEnd};

use crate::tree::{ListItemProps, ListProps, Node, NodeKind, Position};

use super::lines::LineIndex;

/// An open container on the builder stack.
struct Frame {
    node: Node,
    /// Tags we do not model: their children are spliced into the parent.
    transparent: bool,
}

/// Folds a pulldown-cmark offset event stream into a [`Node`] tree.
///
/// Containers are pushed on `Start` and attached to their parent on `End`;
/// leaves are attached immediately. Adjacent text events are merged so that
/// marker scanners always see one contiguous `Text` node.
pub struct TreeBuilder<'a> {
    source: &'a str,
    lines: LineIndex<'a>,
    stack: Vec<Frame>,
    metadata_depth: usize,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(source: &'a str, tab_width: usize) -> Self {
        let lines = LineIndex::new(source, tab_width);
        let root = Node::new(NodeKind::Root).at(Position {
            start: 0,
            end: source.len(),
            line: 1,
            column: 0,
        });
        Self {
            source,
            lines,
            stack: vec![Frame {
                node: root,
                transparent: false,
            }],
            metadata_depth: 0,
        }
    }

    pub fn push(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(Tag::MetadataBlock(_)) => self.metadata_depth += 1,
            Event::End(TagEnd::MetadataBlock(_)) => {
                self.metadata_depth = self.metadata_depth.saturating_sub(1)
            }
            _ if self.metadata_depth > 0 => {}
            Event::Start(tag) => self.open(tag, range),
            Event::End(_) => self.close(range),
            Event::Text(text) => self.text(&text, range),
            Event::Code(code) => self.leaf(
                NodeKind::InlineCode {
                    value: code.into_string(),
                },
                range,
            ),
            Event::InlineMath(math) => self.leaf(
                NodeKind::InlineMath {
                    value: math.into_string(),
                },
                range,
            ),
            Event::DisplayMath(math) => self.leaf(
                NodeKind::DisplayMath {
                    value: math.into_string(),
                },
                range,
            ),
            Event::Html(html) => {
                if let NodeKind::Html { value } = &mut self.top_mut().node.kind {
                    value.push_str(&html);
                } else {
                    self.leaf(
                        NodeKind::Html {
                            value: html.into_string(),
                        },
                        range,
                    );
                }
            }
            Event::InlineHtml(html) => self.leaf(
                NodeKind::Html {
                    value: html.into_string(),
                },
                range,
            ),
            Event::FootnoteReference(label) => self.text(&format!("[^{label}]"), range),
            Event::SoftBreak => self.leaf(NodeKind::SoftBreak, range),
            Event::HardBreak => self.leaf(NodeKind::Break, range),
            Event::Rule => self.leaf(NodeKind::ThematicBreak, range),
            Event::TaskListMarker(checked) => self.mark_task(checked),
        }
    }

    pub fn finish(mut self) -> Node {
        // Unbalanced streams do not happen with pulldown-cmark, but never lose content.
        while self.stack.len() > 1 {
            let end = self.top_mut().position_end();
            self.close(end..end);
        }
        self.stack.pop().map(|f| f.node).unwrap_or_else(|| Node::new(NodeKind::Root))
    }

    fn open(&mut self, tag: Tag<'_>, range: Range<usize>) {
        let kind = match tag {
            Tag::Paragraph => Some(NodeKind::Paragraph),
            Tag::Heading { level, id, .. } => Some(NodeKind::Heading {
                depth: heading_depth(level),
                id: id.map(|id| id.into_string()),
            }),
            Tag::BlockQuote(_) => Some(NodeKind::BlockQuote),
            Tag::CodeBlock(kind) => {
                let (lang, meta) = match kind {
                    CodeBlockKind::Fenced(info) => split_info_string(&info),
                    CodeBlockKind::Indented => (None, None),
                };
                Some(NodeKind::Code {
                    lang,
                    meta,
                    value: String::new(),
                })
            }
            Tag::HtmlBlock => Some(NodeKind::Html {
                value: String::new(),
            }),
            Tag::List(start) => Some(NodeKind::List(match start {
                Some(start) => ListProps::ordered(start),
                None => ListProps::bullet(),
            })),
            Tag::Item => Some(NodeKind::ListItem(ListItemProps {
                number: self.marker_number(&range),
                ..ListItemProps::default()
            })),
            Tag::Table(_) => Some(NodeKind::Table),
            Tag::TableHead | Tag::TableRow => Some(NodeKind::TableRow),
            Tag::TableCell => Some(NodeKind::TableCell),
            Tag::Emphasis => Some(NodeKind::Emphasis),
            Tag::Strong => Some(NodeKind::Strong),
            Tag::Strikethrough => Some(NodeKind::Strikethrough),
            Tag::Link {
                dest_url, title, ..
            } => Some(NodeKind::Link {
                url: dest_url.into_string(),
                title: non_empty(title.into_string()),
            }),
            Tag::Image {
                dest_url, title, ..
            } => Some(NodeKind::Image {
                url: dest_url.into_string(),
                title: non_empty(title.into_string()),
            }),
            _ => None,
        };

        let position = self.position(&range);
        let frame = match kind {
            Some(kind) => Frame {
                node: Node::new(kind).at(position),
                transparent: false,
            },
            None => Frame {
                node: Node::new(NodeKind::Paragraph).at(position),
                transparent: true,
            },
        };
        self.stack.push(frame);
    }

    /// The number on an ordered item's marker, read from the source.
    fn marker_number(&self, range: &Range<usize>) -> Option<u64> {
        let in_ordered_list = matches!(
            self.stack.last().map(|f| &f.node.kind),
            Some(NodeKind::List(ListProps { ordered: true, .. }))
        );
        if !in_ordered_list {
            return None;
        }
        let marker = self.source.get(range.start..)?.trim_start_matches([' ', '\t']);
        let digits = marker.len() - marker.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        marker[..digits].parse().ok()
    }

    fn close(&mut self, range: Range<usize>) {
        let Some(mut frame) = self.stack.pop() else {
            return;
        };
        if let Some(pos) = frame.node.position.as_mut() {
            pos.end = pos.end.max(range.end);
        }
        match &mut frame.node.kind {
            NodeKind::Code { value, .. } if value.ends_with('\n') => {
                value.pop();
            }
            // Tight list items carry bare inlines; give them the paragraph
            // a loose item would have so every pass sees one shape.
            NodeKind::ListItem(_) => {
                let children = std::mem::take(&mut frame.node.children);
                frame.node.children = wrap_inline_runs(children);
            }
            _ => {}
        }

        if self.stack.is_empty() {
            // Closing the root: keep it as the only frame.
            self.stack.push(frame);
            return;
        }

        if frame.transparent {
            for child in frame.node.children {
                self.attach(child);
            }
        } else {
            self.attach(frame.node);
        }
    }

    fn text(&mut self, text: &str, range: Range<usize>) {
        if let NodeKind::Code { value, .. } = &mut self.top_mut().node.kind {
            value.push_str(text);
            return;
        }
        self.leaf(
            NodeKind::Text {
                value: text.to_string(),
            },
            range,
        );
    }

    fn leaf(&mut self, kind: NodeKind, range: Range<usize>) {
        let node = Node::new(kind).at(self.position(&range));
        self.attach(node);
    }

    /// Appends `node` to the innermost open container, merging adjacent text.
    fn attach(&mut self, node: Node) {
        let parent = &mut self.top_mut().node;
        if let (Some(last), NodeKind::Text { value }) = (parent.children.last_mut(), &node.kind)
            && let NodeKind::Text { value: prev } = &mut last.kind
        {
            prev.push_str(value);
            if let (Some(last_pos), Some(pos)) = (last.position.as_mut(), node.position) {
                last_pos.end = pos.end;
            }
            return;
        }
        parent.children.push(node);
    }

    fn mark_task(&mut self, checked: bool) {
        if let Some(NodeKind::ListItem(props)) = self
            .stack
            .iter_mut()
            .rev()
            .map(|f| &mut f.node.kind)
            .find(|k| matches!(k, NodeKind::ListItem(_)))
        {
            props.checked = Some(checked);
        }
    }

    fn position(&self, range: &Range<usize>) -> Position {
        let (line, column) = self.lines.locate(range.start);
        Position {
            start: range.start,
            end: range.end,
            line,
            column,
        }
    }

    fn top_mut(&mut self) -> &mut Frame {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }
}

impl Frame {
    fn position_end(&self) -> usize {
        self.node.position.map(|p| p.end).unwrap_or_default()
    }
}

/// Groups consecutive inline nodes into paragraphs, leaving blocks as they are.
fn wrap_inline_runs(children: Vec<Node>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(children.len());
    let mut run: Vec<Node> = Vec::new();

    fn flush(run: &mut Vec<Node>, out: &mut Vec<Node>) {
        if run.is_empty() {
            return;
        }
        let first = run.first().and_then(|n| n.position);
        let last = run.last().and_then(|n| n.position);
        let mut para = Node::with_children(NodeKind::Paragraph, std::mem::take(run));
        if let (Some(first), Some(last)) = (first, last) {
            para.position = Some(Position {
                end: last.end,
                ..first
            });
        }
        out.push(para);
    }

    for child in children {
        let inline_html = matches!(child.kind, NodeKind::Html { .. }) && !run.is_empty();
        if child.kind.is_inline() || inline_html {
            run.push(child);
        } else {
            flush(&mut run, &mut out);
            out.push(child);
        }
    }
    flush(&mut run, &mut out);
    out
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Splits a fence info string into language and meta.
///
/// A first word that already looks like `key=value` is meta, not a language.
pub fn split_info_string(info: &str) -> (Option<String>, Option<String>) {
    let info = info.trim();
    let (first, rest) = match info.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim()),
        None => (info, ""),
    };
    if first.contains('=') {
        return (None, non_empty(info.to_string()));
    }
    (non_empty(first.to_string()), non_empty(rest.to_string()))
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}
