//! # List-Variant Pass
//!
//! Re-derives list structure and numbering from source indentation.
//!
//! Every top-level list goes through four steps:
//!
//! 1. [`flatten`]: native sub-lists and labelled continuation lines become one
//!    flat item sequence, each item carrying its source column
//! 2. [`levels`]: an indentation stack assigns each item its level
//! 3. the list is rebuilt from the levels, so nesting follows indentation
//!    even where CommonMark nested differently. An item whose written number
//!    falls back (`4.` then `1.`) starts a separate list there
//! 4. [`numbering`]: variant, ordinals and one counter id per numbered list
//!
//! Items keep their captured label and indent in [`ListItemProps`], so a
//! second run over the output reproduces the same levels and numbers.

pub mod counter;
pub mod flatten;
pub mod labels;
pub mod levels;
pub mod numbering;

use std::iter::Peekable;
use std::vec::IntoIter;

use crate::tree::{ListItemProps, ListProps, ListVariant, Node, NodeKind};

use super::{Pass, PassKind, RenderContext};
use flatten::{FlatItem, Flattener};

pub use counter::{CounterAllocator, DEFAULT_COUNTER_PREFIX};

/// Columns per level assumed for nodes without a source position.
pub const DEFAULT_INDENT_UNIT: usize = 2;

#[derive(Debug, Clone, Copy)]
pub struct ListVariantPass {
    pub indent_unit: usize,
}

impl Default for ListVariantPass {
    fn default() -> Self {
        Self {
            indent_unit: DEFAULT_INDENT_UNIT,
        }
    }
}

impl Pass for ListVariantPass {
    fn kind(&self) -> PassKind {
        PassKind::ListVariant
    }

    fn run(&self, root: &mut Node, cx: &mut RenderContext) {
        self.visit(root, cx);
    }
}

impl ListVariantPass {
    fn visit(&self, node: &mut Node, cx: &mut RenderContext) {
        for mut child in std::mem::take(&mut node.children) {
            if matches!(child.kind, NodeKind::List(_)) {
                node.children.extend(self.transform(child, cx));
            } else {
                self.visit(&mut child, cx);
                node.children.push(child);
            }
        }
    }

    /// Rebuilds one source list. Usually that gives one list back, but a
    /// restarted sequence splits it into several.
    fn transform(&self, original: Node, cx: &mut RenderContext) -> Vec<Node> {
        let NodeKind::List(props) = original.kind.clone() else {
            return vec![original];
        };
        let (position, annotations) = (original.position, original.annotations.clone());

        let mut items = Flattener {
            indent_unit: self.indent_unit,
        }
        .flatten(original);
        levels::assign_levels(&mut items);
        log::debug!("list at {:?}: {} items after flattening", position, items.len());

        let mut iter = items.into_iter().peekable();
        let mut lists = Vec::new();
        let mut first = Some((props, position, annotations));
        loop {
            let (props, position, annotations) = match first.take() {
                Some(original) => original,
                None => match iter.peek() {
                    Some(next) => {
                        log::debug!("list restarts at {:?}", next.position);
                        (list_props_for(next), next.position, Default::default())
                    }
                    None => break,
                },
            };
            let mut rebuilt =
                Node::with_children(NodeKind::List(props), build_items(&mut iter, 0));
            rebuilt.position = position;
            rebuilt.annotations = annotations;

            let nested_decimal = numbering::has_nested_decimal(&rebuilt);
            self.number(&mut rebuilt, nested_decimal, None, cx);
            lists.push(rebuilt);
        }
        lists
    }

    /// Numbers one list and everything inside it, in document order.
    fn number(
        &self,
        list: &mut Node,
        nested_decimal: bool,
        parent_display: Option<&str>,
        cx: &mut RenderContext,
    ) {
        let variant = numbering::classify(list, nested_decimal);
        let NodeKind::List(props) = &mut list.kind else {
            return;
        };
        props.variant = variant;
        props.is_decimal = variant == ListVariant::DecimalNested;
        props.counter_id = props.shows_ordinal().then(|| cx.counters.allocate());
        let props = props.clone();
        numbering::annotate_list(list);

        let mut k = 0;
        for item in &mut list.children {
            let NodeKind::ListItem(item_props) = &mut item.kind else {
                continue;
            };
            k += 1;
            let computed = numbering::ordinal(variant, &props, k, parent_display);
            let (display, custom) = numbering::resolve(computed, item_props.label.as_deref());
            item_props.display_number = display.clone();
            item_props.custom_number = custom;
            numbering::annotate_item(item);

            for child in &mut item.children {
                if matches!(child.kind, NodeKind::List(_)) {
                    self.number(child, nested_decimal, display.as_deref(), cx);
                } else {
                    self.visit(child, cx);
                }
            }
        }
    }
}

/// Rebuilds list items from flat items, nesting every run of deeper items
/// into a list under the item before it.
///
/// Stops before a restarting item at `level` so the caller can open a new
/// list for it.
fn build_items(iter: &mut Peekable<IntoIter<FlatItem>>, level: usize) -> Vec<Node> {
    let mut nodes: Vec<Node> = Vec::new();
    loop {
        let started = !nodes.is_empty();
        let Some(item) =
            iter.next_if(|i| i.level >= level && !(started && i.restart && i.level == level))
        else {
            break;
        };
        let FlatItem {
            indent,
            label,
            number,
            checked,
            position,
            annotations,
            body,
            tail,
            ..
        } = item;
        let props = ListItemProps {
            level,
            indent: Some(indent),
            label: label.map(|l| l.text),
            number,
            checked,
            ..ListItemProps::default()
        };
        let mut node = Node::with_children(NodeKind::ListItem(props), body);
        node.position = position;
        node.annotations = annotations;

        while let Some(first) = iter.peek().filter(|next| next.level > level) {
            let list_props = list_props_for(first);
            let list_position = first.position;
            let mut list = Node::with_children(
                NodeKind::List(list_props),
                build_items(iter, level + 1),
            );
            list.position = list_position;
            node.children.push(list);
        }
        node.children.extend(tail);
        nodes.push(node);
    }
    nodes
}

/// Props for a list opened by `first`.
fn list_props_for(first: &FlatItem) -> ListProps {
    ListProps {
        ordered: first.ordered,
        start: first.start,
        ..ListProps::default()
    }
}
