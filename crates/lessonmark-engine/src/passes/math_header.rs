use crate::tree::{Node, NodeKind};

use super::{Pass, PassKind, RenderContext};

/// Trims inline math inside headings so slugs read each formula once.
#[derive(Debug, Default, Clone, Copy)]
pub struct MathHeaderPass;

impl Pass for MathHeaderPass {
    fn kind(&self) -> PassKind {
        PassKind::MathHeader
    }

    fn run(&self, root: &mut Node, _cx: &mut RenderContext) {
        root.visit_mut(&mut |node| {
            if matches!(node.kind, NodeKind::Heading { .. }) {
                node.visit_mut(&mut trim_math);
            }
        });
    }
}

fn trim_math(node: &mut Node) {
    if let NodeKind::InlineMath { value } = &mut node.kind {
        let trimmed = value.trim();
        if trimmed.len() != value.len() {
            *value = trimmed.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn math(value: &str) -> Node {
        Node::new(NodeKind::InlineMath {
            value: value.into(),
        })
    }

    #[test]
    fn heading_math_is_trimmed() {
        let mut root = Node::with_children(
            NodeKind::Root,
            vec![Node::with_children(
                NodeKind::Heading { depth: 2, id: None },
                vec![
                    Node::text("Time Complexity "),
                    Node::with_children(NodeKind::Emphasis, vec![math("  E \\log V ")]),
                ],
            )],
        );

        MathHeaderPass.run(&mut root, &mut RenderContext::default());

        assert_eq!(
            root.children[0].children[1].children[0],
            math("E \\log V")
        );
    }

    #[test]
    fn body_math_is_untouched() {
        let mut root = Node::with_children(
            NodeKind::Root,
            vec![Node::with_children(NodeKind::Paragraph, vec![math(" x ")])],
        );
        let before = root.clone();

        MathHeaderPass.run(&mut root, &mut RenderContext::default());

        assert_eq!(root, before);
    }
}
