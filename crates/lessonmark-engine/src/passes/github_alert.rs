use std::sync::OnceLock;

use regex::Regex;

use crate::tree::{Node, NodeKind, keys};

use super::{Pass, PassKind, RenderContext};

/// A parsed `[!TYPE]` / `[!TYPE:collapse]` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMarker<'a> {
    /// Lower-cased alert type.
    pub alert_type: String,
    pub collapsible: bool,
    /// Text after the marker and the whitespace following it.
    pub rest: &'a str,
}

impl<'a> AlertMarker<'a> {
    fn pattern() -> &'static Regex {
        static MARKER: OnceLock<Regex> = OnceLock::new();
        MARKER.get_or_init(|| {
            Regex::new(r"^\s*\[!(\w+)(:collapse)?\]\s*").expect("Invalid alert marker regex")
        })
    }

    pub fn scan(text: &'a str) -> Option<Self> {
        let caps = Self::pattern().captures(text)?;
        Some(Self {
            alert_type: caps.get(1)?.as_str().to_lowercase(),
            collapsible: caps.get(2).is_some(),
            rest: &text[caps.get(0)?.end()..],
        })
    }
}

/// Turns marked blockquotes into `Alert` nodes.
#[derive(Debug, Default, Clone, Copy)]
pub struct GithubAlertPass;

impl Pass for GithubAlertPass {
    fn kind(&self) -> PassKind {
        PassKind::GithubAlert
    }

    fn run(&self, root: &mut Node, _cx: &mut RenderContext) {
        root.visit_mut(&mut |node| {
            if node.kind == NodeKind::BlockQuote {
                convert(node);
            }
        });
    }
}

fn convert(quote: &mut Node) {
    let Some(para) = quote
        .children
        .first_mut()
        .filter(|c| c.kind == NodeKind::Paragraph)
    else {
        return;
    };
    let Some(text) = para.children.first_mut().and_then(Node::as_text_mut) else {
        return;
    };
    let Some(marker) = AlertMarker::scan(text) else {
        return;
    };
    let (alert_type, collapsible) = (marker.alert_type, marker.collapsible);
    let rest = marker.rest.to_string();

    if rest.is_empty() {
        para.children.remove(0);
        if para.children.first().is_some_and(|n| n.kind.is_line_break()) {
            para.children.remove(0);
        }
    } else {
        *text = rest;
    }
    if para.children.is_empty() {
        quote.children.remove(0);
    }

    quote
        .annotations
        .insert(keys::ALERT_TYPE, alert_type.clone());
    quote
        .annotations
        .insert(keys::COLLAPSIBLE, collapsible.to_string());
    quote.kind = NodeKind::Alert {
        alert_type,
        collapsible,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_document;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("[!TIP]", "tip", false, "")]
    #[case("[!Warning:collapse] careful", "warning", true, "careful")]
    #[case("  [!NOTE]\n", "note", false, "")]
    fn markers_scan(
        #[case] text: &str,
        #[case] alert_type: &str,
        #[case] collapsible: bool,
        #[case] rest: &str,
    ) {
        let marker = AlertMarker::scan(text).expect("marker");
        assert_eq!(marker.alert_type, alert_type);
        assert_eq!(marker.collapsible, collapsible);
        assert_eq!(marker.rest, rest);
    }

    #[rstest]
    #[case("[TIP]")]
    #[case("[!TIP:expand]")]
    #[case("text [!TIP]")]
    #[case("[!]")]
    fn non_markers_are_rejected(#[case] text: &str) {
        assert_eq!(AlertMarker::scan(text), None);
    }

    fn run(markdown: &str) -> Node {
        let mut doc = parse_document(markdown);
        GithubAlertPass.run(&mut doc, &mut RenderContext::default());
        doc
    }

    #[test]
    fn collapsible_tip_becomes_alert() {
        let doc = run("> [!TIP:collapse]\n> Do the thing.");

        let alert = &doc.children[0];
        assert_eq!(
            alert.kind,
            NodeKind::Alert {
                alert_type: "tip".into(),
                collapsible: true,
            }
        );
        assert_eq!(alert.text_content(), "Do the thing.");
        assert_eq!(alert.children[0].children.len(), 1);
        assert_eq!(alert.annotations.get(keys::ALERT_TYPE), Some("tip"));
        assert_eq!(alert.annotations.get(keys::COLLAPSIBLE), Some("true"));
    }

    #[test]
    fn marker_alone_in_paragraph_drops_it() {
        let doc = run("> [!WARNING]\n>\n> Mind the gap.\n");

        let alert = &doc.children[0];
        assert_eq!(alert.children.len(), 1);
        assert_eq!(alert.text_content(), "Mind the gap.");
    }

    #[test]
    fn marker_with_inline_text_keeps_it() {
        let doc = run("> [!NOTE] Read this first.");

        assert_eq!(doc.children[0].text_content(), "Read this first.");
    }

    #[test]
    fn plain_blockquote_passes_through() {
        let before = parse_document("> Just a quote.");
        let doc = run("> Just a quote.");

        assert_eq!(doc, before);
    }
}
