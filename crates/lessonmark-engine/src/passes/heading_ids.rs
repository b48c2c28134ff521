use std::sync::OnceLock;

use regex::Regex;

use crate::tree::{Node, NodeKind};

use super::{Pass, PassKind, RenderContext};

/// Gives every heading a de-duplicated anchor id.
///
/// Explicit ids (`# Title {#custom}`) are kept and reserved before any slug
/// is generated, so a generated slug never takes an explicit id. An explicit
/// id written twice keeps its first use; later uses are suffixed.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadingIdPass;

impl Pass for HeadingIdPass {
    fn kind(&self) -> PassKind {
        PassKind::HeadingIds
    }

    fn run(&self, root: &mut Node, cx: &mut RenderContext) {
        root.visit_mut(&mut |node| {
            if let NodeKind::Heading { id: Some(id), .. } = &mut node.kind {
                if cx.slugger.is_taken(id) {
                    let unique = cx.slugger.slug(id);
                    log::warn!("duplicate heading id #{id}, using #{unique}");
                    *id = unique;
                } else {
                    cx.slugger.reserve(id);
                }
            }
        });
        root.visit_mut(&mut |node| {
            let text = match &node.kind {
                NodeKind::Heading { id: None, .. } => heading_text(node),
                _ => return,
            };
            let slug = cx.slugger.slug(&text);
            log::debug!("heading {text:?} -> #{slug}");
            if let NodeKind::Heading { id, .. } = &mut node.kind {
                *id = Some(slug);
            }
        });
    }
}

fn component_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"\[![A-Za-z0-9_-]+(?::[^\]]*)?\]").expect("Invalid component marker regex")
    })
}

/// The text a heading's slug is computed from: visible text, code and math
/// (each once), component markers removed, surrounding space trimmed.
pub fn heading_text(heading: &Node) -> String {
    let text = heading.text_content();
    component_marker()
        .replace_all(&text, "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_document;
    use crate::passes::MathHeaderPass;
    use pretty_assertions::assert_eq;

    fn ids(root: &Node) -> Vec<String> {
        let mut out = Vec::new();
        root.visit(&mut |node| {
            if let NodeKind::Heading { id: Some(id), .. } = &node.kind {
                out.push(id.clone());
            }
        });
        out
    }

    fn run(markdown: &str) -> Node {
        let mut doc = parse_document(markdown);
        let mut cx = RenderContext::default();
        MathHeaderPass.run(&mut doc, &mut cx);
        HeadingIdPass.run(&mut doc, &mut cx);
        doc
    }

    #[test]
    fn component_marker_and_math_slug_once() {
        let doc = run("## [!COMPONENT:X] Time Complexity $ElogV$\n");

        assert_eq!(ids(&doc), vec!["time-complexity-elogv"]);
    }

    #[test]
    fn repeated_headings_are_suffixed() {
        let doc = run("# Setup\n\n## Setup\n\n### Setup\n");

        assert_eq!(ids(&doc), vec!["setup", "setup-1", "setup-2"]);
    }

    #[test]
    fn explicit_ids_are_kept_and_reserved() {
        let doc = run("# Overview\n\n## Later {#overview}\n");

        assert_eq!(ids(&doc), vec!["overview-1", "overview"]);
    }

    #[test]
    fn repeated_explicit_ids_stay_unique() {
        let doc = run("# A {#x}\n\n# B {#x}\n\n# X\n");

        assert_eq!(ids(&doc), vec!["x", "x-1", "x-2"]);
    }

    #[test]
    fn inline_code_contributes_to_slug() {
        let doc = run("## The `Pipeline` type\n");

        assert_eq!(ids(&doc), vec!["the-pipeline-type"]);
    }
}
