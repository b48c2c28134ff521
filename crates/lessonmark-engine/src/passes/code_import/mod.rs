//! # Smart Code Import
//!
//! Fills fenced code blocks from source files.
//!
//! ````markdown
//! ```python file=algo/trie.py#class:Trie
//! ```
//! ````
//!
//! The `file=` attribute names a path relative to the reader's root; an
//! optional `#class:Name` or `#func:name` fragment narrows the import to one
//! construct (see [`extract`]). A missing file, an unmatched selector or a
//! path outside the root all leave the block empty.

pub mod extract;
pub mod selector;

use std::fmt;
use std::sync::Arc;

use relative_path::RelativePath;

use crate::io::SourceReader;
use crate::tree::{Node, NodeKind, keys};

use super::{Pass, PassKind, RenderContext};
use extract::Grammar;
use selector::{ImportTarget, Selector};

pub struct CodeImportPass {
    reader: Arc<dyn SourceReader>,
}

impl CodeImportPass {
    pub fn new(reader: Arc<dyn SourceReader>) -> Self {
        Self { reader }
    }

    /// Resolves a target to the text the code block should show.
    pub fn resolve(&self, target: &ImportTarget) -> String {
        let source = match self.reader.read(RelativePath::new(&target.file_path)) {
            Ok(source) => source,
            Err(e) => {
                log::warn!("code import of {}: {e}", target.file_path);
                return String::new();
            }
        };
        match &target.selector {
            Selector::Whole => source.strip_suffix('\n').unwrap_or(&source).to_string(),
            Selector::Construct { kind, name } => {
                let grammar = Grammar::for_path(&target.file_path);
                extract::extract(&source, grammar, *kind, name).unwrap_or_else(|| {
                    log::debug!(
                        "no {} named {name} in {}",
                        kind.as_str(),
                        target.file_path
                    );
                    String::new()
                })
            }
            Selector::Unsupported(fragment) => {
                log::debug!("unsupported import selector #{fragment}");
                String::new()
            }
        }
    }
}

impl fmt::Debug for CodeImportPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeImportPass").finish_non_exhaustive()
    }
}

impl Pass for CodeImportPass {
    fn kind(&self) -> PassKind {
        PassKind::CodeImport
    }

    fn run(&self, root: &mut Node, _cx: &mut RenderContext) {
        root.visit_mut(&mut |node| {
            let NodeKind::Code { meta, value, .. } = &mut node.kind else {
                return;
            };
            let Some(target) = meta.as_deref().and_then(ImportTarget::parse) else {
                return;
            };
            *value = self.resolve(&target);
            node.annotations.insert(keys::SOURCE_FILE, target.file_path);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{FsSourceReader, MemorySourceReader};
    use crate::parsing::parse_document;
    use crate::tests::{code_values, create_test_file, create_test_source_dir};
    use pretty_assertions::assert_eq;

    const TRIE: &str = "class TrieNode:\n    def __init__(self):\n        self.children = {}\n\n\nclass Trie:\n    def __init__(self):\n        self.root = TrieNode()\n";

    fn pass() -> CodeImportPass {
        let reader = MemorySourceReader::new()
            .with_file("algo/trie.py", TRIE)
            .with_file("notes.txt", "line one\nline two\n");
        CodeImportPass::new(Arc::new(reader))
    }

    fn run(markdown: &str) -> Node {
        let mut doc = parse_document(markdown);
        pass().run(&mut doc, &mut RenderContext::default());
        doc
    }

    #[test]
    fn class_selector_imports_only_that_class() {
        let doc = run("```python file=algo/trie.py#class:Trie\n```\n");

        let code = &code_values(&doc)[0];
        assert_eq!(
            code,
            "class Trie:\n    def __init__(self):\n        self.root = TrieNode()"
        );
        assert!(!code.contains("class TrieNode:"));
        assert_eq!(
            doc.children[0].annotations.get(keys::SOURCE_FILE),
            Some("algo/trie.py")
        );
    }

    #[test]
    fn no_selector_imports_whole_file() {
        let doc = run("```text file=notes.txt\nplaceholder\n```\n");

        assert_eq!(code_values(&doc), vec!["line one\nline two"]);
    }

    #[test]
    fn misses_leave_the_block_empty() {
        let doc = run(concat!(
            "```python file=algo/trie.py#class:Missing\nold\n```\n\n",
            "```python file=algo/absent.py\nold\n```\n\n",
            "```python file=../outside.py\nold\n```\n",
        ));

        assert_eq!(code_values(&doc), vec!["", "", ""]);
    }

    #[test]
    fn plain_fences_are_untouched() {
        let doc = run("```python title=demo\nprint(1)\n```\n");

        assert_eq!(code_values(&doc), vec!["print(1)"]);
        assert!(doc.children[0].annotations.is_empty());
    }

    #[test]
    fn reads_from_disk() {
        let dir = create_test_source_dir();
        create_test_file(&dir, "src/graph.rs", "fn bfs() {\n    todo!()\n}\n\nfn dfs() {}\n");
        let reader = FsSourceReader::new(dir.path()).unwrap();
        let pass = CodeImportPass::new(Arc::new(reader));

        let mut doc = parse_document("```rust file=src/graph.rs#func:bfs\n```\n");
        pass.run(&mut doc, &mut RenderContext::default());

        assert_eq!(code_values(&doc), vec!["fn bfs() {\n    todo!()\n}"]);
    }
}
