use std::fs;

use tempfile::TempDir;

use crate::tree::{Node, NodeKind};

pub fn create_test_source_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Writes `content` to `relative` below the directory, creating parents.
pub fn create_test_file(dir: &TempDir, relative: &str, content: &str) {
    let path = dir.path().join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dirs");
    }
    fs::write(&path, content).expect("Failed to write test file");
}

/// Every code block value in document order.
pub fn code_values(root: &Node) -> Vec<String> {
    let mut out = Vec::new();
    root.visit(&mut |node| {
        if let NodeKind::Code { value, .. } = &node.kind {
            out.push(value.clone());
        }
    });
    out
}
