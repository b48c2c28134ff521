use relative_path::{Component, RelativePath};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid source root: {0}")]
    InvalidSourceRoot(String),
    #[error("Path escapes the source root: {0}")]
    OutsideRoot(String),
}

/// Read-only access to the files code fences import from.
pub trait SourceReader: Send + Sync {
    /// Returns the text of a repo-relative path.
    fn read(&self, path: &RelativePath) -> Result<String, IoError>;
}

/// Reads sources from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsSourceReader {
    root: PathBuf,
}

impl FsSourceReader {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, IoError> {
        let root = root.into();
        validate_source_root(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceReader for FsSourceReader {
    fn read(&self, path: &RelativePath) -> Result<String, IoError> {
        read_file(path, &self.root)
    }
}

/// In-memory sources keyed by normalized relative path.
#[derive(Debug, Clone, Default)]
pub struct MemorySourceReader {
    files: HashMap<String, String>,
}

impl MemorySourceReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&mut self, path: &str, content: impl Into<String>) {
        let key = RelativePath::new(path).normalize().into_string();
        self.files.insert(key, content.into());
    }
}

impl SourceReader for MemorySourceReader {
    fn read(&self, path: &RelativePath) -> Result<String, IoError> {
        let key = checked(path)?;
        self.files
            .get(&key)
            .cloned()
            .ok_or_else(|| IoError::NotFound(PathBuf::from(key)))
    }
}

/// Read a source file below `root`
pub fn read_file(relative_path: &RelativePath, root: &Path) -> Result<String, IoError> {
    let normalized = checked(relative_path)?;
    let absolute_path = RelativePath::new(&normalized).to_path(root);
    if !absolute_path.is_file() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

pub fn validate_source_root(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidSourceRoot(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    Ok(())
}

/// Normalizes a relative path, rejecting paths that climb out of the root.
fn checked(path: &RelativePath) -> Result<String, IoError> {
    let normalized = path.normalize();
    if normalized
        .components()
        .next()
        .is_some_and(|c| c == Component::ParentDir)
    {
        return Err(IoError::OutsideRoot(path.to_string()));
    }
    Ok(normalized.into_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{create_test_file, create_test_source_dir};

    #[test]
    fn test_read_file_below_root() {
        // Given a source directory with a nested file
        let dir = create_test_source_dir();
        create_test_file(&dir, "algo/trie.py", "class Trie:\n    pass\n");

        // When reading it through the reader
        let reader = FsSourceReader::new(dir.path()).unwrap();
        let content = reader.read(RelativePath::new("algo/trie.py")).unwrap();

        // Then the content comes back unchanged
        assert_eq!(content, "class Trie:\n    pass\n");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = create_test_source_dir();
        let reader = FsSourceReader::new(dir.path()).unwrap();

        let result = reader.read(RelativePath::new("nope.py"));
        assert!(matches!(result, Err(IoError::NotFound(_))));
    }

    #[test]
    fn test_parent_traversal_is_rejected() {
        let dir = create_test_source_dir();
        create_test_file(&dir, "inside.py", "x = 1\n");
        let reader = FsSourceReader::new(dir.path()).unwrap();

        let result = reader.read(RelativePath::new("../inside.py"));
        assert!(matches!(result, Err(IoError::OutsideRoot(_))));

        // Climbing out and back in normalizes to a path inside the root
        let result = reader.read(RelativePath::new("sub/../inside.py"));
        assert_eq!(result.unwrap(), "x = 1\n");
    }

    #[test]
    fn test_invalid_source_root() {
        let result = FsSourceReader::new("/this/path/does/not/exist");

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not a directory"));
    }

    #[test]
    fn test_memory_reader_normalizes_keys() {
        let reader = MemorySourceReader::new().with_file("./src/lib.rs", "fn main() {}");

        assert_eq!(
            reader.read(RelativePath::new("src/lib.rs")).unwrap(),
            "fn main() {}"
        );
        assert!(reader.read(RelativePath::new("src/main.rs")).is_err());
    }
}
