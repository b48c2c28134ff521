use std::sync::OnceLock;

use regex::Regex;

/// The construct kinds a fence can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructKind {
    Class,
    Func,
}

impl ConstructKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConstructKind::Class => "class",
            ConstructKind::Func => "func",
        }
    }
}

/// What part of the file to import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// No `#` fragment: the whole file.
    Whole,
    Construct { kind: ConstructKind, name: String },
    /// A fragment that is not `class:` or `func:`; never matches anything.
    Unsupported(String),
}

/// A parsed `file=<path>#<selector>` reference from a fence's meta string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportTarget {
    pub file_path: String,
    pub selector: Selector,
}

impl ImportTarget {
    fn pattern() -> &'static Regex {
        static FILE_ATTR: OnceLock<Regex> = OnceLock::new();
        FILE_ATTR.get_or_init(|| {
            Regex::new(r#"(?:^|\s)file=(?:"([^"]*)"|'([^']*)'|(\S+))"#)
                .expect("Invalid file attribute regex")
        })
    }

    /// Reads the `file=` attribute from a fence meta string.
    pub fn parse(meta: &str) -> Option<Self> {
        let caps = Self::pattern().captures(meta)?;
        let value = (1..=3).find_map(|i| caps.get(i))?.as_str().trim();
        if value.is_empty() {
            return None;
        }
        let (file_path, fragment) = match value.split_once('#') {
            Some((path, fragment)) => (path, Some(fragment)),
            None => (value, None),
        };
        if file_path.is_empty() {
            return None;
        }
        Some(Self {
            file_path: file_path.to_string(),
            selector: fragment.map_or(Selector::Whole, parse_fragment),
        })
    }
}

fn parse_fragment(fragment: &str) -> Selector {
    let construct = match fragment.split_once(':') {
        Some(("class", name)) => Some((ConstructKind::Class, name.trim())),
        Some(("func", name)) => Some((ConstructKind::Func, name.trim())),
        _ => None,
    };
    match construct {
        Some((kind, name)) if !name.is_empty() => Selector::Construct {
            kind,
            name: name.to_string(),
        },
        _ => Selector::Unsupported(fragment.to_string()),
    }
}
