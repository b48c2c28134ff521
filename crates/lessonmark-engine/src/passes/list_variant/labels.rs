use std::sync::OnceLock;

use regex::Regex;

/// What an explicit item label says about numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelKind {
    /// `2`, `1.3`, `2.1.4`: depth is the number of segments minus one.
    Decimal { depth: usize },
    /// `a`, `iv`, `B`: shown as written.
    Custom,
}

/// An explicit label captured from the start of an item's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// The label without its delimiters (`1.2` for `1.2.`, `a` for `(a)`).
    pub text: String,
    pub kind: LabelKind,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let is_decimal = text
            .split('.')
            .all(|seg| !seg.is_empty() && seg.bytes().all(|b| b.is_ascii_digit()));
        let kind = if is_decimal {
            LabelKind::Decimal {
                depth: text.split('.').count() - 1,
            }
        } else {
            LabelKind::Custom
        };
        Self { text, kind }
    }

    pub fn decimal_depth(&self) -> Option<usize> {
        match self.kind {
            LabelKind::Decimal { depth } => Some(depth),
            LabelKind::Custom => None,
        }
    }

    /// `1.1`-style labels switch a list to decimal-nested numbering.
    pub fn is_nested_decimal(&self) -> bool {
        self.decimal_depth().is_some_and(|d| d > 0)
    }
}

/// A marker that opens a new item in the middle of a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMarker {
    pub label: Option<Label>,
    /// Bytes of text the marker occupies, trailing whitespace included.
    pub consumed: usize,
}

/// Item label and custom bullet syntax.
pub struct ItemMarker;

impl ItemMarker {
    /// Bullets that are not CommonMark list markers but open items in lesson text.
    pub const BULLETS: [char; 4] = ['•', '◦', '▪', '‣'];

    fn label_pattern() -> &'static Regex {
        static LABEL: OnceLock<Regex> = OnceLock::new();
        LABEL.get_or_init(|| {
            Regex::new(
                r"^(?:(?P<dec>[0-9]+(?:\.[0-9]+)*)\.|(?P<multi>[0-9]+(?:\.[0-9]+)+)|(?P<alpha>[A-Za-z])\)|\((?P<paren>[A-Za-z0-9]{1,6})\)|(?P<num>[0-9]+)\))(?:[ \t]+|$)",
            )
            .expect("Invalid item label regex")
        })
    }

    /// Reads an explicit label at the start of `text`.
    ///
    /// Returns the label and the number of bytes to strip (label, delimiter
    /// and the whitespace after it).
    pub fn scan_label(text: &str) -> Option<(Label, usize)> {
        let caps = Self::label_pattern().captures(text)?;
        let label = ["dec", "multi", "alpha", "paren", "num"]
            .into_iter()
            .find_map(|name| caps.name(name))?;
        Some((Label::new(label.as_str()), caps.get(0)?.end()))
    }

    /// Reads a marker that starts a new item on a continuation line.
    pub fn scan_line(text: &str) -> Option<LineMarker> {
        if let Some((label, consumed)) = Self::scan_label(text) {
            return Some(LineMarker {
                label: Some(label),
                consumed,
            });
        }
        let mut chars = text.chars();
        let bullet = chars.next().filter(|c| Self::BULLETS.contains(c))?;
        let rest = chars.as_str();
        let trimmed = rest.trim_start_matches([' ', '\t']);
        if trimmed.len() == rest.len() && !rest.is_empty() {
            return None;
        }
        Some(LineMarker {
            label: None,
            consumed: bullet.len_utf8() + (rest.len() - trimmed.len()),
        })
    }
}
