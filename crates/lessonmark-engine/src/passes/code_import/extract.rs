//! Structural extraction of one class or function from source text.
//!
//! Two scanners cover the languages lessons import from:
//!
//! - **indentation** (`.py`, `.pyi`): the block is the header plus every
//!   following line indented deeper than it; multi-line headers, bracket
//!   continuations and triple-quoted strings never end a block early
//! - **braces** (everything else): the block runs from the header to the
//!   brace that closes the first `{` after it, skipping strings and comments
//!
//! Names match exactly: asking for `Trie` never returns `TrieNode`.

use regex::Regex;

use super::selector::ConstructKind;

/// How a source file delimits blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    Indentation,
    /// Brace-delimited. `'` opens a string unless the language uses it for
    /// lifetimes and char literals.
    Braces { quote_strings: bool },
}

impl Grammar {
    pub fn for_path(path: &str) -> Self {
        let ext = path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or_default();
        match ext.to_ascii_lowercase().as_str() {
            "py" | "pyi" => Grammar::Indentation,
            "rs" => Grammar::Braces {
                quote_strings: false,
            },
            _ => Grammar::Braces {
                quote_strings: true,
            },
        }
    }
}

/// Extracts the named construct, decorators included, dedented to its
/// header. Returns `None` when nothing in `source` matches.
pub fn extract(source: &str, grammar: Grammar, kind: ConstructKind, name: &str) -> Option<String> {
    let lines: Vec<&str> = source.lines().collect();
    let (start, end, indent) = match grammar {
        Grammar::Indentation => indentation_block(&lines, kind, name)?,
        Grammar::Braces { quote_strings } => brace_block(&lines, kind, name, quote_strings)?,
    };
    Some(dedent(&lines[start..=end], indent))
}

fn leading_width(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Widens `header` upwards over decorator lines at the same indentation.
fn decorated_start(lines: &[&str], header: usize, is_decorator: impl Fn(&str) -> bool) -> usize {
    let indent = leading_width(lines[header]);
    let mut start = header;
    while start > 0 {
        let above = lines[start - 1];
        if leading_width(above) == indent && is_decorator(above.trim_start()) {
            start -= 1;
        } else {
            break;
        }
    }
    start
}

fn dedent(lines: &[&str], indent: usize) -> String {
    lines
        .iter()
        .map(|line| {
            let strip = leading_width(line).min(indent);
            line.get(strip..).unwrap_or(line).trim_end()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Tracks string and bracket state across lines of Python source.
#[derive(Debug, Default, Clone, Copy)]
struct PyScanner {
    /// Quote byte of the open triple-quoted string, if any.
    triple: Option<u8>,
    depth: i32,
}

impl PyScanner {
    /// Scans one line and returns the byte offset of the first `:` seen at
    /// bracket depth zero outside strings and comments.
    fn scan(&mut self, line: &str) -> Option<usize> {
        let bytes = line.as_bytes();
        let mut colon = None;
        let mut i = 0;
        while i < bytes.len() {
            if let Some(q) = self.triple {
                if bytes[i] == b'\\' {
                    i += 2;
                    continue;
                }
                if bytes[i..].starts_with(&[q, q, q]) {
                    self.triple = None;
                    i += 3;
                } else {
                    i += 1;
                }
                continue;
            }
            match bytes[i] {
                b'#' => break,
                q @ (b'"' | b'\'') => {
                    if bytes[i..].starts_with(&[q, q, q]) {
                        self.triple = Some(q);
                        i += 3;
                        continue;
                    }
                    i += 1;
                    while i < bytes.len() && bytes[i] != q {
                        i += if bytes[i] == b'\\' { 2 } else { 1 };
                    }
                }
                b'(' | b'[' | b'{' => self.depth += 1,
                b')' | b']' | b'}' => self.depth = (self.depth - 1).max(0),
                b':' if self.depth == 0 && colon.is_none() => colon = Some(i),
                _ => {}
            }
            i += 1;
        }
        colon
    }
}

fn python_header(line: &str, kind: ConstructKind, name: &str) -> bool {
    let trimmed = line.trim_start();
    let rest = match kind {
        ConstructKind::Class => trimmed.strip_prefix("class "),
        ConstructKind::Func => trimmed
            .strip_prefix("def ")
            .or_else(|| trimmed.strip_prefix("async def ")),
    };
    let Some(rest) = rest.map(str::trim_start) else {
        return false;
    };
    rest.strip_prefix(name)
        .is_some_and(|after| after.bytes().next().is_none_or(|b| !is_ident_byte(b)))
}

fn indentation_block(
    lines: &[&str],
    kind: ConstructKind,
    name: &str,
) -> Option<(usize, usize, usize)> {
    let mut scanner = PyScanner::default();
    let mut header = None;
    for (ix, line) in lines.iter().enumerate() {
        let in_code = scanner.triple.is_none() && scanner.depth == 0;
        if in_code && python_header(line, kind, name) {
            header = Some(ix);
            break;
        }
        scanner.scan(line);
    }
    let header = header?;
    let indent = leading_width(lines[header]);

    // The header may continue over several lines until its closing colon.
    let mut scanner = PyScanner::default();
    let mut header_end = header;
    let mut colon = None;
    for (ix, line) in lines.iter().enumerate().skip(header) {
        header_end = ix;
        colon = scanner.scan(line);
        if colon.is_some() {
            break;
        }
    }
    let colon = colon?;

    let trailing = lines[header_end][colon + 1..].trim();
    if !trailing.is_empty() && !trailing.starts_with('#') {
        let start = decorated_start(lines, header, |l| l.starts_with('@'));
        return Some((start, header_end, indent));
    }

    let mut end = header_end;
    for (ix, line) in lines.iter().enumerate().skip(header_end + 1) {
        let continued = scanner.triple.is_some() || scanner.depth > 0;
        if !continued && !line.trim().is_empty() {
            if leading_width(line) <= indent {
                break;
            }
            end = ix;
        } else if continued {
            end = ix;
        }
        scanner.scan(line);
    }

    let start = decorated_start(lines, header, |l| l.starts_with('@'));
    Some((start, end, indent))
}

const CONTROL_KEYWORDS: [&str; 10] = [
    "if", "else", "for", "while", "switch", "return", "catch", "new", "match", "await",
];

fn brace_header_pattern(kind: ConstructKind, name: &str) -> Option<Regex> {
    let name = regex::escape(name);
    let modifiers = r#"(?:(?:export|default|public|private|protected|internal|abstract|final|sealed|static|async|unsafe|const|inline|virtual|override|open|data|pub(?:\([^)]*\))?|extern(?:\s+"[^"]*")?)\s+)*"#;
    let pattern = match kind {
        ConstructKind::Class => format!(
            r"^\s*{modifiers}(?:class|struct|interface|enum|trait|object|union)\s+{name}\b"
        ),
        ConstructKind::Func => format!(
            r"^\s*{modifiers}(?:(?:function\*?|fn|func|fun|def)\s+{name}\b|(?:let|const|var)\s+{name}\s*=|(?:[\w<>\[\],.*&:?]+\s+)?{name}\s*(?:<[^>]*>)?\s*\()"
        ),
    };
    Regex::new(&pattern).ok()
}

fn brace_block(
    lines: &[&str],
    kind: ConstructKind,
    name: &str,
    quote_strings: bool,
) -> Option<(usize, usize, usize)> {
    let header = brace_header_pattern(kind, name)?;
    let mut scanner = BraceScanner::new(quote_strings);

    for (ix, line) in lines.iter().enumerate() {
        let at_top = scanner.is_code();
        let first_word = line
            .trim_start()
            .split(|c: char| !c.is_alphanumeric() && c != '_')
            .next()
            .unwrap_or_default();
        let candidate =
            at_top && !CONTROL_KEYWORDS.contains(&first_word) && header.is_match(line);
        if candidate && let Some(end) = body_end(lines, ix, quote_strings) {
            let start = decorated_start(lines, ix, |l| l.starts_with('@') || l.starts_with("#["));
            return Some((start, end, leading_width(line)));
        }
        scanner.scan(line);
    }
    None
}

/// Line of the brace closing the block opened after `header`, or `None`
/// when a `;` ends the declaration before any `{`.
fn body_end(lines: &[&str], header: usize, quote_strings: bool) -> Option<usize> {
    let mut scanner = BraceScanner::new(quote_strings);
    let mut opened = false;
    for (ix, line) in lines.iter().enumerate().skip(header) {
        for event in scanner.scan(line) {
            match event {
                BraceEvent::Open if !opened => opened = true,
                BraceEvent::Close if opened && scanner.depth == 0 => return Some(ix),
                BraceEvent::Semicolon if !opened => return None,
                _ => {}
            }
        }
        if opened && scanner.depth == 0 {
            return Some(ix);
        }
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BraceEvent {
    Open,
    Close,
    Semicolon,
}

/// Tracks brace depth across lines, skipping strings and comments.
#[derive(Debug, Clone)]
struct BraceScanner {
    quote_strings: bool,
    in_block_comment: bool,
    /// Open multi-line string delimiter (`` ` ``).
    in_template: bool,
    depth: usize,
}

impl BraceScanner {
    fn new(quote_strings: bool) -> Self {
        Self {
            quote_strings,
            in_block_comment: false,
            in_template: false,
            depth: 0,
        }
    }

    fn is_code(&self) -> bool {
        !self.in_block_comment && !self.in_template
    }

    /// Scans one line. Events are reported at depth zero only for the first
    /// `;`; braces always.
    fn scan(&mut self, line: &str) -> Vec<BraceEvent> {
        let bytes = line.as_bytes();
        let mut events = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            if self.in_block_comment {
                if bytes[i..].starts_with(b"*/") {
                    self.in_block_comment = false;
                    i += 2;
                } else {
                    i += 1;
                }
                continue;
            }
            if self.in_template {
                match bytes[i] {
                    b'\\' => i += 2,
                    b'`' => {
                        self.in_template = false;
                        i += 1;
                    }
                    _ => i += 1,
                }
                continue;
            }
            match bytes[i] {
                b'/' if bytes.get(i + 1) == Some(&b'/') => break,
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    self.in_block_comment = true;
                    i += 2;
                    continue;
                }
                b'`' => self.in_template = true,
                b'"' => i = skip_quoted(bytes, i, b'"'),
                b'\'' if self.quote_strings => i = skip_quoted(bytes, i, b'\''),
                b'\'' => i = skip_char_literal(bytes, i),
                b'{' => {
                    self.depth += 1;
                    events.push(BraceEvent::Open);
                }
                b'}' => {
                    self.depth = self.depth.saturating_sub(1);
                    events.push(BraceEvent::Close);
                }
                b';' if self.depth == 0 => events.push(BraceEvent::Semicolon),
                _ => {}
            }
            i += 1;
        }
        events
    }
}

/// Index of the closing quote of the string opened at `open`.
fn skip_quoted(bytes: &[u8], open: usize, quote: u8) -> usize {
    let mut i = open + 1;
    while i < bytes.len() && bytes[i] != quote {
        i += if bytes[i] == b'\\' { 2 } else { 1 };
    }
    i.min(bytes.len())
}

/// Skips `'x'` and `'\n'` char literals; a lone `'` (a lifetime) is left alone.
fn skip_char_literal(bytes: &[u8], open: usize) -> usize {
    match bytes.get(open + 1) {
        Some(b'\\') => skip_quoted(bytes, open, b'\''),
        Some(_) => {
            let width = std::str::from_utf8(&bytes[open + 1..])
                .ok()
                .and_then(|s| s.chars().next())
                .map_or(1, char::len_utf8);
            if bytes.get(open + 1 + width) == Some(&b'\'') {
                open + 1 + width
            } else {
                open
            }
        }
        None => open,
    }
}
