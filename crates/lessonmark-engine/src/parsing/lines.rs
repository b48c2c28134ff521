/// Maps byte offsets to 1-based lines and visual columns.
///
/// Columns expand tabs to the next multiple of `tab_width`, matching how a
/// reader of the source sees indentation.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a str,
    starts: Vec<usize>,
    tab_width: usize,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str, tab_width: usize) -> Self {
        let mut starts = vec![0];
        starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            source,
            starts,
            tab_width: tab_width.max(1),
        }
    }

    /// Returns `(line, column)` for a byte offset; line is 1-based.
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.source.len());
        let line_ix = match self.starts.binary_search(&offset) {
            Ok(ix) => ix,
            Err(ix) => ix - 1,
        };
        let line_start = self.starts[line_ix];
        let prefix = self.source.get(line_start..offset).unwrap_or_default();
        (line_ix + 1, visual_width(prefix, self.tab_width))
    }
}

/// Width of `s` in columns with tabs expanded.
pub fn visual_width(s: &str, tab_width: usize) -> usize {
    s.chars().fold(0, |col, c| {
        if c == '\t' {
            col + tab_width - col % tab_width
        } else {
            col + 1
        }
    })
}
