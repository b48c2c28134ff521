//! GitHub-style heading anchors.
//!
//! A slug is the lower-cased text with everything but letters, digits, `-`,
//! `_` and spaces removed and each space turned into `-`. A [`Slugger`]
//! remembers what it handed out and suffixes repeats with `-1`, `-2`, …,
//! skipping suffixed forms that are already taken.

use std::collections::HashMap;

/// Slugs a string without de-duplication.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            '-' | '_' => Some(c),
            c if c.is_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}

/// De-duplicating slug generator, one per document render.
#[derive(Debug, Default, Clone)]
pub struct Slugger {
    occurrences: HashMap<String, usize>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a slug for `text` that this slugger has not returned before.
    pub fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let mut candidate = base.clone();
        while self.occurrences.contains_key(&candidate) {
            let count = self.occurrences.entry(base.clone()).or_insert(0);
            *count += 1;
            candidate = format!("{base}-{count}");
        }
        self.occurrences.insert(candidate.clone(), 0);
        candidate
    }

    /// Marks an id as taken without generating it.
    pub fn reserve(&mut self, id: &str) {
        self.occurrences.entry(id.to_string()).or_insert(0);
    }

    pub fn is_taken(&self, id: &str) -> bool {
        self.occurrences.contains_key(id)
    }

    pub fn reset(&mut self) {
        self.occurrences.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Time Complexity ElogV", "time-complexity-elogv")]
    #[case("What's new?", "whats-new")]
    #[case("snake_case & kebab-case", "snake_case--kebab-case")]
    #[case("  padded ", "--padded-")]
    #[case("Überblick", "überblick")]
    #[case("", "")]
    fn slugify_cases(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(slugify(text), expected);
    }

    #[test]
    fn repeats_get_numeric_suffixes() {
        let mut slugger = Slugger::new();

        assert_eq!(slugger.slug("Example"), "example");
        assert_eq!(slugger.slug("Example"), "example-1");
        assert_eq!(slugger.slug("Example"), "example-2");
    }

    #[test]
    fn suffix_skips_taken_slugs() {
        let mut slugger = Slugger::new();

        assert_eq!(slugger.slug("Foo 1"), "foo-1");
        assert_eq!(slugger.slug("Foo"), "foo");
        assert_eq!(slugger.slug("Foo"), "foo-2");
    }

    #[test]
    fn reserved_ids_are_avoided() {
        let mut slugger = Slugger::new();
        slugger.reserve("intro");

        assert!(slugger.is_taken("intro"));
        assert_eq!(slugger.slug("Intro"), "intro-1");

        slugger.reset();
        assert_eq!(slugger.slug("Intro"), "intro");
    }
}
