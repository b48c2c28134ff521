/// Prefix used for counter ids when none is configured.
pub const DEFAULT_COUNTER_PREFIX: &str = "list-counter";

/// Hands out counter ids for one document render.
///
/// Ids are `<prefix>-<n>` with `n` counting up from 1 in the order lists are
/// numbered, so every list in a render has its own counter scope and two
/// renders of the same document produce the same ids.
#[derive(Debug, Clone)]
pub struct CounterAllocator {
    prefix: String,
    issued: usize,
}

impl CounterAllocator {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            issued: 0,
        }
    }

    pub fn allocate(&mut self) -> String {
        self.issued += 1;
        format!("{}-{}", self.prefix, self.issued)
    }

    /// How many ids this allocator has handed out.
    pub fn issued(&self) -> usize {
        self.issued
    }
}

impl Default for CounterAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTER_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_and_distinct() {
        let mut counters = CounterAllocator::new("ol");
        assert_eq!(counters.allocate(), "ol-1");
        assert_eq!(counters.allocate(), "ol-2");
        assert_eq!(counters.issued(), 2);
    }

    #[test]
    fn fresh_allocators_restart() {
        let mut a = CounterAllocator::default();
        let mut b = CounterAllocator::default();
        a.allocate();
        assert_eq!(b.allocate(), "list-counter-1");
    }
}
