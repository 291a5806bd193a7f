//! Per-syscall invocation counts
//!
//! Counts are kept in a fixed-capacity array indexed by syscall number.
//! Numbers outside `0..capacity` are observed but not counted; how many
//! were dropped that way is tracked so the loss shows up in the report.

/// Default counting bound (syscall numbers `0..1024`)
pub const DEFAULT_CAPACITY: usize = 1024;

/// Monotonic count table, updated only on syscall entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountTable {
    counts: Vec<u64>,
    out_of_range: u64,
}

impl CountTable {
    /// Create a table counting numbers `0..capacity`
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            counts: vec![0; capacity],
            out_of_range: 0,
        }
    }

    /// Record one invocation of `number`
    ///
    /// Returns `false` (and counts nothing) when the number is outside the
    /// supported bound.
    pub fn record(&mut self, number: i64) -> bool {
        match self.slot(number) {
            Some(i) => {
                self.counts[i] += 1;
                true
            }
            None => {
                self.out_of_range += 1;
                false
            }
        }
    }

    /// Count for a single number (0 if never seen or out of range)
    pub fn count(&self, number: i64) -> u64 {
        self.slot(number).map_or(0, |i| self.counts[i])
    }

    /// All non-zero counts as `(number, count)`, ascending by number
    pub fn snapshot(&self) -> Vec<(u64, u64)> {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(n, &c)| (n as u64, c))
            .collect()
    }

    /// Sum of all counted invocations
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Entries observed with a number outside the bound
    pub fn out_of_range(&self) -> u64 {
        self.out_of_range
    }

    pub fn capacity(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    fn slot(&self, number: i64) -> Option<usize> {
        usize::try_from(number)
            .ok()
            .filter(|&i| i < self.counts.len())
    }
}

impl Default for CountTable {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_calls() {
        let mut table = CountTable::default();
        assert!(table.record(1));
        assert!(table.record(1));
        assert!(table.record(0));
        assert_eq!(table.count(1), 2);
        assert_eq!(table.count(0), 1);
        assert_eq!(table.count(2), 0);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn test_empty_table() {
        let table = CountTable::default();
        assert!(table.is_empty());
        assert!(table.snapshot().is_empty());
        assert_eq!(table.total(), 0);
        assert_eq!(table.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_snapshot_sorted_ascending() {
        let mut table = CountTable::default();
        for n in [231, 0, 59, 0, 1, 231] {
            table.record(n);
        }
        assert_eq!(table.snapshot(), vec![(0, 2), (1, 1), (59, 1), (231, 2)]);
    }

    #[test]
    fn test_out_of_range_not_counted() {
        let mut table = CountTable::with_capacity(16);
        assert!(!table.record(16));
        assert!(!table.record(-1));
        assert!(!table.record(i64::MAX));
        assert!(table.record(15));
        assert_eq!(table.out_of_range(), 3);
        assert_eq!(table.snapshot(), vec![(15, 1)]);
        assert_eq!(table.count(16), 0);
        assert_eq!(table.count(-1), 0);
    }

    #[test]
    fn test_zero_capacity_counts_nothing() {
        let mut table = CountTable::with_capacity(0);
        assert!(!table.record(0));
        assert!(table.is_empty());
        assert_eq!(table.out_of_range(), 1);
    }

    #[test]
    fn test_large_counts() {
        let mut table = CountTable::default();
        for _ in 0..100_000 {
            table.record(202);
        }
        assert_eq!(table.count(202), 100_000);
        assert_eq!(table.snapshot().len(), 1);
    }
}
