//! Scramble-set id allocation.
//!
//! Ids are plain integers, unique for the lifetime of the process and never
//! persisted. Matching relies on event/round identity and the used-id set, not on
//! id continuity, so restarting from 1 after a restart is fine.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
pub struct ScrambleSetIds {
    next: AtomicU64,
}

impl Default for ScrambleSetIds {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrambleSetIds {
    pub fn new() -> Self {
        Self { next: AtomicU64::new(1) }
    }

    /// Issue the next id (1, 2, 3, ...).
    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Make sure every later id is strictly greater than `id`.
    /// Used when a competition file arrives already carrying scramble sets.
    pub fn observe(&self, id: u64) {
        self.next.fetch_max(id.saturating_add(1), Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn starts_at_one_and_increases() {
        let ids = ScrambleSetIds::new();
        assert_eq!(ids.next(), 1);
        assert_eq!(ids.next(), 2);
        assert_eq!(ids.next(), 3);
    }

    #[test]
    fn observe_skips_past_existing_ids() {
        let ids = ScrambleSetIds::new();
        ids.observe(41);
        assert_eq!(ids.next(), 42);
        // Lower ids never move the counter backwards.
        ids.observe(5);
        assert_eq!(ids.next(), 43);
    }

    #[test]
    fn no_duplicates_across_threads() {
        let ids = Arc::new(ScrambleSetIds::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = ids.clone();
                std::thread::spawn(move || (0..250).map(|_| ids.next()).collect::<Vec<_>>())
            })
            .collect();
        let mut seen = HashSet::new();
        for h in handles {
            for id in h.join().expect("worker thread") {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 1000);
    }
}
