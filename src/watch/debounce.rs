//! Pending-change bookkeeping for the watch loop

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::Instant;

/// Files changed since the last pass, with how often each has already failed
#[derive(Debug, Default)]
pub struct PendingChanges {
    files: HashMap<PathBuf, u32>,
    last_change: Option<Instant>,
}

impl PendingChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note a change. Each change restarts the quiet period.
    pub fn record(&mut self, path: PathBuf, now: Instant) {
        // a fresh change to a failing file earns it a fresh set of attempts
        self.files.insert(path, 0);
        self.last_change = Some(now);
    }

    /// Put a file back after a failed attempt. It waits out a full quiet
    /// period before the next try. A change recorded while the pass ran wins.
    pub fn requeue(&mut self, path: PathBuf, attempts: u32, now: Instant) {
        self.files.entry(path).or_insert(attempts);
        self.last_change = Some(now);
    }

    /// Hand over the whole pending set once nothing has changed for `idle`
    pub fn take_if_idle(&mut self, now: Instant, idle: Duration) -> Option<Vec<(PathBuf, u32)>> {
        if self.files.is_empty() {
            return None;
        }
        let last = self.last_change?;
        if now.saturating_duration_since(last) < idle {
            return None;
        }

        self.last_change = None;
        let mut files: Vec<(PathBuf, u32)> = self.files.drain().collect();
        files.sort();
        Some(files)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDLE: Duration = Duration::from_secs(30);

    #[test]
    fn test_waits_for_quiet_period() {
        let start = Instant::now();
        let mut pending = PendingChanges::new();
        assert!(pending.take_if_idle(start, IDLE).is_none());

        pending.record(PathBuf::from("/p/a.jsonl"), start);
        pending.record(PathBuf::from("/p/b.jsonl"), start + Duration::from_secs(20));
        pending.record(PathBuf::from("/p/a.jsonl"), start + Duration::from_secs(25));
        assert_eq!(pending.len(), 2);

        // 30s after the first change but only 5s after the last
        assert!(pending.take_if_idle(start + Duration::from_secs(30), IDLE).is_none());

        let taken = pending
            .take_if_idle(start + Duration::from_secs(55), IDLE)
            .unwrap();
        assert_eq!(
            taken,
            vec![(PathBuf::from("/p/a.jsonl"), 0), (PathBuf::from("/p/b.jsonl"), 0)]
        );
        assert!(pending.is_empty());
        assert!(pending.take_if_idle(start + Duration::from_secs(500), IDLE).is_none());
    }

    #[test]
    fn test_requeue_keeps_attempts_until_file_changes() {
        let start = Instant::now();
        let mut pending = PendingChanges::new();
        pending.requeue(PathBuf::from("/p/a.jsonl"), 2, start);
        let taken = pending.take_if_idle(start + IDLE, IDLE).unwrap();
        assert_eq!(taken, vec![(PathBuf::from("/p/a.jsonl"), 2)]);

        pending.requeue(PathBuf::from("/p/a.jsonl"), 2, start);
        pending.record(PathBuf::from("/p/a.jsonl"), start);
        let taken = pending.take_if_idle(start + IDLE, IDLE).unwrap();
        assert_eq!(taken, vec![(PathBuf::from("/p/a.jsonl"), 0)]);
    }
}
