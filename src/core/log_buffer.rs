//! Bounded ring buffer of log entries

use super::log_entry::LogEntry;
use super::log_level::LevelFilter;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// Fixed-capacity circular store of [`LogEntry`] values.
///
/// Once full, each `add` overwrites the logically oldest entry. All reads
/// and writes are serialized through one mutex; lock hold time is at worst
/// O(capacity) and the lock is never held across I/O.
pub struct LogBuffer {
    capacity: usize,
    inner: Mutex<Ring>,
}

struct Ring {
    entries: Vec<LogEntry>,
    /// Index that the next overwrite lands on once the buffer is full;
    /// equal to the index of the oldest entry.
    cursor: usize,
    len: usize,
}

impl LogBuffer {
    /// Create a buffer holding at most `capacity` entries. A zero capacity
    /// is clamped to one so the ring arithmetic stays well defined.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            inner: Mutex::new(Ring {
                entries: Vec::with_capacity(capacity),
                cursor: 0,
                len: 0,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append an entry, silently dropping the oldest one when full.
    pub fn add(&self, entry: LogEntry) {
        let mut ring = self.inner.lock();
        if ring.len < self.capacity {
            ring.entries.push(entry);
            ring.len += 1;
        } else {
            let cursor = ring.cursor;
            ring.entries[cursor] = entry;
            ring.cursor = (cursor + 1) % self.capacity;
        }
    }

    /// Reset to empty without shrinking the backing allocation.
    pub fn clear(&self) {
        let mut ring = self.inner.lock();
        ring.entries.clear();
        ring.cursor = 0;
        ring.len = 0;
    }

    /// Snapshot of all current entries, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        let ring = self.inner.lock();
        let mut out = Vec::with_capacity(ring.len);
        for i in 0..ring.len {
            out.push(ring.entry_at(i).clone());
        }
        out
    }

    /// Snapshot of entries whose level intersects `filter` and whose
    /// timestamp falls within the inclusive `[from, to]` window (either
    /// bound open). Chronological order.
    ///
    /// Allocates exactly once: a first pass counts matches, a second pass
    /// copies them into a vector sized to fit. Export formatting calls this
    /// on every buffer in the tree, so the single allocation matters.
    pub fn entries_filtered(
        &self,
        filter: LevelFilter,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Vec<LogEntry> {
        let ring = self.inner.lock();

        let matches = |entry: &LogEntry| {
            filter.contains(entry.level)
                && from.is_none_or(|f| entry.timestamp >= f)
                && to.is_none_or(|t| entry.timestamp <= t)
        };

        let mut count = 0;
        for i in 0..ring.len {
            if matches(ring.entry_at(i)) {
                count += 1;
            }
        }

        let mut out = Vec::with_capacity(count);
        for i in 0..ring.len {
            let entry = ring.entry_at(i);
            if matches(entry) {
                out.push(entry.clone());
            }
        }
        out
    }
}

impl Ring {
    /// Entry at logical position `i`, where 0 is the oldest.
    fn entry_at(&self, i: usize) -> &LogEntry {
        debug_assert!(i < self.len);
        // Before the first wrap the cursor is still 0 and logical order
        // equals physical order; afterwards the oldest entry sits at the
        // cursor.
        &self.entries[(self.cursor + i) % self.entries.len()]
    }
}
