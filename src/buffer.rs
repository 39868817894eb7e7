use crate::record::LogEntry;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Maximum number of entries kept after a failed send is re-admitted.
pub const MAX_BUFFERED: usize = 1000;

#[derive(Debug, Default)]
struct State {
    entries: VecDeque<LogEntry>,
    sealed: bool,
}

/// Ordered holding area for entries that have not been delivered yet.
///
/// Producers append at the tail; the flush engine drains from the head.
/// Capacity is only enforced on [`LogBuffer::restore`]: appends are
/// accepted eagerly and the surplus is shed when a failed batch comes back.
/// Once [`LogBuffer::seal`]ed, appends are refused.
#[derive(Debug)]
pub struct LogBuffer {
    state: Mutex<State>,
    capacity: usize,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::with_capacity(MAX_BUFFERED)
    }
}

impl LogBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(State::default()),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append at the tail and return the new length, read under the same
    /// lock so threshold decisions never race other producers.
    ///
    /// Returns `None` without storing the entry if the buffer is sealed.
    pub fn append(&self, entry: LogEntry) -> Option<usize> {
        let mut state = self.lock();
        if state.sealed {
            return None;
        }
        state.entries.push_back(entry);
        Some(state.entries.len())
    }

    /// Take every buffered entry, oldest first, leaving the buffer empty.
    pub fn drain_all(&self) -> Vec<LogEntry> {
        self.lock().entries.drain(..).collect()
    }

    /// Put a failed batch back ahead of anything appended since it was
    /// drained, then truncate from the tail to capacity.
    ///
    /// Returns the number of entries dropped by the truncation.
    pub fn restore(&self, batch: Vec<LogEntry>) -> usize {
        let mut state = self.lock();
        let newer = std::mem::take(&mut state.entries);
        state.entries.extend(batch);
        state.entries.extend(newer);

        let dropped = state.entries.len().saturating_sub(self.capacity);
        state.entries.truncate(self.capacity);
        dropped
    }

    /// Refuse further appends and hand back whatever is still buffered.
    pub fn seal(&self) -> Vec<LogEntry> {
        let mut state = self.lock();
        state.sealed = true;
        state.entries.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{EntryBuilder, Metadata};

    fn entry(message: &str) -> LogEntry {
        EntryBuilder::new("test").build("info", message, Metadata::new(), None, None)
    }

    fn messages(entries: &[LogEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.message.as_str()).collect()
    }

    #[test]
    fn append_reports_length_and_drain_is_fifo() {
        let buffer = LogBuffer::default();
        assert_eq!(buffer.append(entry("a")), Some(1));
        assert_eq!(buffer.append(entry("b")), Some(2));
        assert_eq!(buffer.append(entry("c")), Some(3));

        let drained = buffer.drain_all();
        assert_eq!(messages(&drained), ["a", "b", "c"]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn append_does_not_enforce_capacity() {
        let buffer = LogBuffer::with_capacity(2);
        for i in 0..5 {
            buffer.append(entry(&i.to_string()));
        }
        assert_eq!(buffer.len(), 5);
    }

    #[test]
    fn restore_puts_failed_batch_ahead_of_newer_entries() {
        let buffer = LogBuffer::default();
        buffer.append(entry("old-1"));
        buffer.append(entry("old-2"));
        let batch = buffer.drain_all();

        buffer.append(entry("new-1"));
        assert_eq!(buffer.restore(batch), 0);

        assert_eq!(messages(&buffer.drain_all()), ["old-1", "old-2", "new-1"]);
    }

    #[test]
    fn restore_truncates_newest_entries_beyond_capacity() {
        let buffer = LogBuffer::with_capacity(3);
        buffer.append(entry("old-1"));
        buffer.append(entry("old-2"));
        let batch = buffer.drain_all();

        buffer.append(entry("new-1"));
        buffer.append(entry("new-2"));
        assert_eq!(buffer.restore(batch), 1);

        assert_eq!(messages(&buffer.drain_all()), ["old-1", "old-2", "new-1"]);
    }

    #[test]
    fn sustained_failure_caps_at_max_buffered() {
        let buffer = LogBuffer::default();
        for round in 0..3 {
            for i in 0..600 {
                buffer.append(entry(&format!("{round}-{i}")));
            }
            let batch = buffer.drain_all();
            buffer.restore(batch);
            assert!(buffer.len() <= MAX_BUFFERED);
        }
        assert_eq!(buffer.len(), MAX_BUFFERED);
    }

    #[test]
    fn sealed_buffer_refuses_appends_and_returns_leftovers() {
        let buffer = LogBuffer::default();
        buffer.append(entry("pending"));

        let leftovers = buffer.seal();
        assert_eq!(messages(&leftovers), ["pending"]);
        assert_eq!(buffer.append(entry("late")), None);
        assert!(buffer.is_empty());
    }
}
