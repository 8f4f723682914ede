//! Live editing of one day with debounced persistence.
//!
//! Every edit replaces the whole buffer and schedules a write of it after a
//! quiet period; an edit arriving before the write fires cancels it and
//! schedules its own, so only the most recent buffer is written.
//!
//! Switching to another date cancels a pending write without flushing it.
//! Edits made less than one debounce period before the switch are lost. Call
//! [`EditSession::flush`] first to keep them.
//!
//! Debounced writes run under a write gate. Cancelling waits for a write that
//! is already inside the store, and a write whose generation was superseded
//! never reaches it.

use daylog_core::{
    migrate_and_persist, migrate_one, parse_log, toggle, update_line, DayKey, DayStore,
    MigrationOutcome, ParsedEntry, Result,
};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// In-memory buffer for the active day.
#[derive(Debug)]
pub struct EditSession<S> {
    store: Arc<S>,
    date: DayKey,
    buffer: String,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    generation: Arc<Mutex<u64>>,
}

impl<S> EditSession<S>
where
    S: DayStore + Send + Sync + 'static,
{
    /// Load `date` from the store into a new session.
    ///
    /// # Errors
    /// Returns the store's error if the day cannot be read.
    pub fn open(store: Arc<S>, date: DayKey, delay: Duration) -> Result<Self> {
        let buffer = store.get(date)?;
        debug!(date = %date, "Opened edit session");

        Ok(Self {
            store,
            date,
            buffer,
            delay,
            pending: None,
            generation: Arc::new(Mutex::new(0)),
        })
    }

    /// The active date.
    #[must_use]
    pub const fn date(&self) -> DayKey {
        self.date
    }

    /// The current buffer, including unsaved edits.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Parse the current buffer.
    #[must_use]
    pub fn entries(&self) -> Vec<ParsedEntry> {
        parse_log(&self.buffer)
    }

    /// Whether a debounced write is scheduled and has not run yet.
    #[must_use]
    pub fn has_pending_write(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Replace the buffer and schedule its write.
    ///
    /// Must be called from within a tokio runtime.
    pub fn edit(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.schedule_write();
    }

    /// Replace one line of the buffer.
    ///
    /// # Errors
    /// Returns `CoreError::LineOutOfRange` if `index` is past the last line.
    pub fn update_line<F>(&mut self, index: usize, f: F) -> Result<()>
    where
        F: FnOnce(&str) -> String,
    {
        let updated = update_line(&self.buffer, index, f)?;
        self.edit(updated);
        Ok(())
    }

    /// Toggle the task status of one line.
    ///
    /// # Errors
    /// Returns `CoreError::LineOutOfRange` if `index` is past the last line.
    pub fn toggle_line(&mut self, index: usize) -> Result<()> {
        self.update_line(index, toggle)
    }

    /// Mark one open task as migrated.
    ///
    /// # Errors
    /// Returns `CoreError::LineOutOfRange` if `index` is past the last line.
    pub fn migrate_line(&mut self, index: usize) -> Result<()> {
        self.update_line(index, migrate_one)
    }

    /// Make another date active, discarding any write that has not fired.
    ///
    /// # Errors
    /// Returns the store's error if the new day cannot be read; the session
    /// then stays on the old date and its pending write stays scheduled.
    pub fn switch_date(&mut self, date: DayKey) -> Result<()> {
        let buffer = self.store.get(date)?;

        if self.cancel_pending() {
            warn!(date = %self.date, "Discarded unsaved edits on date switch");
        }

        self.date = date;
        self.buffer = buffer;

        debug!(date = %date, "Switched active date");

        Ok(())
    }

    /// Write the buffer now, replacing any pending write.
    ///
    /// # Errors
    /// Returns the store's error if the write fails.
    pub fn flush(&mut self) -> Result<()> {
        self.cancel_pending();
        self.store.set(self.date, &self.buffer)?;
        debug!(date = %self.date, "Flushed buffer");
        Ok(())
    }

    /// Migrate every open task of the buffer to the next day and switch to it.
    ///
    /// The current day is written first, then the next day. On error the
    /// session keeps its date and buffer, but the store may already hold the
    /// migrated current day.
    ///
    /// # Errors
    /// Returns an error if the next date is out of range or the store fails.
    pub fn migrate_all_open(&mut self) -> Result<MigrationOutcome> {
        self.cancel_pending();

        let outcome = migrate_and_persist(self.store.as_ref(), self.date, &self.buffer)?;
        info!(
            from = %self.date,
            to = %outcome.next_date,
            count = outcome.migrated.len(),
            "Migrated open tasks"
        );

        self.buffer = self.store.get(outcome.next_date)?;
        self.date = outcome.next_date;

        Ok(outcome)
    }

    /// Abort the pending write; returns whether it had not run yet.
    ///
    /// Blocks until a write already inside the store has returned.
    fn cancel_pending(&mut self) -> bool {
        *self
            .generation
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;

        self.pending.take().is_some_and(|handle| {
            let live = !handle.is_finished();
            handle.abort();
            live
        })
    }

    fn schedule_write(&mut self) {
        self.cancel_pending();

        let store = Arc::clone(&self.store);
        let date = self.date;
        let text = self.buffer.clone();
        let delay = self.delay;
        let generation = Arc::clone(&self.generation);
        let ticket = *generation.lock().unwrap_or_else(PoisonError::into_inner);

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let current = generation.lock().unwrap_or_else(PoisonError::into_inner);
            if *current != ticket {
                debug!(date = %date, "Skipped superseded write");
                return;
            }
            match store.set(date, &text) {
                Ok(()) => debug!(date = %date, "Saved buffer"),
                Err(e) => error!(date = %date, error = %e, "Debounced write failed"),
            }
            drop(current);
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daylog_core::{CoreError, MemoryStore};
    use pretty_assertions::assert_eq;
    use std::sync::mpsc;

    const DELAY: Duration = Duration::from_millis(300);

    fn day(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    fn session(store: &Arc<MemoryStore>) -> EditSession<MemoryStore> {
        EditSession::open(Arc::clone(store), day("2024-06-01"), DELAY).unwrap()
    }

    async fn settle(d: Duration) {
        tokio::time::sleep(d).await;
        tokio::task::yield_now().await;
    }

    /// Fails every read of one day.
    struct UnreadableDayStore {
        inner: MemoryStore,
        unreadable: DayKey,
    }

    impl DayStore for UnreadableDayStore {
        fn get(&self, date: DayKey) -> Result<String> {
            if date == self.unreadable {
                return Err(CoreError::store("disk on fire"));
            }
            self.inner.get(date)
        }

        fn set(&self, date: DayKey, text: &str) -> Result<()> {
            self.inner.set(date, text)
        }
    }

    /// Holds the first write inside `set` until released.
    struct GatedStore {
        inner: MemoryStore,
        gate: Mutex<Option<(mpsc::Sender<()>, mpsc::Receiver<()>)>>,
    }

    impl DayStore for GatedStore {
        fn get(&self, date: DayKey) -> Result<String> {
            self.inner.get(date)
        }

        fn set(&self, date: DayKey, text: &str) -> Result<()> {
            let gate = self.gate.lock().unwrap().take();
            if let Some((entered, release)) = gate {
                entered.send(()).unwrap();
                release.recv().unwrap();
            }
            self.inner.set(date, text)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_is_written_after_delay() {
        let store = Arc::new(MemoryStore::new());
        let mut s = session(&store);

        s.edit("- a");
        assert!(s.has_pending_write());

        settle(Duration::from_millis(299)).await;
        assert!(!store.contains(day("2024-06-01")));

        settle(Duration::from_millis(2)).await;
        assert_eq!(store.get(day("2024-06-01")).unwrap(), "- a");
        assert!(!s.has_pending_write());
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_edit_wins() {
        let store = Arc::new(MemoryStore::new());
        let mut s = session(&store);

        s.edit("- a");
        settle(Duration::from_millis(200)).await;
        s.edit("- a\n- b");
        settle(Duration::from_millis(200)).await;
        assert!(!store.contains(day("2024-06-01")));

        settle(Duration::from_millis(101)).await;
        assert_eq!(store.get(day("2024-06-01")).unwrap(), "- a\n- b");
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_date_discards_pending_write() {
        let store = Arc::new(MemoryStore::new());
        store.set(day("2024-06-02"), "o tomorrow").unwrap();
        let mut s = session(&store);

        s.edit("- unsaved");
        s.switch_date(day("2024-06-02")).unwrap();
        settle(Duration::from_secs(1)).await;

        assert!(!store.contains(day("2024-06-01")));
        assert_eq!(s.date(), day("2024-06-02"));
        assert_eq!(s.text(), "o tomorrow");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_switch_keeps_pending_write() {
        let store = Arc::new(UnreadableDayStore {
            inner: MemoryStore::new(),
            unreadable: day("2024-06-02"),
        });
        let mut s = EditSession::open(Arc::clone(&store), day("2024-06-01"), DELAY).unwrap();

        s.edit("- unsaved");
        assert!(s.switch_date(day("2024-06-02")).is_err());
        assert_eq!(s.date(), day("2024-06-01"));
        assert!(s.has_pending_write());

        settle(Duration::from_secs(1)).await;
        assert_eq!(store.inner.get(day("2024-06-01")).unwrap(), "- unsaved");
        assert_eq!(s.text(), "- unsaved");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_migration_waits_for_in_flight_write() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let store = Arc::new(GatedStore {
            inner: MemoryStore::new(),
            gate: Mutex::new(Some((entered_tx, release_rx))),
        });
        let mut s = EditSession::open(
            Arc::clone(&store),
            day("2024-06-01"),
            Duration::from_millis(10),
        )
        .unwrap();

        s.edit("- a\nx b");
        entered_rx.recv_timeout(Duration::from_secs(5)).unwrap();

        let releaser = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            release_tx.send(()).unwrap();
        });
        let outcome = s.migrate_all_open().unwrap();
        releaser.join().unwrap();

        assert_eq!(outcome.migrated, vec!["- a"]);
        assert_eq!(store.inner.get(day("2024-06-01")).unwrap(), "> a\nx b");
        assert_eq!(store.inner.get(day("2024-06-02")).unwrap(), "- a");
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_writes_immediately() {
        let store = Arc::new(MemoryStore::new());
        let mut s = session(&store);

        s.edit("- keep me");
        s.flush().unwrap();
        assert_eq!(store.get(day("2024-06-01")).unwrap(), "- keep me");
        assert!(!s.has_pending_write());

        s.switch_date(day("2024-06-02")).unwrap();
        assert_eq!(store.get(day("2024-06-01")).unwrap(), "- keep me");
    }

    #[tokio::test(start_paused = true)]
    async fn test_line_actions() {
        let store = Arc::new(MemoryStore::new());
        store.set(day("2024-06-01"), "- a\n- b\n. c").unwrap();
        let mut s = session(&store);

        s.toggle_line(0).unwrap();
        s.migrate_line(1).unwrap();
        assert_eq!(s.text(), "x a\n> b\n. c");

        let err = s.toggle_line(9).unwrap_err();
        assert!(matches!(err, CoreError::LineOutOfRange { index: 9, len: 3 }));
        assert_eq!(s.text(), "x a\n> b\n. c");

        settle(DELAY + Duration::from_millis(1)).await;
        assert_eq!(store.get(day("2024-06-01")).unwrap(), "x a\n> b\n. c");
    }

    #[tokio::test(start_paused = true)]
    async fn test_migrate_all_open_moves_to_next_day() {
        let store = Arc::new(MemoryStore::new());
        store.set(day("2024-06-02"), "o standup").unwrap();
        let mut s = session(&store);

        s.edit("- a #x\nx b\n- !c");
        let outcome = s.migrate_all_open().unwrap();

        assert_eq!(outcome.migrated, vec!["- a #x", "- !c"]);
        assert_eq!(store.get(day("2024-06-01")).unwrap(), "> a #x\nx b\n> !c");
        assert_eq!(store.get(day("2024-06-02")).unwrap(), "o standup\n- a #x\n- !c");
        assert_eq!(s.date(), day("2024-06-02"));
        assert_eq!(s.text(), "o standup\n- a #x\n- !c");
        assert!(!s.has_pending_write());

        let entries = s.entries();
        assert_eq!(entries.len(), 3);
        assert!(entries[2].priority);
    }
}
