//! The ad debt queue.
//!
//! Deferred ads are owed, not scheduled: each "pay later" press moves the
//! upcoming ad's URI into this bounded FIFO, to be paid off back-to-back on
//! demand. The queue outlives playback sessions and persists across app
//! restarts.

use crate::store::{persist_or_warn, StoreHandle};
use log::warn;
use std::collections::VecDeque;

/// Maximum number of ads that may be owed at once.
pub const MAX_DEBT: usize = 5;

const STORE_KEY: &str = "debt-storage";

pub struct DebtQueue {
    entries: VecDeque<String>,
    store: StoreHandle,
}

impl DebtQueue {
    /// Restore the queue from storage, or start empty if nothing (or
    /// nothing readable) is persisted.
    pub fn load(store: StoreHandle) -> Self {
        let entries = match store.get(STORE_KEY) {
            Ok(Some(data)) => match serde_json::from_str::<Vec<String>>(&data) {
                Ok(uris) => {
                    // A hand-edited or stale file could exceed the cap;
                    // drop the overflow rather than carry an invalid queue.
                    let mut uris = uris;
                    if uris.len() > MAX_DEBT {
                        warn!(
                            "persisted debt has {} entries, truncating to {}",
                            uris.len(),
                            MAX_DEBT
                        );
                        uris.truncate(MAX_DEBT);
                    }
                    uris.into()
                }
                Err(e) => {
                    warn!("corrupt debt state, starting fresh: {}", e);
                    VecDeque::new()
                }
            },
            Ok(None) => VecDeque::new(),
            Err(e) => {
                warn!("could not read debt state, starting fresh: {}", e);
                VecDeque::new()
            }
        };
        DebtQueue { entries, store }
    }

    /// Append an owed ad. Returns false (and changes nothing) when the
    /// queue is already at `MAX_DEBT`.
    pub fn enqueue(&mut self, uri: &str) -> bool {
        if self.entries.len() >= MAX_DEBT {
            return false;
        }
        self.entries.push_back(uri.to_string());
        self.persist();
        true
    }

    /// Pay off the oldest owed ad, if any.
    pub fn dequeue_front(&mut self) -> Option<String> {
        let uri = self.entries.pop_front()?;
        self.persist();
        Some(uri)
    }

    /// Forgive all debt unconditionally (user reset, works in either mode).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_DEBT
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    fn persist(&self) {
        let uris: Vec<&str> = self.entries.iter().map(String::as_str).collect();
        match serde_json::to_string_pretty(&uris) {
            Ok(json) => persist_or_warn(self.store.as_ref(), STORE_KEY, &json),
            Err(e) => warn!("could not serialize debt state: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStorage;
    use std::rc::Rc;

    fn make_queue() -> DebtQueue {
        DebtQueue::load(Rc::new(MemoryStorage::new()))
    }

    #[test]
    fn starts_empty_without_persisted_state() {
        let queue = make_queue();
        assert!(queue.is_empty());
        assert!(!queue.is_full());
    }

    #[test]
    fn enqueue_dequeue_round_trip() {
        let mut queue = make_queue();
        assert!(queue.enqueue("ad_a.mp4"));
        assert_eq!(queue.dequeue_front().as_deref(), Some("ad_a.mp4"));
        assert!(queue.is_empty());
    }

    #[test]
    fn dequeue_preserves_fifo_order() {
        let mut queue = make_queue();
        queue.enqueue("first");
        queue.enqueue("second");
        queue.enqueue("third");
        assert_eq!(queue.dequeue_front().as_deref(), Some("first"));
        assert_eq!(queue.dequeue_front().as_deref(), Some("second"));
        assert_eq!(queue.dequeue_front().as_deref(), Some("third"));
        assert_eq!(queue.dequeue_front(), None);
    }

    #[test]
    fn enqueue_on_full_queue_is_noop() {
        let mut queue = make_queue();
        for i in 0..MAX_DEBT {
            assert!(queue.enqueue(&format!("ad_{}.mp4", i)));
        }
        assert!(queue.is_full());
        assert!(!queue.enqueue("overflow.mp4"));
        assert_eq!(queue.len(), MAX_DEBT);
        assert!(queue.entries().all(|uri| uri != "overflow.mp4"));
    }

    #[test]
    fn clear_empties_unconditionally() {
        let mut queue = make_queue();
        queue.enqueue("a");
        queue.enqueue("b");
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.dequeue_front(), None);
    }

    #[test]
    fn state_survives_reload_from_same_store() {
        let store: StoreHandle = Rc::new(MemoryStorage::new());
        {
            let mut queue = DebtQueue::load(Rc::clone(&store));
            queue.enqueue("owed_1");
            queue.enqueue("owed_2");
        }
        let mut reloaded = DebtQueue::load(store);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.dequeue_front().as_deref(), Some("owed_1"));
    }

    #[test]
    fn corrupt_persisted_state_starts_fresh() {
        let store: StoreHandle = Rc::new(MemoryStorage::new());
        store.set("debt-storage", "{not json").unwrap();
        let queue = DebtQueue::load(store);
        assert!(queue.is_empty());
    }

    #[test]
    fn oversized_persisted_state_is_truncated() {
        let store: StoreHandle = Rc::new(MemoryStorage::new());
        let uris: Vec<String> = (0..MAX_DEBT + 3).map(|i| format!("ad_{}", i)).collect();
        store
            .set("debt-storage", &serde_json::to_string(&uris).unwrap())
            .unwrap();
        let queue = DebtQueue::load(store);
        assert_eq!(queue.len(), MAX_DEBT);
    }
}
