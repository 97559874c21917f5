//! The per-session ad schedule.
//!
//! An ordered run of ad entries consumed strictly front-to-back: only the
//! head is ever inspected, and once an entry leaves the head (played or
//! deferred into debt) it never comes back. The schedule is owned by its
//! playback session and dies with it.

use crate::catalog::AdSpot;
use std::collections::VecDeque;

/// One pending ad: where to fetch it and when it cuts in.
///
/// `insert_at` moves forward when the user snoozes, so an entry's deadline
/// is mutable until the entry is consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdEntry {
    pub uri: String,
    pub insert_at: u64,
}

#[derive(Debug, Clone, Default)]
pub struct AdSchedule {
    entries: VecDeque<AdEntry>,
}

impl AdSchedule {
    /// Build a schedule from catalog ad spots, ordered by insertion time.
    pub fn from_spots(spots: &[AdSpot]) -> Self {
        let mut entries: Vec<AdEntry> = spots
            .iter()
            .map(|spot| AdEntry {
                uri: spot.uri.clone(),
                insert_at: spot.insert_at,
            })
            .collect();
        entries.sort_by_key(|e| e.insert_at);
        AdSchedule {
            entries: entries.into(),
        }
    }

    /// The soonest pending ad, if any.
    pub fn head(&self) -> Option<&AdEntry> {
        self.entries.front()
    }

    /// Consume the head entry. Consumption is monotonic: the entry is gone
    /// for the rest of the session.
    pub fn pop_head(&mut self) -> Option<AdEntry> {
        self.entries.pop_front()
    }

    /// Push the head entry's deadline back by `delay_millis`.
    ///
    /// Only the head moves; later entries keep their original deadlines.
    /// No-op on an empty schedule.
    pub fn snooze_head(&mut self, delay_millis: u64) {
        if let Some(head) = self.entries.front_mut() {
            head.insert_at += delay_millis;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &AdEntry> {
        self.entries.iter()
    }
}
