//! Recently picked colors.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::color::Color;

/// Maximum number of remembered colors.
pub const RECENT_COLORS_CAPACITY: usize = 6;

/// Bounded, deduplicating history ordered by the last time each color was
/// recorded. Entries are kept oldest-first internally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecentColors {
    entries: VecDeque<Color>,
}

impl RecentColors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a persisted list stored oldest-first.
    ///
    /// Every entry goes through [`record`](Self::record), so a list that is too
    /// long or contains duplicates comes back normalized.
    pub fn hydrate(persisted: impl IntoIterator<Item = Color>) -> Self {
        let mut recent = Self::new();
        for color in persisted {
            recent.record(color);
        }
        recent
    }

    /// Move `color` to the most-recent end, evicting the oldest entries past
    /// capacity.
    pub fn record(&mut self, color: Color) {
        self.entries.retain(|entry| *entry != color);
        self.entries.push_back(color);
        while self.entries.len() > RECENT_COLORS_CAPACITY {
            self.entries.pop_front();
        }

        debug_assert!(self.entries.len() <= RECENT_COLORS_CAPACITY);
        debug_assert!(self.is_unique());
        debug!(len = self.entries.len(), "recorded recent color");
    }

    /// Entries most-recent-first. Each call is an independent traversal.
    pub fn snapshot(&self) -> impl ExactSizeIterator<Item = Color> + '_ {
        self.entries.iter().rev().copied()
    }

    /// Entries oldest-first, the order they are persisted in.
    pub fn to_persisted(&self) -> Vec<Color> {
        self.entries.iter().copied().collect()
    }

    pub fn most_recent(&self) -> Option<Color> {
        self.entries.back().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_unique(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(i, a)| self.entries.iter().skip(i + 1).all(|b| a != b))
    }
}

/// [`RecentColors`] behind a mutex, for hosts that touch the history from
/// more than one thread. Clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct SharedRecentColors {
    inner: Arc<Mutex<RecentColors>>,
}

impl SharedRecentColors {
    pub fn new(recent: RecentColors) -> Self {
        Self {
            inner: Arc::new(Mutex::new(recent)),
        }
    }

    pub fn record(&self, color: Color) {
        self.lock().record(color);
    }

    /// A consistent copy of the entries, most-recent-first.
    pub fn snapshot(&self) -> Vec<Color> {
        self.lock().snapshot().collect()
    }

    pub fn to_persisted(&self) -> Vec<Color> {
        self.lock().to_persisted()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // record() leaves the buffer valid at every step, so a poisoned lock
    // still guards usable data.
    fn lock(&self) -> MutexGuard<'_, RecentColors> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
