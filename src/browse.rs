//! # Browse Navigator Module
//!
//! Tracks, per user, which catalog position is currently on screen. The
//! cursor is clamped to the catalog bounds and never wraps around.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use teloxide::types::UserId;

pub struct BrowseNavigator {
    len: usize,
    cursors: Mutex<HashMap<UserId, usize>>,
}

impl BrowseNavigator {
    /// Create a navigator over a catalog of `len` products
    pub fn new(len: usize) -> Self {
        Self {
            len,
            cursors: Mutex::new(HashMap::new()),
        }
    }

    fn cursors(&self) -> MutexGuard<'_, HashMap<UserId, usize>> {
        self.cursors.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn last_index(&self) -> usize {
        self.len.saturating_sub(1)
    }

    /// Current position, 0 when the user has not browsed yet
    pub fn get_index(&self, user: UserId) -> usize {
        self.cursors().get(&user).copied().unwrap_or(0)
    }

    /// Move to `index`, clamped to the last product
    pub fn set_index(&self, user: UserId, index: usize) -> usize {
        let index = index.min(self.last_index());
        self.cursors().insert(user, index);
        index
    }

    pub fn next(&self, user: UserId) -> usize {
        let mut cursors = self.cursors();
        let cursor = cursors.entry(user).or_insert(0);
        *cursor = (*cursor + 1).min(self.last_index());
        *cursor
    }

    pub fn prev(&self, user: UserId) -> usize {
        let mut cursors = self.cursors();
        let cursor = cursors.entry(user).or_insert(0);
        *cursor = cursor.saturating_sub(1);
        *cursor
    }

    /// Back to the first product
    pub fn reset(&self, user: UserId) -> usize {
        self.set_index(user, 0)
    }

    pub fn clear_all(&self) {
        self.cursors().clear();
    }
}
