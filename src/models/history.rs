// Copyright (c) 2025, Pinpoly developers
// SPDX-License-Identifier: BSD-3-Clause

//! Linear undo/redo history.
//!
//! Wraps a value in a past/present/future snapshot stack. Every committed
//! mutation goes through [`History::set_state`], which suppresses commits
//! whose result is structurally equal to the current present, so no-op
//! edits never pollute the undo stack. Snapshots are whole immutable
//! values; undo and redo shift one snapshot between the stacks without
//! reordering the rest.

/// Undo/redo history for a single value.
#[derive(Debug, Clone)]
pub struct History<T> {
    past: Vec<T>,
    present: T,
    future: Vec<T>,
}

impl<T: Clone + PartialEq> History<T> {
    /// Create a history with an initial present and empty stacks.
    pub fn new(initial: T) -> Self {
        Self {
            past: Vec::new(),
            present: initial,
            future: Vec::new(),
        }
    }

    /// The current state.
    pub fn present(&self) -> &T {
        &self.present
    }

    /// Commit a new state as one atomic history entry.
    ///
    /// If `next` equals the current present the commit is discarded and
    /// the stacks are untouched.
    pub fn set_state(&mut self, next: T) {
        if next == self.present {
            return;
        }
        let previous = std::mem::replace(&mut self.present, next);
        self.past.push(previous);
        self.future.clear();
    }

    /// Commit the result of a producer applied to the current state.
    pub fn set_state_with(&mut self, producer: impl FnOnce(&T) -> T) {
        let next = producer(&self.present);
        self.set_state(next);
    }

    /// Step back one entry. No-op when the past is empty.
    pub fn undo(&mut self) {
        if let Some(previous) = self.past.pop() {
            let current = std::mem::replace(&mut self.present, previous);
            self.future.insert(0, current);
        }
    }

    /// Step forward one entry. No-op when the future is empty.
    pub fn redo(&mut self) {
        if self.future.is_empty() {
            return;
        }
        let next = self.future.remove(0);
        let current = std::mem::replace(&mut self.present, next);
        self.past.push(current);
    }

    /// Discard both stacks and set the present directly.
    ///
    /// Used only on image (re)load: history never crosses images.
    pub fn reset(&mut self, state: T) {
        self.past.clear();
        self.future.clear();
        self.present = state;
    }

    /// Whether undo would change state.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Whether redo would change state.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }
}
