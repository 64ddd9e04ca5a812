//! Undo/redo: a bounded stack of whole-album snapshots.
//!
//! State machine: push-on-mutate, clear-redo-on-new-mutate, pop-on-undo/
//! redo. A mutation after an undo discards the redo stack (standard editor
//! semantics); keeping it would replay edits against a state they were
//! never made from.

use crate::album::Album;

/// Practical cap; continuous drags batch into one entry at the caller.
pub const HISTORY_CAP: usize = 50;

#[derive(Clone, Debug, Default)]
pub struct History {
    undo: Vec<Album>,
    redo: Vec<Album>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pre-mutation state. Drops the oldest entry past the cap
    /// and invalidates any redo entries.
    pub fn push(&mut self, snapshot: Album) {
        if self.undo.len() == HISTORY_CAP {
            self.undo.remove(0);
        }
        self.undo.push(snapshot);
        self.redo.clear();
    }

    /// Swap `current` for the most recent snapshot; the replaced state goes
    /// onto the redo stack. Returns false with `current` untouched when
    /// there is nothing to undo.
    pub fn undo(&mut self, current: &mut Album) -> bool {
        let Some(snapshot) = self.undo.pop() else {
            return false;
        };
        self.redo.push(std::mem::replace(current, snapshot));
        true
    }

    pub fn redo(&mut self, current: &mut Album) -> bool {
        let Some(snapshot) = self.redo.pop() else {
            return false;
        };
        self.undo.push(std::mem::replace(current, snapshot));
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> (usize, usize) {
        (self.undo.len(), self.redo.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> Album {
        Album::new_empty("alb", title, "fam")
    }

    #[test]
    fn undo_redo_mirror() {
        let mut history = History::new();
        let mut current = titled("v1");

        history.push(current.clone());
        current.title = "v2".to_string();

        assert!(history.undo(&mut current));
        assert_eq!(current.title, "v1");
        assert!(history.can_redo());

        assert!(history.redo(&mut current));
        assert_eq!(current.title, "v2");
        assert!(!history.can_redo());
    }

    #[test]
    fn new_mutation_discards_redo() {
        let mut history = History::new();
        let mut current = titled("a");

        history.push(current.clone());
        current.title = "b".to_string();
        history.undo(&mut current);
        assert_eq!(history.depth(), (0, 1));

        // mutation B after the undo
        history.push(current.clone());
        current.title = "c".to_string();
        assert_eq!(history.depth(), (1, 0));
        assert!(!history.can_redo());
    }

    #[test]
    fn cap_drops_oldest() {
        let mut history = History::new();
        let mut current = titled("0");
        for i in 1..=HISTORY_CAP + 10 {
            history.push(current.clone());
            current.title = format!("{i}");
        }
        assert_eq!(history.depth().0, HISTORY_CAP);

        while history.undo(&mut current) {}
        // the oldest surviving snapshot is 10, not 0
        assert_eq!(current.title, "10");
    }

    #[test]
    fn undo_on_empty_is_noop() {
        let mut history = History::new();
        let mut current = titled("x");
        assert!(!history.undo(&mut current));
        assert_eq!(current.title, "x");
    }
}
