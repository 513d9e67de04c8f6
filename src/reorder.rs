use crate::board::CategoryBoard;
use crate::error::ReorderError;
use log::{debug, error, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragState {
    pub dragged_item_id: String,
    pub drag_over_index: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Dropped(usize),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    Moved { from: usize, to: usize },
    Unchanged,
    NoActiveDrag,
}

/// Pointer-drag reordering as three messages: `begin`, `hover`, and `end`/`finish`.
///
/// `end` is the only guaranteed cleanup: a host that sees a drag cancelled outside any
/// target calls `end` without ever calling `drop`.
#[derive(Debug, Default)]
pub struct DragReorder {
    state: Option<DragState>,
}

impl DragReorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Option<&DragState> {
        self.state.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_some()
    }

    pub fn dragged_id(&self) -> Option<&str> {
        self.state.as_ref().map(|s| s.dragged_item_id.as_str())
    }

    pub fn begin(&mut self, item_id: &str) -> Result<(), ReorderError> {
        if let Some(active) = &self.state {
            if active.dragged_item_id == item_id {
                return Ok(());
            }
            warn!(
                "drag start for {item_id} ignored, {} is still active",
                active.dragged_item_id
            );
            return Err(ReorderError::AlreadyDragging {
                active: active.dragged_item_id.clone(),
                requested: item_id.to_string(),
            });
        }
        self.state = Some(DragState {
            dragged_item_id: item_id.to_string(),
            drag_over_index: None,
        });
        Ok(())
    }

    /// Visual feedback only; the board is untouched until drop.
    pub fn hover(&mut self, index: usize) {
        if let Some(state) = &mut self.state {
            state.drag_over_index = Some(index);
        }
    }

    pub fn drop(&mut self, target: usize, board: &mut CategoryBoard) -> DropEffect {
        let Some(state) = &self.state else {
            return DropEffect::NoActiveDrag;
        };
        let Some(source) = board.index_of(&state.dragged_item_id) else {
            debug!("dragged item {} is gone, ignoring drop", state.dragged_item_id);
            self.state = None;
            return DropEffect::Unchanged;
        };
        if source == target {
            self.state = None;
            return DropEffect::Unchanged;
        }

        // A failed write still leaves the board reordered in memory.
        let moved = match board.reorder(source, target) {
            Ok(moved) => moved,
            Err(err) => {
                error!("failed to persist reorder in {}: {err}", board.category_id());
                true
            }
        };
        self.state = None;
        if moved {
            DropEffect::Moved {
                from: source,
                to: target.min(board.items().len().saturating_sub(1)),
            }
        } else {
            DropEffect::Unchanged
        }
    }

    pub fn end(&mut self) {
        self.state = None;
    }

    pub fn finish(&mut self, outcome: DragOutcome, board: &mut CategoryBoard) -> DropEffect {
        let effect = match outcome {
            DragOutcome::Dropped(target) => self.drop(target, board),
            DragOutcome::Cancelled if self.state.is_some() => DropEffect::Unchanged,
            DragOutcome::Cancelled => DropEffect::NoActiveDrag,
        };
        self.end();
        effect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GridItem;
    use crate::store::{DefaultsProvider, ItemStore, MemoryStore};

    struct Letters;

    impl DefaultsProvider for Letters {
        fn defaults(&self, _category_id: &str) -> Vec<GridItem> {
            ["A", "B", "C", "D"]
                .iter()
                .map(|name| GridItem::bookmark(*name, "https://example.org").with_id(*name))
                .collect()
        }
    }

    fn letters(memory: &MemoryStore) -> CategoryBoard {
        CategoryBoard::open(
            ItemStore::new(Box::new(memory.clone()), Box::new(Letters)),
            "letters",
        )
    }

    fn ids(board: &CategoryBoard) -> Vec<String> {
        board.items().iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn drop_moves_dragged_item_and_writes_once() {
        let memory = MemoryStore::new();
        let mut board = letters(&memory);
        let mut drag = DragReorder::new();

        drag.begin("A").expect("begin");
        drag.hover(1);
        drag.hover(2);
        assert_eq!(drag.state().and_then(|s| s.drag_over_index), Some(2));
        assert_eq!(memory.write_count(), 0);

        let effect = drag.finish(DragOutcome::Dropped(2), &mut board);
        assert_eq!(effect, DropEffect::Moved { from: 0, to: 2 });
        assert_eq!(ids(&board), vec!["B", "C", "A", "D"]);
        assert_eq!(memory.write_count(), 1);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn dropping_last_item_past_the_end_writes_nothing() {
        let memory = MemoryStore::new();
        let mut board = letters(&memory);
        let mut drag = DragReorder::new();
        drag.begin("D").expect("begin");
        assert_eq!(
            drag.finish(DragOutcome::Dropped(4), &mut board),
            DropEffect::Unchanged
        );
        assert_eq!(ids(&board), vec!["A", "B", "C", "D"]);
        assert_eq!(memory.write_count(), 0);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn second_begin_for_other_item_is_rejected() {
        let mut drag = DragReorder::new();
        drag.begin("A").expect("begin");
        drag.begin("A").expect("same item again is fine");
        let err = drag.begin("B").expect_err("concurrent drag");
        assert_eq!(
            err,
            ReorderError::AlreadyDragging {
                active: "A".to_string(),
                requested: "B".to_string(),
            }
        );
        assert_eq!(drag.dragged_id(), Some("A"));
    }

    #[test]
    fn cancel_clears_state_without_writing() {
        let memory = MemoryStore::new();
        let mut board = letters(&memory);
        let mut drag = DragReorder::new();
        drag.begin("C").expect("begin");
        drag.hover(0);
        assert_eq!(
            drag.finish(DragOutcome::Cancelled, &mut board),
            DropEffect::Unchanged
        );
        assert!(drag.state().is_none());
        assert_eq!(ids(&board), vec!["A", "B", "C", "D"]);
        assert_eq!(memory.write_count(), 0);
    }

    #[test]
    fn messages_without_a_drag_are_ignored() {
        let memory = MemoryStore::new();
        let mut board = letters(&memory);
        let mut drag = DragReorder::new();
        drag.hover(3);
        assert!(drag.state().is_none());
        assert_eq!(drag.drop(1, &mut board), DropEffect::NoActiveDrag);
        assert_eq!(memory.write_count(), 0);
    }

    #[test]
    fn dropping_on_own_slot_is_a_no_op() {
        let memory = MemoryStore::new();
        let mut board = letters(&memory);
        let mut drag = DragReorder::new();
        drag.begin("B").expect("begin");
        assert_eq!(drag.drop(1, &mut board), DropEffect::Unchanged);
        drag.end();
        assert_eq!(memory.write_count(), 0);
    }

    #[test]
    fn unknown_dragged_item_is_a_no_op() {
        let memory = MemoryStore::new();
        let mut board = letters(&memory);
        let mut drag = DragReorder::new();
        drag.begin("ghost").expect("begin");
        assert_eq!(drag.drop(0, &mut board), DropEffect::Unchanged);
        assert_eq!(memory.write_count(), 0);
    }

    #[test]
    fn end_is_safe_to_call_after_drop() {
        let memory = MemoryStore::new();
        let mut board = letters(&memory);
        let mut drag = DragReorder::new();
        drag.begin("D").expect("begin");
        drag.drop(0, &mut board);
        drag.end();
        drag.end();
        assert_eq!(ids(&board), vec!["D", "A", "B", "C"]);
        drag.begin("A").expect("a fresh drag can start");
    }
}
