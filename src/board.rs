use crate::error::BoardError;
use crate::layout::SizeToken;
use crate::model::{renumber, GridItem};
use crate::store::ItemStore;
use log::info;

/// Moves the item at `source` so it ends up at `target`, counted against the list with the
/// source already removed, then renumbers every item. Returns false when nothing moved,
/// including a target past the end when `source` is already last.
pub fn move_item(items: &mut Vec<GridItem>, source: usize, target: usize) -> bool {
    if source >= items.len() {
        return false;
    }
    let insert_at = target.min(items.len() - 1);
    if insert_at == source {
        return false;
    }
    let item = items.remove(source);
    items.insert(insert_at, item);
    renumber(items);
    true
}

/// The active category's tiles. Every mutation writes the whole collection back once.
///
/// A failed write leaves the in-memory change in place and reports the error; the next
/// successful mutation persists everything again.
pub struct CategoryBoard {
    store: ItemStore,
    category_id: String,
    items: Vec<GridItem>,
}

impl CategoryBoard {
    pub fn open(store: ItemStore, category_id: &str) -> Self {
        let items = store.load(category_id);
        Self {
            store,
            category_id: category_id.to_string(),
            items,
        }
    }

    pub fn switch_to(&mut self, category_id: &str) {
        if self.category_id == category_id {
            return;
        }
        self.items = self.store.load(category_id);
        self.category_id = category_id.to_string();
        info!(
            "opened category {} with {} items",
            self.category_id,
            self.items.len()
        );
    }

    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    pub fn items(&self) -> &[GridItem] {
        &self.items
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&GridItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn add(&mut self, mut item: GridItem) -> Result<(), BoardError> {
        if self.index_of(&item.id).is_some() {
            return Err(BoardError::DuplicateId(item.id));
        }
        item.order = self.items.len() as u32;
        self.items.push(item);
        self.persist()
    }

    /// Removing the last tile brings back the add tile, so a category is never empty.
    pub fn remove(&mut self, id: &str) -> Result<GridItem, BoardError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| BoardError::UnknownItem(id.to_string()))?;
        let removed = self.items.remove(index);
        if self.items.is_empty() {
            self.items.push(GridItem::add_icon());
        }
        renumber(&mut self.items);
        self.persist()?;
        Ok(removed)
    }

    pub fn resize(&mut self, id: &str, size: SizeToken) -> Result<(), BoardError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| BoardError::UnknownItem(id.to_string()))?;
        if item.size_token == size.as_str() {
            return Ok(());
        }
        item.size_token = size.as_str().to_string();
        self.persist()
    }

    /// Returns whether the order changed; a no-op move writes nothing.
    pub fn reorder(&mut self, source: usize, target: usize) -> Result<bool, BoardError> {
        if !move_item(&mut self.items, source, target) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    fn persist(&mut self) -> Result<(), BoardError> {
        self.store.save(&self.category_id, &self.items)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ADD_ICON_ID;
    use crate::store::{items_key, DefaultsProvider, MemoryStore};

    struct Letters;

    impl DefaultsProvider for Letters {
        fn defaults(&self, category_id: &str) -> Vec<GridItem> {
            if category_id != "letters" {
                return Vec::new();
            }
            ["A", "B", "C", "D"]
                .iter()
                .map(|name| GridItem::bookmark(*name, "https://example.org").with_id(*name))
                .collect()
        }
    }

    fn board(memory: &MemoryStore, category: &str) -> CategoryBoard {
        CategoryBoard::open(
            ItemStore::new(Box::new(memory.clone()), Box::new(Letters)),
            category,
        )
    }

    fn ids(board: &CategoryBoard) -> Vec<&str> {
        board.items().iter().map(|i| i.id.as_str()).collect()
    }

    fn orders(board: &CategoryBoard) -> Vec<u32> {
        board.items().iter().map(|i| i.order).collect()
    }

    #[test]
    fn move_uses_post_removal_insertion_point() {
        let memory = MemoryStore::new();
        let mut board = board(&memory, "letters");
        assert!(board.reorder(0, 2).expect("reorder"));
        assert_eq!(ids(&board), vec!["B", "C", "A", "D"]);
        assert_eq!(orders(&board), vec![0, 1, 2, 3]);
    }

    #[test]
    fn moving_past_the_end_appends() {
        let memory = MemoryStore::new();
        let mut board = board(&memory, "letters");
        assert!(board.reorder(1, 99).expect("reorder"));
        assert_eq!(ids(&board), vec!["A", "C", "D", "B"]);
    }

    #[test]
    fn no_op_moves_do_not_write() {
        let memory = MemoryStore::new();
        let mut board = board(&memory, "letters");
        assert!(!board.reorder(2, 2).expect("reorder"));
        assert!(!board.reorder(9, 0).expect("reorder"));
        assert_eq!(memory.write_count(), 0);
    }

    #[test]
    fn last_item_dropped_past_the_end_stays_put() {
        let memory = MemoryStore::new();
        let mut board = board(&memory, "letters");
        assert!(!board.reorder(3, 4).expect("reorder"));
        assert!(!board.reorder(3, 99).expect("reorder"));
        assert_eq!(ids(&board), vec!["A", "B", "C", "D"]);
        assert_eq!(memory.write_count(), 0);
    }

    #[test]
    fn add_appends_with_next_order() {
        let memory = MemoryStore::new();
        let mut board = board(&memory, "letters");
        board
            .add(GridItem::bookmark("E", "https://e.example").with_id("E"))
            .expect("add");
        assert_eq!(board.items().last().map(|i| i.order), Some(4));
        assert!(matches!(
            board.add(GridItem::bookmark("A", "x").with_id("A")),
            Err(BoardError::DuplicateId(_))
        ));
        assert_eq!(memory.write_count(), 1);
    }

    #[test]
    fn removing_last_item_restores_add_tile() {
        let memory = MemoryStore::new();
        let mut board = board(&memory, "empty");
        board
            .add(GridItem::bookmark("Only", "https://only.example").with_id("only"))
            .expect("add");
        board.remove(ADD_ICON_ID).expect("remove add tile");
        assert_eq!(ids(&board), vec!["only"]);
        board.remove("only").expect("remove");
        assert_eq!(board.items().len(), 1);
        assert!(board.items()[0].is_add_icon());
        assert!(memory.raw(&items_key("empty")).is_some());
    }

    #[test]
    fn resize_overwrites_token_and_persists() {
        let memory = MemoryStore::new();
        let mut board = board(&memory, "letters");
        board.resize("C", SizeToken::S2x2).expect("resize");
        assert_eq!(board.get("C").map(|i| i.size_token.as_str()), Some("2x2"));
        board.resize("C", SizeToken::S2x2).expect("resize again");
        assert_eq!(memory.write_count(), 1);
        assert!(matches!(
            board.resize("missing", SizeToken::S1x1),
            Err(BoardError::UnknownItem(_))
        ));
    }

    #[test]
    fn switching_category_loads_its_items() {
        let memory = MemoryStore::new();
        let mut board = board(&memory, "letters");
        board.reorder(3, 0).expect("reorder");
        board.switch_to("other");
        assert!(board.items()[0].is_add_icon());
        board.switch_to("letters");
        assert_eq!(ids(&board), vec!["D", "A", "B", "C"]);
    }
}
