use start_deck::layout::SizeToken;
use start_deck::reorder::DragOutcome;

/// What the user did to tiles this frame, applied once drawing is finished.
#[derive(Debug, Clone, PartialEq)]
pub enum TileAction {
    Open(String),
    ShowAddForm,
    Resize(String, SizeToken),
    Remove(String),
    DragStart(String),
    DragHover(usize),
    DragFinish(DragOutcome),
}

#[derive(Debug, Default)]
pub struct AddDraft {
    pub open: bool,
    pub title: String,
    pub target: String,
    pub size: Option<SizeToken>,
}

impl AddDraft {
    pub fn clear(&mut self) {
        self.title.clear();
        self.target.clear();
        self.size = None;
    }
}
