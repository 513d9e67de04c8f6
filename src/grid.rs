use crate::board::CategoryBoard;
use crate::error::{BoardError, ReorderError};
use crate::layout::{self, GridLayout, Placement, SizeToken, Span};
use crate::model::{Category, GridItem, IconSettings, OpenMethod};
use crate::reorder::{DragOutcome, DragReorder, DropEffect};
use crate::settings::SettingsBridge;
use crate::store::ItemStore;
use crate::transition::{
    BoundaryController, Direction, ScrollMetrics, Transition, TransitionConfig, WheelDisposition,
};
use crossbeam_channel::Receiver;
use log::{debug, error};
use std::time::Instant;

/// Where a tile goes when activated and how the host should open it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub target: String,
    pub method: OpenMethod,
}

/// One frame's worth of layout: the column count plus a cell origin and span per item, in
/// item order.
#[derive(Debug, Clone, PartialEq)]
pub struct GridFrame {
    pub layout: GridLayout,
    pub placements: Vec<Placement>,
    pub rows: u32,
}

/// Everything the host drives: the active category's tiles, the drag and boundary state
/// machines, and a cached copy of the settings it renders with.
pub struct GridEngine {
    board: CategoryBoard,
    drag: DragReorder,
    boundary: BoundaryController,
    icon_settings: IconSettings,
    open_method: OpenMethod,
    icon_rx: Receiver<IconSettings>,
    open_rx: Receiver<OpenMethod>,
    viewport_width: f32,
    frame: GridFrame,
}

impl GridEngine {
    pub fn new(
        settings: &mut SettingsBridge,
        store: ItemStore,
        category_id: &str,
        transition: TransitionConfig,
    ) -> Self {
        let icon_settings = settings.icon_settings();
        let board = CategoryBoard::open(store, category_id);
        let frame = compute_frame(board.items(), 0.0, &icon_settings);
        Self {
            board,
            drag: DragReorder::new(),
            boundary: BoundaryController::new(transition),
            open_method: settings.open_method(),
            icon_rx: settings.subscribe_icon_settings(),
            open_rx: settings.subscribe_open_method(),
            icon_settings,
            viewport_width: 0.0,
            frame,
        }
    }

    pub fn icon_settings(&self) -> &IconSettings {
        &self.icon_settings
    }

    pub fn open_method(&self) -> OpenMethod {
        self.open_method
    }

    /// Drains settings notifications; returns true if the layout was recomputed.
    pub fn sync_settings(&mut self) -> bool {
        while let Ok(method) = self.open_rx.try_recv() {
            self.open_method = method;
        }
        let mut latest = None;
        while let Ok(settings) = self.icon_rx.try_recv() {
            latest = Some(settings);
        }
        match latest {
            Some(settings) => {
                debug!("icon settings changed, recomputing layout");
                self.icon_settings = settings;
                self.relayout();
                true
            }
            None => false,
        }
    }

    pub fn set_viewport_width(&mut self, width: f32) {
        if self.viewport_width != width {
            self.viewport_width = width;
            self.relayout();
        }
    }

    pub fn frame(&self) -> &GridFrame {
        &self.frame
    }

    pub fn layout(&self) -> GridLayout {
        self.frame.layout
    }

    fn relayout(&mut self) {
        self.frame = compute_frame(
            self.board.items(),
            self.viewport_width,
            &self.icon_settings,
        );
    }

    pub fn category_id(&self) -> &str {
        self.board.category_id()
    }

    pub fn items(&self) -> &[GridItem] {
        self.board.items()
    }

    /// Opens another category. Any drag in progress belongs to the old grid and is dropped.
    pub fn switch_category(&mut self, category_id: &str) {
        self.drag.end();
        self.board.switch_to(category_id);
        self.relayout();
    }

    pub fn activation(&self, item_id: &str) -> Option<Activation> {
        let item = self.board.get(item_id)?;
        item.target.as_ref().map(|target| Activation {
            target: target.clone(),
            method: self.open_method,
        })
    }

    pub fn add_item(&mut self, item: GridItem) -> Result<(), BoardError> {
        let result = self.board.add(item);
        self.after_mutation(result)
    }

    pub fn remove_item(&mut self, item_id: &str) -> Result<GridItem, BoardError> {
        if self.drag.dragged_id() == Some(item_id) {
            self.drag.end();
        }
        let result = self.board.remove(item_id);
        self.after_mutation(result)
    }

    pub fn resize_item(&mut self, item_id: &str, size: SizeToken) -> Result<(), BoardError> {
        let result = self.board.resize(item_id, size);
        self.after_mutation(result)
    }

    fn after_mutation<T>(&mut self, result: Result<T, BoardError>) -> Result<T, BoardError> {
        self.relayout();
        if let Err(BoardError::Store(err)) = &result {
            error!("failed to persist {}: {err}", self.board.category_id());
        }
        result
    }

    pub fn drag_state(&self) -> &DragReorder {
        &self.drag
    }

    pub fn begin_drag(&mut self, item_id: &str) -> Result<(), ReorderError> {
        self.drag.begin(item_id)
    }

    pub fn hover_drag(&mut self, index: usize) {
        self.drag.hover(index);
    }

    pub fn finish_drag(&mut self, outcome: DragOutcome) -> DropEffect {
        let effect = self.drag.finish(outcome, &mut self.board);
        if matches!(effect, DropEffect::Moved { .. }) {
            self.relayout();
        }
        effect
    }

    pub fn bind_categories(
        &mut self,
        categories: Vec<Category>,
        on_change: impl FnMut(&str) + 'static,
    ) {
        self.boundary.bind(categories, on_change);
    }

    pub fn categories(&self) -> &[Category] {
        self.boundary.categories()
    }

    pub fn configure_transitions(&mut self, config: TransitionConfig) {
        self.boundary.configure(config);
    }

    pub fn on_scroll(&mut self, now: Instant, metrics: Option<ScrollMetrics>) -> bool {
        self.boundary.on_scroll(now, metrics)
    }

    pub fn on_wheel(
        &mut self,
        now: Instant,
        metrics: Option<ScrollMetrics>,
        delta_y: f32,
    ) -> WheelDisposition {
        self.boundary.on_wheel(now, metrics, delta_y)
    }

    /// Fires due deadlines against the category that is active right now.
    pub fn poll(&mut self, now: Instant) -> Option<Transition> {
        let active = self.board.category_id().to_string();
        self.boundary.poll(now, &active)
    }

    pub fn transition_busy(&self) -> bool {
        self.boundary.is_busy()
    }

    pub fn entry_progress(&self, now: Instant) -> Option<(Direction, f32)> {
        self.boundary.entry_progress(now)
    }

    /// Host is going away; nothing deferred may fire afterwards.
    pub fn shutdown(&mut self) {
        self.drag.end();
        self.boundary.unbind();
    }
}

fn compute_frame(items: &[GridItem], width: f32, settings: &IconSettings) -> GridFrame {
    let layout = layout::classify(width, settings);
    let spans: Vec<Span> = items
        .iter()
        .map(|item| layout::resolve_span(&item.size_token, layout.columns))
        .collect();
    let placements = layout::place(&spans, layout.columns);
    let rows = layout::row_count(&placements);
    GridFrame {
        layout,
        placements,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::layout::ViewportClass;
    use crate::seed::{default_categories, SeedCatalog};
    use crate::error::StoreError;
    use crate::store::{KeyValueStore, MemoryStore};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn engine(bridge: &mut SettingsBridge, memory: &MemoryStore) -> GridEngine {
        GridEngine::new(
            bridge,
            ItemStore::new(Box::new(memory.clone()), Box::new(SeedCatalog)),
            "home",
            TransitionConfig::default(),
        )
    }

    #[test]
    fn icon_settings_change_recomputes_columns() {
        let mut bridge = SettingsBridge::detached(AppConfig::default());
        let memory = MemoryStore::new();
        let mut engine = engine(&mut bridge, &memory);
        engine.set_viewport_width(2000.0);
        assert_eq!(engine.layout().class, ViewportClass::Wide);
        assert_eq!(engine.layout().columns, 15);

        let mut bigger = bridge.icon_settings();
        bigger.icon_size = 120.0;
        bridge.set_icon_settings(bigger);
        assert!(engine.sync_settings());
        // 1388 / 147 = 9.4
        assert_eq!(engine.layout().columns, 9);
        assert!(!engine.sync_settings());
    }

    #[test]
    fn open_method_follows_settings() {
        let mut bridge = SettingsBridge::detached(AppConfig::default());
        let memory = MemoryStore::new();
        let mut engine = engine(&mut bridge, &memory);
        bridge.set_open_method(OpenMethod::CurrentTab);
        engine.sync_settings();
        let activation = engine.activation("mail").expect("mail has a target");
        assert_eq!(activation.method, OpenMethod::CurrentTab);
        assert!(engine.activation("clock").is_none());
    }

    #[test]
    fn frame_places_every_item_within_columns() {
        let mut bridge = SettingsBridge::detached(AppConfig::default());
        let memory = MemoryStore::new();
        let mut engine = engine(&mut bridge, &memory);
        engine.set_viewport_width(400.0);
        engine.resize_item("search", SizeToken::S4x4).expect("resize");
        let frame = engine.frame();
        assert_eq!(frame.placements.len(), engine.items().len());
        assert!(frame
            .placements
            .iter()
            .all(|p| p.col + p.span.cols <= frame.layout.columns));
    }

    #[test]
    fn boundary_switch_reaches_host_callback() {
        let mut bridge = SettingsBridge::detached(AppConfig::default());
        let memory = MemoryStore::new();
        let mut engine = engine(&mut bridge, &memory);
        let requested = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&requested);
        engine.bind_categories(default_categories(), move |id| {
            sink.borrow_mut().push(id.to_string())
        });

        let bottom = ScrollMetrics {
            offset: 100.0,
            content_extent: 500.0,
            viewport_extent: 400.0,
        };
        let t0 = Instant::now();
        engine.on_wheel(t0, Some(bottom), 30.0);
        let transition = engine
            .poll(t0 + Duration::from_millis(120))
            .expect("switch");
        assert_eq!(transition.target, "dev");
        engine.switch_category(&transition.target);
        assert_eq!(engine.category_id(), "dev");
        assert_eq!(requested.borrow().as_slice(), ["dev"]);
    }

    #[test]
    fn switching_category_abandons_drag() {
        let mut bridge = SettingsBridge::detached(AppConfig::default());
        let memory = MemoryStore::new();
        let mut engine = engine(&mut bridge, &memory);
        engine.begin_drag("mail").expect("begin");
        engine.switch_category("dev");
        assert!(!engine.drag_state().is_dragging());
        assert_eq!(
            engine.finish_drag(DragOutcome::Dropped(0)),
            DropEffect::NoActiveDrag
        );
        assert_eq!(memory.write_count(), 0);
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Write {
                path: key.into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    #[test]
    fn failed_remove_write_still_updates_grid() {
        let mut bridge = SettingsBridge::detached(AppConfig::default());
        let mut engine = GridEngine::new(
            &mut bridge,
            ItemStore::new(Box::new(ReadOnlyStore), Box::new(SeedCatalog)),
            "home",
            TransitionConfig::default(),
        );
        let before = engine.items().len();

        let result = engine.remove_item("mail");
        assert!(matches!(result, Err(BoardError::Store(_))));
        assert_eq!(engine.items().len(), before - 1);
        assert!(engine.items().iter().all(|item| item.id != "mail"));
        assert_eq!(engine.frame().placements.len(), before - 1);
    }
}
