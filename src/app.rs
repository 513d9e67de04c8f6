mod state;
mod style;
mod ui;

use crossbeam_channel::{unbounded, Receiver, Sender};
use eframe::egui;
use log::{debug, info, warn};
use start_deck::config::AppConfig;
use start_deck::grid::GridEngine;
use start_deck::model::SidebarSettings;
use start_deck::seed::{default_categories, SeedCatalog};
use start_deck::settings::SettingsBridge;
use start_deck::store::{FileStore, ItemStore, KeyValueStore, MemoryStore};
use start_deck::transition::ScrollMetrics;
use state::AddDraft;
use std::time::Instant;

pub const WINDOW_WIDTH: f32 = 1100.0;
pub const WINDOW_HEIGHT: f32 = 720.0;
pub const MIN_WINDOW_WIDTH: f32 = 360.0;
pub const MIN_WINDOW_HEIGHT: f32 = 320.0;

pub struct DeckApp {
    engine: GridEngine,
    bridge: SettingsBridge,
    switch_rx: Receiver<String>,
    sidebar_rx: Receiver<SidebarSettings>,
    sidebar: SidebarSettings,
    last_scroll: Option<ScrollMetrics>,
    reset_scroll: bool,
    show_settings: bool,
    draft: AddDraft,
    warning_message: Option<(String, Instant)>,
}

impl DeckApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = AppConfig::load();
        let mut bridge = match AppConfig::config_path() {
            Some(path) => SettingsBridge::persistent(config, path),
            None => {
                warn!("no config directory, settings will not be saved");
                SettingsBridge::detached(config)
            }
        };

        let backend: Box<dyn KeyValueStore> = match FileStore::in_data_dir() {
            Ok(store) => {
                info!("storing tiles in {}", store.root().display());
                Box::new(store)
            }
            Err(err) => {
                warn!("{err}; tiles are kept in memory only");
                Box::new(MemoryStore::new())
            }
        };

        let categories = default_categories();
        let active = bridge
            .config()
            .active_category
            .clone()
            .filter(|id| categories.iter().any(|c| &c.id == id))
            .or_else(|| categories.first().map(|c| c.id.clone()))
            .unwrap_or_else(|| "home".to_string());

        let transition = bridge.config().transition_config();
        let mut engine = GridEngine::new(
            &mut bridge,
            ItemStore::new(backend, Box::new(SeedCatalog)),
            &active,
            transition,
        );

        let (switch_tx, switch_rx) = unbounded::<String>();
        let ctx = cc.egui_ctx.clone();
        engine.bind_categories(categories, move |id| {
            if forward_switch(&switch_tx, id) {
                ctx.request_repaint();
            }
        });

        let sidebar_rx = bridge.subscribe_sidebar();
        let sidebar = bridge.sidebar();

        Self {
            engine,
            bridge,
            switch_rx,
            sidebar_rx,
            sidebar,
            last_scroll: None,
            reset_scroll: false,
            show_settings: false,
            draft: AddDraft::default(),
            warning_message: None,
        }
    }

    fn open_category(&mut self, category_id: &str) {
        if self.engine.category_id() == category_id {
            return;
        }
        self.engine.switch_category(category_id);
        self.last_scroll = None;
        self.reset_scroll = true;
        let id = category_id.to_string();
        self.bridge
            .update_config(move |config| config.active_category = Some(id));
    }

    fn handle_category_requests(&mut self) {
        while let Ok(id) = self.switch_rx.try_recv() {
            self.open_category(&id);
        }
    }

    fn handle_settings_changes(&mut self) {
        while let Ok(sidebar) = self.sidebar_rx.try_recv() {
            self.sidebar = sidebar;
        }
        self.engine.sync_settings();
    }

    fn remember_window_size(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.pointer.any_down()) {
            return;
        }
        let Some(rect) = ctx.input(|i| i.viewport().inner_rect) else {
            return;
        };
        let size = (rect.width().round(), rect.height().round());
        if self.bridge.config().last_size != Some(size) {
            self.bridge
                .update_config(move |config| config.last_size = Some(size));
        }
    }

    fn show_warning<S: Into<String>>(&mut self, message: S) {
        self.warning_message = Some((message.into(), Instant::now()));
    }
}

/// Queues a boundary switch for the next frame; false once the app side has gone away.
fn forward_switch(tx: &Sender<String>, category_id: &str) -> bool {
    match tx.send(category_id.to_string()) {
        Ok(()) => true,
        Err(_) => {
            debug!("category switch to {category_id} dropped, receiver is gone");
            false
        }
    }
}

impl Drop for DeckApp {
    fn drop(&mut self) {
        self.engine.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_switch_reports_closed_receiver() {
        let (tx, rx) = unbounded::<String>();
        assert!(forward_switch(&tx, "dev"));
        assert_eq!(rx.try_recv().as_deref(), Ok("dev"));
        drop(rx);
        assert!(!forward_switch(&tx, "media"));
    }
}
