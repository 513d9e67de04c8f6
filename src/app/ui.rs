use super::state::TileAction;
use super::style::{
    ease_out_cubic, monogram, tile_color, DeckTheme, DROP_SHADOW, ENTRY_SLIDE, GRID_PADDING,
    LABEL_GAP,
};
use super::DeckApp;
use crate::APP_DISPLAY_NAME;
use eframe::egui;
use log::{info, warn};
use start_deck::grid::GridFrame;
use start_deck::layout::SizeToken;
use start_deck::model::{GridItem, IconSettings, OpenMethod};
use start_deck::reorder::{DragOutcome, DropEffect};
use start_deck::transition::{Direction, ScrollMetrics, WheelDisposition};
use std::time::{Duration, Instant};

impl eframe::App for DeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.handle_settings_changes();
        self.engine.poll(now);
        self.handle_category_requests();
        self.remember_window_size(ctx);

        self.draw_top_bar(ctx);
        if self.sidebar.visible {
            self.draw_sidebar(ctx);
        }
        if self.show_settings {
            self.draw_settings_panel(ctx);
        }
        if self.draft.open {
            self.draw_add_window(ctx);
        }
        self.draw_grid(ctx, now);
        self.draw_warning_overlay(ctx);

        if self.engine.transition_busy() {
            ctx.request_repaint_after(Duration::from_millis(16));
        }
    }
}

/// Snapshot of what the grid needs for one frame, so drawing does not borrow the engine.
struct GridView<'a> {
    items: &'a [GridItem],
    frame: &'a GridFrame,
    settings: &'a IconSettings,
    theme: &'a DeckTheme,
    dragged: Option<&'a str>,
    hover_slot: Option<usize>,
    entry: Option<(Direction, f32)>,
}

impl DeckApp {
    fn draw_top_bar(&mut self, ctx: &egui::Context) {
        let label = self
            .engine
            .categories()
            .iter()
            .find(|c| c.id == self.engine.category_id())
            .map(|c| c.label.clone())
            .unwrap_or_else(|| self.engine.category_id().to_string());

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong(APP_DISPLAY_NAME);
                ui.separator();
                ui.label(label);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.selectable_label(self.show_settings, "Settings").clicked() {
                        self.show_settings = !self.show_settings;
                    }
                    if ui.button("Add").clicked() {
                        self.draft.open = true;
                    }
                });
            });
        });
    }

    fn draw_sidebar(&mut self, ctx: &egui::Context) {
        let categories = self.engine.categories().to_vec();
        let active = self.engine.category_id().to_string();
        let mut picked = None;

        egui::SidePanel::left("categories")
            .resizable(false)
            .exact_width(self.sidebar.width.max(48.0))
            .show(ctx, |ui| {
                ui.add_space(8.0);
                for category in &categories {
                    let selected = category.id == active;
                    if ui
                        .selectable_label(selected, category.label.as_str())
                        .clicked()
                    {
                        picked = Some(category.id.clone());
                    }
                }
            });

        if let Some(id) = picked {
            self.open_category(&id);
        }
    }

    fn draw_settings_panel(&mut self, ctx: &egui::Context) {
        let mut icon = self.bridge.icon_settings();
        let mut method = self.bridge.open_method();
        let mut sidebar = self.bridge.sidebar();
        let mut scroll_switch = self.bridge.config().scroll_switch_enabled;
        let mut close = false;

        egui::SidePanel::right("settings")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Icons");
                ui.add(egui::Slider::new(&mut icon.icon_size, 32.0..=128.0).text("Size"));
                ui.add(egui::Slider::new(&mut icon.icon_spacing, 0.0..=64.0).text("Spacing"));
                ui.add(
                    egui::Slider::new(&mut icon.icon_border_radius, 0.0..=64.0)
                        .text("Corner radius"),
                );
                ui.checkbox(&mut icon.show_name, "Show names");
                ui.add_enabled(
                    icon.show_name,
                    egui::Slider::new(&mut icon.name_size, 9.0..=20.0).text("Name size"),
                );
                ui.add(
                    egui::Slider::new(&mut icon.max_content_width, 640.0..=2400.0)
                        .text("Max content width"),
                );

                ui.separator();
                ui.heading("Behaviour");
                ui.radio_value(&mut method, OpenMethod::NewTab, "Open links in a new tab");
                ui.radio_value(&mut method, OpenMethod::CurrentTab, "Open links in this tab");
                ui.checkbox(&mut scroll_switch, "Scroll past the edge to switch category");

                ui.separator();
                ui.heading("Sidebar");
                ui.checkbox(&mut sidebar.visible, "Show categories");
                ui.add(egui::Slider::new(&mut sidebar.width, 48.0..=200.0).text("Width"));

                ui.add_space(8.0);
                if ui.button("Close").clicked() {
                    close = true;
                }
            });

        self.bridge.set_icon_settings(icon);
        self.bridge.set_open_method(method);
        self.bridge.set_sidebar(sidebar);
        if scroll_switch != self.bridge.config().scroll_switch_enabled {
            self.bridge
                .update_config(|config| config.scroll_switch_enabled = scroll_switch);
            self.engine
                .configure_transitions(self.bridge.config().transition_config());
        }
        if close {
            self.show_settings = false;
        }
    }

    fn draw_add_window(&mut self, ctx: &egui::Context) {
        let mut open = true;
        let mut submit = false;
        let draft = &mut self.draft;

        egui::Window::new("Add bookmark")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label("Title");
                ui.text_edit_singleline(&mut draft.title);
                ui.label("Address");
                ui.text_edit_singleline(&mut draft.target);
                let current = draft.size.unwrap_or(SizeToken::S1x1);
                egui::ComboBox::from_label("Size")
                    .selected_text(current.as_str())
                    .show_ui(ui, |ui| {
                        for token in SizeToken::ALL {
                            ui.selectable_value(&mut draft.size, Some(token), token.as_str());
                        }
                    });
                ui.add_space(6.0);
                if ui.button("Add").clicked() {
                    submit = true;
                }
            });

        if submit {
            self.submit_draft();
        } else if !open {
            self.draft.open = false;
            self.draft.clear();
        }
    }

    fn submit_draft(&mut self) {
        let title = self.draft.title.trim().to_string();
        let target = self.draft.target.trim().to_string();
        if title.is_empty() || target.is_empty() {
            self.show_warning("Title and address are required");
            return;
        }
        let size = self.draft.size.unwrap_or(SizeToken::S1x1);
        let item = GridItem::bookmark(title, target).with_size(size.as_str());
        match self.engine.add_item(item) {
            Ok(()) => {
                self.draft.clear();
                self.draft.open = false;
            }
            Err(err) => {
                warn!("add failed: {err}");
                self.show_warning("Could not save bookmark");
            }
        }
    }

    fn draw_grid(&mut self, ctx: &egui::Context, now: Instant) {
        let theme = DeckTheme::default();
        self.engine.set_viewport_width(ctx.screen_rect().width());

        let items = self.engine.items().to_vec();
        let frame = self.engine.frame().clone();
        let settings = self.engine.icon_settings().clone();
        let dragged = self.engine.drag_state().dragged_id().map(str::to_string);
        let hover_slot = self
            .engine
            .drag_state()
            .state()
            .and_then(|s| s.drag_over_index);
        let view = GridView {
            items: &items,
            frame: &frame,
            settings: &settings,
            theme: &theme,
            dragged: dragged.as_deref(),
            hover_slot,
            entry: self.engine.entry_progress(now),
        };
        let mut actions = Vec::new();

        egui::CentralPanel::default().show(ctx, |ui| {
            // Wheel intent is judged against last frame's scroll position, before the scroll
            // area consumes the delta.
            let wheel = ctx.input(|i| i.raw_scroll_delta.y);
            if wheel != 0.0 && ui.rect_contains_pointer(ui.max_rect()) {
                // egui reports wheel-up as positive.
                let disposition = self.engine.on_wheel(now, self.last_scroll, -wheel);
                if disposition == WheelDisposition::Suppress {
                    ctx.input_mut(|i| {
                        i.raw_scroll_delta = egui::Vec2::ZERO;
                        i.smooth_scroll_delta = egui::Vec2::ZERO;
                    });
                }
            }

            let mut area = egui::ScrollArea::vertical().auto_shrink([false, false]);
            if self.reset_scroll {
                area = area.vertical_scroll_offset(0.0);
                self.reset_scroll = false;
            }
            let output = area.show(ui, |ui| draw_tiles(ui, &view, &mut actions));

            let metrics = ScrollMetrics {
                offset: output.state.offset.y,
                content_extent: output.content_size.y,
                viewport_extent: output.inner_rect.height(),
            };
            if let Some(previous) = self.last_scroll {
                if (previous.offset - metrics.offset).abs() > f32::EPSILON {
                    self.engine.on_scroll(now, Some(metrics));
                }
            }
            self.last_scroll = Some(metrics);
        });

        if view.dragged.is_some() {
            draw_drag_ghost(ctx, &view);
            ctx.request_repaint();
        }
        self.apply_tile_actions(actions);
    }

    fn apply_tile_actions(&mut self, actions: Vec<TileAction>) {
        for action in actions {
            match action {
                TileAction::Open(id) => {
                    if let Some(activation) = self.engine.activation(&id) {
                        if !crate::system::shell_open(&activation.target, activation.method) {
                            self.show_warning("Could not open link");
                        }
                    }
                }
                TileAction::ShowAddForm => self.draft.open = true,
                TileAction::Resize(id, size) => {
                    if let Err(err) = self.engine.resize_item(&id, size) {
                        warn!("resize of {id} failed: {err}");
                        self.show_warning("Resize failed");
                    }
                }
                TileAction::Remove(id) => {
                    if let Err(err) = self.engine.remove_item(&id) {
                        warn!("remove of {id} failed: {err}");
                        self.show_warning("Remove failed");
                    }
                }
                TileAction::DragStart(id) => {
                    if let Err(err) = self.engine.begin_drag(&id) {
                        warn!("{err}");
                    }
                }
                TileAction::DragHover(slot) => self.engine.hover_drag(slot),
                TileAction::DragFinish(outcome) => {
                    if let DropEffect::Moved { from, to } = self.engine.finish_drag(outcome) {
                        info!("moved tile {from} -> {to}");
                    }
                }
            }
        }
    }

    fn draw_warning_overlay(&mut self, ctx: &egui::Context) {
        let theme = DeckTheme::default();
        if let Some((msg, start_time)) = &self.warning_message {
            if start_time.elapsed() < Duration::from_secs(2) {
                let painter = ctx.layer_painter(egui::LayerId::new(
                    egui::Order::Foreground,
                    egui::Id::new("warning"),
                ));
                let rect = ctx.screen_rect();
                let galley = painter.layout(
                    msg.clone(),
                    egui::FontId::proportional(15.0),
                    theme.toast_text,
                    f32::INFINITY,
                );
                let text_rect = galley.rect;
                let anchor = egui::pos2(rect.center().x, rect.max.y - 48.0);
                let placed = text_rect.translate(anchor - text_rect.center());
                painter.rect_filled(placed.expand(10.0), 10.0, theme.toast_bg);
                painter.rect_stroke(
                    placed.expand(10.0),
                    10.0,
                    egui::Stroke::new(1.0, theme.tile_border),
                );
                painter.galley(placed.min, galley, theme.toast_text);
                ctx.request_repaint();
            } else {
                self.warning_message = None;
            }
        }
    }
}

struct CellMetrics {
    width: f32,
    height: f32,
    label: f32,
    gap: f32,
}

fn cell_metrics(settings: &IconSettings) -> CellMetrics {
    let label = if settings.show_name {
        settings.name_size + LABEL_GAP
    } else {
        0.0
    };
    CellMetrics {
        width: settings.icon_size + settings.icon_spacing,
        height: settings.icon_size + label + settings.icon_spacing,
        label,
        gap: settings.icon_spacing,
    }
}

fn draw_tiles(ui: &mut egui::Ui, view: &GridView<'_>, actions: &mut Vec<TileAction>) {
    let settings = view.settings;
    let theme = view.theme;
    let cell = cell_metrics(settings);
    let grid_width = view.frame.layout.columns as f32 * cell.width;
    let height = view.frame.rows as f32 * cell.height + GRID_PADDING * 2.0;
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), height),
        egui::Sense::hover(),
    );

    let (slide, alpha) = match view.entry {
        Some((direction, t)) => {
            let remaining = 1.0 - ease_out_cubic(t);
            let sign = match direction {
                Direction::FromBottom => 1.0,
                Direction::FromTop => -1.0,
            };
            (sign * ENTRY_SLIDE * remaining, 1.0 - remaining)
        }
        None => (0.0, 1.0),
    };
    let origin = egui::pos2(
        rect.min.x + ((rect.width() - grid_width) * 0.5).max(0.0) + cell.gap * 0.5,
        rect.min.y + GRID_PADDING + slide,
    );

    let pointer = ui.ctx().pointer_hover_pos();
    let radius = settings.icon_border_radius;
    let mut drop_slot = None;
    let mut drag_stopped = false;

    for (index, (item, placement)) in view.items.iter().zip(&view.frame.placements).enumerate() {
        let min = origin
            + egui::vec2(
                placement.col as f32 * cell.width,
                placement.row as f32 * cell.height,
            );
        let size = egui::vec2(
            placement.span.cols as f32 * cell.width - cell.gap,
            placement.span.rows as f32 * cell.height - cell.gap,
        );
        let tile_rect = egui::Rect::from_min_size(min, size);
        let body = egui::Rect::from_min_max(
            tile_rect.min,
            egui::pos2(tile_rect.max.x, tile_rect.max.y - cell.label),
        );
        let response = ui.interact(
            tile_rect,
            ui.id().with(("tile", item.id.as_str())),
            egui::Sense::click_and_drag(),
        );
        let is_dragged = view.dragged == Some(item.id.as_str());
        if view.dragged.is_some() && pointer.is_some_and(|p| tile_rect.contains(p)) {
            drop_slot = Some(index);
        }

        let painter = ui.painter();
        let fill = if item.is_add_icon() {
            theme.add_tile
        } else {
            tile_color(item.color_hint.as_deref(), &item.id)
        };
        painter.rect_filled(body, radius, fill.gamma_multiply(alpha));
        if response.hovered() && view.dragged.is_none() {
            painter.rect_filled(body, radius, theme.tile_hover);
        }
        if is_dragged {
            painter.rect_filled(body, radius, theme.dragged_tint);
        }
        if drop_slot == Some(index) && !is_dragged {
            painter.rect_stroke(
                body.expand(2.0),
                radius,
                egui::Stroke::new(2.0, theme.drop_hint),
            );
        }

        let glyph = if item.is_add_icon() {
            "+".to_string()
        } else {
            monogram(&item.title)
        };
        let glyph_size = (body.width().min(body.height()) * 0.4).max(10.0);
        painter.text(
            body.center(),
            egui::Align2::CENTER_CENTER,
            glyph,
            egui::FontId::proportional(glyph_size),
            theme.title_color.gamma_multiply(alpha),
        );
        if settings.show_name {
            painter.text(
                egui::pos2(body.center().x, body.max.y + cell.label * 0.5),
                egui::Align2::CENTER_CENTER,
                &item.title,
                egui::FontId::proportional(settings.name_size),
                theme.label_color.gamma_multiply(alpha),
            );
        }

        if response.drag_started() {
            actions.push(TileAction::DragStart(item.id.clone()));
        }
        if response.drag_stopped() {
            drag_stopped = true;
        }
        if response.clicked() {
            if item.is_add_icon() {
                actions.push(TileAction::ShowAddForm);
            } else {
                actions.push(TileAction::Open(item.id.clone()));
            }
        }

        let response = response.on_hover_text(item.target.as_deref().unwrap_or(&item.title));
        response.context_menu(|ui| {
            ui.label("Size");
            let current = SizeToken::parse(&item.size_token);
            for token in SizeToken::ALL {
                if ui
                    .selectable_label(current == token, token.as_str())
                    .clicked()
                {
                    actions.push(TileAction::Resize(item.id.clone(), token));
                    ui.close_menu();
                }
            }
            if !item.is_add_icon() {
                ui.separator();
                if ui.button("Remove").clicked() {
                    actions.push(TileAction::Remove(item.id.clone()));
                    ui.close_menu();
                }
            }
        });
    }

    if let Some(slot) = drop_slot {
        if view.hover_slot != Some(slot) {
            actions.push(TileAction::DragHover(slot));
        }
    }
    if drag_stopped {
        let outcome = match drop_slot {
            Some(slot) => DragOutcome::Dropped(slot),
            None => DragOutcome::Cancelled,
        };
        actions.push(TileAction::DragFinish(outcome));
    }
}

fn draw_drag_ghost(ctx: &egui::Context, view: &GridView<'_>) {
    let (Some(id), Some(pos)) = (view.dragged, ctx.pointer_hover_pos()) else {
        return;
    };
    let Some(item) = view.items.iter().find(|item| item.id == id) else {
        return;
    };
    let settings = view.settings;
    let theme = view.theme;
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("drag_tile"),
    ));
    let r = egui::Rect::from_center_size(pos, egui::vec2(settings.icon_size, settings.icon_size));
    let radius = settings.icon_border_radius;
    painter.rect_filled(
        r.expand(DROP_SHADOW),
        radius + DROP_SHADOW,
        egui::Color32::from_rgba_premultiplied(0, 0, 0, 32),
    );
    painter.rect_filled(r, radius, tile_color(item.color_hint.as_deref(), &item.id));
    painter.rect_stroke(r, radius, egui::Stroke::new(1.0, theme.drop_hint));
    painter.text(
        r.center(),
        egui::Align2::CENTER_CENTER,
        monogram(&item.title),
        egui::FontId::proportional(settings.icon_size * 0.4),
        theme.title_color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_space_only_when_names_shown() {
        let mut settings = IconSettings::default();
        let with_names = cell_metrics(&settings);
        assert_eq!(with_names.width, 87.0);
        assert_eq!(with_names.label, settings.name_size + LABEL_GAP);

        settings.show_name = false;
        let without = cell_metrics(&settings);
        assert_eq!(without.label, 0.0);
        assert_eq!(without.height, 87.0);
    }
}
