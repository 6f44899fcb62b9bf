// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline panel rendering.
//!
//! Layout:
//! - Controls (current time / duration) above the track list
//! - Time ruler above the keyframe area
//! - Playhead overlay across the ruler and keyframe area
//!
//! The ruler, keyframe area and playhead share the horizontal offset; the
//! keyframe area and track list share the vertical offset.

use super::number_input::{NumberInput, NumberInputState};
use crate::config::{self, LayoutConfig, TimelineConfig};
use crate::drag::{scrub_time, DragTracker, DragUpdate};
use crate::scroll_sync::{ScrollOffset, ScrollSyncGroup, SurfaceId, SurfaceRegistry};
use crate::time_store::TimeDomainStore;
use egui::scroll_area::ScrollBarVisibility;
use egui::{Color32, Pos2, Rect, Response, ScrollArea, Sense, Stroke, Ui, UiBuilder, Vec2};
use std::time::Instant;

const MINOR_TICK_MS: f64 = 100.0;
const MAJOR_TICK_MS: f64 = 1000.0;
const PLAYHEAD_WIDTH: f32 = 2.0;
const PLAYHEAD_COLOR: Color32 = Color32::from_rgb(255, 100, 100);

/// Scroll surfaces of one panel
#[derive(Debug, Clone, Copy)]
struct Surfaces {
    ruler: SurfaceId,
    keyframes: SurfaceId,
    playhead: SurfaceId,
    tracks: SurfaceId,
}

/// Timeline panel: controls, ruler, track list, keyframes and playhead
pub struct TimelinePanel {
    store: TimeDomainStore,
    current_input: NumberInputState,
    duration_input: NumberInputState,
    drag: DragTracker,
    registry: SurfaceRegistry,
    sync: ScrollSyncGroup,
    surfaces: Surfaces,
    tracks: Vec<String>,
    layout: LayoutConfig,
}

impl TimelinePanel {
    /// Create a panel from timeline settings
    pub fn from_config(config: &TimelineConfig) -> config::Result<Self> {
        let store = TimeDomainStore::from_config(config)?;

        let surfaces = Surfaces {
            ruler: SurfaceId::new(),
            keyframes: SurfaceId::new(),
            playhead: SurfaceId::new(),
            tracks: SurfaceId::new(),
        };
        let mut registry = SurfaceRegistry::new();
        for id in [surfaces.ruler, surfaces.keyframes, surfaces.playhead, surfaces.tracks] {
            registry.mount(id);
        }
        let sync = ScrollSyncGroup::new(
            vec![surfaces.ruler, surfaces.keyframes, surfaces.playhead],
            vec![surfaces.keyframes, surfaces.tracks],
        );

        Ok(Self {
            store,
            current_input: NumberInputState::new(),
            duration_input: NumberInputState::new(),
            drag: DragTracker::new(config.drag_fps),
            registry,
            sync,
            surfaces,
            tracks: config.tracks.clone(),
            layout: config.layout,
        })
    }

    /// Time state
    pub fn store(&self) -> &TimeDomainStore {
        &self.store
    }

    /// Mutable time state
    pub fn store_mut(&mut self) -> &mut TimeDomainStore {
        &mut self.store
    }

    /// Whether the ruler is being scrubbed
    pub fn is_scrubbing(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Render the panel into the remaining space of `ui`
    pub fn ui(&mut self, ui: &mut Ui) {
        let rect = ui.available_rect_before_wrap();
        let layout = self.layout;
        let split_x = (rect.min.x + layout.track_column_width).min(rect.max.x);
        let split_y = (rect.min.y + layout.header_height).min(rect.max.y);

        let controls_rect = Rect::from_min_max(rect.min, Pos2::new(split_x, split_y));
        let ruler_rect = Rect::from_min_max(Pos2::new(split_x, rect.min.y), Pos2::new(rect.max.x, split_y));
        let tracks_rect = Rect::from_min_max(Pos2::new(rect.min.x, split_y), Pos2::new(split_x, rect.max.y));
        let keyframes_rect = Rect::from_min_max(Pos2::new(split_x, split_y), rect.max);

        ui.painter().rect_filled(rect, 0.0, Color32::from_gray(30));

        self.render_controls(&mut child_ui(ui, controls_rect));
        let ruler = self.render_ruler(&mut child_ui(ui, ruler_rect));
        self.render_tracks(&mut child_ui(ui, tracks_rect));
        self.render_keyframes(&mut child_ui(ui, keyframes_rect));
        self.render_playhead(ui, ruler_rect.union(keyframes_rect));
        self.handle_scrub(ui, ruler);

        // Mirrored offsets are applied on the next frame
        if !self.registry.synced_ids().is_empty() {
            ui.ctx().request_repaint();
        }

        ui.allocate_rect(rect, Sense::hover());
    }

    /// Current time and duration inputs
    fn render_controls(&mut self, ui: &mut Ui) {
        ui.painter().rect_filled(ui.max_rect(), 0.0, Color32::from_gray(35));

        ui.horizontal_centered(|ui| {
            ui.add_space(self.layout.content_padding);

            if ui.button("⏮").on_hover_text("Go to Start").clicked() {
                let start = self.store.current_time_domain().min();
                self.store.set_current_time(start);
            }

            ui.add(
                NumberInput::new(&mut self.current_input, &mut self.store.current_time_binding())
                    .id_salt("current_time"),
            );
            ui.label("/");
            ui.add(
                NumberInput::new(&mut self.duration_input, &mut self.store.duration_binding())
                    .id_salt("duration_time"),
            );
            ui.label("ms");

            if ui.button("⏭").on_hover_text("Go to End").clicked() {
                let end = self.store.duration_time();
                self.store.set_current_time(end);
            }
        });
    }

    /// Time ruler; returns the scrub origin and its response
    fn render_ruler(&mut self, ui: &mut Ui) -> (Rect, Response) {
        let layout = self.layout;
        let duration = self.store.duration_time();
        let area = ScrollArea::horizontal().scroll_bar_visibility(ScrollBarVisibility::AlwaysHidden);

        let (bar_rect, response) =
            show_synced(&mut self.registry, &self.sync, ui, self.surfaces.ruler, area, |ui| {
                let size = Vec2::new(content_width(duration, &layout), ui.available_height());
                let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
                paint_ruler(ui, rect, duration, &layout);
                (rect, response)
            });

        // Local x of the origin is the time in milliseconds
        let origin = Rect::from_min_max(
            bar_rect.min + Vec2::new(layout.content_padding, 0.0),
            bar_rect.max,
        );
        (origin, response)
    }

    /// Track names
    fn render_tracks(&mut self, ui: &mut Ui) {
        let layout = self.layout;
        let tracks = &self.tracks;
        let area = ScrollArea::vertical().scroll_bar_visibility(ScrollBarVisibility::AlwaysHidden);

        show_synced(&mut self.registry, &self.sync, ui, self.surfaces.tracks, area, |ui| {
            let size = Vec2::new(ui.available_width(), tracks.len() as f32 * layout.row_height);
            let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
            let painter = ui.painter_at(ui.clip_rect());

            for (idx, name) in tracks.iter().enumerate() {
                let row = row_rect(rect, idx, layout.row_height);
                painter.rect_filled(row, 0.0, row_color(idx));
                painter.text(
                    Pos2::new(row.min.x + layout.content_padding, row.center().y),
                    egui::Align2::LEFT_CENTER,
                    name,
                    egui::FontId::proportional(13.0),
                    Color32::from_gray(200),
                );
                painter.line_segment(
                    [row.left_bottom(), row.right_bottom()],
                    Stroke::new(1.0, Color32::from_gray(45)),
                );
            }
        });
    }

    /// One segment per track spanning the duration
    fn render_keyframes(&mut self, ui: &mut Ui) {
        let layout = self.layout;
        let duration = self.store.duration_time();
        let rows = self.tracks.len();
        let area = ScrollArea::both();

        show_synced(&mut self.registry, &self.sync, ui, self.surfaces.keyframes, area, |ui| {
            let size = Vec2::new(
                content_width(duration, &layout),
                rows as f32 * layout.row_height,
            );
            let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
            let painter = ui.painter_at(ui.clip_rect());

            for idx in 0..rows {
                let row = row_rect(rect, idx, layout.row_height);
                painter.rect_filled(row, 0.0, row_color(idx));

                let segment = Rect::from_min_size(
                    Pos2::new(row.min.x + layout.content_padding, row.min.y + 8.0),
                    Vec2::new(duration as f32, (layout.row_height - 16.0).max(2.0)),
                );
                painter.rect_filled(segment, 4.0, Color32::from_rgba_unmultiplied(100, 150, 255, 90));
                painter.rect_stroke(segment, 4.0, Stroke::new(1.0, Color32::from_rgb(100, 150, 255)));

                painter.line_segment(
                    [row.left_bottom(), row.right_bottom()],
                    Stroke::new(1.0, Color32::from_gray(45)),
                );
            }
        });
    }

    /// Playhead line over the ruler and keyframe area, hidden out of view
    fn render_playhead(&mut self, ui: &Ui, rect: Rect) {
        let playhead = self.surfaces.playhead;
        // The playhead only follows; consume its mirrored offset
        self.registry.take_synced(playhead);
        let left = self.registry.offset(playhead).map_or(0.0, |offset| offset.left);

        let x = rect.min.x + self.layout.content_padding + self.store.current_time() as f32 - left;
        if x < rect.min.x || x > rect.max.x {
            return;
        }

        let painter = ui.painter_at(rect);
        painter.line_segment(
            [Pos2::new(x, rect.min.y), Pos2::new(x, rect.max.y)],
            Stroke::new(PLAYHEAD_WIDTH, PLAYHEAD_COLOR),
        );
        let top = rect.min.y + self.layout.header_height;
        let triangle = vec![
            Pos2::new(x, top),
            Pos2::new(x - 6.0, top - 8.0),
            Pos2::new(x + 6.0, top - 8.0),
        ];
        painter.add(egui::Shape::convex_polygon(triangle, PLAYHEAD_COLOR, Stroke::NONE));
    }

    /// Drive the drag tracker from the ruler press and global pointer state
    fn handle_scrub(&mut self, ui: &Ui, (origin, response): (Rect, Response)) {
        let now = Instant::now();

        // Only a primary press starts a scrub
        let primary_pressed = ui.input(|input| input.pointer.primary_pressed());
        if primary_pressed && response.is_pointer_button_down_on() && !self.drag.is_dragging() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let update = self.drag.on_press_start(origin, pointer, now);
                self.scrub_to(update);
            }
        }

        if !self.drag.is_listening() {
            return;
        }

        let (pointer, released) = ui.input(|input| {
            (
                input.pointer.latest_pos(),
                input.pointer.primary_released() || !input.pointer.primary_down(),
            )
        });

        if let Some(update) = self.drag.poll(now) {
            self.scrub_to(update);
        }
        match (pointer, released) {
            (Some(pointer), true) => {
                if let Some(update) = self.drag.on_release(pointer) {
                    self.scrub_to(update);
                }
            }
            (Some(pointer), false) => {
                if let Some(update) = self.drag.on_move(pointer, now) {
                    self.scrub_to(update);
                }
            }
            (None, true) => self.drag.cancel(),
            (None, false) => {}
        }

        if let Some(deadline) = self.drag.deadline() {
            ui.ctx()
                .request_repaint_after(deadline.saturating_duration_since(now));
        }
    }

    fn scrub_to(&mut self, update: DragUpdate) {
        let time = scrub_time(update.local.x, &self.store.current_time_domain());
        self.store.set_current_time(time);
    }
}

/// Child ui confined to `rect`
fn child_ui(ui: &mut Ui, rect: Rect) -> Ui {
    ui.new_child(UiBuilder::new().max_rect(rect).layout(*ui.layout()))
}

/// Show a scroll area whose offset is mirrored through `sync`.
///
/// A mirrored offset waiting in the registry is applied before showing; the
/// offset actually shown is observed afterwards and any change dispatched.
fn show_synced<R>(
    registry: &mut SurfaceRegistry,
    sync: &ScrollSyncGroup,
    ui: &mut Ui,
    id: SurfaceId,
    area: ScrollArea,
    add_contents: impl FnOnce(&mut Ui) -> R,
) -> R {
    let mut area = area.id_salt(id.0).auto_shrink([false, false]).drag_to_scroll(false);
    if let Some(offset) = registry.take_synced(id) {
        area = area
            .horizontal_scroll_offset(offset.left)
            .vertical_scroll_offset(offset.top);
    }

    let output = area.show(ui, add_contents);
    let change = registry.observe(
        id,
        ScrollOffset {
            left: output.state.offset.x,
            top: output.state.offset.y,
        },
    );
    match (change.x, change.y) {
        (true, true) => sync.on_scroll_both(registry, id),
        (true, false) => sync.on_scroll_x(registry, id),
        (false, true) => sync.on_scroll_y(registry, id),
        (false, false) => {}
    }
    output.inner
}

/// Scrollable width for a duration (one pixel per millisecond)
fn content_width(duration: f64, layout: &LayoutConfig) -> f32 {
    duration as f32 + 2.0 * layout.content_padding
}

fn row_rect(rect: Rect, idx: usize, row_height: f32) -> Rect {
    Rect::from_min_size(
        Pos2::new(rect.min.x, rect.min.y + idx as f32 * row_height),
        Vec2::new(rect.width(), row_height),
    )
}

fn row_color(idx: usize) -> Color32 {
    if idx % 2 == 0 {
        Color32::from_gray(32)
    } else {
        Color32::from_gray(28)
    }
}

fn paint_ruler(ui: &Ui, rect: Rect, duration: f64, layout: &LayoutConfig) {
    let painter = ui.painter_at(ui.clip_rect());
    painter.rect_filled(rect, 0.0, Color32::from_gray(40));

    let ticks = (duration / MINOR_TICK_MS).floor() as u32;
    for tick in 0..=ticks {
        let time = f64::from(tick) * MINOR_TICK_MS;
        let x = rect.min.x + layout.content_padding + time as f32;
        let is_major = tick % (MAJOR_TICK_MS / MINOR_TICK_MS) as u32 == 0;

        let (tick_height, tick_color) = if is_major {
            (12.0, Color32::from_gray(180))
        } else {
            (6.0, Color32::from_gray(100))
        };
        painter.line_segment(
            [Pos2::new(x, rect.max.y - tick_height), Pos2::new(x, rect.max.y)],
            Stroke::new(1.0, tick_color),
        );

        if is_major {
            painter.text(
                Pos2::new(x + 2.0, rect.min.y + 4.0),
                egui::Align2::LEFT_TOP,
                format!("{}s", time / MAJOR_TICK_MS),
                egui::FontId::monospace(10.0),
                Color32::from_gray(180),
            );
        }
    }
}
