//! Viewer application state

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::SystemTime;

use eframe::egui::{self, Context};
use parking_lot::Mutex;
use serde_json::Value;
use sn_core::events::events::{
    ActiveItemChanged, BrowseModeChanged, CameraSettled, LayoutChanged, SectionExitShown,
};
use sn_data::ContentSource;
use sn_engine::SpatialEngine;
use sn_input::{NavOutcome, WheelAction};
use tracing::{info, warn};

use crate::input::InputTranslator;
use crate::overlay::{self, ExitChoice};
use crate::render;

const ACTIVITY_LINES: usize = 6;
/// Seconds between manifest change checks
const RELOAD_INTERVAL: f64 = 1.0;

/// Host-side state the engine callbacks toggle
#[derive(Debug, Default)]
struct ViewerFlags {
    /// Detail panel for the active item
    focused: bool,
    /// Cards show caption and id
    detailed: bool,
}

type Activity = Arc<Mutex<VecDeque<String>>>;

fn push_activity(activity: &Activity, line: String) {
    let mut lines = activity.lock();
    if lines.len() == ACTIVITY_LINES {
        lines.pop_front();
    }
    lines.push_back(line);
}

pub struct ViewerApp {
    engine: SpatialEngine<Value>,
    source: Box<dyn ContentSource>,
    title: Option<String>,
    loaded_at: SystemTime,
    last_reload_check: f64,
    translator: InputTranslator,
    flags: Arc<Mutex<ViewerFlags>>,
    activity: Activity,
    search: String,
}

impl ViewerApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        mut engine: SpatialEngine<Value>,
        source: Box<dyn ContentSource>,
        title: Option<String>,
    ) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let flags = Arc::new(Mutex::new(ViewerFlags::default()));
        let activity: Activity = Arc::new(Mutex::new(VecDeque::new()));
        Self::wire(&mut engine, &flags, &activity);

        Self {
            engine,
            source,
            title,
            loaded_at: SystemTime::now(),
            last_reload_check: 0.0,
            translator: InputTranslator::new(),
            flags,
            activity,
            search: String::new(),
        }
    }

    /// Subscribe the activity log and host callbacks
    fn wire(engine: &mut SpatialEngine<Value>, flags: &Arc<Mutex<ViewerFlags>>, activity: &Activity) {
        let events = engine.events();

        let log = activity.clone();
        events.on::<ActiveItemChanged, _>(move |e| {
            push_activity(&log, format!("Active: {} ({})", e.item_id, e.global_index));
        });
        let log = activity.clone();
        events.on::<SectionExitShown, _>(move |e| {
            push_activity(&log, format!("End of section {}", e.category_index));
        });
        let log = activity.clone();
        events.on::<BrowseModeChanged, _>(move |e| {
            let line = if e.active {
                format!("Browsing with {:?}", e.control_type)
            } else if e.restored {
                "Browse ended, camera restored".to_string()
            } else {
                "Browse ended".to_string()
            };
            push_activity(&log, line);
        });
        let log = activity.clone();
        events.on::<LayoutChanged, _>(move |e| {
            push_activity(&log, format!("Layout: {}", e.layout));
        });
        let log = activity.clone();
        events.on::<CameraSettled, _>(move |e| {
            if let Some(item) = e.focused_item {
                push_activity(&log, format!("Camera on item {}", item));
            }
        });

        let state = flags.clone();
        engine.on_toggle_focus(move || {
            let mut flags = state.lock();
            flags.focused = !flags.focused;
        });
        let state = flags.clone();
        engine.on_escape(move || state.lock().focused = false);
        let state = flags.clone();
        engine.on_scroll(move |action| {
            state.lock().detailed = action == WheelAction::ScrollUp;
        });
    }

    /// Reload the manifest when its source changed on disk
    fn maybe_reload(&mut self, now: f64) {
        if now - self.last_reload_check < RELOAD_INTERVAL {
            return;
        }
        self.last_reload_check = now;
        if !self.source.changed_since(self.loaded_at) {
            return;
        }

        self.loaded_at = SystemTime::now();
        match self.source.load() {
            Ok(manifest) => {
                info!(source = self.source.name(), "Manifest changed, reloading");
                self.title = manifest.title.clone();
                self.engine.load_content(&manifest.categories);
                push_activity(&self.activity, "Content reloaded".to_string());
            }
            Err(err) => {
                warn!(%err, "Reload failed, keeping current content");
                push_activity(&self.activity, format!("Reload failed: {}", err));
            }
        }
    }

    fn toolbar(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let title = self.title.as_deref().unwrap_or(self.source.name());
                ui.heading(title);
                ui.separator();

                ui.label(format!("Layout: {}", self.engine.layout_name()));
                if ui.button("Next layout (L)").clicked() {
                    self.cycle_layout();
                }
                let browsing = self.engine.browse_state().get().is_active;
                if ui.selectable_label(browsing, "Browse (B)").clicked() {
                    self.engine.toggle_browse();
                }
                ui.separator();

                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.search)
                        .hint_text("Go to item id")
                        .desired_width(160.0),
                );
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    let id = self.search.trim().to_string();
                    if self.engine.navigate_to_item(&id) == NavOutcome::Unchanged {
                        push_activity(&self.activity, format!("No move to '{}'", id));
                    }
                }
            });
        });
    }

    fn status_bar(&self, ctx: &Context) {
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            let index = self.engine.index();
            let position = match self.engine.active_item() {
                Some(item) => format!(
                    "{} / {}  ({} of {})",
                    self.engine
                        .category_title(item.category_index)
                        .unwrap_or_default(),
                    item.id,
                    item.global_index + 1,
                    index.len()
                ),
                None => "No content".to_string(),
            };
            ui.horizontal(|ui| {
                ui.label(position);
                ui.separator();
                ui.label(format!("Camera: {:?}", self.engine.camera_transition()));
            });
            for line in self.activity.lock().iter().rev() {
                ui.weak(line.as_str());
            }
        });
    }

    fn detail_panel(&self, ctx: &Context) {
        if !self.flags.lock().focused {
            return;
        }
        let Some(item) = self.engine.active_item() else {
            return;
        };
        egui::SidePanel::right("detail").show(ctx, |ui| {
            ui.heading(item.id.as_str());
            ui.separator();
            let json = serde_json::to_string_pretty(&item.payload).unwrap_or_default();
            ui.monospace(json);
        });
    }

    fn cycle_layout(&mut self) {
        if let Err(err) = self.engine.cycle_layout() {
            warn!(%err, "Layout switch failed");
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let typing = ctx.wants_keyboard_input();
        let (now, dt) = ctx.input(|i| (i.time, i.stable_dt));
        self.maybe_reload(now);

        if !typing && ctx.input(|i| i.key_pressed(egui::Key::L)) {
            self.cycle_layout();
        }

        self.toolbar(ctx);
        self.status_bar(ctx);
        self.detail_panel(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::from_gray(18)))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.allocate_rect(rect, egui::Sense::click_and_drag());
                self.engine.resize(rect.width(), rect.height());

                for event in self.translator.translate(ctx, rect, typing) {
                    self.engine.handle_input(event);
                }
                self.engine.tick(dt);

                let detailed = self.flags.lock().detailed;
                render::paint_cards(ui.painter(), rect, &self.engine, detailed);
            });

        match overlay::section_exit(ctx, &self.engine.section_exit().get()) {
            Some(ExitChoice::Select(side)) => {
                self.engine.select_exit(side);
            }
            Some(ExitChoice::Cancel) => {
                self.engine.cancel_exit();
            }
            None => {}
        }
        overlay::browse_hint(
            ctx,
            &self.engine.browse_state().get(),
            self.engine.config().input.browse_key,
        );

        ctx.request_repaint();
    }
}
