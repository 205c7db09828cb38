//! Section-exit modal and browse-mode hint

use egui::{Align2, Color32, Context, RichText, Vec2};
use sn_core::{BrowseModeState, ControlType, SectionExitState, Side};

/// What the user clicked in the section-exit modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitChoice {
    Select(Side),
    Cancel,
}

fn neighbour_button(ui: &mut egui::Ui, state: &SectionExitState, side: Side, arrow: &str) -> bool {
    let Some(neighbor) = state.neighbor(side) else {
        ui.add_enabled(false, egui::Button::new(format!("{} (none)", arrow)));
        return false;
    };
    let label = match side {
        Side::Left => format!("{} {}", arrow, neighbor.title),
        _ => format!("{} {}", neighbor.title, arrow),
    };
    let mut text = RichText::new(label).size(16.0);
    if state.selected_side == side {
        text = text.strong().color(Color32::WHITE);
    }
    ui.add(egui::Button::new(text).selected(state.selected_side == side))
        .clicked()
}

pub fn section_exit(ctx: &Context, state: &SectionExitState) -> Option<ExitChoice> {
    if !state.is_visible {
        return None;
    }

    let mut choice = None;
    egui::Window::new("section_exit")
        .title_bar(false)
        .resizable(false)
        .collapsible(false)
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(format!("End of {}", state.current_category_title))
                        .size(18.0)
                        .strong(),
                );
                ui.label("Continue in another section?");
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if neighbour_button(ui, state, Side::Left, "<") {
                        choice = Some(ExitChoice::Select(Side::Left));
                    }
                    if neighbour_button(ui, state, Side::Right, ">") {
                        choice = Some(ExitChoice::Select(Side::Right));
                    }
                });
                ui.add_space(8.0);
                if ui.button("Stay here (Esc)").clicked() {
                    choice = Some(ExitChoice::Cancel);
                }
            });
        });
    choice
}

pub fn browse_hint(ctx: &Context, state: &BrowseModeState, browse_key: char) {
    if !state.is_active {
        return;
    }
    let controls = match state.control_type {
        ControlType::Orbit => "drag to orbit, wheel to change height",
        ControlType::FreeMove => "W/S move, A/D strafe, R/F rise and sink, Q/E turn",
        ControlType::Static => "camera fixed",
    };
    egui::Area::new("browse_hint")
        .anchor(Align2::LEFT_BOTTOM, Vec2::new(12.0, -12.0))
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(RichText::new("Browse mode").strong());
                ui.label(controls);
                ui.label(format!(
                    "{} returns the camera, Esc leaves it here",
                    browse_key.to_ascii_uppercase()
                ));
            });
        });
}
