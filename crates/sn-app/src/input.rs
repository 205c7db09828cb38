//! Translates egui input into engine input events

use std::collections::HashSet;
use std::time::Duration;

use egui::{Context, Event, PointerButton, Pos2, Rect};
use glam::Vec2;
use sn_input::{
    FocusTarget, InputEvent, Key, KeyInput, PointerInput, PointerPhase, TouchInput, TouchPhase,
    WheelInput,
};

fn to_vec2(pos: Pos2) -> Vec2 {
    Vec2::new(pos.x, pos.y)
}

fn map_key(key: egui::Key) -> Option<Key> {
    let mapped = match key {
        egui::Key::ArrowUp => Key::ArrowUp,
        egui::Key::ArrowDown => Key::ArrowDown,
        egui::Key::ArrowLeft => Key::ArrowLeft,
        egui::Key::ArrowRight => Key::ArrowRight,
        egui::Key::Enter => Key::Enter,
        egui::Key::Space => Key::Space,
        egui::Key::Escape => Key::Escape,
        other => {
            let mut chars = other.name().chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphabetic() => Key::Char(c.to_ascii_lowercase()),
                _ => return None,
            }
        }
    };
    Some(mapped)
}

fn map_touch_phase(phase: egui::TouchPhase) -> TouchPhase {
    match phase {
        egui::TouchPhase::Start => TouchPhase::Start,
        egui::TouchPhase::Move => TouchPhase::Move,
        egui::TouchPhase::End => TouchPhase::End,
        egui::TouchPhase::Cancel => TouchPhase::Cancel,
    }
}

/// Per-frame translation. Pointer events emulated from touches are dropped
/// while fingers are down so gestures are not counted twice.
#[derive(Default)]
pub struct InputTranslator {
    touches: HashSet<u64>,
}

impl InputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events of this frame aimed at the canvas. `typing` is whether a text
    /// field held keyboard focus when the frame began.
    pub fn translate(&mut self, ctx: &Context, canvas: Rect, typing: bool) -> Vec<InputEvent> {
        let target = if typing {
            FocusTarget::TextField
        } else {
            FocusTarget::Canvas
        };

        ctx.input(|i| {
            let time = Duration::from_secs_f64(i.time.max(0.0));
            let hovering = i.pointer.hover_pos().is_some_and(|p| canvas.contains(p));
            let mut out: Vec<InputEvent> = Vec::new();

            for event in &i.events {
                match event {
                    Event::Key {
                        key,
                        pressed,
                        repeat,
                        ..
                    } => {
                        if let Some(key) = map_key(*key) {
                            out.push(
                                KeyInput {
                                    key,
                                    pressed: *pressed,
                                    repeat: *repeat,
                                    target,
                                }
                                .into(),
                            );
                        }
                    }
                    Event::PointerButton {
                        pos,
                        button: PointerButton::Primary,
                        pressed,
                        ..
                    } if self.touches.is_empty() => {
                        // Presses must start on the canvas, releases end anywhere
                        if *pressed && !canvas.contains(*pos) {
                            continue;
                        }
                        let phase = if *pressed {
                            PointerPhase::Down
                        } else {
                            PointerPhase::Up
                        };
                        out.push(
                            PointerInput {
                                phase,
                                position: to_vec2(*pos),
                                time,
                            }
                            .into(),
                        );
                    }
                    Event::PointerMoved(pos) if self.touches.is_empty() => {
                        out.push(
                            PointerInput {
                                phase: PointerPhase::Move,
                                position: to_vec2(*pos),
                                time,
                            }
                            .into(),
                        );
                    }
                    Event::PointerGone => {
                        out.push(
                            PointerInput {
                                phase: PointerPhase::Cancel,
                                position: Vec2::ZERO,
                                time,
                            }
                            .into(),
                        );
                    }
                    Event::Touch { id, phase, pos, .. } => {
                        let phase = map_touch_phase(*phase);
                        if phase == TouchPhase::Start {
                            self.touches.insert(id.0);
                        }
                        let touch_count = self.touches.len().max(1);
                        if matches!(phase, TouchPhase::End | TouchPhase::Cancel) {
                            self.touches.remove(&id.0);
                        }
                        out.push(
                            TouchInput {
                                phase,
                                id: id.0,
                                position: to_vec2(*pos),
                                touch_count,
                                time,
                            }
                            .into(),
                        );
                    }
                    Event::Scroll(delta) if hovering => {
                        // egui scrolls positive upward
                        out.push(
                            WheelInput {
                                delta: Vec2::new(-delta.x, -delta.y),
                            }
                            .into(),
                        );
                    }
                    _ => {}
                }
            }
            out
        })
    }
}
