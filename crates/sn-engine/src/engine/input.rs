//! Routing raw input into engine operations

use glam::Vec2;
use sn_camera::CameraRig;
use sn_core::{ContentPayload, ControlType, NavigationMode};
use sn_input::{
    map_key, Command, InputEvent, KeyContext, KeyInput, PointerInput, PointerPhase, TouchInput,
    TouchPhase, WheelInput,
};
use tracing::trace;

use super::SpatialEngine;

impl<P, R> SpatialEngine<P, R>
where
    P: ContentPayload + Clone,
    R: CameraRig,
{
    /// Feed one raw input event
    pub fn handle_input(&mut self, event: impl Into<InputEvent>) {
        match event.into() {
            InputEvent::Key(input) => self.handle_key(&input),
            InputEvent::Pointer(input) => self.handle_pointer(&input),
            InputEvent::Touch(input) => self.handle_touch(&input),
            InputEvent::Wheel(input) => self.handle_wheel(&input),
        }
    }

    fn is_orbiting(&self) -> bool {
        self.browse.control_type() == Some(ControlType::Orbit)
    }

    fn drag_enabled(&self) -> bool {
        self.navigation_mode() == NavigationMode::Grid
            && !self.browse.is_active()
            && !self.section_exit.is_visible()
    }

    fn handle_key(&mut self, input: &KeyInput) {
        let free_move = self.browse.control_type() == Some(ControlType::FreeMove);
        if free_move && self.movement.key(input) {
            return;
        }

        let ctx = KeyContext {
            section_exit_visible: self.section_exit.is_visible(),
            browse_active: self.browse.is_active(),
            browse_key: self.config.input.browse_key,
        };
        if let Some(command) = map_key(input, &ctx) {
            trace!(?command, "Key command");
            self.dispatch(command);
        }
    }

    fn dispatch(&mut self, command: Command) {
        match command {
            Command::Navigate(direction) => {
                self.navigate(direction);
            }
            Command::ToggleFocus => {
                if let Some(callback) = self.callbacks.toggle_focus.as_mut() {
                    callback();
                }
            }
            Command::Escape => {
                if let Some(callback) = self.callbacks.escape.as_mut() {
                    callback();
                }
            }
            Command::ToggleBrowse => {
                self.toggle_browse();
            }
            Command::CancelBrowse => {
                self.cancel_browse();
            }
            Command::HighlightExit(side) => {
                self.highlight_exit(side);
            }
            Command::ConfirmExit => {
                self.confirm_exit();
            }
            Command::CancelExit => {
                self.cancel_exit();
            }
        }
    }

    fn orbit_drag(&mut self, position: Vec2, pressed: bool, released: bool) {
        if released {
            self.orbit_pointer = None;
            return;
        }
        if pressed {
            self.orbit_pointer = Some(position);
            return;
        }
        if let Some(last) = self.orbit_pointer {
            self.browse.pointer_drag(&mut self.rig, position - last);
            self.orbit_pointer = Some(position);
        }
    }

    fn handle_pointer(&mut self, input: &PointerInput) {
        if self.is_orbiting() {
            self.orbit_drag(
                input.position,
                input.phase == PointerPhase::Down,
                matches!(input.phase, PointerPhase::Up | PointerPhase::Cancel),
            );
        }

        let enabled = self.drag_enabled();
        if let Some(direction) = self.drag.pointer(input, enabled) {
            self.navigate(direction);
        }
    }

    fn handle_touch(&mut self, input: &TouchInput) {
        if self.is_orbiting() {
            if input.touch_count > 1 {
                self.orbit_pointer = None;
            } else {
                self.orbit_drag(
                    input.position,
                    input.phase == TouchPhase::Start,
                    matches!(input.phase, TouchPhase::End | TouchPhase::Cancel),
                );
            }
        }

        let enabled = self.drag_enabled();
        if let Some(direction) = self.drag.touch(input, enabled) {
            self.navigate(direction);
        }
    }

    fn handle_wheel(&mut self, input: &WheelInput) {
        if self.section_exit.is_visible() {
            return;
        }
        if self.is_orbiting() {
            self.browse.wheel(&mut self.rig, input.delta.y);
            return;
        }
        if let Some(action) = self.wheel.classify(input) {
            if let Some(callback) = self.callbacks.scroll.as_mut() {
                callback(action);
            }
        }
    }
}
