//! Keyboard mapping

use sn_camera::MoveIntent;
use sn_core::{Direction, Side};

use crate::event::{FocusTarget, Key, KeyInput};

/// What a key press asks the engine to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Navigate(Direction),
    ToggleFocus,
    Escape,
    ToggleBrowse,
    /// Leave browse mode without restoring the camera
    CancelBrowse,
    HighlightExit(Side),
    ConfirmExit,
    CancelExit,
}

/// Engine state the key mapping depends on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyContext {
    pub section_exit_visible: bool,
    pub browse_active: bool,
    pub browse_key: char,
}

fn arrow(key: Key) -> Option<Direction> {
    match key {
        Key::ArrowUp => Some(Direction::Up),
        Key::ArrowDown => Some(Direction::Down),
        Key::ArrowLeft => Some(Direction::Left),
        Key::ArrowRight => Some(Direction::Right),
        _ => None,
    }
}

/// Map a key event to a command. Releases and keys aimed at text fields
/// map to nothing.
pub fn map_key(input: &KeyInput, ctx: &KeyContext) -> Option<Command> {
    if !input.pressed || input.target == FocusTarget::TextField {
        return None;
    }

    // The modal owns the keyboard while visible
    if ctx.section_exit_visible {
        return match input.key {
            Key::ArrowLeft => Some(Command::HighlightExit(Side::Left)),
            Key::ArrowRight => Some(Command::HighlightExit(Side::Right)),
            Key::Enter | Key::Space if !input.repeat => Some(Command::ConfirmExit),
            Key::Escape => Some(Command::CancelExit),
            _ => None,
        };
    }

    if let Key::Char(c) = input.key {
        if !input.repeat && c.eq_ignore_ascii_case(&ctx.browse_key) {
            return Some(Command::ToggleBrowse);
        }
        return None;
    }

    if ctx.browse_active {
        return match input.key {
            Key::Escape => Some(Command::CancelBrowse),
            _ => None,
        };
    }

    if let Some(direction) = arrow(input.key) {
        return Some(Command::Navigate(direction));
    }

    match input.key {
        Key::Enter | Key::Space if !input.repeat => Some(Command::ToggleFocus),
        Key::Escape => Some(Command::Escape),
        _ => None,
    }
}

const FORWARD: u8 = 1 << 0;
const BACK: u8 = 1 << 1;
const LEFT: u8 = 1 << 2;
const RIGHT: u8 = 1 << 3;
const RISE: u8 = 1 << 4;
const SINK: u8 = 1 << 5;
const YAW_LEFT: u8 = 1 << 6;
const YAW_RIGHT: u8 = 1 << 7;

/// Held free-move keys: W/S forward and back, A/D strafe, R/F up and down,
/// Q/E yaw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementKeys {
    held: u8,
}

impl MovementKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a key event. Returns whether it was a movement key.
    pub fn key(&mut self, input: &KeyInput) -> bool {
        if input.target == FocusTarget::TextField {
            self.clear();
            return false;
        }
        let Key::Char(c) = input.key else {
            return false;
        };
        let bit = match c.to_ascii_lowercase() {
            'w' => FORWARD,
            's' => BACK,
            'a' => LEFT,
            'd' => RIGHT,
            'r' => RISE,
            'f' => SINK,
            'q' => YAW_LEFT,
            'e' => YAW_RIGHT,
            _ => return false,
        };
        if input.pressed {
            self.held |= bit;
        } else {
            self.held &= !bit;
        }
        true
    }

    pub fn clear(&mut self) {
        self.held = 0;
    }

    fn axis(&self, positive: u8, negative: u8) -> f32 {
        let mut value = 0.0;
        if self.held & positive != 0 {
            value += 1.0;
        }
        if self.held & negative != 0 {
            value -= 1.0;
        }
        value
    }

    pub fn intent(&self) -> MoveIntent {
        MoveIntent {
            forward: self.axis(FORWARD, BACK),
            strafe: self.axis(RIGHT, LEFT),
            vertical: self.axis(RISE, SINK),
            yaw: self.axis(YAW_LEFT, YAW_RIGHT),
        }
    }
}
