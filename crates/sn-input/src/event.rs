//! Host-independent input events

use std::time::Duration;

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Space,
    Escape,
    /// Any printable key, lower-cased
    Char(char),
}

/// Where keyboard focus is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    Canvas,
    /// A text-editing control; navigation ignores keys aimed here
    TextField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub pressed: bool,
    pub repeat: bool,
    pub target: FocusTarget,
}

impl KeyInput {
    pub fn press(key: Key) -> Self {
        Self {
            key,
            pressed: true,
            repeat: false,
            target: FocusTarget::Canvas,
        }
    }

    pub fn release(key: Key) -> Self {
        Self {
            pressed: false,
            ..Self::press(key)
        }
    }

    pub fn in_text_field(mut self) -> Self {
        self.target = FocusTarget::TextField;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// Mouse or pen, in screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub phase: PointerPhase,
    pub position: Vec2,
    /// Time since an arbitrary fixed origin
    pub time: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchInput {
    pub phase: TouchPhase,
    pub id: u64,
    pub position: Vec2,
    /// Fingers currently down, this one included
    pub touch_count: usize,
    pub time: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelInput {
    pub delta: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key(KeyInput),
    Pointer(PointerInput),
    Touch(TouchInput),
    Wheel(WheelInput),
}

impl From<KeyInput> for InputEvent {
    fn from(input: KeyInput) -> Self {
        InputEvent::Key(input)
    }
}

impl From<PointerInput> for InputEvent {
    fn from(input: PointerInput) -> Self {
        InputEvent::Pointer(input)
    }
}

impl From<TouchInput> for InputEvent {
    fn from(input: TouchInput) -> Self {
        InputEvent::Touch(input)
    }
}

impl From<WheelInput> for InputEvent {
    fn from(input: WheelInput) -> Self {
        InputEvent::Wheel(input)
    }
}
