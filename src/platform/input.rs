//! Keyboard and touch input
//!
//! DOM handlers feed raw events in here; the frame loop reads a `TickInput`
//! snapshot once per simulation step.

use crate::sim::TickInput;

/// What a key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Left,
    Right,
    Fire,
    Pause,
}

/// Map a `KeyboardEvent.code` to an action
pub fn key_action(code: &str) -> Option<KeyAction> {
    match code {
        "ArrowLeft" | "KeyA" => Some(KeyAction::Left),
        "ArrowRight" | "KeyD" => Some(KeyAction::Right),
        "Space" => Some(KeyAction::Fire),
        "KeyP" => Some(KeyAction::Pause),
        _ => None,
    }
}

/// The one touch currently steering the ship
#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveTouch {
    id: i32,
    x: f32,
}

/// Held keys, the active touch, and one-shot commands waiting for a step
#[derive(Debug, Clone, Default)]
pub struct InputState {
    left: bool,
    right: bool,
    fire: bool,
    touch: Option<ActiveTouch>,
    pause_requested: bool,
    start_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key pressed. Returns the action so the caller can suppress the
    /// browser default. Auto-repeat never re-toggles pause.
    pub fn key_down(&mut self, code: &str, repeat: bool) -> Option<KeyAction> {
        let action = key_action(code)?;
        match action {
            KeyAction::Left => self.left = true,
            KeyAction::Right => self.right = true,
            KeyAction::Fire => self.fire = true,
            KeyAction::Pause if !repeat => self.pause_requested = true,
            KeyAction::Pause => {}
        }
        Some(action)
    }

    pub fn key_up(&mut self, code: &str) -> Option<KeyAction> {
        let action = key_action(code)?;
        match action {
            KeyAction::Left => self.left = false,
            KeyAction::Right => self.right = false,
            KeyAction::Fire => self.fire = false,
            KeyAction::Pause => {}
        }
        Some(action)
    }

    /// A finger went down at field x. Only the first touch during play is
    /// tracked. Returns true if this touch took control.
    pub fn touch_start(&mut self, id: i32, x: f32, playing: bool) -> bool {
        if !playing || self.touch.is_some() {
            return false;
        }
        self.touch = Some(ActiveTouch { id, x });
        true
    }

    pub fn touch_move(&mut self, id: i32, x: f32) {
        if let Some(touch) = self.touch.as_mut().filter(|t| t.id == id) {
            touch.x = x;
        }
    }

    /// A finger lifted or was cancelled
    pub fn touch_end(&mut self, id: i32) {
        if self.touch.is_some_and(|t| t.id == id) {
            self.touch = None;
        }
    }

    pub fn touch_active(&self) -> bool {
        self.touch.is_some()
    }

    pub fn request_pause(&mut self) {
        self.pause_requested = true;
    }

    pub fn request_start(&mut self) {
        self.start_requested = true;
    }

    /// A start or pause is waiting for the next step
    pub fn has_pending_command(&self) -> bool {
        self.pause_requested || self.start_requested
    }

    /// Drop everything held, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.left = false;
        self.right = false;
        self.fire = false;
        self.touch = None;
    }

    /// Snapshot for the next step. One-shot commands are consumed.
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            left: self.left,
            right: self.right,
            shoot: self.fire || self.touch.is_some(),
            touch_x: self.touch.map(|t| t.x),
            pause: self.pause_requested,
            start: self.start_requested,
            autopilot: false,
        };
        self.pause_requested = false;
        self.start_requested = false;
        input
    }
}
