//! Keyboard translation into per-tick input flags

use crate::sim::TickInput;

/// Logical actions the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    Jump,
    Pause,
    Fullscreen,
    /// Toggle idle/demo mode
    Autopilot,
}

impl Action {
    /// Map a `KeyboardEvent.code` to an action (WASD and arrows both move)
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "KeyW" | "ArrowUp" => Some(Action::MoveForward),
            "KeyS" | "ArrowDown" => Some(Action::MoveBack),
            "KeyA" | "ArrowLeft" => Some(Action::MoveLeft),
            "KeyD" | "ArrowRight" => Some(Action::MoveRight),
            "Space" => Some(Action::Jump),
            "Escape" | "KeyP" => Some(Action::Pause),
            "KeyF" => Some(Action::Fullscreen),
            "KeyI" => Some(Action::Autopilot),
            _ => None,
        }
    }
}

/// Keys currently held plus one-shot requests waiting for the next frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    forward: bool,
    back: bool,
    left: bool,
    right: bool,
    jump: bool,
    pause_requested: bool,
    fullscreen_requested: bool,
    /// Idle/demo mode drives the player instead of held keys
    pub autopilot: bool,
}

impl InputState {
    /// Record a key press. Auto-repeat presses only refresh held keys.
    pub fn key_down(&mut self, code: &str, repeat: bool) -> Option<Action> {
        let action = Action::from_code(code)?;
        match action {
            Action::MoveForward => self.forward = true,
            Action::MoveBack => self.back = true,
            Action::MoveLeft => self.left = true,
            Action::MoveRight => self.right = true,
            Action::Jump => self.jump = true,
            Action::Pause if !repeat => self.pause_requested = true,
            Action::Fullscreen if !repeat => self.fullscreen_requested = true,
            Action::Autopilot if !repeat => {
                self.autopilot = !self.autopilot;
                log::info!("Autopilot: {}", self.autopilot);
            }
            Action::Pause | Action::Fullscreen | Action::Autopilot => {}
        }
        Some(action)
    }

    pub fn key_up(&mut self, code: &str) -> Option<Action> {
        let action = Action::from_code(code)?;
        match action {
            Action::MoveForward => self.forward = false,
            Action::MoveBack => self.back = false,
            Action::MoveLeft => self.left = false,
            Action::MoveRight => self.right = false,
            Action::Jump => self.jump = false,
            Action::Pause | Action::Fullscreen | Action::Autopilot => {}
        }
        Some(action)
    }

    /// Queue a pause toggle from outside the keyboard (menu button, tab hidden)
    pub fn request_pause(&mut self) {
        self.pause_requested = true;
    }

    /// Take a pending fullscreen toggle
    pub fn take_fullscreen(&mut self) -> bool {
        std::mem::take(&mut self.fullscreen_requested)
    }

    /// Forget held keys; keyup events are lost while the window is unfocused
    pub fn release_all(&mut self) {
        self.forward = false;
        self.back = false;
        self.left = false;
        self.right = false;
        self.jump = false;
    }

    /// Flags for the next tick
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            forward: self.forward,
            back: self.back,
            left: self.left,
            right: self.right,
            jump: self.jump,
            pause: self.pause_requested,
        }
    }

    /// Clear one-shot inputs after a frame consumed them
    pub fn clear_one_shots(&mut self) {
        self.pause_requested = false;
    }
}
