//! Input aggregation
//!
//! Keyboard keys, on-screen direction buttons and a pointer/touch target are
//! collapsed into one [`Desire`] per frame. Held directions always win over
//! the pointer, and pressing one cancels any pending target.

use crate::clamp_to_field;
use crate::consts::ARRIVAL_THRESHOLD;

use super::state::Direction;

/// What the player wants to do this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Desire {
    /// A direction key or button is held
    Held(Direction),
    /// Move toward a pointer target that is still out of reach
    Seek { target: f32 },
    /// A pointer target exists and the player is on it
    Arrived,
    /// No input at all
    Idle,
}

/// Discrete movement sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Key(Direction),
    Button(Direction),
}

/// Raw input accumulated between frames
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub key_left: bool,
    pub key_right: bool,
    pub button_left: bool,
    pub button_right: bool,
    /// Pointer/touch target x (field percent)
    pub target: Option<f32>,
}

/// Map a DOM `KeyboardEvent.key` to a movement direction
pub fn key_direction(key: &str) -> Option<Direction> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(Direction::Left),
        "ArrowRight" | "d" | "D" => Some(Direction::Right),
        _ => None,
    }
}

/// Whether a DOM key toggles pause
pub fn is_pause_key(key: &str) -> bool {
    key == " "
}

impl InputState {
    /// Press a discrete control; cancels target-seeking
    pub fn press(&mut self, control: Control) {
        *self.flag(control) = true;
        self.target = None;
    }

    pub fn release(&mut self, control: Control) {
        *self.flag(control) = false;
    }

    fn flag(&mut self, control: Control) -> &mut bool {
        match control {
            Control::Key(Direction::Left) => &mut self.key_left,
            Control::Key(Direction::Right) => &mut self.key_right,
            Control::Button(Direction::Left) => &mut self.button_left,
            Control::Button(Direction::Right) => &mut self.button_right,
        }
    }

    /// Record a pointer/touch target
    pub fn point_at(&mut self, x: f32) {
        if x.is_finite() {
            self.target = Some(clamp_to_field(x));
        }
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// Currently held direction, Left taking precedence
    pub fn held(&self) -> Option<Direction> {
        if self.key_left || self.button_left {
            Some(Direction::Left)
        } else if self.key_right || self.button_right {
            Some(Direction::Right)
        } else {
            None
        }
    }

    /// Collapse all sources into this frame's desire
    pub fn desire(&self, player_x: f32) -> Desire {
        if let Some(direction) = self.held() {
            return Desire::Held(direction);
        }
        match self.target {
            Some(target) if (target - player_x).abs() > ARRIVAL_THRESHOLD => {
                Desire::Seek { target }
            }
            Some(_) => Desire::Arrived,
            None => Desire::Idle,
        }
    }

    /// Let go of the on-screen buttons; their release events may never
    /// arrive once the game stops playing
    pub fn release_buttons(&mut self) {
        self.button_left = false;
        self.button_right = false;
    }

    /// Drop everything (new game)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
