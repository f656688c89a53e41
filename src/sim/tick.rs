//! Per-frame simulation step
//!
//! One call advances the game by exactly one rendered frame.

use crate::consts::CULL_Y;
use crate::tuning::Tuning;

use super::collision::{Collision, resolve_collision};
use super::input::{Desire, InputState};
use super::state::GameState;

/// Outcome of a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Entities that fell off the bottom
    pub culled: usize,
    pub collision: Option<Collision>,
}

/// Move every falling entity down one frame and drop the ones that left the
/// field or were already consumed. Returns how many fell off.
pub fn step_entities(state: &mut GameState, tuning: &Tuning) -> usize {
    for entity in &mut state.entities {
        entity.pos.y += tuning.fall_speed;
    }

    let before = state.entities.len();
    state.entities.retain(|e| e.pos.y < CULL_Y);
    let culled = before - state.entities.len();

    let consumed = &state.consumed;
    state.entities.retain(|e| !consumed.contains(&e.id));

    culled
}

/// Advance the game by one frame.
///
/// Collision uses the player position from the end of the previous frame,
/// so input shows up in hit tests one frame late. Does nothing unless the
/// session is playing.
pub fn tick(state: &mut GameState, input: &mut InputState, tuning: &Tuning) -> Option<FrameReport> {
    if !state.is_running() {
        log::debug!("Ignoring stale frame in {:?}", state.mode);
        return None;
    }

    state.frames += 1;
    let hit_x = state.player.x;

    let desire = input.desire(state.player.x);
    match desire {
        Desire::Held(_) | Desire::Arrived => input.clear_target(),
        Desire::Seek { .. } | Desire::Idle => {}
    }
    state.player.integrate(desire, tuning);

    let culled = step_entities(state, tuning);
    let collision = resolve_collision(state, hit_x, tuning);

    Some(FrameReport { culled, collision })
}
