//! Player / falling entity collision
//!
//! Only entities inside a narrow vertical band near the player's row are
//! tested, and at most one hit is resolved per frame.

use crate::consts::{COLLISION_BAND_BOTTOM, COLLISION_BAND_TOP};
use crate::tuning::Tuning;

use super::state::{EntityKind, FallingEntity, GameState, SessionMode};

/// A resolved hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub id: u32,
    pub kind: EntityKind,
    /// This hit took the last life
    pub game_over: bool,
}

/// Whether an entity sits in the player's row and overlaps it horizontally
pub fn overlaps(entity: &FallingEntity, player_x: f32, tuning: &Tuning) -> bool {
    let player_half = tuning.player_half_width;
    let entity_half = entity.kind.half_width(tuning);
    let (x, y) = (entity.pos.x, entity.pos.y);

    let in_band = y > COLLISION_BAND_TOP && y < COLLISION_BAND_BOTTOM;
    let in_box = x > player_x - entity_half && x < player_x + player_half;
    let close = (x - player_x).abs() < (player_half + entity_half) / 2.0;

    in_band && in_box && close
}

/// Find, consume and apply the first overlapping entity.
///
/// The id enters `state.consumed` before its effect is applied, so the same
/// entity can never count twice even if it is examined again.
pub fn resolve_collision(state: &mut GameState, player_x: f32, tuning: &Tuning) -> Option<Collision> {
    let index = state
        .entities
        .iter()
        .position(|e| !state.consumed.contains(&e.id) && overlaps(e, player_x, tuning))?;

    let entity = state.entities.remove(index);
    state.consumed.insert(entity.id);

    let mut game_over = false;
    match entity.kind {
        EntityKind::Collectible => state.score += 1,
        EntityKind::Hazard => {
            state.lives = state.lives.saturating_sub(1);
            if state.lives == 0 {
                state.mode = SessionMode::GameOver;
                game_over = true;
            }
        }
        EntityKind::BonusLife => state.lives += 1,
    }

    log::debug!(
        "Collision with {:?} #{} (score {}, lives {})",
        entity.kind,
        entity.id,
        state.score,
        state.lives
    );

    Some(Collision {
        id: entity.id,
        kind: entity.kind,
        game_over,
    })
}
