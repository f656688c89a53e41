//! Entity spawning
//!
//! Two periodic timers feed the play field. Their scheduling lives with the
//! session; this module only decides what a timer firing produces.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{SPAWN_X_MAX, SPAWN_X_MIN};
use crate::tuning::Tuning;

use super::state::{EntityKind, GameState};

/// The two independent spawn timers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnTimer {
    /// Gem or rock, every 500 ms by default
    Falling,
    /// Extra life, every 15 s by default
    BonusLife,
}

impl SpawnTimer {
    pub const ALL: [SpawnTimer; 2] = [SpawnTimer::Falling, SpawnTimer::BonusLife];

    pub fn period_ms(self, tuning: &Tuning) -> u32 {
        match self {
            SpawnTimer::Falling => tuning.spawn_interval_ms,
            SpawnTimer::BonusLife => tuning.life_spawn_interval_ms,
        }
    }
}

/// Handle one timer firing. Returns the new entity id, or `None` when the
/// session is not playing (stale timer callback).
pub fn spawn_for_timer(state: &mut GameState, timer: SpawnTimer, tuning: &Tuning) -> Option<u32> {
    if !state.is_running() {
        log::debug!("Ignoring stale {:?} spawn in {:?}", timer, state.mode);
        return None;
    }

    let kind = match timer {
        SpawnTimer::Falling => {
            if state.rng.random::<f32>() < tuning.collectible_chance {
                EntityKind::Collectible
            } else {
                EntityKind::Hazard
            }
        }
        SpawnTimer::BonusLife => EntityKind::BonusLife,
    };
    let x = state.rng.random_range(SPAWN_X_MIN..SPAWN_X_MAX);

    Some(state.spawn(kind, x))
}
