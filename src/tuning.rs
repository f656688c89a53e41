//! Game balance parameters
//!
//! Defaults come from [`crate::consts`]. On the web a JSON override can be
//! stored in LocalStorage; any field it omits keeps its default.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Tunable balance values consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub max_speed: f32,
    pub accel: f32,
    /// Fraction of velocity kept per idle frame
    pub friction: f32,
    pub player_half_width: f32,

    // === Falling entities ===
    pub fall_speed: f32,
    pub collectible_chance: f32,
    pub hazard_half_width: f32,
    pub pickup_half_width: f32,

    // === Spawning ===
    pub spawn_interval_ms: u32,
    pub life_spawn_interval_ms: u32,

    // === Session ===
    pub starting_lives: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_speed: MAX_PLAYER_SPEED,
            accel: PLAYER_ACCEL,
            friction: PLAYER_FRICTION,
            player_half_width: PLAYER_HALF_WIDTH,

            fall_speed: FALL_SPEED,
            collectible_chance: COLLECTIBLE_CHANCE,
            hazard_half_width: HAZARD_HALF_WIDTH,
            pickup_half_width: PICKUP_HALF_WIDTH,

            spawn_interval_ms: SPAWN_INTERVAL_MS,
            life_spawn_interval_ms: LIFE_SPAWN_INTERVAL_MS,

            starting_lives: STARTING_LIVES,
        }
    }
}

impl Tuning {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "mining_rush_tuning";

    /// Parse and validate a JSON override
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive number",
                })
            }
        }

        positive("max_speed", self.max_speed)?;
        positive("accel", self.accel)?;
        positive("player_half_width", self.player_half_width)?;
        positive("fall_speed", self.fall_speed)?;
        positive("hazard_half_width", self.hazard_half_width)?;
        positive("pickup_half_width", self.pickup_half_width)?;

        // Each entity must be sampled at least once inside the open hit band
        if self.fall_speed >= COLLISION_BAND_BOTTOM - COLLISION_BAND_TOP {
            return Err(TuningError::Invalid {
                field: "fall_speed",
                reason: "must be narrower than the collision band",
            });
        }
        if !(0.0..1.0).contains(&self.friction) {
            return Err(TuningError::Invalid {
                field: "friction",
                reason: "must be in [0, 1)",
            });
        }
        if !(0.0..=1.0).contains(&self.collectible_chance) {
            return Err(TuningError::Invalid {
                field: "collectible_chance",
                reason: "must be in [0, 1]",
            });
        }
        if self.spawn_interval_ms == 0 || self.life_spawn_interval_ms == 0 {
            return Err(TuningError::Invalid {
                field: "spawn_interval_ms",
                reason: "timer periods must be non-zero",
            });
        }
        if self.starting_lives == 0 {
            return Err(TuningError::Invalid {
                field: "starting_lives",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning override from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring tuning override: {}", e),
                }
            }
        }

        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
