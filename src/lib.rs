//! Mining Rush - A falling-gem arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (input, motion, spawning, collisions, session state)
//! - `session`: Owns a running game plus its frame loop and spawn timers
//! - `platform`: Browser/headless scheduling abstraction
//! - `analytics`: Named gameplay events for an external sink
//! - `tuning`: Data-driven game balance

pub mod analytics;
pub mod characters;
pub mod error;
pub mod platform;
pub mod session;
pub mod sim;
pub mod tuning;

pub use analytics::{AnalyticsEvent, AnalyticsSink, LogSink};
pub use characters::{Character, Roster};
pub use error::{SessionError, TuningError};
pub use session::{GameOverSummary, Session};
pub use tuning::Tuning;

/// Game configuration constants
///
/// All distances are percent of the play field; speeds are per rendered frame.
pub mod consts {
    /// Play field extent on both axes
    pub const FIELD_MIN: f32 = 0.0;
    pub const FIELD_MAX: f32 = 100.0;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 50.0;
    pub const PLAYER_HALF_WIDTH: f32 = 5.0;
    /// Maximum player speed (Vmax)
    pub const MAX_PLAYER_SPEED: f32 = 1.5;
    /// Velocity added per frame while a direction is held
    pub const PLAYER_ACCEL: f32 = 0.025;
    /// Velocity multiplier per frame with no input
    pub const PLAYER_FRICTION: f32 = 0.25;
    /// Speeds below this snap to zero
    pub const VELOCITY_EPSILON: f32 = 0.01;
    /// Target-seeking stops within this distance
    pub const ARRIVAL_THRESHOLD: f32 = 0.5;
    /// Cap on the seeking speed, as a multiple of Vmax
    pub const SEEK_SPEED_CAP: f32 = 1.2;

    /// Falling entities
    pub const FALL_SPEED: f32 = 0.5;
    pub const SPAWN_Y: f32 = -10.0;
    pub const CULL_Y: f32 = 110.0;
    pub const SPAWN_X_MIN: f32 = 5.0;
    pub const SPAWN_X_MAX: f32 = 95.0;
    pub const COLLECTIBLE_CHANCE: f32 = 0.7;
    pub const HAZARD_HALF_WIDTH: f32 = 2.5;
    pub const PICKUP_HALF_WIDTH: f32 = 3.0;

    /// Vertical collision band (exclusive on both ends)
    pub const COLLISION_BAND_TOP: f32 = 88.0;
    pub const COLLISION_BAND_BOTTOM: f32 = 92.0;

    /// Spawn timer periods
    pub const SPAWN_INTERVAL_MS: u32 = 500;
    pub const LIFE_SPAWN_INTERVAL_MS: u32 = 15_000;

    pub const STARTING_LIVES: u32 = 3;
}

/// Clamp a coordinate into the play field
#[inline]
pub fn clamp_to_field(x: f32) -> f32 {
    x.clamp(consts::FIELD_MIN, consts::FIELD_MAX)
}
