//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One call to `tick` per rendered frame, fixed per-frame speeds
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod input;
pub mod motion;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Collision, overlaps, resolve_collision};
pub use input::{Control, Desire, InputState, is_pause_key, key_direction};
pub use motion::seek_tier;
pub use spawn::{SpawnTimer, spawn_for_timer};
pub use state::{Direction, EntityKind, FallingEntity, GameState, Player, SessionMode};
pub use tick::{FrameReport, step_entities, tick};
