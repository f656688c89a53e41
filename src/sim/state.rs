//! Game state and core simulation types

use std::collections::BTreeSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

/// Session mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionMode {
    /// Mounted, no game started yet
    #[default]
    Idle,
    /// Active gameplay (frame loop and spawn timers running)
    Playing,
    /// Frozen mid-game
    Paused,
    /// Lives ran out
    GameOver,
}

/// Facing direction of the player sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl Direction {
    /// Unit sign along the x axis
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// Falling entity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Gem: +1 score
    Collectible,
    /// Rock: -1 life
    Hazard,
    /// Heart: +1 life
    BonusLife,
}

impl EntityKind {
    /// Horizontal half-width used by the collision test
    pub fn half_width(self, tuning: &Tuning) -> f32 {
        match self {
            EntityKind::Hazard => tuning.hazard_half_width,
            EntityKind::Collectible | EntityKind::BonusLife => tuning.pickup_half_width,
        }
    }
}

/// Something falling down the play field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingEntity {
    pub id: u32,
    /// Percent of field width (x) and height (y)
    pub pos: Vec2,
    pub kind: EntityKind,
}

/// The player's sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    pub direction: Direction,
    pub velocity: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: PLAYER_START_X,
            direction: Direction::Right,
            velocity: 0.0,
        }
    }
}

/// Complete state of one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub score: u32,
    pub lives: u32,
    pub mode: SessionMode,
    pub player: Player,
    /// Falling entities in ascending id order
    pub entities: Vec<FallingEntity>,
    /// Ids already resolved by a collision this session
    pub consumed: BTreeSet<u32>,
    /// Frames simulated while playing
    pub frames: u64,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Fresh state as mounted, before any game starts
    pub fn idle(seed: u64, tuning: &Tuning) -> Self {
        Self {
            seed,
            score: 0,
            lives: tuning.starting_lives,
            mode: SessionMode::Idle,
            player: Player::default(),
            entities: Vec::new(),
            consumed: BTreeSet::new(),
            frames: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 0,
        }
    }

    /// Fresh state of a newly started game
    pub fn new_game(seed: u64, tuning: &Tuning) -> Self {
        Self {
            mode: SessionMode::Playing,
            ..Self::idle(seed, tuning)
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Push a new entity at the spawn line
    pub fn spawn(&mut self, kind: EntityKind, x: f32) -> u32 {
        let id = self.next_entity_id();
        self.entities.push(FallingEntity {
            id,
            pos: Vec2::new(x, SPAWN_Y),
            kind,
        });
        id
    }

    /// Whether the frame loop and spawners should be running
    pub fn is_running(&self) -> bool {
        self.mode == SessionMode::Playing
    }

    pub fn entity(&self, id: u32) -> Option<&FallingEntity> {
        self.entities.iter().find(|e| e.id == id)
    }
}
