//! Player motion integration
//!
//! Per-frame constants, not delta-time corrected: one call is one rendered frame.

use crate::clamp_to_field;
use crate::consts::{SEEK_SPEED_CAP, VELOCITY_EPSILON};
use crate::tuning::Tuning;

use super::input::Desire;
use super::state::{Direction, Player};

/// Speed multiplier (of Vmax) for a remaining seek distance
pub fn seek_tier(distance: f32) -> f32 {
    if distance > 25.0 {
        1.2
    } else if distance > 15.0 {
        1.0
    } else if distance > 8.0 {
        0.85
    } else if distance > 3.0 {
        0.7
    } else {
        0.5
    }
}

impl Player {
    /// Advance velocity and position by one frame
    pub fn integrate(&mut self, desire: Desire, tuning: &Tuning) {
        let max_speed = tuning.max_speed;
        let mut velocity = self.velocity;

        match desire {
            Desire::Held(direction) => {
                velocity += direction.sign() * tuning.accel;
                self.direction = direction;
            }
            Desire::Seek { target } => {
                let diff = target - self.x;
                let speed = (max_speed * seek_tier(diff.abs())).min(max_speed * SEEK_SPEED_CAP);
                velocity = diff.signum() * speed;
                self.direction = if diff < 0.0 {
                    Direction::Left
                } else {
                    Direction::Right
                };
            }
            Desire::Arrived | Desire::Idle => {
                velocity *= tuning.friction;
            }
        }

        velocity = velocity.clamp(-max_speed, max_speed);
        if velocity.abs() < VELOCITY_EPSILON || !velocity.is_finite() {
            velocity = 0.0;
        }

        self.velocity = velocity;
        self.x = clamp_to_field(self.x + velocity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_friction_decay() {
        let tuning = Tuning::default();
        let mut player = Player {
            velocity: MAX_PLAYER_SPEED,
            ..Default::default()
        };

        let mut prev = player.velocity;
        let mut frames = 0;
        while player.velocity != 0.0 {
            player.integrate(Desire::Idle, &tuning);
            if player.velocity != 0.0 {
                assert!((player.velocity - prev * PLAYER_FRICTION).abs() < 1e-6);
            } else {
                assert!((prev * PLAYER_FRICTION).abs() < VELOCITY_EPSILON);
            }
            prev = player.velocity;
            frames += 1;
            assert!(frames < 10, "velocity should settle quickly");
        }
        // 1.5 -> 0.375 -> 0.09375 -> 0.0234 -> snap
        assert_eq!(frames, 4);
    }

    #[test]
    fn test_held_accelerates_and_faces() {
        let tuning = Tuning::default();
        let mut player = Player::default();
        player.integrate(Desire::Held(Direction::Left), &tuning);
        assert!((player.velocity + PLAYER_ACCEL).abs() < 1e-6);
        assert_eq!(player.direction, Direction::Left);
        assert!(player.x < PLAYER_START_X);
    }

    #[test]
    fn test_held_clamps_at_max_speed() {
        let tuning = Tuning::default();
        let mut player = Player::default();
        for _ in 0..200 {
            player.integrate(Desire::Held(Direction::Right), &tuning);
        }
        assert_eq!(player.velocity, MAX_PLAYER_SPEED);
        assert_eq!(player.x, FIELD_MAX);
    }

    #[test]
    fn test_seek_tiers() {
        let tuning = Tuning::default();
        let cases = [
            (90.0, MAX_PLAYER_SPEED),        // 40 away: 1.2x, clamped to Vmax
            (70.0, MAX_PLAYER_SPEED),        // 20 away: 1.0x
            (40.0, -MAX_PLAYER_SPEED * 0.85), // 10 away: 0.85x
            (55.0, MAX_PLAYER_SPEED * 0.7),  // 5 away: 0.7x
            (48.0, -MAX_PLAYER_SPEED * 0.5), // 2 away: 0.5x
        ];
        for (target, expected) in cases {
            let mut player = Player::default();
            player.integrate(Desire::Seek { target }, &tuning);
            assert!(
                (player.velocity - expected).abs() < 1e-6,
                "target {target}: got {}",
                player.velocity
            );
        }
    }

    #[test]
    fn test_position_clamped_at_left_edge() {
        let tuning = Tuning::default();
        let mut player = Player {
            x: 0.5,
            velocity: -MAX_PLAYER_SPEED,
            direction: Direction::Left,
        };
        player.integrate(Desire::Held(Direction::Left), &tuning);
        assert_eq!(player.x, 0.0);
    }
}
