//! Player kinematics
//!
//! Vertical motion only: the world scrolls past a player whose X never
//! changes after spawn.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// The player body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    /// Vertical velocity, positive is down
    pub velocity: f64,
    /// Animation frame, 0..PLAYER_FRAME_COUNT
    pub frame: u8,
}

impl Player {
    /// Spawn a third of the way across and just above the vertical middle
    pub fn spawn(world_width: i32, world_height: i32) -> Self {
        Self {
            x: world_width as f64 / 3.0,
            y: (world_height / 2) as f64 - PLAYER_SPRITE_SIZE as f64,
            velocity: INITIAL_VELOCITY,
            frame: 0,
        }
    }

    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// One tick of motion. An impulse replaces the velocity outright;
    /// otherwise gravity accumulates up to the terminal ceiling. Position
    /// integrates the already-updated velocity.
    pub fn step(&mut self, impulse: bool) {
        self.velocity = if impulse {
            JUMP_VELOCITY
        } else {
            (self.velocity + GRAVITY_PER_TICK).min(TERMINAL_VELOCITY)
        };
        self.y += POSITION_DAMPING * self.velocity;
    }

    /// True once the player has left the playable band.
    ///
    /// The lower bound is compared against the world *width*, not its
    /// height.
    pub fn out_of_bounds(&self, world_width: i32) -> bool {
        self.y > world_width as f64 || self.y < -(PLAYER_SPRITE_SIZE as f64)
    }

    /// Advance the sprite sheet frame, wrapping after the last one
    pub fn advance_frame(&mut self) {
        self.frame = (self.frame + 1) % PLAYER_FRAME_COUNT;
    }

    /// Rotation used when drawing, derived from velocity
    pub fn tilt(&self) -> f64 {
        crate::tilt_angle(self.velocity)
    }
}
