//! Flappy Dusk - a side-scrolling reflex game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, obstacles, collisions, stage)
//! - `renderer`: Render pass producing sprite instances from a frame snapshot
//! - `assets`: Named image/font resources from a directory or memory
//! - `host`: Fixed-timestep harness driving update and render passes
//! - `settings`: Runtime configuration

pub mod assets;
pub mod host;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use assets::{AssetError, AssetKey, AssetSource, DirAssets, FontFace, MemoryAssets, SpriteSheet};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Player sprite is a square of this many logical units
    pub const PLAYER_SPRITE_SIZE: i32 = 16;
    /// Number of frames in the player sprite sheet
    pub const PLAYER_FRAME_COUNT: u8 = 4;

    /// Obstacle sprite segment dimensions
    pub const OBSTACLE_SEGMENT_HEIGHT: i32 = 16;
    pub const OBSTACLE_SEGMENT_WIDTH: i32 = 32;
    /// Horizontal gap between consecutive obstacles at spawn
    pub const OBSTACLE_SPACING: i32 = OBSTACLE_SEGMENT_WIDTH * 3;

    /// Velocity after a jump impulse (negative is up)
    pub const JUMP_VELOCITY: f64 = -10.0;
    /// Velocity gained per tick while falling
    pub const GRAVITY_PER_TICK: f64 = 1.0;
    /// Velocity ceiling
    pub const TERMINAL_VELOCITY: f64 = 20.0;
    /// Tuned integration factor, Y += DAMPING * velocity
    pub const POSITION_DAMPING: f64 = 0.3;
    /// Velocity at session start (small downward drift)
    pub const INITIAL_VELOCITY: f64 = 2.0;

    /// Ambient phase moves one step every this many ticks
    pub const AMBIENT_STEP_TICKS: u64 = 50;
    pub const AMBIENT_PHASE_MAX: i32 = 100;

    /// Player animation advances every this many ticks
    pub const ANIMATION_STEP_TICKS: u64 = 10;
}

use consts::*;

/// Player tilt in radians for a given vertical velocity
#[inline]
pub fn tilt_angle(velocity: f64) -> f64 {
    velocity * 6.0 / 96.0 * std::f64::consts::PI / 6.0
}

/// Horizontal scroll position of the obstacle spawned at `index` after `ticks`
///
/// Every obstacle shares the same leftward scroll; spacing comes from the
/// spawn index alone.
#[inline]
pub fn scroll_x(world_width: i32, index: u64, ticks: u64) -> f64 {
    world_width as f64 + index as f64 * OBSTACLE_SPACING as f64 - ticks as f64
}
