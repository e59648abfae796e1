//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - One call to `tick` per frame, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod ambient;
pub mod clock;
pub mod collision;
pub mod kinematics;
pub mod obstacle;
pub mod state;
pub mod tick;

pub use ambient::AmbientCycle;
pub use clock::TickCounter;
pub use collision::{Aabb, CollisionResult, first_hit};
pub use kinematics::Player;
pub use obstacle::{Obstacle, ObstacleGeometry, ObstaclePair, ObstacleStream, SharedGeometry};
pub use state::{BackgroundLayer, GameState, Stage, StartupAssets, WorldBounds};
pub use tick::{SimError, TickEvents, TickInput, TickOutcome, tick};
