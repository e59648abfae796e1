//! Obstacle stream
//!
//! Obstacles are appended one at a time as the newest one scrolls into view.
//! Horizontal position is never integrated; it is recomputed from the spawn
//! index and the tick counter, so every obstacle scrolls in lockstep.
//!
//! The (X, Y, rendered height) triple is shared with the render pass, which
//! runs on another thread. It is only reachable through `SharedGeometry`,
//! whose closures hold the guard for the full critical section.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::Rng;

use super::state::WorldBounds;
use crate::assets::{AssetError, AssetKey, AssetSource, SpriteSheet};
use crate::consts::*;
use crate::scroll_x;

/// Geometry shared between the update and render passes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ObstacleGeometry {
    pub x: f64,
    /// Vertical anchor (bottom of the drawn column)
    pub y: f64,
    /// Height drawn by the last completed render pass
    pub rendered_height: f64,
}

/// Guarded handle to an obstacle's geometry
#[derive(Debug, Clone, Default)]
pub struct SharedGeometry(Arc<Mutex<ObstacleGeometry>>);

impl SharedGeometry {
    fn lock(&self) -> MutexGuard<'_, ObstacleGeometry> {
        // plain data, recover from poisoning
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read under the guard
    pub fn read<R>(&self, f: impl FnOnce(&ObstacleGeometry) -> R) -> R {
        f(&self.lock())
    }

    /// Mutate under the guard; the guard is held until `f` returns
    pub fn write<R>(&self, f: impl FnOnce(&mut ObstacleGeometry) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn snapshot(&self) -> ObstacleGeometry {
        *self.lock()
    }
}

/// One drawn column
#[derive(Debug, Clone)]
pub struct Obstacle {
    /// Logical height in units, drawn as `height / 16` body segments
    pub height: i32,
    pub sprite: SpriteSheet,
    pub geometry: SharedGeometry,
}

impl Obstacle {
    pub fn new(height: i32, sprite: SpriteSheet) -> Self {
        Self {
            height,
            sprite,
            geometry: SharedGeometry::default(),
        }
    }
}

/// A spawned barrier unit. Only the bottom member is ever populated;
/// `top` is reserved and stays `None`.
#[derive(Debug, Clone)]
pub struct ObstaclePair {
    /// Spawn sequence number; drives the horizontal position
    pub index: u64,
    pub bottom: Obstacle,
    pub top: Option<Obstacle>,
}

impl ObstaclePair {
    /// Scrolled X for this pair at `ticks`
    pub fn x_at(&self, world: &WorldBounds, ticks: u64) -> f64 {
        scroll_x(world.width, self.index, ticks)
    }

    /// Populated members, bottom first
    pub fn members(&self) -> impl Iterator<Item = &Obstacle> {
        std::iter::once(&self.bottom).chain(self.top.as_ref())
    }
}

/// Ordered, append-only (unless retirement is enabled) obstacle sequence
#[derive(Debug, Default)]
pub struct ObstacleStream {
    pairs: Vec<ObstaclePair>,
    spawned: u64,
    retire_offscreen: bool,
}

impl ObstacleStream {
    pub fn new(retire_offscreen: bool) -> Self {
        Self {
            pairs: Vec::new(),
            spawned: 0,
            retire_offscreen,
        }
    }

    pub fn pairs(&self) -> &[ObstaclePair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Total pairs ever spawned (equals `len()` unless retirement is on)
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    /// A new pair is due when there is none, or the newest one has started
    /// entering the viewport from the right.
    pub fn needs_spawn(&self, world: &WorldBounds, ticks: u64) -> bool {
        match self.pairs.last() {
            None => true,
            Some(last) => last.x_at(world, ticks) < world.width as f64,
        }
    }

    /// Append exactly one pair with a random height in
    /// `[16, world.height / 2 + 16)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the obstacle sprite cannot be acquired; the
    /// stream is left unchanged.
    pub fn spawn<R: Rng>(
        &mut self,
        world: &WorldBounds,
        rng: &mut R,
        assets: &dyn AssetSource,
    ) -> Result<&ObstaclePair, AssetError> {
        let sprite = assets.sprite(AssetKey::ObstacleSheet)?;
        let height = rng.random_range(0..(world.height / 2).max(1)) + OBSTACLE_SEGMENT_HEIGHT;

        let index = self.spawned;
        self.spawned += 1;
        log::debug!("Spawned obstacle {} (height {})", index, height);

        self.pairs.push(ObstaclePair {
            index,
            bottom: Obstacle::new(height, sprite),
            top: None,
        });
        Ok(&self.pairs[self.pairs.len() - 1])
    }

    /// Spawn if due. Returns whether a pair was appended.
    ///
    /// # Errors
    ///
    /// Propagates sprite acquisition failure.
    pub fn maybe_spawn<R: Rng>(
        &mut self,
        world: &WorldBounds,
        ticks: u64,
        rng: &mut R,
        assets: &dyn AssetSource,
    ) -> Result<bool, AssetError> {
        if !self.needs_spawn(world, ticks) {
            return Ok(false);
        }
        self.spawn(world, rng, assets)?;
        Ok(true)
    }

    /// Drop pairs whose right edge has passed the left of the viewport.
    /// No-op unless retirement was enabled. Returns the number dropped.
    pub fn retire(&mut self, world: &WorldBounds, ticks: u64) -> usize {
        if !self.retire_offscreen {
            return 0;
        }
        let before = self.pairs.len();
        // Pairs scroll in spawn order, so the off-screen ones are a prefix.
        // Keep the newest pair regardless so the spawn check has a reference.
        let gone = self
            .pairs
            .iter()
            .take(before.saturating_sub(1))
            .take_while(|p| p.x_at(world, ticks) + (OBSTACLE_SEGMENT_WIDTH as f64) < 0.0)
            .count();
        self.pairs = self.pairs.split_off(gone);
        if gone > 0 {
            log::debug!("Retired {} off-screen obstacles", gone);
        }
        gone
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn world() -> WorldBounds {
        WorldBounds::new(800, 568)
    }

    #[test]
    fn test_first_spawn_when_empty() {
        let mut stream = ObstacleStream::new(false);
        let mut rng = Pcg32::seed_from_u64(1);
        let assets = MemoryAssets::headless(800, 568);

        assert!(stream.needs_spawn(&world(), 0));
        assert!(stream.maybe_spawn(&world(), 0, &mut rng, &assets).unwrap());
        assert_eq!(stream.len(), 1);
        assert_eq!(stream.pairs()[0].x_at(&world(), 0), 800.0);
        assert!(stream.pairs()[0].top.is_none());
    }

    #[test]
    fn test_spawn_cadence() {
        let world = world();
        let mut stream = ObstacleStream::new(false);
        let mut rng = Pcg32::seed_from_u64(2);
        let assets = MemoryAssets::headless(800, 568);

        let mut spawn_ticks = Vec::new();
        for t in 0..200 {
            if stream.maybe_spawn(&world, t, &mut rng, &assets).unwrap() {
                spawn_ticks.push(t);
            }
        }
        // index 0 at t=0, index 1 as soon as index 0 moved in, then every 96
        assert_eq!(spawn_ticks, vec![0, 1, 97, 193]);
    }

    #[test]
    fn test_height_bounds() {
        let world = world();
        let mut stream = ObstacleStream::new(false);
        let mut rng = Pcg32::seed_from_u64(3);
        let assets = MemoryAssets::headless(800, 568);
        for _ in 0..500 {
            stream.spawn(&world, &mut rng, &assets).unwrap();
        }
        for pair in stream.pairs() {
            assert!(pair.bottom.height >= 16);
            assert!(pair.bottom.height < 568 / 2 + 16);
        }
    }

    #[test]
    fn test_spawn_failure_leaves_stream_unchanged() {
        let mut assets = MemoryAssets::headless(800, 568);
        assets.remove(AssetKey::ObstacleSheet);
        let mut stream = ObstacleStream::new(false);
        let mut rng = Pcg32::seed_from_u64(4);

        let result = stream.maybe_spawn(&world(), 0, &mut rng, &assets);
        assert!(matches!(result, Err(AssetError::NotFound(_))));
        assert!(stream.is_empty());
        assert_eq!(stream.spawned(), 0);
    }

    #[test]
    fn test_x_follows_spawn_index() {
        let world = world();
        let mut stream = ObstacleStream::new(false);
        let mut rng = Pcg32::seed_from_u64(5);
        let assets = MemoryAssets::headless(800, 568);
        stream.spawn(&world, &mut rng, &assets).unwrap();
        stream.spawn(&world, &mut rng, &assets).unwrap();

        assert_eq!(stream.pairs()[0].x_at(&world, 801), -1.0);
        assert_eq!(stream.pairs()[1].x_at(&world, 801), 95.0);
    }

    #[test]
    fn test_no_retirement_by_default() {
        let world = world();
        let mut stream = ObstacleStream::new(false);
        let mut rng = Pcg32::seed_from_u64(6);
        let assets = MemoryAssets::headless(800, 568);
        stream.spawn(&world, &mut rng, &assets).unwrap();
        stream.spawn(&world, &mut rng, &assets).unwrap();
        assert_eq!(stream.retire(&world, 10_000), 0);
        assert_eq!(stream.len(), 2);
    }

    #[test]
    fn test_retirement_keeps_index_positions() {
        let world = world();
        let mut stream = ObstacleStream::new(true);
        let mut rng = Pcg32::seed_from_u64(7);
        let assets = MemoryAssets::headless(800, 568);
        for _ in 0..3 {
            stream.spawn(&world, &mut rng, &assets).unwrap();
        }

        // index 0 right edge at 800 - 832 + 32 = 0: still touching
        assert_eq!(stream.retire(&world, 832), 0);
        // one more tick and it is fully gone
        assert_eq!(stream.retire(&world, 833), 1);
        assert_eq!(stream.len(), 2);
        assert_eq!(stream.spawned(), 3);
        assert_eq!(stream.pairs()[0].index, 1);
        assert_eq!(stream.pairs()[0].x_at(&world, 833), 800.0 + 96.0 - 833.0);
    }
}
