//! Collision detection between the player and obstacle columns
//!
//! Both shapes are axis-aligned boxes with closed edges, so touching counts
//! as a hit. Nothing is cached: every tick tests every live obstacle.
//!
//! The render pass also writes obstacle X/Y, possibly from an older frame.
//! Positioning and testing therefore happen in one critical section.

use glam::DVec2;

use super::kinematics::Player;
use super::obstacle::{ObstacleGeometry, ObstaclePair};
use super::state::WorldBounds;
use crate::consts::*;

/// Axis-aligned box, `min` is the top-left corner (screen coordinates)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec2,
    pub max: DVec2,
}

impl Aabb {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// The player's 16x16 box anchored at its top-left
    pub fn player(player: &Player) -> Self {
        let size = PLAYER_SPRITE_SIZE as f64;
        Self::new(player.position(), player.position() + DVec2::splat(size))
    }

    /// An obstacle column: `[x, x + 32]` wide, growing up from its anchor
    /// by the rendered height.
    pub fn obstacle(g: &ObstacleGeometry) -> Self {
        Self::new(
            DVec2::new(g.x, g.y - g.rendered_height),
            DVec2::new(g.x + OBSTACLE_SEGMENT_WIDTH as f64, g.y),
        )
    }

    /// Both axis ranges must overlap
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

/// Result of testing the player against the obstacle set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Spawn index of the pair that was hit
    pub pair_index: u64,
    /// Obstacle geometry as observed under the guard
    pub geometry: ObstacleGeometry,
}

/// Scroll every obstacle to `ticks` and test it against the player.
///
/// X and Y are written and the overlap is tested while the obstacle's guard
/// is held, so the test always sees this tick's position together with the
/// rendered height of the last completed render pass. Testing stops at the
/// first hit; the remaining obstacles are still scrolled.
pub fn first_hit(
    player: &Player,
    pairs: &[ObstaclePair],
    world: &WorldBounds,
    ticks: u64,
) -> Option<CollisionResult> {
    let body = Aabb::player(player);
    let anchor = world.obstacle_anchor_y();
    let mut hit = None;

    for pair in pairs {
        let x = pair.x_at(world, ticks);
        for obstacle in pair.members() {
            obstacle.geometry.write(|g| {
                g.x = x;
                g.y = anchor;
                if hit.is_none() && body.intersects(&Aabb::obstacle(g)) {
                    hit = Some(CollisionResult {
                        pair_index: pair.index,
                        geometry: *g,
                    });
                }
            });
        }
    }
    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetKey, AssetSource, MemoryAssets};
    use crate::sim::obstacle::Obstacle;

    const WORLD: WorldBounds = WorldBounds {
        width: 800,
        height: 568,
    };
    // pair 0 sits at x = 100 on this tick, later pairs 96 further right
    const TICKS: u64 = 700;

    fn pair(index: u64, rendered_height: f64) -> ObstaclePair {
        let sprite = MemoryAssets::headless(800, 568)
            .sprite(AssetKey::ObstacleSheet)
            .unwrap();
        let bottom = Obstacle::new(32, sprite);
        bottom.geometry.write(|g| g.rendered_height = rendered_height);
        ObstaclePair {
            index,
            bottom,
            top: None,
        }
    }

    fn player_at(x: f64, y: f64) -> Player {
        Player {
            x,
            y,
            velocity: 0.0,
            frame: 0,
        }
    }

    fn hit(player: Player, pairs: &[ObstaclePair]) -> Option<CollisionResult> {
        first_hit(&player, pairs, &WORLD, TICKS)
    }

    #[test]
    fn test_aabb_intersects() {
        let a = Aabb::new(DVec2::ZERO, DVec2::splat(10.0));
        let b = Aabb::new(DVec2::splat(5.0), DVec2::splat(15.0));
        let c = Aabb::new(DVec2::new(11.0, 0.0), DVec2::new(20.0, 10.0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_hit_inside_column() {
        // column spans x 100..132, y 552-64..552
        let pairs = vec![pair(0, 64.0)];
        let result = hit(player_at(110.0, 500.0), &pairs).unwrap();
        assert_eq!(result.pair_index, 0);
        assert_eq!(result.geometry.rendered_height, 64.0);
        assert_eq!(result.geometry.x, 100.0);
        assert_eq!(result.geometry.y, 552.0);
    }

    #[test]
    fn test_touching_edges_hit() {
        let pairs = vec![pair(0, 64.0)];
        // right edge of player exactly on the column's left edge
        assert!(hit(player_at(84.0, 500.0), &pairs).is_some());
        // bottom edge of player exactly on the column's top
        assert!(hit(player_at(110.0, 552.0 - 64.0 - 16.0), &pairs).is_some());
    }

    #[test]
    fn test_near_miss_one_unit_out() {
        let pairs = vec![pair(0, 64.0)];
        // one unit left of the column
        assert!(hit(player_at(83.0, 500.0), &pairs).is_none());
        // one unit right of the column
        assert!(hit(player_at(133.0, 500.0), &pairs).is_none());
        // one unit above the column's top
        assert!(hit(player_at(110.0, 552.0 - 64.0 - 17.0), &pairs).is_none());
    }

    #[test]
    fn test_unrendered_column_is_a_sliver() {
        // before any render pass the rendered height is 0
        let pairs = vec![pair(0, 0.0)];
        assert!(hit(player_at(110.0, 500.0), &pairs).is_none());
        assert!(hit(player_at(110.0, 540.0), &pairs).is_some());
    }

    #[test]
    fn test_stale_position_is_overwritten_before_testing() {
        // a render pass from an older frame left the column at x = 120
        let pairs = vec![pair(0, 64.0)];
        pairs[0].bottom.geometry.write(|g| {
            g.x = 120.0;
            g.y = 552.0;
        });
        // overlaps [120, 152] but not this tick's [100, 132]
        assert!(hit(player_at(140.0, 500.0), &pairs).is_none());
        assert_eq!(pairs[0].bottom.geometry.snapshot().x, 100.0);
    }

    #[test]
    fn test_every_pair_scrolled_after_a_hit() {
        let pairs = vec![pair(0, 64.0), pair(1, 64.0), pair(2, 64.0)];
        let result = hit(player_at(110.0, 520.0), &pairs).unwrap();
        assert_eq!(result.pair_index, 0);
        let xs: Vec<f64> = pairs
            .iter()
            .map(|p| p.bottom.geometry.snapshot().x)
            .collect();
        assert_eq!(xs, vec![100.0, 196.0, 292.0]);
    }
}
