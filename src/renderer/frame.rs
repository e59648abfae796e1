//! Frame snapshot handed from the update pass to the render pass
//!
//! Everything except obstacle geometry is copied, so the render side has
//! nothing it could write back into the simulation. Obstacle geometry is
//! shared through its guard.

use crate::sim::{AmbientCycle, GameState, Player, SharedGeometry, Stage, WorldBounds};

/// Render-side view of one obstacle
#[derive(Debug, Clone)]
pub struct ObstacleView {
    pub index: u64,
    pub height: i32,
    pub geometry: SharedGeometry,
}

#[derive(Debug, Clone)]
pub struct RenderFrame {
    pub world: WorldBounds,
    pub ticks: u64,
    pub stage: Stage,
    pub player: Player,
    pub ambient: AmbientCycle,
    pub verbose: bool,
    pub background_count: usize,
    pub layer_width: i32,
    pub obstacles: Vec<ObstacleView>,
}

impl RenderFrame {
    pub fn capture(state: &GameState) -> Self {
        let obstacles = state
            .obstacles
            .pairs()
            .iter()
            .flat_map(|pair| {
                pair.members().map(|o| ObstacleView {
                    index: pair.index,
                    height: o.height,
                    geometry: o.geometry.clone(),
                })
            })
            .collect();

        Self {
            world: state.world,
            ticks: state.ticks(),
            stage: state.stage,
            player: state.player,
            ambient: state.ambient,
            verbose: state.verbose,
            background_count: state.backgrounds.len(),
            layer_width: state.backgrounds.first().map_or(state.world.width, |l| l.width()),
            obstacles,
        }
    }
}
