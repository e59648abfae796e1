//! Fixed timestep simulation tick
//!
//! Advances the session by exactly one step. The stage gates everything
//! except the quit request.

use super::collision::{CollisionResult, first_hit};
use super::state::{BackgroundLayer, GameState};
use crate::assets::{AssetError, AssetSource};
use crate::consts::*;

/// Edge-triggered input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Jump (space or primary pointer button)
    pub jump: bool,
    /// Toggle the verbose overlay
    pub toggle_verbose: bool,
    /// Leave the game, honoured in any stage
    pub quit: bool,
}

/// Fatal failure inside a tick. The session cannot continue.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("asset unavailable mid-session: {0}")]
    Asset(#[from] AssetError),
}

/// What happened during one advanced tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickEvents {
    pub background_added: bool,
    pub spawned: bool,
    pub retired: usize,
    pub out_of_bounds: bool,
    pub hit: Option<CollisionResult>,
}

/// Result of calling `tick`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Simulation advanced while playing
    Advanced(TickEvents),
    /// Stage is `Ended`; nothing changed
    Frozen,
    /// Quit was requested; the host should shut down
    Quit,
}

/// Advance the game state by one tick
///
/// # Errors
///
/// Returns an error if a background or obstacle sprite cannot be acquired.
/// The tick is abandoned at that point.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    assets: &dyn AssetSource,
) -> Result<TickOutcome, SimError> {
    if input.quit {
        log::info!("Quit requested at tick {}", state.ticks());
        return Ok(TickOutcome::Quit);
    }

    if !state.is_playing() {
        return Ok(TickOutcome::Frozen);
    }

    let mut events = TickEvents::default();
    let world = state.world;
    let now = state.ticks();

    if input.toggle_verbose {
        state.verbose = !state.verbose;
    }

    // One more viewport's worth of background every `width` ticks
    if state.clock.every(world.width.max(0) as u64) {
        state.backgrounds.push(BackgroundLayer::load(assets)?);
        events.background_added = true;
    }

    state.player.step(input.jump);
    if state.player.out_of_bounds(world.width) {
        events.out_of_bounds = true;
        state.end("out of bounds");
    }

    events.spawned = state
        .obstacles
        .maybe_spawn(&world, now, &mut state.rng, assets)?;
    events.retired = state.obstacles.retire(&world, now);

    events.hit = first_hit(&state.player, state.obstacles.pairs(), &world, now);
    if let Some(hit) = events.hit {
        log::debug!("Hit obstacle {} at x={:.1}", hit.pair_index, hit.geometry.x);
        state.end("collision");
    }

    let tick = state.clock.advance();
    state.ambient.advance(tick);
    if tick % ANIMATION_STEP_TICKS == 0 {
        state.player.advance_frame();
    }

    Ok(TickOutcome::Advanced(events))
}
