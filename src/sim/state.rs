//! Game state and core simulation types
//!
//! Everything the update pass owns lives here. Only obstacle geometry is
//! shared with the render pass; the rest is published as copies.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ambient::AmbientCycle;
use super::clock::TickCounter;
use super::kinematics::Player;
use super::obstacle::ObstacleStream;
use crate::assets::{AssetError, AssetKey, AssetSource, FontFace, SpriteSheet};
use crate::consts::*;

/// Coarse session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Stage {
    /// Active gameplay
    #[default]
    Playing,
    /// Round over; terminal for the session
    Ended,
}

/// Fixed world rectangle, taken from the background image at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: i32,
    pub height: i32,
}

impl WorldBounds {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn from_sprite(sheet: &SpriteSheet) -> Self {
        Self::new(sheet.width as i32, sheet.height as i32)
    }

    /// Obstacles stand on the bottom of the world, one segment up
    pub fn obstacle_anchor_y(&self) -> f64 {
        (self.height - OBSTACLE_SEGMENT_HEIGHT) as f64
    }
}

/// One viewport-wide strip of background, a night and a dusk variant
#[derive(Debug, Clone)]
pub struct BackgroundLayer {
    pub night: SpriteSheet,
    pub dusk: SpriteSheet,
}

impl BackgroundLayer {
    /// # Errors
    ///
    /// Returns an error if either background image cannot be acquired.
    pub fn load(assets: &dyn AssetSource) -> Result<Self, AssetError> {
        let dusk = assets.sprite(AssetKey::DuskBackground)?;
        let night = assets.sprite(AssetKey::NightBackground)?;
        Ok(Self { night, dusk })
    }

    /// Painted width of one layer
    pub fn width(&self) -> i32 {
        self.dusk.width as i32
    }
}

/// Assets loaded once before the first tick
#[derive(Debug, Clone)]
pub struct StartupAssets {
    pub font: FontFace,
    pub player_sheet: SpriteSheet,
    pub first_layer: BackgroundLayer,
}

impl StartupAssets {
    /// # Errors
    ///
    /// Returns the first asset that fails to load.
    pub fn load(assets: &dyn AssetSource) -> Result<Self, AssetError> {
        let font = assets.font(AssetKey::Font)?;
        let player_sheet = assets.sprite(AssetKey::PlayerSheet)?;
        let first_layer = BackgroundLayer::load(assets)?;
        Ok(Self {
            font,
            player_sheet,
            first_layer,
        })
    }
}

/// Complete session state
#[derive(Debug)]
pub struct GameState {
    pub world: WorldBounds,
    pub stage: Stage,
    pub clock: TickCounter,
    pub player: Player,
    pub player_sheet: SpriteSheet,
    pub obstacles: ObstacleStream,
    pub ambient: AmbientCycle,
    pub backgrounds: Vec<BackgroundLayer>,
    pub verbose: bool,
    pub seed: u64,
    pub rng: Pcg32,
}

impl GameState {
    /// New session sized from the first background layer
    pub fn new(startup: &StartupAssets, seed: u64, retire_offscreen: bool) -> Self {
        let world = WorldBounds::from_sprite(&startup.first_layer.dusk);
        log::info!(
            "New session: world {}x{}, seed {}",
            world.width,
            world.height,
            seed
        );
        Self {
            world,
            stage: Stage::Playing,
            clock: TickCounter::new(),
            player: Player::spawn(world.width, world.height),
            player_sheet: startup.player_sheet.clone(),
            obstacles: ObstacleStream::new(retire_offscreen),
            ambient: AmbientCycle::new(),
            backgrounds: vec![startup.first_layer.clone()],
            verbose: false,
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn ticks(&self) -> u64 {
        self.clock.get()
    }

    pub fn is_playing(&self) -> bool {
        self.stage == Stage::Playing
    }

    /// Move to `Ended`. There is no way back within a session.
    pub fn end(&mut self, reason: &str) {
        if self.stage == Stage::Playing {
            log::info!(
                "Round ended at tick {} ({}), y={:.2}",
                self.clock.get(),
                reason,
                self.player.y
            );
            self.stage = Stage::Ended;
        }
    }

    /// Logical viewport size reported to the host
    pub fn viewport(&self) -> (i32, i32) {
        (self.world.width, self.world.height)
    }
}
