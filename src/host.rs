//! Minimal host harness
//!
//! Drives a session with three operations: advance one tick, render the
//! current state, report the viewport size. `run_threaded` runs the render
//! pass on its own thread, fed frame snapshots over a channel, so update and
//! render execute concurrently the way a windowing toolkit would run them.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::assets::{AssetError, AssetSource};
use crate::consts::{OBSTACLE_SEGMENT_WIDTH, OBSTACLE_SPACING, PLAYER_SPRITE_SIZE};
use crate::renderer::{DrawList, RenderFrame, Renderer};
use crate::settings::Settings;
use crate::sim::{GameState, SimError, Stage, StartupAssets, TickInput, TickOutcome, tick};

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error("failed to start render thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("render thread panicked")]
    RenderPanicked,
}

/// Per-tick input provider (keyboard, replay script, autopilot)
pub trait InputSource {
    /// Edge-triggered input for the next tick
    fn poll(&mut self, state: &GameState) -> TickInput;
}

/// Plays back a fixed list of inputs, then idles
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    script: VecDeque<TickInput>,
}

impl ScriptedInput {
    pub fn new(script: impl IntoIterator<Item = TickInput>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Jump on exactly the given tick numbers (0-based poll count)
    pub fn jumps_at(ticks: &[u64], len: u64) -> Self {
        Self::new((0..len).map(|t| TickInput {
            jump: ticks.contains(&t),
            ..Default::default()
        }))
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _state: &GameState) -> TickInput {
        self.script.pop_front().unwrap_or_default()
    }
}

/// Demo mode: flaps whenever the player sinks below a target height that
/// keeps it above the next obstacle's last drawn top.
#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Clearance kept above obstacle tops
    pub margin: f64,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self { margin: 24.0 }
    }
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    fn target_y(&self, state: &GameState) -> f64 {
        let world = state.world;
        let player_right = state.player.x + PLAYER_SPRITE_SIZE as f64;
        let next_top = state
            .obstacles
            .pairs()
            .iter()
            .map(|p| p.bottom.geometry.snapshot())
            .filter(|g| g.x + OBSTACLE_SEGMENT_WIDTH as f64 >= state.player.x)
            .filter(|g| g.x <= player_right + OBSTACLE_SPACING as f64)
            .map(|g| g.y - g.rendered_height)
            .fold(f64::INFINITY, f64::min);
        (world.height as f64 / 2.0).min(next_top - self.margin)
    }
}

impl InputSource for Autopilot {
    fn poll(&mut self, state: &GameState) -> TickInput {
        let player = &state.player;
        TickInput {
            jump: player.velocity >= 0.0
                && player.y + PLAYER_SPRITE_SIZE as f64 > self.target_y(state),
            ..Default::default()
        }
    }
}

/// Rolling frames-per-second over the last 60 frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; 60],
    frame_index: usize,
    fps: f64,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0.0,
        }
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at `time` seconds
    pub fn record(&mut self, time: f64) {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time - oldest;
            if elapsed > 0.0 {
                self.fps = (self.frame_times.len() - 1) as f64 / elapsed;
            }
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }
}

/// A running game: state, assets, renderer and the fixed-step accumulator
pub struct Session<A: AssetSource> {
    assets: A,
    state: GameState,
    renderer: Renderer,
    accumulator: f64,
    dt: f64,
    max_substeps: u32,
    fps: FpsCounter,
}

impl<A: AssetSource> Session<A> {
    /// Load every startup asset and build the initial state
    ///
    /// # Errors
    ///
    /// Returns the first startup asset that fails to load.
    pub fn boot(assets: A, settings: &Settings) -> Result<Self, AssetError> {
        let startup = StartupAssets::load(&assets)?;
        let mut state = GameState::new(
            &startup,
            settings.resolve_seed(),
            settings.retire_offscreen_obstacles,
        );
        state.verbose = settings.start_verbose;

        Ok(Self {
            assets,
            state,
            renderer: Renderer::new(startup.font),
            accumulator: 0.0,
            dt: settings.tick_dt(),
            max_substeps: settings.max_substeps,
            fps: FpsCounter::new(),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Advance-one-tick
    ///
    /// # Errors
    ///
    /// Propagates fatal mid-session asset failures.
    pub fn advance_one_tick(&mut self, input: &TickInput) -> Result<TickOutcome, SimError> {
        tick(&mut self.state, input, &self.assets)
    }

    /// Render-current-state, on the calling thread
    pub fn render_current_state(&self) -> DrawList {
        self.renderer
            .render(&RenderFrame::capture(&self.state), self.fps.fps())
    }

    /// Logical viewport; the world rectangle never changes
    pub fn viewport_size(&self) -> (i32, i32) {
        self.state.viewport()
    }

    /// Initial window size, twice the world
    pub fn window_size(&self) -> (i32, i32) {
        let (w, h) = self.viewport_size();
        (w * 2, h * 2)
    }

    /// One host frame: run as many fixed ticks as `elapsed` seconds cover,
    /// capped at `max_substeps`. Returns the outcome of the last tick run.
    ///
    /// # Errors
    ///
    /// Propagates fatal mid-session asset failures.
    pub fn frame(
        &mut self,
        elapsed: f64,
        time: f64,
        input: &mut dyn InputSource,
    ) -> Result<Option<TickOutcome>, SimError> {
        self.accumulator += elapsed.min(0.1);

        let mut last = None;
        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < self.max_substeps {
            let tick_input = input.poll(&self.state);
            let outcome = self.advance_one_tick(&tick_input)?;
            self.accumulator -= self.dt;
            substeps += 1;
            last = Some(outcome);
            if outcome == TickOutcome::Quit {
                break;
            }
        }

        self.fps.record(time);
        Ok(last)
    }
}

/// Limits for `run_threaded`
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub max_ticks: Option<u64>,
    /// Sleep one tick period between updates
    pub realtime: bool,
    /// Stop once the round has ended instead of idling on a frozen frame
    pub stop_when_ended: bool,
}

/// What a threaded run did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub stage: Stage,
    pub quit: bool,
    pub obstacles: usize,
    pub obstacles_spawned: u64,
    pub phase: i32,
    pub frames_rendered: u64,
    /// Frames skipped because a newer one was already queued
    pub frames_dropped: u64,
    /// Tick of the last frame painted
    pub last_rendered_tick: Option<u64>,
}

#[derive(Default)]
struct RenderStats {
    frames: u64,
    skipped: u64,
    last_tick: Option<u64>,
}

/// Run updates on this thread and renders on a dedicated one.
///
/// Frames are queued without blocking. Each time the render thread wakes it
/// skips to the newest queued frame, so paint never lags the simulation by
/// more than one render.
///
/// # Errors
///
/// Returns an error on a fatal tick failure or if the render thread dies.
pub fn run_threaded<A: AssetSource>(
    mut session: Session<A>,
    input: &mut dyn InputSource,
    options: RunOptions,
) -> Result<RunSummary, HostError> {
    let (tx, rx) = flume::unbounded::<RenderFrame>();
    let renderer = session.renderer.clone();

    let render_thread = std::thread::Builder::new()
        .name("render".into())
        .spawn(move || {
            let start = Instant::now();
            let mut fps = FpsCounter::new();
            let mut stats = RenderStats::default();
            while let Ok(mut frame) = rx.recv() {
                for newer in rx.try_iter() {
                    stats.skipped += 1;
                    frame = newer;
                }
                fps.record(start.elapsed().as_secs_f64());
                let list = renderer.render(&frame, fps.fps());
                log::trace!("Rendered tick {} ({} sprites)", frame.ticks, list.sprites.len());
                stats.frames += 1;
                stats.last_tick = Some(frame.ticks);
            }
            stats
        })?;

    let period = Duration::from_secs_f64(session.dt);
    let mut ticks_run = 0u64;
    let mut quit = false;

    loop {
        if options.max_ticks.is_some_and(|max| ticks_run >= max) {
            break;
        }

        let tick_input = input.poll(&session.state);
        match session.advance_one_tick(&tick_input)? {
            TickOutcome::Quit => {
                quit = true;
                break;
            }
            TickOutcome::Frozen if options.stop_when_ended => break,
            _ => {}
        }
        ticks_run += 1;

        if tx.send(RenderFrame::capture(&session.state)).is_err() {
            return Err(HostError::RenderPanicked);
        }

        if options.realtime {
            std::thread::sleep(period);
        }
    }

    drop(tx);
    let stats = render_thread.join().map_err(|_| HostError::RenderPanicked)?;

    let state = &session.state;
    Ok(RunSummary {
        ticks: state.ticks(),
        stage: state.stage,
        quit,
        obstacles: state.obstacles.len(),
        obstacles_spawned: state.obstacles.spawned(),
        phase: state.ambient.phase(),
        frames_rendered: stats.frames,
        frames_dropped: stats.skipped,
        last_rendered_tick: stats.last_tick,
    })
}
