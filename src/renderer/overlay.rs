//! Verbose debug overlay

use super::frame::RenderFrame;

/// Lines shown when the verbose toggle is on
pub fn lines(frame: &RenderFrame, fps: f64) -> Vec<String> {
    vec![
        format!("FPS: {:.0}", fps),
        format!("Velocity: {}", frame.player.velocity),
        format!("X: {:.2}, Y: {:.2}", frame.player.x, frame.player.y),
        format!("Ticks: {}", frame.ticks),
        format!("Backgrounds: {}", frame.background_count),
        format!("Time: {}", frame.ambient.phase()),
        format!("Stage: {:?}", frame.stage),
        format!("Pipes: {}", frame.obstacles.len()),
    ]
}
