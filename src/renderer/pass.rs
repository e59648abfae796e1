//! Render pass
//!
//! Turns a `RenderFrame` into a draw list. While emitting obstacle segments
//! it also rebuilds each obstacle's rendered height, which the collision
//! check on the update thread treats as the column's true extent. The
//! obstacle guard is held from the reset until the last segment is counted.

use super::frame::{ObstacleView, RenderFrame};
use super::overlay;
use super::sprite::{SpriteInstance, sheets};
use crate::assets::FontFace;
use crate::consts::*;
use crate::scroll_x;

const SEGMENT_W: f32 = OBSTACLE_SEGMENT_WIDTH as f32;
const SEGMENT_H: f32 = OBSTACLE_SEGMENT_HEIGHT as f32;
const CAP_SRC: [f32; 4] = [0.0, 0.0, SEGMENT_W, SEGMENT_H];
const BODY_SRC: [f32; 4] = [0.0, SEGMENT_H, SEGMENT_W, SEGMENT_H];

/// Text block drawn with the overlay font
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub position: [f32; 2],
    pub lines: Vec<String>,
}

/// Everything the backend needs for one frame, in paint order
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub sprites: Vec<SpriteInstance>,
    pub text: Vec<TextBlock>,
}

/// Stateless apart from the font it was handed at startup
#[derive(Debug, Clone)]
pub struct Renderer {
    font: FontFace,
}

impl Renderer {
    pub fn new(font: FontFace) -> Self {
        Self { font }
    }

    pub fn font(&self) -> &FontFace {
        &self.font
    }

    /// Render the frame: backgrounds, obstacles, player, overlay
    pub fn render(&self, frame: &RenderFrame, fps: f64) -> DrawList {
        let mut list = DrawList::default();

        self.draw_backgrounds(frame, &mut list.sprites);
        for obstacle in &frame.obstacles {
            if obstacle.height > 0 {
                draw_obstacle(frame, obstacle, &mut list.sprites);
            }
        }
        self.draw_player(frame, &mut list.sprites);

        if frame.verbose {
            list.text.push(TextBlock {
                position: [0.0, 0.0],
                lines: overlay::lines(frame, fps),
            });
        }
        list
    }

    fn draw_backgrounds(&self, frame: &RenderFrame, out: &mut Vec<SpriteInstance>) {
        let width = frame.layer_width;
        let height = frame.world.height as f32;
        let scroll = (frame.ticks / 2) as i64;
        let alpha = frame.ambient.night_alpha();

        let offset = |i: usize| (i as i64 * width as i64 - scroll) as f32;
        let src = [0.0, 0.0, width as f32, height];

        for i in 0..frame.background_count {
            out.push(SpriteInstance::new(sheets::DUSK, [offset(i), 0.0], src));
        }
        for i in 0..frame.background_count {
            out.push(SpriteInstance::new(sheets::NIGHT, [offset(i), 0.0], src).with_alpha(alpha));
        }
    }

    fn draw_player(&self, frame: &RenderFrame, out: &mut Vec<SpriteInstance>) {
        let size = PLAYER_SPRITE_SIZE as f32;
        let player = &frame.player;
        let src = [size * player.frame as f32, 0.0, size, size];
        out.push(
            SpriteInstance::new(sheets::PLAYER, [player.x as f32, player.y as f32], src)
                .with_rotation(player.tilt() as f32),
        );
    }
}

/// Cap at the anchor, `height / 16` body segments stacked above it, then a
/// header cap. Writes X, Y and the rebuilt rendered height back.
fn draw_obstacle(frame: &RenderFrame, obstacle: &ObstacleView, out: &mut Vec<SpriteInstance>) {
    let segment = OBSTACLE_SEGMENT_HEIGHT as f64;

    obstacle.geometry.write(|g| {
        g.rendered_height = 0.0;
        g.x = scroll_x(frame.world.width, obstacle.index, frame.ticks);
        g.y = frame.world.obstacle_anchor_y();

        let x = g.x as f32;
        out.push(SpriteInstance::new(sheets::OBSTACLE, [x, g.y as f32], CAP_SRC));
        g.rendered_height += segment;

        let mut level = 1;
        while level <= obstacle.height / OBSTACLE_SEGMENT_HEIGHT {
            let y = g.y - level as f64 * segment;
            out.push(SpriteInstance::new(sheets::OBSTACLE, [x, y as f32], BODY_SRC));
            level += 1;
            g.rendered_height += segment;
        }

        let y = g.y - level as f64 * segment;
        out.push(SpriteInstance::new(sheets::OBSTACLE, [x, y as f32], CAP_SRC));
        g.rendered_height += segment;
    });
}
