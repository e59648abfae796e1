//! Render collaborator
//!
//! Backend-agnostic: produces sprite instances and text blocks in paint
//! order from a frame snapshot. Uploading and drawing them is the host
//! toolkit's business.

pub mod frame;
pub mod overlay;
pub mod pass;
pub mod sprite;

pub use frame::{ObstacleView, RenderFrame};
pub use pass::{DrawList, Renderer, TextBlock};
pub use sprite::{SpriteInstance, sheets};
