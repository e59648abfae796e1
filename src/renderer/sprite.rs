//! Sprite instances for a 2D textured-quad backend

use bytemuck::{Pod, Zeroable};

/// One textured quad. `position` is the destination top-left; the backend
/// rotates about the quad centre by `rotation` radians.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub position: [f32; 2],
    /// Source rectangle in the sheet: x, y, width, height
    pub src_rect: [f32; 4],
    pub rotation: f32,
    pub alpha: f32,
    pub sheet: u32,
}

impl SpriteInstance {
    pub const fn new(sheet: u32, position: [f32; 2], src_rect: [f32; 4]) -> Self {
        Self {
            position,
            src_rect,
            rotation: 0.0,
            alpha: 1.0,
            sheet,
        }
    }

    pub const fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub const fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }
}

/// Sheet ids understood by the backend
pub mod sheets {
    pub const PLAYER: u32 = 0;
    pub const OBSTACLE: u32 = 1;
    pub const DUSK: u32 = 2;
    pub const NIGHT: u32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 9 * 4);
        let sprites = [SpriteInstance::new(sheets::PLAYER, [1.0, 2.0], [0.0, 0.0, 16.0, 16.0])];
        let bytes: &[u8] = bytemuck::cast_slice(&sprites);
        assert_eq!(bytes.len(), 36);
    }
}
