//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Opaque color from a `0xRRGGBB` literal
pub const fn rgb(hex: u32) -> [f32; 4] {
    rgba(hex, 1.0)
}

/// Color from a `0xRRGGBB` literal plus alpha
pub const fn rgba(hex: u32, alpha: f32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        alpha,
    ]
}

/// Same color, scaled alpha
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}

/// Colors for game elements
pub mod colors {
    use super::{rgb, rgba};

    pub const BACKGROUND: [f32; 4] = rgb(0x05060d);
    pub const STAR: [f32; 4] = rgba(0xffffff, 0.9);
    pub const PLAYER: [f32; 4] = rgb(0x86e1ff);

    /// Power-up tiles
    pub const POWERUP_LASER: [f32; 4] = rgb(0x77ccff);
    pub const POWERUP_OTHER: [f32; 4] = rgb(0xffd166);
    pub const POWERUP_OUTLINE: [f32; 4] = rgba(0xffffff, 0.7);
    pub const POWERUP_GLYPH: [f32; 4] = rgb(0x000000);

    /// Explosion radial stops (alpha scaled by fade)
    pub const EXPLOSION_CORE: [f32; 4] = rgba(0xffdc78, 0.5);
    pub const EXPLOSION_MID: [f32; 4] = rgba(0xff8c3c, 0.35);
    pub const EXPLOSION_EDGE: [f32; 4] = rgba(0xff7800, 0.0);

    pub const ARC: [f32; 4] = rgba(0x78d2ff, 0.9);
}
