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

/// Neon palette
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.024, 0.035, 0.086, 1.0];
    pub const GRID: [f32; 4] = [0.086, 0.129, 0.278, 1.0]; // #162147
    pub const TRAIL: [f32; 4] = [0.471, 0.953, 1.0, 1.0]; // rgb(120,243,255)
    pub const PLAYER_CORE: [f32; 4] = [0.910, 0.992, 1.0, 1.0]; // #e8fdff
    pub const PLAYER_MID: [f32; 4] = [0.471, 0.953, 1.0, 1.0]; // #78f3ff
    pub const PLAYER_RIM: [f32; 4] = [0.153, 0.349, 1.0, 1.0]; // #2759ff
    pub const OBSTACLE: [f32; 4] = [0.616, 0.482, 1.0, 1.0]; // rgb(157,123,255)
    pub const OBSTACLE_EDGE: [f32; 4] = [0.165, 0.227, 0.467, 1.0]; // #2a3a77
    pub const METER_BG: [f32; 4] = [0.043, 0.071, 0.149, 1.0]; // #0b1226
    pub const METER_EDGE: [f32; 4] = [0.169, 0.227, 0.447, 1.0]; // #2b3a72
    pub const METER_FILL: [f32; 4] = [0.357, 1.0, 0.706, 1.0]; // #5bffb4
    pub const PULSE: [f32; 4] = [0.475, 0.953, 1.0, 1.0]; // rgb(121,243,255)

    /// Same color with a different alpha
    pub const fn with_alpha(c: [f32; 4], a: f32) -> [f32; 4] {
        [c[0], c[1], c[2], a]
    }
}
