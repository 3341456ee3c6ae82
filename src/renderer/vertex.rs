//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
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

/// Colors for game elements (synthwave palette)
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const ROADSIDE: [f32; 4] = [0.08, 0.0, 0.12, 1.0];
    pub const ROAD: [f32; 4] = [0.02, 0.02, 0.1, 1.0];
    pub const LANE_EDGE: [f32; 4] = [1.0, 0.0, 1.0, 1.0]; // Neon pink
    pub const STRIPE: [f32; 4] = [0.0, 1.0, 1.0, 0.8]; // Neon blue
    pub const PLAYER: [f32; 4] = [1.0, 0.2, 0.8, 1.0];
    pub const PLAYER_WINDOW: [f32; 4] = [0.6, 1.0, 1.0, 1.0];
    pub const CAR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const BARRIER: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const BUTTON: [f32; 4] = [0.5, 0.0, 0.5, 1.0];
    pub const BUTTON_HOVER: [f32; 4] = [0.8, 0.0, 0.8, 1.0];
    pub const BUTTON_BORDER: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const SPEED_GAUGE: [f32; 4] = [0.0, 1.0, 1.0, 0.9];
    pub const LEVEL_PIP: [f32; 4] = [1.0, 1.0, 0.0, 0.9];
}
