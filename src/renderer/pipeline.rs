//! WebGPU render pipeline setup
//!
//! A single vertex-colour triangle list. The scene is mapped to NDC on the CPU
//! and written into one vertex buffer that only grows.

use thiserror::Error;

use super::vertex::{Vertex, colors};

/// Failures while bringing up the GPU
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// Smallest vertex buffer ever allocated (a full menu frame fits)
const MIN_VERTEX_CAPACITY: usize = 1024;

/// Vertex capacity to allocate for `needed` vertices
fn vertex_capacity(needed: usize) -> usize {
    needed.max(MIN_VERTEX_CAPACITY).next_power_of_two()
}

/// Stretch the logical screen over the whole surface
/// Screen is top-left origin, y down; NDC is -1 to 1, y up
fn to_ndc(x: f32, y: f32, screen: (f32, f32)) -> (f32, f32) {
    let (w, h) = screen;
    (x / w * 2.0 - 1.0, 1.0 - y / h * 2.0)
}

fn surface_config(
    surface: &wgpu::Surface<'static>,
    adapter: &wgpu::Adapter,
    width: u32,
    height: u32,
) -> Result<wgpu::SurfaceConfiguration, RenderError> {
    let caps = surface.get_capabilities(adapter);
    let format = caps
        .formats
        .iter()
        .find(|f| f.is_srgb())
        .or_else(|| caps.formats.first())
        .copied()
        .ok_or(RenderError::NoSurfaceFormat)?;

    Ok(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width,
        height,
        present_mode: wgpu::PresentMode::AutoVsync,
        alpha_mode: caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto),
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    })
}

fn flat_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("flat_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("flat_layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("flat_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        // Rectangles only, winding is irrelevant
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

fn vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("scene_vertices"),
        size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// GPU state for drawing scenes
pub struct RenderState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    vertices: wgpu::Buffer,
    /// Vertices the buffer can hold
    capacity: usize,
    /// Scratch space for NDC vertices, reused across frames
    staging: Vec<Vertex>,
    /// Viewport size in pixels
    pub size: (u32, u32),
    /// Logical screen size the game draws in
    screen: (f32, f32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        screen: (f32, f32),
    ) -> Result<Self, RenderError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("retro-racer-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let config = surface_config(&surface, adapter, width, height)?;
        surface.configure(&device, &config);
        let pipeline = flat_pipeline(&device, config.format);
        let capacity = vertex_capacity(0);
        let vertices = vertex_buffer(&device, capacity);

        log::info!("Renderer ready: {}x{} {:?}", width, height, config.format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertices,
            capacity,
            staging: Vec::with_capacity(capacity),
            size: (width, height),
            screen,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.size = (width, height);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Map to NDC and copy into the vertex buffer, growing it when needed
    fn upload(&mut self, scene: &[Vertex]) {
        let screen = self.screen;
        self.staging.clear();
        self.staging.extend(scene.iter().map(|v| {
            let (x, y) = to_ndc(v.position[0], v.position[1], screen);
            Vertex::new(x, y, v.color)
        }));

        if self.staging.len() > self.capacity {
            self.capacity = vertex_capacity(self.staging.len());
            self.vertices = vertex_buffer(&self.device, self.capacity);
            log::debug!("Vertex buffer grown to {} vertices", self.capacity);
        }
        self.queue
            .write_buffer(&self.vertices, 0, bytemuck::cast_slice(&self.staging));
    }

    /// Draw one frame of screen-space vertices
    pub fn render(&mut self, scene: &[Vertex]) -> Result<(), wgpu::SurfaceError> {
        self.upload(scene);
        let count = self.staging.len() as u32;

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene_encoder"),
            });

        let [r, g, b, _] = colors::BACKGROUND;
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            if count > 0 {
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, self.vertices.slice(..));
                pass.draw(0..count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_corners_map_to_ndc() {
        let screen = (800.0, 600.0);
        assert_eq!(to_ndc(0.0, 0.0, screen), (-1.0, 1.0));
        assert_eq!(to_ndc(800.0, 600.0, screen), (1.0, -1.0));
        assert_eq!(to_ndc(400.0, 300.0, screen), (0.0, 0.0));
    }

    #[test]
    fn test_vertex_capacity_grows_in_powers_of_two() {
        assert_eq!(vertex_capacity(0), MIN_VERTEX_CAPACITY);
        assert_eq!(vertex_capacity(MIN_VERTEX_CAPACITY), MIN_VERTEX_CAPACITY);
        assert_eq!(vertex_capacity(MIN_VERTEX_CAPACITY + 1), 2 * MIN_VERTEX_CAPACITY);
        assert_eq!(vertex_capacity(5000), 8192);
    }

    #[test]
    fn test_default_scene_fits_initial_buffer() {
        use crate::config::GameConfig;
        use crate::renderer::scene;
        use crate::sim::GameState;

        let config = GameConfig::default();
        let state = GameState::new(config.clone());
        let vertices = scene(&state.snapshot(), &config);
        assert!(vertices.len() <= vertex_capacity(0));
    }
}
