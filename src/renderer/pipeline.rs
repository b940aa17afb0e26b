//! WebGPU surface, pipeline and per-frame upload
//!
//! Frames arrive as canvas-pixel triangles from `shapes::build_frame`. They
//! are converted to clip space into a scratch list and written into a vertex
//! buffer that only ever grows.

use super::vertex::{Vertex, colors};

/// Smallest vertex buffer allocated, in vertices
const MIN_BUFFER_VERTICES: usize = 1024;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: colors::BACKGROUND[0] as f64,
    g: colors::BACKGROUND[1] as f64,
    b: colors::BACKGROUND[2] as f64,
    a: 1.0,
};

pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    /// Vertices the buffer can hold
    capacity: usize,
    /// Clip-space copy of the last frame
    scratch: Vec<Vertex>,
    /// Canvas size in CSS pixels (simulation space)
    pub canvas: (f32, f32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        canvas: (f32, f32),
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("neon-dodge-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let caps = surface.get_capabilities(adapter);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: pick_format(&caps.formats),
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("Surface {}x{} as {:?}", config.width, config.height, config.format);

        let pipeline = build_pipeline(&device, config.format);
        let capacity = buffer_capacity(0);
        let vertex_buffer = create_vertex_buffer(&device, capacity);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            capacity,
            scratch: Vec::with_capacity(capacity),
            canvas,
        })
    }

    /// Follow a canvas resize (surface pixels plus simulation size)
    pub fn resize(&mut self, new_width: u32, new_height: u32, canvas: (f32, f32)) {
        if new_width == 0 || new_height == 0 {
            return;
        }
        self.canvas = canvas;
        self.config.width = new_width;
        self.config.height = new_height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Reconfigure at the current size after the surface was lost
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Convert a frame to clip space and stage it in the vertex buffer
    fn upload(&mut self, vertices: &[Vertex]) {
        let canvas = self.canvas;
        self.scratch.clear();
        self.scratch.extend(vertices.iter().map(|v| {
            let (x, y) = canvas_to_ndc(v.position[0], v.position[1], canvas);
            Vertex::new(x, y, v.color)
        }));

        if self.scratch.len() > self.capacity {
            self.capacity = buffer_capacity(self.scratch.len());
            self.vertex_buffer = create_vertex_buffer(&self.device, self.capacity);
            log::debug!("Vertex buffer grown to {} vertices", self.capacity);
        }
        if !self.scratch.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.scratch));
        }
    }

    /// Draw one frame. The background is cleared even when `vertices` is empty.
    pub fn render(&mut self, vertices: &[Vertex]) -> Result<(), wgpu::SurfaceError> {
        self.upload(vertices);
        let count = self.scratch.len() as u32;

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("neon-dodge-frame"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("neon-dodge-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
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
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                pass.draw(0..count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

/// Triangle-list pipeline with alpha blending, no culling and no depth
fn build_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("neon-dodge-shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("neon-dodge-layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("neon-dodge-pipeline"),
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
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("neon-dodge-vertices"),
        size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Vertex capacity to allocate for a frame of `needed` vertices
fn buffer_capacity(needed: usize) -> usize {
    needed.max(MIN_BUFFER_VERTICES).next_power_of_two()
}

/// Prefer an sRGB surface format; fall back to whatever comes first
fn pick_format(formats: &[wgpu::TextureFormat]) -> wgpu::TextureFormat {
    formats
        .iter()
        .find(|f| f.is_srgb())
        .or_else(|| formats.first())
        .copied()
        .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb)
}

/// Map a canvas-space point to clip space for a canvas of the given size
pub fn canvas_to_ndc(x: f32, y: f32, canvas: (f32, f32)) -> (f32, f32) {
    let (w, h) = (canvas.0.max(1.0), canvas.1.max(1.0));
    (x / w * 2.0 - 1.0, 1.0 - y / h * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat;

    #[test]
    fn test_canvas_corners_map_to_clip_corners() {
        let canvas = (800.0, 600.0);
        assert_eq!(canvas_to_ndc(0.0, 0.0, canvas), (-1.0, 1.0));
        assert_eq!(canvas_to_ndc(800.0, 600.0, canvas), (1.0, -1.0));
        assert_eq!(canvas_to_ndc(400.0, 300.0, canvas), (0.0, 0.0));
    }

    #[test]
    fn test_buffer_capacity_grows_in_powers_of_two() {
        assert_eq!(buffer_capacity(0), MIN_BUFFER_VERTICES);
        assert_eq!(buffer_capacity(1025), 2048);
        assert_eq!(buffer_capacity(4096), 4096);
    }

    #[test]
    fn test_pick_format() {
        assert_eq!(
            pick_format(&[TextureFormat::Bgra8Unorm, TextureFormat::Rgba8UnormSrgb]),
            TextureFormat::Rgba8UnormSrgb
        );
        assert_eq!(
            pick_format(&[TextureFormat::Rgba8Unorm]),
            TextureFormat::Rgba8Unorm
        );
        assert_eq!(pick_format(&[]), TextureFormat::Bgra8UnormSrgb);
    }
}
