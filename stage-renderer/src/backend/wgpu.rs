//! wgpu rendering backend.
//!
//! Draws frames onto a window surface. Each polygon is ear-clipped on the
//! CPU, converted to normalized device coordinates and uploaded as one
//! vertex buffer per frame; a single alpha-blended pipeline draws it all.

use std::sync::Arc;

use stage_core::{DrawCommand, Frame, Vertex};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{BackendType, RenderError, RenderResult};

use super::RenderBackend;

const SHADER: &str = r"
struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(@location(0) position: vec2<f32>, @location(1) color: vec4<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.position = vec4<f32>(position, 0.0, 1.0);
    out.color = color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
";

/// Floats per tessellated vertex: x, y, r, g, b, a.
pub const FLOATS_PER_VERTEX: usize = 6;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

/// Twice the signed area of `vertices`; positive for counter-clockwise.
fn signed_area(vertices: &[Vertex]) -> f64 {
    let n = vertices.len();
    (0..n)
        .map(|i| {
            let (a, b) = (vertices[i], vertices[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum()
}

fn cross(o: Vertex, a: Vertex, b: Vertex) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

// Inclusive of the edges so a reflex vertex touching the ear blocks it.
fn in_triangle(p: Vertex, a: Vertex, b: Vertex, c: Vertex) -> bool {
    cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
}

/// Split a simple polygon into triangles by ear clipping.
///
/// Returns index triples into `vertices`. Convex outlines come out as a fan
/// from the first vertex. If no ear can be found (self-intersecting input)
/// the remainder is fanned.
#[must_use]
pub fn triangulate(vertices: &[Vertex]) -> Vec<[usize; 3]> {
    let n = vertices.len();
    if n < 3 {
        return Vec::new();
    }

    let mut ring: Vec<usize> = (0..n).collect();
    if signed_area(vertices) < 0.0 {
        ring[1..].reverse();
    }

    let mut triangles = Vec::with_capacity(n - 2);
    while ring.len() > 3 {
        let len = ring.len();
        let ear = (1..=len).map(|k| k % len).find(|&k| {
            let (prev, cur, next) = (ring[(k + len - 1) % len], ring[k], ring[(k + 1) % len]);
            let (a, b, c) = (vertices[prev], vertices[cur], vertices[next]);
            cross(a, b, c) > 0.0
                && !ring
                    .iter()
                    .filter(|&&i| i != prev && i != cur && i != next)
                    .any(|&i| in_triangle(vertices[i], a, b, c))
        });

        let Some(k) = ear else {
            tracing::trace!("No ear in {len}-vertex remainder, fanning");
            break;
        };
        triangles.push([ring[(k + len - 1) % len], ring[k], ring[(k + 1) % len]]);
        ring.remove(k);
    }

    let anchor = ring[0];
    triangles.extend(ring[1..].windows(2).map(|pair| [anchor, pair[0], pair[1]]));
    triangles
}

/// Triangulate every polygon in `frame` into interleaved vertex data.
///
/// Positions are mapped from rendering space on a `width` x `height`
/// surface to normalized device coordinates; both have y pointing up, so no
/// flip is needed.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn tessellate(frame: &Frame, width: u32, height: u32) -> Vec<f32> {
    let (w, h) = (f64::from(width.max(1)), f64::from(height.max(1)));
    let to_ndc = |v: &Vertex| [(v.x / w * 2.0 - 1.0) as f32, (v.y / h * 2.0 - 1.0) as f32];

    let mut data = Vec::new();
    for command in frame.commands() {
        match command {
            DrawCommand::FillPolygon { vertices, color } => {
                for triangle in triangulate(vertices) {
                    for index in triangle {
                        data.extend_from_slice(&to_ndc(&vertices[index]));
                        data.extend_from_slice(color);
                    }
                }
            }
        }
    }
    data
}

/// wgpu-based GPU renderer bound to a window.
pub struct WgpuBackend {
    instance: wgpu::Instance,
    surface: Option<wgpu::Surface<'static>>,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    background: [f32; 4],
}

impl WgpuBackend {
    /// Create a backend drawing into `window`.
    ///
    /// # Errors
    ///
    /// Returns an error if no adapter, device or surface can be created.
    pub fn from_window(window: Arc<Window>) -> RenderResult<Self> {
        pollster::block_on(Self::initialize(window))
    }

    async fn initialize(window: Arc<Window>) -> RenderResult<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| RenderError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| RenderError::GpuInit("No suitable GPU adapter found".to_string()))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Stage Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await
            .map_err(|e| RenderError::GpuInit(e.to_string()))?;

        let config = Self::surface_config(&surface, &adapter, size.width, size.height)?;
        surface.configure(&device, &config);
        let pipeline = Self::create_pipeline(&device, config.format);

        tracing::info!(
            "wgpu backend initialized with adapter: {:?}",
            adapter.get_info()
        );

        Ok(Self {
            instance,
            surface: Some(surface),
            adapter,
            device,
            queue,
            config,
            pipeline,
            background: [0.0, 0.0, 0.0, 1.0],
        })
    }

    fn surface_config(
        surface: &wgpu::Surface<'_>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> RenderResult<wgpu::SurfaceConfiguration> {
        let caps = surface.get_capabilities(adapter);
        // Colors are blended as given, so skip sRGB encoding where possible.
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| RenderError::Surface("surface reports no formats".to_string()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        })
    }

    fn create_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Stage Polygon Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Stage Polygon Layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let stride = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as wgpu::BufferAddress;

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Stage Polygon Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: stride,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &VERTEX_ATTRIBUTES,
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    /// Release the surface while the application is suspended.
    pub fn drop_surface(&mut self) {
        if self.surface.take().is_some() {
            tracing::debug!("wgpu surface dropped");
        }
    }

    /// Whether a surface is currently attached.
    #[must_use]
    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// Attach a fresh surface for `window` after a resume.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be created.
    pub fn recreate_surface(&mut self, window: Arc<Window>) -> RenderResult<()> {
        let size = window.inner_size();
        let surface = self
            .instance
            .create_surface(window)
            .map_err(|e| RenderError::Surface(e.to_string()))?;
        self.config = Self::surface_config(&surface, &self.adapter, size.width, size.height)?;
        surface.configure(&self.device, &self.config);
        self.surface = Some(surface);
        tracing::debug!("wgpu surface recreated at {}x{}", size.width, size.height);
        Ok(())
    }

    fn acquire_texture(&self) -> RenderResult<Option<wgpu::SurfaceTexture>> {
        let Some(surface) = &self.surface else {
            return Ok(None);
        };
        match surface.get_current_texture() {
            Ok(texture) => Ok(Some(texture)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("Surface lost or outdated, reconfiguring");
                surface.configure(&self.device, &self.config);
                surface
                    .get_current_texture()
                    .map(Some)
                    .map_err(|e| RenderError::Surface(e.to_string()))
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("Surface timed out, skipping frame");
                Ok(None)
            }
            Err(e) => Err(RenderError::Surface(e.to_string())),
        }
    }
}

impl RenderBackend for WgpuBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Gpu
    }

    fn render(&mut self, frame: &Frame) -> RenderResult<()> {
        let Some(output) = self.acquire_texture()? else {
            return Ok(());
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let data = tessellate(frame, self.config.width, self.config.height);
        let vertex_count = u32::try_from(data.len() / FLOATS_PER_VERTEX)
            .map_err(|_| RenderError::Frame("too many vertices".to_string()))?;
        let buffer = (vertex_count > 0).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Stage Polygon Vertices"),
                    contents: bytemuck::cast_slice(&data),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        let [r, g, b, a] = frame.clear_color().unwrap_or(self.background);
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Stage Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Stage Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(r),
                            g: f64::from(g),
                            b: f64::from(b),
                            a: f64::from(a),
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(buffer) = &buffer {
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        tracing::trace!(
            "wgpu render: {} commands, {} vertices",
            frame.len(),
            vertex_count
        );
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.config.width = width;
        self.config.height = height;
        if let Some(surface) = &self.surface {
            surface.configure(&self.device, &self.config);
        }
        tracing::debug!("wgpu resized to {}x{}", width, height);
        Ok(())
    }

    fn set_background_color(&mut self, color: [f32; 4]) {
        self.background = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_tessellate_empty_frame() {
        assert!(tessellate(&Frame::new(), 100, 100).is_empty());
    }

    #[test]
    fn test_tessellate_quad_into_two_triangles() {
        let mut frame = Frame::new();
        frame.fill_polygon(
            &[
                Vertex::new(0.0, 0.0),
                Vertex::new(100.0, 0.0),
                Vertex::new(100.0, 50.0),
                Vertex::new(0.0, 50.0),
            ],
            [1.0, 0.0, 0.0, 0.5],
        );

        let data = tessellate(&frame, 100, 50);
        assert_eq!(data.len(), 2 * 3 * FLOATS_PER_VERTEX);

        // Bottom-left of the surface maps to (-1, -1).
        assert!(approx_eq(data[0], -1.0));
        assert!(approx_eq(data[1], -1.0));
        assert!(approx_eq(data[5], 0.5));

        // Second vertex of the first triangle is bottom-right.
        let second = &data[FLOATS_PER_VERTEX..2 * FLOATS_PER_VERTEX];
        assert!(approx_eq(second[0], 1.0));
        assert!(approx_eq(second[1], -1.0));

        // Last vertex of the second triangle is top-left.
        let last = &data[data.len() - FLOATS_PER_VERTEX..];
        assert!(approx_eq(last[0], -1.0));
        assert!(approx_eq(last[1], 1.0));
    }

    fn u_shape() -> Vec<Vertex> {
        [
            (0.0, 0.0),
            (30.0, 0.0),
            (30.0, 20.0),
            (20.0, 20.0),
            (20.0, 10.0),
            (10.0, 10.0),
            (10.0, 20.0),
            (0.0, 20.0),
        ]
        .into_iter()
        .map(|(x, y)| Vertex::new(x, y))
        .collect()
    }

    fn covered_area(vertices: &[Vertex], triangles: &[[usize; 3]]) -> f64 {
        triangles
            .iter()
            .map(|&[a, b, c]| cross(vertices[a], vertices[b], vertices[c]).abs() / 2.0)
            .sum()
    }

    #[test]
    fn test_triangulate_convex_is_fan() {
        let square = [
            Vertex::new(0.0, 0.0),
            Vertex::new(1.0, 0.0),
            Vertex::new(1.0, 1.0),
            Vertex::new(0.0, 1.0),
        ];
        assert_eq!(triangulate(&square), vec![[0, 1, 2], [0, 2, 3]]);
        assert!(triangulate(&square[..2]).is_empty());
    }

    #[test]
    fn test_triangulate_concave_stays_inside() {
        let shape = u_shape();
        let triangles = triangulate(&shape);
        assert_eq!(triangles.len(), shape.len() - 2);
        assert!((covered_area(&shape, &triangles) - 500.0).abs() < 1e-9);

        // Nothing lands in the notch between the arms.
        let notch = Vertex::new(15.0, 15.0);
        for &[a, b, c] in &triangles {
            assert!(!in_triangle(notch, shape[a], shape[b], shape[c]));
        }
    }

    #[test]
    fn test_triangulate_clockwise_input() {
        let mut shape = u_shape();
        shape.reverse();
        let triangles = triangulate(&shape);
        assert_eq!(triangles.len(), shape.len() - 2);
        assert!((covered_area(&shape, &triangles) - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_tessellate_concave_vertex_count() {
        let mut frame = Frame::new();
        frame.fill_polygon(&u_shape(), [1.0, 1.0, 1.0, 1.0]);
        let data = tessellate(&frame, 30, 20);
        assert_eq!(data.len(), 6 * 3 * FLOATS_PER_VERTEX);
    }
}
