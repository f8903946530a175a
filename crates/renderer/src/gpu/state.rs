use std::sync::Arc;

use anyhow::Result;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::compile::ProgramSources;
use crate::scene::SceneState;
use crate::types::RendererConfig;

use super::context::GpuContext;
use super::mesh::{UnitCircleMesh, CIRCLE_SEGMENTS};
use super::pipeline::ScenePipelines;
use super::uniforms::SceneUniforms;
use super::vertex::{circle_instances, line_vertices, CircleInstance, LineVertex};

/// Starting capacity (in points) of the per-frame streamed buffers.
const INITIAL_POINT_CAPACITY: usize = 64;

/// Aggregates every GPU resource needed to present a frame.
///
/// The line and instance buffers are derived state: their contents are fully
/// rewritten from the scene each frame and regrow by powers of two when the
/// chain outgrows them.
pub(crate) struct GpuState {
    context: GpuContext,
    pipelines: ScenePipelines,
    uniforms: SceneUniforms,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    circle_vertex_buffer: wgpu::Buffer,
    circle_index_buffer: wgpu::Buffer,
    circle_index_count: u32,
    line_buffer: wgpu::Buffer,
    line_capacity: usize,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    multisample_target: Option<MultisampleTarget>,
}

impl GpuState {
    /// Creates a fully initialised rendering state for the window.
    ///
    /// Configures the swapchain, compiles both shader programs (falling back
    /// to the embedded sources when the on-disk files are broken), uploads
    /// the static unit-circle mesh, and allocates the streamed buffers.
    pub(crate) fn new(
        window: Arc<Window>,
        initial_size: PhysicalSize<u32>,
        config: &RendererConfig,
    ) -> Result<Self> {
        let context = GpuContext::new(window, initial_size, config.antialiasing)?;
        let pipelines = ScenePipelines::new(
            &context.device,
            context.surface_format,
            context.sample_count,
            &ProgramSources::line(&config.shader_dir),
            &ProgramSources::circle(&config.shader_dir),
        )?;

        let uniforms = SceneUniforms::new(context.size.width, context.size.height);
        let uniform_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("scene uniform buffer"),
                contents: bytemuck::bytes_of(&uniforms),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let uniform_bind_group = context.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene uniform bind group"),
            layout: &pipelines.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let mesh = UnitCircleMesh::generate(CIRCLE_SEGMENTS);
        let circle_vertex_buffer =
            context
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("unit circle vertices"),
                    contents: bytemuck::cast_slice(&mesh.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
        let circle_index_buffer =
            context
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("unit circle indices"),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
        let circle_index_count = mesh.index_count();

        let line_buffer = create_stream_buffer::<LineVertex>(
            &context.device,
            "line vertex buffer",
            INITIAL_POINT_CAPACITY,
        );
        let instance_buffer = create_stream_buffer::<CircleInstance>(
            &context.device,
            "circle instance buffer",
            INITIAL_POINT_CAPACITY,
        );

        let multisample_target = (context.sample_count > 1).then(|| {
            MultisampleTarget::new(
                &context.device,
                context.surface_format,
                context.size,
                context.sample_count,
            )
        });

        Ok(Self {
            context,
            pipelines,
            uniforms,
            uniform_buffer,
            uniform_bind_group,
            circle_vertex_buffer,
            circle_index_buffer,
            circle_index_count,
            line_buffer,
            line_capacity: INITIAL_POINT_CAPACITY,
            instance_buffer,
            instance_capacity: INITIAL_POINT_CAPACITY,
            multisample_target,
        })
    }

    /// Current swapchain size in physical pixels.
    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    /// Reacts to resize events: swapchain, viewport uniform, MSAA target.
    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
        let size = self.context.size;
        self.uniforms
            .set_resolution(size.width as f32, size.height as f32);
        self.context
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.uniforms));
        if self.context.sample_count > 1 {
            self.multisample_target = Some(MultisampleTarget::new(
                &self.context.device,
                self.context.surface_format,
                size,
                self.context.sample_count,
            ));
        }
    }

    /// Uploads the chain-derived buffers and records both draw passes.
    ///
    /// An empty chain still clears to the background color and presents.
    pub(crate) fn render(&mut self, scene: &SceneState) -> Result<(), wgpu::SurfaceError> {
        let vertices = line_vertices(scene.chain());
        let instances = circle_instances(scene.chain());
        let point_count = scene.chain().len() as u32;

        if point_count > 0 {
            self.line_capacity = ensure_capacity::<LineVertex>(
                &self.context.device,
                &mut self.line_buffer,
                "line vertex buffer",
                self.line_capacity,
                vertices.len(),
            );
            self.context
                .queue
                .write_buffer(&self.line_buffer, 0, bytemuck::cast_slice(&vertices));

            self.instance_capacity = ensure_capacity::<CircleInstance>(
                &self.context.device,
                &mut self.instance_buffer,
                "circle instance buffer",
                self.instance_capacity,
                instances.len(),
            );
            self.context
                .queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let [r, g, b] = scene.background_color();
        let clear_color = wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        };

        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("frame encoder"),
                });

        let (attachment_view, resolve_target) = match &self.multisample_target {
            Some(msaa) => (&msaa.view, Some(&view)),
            None => (&view, None),
        };

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: attachment_view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if point_count > 0 {
                let vertex_bytes = (vertices.len() * std::mem::size_of::<LineVertex>()) as u64;
                render_pass.set_pipeline(&self.pipelines.line);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.line_buffer.slice(0..vertex_bytes));
                render_pass.draw(0..point_count, 0..1);

                let instance_bytes =
                    (instances.len() * std::mem::size_of::<CircleInstance>()) as u64;
                render_pass.set_pipeline(&self.pipelines.circle);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.circle_vertex_buffer.slice(..));
                render_pass.set_vertex_buffer(1, self.instance_buffer.slice(0..instance_bytes));
                render_pass
                    .set_index_buffer(self.circle_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                render_pass.draw_indexed(0..self.circle_index_count, 0, 0..point_count);
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn create_stream_buffer<T>(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (capacity * std::mem::size_of::<T>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Regrows a streamed buffer to the next power of two when `required`
/// exceeds the current capacity. Returns the capacity in effect afterwards.
fn ensure_capacity<T>(
    device: &wgpu::Device,
    buffer: &mut wgpu::Buffer,
    label: &str,
    capacity: usize,
    required: usize,
) -> usize {
    if required <= capacity {
        return capacity;
    }

    let new_capacity = required.next_power_of_two().max(INITIAL_POINT_CAPACITY);
    *buffer = create_stream_buffer::<T>(device, label, new_capacity);
    tracing::debug!(label, capacity = new_capacity, "regrew streamed buffer");
    new_capacity
}

struct MultisampleTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa color target"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}
