use anyhow::Result;

use crate::compile::{compile_program, ProgramModules, ProgramSources};

use super::vertex::{circle_mesh_layout, CircleInstance, LineVertex};

/// The two render pipelines plus the uniform layout they share.
pub(crate) struct ScenePipelines {
    pub line: wgpu::RenderPipeline,
    pub circle: wgpu::RenderPipeline,
    pub uniform_layout: wgpu::BindGroupLayout,
}

impl ScenePipelines {
    pub(crate) fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
        line_sources: &ProgramSources,
        circle_sources: &ProgramSources,
    ) -> Result<Self> {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene pipeline layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let line_modules = compile_program(device, line_sources)?;
        let line = build_pipeline(
            device,
            &pipeline_layout,
            &line_modules,
            surface_format,
            sample_count,
            wgpu::PrimitiveTopology::LineStrip,
            &[LineVertex::layout()],
            "line pipeline",
        );

        let circle_modules = compile_program(device, circle_sources)?;
        let circle = build_pipeline(
            device,
            &pipeline_layout,
            &circle_modules,
            surface_format,
            sample_count,
            wgpu::PrimitiveTopology::TriangleList,
            &[circle_mesh_layout(), CircleInstance::layout()],
            "circle pipeline",
        );

        Ok(Self {
            line,
            circle,
            uniform_layout,
        })
    }
}

#[allow(clippy::too_many_arguments)]
fn build_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    modules: &ProgramModules,
    surface_format: wgpu::TextureFormat,
    sample_count: u32,
    topology: wgpu::PrimitiveTopology,
    buffers: &[wgpu::VertexBufferLayout<'_>],
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &modules.vertex,
            entry_point: Some("main"),
            buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        fragment: Some(wgpu::FragmentState {
            module: &modules.fragment,
            entry_point: Some("main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview: None,
        cache: None,
    })
}
