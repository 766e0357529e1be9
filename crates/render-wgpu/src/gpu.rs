use wgpu::util::DeviceExt;

use crate::RenderError;
use crate::mesh::{Shape, Vertex};
use crate::shaders::{FRAGMENT_ENTRY, FRAGMENT_SHADER, VERTEX_ENTRY, VERTEX_SHADER};

/// Background colour cleared every frame.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.3,
    b: 0.3,
    a: 1.0,
};

/// Construction options for [`QuadRenderer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererOptions {
    pub shape: Shape,
    /// Draw edges only. Needs `Features::POLYGON_MODE_LINE` on the device.
    pub wireframe: bool,
}

/// Draws one static shape with a fixed shader pair.
pub struct QuadRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    shape: Shape,
    wireframe: bool,
    diagnostics: Vec<RenderError>,
}

impl QuadRenderer {
    /// Compile shaders, link the pipeline and upload geometry.
    ///
    /// Compile and link errors are logged and kept in
    /// [`QuadRenderer::diagnostics`]; construction still succeeds and the
    /// resulting pipeline may be invalid.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        options: RendererOptions,
    ) -> Self {
        let mut diagnostics = Vec::new();

        let vertex_shader = compile_shader(device, "vertex", VERTEX_SHADER, &mut diagnostics);
        let fragment_shader =
            compile_shader(device, "fragment", FRAGMENT_SHADER, &mut diagnostics);

        let wireframe = if options.wireframe
            && !device.features().contains(wgpu::Features::POLYGON_MODE_LINE)
        {
            tracing::warn!("wireframe requested but POLYGON_MODE_LINE is unsupported, drawing filled");
            false
        } else {
            options.wireframe
        };

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quad_pipeline_layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quad_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_shader,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_shader,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                polygon_mode: if wireframe {
                    wgpu::PolygonMode::Line
                } else {
                    wgpu::PolygonMode::Fill
                },
                ..Default::default()
            },
            depth_stencil: None,
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            let diagnostic = RenderError::ProgramLink(err.to_string());
            tracing::error!("{diagnostic}");
            diagnostics.push(diagnostic);
        }

        let (vertices, indices) = options.shape.mesh();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vertex_buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_index_buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        tracing::info!(
            shape = %options.shape,
            wireframe,
            vertices = vertices.len(),
            indices = indices.len(),
            "quad renderer ready"
        );

        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            shape: options.shape,
            wireframe,
            diagnostics,
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Whether edges-only drawing is actually in effect.
    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    /// Shader compile and link errors collected during construction.
    pub fn diagnostics(&self) -> &[RenderError] {
        &self.diagnostics
    }

    /// Clear the target and draw the shape.
    pub fn render(&self, device: &wgpu::Device, queue: &wgpu::Queue, view: &wgpu::TextureView) {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("quad_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quad_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..self.index_count, 0, 0..1);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

/// Create a shader module, logging any validation error instead of failing.
fn compile_shader(
    device: &wgpu::Device,
    stage: &'static str,
    source: &str,
    diagnostics: &mut Vec<RenderError>,
) -> wgpu::ShaderModule {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(stage),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        let diagnostic = RenderError::ShaderCompilation {
            stage,
            message: err.to_string(),
        };
        tracing::error!("{diagnostic}");
        diagnostics.push(diagnostic);
    } else {
        tracing::debug!("{stage} shader compiled");
    }
    module
}
