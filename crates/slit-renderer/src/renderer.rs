//! Instanced shape renderer

use crate::scene::{background, ShapeInstance};
use crate::view::{SceneView, ViewUniform};

/// Initial instance capacity; grows by doubling
const INITIAL_CAPACITY: u64 = 4096;

pub struct SlitRenderer {
    render_pipeline: wgpu::RenderPipeline,
    view_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    instance_capacity: u64,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    /// sRGB surfaces expect linear values and encode on store
    srgb_target: bool,
    encoded: Vec<ShapeInstance>,
}

impl SlitRenderer {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        // Create view buffer
        let view_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("View Buffer"),
            size: std::mem::size_of::<ViewUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let instance_buffer = Self::create_instance_buffer(device, INITIAL_CAPACITY);

        // Load shader
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shape Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/shape.wgsl").into()),
        });

        // Create bind group layout
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Shape Bind Group Layout"),
            entries: &[
                // View (Uniform) - Binding 0
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Shapes (Storage) - Binding 1
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group =
            Self::create_bind_group(device, &bind_group_layout, &view_buffer, &instance_buffer);

        // Create pipeline
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shape Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shape Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vertex"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fragment"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        log::debug!(
            "Shape renderer ready ({} byte instances, capacity {})",
            std::mem::size_of::<ShapeInstance>(),
            INITIAL_CAPACITY
        );

        Self {
            render_pipeline,
            view_buffer,
            instance_buffer,
            instance_capacity: INITIAL_CAPACITY,
            bind_group_layout,
            bind_group,
            srgb_target: surface_format.is_srgb(),
            encoded: Vec::new(),
        }
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Shape Instance Buffer"),
            size: capacity * std::mem::size_of::<ShapeInstance>() as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        view_buffer: &wgpu::Buffer,
        instance_buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Shape Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: view_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: instance_buffer.as_entire_binding(),
                },
            ],
        })
    }

    /// Grow the instance buffer (and rebind) if `count` shapes don't fit
    fn ensure_capacity(&mut self, device: &wgpu::Device, count: u64) {
        if count <= self.instance_capacity {
            return;
        }

        let mut capacity = self.instance_capacity;
        while capacity < count {
            capacity *= 2;
        }
        log::debug!(
            "Growing shape instance buffer {} -> {}",
            self.instance_capacity,
            capacity
        );

        self.instance_buffer = Self::create_instance_buffer(device, capacity);
        self.instance_capacity = capacity;
        self.bind_group = Self::create_bind_group(
            device,
            &self.bind_group_layout,
            &self.view_buffer,
            &self.instance_buffer,
        );
    }

    /// Clear the frame and draw `shapes` in order
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &wgpu::TextureView,
        view: &SceneView,
        shapes: &[ShapeInstance],
    ) {
        self.ensure_capacity(device, shapes.len() as u64);

        let srgb_target = self.srgb_target;
        self.encoded.clear();
        self.encoded.extend(shapes.iter().map(|shape| ShapeInstance {
            color: surface_color(shape.color, srgb_target),
            ..*shape
        }));

        queue.write_buffer(&self.view_buffer, 0, bytemuck::cast_slice(&[view.to_uniform()]));
        if !self.encoded.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&self.encoded));
        }

        let [r, g, b, a] = surface_color(background(), srgb_target).map(|c| c as f64);

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Shape Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.draw(0..6, 0..shapes.len() as u32);
    }
}

/// Encode a straight sRGB color for the surface. sRGB targets take linear
/// values; other targets store what they are given.
pub fn surface_color(color: [f32; 4], srgb_target: bool) -> [f32; 4] {
    if !srgb_target {
        return color;
    }
    let [r, g, b, a] = color;
    [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), a]
}

/// sRGB transfer function
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
