use std::sync::Arc;
use std::time::Instant;
use glam::Vec2;
use rand::{rngs::StdRng, SeedableRng};
use wgpu::util::DeviceExt;
use winit::{window::Window, event::WindowEvent};
use crate::{
    camera::{Camera, CameraController},
    config,
    error::{AppError, TransformError},
    input::InputState,
    scene::{self, Placement, SceneMeshes},
    shader,
    texture::{GpuTexture, TextureImage},
    transform::{TransformList, TransformUniform},
    vertex::{CircleLayout, TexturedVertex, Vertex},
};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

pub struct GpuContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    pub depth_texture: wgpu::TextureView,
}

impl GpuContext {
    pub async fn new(window: Arc<Window>) -> Result<Self, AppError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window)?;
        let adapter = instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }).await.ok_or(AppError::NoAdapter)?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter.request_device(&wgpu::DeviceDescriptor::default(), None).await?;
        let mut config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .ok_or(AppError::UnsupportedSurface)?;
        // Frame pacing is done by the loop; don't let vsync double-throttle
        let caps = surface.get_capabilities(&adapter);
        if caps.present_modes.contains(&wgpu::PresentMode::Mailbox) {
            config.present_mode = wgpu::PresentMode::Mailbox;
        }
        surface.configure(&device, &config);

        let depth_texture = Self::create_depth(&device, &config);
        Ok(Self { surface, device, queue, config, size, depth_texture })
    }

    fn create_depth(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
        let desc = wgpu::TextureDescriptor {
            label: Some("Depth"), size: wgpu::Extent3d { width: config.width, height: config.height, depth_or_array_layers: 1 },
            mip_level_count: 1, sample_count: 1, dimension: wgpu::TextureDimension::D2, format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT, view_formats: &[],
        };
        device.create_texture(&desc).create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            log::info!("Resizing surface to {}x{}", new_size.width, new_size.height);
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = Self::create_depth(&self.device, &self.config);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipelineKind {
    Colored,
    Textured,
    Circle,
}

// One uploaded mesh plus the transform list rebuilt for it every frame
struct MeshDraw {
    kind: PipelineKind,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    placement: Placement,
    transforms: TransformList,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl MeshDraw {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        kind: PipelineKind,
        vertex_bytes: &[u8],
        indices: &[u32],
        placement: Placement,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label), contents: vertex_bytes, usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label), contents: bytemuck::cast_slice(indices), usage: wgpu::BufferUsages::INDEX,
        });
        let transforms = TransformList::new();
        let uniform = TransformUniform::from_list(glam::Mat4::IDENTITY, &transforms);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Transform Buffer"), contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout, entries: &[wgpu::BindGroupEntry { binding: 0, resource: uniform_buffer.as_entire_binding() }], label: None,
        });
        Self {
            kind, vertex_buffer, index_buffer, index_count: indices.len() as u32,
            placement, transforms, uniform_buffer, bind_group,
        }
    }
}

struct PipelineBuilder<'a> {
    device: &'a wgpu::Device,
    vertex_module: &'a wgpu::ShaderModule,
    fragment_module: &'a wgpu::ShaderModule,
    format: wgpu::TextureFormat,
}

impl PipelineBuilder<'_> {
    fn build(
        &self,
        label: &str,
        layout: &wgpu::PipelineLayout,
        vs_entry: &str,
        fs_entry: &str,
        buffer: wgpu::VertexBufferLayout,
    ) -> wgpu::RenderPipeline {
        self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label), layout: Some(layout),
            vertex: wgpu::VertexState { module: self.vertex_module, entry_point: vs_entry, buffers: &[buffer] },
            fragment: Some(wgpu::FragmentState {
                module: self.fragment_module, entry_point: fs_entry,
                targets: &[Some(wgpu::ColorTargetState { format: self.format, blend: Some(wgpu::BlendState::REPLACE), write_mask: wgpu::ColorWrites::ALL })],
            }),
            // Fan and patch winding differ from the closed meshes, so no culling
            primitive: wgpu::PrimitiveState { topology: wgpu::PrimitiveTopology::TriangleList, cull_mode: None, ..Default::default() },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT, depth_write_enabled: true, depth_compare: wgpu::CompareFunction::Less, stencil: wgpu::StencilState::default(), bias: wgpu::DepthBiasState::default()
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        })
    }
}

pub struct State {
    pub ctx: GpuContext,
    colored_pipeline: wgpu::RenderPipeline,
    textured_pipeline: wgpu::RenderPipeline,
    circle_pipeline: wgpu::RenderPipeline,
    texture_bind_group: wgpu::BindGroup,
    meshes: Vec<MeshDraw>,
    pub camera: Camera,
    camera_controller: CameraController,
    pub input: InputState,
    orbit: Vec2,
    started: Instant,
    last_frame_time: Instant,
}

impl State {
    pub async fn new(window: Arc<Window>) -> Result<Self, AppError> {
        let vertex_source = shader::load_source(config::VERTEX_SHADER_PATH)?;
        let fragment_source = shader::load_source(config::FRAGMENT_SHADER_PATH)?;
        let meshes = SceneMeshes::build(StdRng::from_entropy())?;
        let image = TextureImage::load_or_white(config::EARTH_TEXTURE_PATH);

        let ctx = GpuContext::new(window).await?;
        let device = &ctx.device;

        let transform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0, visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer { ty: wgpu::BufferBindingType::Uniform, has_dynamic_offset: false, min_binding_size: None }, count: None,
            }], label: Some("Transform Layout"),
        });
        let texture_layout = GpuTexture::bind_group_layout(device);
        let texture = GpuTexture::upload(device, &ctx.queue, &image, "Earth Texture");
        let texture_bind_group = texture.bind_group(device, &texture_layout);

        let colored_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Colored Layout"), bind_group_layouts: &[&transform_layout], push_constant_ranges: &[],
        });
        let textured_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Textured Layout"), bind_group_layouts: &[&transform_layout, &texture_layout], push_constant_ranges: &[],
        });

        let vertex_module = shader::create_module(device, "Vertex Shader", &vertex_source);
        let fragment_module = shader::create_module(device, "Fragment Shader", &fragment_source);
        let builder = PipelineBuilder {
            device, vertex_module: &vertex_module, fragment_module: &fragment_module, format: ctx.config.format,
        };
        let colored_pipeline = builder.build("Colored Pipeline", &colored_layout, "vs_colored", "fs_colored", Vertex::layout());
        let textured_pipeline = builder.build("Textured Pipeline", &textured_layout, "vs_textured", "fs_textured", TexturedVertex::layout());
        let circle_pipeline = builder.build("Circle Pipeline", &textured_layout, "vs_circle", "fs_textured", CircleLayout::layout());

        let meshes = vec![
            MeshDraw::new(device, &transform_layout, "Sphere", PipelineKind::Colored,
                bytemuck::cast_slice(meshes.sphere.vertices.as_slice()), meshes.sphere.indices.as_slice(), scene::sphere_placement()),
            MeshDraw::new(device, &transform_layout, "Cube", PipelineKind::Colored,
                bytemuck::cast_slice(meshes.cube.vertices.as_slice()), meshes.cube.indices.as_slice(), scene::cube_placement()),
            MeshDraw::new(device, &transform_layout, "Earth", PipelineKind::Textured,
                bytemuck::cast_slice(meshes.earth.vertices.as_slice()), meshes.earth.indices.as_slice(), scene::earth_placement()),
            MeshDraw::new(device, &transform_layout, "Circle", PipelineKind::Circle,
                bytemuck::cast_slice(meshes.circle.floats.as_slice()), meshes.circle.indices.as_slice(), scene::circle_placement()),
        ];

        let aspect = ctx.config.width as f32 / ctx.config.height as f32;
        let input = InputState::new(ctx.config.width, ctx.config.height);
        let now = Instant::now();
        Ok(Self {
            ctx, colored_pipeline, textured_pipeline, circle_pipeline, texture_bind_group, meshes,
            camera: Camera::new(aspect), camera_controller: CameraController::new(), input,
            orbit: Vec2::ZERO, started: now, last_frame_time: now,
        })
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.ctx.size
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        self.camera.aspect = self.ctx.config.width as f32 / self.ctx.config.height as f32;
        self.input.resize(self.ctx.config.width, self.ctx.config.height);
    }

    pub fn input(&mut self, event: &WindowEvent) -> bool {
        self.input.handle_event(event)
    }

    pub fn update(&mut self) -> Result<(), TransformError> {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame_time).as_secs_f32().clamp(0.0001, 0.1);
        self.last_frame_time = now;
        let time = now.duration_since(self.started).as_secs_f32();

        self.camera_controller.process_actions(self.input.active_actions());
        self.camera_controller.update_camera(&mut self.camera, dt);

        let drag = self.input.take_drag_delta();
        self.orbit += drag * config::DRAG_SENSITIVITY;

        let view_proj = self.camera.view_projection();
        for mesh in &mut self.meshes {
            mesh.placement.write_transforms(&mut mesh.transforms, time, self.orbit)?;
            let uniform = TransformUniform::from_list(view_proj, &mesh.transforms);
            self.ctx.queue.write_buffer(&mesh.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
        }
        Ok(())
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: None,
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view, resolve_target: None,
                    ops: wgpu::Operations { load: wgpu::LoadOp::Clear(config::CLEAR_COLOR), store: wgpu::StoreOp::Store },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture,
                    depth_ops: Some(wgpu::Operations { load: wgpu::LoadOp::Clear(1.0), store: wgpu::StoreOp::Store }),
                    stencil_ops: None,
                }),
                timestamp_writes: None, occlusion_query_set: None,
            });

            for mesh in &self.meshes {
                let pipeline = match mesh.kind {
                    PipelineKind::Colored => &self.colored_pipeline,
                    PipelineKind::Textured => &self.textured_pipeline,
                    PipelineKind::Circle => &self.circle_pipeline,
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &mesh.bind_group, &[]);
                if mesh.kind != PipelineKind::Colored {
                    render_pass.set_bind_group(1, &self.texture_bind_group, &[]);
                }
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }
        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
