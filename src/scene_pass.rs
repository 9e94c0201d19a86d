//! Lit scene rendering pass with depth testing and optional multisampling.
//!
//! # Architecture
//!
//! The pass uses two bind groups:
//! - **Group 0**: Scene uniforms (view-projection, camera position, canvas
//!   opacity, ambient light, page color and up to [`MAX_SPOT_LIGHTS`] spotlights)
//! - **Group 1**: Model uniforms (model matrix, normal matrix, material)
//!
//! Back-face culling is disabled so double-sided materials render from
//! inside; single-sided materials discard back faces in the shader.
//!
//! # Depth and MSAA targets
//!
//! The pass owns its depth buffer and, when multisampling, a color target
//! that resolves into the surface texture. Both follow the surface size via
//! [`ScenePass::ensure_size`].

use crate::color::Color;
use crate::gpu::GpuContext;
use crate::mesh::{Mesh, Vertex3d};
use crate::scene::Scene;

/// Largest number of spotlights the shader accepts.
pub const MAX_SPOT_LIGHTS: usize = 10;

/// Color the canvas blends toward as it fades out.
pub const PAGE_COLOR: Color = Color::WHITE;

/// One spotlight as laid out for the shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpotLightUniform {
    /// xyz: world position, w: intensity.
    pub position: [f32; 4],
    /// xyz: unit direction toward the target, w: cosine of the outer cone edge.
    pub direction: [f32; 4],
    /// rgb: linear color, w: cosine of the inner cone edge.
    pub color: [f32; 4],
}

/// Per-frame scene uniforms.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// xyz: camera position, w: canvas opacity.
    pub camera_pos: [f32; 4],
    pub ambient: [f32; 4],
    pub page_color: [f32; 4],
    pub lights: [SpotLightUniform; MAX_SPOT_LIGHTS],
    pub light_count: u32,
    pub _pad: [u32; 3],
}

impl SceneUniforms {
    /// Gather the camera and light state of `scene` for one frame.
    pub fn from_scene(scene: &Scene, opacity: f32) -> Self {
        let mut lights = [SpotLightUniform::default(); MAX_SPOT_LIGHTS];
        let views = scene.spot_lights();
        let light_count = views.len().min(MAX_SPOT_LIGHTS);

        for (slot, view) in lights.iter_mut().zip(views.iter()) {
            let direction = view.light.direction_from(view.position);
            let (outer, inner) = view.light.cone_cosines();
            let [r, g, b, _] = view.light.descriptor.color.to_linear();
            *slot = SpotLightUniform {
                position: view.position.extend(view.light.intensity).to_array(),
                direction: direction.extend(outer).to_array(),
                color: [r, g, b, inner],
            };
        }

        let [ar, ag, ab] = scene.ambient();

        Self {
            view_proj: scene.camera.view_projection().to_cols_array_2d(),
            camera_pos: scene.camera.position.extend(opacity).to_array(),
            ambient: [ar, ag, ab, 1.0],
            page_color: PAGE_COLOR.to_linear(),
            lights,
            light_count: light_count as u32,
            _pad: [0; 3],
        }
    }
}

/// Per-draw model uniforms.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniforms {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of the model matrix.
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub emissive: [f32; 4],
    /// x: roughness, y: metalness, z: 1.0 when double sided.
    pub surface: [f32; 4],
}

/// Renders the scene's sphere under its lights.
pub struct ScenePass {
    pipeline: wgpu::RenderPipeline,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    msaa_view: Option<wgpu::TextureView>,
    sample_count: u32,
    size: (u32, u32),
}

impl ScenePass {
    /// Create the pipeline and its buffers for `sample_count` samples per pixel.
    pub fn new(gpu: &GpuContext, sample_count: u32) -> Self {
        let device = &gpu.device;
        let sample_count = sample_count.max(1);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        // Scene uniform buffer (group 0)
        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let scene_bind_group_layout = Self::uniform_layout(device, "Scene Bind Group Layout");
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        // Model uniform buffer (group 1)
        let model_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Uniforms"),
            size: std::mem::size_of::<ModelUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let model_bind_group_layout = Self::uniform_layout(device, "Model Bind Group Layout");
        let model_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Bind Group"),
            layout: &model_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: model_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&scene_bind_group_layout, &model_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[Vertex3d::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.format(),
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                front_face: wgpu::FrontFace::Ccw,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                ..Default::default()
            },
            multiview: None,
            cache: None,
        });

        let (depth_view, msaa_view) = Self::create_targets(gpu, sample_count);

        Self {
            pipeline,
            scene_buffer,
            scene_bind_group,
            model_buffer,
            model_bind_group,
            depth_view,
            msaa_view,
            sample_count,
            size: (gpu.width(), gpu.height()),
        }
    }

    fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
    }

    fn create_targets(
        gpu: &GpuContext,
        sample_count: u32,
    ) -> (wgpu::TextureView, Option<wgpu::TextureView>) {
        let size = wgpu::Extent3d {
            width: gpu.width(),
            height: gpu.height(),
            depth_or_array_layers: 1,
        };

        let depth = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Scene Depth Texture"),
            size,
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let msaa = (sample_count > 1).then(|| {
            gpu.device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some("Scene MSAA Texture"),
                    size,
                    mip_level_count: 1,
                    sample_count,
                    dimension: wgpu::TextureDimension::D2,
                    format: gpu.format(),
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        });

        (
            depth.create_view(&wgpu::TextureViewDescriptor::default()),
            msaa,
        )
    }

    /// Recreate the depth and MSAA targets if the surface size changed.
    pub fn ensure_size(&mut self, gpu: &GpuContext) {
        if self.size != (gpu.width(), gpu.height()) {
            let (depth_view, msaa_view) = Self::create_targets(gpu, self.sample_count);
            self.depth_view = depth_view;
            self.msaa_view = msaa_view;
            self.size = (gpu.width(), gpu.height());
        }
    }

    /// Clear `target` and draw the scene's sphere into it.
    ///
    /// `opacity` is the canvas opacity: at 0.0 every pixel, including the
    /// background, shows [`PAGE_COLOR`].
    pub fn render(
        &self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        scene: &Scene,
        sphere: &Mesh,
        opacity: f32,
    ) {
        let scene_uniforms = SceneUniforms::from_scene(scene, opacity);
        gpu.queue.write_buffer(
            &self.scene_buffer,
            0,
            bytemuck::cast_slice(&[scene_uniforms]),
        );

        let sphere_parts = scene.sphere_parts();
        if let Some((transform, _, material)) = &sphere_parts {
            let model_matrix = transform.matrix();
            let normal_matrix = model_matrix.inverse().transpose();
            let model_uniforms = ModelUniforms {
                model: model_matrix.to_cols_array_2d(),
                normal_matrix: normal_matrix.to_cols_array_2d(),
                color: material.color.to_linear(),
                emissive: material.emissive.to_linear(),
                surface: [
                    material.roughness,
                    material.metalness,
                    if material.double_sided { 1.0 } else { 0.0 },
                    0.0,
                ],
            };
            gpu.queue.write_buffer(
                &self.model_buffer,
                0,
                bytemuck::cast_slice(&[model_uniforms]),
            );
        }

        let clear = scene.background.lerp(PAGE_COLOR, 1.0 - opacity).to_wgpu();
        let (view, resolve_target, store) = match &self.msaa_view {
            Some(msaa) => (msaa, Some(target), wgpu::StoreOp::Discard),
            None => (target, None, wgpu::StoreOp::Store),
        };

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if sphere_parts.is_none() {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
        render_pass.set_bind_group(1, &self.model_bind_group, &[]);
        render_pass.set_vertex_buffer(0, sphere.vertex_buffer.slice(..));
        render_pass.set_index_buffer(sphere.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..sphere.index_count, 0, 0..1);
    }
}
