//! Sphere geometry, GPU mesh buffers and spatial transforms.
//!
//! - [`Vertex3d`] — position, normal and UV, 32 bytes per vertex
//! - [`SphereShape`] — the tessellation parameters of a UV sphere
//! - [`Mesh`] — GPU-resident vertex and index buffers
//! - [`Transform`] — position, rotation and scale of a scene entity
//!
//! # Vertex Layout
//!
//! | Attribute | Format    | Offset | Shader Location |
//! |-----------|-----------|--------|-----------------|
//! | position  | Float32x3 | 0      | 0               |
//! | normal    | Float32x3 | 12     | 1               |
//! | uv        | Float32x2 | 24     | 2               |

use crate::gpu::GpuContext;
use glam::{Mat4, Quat, Vec3};

/// A vertex with position, normal, and texture coordinates.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    pub position: [f32; 3],
    /// Unit surface normal.
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex3d {
    /// The wgpu vertex buffer layout for this vertex type.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Tessellation of a UV sphere centered at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereShape {
    pub radius: f32,
    /// Longitudinal divisions (around the equator).
    pub segments: u32,
    /// Latitudinal divisions (pole to pole).
    pub rings: u32,
}

impl SphereShape {
    pub fn new(radius: f32, segments: u32, rings: u32) -> Self {
        Self {
            radius,
            segments: segments.max(3),
            rings: rings.max(2),
        }
    }

    /// Generate the vertex and index data for this sphere.
    ///
    /// Produces `(segments + 1) × (rings + 1)` vertices (the seam is
    /// duplicated for UVs) and `segments × rings × 2` triangles with
    /// counter-clockwise winding seen from outside.
    pub fn geometry(&self) -> (Vec<Vertex3d>, Vec<u32>) {
        let segments = self.segments;
        let rings = self.rings;
        let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
        let mut indices = Vec::with_capacity((segments * rings * 6) as usize);

        for ring in 0..=rings {
            let phi = std::f32::consts::PI * ring as f32 / rings as f32;
            let y = phi.cos();
            let ring_radius = phi.sin();

            for seg in 0..=segments {
                let theta = std::f32::consts::TAU * seg as f32 / segments as f32;
                let x = ring_radius * theta.cos();
                let z = ring_radius * theta.sin();

                let position = [x * self.radius, y * self.radius, z * self.radius];
                let normal = [x, y, z];
                let uv = [seg as f32 / segments as f32, ring as f32 / rings as f32];

                vertices.push(Vertex3d::new(position, normal, uv));
            }
        }

        for ring in 0..rings {
            for seg in 0..segments {
                let current = ring * (segments + 1) + seg;
                let next = current + segments + 1;

                indices.push(current);
                indices.push(current + 1);
                indices.push(next);

                indices.push(current + 1);
                indices.push(next + 1);
                indices.push(next);
            }
        }

        (vertices, indices)
    }
}

/// GPU-resident mesh geometry with vertex and index buffers.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl Mesh {
    /// Upload vertex and index data to new GPU buffers.
    pub fn new(gpu: &GpuContext, vertices: &[Vertex3d], indices: &[u32]) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// Build a sphere mesh from its shape.
    pub fn sphere(gpu: &GpuContext, shape: &SphereShape) -> Self {
        let (vertices, indices) = shape.geometry();
        Self::new(gpu, &vertices, &indices)
    }
}

/// Position, rotation and scale of a scene entity.
///
/// Converted to a matrix in Scale → Rotate → Translate order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}
