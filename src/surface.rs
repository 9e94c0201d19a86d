//! The render surface the scene is painted into.
//!
//! [`RenderSurface`] is the seam between the animator and the GPU: the
//! animator decides when to resize, draw and release the surface, and the
//! implementation does the work. [`GpuSurface`] renders through wgpu into a
//! window; tests substitute a recording fake.

use std::sync::Arc;

use tracing::{info, warn};
use winit::window::Window;

use crate::error::Result;
use crate::gpu::GpuContext;
use crate::mesh::Mesh;
use crate::scene::Scene;
use crate::scene_pass::ScenePass;

/// Viewport size in logical (CSS-like) pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width over height.
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Size in physical pixels for a device pixel ratio.
    pub fn physical_size(&self, pixel_ratio: f32) -> (u32, u32) {
        (
            (self.width * pixel_ratio).round().max(1.0) as u32,
            (self.height * pixel_ratio).round().max(1.0) as u32,
        )
    }
}

/// A drawing target owned by the animator.
pub trait RenderSurface {
    /// Match the drawing buffer to a viewport at the given pixel ratio.
    fn resize(&mut self, viewport: Viewport, pixel_ratio: f32);

    /// Draw the scene from its camera's current pose.
    fn render(&mut self, scene: &Scene);

    /// Release all graphics resources. Later calls to `render` do nothing.
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}

struct GpuResources {
    gpu: GpuContext,
    pass: ScenePass,
    sphere: Mesh,
}

/// wgpu-backed surface drawing into a window.
pub struct GpuSurface {
    resources: Option<GpuResources>,
    opacity: f32,
}

impl GpuSurface {
    /// Create the GPU context for `window` and the resources to draw `scene`.
    pub fn new(window: Arc<Window>, scene: &Scene, sample_count: u32) -> Result<Self> {
        let shape = scene.sphere_shape()?;
        let gpu = GpuContext::new(window)?;
        let pass = ScenePass::new(&gpu, sample_count);
        let sphere = Mesh::sphere(&gpu, &shape);

        info!(
            width = gpu.width(),
            height = gpu.height(),
            samples = sample_count,
            "canvas dimensions"
        );

        Ok(Self {
            resources: Some(GpuResources { gpu, pass, sphere }),
            opacity: 1.0,
        })
    }

    /// Opacity of the canvas over the page; 0.0 shows only the page color.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    fn draw(res: &mut GpuResources, scene: &Scene, opacity: f32) -> Result<()> {
        let output = match res.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = (res.gpu.width(), res.gpu.height());
                res.gpu.resize(width, height);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        res.pass.ensure_size(&res.gpu);

        let mut encoder = res
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        res.pass
            .render(&res.gpu, &mut encoder, &view, scene, &res.sphere, opacity);

        res.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl RenderSurface for GpuSurface {
    fn resize(&mut self, viewport: Viewport, pixel_ratio: f32) {
        if let Some(res) = &mut self.resources {
            let (width, height) = viewport.physical_size(pixel_ratio);
            res.gpu.resize(width, height);
        }
    }

    fn render(&mut self, scene: &Scene) {
        let opacity = self.opacity;
        if let Some(res) = &mut self.resources {
            if let Err(e) = Self::draw(res, scene, opacity) {
                warn!("skipping frame: {e}");
            }
        }
    }

    fn dispose(&mut self) {
        if self.resources.take().is_some() {
            info!("render surface released");
        }
    }

    fn is_disposed(&self) -> bool {
        self.resources.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_aspect() {
        assert_eq!(Viewport::new(1000.0, 500.0).aspect(), 2.0);
    }

    #[test]
    fn physical_size_scales_and_rounds() {
        let viewport = Viewport::new(800.0, 600.0);
        assert_eq!(viewport.physical_size(1.0), (800, 600));
        assert_eq!(viewport.physical_size(2.0), (1600, 1200));
        assert_eq!(viewport.physical_size(1.25), (1000, 750));
    }

    #[test]
    fn empty_viewport() {
        assert!(Viewport::new(0.0, 600.0).is_empty());
        assert!(!Viewport::new(1.0, 1.0).is_empty());
        assert_eq!(Viewport::new(0.0, 0.0).physical_size(1.0), (1, 1));
    }
}
