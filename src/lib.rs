//! # Sphere Reveal
//!
//! **A lit sphere under orbiting spotlights that opens the page behind it.**
//!
//! The window shows a grey sphere lit by ten colored spotlights circling it
//! on two rings. Clicking the sphere zooms the camera into it; when the zoom
//! finishes the page content is revealed and the canvas fades out, after
//! which its GPU resources are released.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sphere_reveal::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!     run(AppConfig::new().title("Enter").size(1280, 720))
//! }
//! ```
//!
//! ## Without a window
//!
//! [`SceneAnimator`] only needs something implementing [`RenderSurface`] and
//! a [`PageHost`], so the whole reveal flow can be driven headless:
//!
//! ```
//! use sphere_reveal::*;
//!
//! struct NullSurface(bool);
//!
//! impl RenderSurface for NullSurface {
//!     fn resize(&mut self, _: Viewport, _: f32) {}
//!     fn render(&mut self, _: &Scene) {}
//!     fn dispose(&mut self) { self.0 = true; }
//!     fn is_disposed(&self) -> bool { self.0 }
//! }
//!
//! let viewport = Viewport::new(800.0, 600.0);
//! let mut animator = SceneAnimator::new(Scene::build(viewport), NullSurface(false), viewport, 1.0);
//! let mut page = Page::default();
//!
//! assert_eq!(animator.click(400.0, 300.0), ClickOutcome::Started);
//! animator.frame(1.0, &mut page);
//! assert_eq!(animator.reveal_state(), RevealState::Revealed);
//! assert!(page.has_class(ElementId::Main, "visible"));
//! ```

mod animator;
mod app;
mod camera;
mod color;
mod config;
mod error;
mod frame_loop;
mod gpu;
mod input;
mod light;
mod logging;
mod mesh;
mod picking;
mod reveal;
mod scene;
mod scene_pass;
mod surface;
mod transition;

pub use animator::{ClickOutcome, SceneAnimator, ZOOM_DURATION, ZOOM_TARGET};
pub use app::run;
pub use camera::{DEFAULT_FAR, DEFAULT_FOV, DEFAULT_NEAR, PerspectiveCamera};
pub use color::Color;
pub use config::AppConfig;
pub use error::{Error, Result};
pub use frame_loop::{FrameLoop, TIME_STEP};
pub use gpu::GpuContext;
pub use input::Input;
pub use light::{AmbientLight, LIGHT_COLORS, LightDescriptor, SpotLight, orbit_descriptors};
pub use logging::{DEFAULT_FILTER, init_logging};
pub use mesh::{Mesh, SphereShape, Transform, Vertex3d};
pub use picking::{Collider, Ray, RayHit, pointer_to_ndc, raycast};
pub use reveal::{
    ElementId, ElementState, FADE_OUT_CLASS, OPACITY_PROPERTY, Page, PageHost, RevealState,
    VISIBLE_CLASS, apply_reveal,
};
pub use scene::{CAMERA_DISTANCE, Scene, SpotLightView, StandardMaterial};
pub use scene_pass::{MAX_SPOT_LIGHTS, ScenePass};
pub use surface::{GpuSurface, RenderSurface, Viewport};
pub use transition::{Easing, Tween, TweenStep};

// Re-export glam math types for convenience
pub use glam::{Mat4, Vec2, Vec3};

// ECS types the scene is stored in
pub use hecs::{Entity, World};
