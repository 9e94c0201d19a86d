//! The scene animator: the one owner of scene, camera, render surface and
//! reveal state.
//!
//! Every host event is routed through a method here, and each runs to
//! completion before the next begins:
//!
//! - [`SceneAnimator::frame`] on every display refresh
//! - [`SceneAnimator::click`] on a pointer click over the surface
//! - [`SceneAnimator::resize`] when the viewport changes
//! - [`SceneAnimator::transition_end`] when a CSS transition on the canvas ends
//!
//! The reveal flow is `Idle → Transitioning → Revealed`. A click only starts
//! the zoom from `Idle`, so clicks during or after the zoom do nothing.

use glam::Vec3;
use tracing::{debug, info};

use crate::frame_loop::FrameLoop;
use crate::reveal::{
    ElementId, FADE_OUT_CLASS, OPACITY_PROPERTY, PageHost, RevealState, apply_reveal,
};
use crate::scene::Scene;
use crate::surface::{RenderSurface, Viewport};
use crate::transition::{Easing, Tween};

/// Where the camera ends up after zooming into the sphere.
pub const ZOOM_TARGET: Vec3 = Vec3::new(0.0, 0.0, 1.0);
/// Length of the zoom in seconds.
pub const ZOOM_DURATION: f32 = 1.0;

/// Result of a pointer click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The ray missed the sphere.
    Missed,
    /// The click hit the sphere and the zoom started.
    Started,
    /// A reveal is already running or done.
    Ignored,
}

/// Drives the scene from host events.
pub struct SceneAnimator<S: RenderSurface> {
    scene: Scene,
    surface: S,
    frame_loop: FrameLoop,
    reveal: RevealState,
    zoom: Option<Tween>,
    zoom_duration: f32,
    viewport: Viewport,
    pixel_ratio: f32,
}

impl<S: RenderSurface> SceneAnimator<S> {
    /// Take ownership of a built scene and its surface and start the frame loop.
    pub fn new(scene: Scene, mut surface: S, viewport: Viewport, pixel_ratio: f32) -> Self {
        surface.resize(viewport, pixel_ratio);
        let mut frame_loop = FrameLoop::new();
        frame_loop.start();
        debug!(
            width = viewport.width,
            height = viewport.height,
            pixel_ratio,
            "animator started"
        );

        Self {
            scene,
            surface,
            frame_loop,
            reveal: RevealState::Idle,
            zoom: None,
            zoom_duration: ZOOM_DURATION,
            viewport,
            pixel_ratio,
        }
    }

    /// Use a zoom of `seconds` instead of [`ZOOM_DURATION`].
    pub fn with_zoom_duration(mut self, seconds: f32) -> Self {
        self.zoom_duration = seconds.max(0.0);
        self
    }

    /// Run one display refresh.
    ///
    /// Advances a running zoom by `dt` seconds of real time, applying the
    /// page reveal to `page` when it completes. Then, if the frame loop is
    /// running, moves the lights to the next animation time and redraws.
    ///
    /// Returns whether a frame was drawn. After the surface is released the
    /// loop is stopped and this is a no-op.
    pub fn frame(&mut self, dt: f32, page: &mut impl PageHost) -> bool {
        self.advance_zoom(dt, page);

        let Some(time) = self.frame_loop.tick() else {
            return false;
        };
        if self.surface.is_disposed() {
            return false;
        }

        self.scene.update_lights(time);
        self.surface.render(&self.scene);
        true
    }

    fn advance_zoom(&mut self, dt: f32, page: &mut impl PageHost) {
        let Some(zoom) = self.zoom.as_mut() else {
            return;
        };

        let step = zoom.advance(dt);
        self.scene.camera.position = step.value;
        if !step.finished {
            return;
        }

        self.zoom = None;
        apply_reveal(page);
        self.reveal = RevealState::Revealed;
        info!("reveal complete");
    }

    /// Hit-test a click at viewport pixel `(x, y)`.
    ///
    /// Only the sphere is pickable. A hit while idle starts the camera zoom
    /// toward [`ZOOM_TARGET`].
    pub fn click(&mut self, x: f32, y: f32) -> ClickOutcome {
        if self.reveal != RevealState::Idle {
            debug!(state = ?self.reveal, "click ignored");
            return ClickOutcome::Ignored;
        }

        let Some(hit) = self.scene.pick(x, y, self.viewport) else {
            debug!(x, y, "click missed the sphere");
            return ClickOutcome::Missed;
        };

        info!(
            distance = hit.distance,
            point = ?hit.point,
            "sphere clicked, zooming in"
        );
        self.zoom = Some(
            Tween::new(self.scene.camera.position, ZOOM_TARGET, self.zoom_duration)
                .easing(Easing::EaseIn),
        );
        self.reveal = RevealState::Transitioning;
        ClickOutcome::Started
    }

    /// Follow a viewport change: camera aspect, projection and surface size.
    ///
    /// Empty viewports (a minimized window) are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = Viewport::new(width, height);
        if viewport.is_empty() {
            return;
        }

        self.viewport = viewport;
        self.scene.camera.set_viewport(width, height);
        if !self.surface.is_disposed() {
            self.surface.resize(viewport, self.pixel_ratio);
        }
        debug!(width, height, aspect = viewport.aspect(), "viewport resized");
    }

    /// Follow a change of the device pixel ratio.
    pub fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
        if pixel_ratio <= 0.0 || pixel_ratio == self.pixel_ratio {
            return;
        }
        self.pixel_ratio = pixel_ratio;
        if !self.surface.is_disposed() {
            self.surface.resize(self.viewport, pixel_ratio);
        }
    }

    /// React to the end of a CSS transition on the canvas.
    ///
    /// When the canvas's opacity fade finishes, the surface is released and
    /// the frame loop stopped together. Returns whether this call released
    /// the surface; later calls return `false`.
    pub fn transition_end(&mut self, property: &str, page: &impl PageHost) -> bool {
        if property != OPACITY_PROPERTY || !page.has_class(ElementId::Canvas, FADE_OUT_CLASS) {
            return false;
        }
        if self.surface.is_disposed() {
            return false;
        }

        self.frame_loop.stop();
        self.surface.dispose();
        info!(frames = self.frame_loop.frame_count(), "canvas faded out");
        true
    }

    pub fn reveal_state(&self) -> RevealState {
        self.reveal
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn frame_loop(&self) -> &FrameLoop {
        &self.frame_loop
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reveal::Page;

    #[derive(Default)]
    struct FakeSurface {
        renders: usize,
        resizes: Vec<(Viewport, f32)>,
        disposed: bool,
    }

    impl RenderSurface for FakeSurface {
        fn resize(&mut self, viewport: Viewport, pixel_ratio: f32) {
            self.resizes.push((viewport, pixel_ratio));
        }

        fn render(&mut self, _scene: &Scene) {
            self.renders += 1;
        }

        fn dispose(&mut self) {
            self.disposed = true;
        }

        fn is_disposed(&self) -> bool {
            self.disposed
        }
    }

    fn animator() -> SceneAnimator<FakeSurface> {
        let viewport = Viewport::new(800.0, 600.0);
        SceneAnimator::new(Scene::build(viewport), FakeSurface::default(), viewport, 1.0)
    }

    #[test]
    fn new_sizes_surface_and_starts_loop() {
        let animator = animator();
        assert!(animator.frame_loop().is_running());
        assert_eq!(animator.reveal_state(), RevealState::Idle);
        assert_eq!(
            animator.surface().resizes,
            vec![(Viewport::new(800.0, 600.0), 1.0)]
        );
    }

    #[test]
    fn frame_moves_lights_and_renders() {
        let mut animator = animator();
        let mut page = Page::default();

        assert!(animator.frame(0.016, &mut page));
        assert!(animator.frame(0.016, &mut page));

        assert_eq!(animator.surface().renders, 2);
        assert_eq!(animator.frame_loop().frame_count(), 2);
        for view in animator.scene().spot_lights() {
            assert_eq!(view.position, view.light.descriptor.position_at(0.01));
        }
    }

    #[test]
    fn zoom_is_eased_toward_target() {
        let mut animator = animator();
        let mut page = Page::default();

        assert_eq!(animator.click(400.0, 300.0), ClickOutcome::Started);
        animator.frame(0.5, &mut page);

        // power1.in at half time covers a quarter of the way
        let z = animator.scene().camera.position.z;
        assert!((z - (4.5 - 3.5 * 0.25)).abs() < 1e-4);
        assert_eq!(animator.reveal_state(), RevealState::Transitioning);

        animator.frame(0.5, &mut page);
        assert_eq!(animator.scene().camera.position, ZOOM_TARGET);
        assert_eq!(animator.reveal_state(), RevealState::Revealed);
    }

    #[test]
    fn clicks_after_start_are_ignored() {
        let mut animator = animator();
        let mut page = Page::default();

        assert_eq!(animator.click(400.0, 300.0), ClickOutcome::Started);
        assert_eq!(animator.click(400.0, 300.0), ClickOutcome::Ignored);
        animator.frame(1.0, &mut page);
        assert_eq!(animator.click(400.0, 300.0), ClickOutcome::Ignored);
    }

    #[test]
    fn missed_click_stays_idle() {
        let mut animator = animator();
        assert_eq!(animator.click(0.0, 0.0), ClickOutcome::Missed);
        assert_eq!(animator.reveal_state(), RevealState::Idle);
        assert_eq!(animator.scene().camera.position, Vec3::new(0.0, 0.0, 4.5));
    }

    #[test]
    fn resize_updates_aspect_and_surface() {
        let mut animator = animator();
        animator.resize(1000.0, 500.0);

        assert_eq!(animator.scene().camera.aspect, 2.0);
        assert_eq!(animator.viewport(), Viewport::new(1000.0, 500.0));
        assert_eq!(
            animator.surface().resizes.last(),
            Some(&(Viewport::new(1000.0, 500.0), 1.0))
        );

        animator.resize(0.0, 500.0);
        assert_eq!(animator.viewport(), Viewport::new(1000.0, 500.0));
    }

    #[test]
    fn pixel_ratio_change_resizes_surface() {
        let mut animator = animator();
        animator.set_pixel_ratio(2.0);
        animator.set_pixel_ratio(2.0);
        assert_eq!(animator.surface().resizes.len(), 2);
        assert_eq!(animator.pixel_ratio(), 2.0);
    }

    #[test]
    fn transition_end_needs_faded_canvas() {
        let mut animator = animator();
        let mut page = Page::default();
        assert!(!animator.transition_end(OPACITY_PROPERTY, &page));

        page.add_class(ElementId::Canvas, FADE_OUT_CLASS);
        assert!(!animator.transition_end("transform", &page));
        assert!(!animator.surface().is_disposed());
    }

    #[test]
    fn transition_end_disposes_and_stops() {
        let mut animator = animator();
        let mut page = Page::default();
        page.add_class(ElementId::Canvas, FADE_OUT_CLASS);

        assert!(animator.transition_end(OPACITY_PROPERTY, &page));
        assert!(animator.surface().is_disposed());
        assert!(!animator.frame_loop().is_running());
        assert!(!animator.transition_end(OPACITY_PROPERTY, &page));

        assert!(!animator.frame(0.016, &mut page));
        assert_eq!(animator.surface().renders, 0);

        let resizes = animator.surface().resizes.len();
        animator.resize(1000.0, 500.0);
        assert_eq!(animator.surface().resizes.len(), resizes);
        assert_eq!(animator.scene().camera.aspect, 2.0);
    }
}
