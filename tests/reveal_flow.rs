//! End-to-end reveal flow against a recording surface and an in-memory page.

use sphere_reveal::{
    ClickOutcome, ElementId, ElementState, OPACITY_PROPERTY, Page, PageHost, RenderSurface,
    RevealState, Scene, SceneAnimator, TIME_STEP, Vec3, Viewport,
};

#[derive(Default)]
struct RecordingSurface {
    frames: Vec<Vec<Vec3>>,
    sizes: Vec<(u32, u32)>,
    disposed: bool,
}

impl RenderSurface for RecordingSurface {
    fn resize(&mut self, viewport: Viewport, pixel_ratio: f32) {
        self.sizes.push(viewport.physical_size(pixel_ratio));
    }

    fn render(&mut self, scene: &Scene) {
        self.frames
            .push(scene.spot_lights().iter().map(|view| view.position).collect());
    }

    fn dispose(&mut self) {
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

// A power of two keeps the accumulated zoom time exact.
const FRAME_DT: f32 = 1.0 / 64.0;

fn animator(width: f32, height: f32) -> SceneAnimator<RecordingSurface> {
    let viewport = Viewport::new(width, height);
    SceneAnimator::new(
        Scene::build(viewport),
        RecordingSurface::default(),
        viewport,
        1.0,
    )
}

/// Run frames until the zoom completes, returning how many it took.
fn run_zoom(animator: &mut SceneAnimator<RecordingSurface>, page: &mut Page) -> usize {
    let mut frames = 0;
    while animator.reveal_state() == RevealState::Transitioning {
        animator.frame(FRAME_DT, page);
        frames += 1;
        assert!(frames < 1000, "zoom never finished");
    }
    frames
}

fn assert_close(a: Vec3, b: Vec3) {
    assert!((a - b).length() < 1e-3, "{a} != {b}");
}

#[test]
fn center_click_reveals_page() {
    let mut animator = animator(800.0, 600.0);
    let mut page = Page::default();

    assert_eq!(animator.click(400.0, 300.0), ClickOutcome::Started);
    assert_eq!(animator.reveal_state(), RevealState::Transitioning);

    // Nothing on the page changes until the zoom is done.
    animator.frame(FRAME_DT, &mut page);
    for id in ElementId::ALL {
        assert_eq!(page.element(id), &ElementState::default());
    }

    // One second of zoom is 64 frames, one of which already ran.
    assert_eq!(run_zoom(&mut animator, &mut page), 63);

    assert_eq!(animator.reveal_state(), RevealState::Revealed);
    assert_eq!(animator.scene().camera.position, Vec3::new(0.0, 0.0, 1.0));
    assert!(page.has_class(ElementId::Main, "visible"));
    assert!(page.has_class(ElementId::Canvas, "fade-out"));
    assert_eq!(page.style(ElementId::BlueOverlay, "opacity"), Some("0"));
    assert_eq!(page.style(ElementId::EnterButton, "display"), Some("none"));
    assert_eq!(page.style(ElementId::Wrapper, "pointerEvents"), Some("auto"));
}

#[test]
fn camera_moves_monotonically_during_zoom() {
    let mut animator = animator(800.0, 600.0);
    let mut page = Page::default();
    animator.click(400.0, 300.0);

    let mut last_z = animator.scene().camera.position.z;
    let mut last_step = 0.0;
    while animator.reveal_state() == RevealState::Transitioning {
        animator.frame(FRAME_DT, &mut page);
        let position = animator.scene().camera.position;
        assert_eq!((position.x, position.y), (0.0, 0.0));
        let step = last_z - position.z;
        assert!(step >= last_step - 1e-5, "ease-in must not slow down");
        last_step = step;
        last_z = position.z;
    }
}

#[test]
fn repeated_clicks_fire_one_reveal() {
    let mut animator = animator(800.0, 600.0);
    let mut page = Page::default();

    assert_eq!(animator.click(400.0, 300.0), ClickOutcome::Started);
    animator.frame(0.3, &mut page);
    let mid_zoom = animator.scene().camera.position;

    assert_eq!(animator.click(400.0, 300.0), ClickOutcome::Ignored);
    assert_eq!(animator.scene().camera.position, mid_zoom);

    run_zoom(&mut animator, &mut page);
    let revealed = page.clone();

    assert_eq!(animator.click(400.0, 300.0), ClickOutcome::Ignored);
    animator.frame(FRAME_DT, &mut page);
    for id in ElementId::ALL {
        assert_eq!(page.element(id), revealed.element(id));
    }
    assert_eq!(animator.scene().camera.position, Vec3::new(0.0, 0.0, 1.0));
}

#[test]
fn corner_click_changes_nothing() {
    let mut animator = animator(800.0, 600.0);
    let mut page = Page::default();

    assert_eq!(animator.click(0.0, 0.0), ClickOutcome::Missed);
    for _ in 0..120 {
        animator.frame(FRAME_DT, &mut page);
    }

    assert_eq!(animator.reveal_state(), RevealState::Idle);
    assert_eq!(animator.scene().camera.position, Vec3::new(0.0, 0.0, 4.5));
    for id in ElementId::ALL {
        assert_eq!(page.element(id), &ElementState::default());
    }
}

#[test]
fn miss_then_hit_still_reveals() {
    let mut animator = animator(800.0, 600.0);
    let mut page = Page::default();

    assert_eq!(animator.click(790.0, 10.0), ClickOutcome::Missed);
    assert_eq!(animator.click(400.0, 300.0), ClickOutcome::Started);
    run_zoom(&mut animator, &mut page);
    assert!(page.has_class(ElementId::Main, "visible"));
}

#[test]
fn resize_tracks_aspect() {
    let mut animator = animator(800.0, 600.0);
    assert!((animator.scene().camera.aspect - 4.0 / 3.0).abs() < 1e-6);

    animator.resize(1000.0, 500.0);
    assert_eq!(animator.scene().camera.aspect, 2.0);
    assert_eq!(animator.surface().sizes.last(), Some(&(1000, 500)));

    // A proportional resize keeps the aspect.
    animator.resize(1024.0, 512.0);
    assert_eq!(animator.scene().camera.aspect, 2.0);
}

#[test]
fn hit_test_follows_resize() {
    let mut animator = animator(800.0, 600.0);
    animator.resize(1000.0, 500.0);
    assert_eq!(animator.click(500.0, 250.0), ClickOutcome::Started);
}

#[test]
fn lights_follow_frame_clock() {
    let mut animator = animator(800.0, 600.0);
    let mut page = Page::default();

    for _ in 0..3 {
        animator.frame(FRAME_DT, &mut page);
    }

    let frames = &animator.surface().frames;
    assert_eq!(frames.len(), 3);
    let views = animator.scene().spot_lights();
    for (n, frame) in frames.iter().enumerate() {
        let time = n as f64 * TIME_STEP;
        for (position, view) in frame.iter().zip(&views) {
            assert_close(*position, view.light.descriptor.position_at(time));
        }
    }
}

#[test]
fn golden_light_positions() {
    let scene = Scene::build(Viewport::new(800.0, 600.0));
    let views = scene.spot_lights();
    let light0 = views[0].light.descriptor;
    let light7 = views[7].light.descriptor;

    assert_close(light0.position_at(0.0), Vec3::new(100.0, 0.0, 0.0));
    assert_close(light0.position_at(1.0), Vec3::new(87.7583, 0.5910, 47.9426));
    assert_close(light0.position_at(10.0), Vec3::new(28.3662, 0.2822, -95.8924));

    assert_close(light7.position_at(0.0), Vec3::new(-97.0820, 1.1169, 70.5342));
    assert_close(light7.position_at(1.0), Vec3::new(-119.6918, 1.4457, -8.5944));
    assert_close(light7.position_at(10.0), Vec3::new(-119.5304, -0.9248, -10.6057));
}

#[test]
fn fade_end_releases_surface_and_stops_frames() {
    let mut animator = animator(800.0, 600.0);
    let mut page = Page::new(0.5);

    animator.click(400.0, 300.0);
    run_zoom(&mut animator, &mut page);

    // Drive the page the way the window loop does.
    let mut released = false;
    for _ in 0..120 {
        if let Some(property) = page.tick(FRAME_DT) {
            assert_eq!(property, OPACITY_PROPERTY);
            released = animator.transition_end(property, &page);
        }
        animator.frame(FRAME_DT, &mut page);
        if released {
            break;
        }
    }

    assert!(released);
    assert!(animator.surface().is_disposed());
    assert!(!animator.frame_loop().is_running());
    assert_eq!(page.canvas_opacity(), 0.0);

    let drawn = animator.surface().frames.len();
    let time = animator.frame_loop().time();
    for _ in 0..10 {
        assert!(!animator.frame(FRAME_DT, &mut page));
    }
    assert_eq!(animator.surface().frames.len(), drawn);
    assert_eq!(animator.frame_loop().time(), time);

    assert!(!animator.transition_end(OPACITY_PROPERTY, &page));
}

#[test]
fn unrelated_transition_end_is_ignored() {
    let mut animator = animator(800.0, 600.0);
    let mut page = Page::default();
    animator.click(400.0, 300.0);
    run_zoom(&mut animator, &mut page);

    assert!(!animator.transition_end("transform", &page));
    assert!(!animator.surface().is_disposed());
    assert!(animator.frame(FRAME_DT, &mut page));
}
