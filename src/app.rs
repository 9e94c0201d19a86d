use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::animator::{ClickOutcome, SceneAnimator};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::input::Input;
use crate::reveal::Page;
use crate::scene::Scene;
use crate::surface::{GpuSurface, Viewport};

/// Open a window, show the scene and run until the window is closed.
///
/// Returns the error that prevented the window or GPU from starting, if any.
///
/// # Example
/// ```no_run
/// let config = sphere_reveal::AppConfig::new().title("Enter").size(1280, 720);
/// sphere_reveal::run(config).unwrap();
/// ```
pub fn run(config: AppConfig) -> Result<()> {
    let event_loop = EventLoop::new()?;
    // Frames are driven by redraw requests, which stop once the canvas is released.
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = SphereRevealApp {
        state: AppState::Pending { config },
        failure: None,
    };
    event_loop.run_app(&mut app)?;

    match app.failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct SphereRevealApp {
    state: AppState,
    failure: Option<Error>,
}

enum AppState {
    Pending {
        config: AppConfig,
    },
    Running {
        window: Arc<Window>,
        animator: SceneAnimator<GpuSurface>,
        page: Page,
        input: Input,
        last_frame: Instant,
    },
}

impl AppState {
    fn start(event_loop: &ActiveEventLoop, config: &AppConfig) -> Result<Self> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(config.width, config.height));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let scale_factor = window.scale_factor();
        let logical: LogicalSize<f32> = window.inner_size().to_logical(scale_factor);
        let mut viewport = Viewport::new(logical.width, logical.height);
        if viewport.is_empty() {
            viewport = Viewport::new(config.width as f32, config.height as f32);
        }

        let scene = Scene::build(viewport);
        let surface = GpuSurface::new(window.clone(), &scene, config.sample_count())?;
        let animator = SceneAnimator::new(scene, surface, viewport, scale_factor as f32)
            .with_zoom_duration(config.zoom_duration);

        info!(
            width = viewport.width,
            height = viewport.height,
            pixel_ratio = scale_factor,
            "window ready, click the sphere to enter"
        );
        window.request_redraw();

        Ok(AppState::Running {
            window,
            animator,
            page: Page::new(config.fade_duration),
            input: Input::new(),
            last_frame: Instant::now(),
        })
    }
}

impl ApplicationHandler for SphereRevealApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let AppState::Pending { config } = &self.state else {
            return;
        };

        match AppState::start(event_loop, config) {
            Ok(state) => self.state = state,
            Err(e) => {
                error!("failed to start: {e}");
                self.failure = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let AppState::Running {
            window,
            animator,
            page,
            input,
            last_frame,
        } = &mut self.state
        else {
            return;
        };

        if let Some(pointer) = input.handle_event(&event) {
            let scale = window.scale_factor() as f32;
            if animator.click(pointer.x / scale, pointer.y / scale) == ClickOutcome::Started {
                window.request_redraw();
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let logical: LogicalSize<f32> = size.to_logical(window.scale_factor());
                animator.resize(logical.width, logical.height);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                animator.set_pixel_ratio(scale_factor as f32);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = now.duration_since(*last_frame).as_secs_f32();
                *last_frame = now;

                if let Some(property) = page.tick(dt) {
                    animator.transition_end(property, &*page);
                }
                animator.surface_mut().set_opacity(page.canvas_opacity());
                animator.frame(dt, page);

                if animator.frame_loop().is_running() {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
