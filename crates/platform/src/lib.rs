//! Platform layer: window, event loop and the bridge to the viewer.
//!
//! - The viewer is built `init_delay` after the window appears.
//! - Asset load events come back through an [`EventLoopProxy`] so the
//!   viewer is only ever touched on the event-loop thread.
//! - Redraws are chained: every `RedrawRequested` asks for the next one.

mod input;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use asset::request::RequestHandle;
use asset::{LoadEvent, LoaderRegistry};
use renderer::GpuState;
use viewer::{Container, Viewer, ViewerConfig, ViewerHooks};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    window::{Window, WindowId},
};

use crate::input::{FpsCounter, PointerTracker};

pub use viewer::ShadowMode;

const TITLE: &str = "Showcase3D";

/// Startup options from the command line.
#[derive(Clone, Debug)]
pub struct RunSettings {
    pub backends: wgpu::Backends,
    pub show_fps: bool,
    pub width: u32,
    pub height: u32,
    pub shadow_mode: ShadowMode,
}

/// When the deferred viewer start is due, counted from window creation.
fn init_deadline(window_created: Instant, delay: Duration) -> Instant {
    window_created + delay
}

/// The viewer starts on the first wake-up at or after the deadline.
fn init_due(init_at: Option<Instant>, now: Instant) -> bool {
    init_at.is_some_and(|at| now >= at)
}

struct App {
    settings: RunSettings,
    config: ViewerConfig,
    proxy: EventLoopProxy<LoadEvent>,

    window: Option<Arc<Window>>,
    /// Set while the viewer is waiting for its deferred start.
    init_at: Option<Instant>,
    viewer: Option<Viewer<GpuState>>,
    _request: Option<RequestHandle>,

    pointer: PointerTracker,
    fps: FpsCounter,
}

impl App {
    fn new(settings: RunSettings, proxy: EventLoopProxy<LoadEvent>) -> Self {
        let config = ViewerConfig {
            shadow_mode: settings.shadow_mode,
            ..ViewerConfig::default()
        };
        Self {
            settings,
            config,
            proxy,
            window: None,
            init_at: None,
            viewer: None,
            _request: None,
            pointer: PointerTracker::default(),
            fps: FpsCounter::new(Instant::now()),
        }
    }

    fn scale_factor(&self) -> f64 {
        self.window.as_ref().map_or(1.0, |w| w.scale_factor())
    }

    fn container(window: &Window) -> Container {
        let scale = window.scale_factor();
        let logical = window.inner_size().to_logical::<f64>(scale);
        Container::new(
            logical.width.round() as u32,
            logical.height.round() as u32,
            scale as f32,
        )
    }

    /// Deferred start: GPU, viewer, then the asset request.
    fn start_viewer(&mut self, event_loop: &ActiveEventLoop) {
        self.init_at = None;
        event_loop.set_control_flow(ControlFlow::Wait);
        let Some(window) = self.window.clone() else {
            return;
        };

        let title_window = window.clone();
        let hooks = ViewerHooks::on_loaded(move || {
            title_window.set_title(&format!("{TITLE} [loaded]"));
        });
        let backends = self.settings.backends;
        let gpu_window = window.clone();
        let viewer = Viewer::init(
            Some(Self::container(&window)),
            self.config.clone(),
            hooks,
            |_| pollster::block_on(GpuState::new(gpu_window, backends)),
        );
        let Some(viewer) = viewer else {
            log::error!("3D viewer not started; window stays empty");
            return;
        };

        let proxy = self.proxy.clone();
        self._request = viewer.start_loading(&LoaderRegistry::with_defaults(), move |event| {
            // Fails only after the event loop has exited.
            let _ = proxy.send_event(event);
        });
        self.viewer = Some(viewer);
        self.fps = FpsCounter::new(Instant::now());
        window.request_redraw();
    }

    fn redraw(&mut self) {
        let (Some(viewer), Some(window)) = (self.viewer.as_mut(), self.window.as_ref()) else {
            return;
        };
        viewer.tick();

        if self.settings.show_fps {
            if let Some(fps) = self.fps.frame(Instant::now()) {
                let loaded = if viewer.is_loaded() { " [loaded]" } else { "" };
                window.set_title(&format!("{TITLE}{loaded} | FPS: {fps:.1}"));
            }
        }
        window.request_redraw();
    }
}

impl ApplicationHandler<LoadEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(PhysicalSize::new(self.settings.width, self.settings.height));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };
        log::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );
        self.window = Some(window);

        let at = init_deadline(Instant::now(), self.config.init_delay);
        self.init_at = Some(at);
        event_loop.set_control_flow(ControlFlow::WaitUntil(at));
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if init_due(self.init_at, Instant::now()) {
            self.start_viewer(event_loop);
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: LoadEvent) {
        if let Some(viewer) = self.viewer.as_mut() {
            viewer.handle_load_event(event);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let scale = self.scale_factor();
        if let Some(input) = self.pointer.translate(&event, scale) {
            if let Some(viewer) = self.viewer.as_mut() {
                viewer.handle_pointer(input);
            }
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let l = size.to_logical::<f64>(scale);
                log::debug!("Resized: {}x{} (logical {:.0}x{:.0})", size.width, size.height, l.width, l.height);
                if let Some(viewer) = self.viewer.as_mut() {
                    viewer.resize(l.width.round() as u32, l.height.round() as u32);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                log::info!("Scale factor changed: {:.3}", scale_factor);
                if let Some(viewer) = self.viewer.as_mut() {
                    viewer.set_pixel_ratio(scale_factor as f32);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}

/// Opens the window and runs until it is closed.
pub fn run(settings: RunSettings) -> Result<()> {
    let event_loop = EventLoop::<LoadEvent>::with_user_event()
        .build()
        .context("Failed to create event loop")?;
    let mut app = App::new(settings, event_loop.create_proxy());
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow::anyhow!("Event loop error: {e:?}"))?;
    Ok(())
}
