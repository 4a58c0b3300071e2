//! Window, event handling, and the main loop.

use std::sync::Arc;

use orrery_config::{Config, ConfigError};
use orrery_input::{ActionResolver, ActionState, InputMap, KeyboardState, MouseState};
use orrery_player::CameraController;
use orrery_render::{
    BackendOptions, RenderContextError, ShaderError, WgpuBackend, init_render_context_blocking,
    load_scene_shader_source,
};
use orrery_space::OrbitalSimulator;
use thiserror::Error;
use tracing::{error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::assets::{AssetError, SceneData, upload_scene};
use crate::clock::FrameClock;
use crate::frame_driver::{FrameDriver, FrameOutcome};

/// Everything that can stop the viewer before or while it starts.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU initialization failed: {0}")]
    Gpu(#[from] RenderContextError),

    #[error("shader: {0}")]
    Shader(#[from] ShaderError),

    #[error("assets: {0}")]
    Asset(#[from] AssetError),
}

pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            f64::from(config.window.width),
            f64::from(config.window.height),
        ))
}

/// The running scene: created in `resumed`, dropped on exit.
struct Session {
    window: Arc<Window>,
    backend: WgpuBackend,
    driver: FrameDriver,
}

pub struct AppState {
    config: Config,
    scene: SceneData,
    input_map: InputMap,
    keyboard: KeyboardState,
    mouse: MouseState,
    actions: ActionState,
    clock: FrameClock,
    session: Option<Session>,
    error: Option<AppError>,
}

impl AppState {
    pub fn new(config: Config, scene: SceneData) -> Self {
        let mut input_map = InputMap::default_scene();
        let rejected = input_map.apply_overrides(&config.input.keybindings);
        if !rejected.is_empty() {
            warn!("{} keybinding override(s) ignored", rejected.len());
        }

        Self {
            config,
            scene,
            input_map,
            keyboard: KeyboardState::new(),
            mouse: MouseState::new(),
            actions: ActionState::new(),
            clock: FrameClock::new(),
            session: None,
            error: None,
        }
    }

    fn start_session(&mut self, event_loop: &ActiveEventLoop) -> Result<Session, AppError> {
        let window = Arc::new(event_loop.create_window(window_attributes_from_config(&self.config))?);
        let size = window.inner_size();
        info!("Window created: {}x{}", size.width, size.height);

        let shader_source = load_scene_shader_source(self.config.render.shader_path.as_deref())?;
        let context = init_render_context_blocking(window.clone(), self.config.window.vsync)?;
        let mut backend = WgpuBackend::new(
            context,
            &BackendOptions {
                clear_color: self.config.render.clear_color,
                cull_back_faces: self.config.render.cull_back_faces,
                shader_source: &shader_source,
            },
        );
        let assets = upload_scene(&mut backend, &self.scene)?;

        let camera = CameraController::from_config(&self.config.camera);
        if camera.mouse_look_enabled() {
            self.mouse.set_captured(&window, true);
        }
        let driver = FrameDriver::new(
            camera,
            OrbitalSimulator::from_config(&self.config.simulation),
            assets,
        );

        Ok(Session {
            window,
            backend,
            driver,
        })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        ActionResolver::resolve(&self.input_map, &self.keyboard, &mut self.actions);
        session.driver.camera_mut().look(self.mouse.delta());
        let dt = self.clock.tick();

        let outcome = session.driver.frame(dt, &self.actions, &mut session.backend);
        self.keyboard.clear_transients();
        self.mouse.clear_transients();

        match outcome {
            FrameOutcome::Continue => session.window.request_redraw(),
            FrameOutcome::Exit => event_loop.exit(),
        }
    }

    /// The error that ended the loop early, if any.
    pub fn take_error(&mut self) -> Option<AppError> {
        self.error.take()
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }
        match self.start_session(event_loop) {
            Ok(session) => {
                session.window.request_redraw();
                self.session = Some(session);
                self.clock.reset();
            }
            Err(e) => {
                error!("Startup failed: {e}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(session) = &mut self.session {
                    session.backend.resize(new_size.width, new_size.height);
                    info!("Window resized to {}x{}", new_size.width, new_size.height);
                }
            }
            WindowEvent::Focused(false) => {
                self.keyboard.release_all();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.keyboard.process_event(&event);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.mouse.on_raw_motion(delta.0, delta.1);
        }
    }
}

/// Run the viewer until the window closes or the exit binding is pressed.
#[instrument(skip_all)]
pub fn run(config: Config, scene: SceneData) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::new(config, scene);
    event_loop.run_app(&mut app)?;
    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
