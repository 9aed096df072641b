//! Desktop host using winit 0.30 `ApplicationHandler`.

use std::sync::Arc;

use anyhow::Result;
use stage_core::{App, Frame, StageResult};
use stage_renderer::{
    BackendType, RasterBackend, RenderBackend, Renderer, RendererConfig, WgpuBackend,
};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::PhysicalKey,
    window::{Fullscreen, Window, WindowAttributes, WindowId},
};

use crate::input::{self, InputState, PointerMove};
use crate::DesktopConfig;

/// Window-side output: either the GPU backend bound to the window, or an
/// offscreen renderer the window only feeds input to.
enum Output {
    Gpu(Box<WgpuBackend>),
    Offscreen(Renderer),
}

impl Output {
    fn render(&mut self, frame: &Frame) -> stage_renderer::RenderResult<()> {
        match self {
            Self::Gpu(backend) => backend.render(frame),
            Self::Offscreen(renderer) => renderer.render(frame),
        }
    }

    fn resize(&mut self, width: u32, height: u32) -> stage_renderer::RenderResult<()> {
        match self {
            Self::Gpu(backend) => backend.resize(width, height),
            Self::Offscreen(renderer) => renderer.resize(width, height),
        }
    }
}

/// Builds the router once the window size is known.
pub type AppBuilder = Box<dyn FnOnce(f64, f64) -> StageResult<App>>;

/// Desktop application hosting a screen router.
///
/// Owns the winit window, the renderer and the [`App`]. Window input is
/// translated into the router's raw entry points; the loop ends once the
/// router is closed or reports an error.
pub struct DesktopHost {
    config: DesktopConfig,
    window: Option<Arc<Window>>,
    output: Option<Output>,
    builder: Option<AppBuilder>,
    app: Option<App>,
    input: InputState,
    last_frame: Frame,
}

impl DesktopHost {
    /// Create a host whose router is built by `builder` from the window's
    /// inner size. Primitives keep the height they were built for, so the
    /// router is only built once the window exists.
    #[must_use]
    pub fn new(
        config: DesktopConfig,
        builder: impl FnOnce(f64, f64) -> StageResult<App> + 'static,
    ) -> Self {
        Self {
            config,
            window: None,
            output: None,
            builder: Some(Box::new(builder)),
            app: None,
            input: InputState::new(),
            last_frame: Frame::new(),
        }
    }

    /// The hosted router, once built.
    #[must_use]
    pub fn app(&self) -> Option<&App> {
        self.app.as_ref()
    }

    fn build_app(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        if let Some(builder) = self.builder.take() {
            let app = builder(f64::from(size.width), f64::from(size.height))?;
            tracing::info!(
                "Router ready with screens {:?}",
                app.available_screens()
            );
            self.app = Some(app);
        }
        Ok(())
    }

    fn renderer_config(&self, width: u32, height: u32) -> RendererConfig {
        RendererConfig {
            preferred_backend: self.config.backend,
            background_color: self.config.background.normalized(),
            width,
            height,
            ..RendererConfig::default()
        }
    }

    /// Initialize the output for the current window.
    fn init_output(&mut self, window: Arc<Window>) -> Result<()> {
        let size = window.inner_size();
        let output = if self.config.backend == BackendType::Gpu {
            let mut backend = WgpuBackend::from_window(Arc::clone(&window))?;
            backend.set_background_color(self.config.background.normalized());
            Output::Gpu(Box::new(backend))
        } else {
            let config = self.renderer_config(size.width, size.height);
            Output::Offscreen(Renderer::new(config)?)
        };

        self.output = Some(output);
        self.window = Some(window);

        tracing::info!("Output initialized with {:?} backend", self.config.backend);
        Ok(())
    }

    /// Handle window resize.
    fn handle_resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }

        if let Some(output) = &mut self.output {
            if let Err(e) = output.resize(size.width, size.height) {
                tracing::error!("Failed to resize renderer: {e}");
            }
        }
    }

    /// Draw the active screen and hand the frame to the output.
    fn render(&mut self) {
        self.last_frame.reset();
        if let Some(app) = &self.app {
            app.draw(&mut self.last_frame);
        }

        if let Some(output) = &mut self.output {
            if let Err(e) = output.render(&self.last_frame) {
                tracing::error!("Render error: {e}");
            }
        }
    }

    /// Write the last frame to the configured screenshot path.
    fn save_screenshot(&self) {
        let Some(path) = &self.config.screenshot else {
            return;
        };
        let Some(window) = &self.window else {
            return;
        };

        let size = window.inner_size();
        let saved = RasterBackend::new(size.width, size.height).and_then(|mut backend| {
            backend.set_background_color(self.config.background.normalized());
            backend.render(&self.last_frame)?;
            backend.save_png(path)
        });
        match saved {
            Ok(()) => tracing::info!("Screenshot written to {}", path.display()),
            Err(e) => tracing::error!("Failed to write screenshot: {e}"),
        }
    }

    /// Run one router call: errors and closes end the loop, anything else
    /// asks for a redraw.
    fn dispatch(
        &mut self,
        event_loop: &ActiveEventLoop,
        call: impl FnOnce(&mut App) -> StageResult<()>,
    ) {
        let Some(app) = &mut self.app else {
            return;
        };
        if let Err(e) = call(app) {
            tracing::error!("Router error: {e}");
            event_loop.exit();
            return;
        }
        if !app.is_running() {
            tracing::info!("App closed, exiting");
            event_loop.exit();
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let Some(symbol) = input::key_symbol(code) else {
            return;
        };

        self.input.key_pressed(symbol);
        let modifiers = self.input.modifiers();
        self.dispatch(event_loop, |app| app.on_key_press(symbol, modifiers));
    }

    fn handle_cursor(&mut self, event_loop: &ActiveEventLoop, x: f64, y: f64) {
        let modifiers = self.input.modifiers();
        match self.input.cursor_moved(x, y) {
            PointerMove::Drag {
                x,
                y,
                dx,
                dy,
                buttons,
            } => self.dispatch(event_loop, |app| {
                app.on_mouse_drag(x, y, dx, dy, buttons, modifiers)
            }),
            PointerMove::Motion { x, y, dx, dy } => {
                self.dispatch(event_loop, |app| app.on_mouse_motion(x, y, dx, dy));
            }
        }
    }
}

impl ApplicationHandler for DesktopHost {
    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        tracing::info!("App suspended - dropping surface to free resources");
        if let Some(Output::Gpu(backend)) = &mut self.output {
            backend.drop_surface();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        tracing::debug!("ApplicationHandler::resumed called");

        if let (Some(window), Some(Output::Gpu(backend))) = (&self.window, &mut self.output) {
            if !backend.has_surface() {
                tracing::info!("Recreating surface after resume");
                if let Err(e) = backend.recreate_surface(Arc::clone(window)) {
                    tracing::error!("Failed to recreate surface: {e}");
                    event_loop.exit();
                    return;
                }
                window.request_redraw();
                return;
            }
        }

        if self.window.is_some() {
            tracing::debug!("Window already exists, skipping creation");
            return;
        }

        tracing::debug!(
            "Creating window with size {}x{}",
            self.config.width,
            self.config.height
        );

        let mut attrs = WindowAttributes::default()
            .with_title(&self.config.title)
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        if !self.config.windowed {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let window = Arc::new(window);
                if let Err(e) = self
                    .build_app(window.inner_size())
                    .and_then(|()| self.init_output(window))
                {
                    tracing::error!("Failed to initialize renderer: {e}");
                    event_loop.exit();
                } else if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }
            Err(e) => {
                tracing::error!("Failed to create window: {e}");
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
                tracing::info!("Close requested, exiting");
                if let Some(app) = &mut self.app {
                    app.close();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                tracing::debug!("Window resized to {}x{}", size.width, size.height);
                self.handle_resize(size);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                self.render();
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.input.set_keyboard_modifiers(modifiers.state());
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor(event_loop, position.x, position.y);
            }
            WindowEvent::CursorLeft { .. } => self.input.cursor_left(),
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = input::mouse_button(button) else {
                    return;
                };
                let pressed = state == ElementState::Pressed;
                self.input.set_button(button, pressed);

                let (x, y) = self.input.cursor();
                let modifiers = self.input.modifiers();
                self.dispatch(event_loop, |app| {
                    if pressed {
                        app.on_mouse_press(x, y, button, modifiers)
                    } else {
                        app.on_mouse_release(x, y, button, modifiers)
                    }
                });
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (scroll_x, scroll_y) = input::scroll_clicks(delta);
                let (x, y) = self.input.cursor();
                self.dispatch(event_loop, |app| {
                    app.on_mouse_scroll(x, y, scroll_x, scroll_y)
                });
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                tracing::info!("Scale factor changed to {scale_factor}");
                let new_size = self.window.as_ref().map(|w| w.inner_size());
                if let Some(size) = new_size {
                    self.handle_resize(size);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.save_screenshot();
    }
}
