//! The app router: screen registry, input dispatch and deferred requests.

use crate::{Color, Event, Frame, Modifiers, MouseButtons, Screen, StageError, StageResult};

/// Background used when none is configured.
pub const DEFAULT_CLEAR_COLOR: Color = Color::BLACK;

/// Owns the registered screens and routes input to the active one.
///
/// There is no global instance; the host owns an `App` and feeds it raw
/// input. After every input occurrence the screen that handled it is
/// polled for a pending screen change or close, which is applied before
/// the next event is accepted.
pub struct App {
    screens: Vec<(String, Box<dyn Screen>)>,
    active: Option<usize>,
    clear_color: Color,
    running: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("screens", &self.available_screens())
            .field("active", &self.active_screen_name())
            .field("clear_color", &self.clear_color)
            .field("running", &self.running)
            .finish()
    }
}

impl App {
    /// Create a router with no screens.
    #[must_use]
    pub fn new() -> Self {
        Self {
            screens: Vec::new(),
            active: None,
            clear_color: DEFAULT_CLEAR_COLOR,
            running: true,
        }
    }

    /// Set the background color.
    #[must_use]
    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Register `screen` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::DuplicateScreenName`] if `name` is taken.
    pub fn add_screen(
        &mut self,
        name: impl Into<String>,
        screen: impl Screen + 'static,
    ) -> StageResult<()> {
        let name = name.into();
        if self.index_of(&name).is_some() {
            return Err(StageError::DuplicateScreenName(name));
        }

        tracing::debug!("Registered screen '{name}'");
        self.screens.push((name, Box::new(screen)));
        Ok(())
    }

    /// Make the screen registered as `name` active.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::UnknownScreenName`] if no such screen exists;
    /// the active screen is left unchanged.
    pub fn set_screen(&mut self, name: &str) -> StageResult<()> {
        let index = self
            .index_of(name)
            .ok_or_else(|| StageError::UnknownScreenName(name.to_string()))?;

        if self.active == Some(index) {
            return Ok(());
        }

        if let Some(previous) = self.active {
            self.screens[previous].1.on_exit();
        }
        self.active = Some(index);
        self.screens[index].1.on_enter();

        tracing::debug!("Active screen is now '{name}'");
        Ok(())
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.screens.iter().position(|(n, _)| n == name)
    }

    /// Name of the active screen.
    #[must_use]
    pub fn active_screen_name(&self) -> Option<&str> {
        self.active.map(|i| self.screens[i].0.as_str())
    }

    /// The active screen.
    #[must_use]
    pub fn active_screen(&self) -> Option<&dyn Screen> {
        self.active.map(|i| self.screens[i].1.as_ref())
    }

    /// A registered screen by name.
    #[must_use]
    pub fn screen(&self, name: &str) -> Option<&dyn Screen> {
        self.index_of(name).map(|i| self.screens[i].1.as_ref())
    }

    /// Registered screen names in registration order.
    #[must_use]
    pub fn available_screens(&self) -> Vec<&str> {
        self.screens.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Log the registered screens at debug level.
    pub fn log_available_screens(&self) {
        tracing::debug!("Available screens: {:?}", self.available_screens());
    }

    /// Background color recorded at the start of every frame.
    #[must_use]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    /// Change the background color.
    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    /// Whether the application should keep running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop accepting input. The host should end its loop.
    pub fn close(&mut self) {
        if self.running {
            tracing::info!("App close requested");
            self.running = false;
        }
    }

    /// Draw the active screen, or nothing if no screen is active.
    pub fn draw(&self, frame: &mut Frame) {
        let Some(screen) = self.active_screen() else {
            return;
        };

        frame.clear(self.clear_color);
        screen.draw(frame);
    }

    /// Route one event to the active screen and apply its requests.
    ///
    /// Events arriving after a close are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::NoActiveScreen`] if no screen was ever set, and
    /// [`StageError::UnknownScreenName`] if the screen asked to switch to a
    /// name that is not registered.
    pub fn dispatch(&mut self, event: Event) -> StageResult<()> {
        if !self.running {
            tracing::trace!("Dropping {:?} after close", event.kind());
            return Ok(());
        }

        let index = self.active.ok_or(StageError::NoActiveScreen)?;
        if event.should_be_processed() {
            tracing::trace!("Dispatching {:?} to '{}'", event.kind(), self.screens[index].0);
            self.screens[index].1.process_input(&event);
        }

        self.handle_screen_requests(index)
    }

    fn handle_screen_requests(&mut self, index: usize) -> StageResult<()> {
        let requests = self.screens[index].1.requests_mut();
        let close = requests.consume_close();
        let change = if requests.screen_change_requested() {
            Some(requests.consume_screen_change()?)
        } else {
            None
        };

        if close {
            self.close();
        }
        if let Some(name) = change {
            self.set_screen(&name)?;
        }
        Ok(())
    }

    /// A mouse button went down.
    ///
    /// # Errors
    ///
    /// See [`App::dispatch`].
    pub fn on_mouse_press(
        &mut self,
        x: f64,
        y: f64,
        button: MouseButtons,
        modifiers: Modifiers,
    ) -> StageResult<()> {
        self.dispatch(Event::MouseClick {
            x,
            y,
            button,
            modifiers,
        })
    }

    /// A mouse button went up.
    ///
    /// # Errors
    ///
    /// See [`App::dispatch`].
    pub fn on_mouse_release(
        &mut self,
        x: f64,
        y: f64,
        button: MouseButtons,
        modifiers: Modifiers,
    ) -> StageResult<()> {
        self.dispatch(Event::MouseRelease {
            x,
            y,
            button,
            modifiers,
        })
    }

    /// A key went down.
    ///
    /// # Errors
    ///
    /// See [`App::dispatch`].
    pub fn on_key_press(&mut self, symbol: &str, modifiers: Modifiers) -> StageResult<()> {
        self.dispatch(Event::KeyPress {
            symbol: symbol.to_string(),
            modifiers,
        })
    }

    /// The pointer moved with buttons held.
    ///
    /// # Errors
    ///
    /// See [`App::dispatch`].
    pub fn on_mouse_drag(
        &mut self,
        x: f64,
        y: f64,
        dx: f64,
        dy: f64,
        buttons: MouseButtons,
        modifiers: Modifiers,
    ) -> StageResult<()> {
        self.dispatch(Event::MouseDrag {
            x,
            y,
            dx,
            dy,
            buttons,
            modifiers,
        })
    }

    /// The wheel turned.
    ///
    /// # Errors
    ///
    /// See [`App::dispatch`].
    pub fn on_mouse_scroll(
        &mut self,
        x: f64,
        y: f64,
        scroll_x: f64,
        scroll_y: f64,
    ) -> StageResult<()> {
        self.dispatch(Event::MouseScroll {
            x,
            y,
            scroll_x,
            scroll_y,
        })
    }

    /// The pointer moved with nothing held.
    ///
    /// # Errors
    ///
    /// See [`App::dispatch`].
    pub fn on_mouse_motion(&mut self, x: f64, y: f64, dx: f64, dy: f64) -> StageResult<()> {
        self.dispatch(Event::MouseMotion { x, y, dx, dy })
    }
}
