//! Screens the desktop binary starts with.
//!
//! `shapes` shows one of each shape. Drag a shape with the left button,
//! scroll over it to resize, `R` rotates (shift reverses), `C` recolours,
//! `Tab` goes to the menu and `Escape` quits. `menu` has a single button
//! that returns to `shapes`.

use stage_core::{
    keys, App, Button, Color, Event, Frame, Primitive, Screen, ScreenRequests, Shape,
    StageResult, Widget,
};

/// Name of the shapes screen.
pub const SHAPES: &str = "shapes";
/// Name of the menu screen.
pub const MENU: &str = "menu";

const ROTATION_STEP: f64 = 15.0;
const SCALE_STEP: f64 = 1.1;

const PALETTE: [Color; 4] = [
    Color::new(231, 76, 60, 255),
    Color::new(46, 204, 113, 220),
    Color::new(52, 152, 219, 180),
    Color::new(241, 196, 15, 255),
];

/// Build an [`App`] with both demo screens, starting on `shapes`.
///
/// # Errors
///
/// Returns an error if a demo shape is degenerate for this screen size.
pub fn demo_app(width: f64, height: f64, background: Color) -> StageResult<App> {
    let mut app = App::new().with_clear_color(background);
    app.add_screen(SHAPES, ShapesScreen::new(width, height)?)?;
    app.add_screen(MENU, MenuScreen::new(width, height)?)?;
    app.log_available_screens();
    app.set_screen(SHAPES)?;
    Ok(app)
}

/// Draggable, scalable, rotatable shapes.
pub struct ShapesScreen {
    requests: ScreenRequests,
    shapes: Vec<Primitive>,
    grabbed: Option<usize>,
    palette_offset: usize,
}

impl ShapesScreen {
    /// Lay out one of each shape across a `width` x `height` window.
    ///
    /// # Errors
    ///
    /// Returns an error if the window is too small for the shapes.
    pub fn new(width: f64, height: f64) -> StageResult<Self> {
        let (w, h) = (width / 5.0, height / 4.0);
        let layout = [
            Shape::rectangle(w * 0.5, h, w, h).rotated(10.0),
            Shape::ellipse(w * 2.0, h, w, h),
            Shape::triangle(w * 3.5, h * 2.0, w * 4.5, h * 2.0, w * 4.0, h),
            Shape::line(w * 0.5, h * 3.0, w * 4.5, h * 2.5, 6.0),
        ];

        let shapes = layout
            .into_iter()
            .zip(PALETTE)
            .map(|(shape, color)| shape.into_primitive(color, height))
            .collect::<StageResult<Vec<_>>>()?;

        Ok(Self {
            requests: ScreenRequests::new(),
            shapes,
            grabbed: None,
            palette_offset: 0,
        })
    }

    /// The shapes in draw order.
    #[must_use]
    pub fn shapes(&self) -> &[Primitive] {
        &self.shapes
    }

    /// Topmost shape under `(x, y)`.
    fn shape_at(&self, x: f64, y: f64) -> Option<usize> {
        self.shapes.iter().rposition(|s| s.contains_point(x, y))
    }

    fn recolor(&mut self) {
        self.palette_offset = (self.palette_offset + 1) % PALETTE.len();
        for (i, shape) in self.shapes.iter_mut().enumerate() {
            shape.change_color(PALETTE[(i + self.palette_offset) % PALETTE.len()]);
        }
    }

    fn handle_key(&mut self, event: &Event, key: &str) {
        match key {
            "r" | "R" => {
                let step = if event.shift_pressed() {
                    -ROTATION_STEP
                } else {
                    ROTATION_STEP
                };
                for shape in &mut self.shapes {
                    shape.rotate(step);
                }
            }
            "c" | "C" => self.recolor(),
            keys::TAB => self.request_screen_change(MENU),
            keys::ESCAPE => self.request_close(),
            _ => tracing::trace!("Shapes screen ignores key {key}"),
        }
    }
}

impl Screen for ShapesScreen {
    fn draw(&self, frame: &mut Frame) {
        for shape in &self.shapes {
            shape.draw(frame);
        }
    }

    fn process_input(&mut self, event: &Event) {
        match event {
            Event::MouseClick { x, y, .. } if event.left_button_pressed() => {
                self.grabbed = self.shape_at(*x, *y);
            }
            Event::MouseRelease { .. } => self.grabbed = None,
            Event::MouseDrag { dx, dy, .. } if event.left_button_dragged() => {
                if let Some(shape) = self.grabbed.and_then(|i| self.shapes.get_mut(i)) {
                    shape.translate_relative(*dx, *dy);
                }
            }
            Event::MouseScroll { x, y, .. } => {
                let clicks = event.scroll_clicks().unwrap_or(0.0);
                if let Some(shape) = self.shape_at(*x, *y).and_then(|i| self.shapes.get_mut(i)) {
                    let factor = SCALE_STEP.powf(clicks);
                    if let Err(e) = shape.scale(factor, factor) {
                        tracing::warn!("Ignoring scroll: {e}");
                    }
                }
            }
            Event::KeyPress { .. } => {
                if let Some(key) = event.key() {
                    self.handle_key(event, &key);
                }
            }
            _ => {}
        }
    }

    fn requests(&self) -> &ScreenRequests {
        &self.requests
    }

    fn requests_mut(&mut self) -> &mut ScreenRequests {
        &mut self.requests
    }

    fn on_exit(&mut self) {
        self.grabbed = None;
    }
}

/// A single hoverable button leading back to `shapes`.
pub struct MenuScreen {
    requests: ScreenRequests,
    button: Button,
    frame: Primitive,
}

impl MenuScreen {
    /// Centre the button in a `width` x `height` window.
    ///
    /// # Errors
    ///
    /// Returns an error if the window is too small for the button.
    pub fn new(width: f64, height: f64) -> StageResult<Self> {
        let (bw, bh) = (width / 4.0, height / 8.0);
        let (x, y) = ((width - bw) / 2.0, (height - bh) / 2.0);
        let border = 4.0;

        Ok(Self {
            requests: ScreenRequests::new(),
            button: Button::new(
                Shape::rectangle(x, y, bw, bh),
                Color::new(52, 73, 94, 255),
                Color::new(26, 188, 156, 255),
                height,
            )?,
            frame: Shape::rectangle(
                x - border,
                y - border,
                bw + 2.0 * border,
                bh + 2.0 * border,
            )
            .into_primitive(Color::WHITE, height)?,
        })
    }

    /// The menu's button.
    #[must_use]
    pub fn button(&self) -> &Button {
        &self.button
    }
}

impl Screen for MenuScreen {
    fn draw(&self, frame: &mut Frame) {
        self.frame.draw(frame);
        self.button.draw(frame);
    }

    fn process_input(&mut self, event: &Event) {
        match event {
            Event::MouseMotion { .. } | Event::MouseDrag { .. } => {
                if let Some((x, y)) = event.final_location() {
                    self.button.update_hover(x, y);
                }
            }
            Event::MouseClick { x, y, .. }
                if event.left_button_pressed() && self.button.moused_over(*x, *y) =>
            {
                self.request_screen_change(SHAPES);
            }
            Event::KeyPress { .. } => match event.key().as_deref() {
                Some(keys::TAB | keys::RETURN) => self.request_screen_change(SHAPES),
                Some(keys::ESCAPE) => self.request_close(),
                _ => {}
            },
            _ => {}
        }
    }

    fn requests(&self) -> &ScreenRequests {
        &self.requests
    }

    fn requests_mut(&mut self) -> &mut ScreenRequests {
        &mut self.requests
    }
}
