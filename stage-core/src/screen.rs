//! Screens and their deferred requests to the router.

use crate::{Event, Frame, StageError, StageResult};

/// One-shot requests a screen leaves for the router.
///
/// The two flags are independent: a screen may ask to change screen and to
/// close in the same dispatch. The router polls them after every event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenRequests {
    next_screen: Option<String>,
    close: bool,
}

impl ScreenRequests {
    /// No pending requests.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the router to switch to the screen registered as `name`.
    ///
    /// A later request before the router polls replaces this one.
    pub fn request_screen_change(&mut self, name: impl Into<String>) {
        self.next_screen = Some(name.into());
    }

    /// Whether a screen change is pending.
    #[must_use]
    pub fn screen_change_requested(&self) -> bool {
        self.next_screen.is_some()
    }

    /// Take the pending screen change.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::NoChangeSpecified`] if no change is pending.
    pub fn consume_screen_change(&mut self) -> StageResult<String> {
        self.next_screen.take().ok_or(StageError::NoChangeSpecified)
    }

    /// Ask the router to close the application.
    pub fn request_close(&mut self) {
        self.close = true;
    }

    /// Whether a close is pending.
    #[must_use]
    pub fn close_requested(&self) -> bool {
        self.close
    }

    /// Take the pending close, returning whether one was set.
    pub fn consume_close(&mut self) -> bool {
        std::mem::take(&mut self.close)
    }
}

/// A full-window view that draws itself and reacts to input.
///
/// Implementors embed a [`ScreenRequests`] and expose it through
/// [`Screen::requests`] and [`Screen::requests_mut`]; the provided
/// `request_*` helpers write to it.
pub trait Screen {
    /// Queue this screen's drawing on `frame`.
    fn draw(&self, frame: &mut Frame);

    /// React to an event the router decided to forward.
    fn process_input(&mut self, event: &Event);

    /// Pending requests.
    fn requests(&self) -> &ScreenRequests;

    /// Pending requests, mutably.
    fn requests_mut(&mut self) -> &mut ScreenRequests;

    /// Called when the router makes this screen active.
    fn on_enter(&mut self) {}

    /// Called when the router switches away from this screen.
    fn on_exit(&mut self) {}

    /// Ask the router to switch to the screen registered as `name`.
    fn request_screen_change(&mut self, name: &str) {
        self.requests_mut().request_screen_change(name);
    }

    /// Ask the router to close the application.
    fn request_close(&mut self) {
        self.requests_mut().request_close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_default_to_unset() {
        let requests = ScreenRequests::new();
        assert!(!requests.screen_change_requested());
        assert!(!requests.close_requested());
    }

    #[test]
    fn test_screen_change_is_one_shot() {
        let mut requests = ScreenRequests::new();
        requests.request_screen_change("next");
        assert!(requests.screen_change_requested());

        assert_eq!(requests.consume_screen_change(), Ok("next".to_string()));
        assert!(!requests.screen_change_requested());
        assert_eq!(
            requests.consume_screen_change(),
            Err(StageError::NoChangeSpecified)
        );
    }

    #[test]
    fn test_change_and_close_are_independent() {
        let mut requests = ScreenRequests::new();
        requests.request_close();
        requests.request_screen_change("menu");

        assert!(requests.close_requested());
        assert!(requests.screen_change_requested());

        assert!(requests.consume_close());
        assert!(!requests.consume_close());
        assert!(requests.screen_change_requested());
    }

    #[test]
    fn test_latest_change_wins() {
        let mut requests = ScreenRequests::new();
        requests.request_screen_change("a");
        requests.request_screen_change("b");
        assert_eq!(requests.consume_screen_change(), Ok("b".to_string()));
    }
}
