//! Frame-coherent mouse motion tracker.
//!
//! The scene only consumes cursor deltas (for optional mouse look), so
//! [`MouseState`] tracks position, accumulated delta, and cursor capture.

use glam::Vec2;

/// Accumulated mouse motion for one frame.
///
/// While the cursor is captured, raw `DeviceEvent::MouseMotion` deltas are
/// used; otherwise deltas come from successive `CursorMoved` positions.
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    position: Option<Vec2>,
    delta: Vec2,
    captured: bool,
}

impl MouseState {
    /// Creates a new `MouseState` with no recorded motion.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a `CursorMoved` event.
    ///
    /// The first position after creation only seeds the tracker so a jump from
    /// the origin to the initial cursor location is not reported as motion.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let new_pos = Vec2::new(x as f32, y as f32);
        if !self.captured
            && let Some(prev) = self.position
        {
            self.delta += new_pos - prev;
        }
        self.position = Some(new_pos);
    }

    /// Process a `DeviceEvent::MouseMotion` raw delta (used when captured).
    pub fn on_raw_motion(&mut self, dx: f64, dy: f64) {
        if self.captured {
            self.delta += Vec2::new(dx as f32, dy as f32);
        }
    }

    /// Set cursor capture state and apply grab/visibility to the window.
    pub fn set_captured(&mut self, window: &winit::window::Window, captured: bool) {
        use winit::window::CursorGrabMode;
        self.captured = captured;
        if captured {
            // Locked is ideal; some platforms only support Confined.
            if window.set_cursor_grab(CursorGrabMode::Locked).is_err() {
                let _ = window.set_cursor_grab(CursorGrabMode::Confined);
            }
            window.set_cursor_visible(false);
        } else {
            let _ = window.set_cursor_grab(CursorGrabMode::None);
            window.set_cursor_visible(true);
        }
    }

    /// Mark the cursor captured without touching a window.
    pub fn set_captured_flag(&mut self, captured: bool) {
        self.captured = captured;
    }

    /// Motion accumulated since the last [`clear_transients`](Self::clear_transients).
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Last known cursor position in window coordinates.
    #[must_use]
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Reset per-frame delta. Call at end of frame.
    pub fn clear_transients(&mut self) {
        self.delta = Vec2::ZERO;
    }
}
