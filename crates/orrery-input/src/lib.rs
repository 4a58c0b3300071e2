//! Input backend: keyboard and mouse state mapped to scene actions through
//! configurable keybindings.

pub mod action_map;
pub mod keyboard;
pub mod mouse;

pub use action_map::{Action, ActionResolver, ActionState, InputBinding, InputMap};
pub use keyboard::{KeyboardState, RawKeyEvent};
pub use mouse::MouseState;
