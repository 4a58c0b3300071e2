//! Action mapping: scene actions bound to physical keys.
//!
//! [`InputMap`] decides which keys trigger which [`Action`]s. [`ActionState`]
//! is recomputed once per frame by [`ActionResolver`] and is the only input
//! view the camera, the simulator, and the frame driver ever see.

use crate::keyboard::KeyboardState;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::warn;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Serde helper module for [`KeyCode`] which doesn't implement serde natively.
mod keycode_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use winit::keyboard::KeyCode;

    /// Serialize a [`KeyCode`] as its debug string (e.g., `"KeyW"`).
    pub fn serialize<S: Serializer>(code: &KeyCode, s: S) -> Result<S::Ok, S::Error> {
        format!("{code:?}").serialize(s)
    }

    /// Deserialize a [`KeyCode`] from its debug string.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<KeyCode, D::Error> {
        let name = String::deserialize(d)?;
        string_to_keycode(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown key: {name}")))
    }

    /// Parse the `Debug` name of a [`KeyCode`] variant.
    pub fn string_to_keycode(s: &str) -> Option<KeyCode> {
        Some(match s {
            "KeyA" => KeyCode::KeyA,
            "KeyB" => KeyCode::KeyB,
            "KeyC" => KeyCode::KeyC,
            "KeyD" => KeyCode::KeyD,
            "KeyE" => KeyCode::KeyE,
            "KeyF" => KeyCode::KeyF,
            "KeyG" => KeyCode::KeyG,
            "KeyH" => KeyCode::KeyH,
            "KeyI" => KeyCode::KeyI,
            "KeyJ" => KeyCode::KeyJ,
            "KeyK" => KeyCode::KeyK,
            "KeyL" => KeyCode::KeyL,
            "KeyM" => KeyCode::KeyM,
            "KeyN" => KeyCode::KeyN,
            "KeyO" => KeyCode::KeyO,
            "KeyP" => KeyCode::KeyP,
            "KeyQ" => KeyCode::KeyQ,
            "KeyR" => KeyCode::KeyR,
            "KeyS" => KeyCode::KeyS,
            "KeyT" => KeyCode::KeyT,
            "KeyU" => KeyCode::KeyU,
            "KeyV" => KeyCode::KeyV,
            "KeyW" => KeyCode::KeyW,
            "KeyX" => KeyCode::KeyX,
            "KeyY" => KeyCode::KeyY,
            "KeyZ" => KeyCode::KeyZ,
            "Digit0" => KeyCode::Digit0,
            "Digit1" => KeyCode::Digit1,
            "Digit2" => KeyCode::Digit2,
            "Digit3" => KeyCode::Digit3,
            "Digit4" => KeyCode::Digit4,
            "Digit5" => KeyCode::Digit5,
            "Digit6" => KeyCode::Digit6,
            "Digit7" => KeyCode::Digit7,
            "Digit8" => KeyCode::Digit8,
            "Digit9" => KeyCode::Digit9,
            "Equal" => KeyCode::Equal,
            "Minus" => KeyCode::Minus,
            "NumpadAdd" => KeyCode::NumpadAdd,
            "NumpadSubtract" => KeyCode::NumpadSubtract,
            "BracketLeft" => KeyCode::BracketLeft,
            "BracketRight" => KeyCode::BracketRight,
            "Comma" => KeyCode::Comma,
            "Period" => KeyCode::Period,
            "Slash" => KeyCode::Slash,
            "Semicolon" => KeyCode::Semicolon,
            "Space" => KeyCode::Space,
            "Enter" => KeyCode::Enter,
            "Escape" => KeyCode::Escape,
            "Tab" => KeyCode::Tab,
            "ShiftLeft" => KeyCode::ShiftLeft,
            "ShiftRight" => KeyCode::ShiftRight,
            "ControlLeft" => KeyCode::ControlLeft,
            "ControlRight" => KeyCode::ControlRight,
            "AltLeft" => KeyCode::AltLeft,
            "AltRight" => KeyCode::AltRight,
            "ArrowUp" => KeyCode::ArrowUp,
            "ArrowDown" => KeyCode::ArrowDown,
            "ArrowLeft" => KeyCode::ArrowLeft,
            "ArrowRight" => KeyCode::ArrowRight,
            "PageUp" => KeyCode::PageUp,
            "PageDown" => KeyCode::PageDown,
            _ => return None,
        })
    }
}

/// Logical bindings the scene reacts to.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Move along the view direction.
    MoveForward,
    /// Move against the view direction.
    MoveBack,
    /// Strafe along the camera's right vector.
    StrafeRight,
    /// Strafe against the camera's right vector.
    StrafeLeft,
    /// Move against the camera's up vector.
    MoveDown,
    /// Move along the camera's up vector.
    MoveUp,
    /// Decrease the orbit rate multiplier.
    RateDown,
    /// Increase the orbit rate multiplier.
    RateUp,
    /// Fire the meteor from the camera position.
    Launch,
    /// Leave the program.
    Exit,
}

impl Action {
    /// Every action, in declaration order.
    pub const ALL: [Action; 10] = [
        Action::MoveForward,
        Action::MoveBack,
        Action::StrafeRight,
        Action::StrafeLeft,
        Action::MoveDown,
        Action::MoveUp,
        Action::RateDown,
        Action::RateUp,
        Action::Launch,
        Action::Exit,
    ];

    /// Look up an action by its variant name, as written in `config.ron`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| format!("{action:?}") == name)
    }
}

/// A physical input source that can be bound to an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputBinding {
    /// A keyboard key (physical scan code).
    Key(#[serde(with = "keycode_serde")] KeyCode),
}

/// Maps [`Action`]s to lists of [`InputBinding`]s (OR logic).
///
/// Serializable to RON for user-editable binding files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputMap {
    /// The binding table.
    pub bindings: HashMap<Action, Vec<InputBinding>>,
}

impl Default for InputMap {
    fn default() -> Self {
        Self::default_scene()
    }
}

impl InputMap {
    /// Create an empty input map with no bindings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// The scene's stock bindings.
    ///
    /// `=`/`-` move forward/back, W/X strafe right/left, A/D move down/up,
    /// U/P slow/speed the orbit, Space launches, Q exits.
    #[must_use]
    pub fn default_scene() -> Self {
        let defaults = [
            (Action::MoveForward, KeyCode::Equal),
            (Action::MoveBack, KeyCode::Minus),
            (Action::StrafeRight, KeyCode::KeyW),
            (Action::StrafeLeft, KeyCode::KeyX),
            (Action::MoveDown, KeyCode::KeyA),
            (Action::MoveUp, KeyCode::KeyD),
            (Action::RateDown, KeyCode::KeyU),
            (Action::RateUp, KeyCode::KeyP),
            (Action::Launch, KeyCode::Space),
            (Action::Exit, KeyCode::KeyQ),
        ];

        let bindings = defaults
            .into_iter()
            .map(|(action, key)| (action, vec![InputBinding::Key(key)]))
            .collect();

        Self { bindings }
    }

    /// Set the bindings for an action, replacing any existing ones.
    pub fn set_bindings(&mut self, action: Action, bindings: Vec<InputBinding>) {
        self.bindings.insert(action, bindings);
    }

    /// Get the bindings for an action.
    #[must_use]
    pub fn get_bindings(&self, action: &Action) -> &[InputBinding] {
        self.bindings.get(action).map_or(&[], |v| v.as_slice())
    }

    /// Apply `action name -> key name` overrides from the config file.
    ///
    /// Each valid entry replaces that action's bindings with the single key.
    /// Entries naming an unknown action or key are skipped with a warning and
    /// returned so callers can report them.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut rejected = Vec::new();
        for (action_name, key_name) in overrides {
            let action = Action::from_name(action_name);
            let key = keycode_serde::string_to_keycode(key_name);
            match (action, key) {
                (Some(action), Some(key)) => {
                    self.set_bindings(action, vec![InputBinding::Key(key)]);
                }
                _ => {
                    warn!("Ignoring keybinding override {action_name} -> {key_name}");
                    rejected.push(action_name.clone());
                }
            }
        }
        rejected.sort();
        rejected
    }

    /// Serialize to RON string.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserialize from RON string.
    ///
    /// # Errors
    /// Returns an error if the RON string is malformed.
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }
}

/// Per-frame action state computed by [`ActionResolver`].
#[derive(Debug, Clone, Default)]
pub struct ActionState {
    active: HashSet<Action>,
    prev_active: HashSet<Action>,
}

impl ActionState {
    /// Create a new state with no active actions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state with the given actions held and no history.
    #[must_use]
    pub fn with_active(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            active: actions.into_iter().collect(),
            prev_active: HashSet::new(),
        }
    }

    /// Whether any binding of the action is held this frame.
    #[must_use]
    pub fn is_action_active(&self, action: Action) -> bool {
        self.active.contains(&action)
    }

    /// True only on the frame the action transitioned from inactive to active.
    #[must_use]
    pub fn action_just_activated(&self, action: Action) -> bool {
        self.active.contains(&action) && !self.prev_active.contains(&action)
    }

    /// True only on the frame the action transitioned from active to inactive.
    #[must_use]
    pub fn action_just_deactivated(&self, action: Action) -> bool {
        !self.active.contains(&action) && self.prev_active.contains(&action)
    }

    /// Force an action on or off for the current frame.
    pub fn set_active(&mut self, action: Action, active: bool) {
        if active {
            self.active.insert(action);
        } else {
            self.active.remove(&action);
        }
    }
}

/// Reads keyboard state and populates [`ActionState`] each frame.
pub struct ActionResolver;

impl ActionResolver {
    /// Resolve all actions from the current keyboard state.
    ///
    /// Call once per frame after input events have been processed.
    pub fn resolve(input_map: &InputMap, keyboard: &KeyboardState, state: &mut ActionState) {
        std::mem::swap(&mut state.prev_active, &mut state.active);
        state.active.clear();

        for (action, bindings) in &input_map.bindings {
            if bindings
                .iter()
                .any(|binding| Self::read_binding(binding, keyboard))
            {
                state.active.insert(*action);
            }
        }
    }

    fn read_binding(binding: &InputBinding, keyboard: &KeyboardState) -> bool {
        match binding {
            InputBinding::Key(code) => keyboard.is_pressed(PhysicalKey::Code(*code)),
        }
    }
}
