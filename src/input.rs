//! Keyboard → simulation commands

use slit_simulation::Command;
use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Fires once per key press
    Command(Command),
    /// Fires every tick while held
    HoldDecrease,
    HoldIncrease,
    Quit,
}

pub fn key_action(code: KeyCode) -> Option<KeyAction> {
    let action = match code {
        KeyCode::ArrowLeft => KeyAction::HoldDecrease,
        KeyCode::ArrowRight => KeyAction::HoldIncrease,
        KeyCode::Digit1 => KeyAction::Command(Command::SelectLine(0)),
        KeyCode::Digit2 => KeyAction::Command(Command::SelectLine(1)),
        KeyCode::Digit3 => KeyAction::Command(Command::SelectLine(2)),
        KeyCode::Digit4 => KeyAction::Command(Command::SelectLine(3)),
        KeyCode::Digit5 => KeyAction::Command(Command::SelectLine(4)),
        KeyCode::Digit6 => KeyAction::Command(Command::SelectLine(5)),
        KeyCode::Digit7 => KeyAction::Command(Command::SelectLine(6)),
        KeyCode::KeyA => KeyAction::Command(Command::ToggleAll),
        KeyCode::KeyC => KeyAction::Command(Command::Clear),
        KeyCode::Space => KeyAction::Command(Command::TogglePause),
        KeyCode::Escape => KeyAction::Quit,
        _ => return None,
    };
    Some(action)
}

/// Continuous separation keys, sampled once per tick
#[derive(Debug, Default, Clone, Copy)]
pub struct HeldKeys {
    pub decrease: bool,
    pub increase: bool,
}

impl HeldKeys {
    pub fn set(&mut self, action: KeyAction, pressed: bool) {
        match action {
            KeyAction::HoldDecrease => self.decrease = pressed,
            KeyAction::HoldIncrease => self.increase = pressed,
            _ => {}
        }
    }

    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    /// Route one key event, updating held state. Returns the discrete action
    /// to run, if any. While the overlay has keyboard focus only releases get
    /// through, so a key held before focus moved still lets go.
    pub fn route(
        &mut self,
        action: KeyAction,
        pressed: bool,
        repeat: bool,
        captured: bool,
    ) -> Option<KeyAction> {
        if captured && pressed {
            return None;
        }
        match action {
            KeyAction::HoldDecrease | KeyAction::HoldIncrease => {
                self.set(action, pressed);
                None
            }
            KeyAction::Quit if pressed => Some(action),
            KeyAction::Command(_) if pressed && !repeat => Some(action),
            _ => None,
        }
    }

    /// Commands for one tick; both keys held cancel out after clamping, as before
    pub fn commands(&self) -> impl Iterator<Item = Command> {
        let decrease = self.decrease.then_some(Command::DecreaseSeparation);
        let increase = self.increase.then_some(Command::IncreaseSeparation);
        decrease.into_iter().chain(increase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_keys_select_lines() {
        assert_eq!(
            key_action(KeyCode::Digit1),
            Some(KeyAction::Command(Command::SelectLine(0)))
        );
        assert_eq!(
            key_action(KeyCode::Digit7),
            Some(KeyAction::Command(Command::SelectLine(6)))
        );
        assert_eq!(key_action(KeyCode::Digit8), None);
    }

    #[test]
    fn test_held_keys() {
        let mut held = HeldKeys::default();
        assert_eq!(held.commands().count(), 0);

        held.set(KeyAction::HoldIncrease, true);
        assert_eq!(
            held.commands().collect::<Vec<_>>(),
            vec![Command::IncreaseSeparation]
        );

        held.set(KeyAction::HoldDecrease, true);
        assert_eq!(held.commands().count(), 2);

        held.set(KeyAction::Quit, true);
        held.release_all();
        assert_eq!(held.commands().count(), 0);
    }

    #[test]
    fn test_release_reaches_held_keys_under_focus() {
        let mut held = HeldKeys::default();
        assert_eq!(held.route(KeyAction::HoldDecrease, true, false, false), None);
        assert!(held.decrease);

        // Slider grabs focus, then the arrow is released
        held.route(KeyAction::HoldDecrease, false, false, true);
        assert!(!held.decrease);

        // Presses stay with the focused widget
        held.route(KeyAction::HoldIncrease, true, false, true);
        assert!(!held.increase);
    }

    #[test]
    fn test_route_discrete_actions() {
        let mut held = HeldKeys::default();
        let clear = KeyAction::Command(Command::Clear);
        assert_eq!(held.route(clear, true, false, false), Some(clear));
        assert_eq!(held.route(clear, true, true, false), None);
        assert_eq!(held.route(clear, false, false, false), None);
        assert_eq!(held.route(clear, true, false, true), None);
        assert_eq!(held.route(KeyAction::Quit, true, false, false), Some(KeyAction::Quit));
    }
}
