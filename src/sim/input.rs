//! Keyboard input tracking
//!
//! The host forwards raw `KeyboardEvent.code` strings; the tracker keeps the
//! set of held controls and an edge-triggered firing flag.

/// Controls the overlay understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Up,
    Down,
    Left,
    Right,
    Fire,
    Cancel,
}

impl Control {
    /// Map a DOM `KeyboardEvent.code` to a control. Unknown codes map to `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "KeyW" | "ArrowUp" => Some(Control::Up),
            "KeyS" | "ArrowDown" => Some(Control::Down),
            "KeyA" | "ArrowLeft" => Some(Control::Left),
            "KeyD" | "ArrowRight" => Some(Control::Right),
            "Space" => Some(Control::Fire),
            "Escape" => Some(Control::Cancel),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Control::Up => 1 << 0,
            Control::Down => 1 << 1,
            Control::Left => 1 << 2,
            Control::Right => 1 << 3,
            Control::Fire => 1 << 4,
            Control::Cancel => 1 << 5,
        }
    }
}

/// What a key event did to the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEffect {
    /// Overlay inactive or code unknown
    Ignored,
    /// Held set updated, nothing else to report
    Held,
    Released,
    /// Fire key went from released to held
    FireStarted,
    /// Fire key went from held to released
    FireStopped,
    /// Close the overlay
    Cancel,
}

impl KeyEffect {
    /// Whether the host should suppress the browser's default action
    pub fn prevents_default(&self) -> bool {
        matches!(self, KeyEffect::FireStarted | KeyEffect::FireStopped)
    }
}

/// Live keyboard state.
///
/// Several physical keys can map to the same control (W and ArrowUp), so the
/// held set is tracked per code and folded into a control mask on query.
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    /// Codes currently held, with the control they map to
    held: Vec<(String, Control)>,
    firing: bool,
    active: bool,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inactive trackers ignore every event
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn key_down(&mut self, code: &str) -> KeyEffect {
        if !self.active {
            return KeyEffect::Ignored;
        }
        let Some(control) = Control::from_code(code) else {
            return KeyEffect::Ignored;
        };

        if !self.held.iter().any(|(c, _)| c == code) {
            self.held.push((code.to_string(), control));
        }

        match control {
            Control::Cancel => KeyEffect::Cancel,
            Control::Fire if !self.firing => {
                self.firing = true;
                KeyEffect::FireStarted
            }
            _ => KeyEffect::Held,
        }
    }

    pub fn key_up(&mut self, code: &str) -> KeyEffect {
        if !self.active {
            return KeyEffect::Ignored;
        }
        let Some(control) = Control::from_code(code) else {
            return KeyEffect::Ignored;
        };

        self.held.retain(|(c, _)| c != code);

        if control == Control::Fire && self.firing {
            self.firing = false;
            return KeyEffect::FireStopped;
        }
        KeyEffect::Released
    }

    /// Forget every held key and stop firing
    pub fn reset(&mut self) {
        self.held.clear();
        self.firing = false;
    }

    /// Whether any key mapped to `control` is held
    pub fn is_held(&self, control: Control) -> bool {
        self.mask() & control.bit() != 0
    }

    pub fn firing(&self) -> bool {
        self.firing
    }

    fn mask(&self) -> u8 {
        self.held.iter().fold(0, |m, (_, c)| m | c.bit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active() -> InputTracker {
        let mut input = InputTracker::new();
        input.set_active(true);
        input
    }

    #[test]
    fn test_inactive_ignores_everything() {
        let mut input = InputTracker::new();
        assert_eq!(input.key_down("KeyW"), KeyEffect::Ignored);
        assert_eq!(input.key_down("Space"), KeyEffect::Ignored);
        assert_eq!(input.key_down("Escape"), KeyEffect::Ignored);
        assert!(!input.is_held(Control::Up));
        assert!(!input.firing());
    }

    #[test]
    fn test_fire_is_edge_triggered() {
        let mut input = active();
        assert_eq!(input.key_down("Space"), KeyEffect::FireStarted);
        // Auto-repeat keydown while held
        assert_eq!(input.key_down("Space"), KeyEffect::Held);
        assert!(input.firing());
        assert_eq!(input.key_up("Space"), KeyEffect::FireStopped);
        assert_eq!(input.key_up("Space"), KeyEffect::Released);
        assert!(!input.firing());
    }

    #[test]
    fn test_aliases_share_a_control() {
        let mut input = active();
        input.key_down("KeyW");
        input.key_down("ArrowUp");
        input.key_up("KeyW");
        // ArrowUp still holds Up
        assert!(input.is_held(Control::Up));
        input.key_up("ArrowUp");
        assert!(!input.is_held(Control::Up));
    }

    #[test]
    fn test_unknown_codes_ignored() {
        let mut input = active();
        assert_eq!(input.key_down("KeyQ"), KeyEffect::Ignored);
        assert_eq!(input.key_up("F13"), KeyEffect::Ignored);
        assert!(input.held.is_empty());
    }

    #[test]
    fn test_escape_cancels() {
        let mut input = active();
        assert_eq!(input.key_down("Escape"), KeyEffect::Cancel);
        assert!(!input.key_down("Escape").prevents_default());
    }

    #[test]
    fn test_reset_clears_state() {
        let mut input = active();
        input.key_down("KeyA");
        input.key_down("Space");
        input.reset();
        assert!(!input.is_held(Control::Left));
        assert!(!input.firing());
        // Still active after reset
        assert_eq!(input.key_down("Space"), KeyEffect::FireStarted);
    }
}
