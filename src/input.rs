//! Binding-based input
//!
//! The host polls whatever devices it likes and feeds the set of abstract
//! keys currently down into `InputState::begin_frame` once per tick. The
//! simulation only ever asks binding-level questions: `pressed` is
//! edge-triggered (down this frame, up last frame, on either key of the
//! pair), `held` is level-triggered.

/// Abstract keys, decoupled from any windowing library's scancodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    ShiftLeft,
    ShiftRight,
    Escape,
    Backspace,
}

/// A (primary, alternate) key pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub primary: Key,
    pub alternate: Key,
}

/// The default control scheme
pub mod bindings {
    use super::{Binding, Key};

    pub const UP: Binding = Binding { primary: Key::W, alternate: Key::Up };
    pub const DOWN: Binding = Binding { primary: Key::S, alternate: Key::Down };
    pub const LEFT: Binding = Binding { primary: Key::A, alternate: Key::Left };
    pub const RIGHT: Binding = Binding { primary: Key::D, alternate: Key::Right };
    pub const DIVE: Binding = Binding { primary: Key::Space, alternate: Key::Enter };
    pub const POOP: Binding = Binding { primary: Key::ShiftLeft, alternate: Key::ShiftRight };
    pub const PAUSE: Binding = Binding { primary: Key::Escape, alternate: Key::Backspace };
}

#[derive(Debug, Default, Clone)]
pub struct InputState {
    down: Vec<Key>,
    previous: Vec<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roll the current frame's key set in; the old set becomes last frame's
    pub fn begin_frame(&mut self, keys_down: &[Key]) {
        std::mem::swap(&mut self.previous, &mut self.down);
        self.down.clear();
        self.down.extend_from_slice(keys_down);
    }

    fn is_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    fn was_down(&self, key: Key) -> bool {
        self.previous.contains(&key)
    }

    /// Edge-triggered: either key of the pair went down this frame
    pub fn pressed(&self, binding: Binding) -> bool {
        (self.is_down(binding.primary) && !self.was_down(binding.primary))
            || (self.is_down(binding.alternate) && !self.was_down(binding.alternate))
    }

    /// Level-triggered: either key of the pair is currently down
    pub fn held(&self, binding: Binding) -> bool {
        self.is_down(binding.primary) || self.is_down(binding.alternate)
    }

    /// Any gameplay binding pressed (used to leave the title screen)
    pub fn any_gameplay_pressed(&self) -> bool {
        use bindings::*;
        [UP, DOWN, LEFT, RIGHT, DIVE, POOP].iter().any(|&b| self.pressed(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressed_is_edge_triggered() {
        let mut input = InputState::new();
        input.begin_frame(&[Key::Space]);
        assert!(input.pressed(bindings::DIVE));
        assert!(input.held(bindings::DIVE));

        input.begin_frame(&[Key::Space]);
        assert!(!input.pressed(bindings::DIVE));
        assert!(input.held(bindings::DIVE));

        input.begin_frame(&[]);
        assert!(!input.held(bindings::DIVE));
    }

    #[test]
    fn test_alternate_key_counts() {
        let mut input = InputState::new();
        input.begin_frame(&[Key::Enter]);
        assert!(input.pressed(bindings::DIVE));

        input.begin_frame(&[Key::Right]);
        assert!(input.pressed(bindings::RIGHT));
        assert!(!input.pressed(bindings::LEFT));
    }

    #[test]
    fn test_any_gameplay_ignores_pause() {
        let mut input = InputState::new();
        input.begin_frame(&[Key::Escape]);
        assert!(!input.any_gameplay_pressed());
        assert!(input.pressed(bindings::PAUSE));
    }
}
