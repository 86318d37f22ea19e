//! Drag-to-rotate state.

/// Host-independent pointer input. Touch input is reduced to the first
/// active touch by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
    Press { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Release,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct InteractionState {
    /// Handlers are attached once the real asset has loaded.
    enabled: bool,
    button_down: bool,
    interacting: bool,
    last_x: f32,
    last_y: f32,
}

impl InteractionState {
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn is_interacting(&self) -> bool {
        self.interacting
    }

    /// Feeds one input event. Returns the pointer delta `(dx, dy)` to apply
    /// as rotation, if any.
    pub fn handle(&mut self, input: PointerInput) -> Option<(f32, f32)> {
        if !self.enabled {
            return None;
        }
        match input {
            PointerInput::Press { x, y } => {
                self.button_down = true;
                self.interacting = true;
                self.last_x = x;
                self.last_y = y;
                None
            }
            PointerInput::Release => {
                self.button_down = false;
                self.interacting = false;
                None
            }
            PointerInput::Move { x, y } if self.button_down => {
                let delta = (x - self.last_x, y - self.last_y);
                self.last_x = x;
                self.last_y = y;
                Some(delta)
            }
            PointerInput::Move { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignored_until_enabled() {
        let mut s = InteractionState::default();
        assert_eq!(s.handle(PointerInput::Press { x: 0.0, y: 0.0 }), None);
        assert!(!s.is_interacting());
        s.enable();
        s.handle(PointerInput::Press { x: 0.0, y: 0.0 });
        assert!(s.is_interacting());
    }

    #[test]
    fn deltas_are_between_consecutive_moves() {
        let mut s = InteractionState::default();
        s.enable();
        s.handle(PointerInput::Press { x: 10.0, y: 10.0 });
        assert_eq!(s.handle(PointerInput::Move { x: 15.0, y: 8.0 }), Some((5.0, -2.0)));
        assert_eq!(s.handle(PointerInput::Move { x: 16.0, y: 8.0 }), Some((1.0, 0.0)));
        s.handle(PointerInput::Release);
        assert!(!s.is_interacting());
        assert_eq!(s.handle(PointerInput::Move { x: 50.0, y: 50.0 }), None);
    }
}
