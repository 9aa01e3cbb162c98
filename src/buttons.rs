//! Per-button edge detection over a level-triggered input source.
//!
//! A press is reported once and then consumed until the button is released,
//! so holding a button never retriggers its action.

use crate::traits::{Button, InputSource};

const COUNT: usize = Button::ALL.len();

/// Button levels and fresh presses sampled in one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonEvents {
    held: [bool; COUNT],
    pressed: [bool; COUNT],
}

impl ButtonEvents {
    /// True if `button` went down this tick.
    #[inline]
    pub fn pressed(&self, button: Button) -> bool {
        self.pressed[button.index()]
    }

    /// True while `button` is down, fresh or not.
    #[inline]
    pub fn held(&self, button: Button) -> bool {
        self.held[button.index()]
    }
}

/// Consumed-until-released edge detector for every [`Button`].
///
/// # Example
///
/// ```rust
/// use agency_board::buttons::EdgeDetector;
/// use agency_board::hal::{MockClock, MockInput};
/// use agency_board::traits::Button;
///
/// let mut input = MockInput::new(MockClock::new());
/// let mut edges = EdgeDetector::new();
///
/// input.set(Button::TogglePause, true);
/// assert!(edges.sample(&input).pressed(Button::TogglePause));
/// assert!(!edges.sample(&input).pressed(Button::TogglePause)); // still held
///
/// input.set(Button::TogglePause, false);
/// edges.sample(&input);
/// input.set(Button::TogglePause, true);
/// assert!(edges.sample(&input).pressed(Button::TogglePause));
/// ```
#[derive(Clone, Debug, Default)]
pub struct EdgeDetector {
    consumed: [bool; COUNT],
}

impl EdgeDetector {
    /// Creates a detector with nothing consumed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every button once.
    pub fn sample<I: InputSource>(&mut self, input: &I) -> ButtonEvents {
        let mut events = ButtonEvents::default();
        for button in Button::ALL {
            let i = button.index();
            let down = input.is_pressed(button);
            events.held[i] = down;
            events.pressed[i] = down && !self.consumed[i];
            self.consumed[i] = down;
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockClock, MockInput};

    #[test]
    fn held_button_fires_once() {
        let mut input = MockInput::new(MockClock::new());
        let mut det = EdgeDetector::new();
        input.set(Button::NextMode, true);

        let fired = (0..20)
            .filter(|_| det.sample(&input).pressed(Button::NextMode))
            .count();
        assert_eq!(fired, 1);
        assert!(det.sample(&input).held(Button::NextMode));
    }

    #[test]
    fn release_rearms() {
        let mut input = MockInput::new(MockClock::new());
        let mut det = EdgeDetector::new();
        let mut fired = 0;
        for level in [true, true, false, true, false, false, true] {
            input.set(Button::Reboot, level);
            if det.sample(&input).pressed(Button::Reboot) {
                fired += 1;
            }
        }
        assert_eq!(fired, 3);
    }

    #[test]
    fn buttons_are_independent() {
        let mut input = MockInput::new(MockClock::new());
        let mut det = EdgeDetector::new();
        input.set(Button::ToggleSound, true);
        det.sample(&input);

        input.set(Button::TogglePause, true);
        let ev = det.sample(&input);
        assert!(ev.pressed(Button::TogglePause));
        assert!(!ev.pressed(Button::ToggleSound));
        assert!(ev.held(Button::ToggleSound));
    }
}
