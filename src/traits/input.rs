//! Button input abstraction.
//!
//! The board has five logical controls: mode, pause, sound, reboot, and the
//! brightness/volume pairs which are read as held levels rather than edges.
//! Edge detection lives above this seam in [`crate::buttons`].

/// Logical buttons on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    /// Cycle to the next screen (switch C on the panel).
    NextMode,
    /// Hold the carousel on the current agency (switch B).
    TogglePause,
    /// Mute or unmute beeps (switch A).
    ToggleSound,
    /// Restart the device (switch D).
    Reboot,
    /// Raise panel brightness while held.
    BrightnessUp,
    /// Lower panel brightness while held.
    BrightnessDown,
    /// Raise beep frequency while held.
    VolumeUp,
    /// Lower beep frequency while held.
    VolumeDown,
}

impl Button {
    /// Every button, in a stable order usable as an array index.
    pub const ALL: [Button; 8] = [
        Button::NextMode,
        Button::TogglePause,
        Button::ToggleSound,
        Button::Reboot,
        Button::BrightnessUp,
        Button::BrightnessDown,
        Button::VolumeUp,
        Button::VolumeDown,
    ];

    /// Position of this button in [`ALL`](Self::ALL).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Level-triggered button source.
///
/// Implementations report whether a button is held right now. Debouncing and
/// edge detection are not the implementor's concern.
pub trait InputSource {
    /// Returns true while `button` is held down.
    fn is_pressed(&self, button: Button) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_match_all_order() {
        for (i, b) in Button::ALL.iter().enumerate() {
            assert_eq!(b.index(), i);
        }
    }
}
