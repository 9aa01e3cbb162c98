//! Hardware abstraction traits for timing, sound and power control.
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`Clock`] | Monotonic milliseconds since boot |
//! | [`Delay`] | Blocking sleep between ticks |
//! | [`ToneOutput`] | Piezo / synth beeps |
//! | [`SystemControl`] | Device restart |
//!
//! For tests and desktop runs use the doubles in [`crate::hal::mock`].
//!
//! # Example
//!
//! ```rust
//! use agency_board::traits::{Clock, Delay};
//! use agency_board::hal::MockClock;
//!
//! let mut clock = MockClock::new();
//! clock.delay_ms(250);
//! assert_eq!(clock.now_ms(), 250);
//! ```

/// Monotonic time source.
///
/// Must never go backwards. Wall-clock time is derived elsewhere from a
/// synced epoch plus elapsed monotonic time.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed point (usually boot).
    fn now_ms(&self) -> u64;
}

/// Blocking delay.
///
/// The board is single-threaded: a delay stalls everything, including
/// animation. That is accepted; frames are best-effort.
pub trait Delay {
    /// Blocks for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Tone generator used for beeps.
pub trait ToneOutput {
    /// Error type for tone operations.
    type Error: core::fmt::Debug;

    /// Plays `frequency_hz` for `duration_ms`, blocking until done.
    fn play_tone(&mut self, frequency_hz: u32, duration_ms: u32) -> Result<(), Self::Error>;
}

/// Device power control.
pub trait SystemControl {
    /// Restarts the device.
    ///
    /// On hardware this never returns. Test doubles record the request and
    /// return so the caller can unwind.
    fn reboot(&mut self);
}
