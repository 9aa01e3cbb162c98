//! Trait definitions for every external collaborator of the board.
//!
//! This module defines the seams that let the board:
//! - Run on different hardware (ESP32, desktop mocks)
//! - Swap the network stack without touching carousel or marquee logic
//! - Be driven tick-by-tick from tests
//!
//! # Submodules
//!
//! - `canvas`: Pixel drawing surface and palette
//! - `input`: Level-triggered buttons
//! - `hardware`: Clock, delay, tone output, restart
//! - `network`: Wi-Fi, time sync, HTTP GET
//!
//! # Platform
//!
//! [`Platform`] names one concrete type per seam so the orchestrator can be
//! generic over a single parameter instead of six.

pub mod canvas;
pub mod hardware;
pub mod input;
pub mod network;

pub use canvas::*;
pub use hardware::*;
pub use input::*;
pub use network::*;

/// Bundle of concrete collaborator types for one target.
///
/// # Example
///
/// ```rust,ignore
/// struct Device;
///
/// impl Platform for Device {
///     type Canvas = MyPanel;
///     type Input = MyButtons;
///     type Tone = MyBuzzer;
///     type Net = MyWifi;
///     type Timer = MyTimer;
///     type System = MyReset;
/// }
/// ```
pub trait Platform {
    /// Drawing surface.
    type Canvas: Canvas;
    /// Button source.
    type Input: InputSource;
    /// Beeper.
    type Tone: ToneOutput;
    /// Network stack.
    type Net: Connectivity;
    /// Monotonic clock that can also block.
    type Timer: Clock + Delay;
    /// Restart control.
    type System: SystemControl;
}

/// Owned instances of a [`Platform`]'s collaborators.
///
/// Fields are public so callers can borrow two of them at once.
pub struct Peripherals<P: Platform> {
    /// Drawing surface.
    pub canvas: P::Canvas,
    /// Button source.
    pub input: P::Input,
    /// Beeper.
    pub tone: P::Tone,
    /// Network stack.
    pub net: P::Net,
    /// Clock and delay.
    pub timer: P::Timer,
    /// Restart control.
    pub system: P::System,
}

impl<P: Platform> Peripherals<P> {
    /// Bundles already-initialised collaborators.
    pub fn new(
        canvas: P::Canvas,
        input: P::Input,
        tone: P::Tone,
        net: P::Net,
        timer: P::Timer,
        system: P::System,
    ) -> Self {
        Self {
            canvas,
            input,
            tone,
            net,
            timer,
            system,
        }
    }
}
