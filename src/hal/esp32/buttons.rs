//! Push buttons wired to ground with internal pull-ups.

use crate::traits::{Button, InputSource};
use core::cell::RefCell;
use embedded_hal::digital::InputPin;

/// Eight active-low buttons, one per [`Button`].
///
/// `embedded_hal` pins need `&mut self` to read, so they sit in a
/// `RefCell` behind the `&self` query.
///
/// # Example
///
/// ```ignore
/// use agency_board::hal::esp32::GpioButtons;
/// use esp_idf_hal::gpio::{PinDriver, Pull};
///
/// let mut next = PinDriver::input(peripherals.pins.gpio4.downgrade_input())?;
/// next.set_pull(Pull::Up)?;
/// // ... the other seven, in Button::ALL order
/// let buttons = GpioButtons::new([next, pause, sound, reboot, lux_up, lux_down, vol_up, vol_down]);
/// ```
pub struct GpioButtons<P: InputPin> {
    pins: RefCell<[P; Button::ALL.len()]>,
}

impl<P: InputPin> GpioButtons<P> {
    /// Takes pins in [`Button::ALL`] order.
    pub fn new(pins: [P; Button::ALL.len()]) -> Self {
        Self {
            pins: RefCell::new(pins),
        }
    }
}

impl<P: InputPin> InputSource for GpioButtons<P> {
    fn is_pressed(&self, button: Button) -> bool {
        let mut pins = self.pins.borrow_mut();
        match pins[button.index()].is_low() {
            Ok(low) => low,
            Err(e) => {
                log::warn!("button {:?} read failed: {:?}", button, e);
                false
            }
        }
    }
}
