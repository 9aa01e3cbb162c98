//! ESP32 clock implementation using the ESP-IDF timer.

use crate::traits::{Clock, Delay};
use esp_idf_hal::delay::FreeRtos;

/// ESP32 clock using the hardware timer.
///
/// Provides millisecond-resolution timing using the ESP-IDF `esp_timer_get_time()`
/// function, which returns microseconds since boot. Delays yield to FreeRTOS.
///
/// # Example
///
/// ```ignore
/// use agency_board::hal::esp32::Esp32Clock;
/// use agency_board::traits::{Clock, Delay};
///
/// let mut clock = Esp32Clock::new();
/// let start = clock.now_ms();
/// clock.delay_ms(100);
/// assert!(clock.now_ms() - start >= 100);
/// ```
pub struct Esp32Clock;

impl Esp32Clock {
    /// Creates a new ESP32 clock instance.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Default for Esp32Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for Esp32Clock {
    #[inline]
    fn now_ms(&self) -> u64 {
        // esp_timer_get_time returns microseconds since boot
        // Safe: this is a simple read of the hardware timer, no side effects
        let micros = unsafe { esp_idf_hal::sys::esp_timer_get_time() };
        (micros / 1000) as u64
    }
}

impl Delay for Esp32Clock {
    fn delay_ms(&mut self, ms: u32) {
        FreeRtos::delay_ms(ms);
    }
}
