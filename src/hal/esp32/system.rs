//! Device restart.

use crate::traits::SystemControl;

/// Restarts the chip through ESP-IDF.
#[derive(Debug, Default)]
pub struct Esp32System;

impl Esp32System {
    /// Creates the restart handle.
    pub fn new() -> Self {
        Self
    }
}

impl SystemControl for Esp32System {
    fn reboot(&mut self) {
        log::warn!("restarting");
        // Safe: esp_restart takes no arguments and does not return
        unsafe { esp_idf_hal::sys::esp_restart() };
    }
}
