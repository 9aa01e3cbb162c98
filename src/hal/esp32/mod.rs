//! ESP32 hardware abstraction layer for the status board.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32 with ESP-IDF (std)
//! - **Panel**: SSD1306 128x64 OLED (I2C), showing the 32x32 grid doubled
//! - **Buttons**: eight momentary switches to ground, internal pull-ups
//! - **Buzzer**: passive piezo on one LEDC channel
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments.

mod buttons;
mod buzzer;
mod clock;
mod system;

pub use buttons::GpioButtons;
pub use buzzer::Esp32Buzzer;
pub use clock::Esp32Clock;
pub use system::Esp32System;

#[cfg(feature = "esp32-display")]
mod display;
#[cfg(feature = "esp32-display")]
pub use display::{new_panel, Esp32Panel};

#[cfg(feature = "wifi")]
mod wifi;
#[cfg(feature = "wifi")]
pub use wifi::{Esp32Link, Esp32Network};

/// Pin assignments.
///
/// Buttons are listed in [`Button::ALL`](crate::traits::Button::ALL) order.
pub mod pins {
    // =========================================================================
    // Buttons (active low)
    // =========================================================================

    /// Next screen (switch C)
    pub const BTN_NEXT_MODE: i32 = 4;

    /// Pause carousel (switch B)
    pub const BTN_PAUSE: i32 = 5;

    /// Mute (switch A)
    pub const BTN_SOUND: i32 = 6;

    /// Reboot (switch D)
    pub const BTN_REBOOT: i32 = 7;

    /// Brightness up
    pub const BTN_LUX_UP: i32 = 10;

    /// Brightness down
    pub const BTN_LUX_DOWN: i32 = 1;

    /// Beep pitch up
    pub const BTN_VOLUME_UP: i32 = 0;

    /// Beep pitch down
    pub const BTN_VOLUME_DOWN: i32 = 3;

    // =========================================================================
    // Outputs
    // =========================================================================

    /// Piezo buzzer (LEDC PWM)
    pub const BUZZER: i32 = 2;

    /// I2C data line
    pub const I2C_SDA: i32 = 8;

    /// I2C clock line
    pub const I2C_SCL: i32 = 9;

    /// Default I2C address for SSD1306 OLED
    pub const OLED_I2C_ADDR: u8 = 0x3C;
}
