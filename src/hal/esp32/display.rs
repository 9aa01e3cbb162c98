//! SSD1306 OLED panel for ESP32.
//!
//! The 32x32 board grid is shown doubled and centred on the 128x64 panel,
//! through the generic [`GraphicsCanvas`].
//!
//! # Wiring
//!
//! - SDA → GPIO8
//! - SCL → GPIO9
//! - VCC → 3.3V
//! - GND → GND

use crate::hal::graphics::{binary, GraphicsCanvas};
use display_interface::DisplayError;
use embedded_graphics::prelude::*;
use esp_idf_hal::i2c::I2cDriver;
use ssd1306::{mode::BufferedGraphicsMode, prelude::*, I2CDisplayInterface, Ssd1306};

/// SSD1306 display type alias for cleaner code.
type DisplayDriver<'d> = Ssd1306<
    I2CInterface<I2cDriver<'d>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

/// Board canvas on the SSD1306.
pub type Esp32Panel<'d> = GraphicsCanvas<DisplayDriver<'d>>;

/// Logical grid edge.
const GRID: u32 = 32;

/// Pixel doubling.
const SCALE: u32 = 2;

/// Initializes the display and wraps it as a board canvas.
///
/// # Errors
///
/// Returns an error if display initialization fails.
pub fn new_panel(i2c: I2cDriver<'_>) -> Result<Esp32Panel<'_>, DisplayError> {
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    display.init()?;

    let size = display.bounding_box().size;
    let origin = Point::new(
        (size.width as i32 - (GRID * SCALE) as i32) / 2,
        (size.height as i32 - (GRID * SCALE) as i32) / 2,
    );

    Ok(GraphicsCanvas::new(display, binary, GRID, GRID)
        .with_viewport(origin, SCALE)
        .with_flush(|d| d.flush())
        .with_brightness(set_contrast))
}

/// Monochrome panels dim through contrast; the level picks one of the
/// driver's presets.
fn set_contrast(display: &mut DisplayDriver<'_>, level: f32) {
    let preset = if level < 0.25 {
        Brightness::DIMMEST
    } else if level < 0.5 {
        Brightness::DIM
    } else if level < 0.75 {
        Brightness::NORMAL
    } else {
        Brightness::BRIGHTEST
    };
    if let Err(e) = display.set_brightness(preset) {
        log::warn!("contrast change failed: {:?}", e);
    }
}
