//! Drawing surface abstraction for the pixel matrix.
//!
//! This module defines the [`Canvas`] trait the board renders into, plus the
//! fixed [`Color`] palette. Everything above this seam works in logical pixel
//! coordinates; the adapter decides how they reach the panel.

/// Fixed drawing palette.
///
/// The smiley variants are slightly softer than the plain primaries so mood
/// artwork stays readable next to status indicators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// Pause indicator and frame.
    Yellow,
    /// Text and clock digits.
    White,
    /// Brand lettering and sound indicator.
    Blue,
    /// "OK" status.
    Green,
    /// Background; drawing with it erases.
    Black,
    /// Errors, "KO" status, wifi-down indicator.
    Red,
    /// Welcome heart.
    Pink,
    /// Happy mood.
    GreenSmiley,
    /// Neutral mood.
    YellowSmiley,
    /// Sad mood.
    RedSmiley,
}

impl Color {
    /// Returns the `(r, g, b)` components.
    ///
    /// # Examples
    ///
    /// ```
    /// use agency_board::Color;
    ///
    /// assert_eq!(Color::Black.rgb(), (0, 0, 0));
    /// assert_eq!(Color::White.rgb(), (255, 255, 255));
    /// ```
    pub const fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Color::Yellow => (251, 189, 8),
            Color::White => (255, 255, 255),
            Color::Blue => (40, 44, 131),
            Color::Green => (0, 255, 0),
            Color::Black => (0, 0, 0),
            Color::Red => (255, 0, 0),
            Color::Pink => (255, 105, 180),
            Color::GreenSmiley => (34, 177, 76),
            Color::YellowSmiley => (255, 242, 0),
            Color::RedSmiley => (237, 28, 36),
        }
    }
}

/// Pixel-matrix drawing surface.
///
/// Drawing calls only touch an off-screen buffer; nothing is visible until
/// [`present`](Self::present) pushes the frame out.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use agency_board::traits::{Canvas, Color};
///
/// struct Panel { /* framebuffer + driver */ }
///
/// impl Canvas for Panel {
///     type Error = ();
///
///     fn width(&self) -> u32 { 32 }
///     fn height(&self) -> u32 { 32 }
///     fn set_color(&mut self, color: Color) { /* select pen */ }
///     fn plot(&mut self, x: i32, y: i32) { /* write pixel */ }
///     fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32) { /* ... */ }
///     fn draw_text(&mut self, text: &str, x: i32, y: i32, scale: u32) { /* ... */ }
///     fn measure_text(&self, text: &str, scale: u32) -> u32 { text.len() as u32 * 4 * scale }
///     fn set_brightness(&mut self, level: f32) { /* ... */ }
///     fn present(&mut self) -> Result<(), ()> { Ok(()) }
/// }
/// ```
pub trait Canvas {
    /// Error type for pushing frames to the panel.
    type Error: core::fmt::Debug;

    /// Screen width in pixels.
    fn width(&self) -> u32;

    /// Screen height in pixels.
    fn height(&self) -> u32;

    /// Selects the pen used by subsequent drawing calls.
    fn set_color(&mut self, color: Color);

    /// Sets one pixel. Out-of-bounds coordinates are ignored.
    fn plot(&mut self, x: i32, y: i32);

    /// Fills a rectangle, clipped to the screen.
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32);

    /// Draws text with its top-left corner at `(x, y)`.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, scale: u32);

    /// Width in pixels that [`draw_text`](Self::draw_text) would cover.
    fn measure_text(&self, text: &str, scale: u32) -> u32;

    /// Sets global panel brightness, `0.0..=1.0`.
    fn set_brightness(&mut self, level: f32);

    /// Pushes the current frame to the panel.
    fn present(&mut self) -> Result<(), Self::Error>;

    /// Fills the whole screen with black.
    fn clear(&mut self) {
        self.set_color(Color::Black);
        self.fill_rect(0, 0, self.width(), self.height());
    }

    /// Plots every point of a glyph at an offset, in one color.
    fn plot_all(&mut self, color: Color, dx: i32, dy: i32, points: &[(i32, i32)]) {
        self.set_color(color);
        for &(x, y) in points {
            self.plot(x + dx, y + dy);
        }
    }
}
