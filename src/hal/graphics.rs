//! [`Canvas`] adapter over any `embedded-graphics` draw target.
//!
//! The board draws on a logical grid (32x32 on the reference panel). The
//! adapter maps that grid onto a viewport of the physical target, scaling
//! each logical pixel up to a `scale` x `scale` block, so the same art works
//! on a small OLED.
//!
//! Text is clipped to the viewport like every other primitive, so a marquee
//! entering or leaving the grid never lights the panel margins.
//!
//! Drawing errors cannot be returned from the infallible drawing calls. The
//! first one is kept and reported by the next [`Canvas::present`].

use crate::traits::{Canvas, Color};
use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_4X6, FONT_8X13},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::{BinaryColor, Rgb565, Rgb888},
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};

/// Maps palette entries to the target's color type.
pub type Palette<C> = fn(Color) -> C;

/// Full-color palette for RGB565 panels.
pub fn rgb565(color: Color) -> Rgb565 {
    let (r, g, b) = color.rgb();
    Rgb565::from(Rgb888::new(r, g, b))
}

/// Monochrome palette: black is off, everything else is on.
pub fn binary(color: Color) -> BinaryColor {
    match color {
        Color::Black => BinaryColor::Off,
        _ => BinaryColor::On,
    }
}

fn font_for(px_scale: u32) -> &'static MonoFont<'static> {
    match px_scale {
        0 | 1 => &FONT_4X6,
        2 => &FONT_8X13,
        _ => &FONT_10X20,
    }
}

/// Logical-grid canvas drawing into a viewport of `D`.
///
/// # Example
///
/// ```rust,ignore
/// use agency_board::hal::graphics::{binary, GraphicsCanvas};
///
/// // 32x32 logical grid, doubled, centred on a 128x64 OLED
/// let canvas = GraphicsCanvas::new(display, binary, 32, 32)
///     .with_viewport(Point::new(32, 0), 2)
///     .with_flush(|d| d.flush());
/// ```
pub struct GraphicsCanvas<D: DrawTarget> {
    target: D,
    palette: Palette<D::Color>,
    width: u32,
    height: u32,
    origin: Point,
    scale: u32,
    pen: Color,
    flush: Option<fn(&mut D) -> Result<(), D::Error>>,
    dim: Option<fn(&mut D, f32)>,
    pending: Option<D::Error>,
}

impl<D: DrawTarget> GraphicsCanvas<D> {
    /// Wraps `target` with a `width` x `height` logical grid at its origin.
    pub fn new(target: D, palette: Palette<D::Color>, width: u32, height: u32) -> Self {
        Self {
            target,
            palette,
            width,
            height,
            origin: Point::zero(),
            scale: 1,
            pen: Color::White,
            flush: None,
            dim: None,
            pending: None,
        }
    }

    /// Places the grid at `origin`, each logical pixel `scale` wide.
    pub fn with_viewport(mut self, origin: Point, scale: u32) -> Self {
        self.origin = origin;
        self.scale = scale.max(1);
        self
    }

    /// Called by `present`, for buffered targets.
    pub fn with_flush(mut self, flush: fn(&mut D) -> Result<(), D::Error>) -> Self {
        self.flush = Some(flush);
        self
    }

    /// Called by `set_brightness`, for targets that support it.
    pub fn with_brightness(mut self, dim: fn(&mut D, f32)) -> Self {
        self.dim = Some(dim);
        self
    }

    /// The wrapped target.
    pub fn target(&self) -> &D {
        &self.target
    }

    /// The wrapped target, mutably.
    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    /// Physical area covered by the logical grid.
    fn viewport(&self) -> Rectangle {
        Rectangle::new(
            self.origin,
            Size::new(self.width * self.scale, self.height * self.scale),
        )
    }

    fn to_physical(&self, x: i32, y: i32) -> Point {
        self.origin + Point::new(x * self.scale as i32, y * self.scale as i32)
    }

    fn keep(&mut self, result: Result<(), D::Error>) {
        if let Err(e) = result {
            if self.pending.is_none() {
                self.pending = Some(e);
            }
        }
    }

    fn fill_physical(&mut self, x: i32, y: i32, w: u32, h: u32) {
        // clip to the logical grid
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w as i32).min(self.width as i32);
        let y1 = (y + h as i32).min(self.height as i32);
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let color = (self.palette)(self.pen);
        let size = Size::new(
            (x1 - x0) as u32 * self.scale,
            (y1 - y0) as u32 * self.scale,
        );
        let result = Rectangle::new(self.to_physical(x0, y0), size)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.target);
        self.keep(result);
    }
}

impl<D> Canvas for GraphicsCanvas<D>
where
    D: DrawTarget,
    D::Error: core::fmt::Debug,
{
    type Error = D::Error;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_color(&mut self, color: Color) {
        self.pen = color;
    }

    fn plot(&mut self, x: i32, y: i32) {
        self.fill_physical(x, y, 1, 1);
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32) {
        self.fill_physical(x, y, w, h);
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, scale: u32) {
        let style = MonoTextStyle::new(font_for(self.scale * scale.max(1)), (self.palette)(self.pen));
        let at = self.to_physical(x, y);
        let viewport = self.viewport();
        let result = Text::with_baseline(text, at, style, Baseline::Top)
            .draw(&mut self.target.clipped(&viewport))
            .map(|_| ());
        self.keep(result);
    }

    fn measure_text(&self, text: &str, scale: u32) -> u32 {
        let font = font_for(self.scale * scale.max(1));
        let n = text.chars().count() as u32;
        if n == 0 {
            return 0;
        }
        let px = n * font.character_size.width + (n - 1) * font.character_spacing;
        px.div_ceil(self.scale)
    }

    fn set_brightness(&mut self, level: f32) {
        if let Some(dim) = self.dim {
            dim(&mut self.target, level.clamp(0.0, 1.0));
        }
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        if let Some(e) = self.pending.take() {
            return Err(e);
        }
        match self.flush {
            Some(flush) => flush(&mut self.target),
            None => Ok(()),
        }
    }
}
