//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for every collaborator seam, so the
//! whole board can be driven tick by tick on a desktop.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockCanvas`] | [`Canvas`] | Pixel buffer plus a log of drawing calls |
//! | [`MockInput`] | [`InputSource`] | Held levels and time-scripted presses |
//! | [`MockTone`] | [`ToneOutput`] | Records every beep |
//! | [`MockNet`] | [`Connectivity`] | Scripted joins, link probes, sync and GET |
//! | [`MockClock`] | [`Clock`] + [`Delay`] | Shared controllable time |
//! | [`MockSystem`] | [`SystemControl`] | Counts reboots |
//!
//! [`MockPlatform`] ties them together.
//!
//! # Example
//!
//! ```rust
//! use agency_board::hal::MockPlatform;
//! use agency_board::traits::{Button, Clock, Delay, InputSource};
//!
//! let (mut periph, clock) = MockPlatform::peripherals(32, 32);
//! periph.input.press_at(Button::NextMode, 200, 300);
//!
//! assert!(!periph.input.is_pressed(Button::NextMode));
//! periph.timer.delay_ms(250);
//! assert_eq!(clock.now_ms(), 250);
//! assert!(periph.input.is_pressed(Button::NextMode));
//! ```

use crate::traits::{
    Button, Canvas, Clock, Color, Connectivity, Delay, FetchFailure, FetchRequest, InputSource,
    Peripherals, Platform, SystemControl, ToneOutput,
};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// Width of one mock glyph, before scaling.
pub const MOCK_GLYPH_WIDTH: u32 = 4;

// ============================================================================
// Time
// ============================================================================

/// Mock clock for testing.
///
/// Clones share the same time, so one handle can be given to the board as
/// its timer while the test keeps another. [`Delay`] advances the clock
/// instead of sleeping.
///
/// # Example
///
/// ```rust
/// use agency_board::hal::MockClock;
/// use agency_board::traits::Clock;
///
/// let clock = MockClock::new();
/// let shared = clock.clone();
///
/// clock.set(1000);
/// assert_eq!(shared.now_ms(), 1000);
///
/// shared.advance(500);
/// assert_eq!(clock.now_ms(), 1500);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MockClock {
    current_ms: Rc<Cell<u64>>,
}

impl MockClock {
    /// Creates a new mock clock starting at 0ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock starting at `ms`.
    pub fn at(ms: u64) -> Self {
        let clock = Self::new();
        clock.set(ms);
        clock
    }

    /// Current time in milliseconds.
    pub fn now(&self) -> u64 {
        self.current_ms.get()
    }

    /// Sets the current time in milliseconds.
    pub fn set(&self, ms: u64) {
        self.current_ms.set(ms);
    }

    /// Advances the clock by the given duration.
    pub fn advance(&self, ms: u64) {
        self.current_ms.set(self.current_ms.get() + ms);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now()
    }
}

impl Delay for MockClock {
    fn delay_ms(&mut self, ms: u32) {
        self.advance(ms as u64);
    }
}

// ============================================================================
// Canvas
// ============================================================================

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CanvasOp {
    /// `plot` with the pen color at the time.
    Plot {
        /// Pen color.
        color: Color,
        /// Column.
        x: i32,
        /// Row.
        y: i32,
    },
    /// `fill_rect` with the pen color at the time.
    FillRect {
        /// Pen color.
        color: Color,
        /// Left column.
        x: i32,
        /// Top row.
        y: i32,
        /// Width.
        w: u32,
        /// Height.
        h: u32,
    },
    /// `draw_text` with the pen color at the time.
    Text {
        /// Pen color.
        color: Color,
        /// The string drawn.
        text: String,
        /// Left column.
        x: i32,
        /// Top row.
        y: i32,
    },
}

/// Mock drawing surface.
///
/// Keeps a real pixel buffer for `plot` and `fill_rect`, and logs every
/// call in [`ops`](Self::ops). Text is logged but not rasterized; glyphs
/// measure [`MOCK_GLYPH_WIDTH`] pixels each.
///
/// # Example
///
/// ```rust
/// use agency_board::hal::MockCanvas;
/// use agency_board::traits::{Canvas, Color};
///
/// let mut canvas = MockCanvas::new(32, 32);
/// canvas.set_color(Color::Red);
/// canvas.plot(3, 4);
/// canvas.draw_text("HI", 0, 0, 1);
///
/// assert_eq!(canvas.pixel(3, 4), Color::Red);
/// assert_eq!(canvas.texts(), ["HI"]);
/// assert_eq!(canvas.measure_text("HI", 1), 8);
/// ```
#[derive(Clone, Debug)]
pub struct MockCanvas {
    width: u32,
    height: u32,
    pen: Color,
    pixels: Vec<Color>,
    /// Every drawing call, oldest first.
    pub ops: Vec<CanvasOp>,
    /// Last brightness set.
    pub brightness: f32,
    /// Number of `present` calls.
    pub presents: usize,
    /// When set, `present` fails with this message.
    pub fail_present: Option<&'static str>,
}

impl MockCanvas {
    /// Creates a black canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pen: Color::White,
            pixels: vec![Color::Black; (width * height) as usize],
            ops: Vec::new(),
            brightness: 1.0,
            presents: 0,
            fail_present: None,
        }
    }

    /// Color at `(x, y)`. Out of bounds reads as black.
    pub fn pixel(&self, x: i32, y: i32) -> Color {
        self.index(x, y)
            .map(|i| self.pixels[i])
            .unwrap_or(Color::Black)
    }

    /// Strings drawn since the last full-screen clear, oldest first.
    pub fn texts(&self) -> Vec<String> {
        let start = self
            .ops
            .iter()
            .rposition(|op| self.is_full_clear(op))
            .map_or(0, |i| i + 1);
        self.ops[start..]
            .iter()
            .filter_map(|op| match op {
                CanvasOp::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Position of the latest draw of `text`.
    pub fn text_at(&self, text: &str) -> Option<(i32, i32)> {
        self.ops.iter().rev().find_map(|op| match op {
            CanvasOp::Text { text: t, x, y, .. } if t == text => Some((*x, *y)),
            _ => None,
        })
    }

    /// Renders the pixel buffer as one character per pixel.
    ///
    /// Black is `.`; other colors use their initial.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                out.push(glyph(self.pixel(x, y)));
            }
            out.push('\n');
        }
        out
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    fn is_full_clear(&self, op: &CanvasOp) -> bool {
        matches!(
            op,
            CanvasOp::FillRect { color: Color::Black, x: 0, y: 0, w, h }
                if *w >= self.width && *h >= self.height
        )
    }
}

fn glyph(color: Color) -> char {
    match color {
        Color::Black => '.',
        Color::White => 'W',
        Color::Yellow | Color::YellowSmiley => 'Y',
        Color::Blue => 'B',
        Color::Green | Color::GreenSmiley => 'G',
        Color::Red | Color::RedSmiley => 'R',
        Color::Pink => 'P',
    }
}

impl Canvas for MockCanvas {
    type Error = &'static str;

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
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = self.pen;
        }
        self.ops.push(CanvasOp::Plot { color: self.pen, x, y });
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32) {
        for py in y..y + h as i32 {
            for px in x..x + w as i32 {
                if let Some(i) = self.index(px, py) {
                    self.pixels[i] = self.pen;
                }
            }
        }
        self.ops.push(CanvasOp::FillRect { color: self.pen, x, y, w, h });
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, _scale: u32) {
        self.ops.push(CanvasOp::Text {
            color: self.pen,
            text: text.to_string(),
            x,
            y,
        });
    }

    fn measure_text(&self, text: &str, scale: u32) -> u32 {
        text.chars().count() as u32 * MOCK_GLYPH_WIDTH * scale.max(1)
    }

    fn set_brightness(&mut self, level: f32) {
        self.brightness = level;
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        self.presents += 1;
        match self.fail_present {
            Some(msg) => Err(msg),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Input and Output
// ============================================================================

/// Mock button source.
///
/// A button reads as pressed if it is held via [`set`](Self::set) or if
/// the shared clock falls inside one of its [`press_at`](Self::press_at)
/// windows.
#[derive(Clone, Debug)]
pub struct MockInput {
    clock: MockClock,
    held: [bool; Button::ALL.len()],
    windows: Vec<(Button, u64, u64)>,
}

impl MockInput {
    /// Creates an input with nothing pressed, reading time from `clock`.
    pub fn new(clock: MockClock) -> Self {
        Self {
            clock,
            held: [false; Button::ALL.len()],
            windows: Vec::new(),
        }
    }

    /// Holds or releases `button`.
    pub fn set(&mut self, button: Button, pressed: bool) {
        self.held[button.index()] = pressed;
    }

    /// Presses `button` from `from_ms` until just before `until_ms`.
    pub fn press_at(&mut self, button: Button, from_ms: u64, until_ms: u64) {
        self.windows.push((button, from_ms, until_ms));
    }
}

impl InputSource for MockInput {
    fn is_pressed(&self, button: Button) -> bool {
        if self.held[button.index()] {
            return true;
        }
        let now = self.clock.now();
        self.windows
            .iter()
            .any(|&(b, from, until)| b == button && (from..until).contains(&now))
    }
}

/// Mock beeper.
#[derive(Debug, Default)]
pub struct MockTone {
    /// Every beep as `(frequency_hz, duration_ms)`.
    pub played: Vec<(u32, u32)>,
}

impl MockTone {
    /// Creates a silent beeper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Beeps played at `frequency_hz`.
    pub fn count_at(&self, frequency_hz: u32) -> usize {
        self.played.iter().filter(|&&(hz, _)| hz == frequency_hz).count()
    }
}

impl ToneOutput for MockTone {
    type Error = ();

    fn play_tone(&mut self, frequency_hz: u32, duration_ms: u32) -> Result<(), ()> {
        self.played.push((frequency_hz, duration_ms));
        Ok(())
    }
}

/// Mock restart control.
#[derive(Debug, Default)]
pub struct MockSystem {
    /// Number of reboot requests.
    pub reboots: u32,
}

impl MockSystem {
    /// Creates a system that has not rebooted.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SystemControl for MockSystem {
    fn reboot(&mut self) {
        self.reboots += 1;
    }
}

// ============================================================================
// Network
// ============================================================================

/// Link handle returned by [`MockNet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockLink {
    /// Sequence number of the successful join.
    pub id: u32,
}

/// A GET captured by [`MockNet`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Requested URL.
    pub url: String,
    /// Headers as owned pairs.
    pub headers: Vec<(String, String)>,
    /// Timeout passed with the request.
    pub timeout_ms: u32,
}

/// Mock network stack.
///
/// # Example
///
/// ```rust
/// use agency_board::hal::MockNet;
/// use agency_board::traits::{Connectivity, FetchRequest};
///
/// let mut net = MockNet::new();
/// net.connect_failures = 1;
/// net.respond("http://x/csv", Ok(b"id,name,ms\n".to_vec()));
///
/// assert!(net.connect("ssid", "pw").is_err());
/// let link = net.connect("ssid", "pw").unwrap();
///
/// net.script_links(&[false]);
/// assert!(!net.is_linked(&link));
/// assert!(net.is_linked(&link)); // script exhausted: default up
///
/// let req = FetchRequest { url: "http://x/csv", headers: &[], timeout_ms: 10 };
/// assert!(net.http_get(&req).is_ok());
/// assert_eq!(net.requests.len(), 1);
/// ```
#[derive(Debug)]
pub struct MockNet {
    /// Number of upcoming `connect` calls that fail.
    pub connect_failures: u32,
    /// Every `(ssid, password)` passed to `connect`.
    pub connect_attempts: Vec<(String, String)>,
    /// Link state once the script is exhausted.
    pub link_default: bool,
    link_script: RefCell<VecDeque<bool>>,
    link_checks: Cell<u32>,
    /// Per-server sync answers; unknown servers fail.
    pub sync_results: HashMap<String, Result<u64, String>>,
    /// Every server asked, in order.
    pub sync_attempts: Vec<String>,
    /// Per-URL GET answers; unknown URLs are 404.
    pub responses: HashMap<String, Result<Vec<u8>, FetchFailure>>,
    /// Every GET issued, in order.
    pub requests: Vec<RecordedRequest>,
    joins: u32,
}

impl Default for MockNet {
    fn default() -> Self {
        Self {
            connect_failures: 0,
            connect_attempts: Vec::new(),
            link_default: true,
            link_script: RefCell::new(VecDeque::new()),
            link_checks: Cell::new(0),
            sync_results: HashMap::new(),
            sync_attempts: Vec::new(),
            responses: HashMap::new(),
            requests: Vec::new(),
            joins: 0,
        }
    }
}

impl MockNet {
    /// Creates a network where joins succeed and links stay up.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the answer for GETs of `url`.
    pub fn respond(&mut self, url: &str, result: Result<Vec<u8>, FetchFailure>) {
        self.responses.insert(url.to_string(), result);
    }

    /// Queues link probe results, consumed one per `is_linked` call.
    pub fn script_links(&mut self, states: &[bool]) {
        self.link_script.get_mut().extend(states.iter().copied());
    }

    /// Number of `is_linked` calls so far.
    pub fn link_checks(&self) -> u32 {
        self.link_checks.get()
    }

    /// GETs issued for `url`.
    pub fn requests_to(&self, url: &str) -> usize {
        self.requests.iter().filter(|r| r.url == url).count()
    }
}

impl Connectivity for MockNet {
    type Link = MockLink;
    type Error = String;

    fn connect(&mut self, ssid: &str, password: &str) -> Result<MockLink, String> {
        self.connect_attempts
            .push((ssid.to_string(), password.to_string()));
        if self.connect_failures > 0 {
            self.connect_failures -= 1;
            return Err(format!("{} did not answer", ssid));
        }
        self.joins += 1;
        Ok(MockLink { id: self.joins })
    }

    fn is_linked(&self, _link: &MockLink) -> bool {
        self.link_checks.set(self.link_checks.get() + 1);
        self.link_script
            .borrow_mut()
            .pop_front()
            .unwrap_or(self.link_default)
    }

    fn sync_clock(&mut self, server: &str) -> Result<u64, String> {
        self.sync_attempts.push(server.to_string());
        self.sync_results
            .get(server)
            .cloned()
            .unwrap_or_else(|| Err(format!("{} did not answer", server)))
    }

    fn http_get(&mut self, request: &FetchRequest<'_>) -> Result<Vec<u8>, FetchFailure> {
        self.requests.push(RecordedRequest {
            url: request.url.to_string(),
            headers: request
                .headers
                .iter()
                .map(|&(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            timeout_ms: request.timeout_ms,
        });
        self.responses
            .get(request.url)
            .cloned()
            .unwrap_or(Err(FetchFailure::Status(404)))
    }
}

// ============================================================================
// Platform
// ============================================================================

/// Platform made of mocks.
pub struct MockPlatform;

impl Platform for MockPlatform {
    type Canvas = MockCanvas;
    type Input = MockInput;
    type Tone = MockTone;
    type Net = MockNet;
    type Timer = MockClock;
    type System = MockSystem;
}

impl MockPlatform {
    /// Builds a full set of mocks sharing one clock, and returns that clock.
    pub fn peripherals(width: u32, height: u32) -> (Peripherals<MockPlatform>, MockClock) {
        let clock = MockClock::new();
        let periph = Peripherals::new(
            MockCanvas::new(width, height),
            MockInput::new(clock.clone()),
            MockTone::new(),
            MockNet::new(),
            clock.clone(),
            MockSystem::new(),
        );
        (periph, clock)
    }
}
