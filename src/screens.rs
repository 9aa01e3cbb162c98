//! Static screen art and status indicators for the 32x32 panel.
//!
//! Everything here is pure drawing: no timing, no state. Callers present.

use crate::model::Mood;
use crate::traits::{Canvas, Color};

// ============================================================================
// Layout
// ============================================================================

/// Top of the message band.
pub const MESSAGE_Y: i32 = 12;

/// Height of the message band.
pub const MESSAGE_HEIGHT: u32 = 12;

/// Vertical distance between message lines.
pub const LINE_STEP: i32 = 8;

/// Size of one connection-progress block.
pub const LOADING_BLOCK: u32 = 3;

/// Top-left corner of the mood face.
pub const MOOD_ORIGIN: (i32, i32) = (12, 10);

/// Pause indicator pixel.
pub const PAUSE_PIXEL: (i32, i32) = (1, 25);

const SPEAKER: [(i32, i32); 6] = [(2, 9), (1, 10), (2, 10), (1, 11), (2, 11), (2, 12)];
const SPEAKER_MUTED: [(i32, i32); 2] = [(0, 9), (0, 12)];
const WIFI_DOWN: [(i32, i32); 9] = [
    (0, 17),
    (1, 16),
    (1, 17),
    (1, 18),
    (2, 15),
    (2, 16),
    (2, 17),
    (2, 18),
    (2, 19),
];

const FACE: [&str; 8] = [
    "..####..",
    ".######.",
    "########",
    "########",
    "########",
    "########",
    ".######.",
    "..####..",
];
const EYES: [(i32, i32); 2] = [(2, 2), (5, 2)];
const MOUTH_HAPPY: [(i32, i32); 6] = [(1, 4), (6, 4), (2, 5), (3, 5), (4, 5), (5, 5)];
const MOUTH_NEUTRAL: [(i32, i32); 4] = [(2, 5), (3, 5), (4, 5), (5, 5)];
const MOUTH_SAD: [(i32, i32); 6] = [(2, 4), (3, 4), (4, 4), (5, 4), (1, 5), (6, 5)];

/// Wait-band labels, right of the face: `<5`, `<10`, `>10` minutes.
const BAND_UNDER_5: [(i32, i32); 11] = [
    (26, 10), (27, 9), (27, 11),
    (29, 8), (29, 9), (29, 10), (29, 12), (30, 8), (30, 10), (30, 11), (30, 12),
];
const BAND_TEN: [(i32, i32); 17] = [
    (27, 8), (27, 9), (27, 10), (27, 11), (27, 12),
    (29, 8), (29, 9), (29, 10), (29, 11), (29, 12), (30, 8), (30, 12),
    (31, 8), (31, 9), (31, 10), (31, 11), (31, 12),
];
const BAND_LESS: [(i32, i32); 3] = [(24, 10), (25, 9), (25, 11)];
const BAND_MORE: [(i32, i32); 3] = [(24, 9), (24, 11), (25, 10)];

/// Area covered by every wait-band label.
const BAND_AREA: (i32, i32, u32, u32) = (24, 8, 8, 5);

/// Brand lettering in the header frame.
const LETTERS_OPT: [(i32, i32); 31] = [
    (1, 1), (1, 2), (1, 3), (1, 4), (1, 5), (2, 1), (2, 5), (3, 1), (3, 5),
    (4, 1), (4, 2), (4, 3), (4, 4), (4, 5),
    (6, 1), (6, 2), (6, 3), (6, 4), (6, 5), (7, 1), (7, 3), (8, 1), (8, 2), (8, 3),
    (10, 1), (11, 1), (11, 2), (11, 3), (11, 4), (11, 5), (12, 1),
];

/// Last row of the header frame.
pub const HEADER_BOTTOM: i32 = 6;

const HEART_SMALL: [&str; 6] = [
    ".........",
    "..##.##..",
    ".#######.",
    "..#####..",
    "...###...",
    "....#....",
];
const HEART_BIG: [&str; 6] = [
    ".##...##.",
    "####.####",
    "#########",
    ".#######.",
    "..#####..",
    "...###...",
];

// ============================================================================
// Primitives
// ============================================================================

/// Pushes the frame, logging instead of failing.
pub fn present<C: Canvas>(canvas: &mut C) {
    if let Err(e) = canvas.present() {
        log::warn!("present failed: {:?}", e);
    }
}

/// Plots every `#` of a row-major bitmap with its top-left at `(x, y)`.
pub fn draw_bitmap<C: Canvas>(canvas: &mut C, color: Color, x: i32, y: i32, rows: &[&str]) {
    canvas.set_color(color);
    for (dy, row) in rows.iter().enumerate() {
        for (dx, cell) in row.chars().enumerate() {
            if cell == '#' {
                canvas.plot(x + dx as i32, y + dy as i32);
            }
        }
    }
}

/// Draws `text` horizontally centred on row `y`.
pub fn centered_text<C: Canvas>(canvas: &mut C, color: Color, text: &str, y: i32) {
    let width = canvas.measure_text(text, 1) as i32;
    let x = (canvas.width() as i32 - width) / 2;
    canvas.set_color(color);
    canvas.draw_text(text, x, y, 1);
}

// ============================================================================
// Screens
// ============================================================================

/// Clears the middle band and writes up to two centred lines in it.
pub fn message<C: Canvas>(canvas: &mut C, lines: &[&str]) {
    canvas.set_color(Color::Black);
    canvas.fill_rect(0, MESSAGE_Y, canvas.width(), MESSAGE_HEIGHT);
    for (i, line) in lines.iter().enumerate() {
        centered_text(canvas, Color::White, line, MESSAGE_Y + 1 + i as i32 * LINE_STEP);
    }
}

/// Full-screen "cannot continue" notice.
pub fn terminal<C: Canvas>(canvas: &mut C, headline: &str) {
    canvas.clear();
    centered_text(canvas, Color::Red, headline, 3);
    centered_text(canvas, Color::White, "REBOOT", 13);
    centered_text(canvas, Color::Yellow, "PRESS D", 23);
}

/// One progress block for connection attempt `attempt` (1-based).
pub fn loading_step<C: Canvas>(canvas: &mut C, attempt: u8) {
    let size = LOADING_BLOCK as i32;
    let x = (attempt.saturating_sub(1) as i32) * size;
    let y = canvas.height() as i32 - size;
    canvas.set_color(Color::Blue);
    canvas.fill_rect(x, y, LOADING_BLOCK, LOADING_BLOCK);
}

/// Welcome screen; `beat` picks the large heart.
pub fn welcome<C: Canvas>(canvas: &mut C, beat: bool) {
    canvas.clear();
    welcome_heart(canvas, beat);
    centered_text(canvas, Color::Blue, "UNC", 14);
    centered_text(canvas, Color::Blue, "OPT", 22);
}

/// Redraws only the welcome heart.
pub fn welcome_heart<C: Canvas>(canvas: &mut C, beat: bool) {
    let x = (canvas.width() as i32 - 9) / 2;
    canvas.set_color(Color::Black);
    canvas.fill_rect(x, 2, 9, 6);
    let art = if beat { &HEART_BIG } else { &HEART_SMALL };
    draw_bitmap(canvas, Color::Pink, x, 2, art);
}

/// Network and API key status.
pub fn info<C: Canvas>(canvas: &mut C, wifi_ok: bool, api_ok: bool) {
    canvas.clear();
    status_line(canvas, "WIFI", wifi_ok, 6);
    status_line(canvas, "API", api_ok, 18);
}

fn status_line<C: Canvas>(canvas: &mut C, label: &str, ok: bool, y: i32) {
    canvas.set_color(Color::White);
    canvas.draw_text(label, 1, y, 1);
    let (word, color) = if ok { ("OK", Color::Green) } else { ("KO", Color::Red) };
    let x = canvas.width() as i32 - canvas.measure_text(word, 1) as i32 - 1;
    canvas.set_color(color);
    canvas.draw_text(word, x, y, 1);
}

/// What each indicator means.
pub fn legend<C: Canvas>(canvas: &mut C) {
    canvas.clear();
    sound_indicator(canvas, false);
    wifi_indicator(canvas, true);
    pause_indicator(canvas, true);
    canvas.set_color(Color::White);
    canvas.draw_text("SON OFF", 4, 8, 1);
    canvas.draw_text("WIFI OFF", 4, 15, 1);
    canvas.draw_text("NOM FIX", 4, 23, 1);
}

/// Scan-me code from `rows` (`#` is a dark module), or a caption if empty.
pub fn qr_code<C: Canvas, S: AsRef<str>>(canvas: &mut C, rows: &[S]) {
    canvas.clear();
    if rows.is_empty() {
        centered_text(canvas, Color::White, "QR", MESSAGE_Y + 1);
        return;
    }
    let size = rows.len() as i32;
    let x = (canvas.width() as i32 - size) / 2;
    let y = (canvas.height() as i32 - size) / 2;
    canvas.set_color(Color::White);
    canvas.fill_rect(x - 1, y - 1, size as u32 + 2, size as u32 + 2);
    let rows: Vec<&str> = rows.iter().map(AsRef::as_ref).collect();
    draw_bitmap(canvas, Color::Black, x, y, &rows);
}

// ============================================================================
// Carousel Art
// ============================================================================

/// Face colored and shaped for `mood`.
pub fn mood_face<C: Canvas>(canvas: &mut C, mood: Mood) {
    let (x, y) = MOOD_ORIGIN;
    let color = mood_color(mood);
    let mouth: &[(i32, i32)] = match mood {
        Mood::Happy => &MOUTH_HAPPY,
        Mood::Neutral => &MOUTH_NEUTRAL,
        Mood::Sad => &MOUTH_SAD,
    };
    canvas.set_color(Color::Black);
    canvas.fill_rect(x, y, 8, 8);
    draw_bitmap(canvas, color, x, y, &FACE);
    canvas.plot_all(Color::Black, x, y, &EYES);
    canvas.plot_all(Color::Black, x, y, mouth);
}

/// Wait-band label in the mood color: `<5`, `<10` or `>10` minutes.
pub fn wait_band<C: Canvas>(canvas: &mut C, mood: Mood) {
    let (x, y, w, h) = BAND_AREA;
    canvas.set_color(Color::Black);
    canvas.fill_rect(x, y, w, h);
    let color = mood_color(mood);
    match mood {
        Mood::Happy => {
            canvas.plot_all(color, 0, 0, &BAND_UNDER_5);
        }
        Mood::Neutral => {
            canvas.plot_all(color, 0, 0, &BAND_LESS);
            canvas.plot_all(color, 0, 0, &BAND_TEN);
        }
        Mood::Sad => {
            canvas.plot_all(color, 0, 0, &BAND_MORE);
            canvas.plot_all(color, 0, 0, &BAND_TEN);
        }
    }
}

/// Yellow frame across the top rows with the blue brand lettering inside.
///
/// The clock digits sit inside the frame, to the right of the lettering.
pub fn carousel_header<C: Canvas>(canvas: &mut C) {
    let right = canvas.width() as i32 - 1;
    canvas.set_color(Color::Yellow);
    canvas.fill_rect(0, 0, canvas.width(), 1);
    canvas.fill_rect(0, HEADER_BOTTOM, canvas.width(), 1);
    canvas.fill_rect(0, 0, 1, HEADER_BOTTOM as u32 + 1);
    canvas.fill_rect(right, 0, 1, HEADER_BOTTOM as u32 + 1);
    canvas.plot_all(Color::Blue, 0, 0, &LETTERS_OPT);
}

fn mood_color(mood: Mood) -> Color {
    match mood {
        Mood::Happy => Color::GreenSmiley,
        Mood::Neutral => Color::YellowSmiley,
        Mood::Sad => Color::RedSmiley,
    }
}

/// Speaker icon; muted adds a red mark.
pub fn sound_indicator<C: Canvas>(canvas: &mut C, enabled: bool) {
    canvas.plot_all(Color::Blue, 0, 0, &SPEAKER);
    let mark = if enabled { Color::Black } else { Color::Red };
    canvas.plot_all(mark, 0, 0, &SPEAKER_MUTED);
}

/// Pause pixel on or off.
pub fn pause_indicator<C: Canvas>(canvas: &mut C, paused: bool) {
    let color = if paused { Color::Yellow } else { Color::Black };
    canvas.plot_all(color, 0, 0, &[PAUSE_PIXEL]);
}

/// Wi-Fi warning triangle on or off.
pub fn wifi_indicator<C: Canvas>(canvas: &mut C, down: bool) {
    let color = if down { Color::Red } else { Color::Black };
    canvas.plot_all(color, 0, 0, &WIFI_DOWN);
}

/// All three carousel indicators at once.
pub fn indicators<C: Canvas>(canvas: &mut C, sound_on: bool, paused: bool, link_down: bool) {
    sound_indicator(canvas, sound_on);
    pause_indicator(canvas, paused);
    wifi_indicator(canvas, link_down);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::MockCanvas;

    #[test]
    fn message_is_centred() {
        let mut canvas = MockCanvas::new(32, 32);
        message(&mut canvas, &["WAIT"]);
        // mock glyphs are 4 px wide
        assert_eq!(canvas.text_at("WAIT"), Some((8, MESSAGE_Y + 1)));
    }

    #[test]
    fn terminal_lines() {
        let mut canvas = MockCanvas::new(32, 32);
        terminal(&mut canvas, "NO WIFI");
        assert_eq!(canvas.texts(), ["NO WIFI", "REBOOT", "PRESS D"]);
    }

    #[test]
    fn loading_blocks_march_right() {
        let mut canvas = MockCanvas::new(32, 32);
        loading_step(&mut canvas, 1);
        loading_step(&mut canvas, 2);
        assert_eq!(canvas.pixel(0, 29), Color::Blue);
        assert_eq!(canvas.pixel(5, 31), Color::Blue);
        assert_eq!(canvas.pixel(6, 29), Color::Black);
    }

    #[test]
    fn info_reports_status() {
        let mut canvas = MockCanvas::new(32, 32);
        info(&mut canvas, true, false);
        assert_eq!(canvas.texts(), ["WIFI", "OK", "API", "KO"]);
    }

    #[test]
    fn mood_face_colors() {
        let mut canvas = MockCanvas::new(32, 32);
        let (x, y) = MOOD_ORIGIN;
        for (mood, color) in [
            (Mood::Happy, Color::GreenSmiley),
            (Mood::Neutral, Color::YellowSmiley),
            (Mood::Sad, Color::RedSmiley),
        ] {
            mood_face(&mut canvas, mood);
            assert_eq!(canvas.pixel(x + 3, y), color);
            assert_eq!(canvas.pixel(x + 2, y + 2), Color::Black);
        }
    }

    #[test]
    fn indicators_toggle() {
        let mut canvas = MockCanvas::new(32, 32);
        indicators(&mut canvas, false, true, true);
        assert_eq!(canvas.pixel(0, 9), Color::Red);
        assert_eq!(canvas.pixel(1, 25), Color::Yellow);
        assert_eq!(canvas.pixel(2, 19), Color::Red);

        indicators(&mut canvas, true, false, false);
        assert_eq!(canvas.pixel(0, 9), Color::Black);
        assert_eq!(canvas.pixel(2, 9), Color::Blue);
        assert_eq!(canvas.pixel(1, 25), Color::Black);
        assert_eq!(canvas.pixel(2, 19), Color::Black);
    }

    #[test]
    fn qr_draws_modules_or_caption() {
        let mut canvas = MockCanvas::new(32, 32);
        qr_code::<_, &str>(&mut canvas, &[]);
        assert_eq!(canvas.texts(), ["QR"]);

        let mut canvas = MockCanvas::new(32, 32);
        qr_code(&mut canvas, &["#.", ".#"]);
        assert_eq!(canvas.pixel(15, 15), Color::Black);
        assert_eq!(canvas.pixel(16, 15), Color::White);
        assert_eq!(canvas.pixel(16, 16), Color::Black);
    }

    #[test]
    fn wait_band_matches_mood() {
        let mut canvas = MockCanvas::new(32, 32);
        wait_band(&mut canvas, Mood::Sad);
        assert_eq!(canvas.pixel(24, 9), Color::RedSmiley);
        assert_eq!(canvas.pixel(31, 12), Color::RedSmiley);

        // a shorter label erases what the longer one left behind
        wait_band(&mut canvas, Mood::Happy);
        assert_eq!(canvas.pixel(24, 9), Color::Black);
        assert_eq!(canvas.pixel(31, 12), Color::Black);
        assert_eq!(canvas.pixel(26, 10), Color::GreenSmiley);

        wait_band(&mut canvas, Mood::Neutral);
        assert_eq!(canvas.pixel(25, 9), Color::YellowSmiley);
        assert_eq!(canvas.pixel(27, 12), Color::YellowSmiley);
    }

    #[test]
    fn header_frames_top_rows() {
        let mut canvas = MockCanvas::new(32, 32);
        carousel_header(&mut canvas);
        assert_eq!(canvas.pixel(16, 0), Color::Yellow);
        assert_eq!(canvas.pixel(16, HEADER_BOTTOM), Color::Yellow);
        assert_eq!(canvas.pixel(31, 3), Color::Yellow);
        assert_eq!(canvas.pixel(1, 1), Color::Blue);
        assert_eq!(canvas.pixel(16, 7), Color::Black);
    }
}
