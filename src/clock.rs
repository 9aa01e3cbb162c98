//! Wall-clock state, time sync and the HH:MM clock face.
//!
//! The device has no battery-backed clock. [`ClockState`] derives wall time
//! from a synced epoch plus monotonic time elapsed since the sync, or from
//! the fallback epoch captured at boot when no server ever answered.
//!
//! The face redraws a digit cell only when that digit changes, and the
//! separator blinks by drawing or erasing its two pixels; the digits are
//! never cleared wholesale, so they do not flicker.

use crate::error::{BoardError, Result};
use crate::traits::{Canvas, Color, Connectivity};

const SECS_PER_DAY: i64 = 86_400;

/// Column of each digit cell, `H H : M M`.
const DIGIT_X: [i32; 4] = [14, 18, 24, 28];

/// Top row of the clock face.
const DIGIT_Y: i32 = 1;

/// Digit cell size.
const DIGIT_W: u32 = 3;
const DIGIT_H: u32 = 5;

/// The two separator pixels.
const SEPARATOR: [(i32, i32); 2] = [(22, 2), (22, 4)];

/// A successful sync: server epoch and the monotonic instant it was taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncPoint {
    /// Unix seconds reported by the server.
    pub epoch_secs: u64,
    /// Monotonic milliseconds when the answer arrived.
    pub at_ms: u64,
}

/// Wall-clock derivation state.
#[derive(Clone, Debug)]
pub struct ClockState {
    synced: Option<SyncPoint>,
    fallback_epoch_secs: u64,
    boot_ms: u64,
    local_offset_secs: i64,
}

impl ClockState {
    /// Captures the fallback epoch at monotonic time `boot_ms`.
    pub fn new(fallback_epoch_secs: u64, boot_ms: u64, local_offset_secs: i64) -> Self {
        Self {
            synced: None,
            fallback_epoch_secs,
            boot_ms,
            local_offset_secs,
        }
    }

    /// Records a successful sync. Later syncs replace earlier ones.
    pub fn mark_synced(&mut self, epoch_secs: u64, now_ms: u64) {
        self.synced = Some(SyncPoint {
            epoch_secs,
            at_ms: now_ms,
        });
    }

    /// Last successful sync, if any.
    pub fn synced(&self) -> Option<SyncPoint> {
        self.synced
    }

    /// True once any server has answered.
    pub fn is_synced(&self) -> bool {
        self.synced.is_some()
    }

    /// Epoch captured at boot.
    pub fn fallback_epoch_secs(&self) -> u64 {
        self.fallback_epoch_secs
    }

    /// Local Unix seconds at monotonic time `now_ms`.
    pub fn local_epoch_secs(&self, now_ms: u64) -> i64 {
        let (base, since_ms) = match self.synced {
            Some(p) => (p.epoch_secs, now_ms.saturating_sub(p.at_ms)),
            None => (
                self.fallback_epoch_secs,
                now_ms.saturating_sub(self.boot_ms),
            ),
        };
        base as i64 + (since_ms / 1000) as i64 + self.local_offset_secs
    }

    /// Local time of day at monotonic time `now_ms`.
    pub fn time_of_day(&self, now_ms: u64) -> TimeOfDay {
        TimeOfDay::from_epoch_secs(self.local_epoch_secs(now_ms))
    }
}

/// Hour, minute and second of a day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeOfDay {
    /// 0 to 23.
    pub hour: u8,
    /// 0 to 59.
    pub minute: u8,
    /// 0 to 59.
    pub second: u8,
}

impl TimeOfDay {
    /// Splits Unix seconds into time of day. Negative values wrap backwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use agency_board::clock::TimeOfDay;
    ///
    /// let t = TimeOfDay::from_epoch_secs(3_723);
    /// assert_eq!((t.hour, t.minute, t.second), (1, 2, 3));
    /// ```
    pub fn from_epoch_secs(secs: i64) -> Self {
        let day = secs.rem_euclid(SECS_PER_DAY);
        Self {
            hour: (day / 3600) as u8,
            minute: (day % 3600 / 60) as u8,
            second: (day % 60) as u8,
        }
    }

    /// Separator blinks at 1 Hz: shown on even seconds.
    #[inline]
    pub fn separator_visible(&self) -> bool {
        self.second % 2 == 0
    }

    /// Zero-padded `[h, h, m, m]` digits.
    pub fn digits(&self) -> [u8; 4] {
        [
            self.hour / 10,
            self.hour % 10,
            self.minute / 10,
            self.minute % 10,
        ]
    }
}

/// Tries each server in order; the first answer wins.
///
/// On success the state is marked synced and the winning server returned.
/// When every server fails the state is left as it was.
pub fn sync_time<N, S>(net: &mut N, servers: &[S], state: &mut ClockState, now_ms: u64) -> Result<usize>
where
    N: Connectivity,
    S: AsRef<str>,
{
    for (i, server) in servers.iter().enumerate() {
        let server = server.as_ref();
        match net.sync_clock(server) {
            Ok(epoch) => {
                log::info!("time synced via {} ({})", server, epoch);
                state.mark_synced(epoch, now_ms);
                return Ok(i);
            }
            Err(e) => log::warn!("time sync with {} failed: {}", server, e),
        }
    }
    log::warn!("time sync failed on all {} servers", servers.len());
    Err(BoardError::TimeSync(format!(
        "{} servers unreachable",
        servers.len()
    )))
}

/// Clock face renderer.
///
/// Remembers what it drew last so it can touch only what changed.
#[derive(Clone, Debug, Default)]
pub struct ClockFace {
    drawn_digits: Option<[u8; 4]>,
    separator_on: Option<bool>,
}

impl ClockFace {
    /// Creates a face with nothing drawn.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets what was drawn; call after the screen is cleared.
    pub fn invalidate(&mut self) {
        self.drawn_digits = None;
        self.separator_on = None;
    }

    /// Separator state last drawn.
    pub fn separator_on(&self) -> Option<bool> {
        self.separator_on
    }

    /// Draws the face for `now_ms`. Does not present.
    pub fn render<C: Canvas>(&mut self, canvas: &mut C, state: &ClockState, now_ms: u64) -> TimeOfDay {
        let t = state.time_of_day(now_ms);
        let digits = t.digits();

        for (i, &d) in digits.iter().enumerate() {
            if self.drawn_digits.map(|prev| prev[i]) == Some(d) {
                continue;
            }
            canvas.set_color(Color::Black);
            canvas.fill_rect(DIGIT_X[i], DIGIT_Y, DIGIT_W, DIGIT_H);
            canvas.set_color(Color::White);
            canvas.draw_text(digit_str(d), DIGIT_X[i], DIGIT_Y, 1);
        }
        self.drawn_digits = Some(digits);

        let visible = t.separator_visible();
        if self.separator_on != Some(visible) {
            let color = if visible { Color::White } else { Color::Black };
            canvas.plot_all(color, 0, 0, &SEPARATOR);
            self.separator_on = Some(visible);
        }
        t
    }
}

fn digit_str(d: u8) -> &'static str {
    const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
    DIGITS[(d % 10) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{CanvasOp, MockCanvas, MockNet};

    const OFFSET: i64 = 11 * 3600;

    // =========================================================================
    // ClockState Tests
    // =========================================================================

    #[test]
    fn fallback_counts_from_boot() {
        let state = ClockState::new(1_000_000, 5_000, 0);
        assert_eq!(state.local_epoch_secs(5_000), 1_000_000);
        assert_eq!(state.local_epoch_secs(65_999), 1_000_060);
        assert!(!state.is_synced());
    }

    #[test]
    fn synced_counts_from_sync_point() {
        let mut state = ClockState::new(0, 0, OFFSET);
        state.mark_synced(1_700_000_000, 30_000);
        assert_eq!(
            state.local_epoch_secs(40_000),
            1_700_000_000 + 10 + OFFSET
        );
        assert_eq!(state.fallback_epoch_secs(), 0);
    }

    #[test]
    fn resync_replaces_but_never_clears() {
        let mut state = ClockState::new(0, 0, 0);
        state.mark_synced(100, 0);
        state.mark_synced(500, 1_000);
        assert_eq!(state.synced(), Some(SyncPoint { epoch_secs: 500, at_ms: 1_000 }));
    }

    #[test]
    fn time_of_day_wraps_negative() {
        let t = TimeOfDay::from_epoch_secs(-1);
        assert_eq!((t.hour, t.minute, t.second), (23, 59, 59));
    }

    #[test]
    fn separator_even_seconds() {
        for s in 0..60u8 {
            let t = TimeOfDay { hour: 0, minute: 0, second: s };
            assert_eq!(t.separator_visible(), s % 2 == 0);
        }
    }

    // =========================================================================
    // sync_time Tests
    // =========================================================================

    #[test]
    fn first_answer_short_circuits() {
        let mut net = MockNet::new();
        net.sync_results.insert("a".into(), Err("timeout".into()));
        net.sync_results.insert("b".into(), Ok(1_000));
        net.sync_results.insert("c".into(), Ok(2_000));
        let mut state = ClockState::new(0, 0, 0);

        let won = sync_time(&mut net, &["a", "b", "c"], &mut state, 42).unwrap();
        assert_eq!(won, 1);
        assert_eq!(net.sync_attempts, ["a", "b"]);
        assert_eq!(state.synced(), Some(SyncPoint { epoch_secs: 1_000, at_ms: 42 }));
    }

    #[test]
    fn all_servers_fail_keeps_fallback() {
        let mut net = MockNet::new();
        let mut state = ClockState::new(777, 0, 0);

        let err = sync_time(&mut net, &["a", "b", "c"], &mut state, 0).unwrap_err();
        assert!(matches!(err, BoardError::TimeSync(_)));
        assert_eq!(net.sync_attempts.len(), 3);
        assert!(state.synced().is_none());
        assert_eq!(state.local_epoch_secs(3_000), 780);
    }

    // =========================================================================
    // ClockFace Tests
    // =========================================================================

    #[test]
    fn face_draws_digits_and_separator() {
        let mut canvas = MockCanvas::new(32, 32);
        let mut face = ClockFace::new();
        // 09:41:06
        let state = ClockState::new(9 * 3600 + 41 * 60 + 6, 0, 0);

        let t = face.render(&mut canvas, &state, 0);
        assert_eq!(t.digits(), [0, 9, 4, 1]);
        assert_eq!(canvas.texts(), ["0", "9", "4", "1"]);
        assert_eq!(canvas.pixel(22, 2), Color::White);
        assert_eq!(canvas.pixel(22, 4), Color::White);
    }

    #[test]
    fn blink_only_touches_separator() {
        let mut canvas = MockCanvas::new(32, 32);
        let mut face = ClockFace::new();
        let state = ClockState::new(10 * 3600, 0, 0);
        face.render(&mut canvas, &state, 0);
        canvas.ops.clear();

        // one second later: odd second, same minute
        face.render(&mut canvas, &state, 1_000);
        assert_eq!(face.separator_on(), Some(false));
        assert!(canvas.texts().is_empty());
        assert_eq!(canvas.pixel(22, 2), Color::Black);
        assert!(canvas
            .ops
            .iter()
            .all(|op| matches!(op, CanvasOp::Plot { .. })));

        // same state again: nothing to do
        canvas.ops.clear();
        face.render(&mut canvas, &state, 1_500);
        assert!(canvas.ops.is_empty());
    }

    #[test]
    fn minute_change_redraws_changed_digit_only() {
        let mut canvas = MockCanvas::new(32, 32);
        let mut face = ClockFace::new();
        let state = ClockState::new(10 * 3600 + 59, 0, 0);
        face.render(&mut canvas, &state, 0);
        canvas.ops.clear();

        face.render(&mut canvas, &state, 1_000);
        assert_eq!(canvas.texts(), ["1"]);
    }
}
