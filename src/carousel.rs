//! Agency carousel: one record at a time, with prefetch of the next one.
//!
//! Each item is shown for a fixed number of ticks. While it is on screen the
//! marquee scrolls its name and the clock keeps running. When the dwell ends
//! the *next* record is refreshed, so the network round trip overlaps the
//! time the current record was already visible, and only then does the
//! index move on.
//!
//! ```text
//! begin_item(i) -> tick x dwell -> finish_item: refresh(next), i = next
//! ```
//!
//! Pausing stops index movement. The dwell counter, marquee and clock keep
//! going and the prefetch still runs at every item boundary, but a paused
//! boundary only restarts the dwell: the item is not redrawn or announced.

use crate::clock::{ClockFace, ClockState};
use crate::config::CarouselConfig;
use crate::error::{BoardError, Result};
use crate::feed::AgencyFeed;
use crate::marquee::Marquee;
use crate::model::{AgencyRecord, Mood};
use crate::screens;
use crate::traits::{Canvas, Connectivity};

/// Carousel position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CarouselState {
    /// Record on screen.
    pub current_index: usize,
    /// Record that will be prefetched and shown next.
    pub next_index: usize,
    /// Index movement is suppressed while true.
    pub paused: bool,
}

impl CarouselState {
    fn starting_at(index: usize, len: usize) -> Self {
        Self {
            current_index: index,
            next_index: (index + 1) % len,
            paused: false,
        }
    }
}

/// Carousel over a fixed, non-empty list of records.
#[derive(Debug)]
pub struct Carousel {
    records: Vec<AgencyRecord>,
    state: CarouselState,
    marquee: Marquee,
    face: ClockFace,
    dwell_ticks: u32,
    ticks_shown: u32,
}

impl Carousel {
    /// Takes ownership of the listing.
    ///
    /// # Errors
    ///
    /// [`BoardError::DataUnavailable`] if `records` is empty.
    pub fn new(records: Vec<AgencyRecord>, config: &CarouselConfig, screen_width: u32) -> Result<Self> {
        if records.is_empty() {
            return Err(BoardError::DataUnavailable);
        }
        let state = CarouselState::starting_at(0, records.len());
        Ok(Self {
            records,
            state,
            marquee: Marquee::new(screen_width),
            face: ClockFace::new(),
            dwell_ticks: config.dwell_ticks.max(1),
            ticks_shown: 0,
        })
    }

    /// Records in traversal order.
    pub fn records(&self) -> &[AgencyRecord] {
        &self.records
    }

    /// Current position.
    pub fn state(&self) -> CarouselState {
        self.state
    }

    /// Record on screen.
    pub fn current(&self) -> &AgencyRecord {
        &self.records[self.state.current_index]
    }

    /// Scroll state of the name band.
    pub fn marquee(&self) -> &Marquee {
        &self.marquee
    }

    /// Ticks the current item has been on screen.
    pub fn ticks_shown(&self) -> u32 {
        self.ticks_shown
    }

    /// Flips pause. Returns the new value.
    pub fn toggle_pause(&mut self) -> bool {
        self.state.paused = !self.state.paused;
        log::info!(
            "carousel {} on {}",
            if self.state.paused { "paused" } else { "resumed" },
            self.current().name
        );
        self.state.paused
    }

    /// Draws the current item from scratch and restarts its dwell.
    ///
    /// Returns the mood shown so the caller can announce it.
    pub fn begin_item<C: Canvas>(&mut self, canvas: &mut C, now_ms: u64) -> Mood {
        let record = &self.records[self.state.current_index];
        let mood = record.mood();
        log::debug!(
            "showing {} ({} min, {})",
            record.name,
            record.wait_minutes(),
            mood
        );

        canvas.clear();
        screens::carousel_header(canvas);
        screens::mood_face(canvas, mood);
        screens::wait_band(canvas, mood);
        let width = canvas.measure_text(&record.name, 1);
        self.marquee.set_text(&record.name, width, now_ms);
        self.face.invalidate();
        self.ticks_shown = 0;
        mood
    }

    /// Advances one animation frame. Does not present.
    ///
    /// Returns true when the item's dwell is over and
    /// [`finish_item`](Self::finish_item) is due.
    pub fn tick<C: Canvas>(&mut self, canvas: &mut C, clock: &ClockState, now_ms: u64) -> bool {
        self.marquee.tick(canvas, now_ms);
        self.face.render(canvas, clock, now_ms);
        self.ticks_shown += 1;
        self.ticks_shown >= self.dwell_ticks
    }

    /// Prefetches the next record, then moves to it unless paused.
    ///
    /// A failed refresh keeps the stale value. Returns true if the index
    /// moved and [`begin_item`](Self::begin_item) is due. When paused only
    /// the dwell restarts; the marquee keeps its position.
    pub fn finish_item<N, F>(&mut self, feed: &mut F, net: &mut N) -> bool
    where
        N: Connectivity,
        F: AgencyFeed<N>,
    {
        let next = self.state.next_index;
        if let Err(e) = feed.refresh(net, &mut self.records[next]) {
            log::warn!(
                "refresh of {} failed, keeping {} min: {}",
                self.records[next].name,
                self.records[next].wait_minutes(),
                e
            );
        }

        if self.state.paused {
            self.ticks_shown = 0;
            return false;
        }
        self.state = CarouselState::starting_at(next, self.records.len());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockCanvas, MockNet};

    /// Feed double that records which ids were refreshed.
    #[derive(Default)]
    struct ScriptedFeed {
        refreshed: Vec<String>,
        fail: bool,
        wait_ms: u64,
    }

    impl<N: Connectivity> AgencyFeed<N> for ScriptedFeed {
        fn list(&mut self, _net: &mut N) -> Result<Vec<AgencyRecord>> {
            Ok(Vec::new())
        }

        fn refresh(&mut self, _net: &mut N, record: &mut AgencyRecord) -> Result<()> {
            self.refreshed.push(record.id.clone());
            if self.fail {
                return Err(BoardError::DataFetch("offline".into()));
            }
            record.wait_ms = self.wait_ms;
            Ok(())
        }
    }

    fn records() -> Vec<AgencyRecord> {
        vec![
            AgencyRecord::new("1", "A", 100_000),
            AgencyRecord::new("2", "B", 400_000),
            AgencyRecord::new("3", "C", 900_000),
        ]
    }

    fn carousel(records: Vec<AgencyRecord>, dwell: u32) -> Carousel {
        Carousel::new(records, &CarouselConfig::default().with_dwell_ticks(dwell), 32).unwrap()
    }

    // =========================================================================
    // Construction Tests
    // =========================================================================

    #[test]
    fn empty_listing_is_unavailable() {
        let err = Carousel::new(Vec::new(), &CarouselConfig::default(), 32).unwrap_err();
        assert_eq!(err, BoardError::DataUnavailable);
    }

    #[test]
    fn starts_at_first_record() {
        let c = carousel(records(), 100);
        assert_eq!(
            c.state(),
            CarouselState { current_index: 0, next_index: 1, paused: false }
        );
    }

    // =========================================================================
    // Traversal Tests
    // =========================================================================

    #[test]
    fn visits_in_order_and_wraps() {
        let mut c = carousel(records(), 1);
        let mut feed = ScriptedFeed { fail: true, ..Default::default() };
        let mut net = MockNet::new();

        let mut seen = Vec::new();
        for _ in 0..7 {
            seen.push(c.state().current_index);
            assert!(c.finish_item(&mut feed, &mut net));
        }
        assert_eq!(seen, [0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn moods_follow_order() {
        let mut c = carousel(records(), 1);
        let mut canvas = MockCanvas::new(32, 32);
        let mut feed = ScriptedFeed { fail: true, ..Default::default() };
        let mut net = MockNet::new();

        let mut moods = Vec::new();
        for _ in 0..4 {
            moods.push(c.begin_item(&mut canvas, 0));
            c.finish_item(&mut feed, &mut net);
        }
        assert_eq!(moods, [Mood::Happy, Mood::Neutral, Mood::Sad, Mood::Happy]);
    }

    #[test]
    fn paused_never_advances() {
        let mut c = carousel(records(), 1);
        let mut feed = ScriptedFeed { fail: true, ..Default::default() };
        let mut net = MockNet::new();
        c.finish_item(&mut feed, &mut net);
        assert!(c.toggle_pause());

        for _ in 0..50 {
            assert!(!c.finish_item(&mut feed, &mut net));
            assert_eq!(c.state().current_index, 1);
        }
        // prefetch keeps running while paused
        assert_eq!(feed.refreshed.len(), 51);
        assert!(feed.refreshed[1..].iter().all(|id| id == "3"));
    }

    #[test]
    fn single_record_redisplays_itself() {
        let mut c = carousel(vec![AgencyRecord::new("9", "SOLO", 0)], 1);
        let mut feed = ScriptedFeed { wait_ms: 700_000, ..Default::default() };
        let mut net = MockNet::new();

        assert_eq!(c.state().next_index, 0);
        assert!(c.finish_item(&mut feed, &mut net));
        assert_eq!(c.state().current_index, 0);
        assert_eq!(feed.refreshed, ["9"]);
        assert_eq!(c.current().mood(), Mood::Sad);
    }

    // =========================================================================
    // Prefetch Tests
    // =========================================================================

    #[test]
    fn prefetch_targets_next_not_current() {
        let mut c = carousel(records(), 1);
        let mut feed = ScriptedFeed { wait_ms: 1, ..Default::default() };
        let mut net = MockNet::new();

        c.finish_item(&mut feed, &mut net);
        c.finish_item(&mut feed, &mut net);
        c.finish_item(&mut feed, &mut net);
        assert_eq!(feed.refreshed, ["2", "3", "1"]);
    }

    #[test]
    fn failed_prefetch_keeps_stale_wait() {
        let mut c = carousel(records(), 1);
        let mut feed = ScriptedFeed { fail: true, ..Default::default() };
        let mut net = MockNet::new();

        c.finish_item(&mut feed, &mut net);
        assert_eq!(c.records()[1].wait_ms, 400_000);
        assert_eq!(c.current().id, "2");
    }

    // =========================================================================
    // Animation Tests
    // =========================================================================

    #[test]
    fn dwell_counts_ticks_even_when_paused() {
        let mut c = carousel(records(), 3);
        let mut canvas = MockCanvas::new(32, 32);
        let clock = ClockState::new(0, 0, 0);
        c.begin_item(&mut canvas, 0);
        c.toggle_pause();

        assert!(!c.tick(&mut canvas, &clock, 100));
        assert!(!c.tick(&mut canvas, &clock, 200));
        assert!(c.tick(&mut canvas, &clock, 300));
        assert_eq!(c.marquee().offset(), 3);
    }

    #[test]
    fn begin_item_resets_scroll() {
        let mut c = carousel(records(), 100);
        let mut canvas = MockCanvas::new(32, 32);
        let clock = ClockState::new(0, 0, 0);
        c.begin_item(&mut canvas, 0);
        for t in 1..=5 {
            c.tick(&mut canvas, &clock, t * 100);
        }
        assert_eq!(c.marquee().offset(), 5);

        c.begin_item(&mut canvas, 600);
        assert_eq!(c.marquee().offset(), 0);
        assert_eq!(c.ticks_shown(), 0);
        assert_eq!(c.marquee().text(), "A");
    }

    #[test]
    fn paused_boundary_keeps_scroll() {
        let mut c = carousel(records(), 2);
        let mut canvas = MockCanvas::new(32, 32);
        let clock = ClockState::new(0, 0, 0);
        let mut feed = ScriptedFeed { fail: true, ..Default::default() };
        let mut net = MockNet::new();
        c.begin_item(&mut canvas, 0);
        c.toggle_pause();

        c.tick(&mut canvas, &clock, 100);
        assert!(c.tick(&mut canvas, &clock, 200));
        assert!(!c.finish_item(&mut feed, &mut net));
        assert_eq!(c.ticks_shown(), 0);
        assert_eq!(c.marquee().offset(), 2);

        c.tick(&mut canvas, &clock, 300);
        assert_eq!(c.marquee().offset(), 3);
        assert_eq!(c.current().id, "1");
    }
}
