//! Top-level board controller.
//!
//! [`Board`] owns every collaborator and all long-lived state. One call to
//! [`Board::tick`] samples the buttons, acts on global presses, delegates to
//! the active screen and presents one frame. [`Board::run`] wraps that in the
//! boot sequence and a fixed-cadence loop.
//!
//! # Tick Order
//!
//! ```text
//! 1. Reboot        (global, immediate)
//! 2. Sound toggle  (global)
//! 3. Brightness / volume levels
//! 4. Next mode     (leaves the current screen without finishing its tick)
//! 5. Screen tick   (carousel: pause, marquee, clock, item boundary)
//! 6. Present
//! ```

use crate::buttons::{ButtonEvents, EdgeDetector};
use crate::carousel::Carousel;
use crate::clock::{sync_time, ClockState};
use crate::config::Config;
use crate::error::Result;
use crate::feed::AgencyFeed;
use crate::model::DisplayMode;
use crate::screens;
use crate::settings::{Settings, LINK_DOWN_HZ};
use crate::supervisor::{Observation, Supervisor};
use crate::traits::{Button, Canvas, Clock, Connectivity, Delay, Peripherals, Platform, SystemControl};

/// Headline of the terminal screen after losing the network.
pub const NO_WIFI: &str = "NO WIFI";

/// Headline of the terminal screen for unusable configuration.
pub const CONFIG_KO: &str = "KO";

/// Poll interval while waiting for the reboot button.
const HALT_POLL_MS: u32 = 100;

/// Welcome heart beat period.
const HEARTBEAT_MS: u64 = 500;

/// Coarse lifecycle of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Screens are live.
    Running,
    /// Showing the terminal screen; only the reboot button is read.
    Halted,
    /// Restart was requested.
    Rebooted,
}

/// Per-screen state the mode enum alone does not carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScreenState {
    /// Screen is live and ticking.
    Live,
    /// Heart drawn in the given size.
    Beating(bool),
    /// Entry failed; nothing ticks until the next mode press.
    Failed,
}

/// The status board.
pub struct Board<P: Platform, F> {
    periph: Peripherals<P>,
    config: Config,
    feed: F,
    settings: Settings,
    buttons: EdgeDetector,
    supervisor: Supervisor<<P::Net as Connectivity>::Link>,
    clock: ClockState,
    mode: DisplayMode,
    screen: ScreenState,
    carousel: Option<Carousel>,
    phase: Phase,
}

impl<P, F> Board<P, F>
where
    P: Platform,
    F: AgencyFeed<P::Net>,
{
    /// Builds a board. Nothing is drawn or connected until
    /// [`start`](Self::start).
    pub fn new(periph: Peripherals<P>, config: Config, feed: F) -> Self {
        let boot_ms = periph.timer.now_ms();
        let clock = ClockState::new(
            config.clock.fallback_epoch_secs,
            boot_ms,
            config.clock.local_offset_secs,
        );
        Self {
            settings: Settings::new(&config.display, &config.sound),
            supervisor: Supervisor::new(config.health.failure_threshold),
            buttons: EdgeDetector::new(),
            mode: DisplayMode::default(),
            screen: ScreenState::Live,
            carousel: None,
            phase: Phase::Running,
            periph,
            config,
            feed,
            clock,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Owned collaborators.
    pub fn peripherals(&self) -> &Peripherals<P> {
        &self.periph
    }

    /// Owned collaborators, mutably.
    pub fn peripherals_mut(&mut self) -> &mut Peripherals<P> {
        &mut self.periph
    }

    /// Screen on display.
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True when the current screen's entry failed.
    pub fn mode_failed(&self) -> bool {
        self.screen == ScreenState::Failed
    }

    /// Carousel, once the listing has been fetched.
    pub fn carousel(&self) -> Option<&Carousel> {
        self.carousel.as_ref()
    }

    /// Connection supervisor.
    pub fn supervisor(&self) -> &Supervisor<<P::Net as Connectivity>::Link> {
        &self.supervisor
    }

    /// Wall-clock state.
    pub fn clock(&self) -> &ClockState {
        &self.clock
    }

    /// Output settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Joins the network, syncs time and shows the first screen.
    ///
    /// # Errors
    ///
    /// Connectivity failure. The board is then halted on the terminal
    /// screen and no data fetch is attempted.
    pub fn start(&mut self) -> Result<()> {
        log::info!("board starting, mode {:?}", self.mode);
        self.periph.canvas.set_brightness(self.settings.brightness);
        self.periph.canvas.clear();
        screens::present(&mut self.periph.canvas);

        if let Err(e) = self.supervisor.connect(
            &mut self.periph.net,
            &mut self.periph.canvas,
            &mut self.periph.timer,
            &self.config.wifi,
        ) {
            self.halt(NO_WIFI);
            return Err(e);
        }

        let now = self.periph.timer.now_ms();
        if let Err(e) = sync_time(
            &mut self.periph.net,
            &self.config.clock.servers,
            &mut self.clock,
            now,
        ) {
            log::warn!("clock running from fallback epoch: {}", e);
        }

        self.enter_mode();
        screens::present(&mut self.periph.canvas);
        Ok(())
    }

    /// Boots, then ticks at the configured cadence until a reboot.
    ///
    /// On hardware the reboot never returns, so neither does this.
    pub fn run(&mut self) {
        if let Err(e) = self.start() {
            log::error!("startup failed: {}", e);
        }
        let tick_ms = self.config.carousel.tick_ms;
        while self.tick() != Phase::Rebooted {
            self.periph.timer.delay_ms(tick_ms);
        }
    }

    /// Runs one frame.
    pub fn tick(&mut self) -> Phase {
        match self.phase {
            Phase::Rebooted => return self.phase,
            Phase::Halted => {
                if self.buttons.sample(&self.periph.input).pressed(Button::Reboot) {
                    self.reboot();
                }
                return self.phase;
            }
            Phase::Running => {}
        }

        let now = self.periph.timer.now_ms();
        let events = self.buttons.sample(&self.periph.input);

        if events.pressed(Button::Reboot) {
            self.reboot();
            return self.phase;
        }
        if events.pressed(Button::ToggleSound) {
            let on = self.settings.toggle_sound(&mut self.periph.tone);
            if self.carousel_live() {
                screens::sound_indicator(&mut self.periph.canvas, on);
            }
        }
        if self.settings.adjust(&events) {
            self.periph.canvas.set_brightness(self.settings.brightness);
        }
        if events.pressed(Button::NextMode) {
            self.next_mode();
        } else {
            self.tick_screen(&events, now);
        }

        if self.phase == Phase::Running {
            screens::present(&mut self.periph.canvas);
        }
        self.phase
    }

    fn reboot(&mut self) {
        log::warn!("reboot requested");
        self.periph.canvas.clear();
        screens::present(&mut self.periph.canvas);
        self.phase = Phase::Rebooted;
        self.periph.system.reboot();
    }

    fn halt(&mut self, headline: &str) {
        log::error!("halting: {}", headline);
        self.phase = Phase::Halted;
        screens::terminal(&mut self.periph.canvas, headline);
        screens::present(&mut self.periph.canvas);
    }

    // =========================================================================
    // Modes
    // =========================================================================

    fn next_mode(&mut self) {
        let next = self.mode.next();
        log::info!("mode {:?} -> {:?}", self.mode, next);
        self.mode = next;
        self.screen = ScreenState::Live;
        self.settings.confirm(&mut self.periph.tone);
        self.enter_mode();
    }

    fn enter_mode(&mut self) {
        if self.mode == DisplayMode::Carousel {
            self.enter_carousel();
            return;
        }
        if !self.clear_screen() {
            return;
        }
        let canvas = &mut self.periph.canvas;
        match self.mode {
            DisplayMode::Welcome => {
                screens::welcome(canvas, true);
                self.screen = ScreenState::Beating(true);
            }
            DisplayMode::Info => {
                let wifi_ok = self.supervisor.health().last_known_up();
                screens::info(canvas, wifi_ok, self.config.api.has_key());
            }
            DisplayMode::Legend => screens::legend(canvas),
            DisplayMode::QrCode => screens::qr_code(canvas, &self.config.display.qr_rows),
            DisplayMode::Carousel => {}
        }
    }

    fn tick_screen(&mut self, events: &ButtonEvents, now: u64) {
        match (self.mode, self.screen) {
            (_, ScreenState::Failed) => {}
            (DisplayMode::Welcome, ScreenState::Beating(shown)) => {
                let beat = (now / HEARTBEAT_MS) % 2 == 0;
                if beat != shown {
                    screens::welcome_heart(&mut self.periph.canvas, beat);
                    self.screen = ScreenState::Beating(beat);
                }
            }
            (DisplayMode::Carousel, _) => self.tick_carousel(events, now),
            (DisplayMode::Welcome, _)
            | (DisplayMode::Info, _)
            | (DisplayMode::Legend, _)
            | (DisplayMode::QrCode, _) => {}
        }
    }

    /// Clears the screen and takes a link observation.
    ///
    /// Returns false if the observation halted the board.
    fn clear_screen(&mut self) -> bool {
        self.periph.canvas.clear();
        self.observe_link()
    }

    fn observe_link(&mut self) -> bool {
        match self.supervisor.observe(&self.periph.net) {
            Observation::Up => true,
            Observation::Down(_) => {
                self.settings.beep(&mut self.periph.tone, LINK_DOWN_HZ);
                true
            }
            Observation::EnteredTerminal | Observation::Terminal => {
                self.halt(NO_WIFI);
                false
            }
        }
    }

    // =========================================================================
    // Carousel
    // =========================================================================

    fn carousel_live(&self) -> bool {
        self.mode == DisplayMode::Carousel
            && self.screen == ScreenState::Live
            && self.carousel.is_some()
    }

    fn enter_carousel(&mut self) {
        if self.carousel.is_none() {
            let canvas = &mut self.periph.canvas;
            canvas.clear();
            screens::message(canvas, &["WAIT"]);
            screens::present(canvas);

            let width = canvas.width();
            let listing = self.feed.list(&mut self.periph.net);
            match listing.and_then(|records| Carousel::new(records, &self.config.carousel, width)) {
                Ok(carousel) => self.carousel = Some(carousel),
                Err(e) => {
                    log::error!("carousel unavailable: {}", e);
                    screens::message(&mut self.periph.canvas, &["NO API"]);
                    self.screen = ScreenState::Failed;
                    return;
                }
            }
        }
        let now = self.periph.timer.now_ms();
        self.begin_carousel_item(now);
    }

    fn begin_carousel_item(&mut self, now: u64) {
        if !self.clear_screen() {
            return;
        }
        let Some(carousel) = self.carousel.as_mut() else {
            return;
        };
        let mood = carousel.begin_item(&mut self.periph.canvas, now);
        screens::indicators(
            &mut self.periph.canvas,
            self.settings.sound_enabled,
            carousel.state().paused,
            !self.supervisor.health().last_known_up(),
        );
        self.settings.announce(&mut self.periph.tone, mood);
    }

    fn tick_carousel(&mut self, events: &ButtonEvents, now: u64) {
        let Some(carousel) = self.carousel.as_mut() else {
            return;
        };
        let canvas = &mut self.periph.canvas;
        if events.pressed(Button::TogglePause) {
            let paused = carousel.toggle_pause();
            screens::pause_indicator(canvas, paused);
        }
        if !carousel.tick(canvas, &self.clock, now) {
            return;
        }
        if carousel.finish_item(&mut self.feed, &mut self.periph.net) {
            let now = self.periph.timer.now_ms();
            self.begin_carousel_item(now);
        }
    }
}

/// Shows the terminal screen and blocks until the reboot button.
///
/// Used when no [`Board`] can be built, for example with unusable
/// configuration.
pub fn halt_until_reboot<P: Platform>(periph: &mut Peripherals<P>, headline: &str) {
    log::error!("halting: {}", headline);
    screens::terminal(&mut periph.canvas, headline);
    screens::present(&mut periph.canvas);

    let mut buttons = EdgeDetector::new();
    loop {
        if buttons.sample(&periph.input).pressed(Button::Reboot) {
            log::warn!("reboot requested");
            periph.system.reboot();
            return;
        }
        periph.timer.delay_ms(HALT_POLL_MS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::HttpFeed;
    use crate::hal::{MockClock, MockPlatform};
    use crate::traits::Color;

    const LISTING: &str = "id,designation,realMaxWaitingTimeMs\n\
        1,Agence de A,100000\n\
        2,Agence de B,400000\n";

    fn config() -> Config {
        let mut config = Config::default();
        config.wifi = config.wifi.with_ssid("net").with_password("pw");
        config.api = config.api.with_api_key("key").with_base_url("http://api");
        config
    }

    fn board() -> (Board<MockPlatform, HttpFeed>, MockClock) {
        let (mut periph, clock) = MockPlatform::peripherals(32, 32);
        periph
            .net
            .respond("http://api/csv", Ok(LISTING.as_bytes().to_vec()));
        let config = config();
        let feed = HttpFeed::new(config.api.clone());
        (Board::new(periph, config, feed), clock)
    }

    /// Press, tick, release, tick. Returns the phase after the press.
    fn press(board: &mut Board<MockPlatform, HttpFeed>, button: Button) -> Phase {
        board.peripherals_mut().input.set(button, true);
        let phase = board.tick();
        board.peripherals_mut().input.set(button, false);
        board.tick();
        phase
    }

    // =========================================================================
    // Mode Tests
    // =========================================================================

    #[test]
    fn starts_on_welcome() {
        let (mut b, _) = board();
        b.start().unwrap();
        assert_eq!(b.mode(), DisplayMode::Welcome);
        assert_eq!(b.phase(), Phase::Running);
        assert!(b.peripherals().canvas.texts().contains(&"UNC".to_string()));
    }

    #[test]
    fn next_mode_cycles_with_confirmation() {
        let (mut b, _) = board();
        b.start().unwrap();
        let tones_before = b.peripherals().tone.played.len();

        press(&mut b, Button::NextMode);
        assert_eq!(b.mode(), DisplayMode::Info);
        assert_eq!(b.peripherals().tone.played.len(), tones_before + 1);
        assert_eq!(b.peripherals().canvas.texts(), ["WIFI", "OK", "API", "OK"]);
    }

    #[test]
    fn held_next_mode_advances_once() {
        let (mut b, _) = board();
        b.start().unwrap();
        b.peripherals_mut().input.set(Button::NextMode, true);
        for _ in 0..5 {
            b.tick();
        }
        assert_eq!(b.mode(), DisplayMode::Info);
    }

    #[test]
    fn carousel_entry_fetches_once() {
        let (mut b, _) = board();
        b.start().unwrap();
        for _ in 0..3 {
            press(&mut b, Button::NextMode);
        }
        assert_eq!(b.mode(), DisplayMode::Carousel);
        assert_eq!(b.carousel().map(|c| c.records().len()), Some(2));

        // full cycle back to the carousel reuses the listing
        for _ in 0..5 {
            press(&mut b, Button::NextMode);
        }
        assert_eq!(b.mode(), DisplayMode::Carousel);
        let listings = b
            .peripherals()
            .net
            .requests
            .iter()
            .filter(|r| r.url == "http://api/csv")
            .count();
        assert_eq!(listings, 1);
    }

    #[test]
    fn failed_listing_parks_carousel() {
        let (mut b, _) = board();
        b.peripherals_mut().net.responses.clear();
        b.start().unwrap();
        for _ in 0..3 {
            press(&mut b, Button::NextMode);
        }
        assert!(b.mode_failed());
        assert!(b.peripherals().canvas.texts().contains(&"NO API".to_string()));
        b.tick();
        assert!(b.mode_failed());

        press(&mut b, Button::NextMode);
        assert_eq!(b.mode(), DisplayMode::QrCode);
        assert!(!b.mode_failed());
    }

    // =========================================================================
    // Global Button Tests
    // =========================================================================

    #[test]
    fn reboot_is_immediate() {
        let (mut b, _) = board();
        b.start().unwrap();
        assert_eq!(press(&mut b, Button::Reboot), Phase::Rebooted);
        assert_eq!(b.peripherals().system.reboots, 1);
        assert_eq!(b.tick(), Phase::Rebooted);
    }

    #[test]
    fn sound_toggle_updates_indicator_in_carousel() {
        let (mut b, _) = board();
        b.start().unwrap();
        for _ in 0..3 {
            press(&mut b, Button::NextMode);
        }
        press(&mut b, Button::ToggleSound);
        assert!(!b.settings().sound_enabled);
        assert_eq!(b.peripherals().canvas.pixel(0, 9), Color::Red);
    }

    #[test]
    fn brightness_reaches_panel() {
        let (mut b, _) = board();
        b.start().unwrap();
        b.peripherals_mut().input.set(Button::BrightnessDown, true);
        for _ in 0..10 {
            b.tick();
        }
        assert!((b.peripherals().canvas.brightness - 0.4).abs() < 1e-3);
    }

    // =========================================================================
    // Failure Tests
    // =========================================================================

    #[test]
    fn connect_failure_halts_without_fetch() {
        let (mut b, _) = board();
        b.peripherals_mut().net.connect_failures = u32::MAX;
        assert!(b.start().is_err());
        assert_eq!(b.phase(), Phase::Halted);
        assert!(b.peripherals().net.requests.is_empty());
        assert!(b.peripherals().canvas.texts().contains(&NO_WIFI.to_string()));

        // nothing but reboot is read while halted
        assert_eq!(press(&mut b, Button::NextMode), Phase::Halted);
        assert_eq!(press(&mut b, Button::Reboot), Phase::Rebooted);
    }

    #[test]
    fn halt_until_reboot_waits_for_button() {
        let (mut periph, clock) = MockPlatform::peripherals(32, 32);
        periph.input.press_at(Button::Reboot, 1_000, 1_100);
        halt_until_reboot(&mut periph, CONFIG_KO);
        assert_eq!(periph.system.reboots, 1);
        assert_eq!(clock.now(), 1_000);
    }
}
