//! Connection supervision: join with retries, then watch the link.
//!
//! # State Machine
//!
//! ```text
//! Disconnected -> Connecting -> Connected <-> Degraded -> Terminal
//! ```
//!
//! `Degraded` means at least one negative observation since the link was last
//! seen up. Reaching the failure threshold enters `Terminal`, which absorbs
//! every later observation until the device is restarted.

use crate::config::WifiConfig;
use crate::error::{BoardError, Result};
use crate::screens;
use crate::traits::{Canvas, Connectivity, Delay};

/// Connectivity lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ConnState {
    /// No join attempted yet, or every attempt failed.
    #[default]
    Disconnected,
    /// Join attempts in progress.
    Connecting,
    /// Link up and the last observation was positive.
    Connected,
    /// Link was lost on the last `streak` observations.
    Degraded,
    /// Too many consecutive failures; only a restart leaves this state.
    Terminal,
}

/// Result of one link observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Observation {
    /// Link is up; the streak is now zero.
    Up,
    /// Link is down; carries the new streak.
    Down(u32),
    /// This observation crossed the threshold. Reported once.
    EnteredTerminal,
    /// Already terminal; the observation was ignored.
    Terminal,
}

/// Rolling failure counter with a terminal threshold.
///
/// # Example
///
/// ```rust
/// use agency_board::supervisor::{ConnectionHealth, Observation};
///
/// let mut health = ConnectionHealth::new(2);
/// assert_eq!(health.record(false), Observation::Down(1));
/// assert_eq!(health.record(true), Observation::Up);
/// assert_eq!(health.record(false), Observation::Down(1));
/// assert_eq!(health.record(false), Observation::EnteredTerminal);
/// assert_eq!(health.record(true), Observation::Terminal);
/// ```
#[derive(Clone, Debug)]
pub struct ConnectionHealth {
    failure_streak: u32,
    last_known_up: bool,
    threshold: u32,
    terminal: bool,
}

impl ConnectionHealth {
    /// Creates a healthy counter. A threshold of 0 is treated as 1.
    pub fn new(threshold: u32) -> Self {
        Self {
            failure_streak: 0,
            last_known_up: false,
            threshold: threshold.max(1),
            terminal: false,
        }
    }

    /// Feeds one observation.
    pub fn record(&mut self, linked: bool) -> Observation {
        if self.terminal {
            return Observation::Terminal;
        }
        self.last_known_up = linked;
        if linked {
            self.failure_streak = 0;
            return Observation::Up;
        }
        self.failure_streak += 1;
        if self.failure_streak >= self.threshold {
            self.terminal = true;
            Observation::EnteredTerminal
        } else {
            Observation::Down(self.failure_streak)
        }
    }

    /// Consecutive negative observations.
    pub fn failure_streak(&self) -> u32 {
        self.failure_streak
    }

    /// Outcome of the latest observation.
    pub fn last_known_up(&self) -> bool {
        self.last_known_up
    }

    /// True once the threshold has been reached.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
}

/// Owns the link and its health.
pub struct Supervisor<L> {
    link: Option<L>,
    health: ConnectionHealth,
    state: ConnState,
    attempts: u8,
}

impl<L> Supervisor<L> {
    /// Creates a disconnected supervisor.
    pub fn new(failure_threshold: u32) -> Self {
        Self {
            link: None,
            health: ConnectionHealth::new(failure_threshold),
            state: ConnState::Disconnected,
            attempts: 0,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnState {
        self.state
    }

    /// Link health counters.
    pub fn health(&self) -> &ConnectionHealth {
        &self.health
    }

    /// Join attempts made by the last [`connect`](Self::connect).
    pub fn attempts(&self) -> u8 {
        self.attempts
    }

    /// True while a link handle is held.
    pub fn has_link(&self) -> bool {
        self.link.is_some()
    }

    /// Joins the configured network, drawing one loading block per attempt.
    ///
    /// Waits `retry_interval_ms` between failed attempts and gives up after
    /// `max_attempts`.
    ///
    /// # Errors
    ///
    /// [`BoardError::Connectivity`] when every attempt failed.
    pub fn connect<N, C, D>(
        &mut self,
        net: &mut N,
        canvas: &mut C,
        delay: &mut D,
        wifi: &WifiConfig,
    ) -> Result<()>
    where
        N: Connectivity<Link = L>,
        C: Canvas,
        D: Delay,
    {
        let max = wifi.max_attempts.max(1);
        self.state = ConnState::Connecting;
        self.attempts = 0;

        for attempt in 1..=max {
            self.attempts = attempt;
            log::info!("wifi: connecting to {} (attempt {}/{})", wifi.ssid, attempt, max);
            screens::loading_step(canvas, attempt);
            screens::present(canvas);

            match net.connect(&wifi.ssid, &wifi.password) {
                Ok(link) => {
                    log::info!("wifi: connected after {} attempt(s)", attempt);
                    self.link = Some(link);
                    self.state = ConnState::Connected;
                    self.health.record(true);
                    return Ok(());
                }
                Err(e) => {
                    log::warn!("wifi: attempt {}/{} failed: {}", attempt, max, e);
                    if attempt < max {
                        delay.delay_ms(wifi.retry_interval_ms);
                    }
                }
            }
        }

        self.state = ConnState::Disconnected;
        log::error!("wifi: giving up after {} attempts", max);
        Err(BoardError::Connectivity(format!(
            "{} unreachable after {} attempts",
            wifi.ssid, max
        )))
    }

    /// Probes the link once and updates health.
    ///
    /// Without a link every probe counts as a failure.
    pub fn observe<N>(&mut self, net: &N) -> Observation
    where
        N: Connectivity<Link = L>,
    {
        let linked = self.link.as_ref().is_some_and(|link| net.is_linked(link));
        let obs = self.health.record(linked);
        match obs {
            Observation::Up => {
                if self.state == ConnState::Degraded {
                    log::info!("wifi: link back up");
                }
                self.state = ConnState::Connected;
            }
            Observation::Down(streak) => {
                log::warn!("wifi: link down ({} in a row)", streak);
                self.state = ConnState::Degraded;
            }
            Observation::EnteredTerminal => {
                log::error!(
                    "wifi: link down {} times in a row, giving up",
                    self.health.failure_streak()
                );
                self.state = ConnState::Terminal;
            }
            Observation::Terminal => {}
        }
        obs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockCanvas, MockClock, MockNet};
    use crate::traits::{Clock, Color};

    fn wifi(attempts: u8) -> WifiConfig {
        WifiConfig::default()
            .with_ssid("office")
            .with_password("pw")
            .with_max_attempts(attempts)
    }

    // =========================================================================
    // ConnectionHealth Tests
    // =========================================================================

    #[test]
    fn streak_resets_on_any_up() {
        let mut h = ConnectionHealth::new(10);
        for i in 1..=9 {
            assert_eq!(h.record(false), Observation::Down(i));
        }
        assert_eq!(h.record(true), Observation::Up);
        assert_eq!(h.failure_streak(), 0);
        assert!(h.last_known_up());
        assert_eq!(h.record(false), Observation::Down(1));
    }

    #[test]
    fn terminal_exactly_once() {
        let mut h = ConnectionHealth::new(10);
        let entered = (0..25)
            .map(|_| h.record(false))
            .filter(|o| *o == Observation::EnteredTerminal)
            .count();
        assert_eq!(entered, 1);
        assert!(h.is_terminal());
        assert_eq!(h.record(true), Observation::Terminal);
        assert_eq!(h.failure_streak(), 10);
    }

    // =========================================================================
    // Supervisor Tests
    // =========================================================================

    #[test]
    fn connect_retries_then_succeeds() {
        let mut net = MockNet::new();
        net.connect_failures = 2;
        let mut canvas = MockCanvas::new(32, 32);
        let mut clock = MockClock::new();
        let mut sup = Supervisor::new(10);

        sup.connect(&mut net, &mut canvas, &mut clock, &wifi(10)).unwrap();
        assert_eq!(sup.state(), ConnState::Connected);
        assert_eq!(sup.attempts(), 3);
        assert_eq!(net.connect_attempts.len(), 3);
        assert_eq!(net.connect_attempts[0], ("office".to_string(), "pw".to_string()));
        // two waits of 3 s between three attempts
        assert_eq!(clock.now_ms(), 6_000);
        assert_eq!(canvas.presents, 3);
    }

    #[test]
    fn connect_gives_up_after_max_attempts() {
        let mut net = MockNet::new();
        net.connect_failures = u32::MAX;
        let mut canvas = MockCanvas::new(32, 32);
        let mut clock = MockClock::new();
        let mut sup = Supervisor::new(10);

        let err = sup
            .connect(&mut net, &mut canvas, &mut clock, &wifi(10))
            .unwrap_err();
        assert!(matches!(err, BoardError::Connectivity(_)));
        assert_eq!(net.connect_attempts.len(), 10);
        assert_eq!(sup.state(), ConnState::Disconnected);
        assert!(!sup.has_link());
        // one block per attempt along the bottom
        assert_ne!(canvas.pixel(27, 30), Color::Black);
        assert_eq!(canvas.pixel(30, 30), Color::Black);
    }

    #[test]
    fn observe_walks_state_machine() {
        let mut net = MockNet::new();
        let mut canvas = MockCanvas::new(32, 32);
        let mut clock = MockClock::new();
        let mut sup = Supervisor::new(3);
        sup.connect(&mut net, &mut canvas, &mut clock, &wifi(1)).unwrap();

        net.script_links(&[false, true, false, false, false, true]);
        assert_eq!(sup.observe(&net), Observation::Down(1));
        assert_eq!(sup.state(), ConnState::Degraded);
        assert_eq!(sup.observe(&net), Observation::Up);
        assert_eq!(sup.state(), ConnState::Connected);
        assert_eq!(sup.observe(&net), Observation::Down(1));
        assert_eq!(sup.observe(&net), Observation::Down(2));
        assert_eq!(sup.observe(&net), Observation::EnteredTerminal);
        assert_eq!(sup.state(), ConnState::Terminal);
        assert_eq!(sup.observe(&net), Observation::Terminal);
        assert_eq!(sup.state(), ConnState::Terminal);
    }

    #[test]
    fn observe_without_link_counts_as_down() {
        let net = MockNet::new();
        let mut sup: Supervisor<<MockNet as Connectivity>::Link> = Supervisor::new(10);
        assert_eq!(sup.observe(&net), Observation::Down(1));
        assert_eq!(net.link_checks(), 0);
    }
}
