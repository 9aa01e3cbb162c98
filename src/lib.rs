//! # agency-board
//!
//! Firmware core for a small pixel-matrix status board that shows live
//! waiting times of service agencies.
//!
//! ## Features
//!
//! - **Mode cycle**: welcome, info, legend, agency carousel and QR screens,
//!   switched by a single button
//! - **Agency carousel**: mood face, scrolling name and live clock per agency,
//!   with the next agency refreshed while the current one is on screen
//! - **Resilience**: join retries with a progress bar, time sync with a
//!   fallback epoch, link supervision with a terminal reboot screen
//! - **Controls**: pause, mute, brightness and beep pitch, reboot
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Canvas, input, tone, network and timing seams
//! - `orchestrator` - Mode state machine that ties everything together
//! - `carousel`, `marquee`, `clock` - Per-tick animation logic
//! - `supervisor` - Connection retry and link health
//! - `hal` - Concrete implementations (mock for testing, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use agency_board::{Board, Config, DisplayMode, Phase};
//! use agency_board::feed::HttpFeed;
//! use agency_board::hal::MockPlatform;
//! use agency_board::traits::Button;
//!
//! let (mut periph, _clock) = MockPlatform::peripherals(32, 32);
//! periph.input.set(Button::NextMode, true);
//!
//! let config = Config::default();
//! let feed = HttpFeed::new(config.api.clone());
//! let mut board = Board::new(periph, config, feed);
//!
//! board.start().unwrap();
//! assert_eq!(board.tick(), Phase::Running);
//! assert_eq!(board.mode(), DisplayMode::Info);
//! ```

#![warn(missing_docs)]

/// Consumed-until-released button edge detection.
pub mod buttons;
/// Agency carousel with next-item prefetch.
pub mod carousel;
/// Wall-clock derivation, time sync and the clock face.
pub mod clock;
/// Credentials and board configuration.
pub mod config;
/// Error taxonomy.
pub mod error;
/// Agency data feed over HTTP.
pub mod feed;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Scrolling text band.
pub mod marquee;
/// Agency records, moods and display modes.
pub mod model;
/// Top-level mode state machine and main loop.
pub mod orchestrator;
/// Screen art and status indicators.
pub mod screens;
/// Brightness, beep pitch and mute.
pub mod settings;
/// Connection retries and link health.
pub mod supervisor;
/// Collaborator traits.
pub mod traits;

pub use carousel::{Carousel, CarouselState};
pub use clock::ClockState;
pub use config::{Config, Credentials};
pub use error::{BoardError, Result};
pub use model::{AgencyRecord, DisplayMode, Mood};
pub use orchestrator::{Board, Phase};
pub use supervisor::{ConnState, ConnectionHealth, Observation};
pub use traits::{Button, Color};
