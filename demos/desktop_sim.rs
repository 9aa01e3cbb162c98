//! Desktop simulation of the status board.
//!
//! Runs the board on mock hardware with a scripted agency feed and a
//! scripted button sequence, printing the panel as ASCII after each screen
//! change.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example desktop_sim
//! RUST_LOG=debug cargo run --example desktop_sim
//! ```

use agency_board::config::CarouselConfig;
use agency_board::feed::HttpFeed;
use agency_board::hal::MockPlatform;
use agency_board::{Board, Button, Config, DisplayMode, Phase};
use env_logger::Env;

const LISTING: &str = "id,designation,realMaxWaitingTimeMs\n\
    1,Agence de Nouméa Centre,120000\n\
    2,Agence de Koné,420000\n\
    3,Agence de Lifou,780000\n";

/// Simulated run length.
const RUN_MS: u64 = 40_000;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut config = Config::default()
        .with_carousel(CarouselConfig::default().with_dwell_ticks(40));
    config.wifi = config.wifi.with_ssid("office").with_password("secret");
    config.api = config
        .api
        .with_api_key("demo")
        .with_base_url("http://localhost:8080");
    config.display = config.display.with_qr_rows(&[
        "#######.#.#######",
        "#.....#..##.....#",
        "#.###.#.#.#.###.#",
        "#.###.#..##.###.#",
        "#.###.#.#.#.###.#",
        "#.....#.##.#....#",
        "#######.#.#######",
    ]);

    let (mut periph, clock) = MockPlatform::peripherals(32, 32);
    periph
        .net
        .respond(&config.api.listing_url(), Ok(LISTING.as_bytes().to_vec()));
    periph.net.respond(
        &config.api.agency_url("2"),
        Ok(br#"{"realMaxWaitingTimeMs": 960000}"#.to_vec()),
    );
    periph
        .net
        .sync_results
        .insert("pool.ntp.org".into(), Ok(1_760_000_000));

    // welcome -> info -> legend -> carousel, pause for a while, then QR
    for (i, at) in [1_000u64, 3_000, 5_000].iter().enumerate() {
        log::debug!("scripted press {} at {} ms", i + 1, at);
        periph.input.press_at(Button::NextMode, *at, at + 200);
    }
    periph.input.press_at(Button::TogglePause, 20_000, 20_200);
    periph.input.press_at(Button::TogglePause, 26_000, 26_200);
    periph.input.press_at(Button::NextMode, 34_000, 34_200);

    let feed = HttpFeed::new(config.api.clone());
    let tick_ms = config.carousel.tick_ms;
    let mut board = Board::new(periph, config, feed);

    println!("=================================");
    println!("  agency-board desktop simulator");
    println!("=================================");

    if let Err(e) = board.start() {
        println!("startup failed: {}", e);
    }

    let mut shown: Option<(DisplayMode, String)> = None;
    while clock.now() < RUN_MS {
        if board.tick() != Phase::Running {
            break;
        }

        let current = board
            .carousel()
            .map(|c| c.current().name.clone())
            .unwrap_or_default();
        let key = (board.mode(), current);
        if shown.as_ref() != Some(&key) {
            println!();
            println!("[{:>6} ms] {:?} {}", clock.now(), key.0, key.1);
            print!("{}", board.peripherals().canvas.to_ascii());
            shown = Some(key);
        }
        clock.advance(u64::from(tick_ms));
    }

    let p = board.peripherals();
    println!();
    println!("requests: {}", p.net.requests.len());
    println!("beeps:    {}", p.tone.played.len());
    println!("phase:    {:?}", board.phase());
}
