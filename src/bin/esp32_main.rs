//! ESP32 status board entry point.
//!
//! Brings up the panel, buttons, buzzer and network, then hands everything
//! to [`Board::run`], which joins Wi-Fi, syncs the clock and cycles screens
//! until a reboot.
//!
//! # Credentials
//!
//! Baked in at build time from the environment:
//!
//! ```bash
//! SSID=office WIFI_PASSWORD=secret API_KEY=abc cargo build --release \
//!     --features esp32-full --bin esp32_main
//! ```
//!
//! A missing value shows the terminal screen and waits for the reboot button.

use agency_board::config::{KEY_API_KEY, KEY_SSID, KEY_WIFI_PASSWORD};
use agency_board::feed::HttpFeed;
use agency_board::hal::esp32::{
    new_panel, Esp32Buzzer, Esp32Clock, Esp32Network, Esp32Panel, Esp32System, GpioButtons,
};
use agency_board::orchestrator::{halt_until_reboot, CONFIG_KO};
use agency_board::traits::{Peripherals, Platform};
use agency_board::{Board, Config, Credentials};
use esp_idf_hal::gpio::{AnyInputPin, Input, InputPin, PinDriver, Pull};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals as Chip;
use esp_idf_hal::prelude::*;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

type ButtonPin = PinDriver<'static, AnyInputPin, Input>;

/// The physical board.
struct Device;

impl Platform for Device {
    type Canvas = Esp32Panel<'static>;
    type Input = GpioButtons<ButtonPin>;
    type Tone = Esp32Buzzer<'static>;
    type Net = Esp32Network;
    type Timer = Esp32Clock;
    type System = Esp32System;
}

fn button(pin: AnyInputPin) -> anyhow::Result<ButtonPin> {
    let mut driver = PinDriver::input(pin)?;
    driver.set_pull(Pull::Up)?;
    Ok(driver)
}

fn credentials() -> Credentials {
    let mut creds = Credentials::default();
    for (key, value) in [
        (KEY_SSID, option_env!("SSID")),
        (KEY_WIFI_PASSWORD, option_env!("WIFI_PASSWORD")),
        (KEY_API_KEY, option_env!("API_KEY")),
    ] {
        if let Some(value) = value {
            creds.insert(key, value);
        }
    }
    creds
}

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    log::info!("agency-board {}", env!("CARGO_PKG_VERSION"));

    let chip = Chip::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // =========================================================================
    // Panel (SSD1306 on GPIO8/9)
    // =========================================================================
    let i2c = I2cDriver::new(
        chip.i2c0,
        chip.pins.gpio8, // SDA
        chip.pins.gpio9, // SCL
        &I2cConfig::new().baudrate(400.kHz().into()),
    )?;
    let canvas = new_panel(i2c).map_err(|e| anyhow::anyhow!("panel init failed: {:?}", e))?;
    log::info!("panel ready");

    // =========================================================================
    // Buttons, in Button::ALL order
    // =========================================================================
    let input = GpioButtons::new([
        button(chip.pins.gpio4.downgrade_input())?,
        button(chip.pins.gpio5.downgrade_input())?,
        button(chip.pins.gpio6.downgrade_input())?,
        button(chip.pins.gpio7.downgrade_input())?,
        button(chip.pins.gpio10.downgrade_input())?,
        button(chip.pins.gpio1.downgrade_input())?,
        button(chip.pins.gpio0.downgrade_input())?,
        button(chip.pins.gpio3.downgrade_input())?,
    ]);

    // =========================================================================
    // Buzzer (LEDC on GPIO2) and network
    // =========================================================================
    let tone = Esp32Buzzer::new(chip.pins.gpio2, chip.ledc.timer0, chip.ledc.channel0)?;
    let net = Esp32Network::new(chip.modem, sysloop, Some(nvs))?;

    let mut periph: Peripherals<Device> = Peripherals::new(
        canvas,
        input,
        tone,
        net,
        Esp32Clock::new(),
        Esp32System::new(),
    );

    let config = match Config::from_credentials(&credentials()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            halt_until_reboot(&mut periph, CONFIG_KO);
            return Ok(());
        }
    };

    let feed = HttpFeed::new(config.api.clone());
    let mut board = Board::new(periph, config, feed);
    board.run();
    Ok(())
}
