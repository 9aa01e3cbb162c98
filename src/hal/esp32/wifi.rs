//! Wi-Fi, SNTP and HTTPS client for ESP32.
//!
//! Provides the board's [`Connectivity`] on top of esp-idf-svc: station-mode
//! joins, link probing, one-server SNTP sync and blocking GET requests.
//!
//! # Example
//!
//! ```ignore
//! use agency_board::hal::esp32::Esp32Network;
//!
//! let net = Esp32Network::new(peripherals.modem, sysloop, Some(nvs))?;
//! // joins happen later, through Connectivity::connect
//! ```

use crate::traits::{Connectivity, FetchFailure, FetchRequest};
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::modem::Modem;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::http::client::{Configuration as HttpConfiguration, EspHttpConnection};
use esp_idf_svc::http::Method;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::sntp::{EspSntp, SntpConf, SyncStatus};
use esp_idf_svc::sys::EspError;
use esp_idf_svc::wifi::{BlockingWifi, ClientConfiguration, Configuration, EspWifi};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// How long one SNTP server gets to answer.
const SNTP_TIMEOUT_MS: u32 = 5_000;

/// SNTP status poll interval.
const SNTP_POLL_MS: u32 = 100;

/// Body read chunk.
const READ_CHUNK: usize = 512;

/// Marker for an established station link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Esp32Link;

/// Network stack for ESP32.
///
/// The driver is started once; each [`connect`](Connectivity::connect) call
/// reconfigures credentials and makes a single join attempt.
pub struct Esp32Network {
    wifi: BlockingWifi<EspWifi<'static>>,
}

impl Esp32Network {
    /// Initializes the Wi-Fi driver in station mode without joining.
    ///
    /// # Errors
    ///
    /// Returns an error if driver initialization fails.
    pub fn new(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
    ) -> Result<Self, EspError> {
        let esp_wifi = EspWifi::new(modem, sysloop.clone(), nvs)?;
        let wifi = BlockingWifi::wrap(esp_wifi, sysloop)?;
        Ok(Self { wifi })
    }

    fn join(&mut self, ssid: &str, password: &str) -> Result<(), String> {
        let mut ssid_buf: heapless::String<32> = heapless::String::new();
        ssid_buf
            .push_str(ssid)
            .map_err(|_| format!("SSID too long: {}", ssid))?;

        let mut pass_buf: heapless::String<64> = heapless::String::new();
        pass_buf
            .push_str(password)
            .map_err(|_| "password too long".to_string())?;

        self.wifi
            .set_configuration(&Configuration::Client(ClientConfiguration {
                ssid: ssid_buf,
                password: pass_buf,
                ..Default::default()
            }))
            .map_err(|e| e.to_string())?;

        if !self.wifi.is_started().unwrap_or(false) {
            self.wifi.start().map_err(|e| e.to_string())?;
        }
        self.wifi.connect().map_err(|e| e.to_string())?;
        self.wifi.wait_netif_up().map_err(|e| e.to_string())?;

        if let Ok(info) = self.wifi.wifi().sta_netif().get_ip_info() {
            log::info!("wifi: address {}", info.ip);
        }
        Ok(())
    }

    fn get(request: &FetchRequest<'_>) -> Result<Vec<u8>, FetchFailure> {
        let mut conn = EspHttpConnection::new(&HttpConfiguration {
            timeout: Some(Duration::from_millis(request.timeout_ms as u64)),
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            ..Default::default()
        })
        .map_err(fetch_failure)?;
        conn.initiate_request(Method::Get, request.url, request.headers)
            .map_err(fetch_failure)?;
        conn.initiate_response().map_err(fetch_failure)?;

        let status = conn.status();
        if status != 200 {
            return Err(FetchFailure::Status(status));
        }

        let mut body = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            let n = conn.read(&mut chunk).map_err(fetch_failure)?;
            if n == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..n]);
        }
        Ok(body)
    }
}

fn fetch_failure(e: EspError) -> FetchFailure {
    if e.code() == esp_idf_svc::sys::ESP_ERR_TIMEOUT as i32 {
        FetchFailure::Timeout
    } else {
        FetchFailure::Transport(e.to_string())
    }
}

impl Connectivity for Esp32Network {
    type Link = Esp32Link;
    type Error = String;

    fn connect(&mut self, ssid: &str, password: &str) -> Result<Esp32Link, String> {
        self.join(ssid, password).map(|()| Esp32Link)
    }

    fn is_linked(&self, _link: &Esp32Link) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }

    fn sync_clock(&mut self, server: &str) -> Result<u64, String> {
        let mut conf = SntpConf::default();
        conf.servers[0] = server;
        let sntp = EspSntp::new(&conf).map_err(|e| e.to_string())?;

        let mut waited = 0;
        while sntp.get_sync_status() != SyncStatus::Completed {
            if waited >= SNTP_TIMEOUT_MS {
                return Err(format!("no answer within {} ms", SNTP_TIMEOUT_MS));
            }
            FreeRtos::delay_ms(SNTP_POLL_MS);
            waited += SNTP_POLL_MS;
        }

        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .map_err(|e| e.to_string())
    }

    fn http_get(&mut self, request: &FetchRequest<'_>) -> Result<Vec<u8>, FetchFailure> {
        Self::get(request)
    }
}
