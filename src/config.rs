//! Board configuration and credential loading.
//!
//! Uses `heapless::String` so the same structs work on the device without
//! heap churn and stay ergonomic on desktop.
//!
//! # Example
//!
//! ```rust
//! use agency_board::config::{Config, Credentials, CarouselConfig};
//!
//! let creds = Credentials::parse("SSID=home\nWIFI_PASSWORD=secret\nAPI_KEY=abc123\n");
//! let config = Config::from_credentials(&creds)
//!     .unwrap()
//!     .with_carousel(CarouselConfig::default().with_dwell_ticks(50));
//!
//! assert_eq!(config.wifi.ssid.as_str(), "home");
//! assert_eq!(config.carousel.dwell_ticks, 50);
//! ```

use crate::error::{BoardError, Result};
use heapless::String as HString;
use heapless::Vec as HVec;

/// Maximum length for short config strings (SSID, hostnames)
pub const MAX_SHORT_STRING: usize = 64;

/// Maximum length for longer config strings (URLs, API keys)
pub const MAX_LONG_STRING: usize = 128;

/// Maximum number of time servers tried in order
pub const MAX_TIME_SERVERS: usize = 4;

/// Maximum number of `KEY=VALUE` entries kept from a credentials file
pub const MAX_CREDENTIALS: usize = 16;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Type alias for longer config strings
pub type LongString = HString<MAX_LONG_STRING>;

/// Credential key holding the Wi-Fi network name.
pub const KEY_SSID: &str = "SSID";
/// Credential key holding the Wi-Fi password.
pub const KEY_WIFI_PASSWORD: &str = "WIFI_PASSWORD";
/// Credential key holding the data feed API key.
pub const KEY_API_KEY: &str = "API_KEY";

// ============================================================================
// Helpers for creating heapless strings
// ============================================================================

fn fitted<const N: usize>(s: &str) -> HString<N> {
    let mut hs = HString::new();
    for c in s.chars() {
        if hs.push(c).is_err() {
            break;
        }
    }
    hs
}

/// Create a ShortString from a &str, truncating on a char boundary if too long
pub fn short_string(s: &str) -> ShortString {
    fitted(s)
}

/// Create a LongString from a &str, truncating on a char boundary if too long
pub fn long_string(s: &str) -> LongString {
    fitted(s)
}

// ============================================================================
// Credentials
// ============================================================================

/// Parsed `KEY=VALUE` credentials file.
///
/// Lines without `=`, with an empty key, or beyond [`MAX_CREDENTIALS`] are
/// skipped. Later duplicates win.
#[derive(Clone, Debug, Default)]
pub struct Credentials {
    entries: HVec<(ShortString, LongString), MAX_CREDENTIALS>,
}

impl Credentials {
    /// Parse credentials text.
    pub fn parse(text: &str) -> Self {
        let mut creds = Self::default();
        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            creds.insert(key, value.trim());
        }
        creds
    }

    /// Insert or replace one entry.
    pub fn insert(&mut self, key: &str, value: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
            entry.1 = long_string(value);
            return;
        }
        if self
            .entries
            .push((short_string(key), long_string(value)))
            .is_err()
        {
            log::warn!("credentials full, dropping key {}", key);
        }
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a value that must be present.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| BoardError::Config(key.into()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was parsed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete board configuration
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Wi-Fi join parameters
    pub wifi: WifiConfig,
    /// Data feed endpoint and credentials
    pub api: ApiConfig,
    /// Time sync and timezone
    pub clock: ClockConfig,
    /// Carousel dwell and tick cadence
    pub carousel: CarouselConfig,
    /// Panel geometry and brightness
    pub display: DisplayConfig,
    /// Beeper defaults
    pub sound: SoundConfig,
    /// Link health policy
    pub health: HealthConfig,
}

impl Config {
    /// Build a config from loaded credentials.
    ///
    /// `SSID`, `WIFI_PASSWORD` and `API_KEY` are all required; the first
    /// missing one is reported as [`BoardError::Config`].
    pub fn from_credentials(creds: &Credentials) -> Result<Self> {
        let ssid = creds.require(KEY_SSID)?;
        let password = creds.require(KEY_WIFI_PASSWORD)?;
        let api_key = creds.require(KEY_API_KEY)?;

        Ok(Self::default()
            .with_wifi(
                WifiConfig::default()
                    .with_ssid(ssid)
                    .with_password(password),
            )
            .with_api(ApiConfig::default().with_api_key(api_key)))
    }

    /// Set Wi-Fi configuration
    pub fn with_wifi(mut self, wifi: WifiConfig) -> Self {
        self.wifi = wifi;
        self
    }

    /// Set data feed configuration
    pub fn with_api(mut self, api: ApiConfig) -> Self {
        self.api = api;
        self
    }

    /// Set clock configuration
    pub fn with_clock(mut self, clock: ClockConfig) -> Self {
        self.clock = clock;
        self
    }

    /// Set carousel configuration
    pub fn with_carousel(mut self, carousel: CarouselConfig) -> Self {
        self.carousel = carousel;
        self
    }

    /// Set display configuration
    pub fn with_display(mut self, display: DisplayConfig) -> Self {
        self.display = display;
        self
    }

    /// Set sound configuration
    pub fn with_sound(mut self, sound: SoundConfig) -> Self {
        self.sound = sound;
        self
    }

    /// Set link health configuration
    pub fn with_health(mut self, health: HealthConfig) -> Self {
        self.health = health;
        self
    }
}

// ============================================================================
// WiFi Config
// ============================================================================

/// Wi-Fi connection configuration
#[derive(Clone, Debug)]
pub struct WifiConfig {
    /// Network SSID
    pub ssid: ShortString,
    /// Network password
    pub password: ShortString,
    /// Join attempts before giving up
    pub max_attempts: u8,
    /// Pause after each join attempt in milliseconds
    pub retry_interval_ms: u32,
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            ssid: ShortString::new(),
            password: ShortString::new(),
            max_attempts: 10,
            retry_interval_ms: 3000,
        }
    }
}

impl WifiConfig {
    /// Set the SSID
    pub fn with_ssid(mut self, ssid: &str) -> Self {
        self.ssid = short_string(ssid);
        self
    }

    /// Set the password
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = short_string(password);
        self
    }

    /// Set the number of join attempts
    pub fn with_max_attempts(mut self, attempts: u8) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set the pause between join attempts
    pub fn with_retry_interval_ms(mut self, ms: u32) -> Self {
        self.retry_interval_ms = ms;
        self
    }

    /// Check if credentials are configured
    pub fn is_configured(&self) -> bool {
        !self.ssid.is_empty()
    }
}

// ============================================================================
// API Config
// ============================================================================

/// Agency data feed configuration
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Value sent in the `x-apikey` header
    pub api_key: LongString,
    /// Endpoint root, without trailing slash
    pub base_url: LongString,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: LongString::new(),
            base_url: long_string("https://api.opt.nc/temps-attente-agences"),
            timeout_ms: 10_000,
        }
    }
}

impl ApiConfig {
    /// Set the API key
    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = long_string(key);
        self
    }

    /// Set the endpoint root
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = long_string(url.trim_end_matches('/'));
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout_ms(mut self, ms: u32) -> Self {
        self.timeout_ms = ms;
        self
    }

    /// Check if a key was loaded
    pub fn has_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// URL of the CSV listing
    pub fn listing_url(&self) -> String {
        format!("{}/csv", self.base_url)
    }

    /// URL of one agency's live wait time
    pub fn agency_url(&self, id: &str) -> String {
        format!("{}/temps-attente/agence/{}", self.base_url, id)
    }
}

// ============================================================================
// Clock Config
// ============================================================================

/// Time sync and timezone configuration
#[derive(Clone, Debug)]
pub struct ClockConfig {
    /// Time servers, tried in order until one answers
    pub servers: HVec<ShortString, MAX_TIME_SERVERS>,
    /// Offset added to UTC before display, in seconds
    pub local_offset_secs: i64,
    /// Unix seconds assumed at boot when no server answers
    pub fallback_epoch_secs: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        let mut servers = HVec::new();
        for s in ["time.windows.com", "ntp1.google.com", "pool.ntp.org"] {
            let _ = servers.push(short_string(s));
        }
        Self {
            servers,
            local_offset_secs: 11 * 3600,
            fallback_epoch_secs: 0,
        }
    }
}

impl ClockConfig {
    /// Replace the server list (extra entries beyond capacity are dropped)
    pub fn with_servers(mut self, servers: &[&str]) -> Self {
        self.servers.clear();
        for s in servers {
            if self.servers.push(short_string(s)).is_err() {
                break;
            }
        }
        self
    }

    /// Set the local offset from UTC
    pub fn with_local_offset_secs(mut self, secs: i64) -> Self {
        self.local_offset_secs = secs;
        self
    }

    /// Set the boot-time fallback epoch
    pub fn with_fallback_epoch_secs(mut self, secs: u64) -> Self {
        self.fallback_epoch_secs = secs;
        self
    }
}

// ============================================================================
// Carousel Config
// ============================================================================

/// Carousel cadence configuration
#[derive(Clone, Debug)]
pub struct CarouselConfig {
    /// Animation ticks each agency stays on screen
    pub dwell_ticks: u32,
    /// Target tick period in milliseconds
    pub tick_ms: u32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            dwell_ticks: 100,
            tick_ms: 100,
        }
    }
}

impl CarouselConfig {
    /// Set the dwell length in ticks
    pub fn with_dwell_ticks(mut self, ticks: u32) -> Self {
        self.dwell_ticks = ticks.max(1);
        self
    }

    /// Set the tick period
    pub fn with_tick_ms(mut self, ms: u32) -> Self {
        self.tick_ms = ms;
        self
    }
}

// ============================================================================
// Display Config
// ============================================================================

/// Panel configuration
#[derive(Clone, Debug)]
pub struct DisplayConfig {
    /// Initial brightness (0.0 to 1.0)
    pub brightness: f32,
    /// QR screen module rows, `#` for a dark module
    pub qr_rows: HVec<ShortString, 32>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            brightness: 0.5,
            qr_rows: HVec::new(),
        }
    }
}

impl DisplayConfig {
    /// Set the initial brightness
    pub fn with_brightness(mut self, level: f32) -> Self {
        self.brightness = level.clamp(0.0, 1.0);
        self
    }

    /// Set the QR module rows
    pub fn with_qr_rows(mut self, rows: &[&str]) -> Self {
        self.qr_rows.clear();
        for r in rows {
            if self.qr_rows.push(short_string(r)).is_err() {
                break;
            }
        }
        self
    }
}

// ============================================================================
// Sound Config
// ============================================================================

/// Beeper configuration
#[derive(Clone, Debug)]
pub struct SoundConfig {
    /// Whether beeps are on at boot
    pub enabled: bool,
    /// Initial beep frequency in Hz
    pub volume_hz: u32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume_hz: 500,
        }
    }
}

impl SoundConfig {
    /// Enable or disable beeps at boot
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the initial beep frequency
    pub fn with_volume_hz(mut self, hz: u32) -> Self {
        self.volume_hz = hz;
        self
    }
}

// ============================================================================
// Health Config
// ============================================================================

/// Link health policy
#[derive(Clone, Debug)]
pub struct HealthConfig {
    /// Consecutive failed link observations that end normal operation
    pub failure_threshold: u32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 10,
        }
    }
}

impl HealthConfig {
    /// Set the failure threshold
    pub fn with_failure_threshold(mut self, n: u32) -> Self {
        self.failure_threshold = n.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Credentials Tests
    // =========================================================================

    #[test]
    fn credentials_parse_trims_and_skips() {
        let creds = Credentials::parse(
            "SSID = home net \n\nnot a pair\n=orphan\nWIFI_PASSWORD=p=w\nAPI_KEY=k\n",
        );
        assert_eq!(creds.get("SSID"), Some("home net"));
        assert_eq!(creds.get("WIFI_PASSWORD"), Some("p=w"));
        assert_eq!(creds.get("API_KEY"), Some("k"));
        assert_eq!(creds.len(), 3);
    }

    #[test]
    fn credentials_later_duplicate_wins() {
        let creds = Credentials::parse("SSID=a\nSSID=b\n");
        assert_eq!(creds.get("SSID"), Some("b"));
        assert_eq!(creds.len(), 1);
    }

    #[test]
    fn config_requires_every_key() {
        let creds = Credentials::parse("SSID=a\nWIFI_PASSWORD=b\n");
        let err = Config::from_credentials(&creds).unwrap_err();
        assert_eq!(err, BoardError::Config("API_KEY".into()));

        let creds = Credentials::parse("API_KEY=k\n");
        let err = Config::from_credentials(&creds).unwrap_err();
        assert_eq!(err, BoardError::Config("SSID".into()));
    }

    #[test]
    fn config_from_full_credentials() {
        let creds = Credentials::parse("SSID=a\nWIFI_PASSWORD=b\nAPI_KEY=k\n");
        let config = Config::from_credentials(&creds).unwrap();
        assert_eq!(config.wifi.ssid.as_str(), "a");
        assert_eq!(config.wifi.password.as_str(), "b");
        assert!(config.api.has_key());
    }

    // =========================================================================
    // Sub-config Tests
    // =========================================================================

    #[test]
    fn defaults_match_device() {
        let config = Config::default();
        assert_eq!(config.wifi.max_attempts, 10);
        assert_eq!(config.wifi.retry_interval_ms, 3000);
        assert_eq!(config.clock.servers.len(), 3);
        assert_eq!(config.clock.servers[0].as_str(), "time.windows.com");
        assert_eq!(config.clock.local_offset_secs, 39_600);
        assert_eq!(config.carousel.dwell_ticks, 100);
        assert_eq!(config.carousel.tick_ms, 100);
        assert_eq!(config.health.failure_threshold, 10);
        assert_eq!(config.sound.volume_hz, 500);
    }

    #[test]
    fn api_urls() {
        let api = ApiConfig::default().with_base_url("http://feed.local/");
        assert_eq!(api.listing_url(), "http://feed.local/csv");
        assert_eq!(api.agency_url("7"), "http://feed.local/temps-attente/agence/7");
    }

    #[test]
    fn clock_servers_capped() {
        let clock = ClockConfig::default().with_servers(&["a", "b", "c", "d", "e"]);
        assert_eq!(clock.servers.len(), MAX_TIME_SERVERS);
    }

    #[test]
    fn brightness_clamped() {
        assert_eq!(DisplayConfig::default().with_brightness(3.0).brightness, 1.0);
        assert_eq!(DisplayConfig::default().with_brightness(-1.0).brightness, 0.0);
    }

    // =========================================================================
    // String Helper Tests
    // =========================================================================

    #[test]
    fn long_string_truncation() {
        let long_input = "b".repeat(200);
        let s = long_string(&long_input);
        assert_eq!(s.len(), MAX_LONG_STRING);
    }

    #[test]
    fn string_helpers_utf8_boundary() {
        let input = "é".repeat(40); // 80 bytes
        let s = short_string(&input);
        assert!(s.len() <= MAX_SHORT_STRING);
        assert_eq!(s.chars().count(), 32);
    }
}
