//! User-adjustable output settings: brightness, beep pitch, mute.

use crate::buttons::ButtonEvents;
use crate::config::{DisplayConfig, SoundConfig};
use crate::model::Mood;
use crate::traits::{Button, ToneOutput};

/// Brightness change per tick while a brightness button is held.
pub const BRIGHTNESS_STEP: f32 = 0.01;

/// Pitch change per tick while a volume button is held.
pub const VOLUME_STEP_HZ: u32 = 10;

/// Lowest beep pitch.
pub const MIN_VOLUME_HZ: u32 = 10;

/// Highest beep pitch.
pub const MAX_VOLUME_HZ: u32 = 20_000;

/// Length of every beep.
pub const BEEP_MS: u32 = 300;

/// Played when sound is switched on.
pub const SOUND_ON_HZ: u32 = 500;

/// Played when sound is switched off, before muting.
pub const SOUND_OFF_HZ: u32 = 400;

/// Played on a negative link observation.
pub const LINK_DOWN_HZ: u32 = 1_000;

/// Live output settings.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Panel brightness, `0.0..=1.0`.
    pub brightness: f32,
    /// Pitch of alert beeps.
    pub volume_hz: u32,
    /// Beeps are silent when false.
    pub sound_enabled: bool,
}

impl Settings {
    /// Starting values from configuration.
    pub fn new(display: &DisplayConfig, sound: &SoundConfig) -> Self {
        Self {
            brightness: display.brightness.clamp(0.0, 1.0),
            volume_hz: sound.volume_hz.clamp(MIN_VOLUME_HZ, MAX_VOLUME_HZ),
            sound_enabled: sound.enabled,
        }
    }

    /// Applies held brightness and volume buttons.
    ///
    /// Returns true if brightness changed and must be pushed to the panel.
    pub fn adjust(&mut self, events: &ButtonEvents) -> bool {
        let before = self.brightness;
        if events.held(Button::BrightnessUp) {
            self.brightness = (self.brightness + BRIGHTNESS_STEP).min(1.0);
        }
        if events.held(Button::BrightnessDown) {
            self.brightness = (self.brightness - BRIGHTNESS_STEP).max(0.0);
        }
        if events.held(Button::VolumeUp) {
            self.volume_hz = (self.volume_hz + VOLUME_STEP_HZ).min(MAX_VOLUME_HZ);
        }
        if events.held(Button::VolumeDown) {
            self.volume_hz = self
                .volume_hz
                .saturating_sub(VOLUME_STEP_HZ)
                .max(MIN_VOLUME_HZ);
        }
        self.brightness != before
    }

    /// Flips mute, beeping while sound is still on. Returns the new state.
    pub fn toggle_sound<T: ToneOutput>(&mut self, tone: &mut T) -> bool {
        if self.sound_enabled {
            self.beep(tone, SOUND_OFF_HZ);
            self.sound_enabled = false;
        } else {
            self.sound_enabled = true;
            self.beep(tone, SOUND_ON_HZ);
        }
        log::info!(
            "sound {}",
            if self.sound_enabled { "on" } else { "off" }
        );
        self.sound_enabled
    }

    /// One beep at `frequency_hz`, unless muted.
    pub fn beep<T: ToneOutput>(&self, tone: &mut T, frequency_hz: u32) {
        if !self.sound_enabled {
            return;
        }
        if let Err(e) = tone.play_tone(frequency_hz, BEEP_MS) {
            log::warn!("tone {} Hz failed: {:?}", frequency_hz, e);
        }
    }

    /// One beep at the current volume pitch.
    pub fn confirm<T: ToneOutput>(&self, tone: &mut T) {
        self.beep(tone, self.volume_hz);
    }

    /// Alert beeps for a mood.
    pub fn announce<T: ToneOutput>(&self, tone: &mut T, mood: Mood) {
        for _ in 0..mood.beep_count() {
            self.confirm(tone);
        }
    }
}
