//! Passive piezo buzzer on an LEDC channel.

use crate::traits::ToneOutput;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::ledc::{config::TimerConfig, LedcDriver, LedcTimer, LedcTimerDriver, Resolution, SpeedMode};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::prelude::*;
use esp_idf_hal::sys::{esp, ledc_mode_t, ledc_timer_t, EspError};

/// Square-wave beeper.
///
/// The LEDC timer is retuned for each tone and the channel runs at 50 %
/// duty for the tone's duration, then goes silent.
pub struct Esp32Buzzer<'d> {
    channel: LedcDriver<'d>,
    speed_mode: ledc_mode_t,
    timer: ledc_timer_t,
}

impl<'d> Esp32Buzzer<'d> {
    /// Starting frequency of the timer.
    const IDLE_FREQ_HZ: u32 = 1_000;

    /// 10-bit duty resolution
    const RESOLUTION: Resolution = Resolution::Bits10;

    /// Creates the buzzer on `pin`, driven by LEDC `timer` and `channel`.
    ///
    /// # Errors
    ///
    /// Returns an error if PWM initialization fails.
    pub fn new<T, TI, C, CI, PP, PPI>(
        pin: PP,
        timer: T,
        channel: C,
    ) -> Result<Self, EspError>
    where
        TI: LedcTimer + 'd,
        T: Peripheral<P = TI> + 'd,
        CI: esp_idf_hal::ledc::LedcChannel<SpeedMode = TI::SpeedMode> + 'd,
        C: Peripheral<P = CI> + 'd,
        PPI: esp_idf_hal::gpio::OutputPin + 'd,
        PP: Peripheral<P = PPI> + 'd,
    {
        let timer_config = TimerConfig::default()
            .frequency(Self::IDLE_FREQ_HZ.Hz())
            .resolution(Self::RESOLUTION);
        let timer_driver = LedcTimerDriver::new(timer, &timer_config)?;
        let mut channel = LedcDriver::new(channel, timer_driver, pin)?;
        channel.set_duty(0)?;

        Ok(Self {
            channel,
            speed_mode: <TI::SpeedMode as SpeedMode>::SPEED_MODE,
            timer: TI::timer(),
        })
    }
}

impl ToneOutput for Esp32Buzzer<'_> {
    type Error = EspError;

    fn play_tone(&mut self, frequency_hz: u32, duration_ms: u32) -> Result<(), EspError> {
        // Safe: retunes a timer this driver owns; the channel keeps its binding
        esp!(unsafe { esp_idf_hal::sys::ledc_set_freq(self.speed_mode, self.timer, frequency_hz) })?;
        let half = self.channel.get_max_duty() / 2;
        self.channel.set_duty(half)?;
        FreeRtos::delay_ms(duration_ms);
        self.channel.set_duty(0)
    }
}
