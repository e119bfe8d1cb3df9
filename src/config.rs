//! Board wiring and timing constants.

use chrono::NaiveTime;
use embassy_time::Duration;

use crate::clock::ClockTime;
use crate::error::{Error, Result};
use crate::notify::PinId;

/// Slots in each notification channel.
pub const QUEUE_CAPACITY: usize = 10;

/// PB12: turns the LED on.
pub const BUTTON_ON: PinId = 12;
/// PB13: turns the LED off.
pub const BUTTON_OFF: PinId = 13;
/// PB14: toggles the LED.
pub const BUTTON_TOGGLE: PinId = 14;

/// Counter value of the first alarm after the timer starts (µs).
pub const FIRST_ALARM_US: u64 = 100_000;
/// Distance between consecutive alarms (µs).
pub const ALARM_PERIOD_US: u64 = 1_000_000;
/// How long the clock worker waits for a tick before reporting a miss.
pub const TICK_TIMEOUT: Duration = Duration::from_secs(2);
/// Clock reading at power-up.
pub const START_TIME: NaiveTime = NaiveTime::MIN;

/// Seconds counted down in the log before the workers start.
pub const STARTUP_COUNTDOWN_SECS: u32 = 10;
/// Interval of the idle heartbeat line.
pub const HEARTBEAT: Duration = Duration::from_secs(10);

/// Timing of the alarm source and the clock worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockConfig {
    pub first_alarm_us: u64,
    pub period_us: u64,
    pub tick_timeout: Duration,
    /// Clock value before the first tick.
    pub start: ClockTime,
}

impl ClockConfig {
    pub fn validate(&self) -> Result<()> {
        if self.period_us == 0 {
            return Err(Error::ZeroPeriod);
        }
        if self.tick_timeout.as_micros() <= self.period_us {
            return Err(Error::TimeoutTooShort);
        }
        Ok(())
    }

    /// Same timing, clock starting at `start` (seconds precision).
    pub fn starting_at(self, start: NaiveTime) -> Self {
        Self {
            start: start.into(),
            ..self
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            first_alarm_us: FIRST_ALARM_US,
            period_us: ALARM_PERIOD_US,
            tick_timeout: TICK_TIMEOUT,
            start: START_TIME.into(),
        }
    }
}
