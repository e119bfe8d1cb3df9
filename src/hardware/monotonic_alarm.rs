use embassy_time::{Duration, Instant, Timer};

use super::traits::AlarmTimer;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Enabled,
    Running { origin: Instant },
}

/// Alarm timer on the embassy time driver.
///
/// The driver is a hardware timer (`time-driver-any`) whose compare channel
/// fires the wakeup, so awaiting `Timer::at` is the alarm interrupt. The
/// counter reads microseconds since [`start`](AlarmTimer::start).
pub struct MonotonicAlarm {
    state: State,
    alarm: Option<u64>,
}

impl MonotonicAlarm {
    pub const fn new() -> Self {
        Self {
            state: State::Idle,
            alarm: None,
        }
    }

    /// Current counter value, or zero before `start`.
    pub fn count(&self) -> u64 {
        match self.state {
            State::Running { origin } => origin.elapsed().as_micros(),
            _ => 0,
        }
    }
}

impl Default for MonotonicAlarm {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmTimer for MonotonicAlarm {
    fn enable(&mut self) -> Result<()> {
        match self.state {
            State::Idle => {
                self.state = State::Enabled;
                Ok(())
            }
            _ => Err(Error::TimerAlreadyEnabled),
        }
    }

    fn start(&mut self) -> Result<()> {
        match self.state {
            State::Idle => Err(Error::TimerNotEnabled),
            State::Running { .. } => Err(Error::TimerAlreadyRunning),
            State::Enabled if self.alarm.is_none() => Err(Error::AlarmNotArmed),
            State::Enabled => {
                self.state = State::Running {
                    origin: Instant::now(),
                };
                Ok(())
            }
        }
    }

    fn set_alarm(&mut self, count: u64) {
        self.alarm = Some(count);
    }

    async fn wait_alarm(&mut self) -> u64 {
        let (State::Running { origin }, Some(count)) = (self.state, self.alarm) else {
            // Not started: nothing will ever fire.
            return core::future::pending().await;
        };
        Timer::at(origin + Duration::from_micros(count)).await;
        count
    }
}
