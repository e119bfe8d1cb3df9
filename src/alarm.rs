//! Periodic alarm producer for the tick channel.

use crate::config::ClockConfig;
use crate::error::Result;
use crate::hardware::traits::AlarmTimer;
use crate::notify::{NotificationChannel, Tick};

/// Posts one [`Tick`] per alarm and re-arms the timer.
///
/// The next alarm is always `fired + period`, measured from the counter
/// value the alarm was armed at rather than from when the handler ran, so
/// interrupt latency does not add up into drift.
pub struct AlarmSource<'a, T, const N: usize> {
    timer: T,
    ticks: &'a NotificationChannel<Tick, N>,
    first_alarm_us: u64,
    period_us: u64,
}

impl<'a, T: AlarmTimer, const N: usize> AlarmSource<'a, T, N> {
    pub fn new(timer: T, ticks: &'a NotificationChannel<Tick, N>, config: &ClockConfig) -> Self {
        Self {
            timer,
            ticks,
            first_alarm_us: config.first_alarm_us,
            period_us: config.period_us,
        }
    }

    /// Enables the timer, arms the first alarm and starts counting.
    pub fn start(&mut self) -> Result<()> {
        self.timer.enable()?;
        self.timer.set_alarm(self.first_alarm_us);
        self.timer.start()?;
        info!(
            "[Timer] Started, first alarm at {=u64} us, period {=u64} us",
            self.first_alarm_us,
            self.period_us
        );
        Ok(())
    }

    /// Alarm interrupt body.
    ///
    /// Returns `true` when the tick was queued, which wakes the clock
    /// worker if it is waiting; `false` when the queue was full and the
    /// tick was dropped.
    pub fn on_alarm(&mut self, fired: u64) -> bool {
        let woken = self.ticks.post(Tick);
        self.timer.set_alarm(fired + self.period_us);
        woken
    }

    pub async fn step(&mut self) -> bool {
        let fired = self.timer.wait_alarm().await;
        self.on_alarm(fired)
    }

    pub async fn run(mut self) -> ! {
        loop {
            self.step().await;
        }
    }
}
