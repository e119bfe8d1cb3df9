//! Software clock advanced by alarm ticks.

use core::fmt::{self, Write};

use chrono::{NaiveTime, Timelike};
use embassy_time::{Duration, TimeoutError, with_timeout};
use heapless::String;

use crate::notify::{NotificationChannel, Tick};

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// Time of day with one-second resolution.
///
/// Every field is always within range: hours 0-23, minutes and seconds
/// 0-59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockTime {
    hours: u8,
    minutes: u8,
    seconds: u8,
}

impl ClockTime {
    pub const MIDNIGHT: Self = Self {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Returns `None` if any field is out of range.
    pub const fn new(hours: u8, minutes: u8, seconds: u8) -> Option<Self> {
        if hours < 24 && minutes < 60 && seconds < 60 {
            Some(Self {
                hours,
                minutes,
                seconds,
            })
        } else {
            None
        }
    }

    pub const fn hours(&self) -> u8 {
        self.hours
    }

    pub const fn minutes(&self) -> u8 {
        self.minutes
    }

    pub const fn seconds(&self) -> u8 {
        self.seconds
    }

    /// Seconds elapsed since midnight.
    pub const fn seconds_of_day(&self) -> u32 {
        self.hours as u32 * 3600 + self.minutes as u32 * 60 + self.seconds as u32
    }

    /// Advances by one second, carrying into minutes and hours and wrapping
    /// from 23:59:59 to 00:00:00.
    pub fn advance(&mut self) {
        self.seconds += 1;
        if self.seconds < 60 {
            return;
        }
        self.seconds = 0;
        self.minutes += 1;
        if self.minutes < 60 {
            return;
        }
        self.minutes = 0;
        self.hours += 1;
        if self.hours >= 24 {
            self.hours = 0;
        }
    }

    /// The time `secs` seconds later, modulo one day.
    pub const fn advanced_by(self, secs: u32) -> Self {
        let total = (self.seconds_of_day() + secs % SECONDS_PER_DAY) % SECONDS_PER_DAY;
        Self {
            hours: (total / 3600) as u8,
            minutes: (total / 60 % 60) as u8,
            seconds: (total % 60) as u8,
        }
    }

    /// `HH:MM:SS`.
    pub fn format(&self) -> String<8> {
        let mut buf = String::new();
        // Eight ASCII bytes always fit.
        let _ = write!(buf, "{}", self);
        buf
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

impl From<NaiveTime> for ClockTime {
    /// Drops sub-second precision; a leap second reads as `:59`.
    fn from(time: NaiveTime) -> Self {
        Self {
            hours: time.hour() as u8,
            minutes: time.minute() as u8,
            seconds: time.second().min(59) as u8,
        }
    }
}

impl From<ClockTime> for NaiveTime {
    fn from(time: ClockTime) -> Self {
        NaiveTime::from_num_seconds_from_midnight_opt(time.seconds_of_day(), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

/// Where the clock worker waits for its ticks.
#[allow(async_fn_in_trait)]
pub trait TickSource {
    /// Resolves with the next tick, or with [`TimeoutError`] when none
    /// arrives within `timeout`.
    async fn next_tick(&mut self, timeout: Duration) -> Result<Tick, TimeoutError>;
}

impl<const N: usize> TickSource for &NotificationChannel<Tick, N> {
    async fn next_tick(&mut self, timeout: Duration) -> Result<Tick, TimeoutError> {
        with_timeout(timeout, self.receive()).await
    }
}

/// Outcome of one clock worker iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockEvent {
    /// A tick arrived; the clock now reads this value.
    Advanced(ClockTime),
    /// No tick within the timeout; the clock was left alone.
    MissedTick,
}

/// Owns the clock state and advances it once per received tick.
///
/// A timeout is reported and nothing else: the clock is not advanced to
/// guess the time that passed, so drift from lost ticks accumulates.
pub struct ClockWorker<S> {
    source: S,
    time: ClockTime,
    timeout: Duration,
}

impl<S: TickSource> ClockWorker<S> {
    pub fn new(source: S, start: ClockTime, timeout: Duration) -> Self {
        Self {
            source,
            time: start,
            timeout,
        }
    }

    pub fn time(&self) -> ClockTime {
        self.time
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn step(&mut self) -> ClockEvent {
        match self.source.next_tick(self.timeout).await {
            Ok(Tick) => {
                self.time.advance();
                info!("[Timer] Clock: {=str}", self.time.format().as_str());
                ClockEvent::Advanced(self.time)
            }
            Err(TimeoutError) => {
                warn!(
                    "[Timer] Missed one count event (no tick in {=u64} ms)",
                    self.timeout.as_millis()
                );
                ClockEvent::MissedTick
            }
        }
    }

    pub async fn run(mut self) -> ! {
        loop {
            self.step().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use chrono::TimeDelta;
    use embassy_futures::block_on;

    use super::*;

    fn at(h: u8, m: u8, s: u8) -> ClockTime {
        ClockTime::new(h, m, s).unwrap()
    }

    /// Ticks scheduled on a virtual millisecond timeline.
    struct VirtualTicks {
        now_ms: u64,
        arrivals: VecDeque<u64>,
    }

    impl VirtualTicks {
        fn new(arrivals: impl IntoIterator<Item = u64>) -> Self {
            Self {
                now_ms: 0,
                arrivals: arrivals.into_iter().collect(),
            }
        }
    }

    impl TickSource for VirtualTicks {
        async fn next_tick(&mut self, timeout: Duration) -> Result<Tick, TimeoutError> {
            let deadline = self.now_ms + timeout.as_millis();
            match self.arrivals.front().copied() {
                Some(t) if t <= deadline => {
                    self.arrivals.pop_front();
                    self.now_ms = self.now_ms.max(t);
                    Ok(Tick)
                }
                _ => {
                    self.now_ms = deadline;
                    Err(TimeoutError)
                }
            }
        }
    }

    /// Steps the worker and keeps every event that completed by `horizon_ms`.
    fn run_until(worker: &mut ClockWorker<VirtualTicks>, horizon_ms: u64) -> Vec<ClockEvent> {
        let mut events = Vec::new();
        loop {
            let event = block_on(worker.step());
            if worker.source().now_ms > horizon_ms {
                return events;
            }
            events.push(event);
        }
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert!(ClockTime::new(24, 0, 0).is_none());
        assert!(ClockTime::new(0, 60, 0).is_none());
        assert!(ClockTime::new(0, 0, 60).is_none());
        assert!(ClockTime::new(23, 59, 59).is_some());
    }

    #[test]
    fn sixty_one_ticks_from_midnight() {
        let mut time = ClockTime::MIDNIGHT;
        for _ in 0..61 {
            time.advance();
        }
        assert_eq!(time, at(0, 1, 1));
    }

    #[test]
    fn wraps_at_end_of_day() {
        let mut time = at(23, 59, 59);
        time.advance();
        assert_eq!(time, ClockTime::MIDNIGHT);
    }

    #[test]
    fn minute_carries_once_per_sixty_ticks() {
        let mut time = ClockTime::MIDNIGHT;
        let mut carries = 0;
        for _ in 0..600 {
            let before = time.minutes();
            time.advance();
            if time.minutes() != before {
                carries += 1;
                assert_eq!(time.seconds(), 0);
            }
        }
        assert_eq!(carries, 10);
    }

    #[test]
    fn hour_carries_once_per_3600_ticks() {
        let mut time = at(22, 0, 0);
        let mut carries = 0;
        for _ in 0..2 * 3600 {
            let before = time.hours();
            time.advance();
            if time.hours() != before {
                carries += 1;
            }
        }
        assert_eq!(carries, 2);
        assert_eq!(time, ClockTime::MIDNIGHT);
    }

    #[test]
    fn stepwise_advance_matches_chrono() {
        let starts = [at(0, 0, 0), at(12, 34, 56), at(23, 58, 30), at(7, 59, 59)];
        for start in starts {
            let mut time = start;
            for n in 1..=5000u32 {
                time.advance();
                let expected: ClockTime = NaiveTime::from(start)
                    .overflowing_add_signed(TimeDelta::seconds(n as i64))
                    .0
                    .into();
                assert_eq!(time, expected, "{start} + {n}s");
                assert_eq!(start.advanced_by(n), expected);
            }
        }
    }

    #[test]
    fn advanced_by_whole_days_is_identity() {
        let time = at(5, 6, 7);
        assert_eq!(time.advanced_by(SECONDS_PER_DAY), time);
        assert_eq!(time.advanced_by(3 * SECONDS_PER_DAY + 1), at(5, 6, 8));
    }

    #[test]
    fn formats_with_leading_zeros() {
        assert_eq!(at(7, 5, 9).format().as_str(), "07:05:09");
        assert_eq!(at(23, 59, 0).format().as_str(), "23:59:00");
    }

    #[test]
    fn converts_from_naive_time() {
        let naive = NaiveTime::from_hms_opt(18, 0, 30).unwrap();
        assert_eq!(ClockTime::from(naive), at(18, 0, 30));
    }

    #[test]
    fn worker_advances_once_per_tick() {
        let ticks = VirtualTicks::new((1..=61).map(|n| n * 1000));
        let mut worker = ClockWorker::new(ticks, ClockTime::MIDNIGHT, Duration::from_secs(2));

        let events = run_until(&mut worker, 61_000);
        assert_eq!(events.len(), 61);
        assert!(events.iter().all(|e| matches!(e, ClockEvent::Advanced(_))));
        assert_eq!(worker.time(), at(0, 1, 1));
    }

    #[test]
    fn three_silent_seconds_report_one_miss() {
        let mut worker = ClockWorker::new(
            VirtualTicks::new([]),
            at(10, 0, 0),
            Duration::from_secs(2),
        );

        let events = run_until(&mut worker, 3000);
        assert_eq!(events, [ClockEvent::MissedTick]);
        assert_eq!(worker.time(), at(10, 0, 0));
    }

    #[test]
    fn miss_does_not_catch_up() {
        // Ticks at 1 s and 2 s, then a 4 s gap, then one more.
        let ticks = VirtualTicks::new([1000, 2000, 6000]);
        let mut worker = ClockWorker::new(ticks, ClockTime::MIDNIGHT, Duration::from_secs(2));

        let events = run_until(&mut worker, 6000);
        let misses = events
            .iter()
            .filter(|e| **e == ClockEvent::MissedTick)
            .count();
        assert_eq!(misses, 1);
        assert_eq!(worker.time(), at(0, 0, 3));
    }

    #[test]
    fn channel_source_times_out_on_the_driver_clock() {
        use core::future::Future;
        use core::pin::pin;
        use core::task::{Context, Poll, Waker};

        use embassy_time::MockDriver;

        use crate::notify::TickChannel;

        let _time = crate::mock_time_lock();
        let driver = MockDriver::get();
        let ticks: TickChannel = NotificationChannel::new();
        let mut worker = ClockWorker::new(&ticks, ClockTime::MIDNIGHT, Duration::from_secs(2));

        ticks.post(Tick);
        assert_eq!(block_on(worker.step()), ClockEvent::Advanced(at(0, 0, 1)));

        let mut cx = Context::from_waker(Waker::noop());
        let mut misses = 0;

        // Three seconds with no tick: one miss at 2 s, nothing in the third.
        {
            let mut step = pin!(worker.step());
            assert!(step.as_mut().poll(&mut cx).is_pending());
            driver.advance(Duration::from_millis(1999));
            assert!(step.as_mut().poll(&mut cx).is_pending());
            driver.advance(Duration::from_millis(1));
            if step.as_mut().poll(&mut cx) == Poll::Ready(ClockEvent::MissedTick) {
                misses += 1;
            }
        }
        {
            let mut step = pin!(worker.step());
            assert!(step.as_mut().poll(&mut cx).is_pending());
            driver.advance(Duration::from_millis(1000));
            assert!(step.as_mut().poll(&mut cx).is_pending());

            // A late tick is still picked up by the pending wait.
            ticks.post(Tick);
            assert_eq!(
                step.as_mut().poll(&mut cx),
                Poll::Ready(ClockEvent::Advanced(at(0, 0, 2)))
            );
        }

        assert_eq!(misses, 1);
        assert_eq!(worker.time(), at(0, 0, 2));
        assert_eq!(ticks.dropped(), 0);
    }
}
