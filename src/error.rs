use core::fmt;

/// Startup and configuration failures.
///
/// None of these can happen once the workers are running; they are all
/// raised while the timer and the clock are being set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Alarm period of zero microseconds.
    ZeroPeriod,
    /// Tick timeout not longer than the alarm period.
    TimeoutTooShort,
    /// `enable` called on a timer that is already enabled.
    TimerAlreadyEnabled,
    /// `start` called before `enable`.
    TimerNotEnabled,
    /// `start` called on a running timer.
    TimerAlreadyRunning,
    /// `start` called with no alarm armed.
    AlarmNotArmed,
}

pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::ZeroPeriod => "alarm period must be non-zero",
            Error::TimeoutTooShort => "tick timeout must exceed the alarm period",
            Error::TimerAlreadyEnabled => "timer already enabled",
            Error::TimerNotEnabled => "timer not enabled",
            Error::TimerAlreadyRunning => "timer already running",
            Error::AlarmNotArmed => "no alarm armed",
        };
        f.write_str(msg)
    }
}
