//! Interrupt-to-task event hand-off for a three-button, one-LED board with
//! an alarm-driven software clock.
//!
//! Producers (edge detectors, the timer alarm) run in interrupt context and
//! only ever post to a bounded [`notify::NotificationChannel`]. Workers
//! (button dispatch, clock accumulator) block on that channel and do the
//! logging and pin writes.
//!
//! The library is `no_std`; the board bring-up in [`board`] and the
//! binaries need the `firmware` feature.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod alarm;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod edge;
pub mod error;
pub mod hardware;
pub mod notify;

#[cfg(feature = "firmware")]
pub mod board;

pub use error::{Error, Result};

/// Held by tests that advance the shared mock time driver.
#[cfg(test)]
pub(crate) fn mock_time_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
