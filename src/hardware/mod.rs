//! Drivers behind the traits the workers are written against.

pub mod gpio_led;
pub mod monotonic_alarm;
pub mod traits;

#[cfg(feature = "async")]
pub mod gpio_button;
