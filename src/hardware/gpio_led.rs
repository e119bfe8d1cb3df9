use embedded_hal::digital::OutputPin;

use super::traits::Led;

/// Pin level that lights the LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    ActiveHigh,
    /// Blue Pill PC13: the LED sinks into the pin.
    ActiveLow,
}

pub struct GpioLed<P> {
    pin: P,
    polarity: Polarity,
    lit: bool,
}

impl<P: OutputPin> GpioLed<P> {
    /// Drives the pin to the "off" level.
    pub fn new(pin: P, polarity: Polarity) -> Self {
        let mut led = Self {
            pin,
            polarity,
            lit: false,
        };
        led.write(false);
        led
    }

    fn write(&mut self, on: bool) {
        let high = match self.polarity {
            Polarity::ActiveHigh => on,
            Polarity::ActiveLow => !on,
        };
        // Board GPIO writes are infallible.
        if high {
            self.pin.set_high().ok();
        } else {
            self.pin.set_low().ok();
        }
    }
}

impl<P: OutputPin> Led for GpioLed<P> {
    fn set(&mut self, on: bool) {
        self.write(on);
        self.lit = on;
    }

    fn is_on(&self) -> bool {
        self.lit
    }
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use embedded_hal::digital::ErrorType;

    use super::*;

    #[derive(Default)]
    struct RecordingPin {
        levels: Vec<bool>,
    }

    impl ErrorType for RecordingPin {
        type Error = Infallible;
    }

    impl OutputPin for RecordingPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.levels.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.levels.push(true);
            Ok(())
        }
    }

    #[test]
    fn active_low_inverts_levels() {
        let mut led = GpioLed::new(RecordingPin::default(), Polarity::ActiveLow);
        led.on();
        led.toggle();
        assert!(!led.is_on());
        assert_eq!(led.pin.levels, [true, false, true]);
    }

    #[test]
    fn active_high_follows_state() {
        let mut led = GpioLed::new(RecordingPin::default(), Polarity::ActiveHigh);
        led.toggle();
        assert!(led.is_on());
        led.off();
        assert_eq!(led.pin.levels, [false, true, false]);
    }
}
