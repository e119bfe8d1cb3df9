use embedded_hal_async::digital::Wait;

use super::traits::EdgeInput;
use crate::notify::PinId;

/// Button on an EXTI-capable pin with the internal pull-up enabled.
pub struct GpioButton<P> {
    pin: P,
    id: PinId,
}

impl<P: Wait> GpioButton<P> {
    pub fn new(pin: P, id: PinId) -> Self {
        Self { pin, id }
    }
}

impl<P: Wait> EdgeInput for GpioButton<P> {
    fn id(&self) -> PinId {
        self.id
    }

    async fn wait_for_press(&mut self) {
        // EXTI waits cannot fail.
        self.pin.wait_for_falling_edge().await.ok();
    }
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use embassy_futures::block_on;
    use embedded_hal::digital::ErrorType;

    use super::*;

    #[derive(Default)]
    struct EdgeCounter {
        falling: u32,
    }

    impl ErrorType for EdgeCounter {
        type Error = Infallible;
    }

    impl Wait for EdgeCounter {
        async fn wait_for_high(&mut self) -> Result<(), Infallible> {
            Ok(())
        }

        async fn wait_for_low(&mut self) -> Result<(), Infallible> {
            Ok(())
        }

        async fn wait_for_rising_edge(&mut self) -> Result<(), Infallible> {
            Ok(())
        }

        async fn wait_for_falling_edge(&mut self) -> Result<(), Infallible> {
            self.falling += 1;
            Ok(())
        }

        async fn wait_for_any_edge(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    #[test]
    fn press_waits_for_falling_edge() {
        let mut button = GpioButton::new(EdgeCounter::default(), 13);
        block_on(button.wait_for_press());
        block_on(button.wait_for_press());
        assert_eq!(button.id(), 13);
        assert_eq!(button.pin.falling, 2);
    }
}
