//! Button dispatch worker: decodes pin ids and drives the LED.

use crate::config::{BUTTON_OFF, BUTTON_ON, BUTTON_TOGGLE};
use crate::hardware::traits::Led;
use crate::notify::{NotificationChannel, PinId};

/// Effect of one button notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    TurnOn,
    TurnOff,
    Toggle,
    /// Id that no button is mapped to. Ignored.
    Unknown(PinId),
}

/// Which pin does what.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonMap {
    pub on: PinId,
    pub off: PinId,
    pub toggle: PinId,
}

impl ButtonMap {
    pub const fn new(on: PinId, off: PinId, toggle: PinId) -> Self {
        Self { on, off, toggle }
    }

    pub fn decode(&self, id: PinId) -> Command {
        if id == self.on {
            Command::TurnOn
        } else if id == self.off {
            Command::TurnOff
        } else if id == self.toggle {
            Command::Toggle
        } else {
            Command::Unknown(id)
        }
    }
}

impl Default for ButtonMap {
    fn default() -> Self {
        Self::new(BUTTON_ON, BUTTON_OFF, BUTTON_TOGGLE)
    }
}

/// Sole owner and writer of the LED.
pub struct ButtonDispatcher<L> {
    led: L,
    map: ButtonMap,
}

impl<L: Led> ButtonDispatcher<L> {
    /// Starts with the LED off.
    pub fn new(mut led: L, map: ButtonMap) -> Self {
        led.off();
        Self { led, map }
    }

    pub fn is_on(&self) -> bool {
        self.led.is_on()
    }

    /// Applies the effect of one notification.
    pub fn handle(&mut self, id: PinId) -> Command {
        let command = self.map.decode(id);
        match command {
            Command::TurnOn => {
                self.led.on();
                info!("[GPIO] LED on (pin {=u8})", id);
            }
            Command::TurnOff => {
                self.led.off();
                info!("[GPIO] LED off (pin {=u8})", id);
            }
            Command::Toggle => {
                self.led.toggle();
                info!("[GPIO] LED toggled, now {=bool} (pin {=u8})", self.led.is_on(), id);
            }
            Command::Unknown(id) => {
                warn!("[GPIO] Dispatch failed: no button on pin {=u8}", id);
            }
        }
        command
    }

    /// Waits for the next notification and handles it.
    pub async fn step<const N: usize>(&mut self, buttons: &NotificationChannel<PinId, N>) -> Command {
        let id = buttons.receive().await;
        self.handle(id)
    }

    pub async fn run<const N: usize>(mut self, buttons: &NotificationChannel<PinId, N>) -> ! {
        loop {
            self.step(buttons).await;
        }
    }
}
