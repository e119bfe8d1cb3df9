//! Falling-edge producer for the button channel.

use crate::hardware::traits::EdgeInput;
use crate::notify::{NotificationChannel, PinId};

/// Posts a button's id on every falling edge.
///
/// Runs in interrupt context: it only posts, never logs or touches other
/// pins, and a press that finds the queue full is lost.
pub struct EdgeDetector<'a, B, const N: usize> {
    button: B,
    buttons: &'a NotificationChannel<PinId, N>,
}

impl<'a, B: EdgeInput, const N: usize> EdgeDetector<'a, B, N> {
    pub fn new(button: B, buttons: &'a NotificationChannel<PinId, N>) -> Self {
        Self { button, buttons }
    }

    /// Interrupt body. Returns whether the id was queued.
    pub fn on_edge(&self) -> bool {
        self.buttons.post(self.button.id())
    }

    pub async fn step(&mut self) -> bool {
        self.button.wait_for_press().await;
        self.on_edge()
    }

    pub async fn run(mut self) -> ! {
        loop {
            self.step().await;
        }
    }
}
