use crate::error::Result;
use crate::notify::PinId;

/// Single LED output.
pub trait Led {
    fn set(&mut self, on: bool);
    fn is_on(&self) -> bool;

    fn on(&mut self) {
        self.set(true);
    }

    fn off(&mut self) {
        self.set(false);
    }

    fn toggle(&mut self) {
        let next = !self.is_on();
        self.set(next);
    }
}

/// Active-low push-button that reports falling edges.
#[allow(async_fn_in_trait)]
pub trait EdgeInput {
    /// Identifier posted for this button.
    fn id(&self) -> PinId;

    /// Completes on the next falling edge.
    async fn wait_for_press(&mut self);
}

/// Free-running up-counter in microseconds with one compare alarm.
#[allow(async_fn_in_trait)]
pub trait AlarmTimer {
    fn enable(&mut self) -> Result<()>;

    /// Starts counting from zero. Requires `enable` and an armed alarm.
    fn start(&mut self) -> Result<()>;

    /// Arms the alarm at an absolute counter value.
    fn set_alarm(&mut self, count: u64);

    /// Completes when the armed alarm fires and returns the counter value
    /// it was armed at.
    async fn wait_alarm(&mut self) -> u64;
}
