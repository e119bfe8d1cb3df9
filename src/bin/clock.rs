//! STM32F103 Blue Pill Button/LED Dispatch with Alarm-Driven Clock
//! =============================================================================================
//!
//! Date			Author          Notes
//! 18/10/2026	    YHY             Initial release
//!
//!==============================================================================================
//!
//! Everything from the `buttons` image, plus a software clock:
//! - a hardware timer alarm fires every second (first alarm at 100 ms)
//! - each alarm posts a tick from the interrupt executor and re-arms itself
//!   one period after the value it fired at
//! - the clock worker advances HH:MM:SS per tick and warns when no tick
//!   arrives within 2 seconds
//!
//! Hardware Connections:
//!   Buttons -> PB12 (on), PB13 (off), PB14 (toggle), to GND
//!   LED     -> PC13 (onboard)

#![no_std]
#![no_main]

use button_clock::board::{self, ButtonPins};
use button_clock::config::{ClockConfig, STARTUP_COUNTDOWN_SECS};
use cortex_m_rt::entry;
use defmt::info;
use embassy_executor::{Executor, InterruptExecutor, SendSpawner, Spawner};
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_LOW: StaticCell<Executor> = StaticCell::new();

// USART3 is unused on this board; its vector hosts the producer executor.
#[interrupt]
unsafe fn USART3() {
    unsafe { EXECUTOR_HIGH.on_interrupt() }
}

#[entry]
fn main() -> ! {
    // Initialize peripherals with default configuration
    let p = embassy_stm32::init(Default::default());
    board::print_device_info();

    // High-priority executor for producers (edge detectors, alarm)
    interrupt::USART3.set_priority(Priority::P6);
    let producers = EXECUTOR_HIGH.start(interrupt::USART3);

    // Thread-mode executor for workers
    let executor = EXECUTOR_LOW.init(Executor::new());
    executor.run(|spawner| {
        spawner
            .spawn(startup(ButtonPins::new(p), producers))
            .expect("Failed to spawn startup task");
    })
}

/// Countdown, then both workers, then the heartbeat.
#[embassy_executor::task]
async fn startup(pins: ButtonPins, producers: SendSpawner) {
    board::countdown(STARTUP_COUNTDOWN_SECS).await;

    // Spawn workers on this (thread-mode) executor
    let spawner = Spawner::for_current_executor().await;
    spawner
        .spawn(board::button_dispatch(pins, producers))
        .expect("Failed to spawn button dispatch");
    spawner
        .spawn(board::clock_accumulator(ClockConfig::default(), producers))
        .expect("Failed to spawn clock accumulator");
    info!("[App] Button dispatch and clock running");

    board::heartbeat().await
}
