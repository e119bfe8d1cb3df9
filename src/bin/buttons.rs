//! STM32F103 Blue Pill Button/LED Event Dispatch
//! =============================================================================================
//!
//! Date			Author          Notes
//! 18/10/2026	    YHY             Initial release
//!
//!==============================================================================================
//!
//! Three buttons drive the onboard LED through an interrupt-to-task hand-off:
//! - PB12 turns the LED on
//! - PB13 turns the LED off
//! - PB14 toggles the LED
//!
//! Each falling edge is posted from the high-priority interrupt executor to
//! a bounded queue (10 slots, drop-on-full). The dispatch worker on the
//! thread executor drains the queue, drives PC13 and logs over defmt RTT.

#![no_std]
#![no_main]

use button_clock::board::{self, ButtonPins};
use button_clock::config::STARTUP_COUNTDOWN_SECS;
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

/// Countdown, then the button worker, then the heartbeat.
#[embassy_executor::task]
async fn startup(pins: ButtonPins, producers: SendSpawner) {
    board::countdown(STARTUP_COUNTDOWN_SECS).await;

    // Spawn workers on this (thread-mode) executor
    let spawner = Spawner::for_current_executor().await;
    spawner
        .spawn(board::button_dispatch(pins, producers))
        .expect("Failed to spawn button dispatch");
    info!("[App] Button dispatch running");

    board::heartbeat().await
}
