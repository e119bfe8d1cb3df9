//! STM32F103 "Blue Pill" bring-up shared by both firmware images.
//!
//! Hardware Connections:
//!   Buttons (to GND, internal pull-up, falling-edge EXTI):
//!      ON      -> PB12
//!      OFF     -> PB13
//!      TOGGLE  -> PB14
//!
//!   LED:
//!      Onboard LED -> PC13 (active low)
//!
//! Producers (edge detectors, alarm source) are spawned on the
//! high-priority interrupt executor; workers run on the thread executor.

use embassy_executor::SendSpawner;
use embassy_stm32::{
    exti::ExtiInput,
    gpio::{Level, Output, Pull, Speed},
    peripherals,
};
use embassy_time::{Duration, Ticker};
use static_cell::StaticCell;

use crate::alarm::AlarmSource;
use crate::clock::ClockWorker;
use crate::config::{
    BUTTON_OFF, BUTTON_ON, BUTTON_TOGGLE, ClockConfig, HEARTBEAT, QUEUE_CAPACITY,
};
use crate::dispatch::{ButtonDispatcher, ButtonMap};
use crate::edge::EdgeDetector;
use crate::hardware::gpio_button::GpioButton;
use crate::hardware::gpio_led::{GpioLed, Polarity};
use crate::hardware::monotonic_alarm::MonotonicAlarm;
use crate::notify::{ButtonChannel, NotificationChannel, PinId, TickChannel};

/// Peripherals owned by the button dispatch worker.
pub struct ButtonPins {
    pub on: (peripherals::PB12, peripherals::EXTI12),
    pub off: (peripherals::PB13, peripherals::EXTI13),
    pub toggle: (peripherals::PB14, peripherals::EXTI14),
    pub led: peripherals::PC13,
}

impl ButtonPins {
    pub fn new(p: embassy_stm32::Peripherals) -> Self {
        Self {
            on: (p.PB12, p.EXTI12),
            off: (p.PB13, p.EXTI13),
            toggle: (p.PB14, p.EXTI14),
            led: p.PC13,
        }
    }
}

/// Logs the device identification.
pub fn print_device_info() {
    info!(
        "[App] STM32F103C8, uid {=str}, {=usize} KB flash",
        embassy_stm32::uid::uid_hex(),
        embassy_stm32::flash::FLASH_SIZE / 1024
    );
}

/// Logs a once-per-second countdown from `secs` to zero.
pub async fn countdown(secs: u32) {
    let mut ticker = Ticker::every(Duration::from_secs(1));
    for remaining in (0..=secs).rev() {
        info!("[App] Starting in {=u32} seconds...", remaining);
        ticker.next().await;
    }
    info!("[App] Starting now.");
}

/// Button Dispatch Task
///
/// Responsibilities:
/// 1. Create the button channel before any producer can post
/// 2. Configure the LED (off) and the three EXTI inputs
/// 3. Hand one edge detector per button to the interrupt executor
/// 4. Apply every notification to the LED, forever
#[embassy_executor::task]
pub async fn button_dispatch(pins: ButtonPins, producers: SendSpawner) -> ! {
    // Channel lives for the whole program
    static BUTTONS: StaticCell<ButtonChannel> = StaticCell::new();
    let buttons: &'static ButtonChannel = BUTTONS.init(NotificationChannel::new());

    // PC13 is active low: start high (LED off)
    let led = GpioLed::new(Output::new(pins.led, Level::High, Speed::Low), Polarity::ActiveLow);
    let dispatcher = ButtonDispatcher::new(led, ButtonMap::default());

    // Buttons short to GND: pull-up, press is a falling edge
    let inputs = [
        (ExtiInput::new(pins.on.0, pins.on.1, Pull::Up), BUTTON_ON),
        (ExtiInput::new(pins.off.0, pins.off.1, Pull::Up), BUTTON_OFF),
        (ExtiInput::new(pins.toggle.0, pins.toggle.1, Pull::Up), BUTTON_TOGGLE),
    ];
    for (input, id) in inputs {
        producers
            .spawn(edge_detector(input, id, buttons))
            .expect("Failed to spawn edge detector");
    }
    info!("[GPIO] Buttons armed, queue capacity {=usize}", QUEUE_CAPACITY);

    // Main dispatch loop
    dispatcher.run(buttons).await
}

/// Edge Detector Task (one per button, interrupt executor only)
///
/// Responsibilities:
/// 1. Wait for a falling edge on its EXTI line
/// 2. Post the pin id to the button channel without blocking
///
/// Nothing else happens here; a full queue drops the press.
#[embassy_executor::task(pool_size = 3)]
pub async fn edge_detector(
    input: ExtiInput<'static>,
    id: PinId,
    buttons: &'static ButtonChannel,
) -> ! {
    EdgeDetector::new(GpioButton::new(input, id), buttons).run().await
}

/// Clock Accumulator Task
///
/// Responsibilities:
/// 1. Create the tick channel before the alarm can fire
/// 2. Validate the timing and start the alarm timer (failure is fatal)
/// 3. Hand the alarm source to the interrupt executor
/// 4. Advance HH:MM:SS per tick, report a miss after the timeout
#[embassy_executor::task]
pub async fn clock_accumulator(config: ClockConfig, producers: SendSpawner) -> ! {
    // Channel lives for the whole program
    static TICKS: StaticCell<TickChannel> = StaticCell::new();
    let ticks: &'static TickChannel = TICKS.init(NotificationChannel::new());

    // Timeout must outlast one period or every tick reads as missed
    if let Err(e) = config.validate() {
        error!("[Timer] Invalid clock configuration: {}", e);
        defmt::panic!("clock configuration rejected");
    }

    // Enable, arm the first alarm, start counting
    info!("[Timer] Create timer handle");
    let mut source = AlarmSource::new(MonotonicAlarm::new(), ticks, &config);
    if let Err(e) = source.start() {
        error!("[Timer] Timer start failed: {}", e);
        defmt::panic!("timer start failed");
    }
    producers
        .spawn(alarm_source(source))
        .expect("Failed to spawn alarm source");

    // Main clock loop
    ClockWorker::new(ticks, config.start, config.tick_timeout)
        .run()
        .await
}

/// Alarm Source Task (interrupt executor only)
///
/// Responsibilities:
/// 1. Wait for the armed alarm to fire
/// 2. Post one tick without blocking
/// 3. Re-arm one period after the value it fired at
#[embassy_executor::task]
pub async fn alarm_source(
    source: AlarmSource<'static, MonotonicAlarm, QUEUE_CAPACITY>,
) -> ! {
    source.run().await
}

/// Idle heartbeat on the thread executor.
pub async fn heartbeat() -> ! {
    let mut ticker = Ticker::every(HEARTBEAT);
    loop {
        // Wait for next status interval
        ticker.next().await;
        info!("[App] System status: operational");
    }
}
