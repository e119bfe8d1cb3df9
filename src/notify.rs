//! Bounded notification channels shared between interrupt context and
//! worker tasks.

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::config::QUEUE_CAPACITY;

/// EXTI line number of the button pin that fired.
pub type PinId = u8;

/// One alarm period elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick;

/// Single-producer / single-consumer FIFO with drop-on-full posting.
///
/// The producer side ([`post`](Self::post)) never blocks and never
/// allocates, so it is safe to call from an interrupt handler. The consumer
/// side awaits with [`receive`](Self::receive).
pub struct NotificationChannel<T, const N: usize> {
    queue: Channel<CriticalSectionRawMutex, T, N>,
    dropped: AtomicU32,
}

pub type ButtonChannel = NotificationChannel<PinId, QUEUE_CAPACITY>;
pub type TickChannel = NotificationChannel<Tick, QUEUE_CAPACITY>;

impl<T, const N: usize> NotificationChannel<T, N> {
    pub const fn new() -> Self {
        Self {
            queue: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Enqueues `value` if there is room. Returns `false` when the queue
    /// was full and the value was dropped.
    pub fn post(&self, value: T) -> bool {
        match self.queue.try_send(value) {
            Ok(()) => true,
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Waits for the oldest pending notification.
    pub async fn receive(&self) -> T {
        self.queue.receive().await
    }

    pub fn try_receive(&self) -> Option<T> {
        self.queue.try_receive().ok()
    }

    /// Number of posts lost to a full queue since creation.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<T, const N: usize> Default for NotificationChannel<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
