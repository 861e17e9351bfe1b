//! Timer abstraction providing the clock and the delays used by the node
//! runner and module discovery.
use embassy_time::Instant;

/// Timer trait; the crate never reads a clock on its own.
pub trait LocoTimer {
    /// Current instant of the monotonic clock.
    fn now(&self) -> Instant;

    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl core::future::Future<Output = ()> + 'a;
}
