//! Heartbeat monitor shared between execution contexts.
//!
//! When heartbeats are observed from a receive interrupt while the liveness
//! check runs in the main loop, every read-modify-write of the table goes
//! through one blocking mutex. Pick `CriticalSectionRawMutex` for interrupt
//! sharing, `NoopRawMutex` for a single executor.
use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Instant;

use crate::core::Uuid;
use crate::error::HeartbeatError;
use crate::protocol::heartbeat::monitor::{HeartbeatMonitor, LivenessState};

pub struct SharedMonitor<M: RawMutex, const N: usize> {
    inner: Mutex<M, RefCell<HeartbeatMonitor<N>>>,
}

impl<M: RawMutex, const N: usize> SharedMonitor<M, N> {
    pub const fn new(monitor: HeartbeatMonitor<N>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(monitor)),
        }
    }

    pub fn observe(&self, uuid: Uuid, now: Instant) -> Result<LivenessState, HeartbeatError> {
        self.lock(|monitor| monitor.observe(uuid, now))
    }

    pub fn check(&self, now: Instant) -> usize {
        self.lock(|monitor| monitor.check(now))
    }

    pub fn state(&self, uuid: Uuid) -> LivenessState {
        self.lock(|monitor| monitor.state(uuid))
    }

    pub fn healthy(&self) -> bool {
        self.lock(|monitor| monitor.healthy())
    }

    /// Run `f` with exclusive access to the monitor.
    pub fn lock<R>(&self, f: impl FnOnce(&mut HeartbeatMonitor<N>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

impl<M: RawMutex, const N: usize> Default for SharedMonitor<M, N> {
    fn default() -> Self {
        Self::new(HeartbeatMonitor::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn shared_access_goes_through_the_lock() {
        let shared: SharedMonitor<NoopRawMutex, 2> = SharedMonitor::default();
        shared.observe(0x0042, Instant::from_millis(0)).unwrap();
        assert!(shared.healthy());
        assert_eq!(shared.check(Instant::from_millis(1001)), 1);
        assert_eq!(shared.state(0x0042), LivenessState::Lost);
        assert_eq!(shared.lock(|monitor| monitor.len()), 1);
    }
}
