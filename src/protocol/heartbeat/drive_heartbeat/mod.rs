//! Controller-side drive heartbeat and train-end lantern guard.
//!
//! While mains is on the controller emits the drive heartbeat (`0x010`) at a
//! fixed cadence. When drive starts, the set of live train-end lanterns is
//! captured. Any change of that set while drive is active (a lantern
//! appearing, a lantern falling silent) latches an emergency and the drive
//! heartbeat stops. Vehicles then lose the heartbeat and stop on their own.
//! The latch is released by stopping drive.
use embassy_time::{Duration, Instant};
use heapless::Vec;

use crate::core::Uuid;
use crate::error::{EncodeError, HeartbeatError};
use crate::protocol::heartbeat::monitor::HeartbeatMonitor;
use crate::protocol::messages::heartbeat::{Heartbeat, HeartbeatSource};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::{HEARTBEAT_INTERVAL_MS, MODULE_HEARTBEAT_TIMEOUT_MS};

pub struct DriveHeartbeat<const N: usize> {
    sender: Uuid,
    lanterns: HeartbeatMonitor<N>,
    captured: Vec<Uuid, N>,
    interval: Duration,
    mains: bool,
    drive_active: bool,
    emergency: bool,
    last_emit: Option<Instant>,
}

impl<const N: usize> DriveHeartbeat<N> {
    /// Supervisor with the bus default timeout and interval.
    pub fn new(sender: Uuid) -> Self {
        Self::with_timing(
            sender,
            Duration::from_millis(MODULE_HEARTBEAT_TIMEOUT_MS),
            Duration::from_millis(HEARTBEAT_INTERVAL_MS),
        )
    }

    /// `timeout` applies to lanterns, `interval` to the emitted heartbeat.
    pub fn with_timing(sender: Uuid, timeout: Duration, interval: Duration) -> Self {
        Self {
            sender,
            lanterns: HeartbeatMonitor::with_timeout(timeout),
            captured: Vec::new(),
            interval,
            mains: false,
            drive_active: false,
            emergency: false,
            last_emit: None,
        }
    }

    /// Feed a train-end heartbeat.
    ///
    /// An uncaptured lantern that finds no free slot during drive still
    /// latches the emergency before the error is returned.
    pub fn observe_lantern(&mut self, uuid: Uuid, now: Instant) -> Result<(), HeartbeatError> {
        if let Err(err) = self.lanterns.observe(uuid, now) {
            if self.drive_active && !self.captured.contains(&uuid) {
                self.latch();
            }
            return Err(err);
        }
        self.guard();
        Ok(())
    }

    pub fn set_mains(&mut self, on: bool) {
        if !on {
            self.last_emit = None;
        }
        self.mains = on;
    }

    /// Capture the live lantern set and arm the guard.
    pub fn start_drive(&mut self, now: Instant) {
        self.lanterns.check(now);
        self.captured.clear();
        for uuid in self.lanterns.alive() {
            // Both collections share the capacity `N`.
            let _ = self.captured.push(uuid);
        }
        self.drive_active = true;
        #[cfg(feature = "defmt")]
        defmt::info!("Drive started with {} train-end lanterns", self.captured.len());
    }

    /// Disarm the guard and release an emergency latch.
    pub fn stop_drive(&mut self) {
        #[cfg(feature = "defmt")]
        if self.emergency {
            defmt::info!("Emergency released, drive heartbeat resumes");
        }
        self.drive_active = false;
        self.emergency = false;
        self.captured.clear();
    }

    /// Periodic step: run the lantern check, then return the drive heartbeat
    /// frame when one is due.
    pub fn tick(&mut self, now: Instant) -> Result<Option<CanFrame>, EncodeError> {
        if self.lanterns.check(now) > 0 {
            self.guard();
        }
        if !self.mains || self.emergency {
            return Ok(None);
        }
        let due = self
            .last_emit
            .map_or(true, |last| now.saturating_duration_since(last) >= self.interval);
        if !due {
            return Ok(None);
        }
        self.last_emit = Some(now);
        Heartbeat::new(HeartbeatSource::Drive, self.sender)
            .encode()
            .map(Some)
    }

    fn guard(&mut self) {
        if !self.drive_active || self.emergency {
            return;
        }
        let captured = &self.captured;
        let appeared = self.lanterns.alive().any(|uuid| !captured.contains(&uuid));
        let vanished = captured.len() != self.lanterns.alive().count();
        if appeared || vanished {
            self.latch();
        }
    }

    fn latch(&mut self) {
        if self.emergency {
            return;
        }
        self.emergency = true;
        #[cfg(feature = "defmt")]
        defmt::error!("Train-end lantern set changed during drive, heartbeat stopped");
    }

    /// Emergency latched: no drive heartbeat until drive is stopped.
    pub fn emergency(&self) -> bool {
        self.emergency
    }

    /// Aggregate health seen by the controller.
    pub fn healthy(&self) -> bool {
        !self.emergency
    }

    pub fn drive_active(&self) -> bool {
        self.drive_active
    }

    pub fn mains(&self) -> bool {
        self.mains
    }

    /// Lanterns captured at drive start.
    pub fn captured(&self) -> &[Uuid] {
        &self.captured
    }

    pub fn lanterns(&self) -> &HeartbeatMonitor<N> {
        &self.lanterns
    }
}
