//! Per-module liveness table.
use embassy_time::{Duration, Instant};
use heapless::Vec;

use crate::core::Uuid;
use crate::error::HeartbeatError;
use crate::protocol::transport::MODULE_HEARTBEAT_TIMEOUT_MS;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LivenessState {
    /// No heartbeat ever seen.
    #[default]
    Unknown,
    Alive,
    /// Silent for longer than the timeout. Only a fresh heartbeat leaves it.
    Lost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeartbeatRecord {
    pub uuid: Uuid,
    pub last_seen: Instant,
    pub state: LivenessState,
}

/// Table of heartbeat records keyed by module UUID.
///
/// The monitor never reads a clock: every call receives `now`, so liveness
/// is fully determined by the instants fed in.
#[derive(Clone, Debug)]
pub struct HeartbeatMonitor<const N: usize> {
    records: Vec<HeartbeatRecord, N>,
    timeout: Duration,
}

impl<const N: usize> HeartbeatMonitor<N> {
    /// Monitor with the bus-wide module timeout.
    pub const fn new() -> Self {
        Self::with_timeout(Duration::from_millis(MODULE_HEARTBEAT_TIMEOUT_MS))
    }

    pub const fn with_timeout(timeout: Duration) -> Self {
        Self {
            records: Vec::new(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Record a heartbeat from `uuid` at `now`, marking it `Alive`.
    ///
    /// Returns the state the module was in before this heartbeat. A new
    /// module on a full table takes over the slot of the oldest `Lost`
    /// record; `TableFull` only when every record is still `Alive`.
    pub fn observe(&mut self, uuid: Uuid, now: Instant) -> Result<LivenessState, HeartbeatError> {
        if let Some(record) = self.records.iter_mut().find(|r| r.uuid == uuid) {
            let previous = record.state;
            record.last_seen = now;
            record.state = LivenessState::Alive;
            #[cfg(feature = "defmt")]
            if previous == LivenessState::Lost {
                defmt::info!("Heartbeat of {=u16:#x} restored", uuid);
            }
            return Ok(previous);
        }

        let fresh = HeartbeatRecord {
            uuid,
            last_seen: now,
            state: LivenessState::Alive,
        };
        if self.records.push(fresh).is_err() {
            // Full: the longest-lost module gives up its slot.
            let slot = self
                .records
                .iter_mut()
                .filter(|r| r.state == LivenessState::Lost)
                .min_by_key(|r| r.last_seen)
                .ok_or(HeartbeatError::TableFull { capacity: N })?;
            #[cfg(feature = "defmt")]
            defmt::info!("Heartbeat slot of lost {=u16:#x} reused by {=u16:#x}", slot.uuid, uuid);
            *slot = fresh;
        }
        Ok(LivenessState::Unknown)
    }

    /// Periodic liveness check. Marks `Lost` every module silent for longer
    /// than the timeout and returns how many were newly lost.
    pub fn check(&mut self, now: Instant) -> usize {
        let mut newly_lost = 0;
        for record in self.records.iter_mut() {
            if record.state != LivenessState::Alive {
                continue;
            }
            if now.saturating_duration_since(record.last_seen) > self.timeout {
                record.state = LivenessState::Lost;
                newly_lost += 1;
                #[cfg(feature = "defmt")]
                defmt::warn!("Heartbeat of {=u16:#x} lost", record.uuid);
            }
        }
        newly_lost
    }

    pub fn state(&self, uuid: Uuid) -> LivenessState {
        self.record(uuid)
            .map_or(LivenessState::Unknown, |record| record.state)
    }

    pub fn last_seen(&self, uuid: Uuid) -> Option<Instant> {
        self.record(uuid).map(|record| record.last_seen)
    }

    pub fn record(&self, uuid: Uuid) -> Option<&HeartbeatRecord> {
        self.records.iter().find(|r| r.uuid == uuid)
    }

    pub fn records(&self) -> &[HeartbeatRecord] {
        &self.records
    }

    /// At least one module known and every known module `Alive`.
    pub fn healthy(&self) -> bool {
        !self.records.is_empty()
            && self
                .records
                .iter()
                .all(|r| r.state == LivenessState::Alive)
    }

    /// UUIDs currently `Alive`.
    pub fn alive(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.records
            .iter()
            .filter(|r| r.state == LivenessState::Alive)
            .map(|r| r.uuid)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<const N: usize> Default for HeartbeatMonitor<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
