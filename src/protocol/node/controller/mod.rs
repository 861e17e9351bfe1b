//! Controller side: owns the drive command and the drive heartbeat, and
//! keeps the latest status of every vehicle on the bus.
use embassy_time::Instant;
use heapless::Vec;

use crate::core::Uuid;
use crate::error::{EncodeError, StepError};
use crate::infra::codec::traits::LocoPayload;
use crate::protocol::heartbeat::drive_heartbeat::DriveHeartbeat;
use crate::protocol::heartbeat::monitor::{HeartbeatMonitor, LivenessState};
use crate::protocol::messages::drive::TEN_BIT_MAX;
use crate::protocol::messages::{
    DriveCommand, Heartbeat, HeartbeatSource, LocoMessage, MultiTractionRef, VehicleStatus,
};
use crate::protocol::node::config::NodeConfig;
use crate::protocol::node::{emit, is_due, LocoNode, Outbox};
use crate::protocol::transport::can_frame::CanFrame;

/// `N` bounds the number of tracked vehicles, modules and lanterns.
pub struct ControllerNode<const N: usize> {
    uuid: Uuid,
    config: NodeConfig,
    heartbeat: DriveHeartbeat<N>,
    modules: HeartbeatMonitor<N>,
    command: DriveCommand,
    vehicles: Vec<VehicleStatus, N>,
    last_command: Option<Instant>,
}

impl<const N: usize> ControllerNode<N> {
    pub fn new(uuid: Uuid, config: NodeConfig) -> Self {
        Self {
            uuid,
            config,
            heartbeat: DriveHeartbeat::with_timing(
                uuid,
                config.heartbeat_timeout,
                config.heartbeat_interval,
            ),
            modules: HeartbeatMonitor::with_timeout(config.heartbeat_timeout),
            command: DriveCommand::default(),
            vehicles: Vec::new(),
            last_command: None,
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn set_mains(&mut self, on: bool) {
        self.command.mains = on;
        self.heartbeat.set_mains(on);
        if !on {
            self.stop_drive();
        }
    }

    /// Enable drive and capture the train-end lantern set.
    pub fn start_drive(&mut self, now: Instant) {
        self.command.drive = true;
        self.heartbeat.start_drive(now);
    }

    /// Disable drive, zero the drive value, release an emergency latch.
    pub fn stop_drive(&mut self) {
        self.command.drive = false;
        self.command.drive_value = 0;
        self.heartbeat.stop_drive();
    }

    /// Set the three 10-bit values. Values above 1023 are refused and the
    /// current command is left unchanged.
    pub fn set_values(
        &mut self,
        drive_value: u16,
        power_value: u16,
        brake_value: u16,
    ) -> Result<(), EncodeError> {
        for (field, value) in [
            ("drive_value", drive_value),
            ("power_value", power_value),
            ("brake_value", brake_value),
        ] {
            if value > TEN_BIT_MAX {
                return Err(EncodeError::ValueOutOfRange {
                    field,
                    value,
                    max: TEN_BIT_MAX,
                });
            }
        }
        self.command.drive_value = drive_value;
        self.command.power_value = power_value;
        self.command.brake_value = brake_value;
        Ok(())
    }

    pub fn set_direction(&mut self, reverse: bool) {
        self.command.dir = reverse;
    }

    pub fn set_multi_traction(&mut self, multi_traction: MultiTractionRef) {
        self.command.multi_traction = multi_traction;
    }

    pub fn command(&self) -> &DriveCommand {
        &self.command
    }

    pub fn drive_heartbeat(&self) -> &DriveHeartbeat<N> {
        &self.heartbeat
    }

    /// Aggregate health: no lantern emergency latched.
    pub fn heartbeat_healthy(&self) -> bool {
        self.heartbeat.healthy()
    }

    pub fn vehicles(&self) -> &[VehicleStatus] {
        &self.vehicles
    }

    pub fn vehicle(&self, uuid: Uuid) -> Option<&VehicleStatus> {
        self.vehicles.iter().find(|status| status.uuid == uuid)
    }

    /// Liveness of a module from its module heartbeats.
    pub fn module_state(&self, uuid: Uuid) -> LivenessState {
        self.modules.state(uuid)
    }

    fn record_status(&mut self, status: VehicleStatus) {
        let known = self.vehicles.iter().position(|known| known.uuid == status.uuid);
        match known {
            Some(index) => self.vehicles[index] = status,
            None => {
                if self.vehicles.push(status).is_err() {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Vehicle table full, status of {=u16:#x} dropped", status.uuid);
                }
            }
        }
    }
}

impl<const N: usize> LocoNode for ControllerNode<N> {
    fn on_frame(
        &mut self,
        frame: &CanFrame,
        now: Instant,
        _outbox: &mut Outbox,
    ) -> Result<(), StepError> {
        match LocoMessage::decode(frame)? {
            LocoMessage::Status(status) => self.record_status(status),
            LocoMessage::Heartbeat(Heartbeat {
                source: HeartbeatSource::TrainEnd,
                sender: Some(lantern),
            }) => self.heartbeat.observe_lantern(lantern, now)?,
            LocoMessage::Heartbeat(Heartbeat {
                source: HeartbeatSource::Module,
                sender: Some(module),
            }) => {
                self.modules.observe(module, now)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn on_tick(&mut self, now: Instant, outbox: &mut Outbox) -> Result<(), StepError> {
        if let Some(frame) = self.heartbeat.tick(now)? {
            emit(outbox, frame);
        }
        self.modules.check(now);

        if self.command.mains && is_due(self.last_command, now, self.config.status_interval) {
            emit(outbox, self.command.encode()?);
            self.last_command = Some(now);
        }
        Ok(())
    }

    fn tick_ms(&self) -> u32 {
        self.config.tick_ms
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
