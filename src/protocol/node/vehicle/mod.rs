//! Vehicle side: applies drive commands, reports status, and stops safely
//! when the drive heartbeat of the controller goes silent.
//!
//! The vehicle starts in safe stop and only drives once a drive heartbeat
//! has been seen. When every known controller is `Lost`, the drive output is
//! zeroed, the last command is forgotten, and the status reports drive off.
//! A fresh heartbeat leaves safe stop; driving resumes with the next drive
//! command.
use embassy_time::{Duration, Instant};

use crate::core::Uuid;
use crate::error::StepError;
use crate::infra::codec::traits::LocoPayload;
use crate::protocol::heartbeat::monitor::HeartbeatMonitor;
use crate::protocol::messages::{
    DriveCommand, Heartbeat, HeartbeatSource, LocoMessage, LocoSetupCommand, LocoSetupStatus,
    VehicleStatus,
};
use crate::protocol::node::config::NodeConfig;
use crate::protocol::node::{emit, is_due, LocoNode, Outbox};
use crate::protocol::transport::can_frame::CanFrame;

/// Key of controllers sending empty drive heartbeats.
pub const ANONYMOUS_CONTROLLER: Uuid = 0x0000;

/// Sensor readings supplied by the firmware.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VehicleSensors {
    pub moving: bool,
    pub ready: bool,
    pub error: bool,
}

/// Motor command after safety, reverse and disable handling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriveOutput {
    pub drive: bool,
    pub dir: bool,
    pub drive_value: u16,
    pub power_value: u16,
    pub brake_value: u16,
}

pub struct VehicleNode<const N: usize> {
    uuid: Uuid,
    config: NodeConfig,
    controllers: HeartbeatMonitor<N>,
    command: DriveCommand,
    sensors: VehicleSensors,
    traction_main: Option<Uuid>,
    reversed: bool,
    disabled: bool,
    safe_stop: bool,
    last_status: Option<Instant>,
    last_heartbeat: Option<Instant>,
}

impl<const N: usize> VehicleNode<N> {
    pub fn new(uuid: Uuid, config: NodeConfig) -> Self {
        Self {
            uuid,
            config,
            controllers: HeartbeatMonitor::with_timeout(config.heartbeat_timeout),
            command: DriveCommand::default(),
            sensors: VehicleSensors::default(),
            traction_main: None,
            reversed: false,
            disabled: false,
            safe_stop: true,
            last_status: None,
            last_heartbeat: None,
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Join a multi-traction group. Drive commands for another main are
    /// ignored from now on.
    pub fn set_traction_main(&mut self, main: Option<Uuid>) {
        self.traction_main = main;
    }

    pub fn traction_main(&self) -> Option<Uuid> {
        self.traction_main
    }

    pub fn set_sensors(&mut self, sensors: VehicleSensors) {
        self.sensors = sensors;
    }

    pub fn safe_stop(&self) -> bool {
        self.safe_stop
    }

    pub fn reversed(&self) -> bool {
        self.reversed
    }

    pub fn disabled(&self) -> bool {
        self.disabled
    }

    /// Last accepted drive command.
    pub fn command(&self) -> &DriveCommand {
        &self.command
    }

    pub fn controllers(&self) -> &HeartbeatMonitor<N> {
        &self.controllers
    }

    /// What the motor driver must apply.
    pub fn output(&self) -> DriveOutput {
        if self.safe_stop || self.disabled || !self.command.mains {
            return DriveOutput {
                dir: self.effective_dir(),
                ..Default::default()
            };
        }
        DriveOutput {
            drive: self.command.drive,
            dir: self.effective_dir(),
            drive_value: self.command.drive_value,
            power_value: self.command.power_value,
            brake_value: self.command.brake_value,
        }
    }

    /// Status as put on the bus. `dir` echoes the commanded direction, the
    /// `reverse` bit tells whether the motor runs inverted.
    pub fn status(&self) -> VehicleStatus {
        VehicleStatus {
            mains: self.command.mains,
            drive: self.command.drive && !self.safe_stop,
            dir: self.command.dir,
            reverse: self.reversed,
            moving: self.sensors.moving,
            ready: self.sensors.ready,
            error: self.sensors.error,
            uuid: self.uuid,
        }
        .as_reported(self.disabled)
    }

    fn effective_dir(&self) -> bool {
        self.command.dir ^ self.reversed
    }

    /// Multi-traction filter.
    fn accepts(&self, command: &DriveCommand) -> bool {
        match (self.traction_main, command.multi_traction.main_uuid()) {
            (Some(own), Some(main)) => own == main,
            _ => true,
        }
    }

    fn apply_drive(&mut self, command: DriveCommand) {
        if !self.accepts(&command) {
            #[cfg(feature = "defmt")]
            defmt::trace!("Drive command for another traction group ignored");
            return;
        }
        if self.safe_stop {
            // Mains follows the controller, drive waits for the heartbeat.
            self.command.mains = command.mains;
            return;
        }
        self.command = command;
    }

    fn apply_setup(&mut self, setup: LocoSetupCommand) {
        if setup.target_uuid != self.uuid {
            return;
        }
        self.reversed = setup.status == LocoSetupStatus::ReverseDirection;
        if setup.status == LocoSetupStatus::SelectAsMaster {
            self.traction_main = Some(self.uuid);
        }
        self.disabled = setup.disable;
        #[cfg(feature = "defmt")]
        defmt::info!(
            "Loco setup applied: reversed={} disabled={}",
            self.reversed,
            self.disabled
        );
    }

    fn update_safety(&mut self) {
        let alive = self.controllers.alive().next().is_some();
        if alive && self.safe_stop {
            self.safe_stop = false;
            #[cfg(feature = "defmt")]
            defmt::info!("Drive heartbeat present, leaving safe stop");
        } else if !alive && !self.safe_stop {
            self.safe_stop = true;
            self.command = DriveCommand {
                mains: self.command.mains,
                ..Default::default()
            };
            #[cfg(feature = "defmt")]
            defmt::error!("Drive heartbeat lost, safe stop");
        }
    }

    fn status_interval(&self) -> Duration {
        self.config.status_interval
    }
}

impl<const N: usize> LocoNode for VehicleNode<N> {
    fn on_frame(
        &mut self,
        frame: &CanFrame,
        now: Instant,
        outbox: &mut Outbox,
    ) -> Result<(), StepError> {
        match LocoMessage::decode(frame)? {
            LocoMessage::Drive(command) => {
                let mains_before = self.command.mains;
                self.apply_drive(command);
                // Report right away when mains comes on.
                if self.command.mains && !mains_before {
                    emit(outbox, self.status().encode()?);
                    self.last_status = Some(now);
                }
            }
            LocoMessage::LocoSetup(setup) => self.apply_setup(setup),
            LocoMessage::Heartbeat(Heartbeat {
                source: HeartbeatSource::Drive,
                sender,
            }) => {
                self.controllers
                    .observe(sender.unwrap_or(ANONYMOUS_CONTROLLER), now)?;
                self.update_safety();
            }
            _ => {}
        }
        Ok(())
    }

    fn on_tick(&mut self, now: Instant, outbox: &mut Outbox) -> Result<(), StepError> {
        self.controllers.check(now);
        self.update_safety();

        if self.command.mains && is_due(self.last_status, now, self.status_interval()) {
            emit(outbox, self.status().encode()?);
            self.last_status = Some(now);
        }
        if is_due(self.last_heartbeat, now, self.config.heartbeat_interval) {
            emit(
                outbox,
                Heartbeat::new(HeartbeatSource::Module, self.uuid).encode()?,
            );
            self.last_heartbeat = Some(now);
        }
        Ok(())
    }

    fn tick_ms(&self) -> u32 {
        self.config.tick_ms
    }
}
