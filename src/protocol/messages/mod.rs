//! Typed messages of the LOCO-CAN bus, one codec per category, and the
//! dispatch enum that routes a received frame to its codec.
pub mod drive;
pub mod heartbeat;
pub mod light;
pub mod loco_setup;
pub mod multi_traction;
pub mod signal;
pub mod status;

pub use drive::DriveCommand;
pub use heartbeat::{Heartbeat, HeartbeatSource};
pub use light::LightStatus;
pub use loco_setup::{LocoSetupCommand, LocoSetupStatus};
pub use multi_traction::MultiTractionRef;
pub use signal::SignalStatus;
pub use status::VehicleStatus;

use crate::error::{DecodeError, EncodeError};
use crate::infra::codec::traits::LocoPayload;
use crate::protocol::setup::message::SetupMessage;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::registry::{classify, MessageKind};

/// A decoded frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocoMessage {
    Drive(DriveCommand),
    Status(VehicleStatus),
    Light(LightStatus),
    Signal(SignalStatus),
    LocoSetup(LocoSetupCommand),
    Heartbeat(Heartbeat),
    Setup(SetupMessage),
    /// Recognized category without a typed codec (telemetry, switch). The
    /// raw frame is handed back untouched.
    Raw(MessageKind, CanFrame),
}

impl LocoMessage {
    /// Classify the frame and decode it with the matching codec.
    pub fn decode(frame: &CanFrame) -> Result<Self, DecodeError> {
        let base = frame.id().base();
        let kind = classify(base).ok_or(DecodeError::Unrecognized { id: base })?;
        let message = match kind {
            MessageKind::Drive => LocoMessage::Drive(DriveCommand::decode(frame)?),
            MessageKind::DriveStatus => LocoMessage::Status(VehicleStatus::decode(frame)?),
            MessageKind::Light => LocoMessage::Light(LightStatus::decode(frame)?),
            MessageKind::Signal => LocoMessage::Signal(SignalStatus::decode(frame)?),
            MessageKind::LocoSetup => LocoMessage::LocoSetup(LocoSetupCommand::decode(frame)?),
            MessageKind::DriveHeartbeat
            | MessageKind::TrainEndHeartbeat
            | MessageKind::ModuleHeartbeat => LocoMessage::Heartbeat(Heartbeat::decode(frame)?),
            MessageKind::SetupWrite | MessageKind::SetupReply | MessageKind::SetupRequest => {
                LocoMessage::Setup(SetupMessage::decode(frame)?)
            }
            other => LocoMessage::Raw(other, frame.clone()),
        };
        Ok(message)
    }

    /// Encode back into a frame.
    pub fn encode(&self) -> Result<CanFrame, EncodeError> {
        match self {
            LocoMessage::Drive(m) => m.encode(),
            LocoMessage::Status(m) => m.encode(),
            LocoMessage::Light(m) => m.encode(),
            LocoMessage::Signal(m) => m.encode(),
            LocoMessage::LocoSetup(m) => m.encode(),
            LocoMessage::Heartbeat(m) => m.encode(),
            LocoMessage::Setup(m) => m.encode(),
            LocoMessage::Raw(_, frame) => Ok(frame.clone()),
        }
    }

    /// Category of the message.
    pub fn kind(&self) -> MessageKind {
        match self {
            LocoMessage::Drive(_) => MessageKind::Drive,
            LocoMessage::Status(_) => MessageKind::DriveStatus,
            LocoMessage::Light(_) => MessageKind::Light,
            LocoMessage::Signal(_) => MessageKind::Signal,
            LocoMessage::LocoSetup(_) => MessageKind::LocoSetup,
            LocoMessage::Heartbeat(hb) => match hb.source {
                HeartbeatSource::Drive => MessageKind::DriveHeartbeat,
                HeartbeatSource::TrainEnd => MessageKind::TrainEndHeartbeat,
                HeartbeatSource::Module => MessageKind::ModuleHeartbeat,
            },
            LocoMessage::Setup(setup) => setup.kind(),
            LocoMessage::Raw(kind, _) => *kind,
        }
    }
}
