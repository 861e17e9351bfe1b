//! Heartbeat frames: drive heartbeat from the active controller, train-end
//! lantern heartbeats and per-module heartbeats.
//!
//! ```text
//! byte 0:   sender UUID bits 8-15
//! byte 1:   sender UUID bits 0-7
//! ```
//!
//! An empty heartbeat is accepted and carries no sender.
use crate::core::Uuid;
use crate::error::{DecodeError, EncodeError};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::registry::{
    classify, MessageKind, ID_DRIVE_HEARTBEAT, ID_MODULE_HEARTBEAT, ID_TRAIN_END_HEARTBEAT,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeartbeatSource {
    /// Active controller, monitored by every vehicle.
    Drive,
    /// Train-end lantern, registered by the controller.
    TrainEnd,
    /// Any module announcing it is alive.
    Module,
}

impl HeartbeatSource {
    pub fn identifier(&self) -> u16 {
        match self {
            HeartbeatSource::Drive => ID_DRIVE_HEARTBEAT,
            HeartbeatSource::TrainEnd => ID_TRAIN_END_HEARTBEAT,
            HeartbeatSource::Module => ID_MODULE_HEARTBEAT,
        }
    }

    pub fn from_kind(kind: MessageKind) -> Option<Self> {
        match kind {
            MessageKind::DriveHeartbeat => Some(HeartbeatSource::Drive),
            MessageKind::TrainEndHeartbeat => Some(HeartbeatSource::TrainEnd),
            MessageKind::ModuleHeartbeat => Some(HeartbeatSource::Module),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Heartbeat {
    pub source: HeartbeatSource,
    pub sender: Option<Uuid>,
}

impl Heartbeat {
    pub fn new(source: HeartbeatSource, sender: Uuid) -> Self {
        Self {
            source,
            sender: Some(sender),
        }
    }

    pub fn encode(&self) -> Result<CanFrame, EncodeError> {
        let payload = self.sender.map(Uuid::to_be_bytes);
        let data: &[u8] = match &payload {
            Some(bytes) => bytes,
            None => &[],
        };
        Ok(CanFrame::standard(self.source.identifier(), data)?)
    }

    pub fn decode(frame: &CanFrame) -> Result<Self, DecodeError> {
        let base = frame.id().base();
        let source = classify(base)
            .and_then(HeartbeatSource::from_kind)
            .ok_or(DecodeError::UnexpectedIdentifier {
                id: base,
                expected: MessageKind::ModuleHeartbeat,
            })?;
        let sender = match frame.payload() {
            [] => None,
            [msb, lsb, ..] => Some(Uuid::from_be_bytes([*msb, *lsb])),
            [_] => {
                return Err(DecodeError::TooShort {
                    expected: 2,
                    actual: 1,
                })
            }
        };
        Ok(Self { source, sender })
    }
}
