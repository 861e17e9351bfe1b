//! Loco setup command: assigns a vehicle its role inside a multi-traction
//! group and can disable it.
//!
//! ```text
//! byte 0:   bit 0 status (0 = select as master, 1 = reverse direction)
//!           bit 1 disable, bits 2-7 reserved
//! byte 1:   target UUID bits 8-15
//! byte 2:   target UUID bits 0-7
//! ```
//!
//! UUID bytes follow the same most-significant-first order as the vehicle
//! status and the setup writes.
use crate::core::Uuid;
use crate::error::{DecodeError, EncodeError};
use crate::infra::codec::bits::{BitReader, BitWriter};
use crate::infra::codec::traits::LocoPayload;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::registry::{MessageKind, ID_LOCO_SETUP};

pub const LOCO_SETUP_LEN: usize = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LocoSetupStatus {
    /// The addressed vehicle becomes the main locomotive.
    #[default]
    SelectAsMaster = 0,
    /// The addressed vehicle runs with an inverted direction.
    ReverseDirection = 1,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocoSetupCommand {
    pub status: LocoSetupStatus,
    /// While set, the vehicle reports the fixed safe status.
    pub disable: bool,
    pub target_uuid: Uuid,
}

impl LocoPayload for LocoSetupCommand {
    const KIND: MessageKind = MessageKind::LocoSetup;
    const MIN_LEN: usize = LOCO_SETUP_LEN;

    fn encode(&self) -> Result<CanFrame, EncodeError> {
        let mut data = [0u8; LOCO_SETUP_LEN];
        let mut writer = BitWriter::new(&mut data);
        writer.write_flag(self.status == LocoSetupStatus::ReverseDirection)?;
        writer.write_flag(self.disable)?;
        writer.skip(6)?;
        writer.write_u16_be(self.target_uuid)?;
        Ok(CanFrame::standard(ID_LOCO_SETUP, &data)?)
    }

    fn decode_payload(frame: &CanFrame) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(frame.payload());
        let status = match reader.read_flag()? {
            false => LocoSetupStatus::SelectAsMaster,
            true => LocoSetupStatus::ReverseDirection,
        };
        let disable = reader.read_flag()?;
        reader.skip(6)?;
        let target_uuid = reader.read_u16_be()?;
        Ok(Self {
            status,
            disable,
            target_uuid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        let cmd = LocoSetupCommand {
            status: LocoSetupStatus::ReverseDirection,
            disable: true,
            target_uuid: 0x1234,
        };
        let frame = cmd.encode().unwrap();
        assert_eq!(frame.id().base(), 0x430);
        assert_eq!(frame.payload(), &[0b11, 0x12, 0x34]);
        assert_eq!(LocoSetupCommand::decode(&frame).unwrap(), cmd);
    }

    #[test]
    fn select_as_master_is_zero() {
        let cmd = LocoSetupCommand {
            target_uuid: 0xBEEF,
            ..Default::default()
        };
        let frame = cmd.encode().unwrap();
        assert_eq!(frame.payload(), &[0x00, 0xBE, 0xEF]);
        assert_eq!(LocoSetupCommand::decode(&frame).unwrap(), cmd);
    }

    #[test]
    fn short_frame() {
        let frame = CanFrame::standard(0x430, &[0x01, 0x12]).unwrap();
        assert!(matches!(
            LocoSetupCommand::decode(&frame),
            Err(DecodeError::TooShort { expected: 3, .. })
        ));
    }
}
