//! Drive command sent by the active controller to every vehicle while mains
//! is on.
//!
//! ```text
//! byte 0:   7      6      5      4      3      2      1      0
//!         error  aux-1   aux   down    up    dir   drive  mains
//! byte 1:   bit 0 multi-traction active, bits 1-7 reserved
//! byte 2:   bits 0-1 drive value bits 8-9, bits 2-7 multi-traction fragment
//! byte 3:   drive value bits 0-7
//! byte 4:   bits 0-1 power value bits 8-9, bits 2-7 multi-traction fragment
//! byte 5:   power value bits 0-7
//! byte 6:   bits 0-1 brake value bits 8-9, bits 2-7 multi-traction fragment
//! byte 7:   brake value bits 0-7
//! ```
use crate::error::{DecodeError, EncodeError};
use crate::infra::codec::bits::{BitReader, BitWriter};
use crate::infra::codec::traits::LocoPayload;
use crate::protocol::messages::multi_traction::{self, MultiTractionRef, FRAGMENT_SLOT_BITS};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::registry::{MessageKind, ID_DRIVE};

/// Largest value of a 10-bit field.
pub const TEN_BIT_MAX: u16 = 0x3FF;

/// Drive command payload length.
pub const DRIVE_COMMAND_LEN: usize = 8;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriveCommand {
    /// Main switch state.
    pub mains: bool,
    /// Drive enabled.
    pub drive: bool,
    /// Direction (false = forward, true = reverse).
    pub dir: bool,
    pub up: bool,
    pub down: bool,
    pub aux: bool,
    pub aux1: bool,
    /// Controller reports an error.
    pub error: bool,
    /// Drive voltage, 0-1023.
    pub drive_value: u16,
    /// Maximum drive power, 0-1023.
    pub power_value: u16,
    /// Brake intensity, 0-1023.
    pub brake_value: u16,
    pub multi_traction: MultiTractionRef,
}

fn check_ten_bit(field: &'static str, value: u16) -> Result<u16, EncodeError> {
    if value > TEN_BIT_MAX {
        return Err(EncodeError::ValueOutOfRange {
            field,
            value,
            max: TEN_BIT_MAX,
        });
    }
    Ok(value)
}

impl LocoPayload for DriveCommand {
    const KIND: MessageKind = MessageKind::Drive;
    const MIN_LEN: usize = DRIVE_COMMAND_LEN;

    /// Values above 1023 are rejected, never clamped.
    fn encode(&self) -> Result<CanFrame, EncodeError> {
        let values = [
            check_ten_bit("drive_value", self.drive_value)?,
            check_ten_bit("power_value", self.power_value)?,
            check_ten_bit("brake_value", self.brake_value)?,
        ];
        let fragments = match self.multi_traction.main_uuid() {
            Some(uuid) => multi_traction::split(uuid),
            None => [0; 3],
        };

        let mut data = [0u8; DRIVE_COMMAND_LEN];
        let mut writer = BitWriter::new(&mut data);
        for flag in [
            self.mains, self.drive, self.dir, self.up, self.down, self.aux, self.aux1, self.error,
        ] {
            writer.write_flag(flag)?;
        }
        writer.write_flag(self.multi_traction.active)?;
        writer.skip(7)?;
        for (value, fragment) in values.iter().zip(fragments) {
            writer.write_bits(value >> 8, 2)?;
            writer.write_u8(fragment, FRAGMENT_SLOT_BITS)?;
            writer.write_u8(*value as u8, 8)?;
        }

        Ok(CanFrame::standard(ID_DRIVE, &data)?)
    }

    fn decode_payload(frame: &CanFrame) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(frame.payload());
        let mut flags = [false; 8];
        for flag in flags.iter_mut() {
            *flag = reader.read_flag()?;
        }
        let [mains, drive, dir, up, down, aux, aux1, error] = flags;

        let multi_traction_active = reader.read_flag()?;
        reader.skip(7)?;

        let mut values = [0u16; 3];
        let mut fragments = [0u8; 3];
        for (value, fragment) in values.iter_mut().zip(fragments.iter_mut()) {
            let high = reader.read_bits(2)?;
            *fragment = reader.read_u8(FRAGMENT_SLOT_BITS)?;
            *value = (high << 8) | reader.read_bits(8)?;
        }

        let multi_traction = if multi_traction_active {
            MultiTractionRef::main(multi_traction::join(fragments)?)
        } else {
            MultiTractionRef::inactive()
        };

        Ok(Self {
            mains,
            drive,
            dir,
            up,
            down,
            aux,
            aux1,
            error,
            drive_value: values[0],
            power_value: values[1],
            brake_value: values[2],
            multi_traction,
        })
    }
}
