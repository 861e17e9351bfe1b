//! Vehicle (drive) status, sent by each vehicle while mains is on and
//! periodically retransmitted.
//!
//! ```text
//! byte 0:   7      6      5      4      3      2      1      0
//!         error  ready  moving    -    revs   dir   drive  mains
//! byte 1:   UUID bits 8-15
//! byte 2:   UUID bits 0-7
//! ```
use crate::core::Uuid;
use crate::error::{DecodeError, EncodeError};
use crate::infra::codec::bits::{BitReader, BitWriter};
use crate::infra::codec::traits::LocoPayload;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::registry::{MessageKind, ID_DRIVE_STATUS};

pub const VEHICLE_STATUS_LEN: usize = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VehicleStatus {
    /// Main switch state.
    pub mains: bool,
    /// Drive is activated.
    pub drive: bool,
    /// Drive direction (false = forward, true = reverse).
    pub dir: bool,
    /// The vehicle runs with an inverted direction signal.
    pub reverse: bool,
    /// The vehicle is moving.
    pub moving: bool,
    /// Ready to drive.
    pub ready: bool,
    /// Motor drive reports an error.
    pub error: bool,
    /// Reporting vehicle.
    pub uuid: Uuid,
}

impl VehicleStatus {
    /// Status as put on the bus. A disabled vehicle always reports the fixed
    /// safe status (mains, drive and ready set, not moving) whatever its
    /// sensors say.
    pub fn as_reported(&self, disabled: bool) -> Self {
        if !disabled {
            return *self;
        }
        Self {
            mains: true,
            drive: true,
            ready: true,
            moving: false,
            ..*self
        }
    }
}

impl LocoPayload for VehicleStatus {
    const KIND: MessageKind = MessageKind::DriveStatus;
    const MIN_LEN: usize = VEHICLE_STATUS_LEN;

    fn encode(&self) -> Result<CanFrame, EncodeError> {
        let mut data = [0u8; VEHICLE_STATUS_LEN];
        let mut writer = BitWriter::new(&mut data);
        writer.write_flag(self.mains)?;
        writer.write_flag(self.drive)?;
        writer.write_flag(self.dir)?;
        writer.write_flag(self.reverse)?;
        writer.skip(1)?;
        writer.write_flag(self.moving)?;
        writer.write_flag(self.ready)?;
        writer.write_flag(self.error)?;
        writer.write_u16_be(self.uuid)?;
        Ok(CanFrame::standard(ID_DRIVE_STATUS, &data)?)
    }

    fn decode_payload(frame: &CanFrame) -> Result<Self, DecodeError> {
        let mut reader = BitReader::new(frame.payload());
        let mains = reader.read_flag()?;
        let drive = reader.read_flag()?;
        let dir = reader.read_flag()?;
        let reverse = reader.read_flag()?;
        reader.skip(1)?;
        let moving = reader.read_flag()?;
        let ready = reader.read_flag()?;
        let error = reader.read_flag()?;
        let uuid = reader.read_u16_be()?;
        Ok(Self {
            mains,
            drive,
            dir,
            reverse,
            moving,
            ready,
            error,
            uuid,
        })
    }
}
