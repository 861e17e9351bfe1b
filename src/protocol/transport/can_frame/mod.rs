//! In-memory representation of a LOCO-CAN frame.
use crate::error::FrameError;
use crate::protocol::transport::can_id::CanId;
use crate::protocol::transport::MAX_FRAME_LEN;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Frame as exchanged with the transceiver: identifier plus up to eight bytes.
/// Immutable once built.
pub struct CanFrame {
    id: CanId,
    /// Payload buffer. Bytes past `len` are always zero.
    data: [u8; MAX_FRAME_LEN],
    /// Number of valid payload bytes (Data Length Code, 0 to 8).
    len: usize,
}

impl CanFrame {
    /// Build a frame; fails with [`FrameError::InvalidLength`] above eight bytes.
    pub fn new(id: CanId, payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > MAX_FRAME_LEN {
            return Err(FrameError::InvalidLength { len: payload.len() });
        }
        let mut data = [0u8; MAX_FRAME_LEN];
        data[..payload.len()].copy_from_slice(payload);
        Ok(Self {
            id,
            data,
            len: payload.len(),
        })
    }

    /// Frame without payload; always valid.
    pub fn empty(id: CanId) -> Self {
        Self {
            id,
            data: [0; MAX_FRAME_LEN],
            len: 0,
        }
    }

    /// Standard-identifier frame from a raw 11-bit value.
    pub fn standard(raw_id: u16, payload: &[u8]) -> Result<Self, FrameError> {
        Self::new(CanId::standard(raw_id)?, payload)
    }

    pub fn id(&self) -> CanId {
        self.id
    }

    /// Valid payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Setup replies are the only extended frames.
    pub fn is_extended(&self) -> bool {
        self.id.is_extended()
    }
}

/// Transceiver boundary: any HAL speaking `embedded_can` can carry our frames.
impl embedded_can::Frame for CanFrame {
    fn new(id: impl Into<embedded_can::Id>, data: &[u8]) -> Option<Self> {
        CanFrame::new(CanId::from(id.into()), data).ok()
    }

    /// Remote frames are not part of the protocol.
    fn new_remote(_id: impl Into<embedded_can::Id>, _dlc: usize) -> Option<Self> {
        None
    }

    fn is_extended(&self) -> bool {
        self.id.is_extended()
    }

    fn is_remote_frame(&self) -> bool {
        false
    }

    fn id(&self) -> embedded_can::Id {
        self.id.inner()
    }

    fn dlc(&self) -> usize {
        self.len
    }

    fn data(&self) -> &[u8] {
        self.payload()
    }
}

impl CanFrame {
    /// Copy a frame received by a HAL driver. Remote frames are refused.
    pub fn from_hal<F: embedded_can::Frame>(frame: &F) -> Result<Self, FrameError> {
        if frame.is_remote_frame() {
            return Err(FrameError::InvalidLength { len: frame.dlc() });
        }
        Self::new(CanId::from(frame.id()), frame.data())
    }

    /// Convert into the frame type of a HAL driver.
    pub fn to_hal<F: embedded_can::Frame>(&self) -> Option<F> {
        F::new(self.id.inner(), self.payload())
    }
}
