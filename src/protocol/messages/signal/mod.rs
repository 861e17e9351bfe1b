//! Acoustic signal status.
//!
//! ```text
//! byte 0:   7      6      5      4      3      2      1      0
//!           -      -      -      -      -     bell   low   high
//! ```
//!
//! Bits 3-7 are reserved; senders may set them in later revisions, so the
//! decoder ignores them.
use crate::error::{DecodeError, EncodeError};
use crate::infra::codec::traits::{first_byte, LocoPayload};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::registry::{MessageKind, ID_SIGNAL};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignalStatus {
    /// High frequency signal.
    pub high: bool,
    /// Low frequency signal.
    pub low: bool,
    /// Signal bell.
    pub bell: bool,
}

impl LocoPayload for SignalStatus {
    const KIND: MessageKind = MessageKind::Signal;
    const MIN_LEN: usize = 1;

    fn encode(&self) -> Result<CanFrame, EncodeError> {
        let byte = (self.high as u8) | (self.low as u8) << 1 | (self.bell as u8) << 2;
        Ok(CanFrame::standard(ID_SIGNAL, &[byte])?)
    }

    fn decode_payload(frame: &CanFrame) -> Result<Self, DecodeError> {
        let byte = first_byte(frame)?;
        Ok(Self {
            high: byte & 0x01 != 0,
            low: byte & 0x02 != 0,
            bell: byte & 0x04 != 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_order() {
        let signal = SignalStatus {
            low: true,
            bell: true,
            ..Default::default()
        };
        let frame = signal.encode().unwrap();
        assert_eq!(frame.id().base(), 0x220);
        assert_eq!(frame.payload(), &[0b110]);
        assert_eq!(SignalStatus::decode(&frame).unwrap(), signal);
    }

    #[test]
    /// Unknown bits from newer senders decode without error.
    fn reserved_bits_ignored() {
        let frame = CanFrame::standard(0x220, &[0b1111_1001]).unwrap();
        assert_eq!(
            SignalStatus::decode(&frame).unwrap(),
            SignalStatus {
                high: true,
                low: false,
                bell: false
            }
        );
    }
}
