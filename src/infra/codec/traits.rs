//! Public traits exposed by the codec layer. They give every message category
//! the same encode/decode surface so upper layers (nodes, dispatch) can treat
//! them uniformly.
use crate::error::{DecodeError, EncodeError};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::registry::{classify, MessageKind};

//==================================================================================LOCO_PAYLOAD
/// Implemented by every typed message carried in a single frame.
pub trait LocoPayload: Sized {
    /// Category this payload travels under.
    const KIND: MessageKind;
    /// Minimum payload length accepted by [`LocoPayload::decode`].
    const MIN_LEN: usize;

    /// Serialize the message into a frame ready for the transceiver.
    fn encode(&self) -> Result<CanFrame, EncodeError>;

    /// Parse the payload of a frame already checked by [`expect_kind`].
    fn decode_payload(frame: &CanFrame) -> Result<Self, DecodeError>;

    /// Check category and length, then parse the frame.
    fn decode(frame: &CanFrame) -> Result<Self, DecodeError> {
        expect_kind(frame, Self::KIND)?;
        expect_len(frame, Self::MIN_LEN)?;
        Self::decode_payload(frame)
    }
}

/// Fail unless the frame identifier classifies as `kind`.
pub fn expect_kind(frame: &CanFrame, kind: MessageKind) -> Result<(), DecodeError> {
    let base = frame.id().base();
    if classify(base) == Some(kind) {
        Ok(())
    } else {
        Err(DecodeError::UnexpectedIdentifier {
            id: base,
            expected: kind,
        })
    }
}

/// Fail unless the frame carries at least `min_len` bytes.
pub fn expect_len(frame: &CanFrame, min_len: usize) -> Result<(), DecodeError> {
    if frame.len() < min_len {
        return Err(DecodeError::TooShort {
            expected: min_len,
            actual: frame.len(),
        });
    }
    Ok(())
}

/// First payload byte of a single-byte message.
pub fn first_byte(frame: &CanFrame) -> Result<u8, DecodeError> {
    frame
        .payload()
        .first()
        .copied()
        .ok_or(DecodeError::TooShort {
            expected: 1,
            actual: 0,
        })
}
