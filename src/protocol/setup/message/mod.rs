//! Setup frames: construction and decoding.
use crate::core::Uuid;
use crate::error::{DecodeError, EncodeError};
use crate::protocol::setup::{MAX_REPLY_DATA_ID, NAME_DATA_ID};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CanId;
use crate::protocol::transport::registry::{
    classify, MessageKind, ID_SETUP_REPLY, ID_SETUP_WRITE,
};
use crate::protocol::transport::{MAX_FRAME_LEN, SETUP_NAME_MAX_LEN, SETUP_VALUE_MAX_LEN};
use embedded_can::StandardId;
use heapless::{String, Vec};

/// Decoded setup exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetupMessage {
    /// "Describe yourself", addressed to nobody and answered by everybody.
    Request,
    /// Info package sent by a module in answer to a request.
    Reply {
        data_id: u8,
        sender: Uuid,
        text: Vec<u8, MAX_FRAME_LEN>,
    },
    SetName {
        target: Uuid,
        name: String<SETUP_NAME_MAX_LEN>,
    },
    SetData {
        target: Uuid,
        data_id: u8,
        value: Vec<u8, SETUP_VALUE_MAX_LEN>,
    },
}

//==================================================================================BUILDERS
/// Broadcast request: empty frame on `0x7FF`.
pub fn request() -> CanFrame {
    CanFrame::empty(CanId::from(StandardId::MAX))
}

/// Info reply on `0x780 | data_id`, `own_uuid` in the extended identifier.
pub fn reply(data_id: u8, text: &[u8], own_uuid: Uuid) -> Result<CanFrame, EncodeError> {
    if data_id > MAX_REPLY_DATA_ID {
        return Err(EncodeError::ReservedDataId { data_id });
    }
    if text.len() > MAX_FRAME_LEN {
        return Err(EncodeError::PayloadTooLong {
            max: MAX_FRAME_LEN,
            actual: text.len(),
        });
    }
    let id = CanId::with_uuid(ID_SETUP_REPLY | data_id as u16, own_uuid)?;
    Ok(CanFrame::new(id, text)?)
}

/// Name write on `0x600`: target in bytes 0-1, `0xFF` in byte 2, name in
/// bytes 3-7 (at most five bytes).
pub fn set_name(target: Uuid, name: &str) -> Result<CanFrame, EncodeError> {
    let name = name.as_bytes();
    if name.len() > SETUP_NAME_MAX_LEN {
        return Err(EncodeError::PayloadTooLong {
            max: SETUP_NAME_MAX_LEN,
            actual: name.len(),
        });
    }
    let mut data = [0u8; MAX_FRAME_LEN];
    data[..2].copy_from_slice(&target.to_be_bytes());
    data[2] = NAME_DATA_ID;
    data[3..3 + name.len()].copy_from_slice(name);
    Ok(CanFrame::standard(ID_SETUP_WRITE, &data[..3 + name.len()])?)
}

/// Data slot write on `0x600 | data_id`: target in bytes 0-1, value in bytes
/// 2-7 (at most six bytes).
///
/// Slot `0x00` would share `0x600` with the name write and slot `0xFF` is the
/// name marker; both are refused.
pub fn set_data(target: Uuid, data_id: u8, value: &[u8]) -> Result<CanFrame, EncodeError> {
    if data_id == 0x00 || data_id == NAME_DATA_ID {
        return Err(EncodeError::ReservedDataId { data_id });
    }
    if value.len() > SETUP_VALUE_MAX_LEN {
        return Err(EncodeError::PayloadTooLong {
            max: SETUP_VALUE_MAX_LEN,
            actual: value.len(),
        });
    }
    let mut data = [0u8; MAX_FRAME_LEN];
    data[..2].copy_from_slice(&target.to_be_bytes());
    data[2..2 + value.len()].copy_from_slice(value);
    Ok(CanFrame::standard(
        ID_SETUP_WRITE | data_id as u16,
        &data[..2 + value.len()],
    )?)
}

//==================================================================================DECODE
impl SetupMessage {
    /// Decode any setup-range frame.
    pub fn decode(frame: &CanFrame) -> Result<Self, DecodeError> {
        let id = frame.id();
        let base = id.base();
        match classify(base) {
            // The request carries no addressing: payload and UUID are ignored.
            Some(MessageKind::SetupRequest) => Ok(SetupMessage::Request),
            Some(MessageKind::SetupReply) => {
                let sender = id.sender_uuid().ok_or(DecodeError::MissingSenderUuid)?;
                let text = Vec::from_slice(frame.payload()).map_err(|_| DecodeError::TooShort {
                    expected: MAX_FRAME_LEN,
                    actual: frame.len(),
                })?;
                Ok(SetupMessage::Reply {
                    data_id: (base & 0x7F) as u8,
                    sender,
                    text,
                })
            }
            Some(MessageKind::SetupWrite) => {
                if id.is_extended() {
                    return Err(DecodeError::UnexpectedExtendedId);
                }
                Self::decode_write((base & 0xFF) as u8, frame.payload())
            }
            _ => Err(DecodeError::UnexpectedIdentifier {
                id: base,
                expected: MessageKind::SetupWrite,
            }),
        }
    }

    fn decode_write(slot: u8, payload: &[u8]) -> Result<Self, DecodeError> {
        let [msb, lsb, rest @ ..] = payload else {
            return Err(DecodeError::TooShort {
                expected: 3,
                actual: payload.len(),
            });
        };
        let target = Uuid::from_be_bytes([*msb, *lsb]);

        if slot != 0x00 {
            let value = Vec::from_slice(rest).map_err(|_| DecodeError::TooShort {
                expected: 2 + SETUP_VALUE_MAX_LEN,
                actual: payload.len(),
            })?;
            return Ok(SetupMessage::SetData {
                target,
                data_id: slot,
                value,
            });
        }

        let [marker, name @ ..] = rest else {
            return Err(DecodeError::TooShort {
                expected: 3,
                actual: payload.len(),
            });
        };
        if *marker != NAME_DATA_ID {
            return Err(DecodeError::ReservedBits { bits: *marker });
        }
        let end = name.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        let text = core::str::from_utf8(&name[..end]).map_err(|_| DecodeError::InvalidText)?;
        let name = String::try_from(text).map_err(|_| DecodeError::InvalidText)?;
        Ok(SetupMessage::SetName { target, name })
    }

    /// Decode a frame as seen by module `own_uuid`.
    ///
    /// Writes addressed to another module yield `Ok(None)`: the bus is
    /// multi-drop, so a mismatch is normal traffic rather than an error.
    pub fn decode_for(frame: &CanFrame, own_uuid: Uuid) -> Result<Option<Self>, DecodeError> {
        let message = Self::decode(frame)?;
        match message.target() {
            Some(target) if target != own_uuid => Ok(None),
            _ => Ok(Some(message)),
        }
    }

    /// Target UUID of a write.
    pub fn target(&self) -> Option<Uuid> {
        match self {
            SetupMessage::SetName { target, .. } | SetupMessage::SetData { target, .. } => {
                Some(*target)
            }
            _ => None,
        }
    }

    /// Data id of the exchange (`0xFF` for a name write).
    pub fn data_id(&self) -> Option<u8> {
        match self {
            SetupMessage::Request => None,
            SetupMessage::Reply { data_id, .. } | SetupMessage::SetData { data_id, .. } => {
                Some(*data_id)
            }
            SetupMessage::SetName { .. } => Some(NAME_DATA_ID),
        }
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            SetupMessage::Request => MessageKind::SetupRequest,
            SetupMessage::Reply { .. } => MessageKind::SetupReply,
            SetupMessage::SetName { .. } | SetupMessage::SetData { .. } => MessageKind::SetupWrite,
        }
    }

    /// Encode back into a frame.
    pub fn encode(&self) -> Result<CanFrame, EncodeError> {
        match self {
            SetupMessage::Request => Ok(request()),
            SetupMessage::Reply {
                data_id,
                sender,
                text,
            } => reply(*data_id, text, *sender),
            SetupMessage::SetName { target, name } => set_name(*target, name),
            SetupMessage::SetData {
                target,
                data_id,
                value,
            } => set_data(*target, *data_id, value),
        }
    }
}
