//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (frame construction,
//! payload encoding/decoding, liveness tracking, setup exchanges, etc.).
use crate::protocol::transport::registry::MessageKind;
use thiserror_no_std::Error;

//==================================================================================FRAME_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur while building a frame or one of its identifiers.
pub enum FrameError {
    /// Classic CAN frames carry at most eight data bytes.
    #[error("Invalid length: {len} bytes (max 8)")]
    InvalidLength { len: usize },
    /// Identifier does not fit the requested width (11 or 29 bits).
    #[error("Invalid identifier: {raw:#x}")]
    InvalidIdentifier { raw: u32 },
}

//================================================================================CODEC_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors raised while decoding a frame into a typed message.
pub enum DecodeError {
    /// The frame identifier does not belong to the category of the decoder.
    #[error("Unexpected identifier {id:#x} for {expected:?}")]
    UnexpectedIdentifier { id: u16, expected: MessageKind },
    /// Payload is shorter than the category requires.
    #[error("Payload too short -> expected: {expected}, actual: {actual}")]
    TooShort { expected: usize, actual: usize },
    /// A reserved field carries a value the decoder must refuse.
    #[error("Reserved bits set: {bits:#04x}")]
    ReservedBits { bits: u8 },
    /// Setup reply frames must carry the sender UUID in an extended identifier.
    #[error("Setup reply without extended identifier")]
    MissingSenderUuid,
    /// Setup writes only travel on standard identifiers.
    #[error("Setup write on an extended identifier")]
    UnexpectedExtendedId,
    /// The identifier does not map to any known category.
    #[error("Unrecognized identifier {id:#x}")]
    Unrecognized { id: u16 },
    /// Text payload is not valid UTF-8.
    #[error("Invalid text payload")]
    InvalidText,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors raised while encoding a typed message into a frame.
pub enum EncodeError {
    /// A 10-bit field received a value above 1023.
    #[error("Value {value} out of range for {field} (max {max})")]
    ValueOutOfRange {
        field: &'static str,
        value: u16,
        max: u16,
    },
    /// Payload does not fit the slot reserved for it.
    #[error("Payload too long -> max: {max}, actual: {actual}")]
    PayloadTooLong { max: usize, actual: usize },
    /// Data id collides with another setup identifier.
    #[error("Reserved data id {data_id:#04x}")]
    ReservedDataId { data_id: u8 },
    /// Frame construction failed.
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),
}

//==================================================================================HEARTBEAT_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Failures while tracking module liveness.
pub enum HeartbeatError {
    /// No free slot left for a new module UUID.
    #[error("Heartbeat table full (capacity {capacity})")]
    TableFull { capacity: usize },
}

//==================================================================================SETUP_ERROR
#[derive(Error, Debug)]
/// Errors encountered while building or handling setup exchanges.
pub enum SetupError<E: core::fmt::Debug = core::convert::Infallible> {
    /// Reply could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// Incoming setup frame could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The persistence collaborator failed.
    #[error("Module store error: {0:?}")]
    Store(E),
}

//==================================================================================QUEUE_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// The interrupt-fed receive queue was full; the frame has been dropped.
#[error("Receive queue overflow ({dropped} frames dropped)")]
pub struct ReceiveQueueOverflow {
    /// Number of frames dropped since the queue was created.
    pub dropped: u32,
}

//==================================================================================NODE_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Failure of a single node step (one received frame or one tick).
pub enum StepError {
    /// Received frame is malformed; the runner drops it.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// Outgoing frame could not be built.
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// Heartbeat from one module too many; the runner drops it.
    #[error(transparent)]
    Heartbeat(#[from] HeartbeatError),
}

#[derive(Debug, Error)]
/// Errors surfaced by the node runner and the discovery helper.
pub enum NodeError<E: core::fmt::Debug> {
    /// CAN layer refused or failed to send the frame.
    #[error("CAN bus send error: {0:?}")]
    Send(E),
    /// Unable to receive frames from the bus.
    #[error("CAN bus receive error: {0:?}")]
    Receive(E),
    /// Outgoing message could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}
