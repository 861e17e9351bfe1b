//! Infrastructure shared by every message codec: bit-level access to frame
//! payloads and the encode/decode contract.
pub mod codec;
