//! Module discovery and configuration over identifiers `0x600`-`0x7FF`.
//!
//! * `0x7FF`: unaddressed request, every module answers with its description.
//! * `0x780 | id`: info replies, sender UUID in the extended identifier.
//! * `0x600 | id`: name write (`id` 0) or data slot write, target UUID in
//!   bytes 0-1. Every module sees every write and drops the ones addressed
//!   to another UUID.
pub mod discovery;
pub mod message;
pub mod responder;

pub use message::{request, reply, set_data, set_name, SetupMessage};

/// Reply data id carrying the first eight bytes of the module name.
pub const INFO_NAME_HEAD: u8 = 0x00;
/// Reply data id carrying the remaining bytes of the module name.
pub const INFO_NAME_TAIL: u8 = 0x01;
/// Reply data id carrying the module type and board version codes.
pub const INFO_MODULE_TYPE: u8 = 0x02;

/// Byte 2 marker of a name write.
pub const NAME_DATA_ID: u8 = 0xFF;

/// Largest reply data id: `0x7F` would produce identifier `0x7FF` (request).
pub const MAX_REPLY_DATA_ID: u8 = 0x7E;
