//! Multi-traction reference carried inside drive commands.
//!
//! When several vehicles run as one train, the drive command names the main
//! locomotive. Its 16-bit UUID is split into three fragments stored in the
//! six spare bits above the 10-bit values of bytes 2, 4 and 6:
//!
//! ```text
//! byte 2 bits 2-7 : UUID bits 10-15
//! byte 4 bits 2-7 : UUID bits 4-9
//! byte 6 bits 2-5 : UUID bits 0-3
//! byte 6 bits 6-7 : reserved, always 0
//! ```
use crate::core::Uuid;
use crate::error::DecodeError;

/// Width of each fragment slot in bits.
pub const FRAGMENT_SLOT_BITS: u8 = 6;

/// Reserved bits of the last fragment slot.
const LAST_FRAGMENT_RESERVED: u8 = 0b11_0000;

#[derive(Clone, Copy, Debug, Default, Eq)]
/// Multi-traction grouping of a drive command.
pub struct MultiTractionRef {
    pub active: bool,
    /// Main locomotive UUID; only meaningful while `active` is set.
    pub main_uuid: Uuid,
}

impl MultiTractionRef {
    /// Single locomotive, no grouping.
    pub const fn inactive() -> Self {
        Self {
            active: false,
            main_uuid: 0,
        }
    }

    /// Group driven as one unit under `main_uuid`.
    pub const fn main(main_uuid: Uuid) -> Self {
        Self {
            active: true,
            main_uuid,
        }
    }

    /// Main UUID when the grouping is active.
    pub fn main_uuid(&self) -> Option<Uuid> {
        self.active.then_some(self.main_uuid)
    }
}

impl PartialEq for MultiTractionRef {
    fn eq(&self, other: &Self) -> bool {
        self.main_uuid() == other.main_uuid()
    }
}

/// Split a UUID into the three fragment slots (bytes 2, 4, 6).
pub fn split(uuid: Uuid) -> [u8; 3] {
    [
        (uuid >> 10) as u8 & 0x3F,
        (uuid >> 4) as u8 & 0x3F,
        uuid as u8 & 0x0F,
    ]
}

/// Rebuild a UUID from the three fragment slots.
pub fn join(fragments: [u8; 3]) -> Result<Uuid, DecodeError> {
    let reserved = fragments[2] & LAST_FRAGMENT_RESERVED;
    if reserved != 0 {
        return Err(DecodeError::ReservedBits {
            bits: reserved << 2,
        });
    }
    Ok(((fragments[0] as Uuid & 0x3F) << 10)
        | ((fragments[1] as Uuid & 0x3F) << 4)
        | (fragments[2] as Uuid & 0x0F))
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
