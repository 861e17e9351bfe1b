//! Creation and decomposition of LOCO-CAN identifiers.
//!
//! Every message category lives in the 11-bit standard identifier space.
//! Setup replies additionally use the 29-bit extended form: the top 11 bits
//! repeat the category identifier and the low 18 bits carry the sender UUID,
//! so a reply can never be mistaken for an 11-bit setup write.
use crate::core::Uuid;
use crate::error::FrameError;
use core::cmp::Ordering;
use embedded_can::{ExtendedId, Id, StandardId};

/// Largest 11-bit identifier.
pub const MAX_STANDARD_ID: u16 = 0x7FF;

/// Width of the extension field of a 29-bit identifier.
const EXTENSION_BITS: u32 = 18;
const EXTENSION_MASK: u32 = (1 << EXTENSION_BITS) - 1;

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Wraps an `embedded_can` identifier and exposes the LOCO-CAN view of it.
pub struct CanId(Id);

impl CanId {
    /// Standard 11-bit identifier. Fails above `0x7FF`.
    pub fn standard(raw: u16) -> Result<Self, FrameError> {
        StandardId::new(raw)
            .map(|id| Self(Id::Standard(id)))
            .ok_or(FrameError::InvalidIdentifier { raw: raw as u32 })
    }

    /// Extended identifier whose top 11 bits hold `base` and whose extension
    /// carries `uuid`.
    pub fn with_uuid(base: u16, uuid: Uuid) -> Result<Self, FrameError> {
        if base > MAX_STANDARD_ID {
            return Err(FrameError::InvalidIdentifier { raw: base as u32 });
        }
        let raw = ((base as u32) << EXTENSION_BITS) | uuid as u32;
        ExtendedId::new(raw)
            .map(|id| Self(Id::Extended(id)))
            .ok_or(FrameError::InvalidIdentifier { raw })
    }

    /// Underlying `embedded_can` identifier.
    pub fn inner(&self) -> Id {
        self.0
    }

    /// 11-bit category identifier, for both standard and extended forms.
    pub fn base(&self) -> u16 {
        match self.0 {
            Id::Standard(id) => id.as_raw(),
            Id::Extended(id) => (id.as_raw() >> EXTENSION_BITS) as u16,
        }
    }

    /// 18-bit extension of an extended identifier.
    pub fn extension(&self) -> Option<u32> {
        match self.0 {
            Id::Standard(_) => None,
            Id::Extended(id) => Some(id.as_raw() & EXTENSION_MASK),
        }
    }

    /// UUID carried in the extension, if any.
    pub fn sender_uuid(&self) -> Option<Uuid> {
        self.extension()
            .filter(|ext| *ext <= Uuid::MAX as u32)
            .map(|ext| ext as Uuid)
    }

    pub fn is_extended(&self) -> bool {
        matches!(self.0, Id::Extended(_))
    }

    /// Compare against `pattern` on the bits selected by `mask` (base only).
    pub fn matches(&self, mask: u16, pattern: u16) -> bool {
        matches(self.base(), mask, pattern)
    }

    /// Whether `self` wins bus arbitration against `other`.
    pub fn arbitrates_before(&self, other: &CanId) -> bool {
        self.arbitration_cmp(other) == Ordering::Less
    }

    /// Arbitration order: lower base wins, then a standard identifier beats an
    /// extended one (recessive IDE bit), then lower extension wins.
    pub fn arbitration_cmp(&self, other: &CanId) -> Ordering {
        let key = |id: &CanId| (id.base(), id.is_extended(), id.extension().unwrap_or(0));
        key(self).cmp(&key(other))
    }
}

impl From<CanId> for Id {
    fn from(id: CanId) -> Self {
        id.0
    }
}

impl From<Id> for CanId {
    fn from(id: Id) -> Self {
        Self(id)
    }
}

impl From<StandardId> for CanId {
    fn from(id: StandardId) -> Self {
        Self(Id::Standard(id))
    }
}

/// Generic mask-filtered comparison: bits set in `mask` must equal `pattern`.
pub fn matches(identifier: u16, mask: u16, pattern: u16) -> bool {
    identifier & mask == pattern & mask
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
