//! Persistence collaborator for module identity and configuration
//! (EEPROM-backed on real boards).
use crate::core::{Module, Uuid};

/// Storage of the module record and its data slots.
pub trait ModuleStore {
    type Error: core::fmt::Debug;

    /// Load the module record stored for `uuid`. Implementations return a
    /// defaulted record when nothing valid is stored.
    fn load(&mut self, uuid: Uuid) -> Result<Module, Self::Error>;

    /// Persist the module record.
    fn save(&mut self, module: &Module) -> Result<(), Self::Error>;

    /// Persist the value of a data slot (`0x01..=0xFE`).
    fn write_data(&mut self, uuid: Uuid, data_id: u8, value: &[u8]) -> Result<(), Self::Error>;
}
