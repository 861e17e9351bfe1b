//! Abstraction traits used by the protocol layer (CAN bus, timer, and module store).
pub mod can_bus;
pub mod loco_timer;
pub mod module_store;
