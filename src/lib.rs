//! `loco-can` library: the LOCO-CAN field-bus protocol used between the
//! controller and the vehicle/actuator modules of a model railway, for
//! `no_std` targets. The crate exposes the infrastructure modules (bit codec),
//! the transport layer (frames, identifiers, registry), message codecs,
//! heartbeat supervision, the setup protocol, and node state machines.
#![no_std]
//==================================================================================
/// Domain types shared by codecs and protocol logic (module identity, type
/// and board codes).
pub mod core;
/// Frame, codec, liveness, setup and node errors.
pub mod error;
/// Bit-level helpers and the payload codec trait.
pub mod infra;
/// LOCO-CAN protocol implementation: transport, messages, heartbeat
/// supervision, setup protocol and nodes.
pub mod protocol;
//==================================================================================
