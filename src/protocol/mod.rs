//! LOCO-CAN protocol: transport primitives, message codecs, liveness
//! tracking, the setup protocol, and the node state machines.
pub mod heartbeat;
pub mod messages;
pub mod node;
pub mod setup;
pub mod transport;
