//! Liveness tracking built on the heartbeat categories.
//!
//! A module is `Alive` while its heartbeats keep arriving and turns `Lost`
//! once no heartbeat has been seen for longer than the timeout. There is no
//! emergency-stop message on the bus: the controller stops emitting the drive
//! heartbeat and every vehicle detects the silence on its own.
pub mod drive_heartbeat;
pub mod monitor;
pub mod shared;

pub use drive_heartbeat::DriveHeartbeat;
pub use monitor::{HeartbeatMonitor, HeartbeatRecord, LivenessState};
pub use shared::SharedMonitor;
