//! LOCO-CAN transport layer: frame and identifier representations, the
//! static identifier registry, the interrupt-fed receive queue, and the
//! traits abstracting the bus, the clock and module persistence.
//!
//! ## Bus parameters
//!
//! These constants fix the physical and timing contract every module on the
//! bus agrees on.

pub mod can_frame;
pub mod can_id;
pub mod registry;
pub mod rx_queue;
pub mod traits;

/// Bus bit rate (bit/s).
pub const BUS_BITRATE: u32 = 500_000;

/// Acceptance filter mask.
///
/// A set bit is compared, a cleared bit is ignored. Bit 3 and the low
/// nibble's module-number bits are ignored so that a filter routes by
/// category regardless of which module sent the frame.
pub const CAN_ID_MASK: u16 = 0x770;

/// Classic CAN payload limit.
pub const MAX_FRAME_LEN: usize = 8;

/// Longest module name carried by a single setup write.
pub const SETUP_NAME_MAX_LEN: usize = 5;

/// Longest value carried by a single setup data write.
pub const SETUP_VALUE_MAX_LEN: usize = 6;

/// A module whose heartbeat has not been seen for longer than this is lost (ms).
pub const MODULE_HEARTBEAT_TIMEOUT_MS: u64 = 1000;

/// Cadence of drive and module heartbeats (ms).
///
/// Half the timeout: one lost frame never trips the watchdog, two do.
pub const HEARTBEAT_INTERVAL_MS: u64 = 500;

/// Cadence of drive commands and vehicle status retransmission (ms).
pub const STATUS_INTERVAL_MS: u64 = 250;

/// Listening window after a setup request (ms).
pub const DISCOVERY_WINDOW_MS: u32 = 300;
