//! Runtime tunables of a node. The defaults are the bus-wide constants every
//! module agrees on; only tests and bench setups should need to change them.
use embassy_time::Duration;

use crate::protocol::transport::{
    DISCOVERY_WINDOW_MS, HEARTBEAT_INTERVAL_MS, MODULE_HEARTBEAT_TIMEOUT_MS, STATUS_INTERVAL_MS,
};

/// Default period of the node tick (ms).
pub const DEFAULT_TICK_MS: u32 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeConfig {
    /// Silence after which a module is lost.
    pub heartbeat_timeout: Duration,
    /// Cadence of emitted heartbeats.
    pub heartbeat_interval: Duration,
    /// Cadence of drive commands and vehicle status.
    pub status_interval: Duration,
    /// Listening window of module discovery (ms).
    pub discovery_window_ms: u32,
    /// Period of the node tick (ms).
    pub tick_ms: u32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            heartbeat_timeout: Duration::from_millis(MODULE_HEARTBEAT_TIMEOUT_MS),
            heartbeat_interval: Duration::from_millis(HEARTBEAT_INTERVAL_MS),
            status_interval: Duration::from_millis(STATUS_INTERVAL_MS),
            discovery_window_ms: DISCOVERY_WINDOW_MS,
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}
