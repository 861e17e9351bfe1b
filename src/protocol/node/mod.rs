//! Event-driven node state machines and the async loop that drives them.
//!
//! A node reacts to two kinds of events: a received frame and a periodic
//! tick. Both take the current instant and push the frames to send into an
//! [`Outbox`]; the node itself never touches the bus or the clock.
pub mod config;
pub mod controller;
pub mod runner;
pub mod vehicle;

pub use config::NodeConfig;
pub use controller::ControllerNode;
pub use runner::run_node;
pub use vehicle::{VehicleNode, VehicleSensors};

use embassy_time::Instant;

use crate::error::StepError;
use crate::protocol::transport::can_frame::CanFrame;

/// Frames produced by one step.
pub const OUTBOX_CAPACITY: usize = 4;

pub type Outbox = heapless::Vec<CanFrame, OUTBOX_CAPACITY>;

/// Contract between a node state machine and [`run_node`].
pub trait LocoNode {
    /// Handle one received frame.
    fn on_frame(
        &mut self,
        frame: &CanFrame,
        now: Instant,
        outbox: &mut Outbox,
    ) -> Result<(), StepError>;

    /// Periodic step: liveness checks and scheduled transmissions.
    fn on_tick(&mut self, now: Instant, outbox: &mut Outbox) -> Result<(), StepError>;

    /// Period of [`LocoNode::on_tick`] in milliseconds.
    fn tick_ms(&self) -> u32;
}

/// Queue `frame` for sending. A full outbox drops the frame; periodic
/// traffic is sent again on a later tick.
pub(crate) fn emit(outbox: &mut Outbox, frame: CanFrame) {
    if let Err(_frame) = outbox.push(frame) {
        #[cfg(feature = "defmt")]
        defmt::warn!("Outbox full, frame {=u16:#x} dropped", _frame.id().base());
    }
}

/// Whether a periodic transmission last sent at `last` is due at `now`.
pub(crate) fn is_due(last: Option<Instant>, now: Instant, interval: embassy_time::Duration) -> bool {
    last.map_or(true, |last| now.saturating_duration_since(last) >= interval)
}
