//! Async loop gluing a [`LocoNode`] to a bus and a timer.
use core::convert::Infallible;

use embassy_time::Duration;
use futures_util::future::{select, Either};
use futures_util::pin_mut;

use crate::error::{NodeError, StepError};
use crate::protocol::node::{LocoNode, Outbox};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::{can_bus::CanBus, loco_timer::LocoTimer};

enum Event<E> {
    Frame(Result<CanFrame, E>),
    Tick,
}

/// Run `node` forever.
///
/// Waits for whichever comes first, a received frame or the next tick, and
/// sends whatever the node produced. Malformed frames and heartbeats that do
/// not fit the liveness table are dropped; bus failures and encoding failures
/// end the loop.
pub async fn run_node<C: CanBus, T: LocoTimer, L: LocoNode>(
    can_bus: &mut C,
    timer: &mut T,
    node: &mut L,
) -> Result<Infallible, NodeError<C::Error>> {
    let mut next_tick = timer.now();

    loop {
        let wait_ms = next_tick
            .checked_duration_since(timer.now())
            .map_or(0, |remaining| remaining.as_millis() as u32);

        let event = {
            let delay = timer.delay_ms(wait_ms);
            let recv = can_bus.recv();
            pin_mut!(delay);
            pin_mut!(recv);
            match select(recv, delay).await {
                Either::Left((frame, _)) => Event::Frame(frame),
                Either::Right(_) => Event::Tick,
            }
        };

        let now = timer.now();
        let mut outbox = Outbox::new();

        if let Event::Frame(frame) = event {
            let frame = frame.map_err(NodeError::Receive)?;
            settle(node.on_frame(&frame, now, &mut outbox))?;
        }
        if now >= next_tick {
            settle(node.on_tick(now, &mut outbox))?;
            next_tick = now + Duration::from_millis(node.tick_ms() as u64);
        }

        for frame in outbox.iter() {
            can_bus.send(frame).await.map_err(NodeError::Send)?;
        }
    }
}

/// Drop per-frame failures, keep the fatal ones.
fn settle<E: core::fmt::Debug>(step: Result<(), StepError>) -> Result<(), NodeError<E>> {
    match step {
        Ok(()) => Ok(()),
        Err(StepError::Encode(err)) => Err(NodeError::Encode(err)),
        Err(StepError::Decode(_err)) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("Malformed frame dropped: {}", defmt::Debug2Format(&_err));
            Ok(())
        }
        Err(StepError::Heartbeat(_err)) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("Heartbeat dropped: {}", defmt::Debug2Format(&_err));
            Ok(())
        }
    }
}
