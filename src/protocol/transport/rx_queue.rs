//! Interrupt-fed receive queue and a channel-backed [`CanBus`].
//!
//! The transceiver interrupt (or DMA completion handler) pushes frames with
//! [`RxQueue::push`]; the protocol task pulls them in FIFO order. A full
//! queue drops the new frame and reports [`ReceiveQueueOverflow`]; nothing is
//! retried at this layer.
//!
//! Firmware provides pre-allocated queues (typically in a `static`), so no
//! allocation is performed by the library.
use core::cell::Cell;
use core::convert::Infallible;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;

use crate::error::ReceiveQueueOverflow;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::can_bus::CanBus;

/// FIFO of received frames with overflow accounting.
pub struct RxQueue<M: RawMutex, const N: usize> {
    channel: Channel<M, CanFrame, N>,
    dropped: Mutex<M, Cell<u32>>,
}

impl<M: RawMutex, const N: usize> RxQueue<M, N> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            dropped: Mutex::new(Cell::new(0)),
        }
    }

    /// Enqueue a received frame. Never blocks; safe to call from an interrupt
    /// when `M` is a critical-section mutex.
    pub fn push(&self, frame: CanFrame) -> Result<(), ReceiveQueueOverflow> {
        if self.channel.try_send(frame).is_ok() {
            return Ok(());
        }
        let dropped = self.dropped.lock(|count| {
            let next = count.get().saturating_add(1);
            count.set(next);
            next
        });
        #[cfg(feature = "defmt")]
        defmt::warn!("Receive queue overflow, {} frames dropped", dropped);
        Err(ReceiveQueueOverflow { dropped })
    }

    /// Next frame, or `None` when the queue is empty (would block).
    pub fn try_recv(&self) -> Option<CanFrame> {
        self.channel.try_receive().ok()
    }

    /// Wait for the next frame.
    pub async fn recv(&self) -> CanFrame {
        self.channel.receive().await
    }

    /// Frames dropped because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.dropped.lock(|count| count.get())
    }

    /// Frames waiting in the queue.
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

impl<M: RawMutex, const N: usize> Default for RxQueue<M, N> {
    fn default() -> Self {
        Self::new()
    }
}

//==================================================================================CHANNEL_BUS
/// [`CanBus`] backed by a receive queue and a transmit channel.
///
/// The protocol task talks to this handle while a driver task drains `tx`
/// into the transceiver and the receive interrupt feeds `rx`.
pub struct ChannelBus<'a, M: RawMutex, const RX: usize, const TX: usize> {
    rx: &'a RxQueue<M, RX>,
    tx: &'a Channel<M, CanFrame, TX>,
}

impl<'a, M: RawMutex, const RX: usize, const TX: usize> ChannelBus<'a, M, RX, TX> {
    pub fn new(rx: &'a RxQueue<M, RX>, tx: &'a Channel<M, CanFrame, TX>) -> Self {
        Self { rx, tx }
    }
}

impl<M: RawMutex, const RX: usize, const TX: usize> CanBus for ChannelBus<'_, M, RX, TX> {
    type Error = Infallible;

    async fn send<'a>(&'a mut self, frame: &'a CanFrame) -> Result<(), Self::Error> {
        self.tx.send(frame.clone()).await;
        Ok(())
    }

    async fn recv(&mut self) -> Result<CanFrame, Self::Error> {
        Ok(self.rx.recv().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    fn frame(id: u16) -> CanFrame {
        CanFrame::standard(id, &[]).unwrap()
    }

    #[test]
    fn fifo_order() {
        let queue: RxQueue<NoopRawMutex, 4> = RxQueue::new();
        queue.push(frame(0x010)).unwrap();
        queue.push(frame(0x400)).unwrap();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.try_recv().unwrap().id().base(), 0x010);
        assert_eq!(queue.try_recv().unwrap().id().base(), 0x400);
        assert!(queue.try_recv().is_none());
    }

    #[test]
    /// Queues live in statics on real boards; the bus handle borrows them.
    fn channel_bus_moves_frames() {
        use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
        use futures_util::FutureExt;
        use static_cell::StaticCell;

        static RX: StaticCell<RxQueue<CriticalSectionRawMutex, 4>> = StaticCell::new();
        static TX: StaticCell<Channel<CriticalSectionRawMutex, CanFrame, 4>> = StaticCell::new();
        let rx: &'static _ = RX.init(RxQueue::new());
        let tx: &'static _ = TX.init(Channel::new());
        let mut bus = ChannelBus::new(rx, tx);

        rx.push(frame(0x010)).unwrap();
        let received = bus.recv().now_or_never().unwrap().unwrap();
        assert_eq!(received.id().base(), 0x010);

        bus.send(&frame(0x500)).now_or_never().unwrap().unwrap();
        assert_eq!(tx.try_receive().unwrap().id().base(), 0x500);
    }

    #[test]
    /// Overflow drops the newest frame and keeps counting.
    fn overflow_is_reported() {
        let queue: RxQueue<NoopRawMutex, 2> = RxQueue::new();
        queue.push(frame(0x100)).unwrap();
        queue.push(frame(0x110)).unwrap();
        assert_eq!(
            queue.push(frame(0x120)),
            Err(ReceiveQueueOverflow { dropped: 1 })
        );
        assert_eq!(
            queue.push(frame(0x130)),
            Err(ReceiveQueueOverflow { dropped: 2 })
        );
        assert_eq!(queue.dropped(), 2);
        assert_eq!(queue.try_recv().unwrap().id().base(), 0x100);
        queue.push(frame(0x140)).unwrap();
    }
}
