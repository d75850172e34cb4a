//! Embassy glue: a ticker-driven pipeline task and a channel-backed trigger sink.

use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel};
use embassy_time::{Duration, Instant, Ticker};

use crate::{
    dispatch::FrameDispatcher,
    io::{TouchSink, TouchSource, TriggerSink},
    types::TriggerKind,
};

/// Queues triggers for another task. A full queue drops the trigger.
pub struct ChannelTriggers<'ch, M: RawMutex, const N: usize> {
    channel: &'ch Channel<M, TriggerKind, N>,
    dropped: u32,
}

impl<'ch, M: RawMutex, const N: usize> ChannelTriggers<'ch, M, N> {
    pub const fn new(channel: &'ch Channel<M, TriggerKind, N>) -> Self {
        Self {
            channel,
            dropped: 0,
        }
    }

    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl<M: RawMutex, const N: usize> TriggerSink for ChannelTriggers<'_, M, N> {
    fn fire(&mut self, kind: TriggerKind) {
        if self.channel.try_send(kind).is_err() {
            self.dropped = self.dropped.saturating_add(1);
            log::warn!("trigger queue full; dropped {}", kind.name());
        }
    }
}

/// The pipeline clock. Truncation to `u32` is fine: all elapsed-time math wraps.
pub fn clock_ms() -> u32 {
    Instant::now().as_millis() as u32
}

/// Ticks `dispatcher` every `period` forever.
pub async fn run_pipeline<S, O, T>(
    dispatcher: &mut FrameDispatcher<S>,
    sink: &mut O,
    triggers: &mut T,
    period: Duration,
) -> !
where
    S: TouchSource,
    O: TouchSink,
    T: TriggerSink,
{
    let mut ticker = Ticker::every(period);
    loop {
        let trace = dispatcher.tick(clock_ms(), sink, triggers);
        if trace.verdict.is_some() {
            log::trace!("tick {} -> {:?}", trace.now_ms, trace.verdict);
        }
        ticker.next().await;
    }
}
