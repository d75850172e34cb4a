use crate::{
    activity::ActivityState,
    types::{CalibratedPoint, GestureMode, GestureVerdict, TriggerKind},
};

/// What a tick did with the sample it read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TickOutcome {
    /// No source bound.
    Unbound,
    /// No contact this tick and none before.
    #[default]
    Idle,
    /// The previous contact was lifted.
    Released,
    /// The wake-click trap swallowed the sample.
    Suppressed,
    /// Admitted and kept as the contact's pending point until it outlives the
    /// debounce window.
    Held,
    Forwarded(CalibratedPoint),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickTrace {
    pub now_ms: u32,
    pub outcome: TickOutcome,
    pub verdict: Option<GestureVerdict>,
    pub fired: [Option<TriggerKind>; 2],
    /// Held debounced point pushed by the release on this tick.
    pub flushed: Option<CalibratedPoint>,
    pub activity: ActivityState,
    pub gesture_mode: GestureMode,
}

impl TickTrace {
    pub fn triggers(&self) -> impl Iterator<Item = TriggerKind> + '_ {
        self.fired.iter().flatten().copied()
    }

    pub fn fired(&self, kind: TriggerKind) -> bool {
        self.triggers().any(|fired| fired == kind)
    }

    /// The point this tick pushed to the sink, if any.
    pub fn forwarded(&self) -> Option<CalibratedPoint> {
        match self.outcome {
            TickOutcome::Forwarded(point) => Some(point),
            _ => self.flushed,
        }
    }
}
