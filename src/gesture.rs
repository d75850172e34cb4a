use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use crate::types::{CalibratedPoint, GestureMode, GestureVerdict, SwipeDirection};

/// Horizontal travel from the contact origin that turns it into a swipe.
pub const SWIPE_THRESHOLD_PX: u32 = 30;
/// Longest contact still reported as a tap.
pub const MAX_TAP_DURATION_MS: u32 = 400;

/// Per-contact bookkeeping. Start fields are only meaningful outside `Idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GestureState {
    pub mode: GestureMode,
    pub start_x: u32,
    pub start_y: u32,
    pub start_ms: u32,
}

#[derive(Clone, Copy, Debug)]
enum GestureHsmEvent {
    Sample { now_ms: u32, point: CalibratedPoint },
    Release { now_ms: u32 },
}

#[derive(Clone, Copy, Debug, Default)]
struct DispatchContext {
    verdict: Option<GestureVerdict>,
}

pub struct GestureClassifier {
    machine: statig::blocking::StateMachine<GestureHsm>,
}

impl GestureClassifier {
    pub fn new(debounce_threshold_ms: u32) -> Self {
        Self {
            machine: GestureHsm::new(debounce_threshold_ms).state_machine(),
        }
    }

    /// Feeds one calibrated sample of the current contact. Yields a swipe verdict
    /// on the tick the contact crosses the threshold.
    pub fn sample(&mut self, now_ms: u32, point: CalibratedPoint) -> Option<GestureVerdict> {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&GestureHsmEvent::Sample { now_ms, point }, &mut context);
        context.verdict
    }

    /// Classifies the contact that was just lifted and returns to idle.
    pub fn release(&mut self, now_ms: u32) -> Option<GestureVerdict> {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&GestureHsmEvent::Release { now_ms }, &mut context);
        context.verdict
    }

    pub fn state(&self) -> GestureState {
        self.machine.inner().state
    }
}

struct GestureHsm {
    debounce_threshold_ms: u32,
    state: GestureState,
}

impl GestureHsm {
    fn new(debounce_threshold_ms: u32) -> Self {
        Self {
            debounce_threshold_ms,
            state: GestureState::default(),
        }
    }

    fn begin_contact(&mut self, now_ms: u32, point: CalibratedPoint) {
        self.state = GestureState {
            mode: GestureMode::Pending,
            start_x: point.x,
            start_y: point.y,
            start_ms: now_ms,
        };
    }

    fn end_contact(&mut self) {
        self.state.mode = GestureMode::Idle;
    }

    fn classify_release(&self, now_ms: u32) -> GestureVerdict {
        let duration_ms = now_ms.wrapping_sub(self.state.start_ms);
        if duration_ms < self.debounce_threshold_ms {
            log::debug!("ignored noise pulse (<{}ms)", self.debounce_threshold_ms);
            GestureVerdict::Noise
        } else if duration_ms < MAX_TAP_DURATION_MS {
            log::debug!("tap after {}ms", duration_ms);
            GestureVerdict::Tap
        } else {
            log::debug!("static hold of {}ms, no trigger", duration_ms);
            GestureVerdict::Hold
        }
    }
}

#[state_machine(initial = "State::idle()")]
impl GestureHsm {
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &GestureHsmEvent) -> Outcome<State> {
        let _ = context;
        match event {
            GestureHsmEvent::Sample { now_ms, point } => {
                self.begin_contact(*now_ms, *point);
                Transition(State::pending())
            }
            GestureHsmEvent::Release { .. } => Handled,
        }
    }

    #[state]
    fn pending(&mut self, context: &mut DispatchContext, event: &GestureHsmEvent) -> Outcome<State> {
        match event {
            GestureHsmEvent::Sample { point, .. } => {
                let dx = i64::from(point.x) - i64::from(self.state.start_x);
                if dx.unsigned_abs() <= u64::from(SWIPE_THRESHOLD_PX) {
                    return Handled;
                }
                let direction = if dx > 0 {
                    SwipeDirection::Right
                } else {
                    SwipeDirection::Left
                };
                log::debug!("swipe {:?} dx={}", direction, dx);
                self.state.mode = GestureMode::ConfirmedDrag;
                context.verdict = Some(GestureVerdict::Swipe(direction));
                Transition(State::dragging())
            }
            GestureHsmEvent::Release { now_ms } => {
                context.verdict = Some(self.classify_release(*now_ms));
                self.end_contact();
                Transition(State::idle())
            }
        }
    }

    #[state]
    fn dragging(&mut self, context: &mut DispatchContext, event: &GestureHsmEvent) -> Outcome<State> {
        match event {
            // The swipe already fired; the rest of the contact is consumed.
            GestureHsmEvent::Sample { .. } => Handled,
            GestureHsmEvent::Release { .. } => {
                context.verdict = Some(GestureVerdict::DragReleased);
                self.end_contact();
                Transition(State::idle())
            }
        }
    }
}

#[cfg(test)]
mod tests;
