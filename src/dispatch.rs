use crate::{
    activity::{ActivityMonitor, ActivityState},
    calibrate::{calibrate, Calibration},
    config::{OutputPolicy, SentioConfig},
    gesture::{GestureClassifier, GestureState},
    io::{TouchSink, TouchSource, TriggerSink},
    trace::{TickOutcome, TickTrace},
    types::{CalibratedPoint, GestureMode, GestureVerdict, RawSample, TriggerKind},
};

struct DispatchContext {
    now_ms: u32,
    verdict: Option<GestureVerdict>,
    fired: [Option<TriggerKind>; 2],
    flushed: Option<CalibratedPoint>,
}

impl DispatchContext {
    fn new(now_ms: u32) -> Self {
        Self {
            now_ms,
            verdict: None,
            fired: [None; 2],
            flushed: None,
        }
    }

    fn fire<T: TriggerSink>(&mut self, triggers: &mut T, kind: TriggerKind) {
        triggers.fire(kind);
        for slot in &mut self.fired {
            if slot.is_none() {
                *slot = Some(kind);
                return;
            }
        }
    }

    fn finish(
        self,
        outcome: TickOutcome,
        activity: ActivityState,
        gesture_mode: GestureMode,
    ) -> TickTrace {
        TickTrace {
            now_ms: self.now_ms,
            outcome,
            verdict: self.verdict,
            fired: self.fired,
            flushed: self.flushed,
            activity,
            gesture_mode,
        }
    }
}

/// Runs the whole sanitizing pipeline once per scheduler tick.
///
/// The dispatcher owns the source and every piece of pipeline state; sinks are
/// lent per tick so trigger handlers can borrow from the caller.
pub struct FrameDispatcher<S> {
    config: SentioConfig,
    calibration: Calibration,
    source: Option<S>,
    activity: ActivityMonitor,
    gesture: GestureClassifier,
    contact_active: bool,
    /// Latest point of a debounced contact that has not reached the sink yet.
    held: Option<CalibratedPoint>,
}

impl<S: TouchSource> FrameDispatcher<S> {
    /// Creates an unbound dispatcher. `now_ms` seeds the idle timer.
    pub fn new(config: SentioConfig, now_ms: u32) -> Self {
        Self {
            config,
            calibration: config.calibration(),
            source: None,
            activity: ActivityMonitor::new(
                config.sleep_timeout_ms,
                config.suppress_wake_click,
                now_ms,
            ),
            gesture: GestureClassifier::new(config.debounce_threshold_ms),
            contact_active: false,
            held: None,
        }
    }

    pub fn with_source(config: SentioConfig, source: S, now_ms: u32) -> Self {
        let mut dispatcher = Self::new(config, now_ms);
        dispatcher.source = Some(source);
        dispatcher
    }

    /// Binds `source`, returning the previously bound one.
    pub fn bind_source(&mut self, source: S) -> Option<S> {
        self.source.replace(source)
    }

    pub fn unbind_source(&mut self) -> Option<S> {
        self.source.take()
    }

    pub fn source_mut(&mut self) -> Option<&mut S> {
        self.source.as_mut()
    }

    pub fn config(&self) -> &SentioConfig {
        &self.config
    }

    pub fn activity_state(&self) -> ActivityState {
        self.activity.state()
    }

    pub fn gesture_state(&self) -> GestureState {
        self.gesture.state()
    }

    pub fn contact_active(&self) -> bool {
        self.contact_active
    }

    pub fn tick<O, T>(&mut self, now_ms: u32, sink: &mut O, triggers: &mut T) -> TickTrace
    where
        O: TouchSink,
        T: TriggerSink,
    {
        let mut context = DispatchContext::new(now_ms);
        if self.source.is_none() {
            return self.finish(context, TickOutcome::Unbound);
        }
        let sample = self.source.as_mut().and_then(|source| source.poll());

        let contact_busy = self.contact_active || sample.is_some();
        if let Some(kind) = self.activity.check_idle(now_ms, contact_busy) {
            context.fire(triggers, kind);
        }

        let outcome = match sample {
            None if self.contact_active => {
                self.release(&mut context, sink, triggers);
                TickOutcome::Released
            }
            None => TickOutcome::Idle,
            Some(raw) => self.process_contact(&mut context, raw, sink, triggers),
        };
        self.finish(context, outcome)
    }

    fn process_contact<O, T>(
        &mut self,
        context: &mut DispatchContext,
        raw: RawSample,
        sink: &mut O,
        triggers: &mut T,
    ) -> TickOutcome
    where
        O: TouchSink,
        T: TriggerSink,
    {
        let now_ms = context.now_ms;
        if self.config.debug_raw_touch {
            log::debug!(
                "raw: id={} x={} y={} pressure={}",
                raw.id,
                raw.x,
                raw.y,
                raw.pressure
            );
        }

        self.contact_active = true;
        let admission = self.activity.on_contact(now_ms);
        if admission.woke() {
            context.fire(triggers, TriggerKind::Wake);
        }
        if admission.is_suppressed() {
            return TickOutcome::Suppressed;
        }

        let point = calibrate(raw, &self.calibration);
        if let Some(verdict) = self.gesture.sample(now_ms, point) {
            context.verdict = Some(verdict);
            if let Some(kind) = verdict.trigger() {
                context.fire(triggers, kind);
            }
        }
        self.forward(now_ms, point, sink)
    }

    fn forward<O: TouchSink>(
        &mut self,
        now_ms: u32,
        point: CalibratedPoint,
        sink: &mut O,
    ) -> TickOutcome {
        if self.config.output_policy == OutputPolicy::Debounced {
            let age_ms = now_ms.wrapping_sub(self.gesture.state().start_ms);
            if age_ms < self.config.debounce_threshold_ms {
                self.held = Some(point);
                return TickOutcome::Held;
            }
        }
        // Anything still held is older than `point`.
        self.held = None;
        sink.push(point);
        TickOutcome::Forwarded(point)
    }

    fn release<O, T>(&mut self, context: &mut DispatchContext, sink: &mut O, triggers: &mut T)
    where
        O: TouchSink,
        T: TriggerSink,
    {
        let verdict = self.gesture.release(context.now_ms);
        if let Some(verdict) = verdict {
            context.verdict = Some(verdict);
            if let Some(kind) = verdict.trigger() {
                context.fire(triggers, kind);
            }
        }
        // Noise never reaches the sink; any other held contact does, before the clear.
        let held = self.held.take();
        if let Some(point) = held.filter(|_| verdict != Some(GestureVerdict::Noise)) {
            sink.push(point);
            context.flushed = Some(point);
        }
        sink.clear();
        self.activity.release();
        self.contact_active = false;
    }

    fn finish(&self, context: DispatchContext, outcome: TickOutcome) -> TickTrace {
        context.finish(outcome, self.activity.state(), self.gesture.state().mode)
    }
}
