//! Collaborator seams of the pipeline: where raw samples come from, where
//! calibrated points go, and who hears about triggers.

use crate::types::{CalibratedPoint, RawSample, TriggerKind};

/// Read side of the touch controller.
pub trait TouchSource {
    /// The contact currently reported by the controller, if any.
    fn poll(&mut self) -> Option<RawSample>;
}

/// Write side consumed by rendering/UI.
pub trait TouchSink {
    fn push(&mut self, point: CalibratedPoint);
    /// Drops whatever the sink holds for the current contact.
    fn clear(&mut self);
}

pub trait TriggerSink {
    fn fire(&mut self, kind: TriggerKind);
}

/// A level-style source: whatever sample is stored stays reported until replaced.
impl TouchSource for Option<RawSample> {
    fn poll(&mut self) -> Option<RawSample> {
        *self
    }
}

impl<T: TouchSource + ?Sized> TouchSource for &mut T {
    fn poll(&mut self) -> Option<RawSample> {
        (**self).poll()
    }
}

impl<T: TouchSink + ?Sized> TouchSink for &mut T {
    fn push(&mut self, point: CalibratedPoint) {
        (**self).push(point);
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}

impl<T: TriggerSink + ?Sized> TriggerSink for &mut T {
    fn fire(&mut self, kind: TriggerKind) {
        (**self).fire(kind);
    }
}

/// Discards every trigger.
impl TriggerSink for () {
    fn fire(&mut self, _kind: TriggerKind) {}
}

/// Discards every point.
impl TouchSink for () {
    fn push(&mut self, _point: CalibratedPoint) {}

    fn clear(&mut self) {}
}

/// Bounded point buffer; when full the oldest point is dropped.
impl<const N: usize> TouchSink for heapless::Vec<CalibratedPoint, N> {
    fn push(&mut self, point: CalibratedPoint) {
        if heapless::Vec::push(self, point).is_err() {
            if !self.is_empty() {
                let _ = self.remove(0);
            }
            let _ = heapless::Vec::push(self, point);
        }
    }

    fn clear(&mut self) {
        heapless::Vec::clear(self);
    }
}

/// Bounded trigger log; triggers past capacity are dropped.
impl<const N: usize> TriggerSink for heapless::Vec<TriggerKind, N> {
    fn fire(&mut self, kind: TriggerKind) {
        if self.push(kind).is_err() {
            log::warn!("trigger log full; dropped {}", kind.name());
        }
    }
}

/// One optional handler per trigger kind. Kinds without a handler are ignored.
pub struct TriggerTable<'a> {
    slots: [Option<&'a mut dyn FnMut()>; TriggerKind::COUNT],
}

impl Default for TriggerTable<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> TriggerTable<'a> {
    pub fn new() -> Self {
        Self {
            slots: Default::default(),
        }
    }

    /// Installs `handler` for `kind`, replacing any previous one.
    pub fn register(&mut self, kind: TriggerKind, handler: &'a mut dyn FnMut()) -> &mut Self {
        self.slots[kind.index()] = Some(handler);
        self
    }

    pub fn with(mut self, kind: TriggerKind, handler: &'a mut dyn FnMut()) -> Self {
        self.register(kind, handler);
        self
    }

    pub fn unregister(&mut self, kind: TriggerKind) {
        self.slots[kind.index()] = None;
    }

    pub fn is_registered(&self, kind: TriggerKind) -> bool {
        self.slots[kind.index()].is_some()
    }
}

impl TriggerSink for TriggerTable<'_> {
    fn fire(&mut self, kind: TriggerKind) {
        if let Some(handler) = self.slots[kind.index()].as_deref_mut() {
            handler();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_only_calls_registered_handlers() {
        let mut taps = 0u32;
        let mut wakes = 0u32;
        let mut on_tap = || taps += 1;
        let mut on_wake = || wakes += 1;
        {
            let mut table = TriggerTable::new()
                .with(TriggerKind::Tap, &mut on_tap)
                .with(TriggerKind::Wake, &mut on_wake);
            assert!(table.is_registered(TriggerKind::Tap));
            assert!(!table.is_registered(TriggerKind::Sleep));

            table.fire(TriggerKind::Tap);
            table.fire(TriggerKind::Tap);
            table.fire(TriggerKind::Sleep);
            table.fire(TriggerKind::Wake);

            table.unregister(TriggerKind::Wake);
            table.fire(TriggerKind::Wake);
        }
        assert_eq!(taps, 2);
        assert_eq!(wakes, 1);
    }

    #[test]
    fn slot_source_reports_until_replaced() {
        let mut source = Some(RawSample::at(4, 5));
        assert_eq!(source.poll(), Some(RawSample::at(4, 5)));
        assert_eq!(source.poll(), Some(RawSample::at(4, 5)));
        source = None;
        assert_eq!(source.poll(), None);
    }

    #[test]
    fn bounded_point_sink_keeps_newest() {
        let mut sink: heapless::Vec<CalibratedPoint, 2> = heapless::Vec::new();
        for x in 0..3 {
            TouchSink::push(
                &mut sink,
                CalibratedPoint {
                    x,
                    ..CalibratedPoint::default()
                },
            );
        }
        let xs: std::vec::Vec<u32> = sink.iter().map(|p| p.x).collect();
        assert_eq!(xs, std::vec![1, 2]);

        TouchSink::clear(&mut sink);
        assert!(sink.is_empty());
    }

    #[test]
    fn bounded_trigger_log_drops_overflow() {
        let mut fired: heapless::Vec<TriggerKind, 1> = heapless::Vec::new();
        fired.fire(TriggerKind::Sleep);
        fired.fire(TriggerKind::Wake);
        assert_eq!(fired.as_slice(), &[TriggerKind::Sleep]);
    }
}
