/// One contact report as delivered by the touch controller, before calibration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawSample {
    pub id: u8,
    pub x: i32,
    pub y: i32,
    pub pressure: u16,
}

impl RawSample {
    pub const fn at(x: i32, y: i32) -> Self {
        Self {
            id: 0,
            x,
            y,
            pressure: 0,
        }
    }
}

/// A sample mapped into display space. Coordinates never go below zero but are
/// not clamped against the display extent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CalibratedPoint {
    pub id: u8,
    pub x: u32,
    pub y: u32,
    pub pressure: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Payload-free notifications raised by the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TriggerKind {
    Sleep = 0,
    Wake = 1,
    Tap = 2,
    SwipeLeft = 3,
    SwipeRight = 4,
}

impl TriggerKind {
    pub const COUNT: usize = 5;
    pub const ALL: [Self; Self::COUNT] = [
        Self::Sleep,
        Self::Wake,
        Self::Tap,
        Self::SwipeLeft,
        Self::SwipeRight,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Configuration key of the trigger (`on_tap`, `on_swipe_left`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sleep => "on_sleep",
            Self::Wake => "on_wake",
            Self::Tap => "on_tap",
            Self::SwipeLeft => "on_swipe_left",
            Self::SwipeRight => "on_swipe_right",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub const fn swipe(direction: SwipeDirection) -> Self {
        match direction {
            SwipeDirection::Left => Self::SwipeLeft,
            SwipeDirection::Right => Self::SwipeRight,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum GestureMode {
    #[default]
    Idle = 0,
    Pending = 1,
    ConfirmedDrag = 2,
}

impl GestureMode {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// What the gesture classifier concluded on a given tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureVerdict {
    Swipe(SwipeDirection),
    Tap,
    /// Released before the debounce threshold elapsed.
    Noise,
    /// Released after the tap window without ever moving far enough to swipe.
    Hold,
    /// A contact that already fired its swipe has been lifted.
    DragReleased,
}

impl GestureVerdict {
    pub const fn trigger(self) -> Option<TriggerKind> {
        match self {
            Self::Swipe(direction) => Some(TriggerKind::swipe(direction)),
            Self::Tap => Some(TriggerKind::Tap),
            Self::Noise | Self::Hold | Self::DragReleased => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_names_round_trip_through_lookup() {
        for kind in TriggerKind::ALL {
            assert_eq!(TriggerKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(TriggerKind::from_name("on_long_press"), None);
    }

    #[test]
    fn only_swipes_and_taps_map_to_triggers() {
        assert_eq!(
            GestureVerdict::Swipe(SwipeDirection::Left).trigger(),
            Some(TriggerKind::SwipeLeft)
        );
        assert_eq!(GestureVerdict::Tap.trigger(), Some(TriggerKind::Tap));
        assert_eq!(GestureVerdict::Noise.trigger(), None);
        assert_eq!(GestureVerdict::Hold.trigger(), None);
        assert_eq!(GestureVerdict::DragReleased.trigger(), None);
    }
}
