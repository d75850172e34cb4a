//! Sanitizes a single-contact touch controller into a calibrated point stream
//! plus sleep, wake, tap and swipe triggers.
//!
//! Everything runs from [`FrameDispatcher::tick`], called once per scheduler
//! tick with a monotonic millisecond timestamp.

#![cfg_attr(not(test), no_std)]

pub mod activity;
pub mod calibrate;
pub mod config;
pub mod dispatch;
pub mod gesture;
pub mod io;
#[cfg(feature = "embassy")]
pub mod runtime;
pub mod trace;
pub mod types;

pub use activity::{ActivityMonitor, ActivityState, ContactAdmission};
pub use calibrate::{calibrate, Calibration};
pub use config::{ConfigError, OutputPolicy, SentioConfig};
pub use dispatch::FrameDispatcher;
pub use gesture::{GestureClassifier, GestureState, MAX_TAP_DURATION_MS, SWIPE_THRESHOLD_PX};
pub use io::{TouchSink, TouchSource, TriggerSink, TriggerTable};
pub use trace::{TickOutcome, TickTrace};
pub use types::{
    CalibratedPoint, GestureMode, GestureVerdict, RawSample, SwipeDirection, TriggerKind,
};
