use crate::types::{CalibratedPoint, RawSample};

/// Panel orientation relative to the display it is glued to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Calibration {
    pub display_width: u16,
    pub display_height: u16,
    pub swap_xy: bool,
    pub invert_x: bool,
    pub invert_y: bool,
}

/// Maps a raw sample into display space.
///
/// Axes are swapped first and inverted second: inversion is measured against the
/// extent of the axis the value ends up on, so a swapped panel inverts x against
/// the display height. Negative results saturate at zero; there is no upper clamp.
pub fn calibrate(sample: RawSample, calibration: &Calibration) -> CalibratedPoint {
    let mut x = sample.x;
    let mut y = sample.y;
    let mut width = i32::from(calibration.display_width);
    let mut height = i32::from(calibration.display_height);

    if calibration.swap_xy {
        core::mem::swap(&mut x, &mut y);
        core::mem::swap(&mut width, &mut height);
    }
    if calibration.invert_x {
        x = width.saturating_sub(x);
    }
    if calibration.invert_y {
        y = height.saturating_sub(y);
    }

    CalibratedPoint {
        id: sample.id,
        x: clamp_axis(x),
        y: clamp_axis(y),
        pressure: sample.pressure,
    }
}

fn clamp_axis(value: i32) -> u32 {
    value.max(0).unsigned_abs()
}
