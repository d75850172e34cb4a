use super::*;

fn point(x: u32, y: u32) -> CalibratedPoint {
    CalibratedPoint {
        id: 0,
        x,
        y,
        pressure: 0,
    }
}

#[test]
fn first_sample_records_origin() {
    let mut classifier = GestureClassifier::new(20);

    assert_eq!(classifier.sample(1_000, point(100, 120)), None);
    assert_eq!(
        classifier.state(),
        GestureState {
            mode: GestureMode::Pending,
            start_x: 100,
            start_y: 120,
            start_ms: 1_000,
        }
    );
}

#[test]
fn short_contact_is_noise() {
    let mut classifier = GestureClassifier::new(20);

    let _ = classifier.sample(0, point(50, 50));
    assert_eq!(classifier.release(10), Some(GestureVerdict::Noise));
    assert_eq!(classifier.state().mode, GestureMode::Idle);
}

#[test]
fn contact_inside_tap_window_is_tap() {
    let mut classifier = GestureClassifier::new(20);

    let _ = classifier.sample(0, point(50, 50));
    let _ = classifier.sample(80, point(55, 52));
    assert_eq!(classifier.release(150), Some(GestureVerdict::Tap));
}

#[test]
fn tap_window_bounds_are_half_open() {
    let mut classifier = GestureClassifier::new(20);

    let _ = classifier.sample(0, point(1, 1));
    assert_eq!(classifier.release(20), Some(GestureVerdict::Tap));

    let _ = classifier.sample(100, point(1, 1));
    assert_eq!(classifier.release(499), Some(GestureVerdict::Tap));

    let _ = classifier.sample(1_000, point(1, 1));
    assert_eq!(classifier.release(1_400), Some(GestureVerdict::Hold));
}

#[test]
fn long_static_hold_fires_nothing() {
    let mut classifier = GestureClassifier::new(20);

    let _ = classifier.sample(0, point(200, 200));
    let _ = classifier.sample(700, point(201, 200));
    assert_eq!(classifier.release(900), Some(GestureVerdict::Hold));
    assert_eq!(GestureVerdict::Hold.trigger(), None);
}

#[test]
fn horizontal_travel_past_threshold_swipes_right_once() {
    let mut classifier = GestureClassifier::new(20);

    let _ = classifier.sample(0, point(100, 100));
    assert_eq!(classifier.sample(20, point(130, 100)), None);
    assert_eq!(
        classifier.sample(40, point(140, 100)),
        Some(GestureVerdict::Swipe(SwipeDirection::Right))
    );
    assert_eq!(classifier.state().mode, GestureMode::ConfirmedDrag);

    // Further motion in either direction is absorbed by the drag.
    assert_eq!(classifier.sample(60, point(300, 100)), None);
    assert_eq!(classifier.sample(80, point(0, 100)), None);
    assert_eq!(classifier.release(100), Some(GestureVerdict::DragReleased));
    assert_eq!(classifier.state().mode, GestureMode::Idle);
}

#[test]
fn threshold_travel_is_inclusive_in_both_directions() {
    let mut classifier = GestureClassifier::new(20);

    let _ = classifier.sample(0, point(1_000, 100));
    assert_eq!(classifier.sample(10, point(1_000 + SWIPE_THRESHOLD_PX, 100)), None);
    assert_eq!(classifier.sample(20, point(1_000 - SWIPE_THRESHOLD_PX, 100)), None);
    assert_eq!(
        classifier.sample(30, point(1_000 - SWIPE_THRESHOLD_PX - 1, 100)),
        Some(GestureVerdict::Swipe(SwipeDirection::Left))
    );
}

#[test]
fn leftward_travel_swipes_left() {
    let mut classifier = GestureClassifier::new(20);

    let _ = classifier.sample(0, point(140, 100));
    assert_eq!(
        classifier.sample(30, point(100, 100)),
        Some(GestureVerdict::Swipe(SwipeDirection::Left))
    );
    assert_eq!(classifier.sample(60, point(200, 100)), None);
}

#[test]
fn vertical_travel_never_swipes() {
    let mut classifier = GestureClassifier::new(20);

    let _ = classifier.sample(0, point(100, 0));
    assert_eq!(classifier.sample(50, point(110, 200)), None);
    assert_eq!(classifier.release(150), Some(GestureVerdict::Tap));
}

#[test]
fn release_without_contact_is_ignored() {
    let mut classifier = GestureClassifier::new(20);
    assert_eq!(classifier.release(10), None);
}

#[test]
fn duration_survives_clock_rollover() {
    let mut classifier = GestureClassifier::new(20);
    let start = u32::MAX - 50;

    let _ = classifier.sample(start, point(10, 10));
    assert_eq!(
        classifier.release(start.wrapping_add(150)),
        Some(GestureVerdict::Tap)
    );
}

#[test]
fn next_contact_starts_fresh_after_drag() {
    let mut classifier = GestureClassifier::new(20);

    let _ = classifier.sample(0, point(0, 0));
    let _ = classifier.sample(10, point(50, 0));
    let _ = classifier.release(20);

    assert_eq!(classifier.sample(100, point(60, 60)), None);
    assert_eq!(classifier.state().start_x, 60);
    assert_eq!(classifier.release(250), Some(GestureVerdict::Tap));
}
