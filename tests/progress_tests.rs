// Host-side tests for scroll progress publishing and touch momentum.

#![allow(dead_code)]
mod core {
    pub mod constants {
        include!("../src/core/constants.rs");
    }
    pub mod ease {
        include!("../src/core/ease.rs");
    }
    pub mod progress {
        include!("../src/core/progress.rs");
    }
}

use crate::core::constants::PROGRESS_EPSILON;
use crate::core::progress::*;
use instant::Instant;
use std::time::Duration;

// One 60 Hz frame, rounded up.
const FRAME: Duration = Duration::from_millis(17);

fn after(t: Instant, frames: u32) -> Instant {
    t + FRAME * frames
}

#[test]
fn progress_is_zero_without_scroll_range() {
    assert_eq!(scroll_progress(100.0, 800.0, 800.0), 0.0);
    assert_eq!(scroll_progress(100.0, 600.0, 800.0), 0.0);
    assert_eq!(scroll_progress(100.0, f64::NAN, 800.0), 0.0);
}

#[test]
fn progress_is_normalised_and_clamped() {
    assert_eq!(scroll_progress(0.0, 2800.0, 800.0), 0.0);
    assert_eq!(scroll_progress(1000.0, 2800.0, 800.0), 0.5);
    assert_eq!(scroll_progress(2000.0, 2800.0, 800.0), 1.0);
    // Overscroll bounce on some browsers.
    assert_eq!(scroll_progress(-40.0, 2800.0, 800.0), 0.0);
    assert_eq!(scroll_progress(2100.0, 2800.0, 800.0), 1.0);
}

#[test]
fn first_sample_always_publishes() {
    let mut t = ProgressTracker::default();
    assert_eq!(t.last(), None);
    assert_eq!(t.publish(0.0), Some(0.0));
    assert_eq!(t.last(), Some(0.0));
}

#[test]
fn tiny_changes_are_suppressed() {
    let mut t = ProgressTracker::default();
    t.publish(0.5);
    assert_eq!(t.publish(0.5 + PROGRESS_EPSILON * 0.5), None);
    assert_eq!(t.last(), Some(0.5));
    assert_eq!(t.publish(0.6), Some(0.6));
    assert_eq!(t.publish(3.0), Some(1.0));
    assert_eq!(t.publish(1.2), None);
}

#[test]
fn page_ends_always_publish() {
    let mut t = ProgressTracker::default();
    t.publish(1.0 - PROGRESS_EPSILON * 0.5);
    // Within epsilon of the bottom, but the exact end still lands.
    assert_eq!(t.publish(1.0), Some(1.0));
    assert_eq!(t.publish(1.0), None);
    t.publish(0.5);
    t.publish(PROGRESS_EPSILON * 0.5);
    assert_eq!(t.publish(0.0), Some(0.0));
    assert_eq!(t.publish(-2.0), None);
}

#[test]
fn bursts_of_events_schedule_one_frame() {
    let mut t = ProgressTracker::default();
    assert!(t.request_frame());
    assert!(!t.request_frame());
    assert!(!t.request_frame());
    assert!(t.frame_pending());
    assert_eq!(t.on_frame(0.25), Some(0.25));
    assert!(!t.frame_pending());
    assert!(t.request_frame());
    // Same value again: the frame runs but nothing is published.
    assert_eq!(t.on_frame(0.25), None);
}

#[test]
fn touch_move_scrolls_against_finger() {
    let tuning = TouchTuning::default();
    let mut m = TouchMomentum::new(tuning);
    let t0 = Instant::now();
    // No start recorded: first move only anchors.
    assert_eq!(m.touch_move(300.0, t0), 0.0);
    m.touch_start(300.0, t0);
    let d = m.touch_move(290.0, after(t0, 1));
    assert!((d - 10.0 * tuning.sensitivity).abs() < 1e-4);
    let back = m.touch_move(295.0, after(t0, 2));
    assert!(back < 0.0);
    // Displacement follows the finger; velocity clamps to the limit.
    let flick = m.touch_move(-1000.0, after(t0, 3));
    assert!(flick > tuning.max_velocity);
    assert_eq!(m.velocity(), tuning.max_velocity);
}

#[test]
fn velocity_is_per_frame_over_elapsed_time() {
    let tuning = TouchTuning::default();
    let mut m = TouchMomentum::new(tuning);
    let t0 = Instant::now();
    m.touch_start(400.0, t0);
    // Same travel spread over four frames moves a quarter as fast.
    let d = m.touch_move(380.0, after(t0, 4));
    assert!((d - 20.0 * tuning.sensitivity).abs() < 1e-4);
    let per_frame = 20.0 * tuning.sensitivity * 1000.0 / 60.0 / (4.0 * 17.0);
    assert!((m.velocity() - per_frame).abs() < 1e-3);
    // Coincident events count as one frame rather than dividing by zero.
    let t1 = after(t0, 4);
    m.touch_move(370.0, t1);
    assert!(m.velocity().is_finite());
    assert!((m.velocity() - 10.0 * tuning.sensitivity).abs() < 1e-4);
}

#[test]
fn glide_decays_and_stops() {
    let tuning = TouchTuning::default();
    let mut m = TouchMomentum::new(tuning);
    let t0 = Instant::now();
    m.touch_start(500.0, t0);
    m.touch_move(480.0, after(t0, 1));
    m.touch_end(after(t0, 1));
    assert!(m.is_gliding());
    let mut last = f32::MAX;
    let mut steps = 0;
    while let Some(d) = m.step(1.0) {
        assert!(d > 0.0 && d < last);
        last = d;
        steps += 1;
        assert!(steps < 1000, "glide never stopped");
    }
    assert!(!m.is_gliding());
    assert_eq!(m.step(1.0), None);
}

#[test]
fn hold_then_release_does_not_glide() {
    let tuning = TouchTuning::default();
    let mut m = TouchMomentum::new(tuning);
    let t0 = Instant::now();
    m.touch_start(500.0, t0);
    m.touch_move(440.0, after(t0, 1));
    // Finger rests for half a second before lifting.
    m.touch_end(t0 + Duration::from_millis(500));
    assert!(!m.is_gliding());
    assert_eq!(m.velocity(), 0.0);
    assert_eq!(m.step(1.0), None);
}

#[test]
fn brief_pause_before_release_decays_momentum() {
    let tuning = TouchTuning::default();
    let mut quick = TouchMomentum::new(tuning);
    let mut paused = TouchMomentum::new(tuning);
    let t0 = Instant::now();
    for m in [&mut quick, &mut paused] {
        m.touch_start(500.0, t0);
        m.touch_move(460.0, after(t0, 1));
    }
    quick.touch_end(after(t0, 1));
    // Rest for less than the hold threshold.
    paused.touch_end(t0 + Duration::from_millis(17 + 25));
    assert!(quick.is_gliding() && paused.is_gliding());
    assert!(paused.velocity() < quick.velocity());
}

#[test]
fn slow_release_does_not_glide() {
    let mut m = TouchMomentum::new(TouchTuning::default());
    let t0 = Instant::now();
    m.touch_start(100.0, t0);
    m.touch_move(100.0, after(t0, 1));
    m.touch_end(after(t0, 1));
    assert!(!m.is_gliding());
    assert_eq!(m.step(1.0), None);
    m.touch_start(100.0, after(t0, 2));
    assert!(!m.is_gliding());
}
