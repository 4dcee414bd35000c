// Host-side tests for the camera path and rig.

#![allow(dead_code)]
mod core {
    pub mod ease {
        include!("../src/core/ease.rs");
    }
    pub mod camera_path {
        include!("../src/core/camera_path.rs");
    }
}

use crate::core::camera_path::*;
use glam::Vec3;

fn close(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-3
}

#[test]
fn narrative_path_is_contiguous_and_continuous() {
    let path = CameraPath::narrative().unwrap();
    let segs = path.segments();
    assert_eq!(segs.first().unwrap().start, 0.0);
    assert_eq!(segs.last().unwrap().end, 1.0);
    for pair in segs.windows(2) {
        let a = &pair[0];
        let eps = 1e-4;
        let before = path.pose_at(a.end - eps, false);
        let after = path.pose_at(a.end + eps, false);
        assert!(
            (before.position - after.position).length() < 0.05,
            "jump at {} ({})",
            a.end,
            pair[1].name
        );
    }
}

#[test]
fn pose_is_pure_and_clamped() {
    let path = CameraPath::narrative().unwrap();
    assert_eq!(path.pose_at(0.42, false), path.pose_at(0.42, false));
    assert_eq!(path.pose_at(-1.0, false), path.pose_at(0.0, false));
    assert_eq!(path.pose_at(3.0, false), path.pose_at(1.0, false));
    assert!(path.is_title(0.01));
    assert!(!path.is_title(0.5));
    assert_eq!(path.segment_at(1.0).name, "outro");
}

#[test]
fn compact_narrows_x_and_pulls_back() {
    let path = CameraPath::narrative().unwrap();
    for p in [0.1, 0.3, 0.5, 0.7, 0.9] {
        let full = path.pose_at(p, false);
        let compact = path.pose_at(p, true);
        assert!((compact.position.x - full.position.x * COMPACT_X_SCALE).abs() < 1e-4);
        assert!((compact.position.z - (full.position.z + COMPACT_Z_PULLBACK)).abs() < 1e-4);
        assert_eq!(compact.position.y, full.position.y);
    }
}

#[test]
fn orbit_segment_keeps_its_radius() {
    let path = CameraPath::narrative().unwrap();
    let seg = path
        .segments()
        .iter()
        .find(|s| s.name == "assembly")
        .unwrap()
        .clone();
    for i in 0..=10 {
        let p = seg.start + (seg.end - seg.start) * i as f32 / 10.0;
        let pose = path.pose_at(p, false);
        let r = Vec3::new(pose.position.x, 0.0, pose.position.z).length();
        assert!((r - 13.0).abs() < 1e-3, "radius {} at {}", r, p);
    }
}

#[test]
fn bad_paths_are_rejected() {
    assert_eq!(CameraPath::new(vec![]).unwrap_err(), CameraPathError::Empty);
    let pose = CameraPose::new(Vec3::ZERO, Vec3::Z);
    let seg = |name, start, end| CameraSegment {
        name,
        start,
        end,
        from: pose,
        to: pose,
        curve: Curve::Linear,
    };
    assert_eq!(
        CameraPath::new(vec![seg("a", 0.0, 0.5)]).unwrap_err(),
        CameraPathError::Uncovered
    );
    assert_eq!(
        CameraPath::new(vec![seg("a", 0.0, 0.4), seg("b", 0.5, 1.0)]).unwrap_err(),
        CameraPathError::Discontinuous("b")
    );
}

#[test]
fn rig_snaps_then_smooths() {
    let mut rig = CameraRig::new();
    assert!(rig.pose().is_none());
    let a = CameraPose::new(Vec3::ZERO, Vec3::ZERO);
    let b = CameraPose::new(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO);
    assert_eq!(rig.step(a, false), a);
    let next = rig.step(b, false);
    assert!(close(next.position, Vec3::new(10.0 * CAMERA_SMOOTHING, 0.0, 0.0)));

    let mut title = CameraRig::new();
    title.step(a, true);
    let slow = title.step(b, true);
    assert!(slow.position.x < next.position.x);

    rig.reset();
    assert_eq!(rig.step(b, false), b);
}

#[test]
fn rig_converges_toward_a_still_target() {
    let mut rig = CameraRig::new();
    rig.step(CameraPose::new(Vec3::ZERO, Vec3::ZERO), false);
    let target = CameraPose::new(Vec3::new(0.0, 5.0, 20.0), Vec3::new(1.0, 0.0, 0.0));
    let mut last = f32::MAX;
    for _ in 0..200 {
        let pose = rig.step(target, false);
        let d = (pose.position - target.position).length();
        assert!(d <= last);
        last = d;
    }
    assert!(last < 0.01);
}
