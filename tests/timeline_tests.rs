// Host-side tests for scene timelines and easing.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod core {
    pub mod constants {
        include!("../src/core/constants.rs");
    }
    pub mod ease {
        include!("../src/core/ease.rs");
    }
    pub mod scene {
        include!("../src/core/scene.rs");
    }
    pub mod timeline {
        include!("../src/core/timeline.rs");
    }
}

use crate::core::ease::*;
use crate::core::scene::SceneId;
use crate::core::timeline::*;

fn sweep(steps: usize) -> impl Iterator<Item = f32> {
    (0..=steps).map(move |i| i as f32 / steps as f32)
}

fn all_timelines() -> Vec<SceneTimeline> {
    vec![
        SceneTimeline::visual().unwrap(),
        SceneTimeline::visual_alternate().unwrap(),
        SceneTimeline::overlay().unwrap(),
        SceneTimeline::audio().unwrap(),
    ]
}

#[test]
fn clamp01_handles_nan_and_bounds() {
    assert_eq!(clamp01(f32::NAN), 0.0);
    assert_eq!(clamp01(-3.0), 0.0);
    assert_eq!(clamp01(7.0), 1.0);
    assert_eq!(clamp01(0.25), 0.25);
}

#[test]
fn smoothstep_hits_endpoints_exactly() {
    assert_eq!(smoothstep(0.0), 0.0);
    assert_eq!(smoothstep(1.0), 1.0);
    assert!((smoothstep(0.5) - 0.5).abs() < 1e-6);
    assert_eq!(ease_out_cubic(1.0), 1.0);
}

#[test]
fn scene_indices_match_order() {
    for (i, id) in SceneId::ALL.iter().enumerate() {
        assert_eq!(id.index(), i);
        assert!(id.caption_id().starts_with("caption-"));
    }
}

#[test]
fn canonical_timelines_validate() {
    let v = SceneTimeline::visual().unwrap();
    assert_eq!(v.windows().len(), SceneId::COUNT);
    assert!((v.transition_width() - 0.02).abs() < 1e-6);
    let a = SceneTimeline::audio().unwrap();
    assert!((a.transition_width() - 0.03).abs() < 1e-6);
    let alt = SceneTimeline::visual_alternate().unwrap();
    let dec = alt.window(SceneId::Decision).unwrap();
    let dec_canon = v.window(SceneId::Decision).unwrap();
    assert!(dec.span() > dec_canon.span());
}

#[test]
fn invalid_timelines_are_rejected() {
    assert_eq!(SceneTimeline::new(vec![], 0.02).unwrap_err(), TimelineError::Empty);
    let one = vec![SceneWindow::new(SceneId::Inventory, 0.0, 1.0)];
    assert!(matches!(
        SceneTimeline::new(one.clone(), 0.0),
        Err(TimelineError::BadTransitionWidth(_))
    ));
    assert!(matches!(
        SceneTimeline::new(one, 0.5),
        Err(TimelineError::BadTransitionWidth(_))
    ));
    let empty_window = vec![SceneWindow::new(SceneId::Inventory, 0.5, 0.5)];
    assert_eq!(
        SceneTimeline::new(empty_window, 0.02).unwrap_err(),
        TimelineError::EmptyWindow(SceneId::Inventory)
    );
    let unordered = vec![
        SceneWindow::new(SceneId::Inventory, 0.3, 0.6),
        SceneWindow::new(SceneId::Decision, 0.1, 1.0),
    ];
    assert_eq!(
        SceneTimeline::new(unordered, 0.02).unwrap_err(),
        TimelineError::Unordered(SceneId::Decision)
    );
    let gap = vec![
        SceneWindow::new(SceneId::Inventory, 0.0, 0.4),
        SceneWindow::new(SceneId::Decision, 0.5, 1.0),
    ];
    assert!(matches!(
        SceneTimeline::new(gap, 0.02),
        Err(TimelineError::Gap {
            id: SceneId::Decision,
            ..
        })
    ));
    let wide_overlap = vec![
        SceneWindow::new(SceneId::Inventory, 0.0, 0.5),
        SceneWindow::new(SceneId::Decision, 0.4, 1.0),
    ];
    assert!(matches!(
        SceneTimeline::new(wide_overlap, 0.02),
        Err(TimelineError::Overlap {
            id: SceneId::Decision,
            ..
        })
    ));
    let band_overlap = vec![
        SceneWindow::new(SceneId::Inventory, 0.0, 0.52),
        SceneWindow::new(SceneId::Decision, 0.5, 1.0),
    ];
    assert!(SceneTimeline::new(band_overlap, 0.02).is_ok());
    let short = vec![SceneWindow::new(SceneId::Inventory, 0.0, 0.5)];
    assert!(matches!(
        SceneTimeline::new(short, 0.02),
        Err(TimelineError::ShortTail(_))
    ));
}

#[test]
fn resolve_returns_one_scene_or_two_adjacent() {
    for tl in all_timelines() {
        let order: Vec<SceneId> = tl.windows().iter().map(|w| w.id).collect();
        for p in sweep(2000) {
            let r = tl.resolve(p);
            assert!((0.0..=1.0).contains(&r.blend), "blend {} at {}", r.blend, p);
            match r.next {
                None => assert_eq!(r.blend, 0.0),
                Some(next) => {
                    let i = order.iter().position(|id| *id == r.scene).unwrap();
                    assert_eq!(order[i + 1], next, "non-adjacent blend at {}", p);
                }
            }
            let w = r.weights();
            let sum: f32 = w.iter().map(|(_, x)| *x).sum();
            assert!((sum - 1.0).abs() < 1e-5);
        }
    }
}

#[test]
fn blend_is_monotonic_through_each_band() {
    for tl in all_timelines() {
        let mut prev: Option<(SceneId, Option<SceneId>, f32)> = None;
        for p in sweep(4000) {
            let r = tl.resolve(p);
            if let (Some((s, n, b)), Some(_)) = (prev, r.next) {
                if s == r.scene && n == r.next {
                    assert!(r.blend >= b, "blend fell from {} to {} at {}", b, r.blend, p);
                }
            }
            prev = Some((r.scene, r.next, r.blend));
        }
    }
}

#[test]
fn local_progress_is_clamped_everywhere() {
    for tl in all_timelines() {
        for id in SceneId::ALL {
            for p in [-1.0, 0.0, 0.1, 0.5, 0.99, 1.0, 2.0, f32::NAN] {
                let l = tl.local_progress(id, p);
                assert!((0.0..=1.0).contains(&l), "{:?} {} -> {}", id, p, l);
            }
        }
    }
}

#[test]
fn before_first_and_after_last_do_not_wrap() {
    let tl = SceneTimeline::visual().unwrap();
    let start = tl.resolve(0.0);
    assert_eq!(start.scene, SceneId::Inventory);
    assert!(!start.is_transition());
    let end = tl.resolve(1.0);
    assert_eq!(end.scene, SceneId::Outcome);
    assert!(!end.is_transition());
    assert_eq!(tl.resolve(1.5).scene, SceneId::Outcome);
}

#[test]
fn inventory_is_stable_at_ten_percent() {
    let tl = SceneTimeline::visual().unwrap();
    let r = tl.resolve(0.10);
    assert_eq!(r.scene, SceneId::Inventory);
    assert_eq!(r.next, None);
    assert_eq!(r.blend, 0.0);
}

#[test]
fn first_transition_is_a_quarter_in_at_0185() {
    let tl = SceneTimeline::visual().unwrap();
    let r = tl.resolve(0.185);
    assert_eq!(r.scene, SceneId::Inventory);
    assert_eq!(r.next, Some(SceneId::Decision));
    assert!((r.blend - 0.25).abs() < 1e-3, "blend {}", r.blend);
    assert_eq!(r.dominant(), SceneId::Inventory);
    assert!(tl.visibility(SceneId::Decision, 0.185) > 0.0);
    assert!(tl.visibility(SceneId::Inventory, 0.185) > 0.0);
}

#[test]
fn visibility_fades_and_holds_last_scene() {
    let tl = SceneTimeline::visual().unwrap();
    assert_eq!(tl.visibility(SceneId::Inventory, 0.0), 0.0);
    assert_eq!(tl.visibility(SceneId::Inventory, 0.10), 1.0);
    assert_eq!(tl.visibility(SceneId::Inventory, 0.5), 0.0);
    assert_eq!(tl.visibility(SceneId::Outcome, 1.0), 1.0);
    assert_eq!(tl.visibility(SceneId::Outcome, 0.5), 0.0);
    for p in sweep(500) {
        for id in SceneId::ALL {
            let v = tl.visibility(id, p);
            assert!((0.0..=1.0).contains(&v));
        }
    }
}

#[test]
fn fade_window_is_a_trapezoid() {
    assert_eq!(fade_window(0.5, 0.0, 1.0, 0.1), 1.0);
    assert!((fade_window(0.05, 0.0, 1.0, 0.1) - 0.5).abs() < 1e-5);
    assert_eq!(fade_window(1.2, 0.0, 1.0, 0.1), 0.0);
    assert_eq!(fade_window(0.5, 0.0, 1.0, 0.0), 1.0);
}

#[test]
fn outro_fade_peaks_at_the_end() {
    assert_eq!(outro_fade(0.5), 0.0);
    assert_eq!(outro_fade(0.94), 0.0);
    assert!(outro_fade(0.97) > 0.0 && outro_fade(0.97) < 1.0);
    assert_eq!(outro_fade(1.0), 1.0);
}
