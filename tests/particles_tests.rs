// Host-side tests for particle convergence and quality scaling.

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
    pub mod quality {
        include!("../src/core/quality.rs");
    }
    pub mod particles {
        include!("../src/core/particles.rs");
    }
}

use crate::core::particles::*;
use crate::core::quality::RenderQuality;
use crate::core::scene::SceneId;
use crate::core::timeline::SceneTimeline;
use glam::Vec3;
use rand::prelude::*;

fn field(n: usize, drift: f32) -> ParticleField {
    let mut rng = StdRng::seed_from_u64(3);
    let a = scatter(n, Vec3::new(5.0, 5.0, 5.0), &mut rng);
    let b = Formation::Grid {
        cols: 8,
        rows: 8,
        spacing: 0.5,
    }
    .positions(n, &mut rng);
    ParticleField::new(a, b, drift, &mut rng)
}

#[test]
fn endpoints_are_exact_regardless_of_time() {
    let mut f = field(200, 0.8);
    for t in [0.0, 1.7, 123.4] {
        f.update(0.0, t);
        assert_eq!(f.positions(), f.dispersed());
        f.update(1.0, t);
        for (p, r) in f.positions().iter().zip(f.resolved()) {
            assert!((*p - *r).length() < 1e-5);
        }
    }
}

#[test]
fn out_of_range_local_clamps_to_endpoints() {
    let mut f = field(50, 0.5);
    f.update(-2.0, 4.0);
    assert_eq!(f.positions(), f.dispersed());
    f.update(9.0, 4.0);
    for (p, r) in f.positions().iter().zip(f.resolved()) {
        assert!((*p - *r).length() < 1e-5);
    }
}

#[test]
fn mismatched_sets_are_truncated() {
    let mut rng = StdRng::seed_from_u64(1);
    let a = scatter(10, Vec3::ONE, &mut rng);
    let b = scatter(7, Vec3::ONE, &mut rng);
    let f = ParticleField::new(a, b, 0.0, &mut rng);
    assert_eq!(f.len(), 7);
    assert_eq!(f.dispersed().len(), 7);
}

#[test]
fn formations_produce_requested_counts() {
    let mut rng = StdRng::seed_from_u64(9);
    let formations = [
        Formation::Grid {
            cols: 4,
            rows: 3,
            spacing: 1.0,
        },
        Formation::Tree {
            depth: 3,
            height: 4.0,
            width: 6.0,
        },
        Formation::Streams {
            columns: 4,
            spread: 3.0,
            height: 6.0,
        },
        Formation::Clusters {
            centers: vec![Vec3::ZERO, Vec3::X * 3.0],
            radius: 1.0,
        },
        Formation::Orbit {
            rings: vec![1.0, 2.0],
            tilt: 0.3,
        },
    ];
    for f in &formations {
        assert_eq!(f.positions(37, &mut rng).len(), 37);
    }
    assert_eq!(tree_edges(3, 4.0, 6.0).len(), 2 + 4 + 8);
}

#[test]
fn same_seed_same_systems() {
    let a = ParticleSystems::new(&RenderQuality::FULL, 42);
    let b = ParticleSystems::new(&RenderQuality::FULL, 42);
    for (x, y) in a.systems().iter().zip(b.systems()) {
        assert_eq!(x.field.dispersed(), y.field.dispersed());
        assert_eq!(x.field.resolved(), y.field.resolved());
    }
}

#[test]
fn reduced_quality_scales_counts_only() {
    let full = ParticleSystems::new(&RenderQuality::FULL, 1);
    let reduced = ParticleSystems::new(&RenderQuality::REDUCED, 1);
    assert_eq!(full.systems().len(), reduced.systems().len());
    assert!(reduced.total_particles() < full.total_particles());
    for id in SceneId::ALL {
        assert!(!reduced.system(id).unwrap().field.is_empty());
    }
    assert_eq!(RenderQuality::REDUCED.particle_count(1), 1);
    assert!(RenderQuality::REDUCED.cap_density(100.0) <= RenderQuality::REDUCED.max_grain_density);
    assert_eq!(RenderQuality::for_device(true), RenderQuality::REDUCED);
    assert_eq!(RenderQuality::default(), RenderQuality::FULL);
}

#[test]
fn every_scene_fully_resolved_at_the_end() {
    let tl = SceneTimeline::visual().unwrap();
    let mut systems = ParticleSystems::new(&RenderQuality::REDUCED, 5);
    systems.update(1.0, &tl, 17.0);
    for id in SceneId::ALL {
        let s = systems.system(id).unwrap();
        assert_eq!(s.local, 1.0, "{:?}", id);
        for (p, r) in s.field.positions().iter().zip(s.field.resolved()) {
            assert!((*p - *r).length() < 1e-5);
        }
    }
    let outcome = systems.system(SceneId::Outcome).unwrap();
    assert_eq!(outcome.opacity, 1.0);
}

#[test]
fn opacity_and_convergence_are_independent() {
    let tl = SceneTimeline::visual().unwrap();
    let mut systems = ParticleSystems::new(&RenderQuality::REDUCED, 5);
    // Just entered: visible but barely converging.
    systems.update(0.19, &tl, 0.0);
    let dec = systems.system(SceneId::Decision).unwrap();
    assert!(dec.opacity > 0.0);
    assert!(dec.local < 0.1);
    // Inside its exit band: fully converged, fading out.
    let inv = systems.system(SceneId::Inventory).unwrap();
    assert!(inv.local > 0.9);
    assert!(inv.opacity < 1.0);
}

#[test]
fn ambient_layer_is_always_faintly_visible() {
    let tl = SceneTimeline::visual().unwrap();
    let mut systems = ParticleSystems::new(&RenderQuality::REDUCED, 5);
    for p in [0.0, 0.5, 1.0] {
        systems.update(p, &tl, 1.0);
        let ambient = systems.systems().iter().find(|s| s.scene.is_none()).unwrap();
        assert!(ambient.opacity > 0.0 && ambient.opacity < 0.5);
    }
    systems.update(0.0, &tl, 0.0);
    // Only the ambient layer is visible during the title.
    let ambient_len = systems
        .systems()
        .iter()
        .find(|s| s.scene.is_none())
        .unwrap()
        .field
        .len();
    assert_eq!(systems.visible_instances().count(), ambient_len);
}
