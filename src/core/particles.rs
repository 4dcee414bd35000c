use super::ease::{clamp01, lerp_vec3, smoothstep};
use super::quality::RenderQuality;
use super::scene::SceneId;
use super::timeline::SceneTimeline;
use glam::Vec3;
use rand::prelude::*;

const AMBIENT_OPACITY: f32 = 0.22;

/// Two immutable endpoint formations and the live buffer blended between them.
#[derive(Clone, Debug)]
pub struct ParticleField {
    dispersed: Vec<Vec3>,
    resolved: Vec<Vec3>,
    phases: Vec<f32>,
    live: Vec<Vec3>,
    drift: f32,
}

impl ParticleField {
    /// Mismatched endpoint sets are truncated to the shorter one.
    pub fn new(mut dispersed: Vec<Vec3>, mut resolved: Vec<Vec3>, drift: f32, rng: &mut StdRng) -> Self {
        let n = dispersed.len().min(resolved.len());
        dispersed.truncate(n);
        resolved.truncate(n);
        let phases = (0..n)
            .map(|_| rng.gen::<f32>() * std::f32::consts::TAU)
            .collect();
        let live = dispersed.clone();
        Self {
            dispersed,
            resolved,
            phases,
            live,
            drift,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn dispersed(&self) -> &[Vec3] {
        &self.dispersed
    }

    pub fn resolved(&self) -> &[Vec3] {
        &self.resolved
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.live
    }

    /// Blend every particle toward its resolved slot by `smoothstep(local)`.
    /// Drift is strongest mid-flight and vanishes at both endpoints, so local
    /// 0 and 1 land exactly on the endpoint formations.
    pub fn update(&mut self, local_progress: f32, time_sec: f32) {
        let eased = smoothstep(local_progress);
        let envelope = 4.0 * eased * (1.0 - eased) * self.drift;
        for (i, live) in self.live.iter_mut().enumerate() {
            let base = lerp_vec3(self.dispersed[i], self.resolved[i], eased);
            if envelope > 0.0 {
                let ph = self.phases[i];
                let wobble = Vec3::new(
                    (time_sec * 0.7 + ph).sin(),
                    (time_sec * 0.5 + ph * 1.3).cos(),
                    (time_sec * 0.3 + ph * 0.7).sin(),
                );
                *live = base + wobble * envelope;
            } else {
                *live = base;
            }
        }
    }
}

/// Target shapes particles resolve into.
#[derive(Clone, Debug)]
pub enum Formation {
    Grid {
        cols: usize,
        rows: usize,
        spacing: f32,
    },
    Tree {
        depth: usize,
        height: f32,
        width: f32,
    },
    Streams {
        columns: usize,
        spread: f32,
        height: f32,
    },
    Clusters {
        centers: Vec<Vec3>,
        radius: f32,
    },
    Orbit {
        rings: Vec<f32>,
        tilt: f32,
    },
}

impl Formation {
    pub fn positions(&self, count: usize, rng: &mut StdRng) -> Vec<Vec3> {
        match self {
            Formation::Grid {
                cols,
                rows,
                spacing,
            } => {
                let cols = (*cols).max(1);
                let rows = (*rows).max(1);
                let x0 = -(cols as f32 - 1.0) * spacing * 0.5;
                let y0 = -(rows as f32 - 1.0) * spacing * 0.5;
                (0..count)
                    .map(|i| {
                        let cell = i % (cols * rows);
                        let layer = i / (cols * rows);
                        Vec3::new(
                            x0 + (cell % cols) as f32 * spacing,
                            y0 + (cell / cols) as f32 * spacing,
                            -(layer as f32) * spacing,
                        )
                    })
                    .collect()
            }
            Formation::Tree {
                depth,
                height,
                width,
            } => {
                let edges = tree_edges(*depth, *height, *width);
                if edges.is_empty() {
                    return vec![Vec3::ZERO; count];
                }
                (0..count)
                    .map(|i| {
                        let (a, b) = edges[i % edges.len()];
                        let t: f32 = rng.gen();
                        let jitter = Vec3::new(
                            rng.gen_range(-0.05..0.05),
                            rng.gen_range(-0.05..0.05),
                            rng.gen_range(-0.05..0.05),
                        );
                        lerp_vec3(a, b, t) + jitter
                    })
                    .collect()
            }
            Formation::Streams {
                columns,
                spread,
                height,
            } => {
                let columns = (*columns).max(1);
                (0..count)
                    .map(|i| {
                        let c = i % columns;
                        let lane = if columns == 1 {
                            0.0
                        } else {
                            (c as f32 / (columns - 1) as f32) * 2.0 - 1.0
                        };
                        // Lanes narrow toward the merge point at the bottom.
                        let t: f32 = rng.gen();
                        let y = height * (0.5 - t);
                        let x = lane * spread * (1.0 - t * 0.85);
                        Vec3::new(x, y, rng.gen_range(-0.2..0.2))
                    })
                    .collect()
            }
            Formation::Clusters { centers, radius } => {
                if centers.is_empty() {
                    return vec![Vec3::ZERO; count];
                }
                (0..count)
                    .map(|i| {
                        let c = centers[i % centers.len()];
                        c + random_in_sphere(rng) * *radius
                    })
                    .collect()
            }
            Formation::Orbit { rings, tilt } => {
                if rings.is_empty() {
                    return vec![Vec3::ZERO; count];
                }
                let per_ring = count.div_ceil(rings.len()).max(1);
                (0..count)
                    .map(|i| {
                        let ring = i / per_ring;
                        let r = rings[ring.min(rings.len() - 1)];
                        let a = (i % per_ring) as f32 / per_ring as f32 * std::f32::consts::TAU;
                        let y = r * a.sin() * tilt.sin();
                        Vec3::new(r * a.cos(), y, r * a.sin() * tilt.cos())
                    })
                    .collect()
            }
        }
    }
}

/// Segments of a binary tree hanging from the top of a `width`×`height` box.
pub fn tree_edges(depth: usize, height: f32, width: f32) -> Vec<(Vec3, Vec3)> {
    let mut edges = Vec::new();
    if depth == 0 {
        return edges;
    }
    let level_h = height / depth as f32;
    let mut frontier = vec![Vec3::new(0.0, height * 0.5, 0.0)];
    for level in 1..=depth {
        let spread = width / (1u32 << level) as f32;
        let mut next = Vec::with_capacity(frontier.len() * 2);
        for p in &frontier {
            for dir in [-1.0f32, 1.0] {
                let child = Vec3::new(p.x + dir * spread * 0.5, p.y - level_h, 0.0);
                edges.push((*p, child));
                next.push(child);
            }
        }
        frontier = next;
    }
    edges
}

fn random_in_sphere(rng: &mut StdRng) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
}

/// Uniform cloud in a box `extent` wide on each axis (deeper along z).
pub fn scatter(count: usize, extent: Vec3, rng: &mut StdRng) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-1.0..1.0) * extent.x,
                rng.gen_range(-1.0..1.0) * extent.y,
                rng.gen_range(-1.0..1.0) * extent.z,
            )
        })
        .collect()
}

#[derive(Clone, Debug)]
pub struct ParticleSystem {
    /// `None` for the ambient starfield that belongs to no scene.
    pub scene: Option<SceneId>,
    pub field: ParticleField,
    pub color: [f32; 4],
    pub size: f32,
    pub local: f32,
    pub opacity: f32,
}

/// One system per scene plus an ambient layer.
#[derive(Clone, Debug)]
pub struct ParticleSystems {
    systems: Vec<ParticleSystem>,
}

struct SystemSpec {
    scene: SceneId,
    base_count: usize,
    formation: Formation,
    color: [f32; 4],
    size: f32,
}

fn scene_specs() -> Vec<SystemSpec> {
    vec![
        SystemSpec {
            scene: SceneId::Inventory,
            base_count: 1200,
            formation: Formation::Grid {
                cols: 20,
                rows: 12,
                spacing: 0.45,
            },
            color: [0.55, 0.78, 1.0, 1.0],
            size: 0.06,
        },
        SystemSpec {
            scene: SceneId::Decision,
            base_count: 900,
            formation: Formation::Tree {
                depth: 5,
                height: 7.0,
                width: 10.0,
            },
            color: [1.0, 0.82, 0.45, 1.0],
            size: 0.05,
        },
        SystemSpec {
            scene: SceneId::Assembly,
            base_count: 1000,
            formation: Formation::Streams {
                columns: 4,
                spread: 4.5,
                height: 8.0,
            },
            color: [0.45, 1.0, 0.75, 1.0],
            size: 0.05,
        },
        SystemSpec {
            scene: SceneId::Verification,
            base_count: 1100,
            formation: Formation::Clusters {
                centers: vec![
                    Vec3::new(-3.0, 1.2, 0.0),
                    Vec3::new(0.0, -1.0, 1.0),
                    Vec3::new(3.0, 1.0, -1.0),
                ],
                radius: 1.4,
            },
            color: [0.75, 0.6, 1.0, 1.0],
            size: 0.055,
        },
        SystemSpec {
            scene: SceneId::Outcome,
            base_count: 1400,
            formation: Formation::Orbit {
                rings: vec![2.0, 3.4, 4.8],
                tilt: 0.35,
            },
            color: [1.0, 1.0, 1.0, 1.0],
            size: 0.045,
        },
    ]
}

impl ParticleSystems {
    pub fn new(quality: &RenderQuality, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let spread = Vec3::new(14.0, 9.0, 10.0);
        let mut systems: Vec<ParticleSystem> = scene_specs()
            .into_iter()
            .map(|spec| {
                let count = quality.particle_count(spec.base_count);
                let dispersed = scatter(count, spread, &mut rng);
                let resolved = spec.formation.positions(count, &mut rng);
                ParticleSystem {
                    scene: Some(spec.scene),
                    field: ParticleField::new(dispersed, resolved, 0.35, &mut rng),
                    color: spec.color,
                    size: spec.size,
                    local: 0.0,
                    opacity: 0.0,
                }
            })
            .collect();

        let stars = quality.particle_count(600);
        let wide = Vec3::new(30.0, 18.0, 24.0);
        let from = scatter(stars, wide, &mut rng);
        let to = scatter(stars, wide, &mut rng);
        systems.push(ParticleSystem {
            scene: None,
            field: ParticleField::new(from, to, 0.0, &mut rng),
            color: [0.7, 0.75, 0.9, 1.0],
            size: 0.03,
            local: 0.0,
            opacity: AMBIENT_OPACITY,
        });
        Self { systems }
    }

    pub fn systems(&self) -> &[ParticleSystem] {
        &self.systems
    }

    pub fn system(&self, scene: SceneId) -> Option<&ParticleSystem> {
        self.systems.iter().find(|s| s.scene == Some(scene))
    }

    /// Convergence follows each scene's local progress; group opacity is a
    /// separate fade on global progress.
    pub fn update(&mut self, progress: f32, timeline: &SceneTimeline, time_sec: f32) {
        let p = clamp01(progress);
        for sys in &mut self.systems {
            match sys.scene {
                Some(id) => {
                    sys.local = timeline.local_progress(id, p);
                    sys.opacity = timeline.visibility(id, p);
                }
                None => {
                    // Stars wander slowly with the page.
                    sys.local = p;
                    sys.opacity = AMBIENT_OPACITY;
                }
            }
            sys.field.update(sys.local, time_sec);
        }
    }

    pub fn total_particles(&self) -> usize {
        self.systems.iter().map(|s| s.field.len()).sum()
    }

    /// Every particle of every visible system with its size and colour.
    pub fn visible_instances(&self) -> impl Iterator<Item = (Vec3, f32, [f32; 4])> + '_ {
        self.systems
            .iter()
            .filter(|s| s.opacity > 1e-3)
            .flat_map(|s| {
                let mut c = s.color;
                c[3] *= s.opacity;
                s.field.positions().iter().map(move |p| (*p, s.size, c))
            })
    }
}
