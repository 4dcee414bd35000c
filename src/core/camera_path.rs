use super::ease::{clamp01, lerp_vec3, local_progress, smoothstep};
use glam::Vec3;

// Compact layout: narrower horizontal excursions, camera pulled back.
pub const COMPACT_X_SCALE: f32 = 0.6;
pub const COMPACT_Z_PULLBACK: f32 = 4.0;

// Frame-to-frame smoothing factors
pub const CAMERA_SMOOTHING: f32 = 0.08;
pub const CAMERA_SMOOTHING_TITLE: f32 = 0.03;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    pub const fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }

    fn compacted(self) -> Self {
        let squeeze = |v: Vec3| Vec3::new(v.x * COMPACT_X_SCALE, v.y, v.z);
        Self {
            position: squeeze(self.position) + Vec3::new(0.0, 0.0, COMPACT_Z_PULLBACK),
            look_at: squeeze(self.look_at),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Curve {
    Linear,
    Smooth,
    /// Circles `center` at `radius`, sweeping `turns` revolutions while the
    /// look-at target eases from `from.look_at` to `to.look_at`. Height rises
    /// linearly between the endpoint poses.
    Orbit {
        center: Vec3,
        radius: f32,
        start_angle: f32,
        turns: f32,
    },
}

#[derive(Clone, Debug)]
pub struct CameraSegment {
    pub name: &'static str,
    pub start: f32,
    pub end: f32,
    pub from: CameraPose,
    pub to: CameraPose,
    pub curve: Curve,
}

impl CameraSegment {
    fn sample(&self, t: f32) -> CameraPose {
        match self.curve {
            Curve::Linear => CameraPose {
                position: lerp_vec3(self.from.position, self.to.position, t),
                look_at: lerp_vec3(self.from.look_at, self.to.look_at, t),
            },
            Curve::Smooth => {
                let e = smoothstep(t);
                CameraPose {
                    position: lerp_vec3(self.from.position, self.to.position, e),
                    look_at: lerp_vec3(self.from.look_at, self.to.look_at, e),
                }
            }
            Curve::Orbit {
                center,
                radius,
                start_angle,
                turns,
            } => {
                let angle = start_angle + t * turns * std::f32::consts::TAU;
                let y = self.from.position.y + (self.to.position.y - self.from.position.y) * t;
                CameraPose {
                    position: Vec3::new(
                        center.x + radius * angle.sin(),
                        y,
                        center.z + radius * angle.cos(),
                    ),
                    look_at: lerp_vec3(self.from.look_at, self.to.look_at, smoothstep(t)),
                }
            }
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CameraPathError {
    #[error("camera path has no segments")]
    Empty,
    #[error("segment `{0}` does not start where the previous one ends")]
    Discontinuous(&'static str),
    #[error("camera path must span progress 0..1")]
    Uncovered,
}

/// Piecewise camera choreography over global progress.
#[derive(Clone, Debug)]
pub struct CameraPath {
    segments: Vec<CameraSegment>,
}

impl CameraPath {
    pub fn new(segments: Vec<CameraSegment>) -> Result<Self, CameraPathError> {
        let (Some(first), Some(last)) = (segments.first(), segments.last()) else {
            return Err(CameraPathError::Empty);
        };
        if first.start.abs() > 1e-6 || (last.end - 1.0).abs() > 1e-6 {
            return Err(CameraPathError::Uncovered);
        }
        for pair in segments.windows(2) {
            if (pair[1].start - pair[0].end).abs() > 1e-6 {
                return Err(CameraPathError::Discontinuous(pair[1].name));
            }
        }
        Ok(Self { segments })
    }

    /// Title fly-in, then one move per scene.
    pub fn narrative() -> Result<Self, CameraPathError> {
        let title = CameraPose::new(Vec3::new(0.0, 1.5, 26.0), Vec3::new(0.0, 0.0, 0.0));
        let inventory = CameraPose::new(Vec3::new(-3.0, 0.5, 14.0), Vec3::new(-1.0, 0.0, 0.0));
        let inventory_end = CameraPose::new(Vec3::new(-1.5, 0.0, 12.0), Vec3::new(0.0, 0.0, 0.0));
        let decision = CameraPose::new(Vec3::new(0.0, 2.0, 13.0), Vec3::new(0.0, 1.0, 0.0));
        let assembly_end = CameraPose::new(Vec3::new(13.0, 4.0, 0.0), Vec3::new(0.0, 0.0, 0.0));
        let verification = CameraPose::new(Vec3::new(4.0, 1.0, 10.0), Vec3::new(0.5, 0.0, 0.0));
        let outcome = CameraPose::new(Vec3::new(0.0, 0.0, 18.0), Vec3::new(0.0, 0.0, 0.0));
        let outro = CameraPose::new(Vec3::new(0.0, -0.5, 30.0), Vec3::new(0.0, 0.0, 0.0));

        Self::new(vec![
            CameraSegment {
                name: "title",
                start: 0.0,
                end: 0.03,
                from: title,
                to: inventory,
                curve: Curve::Smooth,
            },
            CameraSegment {
                name: "inventory",
                start: 0.03,
                end: 0.19,
                from: inventory,
                to: inventory_end,
                curve: Curve::Linear,
            },
            CameraSegment {
                name: "decision",
                start: 0.19,
                end: 0.37,
                from: inventory_end,
                to: decision,
                curve: Curve::Smooth,
            },
            CameraSegment {
                name: "assembly",
                start: 0.37,
                end: 0.55,
                from: decision,
                to: assembly_end,
                curve: Curve::Orbit {
                    center: Vec3::ZERO,
                    radius: 13.0,
                    start_angle: 0.0,
                    turns: 0.25,
                },
            },
            CameraSegment {
                name: "verification",
                start: 0.55,
                end: 0.75,
                from: assembly_end,
                to: verification,
                curve: Curve::Smooth,
            },
            CameraSegment {
                name: "outcome",
                start: 0.75,
                end: 0.94,
                from: verification,
                to: outcome,
                curve: Curve::Smooth,
            },
            CameraSegment {
                name: "outro",
                start: 0.94,
                end: 1.0,
                from: outcome,
                to: outro,
                curve: Curve::Linear,
            },
        ])
    }

    #[inline]
    pub fn segments(&self) -> &[CameraSegment] {
        &self.segments
    }

    /// Segment containing `progress`; the end of the page belongs to the last.
    pub fn segment_at(&self, progress: f32) -> &CameraSegment {
        let p = clamp01(progress);
        self.segments
            .iter()
            .find(|s| p < s.end)
            .unwrap_or(&self.segments[self.segments.len() - 1])
    }

    pub fn pose_at(&self, progress: f32, compact: bool) -> CameraPose {
        let p = clamp01(progress);
        let seg = self.segment_at(p);
        let pose = seg.sample(local_progress(p, seg.start, seg.end));
        if compact {
            pose.compacted()
        } else {
            pose
        }
    }

    #[inline]
    pub fn is_title(&self, progress: f32) -> bool {
        self.segment_at(progress).name == "title"
    }
}

/// Render camera that chases the path target with exponential smoothing.
#[derive(Clone, Debug, Default)]
pub struct CameraRig {
    current: Option<CameraPose>,
}

impl CameraRig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pose(&self) -> Option<CameraPose> {
        self.current
    }

    /// Advance one frame toward `target`. The first call snaps.
    pub fn step(&mut self, target: CameraPose, title: bool) -> CameraPose {
        let k = if title {
            CAMERA_SMOOTHING_TITLE
        } else {
            CAMERA_SMOOTHING
        };
        let next = match self.current {
            None => target,
            Some(cur) => CameraPose {
                position: cur.position + (target.position - cur.position) * k,
                look_at: cur.look_at + (target.look_at - cur.look_at) * k,
            },
        };
        self.current = Some(next);
        next
    }

    pub fn reset(&mut self) {
        self.current = None;
    }
}
