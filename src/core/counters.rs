use super::constants::{COUNTER_TARGETS, SATELLITE_COUNT};
use super::ease::smoothstep;

pub const COUNTER_LABELS: [&str; 4] = ["tasks routed", "reviews kept", "agents", "decisions"];
pub const SATELLITE_LABELS: [&str; SATELLITE_COUNT] = [
    "plan", "code", "test", "docs", "ops", "data", "design", "review",
];

const ORBIT_RADS_PER_FRAME: f32 = 0.004;
const SATELLITE_FADE_START: f32 = 0.3;
const SATELLITE_STAGGER: f32 = 0.05;
const SATELLITE_FADE_SPAN: f32 = 0.2;
const PULSE_PERIOD_FRAMES: u64 = 60;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Satellite {
    pub x: f32,
    pub y: f32,
    pub alpha: f32,
    pub label: &'static str,
    /// Position of the pulse dot on the spoke from centre, in [0,1).
    pub pulse: f32,
}

/// Counters and an orbiting ring of satellites around the canvas centre.
#[derive(Clone, Debug)]
pub struct RadialCounters {
    center: (f32, f32),
    radius: f32,
}

impl RadialCounters {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            center: (width * 0.5, height * 0.5),
            radius: width.min(height) * 0.32,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        *self = Self::new(width, height);
    }

    #[inline]
    pub fn center(&self) -> (f32, f32) {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Displayed integers; exact targets at `local = 1`.
    pub fn values(local: f32) -> [u32; 4] {
        let e = smoothstep(local);
        COUNTER_TARGETS.map(|t| (t as f32 * e).floor() as u32)
    }

    pub fn satellite_alpha(index: usize, local: f32) -> f32 {
        let start = SATELLITE_FADE_START + index as f32 * SATELLITE_STAGGER;
        smoothstep((local - start) / SATELLITE_FADE_SPAN)
    }

    pub fn satellites(&self, local: f32, frame: u64) -> Vec<Satellite> {
        let spin = frame as f32 * ORBIT_RADS_PER_FRAME;
        (0..SATELLITE_COUNT)
            .map(|i| {
                let a = spin + i as f32 / SATELLITE_COUNT as f32 * std::f32::consts::TAU;
                Satellite {
                    x: self.center.0 + self.radius * a.cos(),
                    y: self.center.1 + self.radius * a.sin(),
                    alpha: Self::satellite_alpha(i, local),
                    label: SATELLITE_LABELS[i],
                    pulse: ((frame + i as u64 * 11) % PULSE_PERIOD_FRAMES) as f32
                        / PULSE_PERIOD_FRAMES as f32,
                }
            })
            .collect()
    }
}
