use super::constants::{FRAME_MS_60HZ, PROGRESS_EPSILON};
use super::ease::clamp01;
use instant::Instant;

/// Normalised scroll position. A non-positive scroll range maps to 0.
#[inline]
pub fn scroll_progress(scroll_top: f64, scroll_height: f64, viewport_height: f64) -> f32 {
    let range = scroll_height - viewport_height;
    if !(range > 0.0) {
        return 0.0;
    }
    clamp01((scroll_top / range) as f32)
}

/// Coalesces scroll events into one recomputation per animation frame and
/// suppresses updates smaller than `epsilon`.
#[derive(Clone, Debug)]
pub struct ProgressTracker {
    last: Option<f32>,
    epsilon: f32,
    frame_pending: bool,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(PROGRESS_EPSILON)
    }
}

impl ProgressTracker {
    pub fn new(epsilon: f32) -> Self {
        Self {
            last: None,
            epsilon,
            frame_pending: false,
        }
    }

    /// Record a scroll event. Returns true when the caller should schedule a
    /// frame callback, i.e. only for the first event since the last frame.
    pub fn request_frame(&mut self) -> bool {
        if self.frame_pending {
            return false;
        }
        self.frame_pending = true;
        true
    }

    #[inline]
    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Frame callback: clear the pending flag and publish `raw` if it moved
    /// more than epsilon from the last published value.
    pub fn on_frame(&mut self, raw: f32) -> Option<f32> {
        self.frame_pending = false;
        self.publish(raw)
    }

    /// Publish `raw` if it moved more than epsilon. Landing exactly on either
    /// end of the page always publishes so the final state is reachable.
    pub fn publish(&mut self, raw: f32) -> Option<f32> {
        let value = clamp01(raw);
        let at_end = value == 0.0 || value == 1.0;
        match self.last {
            Some(prev) if prev == value => None,
            Some(prev) if !at_end && (value - prev).abs() <= self.epsilon => None,
            _ => {
                self.last = Some(value);
                Some(value)
            }
        }
    }

    #[inline]
    pub fn last(&self) -> Option<f32> {
        self.last
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchTuning {
    /// Scroll pixels per pixel of finger travel.
    pub sensitivity: f32,
    /// Fraction of momentum kept per 60 Hz frame after release.
    pub friction: f32,
    /// Velocity clamp, pixels per 60 Hz frame.
    pub max_velocity: f32,
    /// Momentum below this stops the glide.
    pub min_velocity: f32,
    /// A finger resting longer than this before lifting releases no momentum.
    pub hold_frames: f32,
}

impl Default for TouchTuning {
    fn default() -> Self {
        Self {
            sensitivity: 1.6,
            friction: 0.94,
            max_velocity: 70.0,
            min_velocity: 0.15,
            hold_frames: 2.0,
        }
    }
}

#[inline]
fn frames_between(from: Instant, to: Instant) -> f32 {
    (to.saturating_duration_since(from).as_secs_f64() * 1000.0 / FRAME_MS_60HZ) as f32
}

/// Turns raw touch deltas into synthetic scroll displacement with a
/// friction glide after release. Output is written through the native scroll
/// position, so it never publishes progress itself.
#[derive(Clone, Debug)]
pub struct TouchMomentum {
    tuning: TouchTuning,
    last_y: Option<f32>,
    last_move: Option<Instant>,
    /// Pixels per 60 Hz frame, measured over real elapsed time.
    velocity: f32,
    gliding: bool,
}

impl TouchMomentum {
    pub fn new(tuning: TouchTuning) -> Self {
        Self {
            tuning,
            last_y: None,
            last_move: None,
            velocity: 0.0,
            gliding: false,
        }
    }

    pub fn touch_start(&mut self, y: f32, now: Instant) {
        self.last_y = Some(y);
        self.last_move = Some(now);
        self.velocity = 0.0;
        self.gliding = false;
    }

    /// Finger moved to `y` at `now`; returns the scroll delta to apply now.
    pub fn touch_move(&mut self, y: f32, now: Instant) -> f32 {
        let (Some(prev), Some(prev_at)) = (self.last_y, self.last_move) else {
            self.touch_start(y, now);
            return 0.0;
        };
        self.last_y = Some(y);
        self.last_move = Some(now);
        // Finger moving up scrolls the page down.
        let delta = (prev - y) * self.tuning.sensitivity;
        // Events can share a timestamp; count those as one frame.
        let frames = frames_between(prev_at, now).max(1.0);
        let max = self.tuning.max_velocity;
        self.velocity = (delta / frames).clamp(-max, max);
        delta
    }

    /// Finger lifted at `now`. Momentum decays over the time the finger
    /// rested, and is dropped entirely after a hold.
    pub fn touch_end(&mut self, now: Instant) {
        let rested = self
            .last_move
            .map(|at| frames_between(at, now))
            .unwrap_or(0.0);
        self.last_y = None;
        self.last_move = None;
        if rested > self.tuning.hold_frames {
            self.velocity = 0.0;
        } else {
            self.velocity *= self.tuning.friction.powf(rested);
        }
        self.gliding = self.velocity.abs() >= self.tuning.min_velocity;
    }

    #[inline]
    pub fn is_gliding(&self) -> bool {
        self.gliding
    }

    #[inline]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// One glide step after release; `dt_frames` is elapsed time in 60 Hz
    /// frames. Returns the displacement, or None once the glide has stopped.
    pub fn step(&mut self, dt_frames: f32) -> Option<f32> {
        if !self.gliding {
            return None;
        }
        let dt = dt_frames.max(0.0);
        self.velocity *= self.tuning.friction.powf(dt);
        if self.velocity.abs() < self.tuning.min_velocity {
            self.velocity = 0.0;
            self.gliding = false;
            return None;
        }
        Some(self.velocity * dt)
    }
}
