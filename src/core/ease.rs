use glam::Vec3;

/// Clamp to the unit interval. NaN collapses to 0 so upstream overshoot
/// never leaks into interpolation.
#[inline]
pub fn clamp01(x: f32) -> f32 {
    if x.is_nan() {
        return 0.0;
    }
    x.clamp(0.0, 1.0)
}

/// Cubic Hermite ease `t² (3 − 2t)` on a clamped input.
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = clamp01(t);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = clamp01(t);
    1.0 - (1.0 - t).powi(3)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Position of `value` within `[start, end]`, clamped to [0,1].
#[inline]
pub fn local_progress(value: f32, start: f32, end: f32) -> f32 {
    let span = end - start;
    if span <= 0.0 {
        return if value >= end { 1.0 } else { 0.0 };
    }
    clamp01((value - start) / span)
}

/// Trapezoid opacity: ramps up over `fade` after `start`, holds, ramps down
/// over `fade` before `end`.
#[inline]
pub fn fade_window(value: f32, start: f32, end: f32, fade: f32) -> f32 {
    if fade <= 0.0 {
        return if value >= start && value < end { 1.0 } else { 0.0 };
    }
    let fade_in = clamp01((value - start) / fade);
    let fade_out = clamp01((end - value) / fade);
    fade_in.min(fade_out)
}
