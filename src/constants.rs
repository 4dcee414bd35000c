/// Web-side tuning constants and DOM ids.
///
/// Timeline shapes and sound design live in `core`; this file only holds
/// what the browser glue needs (element ids, projection, clear colours).
// DOM element ids
pub const GL_CANVAS_ID: &str = "scene-canvas";
pub const OVERLAY_CANVAS_ID: &str = "overlay-canvas";
pub const TITLE_ID: &str = "title-card";
pub const SCROLL_HINT_ID: &str = "scroll-hint";
pub const PROGRESS_BAR_ID: &str = "progress-bar";
pub const OUTRO_VEIL_ID: &str = "outro-veil";
pub const AUDIO_TOGGLE_ID: &str = "audio-toggle";

// Layout breakpoint for compact (reduced) mode
pub const COMPACT_MAX_WIDTH_PX: f64 = 768.0;
pub const LOW_CORE_COUNT: f64 = 4.0;

// Projection
pub const FOVY_RADIANS: f32 = std::f32::consts::FRAC_PI_4;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 200.0;

// Backdrop gradient (linear RGB)
pub const BACKDROP_TOP: [f32; 4] = [0.015, 0.02, 0.05, 1.0];
pub const BACKDROP_BOTTOM: [f32; 4] = [0.04, 0.03, 0.09, 1.0];

// Static fallback when WebGPU is unavailable
pub const FALLBACK_GRADIENT_CSS: &str =
    "background: radial-gradient(ellipse at 50% 40%, #1a1838 0%, #0a0b1a 60%, #04050c 100%);";

// Seeds
pub const PARTICLE_SEED: u64 = 42;
pub const GRAIN_SEED: u64 = 7;
pub const NOISE_SEED: u32 = 0x2545_F491;

// Audio toggle labels
pub const AUDIO_LABEL_OFF: &str = "Sound off";
pub const AUDIO_LABEL_ON: &str = "Sound on";
pub const AUDIO_LABEL_UNAVAILABLE: &str = "Sound unavailable";
