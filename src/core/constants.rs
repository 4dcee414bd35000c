// Shared timeline/overlay/audio tuning constants used by the pure core.

// Progress publishing
pub const PROGRESS_EPSILON: f32 = 1e-4; // minimum change that is propagated downstream

// Touch momentum is measured in 60 Hz frames
pub const FRAME_MS_60HZ: f64 = 1000.0 / 60.0;

// Timeline transition widths (fraction of global progress)
pub const VISUAL_TRANSITION_WIDTH: f32 = 0.02;
pub const OVERLAY_TRANSITION_WIDTH: f32 = 0.02;
pub const AUDIO_TRANSITION_WIDTH: f32 = 0.03;
pub const MAX_TRANSITION_WIDTH: f32 = 0.25;

// Title caption / intro fade
pub const TITLE_FADE_END: f32 = 0.03;
pub const SCROLL_HINT_FADE_END: f32 = 0.02;

// Outro fade (final stretch of the last scene)
pub const OUTRO_FADE_START: f32 = 0.94;

// Reveal grids
pub const FLASH_FRAMES: u32 = 24; // lifetime of a reveal flash
pub const FLASH_QUEUE_CAP: usize = 256;
pub const SCAN_BAND_CELLS: f32 = 1.5; // half-width of the scanning band, in cells

// Decision tree
pub const TREE_DEPTH: usize = 4;
pub const LEVEL_SPACING: f32 = 0.18; // local progress between successive levels
pub const LEVEL_REVEAL_SPAN: f32 = 0.22; // local progress for one level to fully draw
pub const LABEL_REVEAL_AT: f32 = 0.5;

// Stream rain
pub const STREAM_COLUMNS: usize = 4;

// Radial counters
pub const COUNTER_TARGETS: [u32; 4] = [1284, 312, 47, 9];
pub const SATELLITE_COUNT: usize = 8;

// Grain scheduling
pub const GRAIN_JITTER: f64 = 0.30; // +-30% around the density interval
pub const MIN_GRAIN_INTERVAL_MS: f64 = 4.0;
pub const GRAIN_ATTACK_FRAC: f32 = 0.25;
pub const GRAIN_RELEASE_FRAC: f32 = 0.35;
pub const NOISE_BUFFER_SECONDS: f32 = 2.0;
pub const IMPULSE_SECONDS: f32 = 2.5;
