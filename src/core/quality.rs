/// Device-adaptive knobs computed once at startup and threaded through every
/// component. Only counts, resolutions and caps change here; algorithms do not.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderQuality {
    pub reduced: bool,
    /// Multiplier applied to every particle system's base count.
    pub particle_scale: f32,
    pub inventory_cols: usize,
    pub inventory_rows: usize,
    pub verification_cols: usize,
    pub verification_rows: usize,
    pub stream_blocks_per_column: usize,
    /// Upper bound on grains per second regardless of scene config.
    pub max_grain_density: f32,
    /// Cap for devicePixelRatio when sizing canvases.
    pub max_pixel_ratio: f64,
}

impl RenderQuality {
    pub const FULL: RenderQuality = RenderQuality {
        reduced: false,
        particle_scale: 1.0,
        inventory_cols: 24,
        inventory_rows: 14,
        verification_cols: 20,
        verification_rows: 12,
        stream_blocks_per_column: 9,
        max_grain_density: 60.0,
        max_pixel_ratio: 2.0,
    };

    pub const REDUCED: RenderQuality = RenderQuality {
        reduced: true,
        particle_scale: 0.4,
        inventory_cols: 14,
        inventory_rows: 10,
        verification_cols: 12,
        verification_rows: 9,
        stream_blocks_per_column: 6,
        max_grain_density: 28.0,
        max_pixel_ratio: 1.5,
    };

    pub fn for_device(reduced: bool) -> Self {
        if reduced {
            Self::REDUCED
        } else {
            Self::FULL
        }
    }

    /// Scaled count, never below one particle.
    #[inline]
    pub fn particle_count(&self, base: usize) -> usize {
        ((base as f32 * self.particle_scale).round() as usize).max(1)
    }

    #[inline]
    pub fn cap_density(&self, density: f32) -> f32 {
        density.min(self.max_grain_density)
    }
}

impl Default for RenderQuality {
    fn default() -> Self {
        Self::FULL
    }
}
