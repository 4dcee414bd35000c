use super::constants::STREAM_COLUMNS;
use super::ease::clamp01;
use rand::prelude::*;

const COLUMN_SPEEDS: [f32; STREAM_COLUMNS] = [2.2, 3.1, 1.7, 2.6];
pub const COLUMN_COLORS: [[u8; 3]; STREAM_COLUMNS] = [
    [96, 180, 255],
    [120, 255, 190],
    [255, 206, 110],
    [210, 150, 255],
];
const BAR_HEIGHT_FRAC: f32 = 0.035;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreamBlock {
    /// Top edge in canvas pixels.
    pub y: f32,
    pub len: f32,
}

#[derive(Clone, Debug)]
pub struct StreamColumn {
    pub x: f32,
    pub width: f32,
    pub speed: f32,
    pub color: [u8; 3],
    pub blocks: Vec<StreamBlock>,
}

/// Four lanes of falling blocks above a merge bar.
#[derive(Clone, Debug)]
pub struct StreamRain {
    columns: Vec<StreamColumn>,
    fall_height: f32,
    bar: (f32, f32, f32, f32),
    blocks_per_column: usize,
    seed: u64,
}

impl StreamRain {
    pub fn new(width: f32, height: f32, blocks_per_column: usize, seed: u64) -> Self {
        let mut rain = Self {
            columns: Vec::with_capacity(STREAM_COLUMNS),
            fall_height: 0.0,
            bar: (0.0, 0.0, 0.0, 0.0),
            blocks_per_column,
            seed,
        };
        rain.layout(width, height);
        rain
    }

    fn layout(&mut self, width: f32, height: f32) {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let lane_w = width * 0.08;
        let total = width * 0.56;
        let left = (width - total) * 0.5;
        let step = total / STREAM_COLUMNS as f32;
        self.fall_height = height * 0.78;
        let bar_h = (height * BAR_HEIGHT_FRAC).max(4.0);
        self.bar = (left, self.fall_height + bar_h, total, bar_h);
        let spacing = self.fall_height / self.blocks_per_column.max(1) as f32;
        self.columns = (0..STREAM_COLUMNS)
            .map(|c| {
                let blocks = (0..self.blocks_per_column)
                    .map(|b| StreamBlock {
                        y: b as f32 * spacing + rng.gen_range(0.0..spacing * 0.5),
                        len: spacing * rng.gen_range(0.3..0.6),
                    })
                    .collect();
                StreamColumn {
                    x: left + step * (c as f32 + 0.5) - lane_w * 0.5,
                    width: lane_w,
                    speed: COLUMN_SPEEDS[c] * (height / 800.0).max(0.5),
                    color: COLUMN_COLORS[c],
                    blocks,
                }
            })
            .collect();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.layout(width, height);
    }

    /// Re-seed block positions for the current size.
    pub fn reset(&mut self, width: f32, height: f32) {
        self.layout(width, height);
    }

    pub fn columns(&self) -> &[StreamColumn] {
        &self.columns
    }

    #[inline]
    pub fn fall_height(&self) -> f32 {
        self.fall_height
    }

    /// `(x, y, w, h)` of the merge bar track.
    #[inline]
    pub fn bar_rect(&self) -> (f32, f32, f32, f32) {
        self.bar
    }

    /// Advance every block by its lane speed. Blocks that leave the bottom
    /// re-enter from above; progress plays no part.
    pub fn step(&mut self) {
        let h = self.fall_height;
        for col in &mut self.columns {
            for block in &mut col.blocks {
                block.y += col.speed;
                if block.y > h {
                    block.y -= h + block.len;
                }
            }
        }
    }

    /// Fraction of the merge bar that is filled.
    #[inline]
    pub fn bar_fill(local: f32) -> f32 {
        clamp01(local)
    }
}
