use super::constants::{FLASH_FRAMES, FLASH_QUEUE_CAP, SCAN_BAND_CELLS};
use super::ease::clamp01;
use std::collections::VecDeque;

/// How the reveal boundary advances across the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Frontier {
    /// Left-to-right linear sweep.
    Sweep,
    /// Circular ripple from a centre given in cell units.
    Ripple { cx: f32, cy: f32 },
}

/// Cell rectangles baked from the canvas size at build time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry {
    pub origin_x: f32,
    pub origin_y: f32,
    pub cell_w: f32,
    pub cell_h: f32,
    pub gap: f32,
}

impl GridGeometry {
    /// Fit `cols`×`rows` cells into the central area of a `width`×`height`
    /// canvas, leaving room for the counter line underneath.
    pub fn fit(cols: usize, rows: usize, width: f32, height: f32) -> Self {
        let area_w = width * 0.62;
        let area_h = height * 0.5;
        let cell = (area_w / cols.max(1) as f32).min(area_h / rows.max(1) as f32);
        let grid_w = cell * cols as f32;
        let grid_h = cell * rows as f32;
        Self {
            origin_x: (width - grid_w) * 0.5,
            origin_y: (height - grid_h) * 0.5,
            cell_w: cell,
            cell_h: cell,
            gap: (cell * 0.12).max(1.0),
        }
    }

    /// Top-left corner and size of a cell, inset by the gap.
    #[inline]
    pub fn rect(&self, col: usize, row: usize) -> (f32, f32, f32, f32) {
        (
            self.origin_x + col as f32 * self.cell_w + self.gap * 0.5,
            self.origin_y + row as f32 * self.cell_h + self.gap * 0.5,
            (self.cell_w - self.gap).max(0.5),
            (self.cell_h - self.gap).max(0.5),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellVisual {
    Pending,
    /// Inside the band around the frontier; `pulse` in [0,1].
    Scanning { pulse: f32 },
    Revealed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Flash {
    pub cell: usize,
    pub spawn_frame: u64,
}

/// Grid of cells flipped permanently as a frontier passes them.
#[derive(Clone, Debug)]
pub struct RevealGrid {
    cols: usize,
    rows: usize,
    frontier: Frontier,
    geometry: GridGeometry,
    revealed: Vec<bool>,
    revealed_count: usize,
    flashes: VecDeque<Flash>,
    frontier_pos: f32,
    max_reach: f32,
}

impl RevealGrid {
    pub fn new(cols: usize, rows: usize, frontier: Frontier, width: f32, height: f32) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let mut grid = Self {
            cols,
            rows,
            frontier,
            geometry: GridGeometry::fit(cols, rows, width, height),
            revealed: vec![false; cols * rows],
            revealed_count: 0,
            flashes: VecDeque::with_capacity(FLASH_QUEUE_CAP),
            frontier_pos: 0.0,
            max_reach: 0.0,
        };
        grid.max_reach = (0..cols * rows)
            .map(|i| grid.cell_metric(i))
            .fold(0.0, f32::max);
        grid
    }

    /// Centred ripple for a grid of the given size.
    pub fn centred_ripple(cols: usize, rows: usize) -> Frontier {
        Frontier::Ripple {
            cx: cols as f32 * 0.5,
            cy: rows as f32 * 0.5,
        }
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.cols * self.rows
    }

    #[inline]
    pub fn revealed_count(&self) -> usize {
        self.revealed_count
    }

    #[inline]
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    #[inline]
    pub fn is_revealed(&self, cell: usize) -> bool {
        self.revealed.get(cell).copied().unwrap_or(false)
    }

    pub fn flashes(&self) -> impl Iterator<Item = &Flash> {
        self.flashes.iter()
    }

    /// Clear every flag and flash. Geometry is untouched.
    pub fn reset(&mut self) {
        self.revealed.iter_mut().for_each(|r| *r = false);
        self.revealed_count = 0;
        self.flashes.clear();
        self.frontier_pos = 0.0;
    }

    /// Rebuild geometry for a new canvas size; all reveal state is dropped.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.geometry = GridGeometry::fit(self.cols, self.rows, width, height);
        if let Frontier::Ripple { .. } = self.frontier {
            self.frontier = Self::centred_ripple(self.cols, self.rows);
        }
        self.reset();
    }

    /// Distance from the frontier origin to the far side of a cell, in cells.
    fn cell_metric(&self, cell: usize) -> f32 {
        let col = (cell % self.cols) as f32;
        let row = (cell / self.cols) as f32;
        match self.frontier {
            Frontier::Sweep => col + 1.0,
            Frontier::Ripple { cx, cy } => {
                let dx = col + 0.5 - cx;
                let dy = row + 0.5 - cy;
                (dx * dx + dy * dy).sqrt() + std::f32::consts::FRAC_1_SQRT_2
            }
        }
    }

    /// Centre of a cell measured the same way as the frontier.
    fn cell_centre_metric(&self, cell: usize) -> f32 {
        match self.frontier {
            Frontier::Sweep => (cell % self.cols) as f32 + 0.5,
            Frontier::Ripple { .. } => self.cell_metric(cell) - std::f32::consts::FRAC_1_SQRT_2,
        }
    }

    #[inline]
    pub fn frontier_position(&self) -> f32 {
        self.frontier_pos
    }

    /// Advance the frontier to `local` and flip any cell it has fully passed.
    /// Flags only ever go from false to true here.
    pub fn update(&mut self, local: f32, frame: u64) {
        self.frontier_pos = clamp01(local) * (self.max_reach + SCAN_BAND_CELLS);
        for cell in 0..self.revealed.len() {
            if self.revealed[cell] || self.cell_metric(cell) > self.frontier_pos {
                continue;
            }
            self.revealed[cell] = true;
            self.revealed_count += 1;
            if self.flashes.len() == FLASH_QUEUE_CAP {
                self.flashes.pop_front();
            }
            self.flashes.push_back(Flash {
                cell,
                spawn_frame: frame,
            });
        }
        self.prune_flashes(frame);
    }

    fn prune_flashes(&mut self, frame: u64) {
        while let Some(front) = self.flashes.front() {
            if frame.saturating_sub(front.spawn_frame) >= FLASH_FRAMES as u64 {
                self.flashes.pop_front();
            } else {
                break;
            }
        }
    }

    /// Remaining highlight of a flash in (0,1], or 0 once expired.
    pub fn flash_intensity(flash: &Flash, frame: u64) -> f32 {
        let age = frame.saturating_sub(flash.spawn_frame) as f32;
        (1.0 - age / FLASH_FRAMES as f32).max(0.0)
    }

    pub fn cell_visual(&self, cell: usize, frame: u64) -> CellVisual {
        if self.is_revealed(cell) {
            return CellVisual::Revealed;
        }
        let d = (self.cell_centre_metric(cell) - self.frontier_pos).abs();
        if d <= SCAN_BAND_CELLS && self.frontier_pos > 0.0 {
            let pulse = 0.5 + 0.5 * ((frame as f32) * 0.25 + cell as f32 * 0.7).sin();
            CellVisual::Scanning { pulse }
        } else {
            CellVisual::Pending
        }
    }
}
