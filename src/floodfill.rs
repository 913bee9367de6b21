//! Scanline flood fill over tolerance-equal cells.
//!
//! A fill starts from a seed and grows horizontally first, recording each
//! finished run of cells as a [`ScanRange`]. Ranges are queued and the rows
//! directly above and below them are scanned for further unprocessed cells
//! equal to the seed elevation. While growing, the engine counts the region
//! size and the outlet evidence: cells unambiguously lower than the seed that
//! either stop a horizontal run or sit directly above/below a region cell.
//! When the queue is empty the whole region is reclassified from those two
//! counters.

use std::collections::VecDeque;

use ndarray::Array2;
use tracing::debug;

use crate::params::{DetectParams, WaterClass};
use crate::tolerance::Tolerance;

/// Inclusive horizontal run `left..=right` on `row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRange {
    pub left: usize,
    pub right: usize,
    pub row: usize,
}

/// Outcome of one [`ScanlineFloodFill::flood_fill`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillSummary {
    pub flood_count: usize,
    pub outlet_count: usize,
    pub class: WaterClass,
}

/// Final class of a completed region, from its size and outlet count.
///
/// Regions draining faster than `outlet_rate` are land; otherwise regions
/// smaller than `min_water_pixels` are sinks; everything else stays water.
///
/// The rate is taken in single precision, so e.g. 1/20 drains against a
/// threshold of 0.05.
pub fn classify_region(flood_count: usize, outlet_count: usize, params: &DetectParams) -> WaterClass {
    let rate = outlet_count as f32 / flood_count as f32;
    if rate as f64 > params.outlet_rate {
        WaterClass::Land
    } else if flood_count < params.min_water_pixels {
        WaterClass::Sink
    } else {
        WaterClass::Water
    }
}

/// Reusable flood fill engine sized for one grid.
///
/// The processed mask and range queue are owned by the engine and recycled
/// between calls; only one fill is in flight at a time.
pub struct ScanlineFloodFill {
    rows: usize,
    cols: usize,
    params: DetectParams,
    tol: Tolerance,
    processed: Array2<bool>,
    queue: VecDeque<ScanRange>,
    // every range of the current region, used to reset and reclassify it
    filled: Vec<ScanRange>,
    flood_count: usize,
    outlet_count: usize,
}

impl ScanlineFloodFill {
    pub fn new(rows: usize, cols: usize, params: DetectParams) -> Self {
        Self {
            rows,
            cols,
            params,
            tol: Tolerance::new(params.equal_tolerance),
            processed: Array2::from_elem((rows, cols), false),
            queue: VecDeque::new(),
            filled: Vec::new(),
            flood_count: 0,
            outlet_count: 0,
        }
    }

    pub fn flood_count(&self) -> usize {
        self.flood_count
    }

    pub fn outlet_count(&self) -> usize {
        self.outlet_count
    }

    /// Whether `(row, col)` belongs to the region of the most recent fill.
    pub fn is_processed(&self, row: usize, col: usize) -> bool {
        self.processed[[row, col]]
    }

    /// Ranges making up the region of the most recent fill.
    pub fn ranges(&self) -> &[ScanRange] {
        &self.filled
    }

    /// Discovers the region of cells equal to `base` connected to the seed,
    /// marks it water while growing, then reclassifies it as a whole.
    pub fn flood_fill(
        &mut self,
        dem: &Array2<f32>,
        result: &mut Array2<WaterClass>,
        row: usize,
        col: usize,
        base: f32,
    ) -> FillSummary {
        self.reset();

        self.line_fill(dem, result, row, col, base);
        while let Some(range) = self.queue.pop_front() {
            for c in range.left..=range.right {
                if range.row > 0 {
                    self.try_line_fill(dem, result, range.row - 1, c, base);
                }
                if range.row + 1 < self.rows {
                    self.try_line_fill(dem, result, range.row + 1, c, base);
                }
            }
        }

        let class = classify_region(self.flood_count, self.outlet_count, &self.params);
        if class != WaterClass::Water {
            for range in &self.filled {
                for c in range.left..=range.right {
                    result[[range.row, c]] = class;
                }
            }
        }

        debug!(
            "Flood fill from ({}, {}): {} cells, {} outlets -> {}",
            row,
            col,
            self.flood_count,
            self.outlet_count,
            class.name()
        );

        FillSummary {
            flood_count: self.flood_count,
            outlet_count: self.outlet_count,
            class,
        }
    }

    // The mask is only ever set inside the previous region, so clearing those
    // ranges leaves it all false.
    fn reset(&mut self) {
        for range in self.filled.drain(..) {
            for c in range.left..=range.right {
                self.processed[[range.row, c]] = false;
            }
        }
        self.queue.clear();
        self.flood_count = 0;
        self.outlet_count = 0;
    }

    fn try_line_fill(&mut self, dem: &Array2<f32>, result: &mut Array2<WaterClass>, row: usize, col: usize, base: f32) {
        if !self.processed[[row, col]] && self.tol.equal(base, dem[[row, col]]) {
            self.line_fill(dem, result, row, col, base);
        }
    }

    fn line_fill(&mut self, dem: &Array2<f32>, result: &mut Array2<WaterClass>, row: usize, col: usize, base: f32) {
        if !self.visit(dem, result, row, col, base) {
            return;
        }
        let mut left = col;
        while left > 0 && self.visit(dem, result, row, left - 1, base) {
            left -= 1;
        }
        let mut right = col;
        while right + 1 < self.cols && self.visit(dem, result, row, right + 1, base) {
            right += 1;
        }

        let range = ScanRange { left, right, row };
        self.queue.push_back(range);
        self.filled.push(range);
    }

    /// Absorbs `(row, col)` into the region if it is unprocessed and equal to
    /// `base`. Returns false where the horizontal run has to stop.
    fn visit(&mut self, dem: &Array2<f32>, result: &mut Array2<WaterClass>, row: usize, col: usize, base: f32) -> bool {
        if self.processed[[row, col]] {
            return false;
        }
        let z = dem[[row, col]];
        if !self.tol.equal(base, z) {
            if self.tol.more_than(base, z) {
                self.outlet_count += 1;
            }
            return false;
        }

        // one count per cell, even with lower cells both above and below
        let lower_above = row > 0 && self.tol.more_than(base, dem[[row - 1, col]]);
        let lower_below = row + 1 < self.rows && self.tol.more_than(base, dem[[row + 1, col]]);
        if lower_above || lower_below {
            self.outlet_count += 1;
        }

        result[[row, col]] = WaterClass::Water;
        self.processed[[row, col]] = true;
        self.flood_count += 1;
        true
    }
}
