use ndarray::{Array2, Zip};

use crate::tolerance::Tolerance;

/// Local drainage pattern of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborVerdict {
    /// No equal and no higher neighbour while every neighbour is present.
    /// Never returned: a present neighbour is always equal, higher or lower.
    Unknown,
    /// At least one neighbour is unambiguously lower.
    CanFlowDown,
    /// Every neighbour is higher or off-grid.
    Sink,
    /// Some neighbours equal, the rest higher or off-grid. Seeds a flood fill.
    HalfSink,
    /// All eight neighbours equal.
    Flat,
}

/// Neighbour offsets `(row, col)` clockwise starting east.
///
/// ```text
/// 5 6 7
/// 4   0
/// 3 2 1
/// ```
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Inspects the up-to-eight neighbours of `(row, col)`.
///
/// Stops at the first neighbour that is unambiguously lower. Off-grid
/// neighbours rule out [`NeighborVerdict::Flat`], so border cells are never
/// flat.
pub fn check_neighbors(dem: &Array2<f32>, row: usize, col: usize, tol: &Tolerance) -> NeighborVerdict {
    let (rows, cols) = dem.dim();
    let z = dem[[row, col]];
    let mut is_sink = true;
    let mut is_flat = true;

    for &(dr, dc) in NEIGHBOR_OFFSETS.iter() {
        let rn = row as isize + dr;
        let cn = col as isize + dc;
        if rn < 0 || cn < 0 || rn >= rows as isize || cn >= cols as isize {
            is_flat = false;
            continue;
        }
        let zn = dem[[rn as usize, cn as usize]];
        if tol.equal(z, zn) {
            is_sink = false;
        } else if tol.more_than(z, zn) {
            return NeighborVerdict::CanFlowDown;
        } else {
            is_flat = false;
        }
    }

    match (is_sink, is_flat) {
        (true, true) => NeighborVerdict::Unknown,
        (true, false) => NeighborVerdict::Sink,
        (false, true) => NeighborVerdict::Flat,
        (false, false) => NeighborVerdict::HalfSink,
    }
}

/// Verdicts for every cell of `dem`, computed in parallel.
pub fn classify_neighbors(dem: &Array2<f32>, tol: &Tolerance) -> Array2<NeighborVerdict> {
    let mut verdicts = Array2::from_elem(dem.dim(), NeighborVerdict::Unknown);
    Zip::indexed(&mut verdicts).par_for_each(|(row, col), v| {
        *v = check_neighbors(dem, row, col, tol);
    });
    verdicts
}
