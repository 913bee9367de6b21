//! # Water-detect
//!
//! `water-detect` classifies every cell of a digital elevation model (DEM) as unknown, land,
//! water or sink.  Water surfaces show up in a DEM as flat patches that cannot drain, so the
//! detector looks for cells with no lower neighbour, flood fills the connected flat area around
//! them (within an elevation tolerance) and then decides from the size of the area and how often
//! it touches lower ground whether it really is water.
//!
//! ## Example
//!
//! ```
//! use ndarray::Array2;
//! use water_detect::{detect_water, DetectParams, WaterClass};
//!
//! let dem = Array2::from_shape_vec(
//!     (3, 3),
//!     vec![
//!         10.0, 10.0, 10.0,
//!         10.0, 5.0,  10.0,
//!         10.0, 10.0, 10.0,
//!     ],
//! ).expect("Failed to create DEM");
//!
//! let result = detect_water(&dem, &DetectParams::default()).expect("valid parameters");
//! assert_eq!(result[[1, 1]], WaterClass::Sink);
//! assert_eq!(result[[0, 0]], WaterClass::Land);
//! ```
use ndarray::Array2;
use tracing::info;

pub mod error;
pub mod floodfill;
pub mod neighbor;
pub mod params;
pub mod raster;
pub mod tolerance;

pub use error::{Result, WaterError};
pub use floodfill::{classify_region, FillSummary, ScanRange, ScanlineFloodFill};
pub use neighbor::{check_neighbors, classify_neighbors, NeighborVerdict};
pub use params::{to_codes, DetectParams, WaterClass};
pub use raster::{array_to_rasterfile, rasterfile_to_array, GeoMeta, RasterValue};
pub use tolerance::Tolerance;


/// Totals gathered over one detection run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionReport {
    /// Number of flood fills started.
    pub fills: usize,
    /// Fills whose region stayed water.
    pub water_regions: usize,
    /// Cell counts indexed by [`WaterClass::code`].
    pub class_counts: [usize; 4],
}

impl DetectionReport {
    pub fn count(&self, class: WaterClass) -> usize {
        self.class_counts[class.code() as usize]
    }
}


/// Classifies every cell of `dem`.
///
/// Cells with an unambiguously lower neighbour become [`WaterClass::Land`], isolated pits become
/// [`WaterClass::Sink`], and the first cell of each flat, non-draining area (in row-major order)
/// seeds a flood fill that labels the whole area at once.  Plateau cells no fill reaches stay
/// [`WaterClass::Unknown`].
///
/// # Parameters
///
/// - `dem`: elevations, row-major.  Every value is treated as a real elevation.
/// - `params`: thresholds, validated before any cell is looked at.
///
/// # Example
///
/// ```
/// use ndarray::Array2;
/// use water_detect::{detect_water, DetectParams, WaterClass};
///
/// let mut dem = Array2::from_elem((10, 10), 10.0_f32);
/// for row in 1..9 {
///     for col in 1..9 {
///         dem[[row, col]] = 5.0;
///     }
/// }
/// let result = detect_water(&dem, &DetectParams::default()).expect("valid parameters");
/// assert_eq!(result[[4, 4]], WaterClass::Water);
/// ```
pub fn detect_water(dem: &Array2<f32>, params: &DetectParams) -> Result<Array2<WaterClass>> {
    detect_water_with_report(dem, params).map(|(result, _)| result)
}

/// Same as [`detect_water`], also returning run totals.
pub fn detect_water_with_report(
    dem: &Array2<f32>, params: &DetectParams
) -> Result<(Array2<WaterClass>, DetectionReport)>
{
    params.validate()?;

    let (rows, columns) = dem.dim();
    let tol = Tolerance::new(params.equal_tolerance);

    // A verdict only depends on the DEM, so find them all up front. This step is parallelizable.
    let verdicts = classify_neighbors(dem, &tol);

    let mut result = Array2::from_elem((rows, columns), WaterClass::Unknown);
    let mut filler = ScanlineFloodFill::new(rows, columns, *params);
    let mut report = DetectionReport::default();

    for row in 0..rows {
        for col in 0..columns {
            if result[[row, col]] != WaterClass::Unknown {
                continue;
            }
            match verdicts[[row, col]] {
                NeighborVerdict::CanFlowDown => result[[row, col]] = WaterClass::Land,
                NeighborVerdict::Sink => result[[row, col]] = WaterClass::Sink,
                NeighborVerdict::HalfSink => {
                    let summary = filler.flood_fill(dem, &mut result, row, col, dem[[row, col]]);
                    report.fills += 1;
                    if summary.class == WaterClass::Water {
                        report.water_regions += 1;
                    }
                }
                // plateau interiors are left for a fill to reach, or stay unknown
                NeighborVerdict::Flat | NeighborVerdict::Unknown => {}
            }
        }
    }

    for class in result.iter() {
        report.class_counts[class.code() as usize] += 1;
    }
    info!(
        "{} flood fills, {} water regions; land {}, water {}, sink {}, unknown {}",
        report.fills,
        report.water_regions,
        report.count(WaterClass::Land),
        report.count(WaterClass::Water),
        report.count(WaterClass::Sink),
        report.count(WaterClass::Unknown),
    );

    Ok((result, report))
}
