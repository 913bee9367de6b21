use ndarray::Array2;

use crate::error::{Result, WaterError};

/// Thresholds controlling a detection run. Read-only once the run starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectParams {
    /// Largest elevation difference still treated as "equal".
    pub equal_tolerance: f64,
    /// Smallest region, in cells, that is kept as water.
    pub min_water_pixels: usize,
    /// Regions whose outlet count divided by their size exceeds this become land.
    pub outlet_rate: f64,
}

impl Default for DetectParams {
    fn default() -> Self {
        Self {
            equal_tolerance: 0.1,
            min_water_pixels: 5,
            outlet_rate: 0.05,
        }
    }
}

impl DetectParams {
    pub fn new(equal_tolerance: f64, min_water_pixels: usize, outlet_rate: f64) -> Self {
        Self {
            equal_tolerance,
            min_water_pixels,
            outlet_rate,
        }
    }

    /// Rejects values the detector cannot work with.
    ///
    /// The tolerance must be finite and positive, the minimum water size
    /// positive and the outlet rate in `(0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if !self.equal_tolerance.is_finite() || self.equal_tolerance <= 0.0 {
            return Err(WaterError::InvalidParameter {
                name: "equal_tolerance",
                value: self.equal_tolerance.to_string(),
                reason: "must be larger than 0.0".into(),
            });
        }
        if self.min_water_pixels == 0 {
            return Err(WaterError::InvalidParameter {
                name: "min_water_pixels",
                value: self.min_water_pixels.to_string(),
                reason: "must be larger than 0".into(),
            });
        }
        if !(self.outlet_rate > 0.0 && self.outlet_rate <= 1.0) {
            return Err(WaterError::InvalidParameter {
                name: "outlet_rate",
                value: self.outlet_rate.to_string(),
                reason: "must be in (0.0, 1.0]".into(),
            });
        }
        Ok(())
    }
}

/// Classification written into the result grid.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WaterClass {
    #[default]
    Unknown = 0,
    Land = 1,
    Water = 2,
    Sink = 3,
}

impl WaterClass {
    pub const ALL: [WaterClass; 4] = [
        WaterClass::Unknown,
        WaterClass::Land,
        WaterClass::Water,
        WaterClass::Sink,
    ];

    /// Raster code stored in output files.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(WaterClass::Unknown),
            1 => Some(WaterClass::Land),
            2 => Some(WaterClass::Water),
            3 => Some(WaterClass::Sink),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WaterClass::Unknown => "unknown",
            WaterClass::Land => "land",
            WaterClass::Water => "water",
            WaterClass::Sink => "sink",
        }
    }
}

/// Converts a result grid into the `{0, 1, 2, 3}` code grid written to disk.
pub fn to_codes(result: &Array2<WaterClass>) -> Array2<u8> {
    result.mapv(WaterClass::code)
}
