//! Single band (Geo)TIFF reading and writing.
//!
//! Only band 1 is read. GeoTIFF georeferencing tags are carried through
//! [`GeoMeta`] untouched so a result raster lines up with its DEM.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek};
use std::path::Path;

use ndarray::Array2;
use num::NumCast;
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::TiffEncoder;
use tiff::encoder::TiffValue;
use tiff::encoder::colortype::{self, Gray8, Gray16, Gray32Float, Gray64Float};
use tiff::tags::Tag;

use crate::error::{Result, WaterError};

const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const MODEL_TRANSFORMATION: u16 = 34264;
const GEO_KEY_DIRECTORY: u16 = 34735;
const GEO_DOUBLE_PARAMS: u16 = 34736;
const GEO_ASCII_PARAMS: u16 = 34737;
const GDAL_NODATA: u16 = 42113;

fn tag(code: u16) -> Tag {
    Tag::from_u16_exhaustive(code)
}

/// Georeferencing tags of a GeoTIFF, copied verbatim from input to output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoMeta {
    pub pixel_scale: Option<Vec<f64>>,
    pub tiepoint: Option<Vec<f64>>,
    pub transformation: Option<Vec<f64>>,
    pub geo_key_directory: Option<Vec<u64>>,
    pub geo_double_params: Option<Vec<f64>>,
    pub geo_ascii_params: Option<String>,
    pub nodata: Option<String>,
}

impl GeoMeta {
    /// EPSG code of the projected or geographic CRS, if the key directory has one.
    pub fn epsg(&self) -> Option<u16> {
        let gdir = self.geo_key_directory.as_ref()?;
        if gdir.len() < 4 {
            return None;
        }
        let nkeys = gdir[3] as usize;
        let mut geographic = None;
        for key in gdir[4..].chunks_exact(4).take(nkeys) {
            // only keys stored inline (location 0) carry the code directly
            if key[1] != 0 || key[3] == 0 {
                continue;
            }
            match key[0] {
                3072 => return Some(key[3] as u16),
                2048 => geographic = Some(key[3] as u16),
                _ => {}
            }
        }
        geographic
    }

    /// Projection description held in the GeoAscii params, without the trailing separator.
    pub fn projection(&self) -> Option<&str> {
        self.geo_ascii_params
            .as_deref()
            .map(|s| s.trim_end_matches('|'))
    }

    pub fn nodata_value(&self) -> Option<f64> {
        self.nodata.as_deref()?.trim().parse().ok()
    }
}

/// Pixel types that can be written as a single band TIFF.
pub trait RasterValue: Copy + NumCast + 'static {
    type Colour: colortype::ColorType<Inner = Self>;
}

impl RasterValue for u8 {
    type Colour = Gray8;
}

impl RasterValue for u16 {
    type Colour = Gray16;
}

impl RasterValue for f32 {
    type Colour = Gray32Float;
}

impl RasterValue for f64 {
    type Colour = Gray64Float;
}

fn cast_all<S, T>(buf: Vec<S>) -> Result<Vec<T>>
where
    S: NumCast + Copy,
    T: NumCast,
{
    buf.into_iter()
        .map(num::cast::<S, T>)
        .collect::<Option<Vec<T>>>()
        .ok_or_else(|| WaterError::UnsupportedDataType("sample does not fit the requested type".into()))
}

fn read_ascii<R: Read + Seek>(decoder: &mut Decoder<R>, code: u16) -> Option<String> {
    decoder
        .get_tag_ascii_string(tag(code))
        .ok()
        .map(|s| s.trim_end_matches('\0').to_string())
}

/// Reads band 1 of the TIFF at `path` as an array of `T`, plus its georeferencing.
pub fn rasterfile_to_array<T>(path: &Path) -> Result<(Array2<T>, GeoMeta)>
where
    T: NumCast,
{
    let file = File::open(path)?;
    let mut decoder = Decoder::new(BufReader::new(file))?;

    match decoder.colortype()? {
        ColorType::Gray(_) => {}
        other => {
            return Err(WaterError::UnsupportedDataType(format!(
                "expected a single band raster, got {:?}",
                other
            )));
        }
    }

    let (width, height) = decoder.dimensions()?;
    let (rows, cols) = (height as usize, width as usize);

    let data: Vec<T> = match decoder.read_image()? {
        DecodingResult::U8(buf) => cast_all(buf)?,
        DecodingResult::U16(buf) => cast_all(buf)?,
        DecodingResult::U32(buf) => cast_all(buf)?,
        DecodingResult::U64(buf) => cast_all(buf)?,
        DecodingResult::I8(buf) => cast_all(buf)?,
        DecodingResult::I16(buf) => cast_all(buf)?,
        DecodingResult::I32(buf) => cast_all(buf)?,
        DecodingResult::I64(buf) => cast_all(buf)?,
        DecodingResult::F32(buf) => cast_all(buf)?,
        DecodingResult::F64(buf) => cast_all(buf)?,
        #[allow(unreachable_patterns)]
        _ => return Err(WaterError::UnsupportedDataType("unsupported TIFF sample format".into())),
    };
    if data.len() != rows * cols {
        return Err(WaterError::InvalidDimensions { width: cols, height: rows });
    }
    let array = Array2::from_shape_vec((rows, cols), data)
        .map_err(|_| WaterError::InvalidDimensions { width: cols, height: rows })?;

    let meta = GeoMeta {
        pixel_scale: decoder.get_tag_f64_vec(tag(MODEL_PIXEL_SCALE)).ok(),
        tiepoint: decoder.get_tag_f64_vec(tag(MODEL_TIEPOINT)).ok(),
        transformation: decoder.get_tag_f64_vec(tag(MODEL_TRANSFORMATION)).ok(),
        geo_key_directory: decoder.get_tag_u64_vec(tag(GEO_KEY_DIRECTORY)).ok(),
        geo_double_params: decoder.get_tag_f64_vec(tag(GEO_DOUBLE_PARAMS)).ok(),
        geo_ascii_params: read_ascii(&mut decoder, GEO_ASCII_PARAMS),
        nodata: read_ascii(&mut decoder, GDAL_NODATA),
    };

    Ok((array, meta))
}

/// Writes `array` as a single band TIFF at `path`, attaching the tags in `meta`.
pub fn array_to_rasterfile<T>(array: &Array2<T>, meta: &GeoMeta, path: &Path) -> Result<()>
where
    T: RasterValue,
    [T]: TiffValue,
{
    let (rows, cols) = array.dim();
    if rows == 0 || cols == 0 {
        return Err(WaterError::InvalidDimensions { width: cols, height: rows });
    }
    let data: Vec<T> = array.iter().copied().collect();

    let file = File::create(path)?;
    let mut encoder = TiffEncoder::new(BufWriter::new(file))?;
    let mut image = encoder.new_image::<T::Colour>(cols as u32, rows as u32)?;

    if let Some(v) = &meta.pixel_scale {
        image.encoder().write_tag(tag(MODEL_PIXEL_SCALE), v.as_slice())?;
    }
    if let Some(v) = &meta.tiepoint {
        image.encoder().write_tag(tag(MODEL_TIEPOINT), v.as_slice())?;
    }
    if let Some(v) = &meta.transformation {
        image.encoder().write_tag(tag(MODEL_TRANSFORMATION), v.as_slice())?;
    }
    if let Some(v) = &meta.geo_key_directory {
        let keys: Vec<u16> = v.iter().map(|&k| k as u16).collect();
        image.encoder().write_tag(tag(GEO_KEY_DIRECTORY), keys.as_slice())?;
    }
    if let Some(v) = &meta.geo_double_params {
        image.encoder().write_tag(tag(GEO_DOUBLE_PARAMS), v.as_slice())?;
    }
    if let Some(s) = &meta.geo_ascii_params {
        image.encoder().write_tag(tag(GEO_ASCII_PARAMS), s.as_str())?;
    }
    if let Some(s) = &meta.nodata {
        image.encoder().write_tag(tag(GDAL_NODATA), s.as_str())?;
    }

    image.write_data(&data)?;
    Ok(())
}
