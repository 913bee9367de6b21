use anyhow::Result;
use ndarray::{Array2, array};
use tempfile::NamedTempFile;
use water_detect::{
    array_to_rasterfile, detect_water_with_report, rasterfile_to_array, to_codes, DetectParams,
    GeoMeta,
};

fn main() -> Result<()> {
    // a pond at 5 with a little noise, a lone pit at 2 and a slope running off to the east
    let dem: Array2<f32> = array![
        [9.0, 9.0, 9.0, 9.0, 9.0, 9.0, 8.0, 7.0],
        [9.0, 5.0, 5.05, 5.0, 9.0, 9.0, 7.0, 6.0],
        [9.0, 4.95, 5.0, 5.0, 9.0, 2.0, 6.0, 5.0],
        [9.0, 5.0, 5.0, 5.05, 9.0, 9.0, 5.0, 4.0],
        [9.0, 9.0, 9.0, 9.0, 9.0, 9.0, 4.0, 3.0],
    ];
    println!("Detecting water on {dem}");

    let params = DetectParams::default();
    let (result, report) = detect_water_with_report(&dem, &params)?;
    let codes = to_codes(&result);
    println!("codes are {codes}");
    println!("{} flood fills, {} kept as water", report.fills, report.water_regions);

    let geo = GeoMeta {
        pixel_scale: Some(vec![8.0, 8.0, 0.0]),
        tiepoint: Some(vec![0.0, 0.0, 0.0, 1361171.0, 5006315.0, 0.0]),
        ..GeoMeta::default()
    };
    let tmp = NamedTempFile::new()?;
    array_to_rasterfile(&codes, &geo, tmp.path())?;
    let (codes_new, _) = rasterfile_to_array::<u8>(tmp.path())?;
    assert_eq!(codes_new, codes);
    println!("Wrote and re-read {:?}", tmp.path());

    Ok(())
}
