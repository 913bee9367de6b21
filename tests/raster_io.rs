#[cfg(test)]
mod tests {
    use ndarray::{Array2, array};
    use tempfile::NamedTempFile;
    use water_detect::{
        array_to_rasterfile, detect_water, rasterfile_to_array, to_codes, DetectParams, GeoMeta,
        WaterError,
    };

    fn nz_meta() -> GeoMeta {
        GeoMeta {
            pixel_scale: Some(vec![8.0, 8.0, 0.0]),
            tiepoint: Some(vec![0.0, 0.0, 0.0, 1361171.0, 5006315.0, 0.0]),
            transformation: None,
            geo_key_directory: Some(vec![
                1, 1, 0, 7, 1024, 0, 1, 1, 1025, 0, 1, 1, 1026, 34737, 48, 0, 2049, 34737, 9, 48,
                2054, 0, 1, 9102, 3072, 0, 1, 2193, 3076, 0, 1, 9001,
            ]),
            geo_double_params: None,
            geo_ascii_params: Some("NZGD2000 / New Zealand Transverse Mercator 2000|NZGD2000|".to_string()),
            nodata: None,
        }
    }

    #[test]
    fn test_codes_with_georeferencing() {
        let codes: Array2<u8> = array![
            [0, 1, 1, 2],
            [1, 2, 2, 3],
            [1, 1, 1, 1],
        ];
        let meta = nz_meta();
        let tmp = NamedTempFile::new().unwrap();
        array_to_rasterfile(&codes, &meta, tmp.path()).unwrap();

        let (codes_new, meta_new) = rasterfile_to_array::<u8>(tmp.path()).unwrap();
        assert_eq!(codes_new, codes);
        assert_eq!(meta_new.pixel_scale, meta.pixel_scale);
        assert_eq!(meta_new.tiepoint, meta.tiepoint);
        assert_eq!(meta_new.geo_key_directory, meta.geo_key_directory);
        assert_eq!(meta_new.geo_ascii_params, meta.geo_ascii_params);
        assert_eq!(meta_new.transformation, None);
        assert_eq!(meta_new.epsg(), Some(2193));
        assert_eq!(
            meta_new.projection(),
            Some("NZGD2000 / New Zealand Transverse Mercator 2000|NZGD2000")
        );
    }

    #[test]
    fn test_elevations_and_nodata() {
        let dem: Array2<f32> = array![
            [10.0, 12.5, -3.25],
            [12.0, 9.0, 12.0],
        ];
        let meta = GeoMeta {
            nodata: Some("-9999".to_string()),
            ..GeoMeta::default()
        };
        let tmp = NamedTempFile::new().unwrap();
        array_to_rasterfile(&dem, &meta, tmp.path()).unwrap();

        let (dem_new, meta_new) = rasterfile_to_array::<f32>(tmp.path()).unwrap();
        assert_eq!(dem_new, dem);
        assert_eq!(meta_new.nodata_value(), Some(-9999.0));
        assert_eq!(meta_new.epsg(), None);

        // samples are converted to the requested type
        let (dem64, _) = rasterfile_to_array::<f64>(tmp.path()).unwrap();
        assert_eq!(dem64[[0, 1]], 12.5);
    }

    #[test]
    fn test_missing_file() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().with_extension("missing.tif");
        match rasterfile_to_array::<f32>(&path) {
            Err(WaterError::Io(_)) => {}
            other => panic!("expected an I/O error, got {:?}", other.map(|(a, _)| a.dim())),
        }
    }

    #[test]
    fn test_empty_array_rejected() {
        let tmp = NamedTempFile::new().unwrap();
        let empty: Array2<u8> = Array2::zeros((0, 3));
        assert!(array_to_rasterfile(&empty, &GeoMeta::default(), tmp.path()).is_err());
    }

    #[test]
    fn test_detect_from_file() {
        let mut dem = Array2::from_elem((10, 10), 10.0_f32);
        for row in 1..9 {
            for col in 1..9 {
                dem[[row, col]] = 5.0;
            }
        }
        let meta = nz_meta();
        let input = NamedTempFile::new().unwrap();
        array_to_rasterfile(&dem, &meta, input.path()).unwrap();

        let (dem_in, meta_in) = rasterfile_to_array::<f32>(input.path()).unwrap();
        let result = detect_water(&dem_in, &DetectParams::default()).unwrap();

        let output = NamedTempFile::new().unwrap();
        array_to_rasterfile(&to_codes(&result), &meta_in, output.path()).unwrap();
        let (codes, meta_out) = rasterfile_to_array::<u8>(output.path()).unwrap();
        assert_eq!(codes[[0, 0]], 1);
        assert_eq!(codes[[5, 5]], 2);
        assert_eq!(codes.iter().filter(|&&c| c == 2).count(), 64);
        assert_eq!(meta_out.tiepoint, meta.tiepoint);
        assert_eq!(meta_out.epsg(), Some(2193));
    }
}
